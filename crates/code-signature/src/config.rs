use std::path::{Path, PathBuf};

use crate::signing::KeySource;

/// Comment leader used for marker lines unless configured otherwise.
pub const DEFAULT_PREFIX: &str = "//";

/// Where the document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Path(PathBuf),
}

impl Source {
    /// `-` means standard input; anything else is a path.
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            Source::Stdin
        } else {
            Source::Path(PathBuf::from(arg))
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Source::Stdin => None,
            Source::Path(path) => Some(path),
        }
    }
}

/// Where a signed document is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    Path(PathBuf),
}

/// One invocation's configuration.
#[derive(Debug, Clone)]
pub struct Options {
    pub source: Source,
    pub prefix: String,
    /// Never sign or write.
    pub verify_only: bool,
    /// Persist the signed document instead of printing its marker lines.
    pub write: bool,
    /// Suppress informational output.
    pub silent: bool,
    /// Alternate write destination; only consulted with `write`.
    pub out: Option<PathBuf>,
    pub key_source: KeySource,
}

impl Options {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            prefix: DEFAULT_PREFIX.to_string(),
            verify_only: false,
            write: false,
            silent: false,
            out: None,
            key_source: KeySource::default(),
        }
    }

    /// `--out` wins, then the source path, then stdout for stdin input.
    pub fn destination(&self) -> Destination {
        match (&self.out, self.source.path()) {
            (Some(out), _) => Destination::Path(out.clone()),
            (None, Some(path)) => Destination::Path(path.to_path_buf()),
            (None, None) => Destination::Stdout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_is_stdin() {
        assert_eq!(Source::parse("-"), Source::Stdin);
        assert_eq!(Source::parse("a.rs"), Source::Path(PathBuf::from("a.rs")));
    }

    #[test]
    fn defaults() {
        let options = Options::new(Source::Stdin);
        assert_eq!(options.prefix, "//");
        assert!(!options.verify_only && !options.write && !options.silent);
        assert_eq!(options.out, None);
        assert_eq!(options.key_source, KeySource::Generate);
    }

    #[test]
    fn destination_resolution() {
        let mut options = Options::new(Source::parse("src/lib.rs"));
        assert_eq!(options.destination(), Destination::Path("src/lib.rs".into()));

        options.out = Some("signed.rs".into());
        assert_eq!(options.destination(), Destination::Path("signed.rs".into()));

        let stdin = Options::new(Source::Stdin);
        assert_eq!(stdin.destination(), Destination::Stdout);
    }
}
