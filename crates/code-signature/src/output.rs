use std::io::{self, Write};

/// Human-facing output of a run.
///
/// Informational lines go to stdout and honour `silent`; notices go to
/// stderr unconditionally so they never mix with a document on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    silent: bool,
}

impl Console {
    pub fn new(silent: bool) -> Self {
        Self { silent }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if !self.silent {
            let _ = writeln!(io::stdout(), "{}", msg.as_ref());
        }
    }

    pub fn notice(&self, msg: impl AsRef<str>) {
        let _ = writeln!(io::stderr(), "{}", msg.as_ref());
    }
}
