use std::io;
use std::path::PathBuf;

/// Fatal failures of a signing run.
///
/// Malformed markers and checksum mismatches are not errors; they surface
/// as a normal FAIL outcome of the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum CodeSignatureError {
    #[error("Failed to read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid mnemonic: {0}")]
    Mnemonic(String),
    #[error("Failed to derive signing key: {0}")]
    Derivation(String),
    #[error("Failed to sign content: {0}")]
    Signing(String),
}

impl CodeSignatureError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read { path: path.into(), source }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write { path: path.into(), source }
    }
}

pub type Result<T, E = CodeSignatureError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn read_error_names_the_path() {
        let error = CodeSignatureError::read(
            "src/lib.rs",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(error.to_string(), "Failed to read src/lib.rs: no such file");
    }

    #[test]
    fn write_error_keeps_io_source() {
        let error = CodeSignatureError::write(
            "/readonly/out.ts",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let source = error.source().expect("io source");
        assert_eq!(source.to_string(), "denied");
    }

    #[test]
    fn mnemonic_error_message() {
        let error = CodeSignatureError::Mnemonic("unknown word".into());
        assert_eq!(error.to_string(), "Invalid mnemonic: unknown word");
    }

    #[test]
    fn signing_error_message() {
        let error = CodeSignatureError::Signing("bad key".into());
        assert_eq!(error.to_string(), "Failed to sign content: bad key");
    }
}
