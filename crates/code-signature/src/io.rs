use std::path::Path;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::debug;

use crate::config::{Destination, Source};
use crate::error::{CodeSignatureError, Result};

const STDIN: &str = "<stdin>";
const STDOUT: &str = "<stdout>";

pub async fn read_source(source: &Source) -> Result<String> {
    let content = match source {
        Source::Path(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CodeSignatureError::read(path, e))?,
        Source::Stdin => {
            let mut content = String::new();
            tokio::io::stdin()
                .read_to_string(&mut content)
                .await
                .map_err(|e| CodeSignatureError::read(STDIN, e))?;
            content
        }
    };
    debug!(?source, bytes = content.len(), "read document");
    Ok(content)
}

/// Writes `content` verbatim; no trailing newline is added.
pub async fn write_destination(destination: &Destination, content: &str) -> Result<()> {
    match destination {
        Destination::Path(path) => write_file(path, content).await?,
        Destination::Stdout => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(content.as_bytes())
                .await
                .map_err(|e| CodeSignatureError::write(STDOUT, e))?;
            stdout
                .flush()
                .await
                .map_err(|e| CodeSignatureError::write(STDOUT, e))?;
        }
    }
    debug!(?destination, bytes = content.len(), "wrote document");
    Ok(())
}

async fn write_file(path: &Path, content: &str) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| CodeSignatureError::write(path, e))
}
