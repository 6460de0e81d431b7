pub mod config;
pub mod document;
pub mod error;
pub mod io;
pub mod output;
pub mod pipeline;
pub mod signing;

pub use config::{DEFAULT_PREFIX, Destination, Options, Source};
pub use document::{MarkerKey, SignResult, VerifyResult, sign, verify};
pub use error::{CodeSignatureError, Result};
pub use output::Console;
pub use pipeline::{Outcome, Report, run};
pub use signing::{EthereumSecp256k1Signer, KeySource, MessageSigner};
