use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use code_signature::{Console, DEFAULT_PREFIX, KeySource, Options, Source, run};

/// Verify and maintain the `@sha256sum` / `@eip191signature` marker lines
/// embedded in a text file.
#[derive(Parser)]
#[command(
    name = "code-signature",
    version,
    after_help = "Environment:\n  MNEMONIC  signing mnemonic; a new one is generated and printed when unset"
)]
struct Args {
    /// File to check, or `-` for standard input.
    #[arg(value_name = "FILE|-")]
    file: String,
    /// Only verify; never sign or write.
    #[arg(short, long)]
    verify: bool,
    /// Write the signed document to the source path or `--out`.
    #[arg(short, long)]
    write: bool,
    /// Suppress informational output.
    #[arg(short, long)]
    silent: bool,
    /// Marker line prefix.
    #[arg(short, long, default_value = DEFAULT_PREFIX)]
    prefix: String,
    /// Alternate write destination.
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// Signing mnemonic. Only read from the environment so the phrase never
/// shows up in process listings; a new one is generated when unset.
const MNEMONIC_VAR: &str = "MNEMONIC";

impl Args {
    fn into_options(self, mnemonic: Option<String>) -> Options {
        let mut options = Options::new(Source::parse(&self.file));
        options.prefix = self.prefix;
        options.verify_only = self.verify;
        options.write = self.write;
        options.silent = self.silent;
        options.out = self.out;
        options.key_source = KeySource::from_phrase(mnemonic);
        options
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // Usage errors fail like any other run; help and version succeed.
            return Ok(if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            });
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let options = args.into_options(std::env::var(MNEMONIC_VAR).ok());
    let console = Console::new(options.silent);
    let report = run(&options, &console)
        .await
        .with_context(|| format!("code-signature failed on {:?}", options.source))?;

    Ok(if report.outcome.is_pass() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
