use alloy_primitives::Address;
use tracing::debug;

use crate::config::{Destination, Options};
use crate::document::{MarkerKey, SignResult, VerifyResult, render_line, sign, verify};
use crate::error::Result;
use crate::io::{read_source, write_destination};
use crate::output::Console;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The embedded checksum matched.
    Verified,
    /// The checksum did not match and a freshly signed document was produced.
    Resigned,
    /// The checksum did not match and signing was not requested.
    Failed,
    /// Signing ran but produced nothing to render.
    NoSignedContent,
}

impl Outcome {
    pub fn is_pass(self) -> bool {
        matches!(self, Outcome::Verified | Outcome::Resigned)
    }
}

/// Everything a run learned and did.
#[derive(Debug, Clone)]
pub struct Report {
    pub outcome: Outcome,
    pub verified: VerifyResult,
    pub signed: Option<SignResult>,
    /// Set when the signed document was written out.
    pub written: Option<Destination>,
}

impl Report {
    /// True when the document as read needed a new signature.
    pub fn original_failed(&self) -> bool {
        !self.verified.hash_valid
    }
}

enum Phase {
    Verifying(String),
    Signing(VerifyResult),
    Done(Report),
}

/// Reads the configured source, verifies it and, unless verify-only,
/// re-signs and renders it.
pub async fn run(options: &Options, console: &Console) -> Result<Report> {
    if options.out.is_some() && !options.write {
        debug!("--out has no effect without --write");
    }

    let mut phase = Phase::Verifying(read_source(&options.source).await?);
    loop {
        phase = match phase {
            Phase::Verifying(content) => {
                debug!("verifying");
                let verified = verify(content, &options.prefix);
                if verified.hash_valid {
                    console.info(format!("OK: {}", signer_label(verified.recovered_address)));
                    Phase::Done(done(Outcome::Verified, verified, None, None))
                } else if options.verify_only {
                    console.info("SHA256: ERROR");
                    Phase::Done(done(Outcome::Failed, verified, None, None))
                } else {
                    Phase::Signing(verified)
                }
            }
            Phase::Signing(verified) => {
                debug!("signing");
                let signed = sign(&verified, &options.key_source)?;
                if let Some(phrase) = &signed.generated_mnemonic {
                    console.notice(format!("Generated mnemonic: {phrase}"));
                    console.notice(format!("Address: {}", signed.signer_address));
                }

                let (outcome, written) = match signed.rendered_content.as_deref() {
                    None => {
                        console.notice("ERROR: no signed content");
                        (Outcome::NoSignedContent, None)
                    }
                    Some(rendered) => (
                        Outcome::Resigned,
                        render(options, console, &signed, rendered).await?,
                    ),
                };
                Phase::Done(done(outcome, verified, Some(signed), written))
            }
            Phase::Done(report) => {
                debug!(outcome = ?report.outcome, "done");
                return Ok(report);
            }
        };
    }
}

fn done(
    outcome: Outcome,
    verified: VerifyResult,
    signed: Option<SignResult>,
    written: Option<Destination>,
) -> Report {
    Report {
        outcome,
        verified,
        signed,
        written,
    }
}

async fn render(
    options: &Options,
    console: &Console,
    signed: &SignResult,
    rendered: &str,
) -> Result<Option<Destination>> {
    if options.write {
        let destination = options.destination();
        write_destination(&destination, rendered).await?;
        if let Destination::Path(path) = &destination {
            console.info(format!("Wrote: {}", path.display()));
        }
        return Ok(Some(destination));
    }

    for (key, value) in [
        (MarkerKey::Integrity, &signed.new_hash),
        (MarkerKey::Provenance, &signed.new_signature),
    ] {
        if let Some(value) = value {
            console.info(render_line(key, &options.prefix, value));
        }
    }
    Ok(None)
}

fn signer_label(address: Option<Address>) -> String {
    address.map_or_else(|| "unsigned".to_string(), |address| address.to_string())
}
