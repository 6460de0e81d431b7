use alloy_primitives::Address;
use tracing::{debug, warn};

use super::canonical::{Canonical, canonicalize, integrity_digest};
use crate::signing::{decode_signature, recover_address};

/// Everything learned from checking a document against its own markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyResult {
    /// The document as read.
    pub content: String,
    /// Prefix the markers were located with; signing reuses it.
    pub prefix: String,
    pub canonical: Canonical,
    /// Digest of the content with only the integrity line removed.
    pub computed_hash: String,
    /// The single pass/fail gate: claimed hash equals computed hash.
    pub hash_valid: bool,
    /// Address recovered from the provenance marker, if any decoded.
    pub recovered_address: Option<Address>,
}

impl VerifyResult {
    pub fn content_without_integrity_marker(&self) -> &str {
        &self.canonical.without_integrity.content
    }

    pub fn content_without_either_marker(&self) -> &str {
        self.canonical.bare_body()
    }

    pub fn claimed_hash(&self) -> Option<&str> {
        self.canonical.claimed_hash()
    }

    pub fn claimed_signature(&self) -> Option<&str> {
        self.canonical.claimed_signature()
    }
}

/// Checks `content`'s embedded checksum and recovers its claimed signer.
///
/// Pure: no I/O, no shared state.
pub fn verify(content: impl Into<String>, prefix: &str) -> VerifyResult {
    let content = content.into();
    let canonical = canonicalize(&content, prefix);

    let computed_hash = integrity_digest(&canonical.without_integrity.content);
    let hash_valid = canonical.claimed_hash() == Some(computed_hash.as_str());

    let recovered_address = canonical
        .claimed_signature()
        .and_then(|signature| recover_signer(canonical.bare_body(), signature));

    debug!(
        %computed_hash,
        claimed_hash = canonical.claimed_hash().unwrap_or("none"),
        hash_valid,
        recovered_address = ?recovered_address,
        "verified document"
    );

    VerifyResult {
        prefix: prefix.to_string(),
        canonical,
        computed_hash,
        hash_valid,
        recovered_address,
        content,
    }
}

fn recover_signer(body: &str, signature: &str) -> Option<Address> {
    let recovered =
        decode_signature(signature).and_then(|sig_bytes| recover_address(body.as_bytes(), &sig_bytes));
    match recovered {
        Ok(address) => Some(address),
        Err(e) => {
            warn!(error = %e, "provenance marker does not hold a recoverable signature");
            None
        }
    }
}
