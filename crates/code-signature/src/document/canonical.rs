use sha2::{Digest, Sha256};
use tracing::debug;

use super::marker::{Extracted, MarkerKey, extract, render_line};

/// The content variants derived from a raw document.
///
/// The integrity digest covers `without_integrity`, which still carries the
/// provenance line; the signature covers `without_either`, the bare body.
/// The checksum therefore binds the signature, never the other way round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    pub without_integrity: Extracted,
    pub without_either: Extracted,
}

impl Canonical {
    pub fn claimed_hash(&self) -> Option<&str> {
        self.without_integrity.value.as_deref()
    }

    pub fn claimed_signature(&self) -> Option<&str> {
        self.without_either.value.as_deref()
    }

    pub fn bare_body(&self) -> &str {
        &self.without_either.content
    }
}

/// Strips the integrity marker, then the provenance marker from what is left.
pub fn canonicalize(raw: &str, prefix: &str) -> Canonical {
    let without_integrity = extract(raw, MarkerKey::Integrity, prefix, None);
    let without_either = extract(&without_integrity.content, MarkerKey::Provenance, prefix, None);
    debug!(
        has_integrity = without_integrity.value.is_some(),
        has_provenance = without_either.value.is_some(),
        body_len = without_either.content.len(),
        "canonicalized document"
    );
    Canonical {
        without_integrity,
        without_either,
    }
}

/// SHA-256 of the UTF-8 bytes, as `0x` followed by 64 lowercase hex digits.
pub fn integrity_digest(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    format!("0x{}", hex::encode(digest))
}

/// Sets the `key` marker to `value`: in place when the document already
/// carries one, otherwise as a new first line.
pub fn embed(content: &str, key: MarkerKey, value: &str, prefix: &str) -> String {
    let rewritten = extract(content, key, prefix, Some(value));
    if rewritten.value.is_some() {
        rewritten.content
    } else {
        format!("{}\n{}", render_line(key, prefix, value), content)
    }
}
