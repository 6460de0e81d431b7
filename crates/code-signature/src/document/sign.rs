use alloy_primitives::Address;
use tracing::{debug, info, warn};

use super::canonical::{canonicalize, embed, integrity_digest};
use super::marker::{MarkerKey, extract};
use super::verify::VerifyResult;
use crate::error::{CodeSignatureError, Result};
use crate::signing::{KeySource, MessageSigner, encode_signature};

/// Shortest value a marker line is recognized with.
const VALUE_PLACEHOLDER: &str = "0x";

/// Output of a signing pass.
///
/// `new_signature`, `new_hash` and `rendered_content` are all `None` when
/// the document was already valid and carried this signer's signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignResult {
    pub signer_address: Address,
    pub new_signature: Option<String>,
    pub new_hash: Option<String>,
    pub rendered_content: Option<String>,
    /// Set only when the key was generated for this call.
    pub generated_mnemonic: Option<String>,
    /// Signer recovered from the document before re-signing.
    pub previous_signer: Option<Address>,
}

impl SignResult {
    pub fn is_skipped(&self) -> bool {
        self.rendered_content.is_none()
    }
}

/// Resolves a key from `key_source` and re-signs the verified document.
pub fn sign(verified: &VerifyResult, key_source: &KeySource) -> Result<SignResult> {
    let resolved = key_source.resolve()?;
    let mut result = sign_with(verified, &resolved.signer)?;
    result.generated_mnemonic = resolved.generated_phrase;
    Ok(result)
}

/// Signs the bare body with `signer` and renders the document with fresh
/// provenance and integrity markers.
///
/// The provenance marker is embedded first and the integrity digest is then
/// taken over that output, so a document signed from scratch reads: integrity
/// line, provenance line, body.
pub fn sign_with(verified: &VerifyResult, signer: &dyn MessageSigner) -> Result<SignResult> {
    let signer_address = signer.address();
    let previous_signer = verified.recovered_address;

    if verified.hash_valid && previous_signer == Some(signer_address) {
        debug!(%signer_address, "document already signed by this signer");
        return Ok(SignResult {
            signer_address,
            new_signature: None,
            new_hash: None,
            rendered_content: None,
            generated_mnemonic: None,
            previous_signer,
        });
    }

    if let Some(previous) = previous_signer.filter(|previous| *previous != signer_address) {
        warn!(%previous, signer = %signer_address, "document signer changes");
    }

    // Stripping a prepended marker also strips blank lines opening the
    // body, so the signed body and the hash input are read back from a
    // draft with the final layout. Marker values do not change the layout.
    let prefix = verified.prefix.as_str();
    let draft = embed(
        &embed(&verified.content, MarkerKey::Provenance, VALUE_PLACEHOLDER, prefix),
        MarkerKey::Integrity,
        VALUE_PLACEHOLDER,
        prefix,
    );
    let body = canonicalize(&draft, prefix).without_either.content;

    let sig_bytes = signer
        .sign_message(body.as_bytes())
        .map_err(|e| CodeSignatureError::Signing(format!("{e:#}")))?;
    let signature = encode_signature(&sig_bytes);

    let signed = embed(&verified.content, MarkerKey::Provenance, &signature, prefix);
    let draft = embed(&signed, MarkerKey::Integrity, VALUE_PLACEHOLDER, prefix);
    let hash = integrity_digest(&extract(&draft, MarkerKey::Integrity, prefix, None).content);
    let rendered = embed(&signed, MarkerKey::Integrity, &hash, prefix);

    info!(
        %signer_address,
        algorithm = signer.algorithm(),
        hash = %hash,
        "signed document"
    );

    Ok(SignResult {
        signer_address,
        new_signature: Some(signature),
        new_hash: Some(hash),
        rendered_content: Some(rendered),
        generated_mnemonic: None,
        previous_signer,
    })
}
