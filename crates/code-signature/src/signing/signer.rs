use alloy_primitives::Address;

/// An account able to produce personal-message signatures.
///
/// Implementations are sync; signing is CPU-bound.
pub trait MessageSigner: Send + Sync {
    /// Sign `message` under EIP-191 (`personal_sign`). Returns the 65-byte
    /// `r || s || v` signature with `v` in `{27, 28}`.
    fn sign_message(&self, message: &[u8]) -> anyhow::Result<Vec<u8>>;

    /// Address a verifier recovers from this signer's signatures.
    fn address(&self) -> Address;

    /// Algorithm identifier string (e.g. "ethereum-secp256k1").
    fn algorithm(&self) -> &str;
}
