use alloy_primitives::{Address, eip191_hash_message};
use anyhow::{Context, Result, bail};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey, signature::hazmat::PrehashSigner};

use super::signer::MessageSigner;

/// Length of an encoded recoverable signature: 32 bytes r + 32 bytes s + 1 byte v.
pub const SIGNATURE_LEN: usize = 65;

/// Offset Ethereum adds to the recovery ID in the `v` byte.
const V_OFFSET: u8 = 27;

/// ECDSA signer using the secp256k1 curve with Ethereum-compatible
/// recoverable signatures over EIP-191 personal messages.
///
/// The recovery ID (`v`) lets a verifier recover the signer's address
/// from the signature and the message alone.
pub struct EthereumSecp256k1Signer {
    signing_key: SigningKey,
}

impl EthereumSecp256k1Signer {
    pub fn new(signing_key: SigningKey) -> Self {
        Self { signing_key }
    }
}

impl MessageSigner for EthereumSecp256k1Signer {
    fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>> {
        let digest = eip191_hash_message(message);
        let (signature, recovery_id): (Signature, RecoveryId) = self
            .signing_key
            .sign_prehash(digest.as_slice())
            .map_err(|e| anyhow::anyhow!("ethereum secp256k1 sign_prehash failed: {e}"))?;

        let mut sig_bytes = signature.to_bytes().to_vec();
        sig_bytes.push(recovery_id.to_byte() + V_OFFSET);
        Ok(sig_bytes)
    }

    fn address(&self) -> Address {
        Address::from_public_key(self.signing_key.verifying_key())
    }

    fn algorithm(&self) -> &str {
        "ethereum-secp256k1"
    }
}

/// Renders signature bytes as a marker value (`0x` + lowercase hex).
pub fn encode_signature(sig_bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(sig_bytes))
}

/// Parses a marker value back into signature bytes.
pub fn decode_signature(value: &str) -> Result<Vec<u8>> {
    let hex_str = value
        .strip_prefix("0x")
        .context("signature is missing the 0x prefix")?;
    let bytes = hex::decode(hex_str).context("signature is not valid hex")?;
    if bytes.len() != SIGNATURE_LEN {
        bail!("expected {SIGNATURE_LEN} signature bytes, got {}", bytes.len());
    }
    Ok(bytes)
}

/// Recovers the address that produced `sig_bytes` over the personal
/// message `message`.
///
/// Accepts `v` as either `{0, 1}` or `{27, 28}` and high-S signatures.
/// A successful recovery says nothing about authenticity by itself.
pub fn recover_address(message: &[u8], sig_bytes: &[u8]) -> Result<Address> {
    if sig_bytes.len() != SIGNATURE_LEN {
        bail!("expected {SIGNATURE_LEN} signature bytes, got {}", sig_bytes.len());
    }

    let mut signature = Signature::from_slice(&sig_bytes[..64])
        .map_err(|e| anyhow::anyhow!("invalid signature scalars: {e}"))?;

    let v = sig_bytes[64];
    let recovery_byte = if v >= V_OFFSET { v - V_OFFSET } else { v };
    let mut recovery_id = RecoveryId::from_byte(recovery_byte)
        .with_context(|| format!("invalid recovery byte {v}"))?;

    if let Some(normalized) = signature.normalize_s() {
        signature = normalized;
        recovery_id = RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced());
    }

    let digest = eip191_hash_message(message);
    let verifying_key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id)
        .map_err(|e| anyhow::anyhow!("public key recovery failed: {e}"))?;

    Ok(Address::from_public_key(&verifying_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    fn signer_from_seed(seed: &str) -> EthereumSecp256k1Signer {
        let hash = Sha256::digest(seed.as_bytes());
        EthereumSecp256k1Signer::new(SigningKey::from_bytes((&hash).into()).unwrap())
    }

    #[test]
    fn signature_is_65_bytes() {
        let signer = signer_from_seed("test-seed");
        let sig = signer.sign_message(b"data").unwrap();
        assert_eq!(sig.len(), SIGNATURE_LEN, "ethereum signature should be 65 bytes (r+s+v)");
    }

    #[test]
    fn v_byte_is_27_or_28() {
        let signer = signer_from_seed("test-seed");
        let sig = signer.sign_message(b"data").unwrap();
        let v = sig[64];
        assert!(v == 27 || v == 28, "v should be 27 or 28, got {v}");
    }

    #[test]
    fn deterministic_signing() {
        let signer = signer_from_seed("test-seed");
        let sig1 = signer.sign_message(b"hello").unwrap();
        let sig2 = signer.sign_message(b"hello").unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn signature_recovers_signer_address() {
        let signer = signer_from_seed("recovery-test");
        let sig = signer.sign_message(b"recover me").unwrap();
        let recovered = recover_address(b"recover me", &sig).unwrap();
        assert_eq!(recovered, signer.address());
    }

    #[test]
    fn different_message_recovers_different_address() {
        let signer = signer_from_seed("recovery-test");
        let sig = signer.sign_message(b"recover me").unwrap();
        if let Ok(recovered) = recover_address(b"recover you", &sig) {
            assert_ne!(recovered, signer.address());
        }
    }

    #[test]
    fn recovery_accepts_raw_recovery_id() {
        let signer = signer_from_seed("raw-v");
        let mut sig = signer.sign_message(b"payload").unwrap();
        sig[64] -= V_OFFSET;
        assert_eq!(recover_address(b"payload", &sig).unwrap(), signer.address());
    }

    #[test]
    fn recovery_accepts_high_s() {
        let signer = signer_from_seed("high-s");
        let sig = signer.sign_message(b"payload").unwrap();

        let low = Signature::from_slice(&sig[..64]).unwrap();
        let (r, s) = low.split_scalars();
        let high = Signature::from_scalars(r.to_bytes(), (-*s).to_bytes()).unwrap();
        let mut flipped = high.to_bytes().to_vec();
        flipped.push(if sig[64] == 27 { 28 } else { 27 });

        assert_eq!(recover_address(b"payload", &flipped).unwrap(), signer.address());
    }

    #[test]
    fn recovery_rejects_bad_lengths_and_bytes() {
        assert!(recover_address(b"m", &[0u8; 64]).is_err());
        let mut zeros = vec![0u8; SIGNATURE_LEN];
        zeros[64] = 27;
        assert!(recover_address(b"m", &zeros).is_err());
        let mut bad_v = vec![1u8; SIGNATURE_LEN];
        bad_v[64] = 42;
        assert!(recover_address(b"m", &bad_v).is_err());
    }

    #[test]
    fn signature_hex_roundtrip() {
        let signer = signer_from_seed("hex");
        let sig = signer.sign_message(b"x").unwrap();
        let encoded = encode_signature(&sig);
        assert!(encoded.starts_with("0x"));
        assert_eq!(encoded.len(), 2 + 2 * SIGNATURE_LEN);
        assert_eq!(encoded, encoded.to_lowercase());
        assert_eq!(decode_signature(&encoded).unwrap(), sig);
    }

    #[test]
    fn decode_rejects_malformed_values() {
        assert!(decode_signature("deadbeef").is_err());
        assert!(decode_signature("0xzz").is_err());
        assert!(decode_signature("0xdeadbeef").is_err());
    }

    #[test]
    fn address_from_known_key() {
        // Private key 1 maps to the generator point.
        let mut key = [0u8; 32];
        key[31] = 1;
        let signer = EthereumSecp256k1Signer::new(SigningKey::from_bytes(&key.into()).unwrap());
        assert_eq!(
            signer.address().to_string(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
    }

    #[test]
    fn algorithm_is_ethereum_secp256k1() {
        let signer = signer_from_seed("test");
        assert_eq!(signer.algorithm(), "ethereum-secp256k1");
    }
}
