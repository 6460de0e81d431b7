use std::fmt;

use bip32::{DerivationPath, XPrv};
use bip39::{Language, Mnemonic};
use k256::ecdsa::SigningKey;
use tracing::debug;

use super::ethereum_secp256k1::EthereumSecp256k1Signer;
use crate::error::{CodeSignatureError, Result};

/// First account of the standard Ethereum BIP-44 tree.
pub const ETHEREUM_DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// Word count of freshly generated mnemonics (256 bits of entropy).
pub const GENERATED_WORD_COUNT: usize = 24;

/// Where the signing account comes from.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum KeySource {
    /// No key material supplied: generate a new mnemonic.
    #[default]
    Generate,
    /// A BIP-39 English mnemonic phrase.
    Mnemonic(String),
}

impl KeySource {
    /// Blank or missing phrases fall back to generation.
    pub fn from_phrase(phrase: Option<String>) -> Self {
        match phrase {
            Some(phrase) if !phrase.trim().is_empty() => Self::Mnemonic(phrase),
            _ => Self::Generate,
        }
    }

    pub fn resolve(&self) -> Result<ResolvedKey> {
        match self {
            KeySource::Mnemonic(phrase) => {
                let mnemonic = parse_mnemonic(phrase)?;
                Ok(ResolvedKey {
                    signer: EthereumSecp256k1Signer::from_mnemonic(&mnemonic)?,
                    generated_phrase: None,
                })
            }
            KeySource::Generate => {
                let mnemonic = generate_mnemonic()?;
                debug!(words = mnemonic.word_count(), "generated new mnemonic");
                Ok(ResolvedKey {
                    signer: EthereumSecp256k1Signer::from_mnemonic(&mnemonic)?,
                    generated_phrase: Some(mnemonic.to_string()),
                })
            }
        }
    }
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Generate => f.write_str("Generate"),
            KeySource::Mnemonic(_) => f.write_str("Mnemonic(<redacted>)"),
        }
    }
}

/// A signing account plus, when it was just created, its phrase.
pub struct ResolvedKey {
    pub signer: EthereumSecp256k1Signer,
    /// Only set for generated keys; this is the caller's one chance to
    /// record it.
    pub generated_phrase: Option<String>,
}

pub fn parse_mnemonic(phrase: &str) -> Result<Mnemonic> {
    Mnemonic::parse_in(Language::English, phrase.trim())
        .map_err(|e| CodeSignatureError::Mnemonic(e.to_string()))
}

pub fn generate_mnemonic() -> Result<Mnemonic> {
    Mnemonic::generate_in(Language::English, GENERATED_WORD_COUNT)
        .map_err(|e| CodeSignatureError::Mnemonic(e.to_string()))
}

pub fn mnemonic_from_entropy(entropy: &[u8]) -> Result<Mnemonic> {
    Mnemonic::from_entropy_in(Language::English, entropy)
        .map_err(|e| CodeSignatureError::Mnemonic(e.to_string()))
}

/// BIP-39 seed (empty passphrase), then the BIP-32 key at [`ETHEREUM_DERIVATION_PATH`].
pub fn derive_signing_key(mnemonic: &Mnemonic) -> Result<SigningKey> {
    let path: DerivationPath = ETHEREUM_DERIVATION_PATH
        .parse()
        .map_err(|e: bip32::Error| CodeSignatureError::Derivation(e.to_string()))?;
    let seed = mnemonic.to_seed("");
    let xprv = XPrv::derive_from_path(seed, &path)
        .map_err(|e| CodeSignatureError::Derivation(e.to_string()))?;
    Ok(xprv.private_key().clone())
}

impl EthereumSecp256k1Signer {
    pub fn from_mnemonic(mnemonic: &Mnemonic) -> Result<Self> {
        Ok(Self::new(derive_signing_key(mnemonic)?))
    }
}
