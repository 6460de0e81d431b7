mod signer;
mod ethereum_secp256k1;
mod mnemonic;

pub use signer::MessageSigner;
pub use ethereum_secp256k1::{
    EthereumSecp256k1Signer, SIGNATURE_LEN, decode_signature, encode_signature, recover_address,
};
pub use mnemonic::{
    ETHEREUM_DERIVATION_PATH, GENERATED_WORD_COUNT, KeySource, ResolvedKey, derive_signing_key,
    generate_mnemonic, mnemonic_from_entropy, parse_mnemonic,
};
