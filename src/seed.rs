//! Passphrase-to-seed derivation.
//!
//! The key generator consumes raw bytes; this is a convenience for callers
//! who start from a memorized phrase instead. It is a plain SHA-256 digest,
//! not a standardized mnemonic scheme — callers wanting BIP-39 semantics
//! should derive the 32 bytes themselves and hand them to the generator.

use sha2::{Digest, Sha256};

use crate::keygen::SEED_BYTE_LENGTH;

/// Hashes a UTF-8 passphrase down to the 32 seed bytes the generator reads.
pub fn derive_seed(phrase: &str) -> [u8; SEED_BYTE_LENGTH] {
    Sha256::digest(phrase.as_bytes()).into()
}
