//! # Serialization
//! The core hands back big-integer fields and stays format-agnostic; this
//! module is the transport collaborator, mapping keys onto RFC 7517 JWK
//! documents and stable modulus fingerprints.

use base64::prelude::*;
use num::BigUint;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::keygen::{RsaPrivateKey, RsaPublicKey};

/// JWK `Base64urlUInt`: minimal big-endian octets, base64url, no padding.
fn base64url_uint(value: &BigUint) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(value.to_bytes_be())
}

pub fn public_jwk(key: &RsaPublicKey) -> Value {
    json!({
        "kty": "RSA",
        "n": base64url_uint(&key.modulus),
        "e": base64url_uint(&key.public_exponent),
    })
}

pub fn private_jwk(key: &RsaPrivateKey) -> Value {
    json!({
        "kty": "RSA",
        "n": base64url_uint(&key.modulus),
        "e": base64url_uint(&key.public_exponent),
        "d": base64url_uint(&key.private_exponent),
        "p": base64url_uint(&key.prime1),
        "q": base64url_uint(&key.prime2),
        "dp": base64url_uint(&key.exponent1),
        "dq": base64url_uint(&key.exponent2),
        "qi": base64url_uint(&key.coefficient),
    })
}

/// OpenSSH-style fingerprint of the modulus: `SHA256:` followed by the
/// base64url digest of the big-endian modulus bytes. Stable for a given
/// seed, so it doubles as a cheap reproducibility check.
pub fn modulus_fingerprint(key: &RsaPublicKey) -> String {
    let digest = Sha256::digest(key.modulus.to_bytes_be());
    format!("SHA256:{}", BASE64_URL_SAFE_NO_PAD.encode(digest))
}
