//! # Error Handling
//! This crate defines the errors surfaced during seeded key generation.
//! Every failure is reported to the caller; nothing is retried internally.

use core::fmt::{self, Display};
use std::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsaErrorKind {
    /// Modulus size is not a multiple of 32 or is below the supported minimum.
    InvalidBits,
    /// Seed buffer holds fewer than 32 bytes.
    InvalidSeed,
    /// The public exponent shares a factor with φ(n), or violates its
    /// precondition (odd, ≥ 3).
    NotCoprime,
    /// `p · q` does not have the requested bit-length. Indicates a sampler
    /// bug rather than a runtime condition.
    ModulusLengthMismatch,
    /// Both prime searches produced the same prime.
    DegeneratePrimes,
}

#[derive(Debug)]
pub struct RsaError {
    kind: RsaErrorKind,
    message: String,
}

impl Display for RsaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let err_kind = match self.kind {
            RsaErrorKind::InvalidBits => "InvalidBits",
            RsaErrorKind::InvalidSeed => "InvalidSeed",
            RsaErrorKind::NotCoprime => "NotCoprime",
            RsaErrorKind::ModulusLengthMismatch => "ModulusLengthMismatch",
            RsaErrorKind::DegeneratePrimes => "DegeneratePrimes",
        };

        write!(f, "{}: {}", err_kind, self.message)
    }
}

impl error::Error for RsaError {}

impl RsaError {
    pub fn new(kind: RsaErrorKind, message: String) -> Self {
        Self { kind, message }
    }

    pub fn kind(&self) -> RsaErrorKind {
        self.kind
    }
}
