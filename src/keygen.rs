//! Contains utilities for deriving RSA keys deterministically from a seed.
//! The same seed, modulus size, and public exponent always reproduce the
//! same keypair, so a memorized high-entropy phrase can stand in for key
//! storage.

use std::mem;

use num::{BigUint, Integer, One};

use crate::errors::{RsaError, RsaErrorKind};
use crate::util::{euler_totient, generate_seeded_prime, mod_inverse};

/// Smallest supported modulus; each prime half must reach 96 bits.
pub const MIN_MODULUS_BIT_LENGTH: u64 = 192;

/// Bytes of seed material consumed: 16 per prime search.
pub const SEED_BYTE_LENGTH: usize = 32;

pub const DEFAULT_PUBLIC_EXPONENT: u32 = 65537;

pub const RSA_VERSION: RsaVersion = RsaVersion(0);

/// Two-prime key, version 0 in RFC 3447 terms.
#[derive(Debug)]
pub struct RsaVersion(pub u8);

/// Builds a keypair from a modulus size and a caller-supplied seed.
///
/// The first 16 seed bytes drive the search for `prime1`, the next 16 the
/// search for `prime2`; the two searches share no state and run in parallel.
pub struct KeyPairBuilder<'a> {
    bits: u64,
    seed: &'a [u8],
    exponent: Option<BigUint>,
}

impl<'a> KeyPairBuilder<'a> {
    pub fn new(bits: u64, seed: &'a [u8]) -> Self {
        Self {
            bits,
            seed,
            exponent: None,
        }
    }

    pub fn with_exponent(&mut self, e: BigUint) -> &mut Self {
        self.exponent = Some(e);
        self
    }

    /// Consumes the configured exponent; defaults to 65537.
    pub fn create_keypair(&mut self) -> Result<KeyPair, RsaError> {
        let e = self
            .exponent
            .take()
            .unwrap_or_else(|| BigUint::from(DEFAULT_PUBLIC_EXPONENT));

        if self.bits < MIN_MODULUS_BIT_LENGTH || self.bits % 32 != 0 {
            return Err(RsaError::new(
                RsaErrorKind::InvalidBits,
                format!(
                    "modulus bit length {} must be a multiple of 32 and at least {}",
                    self.bits, MIN_MODULUS_BIT_LENGTH
                ),
            ));
        }

        if self.seed.len() < SEED_BYTE_LENGTH {
            return Err(RsaError::new(
                RsaErrorKind::InvalidSeed,
                format!(
                    "seed holds {} bytes, at least {} are required",
                    self.seed.len(),
                    SEED_BYTE_LENGTH
                ),
            ));
        }

        // An even exponent (or one below 3) can never be coprime with the
        // even totient, so every candidate would fail the oracle forever.
        if e < BigUint::from(3u32) || e.is_even() {
            return Err(RsaError::new(
                RsaErrorKind::NotCoprime,
                format!("public exponent {} must be an odd integer of at least 3", e),
            ));
        }

        let mut p_seed = [0u8; 16];
        let mut q_seed = [0u8; 16];
        p_seed.copy_from_slice(&self.seed[..16]);
        q_seed.copy_from_slice(&self.seed[16..SEED_BYTE_LENGTH]);

        let p_bits = self.bits / 2;
        let q_bits = self.bits - p_bits;

        // Throughput only: the searches are seeded from disjoint bytes, so a
        // sequential run would produce the identical pair.
        let (p, q) = rayon::join(
            || generate_seeded_prime(&p_seed, p_bits, &e),
            || generate_seeded_prime(&q_seed, q_bits, &e),
        );

        assemble_keypair(self.bits, p, q, e)
    }
}

/// Key assembly: invariant checks, canonical ordering, private exponent and
/// CRT parameters.
fn assemble_keypair(
    bits: u64,
    mut p: BigUint,
    mut q: BigUint,
    e: BigUint,
) -> Result<KeyPair, RsaError> {
    let n = &p * &q;
    if n.bits() != bits {
        return Err(RsaError::new(
            RsaErrorKind::ModulusLengthMismatch,
            format!("modulus has {} bits, expected {}", n.bits(), bits),
        ));
    }

    // The oracle already enforced gcd(p - 1, e) = gcd(q - 1, e) = 1; this
    // re-asserts the combined invariant on the assembled totient.
    let phi = euler_totient(&p, &q);
    if !phi.gcd(&e).is_one() {
        return Err(RsaError::new(
            RsaErrorKind::NotCoprime,
            format!("public exponent {} shares a factor with the totient", e),
        ));
    }

    if p == q {
        return Err(RsaError::new(
            RsaErrorKind::DegeneratePrimes,
            String::from("both prime searches converged to the same prime"),
        ));
    }

    if q > p {
        mem::swap(&mut p, &mut q);
    }

    let d = mod_inverse(&e, &phi).ok_or_else(|| {
        RsaError::new(
            RsaErrorKind::NotCoprime,
            format!("public exponent {} has no inverse modulo the totient", e),
        )
    })?;

    let pk = RsaPublicKey::new(e.clone(), n.clone());
    let sk = RsaPrivateKey::with_values(n, e, d, p, q)?;

    Ok(KeyPair {
        public_key: pk,
        private_key: sk,
    })
}

/// The single operation of the crate: derive a keypair with the default
/// public exponent. Use [`KeyPairBuilder`] to override the exponent.
pub fn generate(bits: u64, seed: &[u8]) -> Result<KeyPair, RsaError> {
    KeyPairBuilder::new(bits, seed).create_keypair()
}

#[derive(Debug)]
pub struct KeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
}

#[derive(Debug)]
pub struct RsaPublicKey {
    pub modulus: BigUint,
    pub public_exponent: BigUint,
}

/// [See source](https://datatracker.ietf.org/doc/html/rfc3447#appendix-A)
#[derive(Debug)]
pub struct RsaPrivateKey {
    pub version: RsaVersion,
    pub modulus: BigUint,
    pub public_exponent: BigUint,
    pub private_exponent: BigUint,
    pub prime1: BigUint,
    pub prime2: BigUint,
    pub exponent1: BigUint,
    pub exponent2: BigUint,
    pub coefficient: BigUint,
}

impl RsaPublicKey {
    pub fn new(e: BigUint, n: BigUint) -> Self {
        Self {
            public_exponent: e,
            modulus: n,
        }
    }
}

impl RsaPrivateKey {
    /// `p` must already be the larger prime.
    fn with_values(
        n: BigUint,
        e: BigUint,
        d: BigUint,
        p: BigUint,
        q: BigUint,
    ) -> Result<Self, RsaError> {
        let p1 = &p - 1u32;
        let q1 = &q - 1u32;

        let dp = &d % &p1;
        let dq = &d % &q1;
        let qinv = mod_inverse(&q, &p).ok_or_else(|| {
            RsaError::new(
                RsaErrorKind::DegeneratePrimes,
                format!("prime {} is not invertible modulo {}", q, p),
            )
        })?;

        Ok(Self {
            version: RSA_VERSION,
            modulus: n,
            public_exponent: e,
            private_exponent: d,
            prime1: p,
            prime2: q,
            exponent1: dp,
            exponent2: dq,
            coefficient: qinv,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn seed() -> Vec<u8> {
        (0u8..32).collect()
    }

    #[test]
    fn rejects_bit_lengths_off_the_word_grid() {
        for bits in [97, 128, 250, 191] {
            let err = generate(bits, &seed()).unwrap_err();
            assert_eq!(err.kind(), RsaErrorKind::InvalidBits, "bits = {}", bits);
        }
    }

    #[test]
    fn rejects_short_seed() {
        let err = generate(192, &seed()[..31]).unwrap_err();
        assert_eq!(err.kind(), RsaErrorKind::InvalidSeed);
    }

    #[test]
    fn rejects_even_or_tiny_exponent() {
        for e in [1u32, 2, 4, 65536] {
            let err = KeyPairBuilder::new(192, &seed())
                .with_exponent(BigUint::from(e))
                .create_keypair()
                .unwrap_err();
            assert_eq!(err.kind(), RsaErrorKind::NotCoprime, "e = {}", e);
        }
    }

    #[test]
    fn identical_seed_halves_are_degenerate() {
        // Both searches then run the same generator over the same bit count,
        // so they converge to the same prime with certainty.
        for seed in [[0x00u8; 32], [0xFFu8; 32]] {
            let err = generate(192, &seed).unwrap_err();
            assert_eq!(err.kind(), RsaErrorKind::DegeneratePrimes);
        }
    }

    #[test]
    fn argument_errors_win_over_seed_errors() {
        let err = generate(100, &[0u8; 4]).unwrap_err();
        assert_eq!(err.kind(), RsaErrorKind::InvalidBits);
    }

    #[test]
    fn canonical_ordering_after_join() {
        let kp = generate(192, &seed()).unwrap();
        let sk = kp.private_key;
        assert!(sk.prime1 > sk.prime2);
        assert!(sk.prime2 > BigUint::one());
    }

    #[test]
    fn excess_seed_bytes_are_ignored() {
        let mut long_seed = seed();
        long_seed.extend([0xAB; 16]);

        let a = generate(192, &seed()).unwrap();
        let b = generate(192, &long_seed).unwrap();
        assert_eq!(a.public_key.modulus, b.public_key.modulus);
    }
}
