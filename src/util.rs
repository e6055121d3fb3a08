//! Utility functions: candidate sampling, the seeded prime search, and the
//! number-theoretic helpers used by key assembly.

use std::mem;

use num::{BigUint, Integer, One, Zero};

use crate::primality::is_probably_prime;
use crate::prng::Xoshiro128StarStar;

/// Draws a candidate of exactly `bits` bits from the generator.
///
/// Words are drawn most-significant-word first and assembled by shifting;
/// excess low-order bits from the last word are discarded when `bits` is not
/// word-aligned. The top two bits are forced so the product of two candidates
/// always reaches the full modulus length, and the low bit is forced to make
/// the candidate odd.
pub fn sample_candidate(rng: &mut Xoshiro128StarStar, bits: u64) -> BigUint {
    let words = (bits + 31) / 32;

    let mut candidate = BigUint::zero();
    for _ in 0..words {
        candidate = (candidate << 32u64) | BigUint::from(rng.next_word());
    }
    candidate >>= words * 32 - bits;

    candidate.set_bit(bits - 1, true);
    candidate.set_bit(bits - 2, true);
    candidate.set_bit(0, true);
    candidate
}

/// Runs one seeded prime search to completion.
///
/// The initial candidate comes from [`sample_candidate`]; each rejection
/// draws one word and toggles the interior bit `(word mod (bits - 3)) + 1`,
/// which leaves the forced top pair and the low bit untouched while advancing
/// the generator deterministically. Rerolling a single bit is much cheaper
/// than resampling and converges to a prime in O(bits) iterations.
///
/// The search is unbounded; for `bits >= 96` non-termination has negligible
/// probability.
pub fn generate_seeded_prime(seed: &[u8; 16], bits: u64, public_exponent: &BigUint) -> BigUint {
    let mut rng = Xoshiro128StarStar::from_seed_bytes(seed);
    let mut candidate = sample_candidate(&mut rng, bits);

    while !is_probably_prime(&candidate, public_exponent, &mut rng) {
        let word = rng.next_word();
        let bit = u64::from(word) % (bits - 3) + 1;
        let toggled = !candidate.bit(bit);
        candidate.set_bit(bit, toggled);
    }

    candidate
}

/// Euler's totient of a two-prime RSA modulus, `(p - 1)(q - 1)`.
pub fn euler_totient(p: &BigUint, q: &BigUint) -> BigUint {
    (p - 1u32) * (q - 1u32)
}

/// Computes `x⁻¹ mod m` with an iterative extended Euclidean variant that
/// tracks only the Bézout coefficient of `x` and never leaves the
/// nonnegative integers. Returns `None` when `gcd(x, m) != 1`.
pub fn mod_inverse(x: &BigUint, m: &BigUint) -> Option<BigUint> {
    let mut u1 = BigUint::one();
    let mut u3 = x.clone();
    let mut v1 = BigUint::zero();
    let mut v3 = m.clone();
    // Tracks the sign the coefficient would have carried in the signed
    // formulation: positive on an even number of steps.
    let mut positive = true;

    while !v3.is_zero() {
        let (q, r) = u3.div_rem(&v3);
        let next_v1 = &u1 + &q * &v1;
        u1 = mem::replace(&mut v1, next_v1);
        u3 = mem::replace(&mut v3, r);
        positive = !positive;
    }

    if !u3.is_one() {
        return None;
    }

    Some(if positive { u1 } else { m - u1 })
}
