//! Bijection between byte strings and constant-weight vectors.
//!
//! Combinatorial number system: a weight-t vector of length n is ranked by
//! the index sum of C(p_j, j) over its set positions p_1 < ... < p_t, and
//! unranked by the greedy descent. The byte-string side of the bijection is
//! the floor(floor(log2 C(n,t)) / 8)-byte big-endian prefix domain, so every
//! prefix value has a vector and honest vectors rank back into the prefix.

use crate::helpers::ensure;
use crate::matrix::GfVector;
use crate::Error;
use num_bigint::BigUint;


/// C(n, k) exactly; zero when k > n.
pub(crate) fn binom(n: usize, k: usize) -> BigUint {
    if k > n {
        return BigUint::from(0u32);
    }
    let mut r = BigUint::from(1u32);
    for i in 0..k {
        r = r * ((n - i) as u64) / ((i + 1) as u64);
    }
    r
}


/// Number of whole bytes the index domain spans: floor(floor(log2 C(n,t))/8).
pub(crate) fn prefix_len(n: usize, t: usize) -> usize {
    let bits = binom(n, t).bits().saturating_sub(1);
    usize::try_from(bits / 8).expect("prefix length fits usize")
}


/// Map a byte-string prefix to the weight-t vector of length n with that
/// combinadic rank. Input beyond the prefix domain is ignored; shorter input
/// is taken whole (its value is below the domain bound either way).
pub(crate) fn encode(n: usize, t: usize, bytes: &[u8]) -> GfVector {
    let mut v = GfVector::zero(n);
    if t == 0 {
        return v;
    }
    debug_assert!(t < n, "weight must be below the length");
    let nb = bytes.len().min(prefix_len(n, t));
    let mut rem = BigUint::from_bytes_be(&bytes[..nb]);

    let mut k = t;
    let mut pos = n - 1;
    let mut c = binom(pos, k); // C(pos, k), maintained incrementally
    loop {
        if c <= rem {
            v.set(pos, true);
            rem -= &c;
            if k == 1 {
                break;
            }
            // C(pos-1, k-1) = C(pos, k) * k / pos
            c = c * (k as u64) / (pos as u64);
            k -= 1;
            debug_assert!(pos > 0, "rank exceeds C(n, t)");
            pos -= 1;
        } else {
            // C(pos-1, k) = C(pos, k) * (pos-k) / pos
            c = c * ((pos - k) as u64) / (pos as u64);
            pos -= 1;
        }
    }
    debug_assert_eq!(v.weight(), t);
    v
}


/// Rank a weight-t vector back into its byte-string prefix. Fails when the
/// weight is off or the rank falls outside the whole-byte prefix domain
/// (honest encryption never produces such vectors).
pub(crate) fn decode(n: usize, t: usize, v: &GfVector) -> Result<Vec<u8>, Error> {
    ensure!(v.len() == n, Error::InvalidCiphertext);
    ensure!(v.weight() == t, Error::InvalidCiphertext);
    let mut idx = BigUint::from(0u32);
    for (j, pos) in v.ones().into_iter().enumerate() {
        idx += binom(pos, j + 1);
    }
    let out_len = prefix_len(n, t);
    ensure!(idx.bits() <= 8 * out_len as u64, Error::InvalidCiphertext);
    let raw = idx.to_bytes_be();
    let mut out = vec![0u8; out_len];
    if idx != BigUint::from(0u32) {
        out[out_len - raw.len()..].copy_from_slice(&raw);
    }
    Ok(out)
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::{RngCore, SeedableRng};

    #[test]
    fn binomials() {
        assert_eq!(binom(5, 2), BigUint::from(10u32));
        assert_eq!(binom(10, 0), BigUint::from(1u32));
        assert_eq!(binom(3, 5), BigUint::from(0u32));
        // C(52, 5) = 2598960, a classic
        assert_eq!(binom(52, 5), BigUint::from(2_598_960u32));
    }

    #[test]
    fn zero_input_selects_lowest_positions() {
        let v = encode(2048, 40, &vec![0u8; prefix_len(2048, 40)]);
        assert_eq!(v.weight(), 40);
        assert_eq!(v.ones(), (0..40).collect::<Vec<_>>());
        assert_eq!(decode(2048, 40, &v).unwrap(), vec![0u8; prefix_len(2048, 40)]);
    }

    #[test]
    fn round_trip_from_bytes() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(21);
        for (n, t) in [(64, 5), (256, 12), (512, 30)] {
            let len = prefix_len(n, t);
            for _ in 0..50 {
                let mut b = vec![0u8; len];
                rng.fill_bytes(&mut b);
                let v = encode(n, t, &b);
                assert_eq!(v.weight(), t);
                assert_eq!(decode(n, t, &v).unwrap(), b);
            }
        }
    }

    #[test]
    fn long_input_is_truncated() {
        let len = prefix_len(256, 12);
        let mut b = vec![0xabu8; len + 20];
        let v = encode(256, 12, &b);
        b.truncate(len);
        assert_eq!(encode(256, 12, &b), v);
    }

    #[test]
    fn wrong_weight_rejected() {
        let mut v = GfVector::zero(64);
        for i in 0..4 {
            v.set(i, true);
        }
        assert!(decode(64, 5, &v).is_err());
        assert!(decode(128, 4, &v).is_err());
    }

    #[test]
    fn out_of_domain_rank_rejected() {
        // The top-most weight-5 vector of length 64 ranks to C(64,5)-1, whose
        // bit length exceeds the whole-byte prefix domain.
        let mut v = GfVector::zero(64);
        for i in 59..64 {
            v.set(i, true);
        }
        assert!(decode(64, 5, &v).is_err());
    }
}
