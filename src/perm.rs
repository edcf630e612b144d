//! Permutations of {0, ..., n-1}.

use crate::helpers::ensure;
use crate::matrix::GfVector;
use crate::Error;
use rand_core::CryptoRngCore;
use zeroize::Zeroize;


/// A bijection on n points, stored as the image array: `index(i)` is pi(i).
#[derive(Clone, Debug, PartialEq, Eq, Zeroize)]
pub(crate) struct Permutation {
    indices: Vec<u32>,
}


impl Permutation {
    pub(crate) fn identity(n: usize) -> Self {
        Self {
            indices: (0..n).map(|i| u32::try_from(i).expect("size fits u32")).collect(),
        }
    }

    /// Uniformly random permutation by Fisher-Yates; the swap partner is drawn
    /// with rejection sampling so every permutation is equally likely.
    pub(crate) fn random(n: usize, rng: &mut impl CryptoRngCore) -> Self {
        let mut p = Self::identity(n);
        for i in (1..n).rev() {
            let j = crate::prng::rand_range(rng, (i + 1) as u64) as usize;
            p.indices.swap(i, j);
        }
        p
    }

    /// Wrap an index array, validating bijectivity.
    pub(crate) fn try_from_indices(indices: Vec<u32>) -> Result<Self, Error> {
        let n = indices.len();
        let mut seen = vec![false; n];
        for &i in &indices {
            let i = i as usize;
            ensure!(i < n && !seen[i], Error::InvalidKey("not a permutation"));
            seen[i] = true;
        }
        Ok(Self { indices })
    }

    /// Wrap an index array known to be a permutation (internal construction).
    pub(crate) fn from_indices(indices: Vec<u32>) -> Self {
        debug_assert!(Self::try_from_indices(indices.clone()).is_ok());
        Self { indices }
    }

    pub(crate) fn len(&self) -> usize {
        self.indices.len()
    }

    pub(crate) fn index(&self, i: usize) -> usize {
        self.indices[i] as usize
    }

    pub(crate) fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub(crate) fn is_identity(&self) -> bool {
        self.indices.iter().enumerate().all(|(i, &v)| i == v as usize)
    }

    pub(crate) fn inverse(&self) -> Self {
        let mut inv = vec![0u32; self.indices.len()];
        for (i, &v) in self.indices.iter().enumerate() {
            inv[v as usize] = u32::try_from(i).expect("size fits u32");
        }
        Self { indices: inv }
    }

    /// Composition: (self . other)(i) = self(other(i)).
    pub(crate) fn compose(&self, other: &Self) -> Self {
        debug_assert_eq!(self.len(), other.len(), "permutation size mismatch");
        Self {
            indices: other.indices.iter().map(|&i| self.indices[i as usize]).collect(),
        }
    }

    /// Gather: result bit i is v's bit self(i).
    pub(crate) fn apply_vec(&self, v: &GfVector) -> GfVector {
        debug_assert_eq!(self.len(), v.len(), "permutation size mismatch");
        let mut out = GfVector::zero(v.len());
        for i in 0..v.len() {
            if v.get(self.index(i)) {
                out.set(i, true);
            }
        }
        out
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::SeedableRng;

    #[test]
    fn inverse_composes_to_identity() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(9);
        let p = Permutation::random(100, &mut rng);
        assert!(p.compose(&p.inverse()).is_identity());
        assert!(p.inverse().compose(&p).is_identity());
    }

    #[test]
    fn apply_then_unapply() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(10);
        let p = Permutation::random(77, &mut rng);
        let v = GfVector::random(77, &mut rng);
        let w = p.apply_vec(&v);
        assert_eq!(p.inverse().apply_vec(&w), v);
        assert_eq!(w.weight(), v.weight());
    }

    #[test]
    fn rejects_non_bijections() {
        assert!(Permutation::try_from_indices(vec![0, 0, 1]).is_err());
        assert!(Permutation::try_from_indices(vec![0, 3]).is_err());
        assert!(Permutation::try_from_indices(vec![2, 0, 1]).is_ok());
    }

    #[test]
    fn random_permutations_differ() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(11);
        let a = Permutation::random(50, &mut rng);
        let b = Permutation::random(50, &mut rng);
        assert_ne!(a, b);
    }
}
