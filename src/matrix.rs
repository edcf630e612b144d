//! Dense GF(2) matrices and vectors, bit-packed into u64 words.
//!
//! Rows are word-aligned and little-endian: bit i of a row or vector lives in
//! word i/64 at position i%64, which makes the byte serialization (LSB-first
//! within each byte) a plain truncation of the words' little-endian bytes.
//! Bits past the logical width are kept at zero.

use crate::helpers::{ensure, read_bytes, read_u32_le};
use crate::perm::Permutation;
use crate::Error;
use rand_core::CryptoRngCore;
use zeroize::Zeroize;


const WORD_BITS: usize = 64;


fn words_for(bits: usize) -> usize {
    (bits + WORD_BITS - 1) / WORD_BITS
}


fn tail_mask(bits: usize) -> u64 {
    let rem = bits % WORD_BITS;
    if rem == 0 {
        u64::MAX
    } else {
        (1u64 << rem) - 1
    }
}


#[derive(Clone, Debug, PartialEq, Eq, Zeroize)]
pub(crate) struct GfVector {
    len: usize,
    words: Vec<u64>,
}


impl GfVector {
    pub(crate) fn zero(len: usize) -> Self {
        Self { len, words: vec![0; words_for(len)] }
    }

    /// Uniformly random vector of the given bit length.
    pub(crate) fn random(len: usize, rng: &mut impl CryptoRngCore) -> Self {
        let mut v = Self::zero(len);
        for w in &mut v.words {
            *w = rng.next_u64();
        }
        if let Some(last) = v.words.last_mut() {
            *last &= tail_mask(len);
        }
        v
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn get(&self, i: usize) -> bool {
        debug_assert!(i < self.len);
        (self.words[i / WORD_BITS] >> (i % WORD_BITS)) & 1 == 1
    }

    pub(crate) fn set(&mut self, i: usize, bit: bool) {
        debug_assert!(i < self.len);
        let mask = 1u64 << (i % WORD_BITS);
        if bit {
            self.words[i / WORD_BITS] |= mask;
        } else {
            self.words[i / WORD_BITS] &= !mask;
        }
    }

    pub(crate) fn xor_assign(&mut self, rhs: &Self) {
        debug_assert_eq!(self.len, rhs.len, "vector length mismatch");
        for (a, b) in self.words.iter_mut().zip(rhs.words.iter()) {
            *a ^= b;
        }
    }

    pub(crate) fn weight(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Indices of set bits, ascending.
    pub(crate) fn ones(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.weight());
        for (wi, &w) in self.words.iter().enumerate() {
            let mut w = w;
            while w != 0 {
                out.push(wi * WORD_BITS + w.trailing_zeros() as usize);
                w &= w - 1;
            }
        }
        out
    }

    /// ceil(len/8) bytes, LSB-first within each byte.
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let n8 = (self.len + 7) / 8;
        let mut out = Vec::with_capacity(n8);
        for w in &self.words {
            out.extend_from_slice(&w.to_le_bytes());
        }
        out.truncate(n8);
        out
    }

    /// Parse exactly ceil(len/8) bytes; bits past `len` are discarded.
    pub(crate) fn from_bytes(bytes: &[u8], len: usize) -> Result<Self, Error> {
        ensure!(bytes.len() == (len + 7) / 8, Error::Io("vector length mismatch"));
        let mut v = Self::zero(len);
        for (i, &b) in bytes.iter().enumerate() {
            v.words[i / 8] |= u64::from(b) << (8 * (i % 8));
        }
        if let Some(last) = v.words.last_mut() {
            *last &= tail_mask(len);
        }
        Ok(v)
    }

    /// Concatenation: `a`'s bits followed by `b`'s.
    pub(crate) fn concat(a: &Self, b: &Self) -> Self {
        let mut out = Self::zero(a.len + b.len);
        for i in 0..a.len {
            if a.get(i) {
                out.set(i, true);
            }
        }
        for i in 0..b.len {
            if b.get(i) {
                out.set(a.len + i, true);
            }
        }
        out
    }

    /// Bits [from, self.len) as a fresh vector.
    pub(crate) fn tail(&self, from: usize) -> Self {
        debug_assert!(from <= self.len);
        let mut out = Self::zero(self.len - from);
        for i in from..self.len {
            if self.get(i) {
                out.set(i - from, true);
            }
        }
        out
    }
}


#[derive(Clone, Debug, PartialEq, Eq, Zeroize)]
pub(crate) struct GfMatrix {
    rows: usize,
    cols: usize,
    row_words: usize,
    words: Vec<u64>,
}


impl GfMatrix {
    pub(crate) fn zero(rows: usize, cols: usize) -> Self {
        let row_words = words_for(cols);
        Self { rows, cols, row_words, words: vec![0; rows * row_words] }
    }

    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    pub(crate) fn cols(&self) -> usize {
        self.cols
    }

    fn row(&self, r: usize) -> &[u64] {
        &self.words[r * self.row_words..(r + 1) * self.row_words]
    }

    pub(crate) fn get(&self, r: usize, c: usize) -> bool {
        debug_assert!(r < self.rows && c < self.cols);
        (self.words[r * self.row_words + c / WORD_BITS] >> (c % WORD_BITS)) & 1 == 1
    }

    pub(crate) fn set(&mut self, r: usize, c: usize, bit: bool) {
        debug_assert!(r < self.rows && c < self.cols);
        let idx = r * self.row_words + c / WORD_BITS;
        let mask = 1u64 << (c % WORD_BITS);
        if bit {
            self.words[idx] |= mask;
        } else {
            self.words[idx] &= !mask;
        }
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for i in 0..self.row_words {
            self.words.swap(a * self.row_words + i, b * self.row_words + i);
        }
    }

    fn swap_cols(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for r in 0..self.rows {
            let x = self.get(r, a);
            let y = self.get(r, b);
            self.set(r, a, y);
            self.set(r, b, x);
        }
    }

    fn xor_row_from(&mut self, target: usize, src: &[u64]) {
        let base = target * self.row_words;
        for (i, s) in src.iter().enumerate() {
            self.words[base + i] ^= s;
        }
    }

    pub(crate) fn transpose(&self) -> Self {
        let mut out = Self::zero(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                if self.get(r, c) {
                    out.set(c, r, true);
                }
            }
        }
        out
    }

    /// Row vector times matrix: v * M, with v of length rows(M).
    pub(crate) fn mul_vec_left(&self, v: &GfVector) -> GfVector {
        debug_assert_eq!(v.len(), self.rows, "left multiply dimension mismatch");
        let mut acc = GfVector::zero(self.cols);
        for r in v.ones() {
            let row = self.row(r);
            for (a, b) in acc.words.iter_mut().zip(row.iter()) {
                *a ^= b;
            }
        }
        acc
    }

    /// Matrix times column vector: M * v, with v of length cols(M).
    pub(crate) fn mul_vec_right(&self, v: &GfVector) -> GfVector {
        debug_assert_eq!(v.len(), self.cols, "right multiply dimension mismatch");
        let mut acc = GfVector::zero(self.rows);
        for r in 0..self.rows {
            let parity: u32 = self
                .row(r)
                .iter()
                .zip(v.words.iter())
                .map(|(a, b)| (a & b).count_ones())
                .sum();
            if parity & 1 == 1 {
                acc.set(r, true);
            }
        }
        acc
    }

    /// Column gather: result column i is self's column perm[i].
    pub(crate) fn permute_cols(&self, perm: &Permutation) -> Self {
        debug_assert_eq!(perm.len(), self.cols, "permutation size mismatch");
        let mut out = Self::zero(self.rows, self.cols);
        for r in 0..self.rows {
            for c in 0..self.cols {
                if self.get(r, perm.index(c)) {
                    out.set(r, c, true);
                }
            }
        }
        out
    }

    /// Columns [from, cols) as a fresh matrix.
    fn submatrix_cols(&self, from: usize) -> Self {
        let mut out = Self::zero(self.rows, self.cols - from);
        for r in 0..self.rows {
            for c in from..self.cols {
                if self.get(r, c) {
                    out.set(r, c - from, true);
                }
            }
        }
        out
    }

    /// Gaussian elimination to systematic form [I | M'] with column swaps.
    /// Returns the right block and the column permutation applied, or None
    /// when the matrix has rank below its row count.
    pub(crate) fn systematic_reduce(&self) -> Option<(Self, Permutation)> {
        if self.rows > self.cols {
            return None;
        }
        let mut w = self.clone();
        let mut perm: Vec<u32> = (0..self.cols)
            .map(|c| u32::try_from(c).expect("column count fits u32"))
            .collect();

        for i in 0..w.rows {
            let mut pivot = None;
            'search: for c in i..w.cols {
                for r in i..w.rows {
                    if w.get(r, c) {
                        pivot = Some((r, c));
                        break 'search;
                    }
                }
            }
            let (r, c) = pivot?;
            w.swap_rows(i, r);
            if c != i {
                w.swap_cols(i, c);
                perm.swap(i, c);
            }
            let src = w.row(i).to_vec();
            for r in 0..w.rows {
                if r != i && w.get(r, i) {
                    w.xor_row_from(r, &src);
                }
            }
        }

        Some((w.submatrix_cols(w.rows), Permutation::from_indices(perm)))
    }

    /// rows(i32 LE) || cols(i32 LE) || row bytes, each row ceil(cols/8) bytes.
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let c8 = (self.cols + 7) / 8;
        let mut out = Vec::with_capacity(8 + self.rows * c8);
        out.extend_from_slice(&i32::try_from(self.rows).expect("row count fits i32").to_le_bytes());
        out.extend_from_slice(&i32::try_from(self.cols).expect("col count fits i32").to_le_bytes());
        for r in 0..self.rows {
            let mut row_bytes = Vec::with_capacity(self.row_words * 8);
            for w in self.row(r) {
                row_bytes.extend_from_slice(&w.to_le_bytes());
            }
            out.extend_from_slice(&row_bytes[..c8]);
        }
        out
    }

    pub(crate) fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut off = 0;
        let rows = read_u32_le(bytes, &mut off)? as usize;
        let cols = read_u32_le(bytes, &mut off)? as usize;
        ensure!(rows <= 1 << 20 && cols <= 1 << 20, Error::Io("implausible matrix dimensions"));
        ensure!(cols >= 1, Error::Io("empty matrix width"));
        let c8 = (cols + 7) / 8;
        // Size check precedes allocation so garbage headers cannot balloon it.
        ensure!(bytes.len() - off == rows * c8, Error::Io("matrix length mismatch"));
        let mut m = Self::zero(rows, cols);
        for r in 0..rows {
            let row_bytes = read_bytes(bytes, &mut off, c8)?;
            let base = r * m.row_words;
            for (i, &b) in row_bytes.iter().enumerate() {
                m.words[base + i / 8] |= u64::from(b) << (8 * (i % 8));
            }
            m.words[base + m.row_words - 1] &= tail_mask(cols);
        }
        ensure!(off == bytes.len(), Error::Io("trailing bytes after matrix"));
        Ok(m)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::SeedableRng;

    fn random_matrix(rows: usize, cols: usize, rng: &mut impl CryptoRngCore) -> GfMatrix {
        let mut m = GfMatrix::zero(rows, cols);
        for r in 0..rows {
            for c in 0..cols {
                m.set(r, c, rng.next_u32() & 1 == 1);
            }
        }
        m
    }

    #[test]
    fn vector_bytes_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
        for len in [1usize, 7, 8, 63, 64, 65, 200] {
            let v = GfVector::random(len, &mut rng);
            let b = v.to_bytes();
            assert_eq!(b.len(), (len + 7) / 8);
            assert_eq!(GfVector::from_bytes(&b, len).unwrap(), v);
        }
    }

    #[test]
    fn ones_and_weight_agree() {
        let mut v = GfVector::zero(130);
        for i in [0, 5, 63, 64, 127, 129] {
            v.set(i, true);
        }
        assert_eq!(v.weight(), 6);
        assert_eq!(v.ones(), vec![0, 5, 63, 64, 127, 129]);
    }

    #[test]
    fn transpose_involution() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(2);
        let m = random_matrix(13, 70, &mut rng);
        assert_eq!(m.transpose().transpose(), m);
    }

    #[test]
    fn left_multiply_matches_naive() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(3);
        let m = random_matrix(20, 33, &mut rng);
        let v = GfVector::random(20, &mut rng);
        let fast = m.mul_vec_left(&v);
        for c in 0..33 {
            let mut bit = false;
            for r in 0..20 {
                bit ^= v.get(r) && m.get(r, c);
            }
            assert_eq!(fast.get(c), bit);
        }
    }

    #[test]
    fn right_multiply_matches_naive() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(4);
        let m = random_matrix(20, 33, &mut rng);
        let v = GfVector::random(33, &mut rng);
        let fast = m.mul_vec_right(&v);
        for r in 0..20 {
            let mut bit = false;
            for c in 0..33 {
                bit ^= v.get(c) && m.get(r, c);
            }
            assert_eq!(fast.get(r), bit);
        }
    }

    #[test]
    fn systematic_form_has_identity() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(5);
        let m = random_matrix(24, 60, &mut rng);
        let (short, perm) = m.systematic_reduce().expect("random matrix is full rank");
        assert_eq!(short.rows(), 24);
        assert_eq!(short.cols(), 36);
        // Reducing the permuted original again must reproduce the identity:
        // check it directly by re-running elimination bookkeeping.
        let permuted = m.permute_cols(&perm);
        let (short2, perm2) = permuted.systematic_reduce().unwrap();
        assert_eq!(short2, short);
        assert!(perm2.is_identity());
    }

    #[test]
    fn matrix_bytes_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(6);
        let m = random_matrix(9, 37, &mut rng);
        let b = m.to_bytes();
        assert_eq!(b.len(), 8 + 9 * 5);
        assert_eq!(GfMatrix::from_bytes(&b).unwrap(), m);
        assert!(GfMatrix::from_bytes(&b[..b.len() - 1]).is_err());
    }
}
