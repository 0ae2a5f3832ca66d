//! BitWordArray - fixed-width bit-vector values packed into 32-bit words.
//!
//! A `BitWordArray` holds the bits of one bit-vector value of width `bw`.
//! Storage is a `BitVec<u32, Lsb0>` so that bit access goes through `bitvec`
//! while the word-level arithmetic in [`crate::arith`] works on the raw words.
//!
//! # Design
//!
//! - Word 0 is the least significant word
//! - `nw = ceil(bw / 32)` words carry the value; storage holds `2 * nw` words,
//!   the upper half being scratch headroom for carries and double-width products
//! - `mask` selects the valid bits of word `nw - 1`; bits above `bw` are zero
//!   outside of an in-flight computation
//! - Ordering is unsigned big-integer ordering over the first `nw` words and
//!   requires both sides to have the same word count
//!
//! # Examples
//!
//! ```
//! use bvsls::BitWordArray;
//!
//! let mut a = BitWordArray::new(40);
//! a.set(3, true);
//! a.set(35, true);
//! assert_eq!(a.nw(), 2);
//! assert_eq!(a.parity(), 3);
//! assert_eq!(a.to_string(), "800000008");
//! ```

use crate::arith;
use bitvec::prelude::*;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Word type for bit storage (32-bit unsigned integer)
pub type Word = u32;

/// Number of bits per word
pub const BITS_PER_WORD: usize = 32;

/// Maximum word value
pub const WORD_MAX: Word = Word::MAX;

/// Get word index from bit position
#[inline(always)]
const fn get_word_idx(bit_pos: usize) -> usize {
    bit_pos >> 5 // bit_pos / 32
}

/// Get bit index within word from bit position
#[inline(always)]
const fn get_bit_idx(bit_pos: usize) -> usize {
    bit_pos & 31 // bit_pos % 32
}

/// Number of words needed to hold `bw` bits.
#[inline(always)]
pub(crate) const fn words_for(bw: usize) -> usize {
    (bw + BITS_PER_WORD - 1) / BITS_PER_WORD
}

/// Mask of the valid bits in the most significant word of a `bw`-bit value.
#[inline(always)]
pub(crate) const fn top_word_mask(bw: usize) -> Word {
    let rem = bw % BITS_PER_WORD;
    if rem == 0 {
        WORD_MAX
    } else {
        WORD_MAX >> (BITS_PER_WORD - rem)
    }
}

/// A bit-vector value stored as little-endian 32-bit words.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BitWordArray {
    /// Word storage, LSB0 ordering, `2 * nw` words
    bv: BitVec<Word, Lsb0>,
    bw: usize,
    nw: usize,
    mask: Word,
}

impl BitWordArray {
    /// Create a zeroed array for a `bw`-bit value.
    pub fn new(bw: usize) -> Self {
        let mut a = Self {
            bv: BitVec::new(),
            bw: 0,
            nw: 0,
            mask: WORD_MAX,
        };
        a.set_bw(bw);
        a
    }

    /// Create an array holding the low `bw` bits of `value`.
    pub fn from_u64(bw: usize, value: u64) -> Self {
        let mut a = Self::new(bw);
        for i in 0..bw.min(64) {
            a.set(i, (value >> i) & 1 == 1);
        }
        a
    }

    /// Recompute `nw` and `mask` for width `bw` and grow storage if needed.
    ///
    /// Existing bits are kept.
    pub fn set_bw(&mut self, bw: usize) {
        self.bw = bw;
        self.nw = words_for(bw);
        self.mask = top_word_mask(bw);
        let needed = 2 * self.nw.max(1) * BITS_PER_WORD;
        if self.bv.len() < needed {
            self.bv.resize(needed, false);
        }
    }

    /// Bit-width.
    #[inline(always)]
    pub fn bw(&self) -> usize {
        self.bw
    }

    /// Number of words carrying the value.
    #[inline(always)]
    pub fn nw(&self) -> usize {
        self.nw
    }

    /// Valid-bit mask of the most significant word.
    #[inline(always)]
    pub fn mask(&self) -> Word {
        self.mask
    }

    /// Total number of storage words, headroom included.
    #[inline]
    pub fn num_words(&self) -> usize {
        self.bv.as_raw_slice().len()
    }

    // =========================================================================
    // Single Bit Operations
    // =========================================================================

    /// Get bit at absolute position `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is beyond the storage.
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        self.bv[i]
    }

    /// Assign bit `i` without branching on `val`.
    #[inline]
    pub fn set(&mut self, i: usize, val: bool) {
        let target = (0 as Word).wrapping_sub(val as Word);
        let w = &mut self.bv.as_raw_mut_slice()[get_word_idx(i)];
        *w ^= (target ^ *w) & (1 << get_bit_idx(i));
    }

    /// Index of the least significant set bit, or `bw` for zero.
    #[inline]
    pub fn parity(&self) -> usize {
        self.bv[..self.bw].first_one().unwrap_or(self.bw)
    }

    /// Index of the most significant set bit, or `bw` for zero.
    #[inline]
    pub fn msb(&self) -> usize {
        self.bv[..self.bw].last_one().unwrap_or(self.bw)
    }

    /// Population count over the value words.
    #[inline]
    pub fn count_ones(&self) -> usize {
        self.bv[..self.nw * BITS_PER_WORD].count_ones()
    }

    // =========================================================================
    // Word Access
    // =========================================================================

    /// Read-only access to all storage words.
    #[inline]
    pub fn words(&self) -> &[Word] {
        self.bv.as_raw_slice()
    }

    /// Mutable access to all storage words.
    #[inline]
    pub fn words_mut(&mut self) -> &mut [Word] {
        self.bv.as_raw_mut_slice()
    }

    /// Copy the first `nw` words into `dst`.
    #[inline]
    pub fn copy_to(&self, nw: usize, dst: &mut BitWordArray) {
        debug_assert!(nw <= self.num_words() && nw <= dst.num_words());
        dst.words_mut()[..nw].copy_from_slice(&self.words()[..nw]);
    }

    /// Widen the first `n` words to an arbitrary-precision integer.
    pub fn get_value(&self, n: usize) -> BigUint {
        BigUint::from_slice(&self.words()[..n])
    }
}

impl Index<usize> for BitWordArray {
    type Output = Word;

    #[inline]
    fn index(&self, i: usize) -> &Word {
        &self.words()[i]
    }
}

impl IndexMut<usize> for BitWordArray {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut Word {
        &mut self.words_mut()[i]
    }
}

// =============================================================================
// Comparison Operators
// =============================================================================

impl Ord for BitWordArray {
    /// Unsigned comparison over the value words.
    ///
    /// # Panics
    ///
    /// Panics if the two arrays have different word counts.
    fn cmp(&self, other: &Self) -> Ordering {
        assert_eq!(
            self.nw, other.nw,
            "BitWordArrays must have same word count"
        );
        arith::compare(&self.words()[..self.nw], &other.words()[..other.nw])
    }
}

impl PartialOrd for BitWordArray {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for BitWordArray {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BitWordArray {}

impl fmt::Display for BitWordArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut nz = false;
        for i in (0..self.nw).rev() {
            let mut w = self[i];
            if i + 1 == self.nw {
                w &= self.mask;
            }
            if nz {
                write!(f, "{:08x}", w)?;
            } else if w != 0 {
                write!(f, "{:x}", w)?;
                nz = true;
            }
        }
        if !nz {
            write!(f, "0")?;
        }
        Ok(())
    }
}
