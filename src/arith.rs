//! Multi-word unsigned arithmetic over little-endian word slices.
//!
//! This is the integer ALU underneath [`Valuation`](crate::Valuation): word 0
//! is least significant, all operands of one call have the same length, and
//! results wrap modulo `2^(32 * len)` with the carry/borrow reported
//! separately. Nothing here knows about bit-widths; masking to `bw` bits is
//! the caller's job.

use crate::bitvect::{Word, BITS_PER_WORD};
use std::cmp::Ordering;

/// Compare two equal-length word sequences as unsigned integers.
///
/// Scans from the most significant word down.
#[inline]
pub fn compare(a: &[Word], b: &[Word]) -> Ordering {
    debug_assert_eq!(a.len(), b.len(), "operands must have the same word count");
    for (x, y) in a.iter().rev().zip(b.iter().rev()) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    Ordering::Equal
}

/// `out[..n] = a + b`, returning the carry out of the top word.
///
/// `out` must hold at least `n = a.len()` words; only the first `n` are
/// written.
pub fn add(a: &[Word], b: &[Word], out: &mut [Word]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    debug_assert!(out.len() >= a.len());
    let mut carry: u64 = 0;
    for i in 0..a.len() {
        let t = a[i] as u64 + b[i] as u64 + carry;
        out[i] = t as Word;
        carry = t >> BITS_PER_WORD;
    }
    carry != 0
}

/// `out[..n] = a - b`, returning the borrow out of the top word.
pub fn sub(a: &[Word], b: &[Word], out: &mut [Word]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    debug_assert!(out.len() >= a.len());
    let mut borrow = false;
    for i in 0..a.len() {
        let (d, b1) = a[i].overflowing_sub(b[i]);
        let (d, b2) = d.overflowing_sub(borrow as Word);
        out[i] = d;
        borrow = b1 || b2;
    }
    borrow
}

/// `out[..2n] = a * b` (schoolbook, full double-width product).
pub fn mul(a: &[Word], b: &[Word], out: &mut [Word]) {
    let n = a.len();
    debug_assert_eq!(n, b.len());
    debug_assert!(out.len() >= 2 * n, "product needs {} words", 2 * n);
    out[..2 * n].fill(0);
    for i in 0..n {
        let mut carry: u64 = 0;
        for j in 0..n {
            let t = a[i] as u64 * b[j] as u64 + out[i + j] as u64 + carry;
            out[i + j] = t as Word;
            carry = t >> BITS_PER_WORD;
        }
        out[i + n] = carry as Word;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare() {
        assert_eq!(compare(&[1, 0], &[0, 1]), Ordering::Less);
        assert_eq!(compare(&[0, 2], &[5, 1]), Ordering::Greater);
        assert_eq!(compare(&[7, 7], &[7, 7]), Ordering::Equal);
    }

    #[test]
    fn test_add_carry_chain() {
        let mut out = [0; 2];
        let carry = add(&[Word::MAX, Word::MAX], &[1, 0], &mut out);
        assert!(carry);
        assert_eq!(out, [0, 0]);

        let carry = add(&[Word::MAX, 0], &[1, 0], &mut out);
        assert!(!carry);
        assert_eq!(out, [0, 1]);
    }

    #[test]
    fn test_sub_borrow_chain() {
        let mut out = [0; 2];
        let borrow = sub(&[0, 1], &[1, 0], &mut out);
        assert!(!borrow);
        assert_eq!(out, [Word::MAX, 0]);

        let borrow = sub(&[0, 0], &[1, 0], &mut out);
        assert!(borrow);
        assert_eq!(out, [Word::MAX, Word::MAX]);
    }

    #[test]
    fn test_mul_double_width() {
        let mut out = [0; 4];
        mul(&[Word::MAX, 0], &[Word::MAX, 0], &mut out);
        // (2^32 - 1)^2 = 2^64 - 2^33 + 1
        assert_eq!(out, [1, Word::MAX - 1, 0, 0]);

        mul(&[0, 1], &[0, 1], &mut out);
        assert_eq!(out, [0, 0, 1, 0]);
    }
}
