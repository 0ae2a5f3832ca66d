//! Tests for BitWordArray storage and the word-level arithmetic.
//!
//! These tests validate:
//! - Bit access across word boundaries
//! - Unsigned ordering against a native integer oracle
//! - Big-integer widening and hex display
//! - Multi-word add/sub/mul against u128

use bvsls::{arith, BitWordArray, Word, BITS_PER_WORD};
use num_bigint::BigUint;
use proptest::prelude::*;
use std::cmp::Ordering;

fn from_u128(bw: usize, v: u128) -> BitWordArray {
    let mut a = BitWordArray::new(bw);
    for i in 0..bw.min(128) {
        a.set(i, (v >> i) & 1 == 1);
    }
    a
}

fn to_u128(a: &BitWordArray) -> u128 {
    let mut v = 0u128;
    for i in (0..a.nw().min(4)).rev() {
        v = (v << BITS_PER_WORD) | a[i] as u128;
    }
    v
}

// =============================================================================
// Basic Operations
// =============================================================================

#[test]
fn test_storage_headroom() {
    for (bw, nw) in [(1, 1), (32, 1), (33, 2), (64, 2), (65, 3), (128, 4)] {
        let a = BitWordArray::new(bw);
        assert_eq!(a.nw(), nw, "bw {}", bw);
        assert_eq!(a.num_words(), 2 * nw, "bw {}", bw);
    }
}

#[test]
fn test_set_get_across_words() {
    let mut a = BitWordArray::new(100);
    for i in [0, 31, 32, 63, 64, 99] {
        a.set(i, true);
    }
    for i in 0..100 {
        assert_eq!(a.get(i), [0, 31, 32, 63, 64, 99].contains(&i));
    }
    assert_eq!(a[0], 0x8000_0001);
    assert_eq!(a[1], 0x8000_0001);
    assert_eq!(a[3], 1 << 3);
    assert_eq!(a.count_ones(), 6);
}

#[test]
fn test_words_mut_and_index() {
    let mut a = BitWordArray::new(64);
    a.words_mut()[1] = 0xdead_beef;
    a[0] = 7;
    assert_eq!(a.words()[..2], [7, 0xdead_beef]);
    assert!(a.get(0) && a.get(1) && a.get(2));
}

#[test]
fn test_copy_to() {
    let src = BitWordArray::from_u64(64, 0x0123_4567_89ab_cdef);
    let mut dst = BitWordArray::new(64);
    src.copy_to(1, &mut dst);
    assert_eq!(dst[0], 0x89ab_cdef);
    assert_eq!(dst[1], 0);
    src.copy_to(2, &mut dst);
    assert_eq!(dst, src);
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn test_display() {
    assert_eq!(BitWordArray::new(8).to_string(), "0");
    assert_eq!(BitWordArray::from_u64(16, 0xbeef).to_string(), "beef");
    assert_eq!(
        BitWordArray::from_u64(64, 0x0000_0001_0000_0000).to_string(),
        "100000000"
    );
}

#[test]
fn test_display_masks_top_word() {
    let mut a = BitWordArray::new(4);
    a[0] = 0xf5;
    assert_eq!(a.to_string(), "5");
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn test_ordering_ignores_headroom() {
    let mut a = BitWordArray::from_u64(32, 5);
    let b = BitWordArray::from_u64(32, 5);
    a[1] = 0xffff_ffff;
    assert_eq!(a.cmp(&b), Ordering::Equal);
}

#[test]
#[should_panic(expected = "same word count")]
fn test_ordering_mismatch_panics() {
    let a = BitWordArray::new(32);
    let b = BitWordArray::new(33);
    let _ = a.cmp(&b);
}

// =============================================================================
// Arithmetic
// =============================================================================

#[test]
fn test_arith_add_wraps_full_words() {
    let a: [Word; 3] = [Word::MAX; 3];
    let b: [Word; 3] = [1, 0, 0];
    let mut out = [0; 3];
    assert!(arith::add(&a, &b, &mut out));
    assert_eq!(out, [0, 0, 0]);
}

// =============================================================================
// Property-Based Tests
// =============================================================================

proptest! {
    #[test]
    fn prop_ordering_matches_u128(bw in 1..=128usize, x in any::<u128>(), y in any::<u128>()) {
        let m = if bw == 128 { u128::MAX } else { (1u128 << bw) - 1 };
        let (x, y) = (x & m, y & m);
        let a = from_u128(bw, x);
        let b = from_u128(bw, y);
        prop_assert_eq!(a.cmp(&b), x.cmp(&y));
        prop_assert_eq!(a == b, x == y);
    }

    #[test]
    fn prop_get_value_matches_bits(bits in prop::collection::vec(any::<bool>(), 1..200)) {
        let mut a = BitWordArray::new(bits.len());
        let mut expected = BigUint::default();
        for (i, &b) in bits.iter().enumerate() {
            a.set(i, b);
            expected.set_bit(i as u64, b);
        }
        prop_assert_eq!(a.get_value(a.nw()), expected);
    }

    #[test]
    fn prop_parity_msb(bw in 1..200usize, i in 0..200usize, j in 0..200usize) {
        let (i, j) = (i % bw, j % bw);
        let mut a = BitWordArray::new(bw);
        a.set(i, true);
        a.set(j, true);
        prop_assert_eq!(a.parity(), i.min(j));
        prop_assert_eq!(a.msb(), i.max(j));
    }

    #[test]
    fn prop_arith_matches_u128(x in any::<u64>(), y in any::<u64>()) {
        let a = from_u128(64, x as u128);
        let b = from_u128(64, y as u128);
        let mut out = BitWordArray::new(64);

        let carry = arith::add(&a.words()[..2], &b.words()[..2], &mut out.words_mut()[..2]);
        let sum = x as u128 + y as u128;
        prop_assert_eq!(to_u128(&out) & u64::MAX as u128, sum & u64::MAX as u128);
        prop_assert_eq!(carry, sum > u64::MAX as u128);

        let borrow = arith::sub(&a.words()[..2], &b.words()[..2], &mut out.words_mut()[..2]);
        prop_assert_eq!(to_u128(&out) & u64::MAX as u128, x.wrapping_sub(y) as u128);
        prop_assert_eq!(borrow, x < y);

        arith::mul(&a.words()[..2], &b.words()[..2], &mut out.words_mut()[..4]);
        let mut product = 0u128;
        for k in (0..4).rev() {
            product = (product << BITS_PER_WORD) | out.words()[k] as u128;
        }
        prop_assert_eq!(product, x as u128 * y as u128);
    }
}
