//! Valuation - candidate value and feasibility envelope of one bit-vector variable.
//!
//! A `Valuation` owns five `BitWordArray`s of the same width:
//!
//! - **bits** - the last committed value
//! - **eval** - the speculative value the search loop is building
//! - **fixed** - pinned bit positions (the pinned value is the one in `bits`)
//! - **lo**, **hi** - a half-open interval over `[0, 2^bw)`
//!
//! The interval is read three ways:
//!
//! - `lo == hi` - unconstrained, every value is in range
//! - `lo < hi` - `lo <= v < hi`
//! - `lo > hi` - wrap-around, `v < hi || v >= lo`
//!
//! Together `fixed` and `[lo, hi)` form the envelope. `eval` only becomes
//! durable through [`Valuation::commit_eval`], which checks it against the
//! envelope. Every mutator either succeeds completely or leaves `bits`, `eval`,
//! `lo` and `hi` untouched.
//!
//! # Examples
//!
//! ```
//! use bvsls::Valuation;
//! use num_bigint::{BigInt, BigUint};
//!
//! let mut v = Valuation::new(8);
//! v.fix_bit(0, true).unwrap();
//! v.add_range(&BigInt::from(10), &BigInt::from(5)).unwrap();
//!
//! let src = v.value_of(7u32);
//! let mut dst = v.scratch();
//! assert!(v.get_at_least(&src, &mut dst));
//! assert_eq!(dst.get_value(1), BigUint::from(11u32));
//! ```

use crate::arith;
use crate::bitvect::{top_word_mask, words_for, BitWordArray, Word, BITS_PER_WORD, WORD_MAX};
use crate::error::{Result, SlsError};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::One;
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, trace};

/// Mask of the bits strictly below position `b` within a word.
#[inline(always)]
const fn below(b: usize) -> Word {
    ((1 as Word) << b).wrapping_sub(1)
}

/// Candidate value plus feasibility envelope for one bit-vector variable.
#[derive(Clone, Debug)]
pub struct Valuation {
    bits: BitWordArray,
    eval: BitWordArray,
    // overflow positions above bw are always marked fixed
    fixed: BitWordArray,
    lo: BitWordArray,
    hi: BitWordArray,
    signed_prefix: usize,
    bw: usize,
    nw: usize,
    mask: Word,
}

impl Valuation {
    /// Create an unconstrained valuation of width `bw`, all values zero.
    ///
    /// # Panics
    ///
    /// Panics if `bw == 0`.
    pub fn new(bw: usize) -> Self {
        assert!(bw > 0, "bit-width must be positive");
        let nw = words_for(bw);
        let mask = top_word_mask(bw);
        let mut fixed = BitWordArray::new(bw);
        fixed[nw - 1] = !mask;
        Self {
            bits: BitWordArray::new(bw),
            eval: BitWordArray::new(bw),
            fixed,
            lo: BitWordArray::new(bw),
            hi: BitWordArray::new(bw),
            signed_prefix: 0,
            bw,
            nw,
            mask,
        }
    }

    /// A zeroed value of this valuation's width, for use as `dst`/`tmp`.
    pub fn scratch(&self) -> BitWordArray {
        BitWordArray::new(self.bw)
    }

    /// A value of this valuation's width holding `n mod 2^bw`.
    pub fn value_of(&self, n: impl Into<BigUint>) -> BitWordArray {
        let mut v = self.scratch();
        self.set_value(&mut v, &n.into());
        v
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Bit-width.
    #[inline]
    pub fn bw(&self) -> usize {
        self.bw
    }

    /// Number of words carrying a value.
    #[inline]
    pub fn nw(&self) -> usize {
        self.nw
    }

    #[inline]
    pub fn num_bytes(&self) -> usize {
        (self.bw + 7) / 8
    }

    /// Committed value.
    #[inline]
    pub fn bits(&self) -> &BitWordArray {
        &self.bits
    }

    /// Speculative value.
    #[inline]
    pub fn eval(&self) -> &BitWordArray {
        &self.eval
    }

    /// Speculative value, for direct edits by the search loop.
    ///
    /// Overflow bits written here are rejected by [`Valuation::commit_eval`].
    #[inline]
    pub fn eval_mut(&mut self) -> &mut BitWordArray {
        &mut self.eval
    }

    /// Fixed-bit mask.
    #[inline]
    pub fn fixed(&self) -> &BitWordArray {
        &self.fixed
    }

    #[inline]
    pub fn lo_bits(&self) -> &BitWordArray {
        &self.lo
    }

    #[inline]
    pub fn hi_bits(&self) -> &BitWordArray {
        &self.hi
    }

    #[inline]
    pub fn signed_prefix(&self) -> usize {
        self.signed_prefix
    }

    /// Require the top `prefix` bits to equal the sign bit.
    pub fn set_signed(&mut self, prefix: usize) {
        self.signed_prefix = prefix.min(self.bw);
    }

    #[inline]
    pub fn get_bit(&self, i: usize) -> bool {
        self.bits.get(i)
    }

    #[inline]
    pub fn sign(&self) -> bool {
        self.bits.get(self.bw - 1)
    }

    pub fn get_value(&self) -> BigUint {
        self.bits.get_value(self.nw)
    }

    pub fn get_eval(&self) -> BigUint {
        self.eval.get_value(self.nw)
    }

    pub fn lo(&self) -> BigUint {
        self.lo.get_value(self.nw)
    }

    pub fn hi(&self) -> BigUint {
        self.hi.get_value(self.nw)
    }

    #[inline]
    pub fn has_range(&self) -> bool {
        self.lo != self.hi
    }

    pub fn well_formed(&self) -> bool {
        !self.has_overflow(&self.bits) && (!self.has_range() || self.in_range(&self.bits))
    }

    #[inline]
    pub(crate) fn is_free(&self, i: usize) -> bool {
        !self.fixed.get(i)
    }

    // =========================================================================
    // Overflow Bits
    // =========================================================================

    #[inline]
    pub fn has_overflow(&self, x: &BitWordArray) -> bool {
        0 != (x[self.nw - 1] & !self.mask)
    }

    #[inline]
    pub fn clear_overflow_bits(&self, x: &mut BitWordArray) {
        x[self.nw - 1] &= self.mask;
        debug_assert!(!self.has_overflow(x));
    }

    // =========================================================================
    // Envelope Predicates
    // =========================================================================

    /// Interval membership under the three-way reading of `[lo, hi)`.
    pub fn in_range(&self, x: &BitWordArray) -> bool {
        debug_assert!(!self.has_overflow(x));
        match self.lo.cmp(&self.hi) {
            Ordering::Equal => true,
            Ordering::Less => self.lo <= *x && *x < self.hi,
            Ordering::Greater => self.lo <= *x || *x < self.hi,
        }
    }

    /// True when `x` keeps every pinned bit and lies in range.
    pub fn can_set(&self, x: &BitWordArray) -> bool {
        debug_assert!(!self.has_overflow(x));
        self.agrees_with_fixed(x) && self.in_range(x)
    }

    #[inline]
    fn agrees_with_fixed(&self, x: &BitWordArray) -> bool {
        (0..self.nw).all(|i| 0 == (self.fixed[i] & (x[i] ^ self.bits[i])))
    }

    pub fn eq_bits(&self, other: &BitWordArray) -> bool {
        *other == self.bits
    }

    // =========================================================================
    // Committing
    // =========================================================================

    /// Promote `eval` to `bits` if it respects the envelope.
    pub fn commit_eval(&mut self) -> bool {
        // overflow positions are pinned, so this also rejects overflow bits
        if !self.agrees_with_fixed(&self.eval) || !self.in_range(&self.eval) {
            return false;
        }
        self.eval.copy_to(self.nw, &mut self.bits);
        debug_assert!(self.well_formed());
        true
    }

    /// Copy `src` into `eval` if [`Valuation::can_set`] allows it.
    pub fn try_set(&mut self, src: &BitWordArray) -> bool {
        if !self.can_set(src) {
            return false;
        }
        self.set(src);
        true
    }

    /// Copy `src` into `eval` unchecked, dropping overflow bits.
    pub fn set(&mut self, src: &BitWordArray) {
        src.copy_to(self.nw, &mut self.eval);
        self.clear_overflow_bits_eval();
    }

    #[inline]
    fn clear_overflow_bits_eval(&mut self) {
        let top = self.nw - 1;
        self.eval[top] &= self.mask;
    }

    /// Set `eval[i] = b`, keeping it only if `eval` stays in range.
    pub fn try_set_bit(&mut self, i: usize, b: bool) -> bool {
        debug_assert!(i < self.bw);
        if self.fixed.get(i) && self.get_bit(i) != b {
            return false;
        }
        let prev = self.eval.get(i);
        self.eval.set(i, b);
        if self.in_range(&self.eval) {
            return true;
        }
        self.eval.set(i, prev);
        false
    }

    /// Set bits `lo..hi` of `dst` to `b` unless a pinned bit disagrees.
    pub fn try_set_range(&self, dst: &mut BitWordArray, lo: usize, hi: usize, b: bool) -> bool {
        if (lo..hi).any(|i| self.fixed.get(i) && self.get_bit(i) != b) {
            return false;
        }
        Self::set_range(dst, lo, hi, b);
        true
    }

    pub fn set_range(dst: &mut BitWordArray, lo: usize, hi: usize, b: bool) {
        for i in lo..hi {
            dst.set(i, b);
        }
    }

    /// Pin bit `i` to `value` in `bits` and `eval`, then re-tighten the range.
    ///
    /// Fails with [`SlsError::EmptyEnvelope`] and leaves everything unchanged
    /// if the pin leaves no feasible value in range.
    pub fn fix_bit(&mut self, i: usize, value: bool) -> Result<()> {
        if i >= self.bw {
            return Err(SlsError::IndexOutOfBounds {
                index: i,
                length: self.bw,
            });
        }
        let saved = (self.fixed.get(i), self.bits.get(i), self.eval.get(i));
        self.fixed.set(i, true);
        self.bits.set(i, value);
        self.eval.set(i, value);
        if let Err(e) = self.tighten_range() {
            self.fixed.set(i, saved.0);
            self.bits.set(i, saved.1);
            self.eval.set(i, saved.2);
            return Err(e);
        }
        Ok(())
    }

    // =========================================================================
    // Fixed-Consistent Neighbours
    // =========================================================================

    /// Overwrite the pinned positions of `dst` with their pinned values.
    #[inline]
    pub(crate) fn apply_fixed(&self, dst: &mut BitWordArray) {
        for i in 0..self.nw {
            dst[i] = (dst[i] & !self.fixed[i]) | (self.bits[i] & self.fixed[i]);
        }
    }

    /// Most significant pinned position where `x` disagrees with its pin.
    fn pinned_divergence(&self, x: &BitWordArray) -> Option<usize> {
        (0..self.nw).rev().find_map(|i| {
            let d = (x[i] ^ self.bits[i]) & self.fixed[i];
            (d != 0).then(|| i * BITS_PER_WORD + (BITS_PER_WORD - 1 - d.leading_zeros() as usize))
        })
    }

    fn clear_free_below(&self, dst: &mut BitWordArray, p: usize) {
        let (w, b) = (p / BITS_PER_WORD, p % BITS_PER_WORD);
        for j in 0..w {
            dst[j] &= self.fixed[j];
        }
        dst[w] &= self.fixed[w] | !below(b);
    }

    fn set_free_below(&self, dst: &mut BitWordArray, p: usize) {
        let (w, b) = (p / BITS_PER_WORD, p % BITS_PER_WORD);
        for j in 0..w {
            dst[j] |= !self.fixed[j];
        }
        dst[w] |= !self.fixed[w] & below(b);
    }

    /// In place: smallest fixed-consistent value `>= dst`.
    ///
    /// Returns false when every fixed-consistent value is below `dst`.
    fn fix_at_least(&self, dst: &mut BitWordArray) -> bool {
        let Some(p) = self.pinned_divergence(dst) else {
            return true;
        };
        let pinned = self.bits.get(p);
        self.apply_fixed(dst);
        if pinned {
            self.clear_free_below(dst, p);
            return true;
        }
        match (p + 1..self.bw).find(|&q| self.is_free(q) && !dst.get(q)) {
            Some(q) => {
                dst.set(q, true);
                self.clear_free_below(dst, q);
                true
            }
            None => false,
        }
    }

    /// In place: largest fixed-consistent value `<= dst`.
    ///
    /// Returns false when every fixed-consistent value is above `dst`.
    fn fix_at_most(&self, dst: &mut BitWordArray) -> bool {
        let Some(p) = self.pinned_divergence(dst) else {
            return true;
        };
        let pinned = self.bits.get(p);
        self.apply_fixed(dst);
        if !pinned {
            self.set_free_below(dst, p);
            return true;
        }
        match (p + 1..self.bw).find(|&q| self.is_free(q) && dst.get(q)) {
            Some(q) => {
                dst.set(q, false);
                self.set_free_below(dst, q);
                true
            }
            None => false,
        }
    }

    /// Raise a fixed-consistent `dst` into range, never moving it down.
    fn clamp_up(&self, dst: &mut BitWordArray) -> bool {
        match self.lo.cmp(&self.hi) {
            Ordering::Equal => true,
            Ordering::Less => {
                if *dst < self.lo {
                    self.lo.copy_to(self.nw, dst);
                    if !self.fix_at_least(dst) {
                        return false;
                    }
                }
                *dst < self.hi
            }
            Ordering::Greater => {
                if self.hi <= *dst && *dst < self.lo {
                    self.lo.copy_to(self.nw, dst);
                    return self.fix_at_least(dst);
                }
                true
            }
        }
    }

    /// Lower a fixed-consistent `dst` into range, never moving it up.
    fn clamp_down(&self, dst: &mut BitWordArray) -> bool {
        match self.lo.cmp(&self.hi) {
            Ordering::Equal => true,
            Ordering::Less => {
                if self.hi <= *dst {
                    self.hi.copy_to(self.nw, dst);
                    self.sub1(dst);
                    if !self.fix_at_most(dst) {
                        return false;
                    }
                }
                self.lo <= *dst
            }
            Ordering::Greater => {
                if self.hi <= *dst && *dst < self.lo {
                    if self.is_zero(&self.hi) {
                        return false;
                    }
                    self.hi.copy_to(self.nw, dst);
                    self.sub1(dst);
                    return self.fix_at_most(dst);
                }
                true
            }
        }
    }

    // =========================================================================
    // Bounded Search
    // =========================================================================

    /// Largest feasible value `<= src`, written to `dst`.
    ///
    /// Returns false exactly when no feasible value is `<= src`; `dst` is
    /// scratch in that case.
    pub fn get_at_most(&self, src: &BitWordArray, dst: &mut BitWordArray) -> bool {
        debug_assert!(!self.has_overflow(src));
        src.copy_to(self.nw, dst);
        self.fix_at_most(dst) && self.clamp_down(dst)
    }

    /// Smallest feasible value `>= src`, written to `dst`.
    pub fn get_at_least(&self, src: &BitWordArray, dst: &mut BitWordArray) -> bool {
        debug_assert!(!self.has_overflow(src));
        src.copy_to(self.nw, dst);
        self.fix_at_least(dst) && self.clamp_up(dst)
    }

    /// Smallest feasible value of the envelope.
    pub fn min_feasible(&self, out: &mut BitWordArray) {
        self.set_zero(out);
        if !(self.fix_at_least(out) && self.clamp_up(out)) {
            if self.lo < self.hi {
                self.lo.copy_to(self.nw, out);
            } else {
                for i in 0..self.nw {
                    out[i] = self.fixed[i] & self.bits[i];
                }
            }
        }
        self.repair_sign_bits(out);
        debug_assert!(!self.has_overflow(out));
    }

    /// Largest feasible value of the envelope.
    pub fn max_feasible(&self, out: &mut BitWordArray) {
        for i in 0..self.nw {
            out[i] = WORD_MAX;
        }
        self.clear_overflow_bits(out);
        if !(self.fix_at_most(out) && self.clamp_down(out)) {
            if self.lo < self.hi {
                self.hi.copy_to(self.nw, out);
                self.sub1(out);
            } else {
                for i in 0..self.nw {
                    out[i] = !self.fixed[i] | self.bits[i];
                }
                self.clear_overflow_bits(out);
            }
        }
        self.repair_sign_bits(out);
        debug_assert!(!self.has_overflow(out));
    }

    // =========================================================================
    // Repair
    // =========================================================================

    /// Make the top `signed_prefix` bits of `dst` equal to its sign bit.
    ///
    /// A pinned prefix bit that disagrees wins: every free prefix bit takes
    /// its value instead.
    pub fn repair_sign_bits(&self, dst: &mut BitWordArray) {
        if self.signed_prefix == 0 {
            return;
        }
        let sign = dst.get(self.bw - 1);
        let prefix = self.bw - self.signed_prefix..self.bw;
        for i in prefix.clone().rev() {
            if dst.get(i) == sign {
                continue;
            }
            if self.fixed.get(i) {
                for j in prefix.rev() {
                    if self.is_free(j) {
                        dst.set(j, !sign);
                    }
                }
                return;
            }
            dst.set(i, sign);
        }
    }

    /// Push `dst` into the envelope and, on success, into `eval`.
    ///
    /// Pinned bits are restored first. If that is not enough, free bits are
    /// flipped greedily, one pass per direction with each bit visited at most
    /// once per pass. For a wrap-around range `try_down` picks whether
    /// clearing (high to low) or setting (low to high) is tried first.
    pub fn set_repair(&mut self, try_down: bool, dst: &mut BitWordArray) -> bool {
        self.apply_fixed(dst);
        self.repair_sign_bits(dst);
        if self.in_range(dst) {
            self.set(dst);
            return true;
        }

        if self.lo < self.hi {
            self.sweep_down(dst, |v, t| t < &v.hi || v.in_range(t));
            self.sweep_up(dst, |v, t| t >= &v.lo || v.in_range(t));
        } else if try_down {
            self.sweep_down(dst, |v, t| v.in_range(t));
            self.sweep_up(dst, |v, t| v.in_range(t));
        } else {
            self.sweep_up(dst, |v, t| v.in_range(t));
            self.sweep_down(dst, |v, t| v.in_range(t));
        }
        self.repair_sign_bits(dst);

        if self.can_set(dst) {
            self.set(dst);
            return true;
        }
        trace!(bw = self.bw, candidate = %dst, "set_repair gave up");
        false
    }

    /// Clear free set bits from the top down until `done` holds.
    fn sweep_down(&self, dst: &mut BitWordArray, done: impl Fn(&Self, &BitWordArray) -> bool) {
        for i in (0..self.bw).rev() {
            if done(self, dst) {
                return;
            }
            if self.is_free(i) && dst.get(i) {
                dst.set(i, false);
            }
        }
    }

    /// Set free clear bits from the bottom up until `done` holds.
    fn sweep_up(&self, dst: &mut BitWordArray, done: impl Fn(&Self, &BitWordArray) -> bool) {
        for i in 0..self.bw {
            if done(self, dst) {
                return;
            }
            if self.is_free(i) && !dst.get(i) {
                dst.set(i, true);
            }
        }
    }

    // =========================================================================
    // Range Maintenance
    // =========================================================================

    /// Intersect the interval with `[l, h)` (both taken modulo `2^bw`).
    ///
    /// The bounds only ever narrow. Ends with [`Valuation::tighten_range`];
    /// if that finds the envelope empty, the previous interval is restored
    /// and the error is returned.
    pub fn add_range(&mut self, l: &BigInt, h: &BigInt) -> Result<()> {
        let modulus = BigInt::one() << self.bw;
        let l = l.mod_floor(&modulus).magnitude().clone();
        let h = h.mod_floor(&modulus).magnitude().clone();
        if l == h {
            return Ok(());
        }

        let saved = (self.lo.clone(), self.hi.clone());
        if !self.has_range() {
            debug!(bw = self.bw, lo = %l, hi = %h, "adopting range");
            self.set_lo_value(&l);
            self.set_hi_value(&h);
        } else {
            let mut old_lo = self.lo();
            let old_hi = self.hi();
            if old_lo < old_hi {
                if old_lo < l && l < old_hi {
                    self.set_lo_value(&l);
                    old_lo = l.clone();
                }
                if old_lo < h && h < old_hi {
                    self.set_hi_value(&h);
                }
            } else {
                if old_lo < l || l < old_hi {
                    self.set_lo_value(&l);
                    old_lo = l.clone();
                }
                if old_lo < h && h < old_hi {
                    self.set_hi_value(&h);
                } else if old_hi < old_lo && (h < old_hi || old_lo < h) {
                    self.set_hi_value(&h);
                }
            }
            debug!(bw = self.bw, lo = %self.lo, hi = %self.hi, "narrowed range");
        }
        debug_assert!(!self.has_overflow(&self.lo));
        debug_assert!(!self.has_overflow(&self.hi));

        if let Err(e) = self.tighten_range() {
            self.lo = saved.0;
            self.hi = saved.1;
            return Err(e);
        }
        Ok(())
    }

    fn set_lo_value(&mut self, n: &BigUint) {
        Self::write_value(self.bw, &mut self.lo, n);
    }

    fn set_hi_value(&mut self, n: &BigUint) {
        Self::write_value(self.bw, &mut self.hi, n);
    }

    fn write_value(bw: usize, dst: &mut BitWordArray, n: &BigUint) {
        for i in 0..bw {
            dst.set(i, n.bit(i as u64));
        }
    }

    /// Restore well-formedness after the interval or the pins changed.
    ///
    /// Phase 1 moves `bits` to the smallest fixed-consistent value in range
    /// (at or above `lo`, else for a wrap-around range the smallest completion
    /// below `hi`). Phase 2 raises `lo` to the nearest fixed-consistent value
    /// at or above it. Nothing is modified when the envelope is empty.
    pub fn tighten_range(&mut self) -> Result<()> {
        if !self.has_range() {
            return Ok(());
        }

        let mut bits = self.bits.clone();
        if !self.in_range(&self.bits) {
            self.lo.copy_to(self.nw, &mut bits);
            let mut found = self.fix_at_least(&mut bits) && self.in_range(&bits);
            if !found && self.lo > self.hi {
                self.set_zero(&mut bits);
                self.apply_fixed(&mut bits);
                found = self.in_range(&bits);
            }
            if !found {
                debug!(bw = self.bw, lo = %self.lo, hi = %self.hi, fixed = %self.fixed, "empty envelope");
                return Err(SlsError::EmptyEnvelope {
                    lo: self.lo().to_string(),
                    hi: self.hi().to_string(),
                });
            }
            trace!(from = %self.bits, to = %bits, "moved bits into range");
        }

        let mut lo = self.lo.clone();
        if !self.fix_at_least(&mut lo) {
            // only reachable for wrap-around: nothing pinned-compatible above lo
            self.set_zero(&mut lo);
        }
        if lo != self.lo {
            trace!(from = %self.lo, to = %lo, "raised lo to a fixed-consistent value");
        }

        self.bits = bits;
        self.lo = lo;
        debug_assert!(self.well_formed());
        Ok(())
    }

    // =========================================================================
    // Value Helpers
    // =========================================================================

    /// Write `n mod 2^bw` into `dst` bit by bit.
    pub fn set_value(&self, dst: &mut BitWordArray, n: &BigUint) {
        Self::write_value(self.bw, dst, n);
        self.clear_overflow_bits(dst);
    }

    /// Copy the committed value into `dst`.
    pub fn get(&self, dst: &mut BitWordArray) {
        self.bits.copy_to(self.nw, dst);
    }

    pub fn set_zero(&self, out: &mut BitWordArray) {
        for i in 0..self.nw {
            out[i] = 0;
        }
    }

    pub fn set_one(&self, out: &mut BitWordArray) {
        self.set_word(out, 1);
    }

    pub fn set_zero_eval(&mut self) {
        for i in 0..self.nw {
            self.eval[i] = 0;
        }
    }

    /// Set `dst` to the single-word value `v`.
    pub fn set_word(&self, dst: &mut BitWordArray, v: Word) {
        dst[0] = v;
        for i in 1..self.nw {
            dst[i] = 0;
        }
    }

    pub fn copy_value(&self, dst: &mut BitWordArray, src: &BitWordArray) {
        src.copy_to(self.nw, dst);
    }

    // =========================================================================
    // Bit-Pattern Predicates
    // =========================================================================

    pub fn is_zero(&self, a: &BitWordArray) -> bool {
        (0..self.nw - 1).all(|i| a[i] == 0) && (a[self.nw - 1] & self.mask) == 0
    }

    pub fn is_ones(&self, a: &BitWordArray) -> bool {
        debug_assert!(!self.has_overflow(a));
        (0..self.nw - 1).all(|i| a[i] == WORD_MAX) && 0 == (self.mask & !a[self.nw - 1])
    }

    pub fn is_one(&self, a: &BitWordArray) -> bool {
        debug_assert!(!self.has_overflow(a));
        (1..self.nw).all(|i| a[i] == 0) && a[0] == 1
    }

    pub fn is_zero_bits(&self) -> bool {
        self.is_zero(&self.bits)
    }

    pub fn is_ones_bits(&self) -> bool {
        self.is_ones(&self.bits)
    }

    pub fn is_one_bits(&self) -> bool {
        self.is_one(&self.bits)
    }

    pub fn is_power_of2(&self, a: &BitWordArray) -> bool {
        a.count_ones() == 1
    }

    /// Most significant set bit, or `bw` for zero.
    pub fn msb(&self, a: &BitWordArray) -> usize {
        debug_assert!(!self.has_overflow(a));
        a.msb()
    }

    pub fn parity(&self, a: &BitWordArray) -> usize {
        a.parity()
    }

    // =========================================================================
    // Arithmetic
    // =========================================================================

    /// `out = a + b mod 2^bw`; true if the true sum needs more than `bw` bits.
    pub fn set_add(&self, out: &mut BitWordArray, a: &BitWordArray, b: &BitWordArray) -> bool {
        let n = self.nw;
        let carry = arith::add(&a.words()[..n], &b.words()[..n], &mut out.words_mut()[..n]);
        let ovfl = carry || self.has_overflow(out);
        self.clear_overflow_bits(out);
        ovfl
    }

    /// `out = a - b mod 2^bw`.
    pub fn set_sub(&self, out: &mut BitWordArray, a: &BitWordArray, b: &BitWordArray) {
        let n = self.nw;
        arith::sub(&a.words()[..n], &b.words()[..n], &mut out.words_mut()[..n]);
        self.clear_overflow_bits(out);
    }

    /// `out = a * b mod 2^bw`; with `check_overflow`, true if the true product
    /// needs more than `bw` bits.
    pub fn set_mul(
        &self,
        out: &mut BitWordArray,
        a: &BitWordArray,
        b: &BitWordArray,
        check_overflow: bool,
    ) -> bool {
        let n = self.nw;
        arith::mul(&a.words()[..n], &b.words()[..n], &mut out.words_mut()[..2 * n]);
        let ovfl = check_overflow
            && (self.has_overflow(out) || out.words()[n..2 * n].iter().any(|&w| w != 0));
        out.words_mut()[n..2 * n].fill(0);
        self.clear_overflow_bits(out);
        ovfl
    }

    /// `out = bits >> shift` (logical).
    pub fn shift_right(&self, out: &mut BitWordArray, shift: usize) {
        debug_assert!(shift < self.bw);
        for i in 0..self.bw {
            out.set(i, i + shift < self.bw && self.bits.get(i + shift));
        }
        debug_assert!(self.well_formed());
    }

    /// Decrement `out` by one, wrapping at zero.
    pub fn sub1(&self, out: &mut BitWordArray) {
        for i in 0..self.bw {
            if out.get(i) {
                out.set(i, false);
                return;
            }
            out.set(i, true);
        }
    }

    /// The committed value as a natural number, saturated at `max_n`.
    pub fn to_nat(&self, max_n: usize) -> usize {
        debug_assert!(!self.has_overflow(&self.bits));
        debug_assert!(max_n < usize::MAX / 2);
        let mut p: usize = 1;
        let mut value: usize = 0;
        for i in 0..self.bw {
            if p >= max_n {
                if (i..self.bw).any(|j| self.bits.get(j)) {
                    return max_n;
                }
                return value.min(max_n);
            }
            if self.bits.get(i) {
                value += p;
            }
            p <<= 1;
        }
        value.min(max_n)
    }
}

impl fmt::Display for Valuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ev: {}", self.bits, self.eval)?;
        if !self.is_zero(&self.fixed) {
            write!(f, " fix:{}", self.fixed)?;
        }
        if self.has_range() {
            write!(f, " [{}, {}[", self.lo, self.hi)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn val(v: &Valuation, n: u64) -> BitWordArray {
        v.value_of(n)
    }

    #[test]
    fn test_new_marks_overflow_fixed() {
        let v = Valuation::new(12);
        assert_eq!(v.fixed()[0], !0xfff);
        assert!(v.is_zero(v.fixed()));
        assert!(!v.has_range());
        assert!(v.well_formed());
    }

    #[test]
    fn test_fix_at_least_carries_past_pinned_zero() {
        // bit 2 pinned to 0: smallest value >= 5 (101b) is 8 (1000b)
        let mut v = Valuation::new(4);
        v.fix_bit(2, false).unwrap();
        let mut dst = val(&v, 5);
        assert!(v.fix_at_least(&mut dst));
        assert_eq!(dst.get_value(1), BigUint::from(8u32));
    }

    #[test]
    fn test_fix_at_most_borrows_past_pinned_one() {
        // bit 2 pinned to 1: largest value <= 9 (1001b) is 7 (0111b)
        let mut v = Valuation::new(4);
        v.fix_bit(2, true).unwrap();
        let mut dst = val(&v, 9);
        assert!(v.fix_at_most(&mut dst));
        assert_eq!(dst.get_value(1), BigUint::from(7u32));
    }

    #[test]
    fn test_fix_at_least_exhausted() {
        // top bit pinned to 0 in a 4-bit value: nothing >= 9 is consistent
        let mut v = Valuation::new(4);
        v.fix_bit(3, false).unwrap();
        let mut dst = val(&v, 9);
        assert!(!v.fix_at_least(&mut dst));
    }

    #[test]
    fn test_display() {
        let mut v = Valuation::new(8);
        v.fix_bit(0, true).unwrap();
        v.add_range(&BigInt::from(3), &BigInt::from(40)).unwrap();
        assert_eq!(v.to_string(), "3 ev: 1 fix:1 [3, 28[");
    }
}
