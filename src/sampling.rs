//! Randomized moves inside the envelope.
//!
//! These are the probabilistic helpers the search loop uses to propose new
//! values for a [`Valuation`]. They are not exhaustive: each one
//! computes a deterministic feasible bound, optionally perturbs it with a few
//! random draws, and falls back to the bound whenever the perturbed value no
//! longer fits. A helper that returns `true` has written a value satisfying
//! [`Valuation::can_set`] into `eval`; one that returns `false` has left
//! `eval` alone. `tmp`/`dst` arguments are caller-owned scratch.
//!
//! # Examples
//!
//! ```
//! use bvsls::Valuation;
//! use num_bigint::BigInt;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(3);
//! let mut v = Valuation::new(16);
//! v.add_range(&BigInt::from(100), &BigInt::from(200)).unwrap();
//!
//! let src = v.value_of(150u32);
//! let mut tmp = v.scratch();
//! assert!(v.set_random_at_most(&src, &mut tmp, &mut rng));
//! assert!(v.can_set(v.eval()));
//! assert!(*v.eval() <= src);
//! ```

use crate::bitvect::BitWordArray;
use crate::utils::{coin_flip, rand_below, random_bits};
use crate::valuation::Valuation;
use rand::Rng;

impl Valuation {
    /// Clear free set bits from the top down until `is_feasible(dst)`.
    pub fn round_down(&self, dst: &mut BitWordArray, is_feasible: impl Fn(&BitWordArray) -> bool) {
        for i in (0..self.bw()).rev() {
            if is_feasible(dst) {
                break;
            }
            if self.is_free(i) && dst.get(i) {
                dst.set(i, false);
            }
        }
        self.repair_sign_bits(dst);
    }

    /// Set free clear bits from the bottom up until `is_feasible(dst)`.
    pub fn round_up(&self, dst: &mut BitWordArray, is_feasible: impl Fn(&BitWordArray) -> bool) {
        for i in 0..self.bw() {
            if is_feasible(dst) {
                break;
            }
            if self.is_free(i) && !dst.get(i) {
                dst.set(i, true);
            }
        }
        self.repair_sign_bits(dst);
    }

    /// OR a random subset of the free bits into `dst`.
    pub fn set_random_above<R: Rng + ?Sized>(&self, dst: &mut BitWordArray, rng: &mut R) {
        for i in 0..self.nw() {
            dst[i] |= random_bits(rng) & !self.fixed()[i];
        }
        self.repair_sign_bits(dst);
    }

    /// Clear one randomly chosen free set bit and randomize the free bits below it.
    ///
    /// The cleared position is picked by reservoir sampling over the free set
    /// bits. No-op when there is none.
    pub fn set_random_below<R: Rng + ?Sized>(&self, dst: &mut BitWordArray, rng: &mut R) {
        if self.is_zero(dst) {
            return;
        }
        let mut n = 0u32;
        let mut idx = None;
        for i in 0..self.bw() {
            if dst.get(i) && self.is_free(i) {
                n += 1;
                if rand_below(n, rng) == 0 {
                    idx = Some(i);
                }
            }
        }
        let Some(idx) = idx else {
            return;
        };
        dst.set(idx, false);
        for i in 0..idx {
            if self.is_free(i) {
                dst.set(i, coin_flip(rng));
            }
        }
        self.repair_sign_bits(dst);
    }

    /// A random completion of the pinned bits.
    pub fn get_variant<R: Rng + ?Sized>(&self, dst: &mut BitWordArray, rng: &mut R) {
        for i in 0..self.nw() {
            dst[i] = random_bits(rng) & !self.fixed()[i];
        }
        self.apply_fixed(dst);
        self.repair_sign_bits(dst);
        self.clear_overflow_bits(dst);
    }

    /// Set `eval` to a feasible value `<= src`, sometimes below the largest one.
    ///
    /// Returns false iff no feasible value `<= src` exists.
    pub fn set_random_at_most<R: Rng + ?Sized>(
        &mut self,
        src: &BitWordArray,
        tmp: &mut BitWordArray,
        rng: &mut R,
    ) -> bool {
        if !self.get_at_most(src, tmp) {
            return false;
        }
        if self.is_zero(tmp) || coin_flip(rng) {
            return self.try_set(tmp);
        }

        self.set_random_below(tmp, rng);
        if *tmp <= *src && self.try_set(tmp) {
            return true;
        }

        self.get_at_most(src, tmp) && self.try_set(tmp)
    }

    /// Set `eval` to a feasible value `>= src`, sometimes above the smallest one.
    ///
    /// Returns false iff no feasible value `>= src` exists.
    pub fn set_random_at_least<R: Rng + ?Sized>(
        &mut self,
        src: &BitWordArray,
        tmp: &mut BitWordArray,
        rng: &mut R,
    ) -> bool {
        if !self.get_at_least(src, tmp) {
            return false;
        }
        if self.is_ones(tmp) || coin_flip(rng) {
            return self.try_set(tmp);
        }

        self.set_random_above(tmp, rng);
        if *tmp >= *src && self.try_set(tmp) {
            return true;
        }

        self.get_at_least(src, tmp) && self.try_set(tmp)
    }

    /// Set `eval` to a feasible value in the closed interval `[lo, hi]`.
    ///
    /// A coin flip picks between starting from the smallest feasible value
    /// `>= lo` and relaxing upward, or from the largest feasible value
    /// `<= hi` and relaxing downward. Fails when the starting bound already
    /// falls outside `[lo, hi]`.
    pub fn set_random_in_range<R: Rng + ?Sized>(
        &mut self,
        lo: &BitWordArray,
        hi: &BitWordArray,
        tmp: &mut BitWordArray,
        rng: &mut R,
    ) -> bool {
        if coin_flip(rng) {
            if !self.get_at_least(lo, tmp) {
                return false;
            }
            debug_assert!(self.in_range(tmp));
            if *hi < *tmp {
                return false;
            }
            if self.is_ones(tmp) || coin_flip(rng) {
                return self.try_set(tmp);
            }
            self.set_random_above(tmp, rng);
            self.round_down(tmp, |t| hi >= t && self.in_range(t));
            if self.in_range(tmp) && *lo <= *tmp && *hi >= *tmp && self.try_set(tmp) {
                return true;
            }
            self.get_at_least(lo, tmp) && *hi >= *tmp && self.try_set(tmp)
        } else {
            if !self.get_at_most(hi, tmp) {
                return false;
            }
            debug_assert!(self.in_range(tmp));
            if *lo > *tmp {
                return false;
            }
            if self.is_zero(tmp) || coin_flip(rng) {
                return self.try_set(tmp);
            }
            self.set_random_below(tmp, rng);
            self.round_up(tmp, |t| lo <= t && self.in_range(t));
            if self.in_range(tmp) && *lo <= *tmp && *hi >= *tmp && self.try_set(tmp) {
                return true;
            }
            self.get_at_most(hi, tmp) && *lo <= *tmp && self.try_set(tmp)
        }
    }
}
