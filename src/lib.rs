//! bvsls - Bit-Vector Valuations for Stochastic Local Search
//!
//! bvsls holds the per-variable state of a bit-vector local-search solver:
//! the current value of each variable, a speculative value being evaluated,
//! and an **envelope** of pinned bits and a (possibly wrap-around) interval
//! that every committed value must respect.
//!
//! # Key Characteristics
//!
//! - Values of any width, stored as little-endian 32-bit words
//! - Word-level arithmetic with explicit carry and overflow reporting
//! - Nearest-feasible-value queries used to steer search moves
//! - Randomized samplers that stay inside the envelope
//!
//! # Architecture
//!
//! - **BitWordArray**: fixed-width value storage, ordering and hex display
//! - **arith**: multi-word add/sub/mul/compare
//! - **Valuation**: value, speculative value, pins and interval of one variable
//! - **sampling**: randomized moves on a `Valuation`
//! - **ValuationConfig**: serializable envelope description
//!
//! # Examples
//!
//! ## Range and pinned bits
//!
//! ```
//! use bvsls::Valuation;
//! use num_bigint::{BigInt, BigUint};
//!
//! let mut v = Valuation::new(4);
//! v.add_range(&BigInt::from(3), &BigInt::from(9)).unwrap();
//!
//! let mut dst = v.scratch();
//! assert!(v.get_at_most(&v.value_of(12u32), &mut dst));
//! assert_eq!(dst.get_value(1), BigUint::from(8u32));
//! assert!(!v.get_at_most(&v.value_of(2u32), &mut dst));
//! ```
//!
//! ## Committing a speculative value
//!
//! ```
//! use bvsls::Valuation;
//!
//! let mut v = Valuation::new(16);
//! v.fix_bit(15, false).unwrap();
//!
//! let x = v.value_of(0x1234u32);
//! v.set(&x);
//! assert!(v.commit_eval());
//! assert!(v.eq_bits(&x));
//!
//! let y = v.value_of(0x8000u32);
//! v.set(&y);
//! assert!(!v.commit_eval());
//! assert!(v.eq_bits(&x));
//! ```
//!
//! # Safety
//!
//! bvsls uses `debug_assert!` for overflow and index checks in hot paths.
//! Width mismatches between compared values panic in every build.

// Module declarations
pub mod arith;
pub mod bitvect;
pub mod config;
pub mod error;
pub mod sampling;
pub mod utils;
pub mod valuation;

// Re-exports for convenient access
pub use bitvect::{BitWordArray, Word, BITS_PER_WORD, WORD_MAX};
pub use config::ValuationConfig;
pub use error::{Result, SlsError};
pub use valuation::Valuation;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = "bvsls";

/// Get version string
pub fn version() -> String {
    format!("{} v{}", NAME, VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(ver.contains("bvsls"));
        assert!(ver.contains(VERSION));
    }

    #[test]
    fn test_re_exports() {
        let _a = BitWordArray::new(32);
        let _v = Valuation::new(32);
        let _result: Result<()> = Ok(());
        assert_eq!(BITS_PER_WORD, 32);
    }
}
