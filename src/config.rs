//! Valuation configuration serialization.
//!
//! A [`ValuationConfig`] is a plain description of a variable's envelope:
//! its width, signed prefix, pinned bits and the ranges to intersect. It can
//! be saved to JSON or bincode and turned back into a [`Valuation`].
//!
//! # Architecture
//!
//! 1. **FixedBitConfig** - one pinned bit position and its value
//! 2. **RangeConfig** - one half-open interval, bounds as decimal strings
//! 3. **ValuationConfig** - top-level struct holding both lists
//!
//! Range bounds are strings so that widths above 64 bits survive JSON
//! intact. They may be negative and are reduced modulo `2^bw` on build.
//!
//! # Example
//!
//! ```
//! use bvsls::{ValuationConfig, config::{FixedBitConfig, RangeConfig}};
//!
//! let config = ValuationConfig {
//!     bw: 8,
//!     fixed: vec![FixedBitConfig { index: 0, value: true }],
//!     ranges: vec![RangeConfig::new(10, 5)],
//!     ..ValuationConfig::new(8)
//! };
//!
//! let json = config.to_json().unwrap();
//! let v = ValuationConfig::from_json(&json).unwrap().build().unwrap();
//! assert_eq!(v.lo().to_string(), "11");
//! assert_eq!(v.hi().to_string(), "5");
//! ```

use crate::error::{Result, SlsError};
use crate::valuation::Valuation;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single pinned bit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixedBitConfig {
    /// Bit position, `0..bw`
    pub index: usize,
    /// Pinned value
    pub value: bool,
}

/// A half-open interval `[lo, hi)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RangeConfig {
    /// Lower bound, decimal
    pub lo: String,
    /// Upper bound, decimal
    pub hi: String,
}

impl RangeConfig {
    pub fn new(lo: impl Into<BigInt>, hi: impl Into<BigInt>) -> Self {
        Self {
            lo: lo.into().to_string(),
            hi: hi.into().to_string(),
        }
    }

    fn parse_bound(s: &str) -> Result<BigInt> {
        BigInt::from_str(s.trim())
            .map_err(|e| SlsError::InvalidParameter(format!("range bound {:?}: {}", s, e)))
    }

    /// Both bounds as integers.
    pub fn bounds(&self) -> Result<(BigInt, BigInt)> {
        Ok((Self::parse_bound(&self.lo)?, Self::parse_bound(&self.hi)?))
    }
}

/// Complete description of one variable's envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValuationConfig {
    /// Version of the serialization format
    #[serde(default = "default_version")]
    pub version: String,

    /// Bit-width
    pub bw: usize,

    /// Number of top bits that must equal the sign bit
    #[serde(default)]
    pub signed_prefix: usize,

    /// Pinned bits, applied before the ranges
    #[serde(default)]
    pub fixed: Vec<FixedBitConfig>,

    /// Ranges, intersected in order
    #[serde(default)]
    pub ranges: Vec<RangeConfig>,
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl ValuationConfig {
    /// An unconstrained configuration of width `bw`.
    pub fn new(bw: usize) -> Self {
        Self {
            version: default_version(),
            bw,
            signed_prefix: 0,
            fixed: Vec::new(),
            ranges: Vec::new(),
        }
    }

    /// Add a pinned bit.
    pub fn with_fixed(mut self, index: usize, value: bool) -> Self {
        self.fixed.push(FixedBitConfig { index, value });
        self
    }

    /// Add a range.
    pub fn with_range(mut self, lo: impl Into<BigInt>, hi: impl Into<BigInt>) -> Self {
        self.ranges.push(RangeConfig::new(lo, hi));
        self
    }

    /// Set the signed prefix.
    pub fn with_signed_prefix(mut self, prefix: usize) -> Self {
        self.signed_prefix = prefix;
        self
    }

    /// Check the structural constraints that do not need a valuation.
    ///
    /// An empty envelope is only detected by [`ValuationConfig::build`].
    pub fn validate(&self) -> Result<()> {
        if self.bw == 0 {
            return Err(SlsError::InvalidBitWidth(self.bw));
        }
        if self.signed_prefix > self.bw {
            return Err(SlsError::InvalidParameter(format!(
                "signed_prefix {} exceeds bit-width {}",
                self.signed_prefix, self.bw
            )));
        }
        for fb in &self.fixed {
            if fb.index >= self.bw {
                return Err(SlsError::IndexOutOfBounds {
                    index: fb.index,
                    length: self.bw,
                });
            }
        }
        for r in &self.ranges {
            r.bounds()?;
        }
        Ok(())
    }

    /// Construct the valuation: pins first, then ranges in order.
    pub fn build(&self) -> Result<Valuation> {
        self.validate()?;
        let mut v = Valuation::new(self.bw);
        v.set_signed(self.signed_prefix);
        for fb in &self.fixed {
            v.fix_bit(fb.index, fb.value)?;
        }
        for r in &self.ranges {
            let (lo, hi) = r.bounds()?;
            v.add_range(&lo, &hi)?;
        }
        Ok(v)
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to binary (bincode).
    pub fn to_binary(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from binary (bincode).
    pub fn from_binary(data: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(data)?)
    }
}

impl Valuation {
    /// Export the envelope: width, signed prefix, pinned bits and current range.
    ///
    /// The committed value is not part of the configuration.
    pub fn to_config(&self) -> ValuationConfig {
        let mut config = ValuationConfig::new(self.bw()).with_signed_prefix(self.signed_prefix());
        for i in 0..self.bw() {
            if self.fixed().get(i) {
                config.fixed.push(FixedBitConfig {
                    index: i,
                    value: self.get_bit(i),
                });
            }
        }
        if self.has_range() {
            config.ranges.push(RangeConfig {
                lo: self.lo().to_string(),
                hi: self.hi().to_string(),
            });
        }
        config
    }
}
