//! Bounds on the work the simplification engine is allowed to do.

use rug::Integer;

/// Limits that keep simplification of pathological expressions bounded.
///
/// When a limit is reached, the engine leaves the offending part of the expression unsimplified
/// instead of reporting an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// The budget for evaluating an integer power `b^p` exactly, measured as `bits(b) + |p|`.
    ///
    /// Powers over budget are kept symbolic. The default is 512, so `10^100` is evaluated but
    /// `2^600` is not.
    pub max_power_bits: u64,

    /// The maximum number of passes used to normalize a product of powers.
    ///
    /// Normalization reaches a fixpoint long before this on any realistic input. If the limit is
    /// reached, the product from the last pass is used as-is. The default is 256.
    pub max_passes: usize,

    /// The maximum number of terms the distributive engine may produce when expanding a product
    /// of sums, or the maximum number of repeated factors when expanding a power. Larger
    /// expansions are left unexpanded.
    ///
    /// The default is 4096.
    pub max_expanded_terms: usize,
}

impl Limits {
    /// The default limits.
    pub const DEFAULT: Self = Self {
        max_power_bits: 512,
        max_passes: 256,
        max_expanded_terms: 4096,
    };

    /// Returns true if `base^power` is within [`Limits::max_power_bits`].
    pub fn allows_power(&self, base: &Integer, power: u32) -> bool {
        u64::from(base.significant_bits()) + u64::from(power) <= self.max_power_bits
    }

    pub fn with_max_power_bits(self, max_power_bits: u64) -> Self {
        Self { max_power_bits, ..self }
    }

    pub fn with_max_passes(self, max_passes: usize) -> Self {
        Self { max_passes, ..self }
    }

    pub fn with_max_expanded_terms(self, max_expanded_terms: usize) -> Self {
        Self { max_expanded_terms, ..self }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::DEFAULT
    }
}
