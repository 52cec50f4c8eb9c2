//! Low-stock policy.

use serde::{Deserialize, Serialize};

/// Quantity below which an item is considered low on stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockPolicy {
    threshold: i64,
}

impl LowStockPolicy {
    pub fn new(threshold: i64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    pub fn is_low(&self, quantity: i64) -> bool {
        quantity < self.threshold
    }

    /// True when a change moves stock from healthy to low.
    ///
    /// Only the crossing is signalled; further decreases while already low are not.
    pub fn crossed(&self, before: i64, after: i64) -> bool {
        !self.is_low(before) && self.is_low(after)
    }
}

impl Default for LowStockPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_LOW_STOCK_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_exclusive() {
        let policy = LowStockPolicy::default();
        assert!(!policy.is_low(5));
        assert!(policy.is_low(4));
    }

    #[test]
    fn crossing_only_fires_once() {
        let policy = LowStockPolicy::new(5);
        assert!(policy.crossed(7, 4));
        assert!(!policy.crossed(4, 2));
        assert!(!policy.crossed(2, 9));
    }
}
