//! Core business logic: fund records, rebalancing and statement normalization

pub mod allocation;
pub mod analytics;
pub mod config;
pub mod log;
pub mod numeric;
pub mod statement;

// Re-export main types for cleaner imports
pub use allocation::{AllocationError, AllocationPlan, FundAllocation, allocate};
pub use statement::{Cell, RawRow, StatementError, normalize};

use numeric::{deserialize_amount, deserialize_lenient};
use serde::{Deserialize, Serialize};

/// One line item of a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundRecord {
    pub name: String,
    /// Amount already held in the fund, never negative.
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub current_value: f64,
    /// Annualized return (XIRR) in percent. Only used for reporting.
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub expected_return: f64,
    /// Desired share of the portfolio in percent.
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub target_percent: f64,
}

impl FundRecord {
    pub fn new(
        name: impl Into<String>,
        current_value: f64,
        expected_return: f64,
        target_percent: f64,
    ) -> Self {
        Self {
            name: name.into(),
            current_value,
            expected_return,
            target_percent,
        }
    }

    /// A newly added fund with nothing invested yet.
    pub fn unfunded(name: impl Into<String>, target_percent: f64) -> Self {
        Self::new(name, 0.0, 0.0, target_percent)
    }
}
