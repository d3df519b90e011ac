//! Provides functions for summarizing a portfolio of fund records.
use super::FundRecord;
use super::numeric::{finite_or_zero, round_to};
use serde::Serialize;
use tracing::debug;

/// Current and target share of a single fund.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationShare {
    pub name: String,
    pub current_value: f64,
    pub current_percent: f64,
    pub target_percent: f64,
    /// Percentage points the fund is above (positive) or below its target.
    pub drift: f64,
}

pub fn total_value(funds: &[FundRecord]) -> f64 {
    funds
        .iter()
        .fold(0.0, |acc, f| acc + finite_or_zero(f.current_value))
}

pub fn total_target(funds: &[FundRecord]) -> f64 {
    funds
        .iter()
        .fold(0.0, |acc, f| acc + finite_or_zero(f.target_percent))
}

/// Value-weighted average of the funds' expected returns, two decimals.
///
/// Returns `0.0` for a portfolio that holds nothing yet.
pub fn weighted_return(funds: &[FundRecord]) -> f64 {
    let total = total_value(funds);
    if total <= 0.0 {
        return 0.0;
    }
    let score = funds.iter().fold(0.0, |acc, f| {
        acc + finite_or_zero(f.current_value) * finite_or_zero(f.expected_return)
    });
    round_to(score / total, 2)
}

/// Compares each fund's current share of the portfolio with its target.
pub fn allocation_breakdown(funds: &[FundRecord]) -> Vec<AllocationShare> {
    let total = total_value(funds);
    funds
        .iter()
        .map(|f| {
            let current_value = finite_or_zero(f.current_value);
            let current_percent = if total > 0.0 {
                current_value * 100.0 / total
            } else {
                0.0
            };
            let target_percent = finite_or_zero(f.target_percent);
            AllocationShare {
                name: f.name.clone(),
                current_value,
                current_percent,
                target_percent,
                drift: current_percent - target_percent,
            }
        })
        .collect()
}

/// Replaces `existing` with freshly imported records.
///
/// Imported records carry no targets, so a fund that was already tracked
/// under the same name keeps its `target_percent`. Funds missing from the
/// import are dropped.
pub fn merge_imported(existing: &[FundRecord], imported: Vec<FundRecord>) -> Vec<FundRecord> {
    imported
        .into_iter()
        .map(|mut fund| {
            fund.target_percent = existing
                .iter()
                .find(|f| f.name == fund.name)
                .map_or(0.0, |f| f.target_percent);
            debug!(fund = %fund.name, target = fund.target_percent, "Merged imported fund");
            fund
        })
        .collect()
}
