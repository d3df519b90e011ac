//! Deficit-proportional rebalancing of a periodic contribution.
//!
//! Only underweight funds receive money; nothing is ever sold. When every fund
//! already sits at or above its ideal value the contribution is split by the
//! target percentages instead, so it is never discarded.
use super::FundRecord;
use super::numeric::{coerce_amount, finite_or_zero, round_to};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub const TARGET_TOTAL: f64 = 100.0;
/// Allowed distance (in percentage points) between the target sum and 100.
pub const TARGET_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    #[error("Total target must be 100%. Current: {actual:.2}%")]
    TargetSumMismatch { actual: f64 },
}

/// A fund together with the amount to invest in it this cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundAllocation {
    #[serde(flatten)]
    pub fund: FundRecord,
    /// Share of the portfolio before the contribution, one decimal place.
    pub current_share_percent: f64,
    pub invest_amount: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationPlan {
    pub allocations: Vec<FundAllocation>,
    /// Sum of the already rounded `invest_amount`s.
    pub total_invested: u64,
}

/// Returns true when the targets add up to 100 within [`TARGET_TOLERANCE`].
pub fn targets_balanced(total_target: f64) -> bool {
    (total_target - TARGET_TOTAL).abs() <= TARGET_TOLERANCE
}

/// Splits `contribution` across `funds` so the portfolio moves toward the
/// target percentages.
///
/// A non-finite or negative contribution is treated as zero. Each amount is
/// rounded independently, so `total_invested` can differ from the
/// contribution by a few units.
pub fn allocate(
    funds: &[FundRecord],
    contribution: f64,
) -> Result<AllocationPlan, AllocationError> {
    let total_target = funds
        .iter()
        .fold(0.0, |acc, f| acc + finite_or_zero(f.target_percent));
    if !targets_balanced(total_target) {
        return Err(AllocationError::TargetSumMismatch {
            actual: total_target,
        });
    }

    let contribution = coerce_amount(contribution);
    let total_current: f64 = funds.iter().map(|f| finite_or_zero(f.current_value)).sum();
    let projected_total = total_current + contribution;

    let deficits: Vec<f64> = funds
        .iter()
        .map(|f| {
            let ideal = projected_total * finite_or_zero(f.target_percent) / 100.0;
            (ideal - finite_or_zero(f.current_value)).max(0.0)
        })
        .collect();
    let total_deficit: f64 = deficits.iter().sum();
    debug!(
        total_current,
        projected_total, total_deficit, contribution, "Computed rebalancing deficits"
    );

    let allocations: Vec<FundAllocation> = funds
        .iter()
        .zip(&deficits)
        .map(|(fund, deficit)| {
            let amount = if total_deficit > 0.0 {
                contribution * deficit / total_deficit
            } else {
                // Already balanced, fall back to a plain split by target
                contribution * finite_or_zero(fund.target_percent) / 100.0
            };

            FundAllocation {
                fund: fund.clone(),
                current_share_percent: share_percent(fund.current_value, total_current),
                invest_amount: amount.max(0.0).round() as u64,
            }
        })
        .collect();

    let total_invested = allocations.iter().map(|a| a.invest_amount).sum();
    Ok(AllocationPlan {
        allocations,
        total_invested,
    })
}

fn share_percent(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        round_to(finite_or_zero(value) / total * 100.0, 1)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fund(name: &str, value: f64, target: f64) -> FundRecord {
        FundRecord::new(name, value, 0.0, target)
    }

    fn amounts(plan: &AllocationPlan) -> Vec<u64> {
        plan.allocations.iter().map(|a| a.invest_amount).collect()
    }

    #[test]
    fn test_even_split_from_empty_portfolio() {
        let funds = vec![fund("A", 0.0, 50.0), fund("B", 0.0, 50.0)];

        let plan = allocate(&funds, 10000.0).unwrap();

        assert_eq!(amounts(&plan), vec![5000, 5000]);
        assert_eq!(plan.total_invested, 10000);
        assert!(plan.allocations.iter().all(|a| a.current_share_percent == 0.0));
    }

    #[test]
    fn test_underweight_funds_receive_the_contribution() {
        // Projected total 100000: ideal A=60000 (deficit 20000), B=40000 (surplus)
        let funds = vec![fund("A", 40000.0, 60.0), fund("B", 50000.0, 40.0)];

        let plan = allocate(&funds, 10000.0).unwrap();

        assert_eq!(amounts(&plan), vec![10000, 0]);
        assert_eq!(plan.allocations[0].current_share_percent, 44.4);
        assert_eq!(plan.allocations[1].current_share_percent, 55.6);
    }

    #[test]
    fn test_contribution_split_proportionally_to_deficits() {
        // Projected total 30000: deficits A=10000, B=5000, C=0
        let funds = vec![
            fund("A", 0.0, 1.0 / 3.0 * 100.0),
            fund("B", 5000.0, 1.0 / 3.0 * 100.0),
            fund("C", 15000.0, 1.0 / 3.0 * 100.0),
        ];

        let plan = allocate(&funds, 10000.0).unwrap();

        assert_eq!(amounts(&plan), vec![6667, 3333, 0]);
        assert_eq!(plan.total_invested, 10000);
    }

    #[test]
    fn test_full_rebalance_falls_back_to_targets() {
        // Targets sum to 99.95, leaving room for both funds to sit above their
        // ideal values even after the contribution is added.
        let funds = vec![fund("A", 60000.0, 59.97), fund("B", 40000.0, 39.98)];

        let plan = allocate(&funds, 40.0).unwrap();

        assert_eq!(amounts(&plan), vec![24, 16]);
        assert_eq!(plan.total_invested, 40);
        assert_eq!(plan.allocations[0].current_share_percent, 60.0);
    }

    #[test]
    fn test_negative_contribution_is_treated_as_zero() {
        let funds = vec![fund("A", 600.0, 60.0), fund("B", 400.0, 40.0)];

        let plan = allocate(&funds, -500.0).unwrap();

        assert_eq!(amounts(&plan), vec![0, 0]);
        assert_eq!(plan.total_invested, 0);
    }

    #[test]
    fn test_non_negative_for_skewed_inputs() {
        let funds = vec![
            fund("Huge", 1_000_000.0, 10.0),
            fund("Tiny", 10.0, 45.0),
            fund("Empty", 0.0, 45.0),
        ];

        let plan = allocate(&funds, 5000.0).unwrap();

        assert_eq!(plan.allocations[0].invest_amount, 0);
        let sum: u64 = amounts(&plan).iter().sum();
        assert!(sum.abs_diff(5000) <= funds.len() as u64);
    }

    #[test]
    fn test_rounding_is_independent_per_fund() {
        let funds = vec![
            fund("A", 0.0, 33.4),
            fund("B", 0.0, 33.3),
            fund("C", 0.0, 33.3),
        ];

        let plan = allocate(&funds, 1001.0).unwrap();

        assert_eq!(amounts(&plan), vec![334, 333, 333]);
        assert_eq!(plan.total_invested, 1000);
    }

    #[test]
    fn test_target_tolerance_boundary() {
        let plan_with = |a: f64, b: f64| allocate(&[fund("A", 0.0, a), fund("B", 0.0, b)], 100.0);

        assert!(plan_with(49.9, 50.0).is_ok());
        assert!(plan_with(50.1, 50.0).is_ok());

        match plan_with(49.8, 50.0) {
            Err(AllocationError::TargetSumMismatch { actual }) => {
                assert!((actual - 99.8).abs() < 1e-9)
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
        assert!(matches!(
            plan_with(50.2, 50.0),
            Err(AllocationError::TargetSumMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_fund_list_is_a_mismatch() {
        let err = allocate(&[], 1000.0).unwrap_err();
        assert_eq!(err, AllocationError::TargetSumMismatch { actual: 0.0 });
        assert_eq!(err.to_string(), "Total target must be 100%. Current: 0.00%");
    }

    #[test]
    fn test_invalid_contribution_is_treated_as_zero() {
        let funds = vec![fund("A", 0.0, 50.0), fund("B", 0.0, 50.0)];

        let plan = allocate(&funds, f64::NAN).unwrap();

        assert_eq!(amounts(&plan), vec![0, 0]);
        assert_eq!(plan.total_invested, 0);
    }
}
