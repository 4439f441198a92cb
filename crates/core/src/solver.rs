//! Inverse of the fee decomposition.
//!
//! Given the amount a buyer should pay, finds the amount the seller receives
//! whose fee breakdown reproduces it to the cent. The fee function is
//! piecewise-linear once the minimum-fee clamps kick in, so the solver seeds a
//! closed-form estimate and walks it one cent at a time.
//!
//! When the walk steps over the target (a lower candidate undershoots and the
//! next one overshoots), the target sits in a clamp gap: no received amount
//! maps onto it. The solver then keeps the undershooting candidate and puts
//! the missing cents on the marketplace fee.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fees::{FeeBreakdown, FeeSchedule};

/// Refinement steps allowed after the initial estimate.
pub const MAX_SOLVER_ITERATIONS: u32 = 10;

/// How a [`PriceSolution`] was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveOutcome {
    /// A received amount maps exactly onto the target.
    Exact,
    /// The target fell into a clamp gap; the residual was added to the marketplace fee.
    Corrected,
    /// No exact or corrected match. The breakdown is the last candidate tried.
    Approximate,
}

/// Result of [`FeeSchedule::solve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSolution {
    /// Buyer-paid amount that was requested.
    pub target: i64,
    /// Fee split of the chosen received amount.
    pub breakdown: FeeBreakdown,
    /// Whether the match is exact, corrected, or best-effort.
    pub outcome: SolveOutcome,
    /// Refinement steps taken after the initial estimate.
    pub iterations: u32,
}

impl PriceSolution {
    /// Returns true if the breakdown's buyer-paid amount equals the target.
    #[must_use]
    pub fn matches_target(&self) -> bool {
        !matches!(self.outcome, SolveOutcome::Approximate)
    }

    /// Amount the seller receives.
    #[must_use]
    pub fn received_amount(&self) -> i64 {
        self.breakdown.received_amount
    }
}

impl FeeSchedule {
    /// Finds the fee breakdown whose buyer-paid amount equals `target`.
    ///
    /// Never fails. Check [`PriceSolution::outcome`] to tell an exact or
    /// corrected match from a best-effort one.
    #[must_use]
    pub fn solve(&self, target: i64, publisher_fee_percent: Decimal) -> PriceSolution {
        let mut candidate = self.estimate_received(target, publisher_fee_percent);
        let mut ever_undershot = false;
        let mut iterations = 0;
        let mut breakdown = self.decompose(candidate, publisher_fee_percent);

        let outcome = loop {
            let paid = breakdown.buyer_paid_amount;
            if paid == target {
                break SolveOutcome::Exact;
            }
            if iterations >= MAX_SOLVER_ITERATIONS {
                break SolveOutcome::Approximate;
            }

            if paid > target {
                if ever_undershot {
                    // candidate - 1 is the last undershoot
                    breakdown = self
                        .decompose(candidate - 1, publisher_fee_percent)
                        .with_residual_fee(target);
                    break SolveOutcome::Corrected;
                }
                if candidate == 0 {
                    // below the cheapest possible listing
                    break SolveOutcome::Approximate;
                }
                candidate -= 1;
            } else {
                ever_undershot = true;
                candidate += 1;
            }

            breakdown = self.decompose(candidate, publisher_fee_percent);
            iterations += 1;

            tracing::debug!(
                target_paid = target,
                candidate,
                paid = breakdown.buyer_paid_amount,
                iterations,
                "price solver step"
            );
        };

        PriceSolution {
            target,
            breakdown,
            outcome,
            iterations,
        }
    }

    /// Closed-form estimate ignoring the fee clamps, truncated and clamped at zero.
    fn estimate_received(&self, target: i64, publisher_fee_percent: Decimal) -> i64 {
        let divisor = self
            .fee_percent()
            .saturating_add(publisher_fee_percent)
            .saturating_add(Decimal::ONE);
        let estimate = Decimal::from(target - self.base_fee()) / divisor;
        estimate.trunc().to_i64().unwrap_or(0).max(0)
    }
}
