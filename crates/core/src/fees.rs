//! Steam wallet fee arithmetic.
//!
//! All amounts are integer cents of the wallet currency. Fee rates are exact
//! decimals and every fee is floored back to whole cents before it is added
//! to an amount, matching the way the marketplace reconciles a listing.
//!
//! ```text
//! marketplace_fee = floor(max(received * fee_percent, fee_minimum) + fee_base)
//! publisher_fee   = floor(max(received * publisher_percent, 1))   if publisher_percent > 0
//! buyer_paid      = received + marketplace_fee + publisher_fee
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// =============================================================================
// Fee Constants
// =============================================================================

/// Default flat fee added to every sale, in cents.
pub const DEFAULT_FEE_BASE: i64 = 0;

/// Default marketplace fee rate (5%).
pub const DEFAULT_FEE_PERCENT: Decimal = dec!(0.05);

/// Default floor on the marketplace fee, in cents.
pub const DEFAULT_FEE_MINIMUM: i64 = 1;

/// Default publisher fee rate (10%).
pub const DEFAULT_PUBLISHER_FEE_PERCENT: Decimal = dec!(0.10);

/// Floor on the publisher fee whenever a publisher rate applies, in cents.
pub const PUBLISHER_FEE_MINIMUM: i64 = 1;

// =============================================================================
// Fee Schedule
// =============================================================================

/// Process-wide wallet fee settings. Read-only once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeSchedule {
    base_fee: i64,
    fee_percent: Decimal,
    fee_minimum: i64,
    default_publisher_fee_percent: Decimal,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            base_fee: DEFAULT_FEE_BASE,
            fee_percent: DEFAULT_FEE_PERCENT,
            fee_minimum: DEFAULT_FEE_MINIMUM,
            default_publisher_fee_percent: DEFAULT_PUBLISHER_FEE_PERCENT,
        }
    }
}

impl FeeSchedule {
    /// Creates a validated fee schedule.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a cent amount or a rate is negative.
    pub fn new(
        base_fee: i64,
        fee_percent: Decimal,
        fee_minimum: i64,
        default_publisher_fee_percent: Decimal,
    ) -> Result<Self, ConfigError> {
        let schedule = Self {
            base_fee,
            fee_percent,
            fee_minimum,
            default_publisher_fee_percent,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Checks every field of the schedule.
    ///
    /// # Errors
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_fee < 0 {
            return Err(ConfigError::NegativeAmount {
                field: "fee_base",
                value: self.base_fee,
            });
        }
        if self.fee_minimum < 0 {
            return Err(ConfigError::NegativeAmount {
                field: "fee_minimum",
                value: self.fee_minimum,
            });
        }
        check_rate("fee_percent", self.fee_percent)?;
        check_rate(
            "publisher_fee_percent_default",
            self.default_publisher_fee_percent,
        )
    }

    /// Validates a per-item publisher rate before it reaches the solver.
    ///
    /// # Errors
    /// Returns [`ConfigError::NegativePercent`] if the rate is negative.
    pub fn check_publisher_fee(publisher_fee_percent: Decimal) -> Result<(), ConfigError> {
        check_rate("publisher_fee_percent", publisher_fee_percent)
    }

    /// Flat fee added to every sale, in cents.
    #[must_use]
    pub fn base_fee(&self) -> i64 {
        self.base_fee
    }

    /// Marketplace fee rate.
    #[must_use]
    pub fn fee_percent(&self) -> Decimal {
        self.fee_percent
    }

    /// Floor on the marketplace fee, in cents.
    #[must_use]
    pub fn fee_minimum(&self) -> i64 {
        self.fee_minimum
    }

    /// Publisher rate used when an item does not carry its own.
    #[must_use]
    pub fn default_publisher_fee_percent(&self) -> Decimal {
        self.default_publisher_fee_percent
    }

    /// Computes what a buyer pays so that the seller receives `received_amount`.
    ///
    /// Pass `Decimal::ZERO` as `publisher_fee_percent` for items without a
    /// publisher royalty. `received_amount` must be non-negative.
    #[must_use]
    pub fn decompose(&self, received_amount: i64, publisher_fee_percent: Decimal) -> FeeBreakdown {
        debug_assert!(received_amount >= 0, "received amount must be non-negative");

        let received = Decimal::from(received_amount);

        let marketplace_fee = floor_cents(
            received
                .saturating_mul(self.fee_percent)
                .max(Decimal::from(self.fee_minimum))
                .saturating_add(Decimal::from(self.base_fee)),
        );

        let publisher_fee = if publisher_fee_percent > Decimal::ZERO {
            floor_cents(
                received
                    .saturating_mul(publisher_fee_percent)
                    .max(Decimal::from(PUBLISHER_FEE_MINIMUM)),
            )
        } else {
            0
        };

        let total_fees = marketplace_fee.saturating_add(publisher_fee);

        FeeBreakdown {
            received_amount,
            marketplace_fee,
            publisher_fee,
            total_fees,
            buyer_paid_amount: received_amount.saturating_add(total_fees),
        }
    }
}

fn check_rate(field: &'static str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO {
        return Err(ConfigError::NegativePercent { field, value });
    }
    Ok(())
}

/// Floors a non-negative decimal to whole cents. Saturates at `i64::MAX`.
fn floor_cents(value: Decimal) -> i64 {
    value.floor().to_i64().unwrap_or(i64::MAX)
}

// =============================================================================
// Fee Breakdown
// =============================================================================

/// Fee split for a single sale, all in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// Amount the seller receives.
    pub received_amount: i64,

    /// Marketplace cut.
    pub marketplace_fee: i64,

    /// Publisher royalty.
    pub publisher_fee: i64,

    /// `marketplace_fee + publisher_fee`.
    pub total_fees: i64,

    /// Amount the buyer pays, fees included.
    pub buyer_paid_amount: i64,
}

impl FeeBreakdown {
    /// Returns true if the amounts reconcile exactly.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.total_fees == self.marketplace_fee + self.publisher_fee
            && self.buyer_paid_amount == self.received_amount + self.total_fees
    }

    /// Moves the gap between this breakdown and `target` onto the marketplace
    /// fee so that the buyer pays exactly `target`.
    #[must_use]
    pub(crate) fn with_residual_fee(mut self, target: i64) -> Self {
        let residual = target - self.buyer_paid_amount;
        self.marketplace_fee += residual;
        self.total_fees += residual;
        self.buyer_paid_amount = target;
        self
    }
}
