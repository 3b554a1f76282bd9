//! # Cost Roll-Up
//!
//! Applies overhead and profit margins to an estimate's direct cost to get a
//! selling price. Profit is taken on cost plus overhead.
//!
//! ```text
//! overhead = subtotal × overhead%
//! profit   = (subtotal + overhead) × profit%
//! total    = subtotal + overhead + profit
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pave_core::calculations::cost_rollup::{roll_up, CostRollupInput};
//! use pave_core::calculations::sealcoat::{estimate, SealcoatInput};
//! use pave_core::rates::RateConfig;
//!
//! let result = estimate(&SealcoatInput::new(5000.0), &RateConfig::default()).unwrap();
//! let price = roll_up(&CostRollupInput::from_estimate(5000.0, &result)).unwrap();
//! println!("Sell at ${:.2} (${:.3}/sq ft)", price.total, price.cost_per_sq_ft);
//! ```

use serde::{Deserialize, Serialize};

use super::sealcoat::SealcoatResult;
use crate::errors::{CalcError, CalcResult};
use crate::units::round2;

/// Default overhead margin (%). Suggested range 15–25.
pub const DEFAULT_OVERHEAD_PERCENT: f64 = 20.0;

/// Default profit margin (%). Suggested range 15–25.
pub const DEFAULT_PROFIT_PERCENT: f64 = 20.0;

/// Input parameters for a cost roll-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRollupInput {
    /// Direct job cost (materials + labor + fuel), USD
    pub direct_cost: f64,
    /// Area the price is spread over (sq ft)
    pub area_sq_ft: f64,
    /// Overhead margin (%), 0–100
    #[serde(default = "default_overhead")]
    pub overhead_percent: f64,
    /// Profit margin (%), 0–100
    #[serde(default = "default_profit")]
    pub profit_percent: f64,
}

fn default_overhead() -> f64 {
    DEFAULT_OVERHEAD_PERCENT
}

fn default_profit() -> f64 {
    DEFAULT_PROFIT_PERCENT
}

impl CostRollupInput {
    /// Build a roll-up over an estimate's total project cost with default margins.
    pub fn from_estimate(area_sq_ft: f64, result: &SealcoatResult) -> Self {
        CostRollupInput {
            direct_cost: result.costs.total_project,
            area_sq_ft,
            overhead_percent: DEFAULT_OVERHEAD_PERCENT,
            profit_percent: DEFAULT_PROFIT_PERCENT,
        }
    }

    /// Override the margins.
    pub fn with_margins(mut self, overhead_percent: f64, profit_percent: f64) -> Self {
        self.overhead_percent = overhead_percent;
        self.profit_percent = profit_percent;
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.direct_cost.is_finite() && self.direct_cost >= 0.0) {
            return Err(CalcError::invalid_input(
                "direct_cost",
                self.direct_cost.to_string(),
                "Direct cost cannot be negative",
            ));
        }
        if !(self.area_sq_ft.is_finite() && self.area_sq_ft > 0.0) {
            return Err(CalcError::invalid_input(
                "area_sq_ft",
                self.area_sq_ft.to_string(),
                "Area must be positive",
            ));
        }
        for (field, value) in [
            ("overhead_percent", self.overhead_percent),
            ("profit_percent", self.profit_percent),
        ] {
            if !(value.is_finite() && (0.0..=100.0).contains(&value)) {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Margin must be between 0 and 100 percent",
                ));
            }
        }
        Ok(())
    }
}

/// Results from a cost roll-up (USD).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRollupResult {
    pub subtotal: f64,
    pub overhead: f64,
    pub profit: f64,
    pub total: f64,
    /// Selling price per sq ft, rounded to a tenth of a cent
    pub cost_per_sq_ft: f64,
}

/// Apply overhead and profit to a direct cost.
pub fn roll_up(input: &CostRollupInput) -> CalcResult<CostRollupResult> {
    input.validate()?;

    let subtotal = input.direct_cost;
    let overhead = subtotal * (input.overhead_percent / 100.0);
    let profit = (subtotal + overhead) * (input.profit_percent / 100.0);
    let total = subtotal + overhead + profit;
    let per_sq_ft = total / input.area_sq_ft;

    Ok(CostRollupResult {
        subtotal: round2(subtotal),
        overhead: round2(overhead),
        profit: round2(profit),
        total: round2(total),
        cost_per_sq_ft: (per_sq_ft * 1000.0).round() / 1000.0,
    })
}
