//! # pave_core - Sealcoat Estimation Engine
//!
//! `pave_core` turns a pavement area and a handful of job options into
//! material quantities, costs, crew time and hauling checks for an
//! asphalt-maintenance contractor. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **Injected rates**: Prices and equipment limits are passed in, never read
//!   from globals inside a calculation
//! - **Round at the edge**: Full precision internally, two decimals on output
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use pave_core::{estimate, RateConfig, SealcoatInput};
//!
//! let input = SealcoatInput::new(5000.0);
//! let result = estimate(&input, &RateConfig::default()).unwrap();
//!
//! assert_eq!(result.materials.sand_bags, 5);
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Sealcoat estimate, area take-off, cost roll-up,
//!   project-type pricing
//! - [`rates`] - Rate configuration and hot-swappable shared snapshot
//! - [`form`] - Text form fields to engine input
//! - [`quote`] - Customer quotes built from an estimate
//! - [`pdf`] - Quote PDF rendering
//! - [`file_io`] - Rate file loading and atomic saves
//! - [`units`] - Unit wrappers and rounding
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod form;
pub mod pdf;
pub mod quote;
pub mod rates;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::sealcoat::{estimate, SealcoatInput, SealcoatResult};
pub use errors::{CalcError, CalcResult, ValidationReason};
pub use file_io::{load_rates, save_rates};
pub use quote::{CustomerInfo, Quote};
pub use rates::{RateConfig, SharedRates, DEFAULT_RATES};
