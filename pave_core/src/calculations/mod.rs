//! # Estimating Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - a pure function `(input) -> Result<*Result, CalcError>`
//!
//! ## Available Calculations
//!
//! - [`sealcoat`] - Sealcoat materials, costs, logistics and coverage
//! - [`area`] - Area take-off from rectangular, triangular and circular sections
//! - [`cost_rollup`] - Overhead and profit applied to an estimate
//! - [`project_cost`] - Job pricing by project type and location

pub mod area;
pub mod cost_rollup;
pub mod project_cost;
pub mod sealcoat;

pub use area::{AreaInput, AreaResult};
pub use cost_rollup::{CostRollupInput, CostRollupResult};
pub use project_cost::{estimate_project, LocationFactor, ProjectCostInput, ProjectCostResult, ProjectType};
pub use sealcoat::{estimate, SealcoatInput, SealcoatResult};
