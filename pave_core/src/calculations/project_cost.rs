//! # Project Cost Estimate
//!
//! Quick pricing for any pavement job type from a base rate per unit, a
//! location factor, crew productivity and equipment hourly rates. The direct
//! cost is then marked up through [`roll_up`].
//!
//! ```text
//! material/unit = base rate × 0.4 × location factor
//! labor hours   = size × productivity (hr/unit)
//! equipment     = labor hours × equipment rate
//! subtotal      = materials + labor + equipment
//! ```
//!
//! Size is in square feet for area work and linear feet for striping and
//! crack sealing.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::calculations::project_cost::{estimate_project, LocationFactor, ProjectCostInput, ProjectType};
//!
//! let input = ProjectCostInput::new(ProjectType::Sealcoat, 10000.0, LocationFactor::Suburban);
//! let result = estimate_project(&input).unwrap();
//!
//! assert_eq!(result.subtotal, 2000.0);
//! assert_eq!(result.pricing.total, 2760.0);
//! ```

use serde::{Deserialize, Serialize};

use super::cost_rollup::{roll_up, CostRollupInput, CostRollupResult};
use crate::errors::{CalcError, CalcResult};
use crate::units::round2;

/// Default crew base rate (USD/hr)
pub const DEFAULT_LABOR_RATE: f64 = 25.0;

/// Default overhead for project pricing (%)
pub const DEFAULT_PROJECT_OVERHEAD_PERCENT: f64 = 15.0;

/// Default profit for project pricing (%)
pub const DEFAULT_PROJECT_PROFIT_PERCENT: f64 = 20.0;

/// Share of the base rate that is material
const MATERIAL_SHARE: f64 = 0.4;

/// Kind of pavement work being priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    Sealcoat,
    Striping,
    CrackSeal,
    Paving,
    Resurfacing,
    FullDepth,
}

impl ProjectType {
    pub const ALL: [ProjectType; 6] = [
        ProjectType::Sealcoat,
        ProjectType::Striping,
        ProjectType::CrackSeal,
        ProjectType::Paving,
        ProjectType::Resurfacing,
        ProjectType::FullDepth,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProjectType::Sealcoat => "Sealcoating",
            ProjectType::Striping => "Line Striping",
            ProjectType::CrackSeal => "Crack Sealing",
            ProjectType::Paving => "Asphalt Paving",
            ProjectType::Resurfacing => "Resurfacing",
            ProjectType::FullDepth => "Full Depth Reclamation",
        }
    }

    /// All-in price per unit before location adjustment (USD)
    pub fn base_rate(&self) -> f64 {
        match self {
            ProjectType::Sealcoat => 0.15,
            ProjectType::Striping => 1.25,
            ProjectType::CrackSeal => 0.85,
            ProjectType::Paving => 3.50,
            ProjectType::Resurfacing => 2.25,
            ProjectType::FullDepth => 4.75,
        }
    }

    /// Crew hours per unit of size
    pub fn hours_per_unit(&self) -> f64 {
        match self {
            ProjectType::Sealcoat => 0.002,
            ProjectType::Striping => 0.003,
            ProjectType::CrackSeal => 0.004,
            ProjectType::Paving => 0.005,
            ProjectType::Resurfacing => 0.004,
            ProjectType::FullDepth => 0.008,
        }
    }

    /// Equipment cost per crew hour (USD)
    pub fn equipment_hourly_rate(&self) -> f64 {
        match self {
            ProjectType::Sealcoat => 45.0,
            ProjectType::Striping => 35.0,
            ProjectType::CrackSeal => 55.0,
            ProjectType::Paving => 125.0,
            ProjectType::Resurfacing => 110.0,
            ProjectType::FullDepth => 180.0,
        }
    }

    pub fn size_unit(&self) -> &'static str {
        match self {
            ProjectType::Striping | ProjectType::CrackSeal => "linear ft",
            _ => "sq ft",
        }
    }

    /// Typical material list as (name, unit, unit cost, quantity for `size`).
    fn material_list(&self, size: f64) -> Vec<(&'static str, &'static str, f64, f64)> {
        match self {
            ProjectType::Sealcoat => vec![
                ("Sealcoat Material", "gallons", 2.75, size / 90.0),
                ("Sand Additive", "bags", 12.50, size / 500.0),
                ("Primer/Cleaner", "gallons", 15.00, size / 1000.0),
            ],
            ProjectType::Striping => vec![
                ("Traffic Paint", "gallons", 28.75, size / 350.0),
                ("Glass Beads", "bags", 45.00, size / 1000.0),
                ("Primer", "gallons", 22.00, size / 2000.0),
            ],
            ProjectType::CrackSeal => vec![
                ("Hot Pour Sealant", "bags", 45.50, size / 175.0),
                ("Cleaning Materials", "lot", 25.00, 1.0),
            ],
            ProjectType::Paving => vec![
                ("Hot Mix Asphalt", "tons", 95.00, size * 0.25),
                ("Tack Coat", "gallons", 3.25, size / 300.0),
                ("Joint Sealant", "lot", 150.00, 1.0),
            ],
            ProjectType::Resurfacing | ProjectType::FullDepth => Vec::new(),
        }
    }

    /// Share of crew hours by role.
    fn crew_mix(&self) -> &'static [(CrewRole, f64)] {
        match self {
            ProjectType::Sealcoat => &[
                (CrewRole::Foreman, 0.15),
                (CrewRole::EquipmentOperator, 0.30),
                (CrewRole::GeneralLabor, 0.55),
            ],
            ProjectType::Striping => &[
                (CrewRole::Foreman, 0.20),
                (CrewRole::StripingOperator, 0.40),
                (CrewRole::Helper, 0.40),
            ],
            ProjectType::Paving => &[
                (CrewRole::Foreman, 0.10),
                (CrewRole::PaverOperator, 0.15),
                (CrewRole::RollerOperator, 0.20),
                (CrewRole::GeneralLabor, 0.55),
            ],
            _ => &[(CrewRole::Foreman, 0.20), (CrewRole::GeneralLabor, 0.80)],
        }
    }
}

/// Regional cost adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationFactor {
    Urban,
    Suburban,
    Rural,
    Highway,
}

impl LocationFactor {
    pub fn label(&self) -> &'static str {
        match self {
            LocationFactor::Urban => "Urban Area",
            LocationFactor::Suburban => "Suburban Area",
            LocationFactor::Rural => "Rural Area",
            LocationFactor::Highway => "Highway/Interstate",
        }
    }

    pub fn factor(&self) -> f64 {
        match self {
            LocationFactor::Urban => 1.15,
            LocationFactor::Suburban => 1.0,
            LocationFactor::Rural => 0.85,
            LocationFactor::Highway => 1.25,
        }
    }
}

/// Crew position, paid at a multiple of the base labor rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrewRole {
    Foreman,
    EquipmentOperator,
    PaverOperator,
    RollerOperator,
    StripingOperator,
    GeneralLabor,
    Helper,
}

impl CrewRole {
    pub fn label(&self) -> &'static str {
        match self {
            CrewRole::Foreman => "Foreman",
            CrewRole::EquipmentOperator => "Equipment Operator",
            CrewRole::PaverOperator => "Paver Operator",
            CrewRole::RollerOperator => "Roller Operator",
            CrewRole::StripingOperator => "Striping Operator",
            CrewRole::GeneralLabor => "General Labor",
            CrewRole::Helper => "Helper",
        }
    }

    pub fn rate_multiplier(&self) -> f64 {
        match self {
            CrewRole::Foreman => 1.4,
            CrewRole::EquipmentOperator => 1.2,
            CrewRole::PaverOperator => 1.3,
            CrewRole::RollerOperator => 1.2,
            CrewRole::StripingOperator => 1.1,
            CrewRole::GeneralLabor => 1.0,
            CrewRole::Helper => 0.9,
        }
    }
}

/// Input parameters for a project cost estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "project_type": "crack-seal",
///   "size": 1200.0,
///   "location": "rural",
///   "labor_rate": 25.0,
///   "overhead_percent": 15.0,
///   "profit_percent": 20.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCostInput {
    pub project_type: ProjectType,
    /// Job size in the project type's unit (sq ft or linear ft)
    pub size: f64,
    pub location: LocationFactor,
    /// Base crew rate (USD/hr)
    #[serde(default = "default_labor_rate")]
    pub labor_rate: f64,
    #[serde(default = "default_overhead")]
    pub overhead_percent: f64,
    #[serde(default = "default_profit")]
    pub profit_percent: f64,
}

fn default_labor_rate() -> f64 {
    DEFAULT_LABOR_RATE
}

fn default_overhead() -> f64 {
    DEFAULT_PROJECT_OVERHEAD_PERCENT
}

fn default_profit() -> f64 {
    DEFAULT_PROJECT_PROFIT_PERCENT
}

impl ProjectCostInput {
    pub fn new(project_type: ProjectType, size: f64, location: LocationFactor) -> Self {
        ProjectCostInput {
            project_type,
            size,
            location,
            labor_rate: DEFAULT_LABOR_RATE,
            overhead_percent: DEFAULT_PROJECT_OVERHEAD_PERCENT,
            profit_percent: DEFAULT_PROJECT_PROFIT_PERCENT,
        }
    }

    pub fn with_labor_rate(mut self, labor_rate: f64) -> Self {
        self.labor_rate = labor_rate;
        self
    }

    pub fn with_margins(mut self, overhead_percent: f64, profit_percent: f64) -> Self {
        self.overhead_percent = overhead_percent;
        self.profit_percent = profit_percent;
        self
    }

    /// Validate input parameters. Margins are checked by the roll-up.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(CalcError::invalid_input(
                "size",
                self.size.to_string(),
                "Project size must be positive",
            ));
        }
        if !(self.labor_rate.is_finite() && self.labor_rate >= 0.0) {
            return Err(CalcError::invalid_input(
                "labor_rate",
                self.labor_rate.to_string(),
                "Labor rate cannot be negative",
            ));
        }
        Ok(())
    }
}

/// One line of the typical material list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_cost: f64,
    pub total: f64,
}

/// Crew hours and cost for one role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborLine {
    pub role: CrewRole,
    pub hours: f64,
    /// Base rate × role multiplier (USD/hr)
    pub rate: f64,
    pub total: f64,
}

/// Results from a project cost estimate (USD unless noted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCostResult {
    /// Material cost per unit of size after the location factor
    pub material_cost_per_unit: f64,
    pub materials: f64,
    pub labor_hours: f64,
    pub labor: f64,
    pub equipment: f64,
    /// Materials + labor + equipment
    pub subtotal: f64,
    /// Overhead, profit and selling price
    pub pricing: CostRollupResult,
    /// Typical material list for the job type; empty for resurfacing and
    /// full-depth work. Totals are list prices and do not sum to `materials`.
    pub material_breakdown: Vec<MaterialLine>,
    pub labor_breakdown: Vec<LaborLine>,
}

/// Price a job by project type, size and location.
///
/// # Returns
///
/// * `Ok(ProjectCostResult)` - Direct costs, breakdowns and marked-up price
/// * `Err(CalcError::InvalidInput)` - Non-positive size, negative labor rate,
///   or a margin outside 0–100 %
pub fn estimate_project(input: &ProjectCostInput) -> CalcResult<ProjectCostResult> {
    input.validate()?;

    let kind = input.project_type;
    let size = input.size;

    let material_cost_per_unit = kind.base_rate() * MATERIAL_SHARE * input.location.factor();
    let materials = size * material_cost_per_unit;

    let labor_hours = size * kind.hours_per_unit();
    let labor = labor_hours * input.labor_rate;
    let equipment = labor_hours * kind.equipment_hourly_rate();
    let subtotal = materials + labor + equipment;

    let pricing = roll_up(&CostRollupInput {
        direct_cost: subtotal,
        area_sq_ft: size,
        overhead_percent: input.overhead_percent,
        profit_percent: input.profit_percent,
    })?;

    let material_breakdown = kind
        .material_list(size)
        .into_iter()
        .map(|(name, unit, unit_cost, quantity)| MaterialLine {
            name: name.to_string(),
            quantity: round2(quantity),
            unit: unit.to_string(),
            unit_cost,
            total: round2(quantity * unit_cost),
        })
        .collect();

    let labor_breakdown = kind
        .crew_mix()
        .iter()
        .map(|&(role, share)| {
            let hours = labor_hours * share;
            let rate = input.labor_rate * role.rate_multiplier();
            LaborLine {
                role,
                hours: round2(hours),
                rate: round2(rate),
                total: round2(hours * rate),
            }
        })
        .collect();

    tracing::debug!(
        project_type = kind.label(),
        size,
        subtotal,
        total = pricing.total,
        "project cost computed"
    );

    Ok(ProjectCostResult {
        material_cost_per_unit: round2(material_cost_per_unit),
        materials: round2(materials),
        labor_hours: round2(labor_hours),
        labor: round2(labor),
        equipment: round2(equipment),
        subtotal: round2(subtotal),
        pricing,
        material_breakdown,
        labor_breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sealcoat_suburban() {
        let input = ProjectCostInput::new(ProjectType::Sealcoat, 10000.0, LocationFactor::Suburban);
        let result = estimate_project(&input).unwrap();

        // 0.15 × 0.4 × 1.0 = 0.06/sq ft
        assert_eq!(result.materials, 600.0);
        assert_eq!(result.labor_hours, 20.0);
        assert_eq!(result.labor, 500.0);
        assert_eq!(result.equipment, 900.0);
        assert_eq!(result.subtotal, 2000.0);

        assert_eq!(result.pricing.overhead, 300.0);
        assert_eq!(result.pricing.profit, 460.0);
        assert_eq!(result.pricing.total, 2760.0);
        assert_eq!(result.pricing.cost_per_sq_ft, 0.276);
    }

    #[test]
    fn test_location_factor_scales_materials_only() {
        let base = ProjectCostInput::new(ProjectType::Paving, 1000.0, LocationFactor::Suburban);
        let urban = ProjectCostInput::new(ProjectType::Paving, 1000.0, LocationFactor::Urban);

        let base = estimate_project(&base).unwrap();
        let urban = estimate_project(&urban).unwrap();

        assert_eq!(base.materials, 1400.0);
        assert_eq!(urban.materials, 1610.0);
        assert_eq!(urban.labor, base.labor);
        assert_eq!(urban.equipment, base.equipment);
    }

    #[test]
    fn test_sealcoat_material_breakdown() {
        let input = ProjectCostInput::new(ProjectType::Sealcoat, 9000.0, LocationFactor::Rural);
        let result = estimate_project(&input).unwrap();

        let names: Vec<&str> = result.material_breakdown.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Sealcoat Material", "Sand Additive", "Primer/Cleaner"]);

        let sealer = &result.material_breakdown[0];
        assert_eq!(sealer.quantity, 100.0);
        assert_eq!(sealer.total, 275.0);
        assert_eq!(result.material_breakdown[1].quantity, 18.0);
    }

    #[test]
    fn test_no_material_list_for_reclamation() {
        for kind in [ProjectType::Resurfacing, ProjectType::FullDepth] {
            let result = estimate_project(&ProjectCostInput::new(kind, 5000.0, LocationFactor::Highway)).unwrap();
            assert!(result.material_breakdown.is_empty());
            assert!(result.materials > 0.0);
        }
    }

    #[test]
    fn test_labor_breakdown_by_role() {
        let input = ProjectCostInput::new(ProjectType::Sealcoat, 10000.0, LocationFactor::Suburban);
        let result = estimate_project(&input).unwrap();

        let foreman = &result.labor_breakdown[0];
        assert_eq!(foreman.role, CrewRole::Foreman);
        assert_eq!(foreman.hours, 3.0);
        assert_eq!(foreman.rate, 35.0);
        assert_eq!(foreman.total, 105.0);

        let hours: f64 = result.labor_breakdown.iter().map(|l| l.hours).sum();
        assert!((hours - result.labor_hours).abs() < 1e-9);
    }

    #[test]
    fn test_default_crew_mix() {
        let input = ProjectCostInput::new(ProjectType::CrackSeal, 1000.0, LocationFactor::Suburban);
        let result = estimate_project(&input).unwrap();

        let roles: Vec<CrewRole> = result.labor_breakdown.iter().map(|l| l.role).collect();
        assert_eq!(roles, vec![CrewRole::Foreman, CrewRole::GeneralLabor]);
        assert_eq!(result.labor_breakdown[1].hours, 3.2);
    }

    #[test]
    fn test_invalid_inputs() {
        let bad_size = ProjectCostInput::new(ProjectType::Striping, 0.0, LocationFactor::Urban);
        assert_eq!(estimate_project(&bad_size).unwrap_err().error_code(), "INVALID_INPUT");

        let bad_rate = ProjectCostInput::new(ProjectType::Striping, 500.0, LocationFactor::Urban).with_labor_rate(-1.0);
        assert!(estimate_project(&bad_rate).is_err());

        let bad_margin =
            ProjectCostInput::new(ProjectType::Striping, 500.0, LocationFactor::Urban).with_margins(150.0, 20.0);
        assert!(estimate_project(&bad_margin).is_err());
    }

    #[test]
    fn test_every_project_type_prices() {
        for kind in ProjectType::ALL {
            let result = estimate_project(&ProjectCostInput::new(kind, 2500.0, LocationFactor::Suburban)).unwrap();
            assert!(result.pricing.total > result.subtotal, "{}", kind.label());
        }
    }

    #[test]
    fn test_json_input() {
        let parsed: ProjectCostInput =
            serde_json::from_str(r#"{ "project_type": "full-depth", "size": 800.0, "location": "highway" }"#)
                .unwrap();
        assert_eq!(parsed.project_type, ProjectType::FullDepth);
        assert_eq!(parsed.location, LocationFactor::Highway);
        assert_eq!(parsed.labor_rate, 25.0);
        assert_eq!(parsed.overhead_percent, 15.0);
    }
}
