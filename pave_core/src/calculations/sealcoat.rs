//! # Sealcoat Estimate
//!
//! Converts a pavement area into sealer, sand, water and additive quantities,
//! then prices them and checks whether the load can be hauled legally.
//!
//! ## Pipeline
//!
//! Each stage reads only the outputs of earlier stages:
//!
//! 1. Undiluted sealer per coat
//! 2. Sand (lbs, 50 lb bags)
//! 3. Polymer additive (gal, 5 gal buckets)
//! 4. Water, as a share of the *finished* mix
//! 5. Total mix volume, including sand displacement
//! 6. Oil-spot primer buckets
//! 7. Material costs
//! 8. Labor hours and cost
//! 9. Round-trip fuel cost
//! 10. Project total
//! 11. Tank loads, work days, truck weight vs. GVWR
//! 12. Coverage per coat and per gallon of mix
//!
//! Arithmetic runs at full precision; values are rounded to two decimals only
//! when the [`SealcoatResult`] is assembled.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::calculations::sealcoat::{estimate, SealcoatInput};
//! use pave_core::rates::RateConfig;
//!
//! let input = SealcoatInput::new(5000.0).with_second_coat();
//! let result = estimate(&input, &RateConfig::default()).unwrap();
//!
//! assert_eq!(result.materials.total_undiluted_gallons, 127.5);
//! println!("Total: ${:.2}", result.costs.total_project);
//! println!("Within GVWR: {}", result.logistics.truck_weight.within_gvwr);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult, ValidationReason};
use crate::rates::RateConfig;
use crate::units::{containers_needed, round2, Gallons, Miles, SqFt};

/// Default first-coat rate, undiluted gal per sq ft
pub const DEFAULT_FIRST_COAT_RATE: f64 = 0.0144;

/// Default rate for the second and third coats, undiluted gal per sq ft
pub const DEFAULT_FOLLOW_COAT_RATE: f64 = 0.0111;

/// Default sand loading, lbs per gallon of concentrate
pub const DEFAULT_SAND_LBS_PER_GALLON: f64 = 3.0;

/// Default polymer share of the concentrate (%)
pub const DEFAULT_POLYMER_PERCENT: f64 = 3.0;

/// Default water share of the finished mix (%)
pub const DEFAULT_WATER_PERCENT: f64 = 20.0;

/// Which optional coats are applied. The first coat always runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoatSelection {
    pub second: bool,
    pub third: bool,
}

impl CoatSelection {
    /// Enabled flags indexed first..third
    pub fn enabled(&self) -> [bool; 3] {
        [true, self.second, self.third]
    }
}

/// Undiluted sealer application rate per coat (gal/sq ft).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageRates {
    pub first: f64,
    pub second: f64,
    pub third: f64,
}

impl CoverageRates {
    /// Rates indexed first..third
    pub fn as_array(&self) -> [f64; 3] {
        [self.first, self.second, self.third]
    }
}

impl Default for CoverageRates {
    fn default() -> Self {
        CoverageRates {
            first: DEFAULT_FIRST_COAT_RATE,
            second: DEFAULT_FOLLOW_COAT_RATE,
            third: DEFAULT_FOLLOW_COAT_RATE,
        }
    }
}

/// Sand added to the concentrate before dilution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandOption {
    pub enabled: bool,
    pub lbs_per_gallon: f64,
}

impl Default for SandOption {
    fn default() -> Self {
        SandOption {
            enabled: true,
            lbs_per_gallon: DEFAULT_SAND_LBS_PER_GALLON,
        }
    }
}

/// Fast-dry polymer additive, as a percentage of the concentrate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolymerOption {
    pub enabled: bool,
    pub percent_of_mix: f64,
}

impl Default for PolymerOption {
    fn default() -> Self {
        PolymerOption {
            enabled: false,
            percent_of_mix: DEFAULT_POLYMER_PERCENT,
        }
    }
}

/// Input parameters for a sealcoat estimate.
///
/// Only `area_sq_ft` is required; every other field has a default.
///
/// ## JSON Example
///
/// ```json
/// {
///   "area_sq_ft": 5000.0,
///   "coats": { "second": true, "third": false },
///   "coverage_rates": { "first": 0.0144, "second": 0.0111, "third": 0.0111 },
///   "sand": { "enabled": true, "lbs_per_gallon": 3.0 },
///   "polymer": { "enabled": false, "percent_of_mix": 3.0 },
///   "water_percent": 20.0,
///   "oil_spot_count": 12,
///   "distance_miles": 18.5,
///   "job_location": "Patrick County Library lot"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SealcoatInput {
    /// Pavement area (sq ft). Required and must be positive.
    pub area_sq_ft: Option<f64>,

    /// Optional second/third coats
    pub coats: CoatSelection,

    /// Undiluted sealer per sq ft for each coat
    pub coverage_rates: CoverageRates,

    /// Sand loading
    pub sand: SandOption,

    /// Polymer additive
    pub polymer: PolymerOption,

    /// Water as a percentage of the finished mix, below 100. Negative counts as 0.
    pub water_percent: f64,

    /// Number of oil spots to prime
    pub oil_spot_count: u32,

    /// One-way distance from the yard to the job (mi)
    pub distance_miles: f64,

    /// Free-text job location, carried through to quotes
    pub job_location: String,
}

impl Default for SealcoatInput {
    fn default() -> Self {
        SealcoatInput {
            area_sq_ft: None,
            coats: CoatSelection::default(),
            coverage_rates: CoverageRates::default(),
            sand: SandOption::default(),
            polymer: PolymerOption::default(),
            water_percent: DEFAULT_WATER_PERCENT,
            oil_spot_count: 0,
            distance_miles: 0.0,
            job_location: String::new(),
        }
    }
}

impl SealcoatInput {
    /// Create an input with the given area and all defaults.
    pub fn new(area_sq_ft: f64) -> Self {
        SealcoatInput {
            area_sq_ft: Some(area_sq_ft),
            ..SealcoatInput::default()
        }
    }

    /// Enable the second coat.
    pub fn with_second_coat(mut self) -> Self {
        self.coats.second = true;
        self
    }

    /// Enable the third coat.
    pub fn with_third_coat(mut self) -> Self {
        self.coats.third = true;
        self
    }

    /// Enable polymer at the given percentage.
    pub fn with_polymer(mut self, percent_of_mix: f64) -> Self {
        self.polymer = PolymerOption {
            enabled: true,
            percent_of_mix,
        };
        self
    }

    /// Turn sand off.
    pub fn without_sand(mut self) -> Self {
        self.sand.enabled = false;
        self
    }

    /// Set the water percentage.
    pub fn with_water_percent(mut self, water_percent: f64) -> Self {
        self.water_percent = water_percent;
        self
    }

    /// Set the number of oil spots to prime.
    pub fn with_oil_spots(mut self, count: u32) -> Self {
        self.oil_spot_count = count;
        self
    }

    /// Set the one-way travel distance.
    pub fn with_distance(mut self, miles: f64) -> Self {
        self.distance_miles = miles;
        self
    }

    /// Validate input parameters, returning the area on success.
    pub fn validate(&self) -> CalcResult<f64> {
        let area = match self.area_sq_ft {
            Some(a) if a.is_finite() && a > 0.0 => a,
            _ => {
                return Err(CalcError::validation(
                    "area_sq_ft",
                    ValidationReason::MissingOrNonpositiveArea,
                ))
            }
        };

        let water = self.water_percent;
        if !water.is_finite() || water >= 100.0 {
            return Err(CalcError::validation(
                "water_percent",
                ValidationReason::WaterPercentOutOfRange,
            ));
        }

        Ok(area)
    }
}

/// Material quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialQuantities {
    /// Undiluted sealer for the first coat (gal)
    pub first_coat_gallons: f64,
    /// Undiluted sealer for the second coat (gal)
    pub second_coat_gallons: f64,
    /// Undiluted sealer for the third coat (gal)
    pub third_coat_gallons: f64,
    /// Sum of all coats (gal)
    pub total_undiluted_gallons: f64,
    /// Sand (lb)
    pub sand_lbs: f64,
    /// Sand bags to buy
    pub sand_bags: u64,
    /// Water (gal)
    pub water_gallons: f64,
    /// Polymer additive (gal)
    pub polymer_gallons: f64,
    /// Polymer buckets to buy
    pub polymer_buckets: u64,
    /// Oil-spot primer buckets to buy
    pub oil_spot_primer_buckets: u64,
    /// Finished mix, including water, additive and sand displacement (gal)
    pub total_mix_gallons: f64,
}

/// Cost breakdown (USD).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub sealer: f64,
    pub sand: f64,
    /// Water is not billed; always zero
    pub water: f64,
    pub polymer: f64,
    pub oil_spot_primer: f64,
    /// Sum of all material lines
    pub material_subtotal: f64,
    pub labor: f64,
    pub fuel: f64,
    /// Materials + labor + fuel
    pub total_project: f64,
}

/// Loaded truck weight check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckWeight {
    /// Truck + sealing machine + sealer (lb)
    pub total_weight_lbs: f64,
    /// `total_weight_lbs <= gvwr_limit_lbs`
    pub within_gvwr: bool,
    /// Empty when within the limit
    pub warning: String,
}

/// Crew time and hauling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logistics {
    /// Application plus prep time (hr)
    pub total_hours: f64,
    /// Work days needed
    pub work_days: u64,
    /// Machine tank fills needed
    pub tank_loads: u64,
    /// Round-trip fuel (gal)
    pub fuel_gallons: f64,
    pub truck_weight: TruckWeight,
}

/// Area covered by each coat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub first_coat_sq_ft: f64,
    pub second_coat_sq_ft: f64,
    pub third_coat_sq_ft: f64,
    /// Coated area across all coats per gallon of finished mix
    pub avg_sq_ft_per_gallon: f64,
}

/// Results from a sealcoat estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "materials": { "total_undiluted_gallons": 72.0, "sand_bags": 5, "total_mix_gallons": 92.16, "...": "..." },
///   "costs": { "material_subtotal": 322.88, "labor": 90.0, "fuel": 0.0, "total_project": 412.88, "...": "..." },
///   "logistics": { "total_hours": 2.0, "work_days": 1, "tank_loads": 1, "...": "..." },
///   "coverage": { "first_coat_sq_ft": 5000.0, "avg_sq_ft_per_gallon": 54.25, "...": "..." }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SealcoatResult {
    pub materials: MaterialQuantities,
    pub costs: CostBreakdown,
    pub logistics: Logistics,
    pub coverage: Coverage,
}

impl SealcoatResult {
    /// Number of coats that were applied
    pub fn coats_applied(&self) -> usize {
        [
            self.coverage.first_coat_sq_ft,
            self.coverage.second_coat_sq_ft,
            self.coverage.third_coat_sq_ft,
        ]
        .iter()
        .filter(|sq_ft| **sq_ft > 0.0)
        .count()
    }

    /// True if the loaded truck is within its weight rating
    pub fn within_gvwr(&self) -> bool {
        self.logistics.truck_weight.within_gvwr
    }
}

/// Optional quantities that are NaN, infinite or negative count as zero.
fn non_negative_or_zero(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Run a sealcoat estimate.
///
/// # Arguments
///
/// * `input` - Job parameters
/// * `rates` - Prices, mix constants and equipment limits
///
/// # Returns
///
/// * `Ok(SealcoatResult)` - Quantities, costs, logistics and coverage
/// * `Err(CalcError::Validation)` - Area missing or not positive, or water
///   percentage at or above 100
/// * `Err(CalcError::InvalidInput)` - `rates` has a zero divisor or a negative price
pub fn estimate(input: &SealcoatInput, rates: &RateConfig) -> CalcResult<SealcoatResult> {
    let area = input.validate()?;
    rates.validate()?;

    // 1. Undiluted sealer per coat
    let enabled = input.coats.enabled();
    let coat_rates = input.coverage_rates.as_array();
    let mut coat_gallons = [0.0_f64; 3];
    for (n, gallons) in coat_gallons.iter_mut().enumerate() {
        if enabled[n] {
            *gallons = area * non_negative_or_zero(coat_rates[n]);
        }
    }
    let total_undiluted: f64 = coat_gallons.iter().sum();
    let coat_ran = coat_gallons.map(|g| g > 0.0);

    // 2. Sand
    let sand_lbs = if input.sand.enabled {
        total_undiluted * non_negative_or_zero(input.sand.lbs_per_gallon)
    } else {
        0.0
    };
    let sand_bags = containers_needed(sand_lbs, rates.mix.sand_bag_lbs);

    // 3. Polymer
    let polymer_gallons = if input.polymer.enabled {
        total_undiluted * (non_negative_or_zero(input.polymer.percent_of_mix) / 100.0)
    } else {
        0.0
    };
    let polymer_buckets = containers_needed(polymer_gallons, rates.mix.polymer_bucket_gallons);

    // 4. Water: water / (water + concentrate) = w
    let water_fraction = non_negative_or_zero(input.water_percent) / 100.0;
    let water_gallons = total_undiluted * (water_fraction / (1.0 - water_fraction));

    // 5. Mix volume
    let sand_displacement = sand_lbs / rates.mix.sand_lbs_per_displaced_gallon;
    let total_mix = total_undiluted + water_gallons + polymer_gallons + sand_displacement;

    // 6. Oil-spot primer
    let primer_buckets = containers_needed(
        f64::from(input.oil_spot_count),
        rates.mix.oil_spots_per_primer_bucket,
    );

    // 7. Material costs
    let prices = &rates.materials;
    let sealer_cost = total_undiluted * prices.concentrate_per_gallon;
    let sand_cost = sand_bags as f64 * prices.sand_per_bag;
    let water_cost = 0.0;
    let polymer_cost = polymer_buckets as f64 * prices.polymer_per_bucket;
    let primer_cost = primer_buckets as f64 * prices.primer_per_bucket;
    let material_subtotal = sealer_cost + sand_cost + water_cost + polymer_cost + primer_cost;

    // 8. Labor
    let throughput = rates.labor.coat_throughput_sq_ft_per_hr;
    let mut total_hours = rates.labor.prep_hours;
    for n in 0..3 {
        if coat_ran[n] {
            total_hours += area / throughput[n];
        }
    }
    let labor_cost = total_hours * rates.labor.blended_hourly_rate;

    // 9. Fuel
    let round_trip = Miles(non_negative_or_zero(input.distance_miles)).round_trip();
    let fuel_gallons = round_trip.value() / rates.fuel.truck_mpg;
    let fuel_cost = fuel_gallons * rates.fuel.price_per_gallon;

    // 10. Total
    let total_project = material_subtotal + labor_cost + fuel_cost;

    // 11. Logistics
    let tank_loads = containers_needed(total_mix, rates.equipment.tank_capacity_gallons);
    let work_days = containers_needed(total_hours, rates.labor.hours_per_day);
    let sealer_weight = Gallons(total_undiluted).weight_at(rates.equipment.sealer_lbs_per_gallon);
    let truck_weight = rates.unladen_weight_lbs() + sealer_weight.value();
    let gvwr = rates.truck.gvwr_limit_lbs;
    let within_gvwr = truck_weight <= gvwr;
    let warning = if within_gvwr {
        String::new()
    } else {
        tracing::warn!(truck_weight, gvwr, "loaded truck exceeds GVWR");
        format!(
            "WARNING: Exceeds truck GVWR! Loaded weight {:.0} lb is {:.0} lb over the {:.0} lb limit",
            truck_weight,
            truck_weight - gvwr,
            gvwr
        )
    };

    // 12. Coverage
    let coat_sq_ft = coat_ran.map(|ran| if ran { area } else { 0.0 });
    let coated: SqFt = coat_sq_ft.iter().map(|s| SqFt(*s)).fold(SqFt(0.0), |acc, s| acc + s);
    let avg_sq_ft_per_gallon = if total_mix > 0.0 {
        coated.value() / total_mix
    } else {
        0.0
    };

    tracing::debug!(
        area,
        total_undiluted,
        total_mix,
        total_hours,
        total_project,
        "sealcoat estimate computed"
    );

    Ok(SealcoatResult {
        materials: MaterialQuantities {
            first_coat_gallons: round2(coat_gallons[0]),
            second_coat_gallons: round2(coat_gallons[1]),
            third_coat_gallons: round2(coat_gallons[2]),
            total_undiluted_gallons: round2(total_undiluted),
            sand_lbs: round2(sand_lbs),
            sand_bags,
            water_gallons: round2(water_gallons),
            polymer_gallons: round2(polymer_gallons),
            polymer_buckets,
            oil_spot_primer_buckets: primer_buckets,
            total_mix_gallons: round2(total_mix),
        },
        costs: CostBreakdown {
            sealer: round2(sealer_cost),
            sand: round2(sand_cost),
            water: water_cost,
            polymer: round2(polymer_cost),
            oil_spot_primer: round2(primer_cost),
            material_subtotal: round2(material_subtotal),
            labor: round2(labor_cost),
            fuel: round2(fuel_cost),
            total_project: round2(total_project),
        },
        logistics: Logistics {
            total_hours: round2(total_hours),
            work_days,
            tank_loads,
            fuel_gallons: round2(fuel_gallons),
            truck_weight: TruckWeight {
                total_weight_lbs: round2(truck_weight),
                within_gvwr,
                warning,
            },
        },
        coverage: Coverage {
            first_coat_sq_ft: coat_sq_ft[0],
            second_coat_sq_ft: coat_sq_ft[1],
            third_coat_sq_ft: coat_sq_ft[2],
            avg_sq_ft_per_gallon: round2(avg_sq_ft_per_gallon),
        },
    })
}
