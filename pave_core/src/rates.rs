//! # Rate Configuration
//!
//! Supplier prices, mix constants, crew rates, and equipment limits consumed by
//! the estimation engine. The engine never mutates a [`RateConfig`]; callers
//! pass one in explicitly so tests and regional price lists can substitute
//! their own values.
//!
//! ## Sources
//!
//! - Compiled defaults ([`RateConfig::default`], [`DEFAULT_RATES`]) reflect the
//!   2025 Stuart, VA price list.
//! - A JSON override file can be loaded with [`crate::file_io::load_rates`].
//!   Every section is `#[serde(default)]`, so a file only needs the fields
//!   it changes.
//!
//! ## Hot Reload
//!
//! [`SharedRates`] holds the active configuration as an `Arc`. Readers take a
//! snapshot; a reload builds a complete new config and swaps the pointer.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::rates::{RateConfig, SharedRates};
//!
//! let shared = SharedRates::new(RateConfig::default());
//! let before = shared.snapshot();
//!
//! let mut regional = RateConfig::default();
//! regional.materials.concentrate_per_gallon = 4.10;
//! shared.replace(regional).unwrap();
//!
//! assert_eq!(before.materials.concentrate_per_gallon, 3.79);
//! assert_eq!(shared.snapshot().materials.concentrate_per_gallon, 4.10);
//! ```

use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Process-wide default rates, built once on first use.
pub static DEFAULT_RATES: Lazy<RateConfig> = Lazy::new(RateConfig::default);

/// Complete rate configuration for one pricing region.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    /// Supplier unit prices
    pub materials: MaterialPrices,

    /// Package sizes and mix constants
    pub mix: MixConstants,

    /// Crew rate and application throughput
    pub labor: LaborRates,

    /// Tank sealing machine
    pub equipment: EquipmentSpec,

    /// Delivery truck
    pub truck: TruckSpec,

    /// Travel fuel
    pub fuel: FuelRates,

    /// Contractor details printed on quotes
    pub business: BusinessProfile,
}

/// Supplier unit prices (USD).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialPrices {
    /// Asphalt sealer concentrate, per gallon
    pub concentrate_per_gallon: f64,
    /// Sand, per bag
    pub sand_per_bag: f64,
    /// Fast-dry polymer additive, per bucket
    pub polymer_per_bucket: f64,
    /// Oil-spot primer, per bucket
    pub primer_per_bucket: f64,
}

impl Default for MaterialPrices {
    fn default() -> Self {
        MaterialPrices {
            concentrate_per_gallon: 3.79,
            sand_per_bag: 10.00,
            polymer_per_bucket: 50.00,
            primer_per_bucket: 50.00,
        }
    }
}

/// Package sizes and empirical mix constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixConstants {
    /// Weight of one sand bag (lb)
    pub sand_bag_lbs: f64,
    /// Polymer bucket size (gal)
    pub polymer_bucket_gallons: f64,
    /// Oil spots treated per primer bucket
    pub oil_spots_per_primer_bucket: f64,
    /// Pounds of suspended sand that displace one gallon of mix.
    ///
    /// Empirical spreadsheet constant, not a density.
    pub sand_lbs_per_displaced_gallon: f64,
}

impl Default for MixConstants {
    fn default() -> Self {
        MixConstants {
            sand_bag_lbs: 50.0,
            polymer_bucket_gallons: 5.0,
            oil_spots_per_primer_bucket: 200.0,
            sand_lbs_per_displaced_gallon: 100.0,
        }
    }
}

/// Crew rate and per-coat application speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaborRates {
    /// Blended hourly rate including taxes, benefits and overhead (USD/hr)
    pub blended_hourly_rate: f64,
    /// Application throughput per coat (sq ft/hr), indexed first..third
    pub coat_throughput_sq_ft_per_hr: [f64; 3],
    /// Fixed setup/prep time added to every job (hr)
    pub prep_hours: f64,
    /// Length of a work day (hr)
    pub hours_per_day: f64,
}

impl Default for LaborRates {
    fn default() -> Self {
        LaborRates {
            blended_hourly_rate: 45.00,
            coat_throughput_sq_ft_per_hr: [5000.0, 12000.0, 14000.0],
            prep_hours: 1.0,
            hours_per_day: 8.0,
        }
    }
}

/// Tank sealing machine (skid unit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentSpec {
    /// Model description
    pub model: String,
    /// Tank capacity (gal)
    pub tank_capacity_gallons: f64,
    /// Dry weight of the unit (lb)
    pub empty_weight_lbs: f64,
    /// Weight of sealer per gallon (lb/gal)
    pub sealer_lbs_per_gallon: f64,
}

impl Default for EquipmentSpec {
    fn default() -> Self {
        EquipmentSpec {
            model: "SK 550 Tank Sealing Machine (Skid Unit)".to_string(),
            tank_capacity_gallons: 550.0,
            empty_weight_lbs: 1865.0,
            sealer_lbs_per_gallon: 10.0,
        }
    }
}

/// Delivery truck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TruckSpec {
    /// Model description
    pub model: String,
    /// Curb weight (lb)
    pub curb_weight_lbs: f64,
    /// Legal gross vehicle weight limit (lb); the lower of the truck's ratings
    pub gvwr_limit_lbs: f64,
}

impl Default for TruckSpec {
    fn default() -> Self {
        TruckSpec {
            model: "1978 Chevy C30 Custom Deluxe".to_string(),
            curb_weight_lbs: 4300.0,
            gvwr_limit_lbs: 10000.0,
        }
    }
}

/// Travel fuel economy and price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelRates {
    /// Average truck fuel economy (mi/gal)
    pub truck_mpg: f64,
    /// Fuel price (USD/gal)
    pub price_per_gallon: f64,
}

impl Default for FuelRates {
    fn default() -> Self {
        FuelRates {
            truck_mpg: 17.5,
            price_per_gallon: 3.50,
        }
    }
}

/// Contractor contact details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessProfile {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        BusinessProfile {
            name: "Asphalt Management Services".to_string(),
            address: "337 Ayers Orchard Road, Stuart, VA 24171".to_string(),
            phone: "1-800-ASPHALT".to_string(),
            email: "info@asphaltmanagement.com".to_string(),
        }
    }
}

impl RateConfig {
    /// Validate the configuration.
    ///
    /// Every value used as a divisor must be positive, and prices and weights
    /// must be non-negative.
    pub fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("mix.sand_bag_lbs", self.mix.sand_bag_lbs),
            ("mix.polymer_bucket_gallons", self.mix.polymer_bucket_gallons),
            ("mix.oil_spots_per_primer_bucket", self.mix.oil_spots_per_primer_bucket),
            ("mix.sand_lbs_per_displaced_gallon", self.mix.sand_lbs_per_displaced_gallon),
            ("labor.coat_throughput_sq_ft_per_hr[0]", self.labor.coat_throughput_sq_ft_per_hr[0]),
            ("labor.coat_throughput_sq_ft_per_hr[1]", self.labor.coat_throughput_sq_ft_per_hr[1]),
            ("labor.coat_throughput_sq_ft_per_hr[2]", self.labor.coat_throughput_sq_ft_per_hr[2]),
            ("labor.hours_per_day", self.labor.hours_per_day),
            ("equipment.tank_capacity_gallons", self.equipment.tank_capacity_gallons),
            ("fuel.truck_mpg", self.fuel.truck_mpg),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CalcError::invalid_input(field, value.to_string(), "Must be positive"));
            }
        }

        let non_negative = [
            ("materials.concentrate_per_gallon", self.materials.concentrate_per_gallon),
            ("materials.sand_per_bag", self.materials.sand_per_bag),
            ("materials.polymer_per_bucket", self.materials.polymer_per_bucket),
            ("materials.primer_per_bucket", self.materials.primer_per_bucket),
            ("labor.blended_hourly_rate", self.labor.blended_hourly_rate),
            ("labor.prep_hours", self.labor.prep_hours),
            ("equipment.empty_weight_lbs", self.equipment.empty_weight_lbs),
            ("equipment.sealer_lbs_per_gallon", self.equipment.sealer_lbs_per_gallon),
            ("truck.curb_weight_lbs", self.truck.curb_weight_lbs),
            ("truck.gvwr_limit_lbs", self.truck.gvwr_limit_lbs),
            ("fuel.price_per_gallon", self.fuel.price_per_gallon),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CalcError::invalid_input(field, value.to_string(), "Cannot be negative"));
            }
        }

        Ok(())
    }

    /// Weight of the truck and empty sealing machine before any sealer is loaded.
    pub fn unladen_weight_lbs(&self) -> f64 {
        self.truck.curb_weight_lbs + self.equipment.empty_weight_lbs
    }
}

/// Active rate configuration shared between callers.
///
/// Cloning a snapshot is an `Arc` clone; replacing swaps the whole pointer, so
/// a reader holding an older snapshot keeps a consistent view.
#[derive(Debug)]
pub struct SharedRates {
    current: RwLock<Arc<RateConfig>>,
}

impl SharedRates {
    /// Wrap an initial configuration. The caller is expected to have validated it.
    pub fn new(rates: RateConfig) -> Self {
        SharedRates {
            current: RwLock::new(Arc::new(rates)),
        }
    }

    /// Current configuration.
    pub fn snapshot(&self) -> Arc<RateConfig> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Validate `rates` and make it the active configuration.
    ///
    /// On validation failure the active configuration is left untouched.
    pub fn replace(&self, rates: RateConfig) -> CalcResult<()> {
        rates.validate()?;
        let next = Arc::new(rates);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
        tracing::info!("rate configuration replaced");
        Ok(())
    }
}

impl Default for SharedRates {
    fn default() -> Self {
        SharedRates::new(DEFAULT_RATES.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_validate() {
        assert!(RateConfig::default().validate().is_ok());
        assert_eq!(*DEFAULT_RATES, RateConfig::default());
    }

    #[test]
    fn test_default_values() {
        let rates = RateConfig::default();
        assert_eq!(rates.materials.concentrate_per_gallon, 3.79);
        assert_eq!(rates.labor.coat_throughput_sq_ft_per_hr, [5000.0, 12000.0, 14000.0]);
        assert_eq!(rates.equipment.tank_capacity_gallons, 550.0);
        assert_eq!(rates.unladen_weight_lbs(), 6165.0);
    }

    #[test]
    fn test_zero_divisor_rejected() {
        let mut rates = RateConfig::default();
        rates.fuel.truck_mpg = 0.0;
        let err = rates.validate().unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "fuel.truck_mpg"));
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut rates = RateConfig::default();
        rates.materials.sand_per_bag = -1.0;
        assert!(rates.validate().is_err());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let json = r#"{ "materials": { "concentrate_per_gallon": 4.25 }, "fuel": { "price_per_gallon": 3.10 } }"#;
        let rates: RateConfig = serde_json::from_str(json).unwrap();
        assert_eq!(rates.materials.concentrate_per_gallon, 4.25);
        assert_eq!(rates.materials.sand_per_bag, 10.00);
        assert_eq!(rates.fuel.price_per_gallon, 3.10);
        assert_eq!(rates.fuel.truck_mpg, 17.5);
        assert_eq!(rates.truck, TruckSpec::default());
    }

    #[test]
    fn test_shared_replace_keeps_old_snapshot() {
        let shared = SharedRates::default();
        let old = shared.snapshot();

        let mut next = RateConfig::default();
        next.labor.blended_hourly_rate = 52.0;
        shared.replace(next).unwrap();

        assert_eq!(old.labor.blended_hourly_rate, 45.0);
        assert_eq!(shared.snapshot().labor.blended_hourly_rate, 52.0);
    }

    #[test]
    fn test_shared_replace_rejects_invalid() {
        let shared = SharedRates::default();
        let mut bad = RateConfig::default();
        bad.equipment.tank_capacity_gallons = 0.0;

        assert!(shared.replace(bad).is_err());
        assert_eq!(shared.snapshot().equipment.tank_capacity_gallons, 550.0);
    }
}
