//! # Form Parsing
//!
//! Converts the text fields of an estimate form into a [`SealcoatInput`].
//!
//! Numeric fields follow a "blank or unparsable → 0" rule. The area field is
//! the exception: it becomes `None` so the engine can report a validation
//! error instead of quietly estimating an empty lot.
//!
//! ## Example
//!
//! ```rust
//! use pave_core::form::SealcoatForm;
//!
//! let mut form = SealcoatForm::default();
//! form.square_feet = "5,000".to_string();
//! form.distance_miles = "".to_string();
//!
//! let input = form.to_input();
//! assert_eq!(input.area_sq_ft, Some(5000.0));
//! assert_eq!(input.distance_miles, 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::sealcoat::{
    CoatSelection, CoverageRates, PolymerOption, SandOption, SealcoatInput, DEFAULT_FIRST_COAT_RATE,
    DEFAULT_FOLLOW_COAT_RATE, DEFAULT_POLYMER_PERCENT, DEFAULT_SAND_LBS_PER_GALLON,
    DEFAULT_WATER_PERCENT,
};

/// Parse a numeric form field. Blank or unparsable text yields 0.
///
/// Surrounding whitespace, thousands separators and a leading `$` are ignored.
pub fn parse_number(text: &str) -> f64 {
    let cleaned: String = text
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Parse a count field. Blank, unparsable or negative text yields 0; a
/// fractional value is truncated.
pub fn parse_count(text: &str) -> u32 {
    let value = parse_number(text);
    if value <= 0.0 {
        0
    } else {
        value.trunc().min(f64::from(u32::MAX)) as u32
    }
}

/// Raw estimate form state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SealcoatForm {
    pub square_feet: String,
    pub second_coat: bool,
    pub third_coat: bool,
    pub first_coat_coverage: String,
    pub second_coat_coverage: String,
    pub third_coat_coverage: String,
    pub sand_added: bool,
    pub sand_per_gallon: String,
    pub polymer_added: bool,
    pub polymer_percent: String,
    pub oil_spot_count: String,
    pub water_percent: String,
    pub job_location: String,
    pub distance_miles: String,
}

impl Default for SealcoatForm {
    fn default() -> Self {
        SealcoatForm {
            square_feet: String::new(),
            second_coat: false,
            third_coat: false,
            first_coat_coverage: DEFAULT_FIRST_COAT_RATE.to_string(),
            second_coat_coverage: DEFAULT_FOLLOW_COAT_RATE.to_string(),
            third_coat_coverage: DEFAULT_FOLLOW_COAT_RATE.to_string(),
            sand_added: true,
            sand_per_gallon: DEFAULT_SAND_LBS_PER_GALLON.to_string(),
            polymer_added: false,
            polymer_percent: DEFAULT_POLYMER_PERCENT.to_string(),
            oil_spot_count: "0".to_string(),
            water_percent: DEFAULT_WATER_PERCENT.to_string(),
            job_location: String::new(),
            distance_miles: "0".to_string(),
        }
    }
}

impl SealcoatForm {
    /// Build an engine input from the form fields.
    pub fn to_input(&self) -> SealcoatInput {
        let area = parse_number(&self.square_feet);

        SealcoatInput {
            area_sq_ft: (area > 0.0).then_some(area),
            coats: CoatSelection {
                second: self.second_coat,
                third: self.third_coat,
            },
            coverage_rates: CoverageRates {
                first: parse_number(&self.first_coat_coverage),
                second: parse_number(&self.second_coat_coverage),
                third: parse_number(&self.third_coat_coverage),
            },
            sand: SandOption {
                enabled: self.sand_added,
                lbs_per_gallon: parse_number(&self.sand_per_gallon),
            },
            polymer: PolymerOption {
                enabled: self.polymer_added,
                percent_of_mix: parse_number(&self.polymer_percent),
            },
            water_percent: parse_number(&self.water_percent),
            oil_spot_count: parse_count(&self.oil_spot_count),
            distance_miles: parse_number(&self.distance_miles),
            job_location: self.job_location.trim().to_string(),
        }
    }
}
