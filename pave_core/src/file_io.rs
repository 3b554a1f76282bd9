//! # File I/O Module
//!
//! Reads and writes rate configuration files.
//!
//! - **Atomic saves**: write to `.tmp`, sync, rename, so a crash never leaves a
//!   half-written price list behind
//! - **Validated loads**: a file that parses but holds unusable values (zero
//!   MPG, negative prices) is rejected before it reaches the engine
//!
//! ## File Format
//!
//! Plain JSON matching [`RateConfig`]. Missing sections and fields fall back
//! to the compiled defaults.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pave_core::file_io::{load_rates, save_rates};
//! use pave_core::rates::RateConfig;
//! use std::path::Path;
//!
//! let path = Path::new("rates.json");
//! save_rates(&RateConfig::default(), path).unwrap();
//!
//! let rates = load_rates(path).unwrap();
//! assert_eq!(rates.fuel.truck_mpg, 17.5);
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::errors::{CalcError, CalcResult};
use crate::rates::RateConfig;

/// Save a rate configuration to a file using an atomic write.
///
/// The configuration is validated first; an invalid config is never written.
///
/// # Errors
///
/// * `CalcError::InvalidInput` - the configuration fails validation
/// * `CalcError::FileError` - any I/O step fails
pub fn save_rates(rates: &RateConfig, path: &Path) -> CalcResult<()> {
    rates.validate()?;

    let json = serde_json::to_string_pretty(rates).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = path.with_extension("json.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::info!(path = %path.display(), "saved rate configuration");
    Ok(())
}

/// Load and validate a rate configuration file.
///
/// # Returns
///
/// * `Ok(RateConfig)` - parsed and validated configuration
/// * `Err(CalcError::FileError)` - I/O error
/// * `Err(CalcError::SerializationError)` - invalid JSON
/// * `Err(CalcError::InvalidInput)` - values fail [`RateConfig::validate`]
///
/// # Example
///
/// ```rust,no_run
/// use pave_core::file_io::load_rates;
/// use std::path::Path;
///
/// let rates = load_rates(Path::new("rates.json"))?;
/// println!("Concentrate: ${:.2}/gal", rates.materials.concentrate_per_gallon);
/// # Ok::<(), pave_core::errors::CalcError>(())
/// ```
pub fn load_rates(path: &Path) -> CalcResult<RateConfig> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let rates: RateConfig =
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    rates.validate()?;

    tracing::info!(path = %path.display(), "loaded rate configuration");
    Ok(rates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rates.json");

        let mut rates = RateConfig::default();
        rates.materials.concentrate_per_gallon = 4.05;
        rates.business.name = "Blue Ridge Sealing".to_string();

        save_rates(&rates, &path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = load_rates(&path).unwrap();
        assert_eq!(loaded, rates);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rates.json");
        fs::write(&path, r#"{ "labor": { "blended_hourly_rate": 50.0 } }"#).unwrap();

        let loaded = load_rates(&path).unwrap();
        assert_eq!(loaded.labor.blended_hourly_rate, 50.0);
        assert_eq!(loaded.labor.prep_hours, 1.0);
        assert_eq!(loaded.materials, RateConfig::default().materials);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_rates(&dir.path().join("missing.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rates.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_rates(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rates.json");
        fs::write(&path, r#"{ "fuel": { "truck_mpg": 0.0 } }"#).unwrap();

        let err = load_rates(&path).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_save_rejects_invalid_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rates.json");
        let mut rates = RateConfig::default();
        rates.labor.hours_per_day = 0.0;

        assert!(save_rates(&rates, &path).is_err());
        assert!(!path.exists());
    }
}
