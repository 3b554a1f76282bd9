//! # Unit Types
//!
//! Lightweight newtype wrappers for the units a pavement estimate deals in,
//! plus the rounding helpers used at the result boundary.
//!
//! ## US Customary Units
//!
//! - Distance: miles (mi)
//! - Area: square feet (sq ft), square yards (sq yd)
//! - Volume: US gallons (gal)
//! - Weight: pounds (lb)
//!
//! ## Example
//!
//! ```rust
//! use pave_core::units::{SqFt, SqYd, round2};
//!
//! let lot = SqFt(4500.0);
//! let yards: SqYd = lot.into();
//! assert_eq!(yards.0, 500.0);
//!
//! assert_eq!(round2(92.1649), 92.16);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Distance Units
// ============================================================================

/// Distance in statute miles
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Miles(pub f64);

impl Miles {
    /// Out-and-back distance for a trip from the yard to the job site
    pub fn round_trip(self) -> Miles {
        Miles(self.0 * 2.0)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqFt(pub f64);

/// Area in square yards (1 sq yd = 9 sq ft)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqYd(pub f64);

impl From<SqFt> for SqYd {
    fn from(sqft: SqFt) -> Self {
        SqYd(sqft.0 / 9.0)
    }
}

impl From<SqYd> for SqFt {
    fn from(sqyd: SqYd) -> Self {
        SqFt(sqyd.0 * 9.0)
    }
}

// ============================================================================
// Volume / Weight Units
// ============================================================================

/// Volume in US gallons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gallons(pub f64);

/// Weight in pounds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pounds(pub f64);

impl Gallons {
    /// Weight of this volume at the given density (lb/gal)
    pub fn weight_at(self, lbs_per_gallon: f64) -> Pounds {
        Pounds(self.0 * lbs_per_gallon)
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Miles);
impl_arithmetic!(SqFt);
impl_arithmetic!(SqYd);
impl_arithmetic!(Gallons);
impl_arithmetic!(Pounds);

// ============================================================================
// Rounding
// ============================================================================

/// Round to two decimal places (cents / hundredths of a gallon).
///
/// Half-way cases round away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Number of whole containers needed to hold `quantity`.
///
/// Always rounds up; a partial bag or bucket still has to be bought.
/// Non-positive quantities need zero containers.
pub fn containers_needed(quantity: f64, per_container: f64) -> u64 {
    if quantity <= 0.0 || !quantity.is_finite() {
        return 0;
    }
    (quantity / per_container).ceil() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqft_to_sqyd() {
        let yd: SqYd = SqFt(900.0).into();
        assert_eq!(yd.0, 100.0);

        let back: SqFt = yd.into();
        assert_eq!(back.0, 900.0);
    }

    #[test]
    fn test_round_trip_miles() {
        assert_eq!(Miles(50.0).round_trip().0, 100.0);
    }

    #[test]
    fn test_gallons_weight() {
        assert_eq!(Gallons(72.0).weight_at(10.0), Pounds(720.0));
    }

    #[test]
    fn test_arithmetic() {
        let a = Gallons(10.0);
        let b = Gallons(4.0);
        assert_eq!((a + b).0, 14.0);
        assert_eq!((a - b).0, 6.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(5.714285), 5.71);
        assert_eq!(round2(20.0), 20.0);
        assert_eq!(round2(0.125), 0.13);
    }

    #[test]
    fn test_containers_round_up() {
        assert_eq!(containers_needed(216.0, 50.0), 5);
        assert_eq!(containers_needed(150.01, 50.0), 4);
        assert_eq!(containers_needed(150.0, 50.0), 3);
        assert_eq!(containers_needed(0.0, 50.0), 0);
        assert_eq!(containers_needed(-3.0, 5.0), 0);
    }

    #[test]
    fn test_containers_past_u32_range() {
        let bags = containers_needed(1.0e13, 1.0);
        assert_eq!(bags, 10_000_000_000_000);
        assert!(bags > u64::from(u32::MAX));
    }

    #[test]
    fn test_serialization() {
        let area = SqFt(5000.0);
        let json = serde_json::to_string(&area).unwrap();
        assert_eq!(json, "5000.0");

        let roundtrip: SqFt = serde_json::from_str(&json).unwrap();
        assert_eq!(area, roundtrip);
    }
}
