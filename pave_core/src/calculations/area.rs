//! # Area Take-Off
//!
//! Totals a lot made up of rectangular, triangular and circular sections.
//! The grand total feeds [`SealcoatInput::area_sq_ft`](super::sealcoat::SealcoatInput).
//!
//! ## Example
//!
//! ```rust
//! use pave_core::calculations::area::{calculate, AreaInput};
//!
//! let input = AreaInput::default()
//!     .with_rectangle("Main lot", 120.0, 60.0)
//!     .with_triangle("Entrance wedge", 30.0, 20.0)
//!     .with_circle("Island", 10.0);
//!
//! let result = calculate(&input).unwrap();
//! assert!((result.total_sq_ft - 7814.16).abs() < 0.01);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{round2, SqFt, SqYd};

/// Rectangular section (length × width, ft).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangularSection {
    pub label: String,
    pub length_ft: f64,
    pub width_ft: f64,
}

/// Triangular section (½ × base × height, ft).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangularSection {
    pub label: String,
    pub base_ft: f64,
    pub height_ft: f64,
}

/// Circular section (π r², ft).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularSection {
    pub label: String,
    pub radius_ft: f64,
}

/// Sections making up one job's pavement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaInput {
    pub rectangles: Vec<RectangularSection>,
    pub triangles: Vec<TriangularSection>,
    pub circles: Vec<CircularSection>,
}

impl AreaInput {
    pub fn with_rectangle(mut self, label: impl Into<String>, length_ft: f64, width_ft: f64) -> Self {
        self.rectangles.push(RectangularSection {
            label: label.into(),
            length_ft,
            width_ft,
        });
        self
    }

    pub fn with_triangle(mut self, label: impl Into<String>, base_ft: f64, height_ft: f64) -> Self {
        self.triangles.push(TriangularSection {
            label: label.into(),
            base_ft,
            height_ft,
        });
        self
    }

    pub fn with_circle(mut self, label: impl Into<String>, radius_ft: f64) -> Self {
        self.circles.push(CircularSection {
            label: label.into(),
            radius_ft,
        });
        self
    }

    /// Validate input parameters.
    ///
    /// Dimensions must be finite and non-negative. A zero dimension is
    /// allowed (an unfilled row contributes nothing).
    pub fn validate(&self) -> CalcResult<()> {
        let dims = self
            .rectangles
            .iter()
            .enumerate()
            .flat_map(|(i, r)| {
                [
                    (format!("rectangles[{i}].length_ft"), r.length_ft),
                    (format!("rectangles[{i}].width_ft"), r.width_ft),
                ]
            })
            .chain(self.triangles.iter().enumerate().flat_map(|(i, t)| {
                [
                    (format!("triangles[{i}].base_ft"), t.base_ft),
                    (format!("triangles[{i}].height_ft"), t.height_ft),
                ]
            }))
            .chain(
                self.circles
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (format!("circles[{i}].radius_ft"), c.radius_ft)),
            );

        for (field, value) in dims {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Dimension must be a non-negative number",
                ));
            }
        }
        Ok(())
    }
}

/// Area of a single section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionArea {
    pub label: String,
    pub area_sq_ft: f64,
}

/// Results from an area take-off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaResult {
    pub rectangles: Vec<SectionArea>,
    pub triangles: Vec<SectionArea>,
    pub circles: Vec<SectionArea>,
    pub rectangular_sq_ft: f64,
    pub triangular_sq_ft: f64,
    pub circular_sq_ft: f64,
    pub total_sq_ft: f64,
    pub total_sq_yd: f64,
}

/// Total the sections of a lot.
pub fn calculate(input: &AreaInput) -> CalcResult<AreaResult> {
    input.validate()?;

    let rect: Vec<(String, f64)> = input
        .rectangles
        .iter()
        .map(|r| (r.label.clone(), r.length_ft * r.width_ft))
        .collect();
    let tri: Vec<(String, f64)> = input
        .triangles
        .iter()
        .map(|t| (t.label.clone(), 0.5 * t.base_ft * t.height_ft))
        .collect();
    let circ: Vec<(String, f64)> = input
        .circles
        .iter()
        .map(|c| (c.label.clone(), PI * c.radius_ft * c.radius_ft))
        .collect();

    let subtotal = |sections: &[(String, f64)]| -> SqFt {
        sections.iter().fold(SqFt(0.0), |acc, (_, a)| acc + SqFt(*a))
    };
    let rect_total = subtotal(&rect);
    let tri_total = subtotal(&tri);
    let circ_total = subtotal(&circ);
    let total = rect_total + tri_total + circ_total;
    let total_yd: SqYd = total.into();

    let rounded = |sections: Vec<(String, f64)>| -> Vec<SectionArea> {
        sections
            .into_iter()
            .map(|(label, a)| SectionArea {
                label,
                area_sq_ft: round2(a),
            })
            .collect()
    };

    Ok(AreaResult {
        rectangles: rounded(rect),
        triangles: rounded(tri),
        circles: rounded(circ),
        rectangular_sq_ft: round2(rect_total.value()),
        triangular_sq_ft: round2(tri_total.value()),
        circular_sq_ft: round2(circ_total.value()),
        total_sq_ft: round2(total.value()),
        total_sq_yd: round2(total_yd.value()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_takeoff() {
        let result = calculate(&AreaInput::default()).unwrap();
        assert_eq!(result.total_sq_ft, 0.0);
        assert_eq!(result.total_sq_yd, 0.0);
        assert!(result.rectangles.is_empty());
    }

    #[test]
    fn test_mixed_sections() {
        let input = AreaInput::default()
            .with_rectangle("A", 100.0, 50.0)
            .with_rectangle("B", 20.0, 10.0)
            .with_triangle("C", 30.0, 20.0)
            .with_circle("D", 10.0);
        let result = calculate(&input).unwrap();

        assert_eq!(result.rectangular_sq_ft, 5200.0);
        assert_eq!(result.triangular_sq_ft, 300.0);
        assert_eq!(result.circular_sq_ft, 314.16);
        assert_eq!(result.total_sq_ft, 5814.16);
        assert_eq!(result.total_sq_yd, 646.02);
        assert_eq!(result.rectangles[1].label, "B");
        assert_eq!(result.rectangles[1].area_sq_ft, 200.0);
    }

    #[test]
    fn test_zero_dimension_contributes_nothing() {
        let input = AreaInput::default()
            .with_rectangle("blank row", 0.0, 0.0)
            .with_rectangle("lot", 90.0, 10.0);
        let result = calculate(&input).unwrap();
        assert_eq!(result.total_sq_ft, 900.0);
        assert_eq!(result.total_sq_yd, 100.0);
    }

    #[test]
    fn test_negative_dimension_rejected() {
        let input = AreaInput::default().with_circle("bad", -3.0);
        let err = calculate(&input).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "circles[0].radius_ft"));
    }

    #[test]
    fn test_total_feeds_estimate() {
        use crate::calculations::sealcoat::{estimate, SealcoatInput};
        use crate::rates::RateConfig;

        let takeoff = calculate(&AreaInput::default().with_rectangle("lot", 100.0, 50.0)).unwrap();
        let result = estimate(&SealcoatInput::new(takeoff.total_sq_ft), &RateConfig::default()).unwrap();
        assert_eq!(result.materials.total_undiluted_gallons, 72.0);
    }
}
