//! Uniform coordinate quantization onto the hypercube lattice.
//!
//! The quantizer implements `Q(x, δ) = δ · round(x / δ)` but returns the
//! quantization *index* `round(x / δ)`, which is what the address mapper
//! consumes. The reconstructed real value is available through
//! [`dequantize`] / [`reconstruct`].
//!
//! Ties (`x / δ` exactly halfway between two integers) are resolved by the
//! [`RoundingMode`]. The default is [`RoundingMode::HalfAwayFromZero`]:
//!
//! ```text
//!   x/δ      half_away_from_zero   half_even
//!   ----     -------------------   ---------
//!    2.5              3                2
//!    3.5              4                4
//!   -2.5             -3               -2
//!    2.4              2                2
//! ```
//!
//! # Example
//!
//! ```
//! use sbsa_core::quantizer::{quantize, Quantizer, RoundingMode};
//!
//! assert_eq!(quantize(1.26, 0.5).unwrap(), 3);
//! assert!(quantize(1.0, 0.0).is_err());
//!
//! let q = Quantizer::new(vec![0.5, 0.5, 1.0, 2.0], RoundingMode::HalfEven).unwrap();
//! assert_eq!(q.quantize_point(&[1.26, 0.2, 2.5, 7.0]).unwrap(), vec![3, 0, 2, 4]);
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{ensure_finite, DomainError, QuantIndex, SbsaResult};

/// Upper limit (exclusive) of a representable quantization index, 2^63.
const INDEX_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Tie-break rule applied when `x / δ` falls exactly between two integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Ties round away from zero (`2.5 → 3`, `-2.5 → -3`).
    HalfAwayFromZero,
    /// Ties round to the even neighbour (`2.5 → 2`, `3.5 → 4`).
    HalfEven,
}

impl Default for RoundingMode {
    fn default() -> Self {
        RoundingMode::HalfAwayFromZero
    }
}

impl RoundingMode {
    /// Round `v` to an integral value under this mode.
    pub fn round(self, v: f64) -> f64 {
        match self {
            RoundingMode::HalfAwayFromZero => v.round(),
            RoundingMode::HalfEven => v.round_ties_even(),
        }
    }
}

impl std::fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundingMode::HalfAwayFromZero => write!(f, "half_away_from_zero"),
            RoundingMode::HalfEven => write!(f, "half_even"),
        }
    }
}

impl std::str::FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "half_away_from_zero" | "away" => Ok(RoundingMode::HalfAwayFromZero),
            "half_even" | "even" | "bankers" => Ok(RoundingMode::HalfEven),
            other => Err(format!("unknown rounding mode '{}'", other)),
        }
    }
}

fn check_step(step: f64) -> SbsaResult<f64> {
    if step.is_finite() && step > 0.0 {
        Ok(step)
    } else {
        Err(DomainError::NonPositiveStep(step))
    }
}

/// Quantize `x` with step `step` using the default tie-break rule.
///
/// Returns `round(x / step)`.
pub fn quantize(x: f64, step: f64) -> SbsaResult<QuantIndex> {
    quantize_with(x, step, RoundingMode::default())
}

/// Quantize `x` with step `step` using an explicit tie-break rule.
pub fn quantize_with(x: f64, step: f64, mode: RoundingMode) -> SbsaResult<QuantIndex> {
    let step = check_step(step)?;
    let x = ensure_finite("coordinate", x)?;

    let rounded = mode.round(x / step);
    // x / step overflows to ±inf for subnormal steps
    if !(rounded >= -INDEX_LIMIT && rounded < INDEX_LIMIT) {
        return Err(DomainError::IndexOverflow { value: x, step });
    }
    Ok(rounded as QuantIndex)
}

/// Reconstruct the real value of a quantization index: `step · index`.
pub fn dequantize(index: QuantIndex, step: f64) -> SbsaResult<f64> {
    let step = check_step(step)?;
    Ok(step * index as f64)
}

/// `Q(x, δ) = δ · round(x / δ)`: snap `x` to the nearest lattice point.
pub fn reconstruct(x: f64, step: f64) -> SbsaResult<f64> {
    let index = quantize(x, step)?;
    dequantize(index, step)
}

/// Per-axis quantizer with a shared tie-break rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantizer {
    steps: Vec<f64>,
    rounding: RoundingMode,
}

impl Quantizer {
    /// Create a quantizer with one step per axis.
    pub fn new(steps: Vec<f64>, rounding: RoundingMode) -> SbsaResult<Self> {
        for &step in &steps {
            check_step(step)?;
        }
        Ok(Self { steps, rounding })
    }

    /// Create a quantizer using the same step on every axis.
    pub fn uniform(step: f64, dimensions: usize, rounding: RoundingMode) -> SbsaResult<Self> {
        Self::new(vec![step; dimensions], rounding)
    }

    // ------------------------------------------------------------------ accessors

    /// Number of axes this quantizer covers.
    pub fn dimensions(&self) -> usize {
        self.steps.len()
    }

    /// Step size (δ) for each axis.
    pub fn steps(&self) -> &[f64] {
        &self.steps
    }

    /// Tie-break rule.
    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    // ------------------------------------------------------------------ quantize

    /// Quantize a single coordinate along `axis`.
    pub fn quantize_axis(&self, axis: usize, x: f64) -> SbsaResult<QuantIndex> {
        let step = *self.steps.get(axis).ok_or(DomainError::ArityMismatch {
            expected: self.steps.len(),
            actual: axis + 1,
        })?;
        quantize_with(x, step, self.rounding)
    }

    /// Quantize a full point, one coordinate per axis.
    pub fn quantize_point(&self, point: &[f64]) -> SbsaResult<Vec<QuantIndex>> {
        self.check_arity(point.len())?;
        point
            .iter()
            .zip(&self.steps)
            .map(|(&x, &step)| quantize_with(x, step, self.rounding))
            .collect()
    }

    /// Map quantization indices back to lattice coordinates.
    pub fn reconstruct_point(&self, indices: &[QuantIndex]) -> SbsaResult<Vec<f64>> {
        self.check_arity(indices.len())?;
        Ok(indices
            .iter()
            .zip(&self.steps)
            .map(|(&n, &step)| step * n as f64)
            .collect())
    }

    fn check_arity(&self, actual: usize) -> SbsaResult<()> {
        if actual == self.steps.len() {
            Ok(())
        } else {
            Err(DomainError::ArityMismatch {
                expected: self.steps.len(),
                actual,
            })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------- scalar

    #[test]
    fn test_quantize_nearest_multiple() {
        assert_eq!(quantize(0.0, 1.0).unwrap(), 0);
        assert_eq!(quantize(1.26, 0.5).unwrap(), 3);
        assert_eq!(quantize(1.24, 0.5).unwrap(), 2);
        assert_eq!(quantize(-0.74, 0.5).unwrap(), -1);
        assert_eq!(quantize(1000.0, 0.25).unwrap(), 4000);
    }

    #[test]
    fn test_tie_break_modes_differ_only_on_ties() {
        let away = RoundingMode::HalfAwayFromZero;
        let even = RoundingMode::HalfEven;

        assert_eq!(quantize_with(2.5, 1.0, away).unwrap(), 3);
        assert_eq!(quantize_with(2.5, 1.0, even).unwrap(), 2);
        assert_eq!(quantize_with(3.5, 1.0, away).unwrap(), 4);
        assert_eq!(quantize_with(3.5, 1.0, even).unwrap(), 4);
        assert_eq!(quantize_with(-2.5, 1.0, away).unwrap(), -3);
        assert_eq!(quantize_with(-2.5, 1.0, even).unwrap(), -2);

        for &x in &[0.2, 1.49, 2.51, -7.3, 11.9] {
            assert_eq!(
                quantize_with(x, 1.0, away).unwrap(),
                quantize_with(x, 1.0, even).unwrap()
            );
        }
    }

    #[test]
    fn test_default_rounding_is_half_away_from_zero() {
        assert_eq!(RoundingMode::default(), RoundingMode::HalfAwayFromZero);
        assert_eq!(quantize(0.5, 1.0).unwrap(), 1);
    }

    #[test]
    fn test_rejects_bad_step() {
        assert_eq!(quantize(1.0, 0.0), Err(DomainError::NonPositiveStep(0.0)));
        assert_eq!(quantize(1.0, -2.0), Err(DomainError::NonPositiveStep(-2.0)));
        assert!(matches!(
            quantize(1.0, f64::NAN),
            Err(DomainError::NonPositiveStep(_))
        ));
        assert!(matches!(
            quantize(1.0, f64::INFINITY),
            Err(DomainError::NonPositiveStep(_))
        ));
    }

    #[test]
    fn test_rejects_non_finite_input() {
        for &x in &[f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                quantize(x, 1.0),
                Err(DomainError::NonFinite { what: "coordinate", .. })
            ));
        }
    }

    #[test]
    fn test_index_overflow() {
        assert!(matches!(
            quantize(1e300, 1e-300),
            Err(DomainError::IndexOverflow { .. })
        ));
        assert!(matches!(
            quantize(-1e19, 1.0),
            Err(DomainError::IndexOverflow { .. })
        ));
        assert_eq!(quantize(-9_223_372_036_854_775_808.0, 1.0).unwrap(), i64::MIN);
    }

    #[test]
    fn test_reconstruct() {
        assert_relative_eq!(reconstruct(1.26, 0.5).unwrap(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(reconstruct(-0.3, 0.25).unwrap(), -0.25, epsilon = 1e-12);
        assert_relative_eq!(dequantize(-4, 0.1).unwrap(), -0.4, epsilon = 1e-12);
        assert!(dequantize(3, 0.0).is_err());
    }

    #[test]
    fn test_rounding_mode_parse_display() {
        for mode in [RoundingMode::HalfAwayFromZero, RoundingMode::HalfEven] {
            assert_eq!(mode.to_string().parse::<RoundingMode>().unwrap(), mode);
        }
        assert_eq!("even".parse::<RoundingMode>().unwrap(), RoundingMode::HalfEven);
        assert!("up".parse::<RoundingMode>().is_err());
    }

    // -------------------------------------------------------------- per-axis

    #[test]
    fn test_quantizer_point() {
        let q = Quantizer::new(vec![0.5, 0.5, 1.0, 2.0], RoundingMode::HalfEven).unwrap();
        assert_eq!(q.dimensions(), 4);
        assert_eq!(q.quantize_point(&[1.26, 0.2, 2.5, 7.0]).unwrap(), vec![3, 0, 2, 4]);

        let lattice = q.reconstruct_point(&[3, 0, 2, 4]).unwrap();
        assert_eq!(lattice, vec![1.5, 0.0, 2.0, 8.0]);
    }

    #[test]
    fn test_quantizer_arity() {
        let q = Quantizer::uniform(1.0, 3, RoundingMode::default()).unwrap();
        assert_eq!(
            q.quantize_point(&[1.0, 2.0]),
            Err(DomainError::ArityMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert!(q.quantize_axis(3, 1.0).is_err());
        assert_eq!(q.quantize_axis(2, 4.4).unwrap(), 4);
    }

    #[test]
    fn test_quantizer_rejects_bad_steps() {
        assert!(Quantizer::new(vec![1.0, 0.0], RoundingMode::default()).is_err());
        assert!(Quantizer::uniform(-1.0, 4, RoundingMode::default()).is_err());
    }

    #[test]
    fn test_quantizer_serde() {
        let q = Quantizer::new(vec![0.25, 1.0], RoundingMode::HalfEven).unwrap();
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("half_even"));
        let parsed: Quantizer = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, q);
    }

    // -------------------------------------------------------------- properties

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_step() -> impl Strategy<Value = f64> {
            1e-3_f64..1e3
        }

        fn any_mode() -> impl Strategy<Value = RoundingMode> {
            prop_oneof![
                Just(RoundingMode::HalfAwayFromZero),
                Just(RoundingMode::HalfEven)
            ]
        }

        proptest! {
            #[test]
            fn prop_quantize_is_idempotent(x in -1e9_f64..1e9, step in any_step(), mode in any_mode()) {
                let n = quantize_with(x, step, mode).unwrap();
                let again = quantize_with(step * n as f64, step, mode).unwrap();
                prop_assert_eq!(again, n);
            }

            #[test]
            fn prop_reconstruction_within_half_step(x in -1e6_f64..1e6, step in any_step()) {
                let snapped = reconstruct(x, step).unwrap();
                prop_assert!((snapped - x).abs() <= step * 0.5 + 1e-9 * x.abs().max(1.0));
            }

            #[test]
            fn prop_non_positive_step_rejected(x in -1e6_f64..1e6, step in -1e3_f64..=0.0) {
                prop_assert_eq!(quantize(x, step), Err(DomainError::NonPositiveStep(step)));
            }
        }
    }
}
