//! Core types for SBSA addressing and field sampling
//!
//! This module defines the scalar types shared by the quantizer, the address
//! mapper and the wave field sampler, together with the single error kind
//! every one of them reports.
//!
//! ## Addresses and Coordinates
//!
//! A point in the hypercube is a tuple of non-negative integer coordinates,
//! one per axis, each strictly below that axis' bound. The tuple maps to one
//! [`Address`] by mixed-radix encoding:
//!
//! ```text
//!   coords  = (c0, c1, c2, c3)         bounds = (S, T, W, V)
//!
//!   address = c0 + c1·S + c2·S·T + c3·S·T·W
//!             ──   ────   ──────   ────────
//!             digit 0  1     2        3        (axis 0 least significant)
//! ```

use num_complex::Complex64;

/// A linear hypercube address.
///
/// The default SBSA hypercube holds 1.6 × 10^16 cells, well past `u32`.
pub type Address = u64;

/// A single integer coordinate along one axis.
pub type Coord = u64;

/// Quantization index produced by the quantizer (may be negative before
/// the hypercube bounds are applied).
pub type QuantIndex = i64;

/// Analytic (complex) form of a field sample.
pub type Phasor = Complex64;

/// Result type for addressing and sampling operations
pub type SbsaResult<T> = Result<T, DomainError>;

/// Violated precondition in any of the quantizer, the address mapper or the
/// wave field sampler.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Quantization step must be positive and finite, got {0}")]
    NonPositiveStep(f64),

    #[error("Non-finite {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Quantization index for {value} / {step} does not fit in i64")]
    IndexOverflow { value: f64, step: f64 },

    #[error("Coordinate {value} out of bound on axis {axis}: must be in [0, {bound})")]
    CoordOutOfBound { axis: usize, value: i128, bound: u64 },

    #[error("Arity mismatch: expected {expected} coordinates, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("Address {address} out of range: capacity is {capacity}")]
    AddressOutOfRange { address: u64, capacity: u64 },

    #[error("Address range {start}..{end} exceeds capacity {capacity}")]
    RangeOutOfBounds { start: u64, end: u64, capacity: u64 },

    #[error("Invalid bound on axis {axis}: {bound}. Must be at least 1")]
    InvalidBound { axis: usize, bound: u64 },

    #[error("Invalid dimensions: {0}. Must be between 1 and {max}", max = crate::address::MAX_DIMENSIONS)]
    InvalidDimensions(usize),

    #[error("Hypercube capacity overflows u64 at axis {axis}")]
    CapacityOverflow { axis: usize },

    #[error("Negative frequency in wave component {component}: {frequency}")]
    NegativeFrequency { component: usize, frequency: f64 },
}

impl DomainError {
    /// Convenience constructor for a non-finite numeric input.
    pub fn non_finite(what: &'static str, value: f64) -> Self {
        DomainError::NonFinite { what, value }
    }

    /// Check if the error was raised by the address mapper
    pub fn is_addressing(&self) -> bool {
        matches!(
            self,
            DomainError::CoordOutOfBound { .. }
                | DomainError::ArityMismatch { .. }
                | DomainError::AddressOutOfRange { .. }
                | DomainError::RangeOutOfBounds { .. }
                | DomainError::InvalidBound { .. }
                | DomainError::InvalidDimensions(_)
                | DomainError::CapacityOverflow { .. }
        )
    }
}

/// Require `value` to be finite.
pub(crate) fn ensure_finite(what: &'static str, value: f64) -> SbsaResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DomainError::non_finite(what, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_offending_value() {
        let err = DomainError::CoordOutOfBound {
            axis: 2,
            value: 17,
            bound: 6,
        };
        let msg = err.to_string();
        assert!(msg.contains("17"));
        assert!(msg.contains("axis 2"));
        assert!(msg.contains("[0, 6)"));

        let err = DomainError::NonPositiveStep(-0.5);
        assert!(err.to_string().contains("-0.5"));
    }

    #[test]
    fn test_invalid_dimensions_message() {
        let msg = DomainError::InvalidDimensions(0).to_string();
        assert!(msg.contains("between 1 and 16"));
    }

    #[test]
    fn test_is_addressing() {
        assert!(DomainError::AddressOutOfRange {
            address: 10,
            capacity: 5
        }
        .is_addressing());
        assert!(!DomainError::NonPositiveStep(0.0).is_addressing());
        assert!(!DomainError::NegativeFrequency {
            component: 0,
            frequency: -1.0
        }
        .is_addressing());
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite("time", 1.5), Ok(1.5));
        assert!(matches!(
            ensure_finite("time", f64::NAN),
            Err(DomainError::NonFinite { what: "time", .. })
        ));
        assert!(ensure_finite("time", f64::NEG_INFINITY).is_err());
    }
}
