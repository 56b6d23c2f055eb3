//! Field frames: the `(address, value)` sequence handed to a renderer.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::debug;

use crate::field::WaveField;
use crate::types::{ensure_finite, Address, DomainError, SbsaResult};

/// A single sampled cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSample {
    pub address: Address,
    pub value: f64,
}

/// All samples of an address range at one time step, in ascending address
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFrame {
    /// Simulation time of this frame
    pub time: f64,
    /// First sampled address
    pub start: Address,
    pub samples: Vec<FieldSample>,
}

impl FieldFrame {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// One past the last sampled address.
    pub fn end(&self) -> Address {
        self.start + self.samples.len() as Address
    }

    /// Samples as plain `(address, value)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (Address, f64)> + '_ {
        self.samples.iter().map(|s| (s.address, s.value))
    }

    /// Smallest and largest value in the frame.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut values = self.samples.iter().map(|s| s.value);
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Check that `range` lies inside the field's hypercube and return its length.
pub(crate) fn checked_len(field: &WaveField, range: &Range<Address>) -> SbsaResult<usize> {
    let capacity = field.hypercube().capacity();
    if range.start > range.end || range.end > capacity {
        return Err(DomainError::RangeOutOfBounds {
            start: range.start,
            end: range.end,
            capacity,
        });
    }
    usize::try_from(range.end - range.start).map_err(|_| DomainError::RangeOutOfBounds {
        start: range.start,
        end: range.end,
        capacity,
    })
}

/// Sample every address in `range` sequentially.
pub fn sample_range(field: &WaveField, range: Range<Address>, time: f64) -> SbsaResult<FieldFrame> {
    ensure_finite("time", time)?;
    let len = checked_len(field, &range)?;
    debug!(start = range.start, len, time, "sampling frame");

    let mut samples = Vec::with_capacity(len);
    for address in range.clone() {
        samples.push(FieldSample {
            address,
            value: field.sample(address, time)?,
        });
    }
    Ok(FieldFrame {
        time,
        start: range.start,
        samples,
    })
}

/// Sample a frame, in parallel when requested and the `parallel` feature is
/// enabled.
#[cfg(feature = "parallel")]
pub fn sample_frame(
    field: &WaveField,
    range: Range<Address>,
    time: f64,
    parallel: bool,
) -> SbsaResult<FieldFrame> {
    if parallel {
        crate::parallel::par_sample_range(field, range, time)
    } else {
        sample_range(field, range, time)
    }
}

/// Sample a frame. Built without the `parallel` feature, so always sequential.
#[cfg(not(feature = "parallel"))]
pub fn sample_frame(
    field: &WaveField,
    range: Range<Address>,
    time: f64,
    _parallel: bool,
) -> SbsaResult<FieldFrame> {
    sample_range(field, range, time)
}
