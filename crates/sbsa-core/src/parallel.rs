//! Parallel Field Sampling
//!
//! Rayon implementations of frame sampling. Enable with the `parallel`
//! feature flag (on by default).
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! sbsa-core = { version = "0.1", features = ["parallel"] }
//! ```
//!
//! ## Performance Considerations
//!
//! Every cell is independent, so a frame splits into contiguous address
//! chunks with no synchronization beyond the final collect. Below a few
//! thousand cells the sequential path in [`crate::frame`] is usually faster.

use rayon::prelude::*;
use std::ops::Range;
use tracing::debug;

use crate::field::WaveField;
use crate::frame::{checked_len, sample_range, FieldFrame, FieldSample};
use crate::types::{ensure_finite, Address, SbsaResult};

/// Smallest address chunk handed to a single rayon task.
pub const MIN_CHUNK: usize = 1024;

/// Sample every address in `range` in parallel.
///
/// The result is identical to [`sample_range`]: ascending addresses,
/// bit-identical values.
pub fn par_sample_range(
    field: &WaveField,
    range: Range<Address>,
    time: f64,
) -> SbsaResult<FieldFrame> {
    ensure_finite("time", time)?;
    let len = checked_len(field, &range)?;
    debug!(start = range.start, len, time, "sampling frame in parallel");

    let start = range.start;
    let samples = (0..len)
        .into_par_iter()
        .with_min_len(MIN_CHUNK)
        .map(|offset| {
            let address = start + offset as Address;
            field
                .sample(address, time)
                .map(|value| FieldSample { address, value })
        })
        .collect::<SbsaResult<Vec<_>>>()?;

    Ok(FieldFrame {
        time,
        start,
        samples,
    })
}

/// Sample the same range at several time steps, one task per step.
pub fn par_sample_times(
    field: &WaveField,
    range: Range<Address>,
    times: &[f64],
) -> SbsaResult<Vec<FieldFrame>> {
    times
        .par_iter()
        .map(|&time| sample_range(field, range.clone(), time))
        .collect()
}

/// Sample several disjoint ranges at one time step.
pub fn par_sample_ranges(
    field: &WaveField,
    ranges: &[Range<Address>],
    time: f64,
) -> SbsaResult<Vec<FieldFrame>> {
    ranges
        .par_iter()
        .map(|range| sample_range(field, range.clone(), time))
        .collect()
}
