//! # SBSA Core Library
//!
//! Size-Based Spatial Addressing (SBSA) over a bounded hypercube, and a
//! time-stepped scalar wave field sampled on its cells.
//!
//! ## Overview
//!
//! - **Quantization**: snap continuous coordinates onto an integer lattice
//! - **Addressing**: pack bounded integer coordinates into a single `u64`
//!   address by mixed-radix encoding, and unpack it again
//! - **Field sampling**: evaluate a superposition of sinusoids at an address
//!   for a given simulation time
//! - **Frames**: sample whole address ranges, sequentially or in parallel,
//!   for an external renderer
//!
//! ## Data Flow
//!
//! ```text
//! point (f64…) → Quantizer → indices → Hypercube::encode → address
//!                                                            │
//!                                   WaveField::sample(address, t) → value
//!                                                            │
//!                                            FieldFrame [(address, value)…] → renderer
//! ```
//!
//! ## Example
//!
//! ```rust
//! use sbsa_core::prelude::*;
//!
//! let cube = Hypercube::new(vec![4, 5, 6, 7]).unwrap();
//! let quantizer = Quantizer::uniform(0.5, 4, RoundingMode::HalfAwayFromZero).unwrap();
//!
//! let cell = cube.locate(&[0.6, 0.9, 1.4, 2.1], &quantizer).unwrap();
//! assert_eq!(cell.coords, vec![1, 2, 3, 4]);
//! assert_eq!(cell.address, 549);
//!
//! let field = WaveField::new(
//!     cube,
//!     vec![WaveComponent::new(1.0, 1.0, 0.0)],
//!     SpatialPhase::Radial,
//! ).unwrap();
//! let frame = sample_range(&field, 0..840, 0.5).unwrap();
//! assert_eq!(frame.len(), 840);
//! ```

pub mod address;
pub mod config;
pub mod field;
pub mod frame;
pub mod observe;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod quantizer;
pub mod types;

pub use address::{decode, encode, Cell, Hypercube, SBSA_BOUNDS, SBSA_CAPACITY};
pub use config::{ConfigError, SbsaConfig};
pub use field::{sample, SpatialPhase, WaveComponent, WaveField, WaveParams};
pub use frame::{sample_frame, sample_range, FieldFrame, FieldSample};
pub use quantizer::{dequantize, quantize, quantize_with, Quantizer, RoundingMode};
pub use types::{Address, Coord, DomainError, Phasor, QuantIndex, SbsaResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::address::{Cell, Hypercube};
    pub use crate::config::SbsaConfig;
    pub use crate::field::{SpatialPhase, WaveComponent, WaveField, WaveParams};
    pub use crate::frame::{sample_frame, sample_range, FieldFrame};
    pub use crate::quantizer::{Quantizer, RoundingMode};
    pub use crate::types::{Address, DomainError, SbsaResult};

    #[cfg(feature = "parallel")]
    pub use crate::parallel::par_sample_range;
}
