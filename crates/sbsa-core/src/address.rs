//! Size-Based Spatial Addressing (SBSA)
//!
//! Maps a bounded tuple of integer coordinates to a single linear address
//! using mixed-radix positional encoding, and back again.
//!
//! Each axis contributes one "digit" whose base is that axis' bound:
//!
//! ```text
//!   stride[0] = 1
//!   stride[i] = stride[i-1] · bound[i-1]
//!
//!   address   = Σ coords[i] · stride[i]
//!   coords[i] = (address / stride[i]) mod bound[i]
//! ```
//!
//! Because every digit stays below its base, each axis occupies a disjoint
//! range of the address, exactly like place-value notation. The map is a
//! bijection between the hypercube and `[0, capacity)` with
//! `capacity = Π bound[i]`.
//!
//! ## Example
//!
//! ```
//! use sbsa_core::address::Hypercube;
//!
//! let cube = Hypercube::new(vec![4, 5, 6, 7]).unwrap();
//! assert_eq!(cube.capacity(), 840);
//! assert_eq!(cube.encode(&[1, 2, 3, 4]).unwrap(), 549);
//! assert_eq!(cube.decode(549).unwrap(), vec![1, 2, 3, 4]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::quantizer::Quantizer;
use crate::types::{Address, Coord, DomainError, QuantIndex, SbsaResult};

/// Largest number of axes a hypercube may have.
pub const MAX_DIMENSIONS: usize = 16;

/// Number of axes of the SBSA hypercube.
pub const SBSA_DIMENSIONS: usize = 4;

/// SBSA axis size S.
pub const BOUND_S: u64 = 40_000;
/// SBSA axis size T.
pub const BOUND_T: u64 = 40_000;
/// SBSA axis size W.
pub const BOUND_W: u64 = 10_000;
/// SBSA axis size V.
pub const BOUND_V: u64 = 1_000;

/// The SBSA per-axis bounds `(S, T, W, V)`.
pub const SBSA_BOUNDS: [u64; SBSA_DIMENSIONS] = [BOUND_S, BOUND_T, BOUND_W, BOUND_V];

/// Cell count of the SBSA hypercube: 1.6 × 10^16.
pub const SBSA_CAPACITY: u64 = BOUND_S * BOUND_T * BOUND_W * BOUND_V;

/// A quantized point together with its address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub address: Address,
    pub coords: Vec<Coord>,
}

/// A validated bounded coordinate domain.
///
/// Construction checks every bound and computes the capacity with checked
/// `u64` arithmetic, so every method can assume the domain is addressable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct Hypercube {
    bounds: Vec<u64>,
    strides: Vec<u64>,
    capacity: u64,
}

impl Hypercube {
    /// Create a hypercube from per-axis bounds.
    pub fn new(bounds: Vec<u64>) -> SbsaResult<Self> {
        if bounds.is_empty() || bounds.len() > MAX_DIMENSIONS {
            return Err(DomainError::InvalidDimensions(bounds.len()));
        }

        let mut strides = Vec::with_capacity(bounds.len());
        let mut capacity: u64 = 1;
        for (axis, &bound) in bounds.iter().enumerate() {
            if bound == 0 {
                return Err(DomainError::InvalidBound { axis, bound });
            }
            strides.push(capacity);
            capacity = capacity
                .checked_mul(bound)
                .ok_or(DomainError::CapacityOverflow { axis })?;
        }

        debug!(dimensions = bounds.len(), capacity, "hypercube created");
        Ok(Self {
            bounds,
            strides,
            capacity,
        })
    }

    /// The four-axis SBSA hypercube `(S, T, W, V)`.
    pub fn sbsa() -> Self {
        Self {
            bounds: SBSA_BOUNDS.to_vec(),
            strides: vec![1, BOUND_S, BOUND_S * BOUND_T, BOUND_S * BOUND_T * BOUND_W],
            capacity: SBSA_CAPACITY,
        }
    }

    // ------------------------------------------------------------------ accessors

    pub fn dimensions(&self) -> usize {
        self.bounds.len()
    }

    pub fn bounds(&self) -> &[u64] {
        &self.bounds
    }

    /// Place value of each axis: `Π bound[j]` for `j < i`.
    pub fn strides(&self) -> &[u64] {
        &self.strides
    }

    /// Total number of addressable cells.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Check whether `address` lies in `[0, capacity)`.
    pub fn contains(&self, address: Address) -> bool {
        address < self.capacity
    }

    // ------------------------------------------------------------------ encode

    /// Encode a coordinate tuple into its address.
    pub fn encode(&self, coords: &[Coord]) -> SbsaResult<Address> {
        self.check_arity(coords.len())?;

        let mut address: Address = 0;
        for (axis, ((&c, &bound), &stride)) in coords
            .iter()
            .zip(&self.bounds)
            .zip(&self.strides)
            .enumerate()
        {
            if c >= bound {
                return Err(DomainError::CoordOutOfBound {
                    axis,
                    value: c as i128,
                    bound,
                });
            }
            // Cannot overflow: the running sum stays below capacity.
            address += c * stride;
        }
        Ok(address)
    }

    /// Encode quantization indices, rejecting negative values.
    pub fn encode_indices(&self, indices: &[QuantIndex]) -> SbsaResult<Address> {
        let coords = self.coords_from_indices(indices)?;
        self.encode(&coords)
    }

    // ------------------------------------------------------------------ decode

    /// Decode an address back into its coordinate tuple.
    pub fn decode(&self, address: Address) -> SbsaResult<Vec<Coord>> {
        let mut coords = vec![0; self.bounds.len()];
        self.decode_into(address, &mut coords)?;
        Ok(coords)
    }

    /// Decode into a caller-provided buffer (no allocation).
    pub fn decode_into(&self, address: Address, out: &mut [Coord]) -> SbsaResult<()> {
        if !self.contains(address) {
            return Err(DomainError::AddressOutOfRange {
                address,
                capacity: self.capacity,
            });
        }
        self.check_arity(out.len())?;

        let mut rest = address;
        for (slot, &bound) in out.iter_mut().zip(&self.bounds) {
            *slot = rest % bound;
            rest /= bound;
        }
        Ok(())
    }

    // ------------------------------------------------------------------ locate

    /// Quantize a continuous point and return its cell.
    pub fn locate(&self, point: &[f64], quantizer: &Quantizer) -> SbsaResult<Cell> {
        self.check_arity(point.len())?;
        let indices = quantizer.quantize_point(point)?;
        let coords = self.coords_from_indices(&indices)?;
        let address = self.encode(&coords)?;
        Ok(Cell { address, coords })
    }

    fn coords_from_indices(&self, indices: &[QuantIndex]) -> SbsaResult<Vec<Coord>> {
        self.check_arity(indices.len())?;
        indices
            .iter()
            .zip(&self.bounds)
            .enumerate()
            .map(|(axis, (&n, &bound))| {
                if n >= 0 && (n as u64) < bound {
                    Ok(n as u64)
                } else {
                    Err(DomainError::CoordOutOfBound {
                        axis,
                        value: n as i128,
                        bound,
                    })
                }
            })
            .collect()
    }

    fn check_arity(&self, actual: usize) -> SbsaResult<()> {
        if actual == self.bounds.len() {
            Ok(())
        } else {
            Err(DomainError::ArityMismatch {
                expected: self.bounds.len(),
                actual,
            })
        }
    }
}

impl Default for Hypercube {
    fn default() -> Self {
        Self::sbsa()
    }
}

impl TryFrom<Vec<u64>> for Hypercube {
    type Error = DomainError;

    fn try_from(bounds: Vec<u64>) -> Result<Self, Self::Error> {
        Self::new(bounds)
    }
}

impl From<Hypercube> for Vec<u64> {
    fn from(cube: Hypercube) -> Self {
        cube.bounds
    }
}

impl std::fmt::Display for Hypercube {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dims: Vec<String> = self.bounds.iter().map(|b| b.to_string()).collect();
        write!(f, "{} ({} cells)", dims.join("x"), self.capacity)
    }
}

/// Encode `coords` against `bounds` without keeping the hypercube.
pub fn encode(coords: &[Coord], bounds: &[u64]) -> SbsaResult<Address> {
    Hypercube::new(bounds.to_vec())?.encode(coords)
}

/// Decode `address` against `bounds` without keeping the hypercube.
pub fn decode(address: Address, bounds: &[u64]) -> SbsaResult<Vec<Coord>> {
    Hypercube::new(bounds.to_vec())?.decode(address)
}
