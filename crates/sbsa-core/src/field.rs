//! Wave Field Sampler
//!
//! Evaluates a superposition of sinusoidal components at a hypercube cell:
//!
//! ```text
//!   value = Σ_k A_k · sin(2π·f_k·t + φ_k + 2π·κ_k·g(u))
//!
//!   u_i = coords_i / bound_i          normalized position in [0, 1)
//!   g(u) = ‖u‖₂      radial  (default)
//!        = Σ u_i     planar
//!        = 0         flat
//! ```
//!
//! `A` is the amplitude, `f` the temporal frequency in cycles per unit time,
//! `φ` the phase offset in radians and `κ` the spatial wavenumber in cycles
//! per unit of `g`. The sampler is a pure function of `(address, time)` and
//! the field parameters; sampling the same inputs twice is bit-identical.
//!
//! ## Example
//!
//! ```rust
//! use sbsa_core::address::Hypercube;
//! use sbsa_core::field::{SpatialPhase, WaveComponent, WaveField};
//!
//! let cube = Hypercube::new(vec![4, 5, 6, 7]).unwrap();
//! let field = WaveField::new(
//!     cube,
//!     vec![WaveComponent::new(1.0, 2.0, 0.0)],
//!     SpatialPhase::Flat,
//! ).unwrap();
//!
//! let v = field.sample(549, 0.25).unwrap();
//! assert!((v - 2.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::address::{Hypercube, MAX_DIMENSIONS};
use crate::types::{ensure_finite, Address, Coord, DomainError, Phasor, SbsaResult};

fn default_wavenumber() -> f64 {
    1.0
}

/// One sinusoidal term of the superposition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveComponent {
    /// Temporal frequency (cycles per unit time, must be ≥ 0)
    pub frequency: f64,
    /// Peak amplitude
    pub amplitude: f64,
    /// Phase offset in radians
    #[serde(default)]
    pub phase: f64,
    /// Spatial wavenumber applied to the geometry term
    #[serde(default = "default_wavenumber")]
    pub wavenumber: f64,
}

impl WaveComponent {
    /// Create a component with unit wavenumber.
    pub fn new(frequency: f64, amplitude: f64, phase: f64) -> Self {
        Self {
            frequency,
            amplitude,
            phase,
            wavenumber: default_wavenumber(),
        }
    }

    pub fn with_wavenumber(mut self, wavenumber: f64) -> Self {
        self.wavenumber = wavenumber;
        self
    }

    fn validate(&self, index: usize) -> SbsaResult<()> {
        ensure_finite("frequency", self.frequency)?;
        if self.frequency < 0.0 {
            return Err(DomainError::NegativeFrequency {
                component: index,
                frequency: self.frequency,
            });
        }
        ensure_finite("amplitude", self.amplitude)?;
        ensure_finite("phase", self.phase)?;
        ensure_finite("wavenumber", self.wavenumber)?;
        Ok(())
    }

    /// Instantaneous phase for a given time and geometry term.
    #[inline]
    fn phase_at(&self, time: f64, geometry: f64) -> f64 {
        TAU * self.frequency * time + self.phase + TAU * self.wavenumber * geometry
    }
}

/// How a cell's position contributes to each component's phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpatialPhase {
    /// Euclidean norm of the normalized coordinates (spherical wavefronts
    /// centred on the origin cell)
    Radial,
    /// Sum of the normalized coordinates (plane wave along the diagonal)
    Planar,
    /// No spatial term; every cell oscillates in phase
    #[serde(alias = "none")]
    Flat,
}

impl Default for SpatialPhase {
    fn default() -> Self {
        SpatialPhase::Radial
    }
}

impl SpatialPhase {
    /// Geometry term `g(u)` for decoded coordinates.
    pub fn geometry(self, coords: &[Coord], bounds: &[u64]) -> f64 {
        let normalized = coords
            .iter()
            .zip(bounds)
            .map(|(&c, &b)| c as f64 / b as f64);
        match self {
            SpatialPhase::Radial => normalized.map(|u| u * u).sum::<f64>().sqrt(),
            SpatialPhase::Planar => normalized.sum(),
            SpatialPhase::Flat => 0.0,
        }
    }
}

impl std::fmt::Display for SpatialPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpatialPhase::Radial => write!(f, "radial"),
            SpatialPhase::Planar => write!(f, "planar"),
            SpatialPhase::Flat => write!(f, "flat"),
        }
    }
}

impl std::str::FromStr for SpatialPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "radial" => Ok(SpatialPhase::Radial),
            "planar" => Ok(SpatialPhase::Planar),
            "flat" | "none" => Ok(SpatialPhase::Flat),
            other => Err(format!("unknown spatial phase '{}'", other)),
        }
    }
}

/// Parameters of the wave superposition, independent of any hypercube.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WaveParams {
    pub components: Vec<WaveComponent>,
    #[serde(default)]
    pub spatial: SpatialPhase,
}

impl WaveParams {
    /// Check every component (frequencies non-negative, all values finite).
    pub fn validate(&self) -> SbsaResult<()> {
        self.components
            .iter()
            .enumerate()
            .try_for_each(|(i, c)| c.validate(i))
    }
}

/// A validated wave field over a hypercube.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveField {
    cube: Hypercube,
    params: WaveParams,
}

impl WaveField {
    /// Create a field, rejecting invalid components.
    pub fn new(
        cube: Hypercube,
        components: Vec<WaveComponent>,
        spatial: SpatialPhase,
    ) -> SbsaResult<Self> {
        Self::from_params(cube, WaveParams { components, spatial })
    }

    pub fn from_params(cube: Hypercube, params: WaveParams) -> SbsaResult<Self> {
        params.validate()?;
        Ok(Self { cube, params })
    }

    pub fn hypercube(&self) -> &Hypercube {
        &self.cube
    }

    pub fn params(&self) -> &WaveParams {
        &self.params
    }

    pub fn components(&self) -> &[WaveComponent] {
        &self.params.components
    }

    pub fn spatial(&self) -> SpatialPhase {
        self.params.spatial
    }

    /// Upper bound on `|sample|`: the sum of absolute amplitudes.
    pub fn peak_amplitude(&self) -> f64 {
        self.params.components.iter().map(|c| c.amplitude.abs()).sum()
    }

    /// Sample the real field value at `address` and `time`.
    ///
    /// Finite parameters can still overflow (a phase of `inf` or an
    /// amplitude sum past `f64::MAX`); such results are reported as
    /// [`DomainError::NonFinite`].
    pub fn sample(&self, address: Address, time: f64) -> SbsaResult<f64> {
        let geometry = self.geometry_at(address, time)?;
        let value = self
            .params
            .components
            .iter()
            .map(|c| c.amplitude * c.phase_at(time, geometry).sin())
            .sum();
        ensure_finite("sample", value)
    }

    /// Sample the analytic phasor `Σ A·e^{iθ}`; its imaginary part is the
    /// real field value.
    pub fn sample_complex(&self, address: Address, time: f64) -> SbsaResult<Phasor> {
        let geometry = self.geometry_at(address, time)?;
        let phasor: Phasor = self
            .params
            .components
            .iter()
            .map(|c| Phasor::from_polar(c.amplitude, c.phase_at(time, geometry)))
            .sum();
        ensure_finite("sample", phasor.re)?;
        ensure_finite("sample", phasor.im)?;
        Ok(phasor)
    }

    /// Sample at a coordinate tuple instead of an address.
    pub fn sample_at(&self, coords: &[Coord], time: f64) -> SbsaResult<f64> {
        let address = self.cube.encode(coords)?;
        self.sample(address, time)
    }

    fn geometry_at(&self, address: Address, time: f64) -> SbsaResult<f64> {
        ensure_finite("time", time)?;
        let dims = self.cube.dimensions();
        let mut buf = [0 as Coord; MAX_DIMENSIONS];
        self.cube.decode_into(address, &mut buf[..dims])?;
        Ok(self.params.spatial.geometry(&buf[..dims], self.cube.bounds()))
    }
}

/// Sample `params` at `address` of the hypercube bounded by `cube`.
///
/// Validates the parameters on every call; build a [`WaveField`] once when
/// sampling many cells.
pub fn sample(address: Address, cube: &Hypercube, time: f64, params: &WaveParams) -> SbsaResult<f64> {
    let field = WaveField::from_params(cube.clone(), params.clone())?;
    field.sample(address, time)
}
