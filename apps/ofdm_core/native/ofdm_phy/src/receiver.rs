//! Pilot-aided OFDM receiver
//!
//! Stages, each consuming the previous one's output:
//!
//! ```text
//! waveform ─► strip CP ─► FFT ─► LS at pilots ─► interpolate |H|, ∠H
//!                                                     │
//!        data symbols ◄─ extract data ◄─ Y / Ĥ ◄──────┘
//! ```
//!
//! Magnitude and phase of the pilot estimates are interpolated separately
//! and recombined as `|H|·e^{j∠H}`. The phase is taken straight from
//! `atan2` without unwrapping, so a channel whose phase crosses ±π between
//! two pilots gets a distorted estimate on those subcarriers.

use rustfft::num_complex::Complex64;
use tracing::{debug, warn};

use crate::config::OfdmConfig;
use crate::error::{ConfigError, Error, InputError, Result};
use crate::frame::extract_data;
use crate::grid::{validate_pilot_indices, SubcarrierGrid};
use crate::transform::OfdmTransform;
use crate::utils::interp_linear;

/// Estimates with magnitude below this are treated as zero during equalization
pub const MIN_ESTIMATE_MAGNITUDE: f64 = 1e-12;

// ============================================================================
// Stage functions
// ============================================================================

/// Least-squares channel estimate at each pilot: `Y[p] / pilot_value`
pub fn pilot_estimates(
    received: &[Complex64],
    pilot_indices: &[usize],
    pilot_value: Complex64,
) -> Vec<Complex64> {
    pilot_indices.iter().map(|&p| received[p] / pilot_value).collect()
}

/// Estimate the channel on every subcarrier from the received pilots.
///
/// Pilots must be strictly ascending and include subcarriers 0 and
/// `grid_size - 1`: linear interpolation cannot extrapolate.
pub fn estimate_channel(
    received: &[Complex64],
    pilot_indices: &[usize],
    pilot_value: Complex64,
    grid_size: usize,
) -> Result<Vec<Complex64>> {
    validate_pilot_indices(pilot_indices, grid_size)?;
    if !is_usable_pilot(pilot_value) {
        return Err(ConfigError::InvalidPilotValue.into());
    }
    if received.len() != grid_size {
        return Err(InputError::Length { expected: grid_size, actual: received.len() }.into());
    }

    let at_pilots = pilot_estimates(received, pilot_indices, pilot_value);
    Ok(interpolate_estimates(pilot_indices, &at_pilots, grid_size))
}

/// Interpolate pilot estimates across `[0, grid_size)`, magnitude and phase
/// independently.
pub fn interpolate_estimates(
    pilot_indices: &[usize],
    at_pilots: &[Complex64],
    grid_size: usize,
) -> Vec<Complex64> {
    let xs: Vec<f64> = pilot_indices.iter().map(|&p| p as f64).collect();
    let mags: Vec<f64> = at_pilots.iter().map(|h| h.norm()).collect();
    let phases: Vec<f64> = at_pilots.iter().map(|h| h.arg()).collect();

    (0..grid_size)
        .map(|k| {
            let x = k as f64;
            let mag = interp_linear(&xs, &mags, x);
            let phase = interp_linear(&xs, &phases, x);
            Complex64::from_polar(mag, phase)
        })
        .collect()
}

/// Divide the received grid by the channel estimate, subcarrier by subcarrier.
///
/// Fails with `NumericalInstability` rather than producing inf/NaN when an
/// estimate is (near) zero.
pub fn equalize(received: &[Complex64], estimate: &[Complex64]) -> Result<Vec<Complex64>> {
    if received.len() != estimate.len() {
        return Err(InputError::Length { expected: estimate.len(), actual: received.len() }.into());
    }

    received
        .iter()
        .zip(estimate)
        .enumerate()
        .map(|(index, (&y, &h))| {
            let magnitude = h.norm();
            if !(magnitude.is_finite() && magnitude >= MIN_ESTIMATE_MAGNITUDE) {
                warn!(index, magnitude, "channel estimate unusable for equalization");
                return Err(Error::NumericalInstability { index, magnitude });
            }
            Ok(y / h)
        })
        .collect()
}

/// A pilot whose LS division stays finite and above the estimate floor.
#[inline]
pub(crate) fn is_usable_pilot(p: Complex64) -> bool {
    p.re.is_finite() && p.im.is_finite() && p.norm() >= MIN_ESTIMATE_MAGNITUDE
}

// ============================================================================
// Receiver
// ============================================================================

/// Everything the receiver computed for one OFDM symbol
#[derive(Debug, Clone)]
pub struct ReceivedSymbol {
    /// FFT of the prefix-stripped waveform
    pub grid: Vec<Complex64>,
    /// LS estimates at the pilot subcarriers
    pub pilot_estimates: Vec<Complex64>,
    /// Interpolated estimate on every subcarrier
    pub channel_estimate: Vec<Complex64>,
    /// Grid after equalization
    pub equalized: Vec<Complex64>,
    /// Equalized data subcarriers in ascending order
    pub data: Vec<Complex64>,
}

/// Receiver bound to one validated configuration
#[derive(Debug)]
pub struct Receiver {
    grid: SubcarrierGrid,
    pilot_value: Complex64,
    transform: OfdmTransform,
}

impl Receiver {
    pub fn new(config: &OfdmConfig) -> Result<Self> {
        Ok(Self {
            grid: config.grid().clone(),
            pilot_value: config.pilot_value(),
            transform: OfdmTransform::new(config.grid().size(), config.cp_len())?,
        })
    }

    pub fn grid(&self) -> &SubcarrierGrid {
        &self.grid
    }

    /// Run every receiver stage on one received waveform.
    pub fn process(&self, waveform: &[Complex64]) -> Result<ReceivedSymbol> {
        let grid = self.transform.to_frequency_domain(waveform)?;
        let pilots = self.grid.pilot_indices();

        // Pilot layout and value were validated with the config
        let at_pilots = pilot_estimates(&grid, pilots, self.pilot_value);
        let channel_estimate = interpolate_estimates(pilots, &at_pilots, self.grid.size());
        let equalized = equalize(&grid, &channel_estimate)?;
        let data = extract_data(&equalized, &self.grid)?;

        debug!(
            pilots = pilots.len(),
            data = data.len(),
            "received OFDM symbol"
        );

        Ok(ReceivedSymbol {
            grid,
            pilot_estimates: at_pilots,
            channel_estimate,
            equalized,
            data,
        })
    }
}
