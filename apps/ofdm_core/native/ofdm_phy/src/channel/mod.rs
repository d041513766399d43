//! Synthetic propagation channel
//!
//! Two variants:
//! - **Multipath**: full linear convolution with a short fixed impulse
//!   response, then AWGN. Output grows by `taps - 1` samples.
//! - **Awgn**: noise only, output length equals input length.
//!
//! Noise power is set relative to the power of the signal it is added to:
//! `P_noise = mean(|y|²) / 10^(SNR/10)`. The random source is a seeded
//! ChaCha8, so a given seed always produces the same realization.

mod noise;

use std::fmt;
use std::str::FromStr;

use rustfft::num_complex::Complex64;
use tracing::{debug, trace};

use crate::error::{ConfigError, Error, InputError, Result};
use crate::transform::frequency_response;
use crate::utils::{db_to_power_ratio, mean_power};

pub use noise::ComplexNoise;

/// Default two-tap multipath response: direct path plus one echo
pub const DEFAULT_TAPS: [Complex64; 2] = [Complex64::new(1.0, 0.0), Complex64::new(0.3, 0.3)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelType {
    /// Convolve with the multipath response, then add noise
    Multipath,
    /// Additive noise only
    Awgn,
}

impl ChannelType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Multipath => "multipath",
            Self::Awgn => "awgn",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChannelType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "multipath" | "random" => Ok(Self::Multipath),
            "awgn" => Ok(Self::Awgn),
            _ => Err(ConfigError::UnknownChannel(s.to_string()).into()),
        }
    }
}

/// Received samples plus the noise power that was realized for them
#[derive(Debug, Clone)]
pub struct ChannelOutput {
    pub samples: Vec<Complex64>,
    pub noise_power: f64,
}

/// Configured channel instance
#[derive(Debug, Clone)]
pub struct Channel {
    channel_type: ChannelType,
    snr_db: f64,
    taps: Vec<Complex64>,
}

impl Channel {
    /// Channel with the default multipath response.
    pub fn new(channel_type: ChannelType, snr_db: f64) -> Result<Self> {
        Self::with_taps(channel_type, snr_db, DEFAULT_TAPS.to_vec())
    }

    /// Channel with a caller-supplied impulse response (ignored for AWGN).
    pub fn with_taps(channel_type: ChannelType, snr_db: f64, taps: Vec<Complex64>) -> Result<Self> {
        if !snr_db.is_finite() {
            return Err(ConfigError::InvalidSnr(snr_db).into());
        }
        if taps.is_empty() || taps.iter().any(|t| !t.re.is_finite() || !t.im.is_finite()) {
            return Err(ConfigError::InvalidChannelTaps.into());
        }
        Ok(Self { channel_type, snr_db, taps })
    }

    pub fn channel_type(&self) -> ChannelType {
        self.channel_type
    }

    pub fn snr_db(&self) -> f64 {
        self.snr_db
    }

    pub fn taps(&self) -> &[Complex64] {
        &self.taps
    }

    /// Pass `input` through the channel using noise seeded from `seed`.
    pub fn apply(&self, input: &[Complex64], seed: u64) -> Result<ChannelOutput> {
        if input.is_empty() {
            return Err(InputError::Empty.into());
        }

        let mut samples = match self.channel_type {
            ChannelType::Multipath => convolve(input, &self.taps),
            ChannelType::Awgn => input.to_vec(),
        };

        let signal_power = mean_power(&samples);
        let noise_power = signal_power / db_to_power_ratio(self.snr_db);
        debug!(
            channel = %self.channel_type,
            snr_db = self.snr_db,
            signal_power,
            noise_power,
            len = samples.len(),
            "applying channel"
        );

        let mut noise = ComplexNoise::new(noise_power, seed);
        noise.add_to(&mut samples);
        trace!(first = ?samples.first(), "channel output ready");

        Ok(ChannelOutput { samples, noise_power })
    }

    /// Ground-truth frequency response on an `size`-point grid.
    ///
    /// The AWGN channel has a flat unit response.
    pub fn exact_response(&self, size: usize) -> Vec<Complex64> {
        match self.channel_type {
            ChannelType::Multipath => exact_response(&self.taps, size),
            ChannelType::Awgn => vec![Complex64::new(1.0, 0.0); size],
        }
    }
}

/// Simulate transmission through a channel of the given type.
///
/// Returns the received waveform and the realized noise power.
pub fn apply_channel(
    waveform: &[Complex64],
    snr_db: f64,
    channel_type: ChannelType,
    seed: u64,
) -> Result<(Vec<Complex64>, f64)> {
    let out = Channel::new(channel_type, snr_db)?.apply(waveform, seed)?;
    Ok((out.samples, out.noise_power))
}

/// Zero-padded `size`-point FFT of the multipath taps.
pub fn exact_response(taps: &[Complex64], size: usize) -> Vec<Complex64> {
    frequency_response(taps, size)
}

/// Full linear convolution, length `x.len() + h.len() - 1`
fn convolve(x: &[Complex64], h: &[Complex64]) -> Vec<Complex64> {
    let mut y = vec![Complex64::new(0.0, 0.0); x.len() + h.len() - 1];
    for (i, &xi) in x.iter().enumerate() {
        for (j, &hj) in h.iter().enumerate() {
            y[i + j] += xi * hj;
        }
    }
    y
}
