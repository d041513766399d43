//! Error types for the OFDM link simulator.
//!
//! Every fallible operation returns a structured [`Error`]. Each variant
//! belongs to one failure domain:
//! - Configuration: invalid or inconsistent static parameters, raised once
//!   at setup (bad pilot layout, unknown modulation or channel type)
//! - Invalid input: per-call shape or content problems (bit count, array length)
//! - Numerical instability: a near-zero channel estimate met during equalization

use thiserror::Error;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidInput,
    NumericalInstability,
}

/// Top-level error type for all simulator operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Static parameters are invalid; the run must be reconfigured.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// A call received input of the wrong shape or content.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// Equalization would divide by a (near-)zero channel estimate.
    #[error("numerical instability: channel estimate magnitude {magnitude:e} at subcarrier {index}")]
    NumericalInstability { index: usize, magnitude: f64 },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::NumericalInstability { .. } => ErrorKind::NumericalInstability,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Modulation name not one of the supported schemes
    #[error("unsupported modulation scheme: {0:?}")]
    UnknownModulation(String),

    /// Channel type name not recognized
    #[error("unsupported channel type: {0:?}")]
    UnknownChannel(String),

    /// Grid must have at least two subcarriers
    #[error("grid size {0} is too small (need at least 2 subcarriers)")]
    GridTooSmall(usize),

    /// Comb pilot step of zero
    #[error("pilot step must be at least 1")]
    ZeroPilotStep,

    /// Pilot layout with fewer than two pilots cannot be interpolated
    #[error("need at least 2 pilots for interpolation, got {0}")]
    TooFewPilots(usize),

    /// Pilot indices must be strictly ascending
    #[error("pilot indices must be strictly ascending (index {index} follows {previous})")]
    PilotsNotAscending { previous: usize, index: usize },

    /// Pilot index outside the grid
    #[error("pilot index {index} outside grid of size {size}")]
    PilotOutOfRange { index: usize, size: usize },

    /// Linear interpolation cannot extrapolate past the outermost pilots
    #[error("pilots must include the first (0) and last ({last}) subcarrier, got range {first}..={end}")]
    PilotsDoNotSpanGrid { first: usize, end: usize, last: usize },

    /// Pilot and data sets do not partition the grid
    #[error("pilot/data sets do not partition [0, {size}): {reason}")]
    BrokenPartition { size: usize, reason: String },

    /// No room left for payload
    #[error("grid of size {0} has no data subcarriers")]
    NoDataCarriers(usize),

    /// Cyclic prefix must be shorter than the symbol
    #[error("cyclic prefix length {cp_len} must be smaller than the symbol length {size}")]
    PrefixTooLong { cp_len: usize, size: usize },

    /// Pilot value of zero makes the least-squares estimate undefined
    #[error("pilot value must be non-zero and finite")]
    InvalidPilotValue,

    /// SNR must be a finite number of dB
    #[error("SNR must be finite, got {0} dB")]
    InvalidSnr(f64),

    /// Multipath response needs at least one finite tap
    #[error("channel response must contain at least one finite tap")]
    InvalidChannelTaps,
}

/// Per-call input errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// Bit count not divisible by bits-per-symbol
    #[error("bit count {len} is not a multiple of {bits_per_symbol} bits per symbol")]
    BitLength { len: usize, bits_per_symbol: usize },

    /// Bit value other than 0 or 1
    #[error("bit at position {position} has value {value}, expected 0 or 1")]
    NotABit { position: usize, value: u8 },

    /// Wrong number of payload symbols for the data carriers
    #[error("expected {expected} data symbols, got {actual}")]
    SymbolCount { expected: usize, actual: usize },

    /// Array has the wrong length for the operation
    #[error("expected {expected} samples, got {actual}")]
    Length { expected: usize, actual: usize },

    /// Waveform too short to hold a prefix plus one symbol
    #[error("waveform of {actual} samples is shorter than prefix + symbol ({required})")]
    WaveformTooShort { required: usize, actual: usize },

    /// Operation needs at least one sample
    #[error("input is empty")]
    Empty,

    /// NaN or infinity in the input
    #[error("non-finite sample at position {0}")]
    NonFinite(usize),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
