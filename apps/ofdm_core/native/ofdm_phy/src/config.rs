//! Simulation configuration
//!
//! `OfdmConfig` is built once, validated once, and then shared read-only by
//! every pipeline stage. Defaults:
//!
//! | parameter      | default            |
//! |----------------|--------------------|
//! | subcarriers    | 64                 |
//! | pilot step     | 8 (+ last index)   |
//! | cyclic prefix  | subcarriers / 4    |
//! | pilot value    | 3 + 3j             |
//! | modulation     | 16-QAM             |
//! | channel        | multipath          |
//! | SNR            | 25 dB              |

use rustfft::num_complex::Complex64;
use tracing::debug;

use crate::channel::{Channel, ChannelType, DEFAULT_TAPS};
use crate::error::{ConfigError, Result};
use crate::grid::SubcarrierGrid;
use crate::modulation::Modulation;
use crate::receiver::is_usable_pilot;
use crate::transform::OfdmTransform;

pub const DEFAULT_SUBCARRIERS: usize = 64;
pub const DEFAULT_PILOT_STEP: usize = 8;
pub const DEFAULT_PILOT_VALUE: Complex64 = Complex64::new(3.0, 3.0);
pub const DEFAULT_SNR_DB: f64 = 25.0;

/// Validated, immutable simulation parameters
#[derive(Debug, Clone)]
pub struct OfdmConfig {
    grid: SubcarrierGrid,
    cp_len: usize,
    pilot_value: Complex64,
    modulation: Modulation,
    channel: Channel,
}

impl OfdmConfig {
    pub fn builder() -> OfdmConfigBuilder {
        OfdmConfigBuilder::default()
    }

    /// The default parameter set (see module docs)
    pub fn standard() -> Result<Self> {
        Self::builder().build()
    }

    pub fn grid(&self) -> &SubcarrierGrid {
        &self.grid
    }

    pub fn subcarriers(&self) -> usize {
        self.grid.size()
    }

    pub fn cp_len(&self) -> usize {
        self.cp_len
    }

    pub fn pilot_value(&self) -> Complex64 {
        self.pilot_value
    }

    pub fn modulation(&self) -> Modulation {
        self.modulation
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn channel_type(&self) -> ChannelType {
        self.channel.channel_type()
    }

    pub fn snr_db(&self) -> f64 {
        self.channel.snr_db()
    }

    /// Payload bits carried by one OFDM symbol
    pub fn payload_bits(&self) -> usize {
        self.modulation.payload_bits(self.grid.num_data())
    }
}

/// Pilot layout requested from the builder
#[derive(Debug, Clone)]
enum PilotLayout {
    Comb { step: usize },
    Explicit(Vec<usize>),
}

/// Builder for [`OfdmConfig`]; all validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct OfdmConfigBuilder {
    subcarriers: usize,
    pilots: PilotLayout,
    cp_len: Option<usize>,
    pilot_value: Complex64,
    modulation: Modulation,
    channel_type: ChannelType,
    snr_db: f64,
    taps: Vec<Complex64>,
}

impl Default for OfdmConfigBuilder {
    fn default() -> Self {
        Self {
            subcarriers: DEFAULT_SUBCARRIERS,
            pilots: PilotLayout::Comb { step: DEFAULT_PILOT_STEP },
            cp_len: None,
            pilot_value: DEFAULT_PILOT_VALUE,
            modulation: Modulation::Qam16,
            channel_type: ChannelType::Multipath,
            snr_db: DEFAULT_SNR_DB,
            taps: DEFAULT_TAPS.to_vec(),
        }
    }
}

impl OfdmConfigBuilder {
    pub fn subcarriers(mut self, n: usize) -> Self {
        self.subcarriers = n;
        self
    }

    /// Comb pilots every `step` subcarriers plus the last subcarrier
    pub fn pilot_step(mut self, step: usize) -> Self {
        self.pilots = PilotLayout::Comb { step };
        self
    }

    /// Explicit pilot subcarriers (must include 0 and N-1)
    pub fn pilot_indices(mut self, indices: Vec<usize>) -> Self {
        self.pilots = PilotLayout::Explicit(indices);
        self
    }

    /// Cyclic prefix length; defaults to a quarter of the subcarrier count
    pub fn cp_len(mut self, cp_len: usize) -> Self {
        self.cp_len = Some(cp_len);
        self
    }

    pub fn pilot_value(mut self, value: Complex64) -> Self {
        self.pilot_value = value;
        self
    }

    pub fn modulation(mut self, modulation: Modulation) -> Self {
        self.modulation = modulation;
        self
    }

    pub fn channel(mut self, channel_type: ChannelType) -> Self {
        self.channel_type = channel_type;
        self
    }

    pub fn snr_db(mut self, snr_db: f64) -> Self {
        self.snr_db = snr_db;
        self
    }

    /// Multipath impulse response
    pub fn taps(mut self, taps: Vec<Complex64>) -> Self {
        self.taps = taps;
        self
    }

    pub fn build(self) -> Result<OfdmConfig> {
        let grid = match self.pilots {
            PilotLayout::Comb { step } => SubcarrierGrid::comb(self.subcarriers, step)?,
            PilotLayout::Explicit(indices) => SubcarrierGrid::from_pilots(self.subcarriers, indices)?,
        };

        let cp_len = self.cp_len.unwrap_or_else(|| OfdmTransform::default_cp_len(grid.size()));
        if cp_len >= grid.size() {
            return Err(ConfigError::PrefixTooLong { cp_len, size: grid.size() }.into());
        }

        if !is_usable_pilot(self.pilot_value) {
            return Err(ConfigError::InvalidPilotValue.into());
        }

        let channel = Channel::with_taps(self.channel_type, self.snr_db, self.taps)?;

        debug!(
            subcarriers = grid.size(),
            pilots = grid.num_pilots(),
            data = grid.num_data(),
            cp_len,
            modulation = %self.modulation,
            channel = %channel.channel_type(),
            snr_db = channel.snr_db(),
            "OFDM configuration validated"
        );

        Ok(OfdmConfig {
            grid,
            cp_len,
            pilot_value: self.pilot_value,
            modulation: self.modulation,
            channel,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_default_parameters() {
        let cfg = OfdmConfig::standard().unwrap();
        assert_eq!(cfg.subcarriers(), 64);
        assert_eq!(cfg.cp_len(), 16);
        assert_eq!(cfg.grid().num_pilots(), 9);
        assert_eq!(cfg.grid().num_data(), 55);
        assert_eq!(cfg.pilot_value(), Complex64::new(3.0, 3.0));
        assert_eq!(cfg.modulation(), Modulation::Qam16);
        assert_eq!(cfg.channel_type(), ChannelType::Multipath);
        assert_eq!(cfg.snr_db(), 25.0);
        assert_eq!(cfg.payload_bits(), 220);
    }

    #[test]
    fn test_default_taps() {
        let cfg = OfdmConfig::standard().unwrap();
        assert_eq!(cfg.channel().taps(), &DEFAULT_TAPS);
        assert_eq!(cfg.grid().pilot_indices(), &[0, 8, 16, 24, 32, 40, 48, 56, 63]);
    }

    #[test]
    fn test_builder_custom() {
        let cfg = OfdmConfig::builder()
            .subcarriers(128)
            .pilot_step(16)
            .modulation(Modulation::Qam64)
            .channel(ChannelType::Awgn)
            .snr_db(30.0)
            .build()
            .unwrap();
        assert_eq!(cfg.cp_len(), 32);
        assert_eq!(cfg.grid().num_pilots(), 9);
        assert_eq!(cfg.payload_bits(), 6 * 119);
    }

    #[test]
    fn test_builder_rejects_bad_layouts() {
        let err = OfdmConfig::builder().pilot_indices(vec![0, 8, 16]).build().unwrap_err();
        assert!(matches!(err, Error::Configuration(ConfigError::PilotsDoNotSpanGrid { .. })));

        let err = OfdmConfig::builder().pilot_step(0).build().unwrap_err();
        assert!(matches!(err, Error::Configuration(ConfigError::ZeroPilotStep)));

        let err = OfdmConfig::builder().cp_len(64).build().unwrap_err();
        assert!(matches!(err, Error::Configuration(ConfigError::PrefixTooLong { .. })));
    }

    #[test]
    fn test_builder_rejects_bad_values() {
        let err = OfdmConfig::builder()
            .pilot_value(Complex64::new(0.0, 0.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(ConfigError::InvalidPilotValue)));

        let err = OfdmConfig::builder().snr_db(f64::NAN).build().unwrap_err();
        assert!(matches!(err, Error::Configuration(ConfigError::InvalidSnr(_))));
    }

    #[test]
    fn test_builder_and_estimator_agree_on_tiny_pilot() {
        let tiny = Complex64::new(1e-13, 0.0);
        let err = OfdmConfig::builder().pilot_value(tiny).build().unwrap_err();
        assert!(matches!(err, Error::Configuration(ConfigError::InvalidPilotValue)));

        let cfg = OfdmConfig::standard().unwrap();
        let received = vec![Complex64::new(1.0, 0.0); 64];
        let err = crate::receiver::estimate_channel(&received, cfg.grid().pilot_indices(), tiny, 64)
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(ConfigError::InvalidPilotValue)));

        // Just above the floor is accepted by both
        let small = Complex64::new(1e-11, 0.0);
        assert!(OfdmConfig::builder().pilot_value(small).build().is_ok());
        assert!(crate::receiver::estimate_channel(&received, cfg.grid().pilot_indices(), small, 64).is_ok());
    }
}
