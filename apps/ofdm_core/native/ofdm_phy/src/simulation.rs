//! End-to-end single-symbol link simulation
//!
//! One run: random payload → modulate → frame → IFFT + CP → channel →
//! receiver → hard decision → metrics. Each run is a pure function of the
//! configuration and its seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustfft::num_complex::Complex64;
use tracing::debug;

use crate::config::OfdmConfig;
use crate::error::Result;
use crate::frame::build_symbol;
use crate::modulation::{demodulate, modulate};
use crate::observer::{NullObserver, PipelineObserver};
use crate::receiver::Receiver;
use crate::transform::OfdmTransform;

/// Outcome of one simulated OFDM symbol
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub seed: u64,
    pub bits: Vec<u8>,
    pub transmitted: Vec<Complex64>,
    pub recovered: Vec<Complex64>,
    pub decided_bits: Vec<u8>,
    pub bit_errors: usize,
    pub ber: f64,
    /// Noise power actually used by the channel
    pub noise_power: f64,
    /// Mean |Ĥ - H|² over all subcarriers
    pub channel_mse: f64,
    /// RMS error vector magnitude of the recovered symbols, percent
    pub evm_percent: f64,
}

/// Simulation driver bound to one validated configuration.
///
/// Transform plans and the ground-truth response are computed once and
/// reused by every run.
#[derive(Debug)]
pub struct Simulation {
    config: OfdmConfig,
    transform: OfdmTransform,
    receiver: Receiver,
    exact: Vec<Complex64>,
}

impl Simulation {
    pub fn new(config: OfdmConfig) -> Result<Self> {
        let transform = OfdmTransform::new(config.subcarriers(), config.cp_len())?;
        let receiver = Receiver::new(&config)?;
        let exact = config.channel().exact_response(config.subcarriers());
        Ok(Self { config, transform, receiver, exact })
    }

    pub fn config(&self) -> &OfdmConfig {
        &self.config
    }

    /// Ground-truth channel response on the configured grid
    pub fn exact_response(&self) -> &[Complex64] {
        &self.exact
    }

    pub fn run(&self, seed: u64) -> Result<SimulationReport> {
        self.run_with_observer(seed, &mut NullObserver)
    }

    pub fn run_with_observer(
        &self,
        seed: u64,
        observer: &mut dyn PipelineObserver,
    ) -> Result<SimulationReport> {
        let cfg = &self.config;
        let grid = cfg.grid();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let bits: Vec<u8> = (0..cfg.payload_bits())
            .map(|_| rng.gen_bool(0.5) as u8)
            .collect();
        let channel_seed: u64 = rng.gen();

        // TX
        let (transmitted, _info) = modulate(&bits, cfg.modulation())?;
        let symbol = build_symbol(&transmitted, grid, cfg.pilot_value())?;
        let tx_waveform = self.transform.to_time_domain(&symbol)?;
        observer.on_grid(grid);

        // Channel
        let channel_out = cfg.channel().apply(&tx_waveform, channel_seed)?;
        observer.on_waveforms(&tx_waveform, &channel_out.samples);

        // RX
        let rx = self.receiver.process(&channel_out.samples)?;
        observer.on_channel_estimate(
            grid.pilot_indices(),
            &rx.pilot_estimates,
            &rx.channel_estimate,
            &self.exact,
        );
        observer.on_constellation(&transmitted, &rx.data);

        let decided_bits = demodulate(&rx.data, cfg.modulation())?;
        let bit_errors = bits.iter().zip(&decided_bits).filter(|(a, b)| a != b).count();
        let ber = if bits.is_empty() { 0.0 } else { bit_errors as f64 / bits.len() as f64 };
        let channel_mse = mean_squared_error(&rx.channel_estimate, &self.exact);
        let evm_percent = evm_percent(&transmitted, &rx.data);

        debug!(
            seed,
            bits = bits.len(),
            bit_errors,
            ber,
            noise_power = channel_out.noise_power,
            channel_mse,
            evm_percent,
            "simulation run complete"
        );

        Ok(SimulationReport {
            seed,
            bits,
            transmitted,
            recovered: rx.data,
            decided_bits,
            bit_errors,
            ber,
            noise_power: channel_out.noise_power,
            channel_mse,
            evm_percent,
        })
    }

    /// Independent runs, one per seed, in order. Stops at the first error.
    pub fn run_batch(&self, seeds: &[u64]) -> Result<Vec<SimulationReport>> {
        seeds.iter().map(|&seed| self.run(seed)).collect()
    }
}

/// Sum of bit errors over total bits across a batch
pub fn aggregate_ber(reports: &[SimulationReport]) -> f64 {
    let (errors, total) = reports
        .iter()
        .fold((0usize, 0usize), |(e, t), r| (e + r.bit_errors, t + r.bits.len()));
    if total == 0 {
        0.0
    } else {
        errors as f64 / total as f64
    }
}

fn mean_squared_error(a: &[Complex64], b: &[Complex64]) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    a.iter().zip(b).map(|(x, y)| (x - y).norm_sqr()).sum::<f64>() / a.len() as f64
}

fn evm_percent(reference: &[Complex64], measured: &[Complex64]) -> f64 {
    let ref_power: f64 = reference.iter().map(|r| r.norm_sqr()).sum();
    if ref_power == 0.0 {
        return 0.0;
    }
    let err_power: f64 = reference.iter().zip(measured).map(|(r, m)| (m - r).norm_sqr()).sum();
    100.0 * (err_power / ref_power).sqrt()
}
