//! NIF interface for Elixir
//!
//! Stateless: every call builds what it needs from its arguments. Complex
//! values cross the boundary as `{re, im}` float tuples, bits as lists of
//! 0/1 integers. Modulation and channel types are atoms.

use std::fmt;

use rustler::{Atom, NifResult, NifStruct};
use rustfft::num_complex::Complex64;

use crate::channel::{exact_response, ChannelType, DEFAULT_TAPS};
use crate::config::OfdmConfig;
use crate::error::{ConfigError, Error};
use crate::modulation::{self, Modulation};
use crate::simulation::{Simulation, SimulationReport};

rustler::atoms! {
    ok,
    error,
    // Modulation types
    bpsk,
    qpsk,
    psk8,
    qam16,
    qam64,
    // Channel types
    multipath,
    random,
    awgn,
}

fn unknown_modulation(name: impl fmt::Debug) -> Error {
    ConfigError::UnknownModulation(format!("{:?}", name)).into()
}

fn unknown_channel(name: impl fmt::Debug) -> Error {
    ConfigError::UnknownChannel(format!("{:?}", name)).into()
}

fn atom_to_modulation(atom: Atom) -> Result<Modulation, Error> {
    if atom == bpsk() {
        Ok(Modulation::Bpsk)
    } else if atom == qpsk() {
        Ok(Modulation::Qpsk)
    } else if atom == psk8() {
        Ok(Modulation::Psk8)
    } else if atom == qam16() {
        Ok(Modulation::Qam16)
    } else if atom == qam64() {
        Ok(Modulation::Qam64)
    } else {
        Err(unknown_modulation(atom))
    }
}

fn atom_to_channel(atom: Atom) -> Result<ChannelType, Error> {
    if atom == multipath() || atom == random() {
        Ok(ChannelType::Multipath)
    } else if atom == awgn() {
        Ok(ChannelType::Awgn)
    } else {
        Err(unknown_channel(atom))
    }
}

fn modulation_to_atom(m: Modulation) -> Atom {
    match m {
        Modulation::Bpsk => bpsk(),
        Modulation::Qpsk => qpsk(),
        Modulation::Psk8 => psk8(),
        Modulation::Qam16 => qam16(),
        Modulation::Qam64 => qam64(),
    }
}

fn term_error(e: Error) -> rustler::Error {
    rustler::Error::Term(Box::new(e.to_string()))
}

fn to_pairs(values: &[Complex64]) -> Vec<(f64, f64)> {
    values.iter().map(|c| (c.re, c.im)).collect()
}

fn from_pairs(pairs: &[(f64, f64)]) -> Vec<Complex64> {
    pairs.iter().map(|&(re, im)| Complex64::new(re, im)).collect()
}

// ============================================================================
// Host-side types
// ============================================================================

/// Simulation parameters from Elixir
#[derive(NifStruct, Clone)]
#[module = "OfdmSim.Types.SimParams"]
pub struct SimParams {
    pub subcarriers: usize,
    pub pilot_step: usize,
    /// `nil` selects a quarter of the subcarrier count
    pub cp_len: Option<usize>,
    pub pilot_value: (f64, f64),
    pub modulation: Atom,
    pub channel: Atom,
    pub snr_db: f64,
}

impl TryFrom<SimParams> for OfdmConfig {
    type Error = Error;

    fn try_from(p: SimParams) -> Result<Self, Self::Error> {
        let mut builder = OfdmConfig::builder()
            .subcarriers(p.subcarriers)
            .pilot_step(p.pilot_step)
            .pilot_value(Complex64::new(p.pilot_value.0, p.pilot_value.1))
            .modulation(atom_to_modulation(p.modulation)?)
            .channel(atom_to_channel(p.channel)?)
            .snr_db(p.snr_db);
        if let Some(cp_len) = p.cp_len {
            builder = builder.cp_len(cp_len);
        }
        builder.build()
    }
}

/// Simulation results for Elixir
#[derive(NifStruct, Clone)]
#[module = "OfdmSim.Types.SimReport"]
pub struct SimReport {
    pub seed: u64,
    pub modulation: Atom,
    pub bits: Vec<u8>,
    pub decided_bits: Vec<u8>,
    pub transmitted: Vec<(f64, f64)>,
    pub recovered: Vec<(f64, f64)>,
    pub bit_errors: usize,
    pub ber: f64,
    pub noise_power: f64,
    pub channel_mse: f64,
    pub evm_percent: f64,
}

impl SimReport {
    fn new(report: SimulationReport, modulation: Modulation) -> Self {
        Self {
            seed: report.seed,
            modulation: modulation_to_atom(modulation),
            transmitted: to_pairs(&report.transmitted),
            recovered: to_pairs(&report.recovered),
            bits: report.bits,
            decided_bits: report.decided_bits,
            bit_errors: report.bit_errors,
            ber: report.ber,
            noise_power: report.noise_power,
            channel_mse: report.channel_mse,
            evm_percent: report.evm_percent,
        }
    }
}

// ============================================================================
// NIFs
// ============================================================================

/// Run one end-to-end OFDM symbol through the link.
#[rustler::nif]
fn simulate(params: SimParams, seed: u64) -> NifResult<(Atom, SimReport)> {
    let config = OfdmConfig::try_from(params).map_err(term_error)?;
    let modulation = config.modulation();
    let sim = Simulation::new(config).map_err(term_error)?;
    let report = sim.run(seed).map_err(term_error)?;
    Ok((ok(), SimReport::new(report, modulation)))
}

/// Map bits to `{re, im}` symbols.
#[rustler::nif]
fn modulate(bits: Vec<u8>, scheme: Atom) -> NifResult<(Atom, Vec<(f64, f64)>)> {
    let scheme = atom_to_modulation(scheme).map_err(term_error)?;
    let (symbols, _info) = modulation::modulate(&bits, scheme).map_err(term_error)?;
    Ok((ok(), to_pairs(&symbols)))
}

/// Hard-decide `{re, im}` symbols back to bits.
#[rustler::nif]
fn demodulate(symbols: Vec<(f64, f64)>, scheme: Atom) -> NifResult<(Atom, Vec<u8>)> {
    let scheme = atom_to_modulation(scheme).map_err(term_error)?;
    let bits = modulation::demodulate(&from_pairs(&symbols), scheme).map_err(term_error)?;
    Ok((ok(), bits))
}

/// Ground-truth response of the default multipath channel.
#[rustler::nif]
fn exact_channel_response(subcarriers: usize) -> NifResult<(Atom, Vec<(f64, f64)>)> {
    if subcarriers < 2 {
        return Err(term_error(ConfigError::GridTooSmall(subcarriers).into()));
    }
    Ok((ok(), to_pairs(&exact_response(&DEFAULT_TAPS, subcarriers))))
}
