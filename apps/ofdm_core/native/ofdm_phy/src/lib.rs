//! OFDM PHY - Pilot-aided OFDM link simulator
//!
//! One OFDM symbol at a time: payload bits are mapped to constellation
//! points, placed on a subcarrier grid between comb pilots, converted to a
//! cyclic-prefixed waveform, passed through a synthetic multipath + AWGN
//! channel, and recovered with a least-squares pilot estimate interpolated
//! across the grid.
//!
//! The stage functions re-exported here can be called individually;
//! [`Simulation`] chains them for a full run and can report intermediate
//! arrays to a [`PipelineObserver`].

pub mod channel;
pub mod config;
pub mod constellations;
pub mod error;
pub mod frame;
pub mod grid;
pub mod modulation;
pub mod nif;
pub mod observer;
pub mod receiver;
pub mod simulation;
pub mod traits;
pub mod transform;
mod utils;


// Re-export core types for convenience
pub use channel::{apply_channel, exact_response, Channel, ChannelType, ComplexNoise};
pub use config::{OfdmConfig, OfdmConfigBuilder};
pub use error::{ConfigError, Error, ErrorKind, InputError, Result};
pub use frame::{build_symbol, extract_data};
pub use grid::SubcarrierGrid;
pub use modulation::{demodulate, modulate, Modulation, SchemeInfo};
pub use observer::{NullObserver, PipelineObserver, SnapshotRecorder};
pub use receiver::{equalize, estimate_channel, ReceivedSymbol, Receiver};
pub use simulation::{Simulation, SimulationReport};
pub use traits::Constellation;
pub use transform::{to_frequency_domain, to_time_domain, OfdmTransform};

rustler::init!("Elixir.OfdmSim.Native");
