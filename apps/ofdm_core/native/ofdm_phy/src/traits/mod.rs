//! Core DSP traits for the OFDM PHY
//!
//! These traits define mathematical behavior, not framing or channels.

mod constellation;

pub use constellation::Constellation;
