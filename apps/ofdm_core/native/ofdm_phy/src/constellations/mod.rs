//! Constellation implementations
//!
//! The five OFDM payload mappings:
//! - BPSK (1 bit/symbol)
//! - QPSK (2 bits/symbol)
//! - 8-PSK (3 bits/symbol)
//! - 16-QAM (4 bits/symbol)
//! - 64-QAM (6 bits/symbol)
//!
//! All are Gray coded and normalized to unit average power.

mod bpsk;
mod qpsk;
mod psk8;
mod square;
mod qam16;
mod qam64;

pub use bpsk::Bpsk;
pub use qpsk::Qpsk;
pub use psk8::Psk8;
pub use qam16::Qam16;
pub use qam64::Qam64;
