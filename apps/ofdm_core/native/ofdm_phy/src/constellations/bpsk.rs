//! BPSK constellation (1 bit per symbol)
//!
//! Symbol 0 → +1 (0°)
//! Symbol 1 → -1 (180°)

use rustfft::num_complex::Complex64;

use crate::traits::Constellation;

/// Binary Phase Shift Keying constellation
#[derive(Debug, Clone, Copy, Default)]
pub struct Bpsk;

impl Constellation for Bpsk {
    fn order(&self) -> usize {
        2
    }

    fn symbol_to_point(&self, sym: u8) -> Complex64 {
        match sym & 0x01 {
            0 => Complex64::new(1.0, 0.0),
            _ => Complex64::new(-1.0, 0.0),
        }
    }

    fn point_to_symbol(&self, point: Complex64) -> u8 {
        if point.re >= 0.0 { 0 } else { 1 }
    }
}
