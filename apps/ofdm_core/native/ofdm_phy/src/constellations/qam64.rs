//! 64-QAM constellation (6 bits per symbol)
//!
//! Gray-coded 8x8 grid normalized to average unit power.
//! Points at ±1, ±3, ±5, ±7 scaled by 1/√42 for unit average power.

use rustfft::num_complex::Complex64;

use super::square;
use crate::traits::Constellation;

/// 64-Quadrature Amplitude Modulation constellation
#[derive(Debug, Clone, Copy, Default)]
pub struct Qam64;

// Normalization factor for unit average power: 1/√42
const NORM: f64 = 0.154303349962092;

impl Constellation for Qam64 {
    fn order(&self) -> usize {
        64
    }

    fn symbol_to_point(&self, sym: u8) -> Complex64 {
        // Bits: b5 b4 b3 → I, b2 b1 b0 → Q
        square::map(sym & 0x3F, 3, NORM)
    }

    fn point_to_symbol(&self, point: Complex64) -> u8 {
        square::demap(point, 3, NORM)
    }
}
