//! 16-QAM constellation (4 bits per symbol)
//!
//! Gray-coded 4x4 grid. Levels ±1, ±3 scaled by 1/√10 for unit average power.
//! Bits b3 b2 select the in-phase level, b1 b0 the quadrature level.

use rustfft::num_complex::Complex64;

use super::square;
use crate::traits::Constellation;

/// 16-Quadrature Amplitude Modulation constellation
#[derive(Debug, Clone, Copy, Default)]
pub struct Qam16;

// Normalization factor for unit average power: 1/√10
const NORM: f64 = 0.316_227_766_016_837_94;

impl Constellation for Qam16 {
    fn order(&self) -> usize {
        16
    }

    fn symbol_to_point(&self, sym: u8) -> Complex64 {
        square::map(sym & 0x0F, 2, NORM)
    }

    fn point_to_symbol(&self, point: Complex64) -> u8 {
        square::demap(point, 2, NORM)
    }
}
