//! QPSK constellation (2 bits per symbol)
//!
//! Gray-coded mapping, MSB on the in-phase axis:
//! Symbol 0 → 45°  (I=+1, Q=+1) / √2
//! Symbol 1 → 315° (I=+1, Q=-1) / √2
//! Symbol 2 → 135° (I=-1, Q=+1) / √2
//! Symbol 3 → 225° (I=-1, Q=-1) / √2

use rustfft::num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

use crate::traits::Constellation;

/// Quadrature Phase Shift Keying constellation (Gray coded)
#[derive(Debug, Clone, Copy, Default)]
pub struct Qpsk;

impl Constellation for Qpsk {
    fn order(&self) -> usize {
        4
    }

    fn symbol_to_point(&self, sym: u8) -> Complex64 {
        let i = if (sym & 0x02) == 0 { FRAC_1_SQRT_2 } else { -FRAC_1_SQRT_2 };
        let q = if (sym & 0x01) == 0 { FRAC_1_SQRT_2 } else { -FRAC_1_SQRT_2 };
        Complex64::new(i, q)
    }

    fn point_to_symbol(&self, point: Complex64) -> u8 {
        let mut sym = 0u8;
        if point.re < 0.0 { sym |= 0x02; }
        if point.im < 0.0 { sym |= 0x01; }
        sym
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qpsk_roundtrip() {
        for sym in 0..4u8 {
            let p = Qpsk.symbol_to_point(sym);
            assert_eq!(Qpsk.point_to_symbol(p), sym, "Symbol {} roundtrip failed", sym);
        }
    }

    #[test]
    fn test_qpsk_unit_power() {
        for sym in 0..4u8 {
            let power = Qpsk.symbol_to_point(sym).norm_sqr();
            assert!((power - 1.0).abs() < 1e-12, "Symbol {} power: {}", sym, power);
        }
    }

    #[test]
    fn test_qpsk_order() {
        assert_eq!(Qpsk.order(), 4);
        assert_eq!(Qpsk.bits_per_symbol(), 2);
    }
}
