//! 8-PSK constellation (3 bits per symbol)
//!
//! Points sit on the unit circle at multiples of 45°. The ring position is
//! the Gray-decoded symbol, so neighbouring points differ in one bit:
//! position 0 (0°) ← 000, position 1 (45°) ← 001, position 2 (90°) ← 011, ...

use rustfft::num_complex::Complex64;
use std::f64::consts::PI;

use crate::traits::Constellation;
use crate::utils::{binary_to_gray, gray_to_binary};

/// 8-Phase Shift Keying constellation (Gray coded)
#[derive(Debug, Clone, Copy, Default)]
pub struct Psk8;

impl Constellation for Psk8 {
    fn order(&self) -> usize {
        8
    }

    fn symbol_to_point(&self, sym: u8) -> Complex64 {
        let position = gray_to_binary(sym & 0x07);
        Complex64::from_polar(1.0, position as f64 * PI / 4.0)
    }

    fn point_to_symbol(&self, point: Complex64) -> u8 {
        let angle = point.arg();
        let angle_pos = if angle < 0.0 { angle + 2.0 * PI } else { angle };
        // Half-sector offset rounds to the nearest position
        let position = ((angle_pos + PI / 8.0) / (PI / 4.0)).floor() as u8 & 0x07;
        binary_to_gray(position)
    }
}
