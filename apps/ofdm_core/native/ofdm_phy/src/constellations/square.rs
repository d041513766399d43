//! Shared Gray-coded square-QAM geometry
//!
//! A square M-QAM splits the symbol index into two halves: the high bits pick
//! the in-phase PAM level, the low bits the quadrature level. Each axis uses
//! levels ±1, ±3, ... ±(L-1) in Gray order, scaled by `norm` for unit power.

use rustfft::num_complex::Complex64;

use crate::utils::{binary_to_gray, gray_to_binary};

/// Gray label → PAM amplitude for an axis with `levels` levels
#[inline]
fn gray_to_level(gray: u8, levels: u8) -> f64 {
    let idx = gray_to_binary(gray & (levels - 1));
    2.0 * idx as f64 - (levels - 1) as f64
}

/// PAM amplitude → nearest Gray label for an axis with `levels` levels
#[inline]
fn level_to_gray(value: f64, levels: u8) -> u8 {
    let max_idx = (levels - 1) as f64;
    let idx = ((value + max_idx) / 2.0).round().clamp(0.0, max_idx) as u8;
    binary_to_gray(idx)
}

/// Map a symbol to a square-QAM point
pub(crate) fn map(sym: u8, axis_bits: u32, norm: f64) -> Complex64 {
    let levels = 1u8 << axis_bits;
    let i = gray_to_level(sym >> axis_bits, levels);
    let q = gray_to_level(sym, levels);
    Complex64::new(i * norm, q * norm)
}

/// Hard-decide a square-QAM point to its symbol
pub(crate) fn demap(point: Complex64, axis_bits: u32, norm: f64) -> u8 {
    let levels = 1u8 << axis_bits;
    let i = level_to_gray(point.re / norm, levels);
    let q = level_to_gray(point.im / norm, levels);
    (i << axis_bits) | q
}
