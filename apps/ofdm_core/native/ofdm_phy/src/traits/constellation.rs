//! Constellation trait - bit group ↔ complex point mapping
//!
//! Defines how symbol indices map to complex baseband points.
//! This trait knows nothing about subcarriers, pilots, or channels.

use rustfft::num_complex::Complex64;

/// Symbol alphabet mapping trait
///
/// Implementations define the geometry of the constellation diagram and are
/// normalized to unit average power. Used by both the modulator
/// (symbol → point) and the demodulator (point → symbol).
pub trait Constellation: Send + Sync {
    /// Number of points in the constellation (2 for BPSK, 4 for QPSK, etc.)
    fn order(&self) -> usize;

    /// Bits per symbol (log2 of order)
    fn bits_per_symbol(&self) -> usize {
        self.order().trailing_zeros() as usize
    }

    /// Map a symbol index (0 to order-1) to its complex point
    fn symbol_to_point(&self, sym: u8) -> Complex64;

    /// Decide the nearest symbol index for a received point (hard decision)
    fn point_to_symbol(&self, point: Complex64) -> u8;
}
