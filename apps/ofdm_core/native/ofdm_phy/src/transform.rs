//! Time-domain transform with cyclic prefix
//!
//! TX: frequency grid → IFFT (scaled by 1/N) → prepend last `cp_len` samples
//! RX: drop `cp_len` samples → keep next N → FFT
//!
//! The 1/N scaling sits on the inverse only, so `fft(ifft(x)) == x`.
//!
//! ```text
//!   ┌──────────┬──────────────────────────────┐
//!   │ tail copy│        IFFT output (N)        │
//!   └──────────┴──────────────────────────────┘
//!    ◄ cp_len ►
//! ```

use std::fmt;
use std::sync::Arc;

use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use crate::error::{ConfigError, InputError, Result};

/// Reusable N-point OFDM modulator/demodulator with a fixed prefix length
pub struct OfdmTransform {
    size: usize,
    cp_len: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for OfdmTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OfdmTransform")
            .field("size", &self.size)
            .field("cp_len", &self.cp_len)
            .finish()
    }
}

impl OfdmTransform {
    /// Plan forward and inverse transforms of `size` points.
    pub fn new(size: usize, cp_len: usize) -> Result<Self> {
        if size < 2 {
            return Err(ConfigError::GridTooSmall(size).into());
        }
        if cp_len >= size {
            return Err(ConfigError::PrefixTooLong { cp_len, size }.into());
        }

        let mut planner = FftPlanner::new();
        Ok(Self {
            size,
            cp_len,
            forward: planner.plan_fft_forward(size),
            inverse: planner.plan_fft_inverse(size),
        })
    }

    /// Default prefix length for a symbol of `size` samples (a quarter symbol)
    pub fn default_cp_len(size: usize) -> usize {
        size / 4
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cp_len(&self) -> usize {
        self.cp_len
    }

    /// Samples per transmitted symbol including the prefix
    pub fn symbol_len(&self) -> usize {
        self.size + self.cp_len
    }

    /// Frequency-domain symbol → time-domain waveform with cyclic prefix.
    pub fn to_time_domain(&self, symbol: &[Complex64]) -> Result<Vec<Complex64>> {
        if symbol.len() != self.size {
            return Err(InputError::Length { expected: self.size, actual: symbol.len() }.into());
        }

        let mut time = symbol.to_vec();
        self.inverse.process(&mut time);
        let scale = 1.0 / self.size as f64;
        for s in &mut time {
            *s *= scale;
        }

        let mut out = Vec::with_capacity(self.symbol_len());
        out.extend_from_slice(&time[self.size - self.cp_len..]);
        out.extend_from_slice(&time);
        Ok(out)
    }

    /// Received waveform → frequency-domain grid.
    ///
    /// Anything past `cp_len + size` (e.g. a convolution tail) is ignored.
    pub fn to_frequency_domain(&self, waveform: &[Complex64]) -> Result<Vec<Complex64>> {
        let required = self.symbol_len();
        if waveform.len() < required {
            return Err(InputError::WaveformTooShort { required, actual: waveform.len() }.into());
        }

        let mut freq = waveform[self.cp_len..required].to_vec();
        self.forward.process(&mut freq);
        Ok(freq)
    }
}

/// One-shot TX transform; plans a fresh FFT of `symbol.len()` points.
pub fn to_time_domain(symbol: &[Complex64], cp_len: usize) -> Result<Vec<Complex64>> {
    OfdmTransform::new(symbol.len(), cp_len)?.to_time_domain(symbol)
}

/// One-shot RX transform for an `size`-point symbol.
pub fn to_frequency_domain(
    waveform: &[Complex64],
    cp_len: usize,
    size: usize,
) -> Result<Vec<Complex64>> {
    OfdmTransform::new(size, cp_len)?.to_frequency_domain(waveform)
}

/// Zero-padded `size`-point FFT of a short impulse response.
pub fn frequency_response(taps: &[Complex64], size: usize) -> Vec<Complex64> {
    let mut buf = vec![Complex64::new(0.0, 0.0); size];
    for (slot, &t) in buf.iter_mut().zip(taps) {
        *slot = t;
    }
    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(size).process(&mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn test_vector(n: usize) -> Vec<Complex64> {
        (0..n)
            .map(|k| {
                let k = k as f64;
                Complex64::new((0.7 * k).sin() * 2.0 - 0.3, (1.3 * k).cos() + 0.1 * k)
            })
            .collect()
    }

    fn max_err(a: &[Complex64], b: &[Complex64]) -> f64 {
        a.iter().zip(b).map(|(x, y)| (x - y).norm()).fold(0.0, f64::max)
    }

    #[test]
    fn test_roundtrip_power_of_two_sizes() {
        for n in [2usize, 4, 8, 16, 64, 256, 1024] {
            for cp in [0, 1, n / 4, n - 1] {
                let x = test_vector(n);
                let t = OfdmTransform::new(n, cp).unwrap();
                let wave = t.to_time_domain(&x).unwrap();
                assert_eq!(wave.len(), n + cp);
                let back = t.to_frequency_domain(&wave).unwrap();
                assert!(max_err(&x, &back) < 1e-9, "n={} cp={} err={}", n, cp, max_err(&x, &back));
            }
        }
    }

    #[test]
    fn test_cyclic_prefix_is_tail_copy() {
        let t = OfdmTransform::new(64, 16).unwrap();
        let wave = t.to_time_domain(&test_vector(64)).unwrap();
        assert_eq!(wave.len(), 80);
        for i in 0..16 {
            assert_eq!(wave[i], wave[64 + i], "prefix sample {}", i);
        }
    }

    #[test]
    fn test_inverse_is_scaled_by_n() {
        // A single DC bin becomes a flat waveform of height 1/N
        let mut x = vec![Complex64::new(0.0, 0.0); 8];
        x[0] = Complex64::new(1.0, 0.0);
        let wave = to_time_domain(&x, 2).unwrap();
        for s in wave {
            assert!((s - Complex64::new(0.125, 0.0)).norm() < 1e-12);
        }
    }

    #[test]
    fn test_tail_samples_are_ignored() {
        let t = OfdmTransform::new(16, 4).unwrap();
        let x = test_vector(16);
        let mut wave = t.to_time_domain(&x).unwrap();
        wave.push(Complex64::new(100.0, -100.0));
        let back = t.to_frequency_domain(&wave).unwrap();
        assert!(max_err(&x, &back) < 1e-9);
    }

    #[test]
    fn test_free_function_roundtrip() {
        let x = test_vector(64);
        let wave = to_time_domain(&x, 16).unwrap();
        let back = to_frequency_domain(&wave, 16, 64).unwrap();
        assert!(max_err(&x, &back) < 1e-9);
    }

    #[test]
    fn test_short_waveform_rejected() {
        let t = OfdmTransform::new(64, 16).unwrap();
        let err = t.to_frequency_domain(&vec![Complex64::new(0.0, 0.0); 79]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InputError::WaveformTooShort { required: 80, actual: 79 })
        ));
    }

    #[test]
    fn test_prefix_must_be_shorter_than_symbol() {
        let err = OfdmTransform::new(64, 64).unwrap_err();
        assert!(matches!(err, Error::Configuration(ConfigError::PrefixTooLong { .. })));
    }

    #[test]
    fn test_frequency_response_of_impulse_is_flat() {
        let h = frequency_response(&[Complex64::new(1.0, 0.0)], 32);
        assert!(h.iter().all(|v| (v - Complex64::new(1.0, 0.0)).norm() < 1e-12));
    }

    #[test]
    fn test_frequency_response_two_tap() {
        // H[k] = 1 + a·e^{-j2πk/N}
        let a = Complex64::new(0.3, 0.3);
        let n = 64;
        let h = frequency_response(&[Complex64::new(1.0, 0.0), a], n);
        for (k, hk) in h.iter().enumerate() {
            let w = Complex64::from_polar(1.0, -2.0 * std::f64::consts::PI * k as f64 / n as f64);
            let expected = Complex64::new(1.0, 0.0) + a * w;
            assert!((hk - expected).norm() < 1e-12, "bin {}", k);
        }
    }
}
