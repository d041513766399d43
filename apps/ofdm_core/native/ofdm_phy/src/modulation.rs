//! Modulation scheme selection and bit ↔ symbol conversion
//!
//! One closed enum covers every supported payload mapping, so a scheme
//! is picked once at configuration time and dispatched with a `match`.
//! Bits are carried one per `u8` (0 or 1) and grouped MSB-first into
//! symbol indices.

use std::fmt;
use std::str::FromStr;

use rustfft::num_complex::Complex64;

use crate::constellations::{Bpsk, Psk8, Qam16, Qam64, Qpsk};
use crate::error::{ConfigError, Error, InputError, Result};
use crate::traits::Constellation;

// ============================================================================
// Modulation enum - all supported schemes in one place
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modulation {
    Bpsk,
    Qpsk,
    Psk8,
    Qam16,
    Qam64,
}

impl Modulation {
    pub const ALL: [Modulation; 5] = [
        Modulation::Bpsk,
        Modulation::Qpsk,
        Modulation::Psk8,
        Modulation::Qam16,
        Modulation::Qam64,
    ];

    pub fn order(&self) -> usize {
        1 << self.bits_per_symbol()
    }

    pub fn bits_per_symbol(&self) -> usize {
        match self {
            Self::Bpsk => 1,
            Self::Qpsk => 2,
            Self::Psk8 => 3,
            Self::Qam16 => 4,
            Self::Qam64 => 6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bpsk => "bpsk",
            Self::Qpsk => "qpsk",
            Self::Psk8 => "psk8",
            Self::Qam16 => "qam16",
            Self::Qam64 => "qam64",
        }
    }

    #[inline]
    pub fn symbol_to_point(&self, sym: u8) -> Complex64 {
        match self {
            Self::Bpsk => Bpsk.symbol_to_point(sym),
            Self::Qpsk => Qpsk.symbol_to_point(sym),
            Self::Psk8 => Psk8.symbol_to_point(sym),
            Self::Qam16 => Qam16.symbol_to_point(sym),
            Self::Qam64 => Qam64.symbol_to_point(sym),
        }
    }

    #[inline]
    pub fn point_to_symbol(&self, point: Complex64) -> u8 {
        match self {
            Self::Bpsk => Bpsk.point_to_symbol(point),
            Self::Qpsk => Qpsk.point_to_symbol(point),
            Self::Psk8 => Psk8.point_to_symbol(point),
            Self::Qam16 => Qam16.point_to_symbol(point),
            Self::Qam64 => Qam64.point_to_symbol(point),
        }
    }

    /// Number of payload bits carried by `symbols` symbols
    pub fn payload_bits(&self, symbols: usize) -> usize {
        symbols * self.bits_per_symbol()
    }
}

impl fmt::Display for Modulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Modulation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bpsk" => Ok(Self::Bpsk),
            "qpsk" => Ok(Self::Qpsk),
            "psk8" | "8psk" => Ok(Self::Psk8),
            "qam16" | "16qam" => Ok(Self::Qam16),
            "qam64" | "64qam" => Ok(Self::Qam64),
            _ => Err(ConfigError::UnknownModulation(s.to_string()).into()),
        }
    }
}

/// Metadata returned alongside modulated symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemeInfo {
    pub scheme: Modulation,
    pub order: usize,
    pub bits_per_symbol: usize,
    pub symbol_count: usize,
}

// ============================================================================
// Bit ↔ symbol conversion
// ============================================================================

/// Map a bit sequence onto complex symbols.
///
/// `bits.len()` must be a multiple of the scheme's bits-per-symbol, and
/// every entry must be 0 or 1.
pub fn modulate(bits: &[u8], scheme: Modulation) -> Result<(Vec<Complex64>, SchemeInfo)> {
    let bps = scheme.bits_per_symbol();
    if bits.len() % bps != 0 {
        return Err(InputError::BitLength { len: bits.len(), bits_per_symbol: bps }.into());
    }
    if let Some(position) = bits.iter().position(|&b| b > 1) {
        return Err(InputError::NotABit { position, value: bits[position] }.into());
    }

    let symbols: Vec<Complex64> = bits
        .chunks_exact(bps)
        .map(|group| scheme.symbol_to_point(pack_msb_first(group)))
        .collect();

    let info = SchemeInfo {
        scheme,
        order: scheme.order(),
        bits_per_symbol: bps,
        symbol_count: symbols.len(),
    };
    Ok((symbols, info))
}

/// Hard-decide symbols back to bits (nearest constellation point).
pub fn demodulate(symbols: &[Complex64], scheme: Modulation) -> Result<Vec<u8>> {
    if let Some(pos) = symbols.iter().position(|s| !s.re.is_finite() || !s.im.is_finite()) {
        return Err(InputError::NonFinite(pos).into());
    }

    let bps = scheme.bits_per_symbol();
    let mut bits = Vec::with_capacity(symbols.len() * bps);
    for &point in symbols {
        let sym = scheme.point_to_symbol(point);
        for shift in (0..bps).rev() {
            bits.push((sym >> shift) & 1);
        }
    }
    Ok(bits)
}

#[inline]
fn pack_msb_first(group: &[u8]) -> u8 {
    group.iter().fold(0u8, |acc, &b| (acc << 1) | b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern_bits(n: usize) -> Vec<u8> {
        // Deterministic, non-periodic-looking bit pattern
        (0..n).map(|i| ((i * 7 + i / 3) % 2) as u8).collect()
    }

    #[test]
    fn test_bits_per_symbol_table() {
        assert_eq!(Modulation::Bpsk.bits_per_symbol(), 1);
        assert_eq!(Modulation::Qpsk.bits_per_symbol(), 2);
        assert_eq!(Modulation::Psk8.bits_per_symbol(), 3);
        assert_eq!(Modulation::Qam16.bits_per_symbol(), 4);
        assert_eq!(Modulation::Qam64.bits_per_symbol(), 6);
        assert_eq!(Modulation::Qam64.order(), 64);
    }

    #[test]
    fn test_modulate_consumes_exact_bits() {
        for scheme in Modulation::ALL {
            let k = 11;
            let m = scheme.bits_per_symbol();
            let (symbols, info) = modulate(&pattern_bits(k * m), scheme).unwrap();
            assert_eq!(symbols.len(), k);
            assert_eq!(info.symbol_count, k);
            assert_eq!(info.bits_per_symbol, m);

            // One bit per symbol accepts every length
            if m > 1 {
                let err = modulate(&pattern_bits(k * m + 1), scheme).unwrap_err();
                assert!(
                    matches!(err, Error::InvalidInput(InputError::BitLength { .. })),
                    "{}: {:?}",
                    scheme,
                    err
                );
            }
        }
    }

    #[test]
    fn test_bpsk_accepts_any_bit_count() {
        for n in [1, 11, 12] {
            let (symbols, info) = modulate(&pattern_bits(n), Modulation::Bpsk).unwrap();
            assert_eq!(symbols.len(), n);
            assert_eq!(info.symbol_count, n);
        }
    }

    #[test]
    fn test_modulate_rejects_non_bits() {
        let err = modulate(&[0, 1, 2, 0], Modulation::Qpsk).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InputError::NotABit { position: 2, value: 2 })
        ));
    }

    #[test]
    fn test_modulate_demodulate_roundtrip() {
        for scheme in Modulation::ALL {
            let bits = pattern_bits(scheme.bits_per_symbol() * 40);
            let (symbols, _) = modulate(&bits, scheme).unwrap();
            let recovered = demodulate(&symbols, scheme).unwrap();
            assert_eq!(recovered, bits, "{} roundtrip failed", scheme);
        }
    }

    #[test]
    fn test_every_symbol_index_roundtrips() {
        for scheme in Modulation::ALL {
            for sym in 0..scheme.order() as u8 {
                let p = scheme.symbol_to_point(sym);
                assert_eq!(scheme.point_to_symbol(p), sym, "{} symbol {}", scheme, sym);
            }
        }
    }

    #[test]
    fn test_unit_average_power() {
        for scheme in Modulation::ALL {
            let n = scheme.order();
            let avg: f64 =
                (0..n as u8).map(|s| scheme.symbol_to_point(s).norm_sqr()).sum::<f64>() / n as f64;
            assert!((avg - 1.0).abs() < 1e-9, "{} average power {}", scheme, avg);
        }
    }

    #[test]
    fn test_msb_first_grouping() {
        // 0b0001 and 0b1000 must land on different QAM16 points
        let (a, _) = modulate(&[0, 0, 0, 1], Modulation::Qam16).unwrap();
        let (b, _) = modulate(&[1, 0, 0, 0], Modulation::Qam16).unwrap();
        assert_eq!(a[0], Modulation::Qam16.symbol_to_point(0b0001));
        assert_eq!(b[0], Modulation::Qam16.symbol_to_point(0b1000));
    }

    #[test]
    fn test_demodulate_rejects_nan() {
        let symbols = [Complex64::new(1.0, 0.0), Complex64::new(f64::NAN, 0.0)];
        let err = demodulate(&symbols, Modulation::Bpsk).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(InputError::NonFinite(1))));
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!("QAM16".parse::<Modulation>().unwrap(), Modulation::Qam16);
        assert_eq!("8psk".parse::<Modulation>().unwrap(), Modulation::Psk8);
        let err = "qam32".parse::<Modulation>().unwrap_err();
        assert!(matches!(err, Error::Configuration(ConfigError::UnknownModulation(_))));
    }

    #[test]
    fn test_empty_bits() {
        let (symbols, info) = modulate(&[], Modulation::Qam64).unwrap();
        assert!(symbols.is_empty());
        assert_eq!(info.symbol_count, 0);
    }
}
