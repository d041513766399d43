//! OFDM symbol assembly in the frequency domain

use rustfft::num_complex::Complex64;

use crate::error::{InputError, Result};
use crate::grid::SubcarrierGrid;

/// Place pilots and payload onto the subcarrier grid.
///
/// Pilot slots receive `pilot_value`; data slots receive `data_symbols` in
/// ascending subcarrier order. Exactly `grid.num_data()` symbols are required.
pub fn build_symbol(
    data_symbols: &[Complex64],
    grid: &SubcarrierGrid,
    pilot_value: Complex64,
) -> Result<Vec<Complex64>> {
    if data_symbols.len() != grid.num_data() {
        return Err(InputError::SymbolCount {
            expected: grid.num_data(),
            actual: data_symbols.len(),
        }
        .into());
    }

    let mut symbol = vec![Complex64::new(0.0, 0.0); grid.size()];
    for &p in grid.pilot_indices() {
        symbol[p] = pilot_value;
    }
    for (&k, &s) in grid.data_indices().iter().zip(data_symbols) {
        symbol[k] = s;
    }
    Ok(symbol)
}

/// Pull the data subcarriers back out of a full grid, in ascending order.
pub fn extract_data(symbol: &[Complex64], grid: &SubcarrierGrid) -> Result<Vec<Complex64>> {
    if symbol.len() != grid.size() {
        return Err(InputError::Length { expected: grid.size(), actual: symbol.len() }.into());
    }
    Ok(grid.data_indices().iter().map(|&k| symbol[k]).collect())
}
