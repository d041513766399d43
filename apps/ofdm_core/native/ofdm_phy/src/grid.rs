//! Subcarrier grid layout
//!
//! An OFDM symbol has `size` subcarrier slots split into disjoint pilot and
//! data sets. The layout is validated once when the grid is built; every
//! later stage relies on the partition and boundary-pilot invariants without
//! re-checking them.
//!
//! ```text
//! index:  0 1 2 3 4 5 6 7 8 9 ...        56 ...       63
//!         P D D D D D D D P D ...         P  D ... D   P
//! ```

use crate::error::{ConfigError, Result};

/// Validated pilot/data partition of `[0, size)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcarrierGrid {
    size: usize,
    pilots: Vec<usize>,
    data: Vec<usize>,
}

impl SubcarrierGrid {
    /// Comb layout: a pilot every `step` subcarriers starting at 0, plus the
    /// final subcarrier so channel estimation has both endpoints.
    pub fn comb(size: usize, step: usize) -> Result<Self> {
        if step == 0 {
            return Err(ConfigError::ZeroPilotStep.into());
        }
        if size < 2 {
            return Err(ConfigError::GridTooSmall(size).into());
        }

        let mut pilots: Vec<usize> = (0..size).step_by(step).collect();
        if pilots.last() != Some(&(size - 1)) {
            pilots.push(size - 1);
        }
        Self::from_pilots(size, pilots)
    }

    /// Explicit layout. Pilots must be strictly ascending, in range, and
    /// include both 0 and `size - 1`; all other slots become data.
    pub fn from_pilots(size: usize, pilots: Vec<usize>) -> Result<Self> {
        if size < 2 {
            return Err(ConfigError::GridTooSmall(size).into());
        }
        validate_pilot_indices(&pilots, size)?;

        let mut is_pilot = vec![false; size];
        for &p in &pilots {
            is_pilot[p] = true;
        }
        let data: Vec<usize> = (0..size).filter(|&k| !is_pilot[k]).collect();
        if data.is_empty() {
            return Err(ConfigError::NoDataCarriers(size).into());
        }

        let grid = Self { size, pilots, data };
        grid.check_partition()?;
        Ok(grid)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Pilot subcarrier indices, ascending
    pub fn pilot_indices(&self) -> &[usize] {
        &self.pilots
    }

    /// Data subcarrier indices, ascending
    pub fn data_indices(&self) -> &[usize] {
        &self.data
    }

    pub fn num_pilots(&self) -> usize {
        self.pilots.len()
    }

    pub fn num_data(&self) -> usize {
        self.data.len()
    }

    /// Pilot ∪ data must be `[0, size)` with no overlap
    fn check_partition(&self) -> Result<()> {
        let mut seen = vec![0u8; self.size];
        for &k in self.pilots.iter().chain(self.data.iter()) {
            seen[k] += 1;
        }
        if let Some(k) = seen.iter().position(|&c| c != 1) {
            let reason = if seen[k] == 0 {
                format!("subcarrier {} unassigned", k)
            } else {
                format!("subcarrier {} assigned twice", k)
            };
            return Err(ConfigError::BrokenPartition { size: self.size, reason }.into());
        }
        Ok(())
    }
}

/// Check that pilot indices can anchor interpolation across `[0, size)`.
pub(crate) fn validate_pilot_indices(pilots: &[usize], size: usize) -> Result<()> {
    if pilots.len() < 2 {
        return Err(ConfigError::TooFewPilots(pilots.len()).into());
    }
    for w in pilots.windows(2) {
        if w[1] <= w[0] {
            return Err(ConfigError::PilotsNotAscending { previous: w[0], index: w[1] }.into());
        }
    }
    if let Some(&index) = pilots.iter().find(|&&p| p >= size) {
        return Err(ConfigError::PilotOutOfRange { index, size }.into());
    }

    let first = pilots[0];
    let end = pilots[pilots.len() - 1];
    if first != 0 || end != size - 1 {
        return Err(ConfigError::PilotsDoNotSpanGrid { first, end, last: size - 1 }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_default_comb_layout() {
        let grid = SubcarrierGrid::comb(64, 8).unwrap();
        assert_eq!(grid.pilot_indices(), &[0, 8, 16, 24, 32, 40, 48, 56, 63]);
        assert_eq!(grid.num_pilots(), 9);
        assert_eq!(grid.num_data(), 55);
        assert_eq!(grid.data_indices()[0], 1);
        assert_eq!(*grid.data_indices().last().unwrap(), 62);
    }

    #[test]
    fn test_comb_does_not_duplicate_last_index() {
        // 63 = 9 * 7, so the comb already ends on the last subcarrier
        let grid = SubcarrierGrid::comb(64, 7).unwrap();
        assert_eq!(grid.pilot_indices().last(), Some(&63));
        let count_63 = grid.pilot_indices().iter().filter(|&&p| p == 63).count();
        assert_eq!(count_63, 1);
    }

    #[test]
    fn test_partition_invariant_for_many_layouts() {
        for size in [4usize, 16, 64, 128, 100] {
            for step in 1..size {
                let grid = match SubcarrierGrid::comb(size, step) {
                    Ok(g) => g,
                    // step = 1 leaves no data carriers
                    Err(e) => {
                        assert!(matches!(e, Error::Configuration(ConfigError::NoDataCarriers(_))));
                        continue;
                    }
                };
                let mut all: Vec<usize> = grid
                    .pilot_indices()
                    .iter()
                    .chain(grid.data_indices())
                    .copied()
                    .collect();
                all.sort_unstable();
                assert_eq!(all, (0..size).collect::<Vec<_>>(), "size {} step {}", size, step);
            }
        }
    }

    #[test]
    fn test_explicit_pilots_must_span_grid() {
        let err = SubcarrierGrid::from_pilots(16, vec![0, 4, 8, 12]).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigError::PilotsDoNotSpanGrid { first: 0, end: 12, last: 15 })
        ));

        let err = SubcarrierGrid::from_pilots(16, vec![2, 8, 15]).unwrap_err();
        assert!(matches!(err, Error::Configuration(ConfigError::PilotsDoNotSpanGrid { .. })));
    }

    #[test]
    fn test_explicit_pilots_must_ascend() {
        let err = SubcarrierGrid::from_pilots(16, vec![0, 8, 8, 15]).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigError::PilotsNotAscending { previous: 8, index: 8 })
        ));

        let err = SubcarrierGrid::from_pilots(16, vec![0, 9, 4, 15]).unwrap_err();
        assert!(matches!(err, Error::Configuration(ConfigError::PilotsNotAscending { .. })));
    }

    #[test]
    fn test_explicit_pilots_out_of_range() {
        let err = SubcarrierGrid::from_pilots(16, vec![0, 8, 16]).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigError::PilotOutOfRange { index: 16, size: 16 })
        ));
    }

    #[test]
    fn test_too_few_pilots() {
        let err = SubcarrierGrid::from_pilots(16, vec![0]).unwrap_err();
        assert!(matches!(err, Error::Configuration(ConfigError::TooFewPilots(1))));
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(matches!(
            SubcarrierGrid::comb(1, 1).unwrap_err(),
            Error::Configuration(ConfigError::GridTooSmall(1))
        ));
        assert!(matches!(
            SubcarrierGrid::comb(64, 0).unwrap_err(),
            Error::Configuration(ConfigError::ZeroPilotStep)
        ));
        assert!(matches!(
            SubcarrierGrid::comb(2, 1).unwrap_err(),
            Error::Configuration(ConfigError::NoDataCarriers(2))
        ));
    }
}
