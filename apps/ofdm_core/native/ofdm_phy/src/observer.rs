//! Read-only hooks into the simulation pipeline
//!
//! The pipeline never renders anything itself. A caller that wants to plot
//! the carrier layout, waveforms, channel estimate or constellation passes
//! an observer and receives each intermediate array as it is produced.

use rustfft::num_complex::Complex64;

use crate::grid::SubcarrierGrid;

/// Receives snapshots of intermediate pipeline data.
///
/// Every callback defaults to a no-op, so implementors only override what
/// they need.
pub trait PipelineObserver {
    /// Pilot/data layout of the grid in use
    fn on_grid(&mut self, _grid: &SubcarrierGrid) {}

    /// Transmitted waveform (with prefix) and the channel output
    fn on_waveforms(&mut self, _tx: &[Complex64], _rx: &[Complex64]) {}

    /// Pilot positions, LS estimates at those pilots, the interpolated
    /// estimate and the true channel response
    fn on_channel_estimate(
        &mut self,
        _pilots: &[usize],
        _pilot_estimates: &[Complex64],
        _estimate: &[Complex64],
        _exact: &[Complex64],
    ) {
    }

    /// Transmitted data symbols and the equalized symbols recovered for them
    fn on_constellation(&mut self, _transmitted: &[Complex64], _recovered: &[Complex64]) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {}

/// Snapshot of the channel estimation stage
#[derive(Debug, Clone, Default)]
pub struct EstimateSnapshot {
    pub pilots: Vec<usize>,
    pub pilot_estimates: Vec<Complex64>,
    pub estimate: Vec<Complex64>,
    pub exact: Vec<Complex64>,
}

/// Observer that keeps a copy of the most recent snapshot of each kind.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRecorder {
    pub grid: Option<SubcarrierGrid>,
    pub tx_waveform: Vec<Complex64>,
    pub rx_waveform: Vec<Complex64>,
    pub channel: Option<EstimateSnapshot>,
    pub transmitted: Vec<Complex64>,
    pub recovered: Vec<Complex64>,
}

impl SnapshotRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once every stage has reported at least once
    pub fn is_complete(&self) -> bool {
        self.grid.is_some()
            && !self.tx_waveform.is_empty()
            && self.channel.is_some()
            && !self.recovered.is_empty()
    }
}

impl PipelineObserver for SnapshotRecorder {
    fn on_grid(&mut self, grid: &SubcarrierGrid) {
        self.grid = Some(grid.clone());
    }

    fn on_waveforms(&mut self, tx: &[Complex64], rx: &[Complex64]) {
        self.tx_waveform = tx.to_vec();
        self.rx_waveform = rx.to_vec();
    }

    fn on_channel_estimate(
        &mut self,
        pilots: &[usize],
        pilot_estimates: &[Complex64],
        estimate: &[Complex64],
        exact: &[Complex64],
    ) {
        self.channel = Some(EstimateSnapshot {
            pilots: pilots.to_vec(),
            pilot_estimates: pilot_estimates.to_vec(),
            estimate: estimate.to_vec(),
            exact: exact.to_vec(),
        });
    }

    fn on_constellation(&mut self, transmitted: &[Complex64], recovered: &[Complex64]) {
        self.transmitted = transmitted.to_vec();
        self.recovered = recovered.to_vec();
    }
}
