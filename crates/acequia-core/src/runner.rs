//! Tick loop: run allocation passes until the host is solved or out of hours.
//!
//! [`solve_problems`] is invoked once by the host. While the host reports
//! not solved and its hour counter is below the budget, it runs one
//! [`Allocator::run_pass`], notifies the [`HourCallback`], and asks the host
//! to advance. Whether the run is solved is the host's call; the loop only
//! observes it.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::allocator::{Allocator, AllocatorError, PassSummary};
use crate::host::{HostError, WaterHost};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// An allocation pass failed.
    #[error("allocation error at hour {hour}: {source}")]
    Allocator {
        /// Hour the pass ran in.
        hour: u64,
        /// The underlying allocator error.
        source: AllocatorError,
    },

    /// The host failed to advance time.
    #[error("host error: {source}")]
    Host {
        /// The underlying host error.
        #[from]
        source: HostError,
    },
}

/// Reason the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationEndReason {
    /// The host reported the run solved.
    Solved,
    /// The hour counter reached the host's budget first.
    MaxHoursReached,
}

/// Result of the simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// Number of allocation passes executed.
    pub total_passes: u64,
    /// Host hour when the loop stopped.
    pub final_hour: u64,
    /// Number of transfers applied across all passes.
    pub total_transfers: u64,
    /// Sum of every transfer amount across all passes.
    pub total_moved: Decimal,
    /// The last pass summary, if any pass ran.
    pub final_summary: Option<PassSummary>,
}

/// Callback invoked after each pass, before the host advances.
pub trait HourCallback {
    /// Called with the pass summary and the host as the pass left it.
    fn on_hour(&mut self, summary: &PassSummary, host: &dyn WaterHost);
}

/// A no-op hour callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCallback;

impl HourCallback for NoOpCallback {
    fn on_hour(&mut self, _summary: &PassSummary, _host: &dyn WaterHost) {}
}

/// Run allocation passes until the host is solved or its hour budget is spent.
///
/// # Errors
///
/// Returns [`RunnerError`] if a pass fails or the host cannot advance.
pub fn solve_problems(
    host: &mut dyn WaterHost,
    allocator: &Allocator,
    callback: &mut dyn HourCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut total_passes: u64 = 0;
    let mut total_transfers: u64 = 0;
    let mut total_moved = Decimal::ZERO;
    let mut last_summary: Option<PassSummary> = None;

    info!(
        hour = host.hour(),
        max_hours = host.max_hours(),
        regions = host.regions().len(),
        canals = host.canal_count(),
        "Simulation starting"
    );

    while !host.is_solved() && host.hour() < host.max_hours() {
        let hour = host.hour();
        let summary = allocator
            .run_pass(host)
            .map_err(|source| RunnerError::Allocator { hour, source })?;

        total_passes = total_passes.saturating_add(1);
        total_transfers = total_transfers
            .saturating_add(u64::try_from(summary.transfers.len()).unwrap_or(u64::MAX));
        total_moved = total_moved.saturating_add(summary.total_moved());

        callback.on_hour(&summary, host);
        last_summary = Some(summary);

        host.next_hour()?;
    }

    let end_reason = if host.is_solved() {
        SimulationEndReason::Solved
    } else {
        SimulationEndReason::MaxHoursReached
    };

    Ok(SimulationResult {
        end_reason,
        total_passes,
        final_hour: host.hour(),
        total_transfers,
        total_moved,
        final_summary: last_summary,
    })
}

/// Log the simulation end.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_passes = result.total_passes,
        final_hour = result.final_hour,
        total_transfers = result.total_transfers,
        total_moved = %result.total_moved,
        "Simulation ended"
    );
}
