//! Host contract consumed by the allocator.
//!
//! The host owns region and canal state, the hour counter, and the "solved"
//! predicate. The allocator never touches that state directly: it reads
//! regions through [`WaterHost::regions`] and writes canals through the
//! setters, so the host remains the single source of truth and may inspect
//! or persist its state between hours.

use acequia_types::{CanalId, Region};
use rust_decimal::Decimal;

/// Errors a host can report back to the allocator.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The canal id does not exist in the host's canal list.
    #[error("canal not found: {0}")]
    CanalNotFound(CanalId),

    /// The host refused the request.
    #[error("host rejected request: {message}")]
    Rejected {
        /// Description of the failure.
        message: String,
    },
}

/// A simulation host the allocator runs against.
///
/// Region indices are positions in [`regions`] and canal ids are positions
/// in the host's canal list; both stay stable for the lifetime of a run.
///
/// [`regions`]: WaterHost::regions
pub trait WaterHost {
    /// All regions, in index order.
    fn regions(&self) -> &[Region];

    /// Number of canals the host holds.
    fn canal_count(&self) -> usize;

    /// Open or close a canal.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::CanalNotFound`] for an unknown canal id.
    fn set_canal_open(&mut self, canal: CanalId, open: bool) -> Result<(), HostError>;

    /// Set the quantity a canal carries this hour.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::CanalNotFound`] for an unknown canal id, or
    /// [`HostError::Rejected`] for a negative rate.
    fn set_canal_flow_rate(&mut self, canal: CanalId, rate: Decimal) -> Result<(), HostError>;

    /// Whether the host considers the run finished.
    fn is_solved(&self) -> bool;

    /// Current hour.
    fn hour(&self) -> u64;

    /// Step budget: the hour at which the run stops regardless of outcome.
    fn max_hours(&self) -> u64;

    /// Advance time by one hour, letting the host apply this hour's flows.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the host cannot advance.
    fn next_hour(&mut self) -> Result<(), HostError>;

    /// Close every canal the host holds.
    ///
    /// Flow rates are left untouched.
    ///
    /// # Errors
    ///
    /// Propagates the first [`HostError`] from [`set_canal_open`].
    ///
    /// [`set_canal_open`]: WaterHost::set_canal_open
    fn close_all_canals(&mut self) -> Result<(), HostError> {
        for position in 0..self.canal_count() {
            self.set_canal_open(CanalId(position), false)?;
        }
        Ok(())
    }
}
