//! Hour clock for the basin host.
//!
//! The clock is the single source of truth for simulated time. It counts
//! hours from zero and carries the step budget the allocation loop runs
//! against. All advancement uses checked arithmetic.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Hour counter would overflow.
    #[error("hour counter overflow: cannot advance beyond u64::MAX")]
    HourOverflow,
}

/// Hour counter with a fixed budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourClock {
    /// Current hour (0-indexed).
    hour: u64,

    /// Hour at which the run stops regardless of outcome.
    max_hours: u64,
}

impl HourClock {
    /// Create a clock at hour 0.
    pub const fn new(max_hours: u64) -> Self {
        Self { hour: 0, max_hours }
    }

    #[cfg(test)]
    const fn from_parts(hour: u64, max_hours: u64) -> Self {
        Self { hour, max_hours }
    }

    /// Advance the clock by one hour. Returns the new hour.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::HourOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.hour = self.hour.checked_add(1).ok_or(ClockError::HourOverflow)?;
        Ok(self.hour)
    }

    /// Return the current hour.
    pub const fn hour(&self) -> u64 {
        self.hour
    }

    /// Return the hour budget.
    pub const fn max_hours(&self) -> u64 {
        self.max_hours
    }

    /// Whether the budget is spent.
    pub const fn limit_reached(&self) -> bool {
        self.hour >= self.max_hours
    }
}
