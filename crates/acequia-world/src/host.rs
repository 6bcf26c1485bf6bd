//! [`WaterHost`] implementation for [`Basin`].
//!
//! This is the seam between the allocator core and the basin: canal writes
//! go through the basin's validating setters, and advancing the hour runs
//! the basin's hydrology step.

use acequia_core::host::{HostError, WaterHost};
use acequia_types::{CanalId, Region};
use rust_decimal::Decimal;

use crate::basin::Basin;
use crate::error::WorldError;

impl From<WorldError> for HostError {
    fn from(error: WorldError) -> Self {
        match error {
            WorldError::CanalNotFound(canal) => Self::CanalNotFound(canal),
            other => Self::Rejected {
                message: other.to_string(),
            },
        }
    }
}

impl WaterHost for Basin {
    fn regions(&self) -> &[Region] {
        Self::regions(self)
    }

    fn canal_count(&self) -> usize {
        self.canals().len()
    }

    fn set_canal_open(&mut self, canal: CanalId, open: bool) -> Result<(), HostError> {
        Self::set_canal_open(self, canal, open).map_err(HostError::from)
    }

    fn set_canal_flow_rate(&mut self, canal: CanalId, rate: Decimal) -> Result<(), HostError> {
        Self::set_canal_flow_rate(self, canal, rate).map_err(HostError::from)
    }

    fn is_solved(&self) -> bool {
        Self::is_solved(self)
    }

    fn hour(&self) -> u64 {
        self.clock().hour()
    }

    fn max_hours(&self) -> u64 {
        self.clock().max_hours()
    }

    fn next_hour(&mut self) -> Result<(), HostError> {
        self.advance_hour()?;
        Ok(())
    }
}
