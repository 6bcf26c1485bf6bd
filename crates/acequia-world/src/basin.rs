//! The basin: regions, canals, and the hour clock a run is hosted on.
//!
//! [`Basin`] is the reference host for the allocator. It validates its
//! regions and canals once at construction, accepts canal writes through
//! setters, and on each [`Basin::advance_hour`] lets water flow, refreshes
//! region conditions, re-evaluates whether the run is solved, and ticks the
//! clock.

use acequia_core::config::HydrologyConfig;
use acequia_core::topology::{CanalTopology, TopologyError};
use acequia_types::{Canal, CanalId, Region, RegionIndex};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::clock::HourClock;
use crate::error::WorldError;
use crate::hydrology;

/// Outcome of one hour of hydrology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourReport {
    /// Hour that just ended.
    pub hour: u64,
    /// Quantity moved through open canals.
    pub moved: Decimal,
    /// Quantity lost to overflow.
    pub spilled: Decimal,
    /// Whether the basin is balanced after the hour.
    pub solved: bool,
}

/// Regions and canals of one simulated basin.
#[derive(Debug, Clone)]
pub struct Basin {
    /// Regions in index order.
    regions: Vec<Region>,
    /// Canals in id order.
    canals: Vec<Canal>,
    /// Simulated time and budget.
    clock: HourClock,
    /// Drought threshold settings.
    hydrology: HydrologyConfig,
    /// Whether every region holds what it needs.
    solved: bool,
}

impl Basin {
    /// Create a basin, validating regions and canals.
    ///
    /// Drought and flood flags are computed from the starting levels before
    /// the solved predicate is first evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidRegion`] for negative quantities or a
    /// level above capacity, [`WorldError::CanalIdMismatch`] if canal ids
    /// are not positional, [`WorldError::RegionNotFound`] for a dangling
    /// endpoint, [`WorldError::SelfLoop`] for a canal into its own region,
    /// or [`WorldError::NegativeFlowRate`] for a negative starting rate.
    pub fn new(
        mut regions: Vec<Region>,
        canals: Vec<Canal>,
        clock: HourClock,
        hydrology: HydrologyConfig,
    ) -> Result<Self, WorldError> {
        for (position, region) in regions.iter().enumerate() {
            validate_region(RegionIndex(position), region)?;
        }
        for (position, canal) in canals.iter().enumerate() {
            validate_canal(position, canal, regions.len())?;
        }
        for region in &mut regions {
            hydrology::refresh_conditions(region, &hydrology)?;
        }
        let solved = hydrology::is_balanced(&regions);
        Ok(Self {
            regions,
            canals,
            clock,
            hydrology,
            solved,
        })
    }

    /// All regions in index order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// All canals in id order.
    pub fn canals(&self) -> &[Canal] {
        &self.canals
    }

    /// Look up one region.
    pub fn region(&self, index: RegionIndex) -> Option<&Region> {
        self.regions.get(index.get())
    }

    /// Look up one canal.
    pub fn canal(&self, id: CanalId) -> Option<&Canal> {
        self.canals.get(id.get())
    }

    /// The hour clock.
    pub const fn clock(&self) -> &HourClock {
        &self.clock
    }

    /// Whether the basin was balanced at the end of the last hour.
    pub const fn is_solved(&self) -> bool {
        self.solved
    }

    /// Derive the canal topology from this basin's canals.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DuplicateLink`] if two canals share a pair.
    pub fn topology(&self) -> Result<CanalTopology, TopologyError> {
        CanalTopology::from_canals(&self.canals)
    }

    /// Open or close a canal.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CanalNotFound`] for an unknown id.
    pub fn set_canal_open(&mut self, id: CanalId, open: bool) -> Result<(), WorldError> {
        let canal = self
            .canals
            .get_mut(id.get())
            .ok_or(WorldError::CanalNotFound(id))?;
        canal.open = open;
        Ok(())
    }

    /// Set a canal's flow rate.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CanalNotFound`] for an unknown id, or
    /// [`WorldError::NegativeFlowRate`] for a negative rate.
    pub fn set_canal_flow_rate(&mut self, id: CanalId, rate: Decimal) -> Result<(), WorldError> {
        if rate < Decimal::ZERO {
            return Err(WorldError::NegativeFlowRate { canal: id, rate });
        }
        let canal = self
            .canals
            .get_mut(id.get())
            .ok_or(WorldError::CanalNotFound(id))?;
        canal.flow_rate = rate;
        Ok(())
    }

    /// Let the hour pass: move water, refresh conditions, re-evaluate the
    /// solved predicate, and advance the clock.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] on arithmetic overflow or clock overflow.
    pub fn advance_hour(&mut self) -> Result<HourReport, WorldError> {
        let hour = self.clock.hour();
        let flows = hydrology::apply_canal_flows(&mut self.regions, &self.canals)?;
        for region in &mut self.regions {
            hydrology::refresh_conditions(region, &self.hydrology)?;
        }
        self.solved = hydrology::is_balanced(&self.regions);
        self.clock.advance()?;

        let report = HourReport {
            hour,
            moved: flows.moved,
            spilled: flows.spilled,
            solved: self.solved,
        };
        debug!(
            hour,
            moved = %report.moved,
            spilled = %report.spilled,
            solved = report.solved,
            "hour advanced"
        );
        Ok(report)
    }
}

fn validate_region(index: RegionIndex, region: &Region) -> Result<(), WorldError> {
    let invalid = |reason: &str| WorldError::InvalidRegion {
        region: index,
        reason: reason.to_owned(),
    };
    if region.level < Decimal::ZERO {
        return Err(invalid("level is negative"));
    }
    if region.need < Decimal::ZERO {
        return Err(invalid("need is negative"));
    }
    if region.level > region.capacity {
        return Err(invalid("level exceeds capacity"));
    }
    Ok(())
}

fn validate_canal(position: usize, canal: &Canal, region_count: usize) -> Result<(), WorldError> {
    if canal.id.get() != position {
        return Err(WorldError::CanalIdMismatch {
            position,
            id: canal.id,
        });
    }
    for endpoint in [canal.from, canal.to] {
        if endpoint.get() >= region_count {
            return Err(WorldError::RegionNotFound(endpoint));
        }
    }
    if canal.from == canal.to {
        return Err(WorldError::SelfLoop(canal.id));
    }
    if canal.flow_rate < Decimal::ZERO {
        return Err(WorldError::NegativeFlowRate {
            canal: canal.id,
            rate: canal.flow_rate,
        });
    }
    Ok(())
}
