//! Water movement and region conditions at the end of each hour.
//!
//! Open canals move their flow rate from source to destination, limited by
//! what the source actually holds. Water arriving above a region's capacity
//! spills out of the basin and the region is left full. After flows settle,
//! each region's drought and flood flags are recomputed:
//!
//! - `in_drought` while `level < drought_ratio * need`
//! - `flooded` while a region with capacity is at or above it

use acequia_core::config::HydrologyConfig;
use acequia_types::{Canal, Region};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::WorldError;

/// Water moved during one hour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlowReport {
    /// Quantity that left source regions.
    pub moved: Decimal,
    /// Portion of `moved` lost to overflow at the destination.
    pub spilled: Decimal,
}

/// Move water along every open canal, in canal order.
///
/// # Errors
///
/// Returns [`WorldError::RegionNotFound`] for a dangling canal endpoint, or
/// [`WorldError::ArithmeticOverflow`] if decimal arithmetic fails.
pub fn apply_canal_flows(
    regions: &mut [Region],
    canals: &[Canal],
) -> Result<FlowReport, WorldError> {
    let mut report = FlowReport::default();

    for canal in canals.iter().filter(|c| c.open) {
        let source = regions
            .get_mut(canal.from.get())
            .ok_or(WorldError::RegionNotFound(canal.from))?;
        let sent = canal.flow_rate.min(source.level).max(Decimal::ZERO);
        source.level = source
            .level
            .checked_sub(sent)
            .ok_or(WorldError::ArithmeticOverflow)?;

        let destination = regions
            .get_mut(canal.to.get())
            .ok_or(WorldError::RegionNotFound(canal.to))?;
        let filled = destination
            .level
            .checked_add(sent)
            .ok_or(WorldError::ArithmeticOverflow)?;
        let spill = filled
            .checked_sub(destination.capacity)
            .ok_or(WorldError::ArithmeticOverflow)?
            .max(Decimal::ZERO);
        destination.level = filled.min(destination.capacity);

        report.moved = report
            .moved
            .checked_add(sent)
            .ok_or(WorldError::ArithmeticOverflow)?;
        report.spilled = report
            .spilled
            .checked_add(spill)
            .ok_or(WorldError::ArithmeticOverflow)?;
    }

    Ok(report)
}

/// Recompute a region's drought and flood flags from its level.
///
/// # Errors
///
/// Returns [`WorldError::ArithmeticOverflow`] if the drought threshold
/// overflows.
pub fn refresh_conditions(region: &mut Region, config: &HydrologyConfig) -> Result<(), WorldError> {
    let drought_line = config
        .drought_ratio
        .checked_mul(region.need)
        .ok_or(WorldError::ArithmeticOverflow)?;
    region.in_drought = region.level < drought_line;
    region.flooded = region.capacity > Decimal::ZERO && region.level >= region.capacity;
    Ok(())
}

/// Whether every region holds what it needs and none is flooded.
pub fn is_balanced(regions: &[Region]) -> bool {
    regions.iter().all(|r| r.is_satisfied() && !r.flooded)
}
