//! Per-tick classification of regions into donors and recipients.
//!
//! [`classify`] turns the host's current region readings into a
//! [`Snapshot`]: one [`RegionState`] per region holding its surplus,
//! deficit, and condition flags. The snapshot belongs to a single pass. It
//! is decremented in place while transfers are matched and then discarded.

use acequia_types::{Region, RegionIndex};
use rust_decimal::Decimal;

use crate::allocator::AllocatorError;

/// Derived per-tick state of one region.
///
/// `region` indexes back into the host's region list; the snapshot never
/// owns a copy of the region itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionState {
    /// Index of the region in the host's list.
    pub region: RegionIndex,
    /// `max(0, level - need)`.
    pub surplus: Decimal,
    /// `max(0, need - level)`.
    pub deficit: Decimal,
    /// Copy of the host's drought flag.
    pub in_drought: bool,
    /// Copy of the host's flood flag.
    pub flooded: bool,
}

impl RegionState {
    /// Whether the region may receive water this tick.
    pub fn is_recipient(&self) -> bool {
        self.deficit > Decimal::ZERO && !self.flooded
    }

    /// Whether the region may give water this tick.
    pub fn is_donor(&self) -> bool {
        self.surplus > Decimal::ZERO && !self.in_drought
    }
}

/// Classification of every region for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    states: Vec<RegionState>,
}

impl Snapshot {
    /// State of one region.
    pub fn get(&self, region: RegionIndex) -> Option<&RegionState> {
        self.states.get(region.get())
    }

    /// Mutable state of one region.
    pub fn get_mut(&mut self, region: RegionIndex) -> Option<&mut RegionState> {
        self.states.get_mut(region.get())
    }

    /// All states in index order.
    pub fn iter(&self) -> impl Iterator<Item = &RegionState> {
        self.states.iter()
    }

    /// Regions qualifying as recipients, in index order.
    pub fn recipients(&self) -> impl Iterator<Item = &RegionState> {
        self.states.iter().filter(|s| s.is_recipient())
    }

    /// Regions qualifying as donors, in index order.
    pub fn donors(&self) -> impl Iterator<Item = &RegionState> {
        self.states.iter().filter(|s| s.is_donor())
    }

    /// Number of regions classified.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no regions were classified.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Classify every region from its current level and need.
///
/// A pure function of the readings: classifying the same regions twice
/// yields identical snapshots.
///
/// # Errors
///
/// Returns [`AllocatorError::ArithmeticOverflow`] if `level - need`
/// overflows.
pub fn classify(regions: &[Region]) -> Result<Snapshot, AllocatorError> {
    let states = regions
        .iter()
        .enumerate()
        .map(|(position, region)| classify_region(RegionIndex(position), region))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Snapshot { states })
}

fn classify_region(index: RegionIndex, region: &Region) -> Result<RegionState, AllocatorError> {
    let balance = region
        .level
        .checked_sub(region.need)
        .ok_or(AllocatorError::ArithmeticOverflow)?;

    let (surplus, deficit) = if balance > Decimal::ZERO {
        (balance, Decimal::ZERO)
    } else {
        (Decimal::ZERO, balance.abs())
    };

    Ok(RegionState {
        region: index,
        surplus,
        deficit,
        in_drought: region.in_drought,
        flooded: region.flooded,
    })
}
