//! Default starting basin for the Acequia simulation.
//!
//! Three regions wired by the fixed acequia canal network: a headwater
//! North with snowmelt to spare, and a South and East that start short.

use acequia_core::config::HydrologyConfig;
use acequia_core::topology::CanalTopology;
use acequia_types::{Canal, Region, RegionRole};
use rust_decimal::Decimal;

use crate::basin::Basin;
use crate::clock::HourClock;
use crate::error::WorldError;

/// Helper to build a [`Region`] for a role from whole-unit quantities.
fn region(role: RegionRole, level: i64, need: i64, capacity: i64) -> Region {
    Region::new(
        role.name(),
        Decimal::from(level),
        Decimal::from(need),
        Decimal::from(capacity),
    )
}

/// Starting regions in index order.
pub fn starting_regions() -> Vec<Region> {
    vec![
        region(RegionRole::North, 18, 8, 20),
        region(RegionRole::South, 3, 9, 15),
        region(RegionRole::East, 4, 7, 12),
    ]
}

/// One closed canal per link of the acequia network, in id order.
pub fn starting_canals() -> Vec<Canal> {
    let mut canals: Vec<Canal> = CanalTopology::acequia()
        .links()
        .map(|((from, to), id)| Canal::new(id, from, to))
        .collect();
    canals.sort_by_key(|canal| canal.id);
    canals
}

/// Build the default starting basin.
///
/// # Errors
///
/// Returns [`WorldError`] if the starting data fails validation.
pub fn create_starting_basin(
    max_hours: u64,
    hydrology: HydrologyConfig,
) -> Result<Basin, WorldError> {
    Basin::new(
        starting_regions(),
        starting_canals(),
        HourClock::new(max_hours),
        hydrology,
    )
}
