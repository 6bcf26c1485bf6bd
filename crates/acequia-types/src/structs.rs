//! Core entity structs: regions and the canals connecting them.
//!
//! Both are owned by the host. The allocator reads [`Region`] values and
//! writes canal state only through the host's setters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{CanalId, RegionIndex};

/// A region holding water.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Display name.
    pub name: String,
    /// Current water quantity (non-negative).
    pub level: Decimal,
    /// Target quantity the region requires.
    pub need: Decimal,
    /// Maximum quantity the region can hold (at least `level`).
    pub capacity: Decimal,
    /// Whether the region is in drought. Raises urgency and bars donating.
    pub in_drought: bool,
    /// Whether the region is flooded. Bars receiving.
    pub flooded: bool,
}

impl Region {
    /// Create a region with both condition flags cleared.
    pub fn new(name: impl Into<String>, level: Decimal, need: Decimal, capacity: Decimal) -> Self {
        Self {
            name: name.into(),
            level,
            need,
            capacity,
            in_drought: false,
            flooded: false,
        }
    }

    /// Return whether the region currently holds at least what it needs.
    pub fn is_satisfied(&self) -> bool {
        self.level >= self.need
    }
}

/// A directed canal between two regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canal {
    /// Canal identifier (its position in the host's canal list).
    pub id: CanalId,
    /// Source region.
    pub from: RegionIndex,
    /// Destination region.
    pub to: RegionIndex,
    /// Whether water is flowing this tick.
    pub open: bool,
    /// Quantity carried this tick when open.
    pub flow_rate: Decimal,
}

impl Canal {
    /// Create a closed canal with zero flow.
    pub const fn new(id: CanalId, from: RegionIndex, to: RegionIndex) -> Self {
        Self {
            id,
            from,
            to,
            open: false,
            flow_rate: Decimal::ZERO,
        }
    }
}
