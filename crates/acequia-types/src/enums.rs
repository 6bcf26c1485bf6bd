//! Enumeration types for the Acequia data model.

use serde::{Deserialize, Serialize};

use crate::ids::RegionIndex;

/// Logical role of a region in the fixed three-region canal network.
///
/// The discriminant order matches the region index the host assigns, so
/// `North` is always region 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionRole {
    /// Upstream headwater region (index 0).
    North,
    /// Downstream farmland region (index 1).
    South,
    /// Third region, fed from North and South (index 2).
    East,
}

impl RegionRole {
    /// Return the region index this role occupies.
    pub const fn index(self) -> RegionIndex {
        match self {
            Self::North => RegionIndex(0),
            Self::South => RegionIndex(1),
            Self::East => RegionIndex(2),
        }
    }

    /// Human-readable name of the role.
    pub const fn name(self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
        }
    }
}

impl core::fmt::Display for RegionRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_match_their_indices() {
        assert_eq!(RegionRole::North.index(), RegionIndex(0));
        assert_eq!(RegionRole::South.index(), RegionIndex(1));
        assert_eq!(RegionRole::East.index(), RegionIndex(2));
    }

    #[test]
    fn display_uses_role_name() {
        assert_eq!(RegionRole::East.to_string(), "East");
    }
}
