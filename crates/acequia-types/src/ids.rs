//! Type-safe positional identifiers.
//!
//! Regions and canals are identified by their position in the host's lists,
//! which stays stable for the lifetime of a run. Wrapping the raw `usize`
//! keeps a region index from being passed where a canal id is expected.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around a positional `usize` with standard derives.
macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl $name {
            /// Create an identifier from a raw position.
            pub const fn new(position: usize) -> Self {
                Self(position)
            }

            /// Return the raw position.
            pub const fn get(self) -> usize {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<usize> for $name {
            fn from(position: usize) -> Self {
                Self(position)
            }
        }

        impl From<$name> for usize {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_index! {
    /// Index of a region in the host's region list, in `[0, n)`.
    RegionIndex
}

define_index! {
    /// Identifier of a canal, equal to its position in the host's canal list.
    CanalId
}
