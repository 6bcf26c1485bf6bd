//! Shared type definitions for the Acequia simulation.
//!
//! This crate is the single source of truth for the data model shared by
//! the allocator core and the host that owns region and canal state.
//!
//! # Modules
//!
//! - [`ids`] -- Positional index wrappers for regions and canals
//! - [`enums`] -- Logical region roles of the fixed canal network
//! - [`structs`] -- Region and canal entity structs

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::RegionRole;
pub use ids::{CanalId, RegionIndex};
pub use structs::{Canal, Region};
