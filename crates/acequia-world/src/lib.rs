//! Basin host for the Acequia simulation.
//!
//! This crate models the physical side of a run: regions holding water,
//! canals carrying it, the hour clock, and the hydrology step that moves
//! water along open canals at the end of every hour. [`Basin`] implements
//! the allocator's [`WaterHost`] contract.
//!
//! # Modules
//!
//! - [`basin`] -- [`Basin`] state, validation, and the hourly step.
//! - [`clock`] -- Hour counter with a step budget.
//! - [`error`] -- Error types for basin operations.
//! - [`host`] -- [`WaterHost`] implementation for [`Basin`].
//! - [`hydrology`] -- Canal flows, spill, and drought/flood flags.
//! - [`starting_world`] -- Default three-region starting basin.
//!
//! [`WaterHost`]: acequia_core::host::WaterHost

pub mod basin;
pub mod clock;
pub mod error;
pub mod host;
pub mod hydrology;
pub mod starting_world;

// Re-export primary types at crate root.
pub use basin::{Basin, HourReport};
pub use clock::{ClockError, HourClock};
pub use error::WorldError;
pub use starting_world::create_starting_basin;
