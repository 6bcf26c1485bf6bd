//! Per-hour water allocation for the Acequia simulation.
//!
//! This crate owns the allocation heuristic that redistributes water among
//! a small fixed set of regions through a sparse directed canal network,
//! and the loop that drives it once per hour against a host.
//!
//! # Modules
//!
//! - [`allocator`] -- [`Allocator`] running one classify, rank, and match
//!   pass per hour.
//! - [`config`] -- Configuration loading from `acequia-config.yaml` into
//!   strongly-typed structs.
//! - [`host`] -- [`WaterHost`] trait: the contract a simulation host offers.
//! - [`matching`] -- Greedy donor/recipient matching and transfer sizing.
//! - [`ranking`] -- Urgency scoring and descending ranking of candidates.
//! - [`runner`] -- The hour loop, stopping when solved or out of hours.
//! - [`snapshot`] -- Per-pass surplus/deficit classification.
//! - [`topology`] -- Ordered region pair to canal lookup.
//!
//! [`Allocator`]: allocator::Allocator
//! [`WaterHost`]: host::WaterHost

pub mod allocator;
pub mod config;
pub mod host;
pub mod matching;
pub mod ranking;
pub mod runner;
pub mod snapshot;
pub mod topology;

pub use allocator::{Allocator, AllocatorError, PassSummary};
pub use host::{HostError, WaterHost};
pub use runner::{HourCallback, SimulationEndReason, SimulationResult, solve_problems};
pub use topology::CanalTopology;
