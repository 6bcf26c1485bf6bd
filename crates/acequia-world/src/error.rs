//! Error types for the `acequia-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`].

use acequia_types::{CanalId, RegionIndex};

use crate::clock::ClockError;

/// Errors that can occur while building or stepping a basin.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A region index does not exist.
    #[error("region not found: {0}")]
    RegionNotFound(RegionIndex),

    /// A canal id does not exist.
    #[error("canal not found: {0}")]
    CanalNotFound(CanalId),

    /// A canal's id does not match its position in the canal list.
    #[error("canal at position {position} has id {id}")]
    CanalIdMismatch {
        /// Position in the list.
        position: usize,
        /// Id the canal carries.
        id: CanalId,
    },

    /// A canal starts and ends at the same region.
    #[error("canal {0} loops back to its own region")]
    SelfLoop(CanalId),

    /// A region's quantities are inconsistent.
    #[error("region {region} is invalid: {reason}")]
    InvalidRegion {
        /// The offending region.
        region: RegionIndex,
        /// What is wrong with it.
        reason: String,
    },

    /// A negative flow rate was written to a canal.
    #[error("negative flow rate {rate} for canal {canal}")]
    NegativeFlowRate {
        /// The canal written to.
        canal: CanalId,
        /// The rejected rate.
        rate: rust_decimal::Decimal,
    },

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in world calculation")]
    ArithmeticOverflow,

    /// The hour clock failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}
