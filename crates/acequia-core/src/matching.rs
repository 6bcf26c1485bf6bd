//! Greedy matching of ranked donors to ranked recipients.
//!
//! Two cursors walk the ranked lists: `i` over recipients and `j` over
//! donors. For each pair the direct canal is looked up; a pair without one
//! abandons the donor (`j` advances, `i` stays). A pair with a canal moves
//! [`transfer_amount`] through it, opening the canal and writing its flow
//! rate through the host, and decrements the snapshot. The recipient cursor
//! advances once its deficit is met, the donor cursor once its surplus is
//! gone or it has nothing safe left to give. Matching ends when either list
//! is exhausted.
//!
//! This is a greedy heuristic: it makes no optimality claim and never routes
//! through an intermediate region.

use acequia_types::{CanalId, RegionIndex};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, trace};

use crate::allocator::AllocatorError;
use crate::config::AllocatorConfig;
use crate::host::WaterHost;
use crate::ranking::Candidate;
use crate::snapshot::Snapshot;
use crate::topology::CanalTopology;

/// One applied transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transfer {
    /// Canal the water flows through.
    pub canal: CanalId,
    /// Donor region.
    pub from: RegionIndex,
    /// Recipient region.
    pub to: RegionIndex,
    /// Quantity written as the canal's flow rate.
    pub amount: Decimal,
}

/// Quantity a donor can safely send a recipient through one canal.
///
/// The donor always keeps `safety_margin * capacity` in reserve, and no
/// transfer exceeds the recipient's deficit or `per_tick_cap`. Never
/// negative.
///
/// # Errors
///
/// Returns [`AllocatorError::ArithmeticOverflow`] if decimal arithmetic
/// overflows.
pub fn transfer_amount(
    donor_surplus: Decimal,
    donor_capacity: Decimal,
    recipient_deficit: Decimal,
    config: &AllocatorConfig,
) -> Result<Decimal, AllocatorError> {
    let reserve = config
        .safety_margin
        .checked_mul(donor_capacity)
        .ok_or(AllocatorError::ArithmeticOverflow)?;
    let donor_safe = donor_surplus
        .checked_sub(reserve)
        .ok_or(AllocatorError::ArithmeticOverflow)?
        .max(Decimal::ZERO);

    Ok(donor_safe
        .min(recipient_deficit)
        .min(config.per_tick_cap)
        .max(Decimal::ZERO))
}

/// Run the matching loop, applying every transfer to the host as it is made.
///
/// `snapshot` is decremented in place. Canals should already be closed.
///
/// # Errors
///
/// Returns [`AllocatorError`] if a region is missing from the host or the
/// snapshot, arithmetic overflows, or the host rejects a canal write.
pub fn match_and_apply(
    snapshot: &mut Snapshot,
    recipients: &[Candidate],
    donors: &[Candidate],
    topology: &CanalTopology,
    host: &mut dyn WaterHost,
    config: &AllocatorConfig,
) -> Result<Vec<Transfer>, AllocatorError> {
    let canal_count = host.canal_count();
    let mut transfers = Vec::new();
    let mut i: usize = 0;
    let mut j: usize = 0;

    while let (Some(recipient), Some(donor)) = (recipients.get(i), donors.get(j)) {
        let to = recipient.region;
        let from = donor.region;

        let Some(canal) = topology.route(from, to, canal_count) else {
            trace!(%from, %to, "no direct canal, trying next donor");
            j = j.saturating_add(1);
            continue;
        };

        let capacity = host
            .regions()
            .get(from.get())
            .map(|region| region.capacity)
            .ok_or(AllocatorError::RegionMissing(from))?;
        let surplus = snapshot
            .get(from)
            .map(|state| state.surplus)
            .ok_or(AllocatorError::RegionMissing(from))?;
        let deficit = snapshot
            .get(to)
            .map(|state| state.deficit)
            .ok_or(AllocatorError::RegionMissing(to))?;

        let amount = transfer_amount(surplus, capacity, deficit, config)?;
        if amount <= Decimal::ZERO {
            trace!(%from, %to, %surplus, "donor has nothing safe to give");
            j = j.saturating_add(1);
            continue;
        }

        host.set_canal_flow_rate(canal, amount)?;
        host.set_canal_open(canal, true)?;

        let remaining_surplus = debit(snapshot, from, amount, Side::Donor)?;
        let remaining_deficit = debit(snapshot, to, amount, Side::Recipient)?;

        debug!(
            %canal,
            %from,
            %to,
            %amount,
            %remaining_surplus,
            %remaining_deficit,
            "transfer applied"
        );
        transfers.push(Transfer {
            canal,
            from,
            to,
            amount,
        });

        if remaining_deficit <= Decimal::ZERO {
            i = i.saturating_add(1);
        }
        if remaining_surplus <= Decimal::ZERO {
            j = j.saturating_add(1);
        }
    }

    Ok(transfers)
}

#[derive(Clone, Copy)]
enum Side {
    Donor,
    Recipient,
}

/// Subtract `amount` from the donor's surplus or the recipient's deficit,
/// returning the remainder.
fn debit(
    snapshot: &mut Snapshot,
    region: RegionIndex,
    amount: Decimal,
    side: Side,
) -> Result<Decimal, AllocatorError> {
    let state = snapshot
        .get_mut(region)
        .ok_or(AllocatorError::RegionMissing(region))?;
    let slot = match side {
        Side::Donor => &mut state.surplus,
        Side::Recipient => &mut state.deficit,
    };
    *slot = slot
        .checked_sub(amount)
        .ok_or(AllocatorError::ArithmeticOverflow)?;
    Ok(*slot)
}
