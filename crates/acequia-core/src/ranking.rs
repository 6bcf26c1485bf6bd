//! Urgency scoring and ranking of donor and recipient candidates.
//!
//! Recipients are scored as
//!
//! ```text
//! score = deficit + (in_drought ? drought_bonus : 0) + headroom_weight * (capacity - level)
//! ```
//!
//! so drought regions are served first as a class, and among equals the
//! region with more room before overflowing wins. Donors are scored by their
//! raw surplus. Both lists are ordered by score, highest first. Order among
//! equal scores is unspecified.

use acequia_types::{Region, RegionIndex};
use rust_decimal::Decimal;
use tracing::warn;

use crate::allocator::AllocatorError;
use crate::config::AllocatorConfig;
use crate::snapshot::{RegionState, Snapshot};

/// A region ranked for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Index of the region in the host's list.
    pub region: RegionIndex,
    /// Ranking score; higher is served first.
    pub score: Decimal,
}

/// Compute the urgency score of a recipient.
///
/// # Errors
///
/// Returns [`AllocatorError::ArithmeticOverflow`] if decimal arithmetic
/// overflows.
pub fn urgency_score(
    deficit: Decimal,
    capacity: Decimal,
    level: Decimal,
    in_drought: bool,
    config: &AllocatorConfig,
) -> Result<Decimal, AllocatorError> {
    let bonus = if in_drought {
        config.drought_bonus
    } else {
        Decimal::ZERO
    };
    let headroom = capacity
        .checked_sub(level)
        .ok_or(AllocatorError::ArithmeticOverflow)?;
    let headroom_term = config
        .headroom_weight
        .checked_mul(headroom)
        .ok_or(AllocatorError::ArithmeticOverflow)?;

    deficit
        .checked_add(bonus)
        .and_then(|score| score.checked_add(headroom_term))
        .ok_or(AllocatorError::ArithmeticOverflow)
}

/// Rank every recipient candidate in the snapshot, most urgent first.
///
/// `regions` are the host readings the snapshot was classified from.
///
/// # Errors
///
/// Returns [`AllocatorError::ArithmeticOverflow`] if scoring overflows, or
/// [`AllocatorError::RegionMissing`] if a snapshot entry has no reading.
pub fn rank_recipients(
    snapshot: &Snapshot,
    regions: &[Region],
    config: &AllocatorConfig,
) -> Result<Vec<Candidate>, AllocatorError> {
    let mut ranked = snapshot
        .recipients()
        .map(|state| score_recipient(state, regions, config))
        .collect::<Result<Vec<_>, _>>()?;
    sort_descending(&mut ranked);
    Ok(ranked)
}

/// Rank every donor candidate in the snapshot by surplus, largest first.
pub fn rank_donors(snapshot: &Snapshot) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = snapshot
        .donors()
        .map(|state| Candidate {
            region: state.region,
            score: state.surplus,
        })
        .collect();
    sort_descending(&mut ranked);
    ranked
}

fn score_recipient(
    state: &RegionState,
    regions: &[Region],
    config: &AllocatorConfig,
) -> Result<Candidate, AllocatorError> {
    let reading = regions
        .get(state.region.get())
        .ok_or(AllocatorError::RegionMissing(state.region))?;
    if reading.level > reading.capacity {
        warn!(
            region = %state.region,
            level = %reading.level,
            capacity = %reading.capacity,
            "region level exceeds capacity, headroom term is negative"
        );
    }
    let score = urgency_score(
        state.deficit,
        reading.capacity,
        reading.level,
        state.in_drought,
        config,
    )?;
    Ok(Candidate {
        region: state.region,
        score,
    })
}

fn sort_descending(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::host::testing::{region, scenario_regions};
    use crate::snapshot::classify;

    fn is_descending(candidates: &[Candidate]) -> bool {
        candidates.windows(2).all(|pair| match pair {
            [a, b] => a.score >= b.score,
            _ => true,
        })
    }

    #[test]
    fn score_adds_drought_bonus_and_headroom() {
        let config = AllocatorConfig::default();
        let plain = urgency_score(dec!(8), dec!(20), dec!(2), false, &config);
        assert_eq!(plain.ok(), Some(dec!(9.8)));

        let drought = urgency_score(dec!(8), dec!(20), dec!(2), true, &config);
        assert_eq!(drought.ok(), Some(dec!(29.8)));
    }

    #[test]
    fn drought_outranks_larger_deficit() {
        let mut regions = vec![
            region("thirsty", dec!(0), dec!(15), dec!(15)),
            region("parched", dec!(1), dec!(3), dec!(3)),
        ];
        if let Some(parched) = regions.get_mut(1) {
            parched.in_drought = true;
        }
        let snapshot = classify(&regions).unwrap();
        let ranked = rank_recipients(&snapshot, &regions, &AllocatorConfig::default()).unwrap();

        let order: Vec<usize> = ranked.iter().map(|c| c.region.get()).collect();
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn scenario_top_candidates() {
        let regions = scenario_regions();
        let snapshot = classify(&regions).unwrap();

        let recipients = rank_recipients(&snapshot, &regions, &AllocatorConfig::default()).unwrap();
        let donors = rank_donors(&snapshot);

        assert_eq!(recipients.first().map(|c| c.region), Some(RegionIndex(0)));
        assert_eq!(
            donors.first().map(|c| (c.region, c.score)),
            Some((RegionIndex(1), dec!(10)))
        );
        assert_eq!(recipients.len(), 1);
        assert_eq!(donors.len(), 1);
    }

    #[test]
    fn lists_are_sorted_descending() {
        let regions = vec![
            region("a", dec!(1), dec!(4), dec!(10)),
            region("b", dec!(9), dec!(2), dec!(10)),
            region("c", dec!(0), dec!(9), dec!(10)),
            region("d", dec!(6), dec!(1), dec!(10)),
            region("e", dec!(3), dec!(5), dec!(6)),
            region("f", dec!(8), dec!(7.5), dec!(10)),
        ];
        let snapshot = classify(&regions).unwrap();
        let recipients = rank_recipients(&snapshot, &regions, &AllocatorConfig::default()).unwrap();
        let donors = rank_donors(&snapshot);

        assert_eq!(recipients.len(), 3);
        assert_eq!(donors.len(), 3);
        assert!(is_descending(&recipients));
        assert!(is_descending(&donors));
    }

    #[test]
    fn donor_score_is_raw_surplus() {
        let regions = vec![region("full", dec!(18), dec!(3), dec!(100))];
        let snapshot = classify(&regions).unwrap();
        let donors = rank_donors(&snapshot);
        assert_eq!(donors.first().map(|c| c.score), Some(dec!(15)));
    }

    #[test]
    fn missing_reading_is_an_error() {
        let regions = scenario_regions();
        let snapshot = classify(&regions).unwrap();
        let result = rank_recipients(&snapshot, &[], &AllocatorConfig::default());
        assert!(matches!(result, Err(AllocatorError::RegionMissing(_))));
    }
}
