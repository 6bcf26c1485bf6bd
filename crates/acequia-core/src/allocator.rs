//! One allocation pass: classify, rank, close, match.
//!
//! [`Allocator::run_pass`] is called once per hour. It reads the host's
//! regions, builds a [`Snapshot`], ranks recipients and donors, closes every
//! canal, and then greedily reopens the canals it uses. The snapshot is
//! dropped when the pass returns; nothing carries over between hours.
//!
//! [`Snapshot`]: crate::snapshot::Snapshot

use acequia_types::RegionIndex;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::config::AllocatorConfig;
use crate::host::{HostError, WaterHost};
use crate::matching::{self, Transfer};
use crate::ranking;
use crate::snapshot;
use crate::topology::CanalTopology;

/// Errors that can occur during an allocation pass.
#[derive(Debug, thiserror::Error)]
pub enum AllocatorError {
    /// Checked decimal arithmetic overflowed.
    #[error("arithmetic overflow in allocation")]
    ArithmeticOverflow,

    /// A region index had no matching host reading or snapshot entry.
    #[error("region {0} missing from host state")]
    RegionMissing(RegionIndex),

    /// The host rejected a canal write.
    #[error("host error: {source}")]
    Host {
        /// The underlying host error.
        #[from]
        source: HostError,
    },
}

/// Summary of one allocation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    /// Hour the pass ran in.
    pub hour: u64,
    /// Number of recipient candidates.
    pub recipients: usize,
    /// Number of donor candidates.
    pub donors: usize,
    /// Transfers applied, in order.
    pub transfers: Vec<Transfer>,
}

impl PassSummary {
    /// Sum of every transfer amount in the pass, saturating at
    /// [`Decimal::MAX`].
    pub fn total_moved(&self) -> Decimal {
        self.transfers
            .iter()
            .fold(Decimal::ZERO, |total, t| total.saturating_add(t.amount))
    }
}

/// The per-hour water allocator.
#[derive(Debug, Clone)]
pub struct Allocator {
    config: AllocatorConfig,
    topology: CanalTopology,
}

impl Allocator {
    /// Create an allocator routing over `topology`.
    pub const fn new(config: AllocatorConfig, topology: CanalTopology) -> Self {
        Self { config, topology }
    }

    /// Create an allocator over the fixed acequia network.
    pub fn acequia(config: AllocatorConfig) -> Self {
        Self::new(config, CanalTopology::acequia())
    }

    /// Run one classification, ranking, and matching pass against the host.
    ///
    /// Every canal is closed before matching; only canals carrying a
    /// transfer are reopened. A host with no regions is a no-op apart from
    /// the canal reset.
    ///
    /// # Errors
    ///
    /// Returns [`AllocatorError`] on arithmetic overflow or a host failure.
    pub fn run_pass(&self, host: &mut dyn WaterHost) -> Result<PassSummary, AllocatorError> {
        let hour = host.hour();

        let mut snapshot = snapshot::classify(host.regions())?;
        let recipients = ranking::rank_recipients(&snapshot, host.regions(), &self.config)?;
        let donors = ranking::rank_donors(&snapshot);

        host.close_all_canals()?;

        let transfers = matching::match_and_apply(
            &mut snapshot,
            &recipients,
            &donors,
            &self.topology,
            host,
            &self.config,
        )?;

        let summary = PassSummary {
            hour,
            recipients: recipients.len(),
            donors: donors.len(),
            transfers,
        };
        debug!(
            hour,
            recipients = summary.recipients,
            donors = summary.donors,
            transfers = summary.transfers.len(),
            moved = %summary.total_moved(),
            "allocation pass complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use acequia_types::CanalId;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::host::testing::{MemoryHost, region, scenario_regions};

    fn acequia() -> Allocator {
        Allocator::acequia(AllocatorConfig::default())
    }

    fn open_everything(host: &mut MemoryHost) {
        for canal in &mut host.canals {
            canal.open = true;
            canal.flow_rate = dec!(0.75);
        }
    }

    #[test]
    fn scenario_with_no_route_leaves_every_canal_closed() {
        let mut host = MemoryHost::new(scenario_regions(), 4);
        open_everything(&mut host);

        let summary = acequia().run_pass(&mut host);
        let summary = summary.ok();

        assert_eq!(summary.as_ref().map(|s| (s.recipients, s.donors)), Some((1, 1)));
        assert_eq!(summary.map(|s| s.transfers.len()), Some(0));
        assert!(host.canals.iter().all(|c| !c.open));
        // Flow rates of unused canals are left as they were.
        assert!(host.canals.iter().all(|c| c.flow_rate == dec!(0.75)));
    }

    #[test]
    fn only_used_canals_are_open_after_pass() {
        let regions = vec![
            region("North", dec!(15), dec!(5), dec!(20)),
            region("South", dec!(2), dec!(10), dec!(20)),
            region("East", dec!(10), dec!(10), dec!(20)),
        ];
        let mut host = MemoryHost::new(regions, 4);
        open_everything(&mut host);

        let summary = acequia().run_pass(&mut host).ok();
        let used: Vec<CanalId> = summary
            .map(|s| s.transfers.iter().map(|t| t.canal).collect())
            .unwrap();

        for canal in &host.canals {
            assert_eq!(canal.open, used.contains(&canal.id), "canal {}", canal.id);
        }
        assert_eq!(host.canal(0).map(|c| c.flow_rate), Some(dec!(1.0)));
    }

    #[test]
    fn empty_host_is_noop() {
        let mut host = MemoryHost::new(Vec::new(), 0);
        let summary = acequia().run_pass(&mut host).ok();
        assert_eq!(
            summary,
            Some(PassSummary {
                hour: 0,
                recipients: 0,
                donors: 0,
                transfers: Vec::new(),
            })
        );
    }

    #[test]
    fn summary_totals_transfers() {
        let regions = vec![
            region("North", dec!(12), dec!(5), dec!(20)),
            region("South", dec!(9), dec!(10.5), dec!(20)),
        ];
        let mut host = MemoryHost::new(regions, 4);
        let summary = acequia().run_pass(&mut host).ok();
        // 1.0 then 0.5 settles South's 1.5 deficit.
        assert_eq!(summary.map(|s| s.total_moved()), Some(dec!(1.5)));
    }

    #[test]
    fn total_moved_saturates_instead_of_overflowing() {
        let transfer = Transfer {
            canal: CanalId(0),
            from: RegionIndex(0),
            to: RegionIndex(1),
            amount: Decimal::MAX,
        };
        let summary = PassSummary {
            hour: 0,
            recipients: 1,
            donors: 1,
            transfers: vec![transfer, transfer],
        };
        assert_eq!(summary.total_moved(), Decimal::MAX);
    }

    #[test]
    fn host_without_canals_finds_no_route() {
        // Topology points at canal 0 but the host holds none.
        let regions = vec![
            region("North", dec!(15), dec!(5), dec!(20)),
            region("South", dec!(2), dec!(10), dec!(20)),
        ];
        let mut host = MemoryHost::new(regions, 0);
        let summary = acequia().run_pass(&mut host);
        assert!(summary.is_ok_and(|s| s.transfers.is_empty()));
    }
}
