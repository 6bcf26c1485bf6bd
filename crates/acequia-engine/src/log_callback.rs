//! Hour callback that logs every pass with region names.

use acequia_core::host::WaterHost;
use acequia_core::runner::HourCallback;
use acequia_core::PassSummary;
use acequia_types::RegionIndex;
use tracing::debug;

/// Logs each transfer of each pass at debug level.
#[derive(Debug, Default)]
pub struct LogCallback;

impl HourCallback for LogCallback {
    fn on_hour(&mut self, summary: &PassSummary, host: &dyn WaterHost) {
        let name = |index: RegionIndex| {
            host.regions()
                .get(index.get())
                .map_or("?", |region| region.name.as_str())
        };
        for transfer in &summary.transfers {
            debug!(
                hour = summary.hour,
                canal = %transfer.canal,
                from = name(transfer.from),
                to = name(transfer.to),
                amount = %transfer.amount,
                "canal opened"
            );
        }
        debug!(
            hour = summary.hour,
            recipients = summary.recipients,
            donors = summary.donors,
            moved = %summary.total_moved(),
            "hour allocated"
        );
    }
}
