//! Acequia engine binary.
//!
//! Wires configuration, the starting basin, and the allocator together and
//! runs the hourly allocation loop until the basin is solved or the hour
//! budget runs out.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `acequia-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the starting basin
//! 4. Build the allocator over the fixed canal network
//! 5. Run the simulation loop
//! 6. Log the result and the final region levels

mod error;
mod log_callback;

use std::path::Path;

use acequia_core::config::SimulationConfig;
use acequia_core::runner;
use acequia_core::Allocator;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::log_callback::LogCallback;

/// Path of the configuration file, relative to the working directory.
const CONFIG_PATH: &str = "acequia-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
fn main() -> Result<(), EngineError> {
    // 1. Load configuration (before logging so the configured level applies).
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("acequia-engine starting");
    info!(
        from_file,
        max_hours = config.simulation.max_hours,
        safety_margin = %config.allocator.safety_margin,
        per_tick_cap = %config.allocator.per_tick_cap,
        "Configuration loaded"
    );

    // 3. Create the starting basin.
    let mut basin =
        acequia_world::create_starting_basin(config.simulation.max_hours, config.hydrology)?;
    info!(
        regions = basin.regions().len(),
        canals = basin.canals().len(),
        "Starting basin created"
    );

    // 4. Build the allocator.
    let allocator = Allocator::acequia(config.allocator);

    // 5. Run the simulation.
    let result = runner::solve_problems(&mut basin, &allocator, &mut LogCallback)?;

    // 6. Log results.
    runner::log_simulation_end(&result);
    for region in basin.regions() {
        info!(
            region = %region.name,
            level = %region.level,
            need = %region.need,
            in_drought = region.in_drought,
            flooded = region.flooded,
            "Final region state"
        );
    }
    info!(
        report = %serde_json::to_string(&result)?,
        "acequia-engine shutdown complete"
    );

    Ok(())
}

/// Load the simulation configuration from `acequia-config.yaml`, falling
/// back to defaults, with environment overrides applied either way.
///
/// Returns the configuration and whether the file was present.
fn load_config() -> Result<(SimulationConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    let from_file = config_path.exists();
    Ok((SimulationConfig::load(config_path)?, from_file))
}
