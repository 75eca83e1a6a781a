pub mod alerts;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod performance;
pub mod progress;
pub mod records;
pub mod review;
pub mod routes;
pub mod scheduler;
pub mod sessions;
pub mod state;
pub mod storage;
pub mod timers;

use anyhow::Context;

/// Load config, bring the data directory up to date and print the dashboard as JSON.
pub fn run() -> anyhow::Result<()> {
    // Initialize structured logging first
    logging::init_logging();
    tracing::info!("SmartStudy starting");

    let config = config::get_app_config().clone();

    // Timers need a runtime even when nothing is ticking yet
    let rt = tokio::runtime::Runtime::new()
        .context("Failed to create async runtime")?;

    rt.block_on(async {
        let app_state = state::AppState::new(config)?;

        let raised = routes::run_startup_tasks(&app_state);
        if !raised.is_empty() {
            tracing::info!(count = raised.len(), "New performance alerts");
        }

        let snapshot = routes::get_dashboard(&app_state);
        println!("{}", serde_json::to_string_pretty(&snapshot)?);

        app_state.timers.shutdown();
        app_state.repo.save_all()?;
        Ok::<(), anyhow::Error>(())
    })
}
