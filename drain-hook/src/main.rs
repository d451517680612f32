use telemetry::init_tracing;

use crate::core::start_drain_hook;

mod config;
mod core;
mod queue;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_name = env!("CARGO_BIN_NAME");

    let _log_flusher = init_tracing(app_name)?;

    // We start the drain hook.
    start_drain_hook().await?;

    Ok(())
}
