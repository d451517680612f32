use std::sync::Arc;
use std::time::Duration;

use config::shared::{DrainConfig, DrainHookConfig, RetryConfig};
use drainer::concurrency::shutdown::{ShutdownRx, ShutdownTx, create_shutdown_channel};
use drainer::control::aws::{AsgLifecycleControl, EcsClusterControl, load_sdk_config};
use drainer::coordinator::{DrainCoordinator, DrainOutcome};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::config::load_drain_hook_config;
use crate::queue::{QueueConsumer, QueueMessage};

/// Pause after a failed receive call before polling the queue again.
const RECEIVE_ERROR_BACKOFF: Duration = Duration::from_secs(5);

pub async fn start_drain_hook() -> anyhow::Result<()> {
    info!("starting drain hook service");
    let config = load_drain_hook_config()?;

    log_config(&config);

    let sdk_config = load_sdk_config(config.region.as_deref()).await;
    let cluster_control = EcsClusterControl::new(&sdk_config);
    let lifecycle_control = AsgLifecycleControl::new(&sdk_config);
    let consumer = QueueConsumer::new(&sdk_config, config.queue_url.clone());

    let coordinator = Arc::new(DrainCoordinator::new(
        cluster_control,
        lifecycle_control,
        config.cluster.clone(),
        config.drain.clone(),
        config.control_plane_retry.clone(),
    ));

    let (shutdown_tx, shutdown_rx) = create_shutdown_channel();
    let signal_handle = tokio::spawn(listen_for_shutdown_signals(shutdown_tx));

    run_consume_loop(coordinator, consumer, shutdown_rx).await;

    // The loop only exits on shutdown, so the signal task has already fired.
    signal_handle.abort();
    let _ = signal_handle.await;

    info!("drain hook service stopped");
    Ok(())
}

/// Pulls notifications off the queue and hands each one to its own task.
///
/// Returns once shutdown is requested and every in-flight drain has either
/// finished or acknowledged the interruption.
async fn run_consume_loop(
    coordinator: Arc<DrainCoordinator<EcsClusterControl, AsgLifecycleControl>>,
    consumer: QueueConsumer,
    mut shutdown_rx: ShutdownRx,
) {
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                info!("shutdown requested, no longer receiving notifications");
                break;
            }
            received = consumer.receive() => match received {
                Ok(messages) => {
                    for message in messages {
                        in_flight.spawn(handle_message(
                            coordinator.clone(),
                            consumer.clone(),
                            message,
                            shutdown_rx.clone(),
                        ));
                    }
                }
                Err(err) => {
                    warn!(error = %err, "failed to receive from the notification queue");
                    tokio::select! {
                        _ = shutdown_rx.changed() => break,
                        _ = tokio::time::sleep(RECEIVE_ERROR_BACKOFF) => {}
                    }
                }
            }
        }

        // Reap finished handlers so the set does not grow unbounded.
        while let Some(result) = in_flight.try_join_next() {
            if let Err(err) = result {
                error!(error = %err, "drain handler task panicked");
            }
        }
    }

    if !in_flight.is_empty() {
        info!(
            in_flight = in_flight.len(),
            "waiting for in-flight drains to wind down"
        );
    }
    while let Some(result) = in_flight.join_next().await {
        if let Err(err) = result {
            error!(error = %err, "drain handler task panicked");
        }
    }
}

/// Handles one queue message end to end.
///
/// The message is deleted only after the coordinator finishes with it. Errors
/// and interrupted drains leave the message in place so the queue redelivers
/// it after the visibility timeout.
async fn handle_message(
    coordinator: Arc<DrainCoordinator<EcsClusterControl, AsgLifecycleControl>>,
    consumer: QueueConsumer,
    message: QueueMessage,
    shutdown_rx: ShutdownRx,
) {
    match coordinator.handle_notification(&message.body, shutdown_rx).await {
        Ok(DrainOutcome::Interrupted) => {
            info!("drain interrupted by shutdown, leaving notification for redelivery");
        }
        Ok(outcome) => {
            info!(?outcome, "notification handled");
            if let Err(err) = consumer.delete(&message.receipt_handle).await {
                // The redelivered message will be handled idempotently.
                warn!(error = %err, "failed to delete handled notification");
            }
        }
        Err(err) => {
            error!(error = %err, "failed to handle notification, leaving it for redelivery");
        }
    }
}

async fn listen_for_shutdown_signals(shutdown_tx: ShutdownTx) {
    use tokio::signal::unix::{SignalKind, signal};

    // SIGTERM is what the process supervisor sends before SIGKILL.
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("SIGINT (Ctrl+C) received, shutting down");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received, shutting down");
        }
    }

    shutdown_tx.shutdown();
}

fn log_config(config: &DrainHookConfig) {
    info!(
        cluster = config.cluster,
        queue_url = config.queue_url,
        region = config.region.as_deref().unwrap_or("<ambient>"),
        "drain hook config"
    );
    log_drain_config(&config.drain);
    log_retry_config(&config.control_plane_retry);
}

fn log_drain_config(config: &DrainConfig) {
    info!(
        poll_interval_ms = config.poll_interval_ms,
        heartbeat_interval_ms = config.heartbeat_interval_ms,
        max_drain_ms = config.max_drain_ms,
        "drain config"
    );
}

fn log_retry_config(config: &RetryConfig) {
    info!(
        max_attempts = config.max_attempts,
        initial_delay_ms = config.initial_delay_ms,
        max_delay_ms = config.max_delay_ms,
        backoff_factor = config.backoff_factor,
        "control plane retry config"
    )
}
