//! `stream` command implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use super::common::{finalize_blueprint, load_blueprint};
use crate::cli::StreamArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `stream` command
pub async fn run_stream(args: &StreamArgs) -> Result<()> {
    let mut blueprint = load_blueprint(args.config.as_deref())?;
    if let Some(rate) = args.frame_rate {
        info!(frame_rate_hz = rate, "Overriding frame rate from CLI");
        blueprint.sensor.frame_rate_hz = rate;
    }
    if args.seed.is_some() {
        blueprint.seed = args.seed;
    }
    finalize_blueprint(&blueprint)?;

    let pipeline_config = PipelineConfig {
        blueprint,
        max_frames: (args.max_frames > 0).then_some(args.max_frames),
        timeout: (args.timeout > 0).then(|| Duration::from_secs(args.timeout)),
        buffer_size: args.buffer_size,
        metrics_port: (args.metrics_port > 0).then_some(args.metrics_port),
    };

    info!("Starting stream...");

    let stats = Pipeline::new(pipeline_config)
        .run(setup_shutdown_signal())
        .await
        .context("Stream execution failed")?;

    info!(
        frames_processed = stats.frames_processed,
        frames_rejected = stats.frames_rejected,
        stop_reason = ?stats.stop_reason,
        duration_secs = stats.duration.as_secs_f64(),
        fps = format!("{:.2}", stats.fps()),
        "Stream completed"
    );
    stats.print_summary();

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
