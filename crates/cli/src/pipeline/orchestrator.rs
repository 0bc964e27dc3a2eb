//! Stream orchestrator - fixed-rate generation feeding demodulation.
//!
//! A generator task ticks at the sensor frame rate and hands packets over a
//! bounded channel to the demodulation loop. The loop stops on the frame
//! limit, the timeout, or the shutdown future, whichever comes first.

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::Result;
use contracts::{ContractError, RawPacket, SceneParameters, SimulationBlueprint};
use demodulator::PhaseDemodulator;
use scene_synth::RawPacketGenerator;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::{PipelineStats, StopReason};
use crate::error::CliError;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub blueprint: SimulationBlueprint,

    /// Maximum number of frames to produce (None = unlimited)
    pub max_frames: Option<u64>,

    /// Run timeout (None = no timeout)
    pub timeout: Option<Duration>,

    /// Channel buffer size
    pub buffer_size: usize,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Stream orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run until the frame limit, the timeout, or `shutdown` resolves
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let PipelineConfig {
            blueprint,
            max_frames,
            timeout,
            buffer_size,
            metrics_port,
        } = self.config;

        if let Some(port) = metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let period = frame_period(blueprint.sensor.frame_rate_hz);
        let (packet_tx, mut packet_rx) = mpsc::channel::<RawPacket>(buffer_size.max(1));

        let producer = tokio::spawn(produce(
            packet_tx,
            RawPacketGenerator::from_optional_seed(blueprint.seed),
            FrameSpec {
                width: blueprint.sensor.width,
                height: blueprint.sensor.height,
                scene: blueprint.scene,
            },
            period,
            max_frames,
        ));

        let demodulator = PhaseDemodulator::new(
            blueprint.processing.amplitude_threshold,
            blueprint.scene.unambiguous_range_m,
        );

        info!(
            width = blueprint.sensor.width,
            height = blueprint.sensor.height,
            frame_rate_hz = blueprint.sensor.frame_rate_hz,
            max_frames = ?max_frames,
            timeout_secs = ?timeout.map(|t| t.as_secs_f64()),
            "Stream running"
        );

        let deadline = async {
            match timeout {
                Some(t) => tokio::time::sleep(t).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(deadline);
        tokio::pin!(shutdown);

        let mut stats = PipelineStats::default();
        loop {
            tokio::select! {
                received = packet_rx.recv() => {
                    let Some(packet) = received else {
                        stats.stop_reason = StopReason::Completed;
                        break;
                    };
                    observability::record_queue_depth(packet_rx.len());
                    demodulate(demodulator, packet, &mut stats).await?;

                    if max_frames.is_some_and(|max| stats.frames_processed + stats.frames_rejected >= max) {
                        info!(frames = stats.frames_processed, "Reached max frames limit");
                        stats.stop_reason = StopReason::Completed;
                        break;
                    }
                }
                _ = &mut deadline => {
                    warn!(timeout_secs = ?timeout.map(|t| t.as_secs()), "Stream timed out");
                    stats.stop_reason = StopReason::TimedOut;
                    break;
                }
                _ = &mut shutdown => {
                    warn!("Received shutdown signal, stopping stream...");
                    stats.stop_reason = StopReason::Shutdown;
                    break;
                }
            }
        }

        // closing the receiver stops the generator at its next tick
        drop(packet_rx);
        stats.frames_generated = producer
            .await
            .map_err(|e| CliError::pipeline_execution(format!("generator task failed: {e}")))?;
        stats.duration = start_time.elapsed();

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            fps = format!("{:.2}", stats.fps()),
            "Stream shutdown complete"
        );

        Ok(stats)
    }
}

/// Geometry handed to the generator task
struct FrameSpec {
    width: u32,
    height: u32,
    scene: SceneParameters,
}

/// Generator task: one packet per tick until the limit or a closed channel
async fn produce(
    packet_tx: mpsc::Sender<RawPacket>,
    mut generator: RawPacketGenerator,
    frame: FrameSpec,
    period: Duration,
    max_frames: Option<u64>,
) -> u64 {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut generated = 0u64;
    let mut frame_counter = 0u32;

    while !matches!(max_frames, Some(max) if generated >= max) {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = packet_tx.closed() => break,
        }

        let packet = generator.generate(frame.width, frame.height, &frame.scene, frame_counter);
        observability::record_packet_generated(frame_counter, packet.pixel_count());
        generated += 1;
        frame_counter = frame_counter.wrapping_add(1);

        if packet_tx.send(packet).await.is_err() {
            debug!("Demodulator closed, generator stopping");
            break;
        }
    }

    generated
}

/// Slowest supported tick, keeps `Instant` arithmetic in range
const MAX_FRAME_PERIOD: Duration = Duration::from_secs(86_400);

/// Interval period for a frame rate, clamped to `[1 ns, 1 day]`
fn frame_period(frame_rate_hz: f64) -> Duration {
    Duration::try_from_secs_f64(1.0 / frame_rate_hz)
        .unwrap_or(MAX_FRAME_PERIOD)
        .clamp(Duration::from_nanos(1), MAX_FRAME_PERIOD)
}

/// Demodulate on the blocking pool so rayon work stays off the runtime threads
async fn demodulate(
    demodulator: PhaseDemodulator,
    packet: RawPacket,
    stats: &mut PipelineStats,
) -> Result<()> {
    let frame_counter = packet.frame_counter;
    let (result, elapsed) = tokio::task::spawn_blocking(move || {
        let started = Instant::now();
        let result = demodulator.process(&packet);
        (result, started.elapsed())
    })
    .await
    .map_err(|e| CliError::pipeline_execution(format!("demodulation task failed: {e}")))?;

    match result {
        Ok(frame) => {
            let latency_ms = elapsed.as_secs_f64() * 1000.0;
            observability::record_demod_latency_ms(latency_ms);
            observability::record_frame_processed(&frame);
            stats.frame_metrics.update(&frame, latency_ms);
            stats.frames_processed += 1;

            debug!(
                frame_counter,
                valid = frame.valid_pixel_count(),
                latency_ms = format!("{:.3}", latency_ms),
                "Frame processed"
            );
        }
        Err(e) => {
            if let ContractError::ShapeMismatch { channel, .. } = &e {
                observability::record_shape_mismatch(*channel);
            }
            stats.frame_metrics.record_rejection();
            stats.frames_rejected += 1;
            warn!(frame_counter, error = %e, "Packet rejected");
        }
    }
    Ok(())
}
