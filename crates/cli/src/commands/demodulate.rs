//! `demodulate` command implementation.

use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{CameraIntrinsics, ContractError, RawPacket};
use tracing::info;

use super::common::{demodulator_for, finalize_blueprint, load_blueprint, FrameReport};
use crate::cli::DemodulateArgs;
use crate::error::CliError;

/// Execute the `demodulate` command
pub fn run_demodulate(args: &DemodulateArgs) -> Result<()> {
    let mut blueprint = load_blueprint(args.config.as_deref())?;
    if let Some(threshold) = args.threshold {
        blueprint.processing.amplitude_threshold = threshold;
    }
    if let Some(range) = args.range {
        blueprint.scene.unambiguous_range_m = range;
    }
    finalize_blueprint(&blueprint)?;

    if !args.input.exists() {
        return Err(CliError::packet_not_found(&args.input).into());
    }
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let packet = RawPacket::decode(&bytes)
        .with_context(|| format!("Malformed packet in {}", args.input.display()))?;

    info!(
        frame_counter = packet.frame_counter,
        width = packet.width,
        height = packet.height,
        "Packet decoded"
    );

    let started = Instant::now();
    let frame = match demodulator_for(&blueprint).process(&packet) {
        Ok(frame) => frame,
        Err(e) => {
            if let ContractError::ShapeMismatch { channel, .. } = &e {
                observability::record_shape_mismatch(*channel);
            }
            return Err(e).context("Refusing to demodulate malformed packet");
        }
    };
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

    observability::record_demod_latency_ms(latency_ms);
    observability::record_frame_processed(&frame);

    // packet resolution may differ from the configured sensor
    let intrinsics = CameraIntrinsics::for_resolution(packet.width, packet.height);
    FrameReport::new(packet.frame_counter, &frame, &intrinsics, latency_ms).print(args.json)
}
