//! `generate` command implementation.

use std::time::Instant;

use anyhow::{Context, Result};
use scene_synth::RawPacketGenerator;
use tracing::info;

use super::common::{demodulator_for, finalize_blueprint, load_blueprint, FrameReport};
use crate::cli::GenerateArgs;

/// Execute the `generate` command
pub fn run_generate(args: &GenerateArgs) -> Result<()> {
    let mut blueprint = load_blueprint(args.config.as_deref())?;

    if let Some(width) = args.width {
        blueprint.sensor.width = width;
    }
    if let Some(height) = args.height {
        blueprint.sensor.height = height;
    }
    if args.seed.is_some() {
        blueprint.seed = args.seed;
    }
    finalize_blueprint(&blueprint)?;

    let (width, height) = (blueprint.sensor.width, blueprint.sensor.height);
    let mut generator = RawPacketGenerator::from_optional_seed(blueprint.seed);
    let packet = generator.generate(width, height, &blueprint.scene, args.frame_counter);
    observability::record_packet_generated(packet.frame_counter, packet.pixel_count());

    info!(
        frame_counter = packet.frame_counter,
        width,
        height,
        seed = ?blueprint.seed,
        "Packet generated"
    );

    if let Some(ref path) = args.output {
        std::fs::write(path, packet.encode())
            .with_context(|| format!("Failed to write packet to {}", path.display()))?;
        info!(path = %path.display(), bytes = packet.encoded_len(), "Raw packet written");
    }

    let started = Instant::now();
    let frame = demodulator_for(&blueprint)
        .process(&packet)
        .context("Failed to demodulate generated packet")?;
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

    observability::record_demod_latency_ms(latency_ms);
    observability::record_frame_processed(&frame);

    FrameReport::new(
        packet.frame_counter,
        &frame,
        &blueprint.intrinsics(),
        latency_ms,
    )
    .print(args.json)
}
