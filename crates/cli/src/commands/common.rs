//! Helpers shared by the commands.

use std::path::Path;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{CameraIntrinsics, ProcessedFrame, SimulationBlueprint};
use demodulator::PhaseDemodulator;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::CliError;

/// Load the blueprint, or validated defaults when no path is given
pub fn load_blueprint(path: Option<&Path>) -> Result<SimulationBlueprint> {
    if let Some(path) = path {
        info!(config = %path.display(), "Loading configuration");
        if !path.exists() {
            return Err(CliError::config_not_found(path).into());
        }
    }

    ConfigLoader::load_or_default(path).with_context(|| match path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Default configuration is invalid".to_string(),
    })
}

/// Re-validate after CLI overrides and log scene warnings
pub fn finalize_blueprint(blueprint: &SimulationBlueprint) -> Result<()> {
    ConfigLoader::validate(blueprint).context("Invalid command-line override")?;
    for warning in config_loader::scene_warnings(blueprint) {
        warn!("{warning}");
    }
    Ok(())
}

pub fn demodulator_for(blueprint: &SimulationBlueprint) -> PhaseDemodulator {
    PhaseDemodulator::new(
        blueprint.processing.amplitude_threshold,
        blueprint.scene.unambiguous_range_m,
    )
}

/// One-frame summary for text or JSON output
#[derive(Debug, Serialize)]
pub struct FrameReport {
    pub frame_counter: u32,
    pub width: u32,
    pub height: u32,
    pub valid_pixels: usize,
    pub invalid_pixels: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_min_m: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_max_m: Option<f32>,
    pub mean_amplitude: f32,
    /// Mean of the back-projected valid pixels, camera frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centroid_m: Option<[f32; 3]>,
    pub demod_latency_ms: f64,
}

impl FrameReport {
    pub fn new(
        frame_counter: u32,
        frame: &ProcessedFrame,
        intrinsics: &CameraIntrinsics,
        demod_latency_ms: f64,
    ) -> Self {
        let bounds = frame.distance_bounds();
        Self {
            frame_counter,
            width: frame.width,
            height: frame.height,
            valid_pixels: frame.valid_pixel_count(),
            invalid_pixels: frame.invalid_pixel_count(),
            distance_min_m: bounds.map(|(min, _)| min),
            distance_max_m: bounds.map(|(_, max)| max),
            mean_amplitude: frame.mean_amplitude(),
            centroid_m: centroid(&frame.to_point_cloud(intrinsics)),
            demod_latency_ms,
        }
    }

    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            let json =
                serde_json::to_string_pretty(self).context("Failed to serialize frame report")?;
            println!("{}", json);
            return Ok(());
        }

        println!("\n=== Frame {} ===\n", self.frame_counter);
        println!("  Resolution: {}x{}", self.width, self.height);
        println!(
            "  Valid pixels: {} / {}",
            self.valid_pixels,
            self.valid_pixels + self.invalid_pixels
        );
        match (self.distance_min_m, self.distance_max_m) {
            (Some(min), Some(max)) => println!("  Distance (m): {:.3} .. {:.3}", min, max),
            _ => println!("  Distance (m): no valid pixels"),
        }
        println!("  Mean amplitude: {:.1}", self.mean_amplitude);
        if let Some([x, y, z]) = self.centroid_m {
            println!("  Centroid (m): ({:.3}, {:.3}, {:.3})", x, y, z);
        }
        println!("  Demodulation: {:.3} ms", self.demod_latency_ms);
        println!();
        Ok(())
    }
}

fn centroid(points: &[[f32; 3]]) -> Option<[f32; 3]> {
    if points.is_empty() {
        return None;
    }
    let mut sum = [0.0f64; 3];
    for point in points {
        for (acc, v) in sum.iter_mut().zip(point) {
            *acc += f64::from(*v);
        }
    }
    let n = points.len() as f64;
    Some(sum.map(|s| (s / n) as f32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_reported() {
        let err = load_blueprint(Some(Path::new("/nonexistent/tof.toml"))).unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }

    #[test]
    fn test_defaults_without_path() {
        let bp = load_blueprint(None).unwrap();
        assert!(finalize_blueprint(&bp).is_ok());
    }

    #[test]
    fn test_frame_report_skips_empty_bounds() {
        let frame = ProcessedFrame::new(2, 2);
        let report = FrameReport::new(1, &frame, &CameraIntrinsics::for_resolution(2, 2), 0.1);
        assert_eq!(report.invalid_pixels, 4);
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("distance_min_m"));
        assert!(!json.contains("centroid_m"));
    }

    #[test]
    fn test_frame_report_centroid_of_flat_frame() {
        let mut bp = SimulationBlueprint::default();
        bp.sensor.width = 4;
        bp.sensor.height = 2;
        let mut frame = ProcessedFrame::new(4, 2);
        frame.distance.fill(2.0);

        let report = FrameReport::new(0, &frame, &bp.intrinsics(), 0.0);
        let [x, y, z] = report.centroid_m.unwrap();
        // symmetric grid around the principal point
        assert!(x.abs() < 1e-6 && y.abs() < 1e-6, "({x}, {y})");
        assert!((z - 2.0).abs() < 1e-6);
    }
}
