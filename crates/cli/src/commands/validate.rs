//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::SimulationBlueprint;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    resolution: String,
    frame_rate_hz: f64,
    sphere_radius_m: f32,
    sphere_center_z_m: f32,
    amplitude: f32,
    noise_std: f32,
    unambiguous_range_m: f32,
    amplitude_threshold: f32,
    characterization_distances: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

impl From<&SimulationBlueprint> for ConfigSummary {
    fn from(bp: &SimulationBlueprint) -> Self {
        Self {
            version: format!("{:?}", bp.version),
            resolution: format!("{}x{}", bp.sensor.width, bp.sensor.height),
            frame_rate_hz: bp.sensor.frame_rate_hz,
            sphere_radius_m: bp.scene.sphere_radius_m,
            sphere_center_z_m: bp.scene.sphere_center_z_m,
            amplitude: bp.scene.amplitude,
            noise_std: bp.scene.noise_std,
            unambiguous_range_m: bp.scene.unambiguous_range_m,
            amplitude_threshold: bp.processing.amplitude_threshold,
            characterization_distances: bp.characterization.distances_m.len(),
            seed: bp.seed,
        }
    }
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = config_loader::scene_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary::from(&blueprint)),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!(
                "  Sensor: {} @ {} Hz",
                summary.resolution, summary.frame_rate_hz
            );
            println!(
                "  Sphere: radius {} m, center {} m",
                summary.sphere_radius_m, summary.sphere_center_z_m
            );
            println!(
                "  Amplitude: {} (noise σ {})",
                summary.amplitude, summary.noise_std
            );
            println!("  Unambiguous range: {} m", summary.unambiguous_range_m);
            println!("  Amplitude threshold: {}", summary.amplitude_threshold);
            println!(
                "  Characterization distances: {}",
                summary.characterization_distances
            );
            match summary.seed {
                Some(seed) => println!("  Seed: {}", seed),
                None => println!("  Seed: entropy"),
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
