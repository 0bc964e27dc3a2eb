//! `characterize` command implementation.

use std::time::Instant;

use anyhow::{Context, Result};
use range_analysis::{characterize_par, CharacterizationReport, RangeCharacterizer, RangeNoiseModel};
use tracing::info;

use super::common::{finalize_blueprint, load_blueprint};
use crate::cli::{CharacterizeArgs, ReportFormat};

/// Execute the `characterize` command
pub fn run_characterize(args: &CharacterizeArgs) -> Result<()> {
    let mut blueprint = load_blueprint(args.config.as_deref())?;
    if args.seed.is_some() {
        blueprint.seed = args.seed;
    }
    if let Some(samples) = args.samples {
        blueprint.characterization.samples_per_distance = samples;
    }
    if let Some(pixels) = args.pixels {
        blueprint.characterization.pixels_per_sample = pixels;
    }
    finalize_blueprint(&blueprint)?;

    let sweep = &blueprint.characterization;
    let model = RangeNoiseModel::from(blueprint.noise_model);

    info!(
        distances = sweep.distances_m.len(),
        samples_per_distance = sweep.samples_per_distance,
        pixels_per_sample = sweep.pixels_per_sample,
        a = model.a,
        b = model.b,
        parallel = args.parallel,
        "Characterizing range noise"
    );

    let started = Instant::now();
    let report = if args.parallel {
        let seed = blueprint.seed.unwrap_or_else(rand::random);
        characterize_par(
            model,
            &sweep.distances_m,
            sweep.samples_per_distance,
            sweep.pixels_per_sample,
            seed,
        )
    } else {
        let mut characterizer = match blueprint.seed {
            Some(seed) => RangeCharacterizer::from_seed(model, seed),
            None => RangeCharacterizer::from_entropy(model),
        };
        characterizer.characterize_all(
            &sweep.distances_m,
            sweep.samples_per_distance,
            sweep.pixels_per_sample,
        )
    };

    for row in &report.rows {
        observability::record_characterization_row(row);
    }
    info!(
        rows = report.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Characterization complete"
    );

    let rendered = render(&report, args.format)?;
    match args.output {
        Some(ref path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!(path = %path.display(), "Report written");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn render(report: &CharacterizationReport, format: ReportFormat) -> Result<String> {
    Ok(match format {
        ReportFormat::Table => report.to_string(),
        ReportFormat::Csv => report.to_csv(),
        ReportFormat::Json => {
            let mut json = report
                .to_json()
                .context("Failed to serialize characterization report")?;
            json.push('\n');
            json
        }
    })
}
