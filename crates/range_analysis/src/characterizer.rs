//! Per-distance bias and precision

use contracts::{RangeErrorStats, RangeMeasurement};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::noise::RangeNoiseModel;
use crate::report::CharacterizationReport;

/// Reduce a measurement to bias and precision
///
/// `mean_error` is the mean of `measured - true`. `std_dev_error` is the
/// N−1 sample standard deviation of the measured values about their own
/// mean, so it carries no bias. Zero samples give `(0, 0)`, one sample
/// gives a zero deviation.
pub fn analyze(measurement: &RangeMeasurement) -> RangeErrorStats {
    let n = measurement.len();
    let truth = measurement.true_distance as f64;

    let (mean_error, std_dev_error) = match n {
        0 => (0.0, 0.0),
        _ => {
            let values = measurement.measured_distances.iter().map(|&m| m as f64);
            let mean = values.clone().sum::<f64>() / n as f64;
            let std_dev = if n < 2 {
                0.0
            } else {
                let ss: f64 = values.map(|m| (m - mean).powi(2)).sum();
                (ss / (n - 1) as f64).sqrt()
            };
            (mean - truth, std_dev)
        }
    };

    RangeErrorStats {
        true_distance: measurement.true_distance,
        mean_error: mean_error as f32,
        std_dev_error: std_dev_error as f32,
    }
}

/// Drives the noise model across true distances
#[derive(Debug, Clone)]
pub struct RangeCharacterizer<R = StdRng> {
    model: RangeNoiseModel,
    rng: R,
}

impl RangeCharacterizer<StdRng> {
    pub fn from_seed(model: RangeNoiseModel, seed: u64) -> Self {
        Self::new(model, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(model: RangeNoiseModel) -> Self {
        Self::new(model, StdRng::from_os_rng())
    }
}

impl<R: Rng> RangeCharacterizer<R> {
    pub fn new(model: RangeNoiseModel, rng: R) -> Self {
        Self { model, rng }
    }

    /// `samples_per_distance` frame-averaged measurements of one distance
    ///
    /// Each measurement is the mean of `pixels_per_sample` noisy pixels.
    pub fn measure(
        &mut self,
        true_distance_m: f32,
        samples_per_distance: usize,
        pixels_per_sample: usize,
    ) -> RangeMeasurement {
        let mut measurement = RangeMeasurement::with_capacity(true_distance_m, samples_per_distance);
        for _ in 0..samples_per_distance {
            let pixels = self
                .model
                .sample(&mut self.rng, true_distance_m, pixels_per_sample);
            measurement.push(spatial_mean(&pixels, true_distance_m));
        }
        measurement
    }

    pub fn characterize(
        &mut self,
        true_distance_m: f32,
        samples_per_distance: usize,
        pixels_per_sample: usize,
    ) -> RangeErrorStats {
        let measurement = self.measure(true_distance_m, samples_per_distance, pixels_per_sample);
        let stats = analyze(&measurement);
        info!(
            true_range_m = stats.true_distance,
            mean_error_m = stats.mean_error,
            std_dev_m = stats.std_dev_error,
            samples = measurement.len(),
            "range characterized"
        );
        stats
    }

    /// One row per distance, in the given order, sharing this generator
    pub fn characterize_all(
        &mut self,
        distances_m: &[f32],
        samples_per_distance: usize,
        pixels_per_sample: usize,
    ) -> CharacterizationReport {
        let rows = distances_m
            .iter()
            .map(|&d| self.characterize(d, samples_per_distance, pixels_per_sample))
            .collect();
        CharacterizationReport::new(rows)
    }
}

/// Characterize distances in parallel
///
/// Distance `i` draws from `StdRng::seed_from_u64(seed + i)`, so the report
/// depends only on `seed` and never on thread scheduling. Rows keep the
/// input order.
pub fn characterize_par(
    model: RangeNoiseModel,
    distances_m: &[f32],
    samples_per_distance: usize,
    pixels_per_sample: usize,
    seed: u64,
) -> CharacterizationReport {
    debug!(
        distances = distances_m.len(),
        threads = rayon::current_num_threads(),
        "parallel characterization"
    );
    let rows = distances_m
        .par_iter()
        .enumerate()
        .map(|(idx, &d)| {
            RangeCharacterizer::from_seed(model, seed.wrapping_add(idx as u64)).characterize(
                d,
                samples_per_distance,
                pixels_per_sample,
            )
        })
        .collect();
    CharacterizationReport::new(rows)
}

/// Arithmetic mean, `fallback` for an empty frame
fn spatial_mean(pixels: &[f32], fallback: f32) -> f32 {
    if pixels.is_empty() {
        return fallback;
    }
    let sum: f64 = pixels.iter().map(|&p| p as f64).sum();
    (sum / pixels.len() as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurement(truth: f32, values: &[f32]) -> RangeMeasurement {
        RangeMeasurement {
            true_distance: truth,
            measured_distances: values.to_vec(),
        }
    }

    #[test]
    fn test_analyze_zero_samples() {
        let stats = analyze(&measurement(2.0, &[]));
        assert_eq!(stats.true_distance, 2.0);
        assert_eq!(stats.mean_error, 0.0);
        assert_eq!(stats.std_dev_error, 0.0);
    }

    #[test]
    fn test_analyze_single_sample() {
        let stats = analyze(&measurement(2.0, &[2.5]));
        assert!((stats.mean_error - 0.5).abs() < 1e-6);
        assert_eq!(stats.std_dev_error, 0.0);
    }

    #[test]
    fn test_analyze_separates_bias_from_spread() {
        // constant offset: bias only
        let stats = analyze(&measurement(1.0, &[1.2, 1.2, 1.2]));
        assert!((stats.mean_error - 0.2).abs() < 1e-6);
        assert!(stats.std_dev_error.abs() < 1e-6);

        // symmetric spread: precision only
        let stats = analyze(&measurement(1.0, &[0.9, 1.1]));
        assert!(stats.mean_error.abs() < 1e-6);
        assert!((stats.std_dev_error - 0.141_421).abs() < 1e-5);
    }

    #[test]
    fn test_measure_sample_count_and_order() {
        let mut characterizer = RangeCharacterizer::from_seed(RangeNoiseModel::default(), 5);
        let m = characterizer.measure(1.0, 7, 10);
        assert_eq!(m.true_distance, 1.0);
        assert_eq!(m.len(), 7);
    }

    #[test]
    fn test_noise_free_model_is_exact() {
        let model = RangeNoiseModel::new(0.0, 0.0);
        let stats = RangeCharacterizer::from_seed(model, 0).characterize(3.0, 10, 10);
        assert_eq!(stats.mean_error, 0.0);
        assert_eq!(stats.std_dev_error, 0.0);
    }

    #[test]
    fn test_same_seed_same_report() {
        let distances = [0.5, 1.0, 2.0];
        let a = RangeCharacterizer::from_seed(RangeNoiseModel::default(), 9)
            .characterize_all(&distances, 20, 50);
        let b = RangeCharacterizer::from_seed(RangeNoiseModel::default(), 9)
            .characterize_all(&distances, 20, 50);
        assert_eq!(a, b);
    }

    #[test]
    fn test_precision_degrades_with_range() {
        let distances = [0.5, 1.0, 2.0, 4.0, 8.0];
        let report = RangeCharacterizer::from_seed(RangeNoiseModel::default(), 1234)
            .characterize_all(&distances, 100, 200);
        for pair in report.rows.windows(2) {
            assert!(
                pair[1].std_dev_error >= pair[0].std_dev_error,
                "{:?} then {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_bias_is_near_zero() {
        let model = RangeNoiseModel::default();
        let stats = RangeCharacterizer::from_seed(model, 77).characterize(3.0, 100, 500);
        let bound = 4.0 * model.sigma(3.0) / (100.0f32 * 500.0).sqrt();
        assert!(stats.mean_error.abs() < bound, "bias {}", stats.mean_error);
    }

    #[test]
    fn test_parallel_matches_per_distance_seeds() {
        let model = RangeNoiseModel::default();
        let distances = [1.0, 2.0, 3.0];
        let report = characterize_par(model, &distances, 10, 20, 40);

        assert_eq!(report.rows.len(), 3);
        for (idx, &d) in distances.iter().enumerate() {
            let expected =
                RangeCharacterizer::from_seed(model, 40 + idx as u64).characterize(d, 10, 20);
            assert_eq!(report.rows[idx], expected);
        }
    }
}
