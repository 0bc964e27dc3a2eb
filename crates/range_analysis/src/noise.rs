//! Quadratic range noise model

use contracts::NoiseModelConfig;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// `σ(d) = a + b·d²`
///
/// Precision of an amplitude-modulated ToF sensor degrades with the square
/// of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeNoiseModel {
    pub a: f32,
    pub b: f32,
}

impl RangeNoiseModel {
    pub fn new(a: f32, b: f32) -> Self {
        Self { a, b }
    }

    /// Standard deviation of one per-pixel measurement at `true_distance_m`
    pub fn sigma(&self, true_distance_m: f32) -> f32 {
        self.a + self.b * true_distance_m * true_distance_m
    }

    /// `pixel_count` independent draws of `true_distance_m + N(0, σ)`
    ///
    /// A non-positive or non-finite σ yields the exact distance and
    /// consumes no randomness.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        true_distance_m: f32,
        pixel_count: usize,
    ) -> Vec<f32> {
        let sigma = self.sigma(true_distance_m);
        if !(sigma.is_finite() && sigma > 0.0) {
            return vec![true_distance_m; pixel_count];
        }
        match Normal::new(true_distance_m, sigma) {
            Ok(dist) => dist.sample_iter(rng).take(pixel_count).collect(),
            Err(_) => vec![true_distance_m; pixel_count],
        }
    }
}

impl Default for RangeNoiseModel {
    fn default() -> Self {
        NoiseModelConfig::default().into()
    }
}

impl From<NoiseModelConfig> for RangeNoiseModel {
    fn from(config: NoiseModelConfig) -> Self {
        Self::new(config.a, config.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_coefficients() {
        let model = RangeNoiseModel::default();
        assert_eq!(model, RangeNoiseModel::new(0.001, 0.005));
        assert!((model.sigma(2.0) - 0.021).abs() < 1e-7);
    }

    #[test]
    fn test_sigma_grows_with_range() {
        let model = RangeNoiseModel::default();
        assert!(model.sigma(4.0) > model.sigma(2.0));
        assert_eq!(model.sigma(0.0), model.a);
    }

    #[test]
    fn test_sample_length_and_spread() {
        let model = RangeNoiseModel::default();
        let mut rng = StdRng::seed_from_u64(11);
        let samples = model.sample(&mut rng, 3.0, 5000);
        assert_eq!(samples.len(), 5000);

        let mean = samples.iter().map(|&s| s as f64).sum::<f64>() / samples.len() as f64;
        let sigma = model.sigma(3.0) as f64;
        assert!((mean - 3.0).abs() < 4.0 * sigma / (5000f64).sqrt());
    }

    #[test]
    fn test_zero_sigma_is_exact() {
        let model = RangeNoiseModel::new(0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(model.sample(&mut rng, 1.5, 3), vec![1.5, 1.5, 1.5]);
    }

    #[test]
    fn test_from_config() {
        let config = NoiseModelConfig { a: 0.01, b: 0.0 };
        let model = RangeNoiseModel::from(config);
        assert_eq!(model.sigma(10.0), 0.01);
    }
}
