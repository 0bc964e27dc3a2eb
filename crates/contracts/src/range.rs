//! Range characterization records.

use serde::{Deserialize, Serialize};

/// One true distance with its repeated noisy measurements, in draw order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeMeasurement {
    pub true_distance: f32,
    pub measured_distances: Vec<f32>,
}

impl RangeMeasurement {
    pub fn with_capacity(true_distance: f32, capacity: usize) -> Self {
        Self {
            true_distance,
            measured_distances: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, measured: f32) {
        self.measured_distances.push(measured);
    }

    pub fn len(&self) -> usize {
        self.measured_distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measured_distances.is_empty()
    }
}

/// Bias and precision at one true distance
///
/// Serialized with the report column names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeErrorStats {
    #[serde(rename = "true_range_m")]
    pub true_distance: f32,

    /// Signed mean of `measured - true` (bias)
    #[serde(rename = "mean_error_m")]
    pub mean_error: f32,

    /// Sample standard deviation of the measured values (precision)
    #[serde(rename = "std_dev_m")]
    pub std_dev_error: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_accumulates_in_order() {
        let mut m = RangeMeasurement::with_capacity(2.0, 3);
        assert!(m.is_empty());
        m.push(2.1);
        m.push(1.9);
        assert_eq!(m.len(), 2);
        assert_eq!(m.measured_distances, vec![2.1, 1.9]);
    }

    #[test]
    fn test_stats_serialize_with_report_columns() {
        let stats = RangeErrorStats {
            true_distance: 1.0,
            mean_error: 0.0,
            std_dev_error: 0.5,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"true_range_m\":1.0"), "got: {json}");
        assert!(json.contains("\"mean_error_m\""));
        assert!(json.contains("\"std_dev_m\":0.5"));
    }
}
