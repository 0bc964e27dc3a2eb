//! Simulator metrics
//!
//! Prometheus-facing counters plus an in-memory aggregator for run summaries.

use std::fmt;

use contracts::{Channel, ProcessedFrame, RangeErrorStats};
use metrics::{counter, gauge, histogram};

/// Record a generated raw packet
pub fn record_packet_generated(frame_counter: u32, pixels: usize) {
    counter!("tof_sim_packets_generated_total").increment(1);
    counter!("tof_sim_pixels_generated_total").increment(pixels as u64);
    gauge!("tof_sim_last_frame_counter").set(frame_counter as f64);
}

/// Record a demodulated frame
///
/// Call once per successful `PhaseDemodulator::process`.
pub fn record_frame_processed(frame: &ProcessedFrame) {
    let valid = frame.valid_pixel_count();
    let invalid = frame.invalid_pixel_count();

    counter!("tof_sim_frames_processed_total").increment(1);
    counter!("tof_sim_pixels_valid_total").increment(valid as u64);
    counter!("tof_sim_pixels_invalid_total").increment(invalid as u64);

    if frame.pixel_count() > 0 {
        gauge!("tof_sim_valid_pixel_ratio").set(valid as f64 / frame.pixel_count() as f64);
    }
    histogram!("tof_sim_mean_amplitude").record(frame.mean_amplitude() as f64);

    if let Some((min, max)) = frame.distance_bounds() {
        gauge!("tof_sim_distance_min_m").set(min as f64);
        gauge!("tof_sim_distance_max_m").set(max as f64);
    }
}

/// Record a packet refused for a channel length mismatch
pub fn record_shape_mismatch(channel: Channel) {
    counter!(
        "tof_sim_shape_mismatch_total",
        "channel" => channel.to_string()
    )
    .increment(1);
}

/// Record wall time of one demodulation
pub fn record_demod_latency_ms(latency_ms: f64) {
    histogram!("tof_sim_demod_latency_ms").record(latency_ms);
}

/// Record packets waiting between generator and demodulator
pub fn record_queue_depth(depth: usize) {
    gauge!("tof_sim_queue_depth").set(depth as f64);
}

/// Record one characterization row, labelled by true distance
pub fn record_characterization_row(stats: &RangeErrorStats) {
    let range = format!("{:.3}", stats.true_distance);
    counter!("tof_sim_characterization_rows_total").increment(1);
    gauge!("tof_sim_range_bias_m", "true_range_m" => range.clone()).set(stats.mean_error as f64);
    gauge!("tof_sim_range_precision_m", "true_range_m" => range).set(stats.std_dev_error as f64);
}

/// Frame metrics aggregator
///
/// Aggregates in memory for the end-of-run summary.
#[derive(Debug, Clone, Default)]
pub struct FrameMetricsAggregator {
    /// Frames demodulated
    pub total_frames: u64,

    /// Packets refused with a shape mismatch
    pub rejected_packets: u64,

    pub valid_pixels: u64,
    pub invalid_pixels: u64,

    /// Demodulation latency (ms)
    pub latency_stats: RunningStats,

    /// Per-frame mean amplitude
    pub amplitude_stats: RunningStats,

    /// Per-frame valid pixel ratio
    pub valid_ratio_stats: RunningStats,
}

impl FrameMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one demodulated frame
    pub fn update(&mut self, frame: &ProcessedFrame, latency_ms: f64) {
        let valid = frame.valid_pixel_count() as u64;
        let invalid = frame.invalid_pixel_count() as u64;

        self.total_frames += 1;
        self.valid_pixels += valid;
        self.invalid_pixels += invalid;

        self.latency_stats.push(latency_ms);
        self.amplitude_stats.push(frame.mean_amplitude() as f64);
        if valid + invalid > 0 {
            self.valid_ratio_stats
                .push(valid as f64 / (valid + invalid) as f64);
        }
    }

    pub fn record_rejection(&mut self) {
        self.rejected_packets += 1;
    }

    pub fn summary(&self) -> MetricsSummary {
        let pixels = self.valid_pixels + self.invalid_pixels;
        MetricsSummary {
            total_frames: self.total_frames,
            rejected_packets: self.rejected_packets,
            valid_pixels: self.valid_pixels,
            invalid_pixels: self.invalid_pixels,
            valid_rate: if pixels > 0 {
                self.valid_pixels as f64 / pixels as f64 * 100.0
            } else {
                0.0
            },
            latency_ms: StatsSummary::from(&self.latency_stats),
            mean_amplitude: StatsSummary::from(&self.amplitude_stats),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_frames: u64,
    pub rejected_packets: u64,
    pub valid_pixels: u64,
    pub invalid_pixels: u64,
    /// Percentage of valid pixels
    pub valid_rate: f64,
    pub latency_ms: StatsSummary,
    pub mean_amplitude: StatsSummary,
}

impl fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Frame Metrics Summary ===")?;
        writeln!(f, "Total frames: {}", self.total_frames)?;
        writeln!(f, "Rejected packets: {}", self.rejected_packets)?;
        writeln!(
            f,
            "Valid pixels: {} ({:.2}%)",
            self.valid_pixels, self.valid_rate
        )?;
        writeln!(f, "Invalid pixels: {}", self.invalid_pixels)?;
        writeln!(f, "Demod latency (ms): {}", self.latency_ms)?;
        writeln!(f, "Mean amplitude: {}", self.mean_amplitude)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online mean and variance (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            self.m2 += delta * (value - self.mean);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance, 0 below two values
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
