//! Pipeline statistics and metrics.

use std::time::Duration;

use observability::FrameMetricsAggregator;

/// Why the stream stopped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopReason {
    /// Generator finished (frame limit reached)
    #[default]
    Completed,
    TimedOut,
    /// Ctrl+C or SIGTERM
    Shutdown,
}

/// Statistics from a stream run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Packets produced by the generator
    pub frames_generated: u64,

    /// Packets demodulated successfully
    pub frames_processed: u64,

    /// Packets refused by the demodulator
    pub frames_rejected: u64,

    /// Total duration of the run
    pub duration: Duration,

    pub stop_reason: StopReason,

    /// Per-frame metrics aggregator
    pub frame_metrics: FrameMetricsAggregator,
}

impl PipelineStats {
    /// Demodulated frames per second
    pub fn fps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames_processed as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Generated packets never demodulated (in flight at stop)
    pub fn frames_dropped(&self) -> u64 {
        self.frames_generated
            .saturating_sub(self.frames_processed + self.frames_rejected)
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                     Stream Statistics                        ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Stop reason: {:?}", self.stop_reason);
        println!("   ├─ Frames generated: {}", self.frames_generated);
        println!("   ├─ Frames processed: {}", self.frames_processed);
        println!("   ├─ Frames rejected: {}", self.frames_rejected);
        println!("   ├─ Frames dropped: {}", self.frames_dropped());
        println!("   └─ FPS: {:.2}", self.fps());

        let summary = self.frame_metrics.summary();

        println!("\n📈 Demodulation Metrics");
        println!(
            "   ├─ Valid pixels: {} ({:.2}%)",
            summary.valid_pixels, summary.valid_rate
        );
        println!("   ├─ Invalid pixels: {}", summary.invalid_pixels);
        println!("   ├─ Latency (ms): {}", summary.latency_ms);
        println!("   └─ Mean amplitude: {}", summary.mean_amplitude);

        println!();
    }
}
