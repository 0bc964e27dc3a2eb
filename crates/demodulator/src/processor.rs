//! Four-phase demodulation

use std::f32::consts::TAU;

use contracts::{ContractError, ProcessedFrame, RawPacket};
use rayon::prelude::*;
use tracing::debug;

/// Amplitude and distance of one pixel from its four samples
///
/// Returns `(amplitude, distance_m)`; `distance_m` is NaN when
/// `amplitude < amplitude_threshold`.
pub fn demodulate_pixel(
    samples: [u16; 4],
    amplitude_threshold: f32,
    unambiguous_range_m: f32,
) -> (f32, f32) {
    let [i0, i90, i180, i270] = samples.map(f32::from);

    let amplitude = 0.5 * ((i270 - i90).powi(2) + (i180 - i0).powi(2)).sqrt();
    // (−π, π]
    let phase = (i90 - i270).atan2(i0 - i180);

    let mut distance = phase / TAU * unambiguous_range_m;
    if distance < 0.0 {
        distance += unambiguous_range_m;
    }

    if amplitude < amplitude_threshold {
        (amplitude, f32::NAN)
    } else {
        (amplitude, distance)
    }
}

/// Recovers amplitude and distance maps from raw packets
///
/// Stateless between calls; one instance can serve any number of packets
/// and threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseDemodulator {
    pub amplitude_threshold: f32,
    pub unambiguous_range_m: f32,
}

impl PhaseDemodulator {
    pub fn new(amplitude_threshold: f32, unambiguous_range_m: f32) -> Self {
        Self {
            amplitude_threshold,
            unambiguous_range_m,
        }
    }

    /// Demodulate every pixel of `packet`
    ///
    /// # Errors
    /// `ShapeMismatch` when a channel length differs from `width * height`.
    /// An all-invalid frame is still `Ok`.
    pub fn process(&self, packet: &RawPacket) -> Result<ProcessedFrame, ContractError> {
        packet.validate()?;

        let mut frame = ProcessedFrame::new(packet.width, packet.height);
        if frame.pixel_count() == 0 {
            return Ok(frame);
        }

        let width = packet.width as usize;
        let (threshold, range) = (self.amplitude_threshold, self.unambiguous_range_m);

        // rows are disjoint slices of both output buffers
        frame
            .distance
            .par_chunks_mut(width)
            .zip(frame.amplitude.par_chunks_mut(width))
            .enumerate()
            .for_each(|(row, (distance_row, amplitude_row))| {
                let offset = row * width;
                for col in 0..width {
                    let (amplitude, distance) =
                        demodulate_pixel(packet.pixel(offset + col), threshold, range);
                    amplitude_row[col] = amplitude;
                    distance_row[col] = distance;
                }
            });

        debug!(
            frame_counter = packet.frame_counter,
            valid = frame.valid_pixel_count(),
            invalid = frame.invalid_pixel_count(),
            "frame demodulated"
        );
        Ok(frame)
    }
}

/// Demodulate with explicit settings
pub fn process(
    packet: &RawPacket,
    amplitude_threshold: f32,
    unambiguous_range_m: f32,
) -> Result<ProcessedFrame, ContractError> {
    PhaseDemodulator::new(amplitude_threshold, unambiguous_range_m).process(packet)
}
