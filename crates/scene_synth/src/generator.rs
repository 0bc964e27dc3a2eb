//! RawPacketGenerator - quadrature packets with noise and 16-bit saturation.

use contracts::{RawPacket, SceneParameters};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::{debug, warn};

use crate::phase::{distance_to_phase, quadrature, quantize, wrap_phase};
use crate::scene::SceneSynthesizer;

/// Depth noise is the intensity noise draw scaled to millimeters
const DEPTH_NOISE_SCALE_M: f32 = 0.001;

/// A flat target filling the whole field of view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatTarget {
    pub distance_m: f32,
    pub amplitude: f32,
    pub noise_std: f32,
    pub unambiguous_range_m: f32,
}

impl FlatTarget {
    /// Noise-free target at `distance_m` with a 15 m unambiguous range
    pub fn new(distance_m: f32, amplitude: f32) -> Self {
        Self {
            distance_m,
            amplitude,
            noise_std: 0.0,
            unambiguous_range_m: SceneParameters::default().unambiguous_range_m,
        }
    }
}

/// Synthesizes four-phase raw packets
///
/// The random source is injected; use [`RawPacketGenerator::from_seed`] for
/// reproducible output.
#[derive(Debug, Clone)]
pub struct RawPacketGenerator<R = StdRng> {
    rng: R,
}

impl RawPacketGenerator<StdRng> {
    /// Deterministic generator
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Seeded when `seed` is given, entropy otherwise
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::from_seed)
    }
}

impl<R: Rng> RawPacketGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Render the sphere scene into a raw packet
    ///
    /// Never fails: degenerate geometry renders as background, negative
    /// noise is treated as none.
    pub fn generate(
        &mut self,
        width: u32,
        height: u32,
        scene: &SceneParameters,
        frame_counter: u32,
    ) -> RawPacket {
        let synth = SceneSynthesizer::new(width, height, *scene);
        if !scene.sphere_is_visible() {
            warn!(
                sphere_radius_m = scene.sphere_radius_m,
                sphere_center_z_m = scene.sphere_center_z_m,
                "sphere not in front of camera, frame is background only"
            );
        }

        let noise = gaussian(scene.noise_std);
        let mut packet = RawPacket::new(frame_counter, width, height);
        let mut on_target = 0usize;

        for y in 0..height {
            for x in 0..width {
                let idx = y as usize * width as usize + x as usize;
                let pixel = synth.ideal_pixel(x, y);
                on_target += usize::from(pixel.on_target);
                self.encode_pixel(
                    &mut packet,
                    idx,
                    pixel.distance_m,
                    pixel.amplitude,
                    noise.as_ref(),
                    scene.unambiguous_range_m,
                );
            }
        }

        debug!(
            frame_counter,
            width,
            height,
            on_target,
            "raw packet generated"
        );
        packet
    }

    /// Encode one distance and amplitude into every pixel
    pub fn generate_flat(
        &mut self,
        width: u32,
        height: u32,
        target: &FlatTarget,
        frame_counter: u32,
    ) -> RawPacket {
        let noise = gaussian(target.noise_std);
        let amplitude = target.amplitude.max(0.0);
        let mut packet = RawPacket::new(frame_counter, width, height);

        for idx in 0..packet.pixel_count() {
            self.encode_pixel(
                &mut packet,
                idx,
                target.distance_m,
                amplitude,
                noise.as_ref(),
                target.unambiguous_range_m,
            );
        }

        debug!(
            frame_counter,
            width,
            height,
            distance_m = target.distance_m,
            "flat raw packet generated"
        );
        packet
    }

    /// Depth noise, phase encoding, per-sample noise, saturation
    fn encode_pixel(
        &mut self,
        packet: &mut RawPacket,
        idx: usize,
        distance_m: f32,
        amplitude: f32,
        noise: Option<&Normal<f32>>,
        unambiguous_range_m: f32,
    ) {
        let mut draw = || noise.map_or(0.0, |n| n.sample(&mut self.rng));

        let distance_m = distance_m + draw() * DEPTH_NOISE_SCALE_M;
        let phase = wrap_phase(distance_to_phase(distance_m, unambiguous_range_m));
        let [i0, i90, i180, i270] = quadrature(amplitude, phase);

        packet.i0[idx] = quantize(i0 + draw());
        packet.i90[idx] = quantize(i90 + draw());
        packet.i180[idx] = quantize(i180 + draw());
        packet.i270[idx] = quantize(i270 + draw());
    }
}

/// Zero-mean Gaussian, `None` when `std_dev` is not a positive finite number
fn gaussian(std_dev: f32) -> Option<Normal<f32>> {
    if std_dev.is_finite() && std_dev > 0.0 {
        Normal::new(0.0, std_dev).ok()
    } else {
        None
    }
}
