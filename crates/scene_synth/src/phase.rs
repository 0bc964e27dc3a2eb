//! Phase-domain encoding of a distance into four quadrature samples.

use std::f32::consts::{FRAC_PI_2, TAU};

/// Beyond this magnitude the iterative wrap is seeded with `rem_euclid`,
/// otherwise a single `±2π` step would be lost to f32 rounding.
const MAX_ITERATIVE_PHASE: f32 = 1024.0 * TAU;

/// Largest storable sample
pub const SAMPLE_MAX: f32 = u16::MAX as f32;

/// Phase of a distance, one period per unambiguous range (not wrapped)
pub fn distance_to_phase(distance_m: f32, unambiguous_range_m: f32) -> f32 {
    (distance_m / unambiguous_range_m) * TAU
}

/// Wrap a phase into `[0, 2π)` by repeated `±2π` steps
///
/// Non-finite phases map to 0.
pub fn wrap_phase(phase: f32) -> f32 {
    if !phase.is_finite() {
        return 0.0;
    }
    let mut phase = if phase.abs() > MAX_ITERATIVE_PHASE {
        phase.rem_euclid(TAU)
    } else {
        phase
    };
    loop {
        if phase < 0.0 {
            phase += TAU;
        } else if phase >= TAU {
            phase -= TAU;
        } else {
            return phase;
        }
    }
}

/// Ideal intensities `A/2·cos(φ − k·π/2) + A/2` for k = 0..3
pub fn quadrature(amplitude: f32, phase: f32) -> [f32; 4] {
    let half = amplitude / 2.0;
    std::array::from_fn(|k| half * (phase - k as f32 * FRAC_PI_2).cos() + half)
}

/// Clamp to `[0, 65535]` and round to the nearest storable sample
pub fn quantize(intensity: f32) -> u16 {
    // NaN survives the clamp and casts to 0
    intensity.clamp(0.0, SAMPLE_MAX).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_phase_inside_range_is_identity() {
        assert_eq!(wrap_phase(0.0), 0.0);
        assert_eq!(wrap_phase(1.25), 1.25);
    }

    #[test]
    fn test_wrap_phase_negative() {
        let wrapped = wrap_phase(-0.5);
        assert!((wrapped - (TAU - 0.5)).abs() < 1e-5);
    }

    #[test]
    fn test_wrap_phase_full_period_maps_to_zero() {
        assert_eq!(wrap_phase(TAU), 0.0);
        assert_eq!(wrap_phase(-TAU), 0.0);
    }

    #[test]
    fn test_wrap_phase_multiple_periods() {
        let wrapped = wrap_phase(3.0 * TAU + 1.0);
        assert!((wrapped - 1.0).abs() < 1e-4);
        let wrapped = wrap_phase(-5.0 * TAU + 2.0);
        assert!((wrapped - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_phase_huge_and_non_finite() {
        let wrapped = wrap_phase(1.0e9);
        assert!((0.0..TAU).contains(&wrapped));
        assert_eq!(wrap_phase(f32::NAN), 0.0);
        assert_eq!(wrap_phase(f32::INFINITY), 0.0);
    }

    #[test]
    fn test_tiny_negative_phase_lands_in_range() {
        let wrapped = wrap_phase(-1.0e-9);
        assert!((0.0..TAU).contains(&wrapped), "got {wrapped}");
    }

    #[test]
    fn test_quadrature_at_zero_phase() {
        let [i0, i90, i180, i270] = quadrature(2000.0, 0.0);
        assert!((i0 - 2000.0).abs() < 1e-3);
        assert!((i90 - 1000.0).abs() < 1e-3);
        assert!(i180.abs() < 1e-3);
        assert!((i270 - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn test_distance_to_phase() {
        assert!((distance_to_phase(7.5, 15.0) - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_quantize_clamps_and_rounds() {
        assert_eq!(quantize(70_000.0), 65535);
        assert_eq!(quantize(-5.0), 0);
        assert_eq!(quantize(12.6), 13);
        assert_eq!(quantize(f32::NAN), 0);
        assert_eq!(quantize(f32::INFINITY), 65535);
    }
}
