//! Configuration validation
//!
//! Rules:
//! - width > 0, height > 0
//! - frame_rate_hz > 0, finite and at most [`MAX_FRAME_RATE_HZ`]
//! - unambiguous_range_m > 0
//! - amplitude_threshold >= 0
//! - background_amplitude_fraction in [0, 1]
//! - noise model coefficients >= 0
//! - characterization sweep non-empty with positive counts
//!
//! Scene physics (negative noise, sphere enclosing the camera) is never an
//! error; [`scene_warnings`] reports it instead.

use contracts::{ContractError, SimulationBlueprint};

/// Highest frame rate whose period is still at least one nanosecond
pub const MAX_FRAME_RATE_HZ: f64 = 1.0e9;

/// Validate a SimulationBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &SimulationBlueprint) -> Result<(), ContractError> {
    validate_sensor(blueprint)?;
    validate_scene(blueprint)?;
    validate_processing(blueprint)?;
    validate_noise_model(blueprint)?;
    validate_characterization(blueprint)?;
    Ok(())
}

/// Non-fatal scene issues that route pixels to the background case
pub fn scene_warnings(blueprint: &SimulationBlueprint) -> Vec<String> {
    let scene = &blueprint.scene;
    let mut warnings = Vec::new();

    if !scene.sphere_is_visible() {
        warnings.push(format!(
            "sphere (radius {} m, center {} m) is not in front of the camera - every pixel renders as background",
            scene.sphere_radius_m, scene.sphere_center_z_m
        ));
    }
    if scene.noise_std < 0.0 {
        warnings.push(format!(
            "scene.noise_std is negative ({}) - treated as noise-free",
            scene.noise_std
        ));
    }
    if scene.amplitude < 0.0 {
        warnings.push(format!(
            "scene.amplitude is negative ({}) - clamped to 0",
            scene.amplitude
        ));
    }
    if scene.background_depth_m() >= scene.unambiguous_range_m {
        warnings.push(format!(
            "background at {} m lies beyond the unambiguous range ({} m) and will alias",
            scene.background_depth_m(),
            scene.unambiguous_range_m
        ));
    }
    if blueprint.scene.amplitude / 2.0 < blueprint.processing.amplitude_threshold {
        warnings.push(format!(
            "target amplitude {} yields demodulated amplitude below threshold {} - target pixels will be invalid",
            scene.amplitude, blueprint.processing.amplitude_threshold
        ));
    }

    warnings
}

fn validate_sensor(blueprint: &SimulationBlueprint) -> Result<(), ContractError> {
    let sensor = &blueprint.sensor;
    if sensor.width == 0 {
        return Err(ContractError::config_validation(
            "sensor.width",
            "width must be > 0",
        ));
    }
    if sensor.height == 0 {
        return Err(ContractError::config_validation(
            "sensor.height",
            "height must be > 0",
        ));
    }
    if !(sensor.frame_rate_hz.is_finite() && sensor.frame_rate_hz > 0.0) {
        return Err(ContractError::config_validation(
            "sensor.frame_rate_hz",
            format!("frame_rate_hz must be > 0, got {}", sensor.frame_rate_hz),
        ));
    }
    if sensor.frame_rate_hz > MAX_FRAME_RATE_HZ {
        return Err(ContractError::config_validation(
            "sensor.frame_rate_hz",
            format!(
                "frame_rate_hz must be <= {MAX_FRAME_RATE_HZ:e}, got {}",
                sensor.frame_rate_hz
            ),
        ));
    }
    Ok(())
}

fn validate_scene(blueprint: &SimulationBlueprint) -> Result<(), ContractError> {
    let scene = &blueprint.scene;
    if !(scene.unambiguous_range_m.is_finite() && scene.unambiguous_range_m > 0.0) {
        return Err(ContractError::config_validation(
            "scene.unambiguous_range_m",
            format!(
                "unambiguous_range_m must be > 0, got {}",
                scene.unambiguous_range_m
            ),
        ));
    }
    if !(0.0..=1.0).contains(&scene.background_amplitude_fraction) {
        return Err(ContractError::config_validation(
            "scene.background_amplitude_fraction",
            format!(
                "background_amplitude_fraction must be within [0, 1], got {}",
                scene.background_amplitude_fraction
            ),
        ));
    }
    Ok(())
}

fn validate_processing(blueprint: &SimulationBlueprint) -> Result<(), ContractError> {
    let threshold = blueprint.processing.amplitude_threshold;
    if threshold.is_nan() || threshold < 0.0 {
        return Err(ContractError::config_validation(
            "processing.amplitude_threshold",
            format!("amplitude_threshold must be >= 0, got {threshold}"),
        ));
    }
    Ok(())
}

fn validate_noise_model(blueprint: &SimulationBlueprint) -> Result<(), ContractError> {
    let model = &blueprint.noise_model;
    for (field, value) in [("noise_model.a", model.a), ("noise_model.b", model.b)] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(ContractError::config_validation(
                field,
                format!("coefficient must be >= 0, got {value}"),
            ));
        }
    }
    Ok(())
}

fn validate_characterization(blueprint: &SimulationBlueprint) -> Result<(), ContractError> {
    let sweep = &blueprint.characterization;
    if sweep.distances_m.is_empty() {
        return Err(ContractError::config_validation(
            "characterization.distances_m",
            "at least one distance is required",
        ));
    }
    for (idx, d) in sweep.distances_m.iter().enumerate() {
        if !(d.is_finite() && *d >= 0.0) {
            return Err(ContractError::config_validation(
                format!("characterization.distances_m[{idx}]"),
                format!("distance must be finite and >= 0, got {d}"),
            ));
        }
    }
    if sweep.samples_per_distance == 0 {
        return Err(ContractError::config_validation(
            "characterization.samples_per_distance",
            "samples_per_distance must be > 0",
        ));
    }
    if sweep.pixels_per_sample == 0 {
        return Err(ContractError::config_validation(
            "characterization.pixels_per_sample",
            "pixels_per_sample must be > 0",
        ));
    }
    Ok(())
}
