//! SceneSynthesizer - ideal per-pixel distance and amplitude.

use contracts::{CameraIntrinsics, SceneParameters};
use nalgebra::Vector3;

/// Noise-free observation of one pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdealPixel {
    /// Distance from the camera origin (m)
    pub distance_m: f32,

    /// Modulated amplitude (raw counts)
    pub amplitude: f32,

    /// Whether the pixel ray hit the sphere
    pub on_target: bool,
}

/// Projects a pinhole pixel grid onto the sphere-plus-background scene
#[derive(Debug, Clone)]
pub struct SceneSynthesizer {
    intrinsics: CameraIntrinsics,
    scene: SceneParameters,
}

impl SceneSynthesizer {
    pub fn new(width: u32, height: u32, scene: SceneParameters) -> Self {
        Self {
            intrinsics: CameraIntrinsics::for_resolution(width, height),
            scene,
        }
    }

    /// Ideal observation of pixel `(x, y)`
    ///
    /// Rays that miss the sphere see the background plane at
    /// `center_z + radius` with the background amplitude fraction applied.
    pub fn ideal_pixel(&self, x: u32, y: u32) -> IdealPixel {
        let (px, py) = self.intrinsics.normalize(x, y);

        match self.intersect_sphere(px, py) {
            Some(distance_m) => IdealPixel {
                distance_m,
                amplitude: self.scene.amplitude.max(0.0),
                on_target: true,
            },
            None => IdealPixel {
                distance_m: self.scene.background_depth_m(),
                amplitude: self.scene.background_amplitude(),
                on_target: false,
            },
        }
    }

    /// Nearest positive hit distance along the ray through `(px, py, 1)`
    fn intersect_sphere(&self, px: f32, py: f32) -> Option<f32> {
        if !self.scene.sphere_is_visible() {
            return None;
        }

        let dir = Vector3::new(px, py, 1.0).normalize();
        let center = Vector3::new(0.0, 0.0, self.scene.sphere_center_z_m);
        let radius = self.scene.sphere_radius_m;

        // |t·dir - center|² = r²  with |dir| = 1
        let b = dir.dot(&center);
        let c = center.norm_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant <= 0.0 {
            return None;
        }

        let t = b - discriminant.sqrt();
        (t > 0.0).then_some(t)
    }
}
