use foundation::math::Vec3;

use crate::picking::Ray;

/// Perspective camera used to turn pointer positions into pick rays.
///
/// Mirrors the host renderer's camera; it never produces draw matrices.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 300.0),
            target: Vec3::ZERO,
            up: Vec3::new(0.0, 1.0, 0.0),
            fov_y_deg: 75.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Output surface size in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Pixel coordinates (origin top-left, y down) to NDC in `[-1, 1]`.
    pub fn to_ndc(&self, x_px: f64, y_px: f64) -> [f64; 2] {
        [
            (x_px / self.width) * 2.0 - 1.0,
            1.0 - (y_px / self.height) * 2.0,
        ]
    }
}

impl PerspectiveCamera {
    pub fn looking_at_origin(distance: f64) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, distance),
            ..Self::default()
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
    }

    pub fn distance(&self) -> f64 {
        (self.position - self.target).length()
    }

    /// Dolly along the current line of sight; the target stays put.
    pub fn set_distance(&mut self, distance: f64) {
        if let Some(dir) = (self.position - self.target).normalized() {
            self.position = self.target + dir * distance;
        }
    }

    /// Ray from the eye through `ndc`, or `None` for a degenerate camera.
    pub fn ray_from_ndc(&self, ndc: [f64; 2]) -> Option<Ray> {
        let forward = (self.target - self.position).normalized()?;
        let right = forward.cross(self.up).normalized()?;
        let up = right.cross(forward);

        let tan_half = (0.5 * self.fov_y_deg.to_radians()).tan();
        let dir = forward + right * (ndc[0] * tan_half * self.aspect) + up * (ndc[1] * tan_half);
        Some(Ray::new(self.position, dir.normalized()?))
    }
}
