use foundation::math::{Vec3, vec3_to_lat_lon};
use scene::World;
use scene::camera::{PerspectiveCamera, Viewport};
use scene::entity::ShapeId;
use scene::picking::{PickHit, PickOptions, Ray, pick_screen};
use tracing::debug;

/// Turns pointer positions into picks against the spinning globe.
///
/// The camera mirrors the host's: aspect through [`resize`](Self::resize),
/// zoom and orbit through the `set_camera_*` methods.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerHitTester {
    camera: PerspectiveCamera,
    viewport: Viewport,
    pick: PickOptions,
    min_distance: f64,
    max_distance: f64,
}

impl PointerHitTester {
    pub fn new(mut camera: PerspectiveCamera, viewport: Viewport, pick: PickOptions) -> Self {
        camera.set_viewport(viewport);
        Self {
            camera,
            viewport,
            pick,
            min_distance: 0.0,
            max_distance: f64::INFINITY,
        }
    }

    /// Bounds every later camera distance to `[min, max]`; the current
    /// camera is pulled into range.
    pub fn with_distance_limits(mut self, min: f64, max: f64) -> Self {
        self.min_distance = min;
        self.max_distance = max.max(min);
        self.set_camera_distance(self.camera.distance());
        self
    }

    /// Follows a host zoom. Returns the distance actually applied.
    pub fn set_camera_distance(&mut self, distance: f64) -> f64 {
        if distance.is_finite() {
            let clamped = distance.clamp(self.min_distance, self.max_distance);
            self.camera.set_distance(clamped);
            debug!(requested = distance, applied = clamped, "camera distance");
        }
        self.camera.distance()
    }

    /// Follows a host orbit: the eye moves to `position`, still looking at
    /// the target, with its distance clamped. Returns the applied distance.
    pub fn set_camera_position(&mut self, position: Vec3) -> f64 {
        let finite = position.as_array().iter().all(|v| v.is_finite());
        if finite && (position - self.camera.target).normalized().is_some() {
            self.camera.position = position;
        }
        self.set_camera_distance(self.camera.distance())
    }

    /// Only the projection aspect and pixel mapping change.
    pub fn resize(&mut self, width_px: f64, height_px: f64) {
        self.viewport = Viewport::new(width_px, height_px);
        self.camera.set_viewport(self.viewport);
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Pick ray in the globe's local frame, given the globe's spin about +Y.
    pub fn ray_at(&self, x_px: f64, y_px: f64, globe_rotation: f64) -> Option<Ray> {
        let ndc = self.viewport.to_ndc(x_px, y_px);
        let ray = self.camera.ray_from_ndc(ndc)?;
        Some(ray.rotated_y(-globe_rotation))
    }

    /// Nearest of `shapes` under the pointer.
    pub fn hit_test(
        &self,
        world: &World,
        shapes: &[ShapeId],
        x_px: f64,
        y_px: f64,
        globe_rotation: f64,
    ) -> Option<PickHit> {
        pick_screen(
            world,
            shapes.iter().copied(),
            x_px,
            y_px,
            |x, y| self.ray_at(x, y, globe_rotation),
            self.pick,
        )
    }
}

/// `(lat_deg, lon_deg)` of a hit point. Filled patches are flat, so their
/// hits map to the direction of the point rather than the exact border.
pub fn hit_lat_lon(hit: &PickHit) -> Option<(f64, f64)> {
    vec3_to_lat_lon(hit.point)
}
