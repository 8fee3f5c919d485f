use tracing::trace;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpinOptions {
    /// Radians of rotation per pixel of horizontal drag.
    pub sensitivity: f64,
    /// Per-frame velocity multiplier once released, in `[0, 1)`.
    pub damping: f64,
    /// Velocity magnitude below which the globe is at rest.
    pub rest_threshold: f64,
}

impl Default for SpinOptions {
    fn default() -> Self {
        Self {
            sensitivity: 0.005,
            damping: 0.95,
            rest_threshold: 1.0e-6,
        }
    }
}

/// Horizontal-drag spin about the globe's Y axis with inertia.
///
/// While dragging the rotation follows the pointer and the last delta becomes
/// the velocity. After release, each [`SpinController::tick`] adds the
/// velocity to the rotation and then decays it, so the total remaining spin
/// approaches `v / (1 - damping)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinController {
    opts: SpinOptions,
    dragging: bool,
    last_x: f64,
    velocity: f64,
    rotation: f64,
}

impl SpinController {
    pub fn new(opts: SpinOptions) -> Self {
        let opts = SpinOptions {
            damping: opts.damping.clamp(0.0, 0.999_999),
            rest_threshold: opts.rest_threshold.abs(),
            ..opts
        };
        Self {
            opts,
            dragging: false,
            last_x: 0.0,
            velocity: 0.0,
            rotation: 0.0,
        }
    }

    pub fn options(&self) -> &SpinOptions {
        &self.opts
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn on_pointer_down(&mut self, x_px: f64) {
        self.dragging = true;
        self.last_x = x_px;
        self.velocity = 0.0;
    }

    /// Returns whether the move was consumed as a drag.
    pub fn on_pointer_move(&mut self, x_px: f64) -> bool {
        if !self.dragging {
            return false;
        }
        let delta = x_px - self.last_x;
        self.last_x = x_px;
        self.velocity = delta * self.opts.sensitivity;
        self.rotation += self.velocity;
        true
    }

    pub fn on_pointer_up(&mut self) {
        self.dragging = false;
    }

    pub fn on_pointer_leave(&mut self) {
        self.dragging = false;
    }

    /// Advances one frame and returns the rotation applied.
    pub fn tick(&mut self) -> f64 {
        if self.dragging {
            return 0.0;
        }
        if self.velocity.abs() < self.opts.rest_threshold {
            self.velocity = 0.0;
            return 0.0;
        }

        let step = self.velocity;
        self.rotation += step;
        self.velocity *= self.opts.damping;
        trace!(step, rotation = self.rotation, "spin tick");
        step
    }
}

impl Default for SpinController {
    fn default() -> Self {
        Self::new(SpinOptions::default())
    }
}
