use interaction::{HighlightOptions, SpinOptions};
use layers::{BoundaryMode, BoundaryOptions, CountryStyle};
use scene::camera::{PerspectiveCamera, Viewport};
use scene::components::{Color, FlatPlacement};
use scene::picking::PickOptions;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid color for {field}: {value:?}")]
    InvalidColor { field: &'static str, value: String },
    #[error("invalid {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

/// Page-level settings passed to `init` as JSON. Every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub radius: f64,
    pub camera: CameraConfig,
    pub viewport: ViewportConfig,
    pub boundary: BoundaryConfig,
    pub pick: PickConfig,
    pub colors: ColorConfig,
    pub label: LabelConfig,
    pub spin: SpinConfig,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            camera: CameraConfig::default(),
            viewport: ViewportConfig::default(),
            boundary: BoundaryConfig::default(),
            pick: PickConfig::default(),
            colors: ColorConfig::default(),
            label: LabelConfig::default(),
            spin: SpinConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f64,
    /// Zoom limits applied to host camera syncs.
    pub min_distance: f64,
    pub max_distance: f64,
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let cam = PerspectiveCamera::default();
        Self {
            distance: cam.position.z,
            min_distance: 150.0,
            max_distance: 600.0,
            fov_y_deg: cam.fov_y_deg,
            near: cam.near,
            far: cam.far,
        }
    }
}

/// Size used until the host's first `resize`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryModeSetting {
    #[default]
    Outline,
    Filled,
}

impl From<BoundaryModeSetting> for BoundaryMode {
    fn from(v: BoundaryModeSetting) -> Self {
        match v {
            BoundaryModeSetting::Outline => BoundaryMode::Outline,
            BoundaryModeSetting::Filled => BoundaryMode::Filled,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    pub mode: BoundaryModeSetting,
    /// Degrees to scene units for filled patches; `radius / 90` when unset.
    pub flat_scale: Option<f64>,
    /// Z offset of filled patches; `radius` when unset.
    pub flat_depth: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PickConfig {
    pub line_threshold: f64,
    pub occlusion: bool,
    pub occlusion_slack: f64,
}

impl Default for PickConfig {
    fn default() -> Self {
        let pick = PickOptions::default();
        Self {
            line_threshold: pick.line_threshold,
            occlusion: true,
            occlusion_slack: pick.occlusion_slack,
        }
    }
}

/// Hex colors. Alpha comes from the boundary mode.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub default: Option<String>,
    pub highlight: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub element_id: String,
    pub offset_px: [f64; 2],
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            element_id: "globe-label".to_string(),
            offset_px: HighlightOptions::default().label_offset_px,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    pub sensitivity: f64,
    pub damping: f64,
    pub rest_threshold: f64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        let spin = SpinOptions::default();
        Self {
            sensitivity: spin.sensitivity,
            damping: spin.damping,
            rest_threshold: spin.rest_threshold,
        }
    }
}

impl GlobeConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |field: &'static str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be finite and positive",
                })
            }
        };
        positive("radius", self.radius)?;
        positive("camera.distance", self.camera.distance)?;
        positive("camera.min_distance", self.camera.min_distance)?;
        positive("camera.max_distance", self.camera.max_distance)?;
        positive("camera.near", self.camera.near)?;
        positive("pick.line_threshold", self.pick.line_threshold)?;
        positive("spin.sensitivity", self.spin.sensitivity)?;
        if let Some(scale) = self.boundary.flat_scale {
            positive("boundary.flat_scale", scale)?;
        }
        if let Some(depth) = self.boundary.flat_depth
            && !depth.is_finite()
        {
            return Err(ConfigError::InvalidValue {
                field: "boundary.flat_depth",
                reason: "must be finite",
            });
        }
        if !(self.pick.occlusion_slack.is_finite() && self.pick.occlusion_slack >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "pick.occlusion_slack",
                reason: "must be finite and non-negative",
            });
        }
        if self.camera.min_distance > self.camera.max_distance {
            return Err(ConfigError::InvalidValue {
                field: "camera.max_distance",
                reason: "must not be below camera.min_distance",
            });
        }
        if !(self.camera.min_distance..=self.camera.max_distance).contains(&self.camera.distance) {
            return Err(ConfigError::InvalidValue {
                field: "camera.distance",
                reason: "must lie between camera.min_distance and camera.max_distance",
            });
        }

        if !(self.camera.fov_y_deg > 0.0 && self.camera.fov_y_deg < 180.0) {
            return Err(ConfigError::InvalidValue {
                field: "camera.fov_y_deg",
                reason: "must be in (0, 180)",
            });
        }
        if !(self.camera.far > self.camera.near) {
            return Err(ConfigError::InvalidValue {
                field: "camera.far",
                reason: "must exceed camera.near",
            });
        }
        if !(self.spin.damping >= 0.0 && self.spin.damping < 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "spin.damping",
                reason: "must be in [0, 1)",
            });
        }
        if self.label.element_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "label.element_id",
                reason: "must not be empty",
            });
        }
        self.country_style().map(|_| ())
    }

    pub fn boundary_mode(&self) -> BoundaryMode {
        self.boundary.mode.into()
    }

    pub fn boundary_options(&self) -> BoundaryOptions {
        let mut opts = BoundaryOptions::new(self.boundary_mode(), self.radius);
        opts.placement = FlatPlacement::new(
            self.boundary.flat_scale.unwrap_or(opts.placement.scale),
            self.boundary.flat_depth.unwrap_or(opts.placement.depth),
        );
        opts
    }

    pub fn camera(&self) -> PerspectiveCamera {
        PerspectiveCamera {
            fov_y_deg: self.camera.fov_y_deg,
            near: self.camera.near,
            far: self.camera.far,
            ..PerspectiveCamera::looking_at_origin(self.camera.distance)
        }
    }

    pub fn distance_limits(&self) -> (f64, f64) {
        (self.camera.min_distance, self.camera.max_distance)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport.width, self.viewport.height)
    }

    pub fn pick_options(&self) -> PickOptions {
        PickOptions {
            line_threshold: self.pick.line_threshold,
            occluder_radius: self.pick.occlusion.then_some(self.radius),
            occlusion_slack: self.pick.occlusion_slack,
            ..PickOptions::default()
        }
    }

    /// Mode defaults with any configured RGB swapped in.
    pub fn country_style(&self) -> Result<CountryStyle, ConfigError> {
        let base = CountryStyle::for_mode(self.boundary_mode());
        let default_color = override_rgb("colors.default", &self.colors.default, base.default_color)?;
        let highlight_color =
            override_rgb("colors.highlight", &self.colors.highlight, base.highlight_color)?;
        Ok(CountryStyle::new(default_color, highlight_color))
    }

    pub fn highlight_options(&self) -> HighlightOptions {
        HighlightOptions {
            label_offset_px: self.label.offset_px,
        }
    }

    pub fn spin_options(&self) -> SpinOptions {
        SpinOptions {
            sensitivity: self.spin.sensitivity,
            damping: self.spin.damping,
            rest_threshold: self.spin.rest_threshold,
        }
    }
}

fn override_rgb(
    field: &'static str,
    value: &Option<String>,
    base: Color,
) -> Result<Color, ConfigError> {
    let Some(value) = value else {
        return Ok(base);
    };
    Color::parse_hex(value)
        .map(|c| c.with_alpha(base.rgba()[3]))
        .ok_or_else(|| ConfigError::InvalidColor {
            field,
            value: value.clone(),
        })
}
