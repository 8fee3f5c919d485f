//! Event-driven globe session: shapes, hover highlighting and spin in one
//! place, independent of the browser so it can be driven from tests.

use formats::{CountryCollection, GeoJsonError};
use foundation::math::Vec3;
use interaction::{
    HighlightController, HighlightState, HighlightTransition, PointerHitTester, SpinController,
    hit_lat_lon,
};
use layers::{BoundaryMode, CountryRegistry, LabelOverlay};
use scene::components::BoundaryShape;
use scene::entity::ShapeId;
use scene::{ColorCommand, World};
use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, GlobeConfig};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    GeoJson(#[from] GeoJsonError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Flattened geometry handed to the host renderer for one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeGeometry {
    /// `x, y, z` per vertex in the globe frame.
    pub positions: Vec<f64>,
    /// Segment pairs for outlines, triangle triples for filled patches.
    pub indices: Vec<u32>,
}

/// Country and geographic position under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct PickReport {
    pub country: String,
    pub lat_deg: f64,
    pub lon_deg: f64,
}

pub struct GlobeApp<L> {
    world: World,
    registry: CountryRegistry,
    mode: BoundaryMode,
    hover: PointerHitTester,
    highlight: HighlightController,
    spin: SpinController,
    label: L,
}

impl<L: LabelOverlay> GlobeApp<L> {
    pub fn new(
        collection: &CountryCollection,
        config: &GlobeConfig,
        label: L,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let style = config.country_style()?;
        let opts = config.boundary_options();
        let (min_distance, max_distance) = config.distance_limits();
        let hover = PointerHitTester::new(config.camera(), config.viewport(), config.pick_options())
            .with_distance_limits(min_distance, max_distance);

        let mut world = World::new();
        let registry = CountryRegistry::build(collection, &opts, &style, &mut world);

        Ok(Self {
            world,
            registry,
            mode: opts.mode,
            hover,
            highlight: HighlightController::new(style, config.highlight_options()),
            spin: SpinController::new(config.spin_options()),
            label,
        })
    }

    pub fn from_geojson(geojson: &str, config: &GlobeConfig, label: L) -> Result<Self, AppError> {
        let collection = CountryCollection::from_geojson_str(geojson)?;
        info!(
            features = collection.len(),
            skipped = collection.skipped.len(),
            "country dataset loaded"
        );
        Ok(Self::new(&collection, config, label)?)
    }

    /// Drag update first, then hover under the new rotation.
    pub fn pointer_move(&mut self, x_px: f64, y_px: f64) -> HighlightTransition {
        self.spin.on_pointer_move(x_px);

        let country = self
            .hover
            .hit_test(
                &self.world,
                self.registry.all_shapes(),
                x_px,
                y_px,
                self.spin.rotation(),
            )
            .and_then(|hit| self.world.country(hit.shape))
            .map(str::to_owned);

        self.highlight.on_pointer(
            country.as_deref(),
            [x_px, y_px],
            &self.registry,
            &mut self.world,
            &mut self.label,
        )
    }

    /// Read-only pick; highlight and label are untouched.
    pub fn pick_at(&self, x_px: f64, y_px: f64) -> Option<PickReport> {
        let hit = self.hover.hit_test(
            &self.world,
            self.registry.all_shapes(),
            x_px,
            y_px,
            self.spin.rotation(),
        )?;
        let country = self.world.country(hit.shape)?.to_string();
        let (lat_deg, lon_deg) = hit_lat_lon(&hit)?;
        Some(PickReport {
            country,
            lat_deg,
            lon_deg,
        })
    }

    pub fn pointer_down(&mut self, x_px: f64, _y_px: f64) {
        self.spin.on_pointer_down(x_px);
    }

    pub fn pointer_up(&mut self) {
        self.spin.on_pointer_up();
    }

    /// Ends any drag and clears the highlight and label.
    pub fn pointer_leave(&mut self) -> HighlightTransition {
        self.spin.on_pointer_leave();
        self.highlight.on_pointer(
            None,
            [0.0, 0.0],
            &self.registry,
            &mut self.world,
            &mut self.label,
        )
    }

    pub fn resize(&mut self, width_px: f64, height_px: f64) {
        self.hover.resize(width_px, height_px);
    }

    /// Mirrors a host zoom; returns the clamped distance in use.
    pub fn set_camera_distance(&mut self, distance: f64) -> f64 {
        self.hover.set_camera_distance(distance)
    }

    /// Mirrors a host orbit; returns the clamped distance in use.
    pub fn set_camera_position(&mut self, position: Vec3) -> f64 {
        self.hover.set_camera_position(position)
    }

    /// One render frame; returns the globe rotation to draw with.
    pub fn advance_frame(&mut self) -> f64 {
        self.spin.tick();
        self.spin.rotation()
    }

    pub fn take_color_updates(&mut self) -> Vec<ColorCommand> {
        self.world.drain_color_commands()
    }

    pub fn rotation(&self) -> f64 {
        self.spin.rotation()
    }

    pub fn mode(&self) -> BoundaryMode {
        self.mode
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn registry(&self) -> &CountryRegistry {
        &self.registry
    }

    pub fn highlight_state(&self) -> &HighlightState {
        self.highlight.state()
    }

    pub fn highlighted_country(&self) -> Option<&str> {
        self.highlight.highlighted()
    }

    pub fn label(&self) -> &L {
        &self.label
    }

    pub fn shape_geometry(&self, id: ShapeId) -> Option<ShapeGeometry> {
        let shape = self.world.shape(id)?;
        let positions = shape
            .positions()
            .into_iter()
            .flat_map(|p| p.as_array())
            .collect();
        let indices = match shape {
            BoundaryShape::Outline { points } => {
                let n = points.len() as u32;
                (0..n).flat_map(|i| [i, (i + 1) % n]).collect()
            }
            BoundaryShape::Filled { triangles, .. } => triangles.iter().flatten().copied().collect(),
        };
        Some(ShapeGeometry { positions, indices })
    }
}
