use crate::components::{BoundaryShape, Color, ShapeBounds};
use crate::entity::ShapeId;

/// Render-state command target for boundary shapes.
///
/// Controllers mutate shape appearance only through this trait; the host
/// renderer mirrors the resulting commands onto its own materials.
pub trait ShapeRenderState {
    fn set_shape_color(&mut self, shape: ShapeId, color: Color);
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorCommand {
    pub shape: ShapeId,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
struct ShapeRecord {
    shape: BoundaryShape,
    country: String,
    bounds: Option<ShapeBounds>,
    color: Color,
}

/// Flat store of every boundary shape in the globe frame.
///
/// Shapes are append-only; only their color changes after insertion.
#[derive(Debug, Default)]
pub struct World {
    shapes: Vec<ShapeRecord>,
    pending: Vec<ColorCommand>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_shape(
        &mut self,
        shape: BoundaryShape,
        country: impl Into<String>,
        color: Color,
    ) -> ShapeId {
        let id = ShapeId::new(self.shapes.len() as u32);
        let bounds = shape.bounds();
        self.shapes.push(ShapeRecord {
            shape,
            country: country.into(),
            bounds,
            color,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&BoundaryShape> {
        self.record(id).map(|r| &r.shape)
    }

    /// Country tag assigned at creation.
    pub fn country(&self, id: ShapeId) -> Option<&str> {
        self.record(id).map(|r| r.country.as_str())
    }

    pub fn bounds(&self, id: ShapeId) -> Option<ShapeBounds> {
        self.record(id).and_then(|r| r.bounds)
    }

    pub fn color(&self, id: ShapeId) -> Option<Color> {
        self.record(id).map(|r| r.color)
    }

    /// All shape ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        (0..self.shapes.len() as u32).map(ShapeId::new)
    }

    /// Color commands issued since the last drain, in issue order.
    pub fn drain_color_commands(&mut self) -> Vec<ColorCommand> {
        std::mem::take(&mut self.pending)
    }

    fn record(&self, id: ShapeId) -> Option<&ShapeRecord> {
        self.shapes.get(id.index() as usize)
    }
}

impl ShapeRenderState for World {
    fn set_shape_color(&mut self, shape: ShapeId, color: Color) {
        let Some(record) = self.shapes.get_mut(shape.index() as usize) else {
            return;
        };
        if record.color == color {
            return;
        }
        record.color = color;
        self.pending.push(ColorCommand { shape, color });
    }
}
