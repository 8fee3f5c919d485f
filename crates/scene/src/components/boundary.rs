use foundation::math::{Vec2, Vec3};

use super::ShapeBounds;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    Outline,
    Filled,
}

/// Positions a flat (lon, lat) patch in the globe frame:
/// `(lon * scale, lat * scale, depth)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlatPlacement {
    pub scale: f64,
    pub depth: f64,
}

impl FlatPlacement {
    pub fn new(scale: f64, depth: f64) -> Self {
        Self { scale, depth }
    }

    pub fn place(&self, lon_lat: Vec2) -> Vec3 {
        Vec3::new(lon_lat.x * self.scale, lon_lat.y * self.scale, self.depth)
    }
}

/// Renderable outline or patch for one polygon ring.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryShape {
    /// Line loop on the sphere; the closing segment back to `points[0]` is implicit.
    Outline { points: Vec<Vec3> },
    /// Flat patch in raw (lon, lat) space, triangulated.
    Filled {
        vertices: Vec<Vec2>,
        triangles: Vec<[u32; 3]>,
        placement: FlatPlacement,
    },
}

impl BoundaryShape {
    pub fn kind(&self) -> BoundaryKind {
        match self {
            BoundaryShape::Outline { .. } => BoundaryKind::Outline,
            BoundaryShape::Filled { .. } => BoundaryKind::Filled,
        }
    }

    pub fn vertex_count(&self) -> usize {
        match self {
            BoundaryShape::Outline { points } => points.len(),
            BoundaryShape::Filled { vertices, .. } => vertices.len(),
        }
    }

    /// Vertex positions in the globe frame.
    pub fn positions(&self) -> Vec<Vec3> {
        match self {
            BoundaryShape::Outline { points } => points.clone(),
            BoundaryShape::Filled {
                vertices,
                placement,
                ..
            } => vertices.iter().map(|v| placement.place(*v)).collect(),
        }
    }

    /// Line segments of the closed loop, including the closing one.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let points: &[Vec3] = match self {
            BoundaryShape::Outline { points } => points,
            BoundaryShape::Filled { .. } => &[],
        };
        let n = points.len();
        let count = if n >= 2 { n } else { 0 };
        (0..count).map(move |i| (points[i], points[(i + 1) % n]))
    }

    /// Triangles in the globe frame; empty for outlines.
    pub fn placed_triangles(&self) -> Vec<[Vec3; 3]> {
        match self {
            BoundaryShape::Outline { .. } => Vec::new(),
            BoundaryShape::Filled {
                vertices,
                triangles,
                placement,
            } => triangles
                .iter()
                .filter_map(|tri| {
                    let a = vertices.get(tri[0] as usize)?;
                    let b = vertices.get(tri[1] as usize)?;
                    let c = vertices.get(tri[2] as usize)?;
                    Some([placement.place(*a), placement.place(*b), placement.place(*c)])
                })
                .collect(),
        }
    }

    pub fn bounds(&self) -> Option<ShapeBounds> {
        ShapeBounds::from_points(&self.positions())
    }
}
