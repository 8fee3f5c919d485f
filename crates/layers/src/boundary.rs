use earcutr::earcut;
use foundation::math::{Vec2, approx_eq, lat_lon_to_vec3};
use formats::{GeoFeature, GeoPoint};
use scene::components::{BoundaryShape, FlatPlacement};
use tracing::debug;

/// How every ring in a build is turned into geometry. Never mixed per feature.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum BoundaryMode {
    /// Projected line loop on the sphere.
    #[default]
    Outline,
    /// Flat triangulated patch in raw (lon, lat) space.
    Filled,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundaryOptions {
    pub mode: BoundaryMode,
    pub radius: f64,
    pub placement: FlatPlacement,
}

impl BoundaryOptions {
    pub fn new(mode: BoundaryMode, radius: f64) -> Self {
        Self {
            mode,
            radius,
            placement: default_placement(radius),
        }
    }
}

impl Default for BoundaryOptions {
    fn default() -> Self {
        Self::new(BoundaryMode::Outline, 100.0)
    }
}

/// Latitude +/-90 spans the globe diameter; the patch sits on the front tangent plane.
pub fn default_placement(radius: f64) -> FlatPlacement {
    FlatPlacement::new(radius / 90.0, radius)
}

/// A boundary shape tagged with the country it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryShape {
    pub country: String,
    pub shape: BoundaryShape,
}

/// One shape per outer ring of `feature`; holes are ignored.
pub fn build_feature_shapes(feature: &GeoFeature, opts: &BoundaryOptions) -> Vec<CountryShape> {
    feature
        .geometry
        .outer_rings()
        .into_iter()
        .filter_map(|ring| {
            let shape = build_ring_shape(ring, opts);
            if shape.is_none() {
                debug!(
                    country = %feature.name,
                    geometry = feature.geometry.type_name(),
                    vertices = ring.len(),
                    "dropping degenerate ring"
                );
            }
            shape
        })
        .map(|shape| CountryShape {
            country: feature.name.clone(),
            shape,
        })
        .collect()
}

pub fn build_ring_shape(ring: &[GeoPoint], opts: &BoundaryOptions) -> Option<BoundaryShape> {
    let ring = open_ring(ring);
    if ring.len() < 3 {
        return None;
    }

    match opts.mode {
        BoundaryMode::Outline => Some(BoundaryShape::Outline {
            points: ring
                .iter()
                .map(|p| lat_lon_to_vec3(p.lat_deg, p.lon_deg, opts.radius))
                .collect(),
        }),
        BoundaryMode::Filled => {
            let vertices: Vec<Vec2> = ring.iter().map(|p| Vec2::new(p.lon_deg, p.lat_deg)).collect();
            let triangles = triangulate(&vertices)?;
            Some(BoundaryShape::Filled {
                vertices,
                triangles,
                placement: opts.placement,
            })
        }
    }
}

/// Drops the closing duplicate GeoJSON rings usually carry.
fn open_ring(ring: &[GeoPoint]) -> &[GeoPoint] {
    match ring {
        [first, .., last] if same_point(first, last) => &ring[..ring.len() - 1],
        _ => ring,
    }
}

fn same_point(a: &GeoPoint, b: &GeoPoint) -> bool {
    approx_eq(a.lon_deg, b.lon_deg) && approx_eq(a.lat_deg, b.lat_deg)
}

fn triangulate(vertices: &[Vec2]) -> Option<Vec<[u32; 3]>> {
    let coords: Vec<f64> = vertices.iter().flat_map(|v| [v.x, v.y]).collect();
    let indices = earcut(&coords, &[], 2).ok()?;
    if indices.is_empty() {
        return None;
    }

    Some(
        indices
            .chunks_exact(3)
            .map(|tri| [tri[0] as u32, tri[1] as u32, tri[2] as u32])
            .collect(),
    )
}
