use foundation::math::precision::stable_total_cmp_f64;
use foundation::math::{Vec3, ray_sphere_entry};
use tracing::trace;

use crate::World;
use crate::components::{BoundaryShape, ShapeBounds};
use crate::entity::ShapeId;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Same ray expressed in a frame rotated by `angle_rad` about +Y.
    pub fn rotated_y(&self, angle_rad: f64) -> Self {
        Self::new(self.origin.rotate_y(angle_rad), self.dir.rotate_y(angle_rad))
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub shape: ShapeId,
    pub distance: f64,
    pub point: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    /// Max ray-to-segment distance that counts as hitting an outline.
    pub line_threshold: f64,
    /// Hits behind the front surface of a sphere of this radius are dropped.
    pub occluder_radius: Option<f64>,
    /// Depth allowance past the occluder surface.
    pub occlusion_slack: f64,
    pub max_distance: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            line_threshold: 1.0,
            occluder_radius: None,
            occlusion_slack: 1.0,
            max_distance: 1.0e30,
        }
    }
}

/// Deterministic ray picking over `shapes`.
///
/// Ordering contract:
/// - The closest hit along the (normalized) ray wins.
/// - If multiple shapes are hit at the same distance, the lower `ShapeId` wins.
///
/// Ids not present in `world` are skipped.
pub fn pick_ray<I>(world: &World, shapes: I, ray: Ray, opts: PickOptions) -> Option<PickHit>
where
    I: IntoIterator<Item = ShapeId>,
{
    let dir = ray.dir.normalized()?;
    let ray = Ray::new(ray.origin, dir);

    let mut max_t = opts.max_distance;
    if let Some(radius) = opts.occluder_radius
        && let Some(entry) = ray_sphere_entry(ray.origin, dir, radius)
    {
        max_t = max_t.min(entry + opts.occlusion_slack);
    }

    let mut best: Option<(f64, ShapeId)> = None;
    for id in shapes {
        let (Some(shape), Some(bounds)) = (world.shape(id), world.bounds(id)) else {
            continue;
        };
        let margin = match shape {
            BoundaryShape::Outline { .. } => opts.line_threshold,
            BoundaryShape::Filled { .. } => 0.0,
        };
        if ray_aabb_hit_t(ray, bounds.expanded(margin), 0.0, max_t).is_none() {
            continue;
        }

        let Some(t) = intersect_shape(ray, shape, opts.line_threshold) else {
            continue;
        };
        if t > max_t {
            continue;
        }

        best = match best {
            None => Some((t, id)),
            Some((bt, bid)) => {
                let ord = stable_total_cmp_f64(t, bt).then_with(|| id.cmp(&bid));
                if ord.is_lt() { Some((t, id)) } else { Some((bt, bid)) }
            }
        };
    }

    let (t, shape) = best?;
    trace!(shape = shape.index(), distance = t, "pick hit");
    Some(PickHit {
        shape,
        distance: t,
        point: ray.at(t),
    })
}

/// Screen picking wrapper.
///
/// The caller supplies the screen->ray mapping via `make_ray`.
pub fn pick_screen<I, F>(
    world: &World,
    shapes: I,
    x_px: f64,
    y_px: f64,
    mut make_ray: F,
    opts: PickOptions,
) -> Option<PickHit>
where
    I: IntoIterator<Item = ShapeId>,
    F: FnMut(f64, f64) -> Option<Ray>,
{
    let ray = make_ray(x_px, y_px)?;
    pick_ray(world, shapes, ray, opts)
}

fn intersect_shape(ray: Ray, shape: &BoundaryShape, line_threshold: f64) -> Option<f64> {
    let threshold_sq = line_threshold * line_threshold;
    match shape {
        BoundaryShape::Outline { .. } => shape
            .segments()
            .filter_map(|(a, b)| {
                let (t, dist_sq) = ray_segment_closest(ray, a, b);
                (dist_sq <= threshold_sq).then_some(t)
            })
            .min_by(|a, b| stable_total_cmp_f64(*a, *b)),
        BoundaryShape::Filled { .. } => shape
            .placed_triangles()
            .iter()
            .filter_map(|tri| ray_triangle_t(ray, *tri))
            .min_by(|a, b| stable_total_cmp_f64(*a, *b)),
    }
}

/// Closest approach between a ray and segment `a..b`.
///
/// Returns `(t, dist_sq)`: the ray parameter of the closest point and the
/// squared distance between the closest points. `ray.dir` must be normalized.
fn ray_segment_closest(ray: Ray, a: Vec3, b: Vec3) -> (f64, f64) {
    let d2 = b - a;
    let r = ray.origin - a;
    let e = d2.dot(d2);
    let c = ray.dir.dot(r);

    let (s, t) = if e <= 1e-18 {
        ((-c).max(0.0), 0.0)
    } else {
        let bb = ray.dir.dot(d2);
        let f = d2.dot(r);
        let denom = e - bb * bb;
        let mut s = if denom > 1e-18 {
            ((bb * f - c * e) / denom).max(0.0)
        } else {
            0.0
        };
        let mut t = (bb * s + f) / e;
        if t < 0.0 {
            t = 0.0;
            s = (-c).max(0.0);
        } else if t > 1.0 {
            t = 1.0;
            s = (bb - c).max(0.0);
        }
        (s, t)
    };

    let on_ray = ray.at(s);
    let on_seg = a + d2 * t;
    let diff = on_ray - on_seg;
    (s, diff.dot(diff))
}

/// Möller–Trumbore, double-sided.
fn ray_triangle_t(ray: Ray, tri: [Vec3; 3]) -> Option<f64> {
    let [v0, v1, v2] = tri;
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let p = ray.dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < 1e-12 {
        return None;
    }
    let inv = 1.0 / det;
    let s = ray.origin - v0;
    let u = s.dot(p) * inv;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.dir.dot(q) * inv;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv;
    (t >= 0.0).then_some(t)
}

fn ray_aabb_hit_t(ray: Ray, bounds: ShapeBounds, mut t_min: f64, mut t_max: f64) -> Option<f64> {
    // Slabs intersection; returns entry distance.
    let origin = ray.origin.as_array();
    let dir = ray.dir.as_array();
    let min = bounds.min.as_array();
    let max = bounds.max.as_array();

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];

        if d.abs() < 1e-12 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t1 = (min[axis] - o) * inv;
        let mut t2 = (max[axis] - o) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }

        t_min = t_min.max(t1);
        t_max = t_max.min(t2);
        if t_max < t_min {
            return None;
        }
    }

    Some(t_min.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::{PickOptions, Ray, pick_ray, pick_screen, ray_segment_closest, ray_triangle_t};
    use crate::World;
    use crate::components::{BoundaryShape, Color, FlatPlacement};
    use crate::entity::ShapeId;
    use foundation::math::{Vec2, Vec3};

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {a} ~= {b}");
    }

    fn square_outline(z: f64) -> BoundaryShape {
        BoundaryShape::Outline {
            points: vec![
                Vec3::new(-1.0, -1.0, z),
                Vec3::new(1.0, -1.0, z),
                Vec3::new(1.0, 1.0, z),
                Vec3::new(-1.0, 1.0, z),
            ],
        }
    }

    fn square_patch(depth: f64) -> BoundaryShape {
        BoundaryShape::Filled {
            vertices: vec![
                Vec2::new(-1.0, -1.0),
                Vec2::new(1.0, -1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(-1.0, 1.0),
            ],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
            placement: FlatPlacement::new(1.0, depth),
        }
    }

    fn down_z(x: f64, y: f64) -> Ray {
        Ray::new(Vec3::new(x, y, 10.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn segment_closest_point_is_perpendicular_foot() {
        let ray = down_z(0.0, 0.5);
        let (t, d2) = ray_segment_closest(ray, Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_close(t, 10.0);
        assert_close(d2, 0.25);
    }

    #[test]
    fn segment_closest_clamps_to_endpoints() {
        let ray = down_z(3.0, 0.0);
        let (t, d2) = ray_segment_closest(ray, Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_close(t, 10.0);
        assert_close(d2, 4.0);
    }

    #[test]
    fn triangle_hit_and_miss() {
        let tri = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        assert_eq!(ray_triangle_t(down_z(0.2, 0.2), tri), Some(10.0));
        assert_eq!(ray_triangle_t(down_z(0.8, 0.8), tri), None);
    }

    #[test]
    fn outline_picks_only_near_the_border() {
        let mut world = World::new();
        let id = world.add_shape(square_outline(0.0), "A", Color::WHITE);
        let opts = PickOptions {
            line_threshold: 0.2,
            ..PickOptions::default()
        };

        let hit = pick_ray(&world, world.ids(), down_z(0.95, 0.0), opts).expect("near edge");
        assert_eq!(hit.shape, id);
        assert_close(hit.distance, 10.0);

        assert!(pick_ray(&world, world.ids(), down_z(0.0, 0.0), opts).is_none());
    }

    #[test]
    fn closing_segment_is_pickable() {
        let mut world = World::new();
        world.add_shape(square_outline(0.0), "A", Color::WHITE);
        // Left edge runs from the last point back to the first.
        let hit = pick_ray(&world, world.ids(), down_z(-1.0, 0.0), PickOptions::default());
        assert!(hit.is_some());
    }

    #[test]
    fn nearest_shape_wins() {
        let mut world = World::new();
        let far = world.add_shape(square_patch(0.0), "Far", Color::WHITE);
        let near = world.add_shape(square_patch(5.0), "Near", Color::WHITE);

        let hit = pick_ray(&world, world.ids(), down_z(0.3, -0.2), PickOptions::default())
            .expect("hit");
        assert_eq!(hit.shape, near);
        assert_close(hit.distance, 5.0);
        assert_ne!(hit.shape, far);
    }

    #[test]
    fn ties_break_by_shape_index() {
        let mut world = World::new();
        let first = world.add_shape(square_patch(0.0), "A", Color::WHITE);
        world.add_shape(square_patch(0.0), "B", Color::WHITE);

        let hit = pick_ray(&world, world.ids(), down_z(0.3, -0.2), PickOptions::default())
            .expect("hit");
        assert_eq!(hit.shape, first);
    }

    #[test]
    fn occluder_hides_shapes_behind_the_sphere() {
        let mut world = World::new();
        world.add_shape(square_patch(-5.0), "Behind", Color::WHITE);
        let front = world.add_shape(square_patch(5.0), "Front", Color::WHITE);

        let opts = PickOptions {
            occluder_radius: Some(4.0),
            ..PickOptions::default()
        };
        let ray = down_z(0.3, -0.2);
        assert_eq!(pick_ray(&world, world.ids(), ray, opts).map(|h| h.shape), Some(front));

        let mut back_only = World::new();
        back_only.add_shape(square_patch(-5.0), "Behind", Color::WHITE);
        assert!(pick_ray(&back_only, back_only.ids(), ray, opts).is_none());
        assert!(pick_ray(&back_only, back_only.ids(), ray, PickOptions::default()).is_some());
    }

    #[test]
    fn pick_screen_uses_supplied_mapping() {
        let mut world = World::new();
        let id = world.add_shape(square_patch(0.0), "A", Color::WHITE);
        let hit = pick_screen(
            &world,
            world.ids(),
            0.3,
            -0.2,
            |x, y| Some(down_z(x, y)),
            PickOptions::default(),
        );
        assert_eq!(hit.map(|h| h.shape), Some(id));
        assert!(
            pick_screen(&world, world.ids(), 0.0, 0.0, |_, _| None, PickOptions::default())
                .is_none()
        );
    }

    #[test]
    fn only_listed_shapes_are_candidates() {
        let mut world = World::new();
        let near = world.add_shape(square_patch(5.0), "Near", Color::WHITE);
        let far = world.add_shape(square_patch(0.0), "Far", Color::WHITE);
        let ray = down_z(0.3, -0.2);

        let hit = pick_ray(&world, [far], ray, PickOptions::default()).expect("hit");
        assert_eq!(hit.shape, far);
        assert_ne!(hit.shape, near);

        let stale = ShapeId::new(42);
        assert!(pick_ray(&world, [stale], ray, PickOptions::default()).is_none());
    }

    #[test]
    fn rotated_ray_undoes_globe_spin() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let local = ray.rotated_y(std::f64::consts::FRAC_PI_2);
        assert_close(local.origin.x, 10.0);
        assert_close(local.dir.x, -1.0);
    }
}
