//! Geographic coordinates on the scene sphere.
//!
//! Convention (shared by boundary geometry and the globe texture mapping):
//! - `phi = 90 - lat`, `theta = lon + 90` (degrees)
//! - `x = -r sin(phi) cos(theta)`, `y = r cos(phi)`, `z = r sin(phi) sin(theta)`
//!
//! So `(0, 0)` faces +Z, east is +X and the north pole is +Y. Longitudes are
//! not wrapped; a ring crossing the antimeridian projects to a crossing line.

use super::Vec3;

/// Longitude offset (degrees) applied before the spherical mapping.
pub const LONGITUDE_OFFSET_DEG: f64 = 90.0;

pub fn lat_lon_to_vec3(lat_deg: f64, lon_deg: f64, radius: f64) -> Vec3 {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = (lon_deg + LONGITUDE_OFFSET_DEG).to_radians();

    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    Vec3::new(
        -(radius * sin_phi * cos_theta),
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}

/// Inverse of [`lat_lon_to_vec3`] for any non-zero point; the radius is dropped.
///
/// Returns `(lat_deg, lon_deg)` with `lon_deg` in `(-180, 180]`.
pub fn vec3_to_lat_lon(p: Vec3) -> Option<(f64, f64)> {
    let r = p.length();
    if r <= 0.0 || !r.is_finite() {
        return None;
    }

    let lat = 90.0 - (p.y / r).clamp(-1.0, 1.0).acos().to_degrees();
    let theta = p.z.atan2(-p.x).to_degrees();
    let mut lon = theta - LONGITUDE_OFFSET_DEG;
    if lon <= -180.0 {
        lon += 360.0;
    } else if lon > 180.0 {
        lon -= 360.0;
    }

    Some((lat, lon))
}

/// Entry distance of a ray into a sphere centered at the origin.
///
/// `dir` must be normalized. Returns `None` when the ray misses or the
/// sphere lies entirely behind the origin.
pub fn ray_sphere_entry(origin: Vec3, dir: Vec3, radius: f64) -> Option<f64> {
    let b = origin.dot(dir);
    let c = origin.dot(origin) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t0 = -b - sq;
    let t1 = -b + sq;
    if t1 < 0.0 {
        return None;
    }
    Some(t0.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::{lat_lon_to_vec3, ray_sphere_entry, vec3_to_lat_lon};
    use crate::math::Vec3;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn points_lie_on_the_sphere() {
        let radius = 100.0;
        let mut lat = -90.0;
        while lat <= 90.0 {
            let mut lon = -180.0;
            while lon <= 180.0 {
                let p = lat_lon_to_vec3(lat, lon, radius);
                assert_close(p.length(), radius, 1e-9);
                lon += 15.0;
            }
            lat += 7.5;
        }
    }

    #[test]
    fn origin_faces_positive_z() {
        let p = lat_lon_to_vec3(0.0, 0.0, 100.0);
        assert_close(p.x, 0.0, 1e-9);
        assert_close(p.y, 0.0, 1e-9);
        assert_close(p.z, 100.0, 1e-9);
    }

    #[test]
    fn east_is_positive_x_and_north_is_positive_y() {
        let east = lat_lon_to_vec3(0.0, 90.0, 1.0);
        assert_close(east.x, 1.0, 1e-12);
        assert_close(east.z, 0.0, 1e-12);

        let north = lat_lon_to_vec3(90.0, 0.0, 1.0);
        assert_close(north.y, 1.0, 1e-12);
    }

    #[test]
    fn inverse_recovers_lat_lon() {
        for &(lat, lon) in &[(12.5, -45.0), (-33.9, 151.2), (64.1, -21.9), (0.0, 179.0)] {
            let p = lat_lon_to_vec3(lat, lon, 250.0);
            let (lat_rt, lon_rt) = vec3_to_lat_lon(p).expect("non-zero");
            assert_close(lat_rt, lat, 1e-9);
            assert_close(lon_rt, lon, 1e-9);
        }
        assert!(vec3_to_lat_lon(Vec3::ZERO).is_none());
    }

    #[test]
    fn ray_enters_sphere_at_front_surface() {
        let t = ray_sphere_entry(Vec3::new(0.0, 0.0, 300.0), Vec3::new(0.0, 0.0, -1.0), 100.0)
            .expect("hit");
        assert_close(t, 200.0, 1e-9);

        let miss = ray_sphere_entry(Vec3::new(0.0, 150.0, 300.0), Vec3::new(0.0, 0.0, -1.0), 100.0);
        assert!(miss.is_none());
    }
}
