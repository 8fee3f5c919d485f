use foundation::math::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShapeBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl ShapeBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min = *first;
        let mut max = *first;
        for p in rest {
            min = Vec3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
            max = Vec3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
        }
        Some(Self { min, max })
    }

    /// Grows the box by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        let m = Vec3::new(margin, margin, margin);
        Self::new(self.min - m, self.max + m)
    }
}

#[cfg(test)]
mod tests {
    use super::ShapeBounds;
    use foundation::math::Vec3;

    #[test]
    fn from_points_spans_all_points() {
        let b = ShapeBounds::from_points(&[
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(-1.0, 4.0, 0.5),
        ])
        .expect("bounds");
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, 0.5));
        assert_eq!(b.max, Vec3::new(1.0, 4.0, 3.0));
        assert!(ShapeBounds::from_points(&[]).is_none());
    }

    #[test]
    fn expanded_grows_every_side() {
        let b = ShapeBounds::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0)).expanded(0.5);
        assert_eq!(b.min, Vec3::new(-0.5, -0.5, -0.5));
        assert_eq!(b.max, Vec3::new(1.5, 1.5, 1.5));
    }
}
