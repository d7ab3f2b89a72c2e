use glam::DVec2;

/// Axis-aligned box on the X-Z plane. Edges are inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AabbBounds {
    pub min_x: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_z: f64,
}

impl AabbBounds {
    pub fn new(min_x: f64, min_z: f64, max_x: f64, max_z: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_z: min_z.min(max_z),
            max_x: min_x.max(max_x),
            max_z: min_z.max(max_z),
        }
    }

    /// Smallest box around `points` (X, Z); `None` when empty.
    pub fn around(points: impl IntoIterator<Item = DVec2>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let (lo, hi) = it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self::new(lo.x, lo.y, hi.x, hi.y))
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new((self.min_x + self.max_x) * 0.5, (self.min_z + self.max_z) * 0.5)
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.max_x - self.min_x, self.max_z - self.min_z)
    }

    /// Half the diagonal: radius of the circle through the corners.
    pub fn half_diagonal(&self) -> f64 {
        self.size().length() * 0.5
    }

    pub fn contains_point(&self, x: f64, z: f64) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }

    /// `other` lies entirely inside `self`.
    pub fn contains(&self, other: &AabbBounds) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_z >= self.min_z
            && other.max_z <= self.max_z
    }

    pub fn intersects(&self, other: &AabbBounds) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_z <= other.max_z
            && self.max_z >= other.min_z
    }

    pub fn expanded(&self, margin: f64) -> Self {
        Self::new(
            self.min_x - margin,
            self.min_z - margin,
            self.max_x + margin,
            self.max_z + margin,
        )
    }

    pub fn union(&self, other: &AabbBounds) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.min_z.min(other.min_z),
            self.max_x.max(other.max_x),
            self.max_z.max(other.max_z),
        )
    }

    /// The four equal quadrants: (−x,−z), (+x,−z), (−x,+z), (+x,+z).
    pub fn quadrants(&self) -> [AabbBounds; 4] {
        let c = self.center();
        [
            Self::new(self.min_x, self.min_z, c.x, c.y),
            Self::new(c.x, self.min_z, self.max_x, c.y),
            Self::new(self.min_x, c.y, c.x, self.max_z),
            Self::new(c.x, c.y, self.max_x, self.max_z),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes_intersect() {
        let a = AabbBounds::new(0.0, 0.0, 1.0, 1.0);
        let b = AabbBounds::new(1.0, 0.5, 2.0, 2.0);
        let c = AabbBounds::new(1.01, 0.0, 2.0, 1.0);
        assert!(a.intersects(&b) && b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn containment() {
        let outer = AabbBounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(outer.contains(&AabbBounds::new(1.0, 1.0, 2.0, 2.0)));
        assert!(!outer.contains(&AabbBounds::new(9.0, 9.0, 11.0, 10.0)));
        assert!(outer.contains_point(10.0, 0.0));
        assert!(!outer.contains_point(10.1, 0.0));
    }

    #[test]
    fn quadrants_tile_parent() {
        let b = AabbBounds::new(-4.0, 0.0, 4.0, 8.0);
        let q = b.quadrants();
        assert_eq!(q[0], AabbBounds::new(-4.0, 0.0, 0.0, 4.0));
        assert_eq!(q[3], AabbBounds::new(0.0, 4.0, 4.0, 8.0));
        assert!(q.iter().all(|c| b.contains(c)));
    }

    #[test]
    fn around_points() {
        let b = AabbBounds::around([DVec2::new(3.0, -1.0), DVec2::new(-2.0, 5.0)]).unwrap();
        assert_eq!(b, AabbBounds::new(-2.0, -1.0, 3.0, 5.0));
        assert!(AabbBounds::around(std::iter::empty()).is_none());
        assert!((AabbBounds::new(0.0, 0.0, 3.0, 4.0).half_diagonal() - 2.5).abs() < 1e-12);
    }
}
