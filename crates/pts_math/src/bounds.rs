use crate::Vec3;

/// Axis-aligned bounds of an imported point set.
///
/// An empty bounds has `min > max` on every axis so that extending it with
/// the first point yields a degenerate box around that point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds {
    /// Create an empty bounds (contains nothing).
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Compute the bounds of a set of points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut bounds = Self::empty();
        for point in points {
            bounds.extend(*point);
        }
        bounds
    }

    /// Grow the bounds to include `point`.
    #[inline]
    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Center of the box. Returns zero for empty bounds.
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        (self.min + self.max) * 0.5
    }

    /// Edge lengths along each axis. Returns zero for empty bounds.
    pub fn extent(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        self.max - self.min
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}
