use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box described by its top-left corner and its extents.
///
/// Overlap uses open intervals: two boxes that only share an edge do not
/// intersect.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub corner: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(corner: Vec2, width: f32, height: f32) -> Self {
        Self {
            corner,
            size: Vec2::new(width, height),
        }
    }

    /// Box spanning `min` to `max`.
    pub fn from_corners(min: Vec2, max: Vec2) -> Self {
        Self {
            corner: min,
            size: max - min,
        }
    }

    /// Unit box anchored at the origin.
    pub fn unit() -> Self {
        Self::new(Vec2::ZERO, 1.0, 1.0)
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn min(&self) -> Vec2 {
        self.corner
    }

    pub fn max(&self) -> Vec2 {
        self.corner + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.corner + self.size / 2.0
    }

    /// The same box shifted by `offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            corner: self.corner + offset,
            size: self.size,
        }
    }

    /// Open-interval overlap test on both axes.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }

    /// True if `point` lies inside the box (edges included).
    pub fn contains_point(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// True if `other` lies entirely inside this box (edges included).
    pub fn contains(&self, other: &Aabb) -> bool {
        self.contains_point(other.min()) && self.contains_point(other.max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_boxes_intersect() {
        let a = Aabb::new(Vec2::new(5.0, 5.0), 1.0, 1.0);
        let b = Aabb::new(Vec2::new(5.5, 5.0), 1.0, 1.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), 1.0, 1.0);
        let right = Aabb::new(Vec2::new(1.0, 0.0), 1.0, 1.0);
        let below = Aabb::new(Vec2::new(0.0, 1.0), 1.0, 1.0);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&below));
    }

    #[test]
    fn disjoint_on_one_axis_is_enough() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), 10.0, 1.0);
        let b = Aabb::new(Vec2::new(2.0, 3.0), 1.0, 1.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn nested_box_intersects_and_is_contained() {
        let outer = Aabb::new(Vec2::ZERO, 100.0, 100.0);
        let inner = Aabb::new(Vec2::new(10.0, 10.0), 1.0, 1.0);
        assert!(outer.intersects(&inner));
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn corners_and_center() {
        let b = Aabb::from_corners(Vec2::new(2.0, 4.0), Vec2::new(6.0, 10.0));
        assert_eq!(b.width(), 4.0);
        assert_eq!(b.height(), 6.0);
        assert_eq!(b.center(), Vec2::new(4.0, 7.0));
        assert_eq!(b.translated(Vec2::new(1.0, -1.0)).min(), Vec2::new(3.0, 3.0));
    }
}
