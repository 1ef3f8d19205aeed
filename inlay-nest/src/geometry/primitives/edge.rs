use anyhow::{Result, ensure};

use crate::geometry::geo_traits::CollidesWith;
use crate::geometry::primitives::Point;

/// Line segment between two [`Point`]s
#[derive(Clone, Debug, PartialEq, Copy)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
}

impl Edge {
    pub fn try_new(start: Point, end: Point) -> Result<Self> {
        ensure!(start != end, "degenerate edge, {start:?} == {end:?}");
        Ok(Edge { start, end })
    }

    /// Returns true if both edges share an end point
    pub fn is_adjacent_to(&self, other: &Edge) -> bool {
        self.start == other.start
            || self.start == other.end
            || self.end == other.start
            || self.end == other.end
    }

    pub fn x_min(&self) -> f32 {
        f32::min(self.start.0, self.end.0)
    }

    pub fn y_min(&self) -> f32 {
        f32::min(self.start.1, self.end.1)
    }

    pub fn x_max(&self) -> f32 {
        f32::max(self.start.0, self.end.0)
    }

    pub fn y_max(&self) -> f32 {
        f32::max(self.start.1, self.end.1)
    }
}

impl CollidesWith<Edge> for Edge {
    #[inline(always)]
    fn collides_with(&self, other: &Edge) -> bool {
        if f32::max(self.x_min(), other.x_min()) > f32::min(self.x_max(), other.x_max())
            || f32::max(self.y_min(), other.y_min()) > f32::min(self.y_max(), other.y_max())
        {
            //bounding boxes do not overlap
            return false;
        }

        //based on: https://en.wikipedia.org/wiki/Line%E2%80%93line_intersection#Given_two_points_on_each_line_segment
        let Point(x1, y1) = self.start;
        let Point(x2, y2) = self.end;
        let Point(x3, y3) = other.start;
        let Point(x4, y4) = other.end;

        let denom = (x2 - x1) * (y4 - y3) - (y2 - y1) * (x4 - x3);
        if denom == 0.0 {
            //parallel edges
            return false;
        }
        let t = ((x2 - x4) * (y4 - y3) - (y2 - y4) * (x4 - x3)) / denom;
        let u = ((x2 - x4) * (y2 - y1) - (y2 - y4) * (x2 - x1)) / denom;

        (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_edges_collide() {
        let a = Edge::try_new(Point(0.0, 0.0), Point(2.0, 2.0)).unwrap();
        let b = Edge::try_new(Point(0.0, 2.0), Point(2.0, 0.0)).unwrap();
        assert!(a.collides_with(&b));
    }

    #[test]
    fn disjoint_edges_do_not_collide() {
        let a = Edge::try_new(Point(0.0, 0.0), Point(1.0, 0.0)).unwrap();
        let b = Edge::try_new(Point(0.0, 1.0), Point(1.0, 1.0)).unwrap();
        assert!(!a.collides_with(&b));
    }

    #[test]
    fn degenerate_edge_is_rejected() {
        assert!(Edge::try_new(Point(1.0, 1.0), Point(1.0, 1.0)).is_err());
    }
}
