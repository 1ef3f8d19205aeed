use std::hash::{Hash, Hasher};

use crate::geometry::Transformation;
use crate::geometry::geo_traits::Transformable;

/// Geometric primitive representing a point
#[derive(Debug, Clone, PartialEq, Copy)]
pub struct Point(pub f32, pub f32);

impl Transformable for Point {
    fn transform(&mut self, t: &Transformation) -> &mut Self {
        let m = t.matrix();
        let Point(x, y) = *self;
        self.0 = m[0][0].into_inner() * x + m[0][1].into_inner() * y + m[0][2].into_inner();
        self.1 = m[1][0].into_inner() * x + m[1][1].into_inner() * y + m[1][2].into_inner();
        self
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
        self.1.to_bits().hash(state);
    }
}

impl From<Point> for (f32, f32) {
    fn from(p: Point) -> Self {
        (p.0, p.1)
    }
}
