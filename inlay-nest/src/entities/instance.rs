use std::sync::Arc;

use crate::entities::{InlayShape, approximate_polygon};
use crate::geometry::primitives::Rect;

/// The shapes of an inlay design and the surface they have to be nested on
#[derive(Clone, Debug)]
pub struct Instance {
    pub name: String,
    pub surface: Rect,
    pub shapes: Vec<Arc<InlayShape>>,
}

impl Instance {
    /// Total area of the approximated shapes, ignoring those that cannot be approximated
    pub fn shape_area(&self, tolerance: f32) -> f32 {
        self.shapes
            .iter()
            .filter_map(|s| approximate_polygon(s, tolerance))
            .map(|p| p.area)
            .sum()
    }
}
