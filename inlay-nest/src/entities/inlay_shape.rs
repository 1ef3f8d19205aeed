use log::{debug, warn};

use crate::geometry::contour;
use crate::geometry::primitives::{Point, SPolygon};
use crate::util::FPA;

/// A closed shape of the inlay design, described by SVG path data.
#[derive(Clone, Debug, PartialEq)]
pub struct InlayShape {
    pub id: String,
    /// SVG path data (`d` attribute)
    pub d: String,
}

impl InlayShape {
    pub fn new(id: impl Into<String>, d: impl Into<String>) -> Self {
        InlayShape {
            id: id.into(),
            d: d.into(),
        }
    }

    /// True if the path data consists of a single closed sub-path (`M ... Z`).
    pub fn is_closed(&self) -> bool {
        contour::is_closed(&self.d)
    }

    pub fn rectangle(id: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        let d = format!("M{x},{y} h{width} v{height} h{} Z", -width);
        InlayShape::new(id, d)
    }

    pub fn circle(id: impl Into<String>, cx: f32, cy: f32, r: f32) -> Self {
        InlayShape::ellipse(id, cx, cy, r, r)
    }

    /// Two half-arcs, starting and ending at the leftmost point.
    pub fn ellipse(id: impl Into<String>, cx: f32, cy: f32, rx: f32, ry: f32) -> Self {
        let d = format!(
            "M{},{cy} a{rx},{ry} 0 1,0 {},0 a{rx},{ry} 0 1,0 {},0 Z",
            cx - rx,
            2.0 * rx,
            -2.0 * rx
        );
        InlayShape::new(id, d)
    }

    pub fn polygon(id: impl Into<String>, points: &[(f32, f32)]) -> Self {
        InlayShape::new(id, format!("{} Z", polyline_data(points)))
    }

    /// An open polyline, which is never accepted for nesting.
    pub fn polyline(id: impl Into<String>, points: &[(f32, f32)]) -> Self {
        InlayShape::new(id, polyline_data(points))
    }
}

fn polyline_data(points: &[(f32, f32)]) -> String {
    let coords = points
        .iter()
        .map(|(x, y)| format!("{x},{y}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("M{coords}")
}

/// Approximates the outline of `shape` as a simple polygon.
/// Curves are flattened within `tolerance` and only the first sub-path is kept.
/// Returns `None` if fewer than 3 distinct points remain, if the outline has no area,
/// or if it is not a valid simple polygon.
pub fn approximate_polygon(shape: &InlayShape, tolerance: f32) -> Option<SPolygon> {
    let commands = match contour::parse_path_data(&shape.d) {
        Ok(commands) => commands,
        Err(e) => {
            warn!("[APPROX] shape {}: unreadable path data: {e:#}", shape.id);
            return None;
        }
    };

    let Some(outline) = contour::flatten(&commands, tolerance).into_iter().next() else {
        warn!("[APPROX] shape {}: path data is empty", shape.id);
        return None;
    };

    let mut points = outline.points;
    points.dedup_by(|a, b| almost_equal(a, b));
    while points.len() > 1 && almost_equal(&points[0], &points[points.len() - 1]) {
        points.pop();
    }

    if points.len() < 3 {
        warn!(
            "[APPROX] shape {}: only {} distinct points, ignoring",
            shape.id,
            points.len()
        );
        return None;
    }

    match SPolygon::new(points) {
        Ok(polygon) => {
            debug!(
                "[APPROX] shape {}: {} vertices, area {:.3}",
                shape.id,
                polygon.n_vertices(),
                polygon.area
            );
            Some(polygon)
        }
        Err(e) => {
            warn!("[APPROX] shape {}: invalid outline: {e}", shape.id);
            None
        }
    }
}

fn almost_equal(a: &Point, b: &Point) -> bool {
    FPA(a.0) == FPA(b.0) && FPA(a.1) == FPA(b.1)
}
