use serde::{Deserialize, Serialize};

/// External representation of a nesting instance: a set of shapes and the surface to place them on.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtInstance {
    /// The name of the instance
    pub name: String,
    pub surface: ExtSurface,
    pub shapes: Vec<ExtInlayShape>,
}

/// Axis-aligned rectangle with its left bottom corner at (x_min, y_min), a width and height
#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct ExtSurface {
    pub x_min: f32,
    pub y_min: f32,
    pub width: f32,
    pub height: f32,
}

/// External representation of an [`InlayShape`](crate::entities::InlayShape).
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtInlayShape {
    /// Unique identifier of the shape
    pub id: String,
    pub shape: ExtShape,
}

/// The drawing elements a shape can be described with
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum ExtShape {
    /// SVG path data
    Path { d: String },
    Rectangle {
        x_min: f32,
        y_min: f32,
        width: f32,
        height: f32,
    },
    Circle { cx: f32, cy: f32, r: f32 },
    Ellipse { cx: f32, cy: f32, rx: f32, ry: f32 },
    /// Closed sequence of points
    Polygon(Vec<(f32, f32)>),
    /// Open sequence of points
    Polyline(Vec<(f32, f32)>),
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
}

/// External representation of a nested layout.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExtSolution {
    /// Name of the instance this solution belongs to
    pub name: String,
    /// Generation in which the layout was found
    pub generation: usize,
    pub score: f32,
    /// Number of pairs of colliding shapes
    pub collisions: usize,
    /// Time elapsed since the start of the nesting, in milliseconds
    pub run_time_ms: u64,
    pub placements: Vec<ExtPlacement>,
    /// Ids of the shapes that could not be placed
    #[serde(default)]
    pub unplaced: Vec<String>,
}

/// External representation of a [`Placement`](crate::entities::Placement).
/// The shape is first rotated around the origin by `rotation` degrees, then translated by (`x`, `y`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtPlacement {
    pub shape_id: String,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
}
