use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result, bail, ensure};
use log::{info, warn};

use crate::entities::{InlayShape, Instance};
use crate::geometry::primitives::Rect;
use crate::io::ext_repr::{ExtInlayShape, ExtInstance, ExtShape, ExtSurface};

/// Converts an external instance into an internal one.
/// Shapes that are invalid or not closed are skipped with a warning, duplicate ids are an error.
pub fn import_instance(ext_instance: &ExtInstance) -> Result<Instance> {
    let surface = import_surface(&ext_instance.surface).context("invalid surface")?;

    let mut ids = HashSet::new();
    let mut shapes = vec![];
    for ext_shape in &ext_instance.shapes {
        if !ids.insert(ext_shape.id.as_str()) {
            bail!("duplicate shape id: {}", ext_shape.id);
        }
        match import_shape(ext_shape) {
            Ok(shape) => shapes.push(Arc::new(shape)),
            Err(e) => warn!("[IMPORT] skipping shape {}: {e:#}", ext_shape.id),
        }
    }

    if shapes.is_empty() {
        warn!("[IMPORT] instance {} contains no usable shapes", ext_instance.name);
    }
    info!(
        "[IMPORT] instance {}: {}/{} shapes imported",
        ext_instance.name,
        shapes.len(),
        ext_instance.shapes.len()
    );

    Ok(Instance {
        name: ext_instance.name.clone(),
        surface,
        shapes,
    })
}

pub fn import_surface(ext_surface: &ExtSurface) -> Result<Rect> {
    let ExtSurface {
        x_min,
        y_min,
        width,
        height,
    } = *ext_surface;
    Rect::try_new(x_min, y_min, x_min + width, y_min + height)
}

/// Converts the drawing element of a shape to path data. Fails for open shapes.
pub fn import_shape(ext_shape: &ExtInlayShape) -> Result<InlayShape> {
    let id = ext_shape.id.clone();
    let shape = match &ext_shape.shape {
        ExtShape::Path { d } => InlayShape::new(id, d.clone()),
        &ExtShape::Rectangle {
            x_min,
            y_min,
            width,
            height,
        } => {
            ensure!(width > 0.0 && height > 0.0, "rectangle has no area");
            InlayShape::rectangle(id, x_min, y_min, width, height)
        }
        &ExtShape::Circle { cx, cy, r } => {
            ensure!(r > 0.0, "circle has no area");
            InlayShape::circle(id, cx, cy, r)
        }
        &ExtShape::Ellipse { cx, cy, rx, ry } => {
            ensure!(rx > 0.0 && ry > 0.0, "ellipse has no area");
            InlayShape::ellipse(id, cx, cy, rx, ry)
        }
        ExtShape::Polygon(points) => {
            ensure!(points.len() >= 3, "polygon has fewer than 3 points");
            InlayShape::polygon(id, points)
        }
        ExtShape::Polyline(points) => InlayShape::polyline(id, points),
        &ExtShape::Line { x1, y1, x2, y2 } => {
            InlayShape::polyline(id, &[(x1, y1), (x2, y2)])
        }
    };

    ensure!(shape.is_closed(), "shape is not closed: {}", shape.d);
    Ok(shape)
}
