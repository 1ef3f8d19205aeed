use svg::Document;
use svg::node::element::{Group, Text, Title};

use crate::engine::fitness::colliding_mask;
use crate::entities::Individual;
use crate::geometry::primitives::Rect;
use crate::io::svg::svg_util;
use crate::io::svg::svg_util::SvgDrawOptions;

/// Draws the surface and every placed shape of `individual`.
/// Each shape becomes a `<path>` with its id, the realized polygon as `d`, and fill and stroke
/// attributes taken from the theme.
pub fn layout_to_svg(
    individual: &Individual,
    surface: &Rect,
    options: SvgDrawOptions,
    title: &str,
) -> Document {
    let theme = &options.theme;

    let vbox = surface
        .resize_by(surface.width() * 0.05, surface.height() * 0.05)
        .unwrap_or(*surface);

    let stroke_width =
        f32::min(vbox.width(), vbox.height()) * 0.001 * theme.stroke_width_multiplier;

    let surface_group = Group::new()
        .set("id", "surface")
        .add(svg_util::data_to_path(
            svg_util::rect_data(surface),
            &[
                ("fill", &*format!("{}", theme.surface_fill)),
                ("stroke", "black"),
                ("stroke-width", &*format!("{}", 2.0 * stroke_width)),
            ],
        ))
        .add(Title::new(format!(
            "surface, bbox: [x_min: {:.3}, y_min: {:.3}, x_max: {:.3}, y_max: {:.3}]",
            surface.x_min, surface.y_min, surface.x_max, surface.y_max
        )));

    let collisions = match options.highlight_collisions {
        true => colliding_mask(&individual.polygons),
        false => vec![false; individual.n_shapes()],
    };

    let mut shapes_group = Group::new().set("id", "shapes");
    for (((shape, placement), polygon), colliding) in individual
        .shapes
        .iter()
        .zip(individual.placements.iter())
        .zip(individual.polygons.iter())
        .zip(collisions)
    {
        let (Some(placement), Some(polygon)) = (placement, polygon) else {
            continue;
        };
        let fill = match colliding {
            true => theme.collision_highlight_color,
            false => theme.shape_fill,
        };
        let path = svg_util::data_to_path(
            svg_util::simple_polygon_data(polygon),
            &[
                ("id", shape.id.as_str()),
                ("fill", &*format!("{fill}")),
                ("stroke", &*format!("{}", theme.shape_stroke)),
                ("stroke-width", &*format!("{stroke_width}")),
            ],
        )
        .add(Title::new(format!(
            "shape, id: {}, placement: [{}]",
            shape.id,
            placement.d_transf()
        )));
        shapes_group = shapes_group.add(path);
    }

    let mut document = Document::new()
        .set(
            "viewBox",
            (vbox.x_min, vbox.y_min, vbox.width(), vbox.height()),
        )
        .add(surface_group)
        .add(shapes_group);

    if options.label {
        let font_size = f32::min(surface.width(), surface.height()) * 0.025;
        let fitness = individual
            .fitness
            .map_or("not evaluated".to_string(), |f| {
                format!("score: {:.4} | collisions: {}", f.score, f.collisions)
            });
        let label = Text::new(format!(
            "placed: {}/{} | {} | {}",
            individual.n_placed(),
            individual.n_shapes(),
            fitness,
            title
        ))
        .set("x", surface.x_min)
        .set("y", surface.y_min - 0.5 * font_size)
        .set("font-size", font_size)
        .set("font-family", "monospace")
        .set("font-weight", "500");
        document = document.add(label);
    }

    document
}
