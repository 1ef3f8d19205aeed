use log::error;

use crate::entities::{Individual, Placement};
use crate::geometry::geo_traits::Transformable;
use crate::geometry::primitives::{Rect, SPolygon};
use crate::util::FPA;

//Various checks to verify correctness of the state of the system
//Used in debug_assert!() blocks

/// Every realized polygon of the individual lies inside `surface`.
pub fn individual_within_surface(individual: &Individual, surface: &Rect) -> bool {
    individual
        .polygons
        .iter()
        .flatten()
        .all(|p| polygon_within_surface(p, surface))
}

pub fn polygon_within_surface(polygon: &SPolygon, surface: &Rect) -> bool {
    match surface.almost_contains(&polygon.bbox) {
        true => true,
        false => {
            error!(
                "polygon bbox {:?} exceeds surface {:?}",
                polygon.bbox, surface
            );
            false
        }
    }
}

/// Placements and realized polygons are either both present or both absent.
pub fn placements_match_polygons(individual: &Individual) -> bool {
    individual.placements.len() == individual.shapes.len()
        && individual.polygons.len() == individual.shapes.len()
        && individual
            .placements
            .iter()
            .zip(individual.polygons.iter())
            .all(|(pl, p)| pl.is_some() == p.is_some())
}

/// The realized polygon is the outline transformed by the placement.
pub fn realized_polygon_matches(outline: &SPolygon, placement: &Placement, realized: &SPolygon) -> bool {
    let expected = outline.transform_clone(&placement.d_transf().compose());
    expected.n_vertices() == realized.n_vertices()
        && expected
            .vertices
            .iter()
            .zip(realized.vertices.iter())
            .all(|(a, b)| FPA(a.0) == FPA(b.0) && FPA(a.1) == FPA(b.1))
}
