use std::sync::Arc;

use log::warn;
use rand::Rng;
use serde::Serialize;

use crate::entities::{InlayShape, Placement, approximate_polygon};
use crate::geometry::primitives::{Rect, SPolygon};
use crate::util::assertions;

/// Quality of an [`Individual`], lower is better.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Fitness {
    pub score: f32,
    /// Number of pairs of realized polygons that collide
    pub collisions: usize,
    /// Number of shapes without a placement
    pub unplaced: usize,
}

impl Fitness {
    pub fn is_feasible(&self) -> bool {
        self.collisions == 0 && self.unplaced == 0
    }
}

/// A candidate layout: one optional placement per shape.
///
/// Cloning an individual shares the shapes and copies the placements, realized polygons and
/// fitness by content, after which both can be modified independently.
#[derive(Clone, Debug)]
pub struct Individual {
    /// The shapes to place, shared among all individuals
    pub shapes: Vec<Arc<InlayShape>>,
    /// Placement of every shape, `None` if the shape could not be placed
    pub placements: Vec<Option<Placement>>,
    /// Every shape's approximated outline after applying its placement
    pub polygons: Vec<Option<SPolygon>>,
    /// `None` until evaluated, reset whenever a placement changes
    pub fitness: Option<Fitness>,
}

impl Individual {
    /// An individual with none of its shapes placed
    pub fn new(shapes: Vec<Arc<InlayShape>>) -> Self {
        let n = shapes.len();
        Individual {
            shapes,
            placements: vec![None; n],
            polygons: vec![None; n],
            fitness: None,
        }
    }

    /// Places every shape at a random position and rotation inside `surface`, keeping at least
    /// `spacing` between each shape's bounding box and the border of the surface.
    ///
    /// Outlines are approximated with `tolerance`. Shapes that cannot be approximated or do not fit
    /// under any of the `allowed_rotations` (degrees) are left unplaced.
    /// Overlap between shapes is not avoided.
    pub fn randomize(
        &mut self,
        surface: &Rect,
        spacing: f32,
        allowed_rotations: &[f32],
        tolerance: f32,
        rng: &mut impl Rng,
    ) {
        let outlines = self
            .shapes
            .iter()
            .map(|s| approximate_polygon(s, tolerance))
            .collect::<Vec<_>>();

        let spacing = match spacing {
            s if s >= 0.0 => s,
            s => {
                warn!("spacing of {s} is not a non-negative margin, using 0");
                0.0
            }
        };
        match surface.resize_by(-spacing, -spacing) {
            Some(area) => self.randomize_with(&outlines, &area, allowed_rotations, rng),
            None => {
                warn!("spacing of {spacing} leaves no room on surface {surface:?}");
                self.clear();
            }
        }
    }

    /// Same as [`Individual::randomize`], with precomputed outlines (one per shape) and the
    /// spacing already subtracted from `area`.
    pub fn randomize_with(
        &mut self,
        outlines: &[Option<SPolygon>],
        area: &Rect,
        allowed_rotations: &[f32],
        rng: &mut impl Rng,
    ) {
        debug_assert!(outlines.len() == self.shapes.len());
        for (i, outline) in outlines.iter().enumerate() {
            let placement = outline
                .as_ref()
                .and_then(|o| Placement::sample(o, area, allowed_rotations, rng));
            self.set_placement(i, outline.as_ref(), placement);
        }
        debug_assert!(assertions::individual_within_surface(self, area));
    }

    /// Sets the placement of the `i`th shape, realizing `outline` at its new position.
    /// Without an outline or a placement, the shape becomes unplaced.
    pub fn set_placement(&mut self, i: usize, outline: Option<&SPolygon>, placement: Option<Placement>) {
        match (outline, placement) {
            (Some(outline), Some(placement)) => {
                self.placements[i] = Some(placement);
                self.polygons[i] = Some(placement.realize(outline));
            }
            _ => {
                self.placements[i] = None;
                self.polygons[i] = None;
            }
        }
        self.fitness = None;
        debug_assert!(assertions::placements_match_polygons(self));
    }

    /// Takes over the placement of the `i`th shape from `other`.
    pub fn inherit(&mut self, i: usize, other: &Individual) {
        self.placements[i] = other.placements[i];
        self.polygons[i] = other.polygons[i].clone();
        self.fitness = None;
    }

    pub fn clear(&mut self) {
        self.placements.iter_mut().for_each(|p| *p = None);
        self.polygons.iter_mut().for_each(|p| *p = None);
        self.fitness = None;
    }

    pub fn n_shapes(&self) -> usize {
        self.shapes.len()
    }

    pub fn n_placed(&self) -> usize {
        self.placements.iter().flatten().count()
    }

    /// Iterator over all placed shapes, with their placement and realized polygon
    pub fn placed(&self) -> impl Iterator<Item = (&InlayShape, &Placement, &SPolygon)> {
        self.shapes
            .iter()
            .zip(self.placements.iter())
            .zip(self.polygons.iter())
            .filter_map(|((s, pl), p)| match (pl, p) {
                (Some(pl), Some(p)) => Some((s.as_ref(), pl, p)),
                _ => None,
            })
    }

    /// Iterator over the shapes without a placement
    pub fn unplaced(&self) -> impl Iterator<Item = &InlayShape> {
        self.shapes
            .iter()
            .zip(self.placements.iter())
            .filter(|(_, pl)| pl.is_none())
            .map(|(s, _)| s.as_ref())
    }
}
