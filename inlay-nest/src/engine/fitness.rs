use itertools::Itertools;
use rayon::prelude::*;

use crate::entities::{Fitness, Individual};
use crate::geometry::geo_traits::CollidesWith;
use crate::geometry::primitives::{Rect, SPolygon};

/// Scores individuals: collisions and unplaced shapes are penalized,
/// the remainder rewards a compact arrangement.
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator {
    pub surface: Rect,
    pub overlap_penalty: f32,
    pub unplaced_penalty: f32,
}

impl FitnessEvaluator {
    pub fn evaluate(&self, individual: &Individual) -> Fitness {
        let collisions = count_collisions(&individual.polygons);
        let unplaced = individual.n_shapes() - individual.n_placed();
        let compactness = placed_bbox(&individual.polygons)
            .map_or(0.0, |bbox| bbox.area() / self.surface.area());

        Fitness {
            score: self.overlap_penalty * collisions as f32
                + compactness
                + self.unplaced_penalty * unplaced as f32,
            collisions,
            unplaced,
        }
    }

    /// Evaluates every individual without a fitness, in parallel.
    pub fn evaluate_all(&self, population: &mut [Individual]) {
        population
            .par_iter_mut()
            .filter(|i| i.fitness.is_none())
            .for_each(|i| i.fitness = Some(self.evaluate(i)));
    }
}

/// Number of pairs of polygons that collide
pub fn count_collisions(polygons: &[Option<SPolygon>]) -> usize {
    polygons
        .iter()
        .flatten()
        .tuple_combinations()
        .filter(|(a, b)| a.collides_with(*b))
        .count()
}

/// For every polygon, whether it collides with any other
pub fn colliding_mask(polygons: &[Option<SPolygon>]) -> Vec<bool> {
    let mut mask = vec![false; polygons.len()];
    for ((i, a), (j, b)) in polygons
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.as_ref().map(|p| (i, p)))
        .tuple_combinations()
    {
        if a.collides_with(b) {
            mask[i] = true;
            mask[j] = true;
        }
    }
    mask
}

/// Bounding box of all polygons together
pub fn placed_bbox(polygons: &[Option<SPolygon>]) -> Option<Rect> {
    polygons
        .iter()
        .flatten()
        .map(|p| p.bbox)
        .reduce(Rect::bounding_rect)
}
