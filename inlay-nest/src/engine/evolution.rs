use ordered_float::OrderedFloat;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::entities::{Individual, Placement};
use crate::geometry::primitives::{Rect, SPolygon};

/// Picks the fittest of `size` individuals drawn uniformly (with replacement) from `population`.
/// Individuals without a fitness lose from every evaluated one.
pub fn tournament_select<'a>(
    population: &'a [Individual],
    size: usize,
    rng: &mut impl Rng,
) -> &'a Individual {
    debug_assert!(!population.is_empty());
    (0..size.max(1))
        .map(|_| &population[rng.random_range(0..population.len())])
        .min_by_key(|i| OrderedFloat(i.fitness.map_or(f32::INFINITY, |f| f.score)))
        .expect("tournament has at least one contestant")
}

/// Uniform crossover: every shape takes its placement from either parent with equal probability.
pub fn crossover(a: &Individual, b: &Individual, rng: &mut impl Rng) -> Individual {
    debug_assert!(a.n_shapes() == b.n_shapes());
    let mut child = a.clone();
    child.fitness = None;
    for i in 0..child.n_shapes() {
        if rng.random_bool(0.5) {
            child.inherit(i, b);
        }
    }
    child
}

/// Everything a mutation needs to produce valid placements
pub struct Mutator<'a> {
    /// Approximated outline of every shape
    pub outlines: &'a [Option<SPolygon>],
    /// Region inside which every realized bounding box has to stay
    pub area: Rect,
    pub allowed_rotations: &'a [f32],
    /// Per shape probability of being mutated
    pub rate: f32,
    pub nudge: Normal<f32>,
}

impl Mutator<'_> {
    /// Mutates each shape with probability `rate`: half of the mutations sample a completely new
    /// placement, the other half nudge the current translation.
    /// Unplaced shapes always get a new placement attempt when selected.
    /// Returns the number of mutated shapes.
    pub fn mutate(&self, individual: &mut Individual, rng: &mut impl Rng) -> usize {
        let mut n_mutated = 0;
        for i in 0..individual.n_shapes() {
            let Some(outline) = self.outlines[i].as_ref() else {
                continue;
            };
            if !rng.random_bool(self.rate as f64) {
                continue;
            }
            let current = individual.placements[i].zip(individual.polygons[i].as_ref());
            let placement = match current {
                Some((placement, polygon)) if rng.random_bool(0.5) => {
                    Some(self.nudge(placement, &polygon.bbox, rng))
                }
                _ => Placement::sample(outline, &self.area, self.allowed_rotations, rng),
            };
            if placement.is_some() {
                individual.set_placement(i, Some(outline), placement);
                n_mutated += 1;
            }
        }
        n_mutated
    }

    /// Shifts a placement by a normally distributed offset, clamped so that the bounding box
    /// of the realized polygon remains inside the area.
    fn nudge(&self, placement: Placement, bbox: &Rect, rng: &mut impl Rng) -> Placement {
        let (x_lo, y_lo) = (self.area.x_min - bbox.x_min, self.area.y_min - bbox.y_min);
        let x_hi = f32::max(x_lo, self.area.x_max - bbox.x_max);
        let y_hi = f32::max(y_lo, self.area.y_max - bbox.y_max);
        let dx = self.nudge.sample(rng).clamp(x_lo, x_hi);
        let dy = self.nudge.sample(rng).clamp(y_lo, y_hi);
        Placement::new(placement.x + dx, placement.y + dy, placement.rotation)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use itertools::Itertools;
    use rand::SeedableRng;
    use rand::prelude::SmallRng;

    use super::*;
    use crate::entities::{Fitness, InlayShape, approximate_polygon};
    use crate::util::assertions;

    fn shapes(n: usize) -> Vec<Arc<InlayShape>> {
        (0..n)
            .map(|i| Arc::new(InlayShape::rectangle(format!("s{i}"), 0.0, 0.0, 10.0, 4.0)))
            .collect()
    }

    fn area() -> Rect {
        Rect::try_new(0.0, 0.0, 100.0, 50.0).unwrap()
    }

    fn with_score(mut individual: Individual, score: f32) -> Individual {
        individual.fitness = Some(Fitness {
            score,
            collisions: 0,
            unplaced: 0,
        });
        individual
    }

    #[test]
    fn full_tournament_picks_the_best() {
        let mut rng = SmallRng::seed_from_u64(0);
        let population = [3.0, 1.0, 2.0]
            .map(|s| with_score(Individual::new(shapes(1)), s))
            .to_vec();
        let winner = tournament_select(&population, 100, &mut rng);
        assert_eq!(winner.fitness.unwrap().score, 1.0);
    }

    #[test]
    fn crossover_takes_every_placement_from_a_parent() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut a = Individual::new(shapes(8));
        let mut b = Individual::new(shapes(8));
        a.randomize(&area(), 0.0, &[0.0], 0.5, &mut rng);
        b.randomize(&area(), 0.0, &[90.0], 0.5, &mut rng);
        let a = with_score(a, 1.0);

        let child = crossover(&a, &b, &mut rng);
        assert_eq!(child.fitness, None);
        for i in 0..8 {
            assert!(child.placements[i] == a.placements[i] || child.placements[i] == b.placements[i]);
            assert_eq!(child.placements[i].is_some(), child.polygons[i].is_some());
        }
        assert!(Arc::ptr_eq(&child.shapes[0], &a.shapes[0]));
    }

    #[test]
    fn mutation_keeps_shapes_inside_the_area() {
        let mut rng = SmallRng::seed_from_u64(2);
        let shapes = shapes(10);
        let outlines = shapes.iter().map(|s| approximate_polygon(s, 0.5)).collect_vec();
        let mutator = Mutator {
            outlines: &outlines,
            area: area(),
            allowed_rotations: &[0.0, 90.0],
            rate: 1.0,
            nudge: Normal::new(0.0, 30.0).unwrap(),
        };
        let mut individual = Individual::new(shapes);
        individual.randomize_with(&outlines, &area(), &[0.0, 90.0], &mut rng);
        for _ in 0..50 {
            assert_eq!(mutator.mutate(&mut individual, &mut rng), 10);
            assert!(assertions::individual_within_surface(&individual, &area()));
            assert!(assertions::placements_match_polygons(&individual));
        }
    }

    #[test]
    fn zero_rate_changes_nothing() {
        let mut rng = SmallRng::seed_from_u64(3);
        let shapes = shapes(5);
        let outlines = shapes.iter().map(|s| approximate_polygon(s, 0.5)).collect_vec();
        let mutator = Mutator {
            outlines: &outlines,
            area: area(),
            allowed_rotations: &[0.0],
            rate: 0.0,
            nudge: Normal::new(0.0, 1.0).unwrap(),
        };
        let mut individual = Individual::new(shapes);
        individual.randomize_with(&outlines, &area(), &[0.0], &mut rng);
        let before = individual.placements.clone();
        assert_eq!(mutator.mutate(&mut individual, &mut rng), 0);
        assert_eq!(individual.placements, before);
    }
}
