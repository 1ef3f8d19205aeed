use std::time::Duration;

use crate::entities::{Fitness, Individual, Placement};
use crate::io::ext_repr::{ExtPlacement, ExtSolution};

/// Converts the layout of an individual into its external representation.
pub fn export_solution(
    instance_name: &str,
    individual: &Individual,
    generation: usize,
    run_time: Duration,
) -> ExtSolution {
    let fitness = individual.fitness.unwrap_or(Fitness {
        score: f32::INFINITY,
        collisions: 0,
        unplaced: individual.n_shapes() - individual.n_placed(),
    });

    ExtSolution {
        name: instance_name.to_string(),
        generation,
        score: fitness.score,
        collisions: fitness.collisions,
        run_time_ms: run_time.as_millis() as u64,
        placements: individual
            .placed()
            .map(|(shape, placement, _)| export_placement(&shape.id, placement))
            .collect(),
        unplaced: individual.unplaced().map(|s| s.id.clone()).collect(),
    }
}

pub fn export_placement(shape_id: &str, placement: &Placement) -> ExtPlacement {
    ExtPlacement {
        shape_id: shape_id.to_string(),
        x: placement.x,
        y: placement.y,
        rotation: placement.rotation,
    }
}
