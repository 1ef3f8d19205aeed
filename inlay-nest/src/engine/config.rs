use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// Configuration of the [`NestingEngine`](crate::engine::NestingEngine)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct NestConfig {
    /// Rotations (in degrees) a shape may be placed in. Empty means only 0°
    pub allowed_rotations: Vec<f32>,
    /// Minimum distance between the bounding box of a shape and the border of the surface
    pub spacing: f32,
    /// Maximum deviation between a curve and its approximating line segments
    pub flatten_tolerance: f32,
    pub population_size: usize,
    /// Number of best individuals copied unchanged into the next generation
    pub elite_count: usize,
    pub tournament_size: usize,
    /// Probability that a child is produced by crossover instead of copying a parent
    pub crossover_rate: f32,
    /// Probability that the placement of a single shape is mutated
    pub mutation_rate: f32,
    /// Standard deviation of a translation nudge, as a fraction of the surface diagonal
    pub nudge_stddev: f32,
    /// Penalty per pair of colliding shapes
    pub overlap_penalty: f32,
    /// Penalty per shape without a placement
    pub unplaced_penalty: f32,
    /// Interval between two generations
    pub tick_interval_ms: u64,
    /// Stop after this many generations. If undefined, there is no limit
    pub max_generations: Option<usize>,
    /// Stop after this many seconds. If undefined, there is no limit
    pub time_limit_s: Option<u64>,
    /// Stop once a collision-free layout has not improved for this many generations
    pub stagnation_limit: usize,
    /// Seed for the PRNG. If undefined, the engine will run in non-deterministic mode using entropy
    pub prng_seed: Option<u64>,
}

impl Default for NestConfig {
    fn default() -> Self {
        Self {
            allowed_rotations: vec![0.0, 90.0, 180.0, 270.0],
            spacing: 0.0,
            flatten_tolerance: 0.5,
            population_size: 40,
            elite_count: 2,
            tournament_size: 3,
            crossover_rate: 0.8,
            mutation_rate: 0.1,
            nudge_stddev: 0.05,
            overlap_penalty: 1.0,
            unplaced_penalty: 2.0,
            tick_interval_ms: 100,
            max_generations: Some(500),
            time_limit_s: Some(60),
            stagnation_limit: 50,
            prng_seed: None,
        }
    }
}

impl NestConfig {
    /// Whether a generation or time limit guarantees the engine eventually stops
    pub fn is_bounded(&self) -> bool {
        self.max_generations.is_some() || self.time_limit_s.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.population_size > 0, "population size must be positive");
        ensure!(
            self.elite_count <= self.population_size,
            "elite count ({}) exceeds population size ({})",
            self.elite_count,
            self.population_size
        );
        ensure!(self.tournament_size > 0, "tournament size must be positive");
        ensure!(
            (0.0..=1.0).contains(&self.crossover_rate),
            "crossover rate must be in [0, 1]: {}",
            self.crossover_rate
        );
        ensure!(
            (0.0..=1.0).contains(&self.mutation_rate),
            "mutation rate must be in [0, 1]: {}",
            self.mutation_rate
        );
        ensure!(
            self.nudge_stddev.is_finite() && self.nudge_stddev >= 0.0,
            "nudge stddev must be non-negative: {}",
            self.nudge_stddev
        );
        ensure!(
            self.spacing.is_finite() && self.spacing >= 0.0,
            "spacing must be non-negative: {}",
            self.spacing
        );
        ensure!(
            self.flatten_tolerance.is_finite() && self.flatten_tolerance > 0.0,
            "flatten tolerance must be positive: {}",
            self.flatten_tolerance
        );
        ensure!(self.tick_interval_ms > 0, "tick interval must be positive");
        ensure!(
            self.allowed_rotations.iter().all(|r| r.is_finite()),
            "allowed rotations must be finite: {:?}",
            self.allowed_rotations
        );
        for (name, penalty) in [
            ("overlap", self.overlap_penalty),
            ("unplaced", self.unplaced_penalty),
        ] {
            ensure!(
                penalty.is_finite() && penalty >= 0.0,
                "{name} penalty must be non-negative: {penalty}"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn default_is_valid() {
        assert!(NestConfig::default().validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: NestConfig =
            serde_json::from_str(r#"{"population_size": 10, "prng_seed": 7}"#).unwrap();
        assert_eq!(config.population_size, 10);
        assert_eq!(config.prng_seed, Some(7));
        assert_eq!(config.allowed_rotations, vec![0.0, 90.0, 180.0, 270.0]);
        assert_eq!(config.tick_interval_ms, 100);
    }

    #[test]
    fn invalid_rates_are_rejected() {
        let config = NestConfig {
            mutation_rate: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = NestConfig {
            elite_count: 100,
            population_size: 10,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test_case(r#"{"max_generations": null, "time_limit_s": null}"#, false; "no limits")]
    #[test_case(r#"{"max_generations": null}"#, true; "time limit only")]
    #[test_case(r#"{"time_limit_s": null, "max_generations": 10}"#, true; "generation limit only")]
    fn bounded_runs(json: &str, expected: bool) {
        let config: NestConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.is_bounded(), expected);
    }

    #[test_case(r#"{"allowed_rotations": [0, 1e39]}"#; "infinite rotation")]
    #[test_case(r#"{"overlap_penalty": -1.0}"#; "negative overlap penalty")]
    #[test_case(r#"{"unplaced_penalty": -0.5}"#; "negative unplaced penalty")]
    #[test_case(r#"{"unplaced_penalty": 1e39}"#; "infinite unplaced penalty")]
    #[test_case(r#"{"spacing": -2.0}"#; "negative spacing")]
    #[test_case(r#"{"flatten_tolerance": 1e39}"#; "infinite tolerance")]
    fn out_of_range_values_are_rejected(json: &str) {
        let config: NestConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }
}
