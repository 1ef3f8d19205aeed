use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use ordered_float::OrderedFloat;
use rand::Rng;
use rand::prelude::SmallRng;
use rand_distr::Normal;

use crate::engine::config::NestConfig;
use crate::engine::evolution::{Mutator, crossover, tournament_select};
use crate::engine::fitness::FitnessEvaluator;
use crate::engine::timer::Timer;
use crate::entities::{Fitness, Individual, InlayShape, approximate_polygon};
use crate::geometry::primitives::{Rect, SPolygon};
use crate::util::assertions;

/// Progress of the engine after a generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationReport {
    pub generation: usize,
    /// Fitness of the best individual seen so far
    pub best: Fitness,
    /// Mean score of the current population
    pub avg_score: f32,
    /// Number of placed shapes in the best individual
    pub n_placed: usize,
    /// Time since the engine was first started
    pub elapsed: Duration,
}

/// Reason the engine stopped on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    MaxGenerations,
    TimeLimit,
    /// A collision-free layout with every shape placed stopped improving
    Converged,
}

/// Invoked after every generation with its report and the best individual seen so far
pub type UpdateCallback = Box<dyn FnMut(&GenerationReport, &Individual)>;

/// Evolves a population of candidate layouts, one generation per tick of a recurring timer.
///
/// The engine is cooperative: nothing happens unless [`NestingEngine::poll`] or
/// [`NestingEngine::run`] is called.
pub struct NestingEngine {
    pub shapes: Vec<Arc<InlayShape>>,
    pub config: NestConfig,
    pub surface: Rect,
    pub population: Vec<Individual>,
    pub best_individual: Option<Individual>,
    pub generation: usize,
    /// Approximated outline of every shape, `None` if the approximation failed
    outlines: Vec<Option<SPolygon>>,
    /// Surface shrunk by the spacing
    area: Rect,
    evaluator: FitnessEvaluator,
    nudge: Normal<f32>,
    timer: Timer,
    /// SmallRng is a fast, non-cryptographic PRNG <https://rust-random.github.io/book/guide-rngs.html>
    rng: SmallRng,
    on_update: Option<UpdateCallback>,
    started: Option<Instant>,
    /// Engine time spent up to the end of the last generation
    run_time: Duration,
    /// Generations since the best individual last improved
    stagnation: usize,
    termination: Option<Termination>,
}

impl NestingEngine {
    pub fn new(
        shapes: Vec<Arc<InlayShape>>,
        config: NestConfig,
        surface: Rect,
        rng: SmallRng,
    ) -> Result<Self> {
        config.validate().context("invalid nesting configuration")?;
        let area = surface
            .resize_by(-config.spacing, -config.spacing)
            .with_context(|| format!("spacing of {} leaves no room on the surface", config.spacing))?;
        let nudge = Normal::new(0.0, config.nudge_stddev * surface.diameter())
            .map_err(|e| anyhow!("invalid nudge distribution: {e}"))?;

        let outlines = shapes
            .iter()
            .map(|s| approximate_polygon(s, config.flatten_tolerance))
            .collect::<Vec<_>>();
        let n_outlines = outlines.iter().flatten().count();
        if n_outlines < shapes.len() {
            warn!(
                "[NEST] {} of {} shapes could not be approximated and will not be placed",
                shapes.len() - n_outlines,
                shapes.len()
            );
        }
        if !config.is_bounded() {
            warn!(
                "[NEST] no generation or time limit set, the engine only stops once converged or stopped"
            );
        }
        info!(
            "[NEST] {} shapes on a {:.1}x{:.1} surface, population of {}",
            shapes.len(),
            surface.width(),
            surface.height(),
            config.population_size
        );

        let evaluator = FitnessEvaluator {
            surface,
            overlap_penalty: config.overlap_penalty,
            unplaced_penalty: config.unplaced_penalty,
        };
        let timer = Timer::new(Duration::from_millis(config.tick_interval_ms));

        Ok(Self {
            shapes,
            config,
            surface,
            population: vec![],
            best_individual: None,
            generation: 0,
            outlines,
            area,
            evaluator,
            nudge,
            timer,
            rng,
            on_update: None,
            started: None,
            run_time: Duration::ZERO,
            stagnation: 0,
            termination: None,
        })
    }

    pub fn with_update_callback(
        mut self,
        on_update: impl FnMut(&GenerationReport, &Individual) + 'static,
    ) -> Self {
        self.on_update = Some(Box::new(on_update));
        self
    }

    /// Arms the timer. Has no effect if the engine is already running.
    pub fn start(&mut self) {
        if self.timer.is_active() {
            return;
        }
        self.started.get_or_insert_with(Instant::now);
        self.termination = None;
        self.timer.start();
        info!(
            "[NEST] started, one generation every {}ms",
            self.timer.interval().as_millis()
        );
    }

    /// Disarms the timer. Has no effect if the engine is not running.
    pub fn stop(&mut self) {
        if !self.timer.is_active() {
            return;
        }
        self.timer.stop();
        info!("[NEST] stopped after {} generations", self.generation);
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_active()
    }

    /// Advances one generation if a tick is due.
    pub fn poll(&mut self) -> Option<GenerationReport> {
        match self.timer.fire(Instant::now()) {
            true => Some(self.next_generation()),
            false => None,
        }
    }

    /// Blocks until the engine is stopped, sleeping in between ticks.
    /// Returns the best individual found.
    pub fn run(&mut self) -> Option<&Individual> {
        while let Some(remaining) = self.timer.remaining(Instant::now()) {
            if !remaining.is_zero() {
                thread::sleep(remaining);
            }
            self.poll();
        }
        self.best()
    }

    /// Produces the next generation: the first call randomizes the initial population,
    /// later calls apply elitism, tournament selection, crossover and mutation.
    pub fn next_generation(&mut self) -> GenerationReport {
        let start = *self.started.get_or_insert_with(Instant::now);

        self.population = match self.population.is_empty() {
            true => self.initial_population(),
            false => self.offspring(),
        };
        self.evaluator.evaluate_all(&mut self.population);
        self.population
            .sort_by_key(|i| OrderedFloat(i.fitness.map_or(f32::INFINITY, |f| f.score)));
        self.generation += 1;

        let gen_best = &self.population[0];
        let gen_best_score = gen_best.fitness.map_or(f32::INFINITY, |f| f.score);
        let improved = match &self.best_individual {
            None => true,
            Some(best) => gen_best_score < best.fitness.map_or(f32::INFINITY, |f| f.score),
        };
        if improved {
            self.best_individual = Some(gen_best.clone());
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }

        let best = self
            .best_individual
            .as_ref()
            .expect("best individual is set after the first generation");
        debug_assert!(assertions::individual_within_surface(best, &self.area));
        let best_fitness = best.fitness.expect("best individual is evaluated");
        let report = GenerationReport {
            generation: self.generation,
            best: best_fitness,
            avg_score: self
                .population
                .iter()
                .filter_map(|i| i.fitness.map(|f| f.score))
                .sum::<f32>()
                / self.population.len() as f32,
            n_placed: best.n_placed(),
            elapsed: start.elapsed(),
        };
        self.run_time = report.elapsed;

        match improved {
            true => info!(
                "[NEST] gen {}: best score {:.4} ({} collisions, {}/{} placed)",
                report.generation,
                best_fitness.score,
                best_fitness.collisions,
                report.n_placed,
                self.shapes.len()
            ),
            false => debug!(
                "[NEST] gen {}: no improvement for {} generations (avg score {:.4})",
                report.generation, self.stagnation, report.avg_score
            ),
        }

        if let Some(on_update) = self.on_update.as_mut() {
            on_update(&report, best);
        }

        if let Some(termination) = self.check_termination(&report) {
            self.termination = Some(termination);
            self.timer.stop();
            info!(
                "[NEST] terminated ({termination:?}) after {} generations in {:.3}s",
                self.generation,
                report.elapsed.as_secs_f64()
            );
        }

        report
    }

    fn initial_population(&mut self) -> Vec<Individual> {
        (0..self.config.population_size)
            .map(|_| {
                let mut individual = Individual::new(self.shapes.clone());
                individual.randomize_with(
                    &self.outlines,
                    &self.area,
                    &self.config.allowed_rotations,
                    &mut self.rng,
                );
                individual
            })
            .collect()
    }

    fn offspring(&mut self) -> Vec<Individual> {
        let mutator = Mutator {
            outlines: &self.outlines,
            area: self.area,
            allowed_rotations: &self.config.allowed_rotations,
            rate: self.config.mutation_rate,
            nudge: self.nudge,
        };
        let pop_size = self.config.population_size;

        let mut next = self
            .population
            .iter()
            .take(self.config.elite_count)
            .cloned()
            .collect::<Vec<_>>();

        while next.len() < pop_size {
            let parent_1 = tournament_select(&self.population, self.config.tournament_size, &mut self.rng);
            let mut child = match self.rng.random_bool(self.config.crossover_rate as f64) {
                true => {
                    let parent_2 =
                        tournament_select(&self.population, self.config.tournament_size, &mut self.rng);
                    crossover(parent_1, parent_2, &mut self.rng)
                }
                false => parent_1.clone(),
            };
            mutator.mutate(&mut child, &mut self.rng);
            next.push(child);
        }
        next
    }

    fn check_termination(&self, report: &GenerationReport) -> Option<Termination> {
        if let Some(max) = self.config.max_generations {
            if self.generation >= max {
                return Some(Termination::MaxGenerations);
            }
        }
        if let Some(limit) = self.config.time_limit_s {
            if report.elapsed >= Duration::from_secs(limit) {
                return Some(Termination::TimeLimit);
            }
        }
        if report.best.is_feasible() && self.stagnation >= self.config.stagnation_limit {
            return Some(Termination::Converged);
        }
        None
    }

    /// Best individual seen so far
    pub fn best(&self) -> Option<&Individual> {
        self.best_individual.as_ref()
    }

    /// Time between the start of the first generation and the end of the last one
    pub fn elapsed(&self) -> Duration {
        self.run_time
    }

    /// Why the engine stopped itself, `None` while running or when stopped manually
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Approximated outline of every shape
    pub fn outlines(&self) -> &[Option<SPolygon>] {
        &self.outlines
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;

    use super::*;

    fn shapes() -> Vec<Arc<InlayShape>> {
        vec![
            Arc::new(InlayShape::rectangle("a", 0.0, 0.0, 20.0, 10.0)),
            Arc::new(InlayShape::rectangle("b", 0.0, 0.0, 15.0, 15.0)),
            Arc::new(InlayShape::circle("c", 0.0, 0.0, 6.0)),
            Arc::new(InlayShape::polygon("d", &[(0.0, 0.0), (12.0, 0.0), (6.0, 9.0)])),
        ]
    }

    fn engine(config: NestConfig) -> NestingEngine {
        let surface = Rect::try_new(0.0, 0.0, 100.0, 60.0).unwrap();
        NestingEngine::new(shapes(), config, surface, SmallRng::seed_from_u64(0)).unwrap()
    }

    fn config() -> NestConfig {
        NestConfig {
            population_size: 12,
            tick_interval_ms: 1,
            max_generations: Some(15),
            time_limit_s: None,
            ..NestConfig::default()
        }
    }

    #[test]
    fn start_and_stop() {
        let mut engine = engine(config());
        assert!(!engine.is_running());
        engine.stop();
        assert!(!engine.is_running());
        engine.start();
        assert!(engine.is_running());
        engine.start();
        assert!(engine.is_running());
        engine.stop();
        assert!(!engine.is_running());
        assert_eq!(engine.poll(), None);
    }

    #[test]
    fn first_generation_initializes_the_population() {
        let mut engine = engine(config());
        assert!(engine.best().is_none());
        let report = engine.next_generation();
        assert_eq!(report.generation, 1);
        assert_eq!(engine.population.len(), 12);
        assert!(engine.population.iter().all(|i| i.fitness.is_some()));
        assert!(engine.best().is_some());
    }

    #[test]
    fn layouts_stay_on_the_surface() {
        let mut engine = engine(NestConfig {
            spacing: 2.0,
            ..config()
        });
        let inner = engine.surface.resize_by(-2.0, -2.0).unwrap();
        for _ in 0..10 {
            engine.next_generation();
            for individual in &engine.population {
                assert!(assertions::individual_within_surface(individual, &inner));
                assert!(assertions::placements_match_polygons(individual));
            }
        }
    }

    #[test]
    fn best_score_never_increases() {
        let mut engine = engine(config());
        let mut previous = f32::INFINITY;
        for _ in 0..15 {
            let report = engine.next_generation();
            assert!(report.best.score <= previous);
            previous = report.best.score;
        }
    }

    #[test]
    fn run_stops_at_max_generations() {
        let reports = Rc::new(RefCell::new(vec![]));
        let reports_cb = reports.clone();
        let mut engine = engine(config())
            .with_update_callback(move |report, _| reports_cb.borrow_mut().push(*report));

        engine.start();
        let best = engine.run().cloned();

        assert!(!engine.is_running());
        assert_eq!(engine.termination(), Some(Termination::MaxGenerations));
        assert_eq!(engine.generation, 15);
        assert!(best.is_some());
        let reports = reports.borrow();
        assert_eq!(reports.len(), 15);
        assert!(reports.windows(2).all(|w| w[1].generation == w[0].generation + 1));
    }

    #[test]
    fn sparse_layout_converges() {
        let surface = Rect::try_new(0.0, 0.0, 1000.0, 1000.0).unwrap();
        let config = NestConfig {
            max_generations: Some(500),
            stagnation_limit: 3,
            ..config()
        };
        let mut engine =
            NestingEngine::new(shapes()[..2].to_vec(), config, surface, SmallRng::seed_from_u64(1))
                .unwrap();
        engine.start();
        engine.run();
        assert_eq!(engine.termination(), Some(Termination::Converged));
        assert!(engine.best().unwrap().fitness.unwrap().is_feasible());
    }

    #[test]
    fn excessive_spacing_is_rejected() {
        let surface = Rect::try_new(0.0, 0.0, 10.0, 10.0).unwrap();
        let config = NestConfig {
            spacing: 5.0,
            ..NestConfig::default()
        };
        assert!(NestingEngine::new(shapes(), config, surface, SmallRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn elapsed_matches_the_last_report() {
        let last = Rc::new(RefCell::new(None));
        let seen = last.clone();
        let mut engine = engine(config())
            .with_update_callback(move |report, _| *seen.borrow_mut() = Some(report.elapsed));
        assert_eq!(engine.elapsed(), Duration::ZERO);
        engine.start();
        engine.run();
        thread::sleep(Duration::from_millis(5));
        assert_eq!(Some(engine.elapsed()), *last.borrow());
    }

    #[test]
    fn non_finite_rotations_are_rejected() {
        let surface = Rect::try_new(0.0, 0.0, 100.0, 60.0).unwrap();
        let config = NestConfig {
            allowed_rotations: vec![0.0, f32::INFINITY],
            ..config()
        };
        assert!(NestingEngine::new(shapes(), config, surface, SmallRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn unapproximable_shapes_stay_unplaced() {
        let mut shapes = shapes();
        shapes.push(Arc::new(InlayShape::new("line", "M0,0 L10,10 Z")));
        let surface = Rect::try_new(0.0, 0.0, 100.0, 60.0).unwrap();
        let mut engine =
            NestingEngine::new(shapes, config(), surface, SmallRng::seed_from_u64(2)).unwrap();
        assert!(engine.outlines()[4].is_none());
        let report = engine.next_generation();
        assert_eq!(report.best.unplaced, 1);
        assert!(engine.best().unwrap().placements[4].is_none());
    }
}
