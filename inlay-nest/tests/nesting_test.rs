#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::BufReader;
    use std::time::Duration;

    use anyhow::Result;
    use rand::SeedableRng;
    use rand::prelude::SmallRng;
    use test_case::test_case;

    use inlay_nest::engine::{NestConfig, NestingEngine, Termination};
    use inlay_nest::entities::Instance;
    use inlay_nest::io::ext_repr::ExtInstance;
    use inlay_nest::io::export::export_solution;
    use inlay_nest::io::import::import_instance;
    use inlay_nest::io::svg::{SvgDrawOptions, layout_to_svg};
    use inlay_nest::util::assertions;

    const INSTANCE_PATH: &str = "../assets/rosette.json";

    fn init_logger() {
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .is_test(true)
            .try_init();
    }

    fn read_instance() -> Result<Instance> {
        let file = File::open(INSTANCE_PATH)?;
        let ext_instance: ExtInstance = serde_json::from_reader(BufReader::new(file))?;
        import_instance(&ext_instance)
    }

    #[test]
    fn import_skips_open_shapes() -> Result<()> {
        init_logger();
        let instance = read_instance()?;
        assert_eq!(instance.shapes.len(), 11);
        assert!(instance.shapes.iter().all(|s| s.id != "stem"));
        assert!(instance.shape_area(0.5) < instance.surface.area());
        Ok(())
    }

    #[test_case(0; "seed 0")]
    #[test_case(42; "seed 42")]
    fn nesting_run(seed: u64) -> Result<()> {
        init_logger();
        let instance = read_instance()?;
        let config = NestConfig {
            population_size: 20,
            tick_interval_ms: 1,
            max_generations: Some(40),
            time_limit_s: Some(30),
            spacing: 1.0,
            prng_seed: Some(seed),
            ..NestConfig::default()
        };
        let inner = instance.surface.resize_by(-1.0, -1.0).unwrap();

        let mut engine = NestingEngine::new(
            instance.shapes.clone(),
            config,
            instance.surface,
            SmallRng::seed_from_u64(seed),
        )?
        .with_update_callback(move |_, best| {
            assert!(assertions::individual_within_surface(best, &inner));
        });

        engine.start();
        let best = engine.run().cloned().expect("a best individual after running");

        assert!(!engine.is_running());
        assert!(matches!(
            engine.termination(),
            Some(Termination::MaxGenerations | Termination::Converged | Termination::TimeLimit)
        ));
        assert_eq!(best.n_placed(), instance.shapes.len());

        let solution = export_solution(&instance.name, &best, engine.generation, Duration::ZERO);
        assert_eq!(solution.placements.len(), instance.shapes.len());
        assert!(solution.unplaced.is_empty());

        let svg = layout_to_svg(&best, &instance.surface, SvgDrawOptions::default(), "test")
            .to_string();
        assert_eq!(svg.matches("<path").count(), instance.shapes.len() + 1);
        Ok(())
    }

    #[test]
    fn same_seed_same_layout() -> Result<()> {
        init_logger();
        let instance = read_instance()?;
        let config = NestConfig {
            population_size: 10,
            ..NestConfig::default()
        };
        let run = || -> Result<_> {
            let mut engine = NestingEngine::new(
                instance.shapes.clone(),
                config.clone(),
                instance.surface,
                SmallRng::seed_from_u64(7),
            )?;
            for _ in 0..5 {
                engine.next_generation();
            }
            Ok(engine.best().map(|b| b.placements.clone()))
        };
        assert_eq!(run()?, run()?);
        Ok(())
    }
}
