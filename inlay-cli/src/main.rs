use std::fs;

use anyhow::{Context, Result, bail};
use clap::Parser as ClapParser;
use inlay_cli::config::InlayConfig;
use inlay_cli::io::cli::Cli;
use inlay_cli::io::output::NestOutput;
use inlay_cli::io;
use inlay_nest::engine::NestingEngine;
use inlay_nest::io::export::export_solution;
use inlay_nest::io::import::import_instance;
use inlay_nest::io::svg::layout_to_svg;
use log::{info, warn};
use rand::SeedableRng;
use rand::prelude::SmallRng;
use thousands::Separable;

/// Generations between two progress messages
const PROGRESS_INTERVAL: usize = 25;

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config: InlayConfig = match args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            InlayConfig::default()
        }
        Some(config_file) => io::read_config(&config_file)?,
    };

    info!("Successfully parsed InlayConfig: {config:?}");

    let input_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .context("input file has no valid name")?
        .to_owned();

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder).with_context(|| {
            format!("could not create solution folder: {:?}", args.solution_folder)
        })?;
    }

    let ext_instance = io::read_instance(&args.input_file)?;
    let instance = import_instance(&ext_instance)?;
    if instance.shapes.is_empty() {
        bail!("instance {} has no closed shapes to nest", instance.name);
    }

    let nest_config = &config.nest_config;
    let shape_area = instance.shape_area(nest_config.flatten_tolerance);
    info!(
        "[MAIN] shapes cover {:.1}% of the surface",
        shape_area / instance.surface.area() * 100.0
    );

    let rng = match nest_config.prng_seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let population_size = nest_config.population_size;

    let mut engine = NestingEngine::new(
        instance.shapes.clone(),
        nest_config.clone(),
        instance.surface,
        rng,
    )?
    .with_update_callback(move |report, _| {
        if report.generation % PROGRESS_INTERVAL == 0 {
            info!(
                "[MAIN] {} layouts evaluated in {:.1}s, best score {:.4}",
                (report.generation * population_size).separate_with_commas(),
                report.elapsed.as_secs_f64(),
                report.best.score
            );
        }
    });

    engine.start();
    let best = engine
        .run()
        .cloned()
        .context("nesting engine produced no layout")?;

    let solution = export_solution(
        &instance.name,
        &best,
        engine.generation,
        engine.elapsed(),
    );
    info!(
        "[MAIN] {}/{} shapes placed with {} collisions after {} generations",
        solution.placements.len(),
        instance.shapes.len(),
        solution.collisions,
        engine.generation.separate_with_commas()
    );

    {
        let output = NestOutput {
            instance: ext_instance,
            solution,
            config: config.clone(),
        };
        let solution_path = args.solution_folder.join(format!("sol_{input_stem}.json"));
        io::write_json(&output, &solution_path)?;
    }

    {
        let svg_path = args.solution_folder.join(format!("sol_{input_stem}.svg"));
        let svg = layout_to_svg(
            &best,
            &instance.surface,
            config.svg_draw_options,
            &instance.name,
        );
        io::write_svg(&svg, &svg_path)?;
    }

    Ok(())
}
