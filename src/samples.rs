use std::{error::Error, path::Path, time::Duration};

use bnb_tsp::{branch_and_bound, CostModel, SearchResult, SolverConfig};
use csv::WriterBuilder;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use crate::gen_points::{Mode, RandomInstanceGenerator};

/// One solved instance, flattened for export.
#[derive(Serialize, Clone, Debug)]
pub struct Row {
    n: usize,
    mode: String,
    instance: usize,
    initial_cost: f64,
    cost: f64,
    root_lower_bound: f64,
    seconds: f64,
    improvements: u64,
    optimal: bool,
    states_created: u64,
    pruned: u64,
    infeasible: u64,
    max_queue_len: usize,
}

impl Row {
    pub fn from_result(n: usize, mode: Mode, instance: usize, result: &SearchResult) -> Self {
        Row {
            n,
            mode: mode.to_string(),
            instance,
            initial_cost: result.initial.tour.cost().as_float(),
            cost: result.cost().as_float(),
            root_lower_bound: result.statistics.root_lower_bound.as_float(),
            seconds: result.elapsed.as_secs_f64(),
            improvements: result.improvements(),
            optimal: result.termination.is_optimal(),
            states_created: result.statistics.states_created,
            pruned: result.statistics.pruned,
            infeasible: result.statistics.infeasible,
            max_queue_len: result.statistics.max_queue_len,
        }
    }
}

pub struct SweepConfig {
    pub n_max: usize,
    pub step: usize,
    pub instances: usize,
    pub mode: Mode,
    pub time_limit: Duration,
    pub seed: Option<u64>,
}

/// Solves `instances` random instances for every size `step, 2 * step, ..., n_max` in parallel.
pub fn create_samples(config: &SweepConfig) -> Vec<Row> {
    let mut jobs = vec![];
    let mut n = config.step.max(1);
    while n <= config.n_max {
        let seed = config.seed.map(|s| s.wrapping_add(n as u64));
        let generator = RandomInstanceGenerator::new(n, config.mode, seed);
        for (instance, model) in generator.take(config.instances).enumerate() {
            jobs.push((n, instance, model));
        }
        n += config.step.max(1);
    }

    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar().template(
            "{msg} {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] ({pos}/{len})",
        ),
    );
    pb.enable_steady_tick(20);
    pb.set_message("Branch and bound");

    let solver_config = SolverConfig::default().with_time_limit(config.time_limit);
    let solver_config = match config.seed {
        Some(seed) => solver_config.with_seed(seed),
        None => solver_config,
    };
    let mode = config.mode;

    let rows: Vec<Row> = jobs
        .into_par_iter()
        .progress_with(pb)
        .filter_map(|(n, instance, model)| {
            match branch_and_bound(&model, &solver_config) {
                Ok(result) => Some(Row::from_result(model.n(), mode, instance, &result)),
                Err(err) => {
                    log::warn!("Skipping instance {} with {} points: {}", instance, n, err);
                    None
                }
            }
        })
        .collect();

    log::info!("Finished {} branch and bound runs.", rows.len());
    println!("Branch and bound: ✔️");
    rows
}

pub fn export<P: AsRef<Path>>(rows: Vec<Row>, path: P) -> Result<(), Box<dyn Error>> {
    log::info!("Exporting results to {:?}.", path.as_ref());
    let mut wtr = WriterBuilder::new().from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
