mod gen_points;
mod samples;
mod tour_io;

use std::{error::Error, path::PathBuf, time::Duration};

use bnb_tsp::{BranchAndBound, SolverConfig};
use clap::{Args, Parser};
use gen_points::{Mode, RandomInstanceGenerator};
use samples::{create_samples, export, SweepConfig};
use tour_io::{export_tour, import_tour};

#[derive(Parser)]
#[clap(about = "Branch and bound experiments for the traveling salesperson problem")]
enum Cli {
    Solve(Solve),
    Sweep(Sweep),
}

#[derive(Args)]
struct LogOptions {
    /// Level of the file log in logs/
    #[clap(long, default_value = "info")]
    log_level: log::LevelFilter,
}

/// Solves one random instance and prints the result
#[derive(Args)]
struct Solve {
    #[clap(short, long, default_value = "15")]
    num_points: usize,

    #[clap(short, long)]
    seed: Option<u64>,

    /// Time budget in seconds
    #[clap(short, long, default_value = "60")]
    time_limit: f64,

    #[clap(long, default_value = "easy")]
    mode: Mode,

    /// Compare against a tour stored in a file
    #[clap(short, long, parse(from_os_str))]
    read_tour: Option<PathBuf>,

    /// Export the best tour
    #[clap(short, long, parse(from_os_str))]
    write_tour: Option<PathBuf>,

    #[clap(flatten)]
    log: LogOptions,
}

/// Solves many random instances of growing size and exports one row per run
#[derive(Args)]
struct Sweep {
    n_max: usize,

    #[clap(long, default_value = "5")]
    step: usize,

    #[clap(short, long, default_value = "10")]
    instances: usize,

    #[clap(short, long)]
    seed: Option<u64>,

    /// Time budget in seconds per instance
    #[clap(short, long, default_value = "10")]
    time_limit: f64,

    #[clap(long, default_value = "easy")]
    mode: Mode,

    #[clap(short, long, default_value = "results.csv", parse(from_os_str))]
    output: PathBuf,

    #[clap(flatten)]
    log: LogOptions,
}

fn set_up_logging(level: log::LevelFilter) -> Result<(), fern::InitError> {
    std::fs::create_dir_all("logs")?;
    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date}][{level}] {message}",
                date = chrono::Local::now().format("%H:%M:%S"),
                level = record.level(),
                message = message
            ));
        })
        .level(level)
        .chain(fern::log_file(format!(
            "logs/{}.log",
            chrono::Local::now().format("%d%m%Y-%H%M")
        ))?)
        .apply()?;

    log::info!("Logger set up!");

    Ok(())
}

fn time_limit(seconds: f64) -> Result<Duration, Box<dyn Error>> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("invalid time limit: {}", seconds).into());
    }
    Ok(Duration::from_secs_f64(seconds))
}

fn solve(solve: Solve) -> Result<(), Box<dyn Error>> {
    let model = RandomInstanceGenerator::new(solve.num_points, solve.mode, solve.seed)
        .next()
        .ok_or("instance generator is exhausted")?;

    let mut config = SolverConfig::default().with_time_limit(time_limit(solve.time_limit)?);
    if let Some(seed) = solve.seed {
        config = config.with_seed(seed);
    }

    let result = BranchAndBound::new(&model, config).solve()?;
    println!("{}", result);
    println!(
        "tour: {}",
        result
            .tour
            .points()
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<String>>()
            .join(" ")
    );

    if let Some(path) = solve.read_tour {
        let tour = import_tour(&path, &model)?;
        println!(
            "stored tour: {} ({:+} relative to branch and bound)",
            tour.cost(),
            tour.cost().as_float() - result.cost().as_float()
        );
    }
    if let Some(path) = solve.write_tour {
        export_tour(&path, &result.tour)?;
        log::info!("Wrote tour to {:?}.", path);
    }
    Ok(())
}

fn sweep(sweep: Sweep) -> Result<(), Box<dyn Error>> {
    let config = SweepConfig {
        n_max: sweep.n_max,
        step: sweep.step,
        instances: sweep.instances,
        mode: sweep.mode,
        time_limit: time_limit(sweep.time_limit)?,
        seed: sweep.seed,
    };
    let rows = create_samples(&config);
    if rows.is_empty() {
        println!("No instance could be solved.");
        return Ok(());
    }
    export(rows, &sweep.output)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli {
        Cli::Solve(s) => {
            set_up_logging(s.log.log_level)?;
            solve(s)?
        }
        Cli::Sweep(s) => {
            set_up_logging(s.log.log_level)?;
            sweep(s)?
        }
    }
    Ok(())
}
