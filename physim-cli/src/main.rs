mod viewer;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use physim_core::diagnostics::format_parse_error;
use physim_core::{analyze_scenario, parse_scenario, run_scenario, RuntimeError};
use std::fs;
use std::path::PathBuf;
use viewer::ViewerApp;

#[derive(Parser)]
#[command(name = "physim")]
#[command(about = "physim - N-body simulation of point masses and charges", long_about = None)]
struct Cli {
    /// Log engine progress at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a scenario and play back the trajectories
    Run {
        /// Path to the scenario file
        file: PathBuf,

        /// Print final states instead of opening the viewer
        #[arg(long)]
        headless: bool,
    },
    /// Parse and analyze a scenario without running it
    Check {
        /// Path to the scenario file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    let outcome = match cli.command {
        Commands::Run { file, headless: true } => run_headless(&file),
        Commands::Run { file, headless: false } => run_viewer(file),
        Commands::Check { file } => check_file(&file),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_headless(file: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(file)?;
    let result = run_scenario(&source).map_err(|e| describe(e, &source))?;

    for body in &result.bodies {
        println!(
            "{}: samples = {} position = {:?} velocity = {:?}",
            body.name, body.samples, body.position, body.velocity
        );
    }
    println!("kinetic energy = {:e}", result.kinetic_energy);
    println!("momentum = {:?}", result.momentum);

    Ok(())
}

fn run_viewer(file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    // Fail fast on a broken scenario instead of opening an empty window
    let source = fs::read_to_string(&file)?;
    parse_scenario(&source).map_err(|e| format_parse_error(&e, &source))?;

    let title = format!("physim - {}", file.display());
    eframe::run_native(
        &title,
        eframe::NativeOptions::default(),
        Box::new(|cc| Ok(Box::new(ViewerApp::new(file, cc)))),
    )?;
    Ok(())
}

fn check_file(file: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(file)?;
    let scenario = parse_scenario(&source).map_err(|e| format_parse_error(&e, &source))?;
    let diagnostics = analyze_scenario(&scenario);

    for diagnostic in diagnostics.iter() {
        println!("{}", diagnostic.render(&source));
    }
    if diagnostics.has_errors() {
        return Err(format!("{} has errors", file.display()).into());
    }

    println!(
        "{}: {} bodies, D = {}, physics [{}]",
        file.display(),
        scenario.bodies.len(),
        scenario.simulate.dims,
        scenario.physics
    );
    Ok(())
}

/// Attach source context to parse errors
fn describe(error: RuntimeError, source: &str) -> String {
    match error {
        RuntimeError::Parse(e) => format_parse_error(&e, source),
        other => other.to_string(),
    }
}
