use clap::{Parser, Subcommand};
use sb_controller::{estimate, predict_level};
use sb_scenario::{ReplayReport, ScenarioResult, load, replay, validate_scenario};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "sb-cli")]
#[command(about = "Steam boiler controller - scenario replay tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and boiler parameters
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Replay a scenario through the controller
    Run {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the pump demand for one reading, using a scenario's boiler
    Estimate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Water level in litres
        #[arg(long)]
        level: f64,
        /// Steam output in litres/second
        #[arg(long, default_value_t = 0.0)]
        steam: f64,
    },
}

fn main() -> ScenarioResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Run {
            scenario_path,
            json,
        } => cmd_run(&scenario_path, json),
        Commands::Estimate {
            scenario_path,
            level,
            steam,
        } => cmd_estimate(&scenario_path, level, steam),
    }
}

fn cmd_validate(scenario_path: &Path) -> ScenarioResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = load(scenario_path)?;
    validate_scenario(&scenario)?;
    println!(
        "✓ Scenario '{}' is valid ({} pumps, {} cycles)",
        scenario.name,
        scenario.boiler.pump_count(),
        scenario.cycles.len()
    );
    Ok(())
}

fn cmd_run(scenario_path: &Path, json: bool) -> ScenarioResult<()> {
    let scenario = load(scenario_path)?;
    info!(path = %scenario_path.display(), cycles = scenario.cycles.len(), "scenario loaded");
    let report = replay(&scenario)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.passed() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_report(report: &ReplayReport) {
    println!("Replaying scenario: {}", report.name);
    for record in &report.cycles {
        let messages: Vec<String> = record.outputs.iter().map(ToString::to_string).collect();
        println!("  cycle {:>3}: {}", record.cycle, messages.join(", "));
    }
    println!("Final mode: {} ({})", report.final_mode, report.status);

    if report.passed() {
        println!("✓ All mode expectations met");
    } else {
        for failure in &report.failures {
            println!(
                "✗ cycle {}: expected {}, found {}",
                failure.cycle, failure.expected, failure.found
            );
        }
    }
}

fn cmd_estimate(scenario_path: &Path, level: f64, steam: f64) -> ScenarioResult<()> {
    let scenario = load(scenario_path)?;
    let config = &scenario.boiler;
    let demand = estimate(level, steam, config);

    println!("Level {:.1} L, steam {:.2} L/s", level, steam);
    println!(
        "  target band: {:.1} - {:.1} L (midpoint {:.1})",
        config.min_normal,
        config.max_normal,
        config.normal_midpoint()
    );
    println!(
        "  pumps to open: {} of {}",
        demand.pumps,
        config.pump_count()
    );
    println!(
        "  predicted level: {:.1} - {:.1} L",
        demand.predicted.min, demand.predicted.max
    );

    let idle = predict_level(level, steam, 0.0, config);
    println!(
        "  with all pumps closed: {:.1} - {:.1} L",
        idle.min, idle.max
    );
    Ok(())
}
