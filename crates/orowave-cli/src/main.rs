//! Orowave command-line interface.
//!
//! Solve linear buoyancy-wave problems from TOML job files:
//! ```sh
//! orowave-cli run job.toml
//! orowave-cli validate job.toml
//! orowave-cli variables
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "orowave-cli")]
#[command(about = "Orowave: Spectral Linear Buoyancy-Wave Solver")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a job from a TOML configuration file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without solving.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Display the flow variables that can be requested.
    Variables,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Orowave Wave Solver");
            println!("===================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let result = runner::run_job(&job)?;

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            let csv_path = out_dir.join(format!("{}.csv", result.variable.symbol()));
            runner::write_field_csv(&result, &csv_path, &job)?;

            if job.output.save_json {
                let json_path = out_dir.join(format!("{}.json", result.variable.symbol()));
                runner::write_field_json(&result, &json_path)?;
            }

            println!("Solve complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            // Building the grid and terrain exercises the numeric
            // preconditions without running a solve.
            runner::build_terrain(&job)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Variables => {
            println!("Available flow variables:");
            println!();
            println!("  eta — Vertical streamline displacement (m)");
            println!("  w   — Vertical velocity perturbation (m/s)");
            println!("  u   — Horizontal velocity perturbation (m/s), one-layer models only");
            println!("  p   — Kinematic pressure perturbation (m²/s²), one-layer models only");
            Ok(())
        }
    }
}
