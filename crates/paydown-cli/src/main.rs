mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::compare::CompareArgs;

/// Compare paying down debt against investing
#[derive(Parser)]
#[command(
    name = "pdn",
    version,
    about = "Compare paying down debt against investing",
    long_about = "Runs the loan-first, invest-first, and split allocation scenarios \
                  over a monthly budget and horizon, optionally with Monte Carlo \
                  sampling of investment returns, and recommends the scenario with \
                  the highest final net worth."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the three-scenario comparison
    Compare(CompareArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Version => {
            println!("pdn {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
