#![forbid(unsafe_code)]

mod generate;
mod plan;
mod render;

use clap::{Parser, Subcommand};
use std::env;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "formwork: 模板周轉與採購規劃",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Compute the minimal formwork sets for an events table",
        after_help = "EXAMPLES:\n    formwork plan structural_elements.csv --cooldown 7\n\n    formwork plan elements.csv --config plan.toml --by-zone --json"
    )]
    Plan(plan::PlanArgs),

    #[command(
        about = "Write a synthetic events table",
        after_help = "EXAMPLES:\n    formwork generate structural_elements.csv --seed 42"
    )]
    Generate(generate::GenerateArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("FORMWORK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "formwork=debug,info"
        } else {
            "warn"
        })
    });

    let format = env::var("FORMWORK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "pretty" => {
            registry
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Plan(ref args) => plan::run_plan(args),
        Commands::Generate(ref args) => generate::run_generate(args),
    }
}
