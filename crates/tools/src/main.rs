use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tools::{RunOptions, Scenario, ToolError, render_text, run_scenario};
use tracing::error;
use tracing_subscriber::EnvFilter;
use tracking::MaterializationOrder;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Order {
    Fifo,
    Lifo,
}

/// Place geo annotations around an origin and print where they land.
#[derive(Debug, Parser)]
#[command(name = "geoanchor", version)]
struct Args {
    /// Scenario JSON: origin, optional config, and annotations.
    scenario: PathBuf,
    /// Override the minimum anchor distance (meters).
    #[arg(long)]
    min_distance: Option<f64>,
    /// Override the maximum anchor distance (meters).
    #[arg(long)]
    max_distance: Option<f64>,
    /// Order in which the simulated session materializes anchors.
    #[arg(long, value_enum, default_value_t = Order::Fifo)]
    order: Order,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Args::parse()) {
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(args: Args) -> Result<(), ToolError> {
    let scenario = Scenario::load(&args.scenario)?;
    let options = RunOptions {
        min_distance_m: args.min_distance,
        max_distance_m: args.max_distance,
        order: match args.order {
            Order::Fifo => MaterializationOrder::Fifo,
            Order::Lifo => MaterializationOrder::Lifo,
        },
    };
    let report = run_scenario(&scenario, options)?;

    match args.format {
        Format::Text => print!("{}", render_text(&report)),
        Format::Json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| ToolError::Parse(e.to_string()))?;
            println!("{json}");
        }
    }
    Ok(())
}
