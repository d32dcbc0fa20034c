//! Command line entry point for the merit distributor.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use merit_engine::api::{AppState, create_router};
use merit_engine::calculation::allocate;
use merit_engine::config::{AllocationOptions, ConfigLoader};
use merit_engine::models::Allocation;

const DEFAULT_LOG_FILTER: &str = "merit_engine=info,merit_distributor=info";

#[derive(Parser)]
#[command(name = "merit-distributor")]
#[command(version)]
#[command(about = "Distribute a merit pool across employees")]
struct Cli {
    #[command(subcommand)]
    command: SubCmd,
}

#[derive(Subcommand)]
enum SubCmd {
    /// Allocate the pool for the employees in a YAML file
    Distribute {
        /// Distribution options file
        #[arg(long, default_value = "./distributor_options.yaml")]
        options: PathBuf,

        /// Employee records file
        #[arg(long, default_value = "./employees.yaml")]
        employees: PathBuf,

        /// Print the full allocation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the allocation API over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, env = "MERIT_BIND", default_value = "127.0.0.1:3000")]
        bind: String,

        /// Default options for requests that carry none
        #[arg(long)]
        options: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        SubCmd::Distribute {
            options,
            employees,
            json,
        } => distribute(&options, &employees, json),
        SubCmd::Serve { bind, options } => serve(&bind, options).await,
    }
}

fn distribute(options_path: &Path, employees_path: &Path, json: bool) -> anyhow::Result<()> {
    let loader = ConfigLoader::load(options_path, employees_path)?;
    let (employees, options) = loader.into_parts();
    let allocation = allocate(&employees, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&allocation)?);
    } else {
        print_report(&allocation);
    }
    Ok(())
}

fn print_report(allocation: &Allocation) {
    let percent = Decimal::ONE_HUNDRED;
    for result in &allocation.results {
        let mrp = match (result.current_perc_mrp, result.final_perc_mrp) {
            (Some(current), Some(new)) => format!(
                "{} MRP -> {} MRP, ",
                current.round_dp(3).normalize(),
                new.round_dp(3).normalize()
            ),
            _ => String::new(),
        };
        println!(
            "{}: ${} -> ${}, {}a {}% increase",
            result.name,
            result.current_salary,
            result.final_salary.round_dp(2),
            mrp,
            (result.perc_increase * percent).round_dp(3).normalize()
        );
    }
    for warning in &allocation.audit_trace.warnings {
        eprintln!("warning [{}]: {}", warning.code, warning.message);
    }
    if allocation.pool_remaining > Decimal::ZERO {
        println!("Pool Remaining: ${}", allocation.pool_remaining);
    }
}

async fn serve(bind: &str, options_path: Option<PathBuf>) -> anyhow::Result<()> {
    let options = match options_path {
        Some(path) => ConfigLoader::load_options(path)?,
        None => AllocationOptions::default(),
    };
    options.validate()?;

    let router = create_router(AppState::new(options));
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    info!(bind = %bind, "Merit distributor API listening");
    axum::serve(listener, router).await?;
    Ok(())
}
