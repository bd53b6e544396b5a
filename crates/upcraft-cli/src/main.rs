//! Command-line front end: load a plan file, solve it, print the report.

mod report;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use upcraft_core::PlanError;
use upcraft_core::solve_plan;
use upcraft_data::{ConfigLoadError, load_plan};

#[derive(Parser)]
#[command(name = "upcraft", version, about = "Quality-upgrade production optimizer")]
struct Args {
    /// Path to the plan file (RON, JSON, or TOML)
    plan: PathBuf,

    /// Write the active variant table as CSV
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Require exactly the demanded amount instead of at least
    #[arg(long)]
    exact: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Load(#[from] ConfigLoadError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("export failed: {0}")]
    Export(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Bad inputs exit with 2, solve failures with 1.
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Load(_) | CliError::Export(_) | CliError::Io(_) => ExitCode::from(2),
            CliError::Plan(_) => ExitCode::from(1),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            err.exit_code()
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let mut resolved = load_plan(&args.plan)?;
    if args.exact {
        resolved.config.demand.exact = true;
    }

    tracing::info!(plan = %args.plan.display(), "solving");
    let plan = solve_plan(&resolved.catalog, &resolved.config)?;

    let stdout = std::io::stdout();
    report::write_report(&mut stdout.lock(), &resolved.catalog, &plan)?;

    if let Some(path) = &args.output {
        report::export_csv(path, &resolved.catalog, &plan)?;
        tracing::info!(output = %path.display(), "wrote variant table");
    }
    Ok(())
}

/// RUST_LOG wins when set; otherwise -v flags pick the level.
fn init_logging(verbosity: u8) {
    let fallback = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
