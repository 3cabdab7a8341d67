//! Workgate CLI - validate workflow transitions from the command line

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use workgate::cli::{Cli, Commands};
use workgate::errors::{to_exit_code, EXIT_REJECTED};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over the verbosity flags
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error [{}]: {}", e.code(), e);
            std::process::exit(to_exit_code(&e));
        }
    }
}

fn run(cli: Cli) -> workgate::Result<i32> {
    match cli.command {
        Some(Commands::Init { force }) => {
            workgate::cli::commands::init::run(cli.cwd.as_deref(), force)?;
            Ok(0)
        }
        Some(Commands::Check {
            fixture,
            entity,
            to,
            justification,
            json,
        }) => {
            let Some((kind, id)) = entity.selected() else {
                return Err(workgate::WorkgateError::wrap(
                    "select exactly one of --project, --work-item or --task",
                    "check",
                ));
            };
            let result = workgate::cli::commands::check::run(
                cli.cwd.as_deref(),
                &fixture,
                kind,
                id,
                to,
                justification.as_deref(),
                json,
            )?;
            Ok(if result.valid { 0 } else { EXIT_REJECTED })
        }
        Some(Commands::Transitions { kind, from, json }) => {
            workgate::cli::commands::transitions::run(kind, from, json)?;
            Ok(0)
        }
        Some(Commands::NextPhase {
            fixture,
            work_item,
            json,
        }) => {
            workgate::cli::commands::next_phase::run(cli.cwd.as_deref(), &fixture, work_item, json)?;
            Ok(0)
        }
        None => {
            // Default to showing help - clap handles this
            println!("Use --help for usage information");
            Ok(0)
        }
    }
}
