//! SQL Sandbox - query gateway and practice UI.

use sql_sandbox::cli::{Cli, Command};
use sql_sandbox::config::Config;
use sql_sandbox::db::{self, apply_seed};
use sql_sandbox::error::{Result, SandboxError};
use sql_sandbox::sandbox::{self, GatewayClient};
use sql_sandbox::{gateway, logging, tui};
use std::process::ExitCode;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();

    match cli.command {
        Command::Ui(_) => logging::init_file_logging(),
        Command::Serve(_) | Command::Check(_) => logging::init_stderr_logging(),
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = resolve_config(&cli)?;

    match &cli.command {
        Command::Serve(args) => {
            info!("Database: {}", config.database.display_string());
            let db = db::connect_or_unavailable(&config.database).await;

            if args.seed {
                match apply_seed(db.as_ref()).await {
                    Ok(()) => info!("Seeded sample data"),
                    Err(e) => warn!("Failed to seed sample data: {}", e),
                }
            }

            gateway::run(&config.gateway, db).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Ui(_) => {
            tui::run(&config.sandbox).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check(args) => {
            let client = GatewayClient::new(config.sandbox.gateway_url())?;
            let mut stdout = std::io::stdout();
            let all_passed = sandbox::run_check(&client, args.query.as_deref(), &mut stdout)
                .await
                .map_err(|e| SandboxError::internal(format!("Failed to write report: {e}")))?;

            Ok(if all_passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

/// Builds the effective configuration.
///
/// Precedence: CLI flags, then the config file, then environment variables,
/// then built-in defaults.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());

    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_to(&mut config);
    config.apply_env_defaults()?;
    Ok(config)
}
