//! Command-line argument parsing for SQL Sandbox.
//!
//! Uses clap derive. Flags given here override the config file and the
//! environment.

use crate::config::{Config, DatabaseConfig};
use crate::db::DatabaseBackend;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// A SQL learning sandbox: query gateway and practice UI.
#[derive(Parser, Debug)]
#[command(name = "sqlsandbox")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// What to run.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the query gateway HTTP server
    Serve(ServeArgs),
    /// Open the terminal sandbox UI
    Ui(SandboxArgs),
    /// Run the test cases against the gateway and report verdicts
    Check(CheckArgs),
}

/// Database connection flags.
#[derive(Args, Debug, Default)]
pub struct DatabaseArgs {
    /// Database backend (mysql, postgres, sqlite)
    #[arg(long, value_name = "BACKEND")]
    pub backend: Option<DatabaseBackend>,

    /// Database host
    #[arg(short = 'H', long = "db-host", value_name = "HOST")]
    pub host: Option<String>,

    /// Database port
    #[arg(long = "db-port", value_name = "PORT")]
    pub db_port: Option<u16>,

    /// Database user
    #[arg(short = 'U', long = "db-user", value_name = "USER")]
    pub user: Option<String>,

    /// Database password
    #[arg(long = "db-password", value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Database name (a file path or :memory: for sqlite)
    #[arg(short = 'd', long = "db-name", value_name = "DATABASE")]
    pub database: Option<String>,
}

impl DatabaseArgs {
    /// Converts the flags to a partial database config.
    pub fn to_database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            backend: self.backend,
            host: self.host.clone(),
            port: self.db_port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
        }
    }
}

/// Flags for `serve`.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Port to listen on
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Recreate the employees table with its sample rows before serving
    #[arg(long)]
    pub seed: bool,
}

/// Flags shared by `ui` and `check`.
#[derive(Args, Debug, Default)]
pub struct SandboxArgs {
    /// Gateway base URL
    #[arg(short = 'g', long, value_name = "URL")]
    pub gateway: Option<String>,

    /// Table whose schema is shown
    #[arg(long, value_name = "TABLE")]
    pub table: Option<String>,
}

/// Flags for `check`.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub sandbox: SandboxArgs,

    /// Run this query first, as if executed from the editor
    #[arg(short = 'q', long, value_name = "SQL")]
    pub query: Option<String>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Overlays the flags of the chosen subcommand onto `config`.
    pub fn apply_to(&self, config: &mut Config) {
        match &self.command {
            Command::Serve(args) => {
                config.database.merge(&args.database.to_database_config());
                if args.port.is_some() {
                    config.gateway.port = args.port;
                }
                if args.bind.is_some() {
                    config.gateway.bind = args.bind.clone();
                }
            }
            Command::Ui(args) => args.apply_to(config),
            Command::Check(args) => args.sandbox.apply_to(config),
        }
    }
}

impl SandboxArgs {
    fn apply_to(&self, config: &mut Config) {
        if self.gateway.is_some() {
            config.sandbox.gateway_url = self.gateway.clone();
        }
        if self.table.is_some() {
            config.sandbox.reference_table = self.table.clone();
        }
    }
}
