// Hive CLI - log in to the Hive API, inspect the account's hub, log out

mod exit_codes;
mod hub;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS};
use hub::ConfigArgs;

#[derive(Parser)]
#[command(name = "hive")]
#[command(about = "Hive smart-home API client")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Settings environment (default: "development")
    #[arg(long, global = true, env = "HIVE_ENV")]
    env: Option<String>,

    /// Settings file (default: <config dir>/hive/<env>.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, print the account's hub controller, log out
    #[command(after_help = "\
Examples:
  hive hub
  hive hub --json | jq .controller.name
  HIVE_ENV=production hive hub")]
    Hub {
        /// Print a single JSON object on stdout
        #[arg(long)]
        json: bool,
    },

    /// Log in and out to check the configured credentials
    Verify,

    /// Show the resolved settings (the password is never printed)
    Config {
        /// Print a single JSON object on stdout
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), "\nuser-agent: bg-hive-api/0.1.0")
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let args = ConfigArgs { env: cli.env, config: cli.config };

    let result = match cli.command {
        Commands::Hub { json } => hub::cmd_hub(&args, json),
        Commands::Verify => hub::cmd_verify(&args),
        Commands::Config { json } => hub::cmd_config(&args, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn error(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_version_names_user_agent() {
        let version = long_version();
        assert!(version.starts_with(env!("CARGO_PKG_VERSION")));
        assert!(version.ends_with(hive_hub_client::USER_AGENT));
    }
}
