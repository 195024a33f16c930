use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxr::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxr::AppCommand {
    fn from(cmd: Commands) -> fxr::AppCommand {
        match cmd {
            Commands::Names => fxr::AppCommand::Names,
            Commands::Rates => fxr::AppCommand::Rates,
            Commands::Convert { from, to, amount } => fxr::AppCommand::Convert {
                from: from.to_uppercase(),
                to: to.to_uppercase(),
                amount,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List known currency codes and names
    Names,
    /// Display the current exchange rate table
    Rates,
    /// Convert an amount between two currencies
    Convert {
        /// Currency code to convert from, e.g. USD
        from: String,
        /// Currency code to convert to, e.g. EUR
        to: String,
        /// Amount to convert
        amount: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => fxr::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = fxr::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
provider:
  base_url: "https://openexchangerates.org"
  # Get a key at https://openexchangerates.org/signup
  app_id: "YOUR_APP_ID"

base_currency: "USD"
refresh_interval_secs: 3600
fetch_timeout_secs: 10
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
