use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use diem_prefund::config::DEFAULT_CONFIG_PATH;
use diem_prefund::{derive_accounts, AccountFunder, FunderSettings, TestnetFaucet};

#[derive(Parser)]
#[command(name = "diem-prefund")]
#[command(about = "Mint testnet funds into the prefunded accounts of a Rosetta config", version)]
struct Cli {
    /// Rosetta configuration file listing the prefunded accounts
    #[arg(short, long, global = true, env = "PREFUND_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Optional TOML file overriding the testnet defaults; checked by every command
    #[arg(short, long, global = true, env = "PREFUND_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint funds into every prefunded account (default)
    Fund,

    /// Print the auth key and address of every prefunded account
    Derive,

    /// Write the effective settings (defaults plus any --settings overrides) to a TOML file
    Init {
        /// Output path for the settings file
        #[arg(short, long, default_value = "funder.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diem_prefund=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let settings = FunderSettings::load_or_default(cli.settings.as_deref())?;

    match cli.command.unwrap_or(Commands::Fund) {
        Commands::Fund => {
            run_fund(&cli.config, settings).await?;
        }
        Commands::Derive => {
            run_derive(&cli.config)?;
        }
        Commands::Init { output } => {
            settings.save(&output)?;
            info!("Settings file created at: {}", output.display());
        }
    }

    Ok(())
}

async fn run_fund(config: &Path, settings: FunderSettings) -> Result<()> {
    info!("Faucet: {}", settings.faucet.faucet_url);

    let faucet = TestnetFaucet::new(settings.faucet).context("failed to build faucet client")?;
    let funder = AccountFunder::new(settings.funding, faucet);

    let report = funder
        .run(config)
        .await
        .context("funding prefunded accounts")?;

    info!(
        "Done: {} account(s), {} units minted, {} faucet transaction(s)",
        report.len(),
        report.total_minted(),
        report.total_transactions()
    );
    Ok(())
}

fn run_derive(config: &Path) -> Result<()> {
    let accounts = derive_accounts(config).context("deriving prefunded accounts")?;

    for (index, account) in accounts.iter().enumerate() {
        println!("#{} auth_key={} address={}", index, account.auth_key(), account.address());
    }

    Ok(())
}
