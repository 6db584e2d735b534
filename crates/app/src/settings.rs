//! Settings for the `billsplit` binary.
//!
//! Sources, lowest priority first: the optional TOML file (`billsplit.toml`
//! unless `--config` says otherwise), `BILLSPLIT_*` environment variables and
//! finally command line flags.
use clap::Parser;
use engine::{Currency, SettlementMode};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "billsplit";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Path of the session JSON file.
    pub session: String,
    pub mode: SettlementMode,
    pub currency: Currency,
    /// Log level for the workspace crates.
    pub level: String,
    /// Print the settlement as JSON instead of tables.
    pub json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session: "session.json".to_string(),
            mode: SettlementMode::Pairwise,
            currency: Currency::Inr,
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "billsplit", about = "Split shared expenses and settle up")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Session file (JSON) with participants and expenses.
    #[arg(long)]
    session: Option<String>,
    /// Settlement mode: `pairwise` or `minimal`.
    #[arg(long)]
    mode: Option<String>,
    /// Currency used to render amounts (INR, EUR, USD).
    #[arg(long)]
    currency: Option<String>,
    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    level: Option<String>,
    /// Print the settlement as JSON.
    #[arg(long)]
    json: bool,
}

pub fn load() -> Result<Settings> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let builder = config::Config::builder()
        .add_source(config::File::with_name(config_path).required(false))
        .add_source(config::Environment::with_prefix("BILLSPLIT"));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(session) = args.session {
        settings.session = session;
    }
    if let Some(mode) = args.mode.as_deref() {
        settings.mode = SettlementMode::try_from(mode)?;
    }
    if let Some(currency) = args.currency.as_deref() {
        settings.currency = Currency::try_from(currency)?;
    }
    if let Some(level) = args.level {
        settings.level = level;
    }
    if args.json {
        settings.json = true;
    }

    Ok(settings)
}
