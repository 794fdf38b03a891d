use clap::Parser;

use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};

#[derive(Debug, Clone, Parser)]
#[command(name = "pricing-explain")]
#[command(about = "Explain a billable record's price against a pinned rate card")]
pub struct CliConfig {
    /// Path to the active rate card (TOML)
    #[arg(long, default_value = "./rates.toml")]
    pub rules: String,

    /// Path to the JSON records fixture
    #[arg(long, default_value = "./records.json")]
    pub records: String,

    /// Record kind: task or expense
    #[arg(long)]
    pub kind: String,

    /// Record id
    #[arg(long)]
    pub id: String,

    /// Pretty-print the explanation JSON
    #[arg(long)]
    pub pretty: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("rules", &self.rules)?;
        validate_path("records", &self.records)?;
        Ok(())
    }
}
