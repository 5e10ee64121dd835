use crate::app::report::OutputFormat;
use crate::app::session::TableSource;
use crate::config::toml_config::TomlConfig;
use crate::config::Settings;
use crate::domain::model::{DateLocale, RecomputePolicy};
use crate::utils::error::{DrrError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "drr-table")]
#[command(about = "Daily Run Rate table: derive included days and expected DRR, then save")]
pub struct CliConfig {
    /// TOML edit script to replay into a fresh table
    #[arg(long, conflicts_with = "payload", required_unless_present = "payload")]
    pub script: Option<String>,

    /// Previously saved JSON payload to load
    #[arg(long)]
    pub payload: Option<String>,

    /// TOML config file
    #[arg(long)]
    pub config: Option<String>,

    /// Save endpoint, overrides the config file
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long, value_enum)]
    pub locale: Option<DateLocale>,

    #[arg(long, value_enum)]
    pub policy: Option<RecomputePolicy>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Write the report here instead of stdout
    #[arg(long)]
    pub output: Option<String>,

    /// POST the table to the endpoint after rendering
    #[arg(long)]
    pub save: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    pub fn source(&self) -> Result<TableSource> {
        match (&self.script, &self.payload) {
            (Some(path), _) => Ok(TableSource::Script(path.clone())),
            (None, Some(path)) => Ok(TableSource::Payload(path.clone())),
            (None, None) => Err(DrrError::ConfigError {
                message: "one of --script or --payload is required".to_string(),
            }),
        }
    }

    pub fn settings(&self) -> Result<Settings> {
        let base = match &self.config {
            Some(path) => {
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                Settings::from_toml(&file)
            }
            None => Settings::default(),
        };

        Ok(base.with_overrides(self.endpoint.clone(), self.locale, self.policy))
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(output) = &self.output {
            validation::validate_path("output", output)?;
        }
        self.source().map(|_| ())
    }
}
