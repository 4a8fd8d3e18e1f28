//! Run-time configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::*;
use crate::utils::validation::{validate_company_name, validate_currency_code};

/// Environment variable overriding the target currency
pub const ENV_TARGET_CURRENCY: &str = "YEARLY_DATA_TARGET_CURRENCY";
/// Environment variable overriding the designated company
pub const ENV_COMPANY: &str = "YEARLY_DATA_COMPANY";
/// Environment variable overriding the report output directory
pub const ENV_OUTPUT_DIR: &str = "YEARLY_DATA_OUTPUT_DIR";

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Currency every value is converted into
    pub target_currency: String,
    /// Company whose cumulative total is reported
    pub designated_company: String,
    pub output: OutputConfig,
}

/// Where report artifacts are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub data_dir: PathBuf,
    pub monthly_highest_file: String,
    pub total_file: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_currency: "SEK".to_string(),
            designated_company: "Nexara Technologies".to_string(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("outputs/data"),
            monthly_highest_file: "monthly_highest_sek.csv".to_string(),
            total_file: "total_nexara_sek.txt".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn monthly_highest_path(&self) -> PathBuf {
        self.data_dir.join(&self.monthly_highest_file)
    }

    pub fn total_path(&self) -> PathBuf {
        self.data_dir.join(&self.total_file)
    }
}

impl PipelineConfig {
    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(text: &str) -> PipelineResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> PipelineResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> PipelineResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(currency) = lookup(ENV_TARGET_CURRENCY) {
            self.target_currency = currency;
        }
        if let Some(company) = lookup(ENV_COMPANY) {
            self.designated_company = company;
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output.data_dir = PathBuf::from(dir);
        }
        self.validate()
    }

    pub fn validate(&self) -> PipelineResult<()> {
        validate_currency_code(&self.target_currency)?;
        validate_company_name(&self.designated_company)?;
        if self.output.monthly_highest_file.trim().is_empty()
            || self.output.total_file.trim().is_empty()
        {
            return Err(PipelineError::Config(
                "Output file names cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
