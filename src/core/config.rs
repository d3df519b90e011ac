use super::FundRecord;
use super::numeric::{coerce_amount, deserialize_amount};
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

fn default_currency() -> String {
    "₹".to_string()
}

/// Portfolio state: the fund list and the periodic contribution.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Symbol used when displaying amounts.
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub contribution: f64,
    #[serde(default)]
    pub funds: Vec<FundRecord>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: default_currency(),
            contribution: 20000.0,
            funds: vec![
                FundRecord::new("Small Cap Fund", 0.0, 15.0, 40.0),
                FundRecord::new("Flexi Cap Fund", 0.0, 12.0, 30.0),
                FundRecord::new("Mid Cap / Focused", 0.0, 18.0, 30.0),
            ],
        }
    }
}

impl AppConfig {
    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "sipbal", "sipbal")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!(funds = config.funds.len(), "Successfully loaded config");
        Ok(config)
    }

    pub fn save_to_path<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let config_str = serde_yaml::to_string(self).context("Failed to serialize config")?;
        fs::write(path, config_str)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    pub fn fund(&self, name: &str) -> Option<&FundRecord> {
        self.funds.iter().find(|f| f.name == name)
    }

    pub fn fund_mut(&mut self, name: &str) -> Option<&mut FundRecord> {
        self.funds.iter_mut().find(|f| f.name == name)
    }

    /// Appends a fund, rejecting blank and duplicate names. A negative or
    /// non-finite value is stored as `0.0`.
    pub fn add_fund(&mut self, fund: FundRecord) -> Result<()> {
        let name = fund.name.trim();
        if name.is_empty() {
            bail!("Fund name must not be empty");
        }
        if self.fund(name).is_some() {
            bail!("Fund '{name}' already exists");
        }
        let fund = FundRecord {
            name: name.to_string(),
            current_value: coerce_amount(fund.current_value),
            ..fund
        };
        self.funds.push(fund);
        Ok(())
    }

    pub fn remove_fund(&mut self, name: &str) -> Result<FundRecord> {
        let index = self
            .funds
            .iter()
            .position(|f| f.name == name)
            .with_context(|| format!("No fund named '{name}'"))?;
        Ok(self.funds.remove(index))
    }
}
