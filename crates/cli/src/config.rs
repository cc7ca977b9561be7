use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use tabshare_observability::LoggingConfig;
use tabshare_report::ReportConfig;
use tabshare_session::SessionConfig;

/// Whole config file; every section is optional.
///
/// ```toml
/// [session]
/// max_participants = 20
///
/// [report]
/// currency_symbol = "$"
///
/// [logging]
/// format = "pretty"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// `path` if given, otherwise defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}
