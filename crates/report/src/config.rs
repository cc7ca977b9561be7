use serde::{Deserialize, Serialize};

/// `[report]` section of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Prefix for every amount (`"S/. 12.50"`).
    pub currency_symbol: String,
    pub title: String,
    /// `chrono` strftime pattern for the generation date.
    pub date_format: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "S/.".to_string(),
            title: "Shared Expense Summary".to_string(),
            date_format: "%B %-d, %Y".to_string(),
        }
    }
}

impl ReportConfig {
    pub fn money(&self, amount: impl core::fmt::Display) -> String {
        if self.currency_symbol.is_empty() {
            amount.to_string()
        } else {
            format!("{} {amount}", self.currency_symbol)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_prefix_is_optional() {
        let mut config = ReportConfig::default();
        assert_eq!(config.money("5.00"), "S/. 5.00");

        config.currency_symbol.clear();
        assert_eq!(config.money("5.00"), "5.00");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ReportConfig = toml::from_str("currency_symbol = \"$\"").unwrap();
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.title, "Shared Expense Summary");
    }
}
