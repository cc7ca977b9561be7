//! Command-line front end: config loading and scenario replay.

pub mod config;
pub mod scenario;

pub use config::AppConfig;
pub use scenario::{ReplayIssue, Scenario, ScenarioExpense};
