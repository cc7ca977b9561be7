//! Rendering of session summaries (plain text, printable HTML, JSON).
//!
//! Renderers take an owned [`SessionSnapshot`](tabshare_session::SessionSnapshot),
//! so a produced document never changes after the session moves on.

pub mod config;
pub mod html;
pub mod text;

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use tabshare_session::SessionSnapshot;

pub use config::ReportConfig;
pub use html::render_html;
pub use text::render_text;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to serialise snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Html,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "html" => Ok(ReportFormat::Html),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format {other:?}")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportFormat::Text => "text",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        })
    }
}

/// Pretty-printed JSON of the whole snapshot.
pub fn render_json(snapshot: &SessionSnapshot) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

pub fn render(
    format: ReportFormat,
    snapshot: &SessionSnapshot,
    config: &ReportConfig,
) -> Result<String, ReportError> {
    match format {
        ReportFormat::Text => Ok(render_text(snapshot, config)),
        ReportFormat::Html => Ok(render_html(snapshot, config)),
        ReportFormat::Json => render_json(snapshot),
    }
}

/// Generation date per `config.date_format`, falling back to RFC 3339 when
/// the pattern is invalid.
pub(crate) fn generated_on(snapshot: &SessionSnapshot, config: &ReportConfig) -> String {
    use core::fmt::Write;

    let mut out = String::new();
    match write!(out, "{}", snapshot.taken_at.format(&config.date_format)) {
        Ok(()) => out,
        Err(_) => snapshot.taken_at.to_rfc3339(),
    }
}

/// `"1 person"`, `"3 people"`.
pub(crate) fn people(count: usize) -> String {
    if count == 1 {
        "1 person".to_string()
    } else {
        format!("{count} people")
    }
}
