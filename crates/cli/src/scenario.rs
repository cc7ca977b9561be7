//! Scenario files: a roster and a list of expenses replayed into a session.
//!
//! ```toml
//! participants = ["Ana", "Beto", "Cami"]
//!
//! [[expenses]]
//! description = "Dinner"
//! amount = "90"
//! paid_by = "Ana"
//! # split_between omitted: everyone
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use tabshare_core::{DomainError, Entity, ParticipantId};
use tabshare_session::{Session, SessionCommand};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Final roster, in order. Empty keeps the session's default participants.
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub expenses: Vec<ScenarioExpense>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioExpense {
    pub description: String,
    /// Kept as text; validated by the session like typed input.
    pub amount: String,
    pub paid_by: String,
    /// Names; `None` means every participant.
    #[serde(default)]
    pub split_between: Option<Vec<String>>,
}

/// A scenario entry the session did not accept. Replay skips it and carries on.
#[derive(Debug, thiserror::Error)]
pub enum ReplayIssue {
    #[error("roster change rejected: {0}")]
    Roster(#[source] DomainError),
    #[error("expense #{index} ({description:?}): unknown participant {name:?}")]
    UnknownParticipant {
        index: usize,
        description: String,
        name: String,
    },
    #[error("expense #{index} ({description:?}) rejected: {source}")]
    Rejected {
        index: usize,
        description: String,
        #[source]
        source: DomainError,
    },
}

impl Scenario {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid scenario {}", path.display()))
    }

    /// Apply the roster then every expense, in file order.
    pub fn replay(&self, session: &mut Session) -> Vec<ReplayIssue> {
        let mut issues = Vec::new();

        if !self.participants.is_empty() {
            if let Err(err) = self.apply_roster(session) {
                issues.push(ReplayIssue::Roster(err));
            }
        }

        for (i, expense) in self.expenses.iter().enumerate() {
            let index = i + 1;
            match expense.to_command(session) {
                Ok(command) => {
                    if let Err(source) = session.dispatch(command) {
                        issues.push(ReplayIssue::Rejected {
                            index,
                            description: expense.description.clone(),
                            source,
                        });
                    }
                }
                Err(name) => issues.push(ReplayIssue::UnknownParticipant {
                    index,
                    description: expense.description.clone(),
                    name,
                }),
            }
        }

        for issue in &issues {
            tracing::warn!(issue = %issue, "scenario entry skipped");
        }
        issues
    }

    fn apply_roster(&self, session: &mut Session) -> Result<(), DomainError> {
        let wanted = self.participants.len();

        while session.participants().len() < wanted {
            session.dispatch(SessionCommand::AddParticipant)?;
        }
        while session.participants().len() > wanted {
            let last = session.participants().len() - 1;
            session.dispatch(SessionCommand::RemoveParticipant { index: last })?;
        }
        for (index, name) in self.participants.iter().enumerate() {
            session.dispatch(SessionCommand::RenameParticipant {
                index,
                name: name.clone(),
            })?;
        }

        Ok(())
    }
}

impl ScenarioExpense {
    /// Resolve names against the current roster; `Err` carries the first
    /// unknown name.
    fn to_command(&self, session: &Session) -> Result<SessionCommand, String> {
        let resolve = |name: &str| -> Result<ParticipantId, String> {
            session
                .participant_named(name)
                .map(|p| *p.id())
                .ok_or_else(|| name.to_string())
        };

        let paid_by = resolve(&self.paid_by)?;
        let split_between = match &self.split_between {
            Some(names) => names
                .iter()
                .map(|n| resolve(n))
                .collect::<Result<Vec<_>, _>>()?,
            None => session.registry().ids(),
        };

        Ok(SessionCommand::AddExpense {
            description: self.description.clone(),
            amount: self.amount.clone(),
            paid_by: Some(paid_by),
            split_between,
        })
    }
}
