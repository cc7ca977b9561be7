use serde::{Deserialize, Serialize};

use tabshare_participants::RosterPolicy;

/// Session configuration (roster limits and default naming).
///
/// Deserialisable from the `[session]` table of a TOML config; missing keys
/// fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Upper bound on the roster size.
    pub max_participants: usize,
    /// Participants created when the session starts (at least one).
    pub initial_participants: usize,
    /// Auto-generated names are `"{default_name_prefix} {n}"`.
    pub default_name_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_participants: 20,
            initial_participants: 5,
            default_name_prefix: "Person".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn roster_policy(&self) -> RosterPolicy {
        RosterPolicy {
            max_participants: self.max_participants.max(1),
            name_prefix: self.default_name_prefix.clone(),
        }
    }

    /// Number of participants to seed, clamped to `1..=max_participants`.
    pub fn seed_count(&self) -> usize {
        self.initial_participants.clamp(1, self.max_participants.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: SessionConfig = toml::from_str("default_name_prefix = \"Persona\"").unwrap();
        assert_eq!(config.default_name_prefix, "Persona");
        assert_eq!(config.max_participants, 20);
        assert_eq!(config.initial_participants, 5);
    }

    #[test]
    fn seed_count_is_clamped() {
        let mut config = SessionConfig {
            initial_participants: 0,
            ..SessionConfig::default()
        };
        assert_eq!(config.seed_count(), 1);

        config.initial_participants = 50;
        assert_eq!(config.seed_count(), 20);

        config.max_participants = 0;
        assert_eq!(config.seed_count(), 1);
        assert_eq!(config.roster_policy().max_participants, 1);
    }
}
