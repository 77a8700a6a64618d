//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_NAMES, DEFAULT_ROUND_CAP, DEFAULT_SEED, ROSTER_SIZE};
use crate::error::ConfigError;

/// Everything needed to seat a table and start a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// User seed; every RNG stream of the session is derived from it.
    #[serde(default = "SessionConfig::default_seed")]
    pub seed: u64,
    /// Number of full rounds before the game is forced to end.
    #[serde(default = "SessionConfig::default_round_cap")]
    pub round_cap: u32,
    /// Player names in registration order.
    #[serde(default = "SessionConfig::default_names")]
    pub names: Vec<String>,
    /// Shuffle the seating order once when the table is set.
    #[serde(default = "SessionConfig::default_shuffle_seating")]
    pub shuffle_seating: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: Self::default_seed(),
            round_cap: Self::default_round_cap(),
            names: Self::default_names(),
            shuffle_seating: Self::default_shuffle_seating(),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub const fn default_seed() -> u64 {
        DEFAULT_SEED
    }

    #[must_use]
    pub const fn default_round_cap() -> u32 {
        DEFAULT_ROUND_CAP
    }

    #[must_use]
    pub fn default_names() -> Vec<String> {
        DEFAULT_NAMES.iter().map(ToString::to_string).collect()
    }

    #[must_use]
    pub const fn default_shuffle_seating() -> bool {
        true
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn with_round_cap(mut self, round_cap: u32) -> Self {
        self.round_cap = round_cap;
        self
    }

    #[must_use]
    pub const fn with_shuffle_seating(mut self, shuffle: bool) -> Self {
        self.shuffle_seating = shuffle;
        self
    }

    /// Parse a configuration and check its invariants.
    ///
    /// # Errors
    ///
    /// `ConfigError::Parse` for malformed JSON, otherwise whatever
    /// [`Self::validate`] reports.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a zero round cap, a name list that does not
    /// fill the table exactly, or a blank name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_cap == 0 {
            return Err(ConfigError::RoundCapZero);
        }
        if self.names.len() != ROSTER_SIZE {
            return Err(ConfigError::NameCount {
                expected: ROSTER_SIZE,
                got: self.names.len(),
            });
        }
        if let Some(seat) = self.names.iter().position(|name| name.trim().is_empty()) {
            return Err(ConfigError::BlankName { seat });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_takes_every_default() {
        let config = SessionConfig::from_json("{}").unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_eq!(config.seed, 1337);
        assert_eq!(config.round_cap, 10);
        assert_eq!(config.names[1], "BIJAY SHAI");
        assert!(config.shuffle_seating);
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let config = SessionConfig::from_json(r#"{"round_cap": 3, "shuffle_seating": false}"#)
            .unwrap();
        assert_eq!(config.round_cap, 3);
        assert!(!config.shuffle_seating);
        assert_eq!(config.names.len(), ROSTER_SIZE);
    }

    #[test]
    fn invariants_are_enforced() {
        assert_eq!(
            SessionConfig::from_json(r#"{"round_cap": 0}"#),
            Err(ConfigError::RoundCapZero)
        );
        assert_eq!(
            SessionConfig::from_json(r#"{"names": ["A", "B"]}"#),
            Err(ConfigError::NameCount {
                expected: 5,
                got: 2
            })
        );
        assert_eq!(
            SessionConfig::from_json(r#"{"names": ["A", "B", "  ", "D", "E"]}"#),
            Err(ConfigError::BlankName { seat: 2 })
        );
        assert!(matches!(
            SessionConfig::from_json("{round_cap"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn round_trips_through_json() {
        let config = SessionConfig::default().with_seed(99).with_round_cap(4);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SessionConfig::from_json(&json).unwrap(), config);
    }
}
