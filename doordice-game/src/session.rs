//! Session facade over the turn engine.
//!
//! A session owns its configuration, seats the table through
//! [`RosterBuilder`] and re-seats it on every reset.

use crate::config::SessionConfig;
use crate::dice::{DieSource, SeededDie, seating_rng};
use crate::engine::TurnEngine;
use crate::error::{ConfigError, GameError};
use crate::event::GameEvent;
use crate::player::Seat;
use crate::result::GameSummary;
use crate::roster::{Roster, RosterBuilder};
use crate::snapshot::{RollOutcome, StateSnapshot, TurnResult};

/// High-level session wrapper binding a turn engine to its table setup.
///
/// This is the only surface a presentation layer needs: read the snapshot,
/// forward one of the three inputs, drain the events.
#[derive(Debug)]
pub struct GameSession {
    config: SessionConfig,
    seating_generation: u64,
    engine: TurnEngine,
}

impl GameSession {
    /// Seat the table and roll with a die seeded from the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the configuration is invalid.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let die = SeededDie::from_user_seed(config.seed);
        Self::with_die(config, Box::new(die))
    }

    /// Seat the table with an injected die source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the configuration is invalid.
    pub fn with_die(config: SessionConfig, die: Box<dyn DieSource>) -> Result<Self, ConfigError> {
        config.validate()?;
        let roster = seat_table(&config, 0)?;
        log::debug!(
            "session seeded {} with round cap {}",
            config.seed,
            config.round_cap
        );
        let engine = TurnEngine::new(roster, config.round_cap, die);
        Ok(Self {
            config,
            seating_generation: 0,
            engine,
        })
    }

    #[must_use]
    pub fn current_state(&self) -> StateSnapshot {
        StateSnapshot::capture(&self.engine)
    }

    /// Roll for the active seat.
    ///
    /// # Errors
    ///
    /// `IllegalPhase` unless the game is waiting for a roll.
    pub fn request_roll(&mut self) -> Result<RollOutcome, GameError> {
        self.engine.roll()
    }

    /// Aim the pending effect.
    ///
    /// # Errors
    ///
    /// `IllegalPhase` or `IllegalTarget`; the game is unchanged either way.
    pub fn choose_target(&mut self, seat: Seat) -> Result<TurnResult, GameError> {
        self.engine.choose_target(seat)
    }

    /// Pick an offered option by id.
    ///
    /// # Errors
    ///
    /// `IllegalPhase` or `UnknownOption`; the game is unchanged either way.
    pub fn choose_option(&mut self, id: &str) -> Result<TurnResult, GameError> {
        self.engine.choose_option(id)
    }

    /// Drain every event recorded since the previous call.
    pub fn events(&mut self) -> Vec<GameEvent> {
        self.engine.events_mut().drain()
    }

    /// Start a new game at the same table, re-seated with the next seating
    /// draw when shuffling is enabled.
    ///
    /// # Errors
    ///
    /// `ConfigError::Roster` if the table can no longer be seated; the
    /// current game is left untouched.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        let generation = self.seating_generation + 1;
        let roster = seat_table(&self.config, generation)?;
        self.seating_generation = generation;
        self.engine.restart(roster);
        Ok(())
    }

    /// Final outcome, once the game is over.
    #[must_use]
    pub fn summary(&self) -> Option<GameSummary> {
        self.engine.summary().cloned()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.engine.summary().is_some()
    }
}

fn seat_table(config: &SessionConfig, generation: u64) -> Result<Roster, ConfigError> {
    let mut builder = RosterBuilder::new();
    for name in &config.names {
        builder.register(name.clone())?;
    }
    if config.shuffle_seating {
        builder.shuffle_seating(&mut seating_rng(config.seed, generation));
        log::debug!("seating shuffled (generation {generation})");
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ROSTER_SIZE;
    use crate::dice::ScriptedDie;
    use crate::engine::Phase;
    use crate::event::EventAction;

    fn scripted(faces: &[u8]) -> GameSession {
        let config = SessionConfig::default().with_shuffle_seating(false);
        GameSession::with_die(config, Box::new(ScriptedDie::from_values(faces).unwrap())).unwrap()
    }

    #[test]
    fn fresh_session_is_idle_at_seat_zero() {
        let mut session = scripted(&[1]);
        let state = session.current_state();
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.round, 1);
        assert_eq!(state.active_seat, 0);
        assert_eq!(state.players.len(), ROSTER_SIZE);
        assert_eq!(state.prompt.title, "ASHIKA'S TURN");
        assert_eq!(state.prompt.detail, "Roll the die");
        let events = session.events();
        assert_eq!(events[0].action, EventAction::RoundStarted);
        assert!(session.events().is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SessionConfig::default().with_round_cap(0);
        assert_eq!(
            GameSession::new(config).unwrap_err(),
            ConfigError::RoundCapZero
        );
    }

    #[test]
    fn seating_is_deterministic_per_seed() {
        let config = SessionConfig::default().with_seed(5);
        let a = GameSession::new(config.clone()).unwrap();
        let b = GameSession::new(config).unwrap();
        let names = |s: &GameSession| -> Vec<String> {
            s.current_state().players.iter().map(|p| p.name.clone()).collect()
        };
        assert_eq!(names(&a), names(&b));
        let mut sorted = names(&a);
        sorted.sort();
        let mut expected = SessionConfig::default_names();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn unshuffled_seating_keeps_registration_order() {
        let session = scripted(&[1]);
        let names: Vec<String> = session
            .current_state()
            .players
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, SessionConfig::default_names());
    }

    #[test]
    fn reset_restores_a_fresh_table() {
        let mut session = scripted(&[1]);
        session.request_roll().unwrap();
        assert_eq!(session.current_state().players[0].hp, 17);
        session.reset().unwrap();
        let state = session.current_state();
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.active_seat, 0);
        assert!(state.players.iter().all(|p| p.hp == 20 && p.vp == 0));
        assert!(state.last_roll.is_none());
    }

    #[test]
    fn snapshot_serializes() {
        let mut session = scripted(&[3]);
        session.request_roll().unwrap();
        let json = serde_json::to_value(session.current_state()).unwrap();
        assert_eq!(json["phase"], "awaiting_target");
        assert_eq!(json["prompt"]["detail"], "Select Target to Steal VP");
        assert_eq!(json["eligible_targets"].as_array().unwrap().len(), 4);
        assert_eq!(json["last_roll"]["face"], 3);
        assert!(json.get("standings").is_none());
    }

    fn builder_seating(config: &SessionConfig, generation: u64) -> Vec<String> {
        let mut builder = RosterBuilder::new();
        for name in &config.names {
            builder.register(name.as_str()).unwrap();
        }
        builder.shuffle_seating(&mut seating_rng(config.seed, generation));
        let roster = builder.build().unwrap();
        roster.players().iter().map(|p| p.name().to_string()).collect()
    }

    fn seated_names(session: &GameSession) -> Vec<String> {
        session
            .current_state()
            .players
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    #[test]
    fn setup_and_reset_seat_through_the_roster_builder() {
        let config = SessionConfig::default().with_seed(21);
        let mut session = GameSession::new(config.clone()).unwrap();
        assert_eq!(seated_names(&session), builder_seating(&config, 0));
        session.reset().unwrap();
        assert_eq!(seated_names(&session), builder_seating(&config, 1));
        session.reset().unwrap();
        assert_eq!(seated_names(&session), builder_seating(&config, 2));
    }

    #[test]
    fn overfull_table_is_refused_at_setup() {
        let mut names = SessionConfig::default_names();
        names.push("EXTRA".to_string());
        let config = SessionConfig {
            names,
            ..SessionConfig::default()
        };
        assert!(matches!(
            GameSession::new(config.clone()),
            Err(ConfigError::NameCount { got: 6, .. })
        ));
        let err = seat_table(&config, 0).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Roster(GameError::RosterFull {
                capacity: ROSTER_SIZE
            })
        );
        assert_eq!(
            err.to_string(),
            "table could not be seated: roster is full (5 seats)"
        );
    }
}
