//! Do or Dice Game Engine
//!
//! Platform-agnostic rules engine for Do or Dice, a five-player elimination
//! dice game. This crate owns turn order, effect resolution, scoring, and
//! ranking, and exposes everything through [`GameSession`]. It has no UI and
//! performs no I/O.

pub mod config;
pub mod constants;
pub mod dice;
pub mod effect;
pub mod engine;
pub mod error;
pub mod event;
pub mod player;
pub mod resolver;
pub mod result;
pub mod roll_table;
pub mod roster;
pub mod session;
pub mod snapshot;

// Re-export commonly used types
pub use config::SessionConfig;
pub use dice::{CountingRng, DieFace, DieSource, ScriptedDie, SeededDie, seating_rng};
pub use effect::{CastMode, ChoiceLabel, Effect, EffectKind, TargetFilter, UltimateOption};
pub use engine::{Phase, TurnEngine};
pub use error::{ConfigError, GameError, InputKind, TargetRejection};
pub use event::{EventAction, EventBatch, EventId, EventLog, EventSeverity, GameEvent};
pub use player::{DamageReport, Player, PlayerStatus, Seat};
pub use resolver::{EffectResolver, Resolution, Step};
pub use result::{Ending, GameSummary, Standing, compute_standings};
pub use roll_table::{RollEntry, RollTable};
pub use roster::{Roster, RosterBuilder};
pub use session::GameSession;
pub use snapshot::{PlayerView, Prompt, RollOutcome, StateSnapshot, TurnResult};
