//! Error taxonomy for rules-engine operations.
//!
//! Every variant is a local, recoverable condition. A rejected input never
//! leaves the engine in a partially mutated state.

use thiserror::Error;

use crate::engine::Phase;
use crate::player::Seat;

/// Errors raised by player operations and state-machine inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("amount {amount} is out of range for this operation")]
    InvalidAmount { amount: u32 },
    #[error("seat {seat} has fallen and cannot be affected this way")]
    AlreadyFallen { seat: Seat },
    #[error("seat {seat} cannot target itself")]
    InvalidTarget { seat: Seat },
    #[error("seat {seat} is not a legal target: {reason}")]
    IllegalTarget { seat: usize, reason: TargetRejection },
    #[error("{input} is not accepted while the game is {phase}")]
    IllegalPhase { phase: Phase, input: InputKind },
    #[error("roster is full ({capacity} seats)")]
    RosterFull { capacity: usize },
    #[error("roster needs {required} players, only {registered} registered")]
    RosterIncomplete { registered: usize, required: usize },
    #[error("die face {face} is outside 1-6")]
    InvalidFace { face: u8 },
    #[error("unknown option `{option}`")]
    UnknownOption { option: String },
}

/// Why a target was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRejection {
    NoSuchSeat,
    Fallen,
    ActiveSeat,
}

impl std::fmt::Display for TargetRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSuchSeat => write!(f, "no such seat"),
            Self::Fallen => write!(f, "target has fallen"),
            Self::ActiveSeat => write!(f, "target is the active player"),
        }
    }
}

/// External input kinds, used to report phase violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Roll,
    Target,
    Option,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Roll => write!(f, "roll"),
            Self::Target => write!(f, "target selection"),
            Self::Option => write!(f, "option selection"),
        }
    }
}

/// Errors raised when session configuration invariants are violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("round cap must be at least 1")]
    RoundCapZero,
    #[error("expected {expected} player names, got {got}")]
    NameCount { expected: usize, got: usize },
    #[error("player name for seat {seat} is blank")]
    BlankName { seat: usize },
    #[error("configuration is not valid JSON: {0}")]
    Parse(String),
    #[error("table could not be seated: {0}")]
    Roster(#[from] GameError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = GameError::IllegalTarget {
            seat: 3,
            reason: TargetRejection::Fallen,
        };
        assert_eq!(err.to_string(), "seat 3 is not a legal target: target has fallen");

        let err = GameError::IllegalPhase {
            phase: Phase::GameOver,
            input: InputKind::Roll,
        };
        assert_eq!(err.to_string(), "roll is not accepted while the game is game_over");
    }

    #[test]
    fn config_errors_render() {
        assert_eq!(
            ConfigError::NameCount {
                expected: 5,
                got: 2
            }
            .to_string(),
            "expected 5 player names, got 2"
        );
    }
}
