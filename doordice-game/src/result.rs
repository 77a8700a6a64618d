//! End game ranking and summary
use serde::Serialize;

use crate::player::{Player, PlayerStatus, Seat};

/// How a game came to an end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    /// At most one player is still alive
    LastStanding,
    /// The configured number of rounds has been played
    RoundCap,
}

impl std::fmt::Display for Ending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ending::LastStanding => write!(f, "last_standing"),
            Ending::RoundCap => write!(f, "round_cap"),
        }
    }
}

/// One row of the final standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// One-based position
    pub rank: usize,
    pub seat: Seat,
    pub name: String,
    pub status: PlayerStatus,
    pub vp: u32,
    pub hp: u8,
}

impl Standing {
    /// Log line in the "#1 NAME: 7VP (ALIVE)" form.
    #[must_use]
    pub fn line(&self) -> String {
        let status = if self.status.is_alive() { "ALIVE" } else { "DEAD" };
        format!("#{} {}: {}VP ({status})", self.rank, self.name, self.vp)
    }
}

/// Rank players by alive first, then VP, then HP, all descending.
///
/// The sort is stable, so full ties keep seat order.
#[must_use]
pub fn compute_standings(players: &[Player]) -> Vec<Standing> {
    let mut ordered: Vec<&Player> = players.iter().collect();
    ordered.sort_by(|a, b| {
        b.is_alive()
            .cmp(&a.is_alive())
            .then_with(|| b.vp().cmp(&a.vp()))
            .then_with(|| b.hp().cmp(&a.hp()))
    });
    ordered
        .into_iter()
        .enumerate()
        .map(|(index, player)| Standing {
            rank: index + 1,
            seat: player.seat(),
            name: player.name().to_string(),
            status: player.status(),
            vp: player.vp(),
            hp: player.hp(),
        })
        .collect()
}

/// Final outcome of a finished game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub ending: Ending,
    /// Top of the standings
    pub winner: Seat,
    /// Completed rounds for an ending on a round wrap, otherwise the round
    /// in progress when the last rival fell
    pub rounds_played: u32,
    pub standings: Vec<Standing>,
}

impl GameSummary {
    #[must_use]
    pub fn winner_standing(&self) -> Option<&Standing> {
        self.standings.first()
    }
}
