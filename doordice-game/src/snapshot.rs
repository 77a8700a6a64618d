//! Read-only views handed to the presentation layer.
//!
//! Nothing here is a save format. Everything serializes so a wrapper can ship
//! it as JSON, but no engine state is ever rebuilt from these types.

use serde::Serialize;

use crate::constants::MAX_HP;
use crate::dice::DieFace;
use crate::effect::{ChoiceLabel, Effect};
use crate::engine::{Phase, TurnEngine};
use crate::event::EventBatch;
use crate::player::{Player, PlayerStatus, Seat};
use crate::result::Standing;

/// Headline and sub-line shown above the roll area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub title: String,
    pub detail: String,
}

impl Prompt {
    pub(crate) fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
        }
    }
}

/// Public face of a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub seat: Seat,
    pub name: String,
    pub hp: u8,
    pub max_hp: u8,
    pub vp: u32,
    pub status: PlayerStatus,
    pub rounds_survived: u32,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_targeted_by: Option<Seat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_targeted: Option<Seat>,
}

impl PlayerView {
    fn of(player: &Player, active_seat: Seat) -> Self {
        Self {
            seat: player.seat(),
            name: player.name().to_string(),
            hp: player.hp(),
            max_hp: MAX_HP,
            vp: player.vp(),
            status: player.status(),
            rounds_survived: player.rounds_survived(),
            is_active: player.seat() == active_seat,
            last_targeted_by: player.last_targeted_by(),
            last_targeted: player.last_targeted(),
        }
    }
}

/// Result of a roll, available as soon as the die is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RollOutcome {
    /// Seat that rolled.
    pub actor: Seat,
    pub face: DieFace,
    pub effect: Effect,
    pub title: &'static str,
    pub detail: &'static str,
    /// Phase the engine settled in after the roll.
    pub next_phase: Phase,
}

/// Result of a target or option selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnResult {
    /// Events the input produced, oldest first.
    pub events: EventBatch,
    pub phase: Phase,
    pub round: u32,
    pub active_seat: Seat,
}

/// Everything a renderer needs to draw the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub phase: Phase,
    pub round: u32,
    pub round_cap: u32,
    pub active_seat: Seat,
    pub players: Vec<PlayerView>,
    pub prompt: Prompt,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_choice: Option<Vec<ChoiceLabel>>,
    pub eligible_targets: Vec<Seat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_roll: Option<RollOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standings: Option<Vec<Standing>>,
}

impl StateSnapshot {
    pub(crate) fn capture(engine: &TurnEngine) -> Self {
        let active_seat = engine.active_seat();
        Self {
            phase: engine.phase(),
            round: engine.round(),
            round_cap: engine.round_cap(),
            active_seat,
            players: engine
                .roster()
                .players()
                .iter()
                .map(|player| PlayerView::of(player, active_seat))
                .collect(),
            prompt: engine.prompt(),
            pending_choice: engine.pending_choice(),
            eligible_targets: engine.eligible_targets(),
            last_roll: engine.last_roll(),
            standings: engine.standings().map(<[Standing]>::to_vec),
        }
    }

    #[must_use]
    pub fn active_player(&self) -> Option<&PlayerView> {
        self.players.get(self.active_seat)
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.status.is_alive()).count()
    }
}
