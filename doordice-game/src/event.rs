//! Discrete game events for the presentation layer.
//!
//! Every accepted input produces one or more events. They are the only side
//! channel besides the state snapshot and are drained by the caller.

use serde::Serialize;
use smallvec::SmallVec;

use crate::player::Seat;

/// Events produced by a single input, stored inline in the common case.
pub type EventBatch = SmallVec<[GameEvent; 4]>;

/// Stable, deterministic identifier for a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EventId {
    /// One-based round in which the event occurred.
    pub round: u32,
    /// Sequence number within the session, never reset by drains.
    pub seq: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    Rolled,
    SelfDamage,
    Damage,
    Heal,
    StealVp,
    GainVp,
    Bounty,
    Bless,
    Curse,
    Fallen,
    NoEffect,
    RoundStarted,
    RoundBonus,
    GameOver,
    Standing,
}

impl EventAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rolled => "rolled",
            Self::SelfDamage => "self_damage",
            Self::Damage => "damage",
            Self::Heal => "heal",
            Self::StealVp => "steal_vp",
            Self::GainVp => "gain_vp",
            Self::Bounty => "bounty",
            Self::Bless => "bless",
            Self::Curse => "curse",
            Self::Fallen => "fallen",
            Self::NoEffect => "no_effect",
            Self::RoundStarted => "round_started",
            Self::RoundBonus => "round_bonus",
            Self::GameOver => "game_over",
            Self::Standing => "standing",
        }
    }

    /// Default severity tier for the action.
    #[must_use]
    pub const fn severity(self) -> EventSeverity {
        match self {
            Self::Fallen | Self::GameOver => EventSeverity::Critical,
            Self::SelfDamage | Self::Damage | Self::Curse | Self::StealVp => EventSeverity::Warning,
            _ => EventSeverity::Info,
        }
    }
}

/// Severity tier for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameEvent {
    pub id: EventId,
    /// Seat that caused the event; `None` for table-wide events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<Seat>,
    pub action: EventAction,
    /// Signed change in the resource the action touches (HP, VP, face, rank).
    pub delta: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Seat>,
    pub severity: EventSeverity,
    /// Ready-to-render log line.
    pub message: String,
}

/// Ordered buffer of events awaiting a drain.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pending: Vec<GameEvent>,
    next_seq: u32,
}

impl EventLog {
    pub(crate) fn record(
        &mut self,
        round: u32,
        actor: Option<Seat>,
        action: EventAction,
        delta: i32,
        target: Option<Seat>,
        message: impl Into<String>,
    ) -> &GameEvent {
        let id = EventId {
            round,
            seq: self.next_seq,
        };
        self.next_seq = self.next_seq.wrapping_add(1);
        let index = self.pending.len();
        self.pending.push(GameEvent {
            id,
            actor,
            action,
            delta,
            target,
            severity: action.severity(),
            message: message.into(),
        });
        &self.pending[index]
    }

    /// Events recorded since `mark`, where `mark` came from [`Self::len`].
    pub(crate) fn since(&self, mark: usize) -> EventBatch {
        self.pending.iter().skip(mark).cloned().collect()
    }

    /// Discard events recorded after `mark` and reuse their sequence numbers.
    pub(crate) fn rollback(&mut self, mark: usize) {
        let dropped = self.pending.len().saturating_sub(mark);
        self.pending.truncate(mark);
        let dropped = u32::try_from(dropped).unwrap_or(u32::MAX);
        self.next_seq = self.next_seq.wrapping_sub(dropped);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }
}
