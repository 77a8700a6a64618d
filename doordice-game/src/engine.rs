//! Turn state machine.
//!
//! The engine owns the roster, the die, and the event log. External input is
//! one of three kinds (roll, target, option) and each is either applied in
//! full or rejected with no observable change. Rolling and the round
//! transition are internal steps: callers only ever see the engine settled in
//! `Idle`, one of the awaiting phases, or `GameOver`.

use serde::Serialize;

use crate::constants::{ROSTER_SIZE, ULTIMATE_DAMAGE};
use crate::dice::{DieFace, DieSource};
use crate::effect::{CastMode, ChoiceLabel, Effect, EffectKind, TargetFilter, UltimateOption};
use crate::error::{GameError, InputKind, TargetRejection};
use crate::event::{EventAction, EventLog};
use crate::player::Seat;
use crate::resolver::{EffectResolver, ResolveCtx, Step};
use crate::result::{Ending, GameSummary, Standing, compute_standings};
use crate::roll_table::{RollEntry, RollTable};
use crate::roster::Roster;
use crate::snapshot::{Prompt, RollOutcome, TurnResult};

/// Where the state machine currently rests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Rolling,
    AwaitingTarget,
    AwaitingTargetFallen,
    AwaitingChoice,
    GameOver,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Rolling => "rolling",
            Self::AwaitingTarget => "awaiting_target",
            Self::AwaitingTargetFallen => "awaiting_target_fallen",
            Self::AwaitingChoice => "awaiting_choice",
            Self::GameOver => "game_over",
        }
    }

    /// Whether a target selection is the expected input.
    #[must_use]
    pub const fn awaits_target(self) -> bool {
        matches!(self, Self::AwaitingTarget | Self::AwaitingTargetFallen)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct TurnEngine {
    roster: Roster,
    round: u32,
    round_cap: u32,
    active_seat: Seat,
    phase: Phase,
    pending: Option<Effect>,
    cast_mode: CastMode,
    last_roll: Option<RollOutcome>,
    summary: Option<GameSummary>,
    log: EventLog,
    die: Box<dyn DieSource>,
}

impl TurnEngine {
    /// Start a game at round 1, seat 0.
    #[must_use]
    pub fn new(roster: Roster, round_cap: u32, die: Box<dyn DieSource>) -> Self {
        let mut engine = Self {
            roster,
            round: 1,
            round_cap,
            active_seat: 0,
            phase: Phase::Idle,
            pending: None,
            cast_mode: CastMode::default(),
            last_roll: None,
            summary: None,
            log: EventLog::default(),
            die,
        };
        engine.announce_round();
        engine
    }

    /// Put a fresh roster on the table and start over. The die and the event
    /// sequence carry on.
    pub fn restart(&mut self, roster: Roster) {
        self.roster = roster;
        self.round = 1;
        self.active_seat = 0;
        self.phase = Phase::Idle;
        self.pending = None;
        self.cast_mode = CastMode::default();
        self.last_roll = None;
        self.summary = None;
        log::debug!("engine restarted");
        self.announce_round();
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub const fn round_cap(&self) -> u32 {
        self.round_cap
    }

    #[must_use]
    pub const fn active_seat(&self) -> Seat {
        self.active_seat
    }

    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub const fn last_roll(&self) -> Option<RollOutcome> {
        self.last_roll
    }

    #[must_use]
    pub const fn summary(&self) -> Option<&GameSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn standings(&self) -> Option<&[Standing]> {
        self.summary.as_ref().map(|s| s.standings.as_slice())
    }

    pub fn events_mut(&mut self) -> &mut EventLog {
        &mut self.log
    }

    /// Seats the current phase accepts as a target, in seat order.
    #[must_use]
    pub fn eligible_targets(&self) -> Vec<Seat> {
        let filter = match (self.phase, self.pending) {
            (Phase::AwaitingTarget | Phase::AwaitingTargetFallen, Some(effect)) => {
                effect.target_filter
            }
            _ => None,
        };
        match filter {
            Some(TargetFilter::AliveOpponent) => self
                .roster
                .alive_seats()
                .into_iter()
                .filter(|&seat| seat != self.active_seat)
                .collect(),
            Some(TargetFilter::AnyAlive) => self.roster.alive_seats(),
            None => Vec::new(),
        }
    }

    /// Options on offer in the current phase, if any.
    #[must_use]
    pub fn pending_choice(&self) -> Option<Vec<ChoiceLabel>> {
        match (self.phase, self.pending) {
            (Phase::AwaitingChoice, _) => Some(
                UltimateOption::ALL
                    .into_iter()
                    .map(|option| ChoiceLabel::new(option.id(), option.label(), false))
                    .collect(),
            ),
            (Phase::AwaitingTargetFallen, Some(effect)) => Some(
                CastMode::ALL
                    .into_iter()
                    .map(|mode| {
                        ChoiceLabel::new(mode.id(), mode.label(effect.kind), mode == self.cast_mode)
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    #[must_use]
    pub fn prompt(&self) -> Prompt {
        let name = self
            .roster
            .get(self.active_seat)
            .map_or("", |player| player.name());
        let title = self.last_roll.map_or("", |roll| roll.title);
        match (self.phase, self.pending) {
            (Phase::GameOver, _) => Prompt::new("GAME OVER", "See Standings"),
            (Phase::Idle, _) => {
                let ghost = self
                    .roster
                    .get(self.active_seat)
                    .is_some_and(|player| !player.is_alive());
                let detail = if ghost {
                    "Ghost Turn - Roll the die"
                } else {
                    "Roll the die"
                };
                Prompt::new(format!("{name}'S TURN"), detail)
            }
            (Phase::AwaitingChoice, _) => Prompt::new(title, "Choice: DMG or VP"),
            (Phase::AwaitingTarget, Some(effect)) if effect.kind == EffectKind::StealVp => {
                Prompt::new(title, "Select Target to Steal VP")
            }
            (Phase::AwaitingTarget, Some(effect)) => Prompt::new(
                title,
                format!("Select Target for {} DMG", effect.magnitude),
            ),
            (Phase::AwaitingTargetFallen, _) => {
                Prompt::new(title, "Select Alive Player to Bless/Curse")
            }
            _ => Prompt::new(format!("{name}'S TURN"), "Rolling..."),
        }
    }

    /// Draw a face for the active seat and resolve as far as it goes without
    /// further input.
    ///
    /// # Errors
    ///
    /// `IllegalPhase` unless the engine is `Idle`.
    pub fn roll(&mut self) -> Result<RollOutcome, GameError> {
        self.expect_phase(InputKind::Roll, |phase| phase == Phase::Idle)?;
        let alive = self.roster.seat(self.active_seat)?.is_alive();
        let face = self.die.roll();
        self.resolve_roll(face, RollTable::lookup(face, alive))
    }

    /// Record a drawn face and carry out its table entry. A failing immediate
    /// effect rewinds the log and leaves the engine `Idle`.
    fn resolve_roll(&mut self, face: DieFace, entry: RollEntry) -> Result<RollOutcome, GameError> {
        let actor_seat = self.active_seat;
        let name = self.roster.seat(actor_seat)?.name().to_string();
        let mark = self.log.len();

        self.phase = Phase::Rolling;
        self.log.record(
            self.round,
            Some(actor_seat),
            EventAction::Rolled,
            i32::from(face.value()),
            None,
            format!("{name} rolled {face}"),
        );
        log::debug!(
            "round {} seat {} rolled {} -> {}",
            self.round,
            actor_seat,
            face,
            entry.title
        );

        match EffectResolver::next_step(&entry.effect) {
            Step::Advance => {
                let mut ctx = ResolveCtx {
                    log: &mut self.log,
                    round: self.round,
                };
                let applied = match self.roster.get_mut(actor_seat) {
                    Some(actor) => EffectResolver::apply_immediate(&entry.effect, actor, &mut ctx),
                    None => Ok(()),
                };
                if let Err(err) = applied {
                    self.log.rollback(mark);
                    self.phase = Phase::Idle;
                    return Err(err);
                }
                self.pending = None;
                self.advance_turn();
            }
            Step::AwaitTarget => self.await_input(Phase::AwaitingTarget, entry.effect),
            Step::AwaitChoice => self.await_input(Phase::AwaitingChoice, entry.effect),
            Step::AwaitTargetFallen => {
                self.cast_mode = CastMode::default();
                self.await_input(Phase::AwaitingTargetFallen, entry.effect);
            }
        }

        let outcome = RollOutcome {
            actor: actor_seat,
            face,
            effect: entry.effect,
            title: entry.title,
            detail: entry.detail,
            next_phase: self.phase,
        };
        self.last_roll = Some(outcome);
        Ok(outcome)
    }

    /// Aim the pending effect at `seat`.
    ///
    /// # Errors
    ///
    /// `IllegalPhase` outside the awaiting-target phases; `IllegalTarget` for
    /// a seat the pending effect cannot reach.
    pub fn choose_target(&mut self, seat: Seat) -> Result<TurnResult, GameError> {
        self.expect_phase(InputKind::Target, Phase::awaits_target)?;
        let Some(effect) = self.pending else {
            return Err(self.reject(InputKind::Target));
        };
        self.check_target(seat, effect)?;

        let mark = self.log.len();
        let actor_seat = self.active_seat;
        let Some((actor, target)) = self.roster.pair_mut(actor_seat, seat) else {
            return Err(GameError::IllegalTarget {
                seat,
                reason: TargetRejection::ActiveSeat,
            });
        };
        let mut ctx = ResolveCtx {
            log: &mut self.log,
            round: self.round,
        };
        let resolution = if effect.is_fallen_cast() {
            EffectResolver::apply_fallen_cast(&effect, self.cast_mode, actor, target, &mut ctx)?
        } else {
            EffectResolver::apply_targeted(&effect, actor, target, &mut ctx)?
        };
        log::debug!(
            "seat {} applied {:?} to seat {} (eliminated: {}, bounty: {})",
            actor_seat,
            effect.kind,
            seat,
            resolution.eliminated,
            resolution.bounty
        );

        self.pending = None;
        self.advance_turn();
        Ok(self.turn_result(mark))
    }

    /// Pick an option: an ultimate branch in `AwaitingChoice`, or the cast
    /// mode (`hp` or `vp`) while a fallen cast awaits its target.
    ///
    /// # Errors
    ///
    /// `IllegalPhase` in any other phase; `UnknownOption` for an id the
    /// current phase does not offer.
    pub fn choose_option(&mut self, id: &str) -> Result<TurnResult, GameError> {
        self.expect_phase(InputKind::Option, |phase| {
            matches!(phase, Phase::AwaitingChoice | Phase::AwaitingTargetFallen)
        })?;
        let mark = self.log.len();

        if self.phase == Phase::AwaitingTargetFallen {
            let mode = CastMode::parse(id).inspect_err(|err| log::debug!("rejected option: {err}"))?;
            self.cast_mode = mode;
            log::debug!("seat {} cast mode set to {}", self.active_seat, mode.id());
            return Ok(self.turn_result(mark));
        }

        let option =
            UltimateOption::parse(id).inspect_err(|err| log::debug!("rejected option: {err}"))?;
        log::debug!("seat {} chose {}", self.active_seat, option.id());
        match option {
            UltimateOption::DealDamage => {
                self.await_input(Phase::AwaitingTarget, Effect::target_damage(ULTIMATE_DAMAGE));
            }
            UltimateOption::GainVp => {
                let mut ctx = ResolveCtx {
                    log: &mut self.log,
                    round: self.round,
                };
                if let Some(actor) = self.roster.get_mut(self.active_seat) {
                    EffectResolver::grant_ultimate_vp(actor, &mut ctx)?;
                }
                self.pending = None;
                self.advance_turn();
            }
        }
        Ok(self.turn_result(mark))
    }

    fn await_input(&mut self, phase: Phase, effect: Effect) {
        self.pending = Some(effect);
        self.phase = phase;
    }

    fn expect_phase(
        &self,
        input: InputKind,
        accepts: impl Fn(Phase) -> bool,
    ) -> Result<(), GameError> {
        if accepts(self.phase) {
            Ok(())
        } else {
            Err(self.reject(input))
        }
    }

    fn reject(&self, input: InputKind) -> GameError {
        log::debug!("rejected {input} in phase {}", self.phase);
        GameError::IllegalPhase {
            phase: self.phase,
            input,
        }
    }

    fn check_target(&self, seat: Seat, effect: Effect) -> Result<(), GameError> {
        let target = self.roster.seat(seat)?;
        let reason = if !target.is_alive() {
            Some(TargetRejection::Fallen)
        } else if seat == self.active_seat {
            Some(TargetRejection::ActiveSeat)
        } else {
            None
        };
        match reason {
            Some(reason) => {
                log::debug!("rejected target {seat} for {:?}: {reason}", effect.kind);
                Err(GameError::IllegalTarget { seat, reason })
            }
            None => Ok(()),
        }
    }

    fn turn_result(&self, mark: usize) -> TurnResult {
        TurnResult {
            events: self.log.since(mark),
            phase: self.phase,
            round: self.round,
            active_seat: self.active_seat,
        }
    }

    /// Pass the turn on, closing the round when the last seat has played.
    /// The game ends here as soon as at most one player is alive or the
    /// round cap has been passed.
    fn advance_turn(&mut self) {
        self.active_seat += 1;
        let wrapped = self.active_seat >= ROSTER_SIZE;
        if wrapped {
            self.active_seat = 0;
            self.round += 1;
            self.close_round();
        }

        let ending = if self.roster.alive_count() <= 1 {
            Some(Ending::LastStanding)
        } else if self.round > self.round_cap {
            Some(Ending::RoundCap)
        } else {
            None
        };

        match ending {
            Some(ending) => {
                let rounds_played = if wrapped { self.round - 1 } else { self.round };
                self.finish(ending, rounds_played);
            }
            None => {
                self.phase = Phase::Idle;
                if wrapped {
                    self.announce_round();
                }
            }
        }
    }

    fn close_round(&mut self) {
        let completed = self.round - 1;
        for player in self.roster.iter_mut() {
            if player.complete_round() {
                self.log.record(
                    completed,
                    Some(player.seat()),
                    EventAction::RoundBonus,
                    1,
                    None,
                    format!("{} survived round {completed} (+1 VP)", player.name()),
                );
            }
        }
        log::debug!(
            "round {completed} closed with {} alive",
            self.roster.alive_count()
        );
    }

    fn announce_round(&mut self) {
        self.log.record(
            self.round,
            None,
            EventAction::RoundStarted,
            i32::try_from(self.round).unwrap_or(i32::MAX),
            None,
            format!("--- ROUND {} START ---", self.round),
        );
    }

    fn finish(&mut self, ending: Ending, rounds_played: u32) {
        self.phase = Phase::GameOver;
        self.pending = None;
        let standings = compute_standings(self.roster.players());
        let winner = standings.first().map_or(0, |s| s.seat);

        self.log.record(
            self.round,
            None,
            EventAction::GameOver,
            0,
            None,
            "--- FINAL STANDINGS ---",
        );
        for standing in &standings {
            self.log.record(
                self.round,
                Some(standing.seat),
                EventAction::Standing,
                i32::try_from(standing.rank).unwrap_or(i32::MAX),
                None,
                standing.line(),
            );
        }
        log::info!(
            "game over ({ending}) after {rounds_played} rounds; winner seat {winner}"
        );

        self.summary = Some(GameSummary {
            ending,
            winner,
            rounds_played,
            standings,
        });
    }
}
