use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use doordice_game::{
    EventAction, GameError, GameEvent, GameSession, GameSummary, Phase, PlayerStatus,
    SessionConfig, StateSnapshot, constants::MAX_HP,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::logic::policy::PlayStyle;

/// Hard stop for runaway games; a capped game needs far fewer inputs.
const MAX_INPUTS: usize = 5_000;

/// Titles of the fallen roll table column.
const GHOST_TITLES: [&str; 3] = ["VOID MIST", "SPIRIT BLESS", "HAUNT"];

/// Everything needed to play one automated game.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub style: PlayStyle,
    pub round_cap: u32,
    /// Fraction of inputs preceded by a deliberately illegal one.
    pub probe_rate: f64,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(style: PlayStyle) -> Self {
        Self {
            style,
            round_cap: SessionConfig::default_round_cap(),
            probe_rate: 0.0,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_round_cap(mut self, round_cap: u32) -> Self {
        self.round_cap = round_cap;
        self
    }

    #[must_use]
    pub const fn with_probe_rate(mut self, probe_rate: f64) -> Self {
        self.probe_rate = probe_rate;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Tallies gathered while a game plays out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameTally {
    pub inputs: usize,
    pub rolls: usize,
    pub ghost_turns: usize,
    pub rejections_probed: usize,
    pub damage_kills: usize,
    pub curse_kills: usize,
    pub self_kills: usize,
    pub bounties: usize,
    pub round_bonuses: usize,
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub style: PlayStyle,
    pub round_cap: u32,
    pub tally: GameTally,
    /// Rules violations observed during play; empty for a clean game.
    pub violations: Vec<String>,
    pub outcome: Option<GameSummary>,
    pub final_state: StateSnapshot,
    pub events: Vec<GameEvent>,
}

impl SimulationSummary {
    #[must_use]
    pub fn game_ended(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn ending_label(&self) -> String {
        self.outcome
            .as_ref()
            .map_or_else(|| "unfinished".to_string(), |o| o.ending.to_string())
    }
}

/// Headless deterministic runner for the rules engine.
#[derive(Debug, Clone, Copy)]
pub struct GameTester {
    verbose: bool,
}

impl GameTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Play one seeded game to completion, checking the rules after every
    /// input.
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let config = SessionConfig::default()
            .with_seed(seed)
            .with_round_cap(plan.round_cap);
        let mut session = GameSession::new(config)?;
        let mut policy = plan.style.create_policy(seed);
        let mut probe_rng = ChaCha20Rng::seed_from_u64(seed.rotate_left(17));
        let mut tally = GameTally::default();
        let mut violations = Vec::new();
        let mut events = session.events();

        if self.verbose {
            println!(
                "   🎲 seed {} style {} ({})",
                seed,
                plan.style.label().bright_white(),
                policy.name()
            );
        }

        while tally.inputs < MAX_INPUTS {
            let before = session.current_state();
            check_snapshot(&before, &mut violations);
            if session.is_over() {
                break;
            }

            if plan.probe_rate > 0.0 && probe_rng.gen_bool(plan.probe_rate) {
                probe_rejection(&mut session, &before, &mut violations);
                tally.rejections_probed += 1;
            }

            let step = match before.phase {
                Phase::Idle => session.request_roll().map(|outcome| {
                    tally.rolls += 1;
                    let ghost = before
                        .active_player()
                        .is_some_and(|p| p.status == PlayerStatus::Fallen);
                    if ghost {
                        tally.ghost_turns += 1;
                    }
                    if ghost != GHOST_TITLES.contains(&outcome.title) {
                        violations.push(format!(
                            "seat {} rolled on the wrong table ({})",
                            outcome.actor, outcome.title
                        ));
                    }
                }),
                Phase::AwaitingChoice => {
                    let option = policy.pick_option(&before);
                    session.choose_option(&option).map(drop)
                }
                Phase::AwaitingTarget | Phase::AwaitingTargetFallen => {
                    let mode_switch = if before.phase == Phase::AwaitingTargetFallen {
                        session
                            .choose_option(policy.pick_cast_mode(&before))
                            .map(drop)
                    } else {
                        Ok(())
                    };
                    let state = session.current_state();
                    match (mode_switch, policy.pick_target(&state)) {
                        (Err(err), _) => Err(err),
                        (Ok(()), Some(seat)) => session.choose_target(seat).map(drop),
                        (Ok(()), None) => {
                            violations.push(format!(
                                "no eligible target in phase {} (round {})",
                                state.phase, state.round
                            ));
                            break;
                        }
                    }
                }
                other => {
                    violations.push(format!("engine settled in transient phase {other}"));
                    break;
                }
            };
            tally.inputs += 1;

            if let Err(err) = step {
                violations.push(format!("legal input rejected: {err}"));
                break;
            }

            let after = session.current_state();
            check_transition(&before, &after, &mut violations);
            events.extend(session.events());
        }

        tally_events(&events, &mut tally);
        check_bounties(&events, &mut violations);

        if self.verbose && !violations.is_empty() {
            for violation in &violations {
                println!("     ⚠️ {}", violation.yellow());
            }
        }

        Ok(SimulationSummary {
            seed,
            style: plan.style,
            round_cap: plan.round_cap,
            tally,
            violations,
            outcome: session.summary(),
            final_state: session.current_state(),
            events,
        })
    }
}

fn check_snapshot(state: &StateSnapshot, violations: &mut Vec<String>) {
    for player in &state.players {
        if player.hp > MAX_HP {
            violations.push(format!("seat {} has {} HP", player.seat, player.hp));
        }
        if (player.status == PlayerStatus::Fallen) != (player.hp == 0) {
            violations.push(format!(
                "seat {} is {} with {} HP",
                player.seat, player.status, player.hp
            ));
        }
    }
    let should_end = state.alive_count() <= 1 || state.round > state.round_cap;
    if should_end != (state.phase == Phase::GameOver) {
        violations.push(format!(
            "termination mismatch: phase {} with {} alive in round {}/{}",
            state.phase,
            state.alive_count(),
            state.round,
            state.round_cap
        ));
    }
}

fn check_transition(before: &StateSnapshot, after: &StateSnapshot, violations: &mut Vec<String>) {
    for (old, new) in before.players.iter().zip(&after.players) {
        if old.status == PlayerStatus::Fallen && new.status != PlayerStatus::Fallen {
            violations.push(format!("seat {} came back from the dead", old.seat));
        }
    }
}

/// Send an input the current phase cannot accept; the snapshot must not move.
fn probe_rejection(session: &mut GameSession, before: &StateSnapshot, violations: &mut Vec<String>) {
    let result: Result<(), GameError> = match before.phase {
        Phase::Idle => session.choose_option("dmg_6").map(drop),
        Phase::AwaitingChoice => session.request_roll().map(drop),
        Phase::AwaitingTarget | Phase::AwaitingTargetFallen => {
            match (0..before.players.len()).find(|s| !before.eligible_targets.contains(s)) {
                Some(seat) => session.choose_target(seat).map(drop),
                None => session.request_roll().map(drop),
            }
        }
        _ => session.request_roll().map(drop),
    };
    if result.is_ok() {
        violations.push(format!("illegal input accepted in phase {}", before.phase));
    } else if session.current_state() != *before {
        violations.push(format!("rejected input mutated state in phase {}", before.phase));
    }
}

fn tally_events(events: &[GameEvent], tally: &mut GameTally) {
    for (index, event) in events.iter().enumerate() {
        match event.action {
            EventAction::Bounty => tally.bounties += 1,
            EventAction::RoundBonus => tally.round_bonuses += 1,
            EventAction::Fallen => match index.checked_sub(1).map(|i| events[i].action) {
                Some(EventAction::Damage) => tally.damage_kills += 1,
                Some(EventAction::Curse) => tally.curse_kills += 1,
                _ => tally.self_kills += 1,
            },
            _ => {}
        }
    }
}

fn check_bounties(events: &[GameEvent], violations: &mut Vec<String>) {
    for (index, event) in events.iter().enumerate() {
        if event.action != EventAction::Fallen {
            continue;
        }
        let cause = index.checked_sub(1).map(|i| events[i].action);
        let paid = events.get(index + 1).map(|e| e.action) == Some(EventAction::Bounty);
        let should_pay = cause == Some(EventAction::Damage);
        if paid != should_pay {
            violations.push(format!(
                "bounty mismatch for \"{}\" (cause {:?})",
                event.message, cause
            ));
        }
    }
}
