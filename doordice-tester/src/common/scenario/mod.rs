use anyhow::Result;

use crate::logic::{PlayStyle, SimulationPlan, SimulationSummary};
use doordice_game::constants::ROSTER_SIZE;

pub mod full_game;
pub mod rules;

// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

/// Every game must end and rank the whole table.
pub(crate) fn completed_game_expectation(summary: &SimulationSummary) -> Result<()> {
    let Some(outcome) = &summary.outcome else {
        anyhow::bail!("Game did not reach GAME_OVER after {} inputs", summary.tally.inputs);
    };
    anyhow::ensure!(
        outcome.standings.len() == ROSTER_SIZE,
        "Expected {ROSTER_SIZE} standings, got {}",
        outcome.standings.len()
    );
    anyhow::ensure!(
        outcome.standings.first().map(|s| s.seat) == Some(outcome.winner),
        "Winner seat {} is not ranked first",
        outcome.winner
    );
    anyhow::ensure!(
        outcome.rounds_played <= summary.round_cap,
        "Played {} rounds past a cap of {}",
        outcome.rounds_played,
        summary.round_cap
    );
    Ok(())
}

fn smoke_scenario() -> TestScenario {
    TestScenario::simulation(
        "Smoke Test",
        SimulationPlan::new(PlayStyle::Random).with_expectation(completed_game_expectation),
    )
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    match name.to_lowercase().as_str() {
        "smoke" => Some(smoke_scenario()),
        "full-game" | "random" => Some(full_game::full_game_scenario(PlayStyle::Random)),
        "full-game-aggressive" | "aggressive" => {
            Some(full_game::full_game_scenario(PlayStyle::Aggressive))
        }
        "vp-hoarder" | "vp-hunter" => Some(full_game::full_game_scenario(PlayStyle::VpHunter)),
        "round-cap" | "cap" => Some(rules::round_cap_scenario()),
        "ghost-turns" | "ghosts" => Some(rules::ghost_turns_scenario()),
        "bounty-hunt" | "bounty" => Some(rules::bounty_hunt_scenario()),
        "round-bonus" | "bonus" => Some(rules::round_bonus_scenario()),
        "rejection-probe" | "rejections" => Some(rules::rejection_probe_scenario()),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Smoke Test"),
        ("full-game", "Full Game - Random Play"),
        ("full-game-aggressive", "Full Game - Aggressive Play"),
        ("vp-hoarder", "Full Game - VP Hoarder Play"),
        ("round-cap", "Round Cap Enforcement"),
        ("ghost-turns", "Ghost Turns"),
        ("bounty-hunt", "Elimination Bounty Ledger"),
        ("round-bonus", "Round Survival Bonus"),
        ("rejection-probe", "Illegal Input Rejection"),
    ]
}
