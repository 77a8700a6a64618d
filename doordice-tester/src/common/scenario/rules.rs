use anyhow::Result;
use doordice_game::{
    Ending, EventAction,
    constants::{ELIMINATION_BOUNTY, ROSTER_SIZE, ROUND_SURVIVAL_BONUS},
};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::{TestScenario, completed_game_expectation};
use crate::logic::{PlayStyle, SimulationPlan, SimulationSummary};

const SHORT_ROUND_CAP: u32 = 2;

pub fn round_cap_scenario() -> TestScenario {
    TestScenario::simulation(
        "Round Cap Enforcement",
        SimulationPlan::new(PlayStyle::VpHunter)
            .with_round_cap(SHORT_ROUND_CAP)
            .with_expectation(completed_game_expectation)
            .with_expectation(round_cap_expectation),
    )
}

pub fn rejection_probe_scenario() -> TestScenario {
    TestScenario::simulation(
        "Illegal Input Rejection",
        SimulationPlan::new(PlayStyle::Random)
            .with_probe_rate(1.0)
            .with_expectation(completed_game_expectation)
            .with_expectation(rejection_probe_expectation),
    )
}

pub fn ghost_turns_scenario() -> TestScenario {
    TestScenario::simulation(
        "Ghost Turns",
        SimulationPlan::new(PlayStyle::Aggressive)
            .with_expectation(completed_game_expectation)
            .with_expectation(ghost_turns_expectation),
    )
}

pub fn bounty_hunt_scenario() -> TestScenario {
    TestScenario::simulation(
        "Elimination Bounty Ledger",
        SimulationPlan::new(PlayStyle::Aggressive)
            .with_expectation(completed_game_expectation)
            .with_expectation(bounty_hunt_expectation),
    )
}

pub fn round_bonus_scenario() -> TestScenario {
    TestScenario::simulation(
        "Round Survival Bonus",
        SimulationPlan::new(PlayStyle::Random)
            .with_expectation(completed_game_expectation)
            .with_expectation(round_bonus_expectation),
    )
}

fn round_cap_expectation(summary: &SimulationSummary) -> Result<()> {
    let Some(outcome) = &summary.outcome else {
        anyhow::bail!("Game did not finish");
    };
    match outcome.ending {
        Ending::RoundCap => anyhow::ensure!(
            outcome.rounds_played == summary.round_cap,
            "Round cap ending after {} rounds, cap {}",
            outcome.rounds_played,
            summary.round_cap
        ),
        Ending::LastStanding => anyhow::ensure!(
            summary.final_state.alive_count() <= 1,
            "Last-standing ending with {} players alive",
            summary.final_state.alive_count()
        ),
    }
    Ok(())
}

fn rejection_probe_expectation(summary: &SimulationSummary) -> Result<()> {
    anyhow::ensure!(
        summary.tally.rejections_probed == summary.tally.inputs,
        "Probed {} of {} inputs",
        summary.tally.rejections_probed,
        summary.tally.inputs
    );
    Ok(())
}

/// Fallen seats keep their turns and only ever roll on the fallen column.
fn ghost_turns_expectation(summary: &SimulationSummary) -> Result<()> {
    let mut fallen = HashSet::new();
    let mut ghost_rolls = 0;
    for (index, event) in summary.events.iter().enumerate() {
        match event.action {
            EventAction::Fallen => {
                if let Some(seat) = event.target.or(event.actor) {
                    fallen.insert(seat);
                }
            }
            EventAction::Rolled if event.actor.is_some_and(|seat| fallen.contains(&seat)) => {
                ghost_rolls += 1;
                let next = summary.events.get(index + 1).map(|e| e.action);
                anyhow::ensure!(
                    matches!(
                        next,
                        Some(EventAction::NoEffect | EventAction::Bless | EventAction::Curse)
                    ),
                    "Ghost roll \"{}\" followed by {next:?}",
                    event.message
                );
            }
            _ => {}
        }
    }
    anyhow::ensure!(
        ghost_rolls == summary.tally.ghost_turns,
        "Event log shows {ghost_rolls} ghost rolls, snapshots counted {}",
        summary.tally.ghost_turns
    );
    Ok(())
}

fn bounty_hunt_expectation(summary: &SimulationSummary) -> Result<()> {
    for event in &summary.events {
        if event.action != EventAction::Bounty {
            continue;
        }
        anyhow::ensure!(
            i64::from(event.delta) == i64::from(ELIMINATION_BOUNTY),
            "Bounty paid {} VP: {}",
            event.delta,
            event.message
        );
        anyhow::ensure!(
            event.actor.is_some() && event.actor != event.target,
            "Bounty without a distinct killer: {}",
            event.message
        );
    }
    anyhow::ensure!(
        summary.tally.bounties == summary.tally.damage_kills,
        "{} bounties for {} damage kills",
        summary.tally.bounties,
        summary.tally.damage_kills
    );
    Ok(())
}

/// Every closed round pays exactly the seats alive at the wrap, including the
/// wrap that ends the game.
fn round_bonus_expectation(summary: &SimulationSummary) -> Result<()> {
    let mut fallen = BTreeSet::new();
    let mut per_round: BTreeMap<u32, (Vec<usize>, Vec<usize>)> = BTreeMap::new();
    for event in &summary.events {
        match event.action {
            EventAction::Fallen => {
                if let Some(seat) = event.target.or(event.actor) {
                    fallen.insert(seat);
                }
            }
            EventAction::RoundBonus => {
                anyhow::ensure!(
                    i64::from(event.delta) == i64::from(ROUND_SURVIVAL_BONUS),
                    "Round bonus paid {} VP",
                    event.delta
                );
                let Some(seat) = event.actor else {
                    anyhow::bail!("Round bonus without a seat: {}", event.message);
                };
                let (paid, _) = per_round.entry(event.id.round).or_insert_with(|| {
                    let alive = (0..ROSTER_SIZE).filter(|s| !fallen.contains(s)).collect();
                    (Vec::new(), alive)
                });
                paid.push(seat);
            }
            _ => {}
        }
    }

    for (expected, (round, (paid, alive))) in (1..).zip(&per_round) {
        anyhow::ensure!(*round == expected, "Round {expected} closed without a bonus");
        anyhow::ensure!(
            paid == alive,
            "Round {round} paid seats {paid:?}, alive were {alive:?}"
        );
    }

    let paid_total: usize = per_round.values().map(|(paid, _)| paid.len()).sum();
    anyhow::ensure!(
        paid_total == summary.tally.round_bonuses,
        "{paid_total} bonuses in the ledger, {} tallied",
        summary.tally.round_bonuses
    );

    let last = per_round.keys().last().copied().unwrap_or(0);
    if let Some(outcome) = &summary.outcome {
        match outcome.ending {
            Ending::RoundCap => anyhow::ensure!(
                last == summary.round_cap,
                "Final wrap of round {} paid nothing",
                summary.round_cap
            ),
            Ending::LastStanding => anyhow::ensure!(
                last == outcome.rounds_played || last + 1 == outcome.rounds_played,
                "Bonus paid for round {last} of {}",
                outcome.rounds_played
            ),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::game_tester::GameTester;

    fn run(scenario: &TestScenario, seeds: std::ops::Range<u64>) {
        let tester = GameTester::new(false);
        for seed in seeds {
            let summary = tester.run_plan(&scenario.plan, seed).unwrap();
            assert!(summary.violations.is_empty(), "{:?}", summary.violations);
            for expectation in &scenario.plan.expectations {
                expectation.evaluate(&summary).unwrap();
            }
        }
    }

    #[test]
    fn rules_scenarios_hold_across_seeds() {
        run(&round_cap_scenario(), 0..16);
        run(&rejection_probe_scenario(), 0..4);
        run(&ghost_turns_scenario(), 0..16);
        run(&bounty_hunt_scenario(), 0..16);
        run(&round_bonus_scenario(), 0..16);
        let mut short = round_bonus_scenario();
        short.plan = short.plan.with_round_cap(2);
        run(&short, 0..16);
    }
}
