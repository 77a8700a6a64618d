use anyhow::Result;
use doordice_game::{EventAction, GameEvent};

use super::{TestScenario, completed_game_expectation};
use crate::logic::{PlayStyle, SimulationPlan, SimulationSummary};

/// Share of inputs preceded by an illegal probe during full games.
const FULL_GAME_PROBE_RATE: f64 = 0.1;

pub fn full_game_scenario(style: PlayStyle) -> TestScenario {
    let name = match style {
        PlayStyle::Random => "Full Game - Random Play",
        PlayStyle::Aggressive => "Full Game - Aggressive Play",
        PlayStyle::VpHunter => "Full Game - VP Hoarder Play",
    };
    let plan = full_game_plan(style).with_expectation(completed_game_expectation);
    let plan = match style {
        PlayStyle::Random => plan,
        PlayStyle::Aggressive => plan.with_expectation(aggressive_expectation),
        PlayStyle::VpHunter => plan.with_expectation(vp_hunter_expectation),
    };
    TestScenario::simulation(name, plan)
}

pub fn full_game_plan(style: PlayStyle) -> SimulationPlan {
    SimulationPlan::new(style).with_probe_rate(FULL_GAME_PROBE_RATE)
}

/// The ultimate roll is followed directly by whatever the policy picked.
fn ultimate_followups(events: &[GameEvent]) -> impl Iterator<Item = EventAction> + '_ {
    events.windows(2).filter_map(|pair| {
        (pair[0].action == EventAction::Rolled && pair[0].delta == 6).then_some(pair[1].action)
    })
}

fn aggressive_expectation(summary: &SimulationSummary) -> Result<()> {
    let banked = ultimate_followups(&summary.events)
        .filter(|action| *action == EventAction::GainVp)
        .count();
    anyhow::ensure!(
        banked == 0,
        "Aggressive play banked VP on {banked} ultimate roll(s)"
    );
    Ok(())
}

fn vp_hunter_expectation(summary: &SimulationSummary) -> Result<()> {
    let strikes = ultimate_followups(&summary.events)
        .filter(|action| *action == EventAction::Damage)
        .count();
    anyhow::ensure!(
        strikes == 0,
        "VP hoarder took the damage option on {strikes} ultimate roll(s)"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::game_tester::GameTester;

    #[test]
    fn every_style_passes_its_expectations() {
        let tester = GameTester::new(false);
        for style in PlayStyle::ALL {
            let scenario = full_game_scenario(style);
            for seed in 0..8 {
                let summary = tester.run_plan(&scenario.plan, seed).unwrap();
                assert!(summary.violations.is_empty(), "{:?}", summary.violations);
                for expectation in &scenario.plan.expectations {
                    expectation.evaluate(&summary).unwrap();
                }
            }
        }
    }
}
