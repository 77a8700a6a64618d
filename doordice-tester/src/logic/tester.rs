use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::common::scenario::TestScenario;
use crate::logic::game_tester::{GameTester, SimulationPlan, SimulationSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
    #[serde(default)]
    pub records: Vec<GameRecord>,
}

/// One finished game, flattened for tabular reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub seed: u64,
    pub style: String,
    pub ending: String,
    pub winner: Option<String>,
    pub winner_vp: Option<u32>,
    pub rounds_played: u32,
    pub inputs: usize,
    pub rolls: usize,
    pub ghost_turns: usize,
    pub damage_kills: usize,
    pub curse_kills: usize,
    pub self_kills: usize,
    pub bounties: usize,
    pub round_bonuses: usize,
    pub violations: usize,
}

impl GameRecord {
    #[must_use]
    pub fn from_summary(summary: &SimulationSummary) -> Self {
        let winner = summary
            .outcome
            .as_ref()
            .and_then(|outcome| outcome.winner_standing());
        Self {
            seed: summary.seed,
            style: summary.style.label().to_string(),
            ending: summary.ending_label(),
            winner: winner.map(|standing| standing.name.clone()),
            winner_vp: winner.map(|standing| standing.vp),
            rounds_played: summary.outcome.as_ref().map_or(0, |o| o.rounds_played),
            inputs: summary.tally.inputs,
            rolls: summary.tally.rolls,
            ghost_turns: summary.tally.ghost_turns,
            damage_kills: summary.tally.damage_kills,
            curse_kills: summary.tally.curse_kills,
            self_kills: summary.tally.self_kills,
            bounties: summary.tally.bounties,
            round_bonuses: summary.tally.round_bonuses,
            violations: summary.violations.len(),
        }
    }
}

pub struct LogicTester {
    verbose: bool,
}

impl LogicTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Testing scenario: {} (style: {} seed: {})",
                    scenario.name.bright_white(),
                    scenario.plan.style,
                    seed
                );
            }

            results.push(self.run_single_scenario(scenario, seed, iterations));
        }

        results
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let outcome = self.run_simulation_iterations(&scenario.plan, seed, iterations);

        let average_duration = if outcome.performance_data.is_empty() {
            Duration::ZERO
        } else {
            outcome.performance_data.iter().sum::<Duration>()
                / u32::try_from(outcome.performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: outcome.failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: outcome.successes,
            failures: outcome.failures,
            average_duration,
            performance_data: outcome.performance_data,
            records: outcome.records,
        }
    }

    fn run_simulation_iterations(
        &self,
        plan: &SimulationPlan,
        seed: u64,
        iterations: usize,
    ) -> IterationOutcome {
        let tester = GameTester::new(self.verbose);
        let mut outcome = IterationOutcome::default();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            let summary = match tester.run_plan(plan, iteration_seed) {
                Ok(summary) => summary,
                Err(err) => {
                    outcome.failures.push(format!(
                        "Iteration {} (seed {}): setup failed: {err}",
                        i + 1,
                        iteration_seed
                    ));
                    continue;
                }
            };
            outcome.records.push(GameRecord::from_summary(&summary));

            if let Some(err) = evaluate_expectations(plan, &summary) {
                let rounds = summary.outcome.as_ref().map_or(0, |o| o.rounds_played);
                let status = if summary.game_ended() {
                    "ended"
                } else {
                    "halted"
                };
                outcome.failures.push(format!(
                    "Iteration {} (style {}, seed {}, inputs {}, rounds {}, status {}, ending '{}'): {} | {}",
                    i + 1,
                    summary.style.label(),
                    summary.seed,
                    summary.tally.inputs,
                    rounds,
                    status,
                    summary.ending_label(),
                    err,
                    summarize_standings(&summary)
                ));

                if self.verbose {
                    println!(
                        "  ❌ Iteration {}/{} failed: {}",
                        i + 1,
                        iterations,
                        err.clone().red()
                    );
                }
            } else {
                outcome.successes += 1;
                let duration = start_time.elapsed();
                outcome.performance_data.push(duration);

                if self.verbose {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) rounds:{} ending:{} style:{}",
                        i + 1,
                        iterations,
                        summary.outcome.as_ref().map_or(0, |o| o.rounds_played),
                        summary.ending_label(),
                        summary.style.label()
                    );
                }
            }
        }

        outcome
    }
}

#[derive(Debug, Default)]
struct IterationOutcome {
    successes: usize,
    failures: Vec<String>,
    performance_data: Vec<Duration>,
    records: Vec<GameRecord>,
}

/// Rule violations always fail an iteration; scenario expectations come after.
fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    if let Some(first) = summary.violations.first() {
        return Some(format!(
            "{} rules violation(s), first: {first}",
            summary.violations.len()
        ));
    }
    plan.expectations
        .iter()
        .find_map(|expectation| expectation.evaluate(summary).err())
        .map(|err| err.to_string())
}

fn summarize_standings(summary: &SimulationSummary) -> String {
    let Some(outcome) = &summary.outcome else {
        return "no standings recorded".to_string();
    };
    outcome
        .standings
        .iter()
        .map(doordice_game::Standing::line)
        .collect::<Vec<_>>()
        .join(" | ")
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let micros: Vec<u128> = durations.iter().map(Duration::as_micros).collect();
        micros.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = Vec::<u128>::deserialize(deserializer)?;
        Ok(micros
            .into_iter()
            .map(|m| Duration::from_micros(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}
