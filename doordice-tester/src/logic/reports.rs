use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use super::{GameRecord, ScenarioResult};
use crate::common::util::percent;

/// Balance figures for every game a scenario played across all seeds.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioAggregate {
    pub scenario_name: String,
    pub games: usize,
    pub last_standing_pct: f64,
    pub round_cap_pct: f64,
    pub mean_rounds: f64,
    pub mean_bounties: f64,
    pub mean_ghost_turns: f64,
    pub curse_kills: usize,
    pub self_kills: usize,
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate_results(results: &[ScenarioResult]) -> Vec<ScenarioAggregate> {
    let mut grouped: BTreeMap<&str, Vec<&GameRecord>> = BTreeMap::new();
    for result in results {
        grouped
            .entry(result.scenario_name.as_str())
            .or_default()
            .extend(result.records.iter());
    }

    grouped
        .into_iter()
        .map(|(name, records)| {
            let games = records.len();
            let mean = |f: fn(&GameRecord) -> usize| {
                if games == 0 {
                    0.0
                } else {
                    records.iter().map(|r| f(r)).sum::<usize>() as f64 / games as f64
                }
            };
            let endings = |label: &str| records.iter().filter(|r| r.ending == label).count();
            ScenarioAggregate {
                scenario_name: name.to_string(),
                games,
                last_standing_pct: percent(endings("last_standing"), games),
                round_cap_pct: percent(endings("round_cap"), games),
                mean_rounds: mean(|r| r.rounds_played as usize),
                mean_bounties: mean(|r| r.bounties),
                mean_ghost_turns: mean(|r| r.ghost_turns),
                curse_kills: records.iter().map(|r| r.curse_kills).sum(),
                self_kills: records.iter().map(|r| r.self_kills).sum(),
            }
        })
        .collect()
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Logic Test Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==============================".cyan())?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    writeln!(out, "Total scenarios: {total_tests}")?;
    writeln!(out, "Passed: {}", passed_tests.to_string().green())?;
    writeln!(out, "Failed: {}", failed_tests.to_string().red())?;
    let success_rate = percent(passed_tests, total_tests);
    writeln!(out, "Success rate: {success_rate:.1}%")?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };

        writeln!(
            out,
            "{} {} (seed {})",
            status,
            result.scenario_name.bold(),
            result.seed
        )?;
        writeln!(
            out,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;

        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    let aggregates = aggregate_results(results);
    if !aggregates.is_empty() {
        writeln!(out, "{}", "🎲 Balance Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "==================".yellow())?;
        for agg in &aggregates {
            writeln!(
                out,
                "{}: {} games | last standing {:.1}% | round cap {:.1}% | rounds {:.2} | bounties {:.2} | ghost turns {:.2} | curse kills {} | self kills {}",
                agg.scenario_name.bold(),
                agg.games,
                agg.last_standing_pct,
                agg.round_cap_pct,
                agg.mean_rounds,
                agg.mean_bounties,
                agg.mean_ghost_turns,
                agg.curse_kills,
                agg.self_kills
            )?;
        }
        writeln!(out)?;
    }

    let fastest = results.iter().min_by_key(|r| r.average_duration);
    let slowest = results.iter().max_by_key(|r| r.average_duration);
    if let (Some(fastest), Some(slowest)) = (fastest, slowest) {
        writeln!(out, "{}", "⚡ Performance Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "=====================".yellow())?;
        writeln!(
            out,
            "Fastest: {} ({:?})",
            fastest.scenario_name.green(),
            fastest.average_duration
        )?;
        writeln!(
            out,
            "Slowest: {} ({:?})",
            slowest.scenario_name.yellow(),
            slowest.average_duration
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "# Do or Dice Logic Test Results\n")?;
    writeln!(
        out,
        "_Generated {}_\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total scenarios**: {total_tests}")?;
    writeln!(out, "- **Passed**: {passed_tests}")?;
    writeln!(out, "- **Failed**: {failed_tests}")?;
    let success_rate = percent(passed_tests, total_tests);
    writeln!(out, "- **Success rate**: {success_rate:.1}%\n")?;

    let aggregates = aggregate_results(results);
    if !aggregates.is_empty() {
        writeln!(out, "## Balance\n")?;
        writeln!(
            out,
            "| Scenario | Games | Last standing | Round cap | Mean rounds | Mean bounties |"
        )?;
        writeln!(out, "|---|---|---|---|---|---|")?;
        for agg in &aggregates {
            writeln!(
                out,
                "| {} | {} | {:.1}% | {:.1}% | {:.2} | {:.2} |",
                agg.scenario_name,
                agg.games,
                agg.last_standing_pct,
                agg.round_cap_pct,
                agg.mean_rounds,
                agg.mean_bounties
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Detailed Results\n")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };

        writeln!(
            out,
            "### {} {} (seed {})\n",
            status, result.scenario_name, result.seed
        )?;
        writeln!(
            out,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "- **Average time**: {:?}", result.average_duration)?;

        if !result.failures.is_empty() {
            writeln!(out, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

const CSV_HEADER: &str = "scenario,seed,style,ending,winner,winner_vp,rounds_played,inputs,rolls,ghost_turns,damage_kills,curse_kills,self_kills,bounties,round_bonuses,violations";

pub fn generate_csv_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for result in results {
        for record in &result.records {
            writeln!(
                out,
                "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
                csv_field(&result.scenario_name),
                record.seed,
                csv_field(&record.style),
                record.ending,
                record.winner.as_deref().map(csv_field).unwrap_or_default(),
                record.winner_vp.map(|vp| vp.to_string()).unwrap_or_default(),
                record.rounds_played,
                record.inputs,
                record.rolls,
                record.ghost_turns,
                record.damage_kills,
                record.curse_kills,
                record.self_kills,
                record.bounties,
                record.round_bonuses,
                record.violations
            )?;
        }
    }
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
