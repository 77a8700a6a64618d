use anyhow::{Result, bail};
use doordice_game::constants::DEFAULT_SEED;
use std::collections::HashSet;

/// Widest `start..end` range accepted on the command line.
const MAX_SEED_RANGE: u64 = 100_000;

/// Resolve a list of CLI seed arguments into unique numeric seeds.
///
/// Accepts decimal integers (negative values fold to their magnitude) and
/// `start..end` half-open ranges. Order of first appearance is kept.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut pending: Vec<u64> = Vec::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        if let Some((start, end)) = token.split_once("..") {
            let (Some(start), Some(end)) = (parse_seed(start), parse_seed(end)) else {
                bail!("Unrecognized seed range: {token}");
            };
            if start >= end {
                bail!("Empty seed range: {token}");
            }
            if end - start > MAX_SEED_RANGE {
                bail!("Seed range too large: {token} (at most {MAX_SEED_RANGE} seeds)");
            }
            pending.extend(start..end);
            continue;
        }

        match parse_seed(token) {
            Some(seed) => pending.push(seed),
            None => bail!("Unrecognized seed token: {token}"),
        }
    }

    let mut seen = HashSet::new();
    pending.retain(|seed| seen.insert(*seed));

    if pending.is_empty() {
        pending.push(DEFAULT_SEED);
    }

    Ok(pending)
}

fn parse_seed(token: &str) -> Option<u64> {
    if let Ok(value) = token.parse::<i64>() {
        return Some(value.unsigned_abs());
    }
    token.parse::<u64>().ok()
}
