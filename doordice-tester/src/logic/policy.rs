use std::fmt;

use doordice_game::{
    CastMode, EffectKind, Phase, PlayerView, Seat, StateSnapshot, UltimateOption,
    constants::OPTION_CAST_HP,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Input driver for automated play. Policies only ever pick among the
/// targets and options the snapshot offers; they never touch the engine.
pub trait InputPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Pick one of `state.eligible_targets`.
    fn pick_target(&mut self, state: &StateSnapshot) -> Option<Seat>;

    /// Pick one of the ultimate option ids.
    fn pick_option(&mut self, state: &StateSnapshot) -> String;

    /// Cast mode for a fallen roller's blessing or curse.
    fn pick_cast_mode(&mut self, state: &StateSnapshot) -> &'static str;
}

/// Built-in play styles for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayStyle {
    /// Uniformly random picks.
    Random,
    /// Always goes for damage and the weakest target.
    Aggressive,
    /// Steals from and curses the VP leader, banks VP when offered.
    VpHunter,
}

impl PlayStyle {
    pub const ALL: [Self; 3] = [Self::Random, Self::Aggressive, Self::VpHunter];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Random => "Random",
            Self::Aggressive => "Aggressive",
            Self::VpHunter => "VP Hunter",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn InputPolicy> {
        match self {
            Self::Random => Box::new(RandomPolicy::new(seed)),
            Self::Aggressive => Box::new(AggressivePolicy),
            Self::VpHunter => Box::new(VpHunterPolicy),
        }
    }
}

impl fmt::Display for PlayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn candidates(state: &StateSnapshot) -> impl Iterator<Item = &PlayerView> {
    state
        .eligible_targets
        .iter()
        .filter_map(|&seat| state.players.get(seat))
}

fn is_blessing(state: &StateSnapshot) -> bool {
    state.phase == Phase::AwaitingTargetFallen
        && state
            .last_roll
            .is_some_and(|roll| roll.effect.kind == EffectKind::BuffFallen)
}

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl InputPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn pick_target(&mut self, state: &StateSnapshot) -> Option<Seat> {
        state.eligible_targets.choose(&mut self.rng).copied()
    }

    fn pick_option(&mut self, _state: &StateSnapshot) -> String {
        let option = UltimateOption::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(UltimateOption::GainVp);
        option.id().to_string()
    }

    fn pick_cast_mode(&mut self, _state: &StateSnapshot) -> &'static str {
        if self.rng.gen_bool(0.5) {
            CastMode::Vp.id()
        } else {
            CastMode::Hp.id()
        }
    }
}

struct AggressivePolicy;

impl InputPolicy for AggressivePolicy {
    fn name(&self) -> &'static str {
        "aggressive"
    }

    fn pick_target(&mut self, state: &StateSnapshot) -> Option<Seat> {
        // Ghosts bless the strongest; everything else goes at the weakest.
        if is_blessing(state) {
            candidates(state).max_by_key(|p| p.hp).map(|p| p.seat)
        } else {
            candidates(state).min_by_key(|p| p.hp).map(|p| p.seat)
        }
    }

    fn pick_option(&mut self, _state: &StateSnapshot) -> String {
        UltimateOption::DealDamage.id().to_string()
    }

    fn pick_cast_mode(&mut self, _state: &StateSnapshot) -> &'static str {
        OPTION_CAST_HP
    }
}

struct VpHunterPolicy;

impl InputPolicy for VpHunterPolicy {
    fn name(&self) -> &'static str {
        "vp-hunter"
    }

    fn pick_target(&mut self, state: &StateSnapshot) -> Option<Seat> {
        if is_blessing(state) {
            candidates(state).min_by_key(|p| p.vp).map(|p| p.seat)
        } else {
            candidates(state).max_by_key(|p| p.vp).map(|p| p.seat)
        }
    }

    fn pick_option(&mut self, _state: &StateSnapshot) -> String {
        UltimateOption::GainVp.id().to_string()
    }

    fn pick_cast_mode(&mut self, _state: &StateSnapshot) -> &'static str {
        CastMode::Vp.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doordice_game::{GameSession, ScriptedDie, SessionConfig};

    fn awaiting_target(faces: &[u8]) -> StateSnapshot {
        let config = SessionConfig::default().with_shuffle_seating(false);
        let die = ScriptedDie::from_values(faces).unwrap();
        let mut session = GameSession::with_die(config, Box::new(die)).unwrap();
        // Seat 0 jabs seat 2, then seat 1 rolls a heavy strike.
        session.request_roll().unwrap();
        session.choose_target(2).unwrap();
        session.request_roll().unwrap();
        let state = session.current_state();
        assert_eq!(state.phase, Phase::AwaitingTarget);
        state
    }

    #[test]
    fn aggressive_targets_the_weakest() {
        let state = awaiting_target(&[2, 4]);
        assert_eq!(AggressivePolicy.pick_target(&state), Some(2));
        assert_eq!(AggressivePolicy.pick_option(&state), "dmg_6");
    }

    #[test]
    fn vp_hunter_banks_points() {
        let state = awaiting_target(&[2, 3]);
        assert_eq!(VpHunterPolicy.pick_option(&state), "vp_3");
        assert_eq!(VpHunterPolicy.pick_cast_mode(&state), "vp");
        assert!(VpHunterPolicy.pick_target(&state).is_some());
    }

    #[test]
    fn random_policy_stays_within_offers() {
        let state = awaiting_target(&[2, 4]);
        let mut policy = RandomPolicy::new(7);
        for _ in 0..20 {
            let seat = policy.pick_target(&state).unwrap();
            assert!(state.eligible_targets.contains(&seat));
            let option = policy.pick_option(&state);
            assert!(option == "dmg_6" || option == "vp_3");
        }
    }

    #[test]
    fn labels_are_stable() {
        let labels: Vec<&str> = PlayStyle::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["Random", "Aggressive", "VP Hunter"]);
    }
}
