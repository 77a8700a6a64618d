//! Effect descriptors produced by the roll table and the choices they open.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BLESS_HP, CURSE_HP, OPTION_CAST_HP, OPTION_CAST_VP, OPTION_DEAL_DAMAGE, OPTION_GAIN_VP,
    ULTIMATE_DAMAGE,
};
use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    SelfDamage,
    TargetDamage,
    StealVp,
    Heal,
    Choice,
    BuffFallen,
    CurseFallen,
    None,
}

/// Which seats an effect may be aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetFilter {
    /// A living player other than the roller.
    AliveOpponent,
    /// Any living player.
    AnyAlive,
}

/// A resolved roll waiting to be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub magnitude: u8,
    pub target_filter: Option<TargetFilter>,
}

impl Effect {
    #[must_use]
    pub const fn self_damage(amount: u8) -> Self {
        Self::untargeted(EffectKind::SelfDamage, amount)
    }

    #[must_use]
    pub const fn heal(amount: u8) -> Self {
        Self::untargeted(EffectKind::Heal, amount)
    }

    #[must_use]
    pub const fn target_damage(amount: u8) -> Self {
        Self::targeted(EffectKind::TargetDamage, amount, TargetFilter::AliveOpponent)
    }

    #[must_use]
    pub const fn steal_vp(amount: u8) -> Self {
        Self::targeted(EffectKind::StealVp, amount, TargetFilter::AliveOpponent)
    }

    #[must_use]
    pub const fn choice() -> Self {
        Self::untargeted(EffectKind::Choice, ULTIMATE_DAMAGE)
    }

    #[must_use]
    pub const fn buff_fallen() -> Self {
        Self::targeted(EffectKind::BuffFallen, BLESS_HP, TargetFilter::AnyAlive)
    }

    #[must_use]
    pub const fn curse_fallen() -> Self {
        Self::targeted(EffectKind::CurseFallen, CURSE_HP, TargetFilter::AnyAlive)
    }

    #[must_use]
    pub const fn none() -> Self {
        Self::untargeted(EffectKind::None, 0)
    }

    const fn untargeted(kind: EffectKind, magnitude: u8) -> Self {
        Self {
            kind,
            magnitude,
            target_filter: None,
        }
    }

    const fn targeted(kind: EffectKind, magnitude: u8, filter: TargetFilter) -> Self {
        Self {
            kind,
            magnitude,
            target_filter: Some(filter),
        }
    }

    /// Whether the effect resolves without any further input.
    #[must_use]
    pub const fn is_immediate(&self) -> bool {
        matches!(
            self.kind,
            EffectKind::SelfDamage | EffectKind::Heal | EffectKind::None
        )
    }

    /// Whether this is a cast by a fallen roller.
    #[must_use]
    pub const fn is_fallen_cast(&self) -> bool {
        matches!(self.kind, EffectKind::BuffFallen | EffectKind::CurseFallen)
    }
}

/// The two branches offered by the "ULTIMATE" roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UltimateOption {
    DealDamage,
    GainVp,
}

impl UltimateOption {
    pub const ALL: [Self; 2] = [Self::DealDamage, Self::GainVp];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::DealDamage => OPTION_DEAL_DAMAGE,
            Self::GainVp => OPTION_GAIN_VP,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DealDamage => "DEAL 6 DMG",
            Self::GainVp => "GAIN 3 VP",
        }
    }

    /// Parse an option id.
    ///
    /// # Errors
    ///
    /// `UnknownOption` for anything but the two ultimate ids.
    pub fn parse(id: &str) -> Result<Self, GameError> {
        Self::ALL
            .into_iter()
            .find(|option| option.id() == id)
            .ok_or_else(|| GameError::UnknownOption {
                option: id.to_string(),
            })
    }
}

/// Which resource a fallen cast touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CastMode {
    #[default]
    Hp,
    Vp,
}

impl CastMode {
    pub const ALL: [Self; 2] = [Self::Hp, Self::Vp];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Hp => OPTION_CAST_HP,
            Self::Vp => OPTION_CAST_VP,
        }
    }

    /// Button label for the given cast.
    #[must_use]
    pub const fn label(self, kind: EffectKind) -> &'static str {
        match (self, kind) {
            (Self::Hp, EffectKind::CurseFallen) => "-2 HP",
            (Self::Vp, EffectKind::CurseFallen) => "-1 VP",
            (Self::Hp, _) => "+2 HP",
            (Self::Vp, _) => "+1 VP",
        }
    }

    /// Parse a cast mode id.
    ///
    /// # Errors
    ///
    /// `UnknownOption` for anything but `hp` or `vp`.
    pub fn parse(id: &str) -> Result<Self, GameError> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.id() == id)
            .ok_or_else(|| GameError::UnknownOption {
                option: id.to_string(),
            })
    }
}

/// A labeled option the presentation layer can offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceLabel {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub selected: bool,
}

impl ChoiceLabel {
    pub(crate) fn new(id: &str, label: &str, selected: bool) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediacy_matches_kind() {
        assert!(Effect::self_damage(3).is_immediate());
        assert!(Effect::heal(3).is_immediate());
        assert!(Effect::none().is_immediate());
        assert!(!Effect::choice().is_immediate());
        assert!(!Effect::target_damage(2).is_immediate());
        assert!(Effect::curse_fallen().is_fallen_cast());
        assert!(!Effect::steal_vp(1).is_fallen_cast());
    }

    #[test]
    fn option_ids_parse() {
        assert_eq!(UltimateOption::parse("dmg_6"), Ok(UltimateOption::DealDamage));
        assert_eq!(UltimateOption::parse("vp_3"), Ok(UltimateOption::GainVp));
        assert!(matches!(
            UltimateOption::parse("dmg_7"),
            Err(GameError::UnknownOption { .. })
        ));
        assert_eq!(CastMode::parse("vp"), Ok(CastMode::Vp));
        assert!(CastMode::parse("mp").is_err());
    }

    #[test]
    fn cast_labels_follow_direction() {
        assert_eq!(CastMode::Hp.label(EffectKind::BuffFallen), "+2 HP");
        assert_eq!(CastMode::Vp.label(EffectKind::CurseFallen), "-1 VP");
    }

    #[test]
    fn effect_serializes_snake_case() {
        let json = serde_json::to_string(&Effect::target_damage(4)).expect("serialize");
        assert!(json.contains("\"target_damage\""));
        assert!(json.contains("\"alive_opponent\""));
    }
}
