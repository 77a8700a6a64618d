//! The canonical two-column roll table.

use serde::Serialize;

use crate::constants::{
    HEAVY_STRIKE_DAMAGE, QUICK_JAB_DAMAGE, REGENERATE_HEAL, SELF_DAMAGE, STEAL_AMOUNT,
};
use crate::dice::DieFace;
use crate::effect::Effect;

/// One cell of the roll table: the effect plus its headline text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RollEntry {
    pub effect: Effect,
    pub title: &'static str,
    pub detail: &'static str,
}

impl RollEntry {
    const fn new(effect: Effect, title: &'static str, detail: &'static str) -> Self {
        Self {
            effect,
            title,
            detail,
        }
    }
}

const ALIVE: [RollEntry; 6] = [
    RollEntry::new(Effect::self_damage(SELF_DAMAGE), "CRITICAL FAIL", "Take 3 DMG"),
    RollEntry::new(Effect::target_damage(QUICK_JAB_DAMAGE), "QUICK JAB", "Deal 2 DMG"),
    RollEntry::new(Effect::steal_vp(STEAL_AMOUNT), "THIEF", "Steal 1 VP"),
    RollEntry::new(Effect::target_damage(HEAVY_STRIKE_DAMAGE), "HEAVY STRIKE", "Deal 4 DMG"),
    RollEntry::new(Effect::heal(REGENERATE_HEAL), "REGENERATE", "Heal 3 HP"),
    RollEntry::new(Effect::choice(), "ULTIMATE", "Choice: DMG or VP"),
];

const FALLEN: [RollEntry; 6] = [
    RollEntry::new(Effect::none(), "VOID MIST", "No Effect"),
    RollEntry::new(Effect::none(), "VOID MIST", "No Effect"),
    RollEntry::new(Effect::buff_fallen(), "SPIRIT BLESS", "Buff a Player"),
    RollEntry::new(Effect::buff_fallen(), "SPIRIT BLESS", "Buff a Player"),
    RollEntry::new(Effect::curse_fallen(), "HAUNT", "Curse a Player"),
    RollEntry::new(Effect::curse_fallen(), "HAUNT", "Curse a Player"),
];

/// Stateless lookup from face and roller status to an effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollTable;

impl RollTable {
    #[must_use]
    pub const fn lookup(face: DieFace, is_alive: bool) -> RollEntry {
        let index = (face.value() - DieFace::MIN) as usize;
        if is_alive { ALIVE[index] } else { FALLEN[index] }
    }
}
