//! Effect resolution.
//!
//! The resolver applies an [`Effect`] to players the engine has already looked
//! up and validated. It never searches the roster. Each function records the
//! events it causes and reports the step the state machine takes next.

use crate::constants::{BLESS_VP, CURSE_VP, ELIMINATION_BOUNTY, ULTIMATE_VP};
use crate::effect::{CastMode, Effect, EffectKind};
use crate::error::GameError;
use crate::event::{EventAction, EventLog};
use crate::player::Player;

/// What the state machine does once an effect has been looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Effect is fully applied; the turn passes on.
    Advance,
    /// Waiting for an opponent to be picked.
    AwaitTarget,
    /// Waiting for a living player to be picked by a fallen caster.
    AwaitTargetFallen,
    /// Waiting for one of the ultimate options.
    AwaitChoice,
}

/// Outcome of a targeted effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    /// Target fell as a direct result of this effect.
    pub eliminated: bool,
    /// VP paid to the actor as an elimination bounty.
    pub bounty: u32,
}

/// Event sink plus the round the events belong to.
#[derive(Debug)]
pub struct ResolveCtx<'a> {
    pub log: &'a mut EventLog,
    pub round: u32,
}

impl ResolveCtx<'_> {
    fn emit(
        &mut self,
        actor: &Player,
        action: EventAction,
        delta: i32,
        target: Option<&Player>,
        message: String,
    ) {
        self.log.record(
            self.round,
            Some(actor.seat()),
            action,
            delta,
            target.map(Player::seat),
            message,
        );
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EffectResolver;

impl EffectResolver {
    /// Decide where a freshly rolled effect leads.
    #[must_use]
    pub const fn next_step(effect: &Effect) -> Step {
        match effect.kind {
            EffectKind::SelfDamage | EffectKind::Heal | EffectKind::None => Step::Advance,
            EffectKind::TargetDamage | EffectKind::StealVp => Step::AwaitTarget,
            EffectKind::Choice => Step::AwaitChoice,
            EffectKind::BuffFallen | EffectKind::CurseFallen => Step::AwaitTargetFallen,
        }
    }

    /// Apply an effect that needs no further input to the roller.
    ///
    /// # Errors
    ///
    /// Propagates player-level rejections; none occur for table effects on a
    /// roller of the matching status.
    pub fn apply_immediate(
        effect: &Effect,
        actor: &mut Player,
        ctx: &mut ResolveCtx<'_>,
    ) -> Result<(), GameError> {
        match effect.kind {
            EffectKind::SelfDamage => {
                let report = actor.take_damage(effect.magnitude)?;
                ctx.emit(
                    actor,
                    EventAction::SelfDamage,
                    -i32::from(report.dealt),
                    None,
                    format!("{} took {} DMG", actor.name(), report.dealt),
                );
                if report.fell {
                    ctx.emit(
                        actor,
                        EventAction::Fallen,
                        0,
                        None,
                        format!("{} DIED!", actor.name()),
                    );
                }
            }
            EffectKind::Heal => {
                let healed = capped_heal(actor, effect.magnitude)?;
                ctx.emit(
                    actor,
                    EventAction::Heal,
                    i32::from(healed),
                    None,
                    format!("{} healed {} HP", actor.name(), healed),
                );
            }
            _ => {
                ctx.emit(
                    actor,
                    EventAction::NoEffect,
                    0,
                    None,
                    format!("{} drifts through the void", actor.name()),
                );
            }
        }
        Ok(())
    }

    /// Apply damage or a VP steal from `actor` to an eligible `target`.
    ///
    /// # Errors
    ///
    /// Propagates player-level rejections.
    pub fn apply_targeted(
        effect: &Effect,
        actor: &mut Player,
        target: &mut Player,
        ctx: &mut ResolveCtx<'_>,
    ) -> Result<Resolution, GameError> {
        mark_pair(actor, target);
        match effect.kind {
            EffectKind::StealVp => {
                let taken = actor.steal_vp(target, u32::from(effect.magnitude))?;
                ctx.emit(
                    actor,
                    EventAction::StealVp,
                    vp_delta(taken),
                    Some(target),
                    format!("{} stole {} VP from {}", actor.name(), taken, target.name()),
                );
                Ok(Resolution::default())
            }
            _ => {
                let report = target.take_damage(effect.magnitude)?;
                ctx.emit(
                    actor,
                    EventAction::Damage,
                    -i32::from(report.dealt),
                    Some(target),
                    format!(
                        "{} hit {} for {} DMG",
                        actor.name(),
                        target.name(),
                        report.dealt
                    ),
                );
                let mut resolution = Resolution {
                    eliminated: report.fell,
                    bounty: 0,
                };
                if report.fell {
                    ctx.emit(
                        actor,
                        EventAction::Fallen,
                        0,
                        Some(target),
                        format!("{} ELIMINATED", target.name()),
                    );
                    if actor.is_alive() {
                        actor.gain_vp(ELIMINATION_BOUNTY)?;
                        resolution.bounty = ELIMINATION_BOUNTY;
                        ctx.emit(
                            actor,
                            EventAction::Bounty,
                            vp_delta(ELIMINATION_BOUNTY),
                            Some(target),
                            format!("{} claims the bounty (+{ELIMINATION_BOUNTY} VP)", actor.name()),
                        );
                    }
                }
                Ok(resolution)
            }
        }
    }

    /// Apply a fallen player's blessing or curse to a living target.
    ///
    /// Curses never pay a bounty, even when they finish the target off.
    ///
    /// # Errors
    ///
    /// Propagates player-level rejections.
    pub fn apply_fallen_cast(
        effect: &Effect,
        mode: CastMode,
        caster: &mut Player,
        target: &mut Player,
        ctx: &mut ResolveCtx<'_>,
    ) -> Result<Resolution, GameError> {
        mark_pair(caster, target);
        let blessing = effect.kind == EffectKind::BuffFallen;
        match (blessing, mode) {
            (true, CastMode::Hp) => {
                let healed = capped_heal(target, effect.magnitude)?;
                ctx.emit(
                    caster,
                    EventAction::Bless,
                    i32::from(healed),
                    Some(target),
                    format!("{} blessed {} (+{} HP)", caster.name(), target.name(), healed),
                );
                Ok(Resolution::default())
            }
            (true, CastMode::Vp) => {
                target.gain_vp(BLESS_VP)?;
                ctx.emit(
                    caster,
                    EventAction::Bless,
                    vp_delta(BLESS_VP),
                    Some(target),
                    format!("{} blessed {} (+{BLESS_VP} VP)", caster.name(), target.name()),
                );
                Ok(Resolution::default())
            }
            (false, CastMode::Hp) => {
                let report = target.take_damage(effect.magnitude)?;
                ctx.emit(
                    caster,
                    EventAction::Curse,
                    -i32::from(report.dealt),
                    Some(target),
                    format!(
                        "{} haunted {} (-{} HP)",
                        caster.name(),
                        target.name(),
                        report.dealt
                    ),
                );
                if report.fell {
                    ctx.emit(
                        caster,
                        EventAction::Fallen,
                        0,
                        Some(target),
                        format!("{} ELIMINATED", target.name()),
                    );
                }
                Ok(Resolution {
                    eliminated: report.fell,
                    bounty: 0,
                })
            }
            (false, CastMode::Vp) => {
                let drained = target.drain_vp(CURSE_VP)?;
                ctx.emit(
                    caster,
                    EventAction::Curse,
                    -vp_delta(drained),
                    Some(target),
                    format!(
                        "{} haunted {} (-{} VP)",
                        caster.name(),
                        target.name(),
                        drained
                    ),
                );
                Ok(Resolution::default())
            }
        }
    }

    /// The VP branch of the ultimate roll.
    ///
    /// # Errors
    ///
    /// Propagates player-level rejections.
    pub fn grant_ultimate_vp(actor: &mut Player, ctx: &mut ResolveCtx<'_>) -> Result<(), GameError> {
        actor.gain_vp(ULTIMATE_VP)?;
        ctx.emit(
            actor,
            EventAction::GainVp,
            vp_delta(ULTIMATE_VP),
            None,
            format!("{} gained {ULTIMATE_VP} VP", actor.name()),
        );
        Ok(())
    }
}

/// Heal up to the ceiling; a player already at full health gains nothing.
fn capped_heal(player: &mut Player, amount: u8) -> Result<u8, GameError> {
    let healed = amount.min(player.heal_headroom());
    if healed > 0 {
        player.heal(healed)?;
    }
    Ok(healed)
}

fn mark_pair(actor: &mut Player, target: &mut Player) {
    actor.mark_targeted(target.seat());
    target.mark_targeted_by(actor.seat());
}

fn vp_delta(amount: u32) -> i32 {
    i32::try_from(amount).unwrap_or(i32::MAX)
}
