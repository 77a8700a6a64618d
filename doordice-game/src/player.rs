//! Player entity and its validated resource operations.
//!
//! Hit points live in `0..=MAX_HP`, victory points never go negative, and a
//! fallen player stays fallen. Fields are private; the only way to change a
//! player is through the operations below, each of which either succeeds
//! completely or leaves the player untouched.

use serde::{Deserialize, Serialize};

use crate::constants::{HEAL_LIMIT, MAX_HP, ROUND_SURVIVAL_BONUS, VP_GRANT_LIMIT};
use crate::error::GameError;

/// Seat index at the table, `0..ROSTER_SIZE`.
pub type Seat = usize;

/// Life status of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    #[default]
    Alive,
    Fallen,
}

impl PlayerStatus {
    #[must_use]
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alive => "alive",
            Self::Fallen => "fallen",
        }
    }
}

impl std::fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a call to [`Player::take_damage`] actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageReport {
    /// Hit points actually removed (never more than the player had).
    pub dealt: u8,
    /// True when this hit flipped the player to fallen.
    pub fell: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    seat: Seat,
    name: String,
    hp: u8,
    vp: u32,
    status: PlayerStatus,
    rounds_survived: u32,
    last_targeted_by: Option<Seat>,
    last_targeted: Option<Seat>,
}

impl Player {
    pub(crate) fn new(seat: Seat, name: impl Into<String>) -> Self {
        Self {
            seat,
            name: name.into(),
            hp: MAX_HP,
            vp: 0,
            status: PlayerStatus::Alive,
            rounds_survived: 0,
            last_targeted_by: None,
            last_targeted: None,
        }
    }

    #[must_use]
    pub const fn seat(&self) -> Seat {
        self.seat
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn hp(&self) -> u8 {
        self.hp
    }

    #[must_use]
    pub const fn vp(&self) -> u32 {
        self.vp
    }

    #[must_use]
    pub const fn status(&self) -> PlayerStatus {
        self.status
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.status.is_alive()
    }

    #[must_use]
    pub const fn rounds_survived(&self) -> u32 {
        self.rounds_survived
    }

    /// Seat that most recently aimed an effect at this player.
    #[must_use]
    pub const fn last_targeted_by(&self) -> Option<Seat> {
        self.last_targeted_by
    }

    /// Seat this player most recently aimed an effect at.
    #[must_use]
    pub const fn last_targeted(&self) -> Option<Seat> {
        self.last_targeted
    }

    /// Hit points this player can still receive before reaching the ceiling.
    #[must_use]
    pub const fn heal_headroom(&self) -> u8 {
        MAX_HP.saturating_sub(self.hp)
    }

    /// Remove hit points. Reaching zero flips the player to fallen in the
    /// same call; the flip is permanent.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` for a zero amount, `AlreadyFallen` for a fallen player.
    pub fn take_damage(&mut self, amount: u8) -> Result<DamageReport, GameError> {
        if amount == 0 {
            return Err(GameError::InvalidAmount {
                amount: u32::from(amount),
            });
        }
        self.ensure_alive()?;

        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        let fell = self.hp == 0;
        if fell {
            self.status = PlayerStatus::Fallen;
        }
        Ok(DamageReport { dealt, fell })
    }

    /// Restore hit points.
    ///
    /// The operation refuses amounts that would overshoot `MAX_HP` instead of
    /// clamping them; callers that want a visible cap use [`Self::heal_headroom`].
    ///
    /// # Errors
    ///
    /// `InvalidAmount` for zero or for more than `HEAL_LIMIT`.
    /// `InvalidAmount` also when `hp + amount` would exceed `MAX_HP`, so a
    /// legal-looking heal is refused at full health.
    /// `AlreadyFallen` for a fallen player.
    pub fn heal(&mut self, amount: u8) -> Result<(), GameError> {
        if amount == 0 || amount > HEAL_LIMIT {
            return Err(GameError::InvalidAmount {
                amount: u32::from(amount),
            });
        }
        self.ensure_alive()?;
        if amount > self.heal_headroom() {
            return Err(GameError::InvalidAmount {
                amount: u32::from(amount),
            });
        }
        self.hp += amount;
        Ok(())
    }

    /// Grant victory points. Legal for fallen players too.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` unless `0 < amount <= VP_GRANT_LIMIT`.
    pub fn gain_vp(&mut self, amount: u32) -> Result<(), GameError> {
        check_vp_amount(amount)?;
        self.vp = self.vp.saturating_add(amount);
        Ok(())
    }

    /// Remove up to `amount` victory points, returning how many were removed.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` unless `0 < amount <= VP_GRANT_LIMIT`.
    pub fn drain_vp(&mut self, amount: u32) -> Result<u32, GameError> {
        check_vp_amount(amount)?;
        let removed = amount.min(self.vp);
        self.vp -= removed;
        Ok(removed)
    }

    /// Move up to `amount` victory points from `target` to this player.
    ///
    /// The transfer is capped at what the target holds; a target with no VP
    /// makes this a successful no-op returning zero.
    ///
    /// # Errors
    ///
    /// `InvalidTarget` when `target` sits in this player's seat,
    /// `InvalidAmount` unless `0 < amount <= VP_GRANT_LIMIT`.
    pub fn steal_vp(&mut self, target: &mut Self, amount: u32) -> Result<u32, GameError> {
        if target.seat == self.seat {
            return Err(GameError::InvalidTarget { seat: self.seat });
        }
        check_vp_amount(amount)?;
        let resolved = amount.min(target.vp);
        if resolved == 0 {
            return Ok(0);
        }
        target.vp -= resolved;
        self.gain_vp(resolved)?;
        Ok(resolved)
    }

    /// Close out a round for this player: the survival bonus and counter
    /// apply only while alive. Returns whether the bonus was granted.
    pub(crate) fn complete_round(&mut self) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.vp = self.vp.saturating_add(ROUND_SURVIVAL_BONUS);
        self.rounds_survived += 1;
        true
    }

    pub(crate) fn mark_targeted_by(&mut self, seat: Seat) {
        self.last_targeted_by = Some(seat);
    }

    pub(crate) fn mark_targeted(&mut self, seat: Seat) {
        self.last_targeted = Some(seat);
    }

    fn ensure_alive(&self) -> Result<(), GameError> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(GameError::AlreadyFallen { seat: self.seat })
        }
    }
}

fn check_vp_amount(amount: u32) -> Result<(), GameError> {
    if amount == 0 || amount > VP_GRANT_LIMIT {
        Err(GameError::InvalidAmount { amount })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(seat: Seat) -> Player {
        Player::new(seat, format!("P{seat}"))
    }

    #[test]
    fn new_player_starts_full_and_alive() {
        let player = fresh(2);
        assert_eq!(player.seat(), 2);
        assert_eq!(player.hp(), MAX_HP);
        assert_eq!(player.vp(), 0);
        assert!(player.is_alive());
        assert_eq!(player.rounds_survived(), 0);
    }

    #[test]
    fn damage_rejects_zero_and_fallen() {
        let mut player = fresh(0);
        assert_eq!(
            player.take_damage(0),
            Err(GameError::InvalidAmount { amount: 0 })
        );
        assert_eq!(player.hp(), MAX_HP);

        let report = player.take_damage(25).unwrap();
        assert_eq!(report, DamageReport { dealt: 20, fell: true });
        assert_eq!(player.hp(), 0);
        assert_eq!(player.status(), PlayerStatus::Fallen);

        assert_eq!(
            player.take_damage(1),
            Err(GameError::AlreadyFallen { seat: 0 })
        );
        assert_eq!(player.hp(), 0);
    }

    #[test]
    fn exact_lethal_damage_flips_status() {
        let mut player = fresh(1);
        player.take_damage(17).unwrap();
        let report = player.take_damage(3).unwrap();
        assert!(report.fell);
        assert_eq!(report.dealt, 3);
        assert!(!player.is_alive());
    }

    #[test]
    fn heal_validates_bounds_and_headroom() {
        let mut player = fresh(0);
        assert_eq!(player.heal(0), Err(GameError::InvalidAmount { amount: 0 }));
        assert_eq!(player.heal(21), Err(GameError::InvalidAmount { amount: 21 }));
        assert_eq!(player.heal(1), Err(GameError::InvalidAmount { amount: 1 }));

        player.take_damage(5).unwrap();
        assert_eq!(player.heal_headroom(), 5);
        player.heal(3).unwrap();
        assert_eq!(player.hp(), 18);
        assert!(player.heal(3).is_err());
        assert_eq!(player.hp(), 18);
    }

    #[test]
    fn fallen_players_cannot_heal_but_can_gain_vp() {
        let mut player = fresh(4);
        player.take_damage(MAX_HP).unwrap();
        assert_eq!(player.heal(2), Err(GameError::AlreadyFallen { seat: 4 }));
        player.gain_vp(3).unwrap();
        assert_eq!(player.vp(), 3);
    }

    #[test]
    fn gain_vp_bounds() {
        let mut player = fresh(0);
        assert!(player.gain_vp(0).is_err());
        assert!(player.gain_vp(4).is_err());
        player.gain_vp(1).unwrap();
        player.gain_vp(3).unwrap();
        assert_eq!(player.vp(), 4);
    }

    #[test]
    fn steal_caps_at_target_holdings() {
        let mut thief = fresh(0);
        let mut mark = fresh(1);
        assert_eq!(thief.steal_vp(&mut mark, 1), Ok(0));
        assert_eq!(thief.vp(), 0);

        mark.gain_vp(2).unwrap();
        assert_eq!(thief.steal_vp(&mut mark, 3), Ok(2));
        assert_eq!(mark.vp(), 0);
        assert_eq!(thief.vp(), 2);
    }

    #[test]
    fn steal_rejects_same_seat() {
        let mut thief = fresh(3);
        let mut twin = fresh(3);
        twin.gain_vp(1).unwrap();
        assert_eq!(
            thief.steal_vp(&mut twin, 1),
            Err(GameError::InvalidTarget { seat: 3 })
        );
        assert_eq!(twin.vp(), 1);
    }

    #[test]
    fn steal_with_bad_amount_leaves_both_untouched() {
        let mut thief = fresh(0);
        let mut mark = fresh(1);
        mark.gain_vp(3).unwrap();
        assert!(thief.steal_vp(&mut mark, 4).is_err());
        assert_eq!(mark.vp(), 3);
        assert_eq!(thief.vp(), 0);
    }

    #[test]
    fn drain_never_goes_negative() {
        let mut player = fresh(0);
        player.gain_vp(1).unwrap();
        assert_eq!(player.drain_vp(1), Ok(1));
        assert_eq!(player.drain_vp(1), Ok(0));
        assert_eq!(player.vp(), 0);
    }

    #[test]
    fn complete_round_skips_fallen() {
        let mut alive = fresh(0);
        let mut ghost = fresh(1);
        ghost.take_damage(MAX_HP).unwrap();
        assert!(alive.complete_round());
        assert!(!ghost.complete_round());
        assert_eq!(alive.vp(), 1);
        assert_eq!(alive.rounds_survived(), 1);
        assert_eq!(ghost.vp(), 0);
        assert_eq!(ghost.rounds_survived(), 0);
    }
}
