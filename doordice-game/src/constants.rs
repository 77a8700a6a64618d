//! Centralized balance and tuning constants for the Do or Dice rules engine.
//!
//! The roll tables and every magnitude they reference are fixed. Keeping the
//! numbers together means the rules can only change through reviewed code.

// Roster --------------------------------------------------------------------
/// Number of seats at the table. The roster is always exactly this size.
pub const ROSTER_SIZE: usize = 5;
/// Hit point ceiling and starting hit points for every player.
pub const MAX_HP: u8 = 20;
/// Default number of full rotations before the game is forced to end.
pub const DEFAULT_ROUND_CAP: u32 = 10;
/// Default seed used when a session is not given one.
pub const DEFAULT_SEED: u64 = 1337;
/// Seat names used when no custom roster is configured.
pub const DEFAULT_NAMES: [&str; ROSTER_SIZE] = ["ASHIKA", "BIJAY SHAI", "DHAMALA", "SACAR", "SHERE"];

// Player operation bounds ---------------------------------------------------
/// Largest single heal a player accepts.
pub const HEAL_LIMIT: u8 = MAX_HP;
/// Largest single VP grant a player accepts.
pub const VP_GRANT_LIMIT: u32 = 3;

// Alive table magnitudes ----------------------------------------------------
pub const SELF_DAMAGE: u8 = 3;
pub const QUICK_JAB_DAMAGE: u8 = 2;
pub const HEAVY_STRIKE_DAMAGE: u8 = 4;
pub const STEAL_AMOUNT: u8 = 1;
pub const REGENERATE_HEAL: u8 = 3;
pub const ULTIMATE_DAMAGE: u8 = 6;
pub const ULTIMATE_VP: u32 = 3;

// Fallen table magnitudes ---------------------------------------------------
pub const BLESS_HP: u8 = 2;
pub const BLESS_VP: u32 = 1;
pub const CURSE_HP: u8 = 2;
pub const CURSE_VP: u32 = 1;

// Rewards -------------------------------------------------------------------
/// VP awarded to a living attacker whose direct damage eliminates a target.
pub const ELIMINATION_BOUNTY: u32 = 2;
/// VP awarded to every living player when a round completes.
pub const ROUND_SURVIVAL_BONUS: u32 = 1;

// Choice option ids ---------------------------------------------------------
pub const OPTION_DEAL_DAMAGE: &str = "dmg_6";
pub const OPTION_GAIN_VP: &str = "vp_3";
pub const OPTION_CAST_HP: &str = "hp";
pub const OPTION_CAST_VP: &str = "vp";

// RNG stream domains --------------------------------------------------------
pub(crate) const STREAM_DICE: &[u8] = b"dice";
pub(crate) const STREAM_SEATING: &[u8] = b"seating";
