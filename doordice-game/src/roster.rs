//! Fixed five-seat roster.
//!
//! Players are registered through [`RosterBuilder`] and the roster is built
//! atomically once every seat is filled. Seating order can be shuffled as an
//! explicit setup step before the seats are assigned; nothing is shuffled as a
//! side effect of registration.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::constants::ROSTER_SIZE;
use crate::error::{GameError, TargetRejection};
use crate::player::{Player, Seat};

/// Collects player names until the table is full.
#[derive(Debug, Clone, Default)]
pub struct RosterBuilder {
    names: Vec<String>,
}

impl RosterBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            names: Vec::with_capacity(ROSTER_SIZE),
        }
    }

    /// Register the next player.
    ///
    /// # Errors
    ///
    /// `RosterFull` once all seats are taken.
    pub fn register(&mut self, name: impl Into<String>) -> Result<&mut Self, GameError> {
        if self.names.len() >= ROSTER_SIZE {
            return Err(GameError::RosterFull {
                capacity: ROSTER_SIZE,
            });
        }
        self.names.push(name.into());
        Ok(self)
    }

    #[must_use]
    pub fn registered(&self) -> usize {
        self.names.len()
    }

    /// Randomize seating order before seats are assigned.
    pub fn shuffle_seating<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        self.names.shuffle(rng);
        self
    }

    /// Assign seats in registration order and produce the roster.
    ///
    /// # Errors
    ///
    /// `RosterIncomplete` unless exactly `ROSTER_SIZE` players registered.
    pub fn build(self) -> Result<Roster, GameError> {
        let registered = self.names.len();
        let names: [String; ROSTER_SIZE] =
            self.names
                .try_into()
                .map_err(|_| GameError::RosterIncomplete {
                    registered,
                    required: ROSTER_SIZE,
                })?;
        Ok(Roster::seated(names))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    players: [Player; ROSTER_SIZE],
}

impl Roster {
    /// Build a roster straight from a list of names.
    ///
    /// # Errors
    ///
    /// `RosterFull` for more than `ROSTER_SIZE` names, `RosterIncomplete`
    /// for fewer.
    pub fn from_names<I, S>(names: I) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut builder = RosterBuilder::new();
        for name in names {
            builder.register(name)?;
        }
        builder.build()
    }

    /// Seat a full table in the given order.
    pub(crate) fn seated(names: [String; ROSTER_SIZE]) -> Self {
        let mut seat = 0;
        let players = names.map(|name| {
            let player = Player::new(seat, name);
            seat += 1;
            player
        });
        Self { players }
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn get(&self, seat: Seat) -> Option<&Player> {
        self.players.get(seat)
    }

    pub(crate) fn get_mut(&mut self, seat: Seat) -> Option<&mut Player> {
        self.players.get_mut(seat)
    }

    /// Look up a seat for targeting, reporting out-of-range seats.
    pub(crate) fn seat(&self, seat: Seat) -> Result<&Player, GameError> {
        self.get(seat).ok_or(GameError::IllegalTarget {
            seat,
            reason: TargetRejection::NoSuchSeat,
        })
    }

    /// Borrow two distinct seats mutably at once.
    pub(crate) fn pair_mut(&mut self, first: Seat, second: Seat) -> Option<(&mut Player, &mut Player)> {
        if first == second || first >= ROSTER_SIZE || second >= ROSTER_SIZE {
            return None;
        }
        if first < second {
            let (low, high) = self.players.split_at_mut(second);
            Some((&mut low[first], &mut high[0]))
        } else {
            let (low, high) = self.players.split_at_mut(first);
            Some((&mut high[0], &mut low[second]))
        }
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive()).count()
    }

    /// Living seats, in seat order.
    #[must_use]
    pub fn alive_seats(&self) -> Vec<Seat> {
        self.players
            .iter()
            .filter(|p| p.is_alive())
            .map(Player::seat)
            .collect()
    }
}
