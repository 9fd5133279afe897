//! Players, their status and what they got out of a round.

use std::fmt;

use crate::error::InvariantViolation;

/// Stable identity of a player, its 1-based ordinal. Displayed as `P<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Whether a player still takes part in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    /// Still racing for chairs.
    Active,
    /// Left standing in the given round.
    Eliminated {
        /// Round in which the player was eliminated.
        round: usize,
    },
}

/// What happened to a player once the music stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatOutcome {
    /// Sat on the given 1-based chair.
    Seated {
        /// Chair number.
        chair: usize,
    },
    /// Found no free chair.
    Standing,
}

impl SeatOutcome {
    pub(crate) fn from_chair(chair: Option<usize>) -> SeatOutcome {
        match chair {
            Some(chair) => SeatOutcome::Seated { chair },
            None => SeatOutcome::Standing,
        }
    }

    /// True if the player got a chair.
    pub fn acquired(&self) -> bool {
        matches!(self, SeatOutcome::Seated { .. })
    }
}

/// A contestant, as recorded by the coordinator.
#[derive(Debug, Clone)]
pub struct Player {
    /// Stable identity.
    pub id: PlayerId,
    /// Active until left standing once.
    pub status: PlayerStatus,
    /// Only meaningful between the gate opening and the end of the tally.
    pub outcome: Option<SeatOutcome>,
}

impl Player {
    /// A fresh, active player.
    pub fn new(id: PlayerId) -> Player {
        Player {
            id,
            status: PlayerStatus::Active,
            outcome: None,
        }
    }

    /// True until eliminated.
    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Active -> Eliminated, exactly once.
    pub(crate) fn eliminate(&mut self, round: usize) -> Result<(), InvariantViolation> {
        if let PlayerStatus::Eliminated { round: first } = self.status {
            return Err(InvariantViolation::AlreadyEliminated {
                player: self.id,
                round: first,
            });
        }
        self.status = PlayerStatus::Eliminated { round };
        Ok(())
    }
}
