//! Authoritative record of who is still playing.
//!
//! Only the coordinator thread holds a [`GameState`]; player threads never see it. Every round
//! goes through [`begin_round`](GameState::begin_round), one
//! [`record_attempt`](GameState::record_attempt) per active player, then
//! [`finish_round`](GameState::finish_round), which checks the round before changing anything.

use tracing::{debug, info};

use crate::error::{ConfigurationError, InvariantViolation};
use crate::player::{Player, PlayerId, PlayerStatus, SeatOutcome};

/// Outcome of one completed round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    /// 0-based round index.
    pub round: usize,
    /// Active players when the round started.
    pub players: usize,
    /// Chairs put in the pool.
    pub chairs: usize,
    /// Seated players, ordered by chair number.
    pub occupied: Vec<PlayerId>,
    /// Players left standing.
    pub eliminated: Vec<PlayerId>,
}

/// Players, their status and the round counter.
#[derive(Debug, Clone)]
pub struct GameState {
    players: Vec<Player>,
    round: usize,
    chairs: usize,
    eliminated: Vec<PlayerId>,
}

impl GameState {
    /// Creates players `P1..=Pn`, all active.
    ///
    /// # Errors
    /// [`ConfigurationError::TooFewPlayers`] when `player_count < 2`,
    /// [`ConfigurationError::TooManyPlayers`] when ids would not fit a [`PlayerId`].
    pub fn new(player_count: usize) -> Result<GameState, ConfigurationError> {
        if player_count < 2 {
            return Err(ConfigurationError::TooFewPlayers {
                players: player_count,
            });
        }
        let last = u32::try_from(player_count).map_err(|_| ConfigurationError::TooManyPlayers {
            players: player_count,
            max: u32::MAX,
        })?;
        let players = (1..=last).map(|n| Player::new(PlayerId(n))).collect();
        Ok(GameState {
            players,
            round: 0,
            chairs: 0,
            eliminated: vec![],
        })
    }

    /// Every player, active or not, in creation order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Index of the round being played, or of the next one between rounds.
    pub fn round(&self) -> usize {
        self.round
    }

    /// Chairs of the current round.
    pub fn chairs(&self) -> usize {
        self.chairs
    }

    /// Eliminated players, in elimination order.
    pub fn eliminated(&self) -> &[PlayerId] {
        &self.eliminated
    }

    /// Number of players still in the game.
    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    /// Ids of the players still in the game.
    pub fn active_ids(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.id)
            .collect()
    }

    /// True once a single player is left.
    pub fn is_finished(&self) -> bool {
        self.active_count() <= 1
    }

    /// The last player standing, once the game is finished.
    pub fn winner(&self) -> Option<PlayerId> {
        match self.active_ids().as_slice() {
            [winner] => Some(*winner),
            _ => None,
        }
    }

    /// Sizes the new round from the live active count and clears last round's outcomes.
    ///
    /// Returns the number of chairs: one less than the active players.
    pub fn begin_round(&mut self) -> Result<usize, InvariantViolation> {
        let active = self.active_count();
        if active < 2 {
            return Err(InvariantViolation::NoChairs {
                round: self.round,
                active,
            });
        }
        for player in &mut self.players {
            player.outcome = None;
        }
        self.chairs = active - 1;
        debug!(round = self.round, active, chairs = self.chairs, "round set up");
        Ok(self.chairs)
    }

    /// Stores what a player reported for the current round.
    pub fn record_attempt(
        &mut self,
        player: PlayerId,
        chair: Option<usize>,
    ) -> Result<(), InvariantViolation> {
        let round = self.round;
        let entry = self
            .players
            .iter_mut()
            .find(|p| p.id == player)
            .ok_or(InvariantViolation::UnknownPlayer { player })?;
        if !entry.is_active() {
            return Err(InvariantViolation::InactiveReport { player, round });
        }
        if entry.outcome.is_some() {
            return Err(InvariantViolation::DuplicateReport { player, round });
        }
        entry.outcome = Some(SeatOutcome::from_chair(chair));
        Ok(())
    }

    /// Eliminates every active player left standing and moves on to the next round.
    ///
    /// The round is validated first: all active players reported, no more chairs were taken than
    /// configured, exactly one player is standing. On error nothing is modified.
    pub fn finish_round(&mut self) -> Result<RoundRecord, InvariantViolation> {
        let round = self.round;
        let mut seated = vec![];
        let mut standing = vec![];
        let mut players = 0;
        for player in self.players.iter().filter(|p| p.is_active()) {
            players += 1;
            match player.outcome {
                Some(SeatOutcome::Seated { chair }) => seated.push((chair, player.id)),
                Some(SeatOutcome::Standing) => standing.push(player.id),
                None => {
                    return Err(InvariantViolation::MissingReport {
                        player: player.id,
                        round,
                    })
                }
            }
        }

        if seated.len() > self.chairs {
            return Err(InvariantViolation::PoolOverAllocated {
                round,
                granted: seated.len(),
                capacity: self.chairs,
            });
        }
        if standing.len() != 1 {
            return Err(InvariantViolation::WrongEliminationCount {
                round,
                actual: standing.len(),
            });
        }

        for id in &standing {
            if let Some(player) = self.players.iter_mut().find(|p| p.id == *id) {
                player.eliminate(round)?;
            }
            info!(round, player = %id, "eliminated");
            self.eliminated.push(*id);
        }
        for player in &mut self.players {
            player.outcome = None;
        }
        self.round += 1;

        seated.sort_unstable();
        Ok(RoundRecord {
            round,
            players,
            chairs: self.chairs,
            occupied: seated.into_iter().map(|(_, id)| id).collect(),
            eliminated: standing,
        })
    }

    /// Status of a given player.
    pub fn status_of(&self, player: PlayerId) -> Option<PlayerStatus> {
        self.players
            .iter()
            .find(|p| p.id == player)
            .map(|p| p.status)
    }
}

#[cfg(test)]
mod game_state_tests {
    use super::*;

    fn play_round(state: &mut GameState, standing: PlayerId) -> RoundRecord {
        state.begin_round().unwrap();
        let mut chair = 0;
        for id in state.active_ids() {
            if id == standing {
                state.record_attempt(id, None).unwrap();
            } else {
                chair += 1;
                state.record_attempt(id, Some(chair)).unwrap();
            }
        }
        state.finish_round().unwrap()
    }

    #[test]
    fn test_too_few_players() {
        assert_eq!(
            GameState::new(1).unwrap_err(),
            ConfigurationError::TooFewPlayers { players: 1 }
        );
        assert!(GameState::new(0).is_err());
        assert!(GameState::new(2).is_ok());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_too_many_players() {
        let players = u32::MAX as usize + 1;
        assert_eq!(
            GameState::new(players).unwrap_err(),
            ConfigurationError::TooManyPlayers {
                players,
                max: u32::MAX
            }
        );
    }

    #[test]
    fn test_chairs_follow_active_count() {
        let mut state = GameState::new(5).unwrap();
        for (expected_chairs, loser) in [(4, 2), (3, 5), (2, 1), (1, 4)] {
            assert_eq!(state.active_count(), expected_chairs + 1);
            let record = play_round(&mut state, PlayerId(loser));
            assert_eq!(record.chairs, expected_chairs);
            assert_eq!(record.eliminated, vec![PlayerId(loser)]);
            assert_eq!(state.active_count(), expected_chairs);
        }
        assert!(state.is_finished());
        assert_eq!(state.winner(), Some(PlayerId(3)));
        assert_eq!(
            state.eliminated(),
            &[PlayerId(2), PlayerId(5), PlayerId(1), PlayerId(4)]
        );
        assert_eq!(state.round(), 4);
    }

    #[test]
    fn test_no_round_for_a_sole_player() {
        let mut state = GameState::new(2).unwrap();
        play_round(&mut state, PlayerId(1));
        assert_eq!(
            state.begin_round(),
            Err(InvariantViolation::NoChairs {
                round: 1,
                active: 1
            })
        );
    }

    #[test]
    fn test_occupied_sorted_by_chair() {
        let mut state = GameState::new(4).unwrap();
        state.begin_round().unwrap();
        state.record_attempt(PlayerId(1), Some(3)).unwrap();
        state.record_attempt(PlayerId(2), Some(1)).unwrap();
        state.record_attempt(PlayerId(3), None).unwrap();
        state.record_attempt(PlayerId(4), Some(2)).unwrap();
        let record = state.finish_round().unwrap();
        assert_eq!(record.occupied, vec![PlayerId(2), PlayerId(4), PlayerId(1)]);
        assert_eq!(
            state.status_of(PlayerId(3)),
            Some(PlayerStatus::Eliminated { round: 0 })
        );
    }

    #[test]
    fn test_two_standing_aborts_without_changes() {
        let mut state = GameState::new(3).unwrap();
        state.begin_round().unwrap();
        state.record_attempt(PlayerId(1), Some(1)).unwrap();
        state.record_attempt(PlayerId(2), None).unwrap();
        state.record_attempt(PlayerId(3), None).unwrap();
        assert_eq!(
            state.finish_round(),
            Err(InvariantViolation::WrongEliminationCount {
                round: 0,
                actual: 2
            })
        );
        assert_eq!(state.active_count(), 3);
        assert!(state.eliminated().is_empty());
        assert_eq!(state.round(), 0);
    }

    #[test]
    fn test_too_many_seated() {
        let mut state = GameState::new(2).unwrap();
        state.begin_round().unwrap();
        state.record_attempt(PlayerId(1), Some(1)).unwrap();
        state.record_attempt(PlayerId(2), Some(2)).unwrap();
        assert_eq!(
            state.finish_round(),
            Err(InvariantViolation::PoolOverAllocated {
                round: 0,
                granted: 2,
                capacity: 1
            })
        );
    }

    #[test]
    fn test_bad_reports() {
        let mut state = GameState::new(3).unwrap();
        state.begin_round().unwrap();
        assert_eq!(
            state.record_attempt(PlayerId(9), None),
            Err(InvariantViolation::UnknownPlayer {
                player: PlayerId(9)
            })
        );
        state.record_attempt(PlayerId(1), Some(1)).unwrap();
        assert_eq!(
            state.record_attempt(PlayerId(1), Some(2)),
            Err(InvariantViolation::DuplicateReport {
                player: PlayerId(1),
                round: 0
            })
        );
        assert_eq!(
            state.finish_round(),
            Err(InvariantViolation::MissingReport {
                player: PlayerId(2),
                round: 0
            })
        );
    }

    #[test]
    fn test_eliminated_player_cannot_report() {
        let mut state = GameState::new(3).unwrap();
        play_round(&mut state, PlayerId(2));
        state.begin_round().unwrap();
        assert_eq!(
            state.record_attempt(PlayerId(2), Some(1)),
            Err(InvariantViolation::InactiveReport {
                player: PlayerId(2),
                round: 1
            })
        );
    }
}
