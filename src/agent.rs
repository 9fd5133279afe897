use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::trace;

use crate::chair_pool::ChairPool;
use crate::error::{GameError, InvariantViolation};
use crate::player::PlayerId;
use crate::round_gate::{Release, RoundGate};

/// What player threads share: the chairs and the gate in front of them.
#[derive(Debug, Default)]
pub struct Table {
    pub pool: ChairPool,
    pub gate: RoundGate,
}

/// A player's report for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatAttempt {
    pub player: PlayerId,
    pub round: usize,
    /// Chair taken, `None` if left standing.
    pub chair: Option<usize>,
}

/// Handle on the thread playing for one player.
///
/// The thread lives as long as its player is in the game: it waits at the gate, takes at most one
/// chair per round, reports, and returns as soon as it is left standing or the gate shuts down.
#[derive(Debug)]
pub struct PlayerAgent {
    pub player: PlayerId,
    handle: JoinHandle<()>,
}

impl PlayerAgent {
    pub fn spawn(
        player: PlayerId,
        table: Arc<Table>,
        reports: Sender<SeatAttempt>,
    ) -> Result<PlayerAgent, GameError> {
        let handle = thread::Builder::new()
            .name(format!("player-{player}"))
            .spawn(move || play(player, &table, &reports))
            .map_err(|e| GameError::AgentSpawn {
                player,
                reason: e.to_string(),
            })?;
        Ok(PlayerAgent { player, handle })
    }

    /// Waits for the thread to end.
    pub fn join(self) -> Result<(), InvariantViolation> {
        self.handle
            .join()
            .map_err(|_| InvariantViolation::AgentPanicked {
                player: self.player,
            })
    }
}

fn play(player: PlayerId, table: &Table, reports: &Sender<SeatAttempt>) {
    let mut next_round = 0;
    loop {
        let round = match table.gate.wait_until_open(next_round) {
            Release::Open(round) => round,
            Release::ShutDown => {
                trace!(%player, "gate shut down, leaving");
                return;
            }
        };

        let chair = table.pool.try_take_seat();
        trace!(%player, round, ?chair, "music stopped");

        let attempt = SeatAttempt {
            player,
            round,
            chair,
        };
        if reports.send(attempt).is_err() {
            // nobody is tallying anymore
            return;
        }
        if chair.is_none() {
            return;
        }
        next_round = round + 1;
    }
}

#[cfg(test)]
mod agent_tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;

    const PATIENCE: Duration = Duration::from_secs(5);

    #[test]
    fn test_one_round_then_shutdown() {
        let table = Arc::new(Table::default());
        let (tx, rx) = mpsc::channel();
        let agents: Vec<_> = (1..=3)
            .map(|n| PlayerAgent::spawn(PlayerId(n), table.clone(), tx.clone()).unwrap())
            .collect();

        table.pool.configure(2);
        table.gate.reset(0);
        // nobody moves before the music stops
        assert!(rx.recv_timeout(Duration::from_millis(20)).is_err());
        table.gate.open();

        let mut attempts: Vec<SeatAttempt> =
            (0..3).map(|_| rx.recv_timeout(PATIENCE).unwrap()).collect();
        attempts.sort_by_key(|a| a.chair);
        assert!(attempts.iter().all(|a| a.round == 0));
        assert_eq!(
            attempts.iter().map(|a| a.chair).collect::<Vec<_>>(),
            vec![None, Some(1), Some(2)]
        );

        // the standing player leaves on its own, the seated ones wait for round 1
        let (standing, seated): (Vec<_>, Vec<_>) = agents
            .into_iter()
            .partition(|agent| agent.player == attempts[0].player);
        for agent in standing {
            agent.join().unwrap();
        }

        table.gate.shut_down();
        for agent in seated {
            agent.join().unwrap();
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_waits_for_its_next_round() {
        let table = Arc::new(Table::default());
        let (tx, rx) = mpsc::channel();
        let agent = PlayerAgent::spawn(PlayerId(1), table.clone(), tx).unwrap();

        for round in 0..3 {
            table.pool.configure(1);
            table.gate.reset(round);
            table.gate.open();
            let attempt = rx.recv_timeout(PATIENCE).unwrap();
            assert_eq!(
                attempt,
                SeatAttempt {
                    player: PlayerId(1),
                    round,
                    chair: Some(1)
                }
            );
            // exactly one attempt per round
            assert!(rx.recv_timeout(Duration::from_millis(20)).is_err());
        }

        table.gate.shut_down();
        agent.join().unwrap();
    }
}
