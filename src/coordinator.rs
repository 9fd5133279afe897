//! Core round logic of the game.
//!
//! This module defines the [`RoundCoordinator`], which owns the [`GameState`] and drives every
//! round on the calling thread:
//!
//! - **Setup**: chairs = active players - 1, the pool is refilled and the gate closed
//! - **MusicPlaying**: the coordinator sleeps for as long as the [`MusicSource`] says
//! - **MusicStopped**: the gate opens once, releasing every player thread at the same instant
//! - **Tallying**: the coordinator waits until every released player reported (completion
//!   barrier), then eliminates the one left standing
//!
//! until a single player is left (**Terminal**). Player threads are spawned once, when the game
//! starts, and live as long as their player is in the game. They only touch the [`ChairPool`] and
//! the [`RoundGate`], and report through a channel: the game state has a single writer.
//!
//! Any broken invariant aborts the game: the gate is shut down, every player thread is joined and
//! the error is returned.
//!
//! [`ChairPool`]: crate::chair_pool::ChairPool
//! [`RoundGate`]: crate::round_gate::RoundGate

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::{debug, info, instrument, trace, warn};

use crate::agent::{PlayerAgent, SeatAttempt, Table};
use crate::configuration::Configuration;
use crate::console::ConsoleAnnouncer;
use crate::error::{GameError, InvariantViolation};
use crate::game_interface::{Announcer, MusicSource};
use crate::game_state::{GameState, RoundRecord};
use crate::logger::init_logger;
use crate::music::RandomMusic;
use crate::player::PlayerId;

/// Where the coordinator is within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Before the first round.
    Idle,
    /// Sizing the pool and closing the gate.
    Setup,
    /// Players wait at the closed gate.
    MusicPlaying,
    /// The gate opens.
    MusicStopped,
    /// Waiting for every report, then eliminating.
    Tallying,
    /// A single player is left.
    Terminal,
}

/// Everything that happened in a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    /// Last player standing.
    pub winner: PlayerId,
    /// Eliminated players, first out first.
    pub eliminated: Vec<PlayerId>,
    /// One record per round, in order.
    pub rounds: Vec<RoundRecord>,
}

/// Plays a whole game of musical chairs.
///
/// # Type Parameters
/// - `A`: The display, implementing [`Announcer`]
/// - `M`: The music, implementing [`MusicSource`]
pub struct RoundCoordinator<A: Announcer, M: MusicSource> {
    config: Configuration,
    announcer: A,
    music: M,
    phase: Phase,
}

impl<A: Announcer, M: MusicSource> RoundCoordinator<A, M> {
    /// Create a [`RoundCoordinator`] with the given collaborators.
    pub fn new(config: Configuration, announcer: A, music: M) -> Self {
        trace!(?config);
        RoundCoordinator {
            config,
            announcer,
            music,
            phase: Phase::Idle,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Gives the collaborators back.
    pub fn into_parts(self) -> (A, M) {
        (self.announcer, self.music)
    }

    fn enter(&mut self, phase: Phase) {
        debug!(from = ?self.phase, to = ?phase, "phase");
        self.phase = phase;
    }

    /// Plays rounds until a single player is left.
    ///
    /// Returns once every player thread has ended.
    ///
    /// # Errors
    /// A [`ConfigurationError`](crate::error::ConfigurationError) before anything starts, an
    /// [`InvariantViolation`] if a round goes wrong.
    #[instrument(skip_all)]
    pub fn run(&mut self) -> Result<GameReport, GameError> {
        let players = self.config.validate()?;
        let mut state = GameState::new(players)?;
        info!(players, "game starts");

        let table = Arc::new(Table::default());
        let (tx_attempt, rx_attempt) = mpsc::channel();

        let mut agents = HashMap::with_capacity(players);
        let mut spawned = Ok(());
        for player in state.active_ids() {
            match PlayerAgent::spawn(player, table.clone(), tx_attempt.clone()) {
                Ok(agent) => {
                    agents.insert(player, agent);
                }
                Err(e) => {
                    spawned = Err(e);
                    break;
                }
            }
        }
        // only player threads may keep the channel open
        drop(tx_attempt);

        let outcome = match spawned {
            Ok(()) => {
                self.announcer.announce_game_start(players);
                self.play_rounds(&mut state, &table, &rx_attempt, &mut agents)
            }
            Err(e) => Err(e),
        };

        table.gate.shut_down();
        let joined = join_all(agents.into_values());
        let rounds = outcome?;
        joined?;

        self.enter(Phase::Terminal);
        let winner = state.winner().ok_or(InvariantViolation::NoWinner {
            active: state.active_count(),
        })?;
        info!(%winner, rounds = rounds.len(), "winner");
        self.announcer.announce_winner(winner);

        Ok(GameReport {
            winner,
            eliminated: state.eliminated().to_vec(),
            rounds,
        })
    }

    fn play_rounds(
        &mut self,
        state: &mut GameState,
        table: &Table,
        rx_attempt: &Receiver<SeatAttempt>,
        agents: &mut HashMap<PlayerId, PlayerAgent>,
    ) -> Result<Vec<RoundRecord>, GameError> {
        let mut rounds = vec![];
        while state.active_count() > 1 {
            let record = self.play_round(state, table, rx_attempt, agents)?;
            rounds.push(record);
        }
        Ok(rounds)
    }

    fn play_round(
        &mut self,
        state: &mut GameState,
        table: &Table,
        rx_attempt: &Receiver<SeatAttempt>,
        agents: &mut HashMap<PlayerId, PlayerAgent>,
    ) -> Result<RoundRecord, GameError> {
        let round = state.round();

        self.enter(Phase::Setup);
        let chairs = state.begin_round()?;
        table.pool.configure(chairs);
        table.gate.reset(round);
        let mut roster = state.active_ids();
        self.music.shuffle(&mut roster);
        info!(round, players = roster.len(), chairs, "round starts");
        self.announcer.announce_round_start(round, roster.len(), chairs);

        self.enter(Phase::MusicPlaying);
        let song = self.music.music_duration();
        trace!(?song);
        thread::sleep(song);

        self.enter(Phase::MusicStopped);
        self.announcer.announce_music_stopped();
        table.gate.open();

        self.enter(Phase::Tallying);
        for attempt in self.collect_attempts(round, roster.len(), rx_attempt)? {
            state.record_attempt(attempt.player, attempt.chair)?;
        }
        let granted = table.pool.granted();
        if granted > chairs {
            return Err(InvariantViolation::PoolOverAllocated {
                round,
                granted,
                capacity: chairs,
            }
            .into());
        }

        for player in &roster {
            let acquired = state
                .players()
                .iter()
                .find(|p| p.id == *player)
                .and_then(|p| p.outcome)
                .is_some_and(|outcome| outcome.acquired());
            self.announcer.announce_seat_result(*player, acquired);
        }

        let record = state.finish_round()?;
        // a standing player's thread ends right after its report
        join_all(
            record
                .eliminated
                .iter()
                .filter_map(|player| agents.remove(player)),
        )?;
        self.announcer.announce_round_summary(&record.occupied, &record.eliminated);
        Ok(record)
    }

    /// Completion barrier: one report per released player.
    fn collect_attempts(
        &self,
        round: usize,
        expected: usize,
        rx_attempt: &Receiver<SeatAttempt>,
    ) -> Result<Vec<SeatAttempt>, InvariantViolation> {
        let timeout = self.config.round_timeout;
        let deadline = Instant::now() + timeout;
        let mut attempts = Vec::with_capacity(expected);
        while attempts.len() < expected {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx_attempt.recv_timeout(remaining) {
                Ok(attempt) if attempt.round != round => {
                    return Err(InvariantViolation::StaleReport {
                        player: attempt.player,
                        expected: round,
                        reported: attempt.round,
                    });
                }
                Ok(attempt) => {
                    trace!(player = %attempt.player, chair = ?attempt.chair, "report");
                    attempts.push(attempt);
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!(round, reported = attempts.len(), expected, "round stalled");
                    return Err(InvariantViolation::StalledRound {
                        round,
                        reported: attempts.len(),
                        expected,
                        timeout,
                    });
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(InvariantViolation::AgentsDisconnected { round });
                }
            }
        }
        Ok(attempts)
    }
}

fn join_all(agents: impl IntoIterator<Item = PlayerAgent>) -> Result<(), InvariantViolation> {
    let mut result = Ok(());
    for agent in agents {
        let player = agent.player;
        if let Err(e) = agent.join() {
            warn!(%player, "agent panicked");
            result = result.and(Err(e));
        }
    }
    result
}

/// Plays a game with the console display and random music, as set up by `config`.
///
/// Starts file logging first when `config.log` is set.
pub fn play(config: Configuration) -> anyhow::Result<GameReport> {
    if config.log {
        init_logger()?;
    }
    let players = config.validate()?;
    trace!(players);

    let music = RandomMusic::new(config.music_min, config.music_max)?.with_shuffle(config.shuffle);
    let announcer = ConsoleAnnouncer::new(config.verbose);
    let mut coordinator = RoundCoordinator::new(config, announcer, music);
    Ok(coordinator.run()?)
}
