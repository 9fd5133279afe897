//! Error types surfaced by the game.
//!
//! Two families exist: a [`ConfigurationError`] is a user mistake caught before any player thread
//! is started, an [`InvariantViolation`] is a broken coordination contract. The latter aborts the
//! game on the spot: a corrupted round makes every later round meaningless.

use std::time::Duration;

use thiserror::Error;

use crate::player::PlayerId;

/// Anything that can stop a game before a winner is declared.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The game was misconfigured and never started.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A round broke one of the coordination invariants.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),

    /// The OS refused to start a player thread.
    #[error("could not spawn the agent of {player}: {reason}")]
    AgentSpawn {
        /// Player whose agent could not be started.
        player: PlayerId,
        /// Error reported by the OS.
        reason: String,
    },
}

/// Rejected game settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// No player count was supplied.
    #[error("the number of players was not provided")]
    MissingPlayerCount,

    /// A game needs at least two players to have a loser.
    #[error("at least 2 players are required, got {players}")]
    TooFewPlayers {
        /// Requested number of players.
        players: usize,
    },

    /// More players than player ids.
    #[error("at most {max} players are supported, got {players}")]
    TooManyPlayers {
        /// Requested number of players.
        players: usize,
        /// Largest supported number of players.
        max: u32,
    },

    /// The shortest song lasts longer than the longest one.
    #[error("music duration range is empty: min {min:?} > max {max:?}")]
    InvalidMusicRange {
        /// Lower bound.
        min: Duration,
        /// Upper bound.
        max: Duration,
    },

    /// A round could never complete its barrier.
    #[error("round timeout must be greater than zero")]
    ZeroRoundTimeout,
}

/// Broken coordination contracts. None of these can happen in a correct game.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A round was about to start with nothing to race for.
    #[error("round {round} would start with no chair for {active} active player(s)")]
    NoChairs {
        /// Round index.
        round: usize,
        /// Active players at round start.
        active: usize,
    },

    /// The game ended without exactly one player left.
    #[error("game ended with {active} active player(s)")]
    NoWinner {
        /// Active players at the end.
        active: usize,
    },

    /// The pool handed out more chairs than it was configured with.
    #[error("round {round}: {granted} chairs granted out of {capacity}")]
    PoolOverAllocated {
        /// Round index.
        round: usize,
        /// Successful acquisitions.
        granted: usize,
        /// Configured capacity.
        capacity: usize,
    },

    /// A round did not end with exactly one elimination.
    #[error("round {round} eliminated {actual} player(s), expected exactly 1")]
    WrongEliminationCount {
        /// Round index.
        round: usize,
        /// Number of players left standing.
        actual: usize,
    },

    /// A player was eliminated a second time.
    #[error("{player} was already eliminated in round {round}")]
    AlreadyEliminated {
        /// Offending player.
        player: PlayerId,
        /// Round of the first elimination.
        round: usize,
    },

    /// A report named a player that does not exist.
    #[error("unknown player {player}")]
    UnknownPlayer {
        /// Reported id.
        player: PlayerId,
    },

    /// An eliminated player tried to take part in a round.
    #[error("{player} reported in round {round} although eliminated")]
    InactiveReport {
        /// Offending player.
        player: PlayerId,
        /// Round of the report.
        round: usize,
    },

    /// A player reported twice for the same round.
    #[error("{player} reported twice in round {round}")]
    DuplicateReport {
        /// Offending player.
        player: PlayerId,
        /// Round of the reports.
        round: usize,
    },

    /// A report belongs to another round than the one being tallied.
    #[error("{player} reported for round {reported} while tallying round {expected}")]
    StaleReport {
        /// Offending player.
        player: PlayerId,
        /// Round being tallied.
        expected: usize,
        /// Round carried by the report.
        reported: usize,
    },

    /// An active player never reported before the tally.
    #[error("{player} never reported in round {round}")]
    MissingReport {
        /// Silent player.
        player: PlayerId,
        /// Round being tallied.
        round: usize,
    },

    /// The completion barrier did not fill up in time.
    #[error("round {round} stalled: {reported}/{expected} agents reported within {timeout:?}")]
    StalledRound {
        /// Round index.
        round: usize,
        /// Reports received.
        reported: usize,
        /// Agents released.
        expected: usize,
        /// Barrier timeout.
        timeout: Duration,
    },

    /// Every agent hung up before the barrier filled up.
    #[error("all agents disconnected during round {round}")]
    AgentsDisconnected {
        /// Round index.
        round: usize,
    },

    /// An agent thread panicked.
    #[error("the agent of {player} panicked")]
    AgentPanicked {
        /// Player whose agent panicked.
        player: PlayerId,
    },
}
