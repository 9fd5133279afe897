//! # Musical Chairs
//!
//! A concurrent musical chairs tournament: one OS thread per player races for a shrinking pool of
//! chairs, round after round, until a single player is left.
//!
//! It provides:
//! - Round orchestration (`RoundCoordinator`) with a true completion barrier
//! - A lock-free chair pool (`ChairPool`) where exactly `capacity` takes succeed
//! - A resettable broadcast gate (`RoundGate`) releasing every player at once
//! - Pluggable display and music through the `Announcer` and `MusicSource` traits
//!
//! Every round, the coordinator puts one chair less than there are players in the pool, lets the
//! music play, then opens the gate. Each player thread takes at most one chair and reports; the
//! player left standing is eliminated and its thread ends.
//!
//! # Documentation Overview
//!
//! - For the round state machine and the game entry points, see the [`coordinator`] module.
//! - For the synchronization primitives, see [`chair_pool`] and [`round_gate`].
//! - For configuring the game, see [`Configuration`](crate::configuration::Configuration).
//! - For custom displays or music, check out the [`Announcer`] and [`MusicSource`] traits.
//!
//! # Usage Example
//!
//! ```no_run
//! use std::time::Duration;
//! use musical_chairs::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Configuration::new()
//!         .with_players(5)
//!         .with_music_range(Duration::from_millis(200), Duration::from_millis(800));
//!
//!     let report = play(config)?;
//!     println!("{} won after {} rounds", report.winner, report.rounds.len());
//!     Ok(())
//! }
//! ```
//!
//! With your own collaborators:
//!
//! ```no_run
//! # use musical_chairs::prelude::*;
//! # fn main() -> Result<(), GameError> {
//! let config = Configuration::new().with_players(3).with_verbose(false);
//! let announcer = ConsoleAnnouncer::new(true);
//! let music = FixedMusic(std::time::Duration::from_millis(100));
//! let report = RoundCoordinator::new(config, announcer, music).run()?;
//! assert_eq!(report.eliminated.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! [`Announcer`]: crate::game_interface::Announcer
//! [`MusicSource`]: crate::game_interface::MusicSource
#![warn(missing_docs)]

mod agent;
pub mod chair_pool;
pub mod configuration;
pub mod console;
pub mod coordinator;
pub mod error;
pub mod game_interface;
pub mod game_state;
mod logger;
pub mod music;
pub mod player;
pub mod round_gate;

pub use anyhow;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use musical_chairs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::chair_pool::ChairPool;
    pub use crate::configuration::Configuration;
    pub use crate::console::ConsoleAnnouncer;
    pub use crate::coordinator::{play, GameReport, Phase, RoundCoordinator};
    pub use crate::error::{ConfigurationError, GameError, InvariantViolation};
    pub use crate::game_interface::{Announcer, MusicSource};
    pub use crate::game_state::{GameState, RoundRecord};
    pub use crate::music::{FixedMusic, RandomMusic};
    pub use crate::player::{PlayerId, PlayerStatus};
    pub use crate::round_gate::{Release, RoundGate};
}
