//! Config for the game behaviors
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! The following environment variables can be used to override configuration values. All
//! values are optional. Flags are case-insensitive: set the value to `"true"` to enable one.
//! Numbers that do not parse are ignored.
//!
//! - `CHAIRS_PLAYERS` — Number of players (no default)
//! - `CHAIRS_VERBOSE` — Print the game to stdout (default: `true`)
//! - `CHAIRS_LOG` — Enable logging to a file (default: `false`)
//! - `CHAIRS_MUSIC_MIN_MS` — Shortest song, in milliseconds (default: `1000`)
//! - `CHAIRS_MUSIC_MAX_MS` — Longest song, in milliseconds (default: `3000`)
//! - `CHAIRS_SHUFFLE` — Shuffle the display order of players every round (default: `true`)
//! - `CHAIRS_ROUND_TIMEOUT_MS` — How long the coordinator waits for every player to report
//!   (default: `10000`)

use std::time::Duration;

use tracing::warn;

use crate::error::ConfigurationError;

/// Configuration for game behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    pub(crate) players: Option<usize>,
    pub(crate) verbose: bool,
    pub(crate) log: bool,
    pub(crate) music_min: Duration,
    pub(crate) music_max: Duration,
    pub(crate) shuffle: bool,
    pub(crate) round_timeout: Duration,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - The number of players is not set.
    /// - The game is printed to stdout.
    /// - Logging to file is disabled.
    /// - Songs last between one and three seconds.
    /// - The display order of players is shuffled every round.
    /// - Players have ten seconds to report once the music stops.
    pub fn new() -> Self {
        Self {
            players: None,
            verbose: true,
            log: false,
            music_min: Duration::from_secs(1),
            music_max: Duration::from_secs(3),
            shuffle: true,
            round_timeout: Duration::from_secs(10),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// See the [module documentation](self) for the recognized variables. Any unset variable
    /// keeps its default value.
    pub fn from_env() -> Self {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match std::env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        fn get_env_number(var: &str) -> Option<u64> {
            let val = std::env::var(var).ok()?;
            match val.trim().parse() {
                Ok(n) => Some(n),
                Err(_) => {
                    warn!("ignoring {var}={val:?}: not a number");
                    None
                }
            }
        }

        let defaults = Self::new();
        let millis = |var: &str, default: Duration| {
            get_env_number(var)
                .map(Duration::from_millis)
                .unwrap_or(default)
        };

        Self {
            players: get_env_number("CHAIRS_PLAYERS").map(|n| n as usize),
            verbose: get_env_flag("CHAIRS_VERBOSE", defaults.verbose),
            log: get_env_flag("CHAIRS_LOG", defaults.log),
            music_min: millis("CHAIRS_MUSIC_MIN_MS", defaults.music_min),
            music_max: millis("CHAIRS_MUSIC_MAX_MS", defaults.music_max),
            shuffle: get_env_flag("CHAIRS_SHUFFLE", defaults.shuffle),
            round_timeout: millis("CHAIRS_ROUND_TIMEOUT_MS", defaults.round_timeout),
        }
    }

    /// Set the number of players.
    pub fn with_players(mut self, value: usize) -> Self {
        self.players = Some(value);
        self
    }

    /// Enable or disable console output.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Set the range songs are drawn from, both bounds included.
    pub fn with_music_range(mut self, min: Duration, max: Duration) -> Self {
        self.music_min = min;
        self.music_max = max;
        self
    }

    /// Enable or disable shuffling the display order of players.
    pub fn with_shuffle(mut self, value: bool) -> Self {
        self.shuffle = value;
        self
    }

    /// Set how long the coordinator waits for every released player to report.
    pub fn with_round_timeout(mut self, value: Duration) -> Self {
        self.round_timeout = value;
        self
    }

    /// Number of players, if set.
    pub fn players(&self) -> Option<usize> {
        self.players
    }

    /// Whether the game is printed to stdout.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Whether a log file is written.
    pub fn log(&self) -> bool {
        self.log
    }

    /// Shortest and longest song.
    pub fn music_range(&self) -> (Duration, Duration) {
        (self.music_min, self.music_max)
    }

    /// Whether the display order of players is shuffled.
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// How long the completion barrier of a round may take.
    pub fn round_timeout(&self) -> Duration {
        self.round_timeout
    }

    /// The number of players, checked.
    ///
    /// # Errors
    /// When the count is missing or lower than 2.
    pub fn player_count(&self) -> Result<usize, ConfigurationError> {
        match self.players {
            None => Err(ConfigurationError::MissingPlayerCount),
            Some(players) if players < 2 => Err(ConfigurationError::TooFewPlayers { players }),
            Some(players) => Ok(players),
        }
    }

    /// Checks every setting, returning the number of players.
    pub fn validate(&self) -> Result<usize, ConfigurationError> {
        let players = self.player_count()?;
        if self.music_min > self.music_max {
            return Err(ConfigurationError::InvalidMusicRange {
                min: self.music_min,
                max: self.music_max,
            });
        }
        if self.round_timeout.is_zero() {
            return Err(ConfigurationError::ZeroRoundTimeout);
        }
        Ok(players)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
