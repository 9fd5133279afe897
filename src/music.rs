//! Song lengths and display order of the players.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::ConfigurationError;
use crate::game_interface::MusicSource;
use crate::player::PlayerId;

/// Songs of random length, rosters in random order.
#[derive(Debug, Clone)]
pub struct RandomMusic {
    rng: StdRng,
    min: Duration,
    max: Duration,
    shuffle: bool,
}

impl RandomMusic {
    /// Songs lasting between `min` and `max`, both included.
    pub fn new(min: Duration, max: Duration) -> Result<Self, ConfigurationError> {
        Self::with_rng(StdRng::from_entropy(), min, max)
    }

    /// Same as [`RandomMusic::new`] with a caller-provided generator.
    pub fn with_rng(rng: StdRng, min: Duration, max: Duration) -> Result<Self, ConfigurationError> {
        if min > max {
            return Err(ConfigurationError::InvalidMusicRange { min, max });
        }
        Ok(Self {
            rng,
            min,
            max,
            shuffle: true,
        })
    }

    /// Enable or disable roster shuffling.
    pub fn with_shuffle(mut self, value: bool) -> Self {
        self.shuffle = value;
        self
    }
}

impl MusicSource for RandomMusic {
    fn music_duration(&mut self) -> Duration {
        self.rng.gen_range(self.min..=self.max)
    }

    fn shuffle(&mut self, players: &mut [PlayerId]) {
        if self.shuffle {
            players.shuffle(&mut self.rng);
        }
    }
}

/// Every song lasts the same, rosters keep their order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedMusic(pub Duration);

impl MusicSource for FixedMusic {
    fn music_duration(&mut self) -> Duration {
        self.0
    }
}
