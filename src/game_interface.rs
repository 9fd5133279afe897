//! Module defining the collaborators the coordinator calls into.
//!
//! The coordinator does not print nor pick random numbers itself: it reports what happens to an
//! [`Announcer`] and asks a [`MusicSource`] how long the music plays. Default implementations
//! live in [`console`](crate::console) and [`music`](crate::music).

use std::time::Duration;

use crate::player::PlayerId;

/// What the display should implement.
///
/// Every method is called synchronously from the coordinator thread, at fixed points of a round.
/// Implementations must return promptly: the players are waiting.
pub trait Announcer {
    /// Called once, before the first round.
    fn announce_game_start(&mut self, _players: usize) {}

    /// A round is set up: `total_players` will race for `chairs` chairs.
    fn announce_round_start(&mut self, round: usize, total_players: usize, chairs: usize);

    /// The music stopped, the gate is about to open.
    fn announce_music_stopped(&mut self);

    /// Outcome of a single player, once every attempt of the round is known.
    fn announce_seat_result(&mut self, player: PlayerId, acquired: bool);

    /// End of the round: seated players in chair order, and who was left standing.
    fn announce_round_summary(&mut self, occupied: &[PlayerId], eliminated: &[PlayerId]);

    /// The last player standing, once every player thread has ended.
    fn announce_winner(&mut self, player: PlayerId);
}

/// Where the duration of each song comes from.
pub trait MusicSource {
    /// How long the music plays before the gate opens.
    fn music_duration(&mut self) -> Duration;

    /// Reorders the round's roster. Only affects in which order results are displayed and
    /// logged, never who gets a chair.
    fn shuffle(&mut self, _players: &mut [PlayerId]) {}
}

impl<A: Announcer + ?Sized> Announcer for &mut A {
    fn announce_game_start(&mut self, players: usize) {
        (**self).announce_game_start(players)
    }

    fn announce_round_start(&mut self, round: usize, total_players: usize, chairs: usize) {
        (**self).announce_round_start(round, total_players, chairs)
    }

    fn announce_music_stopped(&mut self) {
        (**self).announce_music_stopped()
    }

    fn announce_seat_result(&mut self, player: PlayerId, acquired: bool) {
        (**self).announce_seat_result(player, acquired)
    }

    fn announce_round_summary(&mut self, occupied: &[PlayerId], eliminated: &[PlayerId]) {
        (**self).announce_round_summary(occupied, eliminated)
    }

    fn announce_winner(&mut self, player: PlayerId) {
        (**self).announce_winner(player)
    }
}

impl<M: MusicSource + ?Sized> MusicSource for &mut M {
    fn music_duration(&mut self) -> Duration {
        (**self).music_duration()
    }

    fn shuffle(&mut self, players: &mut [PlayerId]) {
        (**self).shuffle(players)
    }
}

#[cfg(test)]
mod interface_tests {
    use super::*;

    #[derive(Default)]
    struct CountingAnnouncer {
        calls: usize,
    }

    impl Announcer for CountingAnnouncer {
        fn announce_round_start(&mut self, _round: usize, _total: usize, _chairs: usize) {
            self.calls += 1;
        }

        fn announce_music_stopped(&mut self) {
            self.calls += 1;
        }

        fn announce_seat_result(&mut self, _player: PlayerId, _acquired: bool) {
            self.calls += 1;
        }

        fn announce_round_summary(&mut self, _occupied: &[PlayerId], _eliminated: &[PlayerId]) {
            self.calls += 1;
        }

        fn announce_winner(&mut self, _player: PlayerId) {
            self.calls += 1;
        }
    }

    struct Silence;

    impl MusicSource for Silence {
        fn music_duration(&mut self) -> Duration {
            Duration::ZERO
        }
    }

    fn announce_through<A: Announcer>(mut announcer: A) {
        announcer.announce_game_start(3);
        announcer.announce_music_stopped();
        announcer.announce_winner(PlayerId(1));
    }

    #[test]
    fn test_borrowed_announcer() {
        let mut announcer = CountingAnnouncer::default();
        announce_through(&mut announcer);
        // game start has a no-op default
        assert_eq!(announcer.calls, 2);
    }

    #[test]
    fn test_default_shuffle_keeps_order() {
        let mut source = Silence;
        let mut players = vec![PlayerId(1), PlayerId(2), PlayerId(3)];
        (&mut source).shuffle(&mut players);
        assert_eq!(players, vec![PlayerId(1), PlayerId(2), PlayerId(3)]);
        assert_eq!((&mut source).music_duration(), Duration::ZERO);
    }
}
