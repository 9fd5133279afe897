//! Console transcript of a game.

use std::io::{self, Write};

use crate::game_interface::Announcer;
use crate::player::PlayerId;

const SEPARATOR: &str = "-----------------------------------------------";

/// Prints the game to stdout, or nothing at all when not verbose.
///
/// Individual seat results are not printed: the round summary already lists every chair.
#[derive(Debug, Clone)]
pub struct ConsoleAnnouncer<W: Write = io::Stdout> {
    out: W,
    verbose: bool,
}

impl ConsoleAnnouncer {
    /// Announcer writing to stdout.
    pub fn new(verbose: bool) -> Self {
        Self::with_writer(io::stdout(), verbose)
    }
}

impl<W: Write> ConsoleAnnouncer<W> {
    /// Announcer writing to any sink.
    pub fn with_writer(out: W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    /// Gives the sink back.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn print(&mut self, text: std::fmt::Arguments<'_>) {
        if self.verbose {
            // the console is best effort, the game goes on without it
            let _ = self.out.write_fmt(text);
            let _ = self.out.flush();
        }
    }
}

fn chair_word(chairs: usize) -> &'static str {
    if chairs == 1 {
        "chair"
    } else {
        "chairs"
    }
}

impl<W: Write> Announcer for ConsoleAnnouncer<W> {
    fn announce_game_start(&mut self, _players: usize) {
        self.print(format_args!(
            "\n{SEPARATOR}\nWelcome to the Concurrent Musical Chairs!\n{SEPARATOR}\n"
        ));
    }

    fn announce_round_start(&mut self, round: usize, total_players: usize, chairs: usize) {
        let opening = if round == 0 {
            "Starting round"
        } else {
            "Next round"
        };
        self.print(format_args!(
            "\n{opening} with {total_players} players and {chairs} {}.\nThe music is playing...\n",
            chair_word(chairs)
        ));
    }

    fn announce_music_stopped(&mut self) {
        self.print(format_args!(
            "\n> The music stopped! Players are trying to sit down...\n"
        ));
    }

    fn announce_seat_result(&mut self, _player: PlayerId, _acquired: bool) {}

    fn announce_round_summary(&mut self, occupied: &[PlayerId], eliminated: &[PlayerId]) {
        let mut text = format!("\n{SEPARATOR}\n");
        for (chair, player) in occupied.iter().enumerate() {
            text.push_str(&format!("[Chair {}]: taken by {player}\n", chair + 1));
        }
        text.push('\n');
        for player in eliminated {
            text.push_str(&format!(
                "Player {player} could not find a chair and is eliminated!\n"
            ));
        }
        text.push_str(SEPARATOR);
        text.push('\n');
        self.print(format_args!("{text}"));
    }

    fn announce_winner(&mut self, player: PlayerId) {
        self.print(format_args!(
            "\nWinner {player}! Congratulations!\n{SEPARATOR}\n\nThanks for playing the Concurrent Musical Chairs!\n\n"
        ));
    }
}
