use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use musical_chairs::prelude::*;

#[derive(Parser)]
#[command(name = "musical-chairs")]
#[command(about = "Concurrent musical chairs: player threads race for one chair less than there are players")]
struct Cli {
    /// Number of players (asked on stdin when missing here and in CHAIRS_PLAYERS)
    players: Option<usize>,
    /// Shortest song, in milliseconds
    #[arg(long)]
    music_min_ms: Option<u64>,
    /// Longest song, in milliseconds
    #[arg(long)]
    music_max_ms: Option<u64>,
    /// Do not print the game
    #[arg(long)]
    quiet: bool,
    /// Write a trace of the game to a log file
    #[arg(long)]
    log: bool,
    /// Keep players in order when displaying results
    #[arg(long)]
    no_shuffle: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Configuration::from_env();
    if let Some(players) = cli.players {
        config = config.with_players(players);
    }
    let (min, max) = config.music_range();
    config = config.with_music_range(
        cli.music_min_ms.map(Duration::from_millis).unwrap_or(min),
        cli.music_max_ms.map(Duration::from_millis).unwrap_or(max),
    );
    if cli.quiet {
        config = config.with_verbose(false);
    }
    if cli.log {
        config = config.with_log(true);
    }
    if cli.no_shuffle {
        config = config.with_shuffle(false);
    }
    if config.players().is_none() {
        config = config.with_players(ask_player_count()?);
    }

    play(config)?;
    Ok(())
}

fn ask_player_count() -> anyhow::Result<usize> {
    print!("\nHow many players? ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("could not read the number of players")?;
    let line = line.trim();
    line.parse()
        .with_context(|| format!("'{line}' is not a number of players"))
}
