use std::error::Error;
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use spooky_connect4::game::Game;
use spooky_connect4::player::Player;
use spooky_connect4::search::{Searcher, Verdict, DEFAULT_MAX_DEPTH};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// The engine plays both sides
    PlaySelf,
    /// A human plays one side from stdin
    PlayHuman,
}

/// Play Connect Four against the solver or let it play itself.
#[derive(Parser)]
#[command(name = "connect4", about = "Connect Four negamax solver")]
struct Cli {
    #[arg(long, value_enum, default_value = "play-self")]
    mode: Mode,

    /// Search depth in plies; negative searches to the end of the game
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH as i64, allow_hyphen_values = true)]
    max_depth: i64,

    /// Opening moves as 1-indexed column digits, e.g. 44444136
    #[arg(long, default_value = "")]
    starting_moves: String,

    /// In play-human mode, the human moves first
    #[arg(long)]
    starting: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let mut game = Game::from_moves(&cli.starting_moves)?;
    let max_depth = u32::try_from(cli.max_depth).ok();
    let mut searcher = Searcher::new(max_depth);

    let human = match cli.mode {
        Mode::PlaySelf => None,
        Mode::PlayHuman if cli.starting => Some(Player::First),
        Mode::PlayHuman => Some(Player::Second),
    };

    println!("{game}\n");
    let mut thinking = Duration::ZERO;
    let stdin = io::stdin();
    let mut input = stdin.lock();

    while !game.is_over() {
        let mover = game.turn();
        if human == Some(mover) {
            let column = read_human_move(&game, &mut input)?;
            game.make_move(column)?;
        } else {
            let start = Instant::now();
            let result = searcher.best_move(game.position())?;
            thinking += start.elapsed();
            game.advance_to(result.position)?;

            match result.verdict() {
                Verdict::Win { moves } => println!("{mover} can win in {moves} moves."),
                Verdict::Loss { moves } => println!("{mover} can lose in {moves} moves."),
                Verdict::Heuristic(score) => println!("p = {score}"),
            }
        }
        println!("---------------");
        println!("{game}\n");
    }

    match game.outcome() {
        Some(outcome) => println!("{outcome}"),
        None => println!("Game abandoned"),
    }
    println!("Processing time: {:.3}s", thinking.as_secs_f64());
    Ok(())
}

/// Prompt until a legal 1-indexed column is entered.
fn read_human_move(game: &Game, input: &mut impl BufRead) -> io::Result<usize> {
    loop {
        print!("Move: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before the game ended",
            ));
        }

        match line.trim().parse::<usize>() {
            Ok(column @ 1..=7) if game.is_legal_move(column - 1) => return Ok(column - 1),
            _ => println!("Invalid move"),
        }
    }
}
