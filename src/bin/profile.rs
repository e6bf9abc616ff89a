//! Fixed search workload for profiling with `--features hotpath`.

use std::hint::black_box;

use spooky_connect4::position::Position;
use spooky_connect4::search::Searcher;

const OPENINGS: [&str; 4] = ["", "4444", "43443", "334455"];

#[hotpath::main]
fn main() {
    let mut searcher = Searcher::with_depth(12);
    for moves in OPENINGS {
        let position = match Position::from_moves(moves) {
            Ok(position) => position,
            Err(err) => {
                eprintln!("skipping {moves:?}: {err}");
                continue;
            }
        };
        match searcher.best_move(&position) {
            Ok(result) => {
                println!(
                    "{:>8} -> column {} score {:>4} nodes {}",
                    moves,
                    result.column + 1,
                    result.score,
                    result.stats.nodes
                );
                black_box(result);
            }
            Err(err) => eprintln!("{moves:?}: {err}"),
        }
    }
}
