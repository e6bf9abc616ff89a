//! Connect Four solver on a 7x6 bitboard.
//!
//! - [`position`]: immutable positions seen from the side to move
//! - [`search`]: negamax with alpha-beta pruning and a transposition table
//! - [`game`]: move history on top of positions, for drivers

pub mod bitboard;
pub mod error;
pub mod game;
pub mod outcome;
pub mod player;
pub mod position;
pub mod search;
pub mod transposition;

#[cfg(feature = "python")]
extern crate pyo3;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule(gil_used = false)]
fn spooky_connect4(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use player::Player;
    use python_bindings::*;
    m.add_class::<PyGame>()?;
    m.add_class::<PySearcher>()?;
    m.add_class::<PySearchResult>()?;
    m.add("FIRST", Player::First as i8)?;
    m.add("SECOND", Player::Second as i8)?;
    m.add("WIDTH", bitboard::WIDTH)?;
    m.add("HEIGHT", bitboard::HEIGHT)?;
    Ok(())
}

#[cfg(feature = "python")]
mod python_bindings {
    use super::*;
    use crate::error::SolverError;
    use crate::game::Game;
    use crate::player::Player;
    use crate::search::{SearchResult, Searcher, Verdict};

    fn to_py_err(err: SolverError) -> PyErr {
        PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
    }

    #[pyclass(name = "Game")]
    #[derive(Clone)]
    pub struct PyGame {
        game: Game,
    }

    #[pymethods]
    impl PyGame {
        #[new]
        pub fn new() -> Self {
            PyGame { game: Game::new() }
        }

        /// Moves are 1-indexed column digits, e.g. "4453".
        #[staticmethod]
        pub fn from_moves(moves: &str) -> PyResult<Self> {
            Game::from_moves(moves)
                .map(|game| PyGame { game })
                .map_err(to_py_err)
        }

        pub fn turn(&self) -> i8 {
            self.game.turn() as i8
        }

        pub fn move_count(&self) -> usize {
            self.game.move_count()
        }

        pub fn move_history(&self) -> Vec<usize> {
            self.game.move_history()
        }

        pub fn is_over(&self) -> bool {
            self.game.is_over()
        }

        pub fn winner(&self) -> Option<i8> {
            self.game
                .outcome()
                .and_then(|o| o.winner())
                .map(|p| p as i8)
        }

        pub fn reward_from_perspective(&self, perspective: i8) -> PyResult<f32> {
            let player = Player::from_int(perspective).ok_or_else(|| {
                PyErr::new::<pyo3::exceptions::PyValueError, _>("Invalid perspective")
            })?;
            Ok(self
                .game
                .outcome()
                .map(|o| o.encode_winner_from_perspective(player))
                .unwrap_or(0.0))
        }

        pub fn legal_moves(&self) -> Vec<usize> {
            self.game.legal_moves()
        }

        pub fn is_legal_move(&self, column: usize) -> bool {
            self.game.is_legal_move(column)
        }

        pub fn make_move(&mut self, column: usize) -> PyResult<()> {
            self.game.make_move(column).map_err(to_py_err)
        }

        pub fn unmake_move(&mut self) -> bool {
            self.game.unmake_move()
        }

        pub fn clone(&self) -> PyGame {
            PyGame {
                game: self.game.clone(),
            }
        }

        pub fn __hash__(&self) -> u64 {
            self.game.position().key()
        }

        pub fn __str__(&self) -> String {
            self.game.to_string()
        }

        pub fn __repr__(&self) -> String {
            format!(
                "Game(moves={}, turn={}, over={})",
                self.game.move_count(),
                self.game.turn(),
                self.game.is_over()
            )
        }
    }

    #[pyclass(name = "Searcher")]
    pub struct PySearcher {
        searcher: Searcher,
    }

    #[pymethods]
    impl PySearcher {
        /// `max_depth=None` solves every line to the end of the game.
        #[new]
        #[pyo3(signature = (max_depth=None))]
        pub fn new(max_depth: Option<u32>) -> Self {
            PySearcher {
                searcher: Searcher::new(max_depth),
            }
        }

        pub fn max_depth(&self) -> Option<u32> {
            self.searcher.max_depth()
        }

        pub fn best_move(&mut self, game: &PyGame) -> PyResult<PySearchResult> {
            self.searcher
                .best_move(game.game.position())
                .map(|result| PySearchResult { result })
                .map_err(to_py_err)
        }

        pub fn evaluate(&mut self, game: &PyGame) -> i32 {
            self.searcher.evaluate(game.game.position())
        }

        pub fn clear(&mut self) {
            self.searcher.clear()
        }

        pub fn table_len(&self) -> usize {
            self.searcher.table_len()
        }
    }

    #[pyclass(name = "SearchResult")]
    #[derive(Clone)]
    pub struct PySearchResult {
        result: SearchResult,
    }

    #[pymethods]
    impl PySearchResult {
        /// 0-based column of the chosen move.
        #[getter]
        pub fn column(&self) -> usize {
            self.result.column
        }

        #[getter]
        pub fn score(&self) -> i32 {
            self.result.score
        }

        #[getter]
        pub fn nodes(&self) -> u64 {
            self.result.stats.nodes
        }

        /// Full moves to a forced result, signed: positive wins, negative losses.
        pub fn forced_in(&self) -> Option<i32> {
            match self.result.verdict() {
                Verdict::Win { moves } => Some(moves),
                Verdict::Loss { moves } => Some(-moves),
                Verdict::Heuristic(_) => None,
            }
        }

        pub fn __repr__(&self) -> String {
            format!(
                "SearchResult(column={}, score={}, nodes={})",
                self.result.column, self.result.score, self.result.stats.nodes
            )
        }
    }
}
