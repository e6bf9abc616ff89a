//! Depth-bounded negamax with alpha-beta pruning and a transposition table.
//!
//! Scores are from the point of view of the side to move and always lie in
//! `[-MAX_SCORE, MAX_SCORE]`. A forced win found at ply `n` scores
//! `MAX_SCORE - n`, a forced loss `-MAX_SCORE + n`, a draw `0`. Positions cut
//! off by the depth bound score their static threat balance, which is far
//! smaller than any decided result.
//!
//! # Example
//!
//! ```
//! use spooky_connect4::position::Position;
//! use spooky_connect4::search::Searcher;
//!
//! let position = Position::from_moves("112233").unwrap();
//! let mut searcher = Searcher::with_depth(4);
//!
//! let result = searcher.best_move(&position).unwrap();
//! assert_eq!(result.column, 3);
//! assert_eq!(result.score, 99);
//! ```

use tracing::{debug, trace};

use crate::error::{SolverError, SolverResult};
use crate::position::Position;
use crate::transposition::TranspositionTable;

/// Bound on every score; a decided game is worth `MAX_SCORE` minus its ply distance.
pub const MAX_SCORE: i32 = 100;

/// Scores beyond this magnitude are decided results rather than heuristics.
pub const DECIDED_THRESHOLD: i32 = 50;

pub const DEFAULT_MAX_DEPTH: u32 = 14;

/// Per-call search counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited, including table hits
    pub nodes: u64,
    /// Positions answered from the transposition table
    pub table_hits: u64,
    /// Table size when the search finished
    pub table_entries: usize,
}

/// Best successor found by a top-level search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub position: Position,
    /// 0-based column of the chosen move
    pub column: usize,
    pub score: i32,
    pub stats: SearchStats,
}

impl SearchResult {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_score(self.score)
    }
}

/// How a driver should read a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Forced win within `moves` full moves
    Win { moves: i32 },
    /// Forced loss within `moves` full moves
    Loss { moves: i32 },
    /// No forced result inside the horizon
    Heuristic(i32),
}

impl Verdict {
    pub fn from_score(score: i32) -> Self {
        if score > DECIDED_THRESHOLD {
            Verdict::Win {
                moves: (MAX_SCORE - score) / 2,
            }
        } else if score < -DECIDED_THRESHOLD {
            Verdict::Loss {
                moves: (MAX_SCORE + score) / 2,
            }
        } else {
            Verdict::Heuristic(score)
        }
    }
}

/// Negamax searcher owning its transposition table.
///
/// With a depth bound the table is cleared at the start of every top-level
/// call, since heuristic leaves make stored scores depend on the ply they were
/// reached at. Unbounded searches only store exact game values, so the table
/// is kept between calls.
pub struct Searcher {
    max_depth: Option<u32>,
    table: TranspositionTable,
    nodes: u64,
}

impl Searcher {
    /// `None` searches every line to the end of the game.
    #[must_use]
    pub fn new(max_depth: Option<u32>) -> Self {
        Self {
            max_depth,
            table: TranspositionTable::new(),
            nodes: 0,
        }
    }

    #[must_use]
    pub fn with_depth(max_depth: u32) -> Self {
        Self::new(Some(max_depth))
    }

    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn max_depth(&self) -> Option<u32> {
        self.max_depth
    }

    pub fn table_len(&self) -> usize {
        self.table.len()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Pick the best successor of `position` for the side to move.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::TerminalPosition`] if the game is already
    /// decided or the board is full.
    #[cfg_attr(feature = "hotpath", hotpath::measure)]
    pub fn best_move(&mut self, position: &Position) -> SolverResult<SearchResult> {
        if position.is_terminal() {
            return Err(SolverError::TerminalPosition);
        }
        let hits_before = self.begin_search();

        let mut alpha = -MAX_SCORE;
        let beta = MAX_SCORE;
        let mut best: Option<(Position, i32)> = None;

        for next in position.successors() {
            let score = -self.negamax(&next, 1, -beta, -alpha);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((next, score));
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        let (next, score) = best.ok_or(SolverError::TerminalPosition)?;
        let column = position
            .column_played(&next)
            .ok_or(SolverError::TerminalPosition)?;
        let stats = self.finish_search(hits_before);

        debug!(
            column = column + 1,
            score,
            nodes = stats.nodes,
            table_hits = stats.table_hits,
            table_entries = stats.table_entries,
            "best move"
        );

        Ok(SearchResult {
            position: next,
            column,
            score,
            stats,
        })
    }

    /// Score `position` for the side to move with the full window.
    ///
    /// With a depth bound of zero this is exactly the static threat score of
    /// any non-terminal position.
    #[cfg_attr(feature = "hotpath", hotpath::measure)]
    pub fn evaluate(&mut self, position: &Position) -> i32 {
        let hits_before = self.begin_search();
        let score = self.negamax(position, 0, -MAX_SCORE, MAX_SCORE);
        let stats = self.finish_search(hits_before);
        debug!(score, nodes = stats.nodes, "evaluate");
        score
    }

    fn begin_search(&mut self) -> u64 {
        self.nodes = 0;
        if self.max_depth.is_some() {
            trace!(entries = self.table.len(), "reset transposition table");
            self.table.clear();
        }
        self.table.stats().hits
    }

    fn finish_search(&self, hits_before: u64) -> SearchStats {
        SearchStats {
            nodes: self.nodes,
            table_hits: self.table.stats().hits - hits_before,
            table_entries: self.table.len(),
        }
    }

    pub(crate) fn negamax(
        &mut self,
        position: &Position,
        ply: u32,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        self.nodes += 1;

        if let Some(score) = self.table.probe(position.key()) {
            return score;
        }

        let ply_score = ply as i32;
        if position.is_win() {
            return MAX_SCORE - ply_score;
        }
        if position.is_loss() {
            return -MAX_SCORE + ply_score;
        }
        if position.is_board_full() {
            return 0;
        }
        if self.max_depth.is_some_and(|depth| ply >= depth) {
            return position.static_threat_score();
        }

        let mut best = -MAX_SCORE;
        for next in position.successors() {
            best = best.max(-self.negamax(&next, ply + 1, -beta, -alpha));
            alpha = alpha.max(best);
            if alpha >= beta {
                break;
            }
        }

        self.table.store(position.key(), best);
        best
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::with_depth(DEFAULT_MAX_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAWN_GAME: &str = "643426421252361677317153414534371522655677";

    fn pos(moves: &str) -> Position {
        Position::from_moves(moves).expect("valid move string")
    }

    /// The drawn game with its last `k` plies taken back.
    fn endgame(k: usize) -> Position {
        pos(&DRAWN_GAME[..DRAWN_GAME.len() - k])
    }

    #[test]
    fn test_completes_bottom_row() {
        let p = pos("112233");
        assert!(!p.is_win());

        for depth in [2, 4, 6] {
            let mut searcher = Searcher::with_depth(depth);
            let result = searcher.best_move(&p).expect("non-terminal");
            assert_eq!(result.column, 3, "depth {}", depth);
            assert_eq!(result.score, MAX_SCORE - 1);
            assert!(result.position.is_loss());
            assert_eq!(result.verdict(), Verdict::Win { moves: 0 });
        }
    }

    #[test]
    fn test_blocks_open_three() {
        // o holds columns 1-3 on the bottom row; x must take column 4
        let p = pos("15263");
        let mut searcher = Searcher::with_depth(4);
        let result = searcher.best_move(&p).expect("non-terminal");
        assert_eq!(result.column, 3);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_empty_board_prefers_center() {
        let mut searcher = Searcher::with_depth(1);
        let result = searcher.best_move(&Position::empty()).expect("non-terminal");
        assert_eq!(result.column, 3);
        assert_eq!(result.score, 0);

        let mut searcher = Searcher::with_depth(11);
        let result = searcher.best_move(&Position::empty()).expect("non-terminal");
        assert_eq!(result.column, 3);
        assert!(result.score > 0);
    }

    #[test]
    fn test_terminal_positions_are_rejected() {
        let full = pos(DRAWN_GAME);
        assert!(full.is_board_full());
        assert!(full.is_terminal());
        let mut searcher = Searcher::unbounded();
        assert!(matches!(
            searcher.best_move(&full),
            Err(SolverError::TerminalPosition)
        ));

        let won = pos("1122334");
        assert!(matches!(
            Searcher::default().best_move(&won),
            Err(SolverError::TerminalPosition)
        ));
    }

    #[test]
    fn test_depth_zero_is_static_score() {
        for moves in ["", "11223", "4455", "1213", "15263", "445566"] {
            let p = pos(moves);
            let mut searcher = Searcher::with_depth(0);
            assert_eq!(searcher.evaluate(&p), p.static_threat_score(), "{}", moves);
            assert_eq!(searcher.table_len(), 0);
        }
    }

    #[test]
    fn test_evaluate_finds_double_threat() {
        // o to move plays column 3 or 6 and holds two open ends
        let mut searcher = Searcher::with_depth(4);
        assert_eq!(searcher.evaluate(&pos("4455")), MAX_SCORE - 3);
        assert_eq!(searcher.evaluate(&pos("11223")), 0);
    }

    #[test]
    fn test_unbounded_endgames() {
        let cases = [(2, 6, 0), (4, 4, -98), (8, 4, -98), (10, 4, 99)];
        for (k, column, score) in cases {
            let mut searcher = Searcher::unbounded();
            let result = searcher.best_move(&endgame(k)).expect("non-terminal");
            assert_eq!(result.column, column, "k = {}", k);
            assert_eq!(result.score, score, "k = {}", k);
        }
    }

    #[test]
    fn test_verdict() {
        assert_eq!(Verdict::from_score(97), Verdict::Win { moves: 1 });
        assert_eq!(Verdict::from_score(-98), Verdict::Loss { moves: 1 });
        assert_eq!(Verdict::from_score(50), Verdict::Heuristic(50));
        assert_eq!(Verdict::from_score(-3), Verdict::Heuristic(-3));
    }

    #[test]
    fn test_table_hit_is_idempotent() {
        let p = pos("4455");
        let mut searcher = Searcher::with_depth(6);
        searcher.begin_search();
        let first = searcher.negamax(&p, 0, -MAX_SCORE, MAX_SCORE);
        let hits = searcher.table.stats().hits;
        let second = searcher.negamax(&p, 0, -MAX_SCORE, MAX_SCORE);
        assert_eq!(first, second);
        assert_eq!(searcher.table.stats().hits, hits + 1);
    }

    #[test]
    fn test_bounded_search_discards_stale_entries() {
        let p = endgame(4);
        let stale_child = p
            .successors()
            .into_iter()
            .find(|c| p.column_played(c) == Some(6))
            .expect("column 7 playable");

        let mut searcher = Searcher::with_depth(3);
        searcher.table.store(stale_child.key(), -60);
        let result = searcher.best_move(&p).expect("non-terminal");
        assert_eq!((result.column, result.score), (4, -98));
    }

    #[test]
    fn test_unbounded_search_keeps_entries() {
        let p = endgame(4);
        let stale_child = p
            .successors()
            .into_iter()
            .find(|c| p.column_played(c) == Some(6))
            .expect("column 7 playable");

        let mut searcher = Searcher::unbounded();
        searcher.table.store(stale_child.key(), -60);
        let result = searcher.best_move(&p).expect("non-terminal");
        assert_eq!((result.column, result.score), (6, 60));

        let entries = searcher.table_len();
        searcher.best_move(&endgame(8)).expect("non-terminal");
        assert!(searcher.table_len() >= entries);
    }

    #[test]
    fn test_raw_reconstruction_searches_identically() {
        for moves in ["4455", "15263", "3344"] {
            let p = pos(moves);
            let rebuilt = Position::from_bitfields(p.stones(), p.occupied());
            let a = Searcher::with_depth(5).best_move(&p).expect("non-terminal");
            let b = Searcher::with_depth(5).best_move(&rebuilt).expect("non-terminal");
            assert_eq!((a.column, a.score), (b.column, b.score));
        }
    }

    #[test]
    fn test_mirrored_turn_flips_decided_scores() {
        // x to move after "112233 5": o threatens column 4, x cannot win
        let p = pos("1122335");
        let mirrored = p.mirrored();
        let mut searcher = Searcher::with_depth(2);
        let as_o = searcher.best_move(&mirrored).expect("non-terminal");
        assert_eq!((as_o.column, as_o.score), (3, MAX_SCORE - 1));
        let as_x = searcher.best_move(&p).expect("non-terminal");
        assert_eq!(as_x.column, 3);
        assert!(as_x.score > -DECIDED_THRESHOLD);
    }
}
