use std::fmt;

use crate::bitboard::WIDTH;
use crate::error::{SolverError, SolverResult};
use crate::outcome::GameOutcome;
use crate::player::Player;
use crate::position::Position;

#[derive(Clone, Debug)]
struct MoveHistoryEntry {
    column: usize,
    previous: Position,
}

/// A game in progress: the current position plus the moves that led to it.
#[derive(Clone, Debug, Default)]
pub struct Game {
    position: Position,
    move_history: Vec<MoveHistoryEntry>,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay a string of 1-indexed column digits.
    pub fn from_moves(moves: &str) -> SolverResult<Self> {
        let mut game = Game::new();
        for (index, token) in moves.chars().enumerate() {
            if token.is_whitespace() {
                continue;
            }
            match token.to_digit(10) {
                Some(d @ 1..=7) => game.make_move(d as usize - 1)?,
                _ => return Err(SolverError::InvalidColumnToken { token, index }),
            }
        }
        Ok(game)
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn turn(&self) -> Player {
        self.position.side_to_move()
    }

    pub fn move_count(&self) -> usize {
        self.move_history.len()
    }

    /// 0-based columns in the order they were played.
    pub fn move_history(&self) -> Vec<usize> {
        self.move_history.iter().map(|e| e.column).collect()
    }

    pub fn is_over(&self) -> bool {
        self.position.is_terminal()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.position.outcome()
    }

    pub fn is_legal_move(&self, column: usize) -> bool {
        !self.is_over() && self.position.is_column_playable(column)
    }

    pub fn legal_moves(&self) -> Vec<usize> {
        if self.is_over() {
            return Vec::new();
        }
        (0..WIDTH)
            .filter(|&col| self.position.is_column_playable(col))
            .collect()
    }

    /// Drop a stone for the side to move into `column` (0-based).
    pub fn make_move(&mut self, column: usize) -> SolverResult<()> {
        if self.is_over() {
            return Err(SolverError::TerminalPosition);
        }
        let next = self.position.apply_move(column)?;
        self.move_history.push(MoveHistoryEntry {
            column,
            previous: self.position,
        });
        self.position = next;
        Ok(())
    }

    /// Adopt a successor position, such as one chosen by the searcher.
    pub fn advance_to(&mut self, next: Position) -> SolverResult<()> {
        let column = self
            .position
            .column_played(&next)
            .ok_or(SolverError::TerminalPosition)?;
        self.make_move(column)
    }

    pub fn unmake_move(&mut self) -> bool {
        match self.move_history.pop() {
            Some(entry) => {
                self.position = entry.previous;
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.position)
    }
}
