use std::fmt;
use std::str::FromStr;

use crate::bitboard::{
    chain_score, has_four, open_threat_cells, top_of, Bitboard, BOTTOM_ROW, CENTER_OUT,
    COLUMN_STRIDE, HEIGHT, TOP_ROW, WIDTH,
};
use crate::error::{SolverError, SolverResult};
use crate::outcome::GameOutcome;
use crate::player::Player;

/// An immutable Connect Four position, described from the side to move.
///
/// `stones` holds the mover's cells and `occupied` holds every filled cell.
/// Applying a move swaps perspective: the new position's `stones` are the
/// previous opponent's.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    stones: Bitboard,
    occupied: Bitboard,
    opponent: Bitboard,
    empty: Bitboard,
    key: u64,
}

impl Position {
    /// Build a position from raw bitfields. `stones` must be a subset of `occupied`.
    pub fn from_bitfields(stones: Bitboard, occupied: Bitboard) -> Self {
        debug_assert!(stones.is_subset_of(occupied));
        Position {
            stones,
            occupied,
            opponent: stones ^ occupied,
            empty: Bitboard::playable() & !occupied,
            key: stones.raw() + occupied.raw() + BOTTOM_ROW,
        }
    }

    pub fn empty() -> Self {
        Self::from_bitfields(Bitboard::empty(), Bitboard::empty())
    }

    /// Play a string of 1-indexed column digits from the empty board.
    /// Whitespace is skipped.
    pub fn from_moves(moves: &str) -> SolverResult<Self> {
        let mut position = Self::empty();
        for (index, token) in moves.chars().enumerate() {
            if token.is_whitespace() {
                continue;
            }
            let col = match token.to_digit(10) {
                Some(d @ 1..=7) => d as usize - 1,
                _ => return Err(SolverError::InvalidColumnToken { token, index }),
            };
            position = position.apply_move(col)?;
        }
        Ok(position)
    }

    #[inline]
    pub fn stones(&self) -> Bitboard {
        self.stones
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[inline]
    pub fn opponent_stones(&self) -> Bitboard {
        self.opponent
    }

    #[inline]
    pub fn empty_cells(&self) -> Bitboard {
        self.empty
    }

    /// Identity used for transposition lookups. Unique per reachable position.
    #[inline]
    pub fn key(&self) -> u64 {
        self.key
    }

    #[inline]
    pub fn moves_played(&self) -> u32 {
        self.occupied.count()
    }

    #[inline]
    pub fn side_to_move(&self) -> Player {
        Player::from_ply(self.moves_played())
    }

    #[inline]
    pub fn is_column_playable(&self, col: usize) -> bool {
        col < WIDTH && self.occupied.raw() & top_of(col) == 0
    }

    /// Drop a stone for the side to move into `col`.
    pub fn apply_move(&self, col: usize) -> SolverResult<Position> {
        if col >= WIDTH {
            return Err(SolverError::ColumnOutOfRange { column: col });
        }
        if !self.is_column_playable(col) {
            return Err(SolverError::ColumnFull { column: col });
        }
        Ok(self.drop_stone(col))
    }

    #[inline]
    fn drop_stone(&self, col: usize) -> Position {
        Position::from_bitfields(self.opponent, self.occupied.drop_into(col))
    }

    /// The same cells seen by the other side.
    pub fn mirrored(&self) -> Position {
        Position::from_bitfields(self.opponent, self.occupied)
    }

    /// Column that leads from `self` to `child`, if `child` is one drop away.
    pub fn column_played(&self, child: &Position) -> Option<usize> {
        let added = child.occupied ^ self.occupied;
        if added.count() != 1 || !self.occupied.is_subset_of(child.occupied) {
            return None;
        }
        added.iter_ones().next().map(|idx| idx / COLUMN_STRIDE)
    }

    #[inline]
    pub fn is_win(&self) -> bool {
        has_four(self.stones)
    }

    #[inline]
    pub fn is_loss(&self) -> bool {
        has_four(self.opponent)
    }

    #[inline]
    pub fn is_board_full(&self) -> bool {
        self.occupied.raw() & TOP_ROW == TOP_ROW
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.is_board_full() || self.is_win() || self.is_loss()
    }

    /// Decided result in absolute terms, or `None` while play continues.
    pub fn outcome(&self) -> Option<GameOutcome> {
        let mover = self.side_to_move();
        if self.is_win() {
            Some(GameOutcome::win_for(mover))
        } else if self.is_loss() {
            Some(GameOutcome::win_for(mover.opposite()))
        } else if self.is_board_full() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }

    /// Open threats of the mover minus open threats of the opponent.
    pub fn static_threat_score(&self) -> i32 {
        let good = open_threat_cells(self.stones, self.empty).count() as i32;
        let bad = open_threat_cells(self.opponent, self.empty).count() as i32;
        good - bad
    }

    /// Cheap ranking measure for move ordering; not a position value.
    #[inline]
    pub fn ordering_score(stones: Bitboard) -> u32 {
        chain_score(stones)
    }

    /// Positions one legal move away, best-looking first.
    ///
    /// Columns are generated center-out, then stably sorted by the ordering
    /// score of the stones belonging to the side that just moved.
    pub fn successors(&self) -> Vec<Position> {
        let mut next: Vec<Position> = CENTER_OUT
            .iter()
            .filter(|&&col| self.is_column_playable(col))
            .map(|&col| self.drop_stone(col))
            .collect();
        next.sort_by_key(|p| std::cmp::Reverse(Self::ordering_score(p.opponent)));
        next
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromStr for Position {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_moves(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mover = self.side_to_move();
        for row in (0..HEIGHT).rev() {
            for col in 0..WIDTH {
                let c = if !self.occupied.get(col, row) {
                    '.'
                } else if self.stones.get(col, row) {
                    mover.to_char()
                } else {
                    mover.opposite().to_char()
                };
                write!(f, "{} ", c)?;
            }
            writeln!(f, "{}", row)?;
        }

        for col in 1..=WIDTH {
            if col > 1 {
                write!(f, " ")?;
            }
            write!(f, "{}", col)?;
        }
        Ok(())
    }
}
