use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, Not, Shl, Shr};

/// Playable columns.
pub const WIDTH: usize = 7;
/// Playable rows per column.
pub const HEIGHT: usize = 6;
/// Bits reserved per column: six playable rows, the gap row, and one spare.
pub const COLUMN_STRIDE: usize = 8;
/// Number of playable cells.
pub const AREA: usize = WIDTH * HEIGHT;

/// Bottom cell of every column.
pub const BOTTOM_ROW: u64 = 0x0001_0101_0101_0101;
/// Top playable cell of every column.
pub const TOP_ROW: u64 = 0x0020_2020_2020_2020;
/// All playable cells.
pub const PLAYABLE: u64 = 0x003F_3F3F_3F3F_3F3F;

/// Shift offsets for vertical, diagonal-down, horizontal and diagonal-up lines.
pub const ALIGNMENTS: [u32; 4] = [1, 7, 8, 9];

/// Center-out column preference used when generating moves.
pub const CENTER_OUT: [usize; WIDTH] = [3, 4, 2, 5, 1, 6, 0];

/// Bit index of `(col, row)` in the column-major layout.
#[inline]
pub const fn cell_index(col: usize, row: usize) -> usize {
    col * COLUMN_STRIDE + row
}

/// Bottom cell of `col`.
#[inline]
pub const fn bottom_of(col: usize) -> u64 {
    1u64 << (col * COLUMN_STRIDE)
}

/// Top playable cell of `col`.
#[inline]
pub const fn top_of(col: usize) -> u64 {
    1u64 << (col * COLUMN_STRIDE + HEIGHT - 1)
}

/// The six playable cells of `col`.
#[inline]
pub const fn column_mask(col: usize) -> u64 {
    0x3Fu64 << (col * COLUMN_STRIDE)
}

/// A set of cells on the 7x6 board, one bit per cell, columns 8 bits apart.
///
/// The gap row between columns keeps shift-based line probes from wrapping
/// from the top of one column into the bottom of the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(u64);

impl Bitboard {
    /// All bits zero.
    #[inline]
    pub const fn empty() -> Self {
        Bitboard(0)
    }

    /// Every playable cell.
    #[inline]
    pub const fn playable() -> Self {
        Bitboard(PLAYABLE)
    }

    #[inline]
    pub const fn from_raw(bits: u64) -> Self {
        Bitboard(bits)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Single bit set at `(col, row)`.
    #[inline]
    pub fn single(col: usize, row: usize) -> Self {
        debug_assert!(col < WIDTH && row < HEIGHT);
        Bitboard(1u64 << cell_index(col, row))
    }

    /// Test whether `(col, row)` is set.
    #[inline]
    pub fn get(self, col: usize, row: usize) -> bool {
        debug_assert!(col < WIDTH && row < COLUMN_STRIDE);
        (self.0 >> cell_index(col, row)) & 1 != 0
    }

    /// True if no bits are set.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if any bit is set.
    #[inline]
    pub fn is_nonzero(self) -> bool {
        self.0 != 0
    }

    /// Population count.
    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// True if every bit of `self` is also set in `other`.
    #[inline]
    pub fn is_subset_of(self, other: Bitboard) -> bool {
        self.0 & !other.0 == 0
    }

    /// Fill the lowest empty cell of `col`, treating `self` as the occupancy.
    ///
    /// Adding the column's bottom bit carries through the occupied run and
    /// lands on the first free cell; OR-ing keeps the existing stones. The
    /// caller must ensure the column is not full.
    #[inline]
    pub fn drop_into(self, col: usize) -> Bitboard {
        debug_assert!(col < WIDTH);
        Bitboard(self.0 | self.0.wrapping_add(bottom_of(col)))
    }

    /// Iterate over indices of set bits.
    #[inline]
    pub fn iter_ones(self) -> BitIterator {
        BitIterator { bits: self.0 }
    }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Bitboard) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Bitboard) {
        self.0 |= rhs.0;
    }
}

impl BitXor for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitxor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl Not for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

/// Shift toward higher indices; bits past 63 are lost.
impl Shl<u32> for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn shl(self, n: u32) -> Bitboard {
        Bitboard(self.0.checked_shl(n).unwrap_or(0))
    }
}

/// Shift toward lower indices; bits below 0 are lost.
impl Shr<u32> for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn shr(self, n: u32) -> Bitboard {
        Bitboard(self.0.checked_shr(n).unwrap_or(0))
    }
}

/// Iterator over set-bit indices in a `Bitboard`.
pub struct BitIterator {
    bits: u64,
}

impl Iterator for BitIterator {
    type Item = usize;
    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.bits == 0 {
            return None;
        }
        let bit = self.bits.trailing_zeros() as usize;
        // Clear lowest set bit
        self.bits &= self.bits - 1;
        Some(bit)
    }
}

/// True if `stones` holds four cells in a line in any direction.
#[inline]
pub fn has_four(stones: Bitboard) -> bool {
    ALIGNMENTS.iter().any(|&a| {
        let pairs = stones & (stones >> a);
        (pairs & (pairs >> (2 * a))).is_nonzero()
    })
}

/// Move-ordering measure: per alignment, the cells that start two consecutive
/// aligned pairs of `stones`, summed over all four alignments.
#[inline]
pub fn chain_score(stones: Bitboard) -> u32 {
    ALIGNMENTS
        .iter()
        .map(|&a| {
            let pairs = stones & (stones >> a);
            (pairs & (pairs >> a)).count()
        })
        .sum()
}

/// Cells that complete a line of four with three `stones` already aligned
/// behind them, where the cell itself is either empty or one of `stones`.
///
/// Probes both directions of every alignment; a cell threatened along several
/// lines is reported once.
#[inline]
pub fn open_threat_cells(stones: Bitboard, empty: Bitboard) -> Bitboard {
    let open = stones | empty;
    let mut threats = Bitboard::empty();
    for &a in &ALIGNMENTS {
        let up = open & (stones >> a);
        threats |= up & (up >> a) & (up >> (2 * a));
        let down = open & (stones << a);
        threats |= down & (down << a) & (down << (2 * a));
    }
    threats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(col: usize, row: usize, dcol: isize, drow: isize, len: usize) -> Bitboard {
        let mut bb = Bitboard::empty();
        for i in 0..len as isize {
            let c = (col as isize + dcol * i) as usize;
            let r = (row as isize + drow * i) as usize;
            bb |= Bitboard::single(c, r);
        }
        bb
    }

    // (name, start col, start row, dcol, drow)
    macro_rules! line_tests {
        ($($name:ident: $col:expr, $row:expr, $dc:expr, $dr:expr;)*) => {
            paste::paste! {
                $(
                    #[test]
                    fn [<test_three_is_not_four_ $name>]() {
                        assert!(!has_four(line($col, $row, $dc, $dr, 3)));
                    }

                    #[test]
                    fn [<test_four_is_detected_ $name>]() {
                        assert!(has_four(line($col, $row, $dc, $dr, 4)));
                    }

                    #[test]
                    fn [<test_five_is_detected_ $name>]() {
                        assert!(has_four(line($col, $row, $dc, $dr, 5)));
                    }
                )*
            }
        };
    }

    line_tests! {
        vertical: 2, 0, 0, 1;
        horizontal: 1, 3, 1, 0;
        diagonal_up: 0, 0, 1, 1;
        diagonal_down: 1, 5, 1, -1;
    }

    #[test]
    fn test_layout_constants() {
        assert_eq!(BOTTOM_ROW, (0..WIDTH).map(bottom_of).fold(0, |a, b| a | b));
        assert_eq!(TOP_ROW, (0..WIDTH).map(top_of).fold(0, |a, b| a | b));
        assert_eq!(PLAYABLE, (0..WIDTH).map(column_mask).fold(0, |a, b| a | b));
        assert_eq!(Bitboard::playable().count() as usize, AREA);
    }

    #[test]
    fn test_vertical_does_not_wrap_between_columns() {
        // rows 4 and 5 of column 0 plus rows 0 and 1 of column 1
        let bb = Bitboard::single(0, 4)
            | Bitboard::single(0, 5)
            | Bitboard::single(1, 0)
            | Bitboard::single(1, 1);
        assert!(!has_four(bb));
    }

    #[test]
    fn test_diagonal_does_not_wrap_between_columns() {
        // would be a diagonal-up line if rows wrapped at the board top
        let bb = Bitboard::single(0, 3)
            | Bitboard::single(1, 4)
            | Bitboard::single(2, 5)
            | Bitboard::single(4, 0);
        assert!(!has_four(bb));
    }

    #[test]
    fn test_drop_into_fills_lowest_empty_cell() {
        let occupied = Bitboard::single(3, 0) | Bitboard::single(3, 1);
        let after = occupied.drop_into(3);
        assert_eq!(after, occupied | Bitboard::single(3, 2));

        let fresh = Bitboard::empty().drop_into(6);
        assert_eq!(fresh, Bitboard::single(6, 0));
    }

    #[test]
    fn test_chain_score_counts_runs_of_three() {
        assert_eq!(chain_score(line(0, 0, 1, 0, 2)), 0);
        assert_eq!(chain_score(line(0, 0, 1, 0, 3)), 1);
        assert_eq!(chain_score(line(0, 0, 1, 0, 4)), 2);
    }

    #[test]
    fn test_open_threat_cells_bottom_row() {
        let stones = line(0, 0, 1, 0, 3);
        let empty = Bitboard::playable() & !stones;
        let threats = open_threat_cells(stones, empty);
        // only column 3 can complete the line; column -1 does not exist
        assert_eq!(threats, Bitboard::single(3, 0));
    }

    #[test]
    fn test_open_threat_cells_blocked() {
        let stones = line(1, 0, 1, 0, 3);
        let blocker = Bitboard::single(0, 0);
        let empty = Bitboard::playable() & !(stones | blocker);
        let threats = open_threat_cells(stones, empty);
        assert_eq!(threats, Bitboard::single(4, 0));
    }

    #[test]
    fn test_iter_ones() {
        let bb = Bitboard::single(0, 0) | Bitboard::single(2, 3) | Bitboard::single(6, 5);
        let indices: Vec<usize> = bb.iter_ones().collect();
        assert_eq!(indices, vec![0, cell_index(2, 3), cell_index(6, 5)]);
    }

    #[test]
    fn test_shift_out_of_range_is_empty() {
        let bb = Bitboard::from_raw(u64::MAX);
        assert!((bb << 64).is_empty());
        assert!((bb >> 64).is_empty());
    }
}
