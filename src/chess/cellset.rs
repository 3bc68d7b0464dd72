//! [`CellSet`] is the result type of every move and capture generator: a set
//! of board cells backed by a single 64-bit integer. Bit `row * 8 + col`
//! corresponds to [`Cell`] `(row, col)`, so the least significant bit is a8
//! and the most significant one is h1.
//!
//! Set operations (union, intersection, difference) are plain bit operations,
//! which keeps the per-piece generators cheap to combine.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not, Sub};

use itertools::Itertools;

use crate::chess::core::{Cell, BOARD_WIDTH};

/// Set of board cells. Thin wrapper around [u64].
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct CellSet {
    bits: u64,
}

impl CellSet {
    /// Constructs a set from pre-calculated bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }

    /// Constructs an empty set of cells.
    #[must_use]
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    /// Constructs the universal set containing every cell of the board.
    #[must_use]
    pub const fn full() -> Self {
        Self::from_bits(u64::MAX)
    }

    /// Returns raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn from_cells(cells: &[Cell]) -> Self {
        cells.iter().copied().collect()
    }

    /// Adds the cell to the set.
    pub fn insert(&mut self, cell: Cell) {
        self.bits |= Self::from(cell).bits;
    }

    /// Removes the cell from the set.
    pub fn remove(&mut self, cell: Cell) {
        self.bits &= !Self::from(cell).bits;
    }

    /// Returns true if this set contains given cell.
    #[must_use]
    pub const fn contains(self, cell: Cell) -> bool {
        (self.bits & (1u64 << cell.index())) != 0
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Number of cells in the set.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.bits.count_ones()
    }

    /// An efficient way to iterate over the set cells in row-major order.
    #[must_use]
    pub const fn iter(self) -> CellSetIterator {
        CellSetIterator { bits: self.bits }
    }
}

impl fmt::Debug for CellSet {
    /// Dumps the set as a grid: row 0 (the eighth rank) on top, `1` for
    /// members and `.` for the rest.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            (0..BOARD_WIDTH)
                .map(|row| {
                    (0..BOARD_WIDTH)
                        .map(|col| match self.contains(Cell::new(row, col)) {
                            true => '1',
                            false => '.',
                        })
                        .join(SQUARE_SEPARATOR)
                })
                .join(LINE_SEPARATOR)
        )
    }
}

impl From<Cell> for CellSet {
    fn from(cell: Cell) -> Self {
        Self::from_bits(1u64 << cell.index())
    }
}

impl FromIterator<Cell> for CellSet {
    fn from_iter<T: IntoIterator<Item = Cell>>(iter: T) -> Self {
        let mut result = Self::empty();
        for cell in iter {
            result.insert(cell);
        }
        result
    }
}

impl IntoIterator for CellSet {
    type IntoIter = CellSetIterator;
    type Item = Cell;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl BitOr for CellSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits | rhs.bits)
    }
}

impl BitOrAssign for CellSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl BitAnd for CellSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits & rhs.bits)
    }
}

impl Sub for CellSet {
    type Output = Self;

    /// [Relative complement], i.e. Result = LHS \ RHS.
    ///
    /// [Relative complement]: https://en.wikipedia.org/wiki/Complement_%28set_theory%29#Relative_complement
    fn sub(self, rhs: Self) -> Self::Output {
        self & !rhs
    }
}

impl Not for CellSet {
    type Output = Self;

    /// Returns [complement
    /// set](https://en.wikipedia.org/wiki/Complement_%28set_theory%29) of Self.
    fn not(self) -> Self::Output {
        Self::from_bits(!self.bits)
    }
}

/// Iterates over set cells in a [`CellSet`] from least significant bit to the
/// most significant one.
pub struct CellSetIterator {
    bits: u64,
}

impl Iterator for CellSetIterator {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let next_index = self.bits.trailing_zeros();
        self.bits &= self.bits - 1;
        // There are only 64 cells, so the index always fits.
        Cell::try_from(next_index as u8).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.bits.count_ones() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for CellSetIterator {}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::CellSet;
    use crate::chess::core::Cell;

    fn cells(coordinates: &[&str]) -> CellSet {
        coordinates
            .iter()
            .map(|c| Cell::try_from(*c).unwrap())
            .collect()
    }

    #[test]
    fn basics() {
        assert_eq!(std::mem::size_of::<CellSet>(), 8);
        assert_eq!(CellSet::full().bits(), u64::MAX);
        assert_eq!(CellSet::empty().bits(), u64::MIN);
        assert!(CellSet::empty().is_empty());

        assert_eq!(CellSet::from(Cell::new(0, 0)).bits(), 1);
        assert_eq!(CellSet::from(Cell::new(0, 1)).bits(), 2);
        assert_eq!(CellSet::from(Cell::new(7, 7)).bits(), 1u64 << 63);

        let mut set = CellSet::empty();
        set.insert(Cell::new(3, 3));
        set.insert(Cell::new(3, 3));
        set.insert(Cell::new(5, 1));
        assert_eq!(set.len(), 2);
        assert!(set.contains(Cell::new(5, 1)));
        set.remove(Cell::new(5, 1));
        assert!(!set.contains(Cell::new(5, 1)));
        assert_eq!(set, CellSet::from_cells(&[Cell::new(3, 3)]));
    }

    #[test]
    fn iteration_order() {
        let set = cells(&["h1", "a8", "e4", "b8"]);
        assert_eq!(set.iter().len(), 4);
        assert_eq!(
            set.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            vec!["a8", "b8", "e4", "h1"]
        );
    }

    #[test]
    fn set_ops() {
        let set = cells(&["a8", "b7", "c6", "d5"]);
        assert_eq!(set - cells(&["b7", "h1"]), cells(&["a8", "c6", "d5"]));
        assert_eq!(set & cells(&["b7", "h1"]), cells(&["b7"]));
        assert_eq!(set | cells(&["h1"]), cells(&["a8", "b7", "c6", "d5", "h1"]));
        assert_eq!(!!set, set);
        assert_eq!(set - !set, set);
        assert_eq!((!set).len(), 60);
    }

    #[test]
    fn dump() {
        assert_eq!(
            format!("{:?}", CellSet::empty()),
            ". . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . ."
        );
        assert_eq!(
            format!("{:?}", cells(&["b8", "g5", "a1"])),
            ". 1 . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . 1 .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             1 . . . . . . ."
        );
    }
}
