use std::fmt;

use super::{piece::PiecePosition, shape::PieceKind, shape::Shape};

/// A single cell of the board.
///
/// A settled cell remembers the kind of piece that locked there. The kind is
/// only used for rendering; once settled, every non-empty cell behaves the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Settled block of a specific piece type.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Block::Empty => '.',
            Block::Piece(kind) => kind.as_char(),
        }
    }
}

/// A single row of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRow {
    cells: Box<[Block]>,
}

impl BlockRow {
    fn empty(width: usize) -> Self {
        Self {
            cells: vec![Block::Empty; width].into_boxed_slice(),
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[Block] {
        &self.cells
    }

    /// A row is full iff every column is non-empty.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(|b| !b.is_empty())
    }

    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(Block::is_empty)
    }
}

/// Grid of settled cells, `height` rows by `width` columns.
///
/// Row 0 is the top of the visible area and rows grow downward. Falling
/// pieces may extend above row 0; those cells are never stored here.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, PieceKind, PiecePosition};
///
/// let mut board = Board::new(10, 20);
/// board.place(PieceKind::O, PieceKind::O.shape(0), PiecePosition::new(4, 18));
///
/// assert!(board.is_occupied(19, 5));
/// assert!(!board.is_occupied(17, 5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    rows: Vec<BlockRow>,
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            rows: (0..height).map(|_| BlockRow::empty(width)).collect(),
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        let width = self.width;
        self.rows.fill_with(|| BlockRow::empty(width));
    }

    /// Returns the cell at `(row, col)`, or `None` outside the board.
    #[must_use]
    pub fn block_at(&self, row: i32, col: i32) -> Option<Block> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        self.rows.get(row)?.cells.get(col).copied()
    }

    /// Returns whether a settled block occupies `(row, col)`.
    ///
    /// Coordinates outside the board are reported as unoccupied. Bounds
    /// checking of placements is the caller's job.
    #[must_use]
    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        self.block_at(row, col).is_some_and(|b| !b.is_empty())
    }

    /// Overwrites a single cell.
    ///
    /// # Panics
    ///
    /// Panics if `(row, col)` is outside the board.
    pub fn fill_block_at(&mut self, row: usize, col: usize, block: Block) {
        self.rows[row].cells[col] = block;
    }

    /// Writes `kind` into every cell covered by `shape` at `origin`.
    ///
    /// Cells above the visible board (negative rows) are dropped silently.
    pub fn place(&mut self, kind: PieceKind, shape: &Shape, origin: PiecePosition) {
        for (x, y) in origin.cells_of(shape) {
            let (Ok(row), Ok(col)) = (usize::try_from(y), usize::try_from(x)) else {
                continue;
            };
            if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.cells.get_mut(col)) {
                *cell = Block::Piece(kind);
            }
        }
    }

    /// Removes every full row at once and returns how many were removed.
    ///
    /// Remaining rows keep their relative order and shift down by the total
    /// removed; the same number of empty rows appear at the top.
    pub fn clear_full_lines(&mut self) -> usize {
        let height = self.rows.len();
        self.rows.retain(|row| !row.is_filled());
        let cleared = height - self.rows.len();
        if cleared > 0 {
            let width = self.width;
            self.rows
                .splice(0..0, (0..cleared).map(|_| BlockRow::empty(width)));
        }
        cleared
    }

    /// Iterates rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &BlockRow> {
        self.rows.iter()
    }

    /// Returns whether no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(BlockRow::is_clear)
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter(|b| !b.is_empty())
            .count()
    }
}

/// One line per row: `.` for empty cells, the piece letter otherwise.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for block in row.cells() {
                write!(f, "{}", block.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
