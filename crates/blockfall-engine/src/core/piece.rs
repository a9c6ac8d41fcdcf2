use super::shape::{PieceKind, Shape};

/// A falling piece with type, position and rotation.
///
/// Pieces are immutable values: movement and rotation return new `Piece`
/// instances, which the caller validates against a board before committing.
///
/// # Coordinate System
///
/// - The position is the top-left corner of the shape's bounding box
/// - X increases rightward (columns), Y increases downward (rows)
/// - Y may be negative while the piece is still entering from above
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind, PiecePosition};
///
/// let piece = Piece::spawn(PieceKind::T, 10);
/// assert_eq!(piece.position(), PiecePosition::new(4, 0));
///
/// let moved = piece.right().down();
/// assert_eq!(moved.position(), PiecePosition::new(5, 1));
///
/// let rotated = moved.rotated();
/// assert_eq!(rotated.rotation(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    position: PiecePosition,
    rotation: usize,
}

impl Piece {
    /// Creates a piece at an arbitrary position and rotation.
    ///
    /// The rotation index wraps around the kind's rotation count.
    #[must_use]
    pub fn new(kind: PieceKind, position: PiecePosition, rotation: usize) -> Self {
        Self {
            kind,
            position,
            rotation: rotation % kind.rotation_count(),
        }
    }

    /// Creates a piece at the spawn position of a board `board_width` wide:
    /// column `floor(width / 2) - 1`, row 0, rotation 0.
    #[must_use]
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        Self::new(kind, PiecePosition::spawn(board_width), 0)
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> usize {
        self.rotation
    }

    /// The shape grid of the current rotation state.
    #[must_use]
    pub fn shape(&self) -> &'static Shape {
        self.kind.shape(self.rotation)
    }

    /// Absolute `(x, y)` positions of every occupied cell.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.position.cells_of(self.shape())
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.shifted(-1, 0)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.shifted(1, 0)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.shifted(0, 1)
    }

    /// The next rotation state at the same position. No offset correction is
    /// applied.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            rotation: (self.rotation + 1) % self.kind.rotation_count(),
            ..*self
        }
    }

    fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position.offset(dx, dy),
            ..*self
        }
    }
}

/// Position of a piece's bounding box on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Spawn position for a board `board_width` columns wide.
    #[must_use]
    pub fn spawn(board_width: usize) -> Self {
        let x = i32::try_from(board_width / 2).map_or(i32::MAX, |half| half - 1);
        Self::new(x, 0)
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Absolute `(x, y)` positions of the occupied cells of `shape` placed here.
    // shape offsets are below Shape::MAX_SIZE
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn cells_of(self, shape: &Shape) -> impl Iterator<Item = (i32, i32)> + '_ {
        shape
            .occupied_cells()
            .map(move |(dx, dy)| (self.x + dx as i32, self.y + dy as i32))
    }
}
