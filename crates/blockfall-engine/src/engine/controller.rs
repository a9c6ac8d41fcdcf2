use crate::{
    CommandError, PieceCollisionError,
    core::{
        board::Board,
        piece::{Piece, PiecePosition},
        shape::{PieceKind, Shape},
    },
};

/// Direction of a single-cell move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Left,
    Right,
    Down,
}

impl MoveDirection {
    #[must_use]
    pub fn apply(self, piece: &Piece) -> Piece {
        match self {
            MoveDirection::Left => piece.left(),
            MoveDirection::Right => piece.right(),
            MoveDirection::Down => piece.down(),
        }
    }
}

/// Returns whether `shape` placed at `origin` fits on `board`.
///
/// Every occupied cell must land in a column within `[0, width)` and a row
/// below `height`. Rows above the board (negative) are allowed; rows inside it
/// must not already be occupied. One offending cell rejects the whole shape.
#[must_use]
pub fn is_valid_position(shape: &Shape, origin: PiecePosition, board: &Board) -> bool {
    let width = i32::try_from(board.width()).unwrap_or(i32::MAX);
    let height = i32::try_from(board.height()).unwrap_or(i32::MAX);
    origin.cells_of(shape).all(|(x, y)| {
        (0..width).contains(&x) && y < height && (y < 0 || !board.is_occupied(y, x))
    })
}

/// Owns the falling piece and governs its legal movement.
///
/// A candidate placement is only committed when it is valid against the
/// board; rejected moves and rotations leave the piece untouched.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, MoveDirection, PieceController, PieceKind};
///
/// let board = Board::new(10, 20);
/// let mut controller = PieceController::new();
/// controller.spawn(PieceKind::I, &board).unwrap();
///
/// for _ in 0..4 {
///     controller.try_move(MoveDirection::Left, &board).unwrap();
/// }
/// // already against the left wall
/// assert!(controller.try_move(MoveDirection::Left, &board).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PieceController {
    falling: Option<Piece>,
}

impl PieceController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<&Piece> {
        self.falling.as_ref()
    }

    /// Installs a fresh piece of `kind` at the spawn position.
    ///
    /// Fails without installing anything when the spawn position is blocked.
    pub fn spawn(&mut self, kind: PieceKind, board: &Board) -> Result<Piece, PieceCollisionError> {
        let piece = Piece::spawn(kind, board.width());
        if !is_valid_position(piece.shape(), piece.position(), board) {
            return Err(PieceCollisionError);
        }
        self.falling = Some(piece);
        Ok(piece)
    }

    /// Shifts the falling piece one cell, if the target is valid.
    pub fn try_move(&mut self, direction: MoveDirection, board: &Board) -> Result<(), CommandError> {
        let piece = self.falling.ok_or(CommandError::NoFallingPiece)?;
        self.try_set(direction.apply(&piece), board)
    }

    /// Advances the falling piece to its next rotation state at the same
    /// origin, if that is valid. No wall kick is attempted.
    pub fn try_rotate(&mut self, board: &Board) -> Result<(), CommandError> {
        let piece = self.falling.ok_or(CommandError::NoFallingPiece)?;
        self.try_set(piece.rotated(), board)
    }

    /// Removes and returns the falling piece.
    pub fn take(&mut self) -> Option<Piece> {
        self.falling.take()
    }

    pub fn clear(&mut self) {
        self.falling = None;
    }

    fn try_set(&mut self, candidate: Piece, board: &Board) -> Result<(), CommandError> {
        if !is_valid_position(candidate.shape(), candidate.position(), board) {
            return Err(PieceCollisionError.into());
        }
        self.falling = Some(candidate);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::board::Block;

    fn board() -> Board {
        Board::new(10, 20)
    }

    #[test]
    fn test_valid_position_rejects_out_of_bounds_columns() {
        let board = board();
        let shape = PieceKind::I.shape(0);

        assert!(is_valid_position(shape, PiecePosition::new(0, 0), &board));
        assert!(is_valid_position(shape, PiecePosition::new(6, 0), &board));
        assert!(!is_valid_position(shape, PiecePosition::new(-1, 0), &board));
        assert!(!is_valid_position(shape, PiecePosition::new(7, 0), &board));
    }

    #[test]
    fn test_valid_position_rejects_rows_below_board() {
        let board = board();
        let shape = PieceKind::I.shape(1);

        assert!(is_valid_position(shape, PiecePosition::new(3, 16), &board));
        assert!(!is_valid_position(shape, PiecePosition::new(3, 17), &board));
    }

    #[test]
    fn test_valid_position_accepts_rows_above_board() {
        let mut board = board();
        // settled blocks in row 0 do not matter for cells above the board
        board.fill_block_at(0, 5, Block::Piece(PieceKind::Z));
        let shape = PieceKind::I.shape(1);

        assert!(is_valid_position(shape, PiecePosition::new(5, -4), &board));
        assert!(is_valid_position(shape, PiecePosition::new(5, -100), &board));
        assert!(!is_valid_position(shape, PiecePosition::new(5, -3), &board));
    }

    #[test]
    fn test_valid_position_rejects_any_overlap() {
        let mut board = board();
        board.fill_block_at(1, 6, Block::Piece(PieceKind::O));
        let shape = PieceKind::T.shape(0);

        // T at (4, 0) occupies (5, 0), (4, 1), (5, 1), (6, 1)
        assert!(!is_valid_position(shape, PiecePosition::new(4, 0), &board));
        assert!(is_valid_position(shape, PiecePosition::new(3, 0), &board));
    }

    #[test]
    fn test_spawn_installs_piece() {
        let board = board();
        let mut controller = PieceController::new();
        assert!(controller.falling_piece().is_none());

        let piece = controller.spawn(PieceKind::O, &board).unwrap();
        assert_eq!(piece.position(), PiecePosition::new(4, 0));
        assert_eq!(controller.falling_piece(), Some(&piece));
    }

    #[test]
    fn test_spawn_fails_on_blocked_board() {
        let mut board = board();
        board.fill_block_at(0, 4, Block::Piece(PieceKind::L));
        let mut controller = PieceController::new();

        assert_eq!(
            controller.spawn(PieceKind::O, &board),
            Err(PieceCollisionError)
        );
        assert!(controller.falling_piece().is_none());
    }

    #[test]
    fn test_o_piece_falls_to_floor() {
        let board = board();
        let mut controller = PieceController::new();
        controller.spawn(PieceKind::O, &board).unwrap();

        for _ in 0..18 {
            controller.try_move(MoveDirection::Down, &board).unwrap();
        }
        assert_eq!(
            controller.try_move(MoveDirection::Down, &board),
            Err(CommandError::PieceCollision(PieceCollisionError))
        );
        assert_eq!(
            controller.falling_piece().unwrap().position(),
            PiecePosition::new(4, 18)
        );
    }

    #[test]
    fn test_rejected_rotation_keeps_state() {
        let mut board = board();
        // T rotation 1 at (4, 0) needs (4, 2)
        board.fill_block_at(2, 4, Block::Piece(PieceKind::I));
        let mut controller = PieceController::new();
        controller.spawn(PieceKind::T, &board).unwrap();
        let before = *controller.falling_piece().unwrap();

        assert!(controller.try_rotate(&board).unwrap_err().is_piece_collision());
        let after = controller.falling_piece().unwrap();
        assert_eq!(*after, before);
        assert_eq!(after.rotation(), 0);
        assert_eq!(after.shape(), PieceKind::T.shape(0));
    }

    #[test]
    fn test_rotation_against_wall_is_not_kicked() {
        let board = board();
        let mut controller = PieceController::new();
        controller.spawn(PieceKind::I, &board).unwrap();
        controller.try_rotate(&board).unwrap();
        for _ in 0..5 {
            controller.try_move(MoveDirection::Right, &board).unwrap();
        }
        // vertical I in the last column; horizontal would stick out
        assert_eq!(
            controller.falling_piece().unwrap().position(),
            PiecePosition::new(9, 0)
        );
        assert!(controller.try_rotate(&board).is_err());
        assert_eq!(controller.falling_piece().unwrap().rotation(), 1);
    }

    #[test]
    fn test_commands_without_piece() {
        let board = board();
        let mut controller = PieceController::new();
        assert_eq!(
            controller.try_move(MoveDirection::Left, &board),
            Err(CommandError::NoFallingPiece)
        );
        assert_eq!(
            controller.try_rotate(&board),
            Err(CommandError::NoFallingPiece)
        );
    }
}
