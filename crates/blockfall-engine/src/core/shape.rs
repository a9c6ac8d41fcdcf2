use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Enum representing the type of piece.
///
/// The tag never changes after a piece spawns. Settled board cells remember it
/// for rendering purposes only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display,
)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

/// Uniform, independent draw over all seven kinds. Repeats are possible.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds in catalog order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns every rotation state of this kind, in rotation order.
    #[must_use]
    pub const fn rotations(self) -> &'static [Shape] {
        match self {
            PieceKind::I => &I_SHAPES,
            PieceKind::O => &O_SHAPES,
            PieceKind::T => &T_SHAPES,
            PieceKind::S => &S_SHAPES,
            PieceKind::Z => &Z_SHAPES,
            PieceKind::J => &J_SHAPES,
            PieceKind::L => &L_SHAPES,
        }
    }

    /// Number of distinct rotation states (I=2, O=1, T=4, S=2, Z=2, J=4, L=4).
    #[must_use]
    pub const fn rotation_count(self) -> usize {
        self.rotations().len()
    }

    /// Returns the shape grid for a rotation index.
    ///
    /// The index wraps around modulo [`Self::rotation_count`], so any value is
    /// accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.shape(0), PieceKind::I.shape(2));
    /// assert_eq!(PieceKind::T.shape(1).width(), 2);
    /// assert_eq!(PieceKind::T.shape(1).height(), 3);
    /// ```
    #[must_use]
    pub fn shape(self, rotation: usize) -> &'static Shape {
        let rotations = self.rotations();
        &rotations[rotation % rotations.len()]
    }

    /// Normalizes a signed rotation index into `0..rotation_count()`.
    ///
    /// Negative values count backwards, so `-1` is the last rotation state.
    #[must_use]
    pub fn wrap_rotation(self, rotation: isize) -> usize {
        // rotation_count is at most 4
        #[expect(clippy::cast_possible_wrap)]
        let count = self.rotation_count() as isize;
        rotation.rem_euclid(count).unsigned_abs()
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('L'), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

/// Boolean grid of a single rotation state, stored row-major.
///
/// The grid is the tight bounding box of the piece: a horizontal I is 4×1,
/// a vertical I is 1×4, and the remaining kinds are 2×2, 3×2 or 2×3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    width: usize,
    height: usize,
    cells: [[bool; Shape::MAX_SIZE]; Shape::MAX_SIZE],
}

impl Shape {
    /// Largest extent of any shape in either direction.
    pub const MAX_SIZE: usize = 4;

    const fn from_rows<const W: usize, const H: usize>(rows: [[u8; W]; H]) -> Self {
        assert!(W <= Self::MAX_SIZE && H <= Self::MAX_SIZE);
        let mut cells = [[false; Self::MAX_SIZE]; Self::MAX_SIZE];
        let mut y = 0;
        while y < H {
            let mut x = 0;
            while x < W {
                cells[y][x] = rows[y][x] != 0;
                x += 1;
            }
            y += 1;
        }
        Self {
            width: W,
            height: H,
            cells,
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns whether the cell at column `x`, row `y` is occupied.
    ///
    /// Coordinates outside the grid are unoccupied.
    #[must_use]
    pub const fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y][x]
    }

    /// Iterates the `(x, y)` offsets of occupied cells, row by row.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, &cell)| cell.then_some((x, y)))
        })
    }

    /// Iterates the grid rows, each `width` cells long.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells[..self.height]
            .iter()
            .map(|row| &row[..self.width])
    }
}

const I_SHAPES: [Shape; 2] = [
    Shape::from_rows([[1, 1, 1, 1]]),
    Shape::from_rows([[1], [1], [1], [1]]),
];

const O_SHAPES: [Shape; 1] = [Shape::from_rows([[1, 1], [1, 1]])];

const T_SHAPES: [Shape; 4] = [
    Shape::from_rows([[0, 1, 0], [1, 1, 1]]),
    Shape::from_rows([[1, 0], [1, 1], [1, 0]]),
    Shape::from_rows([[1, 1, 1], [0, 1, 0]]),
    Shape::from_rows([[0, 1], [1, 1], [0, 1]]),
];

const S_SHAPES: [Shape; 2] = [
    Shape::from_rows([[0, 1, 1], [1, 1, 0]]),
    Shape::from_rows([[1, 0], [1, 1], [0, 1]]),
];

const Z_SHAPES: [Shape; 2] = [
    Shape::from_rows([[1, 1, 0], [0, 1, 1]]),
    Shape::from_rows([[0, 1], [1, 1], [1, 0]]),
];

const J_SHAPES: [Shape; 4] = [
    Shape::from_rows([[1, 0, 0], [1, 1, 1]]),
    Shape::from_rows([[1, 1], [1, 0], [1, 0]]),
    Shape::from_rows([[1, 1, 1], [0, 0, 1]]),
    Shape::from_rows([[0, 1], [0, 1], [1, 1]]),
];

const L_SHAPES: [Shape; 4] = [
    Shape::from_rows([[0, 0, 1], [1, 1, 1]]),
    Shape::from_rows([[1, 0], [1, 0], [1, 1]]),
    Shape::from_rows([[1, 1, 1], [1, 0, 0]]),
    Shape::from_rows([[1, 1], [0, 1], [0, 1]]),
];

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_rotation_counts() {
        let expected = [
            (PieceKind::I, 2),
            (PieceKind::O, 1),
            (PieceKind::T, 4),
            (PieceKind::S, 2),
            (PieceKind::Z, 2),
            (PieceKind::J, 4),
            (PieceKind::L, 4),
        ];
        for (kind, count) in expected {
            assert_eq!(kind.rotation_count(), count, "{kind}");
        }
    }

    #[test]
    fn test_every_shape_has_four_cells() {
        for kind in PieceKind::ALL {
            for (rotation, shape) in kind.rotations().iter().enumerate() {
                assert_eq!(
                    shape.occupied_cells().count(),
                    4,
                    "{kind} rotation {rotation} should occupy 4 cells"
                );
            }
        }
    }

    #[test]
    fn test_shape_wraps_around() {
        for kind in PieceKind::ALL {
            let count = kind.rotation_count();
            for rotation in 0..40 {
                assert_eq!(kind.shape(rotation), kind.shape(rotation % count));
            }
        }
    }

    #[test]
    fn test_wrap_rotation_handles_negative_indices() {
        for kind in PieceKind::ALL {
            let count = kind.rotation_count();
            assert_eq!(kind.wrap_rotation(-1), count - 1);
            for rotation in -20..20 {
                let wrapped = kind.wrap_rotation(rotation);
                assert!(wrapped < count);
                let expected = usize::try_from(rotation.rem_euclid(4 * 3)).unwrap() % count;
                assert_eq!(kind.shape(wrapped), kind.shape(expected));
            }
        }
    }

    #[test]
    fn test_t_piece_spawn_shape() {
        let shape = PieceKind::T.shape(0);
        assert_eq!((shape.width(), shape.height()), (3, 2));
        let cells: Vec<_> = shape.occupied_cells().collect();
        assert_eq!(cells, [(1, 0), (0, 1), (1, 1), (2, 1)]);
        assert!(!shape.is_occupied(0, 0));
        assert!(!shape.is_occupied(3, 1));
        assert!(!shape.is_occupied(1, 2));
    }

    #[test]
    fn test_i_piece_orientations() {
        let horizontal = PieceKind::I.shape(0);
        let vertical = PieceKind::I.shape(1);
        assert_eq!((horizontal.width(), horizontal.height()), (4, 1));
        assert_eq!((vertical.width(), vertical.height()), (1, 4));
        assert!(vertical.rows().all(|row| row == [true]));
    }

    #[test]
    fn test_s_and_z_are_mirrors() {
        for rotation in 0..2 {
            let s = PieceKind::S.shape(rotation);
            let z = PieceKind::Z.shape(rotation);
            for y in 0..s.height() {
                for x in 0..s.width() {
                    assert_eq!(s.is_occupied(x, y), z.is_occupied(s.width() - 1 - x, y));
                }
            }
        }
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
            assert_eq!(kind.to_string(), kind.as_char().to_string());
        }
        assert_eq!(PieceKind::from_char('X'), None);
        assert_eq!(PieceKind::from_char('i'), None);
    }

    #[test]
    fn test_random_kinds_cover_all_types() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; PieceKind::LEN];
        for _ in 0..500 {
            let kind: PieceKind = rng.random();
            seen[kind as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
