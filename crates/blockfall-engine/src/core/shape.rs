use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

use crate::InvalidShapeIndex;

/// A board coordinate `(x, y)`.
///
/// `x` grows rightward and `y` grows downward from the top-left corner of the
/// board. `y` may be negative for cells above the visible area.
pub type Cell = (i32, i32);

/// Enum representing the type of piece.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display,
)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// J-piece.
    J = 1,
    /// L-piece.
    L = 2,
    /// O-piece.
    O = 3,
    /// S-piece.
    S = 4,
    /// T-piece.
    T = 5,
    /// Z-piece.
    Z = 6,
}

/// Uniform choice over the seven kinds.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl TryFrom<u8> for PieceKind {
    type Error = InvalidShapeIndex;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(usize::from(value))
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds in table order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Looks up a kind by its table index.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::{InvalidShapeIndex, PieceKind};
    ///
    /// assert_eq!(PieceKind::from_index(5), Ok(PieceKind::T));
    /// assert_eq!(
    ///     PieceKind::from_index(7),
    ///     Err(InvalidShapeIndex::Kind { index: 7 })
    /// );
    /// ```
    pub fn from_index(index: usize) -> Result<Self, InvalidShapeIndex> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(InvalidShapeIndex::Kind { index })
    }

    /// Returns the single character representation of this piece kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single uppercase character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Returns the four cell offsets of this kind in the given rotation.
    #[must_use]
    pub fn offsets(self, rotation: Rotation) -> &'static [Cell; 4] {
        &SHAPE_TABLE[self as usize][rotation.as_usize()]
    }
}

/// Rotation state of a piece.
///
/// Represents one of four rotation states, `0` being the spawn orientation and
/// each step turning 90° clockwise. Rotation arithmetic wraps modulo 4.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rotation(u8);

impl TryFrom<u8> for Rotation {
    type Error = InvalidShapeIndex;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        if index < 4 {
            Ok(Self(index))
        } else {
            Err(InvalidShapeIndex::Rotation { index })
        }
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> Self {
        rotation.0
    }
}

impl Rotation {
    /// The spawn orientation.
    pub const SPAWN: Self = Self(0);

    /// Creates a rotation from any index, reduced modulo 4.
    #[must_use]
    pub const fn wrapping(index: u8) -> Self {
        Self(index % 4)
    }

    #[must_use]
    pub const fn rotated_clockwise(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Translates a kind in a rotation state to absolute board coordinates.
///
/// Coordinates saturate at `i32::MAX`, which is always off the board.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceKind, Rotation, cells_for};
///
/// let cells = cells_for(PieceKind::O, Rotation::SPAWN, 3, 0);
/// assert_eq!(cells, [(4, 0), (5, 0), (4, 1), (5, 1)]);
/// ```
#[must_use]
pub fn cells_for(kind: PieceKind, rotation: Rotation, anchor_x: i32, anchor_y: i32) -> [Cell; 4] {
    (*kind.offsets(rotation))
        .map(|(dx, dy)| (anchor_x.saturating_add(dx), anchor_y.saturating_add(dy)))
}

// Offsets live in a 4×4 local frame, row 0 on top. The O-piece repeats the
// same state four times.
static SHAPE_TABLE: [[[Cell; 4]; 4]; PieceKind::LEN] = [
    // I-piece
    [
        [(0, 1), (1, 1), (2, 1), (3, 1)],
        [(2, 0), (2, 1), (2, 2), (2, 3)],
        [(0, 2), (1, 2), (2, 2), (3, 2)],
        [(1, 0), (1, 1), (1, 2), (1, 3)],
    ],
    // J-piece
    [
        [(0, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (1, 1), (0, 2), (1, 2)],
    ],
    // L-piece
    [
        [(2, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (1, 1), (2, 1), (0, 2)],
        [(0, 0), (1, 0), (1, 1), (1, 2)],
    ],
    // O-piece
    [
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
    ],
    // S-piece
    [
        [(1, 1), (2, 1), (0, 2), (1, 2)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
        [(1, 1), (2, 1), (0, 2), (1, 2)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
    ],
    // T-piece
    [
        [(1, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (1, 2)],
        [(1, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // Z-piece
    [
        [(0, 1), (1, 1), (1, 2), (2, 2)],
        [(2, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (1, 2), (2, 2)],
        [(2, 0), (1, 1), (2, 1), (1, 2)],
    ],
];
