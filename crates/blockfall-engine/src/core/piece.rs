use serde::{Deserialize, Serialize};

use super::{
    BOARD_WIDTH,
    shape::{Cell, PieceKind, Rotation, cells_for},
};

/// Column of the anchor for newly spawned pieces.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const PIECE_SPAWN_X: i32 = (BOARD_WIDTH / 2 - 2) as i32;
/// Row of the anchor for newly spawned pieces.
pub const PIECE_SPAWN_Y: i32 = 0;

/// The falling piece: a kind in a rotation state, placed at an anchor.
///
/// Pieces are plain values. Movement and rotation return a new candidate
/// `Piece` which the caller validates against the board before committing.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind};
///
/// let piece = Piece::new(PieceKind::T);
/// assert_eq!(piece.cells(), [(4, 0), (3, 1), (4, 1), (5, 1)]);
///
/// let candidate = piece.shifted(1, 0, true).unwrap();
/// assert_eq!((candidate.x(), candidate.y()), (4, 0));
/// assert_eq!(candidate.rotation().as_u8(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Piece {
    kind: PieceKind,
    rotation: Rotation,
    x: i32,
    y: i32,
}

impl Piece {
    /// Creates a piece at the spawn anchor in its spawn orientation.
    #[must_use]
    pub const fn new(kind: PieceKind) -> Self {
        Self::at(kind, Rotation::SPAWN, PIECE_SPAWN_X, PIECE_SPAWN_Y)
    }

    #[must_use]
    pub const fn at(kind: PieceKind, rotation: Rotation, x: i32, y: i32) -> Self {
        Self {
            kind,
            rotation,
            x,
            y,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Absolute board cells covered by this piece.
    #[must_use]
    pub fn cells(&self) -> [Cell; 4] {
        cells_for(self.kind, self.rotation, self.x, self.y)
    }

    /// Returns the candidate piece moved by `(dx, dy)` and, if `rotate` is
    /// set, turned one step clockwise.
    ///
    /// Returns `None` if the new anchor does not fit in an `i32`.
    #[must_use]
    pub const fn shifted(&self, dx: i32, dy: i32, rotate: bool) -> Option<Self> {
        let (Some(x), Some(y)) = (self.x.checked_add(dx), self.y.checked_add(dy)) else {
            return None;
        };
        let rotation = if rotate {
            self.rotation.rotated_clockwise()
        } else {
            self.rotation
        };
        Some(Self::at(self.kind, rotation, x, y))
    }
}
