use std::fmt;

use log::debug;

use super::{BOARD_HEIGHT, BOARD_WIDTH, shape::Cell};

/// Single row of the board.
///
/// Stores one occupancy flag per column, column 0 on the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardRow {
    cells: [bool; BOARD_WIDTH],
}

impl BoardRow {
    pub const EMPTY: Self = Self {
        cells: [false; BOARD_WIDTH],
    };

    /// Checks if every column is occupied.
    #[must_use]
    pub fn is_filled(self) -> bool {
        self.cells.iter().all(|&occupied| occupied)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.cells.iter().all(|&occupied| !occupied)
    }

    #[must_use]
    pub fn is_occupied(self, x: usize) -> bool {
        self.cells[x]
    }

    #[must_use]
    pub fn cells(self) -> [bool; BOARD_WIDTH] {
        self.cells
    }

    fn occupy(&mut self, x: usize) {
        self.cells[x] = true;
    }
}

/// The occupancy grid: [`BOARD_HEIGHT`] rows of [`BOARD_WIDTH`] cells, row 0
/// on top.
///
/// The board only knows about cells. Pieces are translated to cells by the
/// caller before validation or locking. The number of rows never changes:
/// clearing rows always inserts the same number of empty rows on top.
///
/// # Example
///
/// ```
/// use blockfall_engine::Board;
///
/// let mut board = Board::EMPTY;
/// assert!(board.is_valid_placement(&[(0, -1), (0, 0), (9, 19)]));
/// assert!(!board.is_valid_placement(&[(10, 0)]));
///
/// board.lock_cells(&[(0, 19), (1, 19)]);
/// assert!(!board.is_valid_placement(&[(1, 19)]));
/// assert_eq!(board.clear_full_rows(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BoardRow; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [BoardRow::EMPTY; BOARD_HEIGHT],
    };

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = BoardRow> + '_ {
        self.rows.iter().copied()
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.rows[y].is_occupied(x)
    }

    /// Checks that every cell lies within the side walls and above the floor,
    /// and does not overlap an occupied cell.
    ///
    /// Cells above the top edge (`y < 0`) are only checked against the walls.
    #[must_use]
    pub fn is_valid_placement(&self, cells: &[Cell]) -> bool {
        cells.iter().all(|&(x, y)| {
            let Some(x) = column_index(x) else {
                return false;
            };
            match usize::try_from(y) {
                Ok(y) => y < BOARD_HEIGHT && !self.rows[y].is_occupied(x),
                Err(_) => true,
            }
        })
    }

    /// Marks the given cells as occupied.
    ///
    /// Cells outside the board, including those above the top edge, are
    /// dropped.
    pub fn lock_cells(&mut self, cells: &[Cell]) {
        for &(x, y) in cells {
            match (column_index(x), usize::try_from(y)) {
                (Some(x), Ok(y)) if y < BOARD_HEIGHT => self.rows[y].occupy(x),
                _ => debug!("dropping cell ({x}, {y}) outside the board while locking"),
            }
        }
    }

    /// Removes filled rows and returns the number of rows removed.
    ///
    /// Remaining rows keep their relative order and settle to the bottom; the
    /// same number of empty rows are inserted on top.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut count = 0;

        for y in (0..BOARD_HEIGHT).rev() {
            if self.rows[y].is_filled() {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }

        self.rows[..count].fill(BoardRow::EMPTY);
        count
    }

    /// Copies the occupancy flags into a plain grid, row 0 on top.
    #[must_use]
    pub fn to_grid(&self) -> [[bool; BOARD_WIDTH]; BOARD_HEIGHT] {
        self.rows.map(BoardRow::cells)
    }

    /// Creates a `Board` from ASCII art.
    ///
    /// '#' is an occupied cell and '.' an empty one; any other character is
    /// ignored. Rows are given top to bottom and aligned to the bottom of the
    /// board, so omitted rows on top are empty.
    ///
    /// # Panics
    ///
    /// Panics if a row does not have exactly [`BOARD_WIDTH`] cells or if there
    /// are more than [`BOARD_HEIGHT`] rows.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= BOARD_HEIGHT,
            "Board must have at most {BOARD_HEIGHT} rows, got {}",
            lines.len()
        );

        let mut board = Self::EMPTY;
        let top = BOARD_HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                chars.len(),
                BOARD_WIDTH,
                "Each row must have exactly {BOARD_WIDTH} cells, got {} at row {i}",
                chars.len(),
            );
            for (x, &ch) in chars.iter().enumerate() {
                if ch == '#' {
                    board.rows[top + i].occupy(x);
                }
            }
        }
        board
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for occupied in row.cells {
                f.write_str(if occupied { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

fn column_index(x: i32) -> Option<usize> {
    usize::try_from(x).ok().filter(|&x| x < BOARD_WIDTH)
}
