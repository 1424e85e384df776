use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::{BOARD_HEIGHT, BOARD_WIDTH, Board, Cell, Piece};

use super::{
    game_stats::GameStats,
    piece_source::{PieceSeed, PieceSource, RandomPieces},
};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum GameState {
    Active,
    GameOver,
}

/// What a call to [`Game::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickOutcome {
    /// The piece moved down one row.
    Fell,
    /// The piece locked and the next piece spawned.
    Locked { cleared_rows: usize },
    /// The piece locked and the next piece had no room to spawn.
    ToppedOut { cleared_rows: usize },
    /// The game was already over.
    Ignored,
}

/// Read-only copy of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Snapshot {
    /// Occupancy of locked cells, row 0 on top.
    pub grid: [[bool; BOARD_WIDTH]; BOARD_HEIGHT],
    /// Cells of the falling piece, possibly above the top edge.
    pub current_piece_cells: [Cell; 4],
    pub score: usize,
    pub state: GameState,
}

/// A play session: the board, the falling piece and the piece source.
///
/// Every operation either commits fully or leaves the game untouched. Once
/// the game is over, all commands are ignored.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Game, PieceSeed};
///
/// let mut game = Game::with_seed(PieceSeed::from_u128(7));
///
/// game.move_left();
/// game.rotate_clockwise();
/// while game.tick().is_fell() {}
///
/// let snapshot = game.snapshot();
/// assert_eq!(snapshot.score, 0);
/// assert!(snapshot.state.is_active());
/// ```
#[derive(Debug, Clone)]
pub struct Game<S = RandomPieces> {
    board: Board,
    piece: Piece,
    source: S,
    stats: GameStats,
    state: GameState,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Starts a game with a randomly seeded piece source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(RandomPieces::new())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_source(RandomPieces::with_seed(seed))
    }
}

impl<S> Game<S>
where
    S: PieceSource,
{
    /// Starts a game on an empty board.
    #[must_use]
    pub fn with_source(source: S) -> Self {
        Self::from_parts(Board::EMPTY, source)
    }

    /// Starts a game on a prepared board.
    ///
    /// If the first piece has no room to spawn, the game starts already over.
    #[must_use]
    pub fn from_parts(board: Board, mut source: S) -> Self {
        let piece = Piece::new(source.next_kind());
        let state = if board.is_valid_placement(&piece.cells()) {
            GameState::Active
        } else {
            info!("no room to spawn the first {} piece", piece.kind());
            GameState::GameOver
        };
        Self {
            board,
            piece,
            source,
            stats: GameStats::new(),
            state,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current_piece(&self) -> Piece {
        self.piece
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.board.to_grid(),
            current_piece_cells: self.piece.cells(),
            score: self.stats.score(),
            state: self.state,
        }
    }

    /// Moves the falling piece by `(dx, dy)`, turning it one step clockwise
    /// first if `rotate` is set.
    ///
    /// Returns `false` and leaves the piece untouched if the result would
    /// leave the board or overlap a locked cell, or if the game is over.
    /// Deltas that overflow the anchor are rejected the same way.
    pub fn attempt_move(&mut self, dx: i32, dy: i32, rotate: bool) -> bool {
        if self.state.is_game_over() {
            return false;
        }
        let Some(candidate) = self.piece.shifted(dx, dy, rotate) else {
            return false;
        };
        if !self.board.is_valid_placement(&candidate.cells()) {
            return false;
        }
        self.piece = candidate;
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.attempt_move(-1, 0, false)
    }

    pub fn move_right(&mut self) -> bool {
        self.attempt_move(1, 0, false)
    }

    pub fn soft_drop(&mut self) -> bool {
        self.attempt_move(0, 1, false)
    }

    pub fn rotate_clockwise(&mut self) -> bool {
        self.attempt_move(0, 0, true)
    }

    /// Advances the game by one gravity step.
    ///
    /// The piece falls one row if it can. Otherwise it is locked, full rows
    /// are cleared and scored, and the next piece spawns; if the new piece
    /// has no room, the game is over.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.is_game_over() {
            return TickOutcome::Ignored;
        }
        if self.soft_drop() {
            return TickOutcome::Fell;
        }
        self.lock_piece()
    }

    fn lock_piece(&mut self) -> TickOutcome {
        self.board.lock_cells(&self.piece.cells());
        let cleared_rows = self.board.clear_full_rows();
        self.stats.complete_piece_drop(cleared_rows);
        debug!(
            "locked {} piece at ({}, {}), cleared {cleared_rows} rows",
            self.piece.kind(),
            self.piece.x(),
            self.piece.y(),
        );

        self.piece = Piece::new(self.source.next_kind());
        if !self.board.is_valid_placement(&self.piece.cells()) {
            self.state = GameState::GameOver;
            info!(
                "game over: no room to spawn {} piece (score {}, {} pieces)",
                self.piece.kind(),
                self.stats.score(),
                self.stats.completed_pieces(),
            );
            return TickOutcome::ToppedOut { cleared_rows };
        }
        TickOutcome::Locked { cleared_rows }
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{PieceKind, Rotation, ScriptedPieces};

    fn scripted(kinds: &[PieceKind]) -> ScriptedPieces {
        ScriptedPieces::new(kinds.iter().copied()).unwrap()
    }

    fn occupied_count(board: &Board) -> usize {
        board
            .rows()
            .map(|row| row.cells().iter().filter(|&&c| c).count())
            .sum()
    }

    #[test]
    fn test_new_game() {
        let game = Game::with_source(scripted(&[PieceKind::T]));
        assert!(game.state().is_active());
        assert_eq!(game.board(), &Board::EMPTY);
        assert_eq!(game.current_piece(), Piece::new(PieceKind::T));
        assert_eq!(game.score(), 0);

        let snapshot = game.snapshot();
        assert_eq!(snapshot.grid, [[false; BOARD_WIDTH]; BOARD_HEIGHT]);
        assert_eq!(
            snapshot.current_piece_cells,
            [(4, 0), (3, 1), (4, 1), (5, 1)]
        );
    }

    #[test]
    fn test_move_bindings() {
        let mut game = Game::with_source(scripted(&[PieceKind::O]));
        assert!(game.move_left());
        assert_eq!(game.current_piece().x(), 2);
        assert!(game.move_right());
        assert!(game.move_right());
        assert_eq!(game.current_piece().x(), 4);
        assert!(game.soft_drop());
        assert_eq!(game.current_piece().y(), 1);
        assert!(game.rotate_clockwise());
        assert_eq!(game.current_piece().rotation().as_u8(), 1);
        assert_eq!(game.current_piece().x(), 4);
    }

    #[test]
    fn test_move_stops_at_wall() {
        // O occupies local columns 1 and 2, so the anchor can reach x = -1.
        let mut game = Game::with_source(scripted(&[PieceKind::O]));
        let mut moves = 0;
        while game.move_left() {
            moves += 1;
        }
        assert_eq!(moves, 4);
        assert_eq!(game.current_piece().x(), -1);
        assert!(game.board().is_valid_placement(&game.current_piece().cells()));

        let before = game.current_piece();
        assert!(!game.move_left());
        assert_eq!(game.current_piece(), before);
    }

    #[test]
    fn test_overflowing_delta_is_rejected() {
        let mut game = Game::with_source(scripted(&[PieceKind::T]));
        let before = game.current_piece();
        assert!(!game.attempt_move(i32::MAX, 0, false));
        assert!(!game.attempt_move(0, i32::MAX, true));
        assert!(!game.attempt_move(i32::MIN, 0, false));
        assert_eq!(game.current_piece(), before);

        // Far above the top edge is still a legal placement, but going any
        // higher would overflow.
        assert!(game.attempt_move(0, i32::MIN, false));
        let above = game.current_piece();
        assert!(!game.attempt_move(0, -1, false));
        assert_eq!(game.current_piece(), above);
        assert!(game.tick().is_fell());
    }

    #[test]
    fn test_rejected_rotation_leaves_piece_unchanged() {
        // A vertical I against the right wall cannot turn back to horizontal.
        let mut game = Game::with_source(scripted(&[PieceKind::I]));
        assert!(game.rotate_clockwise());
        while game.move_right() {}
        let before = game.current_piece();
        assert_eq!(before.cells().map(|(x, _)| x), [9; 4]);

        assert!(!game.rotate_clockwise());
        assert_eq!(game.current_piece(), before);
    }

    #[test]
    fn test_rotation_above_top_edge_is_allowed() {
        let mut game = Game::with_source(scripted(&[PieceKind::I]));
        assert!(game.attempt_move(0, -1, false));
        assert_eq!(game.current_piece().y(), -1);
        assert!(game.rotate_clockwise());
        assert!(game.current_piece().cells().iter().any(|&(_, y)| y < 0));
    }

    #[test]
    fn test_attempt_move_invariants_under_random_commands() {
        let mut game = Game::with_seed(PieceSeed::from_u128(2024));
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..5000 {
            if game.is_game_over() {
                break;
            }
            let before = game.current_piece();
            let (dx, dy, rotate) = match rng.random_range(0..5) {
                0 => (-1, 0, false),
                1 => (1, 0, false),
                2 => (0, 1, false),
                3 => (0, 0, true),
                _ => {
                    game.tick();
                    continue;
                }
            };
            if game.attempt_move(dx, dy, rotate) {
                assert!(game.board().is_valid_placement(&game.current_piece().cells()));
            } else {
                assert_eq!(game.current_piece(), before);
            }
        }
    }

    #[test]
    fn test_tick_drops_straight_down_until_lock() {
        let mut game = Game::with_source(scripted(&[PieceKind::T, PieceKind::O]));
        let start_x = game.current_piece().x();

        // T spans two rows, so its anchor settles on row 18.
        for y in 1..=18 {
            assert_eq!(game.tick(), TickOutcome::Fell);
            assert_eq!(game.current_piece().y(), y);
            assert_eq!(game.current_piece().x(), start_x);
        }
        assert_eq!(game.tick(), TickOutcome::Locked { cleared_rows: 0 });

        assert_eq!(game.score(), 0);
        assert_eq!(game.stats().completed_pieces(), 1);
        assert_eq!(occupied_count(game.board()), 4);
        assert!(game.board().is_occupied(4, 18));
        assert!(game.board().is_occupied(3, 19));
        assert!(game.board().is_occupied(4, 19));
        assert!(game.board().is_occupied(5, 19));
        assert_eq!(game.board().rows().count(), Board::HEIGHT);
        assert!(
            game.board()
                .rows()
                .all(|row| row.cells().len() == Board::WIDTH)
        );

        assert_eq!(game.current_piece(), Piece::new(PieceKind::O));
    }

    #[test]
    fn test_t_piece_lock_without_moving_scores_nothing() {
        let mut game = Game::with_source(scripted(&[PieceKind::T]));
        assert_eq!(game.current_piece().rotation(), Rotation::SPAWN);
        let outcome = loop {
            let outcome = game.tick();
            if !outcome.is_fell() {
                break outcome;
            }
        };
        assert_eq!(outcome, TickOutcome::Locked { cleared_rows: 0 });
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_filling_single_gap_clears_row() {
        let board = Board::from_ascii(
            r"
            #####.####
            ",
        );
        let mut game = Game::from_parts(board, scripted(&[PieceKind::I, PieceKind::O]));
        // Vertical I occupies local column 2, landing in board column 5.
        assert!(game.rotate_clockwise());
        assert_eq!(game.current_piece().cells().map(|(x, _)| x), [5; 4]);

        let outcome = loop {
            let outcome = game.tick();
            if !outcome.is_fell() {
                break outcome;
            }
        };
        assert_eq!(outcome, TickOutcome::Locked { cleared_rows: 1 });
        assert_eq!(game.score(), 1);
        assert_eq!(game.stats().line_cleared_counter(), &[0, 1, 0, 0, 0]);

        let expected = Board::from_ascii(
            r"
            .....#....
            .....#....
            .....#....
            ",
        );
        assert_eq!(game.board(), &expected);
    }

    #[test]
    fn test_spawn_collision_ends_game() {
        // Rows 2..20 leave room for only one piece at the top.
        let board = Board::from_ascii(&"#########.\n".repeat(BOARD_HEIGHT - 2));
        let mut game = Game::from_parts(board, scripted(&[PieceKind::O, PieceKind::T]));
        assert!(game.state().is_active());

        assert_eq!(game.tick(), TickOutcome::ToppedOut { cleared_rows: 0 });
        assert!(game.is_game_over());
        assert_eq!(game.current_piece().kind(), PieceKind::T);

        let snapshot = game.snapshot();
        let piece = game.current_piece();
        assert!(!game.move_left());
        assert!(!game.move_right());
        assert!(!game.soft_drop());
        assert!(!game.rotate_clockwise());
        assert!(!game.attempt_move(0, -1, false));
        assert_eq!(game.tick(), TickOutcome::Ignored);
        assert_eq!(game.tick(), TickOutcome::Ignored);

        assert_eq!(game.snapshot(), snapshot);
        assert_eq!(game.current_piece(), piece);
        assert_eq!(game.stats().completed_pieces(), 1);
        assert_eq!(snapshot.state, GameState::GameOver);
    }

    #[test]
    fn test_occupied_spawn_starts_game_over() {
        let board = Board::from_ascii(&"#########.\n".repeat(BOARD_HEIGHT));
        let mut game = Game::from_parts(board.clone(), scripted(&[PieceKind::J]));
        assert!(game.is_game_over());
        assert_eq!(game.tick(), TickOutcome::Ignored);
        assert_eq!(game.board(), &board);
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let seed = PieceSeed::from_u128(0xdead_beef);
        let mut a = Game::with_seed(seed);
        let mut b = Game::with_seed(seed);
        assert_eq!(a.source().seed(), seed);
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..2000 {
            match rng.random_range(0..4) {
                0 => assert_eq!(a.move_left(), b.move_left()),
                1 => assert_eq!(a.move_right(), b.move_right()),
                2 => assert_eq!(a.rotate_clockwise(), b.rotate_clockwise()),
                _ => assert_eq!(a.tick(), b.tick()),
            }
            assert_eq!(a.snapshot(), b.snapshot());
        }
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn test_board_dimensions_survive_long_games() {
        let mut game = Game::with_seed(PieceSeed::from_u128(3));
        let mut ticks = 0;
        while !game.is_game_over() && ticks < 10_000 {
            game.tick();
            ticks += 1;
            let snapshot = game.snapshot();
            assert_eq!(snapshot.grid.len(), BOARD_HEIGHT);
            assert!(snapshot.grid.iter().all(|row| row.len() == BOARD_WIDTH));
        }
        // Without lateral moves every piece stacks in the centre columns.
        assert!(game.is_game_over());
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_snapshot_serialization() {
        let game = Game::with_source(scripted(&[PieceKind::Z]));
        let snapshot = game.snapshot();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["score"], 0);
        assert_eq!(json["state"], "Active");
        assert_eq!(json["grid"].as_array().unwrap().len(), BOARD_HEIGHT);

        let parsed: Snapshot = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
