//! Game engine logic and state management.
//!
//! This module drives the core data structures through a play session:
//!
//! - [`Game`] - Board, falling piece and piece source, with the player commands
//! - [`GameStats`] - Score and lock counters
//! - [`PieceSource`] - Where new pieces come from ([`RandomPieces`], [`ScriptedPieces`])
//! - [`PieceSeed`] - Seed for deterministic piece generation
//!
//! # Game Flow
//!
//! 1. Create a [`Game`], optionally with a [`PieceSeed`] or a custom source
//! 2. The player moves and rotates the falling piece
//! 3. The driver calls [`Game::tick`] on a fixed cadence; a piece that cannot
//!    fall further is locked, full rows are cleared and scored, and the next
//!    piece spawns
//! 4. Repeat until a new piece has no room to spawn
//!
//! The engine never waits or keeps time itself: reading input and scheduling
//! ticks is up to the driver.

pub use self::{game::*, game_stats::*, piece_source::*};

mod game;
mod game_stats;
mod piece_source;
