pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// A piece kind or rotation index outside the enumerated domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvalidShapeIndex {
    #[display("piece kind index out of range: {index} (expected 0..7)")]
    Kind { index: usize },
    #[display("rotation index out of range: {index} (expected 0..4)")]
    Rotation { index: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece script must contain at least one piece kind")]
pub struct EmptyScriptError;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("invalid seed: expected 32 hex digits, got {len} characters")]
    Length { len: usize },
    #[display("invalid seed: {source}")]
    Digit { source: std::num::ParseIntError },
}
