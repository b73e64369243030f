//! Core types for chess.
//!
//! This crate provides the fundamental types shared by the rules engine and
//! the evaluators:
//! - [`Piece`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] for move representation
//! - [`CastleRule`], the static castle rule table
//! - FEN field parsing and placement encoding

mod castle;
mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use castle::{CastleError, CastleRule, CastleSide};
pub use color::Color;
pub use fen::{parse_placement, placement_to_fen, FenError, FenParser, Placement};
pub use mov::{Move, MoveFlag};
pub use piece::Piece;
pub use square::{File, Rank, Square, SquareError};
