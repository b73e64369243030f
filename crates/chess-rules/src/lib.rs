//! Chess rules on a bitboard position.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square sets
//! - [`Position`] - board snapshot: pieces, side to move, castling rights, en passant
//! - [`movegen`] - pseudo-legal move generation and attack queries
//! - [`legal`] - the legality filter plus check, checkmate and stalemate
//! - [`san`] - SAN notation parsing and generation
//! - [`diff`] - recovering a move from two placements
//! - [`Game`] - a position with its move history and movetext
//!
//! # Architecture
//!
//! Positions keep one bitboard per piece type and one per color. Cloning a
//! position is cheap, so the legality filter plays every candidate on a
//! throwaway copy and looks at the mover's king afterwards.
//!
//! # Example
//!
//! ```
//! use chess_rules::{legal_moves, Game, Position};
//!
//! let position = Position::startpos();
//! println!("Legal moves from starting position: {}", legal_moves(&position).len());
//!
//! let mut game = Game::new();
//! game.play_san("e4").unwrap();
//! game.play_san("e5").unwrap();
//! assert_eq!(game.movetext(), "1.e4 e5");
//! println!("Position after 1.e4 e5: {}", game.to_fen());
//! ```

mod bitboard;
pub mod diff;
mod game;
pub mod legal;
pub mod movegen;
mod position;
pub mod san;

pub use bitboard::Bitboard;
pub use diff::{move_between, move_between_fens};
pub use game::{Game, GameError, MoveRecommender, MoveRecord, PieceInfo};
pub use legal::{
    is_check, is_checkmate, is_legal, is_stalemate, legal_moves, legal_moves_from, status,
    Status,
};
pub use movegen::perft::perft;
pub use movegen::{attacked_by, attacks_from, is_square_attacked, pseudo_legal_moves, MoveList};
pub use position::{AppliedMove, CastlingRights, MoveError, Position, SideRights};
pub use san::{move_to_san, san_to_move, SanError};
