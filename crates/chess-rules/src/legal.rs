//! Legality filter and game-state queries.
//!
//! A pseudo-legal move is legal when playing it on a copy of the position
//! leaves the mover's king unattacked. Castles additionally require the
//! king's path to be safe before the move.

use chess_core::{CastleRule, Color, Move, Piece, Square};

use crate::movegen::{
    is_king_attacked, is_square_attacked, piece_moves, pseudo_legal_moves, MoveList,
};
use crate::Position;

/// Outcome of the position for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
}

impl Status {
    /// True for checkmate and stalemate.
    pub const fn is_over(self) -> bool {
        matches!(self, Status::Checkmate | Status::Stalemate)
    }
}

/// Returns true if `m` is legal for the side to move, assuming it is one of
/// the position's pseudo-legal moves.
pub fn is_legal(position: &Position, m: Move) -> bool {
    let us = position.side_to_move;
    if let Some(side) = m.flag().castle_side() {
        let rule = CastleRule::get(us, side);
        if rule
            .safe
            .iter()
            .any(|sq| is_square_attacked(position, *sq, us.opposite()))
        {
            return false;
        }
    }
    position
        .play(m)
        .is_ok_and(|next| !is_king_attacked(&next, us))
}

/// Generates all legal moves for the side to move.
pub fn legal_moves(position: &Position) -> MoveList {
    let mut moves = pseudo_legal_moves(position);
    moves.retain(|m| is_legal(position, *m));
    moves
}

/// Legal moves of the piece on `from`. Empty when the square is empty or
/// holds a piece of the side not to move.
pub fn legal_moves_from(position: &Position, from: Square) -> MoveList {
    let mut moves = MoveList::new();
    if position
        .piece_at(from)
        .is_some_and(|(_, color)| color == position.side_to_move)
    {
        piece_moves(position, from, &mut moves);
        moves.retain(|m| is_legal(position, *m));
    }
    moves
}

/// True if the side to move's king is attacked.
pub fn is_check(position: &Position) -> bool {
    is_king_attacked(position, position.side_to_move)
}

pub fn is_checkmate(position: &Position) -> bool {
    is_check(position) && legal_moves(position).is_empty()
}

pub fn is_stalemate(position: &Position) -> bool {
    !is_check(position) && legal_moves(position).is_empty()
}

pub fn status(position: &Position) -> Status {
    match (is_check(position), legal_moves(position).is_empty()) {
        (true, true) => Status::Checkmate,
        (true, false) => Status::Check,
        (false, true) => Status::Stalemate,
        (false, false) => Status::Ongoing,
    }
}

impl Position {
    /// Reports whether the position could arise in play as far as a random
    /// placement goes: one king per color and the side not to move is not
    /// in check.
    pub fn is_valid(&self) -> bool {
        Color::ALL
            .into_iter()
            .all(|color| self.pieces_of(Piece::King, color).count() == 1)
            && !is_king_attacked(self, self.side_to_move.opposite())
    }
}
