//! Pseudo-legal move generation.
//!
//! Every move produced here follows the moving piece's geometry but may
//! still leave its own king attacked; [`crate::legal`] filters those out.

mod attacks;
pub mod perft;

use crate::{Bitboard, Position};
use chess_core::{CastleRule, CastleSide, Color, Move, MoveFlag, Piece, Rank, Square};

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
    slider_attacks, BISHOP_DIRECTIONS, ROOK_DIRECTIONS,
};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of moves in any chess position.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn contains(&self, m: Move) -> bool {
        self.as_slice().contains(&m)
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates the pseudo-legal moves of the side to move.
pub fn pseudo_legal_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    for from in position.occupancy(position.side_to_move) {
        piece_moves(position, from, &mut moves);
    }
    moves
}

/// Appends the pseudo-legal moves of the piece on `from`, for whichever
/// color owns it. Castle candidates are included when the rights, the
/// home squares and the empty squares allow it; attacked squares are the
/// legality filter's business.
pub fn piece_moves(position: &Position, from: Square, moves: &mut MoveList) {
    let Some((piece, color)) = position.piece_at(from) else {
        return;
    };
    let own = position.occupancy(color);

    match piece {
        Piece::Pawn => pawn_moves(position, from, color, moves),
        Piece::King => {
            push_targets(from, attacks_of(position, from, piece, color) & !own, moves);
            castle_moves(position, color, moves);
        }
        _ => push_targets(from, attacks_of(position, from, piece, color) & !own, moves),
    }
}

/// Squares attacked by the piece on `sq`, own pieces included (they are
/// defended). Pawns attack diagonally only. Empty squares attack nothing.
pub fn attacks_from(position: &Position, sq: Square) -> Bitboard {
    position
        .piece_at(sq)
        .map_or(Bitboard::EMPTY, |(piece, color)| {
            attacks_of(position, sq, piece, color)
        })
}

fn attacks_of(position: &Position, sq: Square, piece: Piece, color: Color) -> Bitboard {
    let occupied = position.occupied();
    match piece {
        Piece::Pawn => pawn_attacks(sq, color),
        Piece::Knight => knight_attacks(sq),
        Piece::Bishop => bishop_attacks(sq, occupied),
        Piece::Rook => rook_attacks(sq, occupied),
        Piece::Queen => queen_attacks(sq, occupied),
        Piece::King => king_attacks(sq),
    }
}

/// Squares attacked by every piece of `color`.
pub fn attacked_by(position: &Position, color: Color) -> Bitboard {
    position
        .occupancy(color)
        .into_iter()
        .fold(Bitboard::EMPTY, |acc, sq| acc | attacks_from(position, sq))
}

/// Returns true if any piece of color `by` attacks `sq`.
///
/// Looks outward from the target square with each piece's pattern instead
/// of generating the attacker's moves, so it never recurses into the
/// legality filter.
pub fn is_square_attacked(position: &Position, sq: Square, by: Color) -> bool {
    let occupied = position.occupied();
    let queens = position.pieces_of(Piece::Queen, by);

    (pawn_attacks(sq, by.opposite()) & position.pieces_of(Piece::Pawn, by)).is_not_empty()
        || (knight_attacks(sq) & position.pieces_of(Piece::Knight, by)).is_not_empty()
        || (king_attacks(sq) & position.pieces_of(Piece::King, by)).is_not_empty()
        || (bishop_attacks(sq, occupied) & (position.pieces_of(Piece::Bishop, by) | queens))
            .is_not_empty()
        || (rook_attacks(sq, occupied) & (position.pieces_of(Piece::Rook, by) | queens))
            .is_not_empty()
}

/// Returns true if the king of `color` is attacked.
pub fn is_king_attacked(position: &Position, color: Color) -> bool {
    position
        .king_square(color)
        .is_some_and(|sq| is_square_attacked(position, sq, color.opposite()))
}

fn push_targets(from: Square, targets: Bitboard, moves: &mut MoveList) {
    for to in targets {
        moves.push(Move::normal(from, to));
    }
}

fn pawn_moves(position: &Position, from: Square, color: Color, moves: &mut MoveList) {
    let occupied = position.occupied();
    let enemies = position.occupancy(color.opposite());
    let start_rank = match color {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    };
    let forward = color.pawn_direction();

    if let Some(one) = from.offset(0, forward).filter(|sq| !occupied.contains(*sq)) {
        push_pawn_move(from, one, color, moves);
        if from.rank() == start_rank {
            if let Some(two) = one.offset(0, forward).filter(|sq| !occupied.contains(*sq)) {
                moves.push(Move::new(from, two, MoveFlag::DoublePush));
            }
        }
    }

    for to in pawn_attacks(from, color) {
        if enemies.contains(to) {
            push_pawn_move(from, to, color, moves);
        } else if position.en_passant == Some(to) && position.side_to_move == color {
            moves.push(Move::new(from, to, MoveFlag::EnPassant));
        }
    }
}

fn push_pawn_move(from: Square, to: Square, color: Color, moves: &mut MoveList) {
    if Bitboard::promotion_rank(color).contains(to) {
        for piece in Piece::PROMOTIONS {
            if let Some(flag) = MoveFlag::promote_to(piece) {
                moves.push(Move::new(from, to, flag));
            }
        }
    } else {
        moves.push(Move::normal(from, to));
    }
}

fn castle_moves(position: &Position, color: Color, moves: &mut MoveList) {
    let occupied = position.occupied();
    for side in CastleSide::ALL {
        let rule = CastleRule::get(color, side);
        let ready = position.castling.can_castle(color, side)
            && position.king_square(color) == Some(rule.king_from)
            && position.piece_at(rule.rook_from) == Some((Piece::Rook, color))
            && rule.empty.iter().all(|sq| !occupied.contains(*sq));
        if ready {
            let flag = match side {
                CastleSide::Short => MoveFlag::CastleKingside,
                CastleSide::Long => MoveFlag::CastleQueenside,
            };
            moves.push(Move::new(rule.king_from, rule.king_to, flag));
        }
    }
}
