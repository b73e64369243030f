//! Move representation.

use crate::{CastleSide, Piece, Square};
use std::fmt;

/// Flags for special move types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    /// Normal move or capture.
    Normal = 0,
    /// Pawn advance of two squares from its starting rank.
    DoublePush = 1,
    /// Kingside castling (O-O).
    CastleKingside = 2,
    /// Queenside castling (O-O-O).
    CastleQueenside = 3,
    /// En passant capture.
    EnPassant = 4,
    PromoteKnight = 5,
    PromoteBishop = 6,
    PromoteRook = 7,
    PromoteQueen = 8,
}

impl MoveFlag {
    const BY_CODE: [MoveFlag; 9] = [
        MoveFlag::Normal,
        MoveFlag::DoublePush,
        MoveFlag::CastleKingside,
        MoveFlag::CastleQueenside,
        MoveFlag::EnPassant,
        MoveFlag::PromoteKnight,
        MoveFlag::PromoteBishop,
        MoveFlag::PromoteRook,
        MoveFlag::PromoteQueen,
    ];

    /// Returns the flag promoting to `piece`, if it is a promotion target.
    #[inline]
    pub const fn promote_to(piece: Piece) -> Option<Self> {
        match piece {
            Piece::Knight => Some(MoveFlag::PromoteKnight),
            Piece::Bishop => Some(MoveFlag::PromoteBishop),
            Piece::Rook => Some(MoveFlag::PromoteRook),
            Piece::Queen => Some(MoveFlag::PromoteQueen),
            Piece::Pawn | Piece::King => None,
        }
    }

    /// Returns the promotion piece if this is a promotion move.
    #[inline]
    pub const fn promotion_piece(self) -> Option<Piece> {
        match self {
            MoveFlag::PromoteKnight => Some(Piece::Knight),
            MoveFlag::PromoteBishop => Some(Piece::Bishop),
            MoveFlag::PromoteRook => Some(Piece::Rook),
            MoveFlag::PromoteQueen => Some(Piece::Queen),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion_piece().is_some()
    }

    /// Returns the castle side for castling flags.
    #[inline]
    pub const fn castle_side(self) -> Option<CastleSide> {
        match self {
            MoveFlag::CastleKingside => Some(CastleSide::Short),
            MoveFlag::CastleQueenside => Some(CastleSide::Long),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        self.castle_side().is_some()
    }
}

/// A chess move.
///
/// Encoded compactly: 6 bits from, 6 bits to, 4 bits flags = 16 bits total.
/// A move carries geometry only; who moved and what it captured are read off
/// the position it is played in.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// A null move (used as placeholder, not a legal move).
    pub const NULL: Move = Move(0);

    #[inline]
    pub const fn new(from: Square, to: Square, flag: MoveFlag) -> Self {
        let encoded = (from.index() as u16) | ((to.index() as u16) << 6) | ((flag as u16) << 12);
        Move(encoded)
    }

    /// Creates a normal move (no special flags).
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveFlag::Normal)
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        Square::ALL[(self.0 & 0x3F) as usize]
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        Square::ALL[((self.0 >> 6) & 0x3F) as usize]
    }

    #[inline]
    pub const fn flag(self) -> MoveFlag {
        let code = (self.0 >> 12) as usize;
        if code < MoveFlag::BY_CODE.len() {
            MoveFlag::BY_CODE[code]
        } else {
            MoveFlag::Normal
        }
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        match self.flag().promotion_piece() {
            Some(piece) => format!(
                "{}{}{}",
                self.from(),
                self.to(),
                piece.to_san_char().to_ascii_lowercase()
            ),
            None => format!("{}{}", self.from(), self.to()),
        }
    }

    /// Parses a move from UCI notation.
    ///
    /// Only the promotion flag is inferred; double pushes, castling and en
    /// passant are recognized when the move is matched against the position.
    pub fn from_uci(s: &str) -> Option<Self> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let flag = match s[4..].chars().next() {
            Some(c) => MoveFlag::promote_to(Piece::from_san_char(c.to_ascii_uppercase())?)?,
            None => MoveFlag::Normal,
        };
        Some(Move::new(from, to, flag))
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
