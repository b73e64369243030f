//! Chess position representation.

use chess_core::{
    parse_placement, placement_to_fen, CastleRule, CastleSide, Color, FenError, FenParser, Move,
    MoveFlag, Piece, Placement, Square,
};
use thiserror::Error;

use crate::movegen::is_king_attacked;
use crate::Bitboard;

/// Reasons [`Position::apply`] refuses a move. The position is left
/// untouched in every case.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("the piece on {square} does not belong to {side}")]
    WrongSide { square: Square, side: Color },

    #[error("no {color} rook on {square} to castle with")]
    NoCastlingRook { color: Color, square: Square },
}

/// What [`Position::apply`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    pub color: Color,
    pub piece: Piece,
    pub captured: Option<Piece>,
}

/// Castling history for one color and side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SideRights {
    pub king_moved: bool,
    pub rook_moved: bool,
}

/// Castling rights, one [`SideRights`] per color and side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRights([[SideRights; 2]; 2]);

impl CastlingRights {
    /// Nothing has moved yet.
    pub const ALL: CastlingRights = CastlingRights(
        [[SideRights {
            king_moved: false,
            rook_moved: false,
        }; 2]; 2],
    );

    /// Every king and rook has moved.
    pub const NONE: CastlingRights = CastlingRights(
        [[SideRights {
            king_moved: true,
            rook_moved: true,
        }; 2]; 2],
    );

    #[inline]
    pub const fn get(self, color: Color, side: CastleSide) -> SideRights {
        self.0[color.index()][side.index()]
    }

    /// True while neither the king nor the rook of that side has moved.
    #[inline]
    pub const fn can_castle(self, color: Color, side: CastleSide) -> bool {
        let rights = self.get(color, side);
        !rights.king_moved && !rights.rook_moved
    }

    /// Records a king move, which rules out castling on both sides.
    pub fn king_moved(&mut self, color: Color) {
        for rights in &mut self.0[color.index()] {
            rights.king_moved = true;
        }
    }

    /// Records that the rook of one side moved or was captured.
    pub fn rook_moved(&mut self, color: Color, side: CastleSide) {
        self.0[color.index()][side.index()].rook_moved = true;
    }

    /// Reads the castling field of a FEN string. A missing letter means the
    /// rook of that side is gone for castling purposes.
    pub fn from_fen(field: &str) -> Self {
        let mut rights = CastlingRights::ALL;
        for (c, color, side) in Self::LETTERS {
            if !field.contains(c) {
                rights.rook_moved(color, side);
            }
        }
        rights
    }

    /// Writes the castling field of a FEN string.
    pub fn to_fen(self) -> String {
        let field: String = Self::LETTERS
            .iter()
            .filter(|(_, color, side)| self.can_castle(*color, *side))
            .map(|(c, _, _)| *c)
            .collect();
        if field.is_empty() {
            "-".to_string()
        } else {
            field
        }
    }

    const LETTERS: [(char, Color, CastleSide); 4] = [
        ('K', Color::White, CastleSide::Short),
        ('Q', Color::White, CastleSide::Long),
        ('k', Color::Black, CastleSide::Short),
        ('q', Color::Black, CastleSide::Long),
    ];
}

impl Default for CastlingRights {
    fn default() -> Self {
        CastlingRights::ALL
    }
}

/// Complete chess position state for one ply.
///
/// Cloning is cheap (a handful of words), which is what trial moves in the
/// legality filter rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Bitboards for each piece type, indexed by Piece enum.
    pieces: [Bitboard; 6],

    /// Bitboards for each color's pieces.
    colors: [Bitboard; 2],

    pub side_to_move: Color,

    pub castling: CastlingRights,

    /// En passant target square, valid for the ply right after a double push.
    pub en_passant: Option<Square>,

    /// Halfmove clock for 50-move rule.
    pub halfmove_clock: u32,

    /// Fullmove number (starts at 1, increments after Black's move).
    pub fullmove_number: u32,
}

impl Position {
    /// Creates an empty board with white to move and no castling rights.
    pub fn empty() -> Self {
        Position {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        let mut position = Position::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.into_iter().enumerate() {
            let file = file as i8;
            for (color, back, pawns) in [(Color::White, 0, 1), (Color::Black, 7, 6)] {
                if let Some(sq) = Square::from_coords(file, back) {
                    position.put(sq, piece, color);
                }
                if let Some(sq) = Square::from_coords(file, pawns) {
                    position.put(sq, Piece::Pawn, color);
                }
            }
        }
        position.castling = CastlingRights::ALL;
        position
    }

    /// Creates a position from a FEN string.
    ///
    /// Besides the field checks done by [`FenParser`], each color must have
    /// exactly one king, an en passant target must sit behind an enemy pawn,
    /// and the side not to move must not be in check.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;
        let mut position = Position::empty();

        for (index, occupant) in parsed.placement()?.into_iter().enumerate() {
            if let Some((piece, color)) = occupant {
                position.put(Square::ALL[index], piece, color);
            }
        }

        for color in Color::ALL {
            let count = position.pieces_of(Piece::King, color).count() as usize;
            if count != 1 {
                return Err(FenError::KingCount { color, count });
            }
        }

        position.side_to_move = parsed.active_color;
        position.castling = CastlingRights::from_fen(&parsed.castling);
        position.en_passant = parsed.en_passant;
        position.halfmove_clock = parsed.halfmove_clock;
        position.fullmove_number = parsed.fullmove_number;

        if let Some(target) = position.en_passant {
            let pushed = target.offset(0, -position.side_to_move.pawn_direction());
            let them = position.side_to_move.opposite();
            if pushed.and_then(|sq| position.piece_at(sq)) != Some((Piece::Pawn, them)) {
                return Err(FenError::InvalidEnPassantSquare(target.to_algebraic()));
            }
        }

        let them = position.side_to_move.opposite();
        if is_king_attacked(&position, them) {
            return Err(FenError::OpponentInCheck(them));
        }

        Ok(position)
    }

    /// Converts the position to a six-field FEN string.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            placement_to_fen(&self.placement()),
            self.side_to_move.to_fen_char(),
            self.castling.to_fen(),
            self.en_passant
                .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic()),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Returns the piece placement as a square array.
    pub fn placement(&self) -> Placement {
        let mut squares: Placement = [None; 64];
        for sq in self.occupied() {
            squares[sq.index() as usize] = self.piece_at(sq);
        }
        squares
    }

    /// Parses only the placement field of `fen` (or a bare placement).
    pub fn placement_of(fen: &str) -> Result<Placement, FenError> {
        parse_placement(fen.split_whitespace().next().unwrap_or_default())
    }

    /// Returns the piece and color at the given square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        let color = Color::ALL
            .into_iter()
            .find(|color| self.colors[color.index()].contains(sq))?;
        Piece::ALL
            .into_iter()
            .find(|piece| self.pieces[piece.index()].contains(sq))
            .map(|piece| (piece, color))
    }

    /// Places a piece, replacing whatever stood on the square.
    pub fn put(&mut self, sq: Square, piece: Piece, color: Color) {
        self.remove(sq);
        self.pieces[piece.index()].set(sq);
        self.colors[color.index()].set(sq);
    }

    /// Removes and returns the piece on the square.
    pub fn remove(&mut self, sq: Square) -> Option<(Piece, Color)> {
        let occupant = self.piece_at(sq)?;
        self.pieces[occupant.0.index()].clear(sq);
        self.colors[occupant.1.index()].clear(sq);
        Some(occupant)
    }

    /// Returns a bitboard of all occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    /// Returns a bitboard of one color's pieces.
    #[inline]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// Returns a bitboard of pieces of the given type and color.
    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[piece.index()] & self.colors[color.index()]
    }

    /// Returns the square of the given color's king.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(Piece::King, color).first()
    }

    /// Plays a move on this position.
    ///
    /// Relocates the piece, removes what it captures (one rank behind the
    /// destination for en passant), moves the castling rook, promotes,
    /// updates castling rights and the en passant target, and hands the
    /// move to the other side. Legality is the caller's concern; only
    /// ownership is checked, and nothing changes when that check fails.
    pub fn apply(&mut self, m: Move) -> Result<AppliedMove, MoveError> {
        let us = self.side_to_move;
        let them = us.opposite();
        let from = m.from();
        let to = m.to();
        let flag = m.flag();

        let (piece, owner) = self.piece_at(from).ok_or(MoveError::EmptySquare(from))?;
        if owner != us {
            return Err(MoveError::WrongSide {
                square: from,
                side: us,
            });
        }
        let castle = flag.castle_side().map(|side| CastleRule::get(us, side));
        if let Some(rule) = castle {
            if self.piece_at(rule.rook_from) != Some((Piece::Rook, us)) {
                return Err(MoveError::NoCastlingRook {
                    color: us,
                    square: rule.rook_from,
                });
            }
        }

        let capture_square = if flag == MoveFlag::EnPassant {
            to.offset(0, -us.pawn_direction()).unwrap_or(to)
        } else {
            to
        };
        let captured = match self.piece_at(capture_square) {
            Some((captured, color)) if color == them => {
                self.remove(capture_square);
                Some(captured)
            }
            _ => None,
        };

        self.remove(from);
        self.put(to, flag.promotion_piece().unwrap_or(piece), us);

        if let Some(rule) = castle {
            self.remove(rule.rook_from);
            self.put(rule.rook_to, Piece::Rook, us);
        }

        if piece == Piece::King {
            self.castling.king_moved(us);
        }
        for sq in [from, to] {
            if let Some(rule) = CastleRule::with_rook_on(sq) {
                self.castling.rook_moved(rule.color, rule.side);
            }
        }

        self.en_passant = if piece == Piece::Pawn && from.rank_distance(to) == 2 {
            from.offset(0, us.pawn_direction())
        } else {
            None
        };

        if piece == Piece::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = them;

        Ok(AppliedMove {
            color: us,
            piece,
            captured,
        })
    }

    /// Returns a copy of this position with the move played.
    pub fn play(&self, m: Move) -> Result<Position, MoveError> {
        let mut next = self.clone();
        next.apply(m)?;
        Ok(next)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{File, Rank};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn startpos_fen_roundtrip() {
        let pos = Position::startpos();
        assert_eq!(pos.to_fen(), FenParser::STARTPOS);
        assert_eq!(Position::from_fen(FenParser::STARTPOS).unwrap(), pos);
    }

    #[test]
    fn custom_fen_roundtrip() {
        for fen in [
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w Kq - 0 1",
            "8/8/8/8/8/8/8/4K2k w - - 12 40",
        ] {
            assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);
        }
    }

    #[test]
    fn piece_at() {
        let pos = Position::startpos();
        assert_eq!(pos.piece_at(Square::E1), Some((Piece::King, Color::White)));
        assert_eq!(pos.piece_at(Square::E8), Some((Piece::King, Color::Black)));
        assert_eq!(pos.piece_at(Square::new(File::E, Rank::R4)), None);
        assert_eq!(pos.occupied().count(), 32);
        assert_eq!(pos.pieces_of(Piece::Pawn, Color::Black).count(), 8);
        assert_eq!(pos.king_square(Color::Black), Some(Square::E8));
    }

    #[test]
    fn king_count_is_enforced() {
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::KingCount {
                color: Color::Black,
                count: 0
            })
        );
        assert_eq!(
            Position::from_fen("k7/8/8/8/8/8/8/3KK3 w - - 0 1"),
            Err(FenError::KingCount {
                color: Color::White,
                count: 2
            })
        );
    }

    #[test]
    fn opponent_in_check_is_rejected() {
        assert_eq!(
            Position::from_fen("4k2R/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::OpponentInCheck(Color::Black))
        );
        assert!(Position::from_fen("4k2R/8/8/8/8/8/8/4K3 b - - 0 1").is_ok());
    }

    #[test]
    fn en_passant_target_needs_the_pushed_pawn() {
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/3P4/4K3 w - e6 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/3P4/4K3 w - e3 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 w - e3 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        let position = Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1").unwrap();
        assert_eq!(position.en_passant, Some(sq("e3")));
        let position = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(position.en_passant, Some(sq("d6")));
    }

    #[test]
    fn castling_rights_from_fen() {
        let rights = CastlingRights::from_fen("Kq");
        assert!(rights.can_castle(Color::White, CastleSide::Short));
        assert!(!rights.can_castle(Color::White, CastleSide::Long));
        assert!(!rights.can_castle(Color::Black, CastleSide::Short));
        assert!(rights.can_castle(Color::Black, CastleSide::Long));
        assert_eq!(rights.to_fen(), "Kq");
        assert_eq!(CastlingRights::from_fen("-"), CastlingRights::from_fen(""));
        assert_eq!(CastlingRights::from_fen("-").to_fen(), "-");
    }

    #[test]
    fn king_move_clears_both_sides() {
        let mut rights = CastlingRights::ALL;
        rights.king_moved(Color::White);
        assert!(rights.get(Color::White, CastleSide::Short).king_moved);
        assert!(!rights.can_castle(Color::White, CastleSide::Long));
        assert!(rights.can_castle(Color::Black, CastleSide::Short));
        assert_eq!(rights.to_fen(), "kq");
    }

    #[test]
    fn apply_pawn_double_push_sets_en_passant() {
        let mut pos = Position::startpos();
        let applied = pos
            .apply(Move::new(sq("e2"), sq("e4"), MoveFlag::DoublePush))
            .unwrap();
        assert_eq!(applied.piece, Piece::Pawn);
        assert_eq!(applied.captured, None);
        assert_eq!(pos.side_to_move, Color::Black);
        assert_eq!(pos.en_passant, Some(sq("e3")));
        assert_eq!(pos.piece_at(sq("e4")), Some((Piece::Pawn, Color::White)));

        pos.apply(Move::normal(sq("g8"), sq("f6"))).unwrap();
        assert_eq!(pos.en_passant, None);
        assert_eq!(pos.fullmove_number, 2);
        assert_eq!(pos.halfmove_clock, 1);
    }

    #[test]
    fn apply_en_passant_removes_the_passed_pawn() {
        let mut pos =
            Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
                .unwrap();
        let applied = pos
            .apply(Move::new(sq("e5"), sq("f6"), MoveFlag::EnPassant))
            .unwrap();
        assert_eq!(applied.captured, Some(Piece::Pawn));
        assert_eq!(pos.piece_at(sq("f5")), None);
        assert_eq!(pos.piece_at(sq("f6")), Some((Piece::Pawn, Color::White)));
        assert_eq!(pos.piece_at(sq("d5")), Some((Piece::Pawn, Color::Black)));
        assert_eq!(pos.en_passant, None);
    }

    #[test]
    fn apply_castle_moves_the_rook() {
        let mut pos =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R b KQkq - 0 1").unwrap();
        pos.apply(Move::new(Square::E8, Square::C8, MoveFlag::CastleQueenside))
            .unwrap();
        assert_eq!(pos.piece_at(Square::C8), Some((Piece::King, Color::Black)));
        assert_eq!(pos.piece_at(Square::D8), Some((Piece::Rook, Color::Black)));
        assert_eq!(pos.piece_at(Square::A8), None);
        assert_eq!(pos.castling.to_fen(), "KQ");
    }

    #[test]
    fn apply_promotion_replaces_the_pawn() {
        let mut pos = Position::from_fen("1n5k/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let applied = pos
            .apply(Move::new(sq("a7"), sq("b8"), MoveFlag::PromoteKnight))
            .unwrap();
        assert_eq!(applied.captured, Some(Piece::Knight));
        assert_eq!(pos.piece_at(sq("b8")), Some((Piece::Knight, Color::White)));
        assert_eq!(pos.pieces_of(Piece::Pawn, Color::White).count(), 0);
    }

    #[test]
    fn rook_moves_and_captures_update_rights() {
        let mut pos =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        pos.apply(Move::normal(Square::A1, Square::A8)).unwrap();
        assert_eq!(pos.castling.to_fen(), "Kk");
        pos.apply(Move::normal(Square::H8, Square::H1)).unwrap();
        assert_eq!(pos.castling.to_fen(), "-");
    }

    #[test]
    fn rejected_moves_leave_the_position_alone() {
        let mut pos = Position::startpos();
        let before = pos.clone();
        assert_eq!(
            pos.apply(Move::normal(sq("e4"), sq("e5"))),
            Err(MoveError::EmptySquare(sq("e4")))
        );
        assert_eq!(
            pos.apply(Move::normal(sq("e7"), sq("e5"))),
            Err(MoveError::WrongSide {
                square: sq("e7"),
                side: Color::White
            })
        );
        let mut no_rook = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w K - 0 1").unwrap();
        let snapshot = no_rook.clone();
        assert!(matches!(
            no_rook.apply(Move::new(Square::E1, Square::G1, MoveFlag::CastleKingside)),
            Err(MoveError::NoCastlingRook { .. })
        ));
        assert_eq!(no_rook, snapshot);
        assert_eq!(pos, before);
    }

    #[test]
    fn play_leaves_the_source_position_untouched() {
        let pos = Position::startpos();
        let next = pos.play(Move::normal(Square::G1, sq("f3"))).unwrap();
        assert_eq!(pos, Position::startpos());
        assert_eq!(next.piece_at(sq("f3")), Some((Piece::Knight, Color::White)));
    }
}
