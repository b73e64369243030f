//! FEN (Forsyth-Edwards Notation) parsing and serialization.
//!
//! This module works on the text level only: it validates the fields and
//! decodes piece placement into a square array. Building a playable position
//! out of it is the rules engine's job.

use crate::{Color, Piece, Square};
use thiserror::Error;

/// Piece placement decoded square by square, indexed by [`Square::index`].
pub type Placement = [Option<(Piece, Color)>; 64];

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 or 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    #[error("expected exactly one {color} king, found {count}")]
    KingCount { color: Color, count: usize },

    #[error("{0} is in check but it is not their move")]
    OpponentInCheck(Color),
}

/// Parsed FEN data.
///
/// Holds the validated raw fields. The ply counters are optional on input
/// and default to `0 1`, so four-field text such as
/// `"8/5b2/4k3/4b3/8/8/1KBB4/8 w - -"` is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Piece placement string (e.g., "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR")
    pub piece_placement: String,
    pub active_color: Color,
    /// Castling availability (e.g., "KQkq", "-")
    pub castling: String,
    /// En passant target square, if any.
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() != 4 && parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let piece_placement = parts[0];
        parse_placement(piece_placement)?;

        let active_color = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = parts[2];
        Self::validate_castling(castling)?;

        let en_passant = Self::parse_en_passant(parts[3], active_color)?;

        let (halfmove_clock, fullmove_number) = match parts.get(4..6) {
            Some([halfmove, fullmove]) => (
                halfmove
                    .parse::<u32>()
                    .map_err(|_| FenError::InvalidHalfmoveClock(halfmove.to_string()))?,
                fullmove
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| FenError::InvalidFullmoveNumber(fullmove.to_string()))?,
            ),
            _ => (0, 1),
        };

        Ok(FenParser {
            piece_placement: piece_placement.to_string(),
            active_color,
            castling: castling.to_string(),
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Decodes the piece placement field.
    pub fn placement(&self) -> Result<Placement, FenError> {
        parse_placement(&self.piece_placement)
    }

    fn validate_castling(castling: &str) -> Result<(), FenError> {
        if castling == "-" {
            return Ok(());
        }
        if castling.is_empty() {
            return Err(FenError::InvalidCastlingRights(castling.to_string()));
        }

        let mut seen = String::new();
        for c in castling.chars() {
            if !"KQkq".contains(c) || seen.contains(c) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "invalid character '{}' in '{}'",
                    c, castling
                )));
            }
            seen.push(c);
        }

        Ok(())
    }

    /// The target lies behind a pawn the opponent just pushed two squares:
    /// rank 6 with white to move, rank 3 with black to move.
    fn parse_en_passant(ep: &str, active_color: Color) -> Result<Option<Square>, FenError> {
        if ep == "-" {
            return Ok(None);
        }

        let target_rank = match active_color {
            Color::White => 5,
            Color::Black => 2,
        };
        match Square::from_algebraic(ep) {
            Some(sq) if sq.rank().index() == target_rank => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(ep.to_string())),
        }
    }

    /// Converts the parsed FEN back to a six-field FEN string.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.piece_placement,
            self.active_color.to_fen_char(),
            self.castling,
            self.en_passant
                .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic()),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl Default for FenParser {
    fn default() -> Self {
        FenParser {
            piece_placement: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR".to_string(),
            active_color: Color::White,
            castling: "KQkq".to_string(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

/// Decodes a piece placement field, rank 8 first, into a square array.
///
/// Rejects anything but eight ranks of exactly eight squares each.
pub fn parse_placement(placement: &str) -> Result<Placement, FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::InvalidPiecePlacement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    let mut squares: Placement = [None; 64];
    for (i, rank_text) in ranks.iter().enumerate() {
        let rank = 7 - i as i8;
        let mut file = 0i8;
        let mut previous_digit = false;
        for c in rank_text.chars() {
            if let Some(run) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                if previous_digit {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "consecutive digits in rank {}",
                        rank + 1
                    )));
                }
                file += run as i8;
                previous_digit = true;
            } else if let Some(piece) = Piece::from_fen_char(c) {
                let sq = Square::from_coords(file, rank).ok_or_else(|| {
                    FenError::InvalidPiecePlacement(format!("rank {} overflows", rank + 1))
                })?;
                squares[sq.index() as usize] = Some(piece);
                file += 1;
                previous_digit = false;
            } else {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "invalid character '{}' in rank {}",
                    c,
                    rank + 1
                )));
            }
        }
        if file != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "rank {} has {} squares, expected 8",
                rank + 1,
                file
            )));
        }
    }

    Ok(squares)
}

/// Encodes a square array as a piece placement field.
pub fn placement_to_fen(squares: &Placement) -> String {
    let mut fen = String::new();
    for rank in (0..8).rev() {
        let mut empty = 0;
        for file in 0..8 {
            match squares[rank * 8 + file] {
                Some((piece, color)) => {
                    if empty > 0 {
                        fen.push_str(&empty.to_string());
                        empty = 0;
                    }
                    fen.push(piece.to_fen_char(color));
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            fen.push_str(&empty.to_string());
        }
        if rank > 0 {
            fen.push('/');
        }
    }
    fen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Rank};
    use proptest::prelude::*;

    #[test]
    fn parse_startpos() {
        let fen = FenParser::parse(FenParser::STARTPOS).unwrap();
        assert_eq!(fen.active_color, Color::White);
        assert_eq!(fen.castling, "KQkq");
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(fen, FenParser::default());
    }

    #[test]
    fn parse_custom_position() {
        let fen =
            FenParser::parse("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3")
                .unwrap();
        assert_eq!(fen.active_color, Color::White);
        assert_eq!(fen.halfmove_clock, 2);
        assert_eq!(fen.fullmove_number, 3);
    }

    #[test]
    fn four_fields_default_the_counters() {
        let fen = FenParser::parse("8/5b2/4k3/4b3/8/8/1KBB4/8 w - -").unwrap();
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(fen.to_fen(), "8/5b2/4k3/4b3/8/8/1KBB4/8 w - - 0 1");
    }

    #[test]
    fn roundtrip() {
        let original = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let parsed = FenParser::parse(original).unwrap();
        assert_eq!(parsed.to_fen(), original);
    }

    #[test]
    fn placement_decodes_squares() {
        let squares = parse_placement("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR").unwrap();
        let e4 = Square::new(File::E, Rank::R4);
        assert_eq!(squares[e4.index() as usize], Some((Piece::Pawn, Color::White)));
        assert_eq!(squares[Square::E8.index() as usize], Some((Piece::King, Color::Black)));
        assert_eq!(squares[Square::new(File::E, Rank::R2).index() as usize], None);
        assert_eq!(
            placement_to_fen(&squares),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR"
        );
    }

    #[test]
    fn invalid_part_count() {
        assert!(matches!(
            FenParser::parse("invalid"),
            Err(FenError::InvalidPartCount(1))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - - 0"),
            Err(FenError::InvalidPartCount(5))
        ));
    }

    #[test]
    fn invalid_active_color() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 x KQkq - 0 1"),
            Err(FenError::InvalidActiveColor(_))
        ));
    }

    #[test]
    fn invalid_piece_placement() {
        for placement in [
            "8/8/8/8/8/8/8",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR",
            "rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            "rnbqkbn/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
            "44/8/8/8/8/8/8/8",
            "9/8/8/8/8/8/8/8",
            "8/8/8/8/8/8/8/8/8",
        ] {
            assert!(
                matches!(
                    parse_placement(placement),
                    Err(FenError::InvalidPiecePlacement(_))
                ),
                "accepted {}",
                placement
            );
        }
    }

    #[test]
    fn invalid_castling_rights() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w XYZ - 0 1"),
            Err(FenError::InvalidCastlingRights(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w KK - 0 1"),
            Err(FenError::InvalidCastlingRights(_))
        ));
    }

    #[test]
    fn invalid_en_passant() {
        for ep in ["abc", "x3", "e4", "e9"] {
            let fen = format!("8/8/8/8/8/8/8/8 w - {} 0 1", ep);
            assert!(matches!(
                FenParser::parse(&fen),
                Err(FenError::InvalidEnPassantSquare(_))
            ));
        }
        let fen = FenParser::parse("8/8/8/8/8/8/8/8 b - d3 0 1").unwrap();
        assert_eq!(fen.en_passant, Square::from_algebraic("d3"));
        let fen = FenParser::parse("8/8/8/8/8/8/8/8 w - d6 0 1").unwrap();
        assert_eq!(fen.en_passant, Square::from_algebraic("d6"));
    }

    #[test]
    fn en_passant_rank_follows_the_side_to_move() {
        for fen in [
            "8/8/8/8/8/8/8/8 w - e3 0 1",
            "8/8/8/8/8/8/8/8 b - e6 0 1",
        ] {
            assert!(matches!(
                FenParser::parse(fen),
                Err(FenError::InvalidEnPassantSquare(_))
            ));
        }
    }

    #[test]
    fn invalid_counters() {
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - - abc 1"),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - - 0 xyz"),
            Err(FenError::InvalidFullmoveNumber(_))
        ));
        assert!(matches!(
            FenParser::parse("8/8/8/8/8/8/8/8 w - - 0 0"),
            Err(FenError::InvalidFullmoveNumber(_))
        ));
    }

    fn any_occupant() -> impl Strategy<Value = Option<(Piece, Color)>> {
        prop::option::of((prop::sample::select(Piece::ALL.to_vec()), prop::bool::ANY)).prop_map(
            |occupant| {
                occupant.map(|(piece, white)| {
                    (piece, if white { Color::White } else { Color::Black })
                })
            },
        )
    }

    proptest! {
        #[test]
        fn placement_text_roundtrips(squares in prop::collection::vec(any_occupant(), 64)) {
            let mut placement: Placement = [None; 64];
            placement.copy_from_slice(&squares);
            let text = placement_to_fen(&placement);
            prop_assert_eq!(parse_placement(&text).unwrap(), placement);
            prop_assert_eq!(placement_to_fen(&parse_placement(&text).unwrap()), text);
        }
    }

    #[test]
    fn fen_error_display() {
        assert!(FenError::InvalidPartCount(3).to_string().contains('3'));
        assert!(FenError::InvalidActiveColor("x".to_string())
            .to_string()
            .contains('x'));
        let err = FenError::KingCount {
            color: Color::Black,
            count: 0,
        };
        assert_eq!(err.to_string(), "expected exactly one Black king, found 0");
    }
}
