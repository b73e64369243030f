//! Castle rule table.
//!
//! Castling touches a fixed set of squares per color and side. The table is a
//! plain `static`, built at compile time and never recomputed.

use crate::{Color, Square};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned for a castle side token that is neither `O-O` nor `O-O-O`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CastleError {
    #[error("unknown castle side: '{0}'")]
    UnknownSide(String),
}

/// The two castling directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CastleSide {
    /// Kingside, `O-O`.
    Short = 0,
    /// Queenside, `O-O-O`.
    Long = 1,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::Short, CastleSide::Long];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The algebraic token for this side.
    pub const fn san(self) -> &'static str {
        match self {
            CastleSide::Short => "O-O",
            CastleSide::Long => "O-O-O",
        }
    }
}

impl FromStr for CastleSide {
    type Err = CastleError;

    /// Accepts the letter-O and digit-zero spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "O-O" | "0-0" => Ok(CastleSide::Short),
            "O-O-O" | "0-0-0" => Ok(CastleSide::Long),
            other => Err(CastleError::UnknownSide(other.to_string())),
        }
    }
}

impl fmt::Display for CastleSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.san())
    }
}

/// Squares involved in one castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleRule {
    pub color: Color,
    pub side: CastleSide,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares between king and rook that must be empty.
    pub empty: &'static [Square],
    /// Squares the king stands on, crosses or lands on; none may be attacked.
    pub safe: &'static [Square],
}

/// Indexed by `[color][side]`.
static CASTLE_RULES: [[CastleRule; 2]; 2] = [
    [
        CastleRule {
            color: Color::White,
            side: CastleSide::Short,
            king_from: Square::E1,
            king_to: Square::G1,
            rook_from: Square::H1,
            rook_to: Square::F1,
            empty: &[Square::F1, Square::G1],
            safe: &[Square::E1, Square::F1, Square::G1],
        },
        CastleRule {
            color: Color::White,
            side: CastleSide::Long,
            king_from: Square::E1,
            king_to: Square::C1,
            rook_from: Square::A1,
            rook_to: Square::D1,
            empty: &[Square::B1, Square::C1, Square::D1],
            safe: &[Square::E1, Square::D1, Square::C1],
        },
    ],
    [
        CastleRule {
            color: Color::Black,
            side: CastleSide::Short,
            king_from: Square::E8,
            king_to: Square::G8,
            rook_from: Square::H8,
            rook_to: Square::F8,
            empty: &[Square::F8, Square::G8],
            safe: &[Square::E8, Square::F8, Square::G8],
        },
        CastleRule {
            color: Color::Black,
            side: CastleSide::Long,
            king_from: Square::E8,
            king_to: Square::C8,
            rook_from: Square::A8,
            rook_to: Square::D8,
            empty: &[Square::B8, Square::C8, Square::D8],
            safe: &[Square::E8, Square::D8, Square::C8],
        },
    ],
];

impl CastleRule {
    /// Returns the rule for the given color and side.
    #[inline]
    pub fn get(color: Color, side: CastleSide) -> &'static CastleRule {
        &CASTLE_RULES[color.index()][side.index()]
    }

    /// Looks a rule up by its algebraic side token (`O-O` or `O-O-O`).
    pub fn lookup(color: Color, side: &str) -> Result<&'static CastleRule, CastleError> {
        Ok(Self::get(color, side.parse()?))
    }

    /// Returns the rule, if any, whose rook starts on `square`.
    pub fn with_rook_on(square: Square) -> Option<&'static CastleRule> {
        CASTLE_RULES
            .iter()
            .flatten()
            .find(|rule| rule.rook_from == square)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Rank};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn white_long() {
        let rule = CastleRule::lookup(Color::White, "O-O-O").unwrap();
        assert_eq!(rule.empty, &[sq("b1"), sq("c1"), sq("d1")]);
        assert_eq!(rule.king_from, sq("e1"));
        assert_eq!(rule.king_to, sq("c1"));
        assert_eq!(rule.rook_from, sq("a1"));
        assert_eq!(rule.rook_to, sq("d1"));
    }

    #[test]
    fn black_long() {
        let rule = CastleRule::lookup(Color::Black, "O-O-O").unwrap();
        assert_eq!(rule.empty, &[sq("b8"), sq("c8"), sq("d8")]);
        assert_eq!(rule.king_from, sq("e8"));
        assert_eq!(rule.king_to, sq("c8"));
        assert_eq!(rule.rook_from, sq("a8"));
        assert_eq!(rule.rook_to, sq("d8"));
    }

    #[test]
    fn white_short() {
        let rule = CastleRule::lookup(Color::White, "O-O").unwrap();
        assert_eq!(rule.empty, &[sq("f1"), sq("g1")]);
        assert_eq!(rule.safe, &[sq("e1"), sq("f1"), sq("g1")]);
        assert_eq!(rule.king_from, sq("e1"));
        assert_eq!(rule.king_to, sq("g1"));
        assert_eq!(rule.rook_from, sq("h1"));
        assert_eq!(rule.rook_to, sq("f1"));
    }

    #[test]
    fn black_short() {
        let rule = CastleRule::get(Color::Black, CastleSide::Short);
        assert_eq!(rule.empty, &[sq("f8"), sq("g8")]);
        assert_eq!(rule.king_from, sq("e8"));
        assert_eq!(rule.king_to, sq("g8"));
        assert_eq!(rule.rook_from, sq("h8"));
        assert_eq!(rule.rook_to, sq("f8"));
    }

    #[test]
    fn safe_squares_start_on_king_and_end_on_destination() {
        for color in Color::ALL {
            for side in CastleSide::ALL {
                let rule = CastleRule::get(color, side);
                assert_eq!(rule.color, color);
                assert_eq!(rule.side, side);
                assert_eq!(rule.safe.first(), Some(&rule.king_from));
                assert_eq!(rule.safe.last(), Some(&rule.king_to));
                assert!(rule.empty.contains(&rule.rook_to));
            }
        }
    }

    #[test]
    fn unknown_side_is_rejected() {
        assert_eq!(
            CastleRule::lookup(Color::White, "O-O-O-O"),
            Err(CastleError::UnknownSide("O-O-O-O".to_string()))
        );
        assert_eq!("0-0".parse::<CastleSide>(), Ok(CastleSide::Short));
    }

    #[test]
    fn rook_lookup() {
        let rule = CastleRule::with_rook_on(Square::A8).unwrap();
        assert_eq!((rule.color, rule.side), (Color::Black, CastleSide::Long));
        assert!(CastleRule::with_rook_on(Square::new(File::E, Rank::R4)).is_none());
    }
}
