//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"

use crate::legal::{is_check, is_legal, legal_moves};
use crate::movegen::pseudo_legal_moves;
use crate::Position;
use chess_core::{CastleSide, File, Move, MoveFlag, Piece, Rank, Square};
use thiserror::Error;

/// Error type for SAN parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SanError {
    #[error("empty SAN string")]
    Empty,

    #[error("invalid SAN format: {0}")]
    InvalidFormat(String),

    #[error("no move matches: {0}")]
    NoMatchingMove(String),

    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),

    /// The move exists geometrically but would leave the king attacked.
    #[error("illegal move: {0}")]
    IllegalMove(String),
}

/// Converts a move to SAN notation given the current position.
///
/// The position must be the state BEFORE the move is made and the move
/// should be legal in it. A move from an empty square is written in UCI
/// form.
pub fn move_to_san(position: &Position, m: Move) -> String {
    let Some((piece, _)) = position.piece_at(m.from()) else {
        return m.to_uci();
    };

    let mut san = match m.flag().castle_side() {
        Some(side) => side.san().to_string(),
        None => {
            let mut san = String::new();
            let from = m.from();
            if piece != Piece::Pawn {
                san.push(piece.to_san_char());
                san.push_str(&disambiguation(position, m, piece));
            }
            if is_capture(position, m) {
                if piece == Piece::Pawn {
                    san.push(from.file().to_char());
                }
                san.push('x');
            }
            san.push_str(&m.to().to_algebraic());
            if let Some(promotion) = m.flag().promotion_piece() {
                san.push('=');
                san.push(promotion.to_san_char());
            }
            san
        }
    };

    if let Ok(next) = position.play(m) {
        if is_check(&next) {
            san.push(if legal_moves(&next).is_empty() { '#' } else { '+' });
        }
    }
    san
}

/// Parses a SAN string and returns the corresponding legal move.
///
/// Candidates come from the pseudo-legal moves of the named piece type that
/// reach the destination and match the origin hints. The result must be a
/// single legal move: none at all is [`SanError::NoMatchingMove`], candidates
/// that all leave the king attacked are [`SanError::IllegalMove`], and
/// several legal ones are [`SanError::AmbiguousMove`].
pub fn san_to_move(position: &Position, san: &str) -> Result<Move, SanError> {
    let san = san.trim();
    if san.is_empty() {
        return Err(SanError::Empty);
    }
    let body = san.trim_end_matches(['+', '#']);

    let candidates: Vec<Move> = match body.parse::<CastleSide>() {
        Ok(side) => pseudo_legal_moves(position)
            .as_slice()
            .iter()
            .copied()
            .filter(|m| m.flag().castle_side() == Some(side))
            .collect(),
        Err(_) => {
            let parsed = parse_san(body).ok_or_else(|| SanError::InvalidFormat(san.to_string()))?;
            pseudo_legal_moves(position)
                .as_slice()
                .iter()
                .copied()
                .filter(|m| parsed.matches(position, *m))
                .collect()
        }
    };

    if candidates.is_empty() {
        return Err(SanError::NoMatchingMove(san.to_string()));
    }
    let legal: Vec<Move> = candidates
        .into_iter()
        .filter(|m| is_legal(position, *m))
        .collect();
    match legal.as_slice() {
        [] => Err(SanError::IllegalMove(san.to_string())),
        [m] => Ok(*m),
        _ => Err(SanError::AmbiguousMove(san.to_string())),
    }
}

/// Parsed components of a non-castling SAN string.
#[derive(Debug)]
struct ParsedSan {
    piece: Piece,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to: Square,
    promotion: Option<Piece>,
    capture: bool,
}

impl ParsedSan {
    fn matches(&self, position: &Position, m: Move) -> bool {
        position.piece_at(m.from()).map(|(piece, _)| piece) == Some(self.piece)
            && m.to() == self.to
            && !m.flag().is_castling()
            && self.from_file.map_or(true, |file| m.from().file() == file)
            && self.from_rank.map_or(true, |rank| m.from().rank() == rank)
            && m.flag().promotion_piece() == self.promotion
            && (!self.capture || is_capture(position, m))
    }
}

/// Splits `[piece][file][rank][x]<file><rank>[=piece]` into its parts.
fn parse_san(body: &str) -> Option<ParsedSan> {
    if !body.is_ascii() {
        return None;
    }
    let (body, promotion) = match body.split_once('=') {
        Some((head, tail)) => {
            let mut chars = tail.chars();
            let piece = match (chars.next(), chars.next()) {
                (Some(c), None) => Piece::from_san_char(c)?,
                _ => return None,
            };
            if !Piece::PROMOTIONS.contains(&piece) {
                return None;
            }
            (head, Some(piece))
        }
        None => (body, None),
    };

    let chars: Vec<char> = body.chars().collect();
    let (piece, rest) = match chars.split_first() {
        Some((c, rest)) if c.is_ascii_uppercase() => (Piece::from_san_char(*c)?, rest),
        _ => (Piece::Pawn, chars.as_slice()),
    };
    if rest.len() < 2 {
        return None;
    }
    let (head, dest) = rest.split_at(rest.len() - 2);
    let to = Square::new(File::from_char(dest[0])?, Rank::from_char(dest[1])?);

    let (head, capture) = match head.split_last() {
        Some((&'x', head)) => (head, true),
        _ => (head, false),
    };
    let (from_file, from_rank) = match head {
        [] => (None, None),
        [c] => match (File::from_char(*c), Rank::from_char(*c)) {
            (Some(file), _) => (Some(file), None),
            (None, Some(rank)) => (None, Some(rank)),
            (None, None) => return None,
        },
        [f, r] => (Some(File::from_char(*f)?), Some(Rank::from_char(*r)?)),
        _ => return None,
    };

    Some(ParsedSan {
        piece,
        from_file,
        from_rank,
        to,
        promotion,
        capture,
    })
}

fn is_capture(position: &Position, m: Move) -> bool {
    m.flag() == MoveFlag::EnPassant
        || matches!(
            (position.piece_at(m.from()), position.piece_at(m.to())),
            (Some((_, us)), Some((_, them))) if us != them
        )
}

/// Origin hint needed to tell `m` apart from other legal moves of the same
/// piece type to the same square: file if unique, else rank, else both.
fn disambiguation(position: &Position, m: Move, piece: Piece) -> String {
    let from = m.from();
    let rivals: Vec<Square> = legal_moves(position)
        .as_slice()
        .iter()
        .filter(|other| {
            other.to() == m.to()
                && other.from() != from
                && position.piece_at(other.from()).map(|(p, _)| p) == Some(piece)
        })
        .map(|other| other.from())
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|sq| sq.file() != from.file()) {
        from.file().to_char().to_string()
    } else if rivals.iter().all(|sq| sq.rank() != from.rank()) {
        from.rank().to_char().to_string()
    } else {
        from.to_algebraic()
    }
}
