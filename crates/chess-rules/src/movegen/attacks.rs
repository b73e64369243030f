//! Attack sets for every piece type.
//!
//! Leapers (knight, king, pawn captures) use tables computed at compile time.
//! Sliders walk their rays and stop on the first occupied square, which is
//! included so that it can be captured or defended.

use crate::Bitboard;
use chess_core::{Color, Square};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Orthogonal ray directions as (file, rank) steps.
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Diagonal ray directions as (file, rank) steps.
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

const KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&KNIGHT_OFFSETS);
const KING_ATTACKS: [Bitboard; 64] = leaper_table(&KING_OFFSETS);

/// Indexed by `[color][square]`.
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    leaper_table(&[(-1, 1), (1, 1)]),
    leaper_table(&[(-1, -1), (1, -1)]),
];

const fn leaper_table(offsets: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        let mut bits = 0u64;
        let mut i = 0;
        while i < offsets.len() {
            let (df, dr) = offsets[i];
            if let Some(target) = Square::ALL[sq].offset(df, dr) {
                bits |= 1u64 << target.index();
            }
            i += 1;
        }
        table[sq] = Bitboard(bits);
        sq += 1;
    }
    table
}

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Squares a pawn of the given color on `sq` captures on.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// Walks each ray from `sq` up to the board edge or the first blocker.
pub fn slider_attacks(sq: Square, occupied: Bitboard, directions: &[(i8, i8)]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &(df, dr) in directions {
        let mut cursor = sq;
        while let Some(next) = cursor.offset(df, dr) {
            attacks.set(next);
            if occupied.contains(next) {
                break;
            }
            cursor = next;
        }
    }
    attacks
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    slider_attacks(sq, occupied, &BISHOP_DIRECTIONS)
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    slider_attacks(sq, occupied, &ROOK_DIRECTIONS)
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{File, Rank};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn knight_attack_counts() {
        assert_eq!(knight_attacks(Square::A1).count(), 2);
        assert_eq!(knight_attacks(Square::B1).count(), 3);
        assert_eq!(knight_attacks(sq("d4")).count(), 8);
        assert!(knight_attacks(Square::G1).contains(sq("f3")));
        assert!(knight_attacks(Square::G1).contains(sq("e2")));
    }

    #[test]
    fn king_attack_counts() {
        assert_eq!(king_attacks(Square::A1).count(), 3);
        assert_eq!(king_attacks(Square::E1).count(), 5);
        assert_eq!(king_attacks(sq("e4")).count(), 8);
    }

    #[test]
    fn pawn_attacks_by_color() {
        let e4 = Square::new(File::E, Rank::R4);
        let white = pawn_attacks(e4, Color::White);
        assert!(white.contains(sq("d5")) && white.contains(sq("f5")));
        assert_eq!(white.count(), 2);
        let black = pawn_attacks(e4, Color::Black);
        assert!(black.contains(sq("d3")) && black.contains(sq("f3")));
        assert_eq!(pawn_attacks(sq("a2"), Color::White).count(), 1);
        assert!(pawn_attacks(sq("h8"), Color::White).is_empty());
    }

    #[test]
    fn rook_rays_stop_on_blockers() {
        let occupied = Bitboard::from_squares(&[sq("a4"), sq("d7")]);
        let attacks = rook_attacks(sq("a1"), occupied);
        assert!(attacks.contains(sq("a4")));
        assert!(!attacks.contains(sq("a5")));
        assert!(attacks.contains(Square::H1));
        assert_eq!(attacks.count(), 3 + 7);
    }

    #[test]
    fn bishop_and_queen_on_empty_board() {
        assert_eq!(bishop_attacks(sq("d4"), Bitboard::EMPTY).count(), 13);
        assert_eq!(rook_attacks(sq("d4"), Bitboard::EMPTY).count(), 14);
        assert_eq!(queen_attacks(sq("d4"), Bitboard::EMPTY).count(), 27);
    }
}
