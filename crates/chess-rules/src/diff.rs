//! Recovers the move that turns one position into another.
//!
//! Only the placement field of the "after" text is read, so the shortened
//! form a board UI emits (placement plus side to move) is enough.

use chess_core::{CastleRule, CastleSide, FenError, Move, Piece, Placement, Square};

use crate::legal::legal_moves;
use crate::Position;

/// Finds the single legal move of the side to move in `before` whose
/// resulting placement equals the placement in `after`.
///
/// Castles are recognised first from the king and rook displacement on the
/// back rank, and only stand when the rest of the board is unchanged.
/// Returns `Ok(None)` when no legal move, or more than one, explains the
/// difference.
pub fn move_between(before: &Position, after: &str) -> Result<Option<Move>, FenError> {
    let target = Position::placement_of(after)?;

    if let Some(m) = castle_between(before, &target) {
        if before.play(m).is_ok_and(|next| next.placement() == target) {
            tracing::debug!(mv = %m, "placement diff matches a castle");
            return Ok(Some(m));
        }
        tracing::debug!(mv = %m, "castle pattern found but other squares changed too");
        return Ok(None);
    }

    let changed = changed_squares(&before.placement(), &target);
    if changed == 0 {
        tracing::debug!("placement diff is empty");
        return Ok(None);
    }

    let matching: Vec<Move> = legal_moves(before)
        .as_slice()
        .iter()
        .copied()
        .filter(|m| {
            before
                .play(*m)
                .is_ok_and(|next| next.placement() == target)
        })
        .collect();

    match matching.as_slice() {
        [m] => Ok(Some(*m)),
        [] => {
            tracing::debug!(changed, "no legal move explains the placement diff");
            Ok(None)
        }
        _ => {
            tracing::debug!(candidates = matching.len(), "placement diff is ambiguous");
            Ok(None)
        }
    }
}

/// [`move_between`] for two full-state texts.
pub fn move_between_fens(before: &str, after: &str) -> Result<Option<Move>, FenError> {
    move_between(&Position::from_fen(before)?, after)
}

fn castle_between(before: &Position, target: &Placement) -> Option<Move> {
    let us = before.side_to_move;
    let at = |placement: &Placement, sq: Square| placement[sq.index() as usize];
    let current = before.placement();

    CastleSide::ALL.into_iter().find_map(|side| {
        let rule = CastleRule::get(us, side);
        let displaced = at(&current, rule.king_from) == Some((Piece::King, us))
            && at(&current, rule.rook_from) == Some((Piece::Rook, us))
            && at(target, rule.king_to) == Some((Piece::King, us))
            && at(target, rule.rook_to) == Some((Piece::Rook, us))
            && at(target, rule.king_from).is_none()
            && at(target, rule.rook_from).is_none();
        if !displaced {
            return None;
        }
        legal_moves(before)
            .as_slice()
            .iter()
            .copied()
            .find(|m| m.flag().castle_side() == Some(side))
    })
}

fn changed_squares(before: &Placement, after: &Placement) -> usize {
    before.iter().zip(after).filter(|(a, b)| a != b).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::MoveFlag;

    const START_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn detects_a_pawn_push() {
        let m = move_between(
            &Position::startpos(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b",
        )
        .unwrap();
        assert_eq!(m, Some(Move::new(sq("e2"), sq("e4"), MoveFlag::DoublePush)));
    }

    #[test]
    fn detects_a_capture_from_full_texts() {
        let m = move_between_fens(
            "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2",
            "rnbqkbnr/ppp1pppp/8/3P4/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 2",
        )
        .unwrap();
        assert_eq!(m, Some(Move::normal(sq("e4"), sq("d5"))));
    }

    #[test]
    fn detects_castles_for_both_colors() {
        let white = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(
            move_between(&white, "r3k2r/8/8/8/8/8/8/R4RK1 b kq -").unwrap(),
            Some(Move::new(Square::E1, Square::G1, MoveFlag::CastleKingside))
        );
        assert_eq!(
            move_between(&white, "r3k2r/8/8/8/8/8/8/2KR3R b kq -").unwrap(),
            Some(Move::new(Square::E1, Square::C1, MoveFlag::CastleQueenside))
        );

        let black = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
        assert_eq!(
            move_between(&black, "2kr3r/8/8/8/8/8/8/R3K2R w KQ -").unwrap(),
            Some(Move::new(Square::E8, Square::C8, MoveFlag::CastleQueenside))
        );
    }

    #[test]
    fn castle_with_another_change_is_not_a_move() {
        let before = Position::from_fen("r3k2r/p7/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(
            move_between(&before, "r3k2r/8/8/8/8/8/8/R4RK1 b kq -").unwrap(),
            None
        );
        assert_eq!(
            move_between(&before, "r3k2r/p7/8/8/8/8/8/R4RK1 b kq -").unwrap(),
            Some(Move::new(Square::E1, Square::G1, MoveFlag::CastleKingside))
        );
    }

    #[test]
    fn detects_en_passant_and_promotion() {
        let before =
            Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
                .unwrap();
        assert_eq!(
            move_between(&before, "rnbqkbnr/ppp1p1pp/5P2/3p4/8/8/PPPP1PPP/RNBQKBNR b").unwrap(),
            Some(Move::new(sq("e5"), sq("f6"), MoveFlag::EnPassant))
        );

        let before = Position::from_fen("8/P7/8/8/8/8/8/4K1k1 w - - 0 1").unwrap();
        assert_eq!(
            move_between(&before, "N7/8/8/8/8/8/8/4K1k1 b").unwrap(),
            Some(Move::new(sq("a7"), Square::A8, MoveFlag::PromoteKnight))
        );
    }

    #[test]
    fn unexplained_diffs_give_none() {
        let start = Position::startpos();
        assert_eq!(move_between(&start, START_PLACEMENT).unwrap(), None);
        assert_eq!(
            move_between(&start, "rnbqkbnr/pppppppp/8/8/3PP3/8/PPP2PPP/RNBQKBNR b").unwrap(),
            None
        );
        assert_eq!(
            move_between(&start, "rnbqkbnr/pppp1ppp/8/4p3/8/8/PPPPPPPP/RNBQKBNR w").unwrap(),
            None
        );
    }

    #[test]
    fn malformed_after_text_is_an_error() {
        assert!(move_between(&Position::startpos(), "rnbqkbnr/pppppppp/8/8").is_err());
        assert!(move_between(&Position::startpos(), "").is_err());
    }
}
