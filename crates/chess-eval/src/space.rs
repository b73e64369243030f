//! Space in the opponent's half.

use chess_core::{Color, Square};
use chess_rules::{attacked_by, Bitboard, Position};

use crate::{ByColor, Eval};

/// Squares of the opponent's half each color controls, that is attacks or
/// occupies. Each square appears once, a1 first.
#[derive(Debug, Clone, Copy, Default)]
pub struct Space;

impl Eval for Space {
    type Output = ByColor<Vec<Square>>;

    fn eval(&self, position: &Position) -> ByColor<Vec<Square>> {
        ByColor::from_fn(|color: Color| {
            let controlled = attacked_by(position, color) | position.occupancy(color);
            (controlled & Bitboard::half(color.opposite()))
                .into_iter()
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squares(list: &[&str]) -> Vec<Square> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn start_position_has_no_space() {
        let result = Space.eval(&Position::startpos());
        assert_eq!(result, ByColor::default());
    }

    #[test]
    fn advanced_pieces_count_and_duplicates_collapse() {
        let position = Position::from_fen("4k3/8/8/3P4/8/2N1N3/8/4K3 w - -").unwrap();
        let result = Space.eval(&position);
        assert_eq!(
            result.white,
            squares(&["b5", "d5", "f5", "c6", "e6"])
        );
        assert!(result.black.is_empty());
    }
}
