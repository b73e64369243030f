//! Bishop pair.

use chess_core::{Color, Piece};
use chess_rules::Position;

use crate::{ByColor, Eval};

/// 1 for a color holding a light-squared and a dark-squared bishop while
/// the opponent does not. Two pairs cancel out.
#[derive(Debug, Clone, Copy, Default)]
pub struct BishopPair;

impl Eval for BishopPair {
    type Output = ByColor<u8>;

    fn eval(&self, position: &Position) -> ByColor<u8> {
        let pairs = ByColor::from_fn(|color| has_pair(position, color));
        ByColor::from_fn(|color: Color| u8::from(pairs[color] && !pairs[color.opposite()]))
    }
}

fn has_pair(position: &Position, color: Color) -> bool {
    let bishops = position.pieces_of(Piece::Bishop, color);
    let light = bishops.into_iter().any(|sq| sq.is_light());
    let dark = bishops.into_iter().any(|sq| !sq.is_light());
    light && dark
}
