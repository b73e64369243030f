//! Direct opposition of the kings.

use chess_core::Color;
use chess_rules::Position;

use crate::{ByColor, Eval};

/// Flags the side *not* to move when the kings face each other on a file
/// or rank with exactly one square between them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectOpposition;

impl Eval for DirectOpposition {
    type Output = ByColor<u8>;

    fn eval(&self, position: &Position) -> ByColor<u8> {
        let (Some(white), Some(black)) = (
            position.king_square(Color::White),
            position.king_square(Color::Black),
        ) else {
            return ByColor::default();
        };

        let files = white.file_distance(black);
        let ranks = white.rank_distance(black);
        if (files == 0 && ranks == 2) || (ranks == 0 && files == 2) {
            ByColor::from_fn(|color| u8::from(color != position.side_to_move))
        } else {
            ByColor::default()
        }
    }
}
