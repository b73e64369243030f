//! Pressure on enemy pieces.

use chess_core::{Color, Square};
use chess_rules::{attacks_from, Position};

use crate::{ByColor, Eval};

/// Enemy-occupied squares each color attacks.
///
/// Attackers are scanned from a1 to h8 and each attacker's targets in the
/// same order. A square hit by two pieces appears twice.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pressure;

impl Eval for Pressure {
    type Output = ByColor<Vec<Square>>;

    fn eval(&self, position: &Position) -> ByColor<Vec<Square>> {
        ByColor::from_fn(|color: Color| {
            let enemies = position.occupancy(color.opposite());
            position
                .occupancy(color)
                .into_iter()
                .flat_map(|from| attacks_from(position, from) & enemies)
                .collect()
        })
    }
}
