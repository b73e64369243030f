//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the generator and the
//! legality filter together.

use crate::legal::legal_moves;
use crate::Position;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(position);

    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .as_slice()
        .iter()
        .filter_map(|m| position.play(*m).ok())
        .map(|next| perft(&next, depth - 1))
        .sum()
}

/// Perft with divide: node count below each root move, sorted by UCI text.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(String, u64)> {
    let mut results: Vec<(String, u64)> = legal_moves(position)
        .as_slice()
        .iter()
        .filter_map(|m| {
            let next = position.play(*m).ok()?;
            Some((m.to_uci(), perft(&next, depth.saturating_sub(1))))
        })
        .collect();

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
