//! Per-color evaluation results.

use std::ops::{Index, IndexMut};

use chess_core::{Color, Square};
use serde::Serialize;

/// One value per color, serialized as `{"w": .., "b": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ByColor<T> {
    #[serde(rename = "w")]
    pub white: T,
    #[serde(rename = "b")]
    pub black: T,
}

impl<T> ByColor<T> {
    pub const fn new(white: T, black: T) -> Self {
        ByColor { white, black }
    }

    /// Builds both values from a function of the color.
    pub fn from_fn(mut f: impl FnMut(Color) -> T) -> Self {
        ByColor {
            white: f(Color::White),
            black: f(Color::Black),
        }
    }
}

impl<T> Index<Color> for ByColor<T> {
    type Output = T;

    fn index(&self, color: Color) -> &T {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

impl<T> IndexMut<Color> for ByColor<T> {
    fn index_mut(&mut self, color: Color) -> &mut T {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

/// Result of one evaluator, built fresh on every call.
///
/// Serialized without a tag, so a scalar result reads `{"w": 1, "b": 0}` and
/// a square list reads `{"w": ["e5"], "b": []}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EvalResult {
    Scalar(ByColor<u8>),
    Squares(ByColor<Vec<Square>>),
}

impl From<ByColor<u8>> for EvalResult {
    fn from(value: ByColor<u8>) -> Self {
        EvalResult::Scalar(value)
    }
}

impl From<ByColor<Vec<Square>>> for EvalResult {
    fn from(value: ByColor<Vec<Square>>) -> Self {
        EvalResult::Squares(value)
    }
}
