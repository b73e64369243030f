//! Positional evaluators with per-color results.
//!
//! # Overview
//!
//! - [`Eval`] - The single capability every evaluator implements
//! - [`Evaluator`] - Closed set of variants, dispatched by `match`
//! - [`ByColor`] / [`EvalResult`] - Per-color results, serialized as `{"w", "b"}`
//! - [`EvalConfig`] - Evaluator selection loaded from TOML
//!
//! # Example
//!
//! ```
//! use chess_eval::{ByColor, Eval, BishopPair};
//! use chess_rules::Position;
//!
//! let position = Position::from_fen("8/5n2/4k3/4b3/8/8/1KBB4/8 w - -").unwrap();
//! assert_eq!(BishopPair.eval(&position), ByColor::new(1, 0));
//! ```

mod bishop_pair;
mod config;
mod evaluation;
mod evaluator;
mod opposition;
mod pressure;
mod space;

pub use bishop_pair::BishopPair;
pub use config::{ConfigError, EvalConfig, EvalReport, Snapshot};
pub use evaluation::{ByColor, EvalResult};
pub use evaluator::{Eval, Evaluator};
pub use opposition::DirectOpposition;
pub use pressure::Pressure;
pub use space::Space;
