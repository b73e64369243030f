//! The evaluator capability and its closed set of variants.

use std::fmt;

use chess_rules::Position;
use serde::{Deserialize, Serialize};

use crate::{BishopPair, DirectOpposition, EvalResult, Pressure, Space};

/// A stateless positional evaluator.
///
/// Each call builds a fresh result from the position alone, so evaluators
/// can run in any order and share nothing.
pub trait Eval {
    /// Per-color result type.
    type Output: Into<EvalResult>;

    fn eval(&self, position: &Position) -> Self::Output;
}

/// Every evaluator known to the crate, named as in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Evaluator {
    DirectOpposition,
    BishopPair,
    Pressure,
    Space,
}

impl Evaluator {
    pub const ALL: [Evaluator; 4] = [
        Evaluator::DirectOpposition,
        Evaluator::BishopPair,
        Evaluator::Pressure,
        Evaluator::Space,
    ];

    /// Config name of the variant.
    pub const fn name(self) -> &'static str {
        match self {
            Evaluator::DirectOpposition => "direct-opposition",
            Evaluator::BishopPair => "bishop-pair",
            Evaluator::Pressure => "pressure",
            Evaluator::Space => "space",
        }
    }

    pub fn eval(self, position: &Position) -> EvalResult {
        match self {
            Evaluator::DirectOpposition => DirectOpposition.eval(position).into(),
            Evaluator::BishopPair => BishopPair.eval(position).into(),
            Evaluator::Pressure => Pressure.eval(position).into(),
            Evaluator::Space => Space.eval(position).into(),
        }
    }
}

impl fmt::Display for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
