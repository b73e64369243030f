//! Evaluator selection loaded from TOML.
//!
//! ```toml
//! evaluators = ["direct-opposition", "bishop-pair", "pressure", "space"]
//! ```

use std::path::Path;

use chess_core::Color;
use chess_rules::Position;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{EvalResult, Evaluator};

/// Errors that can occur when loading an evaluator configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    /// The file is not valid TOML or names an unknown evaluator.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which evaluators run, in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EvalConfig {
    /// Defaults to all four evaluators.
    #[serde(default = "default_evaluators")]
    pub evaluators: Vec<Evaluator>,
}

fn default_evaluators() -> Vec<Evaluator> {
    Evaluator::ALL.to_vec()
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            evaluators: default_evaluators(),
        }
    }
}

/// One evaluator's output, tagged with its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvalReport {
    pub name: Evaluator,
    pub result: EvalResult,
}

/// A position together with every enabled evaluation, the payload a
/// front end renders after each move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub turn: Color,
    pub castling: String,
    pub fen: String,
    pub evaluations: Vec<EvalReport>,
}

impl EvalConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on invalid TOML or an unknown
    /// evaluator name.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: EvalConfig = toml::from_str(content)?;
        tracing::debug!(evaluators = config.evaluators.len(), "evaluator config loaded");
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if its content is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Runs the enabled evaluators on `position`, in configured order.
    pub fn run(&self, position: &Position) -> Vec<EvalReport> {
        self.evaluators
            .iter()
            .map(|&name| EvalReport {
                name,
                result: name.eval(position),
            })
            .collect()
    }

    pub fn snapshot(&self, position: &Position) -> Snapshot {
        Snapshot {
            turn: position.side_to_move,
            castling: position.castling.to_fen(),
            fen: position.to_fen(),
            evaluations: self.run(position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_all_in_order() {
        assert_eq!(EvalConfig::default().evaluators, Evaluator::ALL.to_vec());
    }

    #[test]
    fn parse_subset() {
        let config = EvalConfig::from_toml(r#"evaluators = ["space", "bishop-pair"]"#).unwrap();
        assert_eq!(config.evaluators, vec![Evaluator::Space, Evaluator::BishopPair]);
    }

    #[test]
    fn missing_key_means_all() {
        let config = EvalConfig::from_toml("").unwrap();
        assert_eq!(config, EvalConfig::default());
    }

    #[test]
    fn unknown_evaluator_is_rejected() {
        let result = EvalConfig::from_toml(r#"evaluators = ["mobility"]"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = EvalConfig::load("/nonexistent/eval.toml");
        assert!(matches!(result, Err(ConfigError::Read(_))));
    }

    #[test]
    fn run_follows_configured_order() {
        let config = EvalConfig {
            evaluators: vec![Evaluator::Pressure, Evaluator::DirectOpposition],
        };
        let reports = config.run(&Position::startpos());
        let names: Vec<Evaluator> = reports.iter().map(|r| r.name).collect();
        assert_eq!(names, [Evaluator::Pressure, Evaluator::DirectOpposition]);
    }

    #[test]
    fn snapshot_carries_position_fields() {
        let snapshot = EvalConfig::default().snapshot(&Position::startpos());
        assert_eq!(snapshot.turn, Color::White);
        assert_eq!(snapshot.castling, "KQkq");
        assert_eq!(snapshot.fen, chess_core::FenParser::STARTPOS);
        assert_eq!(snapshot.evaluations.len(), 4);
    }
}
