//! Game management with history tracking.
//!
//! [`Game`] owns the authoritative [`Position`] and records every move it
//! accepts. Each entry point validates first and mutates last, so a rejected
//! move leaves the game exactly as it was.

use crate::diff::move_between;
use crate::legal::{self, Status};
use crate::san::{move_to_san, san_to_move, SanError};
use crate::{MoveError, MoveList, Position};
use chess_core::{Color, FenError, Move, MoveFlag, Piece, Square};
use thiserror::Error;

/// A move as it was played, frozen into history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub color: Color,
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub flag: MoveFlag,
    pub captured: Option<Piece>,
    /// The move gives check (true for mate as well).
    pub check: bool,
    pub mate: bool,
    pub san: String,
}

impl MoveRecord {
    /// The packed move.
    pub fn mv(&self) -> Move {
        Move::new(self.from, self.to, self.flag)
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

/// A piece with its square and legal destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceInfo {
    pub piece: Piece,
    pub color: Color,
    pub square: Square,
    pub moves: Vec<Square>,
}

/// Error type for game operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error(transparent)]
    San(#[from] SanError),

    #[error(transparent)]
    Move(#[from] MoveError),

    /// The move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("{given} cannot move, it is {expected}'s turn")]
    WrongTurn { expected: Color, given: Color },

    #[error("no legal move leads to {0}")]
    NoMoveBetween(String),
}

/// Something that proposes a move for the current game, given its movetext.
///
/// Implementations are built by the caller (they may hold an expensive model
/// loaded once per process) and lent to [`Game::recommend`].
pub trait MoveRecommender {
    fn recommend(&self, movetext: &str) -> Option<String>;
}

/// A chess game: current position, starting position and move history.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    start_pos: Position,
    history: Vec<MoveRecord>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    /// Creates a game from a custom starting position.
    pub fn from_position(position: Position) -> Self {
        Game {
            start_pos: position.clone(),
            position,
            history: Vec::new(),
        }
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    /// Replaces the game with a fresh one starting from `fen`. On error the
    /// current game is kept.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), GameError> {
        let game = Self::from_fen(fen).map_err(|err| self.rejected(err.into(), fen))?;
        *self = game;
        Ok(())
    }

    /// Returns a reference to the current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the starting position.
    pub fn start_position(&self) -> &Position {
        &self.start_pos
    }

    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }

    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Returns the move history, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Pieces captured by `color` so far, in the order they fell.
    pub fn captures(&self, color: Color) -> Vec<Piece> {
        self.history
            .iter()
            .filter(|record| record.color == color)
            .filter_map(|record| record.captured)
            .collect()
    }

    pub fn legal_moves(&self) -> MoveList {
        legal::legal_moves(&self.position)
    }

    /// Legal moves of the piece on `square`.
    pub fn legal_moves_from(&self, square: Square) -> MoveList {
        legal::legal_moves_from(&self.position, square)
    }

    /// The piece on `square` with its legal destinations.
    pub fn piece(&self, square: Square) -> Option<PieceInfo> {
        let (piece, color) = self.position.piece_at(square)?;
        Some(PieceInfo {
            piece,
            color,
            square,
            moves: self
                .legal_moves_from(square)
                .as_slice()
                .iter()
                .map(|m| m.to())
                .collect(),
        })
    }

    /// All pieces of `color`, a1 first.
    pub fn pieces(&self, color: Color) -> Vec<PieceInfo> {
        self.position
            .occupancy(color)
            .into_iter()
            .filter_map(|square| self.piece(square))
            .collect()
    }

    pub fn status(&self) -> Status {
        legal::status(&self.position)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        legal::is_check(&self.position)
    }

    pub fn is_checkmate(&self) -> bool {
        legal::is_checkmate(&self.position)
    }

    pub fn is_stalemate(&self) -> bool {
        legal::is_stalemate(&self.position)
    }

    /// Plays a move given in internal format.
    ///
    /// Only origin, destination and promotion piece are compared against the
    /// legal moves; castle, double push and en passant flags are taken from
    /// the matching legal move.
    pub fn play_move(&mut self, m: Move) -> Result<&MoveRecord, GameError> {
        let legal = self
            .legal_moves()
            .as_slice()
            .iter()
            .copied()
            .find(|candidate| {
                candidate.from() == m.from()
                    && candidate.to() == m.to()
                    && candidate.flag().promotion_piece() == m.flag().promotion_piece()
            });
        match legal {
            Some(legal) => self.commit(legal),
            None => Err(self.rejected(GameError::IllegalMove(m.to_uci()), &m.to_uci())),
        }
    }

    /// Plays a move given in SAN notation for the side to move.
    pub fn play_san(&mut self, san: &str) -> Result<&MoveRecord, GameError> {
        let m = san_to_move(&self.position, san).map_err(|err| self.rejected(err.into(), san))?;
        self.commit(m)
    }

    /// Plays a SAN move for `color`, which must be the side to move.
    pub fn play(&mut self, color: Color, san: &str) -> Result<&MoveRecord, GameError> {
        let expected = self.position.side_to_move;
        if color != expected {
            return Err(self.rejected(
                GameError::WrongTurn {
                    expected,
                    given: color,
                },
                san,
            ));
        }
        self.play_san(san)
    }

    /// Plays the move that turns the current placement into the one in
    /// `after` and returns its SAN.
    pub fn play_fen(&mut self, after: &str) -> Result<String, GameError> {
        let found = move_between(&self.position, after)
            .map_err(|err| self.rejected(err.into(), after))?;
        let m = found
            .ok_or_else(|| self.rejected(GameError::NoMoveBetween(after.to_string()), after))?;
        Ok(self.commit(m)?.san.clone())
    }

    /// Movetext of the game so far, e.g. `1.e4 e5 2.Nf3`.
    pub fn movetext(&self) -> String {
        let mut number = self.start_pos.fullmove_number;
        let mut parts = Vec::with_capacity(self.history.len());
        for (i, record) in self.history.iter().enumerate() {
            match record.color {
                Color::White => parts.push(format!("{}.{}", number, record.san)),
                Color::Black => {
                    if i == 0 {
                        parts.push(format!("{}...{}", number, record.san));
                    } else {
                        parts.push(record.san.clone());
                    }
                    number += 1;
                }
            }
        }
        parts.join(" ")
    }

    /// Asks `recommender` for a move in the current game.
    pub fn recommend(&self, recommender: &dyn MoveRecommender) -> Option<String> {
        recommender.recommend(&self.movetext())
    }

    /// Writes `m` in SAN for the current position.
    pub fn move_to_san(&self, m: Move) -> String {
        move_to_san(&self.position, m)
    }

    fn commit(&mut self, m: Move) -> Result<&MoveRecord, GameError> {
        let san = move_to_san(&self.position, m);
        let mut next = self.position.clone();
        let applied = next.apply(m).map_err(|err| self.rejected(err.into(), &san))?;
        let check = legal::is_check(&next);
        let mate = check && legal::legal_moves(&next).is_empty();

        tracing::trace!(san = %san, fen = %next.to_fen(), "move applied");
        self.position = next;
        self.history.push(MoveRecord {
            color: applied.color,
            piece: applied.piece,
            from: m.from(),
            to: m.to(),
            flag: m.flag(),
            captured: applied.captured,
            check,
            mate,
            san,
        });
        Ok(&self.history[self.history.len() - 1])
    }

    fn rejected(&self, err: GameError, input: &str) -> GameError {
        tracing::debug!(error = %err, input, fen = %self.position.to_fen(), "move rejected");
        err
    }
}
