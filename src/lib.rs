#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

//! Chess rules with per-piece move calculators and tactical observations.
//!
//! ```
//! use tactician::{Board, ChessMoveCommand, MoveExecutor, square};
//!
//! let mut board = Board::starting_position();
//! let mut executor = MoveExecutor::new();
//! let command = ChessMoveCommand::parse(&board, "e2e4").unwrap();
//! executor.process(&mut board, command);
//! assert_eq!(board.possible_en_passant(), Some(square!("e3")));
//! ```

pub mod analyzer;
pub mod board;
pub mod board_display;
pub mod calculator;
pub mod color;
pub mod command;
pub mod direction;
pub mod executor;
#[cfg(test)]
mod fuzz;
pub mod notation;
pub mod piece;
pub mod square;
pub mod status;

pub use crate::{
    analyzer::{Observation, ObservationKind, Observations, Threat, analyze, threats},
    board::{Board, BoardChange, BoardEvent, BoardMove, LoadError, MoveMode},
    board_display::BoardDisplay,
    calculator::{CalculatedMoves, PinInfo},
    color::Color,
    command::{ChessMoveCommand, CommandError, ParseCommandError},
    direction::Direction,
    executor::{Change, ChessMove, MoveEvent, MoveExecutor},
    notation::{Notation, StandardNotation},
    piece::{Piece, PieceId, PieceInfo, PieceKind, Placement},
    square::{Column, Square, SquareError},
    status::GameStatus,
};
