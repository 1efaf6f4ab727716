use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use crate::{
    board::{Board, BoardMove},
    color::Color,
    piece::PieceKind,
    square::{Column, Square, SquareError},
};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    #[error("there is no piece at {0}")]
    NoPiece(Square),
    #[error("it is {0}'s turn")]
    ColorOnMove(Color),
    #[error("{kind} at {from} cannot move to {to}")]
    CannotMove {
        kind: PieceKind,
        from: Square,
        to: Square,
    },
    #[error("pawn cannot promote into a {0}")]
    InvalidPromotion(PieceKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    King,
    Queen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Castling {
    pub side: CastlingSide,
    pub color: Color,
}
impl Castling {
    fn squares(self, king: Column, rook: (Column, Column)) -> (BoardMove, BoardMove) {
        let row = self.color.home_row();
        let at = |column| Square::on_row(column, row);
        (
            BoardMove::new(at(Column::E), at(king)),
            BoardMove::new(at(rook.0), at(rook.1)),
        )
    }
    pub fn king_move(self) -> BoardMove {
        self.moves().0
    }
    pub fn rook_move(self) -> BoardMove {
        self.moves().1
    }
    fn moves(self) -> (BoardMove, BoardMove) {
        match self.side {
            CastlingSide::King => self.squares(Column::G, (Column::H, Column::F)),
            CastlingSide::Queen => self.squares(Column::C, (Column::A, Column::D)),
        }
    }
}
impl Display for Castling {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.side {
            CastlingSide::King => write!(f, "O-O")?,
            CastlingSide::Queen => write!(f, "O-O-O")?,
        }
        Ok(())
    }
}

/// A move the executor can play without checking it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChessMoveCommand {
    Move {
        board_move: BoardMove,
        promotion: Option<PieceKind>,
    },
    Take {
        board_move: BoardMove,
        promotion: Option<PieceKind>,
    },
    Castling(Castling),
    EnPassant {
        board_move: BoardMove,
        taken: Square,
    },
}
impl ChessMoveCommand {
    /// Validates a move typed as two squares against the current position.
    ///
    /// A pawn reaching the last row becomes a queen unless `promotion` says otherwise.
    pub fn new(
        board: &Board,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Self, CommandError> {
        let piece = board.piece_at(from).ok_or(CommandError::NoPiece(from))?;
        if piece.color() != board.color_on_move() {
            return Err(CommandError::ColorOnMove(board.color_on_move()));
        }
        if !piece.can_move_to(board, to) {
            return Err(CommandError::CannotMove {
                kind: piece.kind(),
                from,
                to,
            });
        }
        let board_move = BoardMove::new(from, to);
        let command = match piece.kind() {
            PieceKind::King if from.column().index().abs_diff(to.column().index()) == 2 => {
                let side = if to.column() == Column::G {
                    CastlingSide::King
                } else {
                    CastlingSide::Queen
                };
                ChessMoveCommand::Castling(Castling {
                    side,
                    color: piece.color(),
                })
            }
            PieceKind::Pawn
                if from.column() != to.column()
                    && board.is_free(to)
                    && board.possible_en_passant() == Some(to) =>
            {
                ChessMoveCommand::EnPassant {
                    board_move,
                    taken: Square::on_row(to.column(), from.row()),
                }
            }
            kind => {
                let promotion = if kind == PieceKind::Pawn && to.row() == piece.color().promotion_row() {
                    let promotion = promotion.unwrap_or(PieceKind::Queen);
                    if !PieceKind::PROMOTION_CHOICES.contains(&promotion) {
                        return Err(CommandError::InvalidPromotion(promotion));
                    }
                    Some(promotion)
                } else {
                    None
                };
                if board.is_free(to) {
                    ChessMoveCommand::Move {
                        board_move,
                        promotion,
                    }
                } else {
                    ChessMoveCommand::Take {
                        board_move,
                        promotion,
                    }
                }
            }
        };
        Ok(command)
    }
    pub fn parse(board: &Board, text: &str) -> Result<Self, ParseCommandError> {
        let text = text.trim();
        let from = text.get(0..2).ok_or(ParseCommandError::TooShort)?.parse()?;
        let to = text.get(2..4).ok_or(ParseCommandError::TooShort)?.parse()?;
        let promotion = match text.get(4..) {
            None | Some("") => None,
            Some(letter) => {
                let mut chars = letter.chars();
                let kind = chars
                    .next()
                    .and_then(|c| PieceKind::from_uppercase(c.to_ascii_uppercase()))
                    .ok_or_else(|| ParseCommandError::Unexpected(letter.to_owned()))?;
                if chars.next().is_some() {
                    return Err(ParseCommandError::Unexpected(letter.to_owned()));
                }
                Some(kind)
            }
        };
        Ok(ChessMoveCommand::new(board, from, to, promotion)?)
    }
    /// The move of the piece that was asked to move.
    pub fn board_move(self) -> BoardMove {
        match self {
            ChessMoveCommand::Move { board_move, .. }
            | ChessMoveCommand::Take { board_move, .. }
            | ChessMoveCommand::EnPassant { board_move, .. } => board_move,
            ChessMoveCommand::Castling(castling) => castling.king_move(),
        }
    }
    pub fn promotion(self) -> Option<PieceKind> {
        match self {
            ChessMoveCommand::Move { promotion, .. } | ChessMoveCommand::Take { promotion, .. } => {
                promotion
            }
            ChessMoveCommand::Castling(_) | ChessMoveCommand::EnPassant { .. } => None,
        }
    }
    pub fn is_capture(self) -> bool {
        matches!(
            self,
            ChessMoveCommand::Take { .. } | ChessMoveCommand::EnPassant { .. }
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("a move needs at least two squares")]
    TooShort,
    #[error("unexpected `{0}` after the squares")]
    Unexpected(String),
    #[error(transparent)]
    Square(#[from] SquareError),
    #[error(transparent)]
    Command(#[from] CommandError),
}
