use crate::{
    board::Board,
    command::ChessMoveCommand,
    piece::PieceKind,
    status::GameStatus,
};

/// Text written into the move history.
pub trait Notation {
    /// Describes `command` in the position before it is played.
    fn describe(&self, board: &Board, command: &ChessMoveCommand) -> String;
    /// Appended once the position after the move is known.
    fn status_suffix(&self, status: GameStatus) -> &'static str {
        match status {
            GameStatus::Check { .. } => "+",
            GameStatus::Checkmate { .. } => "#",
            GameStatus::Normal | GameStatus::Stalemate => "",
        }
    }
}

/// Short algebraic notation: `e4`, `Nbd2`, `exd6`, `O-O`, `e8=Q`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardNotation;

impl Notation for StandardNotation {
    fn describe(&self, board: &Board, command: &ChessMoveCommand) -> String {
        if let ChessMoveCommand::Castling(castling) = command {
            return castling.to_string();
        }
        let board_move = command.board_move();
        let Some(piece) = board.piece_at(board_move.from) else {
            return board_move.to_string();
        };
        let mut text = String::new();
        if piece.kind() == PieceKind::Pawn {
            if command.is_capture() {
                text.push(board_move.from.column().letter());
            }
        } else {
            text.push(piece.kind().uppercase());
            let rivals: Vec<_> = board
                .pieces(piece.color())
                .filter(|other| {
                    other.id() != piece.id()
                        && other.kind() == piece.kind()
                        && other.can_move_to(board, board_move.to)
                })
                .map(|other| other.square())
                .collect();
            if !rivals.is_empty() {
                let from = board_move.from;
                if rivals.iter().all(|rival| rival.column() != from.column()) {
                    text.push(from.column().letter());
                } else if rivals.iter().all(|rival| rival.row() != from.row()) {
                    text.push_str(&from.row().to_string());
                } else {
                    text.push_str(&from.to_string());
                }
            }
        }
        if command.is_capture() {
            text.push('x');
        }
        text.push_str(&board_move.to.to_string());
        if let Some(promotion) = command.promotion() {
            text.push('=');
            text.push(promotion.uppercase());
        }
        text
    }
}
