use log::{debug, info, warn};

use crate::{
    board::{Board, BoardMove, MoveMode},
    color::Color,
    command::ChessMoveCommand,
    notation::{Notation, StandardNotation},
    piece::{PieceInfo, PieceKind, PieceRecord},
    square::Square,
    status::GameStatus,
};

/// One atomic step of a move. Replaying the reversed steps backwards undoes the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
    Move(BoardMove),
    Remove { piece: PieceRecord, from: Square },
    Add { piece: PieceRecord, to: Square },
}
impl Change {
    pub fn reversed(self) -> Self {
        match self {
            Change::Move(board_move) => Change::Move(board_move.reversed()),
            Change::Remove { piece, from } => Change::Add { piece, to: from },
            Change::Add { piece, to } => Change::Remove { piece, from: to },
        }
    }
    fn apply(self, board: &mut Board, mode: MoveMode) {
        match self {
            Change::Move(board_move) => board.move_piece(board_move, mode),
            Change::Remove { from, .. } => {
                board.remove_piece_with(from, mode);
            }
            Change::Add { piece, to } => board.restore_piece(piece, to, mode),
        }
    }
}

/// History entry of a played move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessMove {
    pub color: Color,
    pub notation: String,
    pub changes: Vec<Change>,
    pub status: GameStatus,
    /// Pieces standing on a new square after the move.
    pub moved_pieces: Vec<PieceInfo>,
    previous_en_passant: Option<Square>,
}
impl ChessMove {
    /// Squares left empty by the move.
    pub fn vacated_squares<'a>(&'a self, board: &'a Board) -> impl Iterator<Item = Square> + 'a {
        self.changes
            .iter()
            .filter_map(|change| match change {
                Change::Move(board_move) => Some(board_move.from),
                Change::Remove { from, .. } => Some(*from),
                Change::Add { .. } => None,
            })
            .filter(|square| board.is_free(*square))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum MoveEvent<'a> {
    Played(&'a ChessMove),
    Reverted(&'a ChessMove),
}

/// Plays validated commands on a board and takes them back.
pub struct MoveExecutor {
    notation: Box<dyn Notation>,
    listener: Option<Box<dyn FnMut(MoveEvent<'_>)>>,
}
impl MoveExecutor {
    pub fn new() -> Self {
        MoveExecutor::with_notation(StandardNotation)
    }
    pub fn with_notation(notation: impl Notation + 'static) -> Self {
        MoveExecutor {
            notation: Box::new(notation),
            listener: None,
        }
    }
    pub fn set_listener(&mut self, listener: impl FnMut(MoveEvent<'_>) + 'static) {
        self.listener = Some(Box::new(listener));
    }
    /// Plays `command` and flips the color on move. The command is trusted to be legal.
    pub fn process(&mut self, board: &mut Board, command: ChessMoveCommand) {
        let board_move = command.board_move();
        let Some(piece) = board.piece_at(board_move.from) else {
            warn!("ignoring {board_move:?}, there is no piece at {}", board_move.from);
            return;
        };
        let color = piece.color();
        let mover = piece.record();
        let double_step = piece.kind() == PieceKind::Pawn
            && board_move.from.row().abs_diff(board_move.to.row()) == 2;
        let mut notation = self.notation.describe(board, &command);
        let Some(changes) = changes(board, command, mover) else {
            warn!("ignoring {command:?}, the captured piece is missing");
            return;
        };
        for change in &changes {
            change.apply(board, MoveMode::Normal);
        }
        let previous_en_passant = board.possible_en_passant();
        let en_passant = if double_step {
            board_move.from.step(color.forward())
        } else {
            None
        };
        board.set_possible_en_passant(en_passant);
        board.flip_color_on_move();
        let status = board.status();
        notation.push_str(self.notation.status_suffix(status));
        let moved_pieces = changes
            .iter()
            .filter_map(|change| match change {
                Change::Move(board_move) => Some(board_move.to),
                Change::Add { to, .. } => Some(*to),
                Change::Remove { .. } => None,
            })
            .filter_map(|square| board.piece_at(square))
            .map(|piece| piece.info())
            .collect();
        let chess_move = ChessMove {
            color,
            notation,
            changes,
            status,
            moved_pieces,
            previous_en_passant,
        };
        debug!("{color} played {}, {status}", chess_move.notation);
        if let Some(listener) = &mut self.listener {
            listener(MoveEvent::Played(&chess_move));
        }
        board.push_history(chess_move);
    }
    /// Takes back the last move. Does nothing on an empty history.
    pub fn revert(&mut self, board: &mut Board) {
        let Some(chess_move) = board.pop_history() else {
            return;
        };
        for change in chess_move.changes.iter().rev() {
            change.reversed().apply(board, MoveMode::Revert);
        }
        board.set_possible_en_passant(chess_move.previous_en_passant);
        board.flip_color_on_move();
        info!("{} reverted {}", chess_move.color, chess_move.notation);
        if let Some(listener) = &mut self.listener {
            listener(MoveEvent::Reverted(&chess_move));
        }
    }
}
impl Default for MoveExecutor {
    fn default() -> Self {
        MoveExecutor::new()
    }
}
fn changes(board: &Board, command: ChessMoveCommand, mover: PieceRecord) -> Option<Vec<Change>> {
    let relocation = |board_move: BoardMove, promotion: Option<PieceKind>| match promotion {
        None => vec![Change::Move(board_move)],
        Some(kind) => vec![
            Change::Remove {
                piece: mover,
                from: board_move.from,
            },
            Change::Add {
                piece: PieceRecord {
                    kind,
                    move_counter: 0,
                    ..mover
                },
                to: board_move.to,
            },
        ],
    };
    let changes = match command {
        ChessMoveCommand::Move {
            board_move,
            promotion,
        } => relocation(board_move, promotion),
        ChessMoveCommand::Take {
            board_move,
            promotion,
        } => {
            let captured = board.piece_at(board_move.to)?.record();
            let mut changes = vec![Change::Remove {
                piece: captured,
                from: board_move.to,
            }];
            changes.extend(relocation(board_move, promotion));
            changes
        }
        ChessMoveCommand::Castling(castling) => vec![
            Change::Move(castling.king_move()),
            Change::Move(castling.rook_move()),
        ],
        ChessMoveCommand::EnPassant { board_move, taken } => {
            let captured = board.piece_at(taken)?.record();
            vec![
                Change::Move(board_move),
                Change::Remove {
                    piece: captured,
                    from: taken,
                },
            ]
        }
    };
    Some(changes)
}
