use std::fmt::{self, Display, Formatter};

use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    board_display::BoardDisplay,
    calculator::CalculatedMoves,
    color::Color,
    executor::ChessMove,
    piece::{Piece, PieceId, PieceKind, PieceRecord, Placement},
    square::{Column, Square, SquareError},
    status::GameStatus,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("unknown piece letter `{0}`")]
    InvalidPiece(char),
    #[error("empty piece token")]
    EmptyToken,
    #[error(transparent)]
    InvalidSquare(#[from] SquareError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardMove {
    pub from: Square,
    pub to: Square,
}
impl BoardMove {
    pub fn new(from: Square, to: Square) -> Self {
        BoardMove { from, to }
    }
    pub fn reversed(self) -> Self {
        BoardMove {
            from: self.to,
            to: self.from,
        }
    }
}
impl Display for BoardMove {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveMode {
    Normal,
    Revert,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoardChange {
    /// Squares that received a piece. Empty once a suppressed bulk setup is done.
    PieceAdded(Vec<Square>),
    PieceMoved(BoardMove),
    PieceRemoved(Square),
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardEvent {
    pub change: BoardChange,
    pub mode: MoveMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Broadcast {
    Notify,
    Suppressed,
}

enum Listener {
    Calculator(PieceId),
    Handler(Box<dyn FnMut(&BoardEvent)>),
}

/// Piece placement, history, and the subscribers notified on every change.
///
/// Handlers are called synchronously while the board is mutably borrowed, so they cannot
/// reach back into it. Cloning is the way to explore positions independently.
pub struct Board {
    pieces: Vec<Option<Piece>>,
    squares: [Option<PieceId>; 64],
    listeners: Vec<Listener>,
    history: Vec<ChessMove>,
    color_on_move: Color,
    possible_en_passant: Option<Square>,
}
impl Board {
    pub fn new() -> Self {
        Board {
            pieces: Vec::new(),
            squares: [None; 64],
            listeners: Vec::new(),
            history: Vec::new(),
            color_on_move: Color::White,
            possible_en_passant: None,
        }
    }
    pub fn starting_position() -> Self {
        let mut board = Board::new();
        board.setup_game();
        board
    }
    pub fn setup_game(&mut self) {
        self.remove_all_pieces();
        let mut placements = Vec::with_capacity(32);
        for color in Color::ALL {
            for (column, kind) in Column::ALL.into_iter().zip(PieceKind::STARTING_CONFIGURATION) {
                placements.push(Placement::new(
                    color,
                    kind,
                    Square::on_row(column, color.home_row()),
                ));
                placements.push(Placement::new(
                    color,
                    PieceKind::Pawn,
                    Square::on_row(column, color.pawn_row()),
                ));
            }
        }
        self.add_pieces_with(placements, Broadcast::Suppressed);
        self.broadcast(&BoardEvent {
            change: BoardChange::PieceAdded(Vec::new()),
            mode: MoveMode::Normal,
        });
        info!("board set up with the starting position");
    }
    pub fn remove_all_pieces(&mut self) {
        self.pieces.clear();
        self.squares = [None; 64];
        self.listeners
            .retain(|listener| matches!(listener, Listener::Handler(_)));
        self.history.clear();
        self.color_on_move = Color::White;
        self.possible_en_passant = None;
        self.broadcast(&BoardEvent {
            change: BoardChange::Cleared,
            mode: MoveMode::Normal,
        });
        info!("board cleared");
    }
    /// Adds pieces written as `Ke1 Qd2 e2`, a missing letter stands for a pawn.
    pub fn load(&mut self, color: Color, pieces: &str) -> Result<Vec<PieceId>, LoadError> {
        let placements = pieces
            .split_whitespace()
            .map(|token| parse_placement(color, token))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.add_pieces(placements))
    }
    pub fn add_piece(&mut self, placement: Placement) -> PieceId {
        let id = self.place(placement);
        self.broadcast(&BoardEvent {
            change: BoardChange::PieceAdded(vec![placement.square]),
            mode: MoveMode::Normal,
        });
        id
    }
    pub fn add_pieces(&mut self, placements: impl IntoIterator<Item = Placement>) -> Vec<PieceId> {
        self.add_pieces_with(placements, Broadcast::Notify)
    }
    pub fn add_pieces_with(
        &mut self,
        placements: impl IntoIterator<Item = Placement>,
        broadcast: Broadcast,
    ) -> Vec<PieceId> {
        let mut ids = Vec::new();
        let mut squares = Vec::new();
        for placement in placements {
            ids.push(self.place(placement));
            squares.push(placement.square);
        }
        match broadcast {
            Broadcast::Notify => self.broadcast(&BoardEvent {
                change: BoardChange::PieceAdded(squares),
                mode: MoveMode::Normal,
            }),
            Broadcast::Suppressed => {
                for piece in self.pieces.iter_mut().flatten() {
                    piece.calculator.invalidate();
                }
            }
        }
        ids
    }
    fn place(&mut self, placement: Placement) -> PieceId {
        let id = PieceId(self.pieces.len());
        self.insert(
            PieceRecord {
                id,
                kind: placement.kind,
                color: placement.color,
                move_counter: 0,
            },
            placement.square,
        );
        id
    }
    fn insert(&mut self, record: PieceRecord, square: Square) {
        if let Some(previous) = self.squares[square.index()] {
            warn!("{square} was occupied, replacing its piece");
            self.pieces[previous.index()] = None;
        }
        let index = record.id.index();
        if index == self.pieces.len() {
            self.pieces.push(None);
            self.listeners.push(Listener::Calculator(record.id));
        }
        debug_assert!(self.pieces[index].is_none(), "{} is still alive", record.id);
        self.pieces[index] = Some(Piece::new(record, square));
        self.squares[square.index()] = Some(record.id);
    }
    /// Puts back a piece that was removed earlier, keeping its id and move counter.
    pub(crate) fn restore_piece(&mut self, record: PieceRecord, square: Square, mode: MoveMode) {
        self.insert(record, square);
        self.broadcast(&BoardEvent {
            change: BoardChange::PieceAdded(vec![square]),
            mode,
        });
    }
    pub fn remove_piece(&mut self, square: Square) -> Option<PieceRecord> {
        self.remove_piece_with(square, MoveMode::Normal)
    }
    pub fn remove_pieces(&mut self, squares: impl IntoIterator<Item = Square>) -> Vec<PieceRecord> {
        squares
            .into_iter()
            .filter_map(|square| self.remove_piece(square))
            .collect()
    }
    pub(crate) fn remove_piece_with(&mut self, square: Square, mode: MoveMode) -> Option<PieceRecord> {
        let id = self.squares[square.index()].take()?;
        let piece = self.pieces[id.index()].take()?;
        let record = piece.record();
        self.broadcast(&BoardEvent {
            change: BoardChange::PieceRemoved(square),
            mode,
        });
        Some(record)
    }
    /// Does nothing when `from` is empty. Whatever stands on `to` is dropped.
    pub fn move_piece(&mut self, board_move: BoardMove, mode: MoveMode) {
        let BoardMove { from, to } = board_move;
        let Some(id) = self.squares[from.index()].take() else {
            warn!("no piece to move at {from}");
            return;
        };
        if let Some(captured) = self.squares[to.index()].replace(id) {
            warn!("{to} was occupied, dropping its piece");
            self.pieces[captured.index()] = None;
        }
        if let Some(piece) = self.pieces[id.index()].as_mut() {
            piece.square = to;
        }
        self.broadcast(&BoardEvent {
            change: BoardChange::PieceMoved(board_move),
            mode,
        });
    }
    /// Registers a handler for every later change. There is no way to unsubscribe.
    pub fn subscribe(&mut self, handler: impl FnMut(&BoardEvent) + 'static) {
        self.listeners.push(Listener::Handler(Box::new(handler)));
    }
    fn broadcast(&mut self, event: &BoardEvent) {
        for listener in &mut self.listeners {
            match listener {
                Listener::Calculator(id) => {
                    if let Some(piece) = self.pieces.get_mut(id.index()).and_then(Option::as_mut) {
                        piece.calculator.handle(event);
                    }
                }
                Listener::Handler(handler) => handler(event),
            }
        }
    }
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.squares[square.index()].and_then(|id| self.piece(id))
    }
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index()).and_then(Option::as_ref)
    }
    pub fn is_free(&self, square: Square) -> bool {
        self.squares[square.index()].is_none()
    }
    pub fn all_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().flatten()
    }
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.all_pieces().filter(move |piece| piece.color == color)
    }
    /// Pieces of `color` in the form [`Board::load`] reads, in the order they were added.
    pub fn dump(&self, color: Color) -> String {
        self.pieces(color)
            .map(|piece| match piece.kind {
                PieceKind::Pawn => piece.square.to_string(),
                kind => format!("{}{}", kind.uppercase(), piece.square),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
    pub fn king(&self, color: Color) -> Option<&Piece> {
        self.pieces(color)
            .find(|piece| piece.kind == PieceKind::King)
    }
    pub fn calculated(&self, square: Square) -> Option<&CalculatedMoves> {
        self.piece_at(square).map(|piece| piece.calculated(self))
    }
    pub fn is_check(&self, color: Color) -> bool {
        self.king(color)
            .is_some_and(|king| !king.calculated(self).possible_attackers.is_empty())
    }
    pub fn has_moves(&self, color: Color) -> bool {
        self.pieces(color)
            .any(|piece| !piece.possible_moves(self).is_empty())
    }
    /// White is looked at before black. Stalemate is only reported for the color on move.
    pub fn status(&self) -> GameStatus {
        for color in Color::ALL {
            if self.king(color).is_none() {
                continue;
            }
            let checked = self.is_check(color);
            if !self.has_moves(color) {
                if checked {
                    return GameStatus::Checkmate { winner: !color };
                } else if color == self.color_on_move {
                    return GameStatus::Stalemate;
                }
            }
            if checked {
                return GameStatus::Check { attacker: !color };
            }
        }
        GameStatus::Normal
    }
    pub fn color_on_move(&self) -> Color {
        self.color_on_move
    }
    pub fn set_color_on_move(&mut self, color: Color) {
        self.color_on_move = color;
        self.invalidate_all();
    }
    pub(crate) fn flip_color_on_move(&mut self) {
        self.color_on_move = !self.color_on_move;
    }
    pub fn moves_history(&self) -> &[ChessMove] {
        &self.history
    }
    pub(crate) fn push_history(&mut self, chess_move: ChessMove) {
        self.history.push(chess_move);
    }
    pub(crate) fn pop_history(&mut self) -> Option<ChessMove> {
        self.history.pop()
    }
    /// Square a pawn may capture onto en passant, right after a double step.
    pub fn possible_en_passant(&self) -> Option<Square> {
        self.possible_en_passant
    }
    pub fn set_possible_en_passant(&mut self, square: Option<Square>) {
        if self.possible_en_passant != square {
            debug!("possible en passant changed to {square:?}");
            self.possible_en_passant = square;
            self.invalidate_all();
        }
    }
    fn invalidate_all(&mut self) {
        for piece in self.pieces.iter_mut().flatten() {
            piece.calculator.invalidate();
        }
    }
    pub fn display(&self) -> BoardDisplay<'_> {
        BoardDisplay::new(self)
    }
}
impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}
impl Clone for Board {
    /// Copies placement, move counters and history. The copy starts with cold caches and
    /// without the handlers subscribed to `self`.
    fn clone(&self) -> Self {
        let pieces = self
            .pieces
            .iter()
            .map(|slot| {
                slot.as_ref()
                    .map(|piece| Piece::new(piece.record(), piece.square))
            })
            .collect::<Vec<_>>();
        let listeners = (0..pieces.len())
            .map(|index| Listener::Calculator(PieceId(index)))
            .collect();
        Board {
            pieces,
            squares: self.squares,
            listeners,
            history: self.history.clone(),
            color_on_move: self.color_on_move,
            possible_en_passant: self.possible_en_passant,
        }
    }
}
impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())?;
        Ok(())
    }
}
fn parse_placement(color: Color, token: &str) -> Result<Placement, LoadError> {
    let mut chars = token.chars();
    let first = chars.next().ok_or(LoadError::EmptyToken)?;
    let (kind, square) = if first.is_ascii_uppercase() {
        let kind = PieceKind::from_uppercase(first).ok_or(LoadError::InvalidPiece(first))?;
        (kind, chars.as_str())
    } else {
        (PieceKind::Pawn, token)
    };
    Ok(Placement::new(color, kind, square.parse()?))
}
