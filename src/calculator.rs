use std::cell::OnceCell;

use log::{debug, trace};

use crate::{
    board::{Board, BoardChange, BoardEvent, MoveMode},
    color::Color,
    direction::Direction,
    piece::{Piece, PieceInfo, PieceKind},
    square::Square,
};

mod king;
mod knight;
mod pawn;
mod sliding;

pub use king::attackers_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    Sliding,
    Knight,
    King,
    Pawn,
}
impl From<PieceKind> for Archetype {
    fn from(value: PieceKind) -> Self {
        match value {
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => Archetype::Sliding,
            PieceKind::Knight => Archetype::Knight,
            PieceKind::King => Archetype::King,
            PieceKind::Pawn => Archetype::Pawn,
        }
    }
}

/// Pinned piece together with what it is pinned by and what it shields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinInfo {
    pub attacker: PieceInfo,
    pub covered: PieceInfo,
}

/// Everything known about one piece in the current position.
///
/// `possible_victims` is always a subset of the pieces standing on `possible_moves`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculatedMoves {
    pub possible_moves: Vec<Square>,
    pub possible_victims: Vec<PieceInfo>,
    pub possible_attackers: Vec<PieceInfo>,
    pub defends: Vec<PieceInfo>,
    pub defenders: Vec<PieceInfo>,
    pub controlled_squares: Vec<Square>,
    pub pin_info: Option<PinInfo>,
}
impl CalculatedMoves {
    fn visit(&mut self, color: Color, target: Square, occupant: Option<&Piece>) {
        match occupant {
            None => {
                self.possible_moves.push(target);
                self.controlled_squares.push(target);
            }
            Some(piece) if piece.color == color => self.defends.push(piece.info()),
            Some(piece) => {
                self.possible_moves.push(target);
                self.possible_victims.push(piece.info());
            }
        }
    }
    fn restrict_to(&mut self, forced: &[Square]) {
        self.possible_moves.retain(|square| forced.contains(square));
        self.possible_victims
            .retain(|victim| forced.contains(&victim.square));
        self.controlled_squares
            .retain(|square| forced.contains(square));
    }
}

/// Legality facts of one piece, computed on first read and dropped on every board change.
#[derive(Debug)]
pub struct MoveCalculator {
    kind: PieceKind,
    color: Color,
    square: Square,
    move_counter: u32,
    cache: OnceCell<CalculatedMoves>,
}
impl MoveCalculator {
    pub(crate) fn new(kind: PieceKind, color: Color, square: Square, move_counter: u32) -> Self {
        MoveCalculator {
            kind,
            color,
            square,
            move_counter,
            cache: OnceCell::new(),
        }
    }
    pub fn archetype(&self) -> Archetype {
        self.kind.into()
    }
    pub fn square(&self) -> Square {
        self.square
    }
    /// Number of times this piece moved, reverted moves excluded.
    pub fn move_counter(&self) -> u32 {
        self.move_counter
    }
    pub(crate) fn handle(&mut self, event: &BoardEvent) {
        if let BoardChange::PieceMoved(board_move) = event.change {
            if board_move.from == self.square {
                self.square = board_move.to;
                match event.mode {
                    MoveMode::Normal => self.move_counter += 1,
                    MoveMode::Revert => self.move_counter = self.move_counter.saturating_sub(1),
                }
            }
        }
        self.invalidate();
    }
    pub(crate) fn invalidate(&mut self) {
        self.cache.take();
    }
    pub fn calculated(&self, board: &Board) -> &CalculatedMoves {
        self.cache.get_or_init(|| {
            trace!("calculating {} {} at {}", self.color, self.kind, self.square);
            let context = Context {
                board,
                square: self.square,
                color: self.color,
                kind: self.kind,
                move_counter: self.move_counter,
            };
            let moves = match self.archetype() {
                Archetype::Sliding => sliding::calculate(&context),
                Archetype::Knight => knight::calculate(&context),
                Archetype::King => king::calculate(&context),
                Archetype::Pawn => pawn::calculate(&context),
            };
            debug_assert!(
                moves
                    .possible_victims
                    .iter()
                    .all(|victim| moves.possible_moves.contains(&victim.square)),
                "victims of {} {} at {} are not all reachable",
                self.color,
                self.kind,
                self.square,
            );
            moves
        })
    }
}

#[derive(Clone, Copy)]
struct Context<'a> {
    board: &'a Board,
    square: Square,
    color: Color,
    kind: PieceKind,
    move_counter: u32,
}
impl Context<'_> {
    fn pieces_towards(&self, direction: Direction) -> impl Iterator<Item = &Piece> {
        self.square
            .line(direction)
            .filter_map(|square| self.board.piece_at(square))
    }
    fn nearest_piece(&self, direction: Direction) -> Option<&Piece> {
        self.pieces_towards(direction).next()
    }
}

/// Who attacks and defends a non-king piece, and how it is pinned.
struct Survey {
    attackers: Vec<PieceInfo>,
    defenders: Vec<PieceInfo>,
    pin_axis: Option<Direction>,
    pin_info: Option<PinInfo>,
}
impl Survey {
    fn sort(&mut self, color: Color, piece: &Piece) {
        if piece.color == color {
            self.defenders.push(piece.info());
        } else {
            self.attackers.push(piece.info());
        }
    }
    fn allows(&self, direction: Direction) -> bool {
        self.pin_axis
            .is_none_or(|axis| direction.is_on_axis(axis))
    }
    fn into_moves(self) -> CalculatedMoves {
        CalculatedMoves {
            possible_attackers: self.attackers,
            defenders: self.defenders,
            pin_info: self.pin_info,
            ..CalculatedMoves::default()
        }
    }
}
fn survey(context: &Context) -> Survey {
    let Context {
        board,
        square,
        color,
        kind,
        ..
    } = *context;
    let mut survey = Survey {
        attackers: Vec::new(),
        defenders: Vec::new(),
        pin_axis: None,
        pin_info: None,
    };
    for jump in square.knight_jumps() {
        if let Some(knight) = board
            .piece_at(jump)
            .filter(|piece| piece.kind == PieceKind::Knight)
        {
            survey.sort(color, knight);
        }
    }
    for direction in Direction::DIAGONALS {
        if let Some(pawn) = square.step(direction).and_then(|from| board.piece_at(from)) {
            if pawn.kind == PieceKind::Pawn && pawn.color.pawn_attacks().contains(&direction.opposite())
            {
                survey.sort(color, pawn);
            }
        }
    }
    for direction in Direction::ALL {
        let mut defended = false;
        for (distance, piece) in context.pieces_towards(direction).enumerate() {
            if !piece.kind.slides_towards(direction.opposite()) {
                break;
            }
            if piece.color == color {
                survey.defenders.push(piece.info());
                defended = true;
            } else if !defended {
                survey.attackers.push(piece.info());
                if distance > 0 {
                    continue;
                }
                let Some(covered) = context
                    .nearest_piece(direction.opposite())
                    .filter(|covered| covered.color == color && covered.kind.weight() > kind.weight())
                else {
                    continue;
                };
                debug!(
                    "{color} {kind} at {square} is pinned by {}, covering {}",
                    piece.info(),
                    covered.info(),
                );
                if covered.kind == PieceKind::King {
                    survey.pin_axis = Some(direction);
                }
                if piece.kind.weight() < covered.kind.weight() {
                    survey.pin_info = Some(PinInfo {
                        attacker: piece.info(),
                        covered: covered.info(),
                    });
                }
            }
        }
    }
    for king in [board.king(color), board.king(!color)].into_iter().flatten() {
        if king.square.is_neighbour(square) {
            survey.sort(color, king);
        }
    }
    survey
}

/// Squares a non-king piece is limited to while its king is in check.
fn forced_squares(context: &Context) -> Option<Vec<Square>> {
    let king = context.board.king(context.color)?;
    match king.calculated(context.board).possible_attackers.as_slice() {
        [] => None,
        [attacker] => {
            let mut forced = vec![attacker.square];
            if attacker.kind.is_long_range() {
                forced.extend(king.square.path(attacker.square).into_iter().flatten());
            }
            if context.kind == PieceKind::Pawn && attacker.kind == PieceKind::Pawn {
                let behind = attacker.square.step(attacker.color.forward().opposite());
                if behind.is_some() && behind == context.board.possible_en_passant() {
                    forced.extend(behind);
                }
            }
            Some(forced)
        }
        _ => Some(Vec::new()),
    }
}
fn respond_to_check(context: &Context, mut moves: CalculatedMoves) -> CalculatedMoves {
    if let Some(forced) = forced_squares(context) {
        moves.restrict_to(&forced);
    }
    moves
}
