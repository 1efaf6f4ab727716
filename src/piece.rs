use std::fmt::{self, Display, Formatter};

use crate::{
    board::Board,
    calculator::{CalculatedMoves, MoveCalculator},
    color::Color,
    direction::Direction,
    square::Square,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceKind {
    pub const PROMOTION_CHOICES: [Self; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];
    pub const STARTING_CONFIGURATION: [Self; 8] = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
    ];

    /// Material value, the king outweighs everything.
    pub fn weight(self) -> u8 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight | PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 100,
        }
    }
    /// Directions this piece attacks along at any distance.
    pub fn profile(self) -> &'static [Direction] {
        match self {
            PieceKind::Bishop => &Direction::DIAGONALS,
            PieceKind::Rook => &Direction::STRAIGHTS,
            PieceKind::Queen => &Direction::ALL,
            PieceKind::Pawn | PieceKind::Knight | PieceKind::King => &[],
        }
    }
    pub fn is_long_range(self) -> bool {
        !self.profile().is_empty()
    }
    pub fn slides_towards(self, direction: Direction) -> bool {
        self.profile().contains(&direction)
    }
    pub fn uppercase(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
    pub fn from_uppercase(c: char) -> Option<Self> {
        let piece = match c {
            'P' => PieceKind::Pawn,
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'R' => PieceKind::Rook,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            _ => return None,
        };
        Some(piece)
    }
    pub fn figurine(self, color: Color) -> char {
        match (color, self) {
            (Color::White, PieceKind::Pawn) => '♙',
            (Color::White, PieceKind::Knight) => '♘',
            (Color::White, PieceKind::Bishop) => '♗',
            (Color::White, PieceKind::Rook) => '♖',
            (Color::White, PieceKind::Queen) => '♕',
            (Color::White, PieceKind::King) => '♔',
            (Color::Black, PieceKind::Pawn) => '♟',
            (Color::Black, PieceKind::Knight) => '♞',
            (Color::Black, PieceKind::Bishop) => '♝',
            (Color::Black, PieceKind::Rook) => '♜',
            (Color::Black, PieceKind::Queen) => '♛',
            (Color::Black, PieceKind::King) => '♚',
        }
    }
}
impl Display for PieceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn")?,
            PieceKind::Knight => write!(f, "knight")?,
            PieceKind::Bishop => write!(f, "bishop")?,
            PieceKind::Rook => write!(f, "rook")?,
            PieceKind::Queen => write!(f, "queen")?,
            PieceKind::King => write!(f, "king")?,
        }
        Ok(())
    }
}

/// Index of a piece in the board's arena. Stable while the piece lives, promotion included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) usize);

impl PieceId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}
impl Display for PieceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)?;
        Ok(())
    }
}

/// A piece to be put on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub color: Color,
    pub kind: PieceKind,
    pub square: Square,
}
impl Placement {
    pub fn new(color: Color, kind: PieceKind, square: Square) -> Self {
        Placement {
            color,
            kind,
            square,
        }
    }
}

/// Snapshot of a piece, detached from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceInfo {
    pub id: PieceId,
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
}
impl Display for PieceInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}", self.color, self.kind, self.square)?;
        Ok(())
    }
}

/// Everything needed to bring a removed piece back exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceRecord {
    pub id: PieceId,
    pub kind: PieceKind,
    pub color: Color,
    pub move_counter: u32,
}

#[derive(Debug)]
pub struct Piece {
    pub(crate) id: PieceId,
    pub(crate) kind: PieceKind,
    pub(crate) color: Color,
    pub(crate) square: Square,
    pub(crate) calculator: MoveCalculator,
}
impl Piece {
    pub(crate) fn new(record: PieceRecord, square: Square) -> Self {
        Piece {
            id: record.id,
            kind: record.kind,
            color: record.color,
            square,
            calculator: MoveCalculator::new(record.kind, record.color, square, record.move_counter),
        }
    }
    pub fn id(&self) -> PieceId {
        self.id
    }
    pub fn kind(&self) -> PieceKind {
        self.kind
    }
    pub fn color(&self) -> Color {
        self.color
    }
    pub fn square(&self) -> Square {
        self.square
    }
    pub fn info(&self) -> PieceInfo {
        PieceInfo {
            id: self.id,
            kind: self.kind,
            color: self.color,
            square: self.square,
        }
    }
    pub fn record(&self) -> PieceRecord {
        PieceRecord {
            id: self.id,
            kind: self.kind,
            color: self.color,
            move_counter: self.move_counter(),
        }
    }
    pub fn move_counter(&self) -> u32 {
        self.calculator.move_counter()
    }
    pub fn calculated<'a>(&'a self, board: &Board) -> &'a CalculatedMoves {
        debug_assert_eq!(self.calculator.square(), self.square);
        self.calculator.calculated(board)
    }
    pub fn possible_moves<'a>(&'a self, board: &Board) -> &'a [Square] {
        &self.calculated(board).possible_moves
    }
    pub fn can_move_to(&self, board: &Board, square: Square) -> bool {
        self.possible_moves(board).contains(&square)
    }
    pub fn figurine(&self) -> char {
        self.kind.figurine(self.color)
    }
}
