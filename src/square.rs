use std::{
    fmt::{self, Debug, Display, Formatter},
    num::NonZero,
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

use thiserror::Error;

use crate::{color::Color, direction::Direction};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareError {
    #[error("found `{0}`, characters from `a` to `h` were expected instead")]
    InvalidColumn(char),
    #[error("found `{0}`, characters from `1` to `8` were expected instead")]
    InvalidRow(char),
    #[error("column {column} and row {row} is outside of the board")]
    OutOfRange { column: u8, row: u8 },
    #[error("provided string have length of {0} characters, 2 were expected")]
    NotEnoughCharacter(u8),
    #[error("unexpected `{0}`")]
    Unexpected(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}
impl Column {
    pub const ALL: [Self; 8] = [
        Column::A,
        Column::B,
        Column::C,
        Column::D,
        Column::E,
        Column::F,
        Column::G,
        Column::H,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }
    pub fn letter(self) -> char {
        (b'a' + self.index()) as char
    }
    pub fn from_letter(letter: char) -> Result<Self, SquareError> {
        match letter {
            'a'..='h' => Ok(Column::ALL[(letter as u8 - b'a') as usize]),
            _ => Err(SquareError::InvalidColumn(letter)),
        }
    }
}
impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())?;
        Ok(())
    }
}

// Bit structure: 10XXXYYY
// X is the column, Y is the row counted from 0
// first two bits is always `10` for `NonZero` size optimizations
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(NonZero<u8>);

impl Square {
    const fn from_xy(x: u8, y: u8) -> Self {
        debug_assert!(x < 8);
        debug_assert!(y < 8);
        match NonZero::new(0b1000_0000 | (x << 3) | y) {
            Some(byte) => Square(byte),
            None => unreachable!(),
        }
    }
    /// `column` counts from 0 (`a`), `row` from 1.
    pub fn new(column: u8, row: u8) -> Result<Self, SquareError> {
        if column >= 8 || !(1..=8).contains(&row) {
            return Err(SquareError::OutOfRange { column, row });
        }
        Ok(Square::from_xy(column, row - 1))
    }
    /// `row` counts from 1.
    pub fn from_column(column: Column, row: u8) -> Result<Self, SquareError> {
        Square::new(column.index(), row)
    }
    /// For rows known to be on the board, such as a color's home row.
    pub(crate) fn on_row(column: Column, row: u8) -> Self {
        debug_assert!((1..=8).contains(&row));
        Square::from_xy(column.index(), row - 1)
    }
    pub fn from_chars(column: char, row: char) -> Result<Self, SquareError> {
        let x = Column::from_letter(column)?.index();
        let y = match row {
            '1'..='8' => row as u8 - b'1',
            _ => return Err(SquareError::InvalidRow(row)),
        };
        Ok(Square::from_xy(x, y))
    }
    /// Used by the `square!` macro, panics on anything that is not a square name.
    pub const fn from_literal(literal: &str) -> Self {
        let bytes = literal.as_bytes();
        assert!(bytes.len() == 2, "square literal must have two characters");
        let x = match bytes[0] {
            b'a'..=b'h' => bytes[0] - b'a',
            _ => panic!("square literal column must be within `a` to `h`"),
        };
        let y = match bytes[1] {
            b'1'..=b'8' => bytes[1] - b'1',
            _ => panic!("square literal row must be within `1` to `8`"),
        };
        Square::from_xy(x, y)
    }
    fn x(self) -> u8 {
        (self.0.get() >> 3) & 0b_111
    }
    fn y(self) -> u8 {
        self.0.get() & 0b_111
    }
    pub fn column(self) -> Column {
        Column::ALL[self.x() as usize]
    }
    /// From 1 to 8.
    pub fn row(self) -> u8 {
        self.y() + 1
    }
    /// Dense index from 0 to 63, `a1` first.
    pub fn index(self) -> usize {
        usize::from(self.y()) * 8 + usize::from(self.x())
    }
    pub fn all() -> impl Iterator<Item = Self> {
        (0..8).flat_map(|y| (0..8).map(move |x| Square::from_xy(x, y)))
    }
    pub fn offset(self, offset: Offset) -> Option<Self> {
        let x = self.x().checked_add_signed(offset.x)?;
        let y = self.y().checked_add_signed(offset.y)?;
        (x < 8 && y < 8).then(|| Square::from_xy(x, y))
    }
    pub fn step(self, direction: Direction) -> Option<Self> {
        self.offset(direction.offset())
    }
    /// Every square towards `direction`, excluding `self`, up to the edge.
    pub fn line(self, direction: Direction) -> impl Iterator<Item = Self> {
        let offset = direction.offset();
        (1..8).map_while(move |distance| self.offset(offset * distance))
    }
    pub fn neighbours(self) -> impl Iterator<Item = Self> {
        Offset::KING_MOVES
            .into_iter()
            .filter_map(move |offset| self.offset(offset))
    }
    pub fn knight_jumps(self) -> impl Iterator<Item = Self> {
        Offset::KNIGHT_MOVES
            .into_iter()
            .filter_map(move |offset| self.offset(offset))
    }
    pub fn is_neighbour(self, other: Self) -> bool {
        (other - self).is_king_move()
    }
    pub fn direction_to(self, other: Self) -> Option<Direction> {
        Direction::from_offset(other - self)
    }
    /// Squares strictly between `self` and `other` when both lie on one line.
    pub fn path(self, other: Self) -> Option<impl Iterator<Item = Self>> {
        let direction = self.direction_to(other)?;
        Some(
            self.line(direction)
                .take_while(move |square| *square != other),
        )
    }
    pub fn is_between(self, start: Self, end: Self) -> bool {
        start
            .path(end)
            .is_some_and(|mut path| path.any(|square| square == self))
    }
    pub fn color(self) -> Color {
        if (self.x() + self.y()) % 2 == 0 {
            Color::Black
        } else {
            Color::White
        }
    }
}
impl Display for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column(), self.row())?;
        Ok(())
    }
}
impl Debug for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}
impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let Some(column) = chars.next() else {
            return Err(SquareError::NotEnoughCharacter(0));
        };
        let Some(row) = chars.next() else {
            return Err(SquareError::NotEnoughCharacter(1));
        };
        if let Some(c) = chars.next() {
            return Err(SquareError::Unexpected(c));
        }
        Square::from_chars(column, row)
    }
}
impl Sub<Self> for Square {
    type Output = Offset;

    fn sub(self, rhs: Self) -> Self::Output {
        Offset {
            x: self.x().cast_signed() - rhs.x().cast_signed(),
            y: self.y().cast_signed() - rhs.y().cast_signed(),
        }
    }
}

#[macro_export]
macro_rules! square {
    ($name:literal) => {
        const { $crate::square::Square::from_literal($name) }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: i8,
    pub y: i8,
}
impl Offset {
    pub const ZERO: Self = Offset { x: 0, y: 0 };

    pub const KNIGHT_MOVES: [Self; 8] = [
        Offset { x: -1, y: -2 },
        Offset { x: 1, y: -2 },
        Offset { x: -1, y: 2 },
        Offset { x: 1, y: 2 },
        Offset { x: -2, y: -1 },
        Offset { x: 2, y: -1 },
        Offset { x: -2, y: 1 },
        Offset { x: 2, y: 1 },
    ];
    pub const KING_MOVES: [Self; 8] = [
        Offset { x: -1, y: -1 },
        Offset { x: 0, y: -1 },
        Offset { x: 1, y: -1 },
        Offset { x: -1, y: 0 },
        Offset { x: 1, y: 0 },
        Offset { x: -1, y: 1 },
        Offset { x: 0, y: 1 },
        Offset { x: 1, y: 1 },
    ];

    pub fn as_unit(self) -> Self {
        Offset {
            x: self.x.signum(),
            y: self.y.signum(),
        }
    }
    pub fn is_king_move(self) -> bool {
        (-1..=1).contains(&self.x) && (-1..=1).contains(&self.y) && self != Offset::ZERO
    }
    pub fn is_knight_move(self) -> bool {
        let x = self.x.unsigned_abs();
        let y = self.y.unsigned_abs();
        (x == 1 && y == 2) || (x == 2 && y == 1)
    }
}
impl Neg for Offset {
    type Output = Offset;

    fn neg(self) -> Self::Output {
        Offset {
            x: -self.x,
            y: -self.y,
        }
    }
}
impl Add<Self> for Offset {
    type Output = Offset;

    fn add(self, rhs: Self) -> Self::Output {
        Offset {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}
impl Mul<i8> for Offset {
    type Output = Offset;

    fn mul(self, rhs: i8) -> Self::Output {
        Offset {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}
