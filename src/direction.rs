use std::fmt::{self, Display, Formatter};

use crate::square::Offset;

/// One of the eight compass directions. `Up` points towards row 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}
impl Direction {
    pub const ALL: [Self; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];
    pub const STRAIGHTS: [Self; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
    pub const DIAGONALS: [Self; 4] = [
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::UpLeft => Direction::DownRight,
            Direction::UpRight => Direction::DownLeft,
            Direction::DownLeft => Direction::UpRight,
            Direction::DownRight => Direction::UpLeft,
        }
    }
    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::UpLeft | Direction::UpRight | Direction::DownLeft | Direction::DownRight
        )
    }
    pub fn is_straight(self) -> bool {
        !self.is_diagonal()
    }
    pub fn offset(self) -> Offset {
        let (x, y) = match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::UpLeft => (-1, 1),
            Direction::UpRight => (1, 1),
            Direction::DownLeft => (-1, -1),
            Direction::DownRight => (1, -1),
        };
        Offset { x, y }
    }
    /// The direction of a rook or bishop line containing `offset`, if there is one.
    pub fn from_offset(offset: Offset) -> Option<Self> {
        if offset == Offset::ZERO
            || !(offset.x == 0 || offset.y == 0 || offset.x.abs() == offset.y.abs())
        {
            return None;
        }
        let unit = offset.as_unit();
        Direction::ALL
            .into_iter()
            .find(|direction| direction.offset() == unit)
    }
    /// Same axis, either way.
    pub fn is_on_axis(self, axis: Self) -> bool {
        self == axis || self == axis.opposite()
    }
}
impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up")?,
            Direction::Down => write!(f, "down")?,
            Direction::Left => write!(f, "left")?,
            Direction::Right => write!(f, "right")?,
            Direction::UpLeft => write!(f, "up-left")?,
            Direction::UpRight => write!(f, "up-right")?,
            Direction::DownLeft => write!(f, "down-left")?,
            Direction::DownRight => write!(f, "down-right")?,
        }
        Ok(())
    }
}
#[cfg(test)]
mod test {
    use crate::{direction::Direction, square::Offset};

    #[test]
    fn opposite_is_involution() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_eq!(direction.offset(), -direction.opposite().offset());
        }
    }
    #[test]
    fn offsets_off_lines_have_no_direction() {
        assert_eq!(Direction::from_offset(Offset { x: 1, y: 2 }), None);
        assert_eq!(Direction::from_offset(Offset::ZERO), None);
        assert_eq!(
            Direction::from_offset(Offset { x: -3, y: 3 }),
            Some(Direction::UpLeft)
        );
        assert_eq!(
            Direction::from_offset(Offset { x: 0, y: -5 }),
            Some(Direction::Down)
        );
    }
}
