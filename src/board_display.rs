use std::fmt::{self, Display, Formatter};

use crate::{board::Board, color::Color, square::Square};

/// Figurine diagram of a board, one row per line with the row number on the right.
pub struct BoardDisplay<'a> {
    pub board: &'a Board,
    pub view: Color,
    pub highlighted: &'a [Square],
}
impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        BoardDisplay {
            board,
            view: Color::White,
            highlighted: &[],
        }
    }
}
impl Display for BoardDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            let row = match self.view {
                Color::White => 8 - row,
                Color::Black => row + 1,
            };
            for column in 0..8 {
                let column = match self.view {
                    Color::White => column,
                    Color::Black => 7 - column,
                };
                let Ok(square) = Square::new(column, row) else {
                    return Err(fmt::Error);
                };
                let figurine = match self.board.piece_at(square) {
                    Some(piece) => piece.figurine(),
                    None if self.highlighted.contains(&square) => '*',
                    None => '·',
                };
                write!(f, "{figurine} ")?;
            }
            writeln!(f, "{row}")?;
        }
        match self.view {
            Color::White => write!(f, "a b c d e f g h")?,
            Color::Black => write!(f, "h g f e d c b a")?,
        }
        writeln!(f, "   {} to move", self.board.color_on_move())?;
        Ok(())
    }
}
#[cfg(test)]
mod test {
    use crate::{board::Board, board_display::BoardDisplay, color::Color, square};

    #[test]
    fn diagram() {
        let mut board = Board::new();
        board.load(Color::White, "Ke1 e4").unwrap();
        board.load(Color::Black, "Ke8").unwrap();
        let text = BoardDisplay {
            board: &board,
            view: Color::White,
            highlighted: &[square!("e5")],
        }
        .to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "· · · · ♚ · · · 8");
        assert_eq!(lines[3], "· · · · * · · · 5");
        assert_eq!(lines[4], "· · · · ♙ · · · 4");
        assert_eq!(lines[7], "· · · · ♔ · · · 1");
        assert_eq!(lines[8], "a b c d e f g h   white to move");
    }
}
