use super::{CalculatedMoves, Context, respond_to_check, survey};

pub(super) fn calculate(context: &Context) -> CalculatedMoves {
    let survey = survey(context);
    let pinned = survey.pin_axis.is_some();
    let mut moves = survey.into_moves();
    if !pinned {
        for target in context.square.knight_jumps() {
            moves.visit(context.color, target, context.board.piece_at(target));
        }
    }
    respond_to_check(context, moves)
}
#[cfg(test)]
mod test {
    use crate::{board::Board, color::Color, square};

    #[test]
    fn corner_knight() {
        let mut board = Board::new();
        board.load(Color::White, "Na1 b3").unwrap();
        board.load(Color::Black, "c2").unwrap();
        let knight = board.calculated(square!("a1")).unwrap();
        assert_eq!(knight.possible_moves, [square!("c2")]);
        assert_eq!(knight.possible_victims[0].square, square!("c2"));
        assert_eq!(knight.defends[0].square, square!("b3"));
    }
    #[test]
    fn pinned_knight_has_no_moves() {
        let mut board = Board::new();
        board.load(Color::White, "Ke1 Ne2").unwrap();
        board.load(Color::Black, "Ke8 Re7").unwrap();
        let knight = board.calculated(square!("e2")).unwrap();
        assert!(knight.possible_moves.is_empty());
        assert_eq!(knight.possible_attackers.len(), 1);
    }
}
