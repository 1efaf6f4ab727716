use super::{CalculatedMoves, Context, respond_to_check, survey};

/// Rooks, bishops and queens: rays along the piece's profile, cut down to the pin axis.
pub(super) fn calculate(context: &Context) -> CalculatedMoves {
    let survey = survey(context);
    let directions: Vec<_> = context
        .kind
        .profile()
        .iter()
        .copied()
        .filter(|direction| survey.allows(*direction))
        .collect();
    let mut moves = survey.into_moves();
    for direction in directions {
        for target in context.square.line(direction) {
            let occupant = context.board.piece_at(target);
            moves.visit(context.color, target, occupant);
            if occupant.is_some() {
                break;
            }
        }
    }
    respond_to_check(context, moves)
}
#[cfg(test)]
mod test {
    use crate::{board::Board, color::Color, square};

    #[test]
    fn rook_stops_at_first_piece() {
        let mut board = Board::new();
        board.load(Color::White, "Ra1 a4 Kh1").unwrap();
        board.load(Color::Black, "Kh8 d1").unwrap();
        let rook = board.calculated(square!("a1")).unwrap();
        let mut moves = rook.possible_moves.clone();
        moves.sort();
        assert_eq!(
            moves,
            [
                square!("a2"),
                square!("a3"),
                square!("b1"),
                square!("c1"),
                square!("d1")
            ]
        );
        assert_eq!(rook.defends.len(), 1);
        assert_eq!(rook.possible_victims.len(), 1);
        assert_eq!(rook.controlled_squares.len(), 4);
    }
    #[test]
    fn bishop_pinned_on_file_cannot_move() {
        let mut board = Board::new();
        board.load(Color::White, "Ke1 Be2").unwrap();
        board.load(Color::Black, "Ke8 Re7").unwrap();
        let bishop = board.calculated(square!("e2")).unwrap();
        assert!(bishop.possible_moves.is_empty());
        assert!(bishop.pin_info.is_some());
    }
}
