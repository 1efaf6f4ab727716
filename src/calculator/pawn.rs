use crate::{direction::Direction, piece::PieceKind, square::Square};

use super::{CalculatedMoves, Context, respond_to_check, survey};

pub(super) fn calculate(context: &Context) -> CalculatedMoves {
    let Context {
        board,
        square,
        color,
        ..
    } = *context;
    let survey = survey(context);
    let forward = color.forward();
    let allowed: Vec<_> = Direction::ALL
        .into_iter()
        .filter(|direction| survey.allows(*direction))
        .collect();
    let mut moves = survey.into_moves();
    if allowed.contains(&forward) {
        if let Some(single) = square.step(forward).filter(|target| board.is_free(*target)) {
            moves.possible_moves.push(single);
            if square.row() == color.pawn_row() {
                if let Some(double) = single.step(forward).filter(|target| board.is_free(*target)) {
                    moves.possible_moves.push(double);
                }
            }
        }
    }
    for direction in color.pawn_attacks() {
        if !allowed.contains(&direction) {
            continue;
        }
        let Some(target) = square.step(direction) else {
            continue;
        };
        match board.piece_at(target) {
            None => moves.controlled_squares.push(target),
            occupant => moves.visit(color, target, occupant),
        }
        if let Some(en_passant) = en_passant(context, direction) {
            moves.possible_moves.push(en_passant);
        }
    }
    respond_to_check(context, moves)
}
/// Target square of an en passant capture towards `direction`, when one is legal.
fn en_passant(context: &Context, direction: Direction) -> Option<Square> {
    let Context {
        board,
        square,
        color,
        ..
    } = *context;
    let target = board.possible_en_passant()?;
    if square.row() != color.en_passant_row() || square.step(direction) != Some(target) {
        return None;
    }
    let taken = target.step(color.forward().opposite())?;
    board
        .piece_at(taken)
        .filter(|piece| piece.kind == PieceKind::Pawn && piece.color != color)?;
    (!exposes_king(context, taken, target)).then_some(target)
}
/// Whether taking en passant leaves the own king open to a slider, the one case a pin
/// along the row cannot describe since two pieces leave it at once.
fn exposes_king(context: &Context, taken: Square, target: Square) -> bool {
    let Context {
        board,
        square,
        color,
        ..
    } = *context;
    let Some(king) = board.king(color) else {
        return false;
    };
    Direction::ALL.into_iter().any(|direction| {
        king.square
            .line(direction)
            .filter(|on_line| *on_line != square && *on_line != taken)
            .find(|on_line| *on_line == target || !board.is_free(*on_line))
            .and_then(|on_line| board.piece_at(on_line).filter(|_| on_line != target))
            .is_some_and(|piece| {
                piece.color != color && piece.kind.slides_towards(direction.opposite())
            })
    })
}
#[cfg(test)]
mod test {
    use crate::{board::Board, color::Color, square, square::Square};

    fn moves(board: &Board, square: Square) -> Vec<Square> {
        let mut moves = board.calculated(square).unwrap().possible_moves.clone();
        moves.sort();
        moves
    }
    #[test]
    fn single_and_double_step() {
        let mut board = Board::new();
        board.load(Color::White, "c2").unwrap();
        assert_eq!(moves(&board, square!("c2")), [square!("c3"), square!("c4")]);
    }
    #[test]
    fn blocked_double_step() {
        let mut board = Board::new();
        board.load(Color::White, "c2").unwrap();
        board.load(Color::Black, "c4").unwrap();
        assert_eq!(moves(&board, square!("c2")), [square!("c3")]);
    }
    #[test]
    fn pinned_on_diagonal_cannot_advance() {
        let mut board = Board::new();
        board.load(Color::White, "Ke1 d2").unwrap();
        board.load(Color::Black, "Qa5").unwrap();
        assert!(moves(&board, square!("d2")).is_empty());
    }
    #[test]
    fn pinned_on_file_still_advances() {
        let mut board = Board::new();
        board.load(Color::White, "Ke1 e2").unwrap();
        board.load(Color::Black, "Qe5").unwrap();
        assert_eq!(moves(&board, square!("e2")), [square!("e3"), square!("e4")]);
    }
    #[test]
    fn pinned_pawn_takes_its_pinner() {
        let mut board = Board::new();
        board.load(Color::White, "Ke1 d2").unwrap();
        board.load(Color::Black, "Qc3").unwrap();
        let calculated = board.calculated(square!("d2")).unwrap();
        assert_eq!(calculated.possible_moves, [square!("c3")]);
        assert_eq!(calculated.possible_victims[0].square, square!("c3"));
    }
    #[test]
    fn en_passant_right_after_double_step() {
        let mut board = Board::new();
        board.load(Color::White, "Ke1 e5").unwrap();
        board.load(Color::Black, "Ke8 f5").unwrap();
        board.set_possible_en_passant(Some(square!("f6")));
        assert_eq!(moves(&board, square!("e5")), [square!("e6"), square!("f6")]);
        board.set_possible_en_passant(None);
        assert_eq!(moves(&board, square!("e5")), [square!("e6")]);
    }
    #[test]
    fn en_passant_exposing_king_on_row() {
        let mut board = Board::new();
        board.load(Color::White, "Ka5 b5").unwrap();
        board.load(Color::Black, "Ke8 c5 Rh5").unwrap();
        board.set_possible_en_passant(Some(square!("c6")));
        assert_eq!(moves(&board, square!("b5")), [square!("b6")]);
    }
    #[test]
    fn en_passant_answers_pawn_check() {
        let mut board = Board::new();
        board.load(Color::White, "Ke4 e5 Rh1").unwrap();
        board.load(Color::Black, "Ke8 d5").unwrap();
        board.set_possible_en_passant(Some(square!("d6")));
        assert_eq!(moves(&board, square!("e5")), [square!("d6")]);
        assert!(
            board
                .calculated(square!("h1"))
                .unwrap()
                .possible_moves
                .is_empty()
        );
    }
}
