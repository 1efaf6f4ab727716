use crate::{
    board::Board,
    color::Color,
    direction::Direction,
    piece::{PieceInfo, PieceKind},
    square::{Column, Square},
};

use super::{CalculatedMoves, Context};

/// Enemies of `color` that would attack its king if it stood on `target`. The king itself
/// does not block lines, so stepping away from a slider along its line stays forbidden.
pub fn attackers_for(board: &Board, color: Color, target: Square) -> Vec<PieceInfo> {
    let own_king = board.king(color).map(|king| king.square());
    let mut attackers: Vec<_> = target
        .knight_jumps()
        .filter_map(|square| enemy_at(board, color, square, PieceKind::Knight))
        .collect();
    attackers.extend(
        target
            .neighbours()
            .filter_map(|square| enemy_at(board, color, square, PieceKind::King)),
    );
    for direction in Direction::DIAGONALS {
        let pawn = target
            .step(direction)
            .and_then(|square| enemy_at(board, color, square, PieceKind::Pawn))
            .filter(|pawn| pawn.color.pawn_attacks().contains(&direction.opposite()));
        attackers.extend(pawn);
    }
    for direction in Direction::ALL {
        let nearest = target
            .line(direction)
            .filter(|square| Some(*square) != own_king)
            .find_map(|square| board.piece_at(square));
        if let Some(piece) = nearest {
            if piece.color() != color && piece.kind().slides_towards(direction.opposite()) {
                attackers.push(piece.info());
            }
        }
    }
    attackers
}

fn enemy_at(board: &Board, color: Color, square: Square, kind: PieceKind) -> Option<PieceInfo> {
    board
        .piece_at(square)
        .filter(|piece| piece.color() != color && piece.kind() == kind)
        .map(|piece| piece.info())
}
pub(super) fn calculate(context: &Context) -> CalculatedMoves {
    let Context {
        board,
        square,
        color,
        move_counter,
        ..
    } = *context;
    let mut moves = CalculatedMoves::default();
    for target in square.neighbours() {
        let occupant = board.piece_at(target);
        if occupant.is_some_and(|piece| piece.color() == color) {
            moves.visit(color, target, occupant);
            continue;
        }
        if occupant.is_none() {
            moves.controlled_squares.push(target);
        }
        if attackers_for(board, color, target).is_empty() {
            moves.possible_moves.push(target);
            moves.possible_victims.extend(occupant.map(|piece| piece.info()));
        }
    }
    moves.possible_attackers = attackers_for(board, color, square);
    let home = Square::on_row(Column::E, color.home_row());
    if move_counter == 0 && square == home && moves.possible_attackers.is_empty() {
        for (rook, crossed) in [
            (Column::A, [Column::D, Column::C]),
            (Column::H, [Column::F, Column::G]),
        ] {
            let rook = Square::on_row(rook, color.home_row());
            let crossed = crossed.map(|column| Square::on_row(column, color.home_row()));
            if can_castle(board, color, square, rook, crossed) {
                moves.possible_moves.push(crossed[1]);
            }
        }
    }
    moves
}
fn can_castle(board: &Board, color: Color, king: Square, rook: Square, crossed: [Square; 2]) -> bool {
    let Some(piece) = board.piece_at(rook) else {
        return false;
    };
    if piece.kind() != PieceKind::Rook || piece.color() != color || piece.move_counter() != 0 {
        return false;
    }
    let path_is_free = king
        .path(rook)
        .is_some_and(|mut path| path.all(|square| board.is_free(square)));
    path_is_free
        && crossed
            .into_iter()
            .all(|square| attackers_for(board, color, square).is_empty())
}
#[cfg(test)]
mod test {
    use crate::{
        board::{Board, BoardMove, MoveMode},
        color::Color,
        square,
        square::Square,
    };

    fn moves(board: &Board, square: Square) -> Vec<Square> {
        let mut moves = board.calculated(square).unwrap().possible_moves.clone();
        moves.sort();
        moves
    }
    #[test]
    fn stepping_back_along_the_checking_line() {
        let mut board = Board::new();
        board.load(Color::White, "Ke2 Bc3").unwrap();
        board.load(Color::Black, "Ke8 Qa2 Qb2").unwrap();
        let king = board.calculated(square!("e2")).unwrap();
        let attackers: Vec<_> = king
            .possible_attackers
            .iter()
            .map(|attacker| attacker.square)
            .collect();
        assert_eq!(attackers, [square!("b2")]);
        assert!(!king.possible_moves.contains(&square!("f2")));
        assert!(!king.possible_moves.contains(&square!("d2")));
    }
    #[test]
    fn castling_both_sides() {
        let mut board = Board::new();
        board.load(Color::White, "Ra1 Ke1 Rh1").unwrap();
        board.load(Color::Black, "Ke8").unwrap();
        let moves = moves(&board, square!("e1"));
        assert_eq!(moves.len(), 7);
        assert!(moves.contains(&square!("c1")));
        assert!(moves.contains(&square!("g1")));
    }
    #[test]
    fn castling_one_side() {
        let mut board = Board::new();
        board.load(Color::White, "Ke1 Rh1").unwrap();
        board.load(Color::Black, "Ke8").unwrap();
        assert_eq!(moves(&board, square!("e1")).len(), 6);
    }
    #[test]
    fn castling_needs_unmoved_rook() {
        let mut board = Board::new();
        board.load(Color::White, "Ke1 Rh1").unwrap();
        board.load(Color::Black, "Ke8").unwrap();
        board.move_piece(BoardMove::new(square!("h1"), square!("h2")), MoveMode::Normal);
        board.move_piece(BoardMove::new(square!("h2"), square!("h1")), MoveMode::Normal);
        assert_eq!(moves(&board, square!("e1")).len(), 5);
    }
    #[test]
    fn attacked_rook_path_does_not_stop_castling() {
        let mut board = Board::new();
        board.load(Color::White, "Ra1 Ke1 Rh1 Nf3 d2 e2 f2").unwrap();
        board.load(Color::Black, "Ke8 Rb5").unwrap();
        assert_eq!(
            moves(&board, square!("e1")),
            [square!("c1"), square!("d1"), square!("f1"), square!("g1")]
        );
    }
    #[test]
    fn castling_through_attacked_square() {
        let mut board = Board::new();
        board.load(Color::White, "Ra1 Ke1 Rh1").unwrap();
        board.load(Color::Black, "Ke8 Rf5 Rb5").unwrap();
        let moves = moves(&board, square!("e1"));
        assert!(!moves.contains(&square!("g1")));
        assert!(moves.contains(&square!("c1")));
    }
    #[test]
    fn defended_pawn_cannot_be_taken() {
        let mut board = Board::new();
        board.load(Color::White, "Ke1").unwrap();
        board.load(Color::Black, "e2 Ke8 Bb5").unwrap();
        let king = board.calculated(square!("e1")).unwrap();
        assert_eq!(king.possible_moves.len(), 2);
        assert!(!king.possible_moves.contains(&square!("e2")));
        assert!(king.possible_victims.is_empty());
    }
}
