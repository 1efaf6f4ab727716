use std::fmt::Write;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use rustc_hash::FxHashSet;

use crate::{
    board::Board,
    color::Color,
    command::ChessMoveCommand,
    direction::Direction,
    executor::MoveExecutor,
    piece::{PieceKind, PieceRecord},
    square::{Column, Square},
    status::GameStatus,
};

const GAMES: usize = 24;
const MAX_PLIES: usize = 160;

fn square_from(value: chess::Square) -> Square {
    Square::new(
        value.get_file().to_index().try_into().unwrap(),
        u8::try_from(value.get_rank().to_index()).unwrap() + 1,
    )
    .unwrap()
}
fn letter(kind: PieceKind, color: Color) -> char {
    match color {
        Color::White => kind.uppercase(),
        Color::Black => kind.uppercase().to_ascii_lowercase(),
    }
}
fn unmoved(board: &Board, square: Square, kind: PieceKind, color: Color) -> bool {
    board.piece_at(square).is_some_and(|piece| {
        piece.kind() == kind && piece.color() == color && piece.move_counter() == 0
    })
}
fn castling_rights(board: &Board) -> String {
    let mut rights = String::new();
    for color in Color::ALL {
        let row = color.home_row();
        if !unmoved(board, Square::on_row(Column::E, row), PieceKind::King, color) {
            continue;
        }
        for (column, kind) in [(Column::H, PieceKind::King), (Column::A, PieceKind::Queen)] {
            if unmoved(board, Square::on_row(column, row), PieceKind::Rook, color) {
                rights.push(letter(kind, color));
            }
        }
    }
    if rights.is_empty() {
        rights.push('-');
    }
    rights
}
/// Only written when a pawn could actually take, the same way `chess` prints it.
fn en_passant(board: &Board) -> Option<Square> {
    let target = board.possible_en_passant()?;
    let color = board.color_on_move();
    let taken = target.step(color.forward().opposite())?;
    [Direction::Left, Direction::Right]
        .into_iter()
        .filter_map(|direction| taken.step(direction))
        .any(|square| {
            board
                .piece_at(square)
                .is_some_and(|piece| piece.kind() == PieceKind::Pawn && piece.color() == color)
        })
        .then_some(target)
}
fn fen(board: &Board) -> String {
    let mut fen = String::new();
    for row in (1..=8).rev() {
        let mut empty = 0;
        for column in Column::ALL {
            match board.piece_at(Square::on_row(column, row)) {
                Some(piece) => {
                    if empty > 0 {
                        write!(fen, "{empty}").unwrap();
                        empty = 0;
                    }
                    fen.push(letter(piece.kind(), piece.color()));
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            write!(fen, "{empty}").unwrap();
        }
        if row > 1 {
            fen.push('/');
        }
    }
    let color = match board.color_on_move() {
        Color::White => 'w',
        Color::Black => 'b',
    };
    write!(fen, " {color} {}", castling_rights(board)).unwrap();
    match en_passant(board) {
        Some(square) => write!(fen, " {square}").unwrap(),
        None => write!(fen, " -").unwrap(),
    }
    write!(fen, " 0 1").unwrap();
    fen
}
fn legal_moves(board: &Board) -> FxHashSet<(Square, Square)> {
    board
        .pieces(board.color_on_move())
        .flat_map(|piece| {
            piece
                .possible_moves(board)
                .iter()
                .map(move |to| (piece.square(), *to))
        })
        .collect()
}
fn snapshot(board: &Board) -> Vec<(Square, PieceRecord)> {
    let mut pieces: Vec<_> = board
        .all_pieces()
        .map(|piece| (piece.square(), piece.record()))
        .collect();
    pieces.sort_by_key(|(square, _)| *square);
    pieces
}
fn check_position(board: &Board) -> Vec<(Square, Square)> {
    let fen = fen(board);
    let reference: chess::Board = fen.parse().unwrap();
    let expected: FxHashSet<_> = chess::MoveGen::new_legal(&reference)
        .map(|chess_move| {
            (
                square_from(chess_move.get_source()),
                square_from(chess_move.get_dest()),
            )
        })
        .collect();
    let found = legal_moves(board);
    if let Some((from, to)) = found.difference(&expected).next() {
        panic!("found {from}{to} but it's not a legal move\n{}\n{fen}", board.display());
    }
    if let Some((from, to)) = expected.difference(&found).next() {
        panic!("{from}{to} not found\n{}\n{fen}", board.display());
    }
    let status = board.status();
    let consistent = match reference.status() {
        chess::BoardStatus::Ongoing => !status.is_over(),
        chess::BoardStatus::Stalemate => status == GameStatus::Stalemate,
        chess::BoardStatus::Checkmate => matches!(status, GameStatus::Checkmate { .. }),
    };
    assert!(consistent, "status {status} is wrong\n{}\n{fen}", board.display());
    let mut moves: Vec<_> = found.into_iter().collect();
    moves.sort();
    moves
}
#[test]
fn random_games_agree_with_chess_crate() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let mut executor = MoveExecutor::new();
    for _ in 0..GAMES {
        let mut board = Board::starting_position();
        for _ in 0..MAX_PLIES {
            let moves = check_position(&board);
            if moves.is_empty() {
                break;
            }
            let (from, to) = moves[rng.random_range(0..moves.len())];
            let promotion = PieceKind::PROMOTION_CHOICES[rng.random_range(0..4)];
            let command = ChessMoveCommand::new(&board, from, to, Some(promotion)).unwrap();
            let before = snapshot(&board);
            let en_passant = board.possible_en_passant();
            executor.process(&mut board, command);
            executor.revert(&mut board);
            assert_eq!(snapshot(&board), before, "{command:?} was not reverted\n{}", board.display());
            assert_eq!(board.possible_en_passant(), en_passant);
            executor.process(&mut board, command);
        }
    }
}
