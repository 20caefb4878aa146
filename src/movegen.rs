use crate::board::{Board, Color, PieceKind, Square};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// Builds a move from raw coordinates; anything off the board gives `None`.
    pub fn from_coords(row: i32, col: i32, row1: i32, col1: i32) -> Option<Self> {
        Some(Self::new(Square::new(row, col)?, Square::new(row1, col1)?))
    }

    /// `(from_row, from_col, to_row, to_col)`
    pub fn as_tuple(&self) -> (u8, u8, u8, u8) {
        (self.from.row(), self.from.col(), self.to.row(), self.to.col())
    }

    /// Parses coordinate text such as `e2e4`.
    pub fn from_algebraic(text: &str) -> Option<Self> {
        if text.len() != 4 || !text.is_ascii() {
            return None;
        }
        Some(Self::new(
            Square::from_algebraic(&text[0..2])?,
            Square::from_algebraic(&text[2..4])?,
        ))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

fn delta(from: Square, to: Square) -> (i8, i8) {
    (
        to.row() as i8 - from.row() as i8,
        to.col() as i8 - from.col() as i8,
    )
}

/// True when `square` is empty or holds a piece that `color` may capture.
fn is_free_for(board: &Board, square: Square, color: Color) -> bool {
    board.get(square).map_or(true, |piece| piece.color != color)
}

fn pawn_can_move(board: &Board, from: Square, to: Square, color: Color) -> bool {
    let forward = color.forward();
    let (d_row, d_col) = delta(from, to);

    if d_col == 0 {
        if d_row == forward {
            return board.is_empty(to);
        }
        if d_row == 2 * forward && from.row() == color.pawn_start_row() {
            return match from.offset(forward, 0) {
                Some(between) => board.is_empty(between) && board.is_empty(to),
                None => false,
            };
        }
        return false;
    }

    // Diagonal captures only; kings are never a pawn target and en passant
    // is not modelled.
    if d_row == forward && d_col.abs() == 1 {
        return matches!(
            board.get(to),
            Some(target) if target.color != color && target.kind != PieceKind::King
        );
    }
    false
}

fn knight_can_move(board: &Board, from: Square, to: Square, color: Color) -> bool {
    let (d_row, d_col) = delta(from, to);
    d_row != 0 && d_col != 0 && d_row.abs() + d_col.abs() == 3 && is_free_for(board, to, color)
}

fn king_can_move(board: &Board, from: Square, to: Square, color: Color) -> bool {
    let (d_row, d_col) = delta(from, to);
    d_row.abs().max(d_col.abs()) == 1 && is_free_for(board, to, color)
}

/// Sliding move along a rank/file (`straight`) or a diagonal (`diagonal`).
/// Every square strictly between `from` and `to` must be empty.
fn ride(
    board: &Board,
    from: Square,
    to: Square,
    color: Color,
    straight: bool,
    diagonal: bool,
) -> bool {
    let (d_row, d_col) = delta(from, to);
    if d_row == 0 && d_col == 0 {
        return false;
    }

    let is_straight = d_row == 0 || d_col == 0;
    let is_diagonal = d_row.abs() == d_col.abs();
    if !((straight && is_straight) || (diagonal && is_diagonal)) {
        return false;
    }

    let (step_row, step_col) = (d_row.signum(), d_col.signum());
    let mut current = from;
    loop {
        current = match current.offset(step_row, step_col) {
            Some(next) => next,
            None => return false,
        };
        if current == to {
            break;
        }
        if !board.is_empty(current) {
            return false;
        }
    }

    is_free_for(board, to, color)
}

/// Whether the piece on `from` may go to `to` under its own movement rules.
///
/// This looks at the board only: it does not care whose turn it is or
/// whether the mover's king would be left attacked.
pub fn can_move(board: &Board, from: Square, to: Square) -> bool {
    let piece = match board.get(from) {
        Some(piece) => piece,
        None => return false,
    };
    if from == to {
        return false;
    }

    let color = piece.color;
    match piece.kind {
        PieceKind::Pawn => pawn_can_move(board, from, to, color),
        PieceKind::Knight => knight_can_move(board, from, to, color),
        PieceKind::Bishop => ride(board, from, to, color, false, true),
        PieceKind::Rook => ride(board, from, to, color, true, false),
        PieceKind::Queen => ride(board, from, to, color, true, true),
        PieceKind::King => king_can_move(board, from, to, color),
    }
}

/// `can_move` onto a square that holds an opposing piece.
pub fn can_attack(board: &Board, from: Square, to: Square) -> bool {
    match (board.get(from), board.get(to)) {
        (Some(attacker), Some(target)) if attacker.is_opponent_of(&target) => {
            can_move(board, from, to)
        }
        _ => false,
    }
}

pub fn is_attacked(board: &Board, square: Square, by: Color) -> bool {
    board
        .pieces(by)
        .any(|(attacker, _)| can_attack(board, attacker, square))
}

/// A side without a king is never in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .map_or(false, |king| is_attacked(board, king, color.opposite()))
}

/// King/rook swap. Both pieces must be an unmoved king and rook of one colour,
/// in either order, and that colour must not be in check.
pub fn can_castle(board: &Board, first: Square, second: Square) -> bool {
    let (a, b) = match (board.get(first), board.get(second)) {
        (Some(a), Some(b)) => (a, b),
        _ => return false,
    };

    a.kind.is_castleable()
        && b.kind.is_castleable()
        && a.kind != b.kind
        && a.color == b.color
        && !a.has_moved
        && !b.has_moved
        && !is_in_check(board, a.color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn place(board: &mut Board, name: &str, kind: PieceKind, color: Color) {
        board.set(sq(name), Some(Piece::new(kind, color)));
    }

    #[test]
    fn off_board_coordinates_are_rejected() {
        assert!(Move::from_coords(0, 0, 8, 0).is_none());
        assert!(Move::from_coords(-1, 3, 2, 3).is_none());
        assert!(Move::from_coords(4, 4, 4, -1).is_none());

        let m = Move::from_coords(1, 3, 3, 3).unwrap();
        assert_eq!(m.as_tuple(), (1, 3, 3, 3));
        assert_eq!(m, Move::from_algebraic("e2e4").unwrap());
    }

    #[test]
    fn pawn_pushes_and_double_step() {
        let mut board = Board::new();
        assert!(can_move(&board, sq("e2"), sq("e3")));
        assert!(can_move(&board, sq("e2"), sq("e4")));
        assert!(!can_move(&board, sq("e2"), sq("e5")));
        assert!(!can_move(&board, sq("e2"), sq("e1")));

        // Blocked on the intermediate square.
        place(&mut board, "e3", PieceKind::Knight, Color::Black);
        assert!(!can_move(&board, sq("e2"), sq("e4")));
        assert!(!can_move(&board, sq("e2"), sq("e3")));

        // Double step is only from the starting rank.
        assert!(can_move(&board, sq("d7"), sq("d5")));
        place(&mut board, "c5", PieceKind::Pawn, Color::Black);
        assert!(!can_move(&board, sq("c5"), sq("c3")));
    }

    #[test]
    fn pawn_captures_diagonally_but_never_a_king() {
        let mut board = Board::empty();
        place(&mut board, "e4", PieceKind::Pawn, Color::White);
        place(&mut board, "d5", PieceKind::Rook, Color::Black);
        place(&mut board, "f5", PieceKind::King, Color::Black);
        place(&mut board, "e5", PieceKind::Pawn, Color::Black);

        assert!(can_attack(&board, sq("e4"), sq("d5")));
        assert!(!can_attack(&board, sq("e4"), sq("f5")));
        assert!(!can_move(&board, sq("e4"), sq("e5")));
        assert!(!can_attack(&board, sq("e4"), sq("e5")));
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let board = Board::new();
        assert!(can_move(&board, sq("g1"), sq("f3")));
        assert!(can_move(&board, sq("g1"), sq("h3")));
        assert!(!can_move(&board, sq("g1"), sq("e2")));
        assert!(!can_move(&board, sq("g1"), sq("g4")));
    }

    #[test]
    fn sliders_stop_at_the_first_blocker() {
        let mut board = Board::empty();
        place(&mut board, "d4", PieceKind::Queen, Color::White);
        place(&mut board, "d6", PieceKind::Pawn, Color::Black);
        place(&mut board, "f6", PieceKind::Pawn, Color::White);

        assert!(can_move(&board, sq("d4"), sq("d5")));
        assert!(can_attack(&board, sq("d4"), sq("d6")));
        assert!(!can_move(&board, sq("d4"), sq("d7")));
        assert!(can_move(&board, sq("d4"), sq("e5")));
        assert!(!can_move(&board, sq("d4"), sq("f6")));
        assert!(!can_move(&board, sq("d4"), sq("g7")));
        assert!(can_move(&board, sq("d4"), sq("a1")));
        assert!(!can_move(&board, sq("d4"), sq("e6")));
    }

    #[test]
    fn every_attack_is_also_a_move() {
        let board = Board::new();
        for from in Square::all() {
            for to in Square::all() {
                if can_attack(&board, from, to) {
                    assert!(can_move(&board, from, to));
                }
            }
        }
    }

    #[test]
    fn castling_needs_an_unmoved_pair_out_of_check() {
        let mut board = Board::empty();
        place(&mut board, "e1", PieceKind::King, Color::White);
        place(&mut board, "h1", PieceKind::Rook, Color::White);
        place(&mut board, "a1", PieceKind::Rook, Color::White);
        assert!(can_castle(&board, sq("e1"), sq("h1")));
        assert!(can_castle(&board, sq("a1"), sq("e1")));
        assert!(!can_castle(&board, sq("a1"), sq("h1")));

        board.set(sq("h1"), Some(Piece::new(PieceKind::Rook, Color::White).moved()));
        assert!(!can_castle(&board, sq("e1"), sq("h1")));

        place(&mut board, "e8", PieceKind::Rook, Color::Black);
        assert!(!can_castle(&board, sq("e1"), sq("a1")));
    }

    #[test]
    fn pawns_do_not_give_check() {
        let mut board = Board::empty();
        place(&mut board, "e1", PieceKind::King, Color::White);
        place(&mut board, "d2", PieceKind::Pawn, Color::Black);
        assert!(!is_in_check(&board, Color::White));
        place(&mut board, "e8", PieceKind::Rook, Color::Black);
        assert!(is_in_check(&board, Color::White));
        assert!(!is_in_check(&board, Color::Black));
    }
}
