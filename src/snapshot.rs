//! Line-oriented board snapshots.
//!
//! ```text
//! W
//! RWN NW BW KWN QW BW NW RWN
//! PW PW PW PW PW PW PW PW
//! - - - - - - - -
//! ...
//! ```
//!
//! Line 1 names the side to move. The next eight lines are rows 0 to 7, each
//! with eight tokens: the empty marker or `<kind><colour>[M|N]`, the moved
//! flag being present for rooks and kings only. Short rows and missing rows
//! are padded with empty squares.

use crate::board::{Board, Color, Piece, PieceKind, Rows};
use thiserror::Error;

pub const EMPTY_MARKER: &str = "-";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot is empty, expected a side-to-move line")]
    MissingSideToMove,
    #[error("line 1: expected side to move `W` or `B`, found `{0}`")]
    InvalidSideToMove(String),
    #[error("line {line}: unknown piece letter in `{token}`")]
    UnknownPiece { line: usize, token: String },
    #[error("line {line}: unknown colour letter in `{token}`")]
    UnknownColor { line: usize, token: String },
    #[error("line {line}: malformed piece code `{token}`")]
    MalformedCode { line: usize, token: String },
}

fn parse_piece(token: &str, line: usize) -> Result<Piece, SnapshotError> {
    let code: Vec<char> = token.to_ascii_uppercase().chars().collect();
    let malformed = || SnapshotError::MalformedCode {
        line,
        token: token.to_string(),
    };

    if code.len() < 2 || code.len() > 3 {
        return Err(malformed());
    }

    let kind = PieceKind::from_letter(code[0]).ok_or_else(|| SnapshotError::UnknownPiece {
        line,
        token: token.to_string(),
    })?;
    let color = Color::from_letter(code[1]).ok_or_else(|| SnapshotError::UnknownColor {
        line,
        token: token.to_string(),
    })?;

    let mut piece = Piece::new(kind, color);
    if let Some(&flag) = code.get(2) {
        match flag {
            'M' if kind.is_castleable() => piece.has_moved = true,
            'N' if kind.is_castleable() => {}
            _ => return Err(malformed()),
        }
    }
    Ok(piece)
}

/// Parses a snapshot into a fresh board. Nothing outside the return value is
/// touched, so a failed read can simply be discarded.
pub fn read(text: &str, empty: &str) -> Result<(Board, Color), SnapshotError> {
    let mut lines = text.lines();

    let marker = lines
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .ok_or(SnapshotError::MissingSideToMove)?;
    let side_to_move = match marker {
        "W" | "w" => Color::White,
        "B" | "b" => Color::Black,
        other => return Err(SnapshotError::InvalidSideToMove(other.to_string())),
    };

    let mut rows: Rows = [[None; 8]; 8];
    for (row, line) in lines.take(8).enumerate() {
        let line_number = row + 2;
        for (col, token) in line.split_whitespace().take(8).enumerate() {
            if token != empty {
                rows[row][col] = Some(parse_piece(token, line_number)?);
            }
        }
    }

    Ok((Board::from_rows(rows), side_to_move))
}

pub fn piece_code(piece: &Piece) -> String {
    let mut code = String::with_capacity(3);
    code.push(piece.kind.letter());
    code.push(piece.color.letter());
    if piece.kind.is_castleable() {
        code.push(if piece.has_moved { 'M' } else { 'N' });
    }
    code
}

pub fn write(board: &Board, side_to_move: Color, empty: &str) -> String {
    let mut out = String::new();
    out.push(side_to_move.letter());
    out.push('\n');
    for row in board.rows() {
        let tokens: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                Some(piece) => piece_code(piece),
                None => empty.to_string(),
            })
            .collect();
        out.push_str(&tokens.join(" "));
        out.push('\n');
    }
    out
}
