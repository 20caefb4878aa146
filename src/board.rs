use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_letter(letter: char) -> Option<PieceKind> {
        match letter.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Rooks and kings are the only pieces that track whether they have moved.
    pub fn is_castleable(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::King)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }

    pub fn from_letter(letter: char) -> Option<Color> {
        match letter.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'B' => Some(Color::Black),
            _ => None,
        }
    }

    /// Direction pawns of this colour advance in, in rows.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub fn pawn_start_row(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// The opponent's back rank, where this colour's pawns promote.
    pub fn promotion_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

/// A piece as it sits on the board.
///
/// `has_moved` only ever flips for rooks and kings, once, on their first move
/// or castle. The square a piece stands on is not part of the piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub has_moved: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Self {
            kind,
            color,
            has_moved: false,
        }
    }

    pub fn moved(mut self) -> Self {
        if self.kind.is_castleable() {
            self.has_moved = true;
        }
        self
    }

    pub fn is_opponent_of(&self, other: &Piece) -> bool {
        self.color != other.color
    }
}

/// A cell on the 8x8 grid. Row 0 is White's back rank.
///
/// Squares can only be built inside the board, so every `Square` in
/// circulation is a valid index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    pub fn new(row: i32, col: i32) -> Option<Square> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Square> {
        Square::new(
            self.row as i32 + d_row as i32,
            self.col as i32 + d_col as i32,
        )
    }

    /// Every square, row by row starting at White's back rank.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square { row, col }))
    }

    /// Parses names like `e2`.
    ///
    /// The board is viewed from White's side with file `a` on column 7, so
    /// the starting king stands on `e1`.
    pub fn from_algebraic(name: &str) -> Option<Square> {
        let mut chars = name.chars();
        let file = chars.next()?.to_ascii_lowercase();
        let rank = chars.next()?;
        if chars.next().is_some() || !('a'..='h').contains(&file) || !('1'..='8').contains(&rank)
        {
            return None;
        }
        let col = 7 - (file as u8 - b'a');
        let row = rank as u8 - b'1';
        Square::new(row as i32, col as i32)
    }

    pub fn to_algebraic(self) -> String {
        let file = (b'a' + (7 - self.col)) as char;
        let rank = (b'1' + self.row) as char;
        format!("{}{}", file, rank)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

pub type Rows = [[Option<Piece>; 8]; 8];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Rows,
}

impl Board {
    /// The standard starting position.
    pub fn new() -> Self {
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::King,
            PieceKind::Queen,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::empty();
        for (col, &kind) in back_rank.iter().enumerate() {
            board.cells[0][col] = Some(Piece::new(kind, Color::White));
            board.cells[1][col] = Some(Piece::new(PieceKind::Pawn, Color::White));
            board.cells[6][col] = Some(Piece::new(PieceKind::Pawn, Color::Black));
            board.cells[7][col] = Some(Piece::new(kind, Color::Black));
        }
        board
    }

    pub fn empty() -> Self {
        Self {
            cells: [[None; 8]; 8],
        }
    }

    pub fn from_rows(cells: Rows) -> Self {
        Self { cells }
    }

    pub fn rows(&self) -> &Rows {
        &self.cells
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        self.cells[square.row as usize][square.col as usize]
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square).is_none()
    }

    /// Puts `piece` on `square` and hands back whatever was there.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.cells[square.row as usize][square.col as usize], piece)
    }

    /// Occupied squares of one colour, in row-major order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |square| match self.get(square) {
            Some(piece) if piece.color == color => Some((square, piece)),
            _ => None,
        })
    }

    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |square| self.get(square).map(|piece| (square, piece)))
    }

    /// Where the king of `color` stands. With several kings on the board the
    /// last one in row-major order wins; with none the answer is `None`.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .filter(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(square, _)| square)
            .last()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut result = String::new();
        for row in (0..8).rev() {
            result.push((b'1' + row as u8) as char);
            result.push(' ');
            for col in (0..8).rev() {
                let piece_char = match self.cells[row][col] {
                    Some(piece) if piece.color == Color::White => piece.kind.letter(),
                    Some(piece) => piece.kind.letter().to_ascii_lowercase(),
                    None => '.',
                };
                result.push(piece_char);
                if col > 0 {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        result.push_str("  a b c d e f g h\n");
        write!(f, "{}", result)
    }
}
