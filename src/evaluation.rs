use crate::board::{Board, Color, PieceKind, Square};

pub type Table = [[i32; 8]; 8];

/// Static material + piece-square evaluation.
///
/// Scores are from White's side: positive favours White. Material weights
/// are the classic pawn 10, knight 30, bishop 30, rook 50, queen 90,
/// king 900 scaled by ten, so one pawn is worth 100 and the piece-square
/// bonuses stay whole numbers on the same scale.
///
/// Tables are indexed `[row][col]` in board coordinates, row 0 being
/// White's home rank. Black reads the pawn, bishop, rook and king tables
/// with the rows reversed; knight and queen tables are shared as-is.
#[derive(Debug, Clone)]
pub struct Evaluator {
    // Piece values
    pub pawn_value: i32,
    pub knight_value: i32,
    pub bishop_value: i32,
    pub rook_value: i32,
    pub queen_value: i32,
    pub king_value: i32,

    // Positional bonuses
    pub pawn_position_bonus: Table,
    pub knight_position_bonus: Table,
    pub bishop_position_bonus: Table,
    pub rook_position_bonus: Table,
    pub queen_position_bonus: Table,
    pub king_position_bonus: Table,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            pawn_value: 100,
            knight_value: 300,
            bishop_value: 300,
            rook_value: 500,
            queen_value: 900,
            king_value: 9000,

            // Pawn position bonuses (encourages central control and advancement)
            pawn_position_bonus: [
                [0, 0, 0, 0, 0, 0, 0, 0],
                [50, 50, 50, 50, 50, 50, 50, 50],
                [10, 10, 20, 30, 30, 20, 10, 10],
                [5, 5, 10, 25, 25, 10, 5, 5],
                [0, 0, 0, 20, 20, 0, 0, 0],
                [5, -5, -10, 0, 0, -10, -5, 5],
                [5, 10, 10, -20, -20, 10, 10, 5],
                [0, 0, 0, 0, 0, 0, 0, 0],
            ],

            knight_position_bonus: [
                [-50, -40, -30, -30, -30, -30, -40, -50],
                [-40, -20, 0, 0, 0, 0, -20, -40],
                [-30, 0, 10, 15, 15, 10, 0, -30],
                [-30, 5, 15, 20, 20, 15, 5, -30],
                [-30, 0, 15, 20, 20, 15, 0, -30],
                [-30, 5, 10, 15, 15, 10, 5, -30],
                [-40, -20, 0, 5, 5, 0, -20, -40],
                [-50, -40, -30, -30, -30, -30, -40, -50],
            ],

            bishop_position_bonus: [
                [-20, -10, -10, -10, -10, -10, -10, -20],
                [-10, 0, 0, 0, 0, 0, 0, -10],
                [-10, 0, 5, 10, 10, 5, 0, -10],
                [-10, 5, 5, 10, 10, 5, 5, -10],
                [-10, 0, 10, 10, 10, 10, 0, -10],
                [-10, 10, 10, 10, 10, 10, 10, -10],
                [-10, 5, 0, 0, 0, 0, 5, -10],
                [-20, -10, -10, -10, -10, -10, -10, -20],
            ],

            // Rooks like the seventh rank and the centre files of their own
            rook_position_bonus: [
                [0, 0, 0, 0, 0, 0, 0, 0],
                [5, 10, 10, 10, 10, 10, 10, 5],
                [-5, 0, 0, 0, 0, 0, 0, -5],
                [-5, 0, 0, 0, 0, 0, 0, -5],
                [-5, 0, 0, 0, 0, 0, 0, -5],
                [-5, 0, 0, 0, 0, 0, 0, -5],
                [-5, 0, 0, 0, 0, 0, 0, -5],
                [0, 0, 0, 5, 5, 0, 0, 0],
            ],

            queen_position_bonus: [
                [-20, -10, -10, -5, -5, -10, -10, -20],
                [-10, 0, 0, 0, 0, 0, 0, -10],
                [-10, 0, 5, 5, 5, 5, 0, -10],
                [-5, 0, 5, 5, 5, 5, 0, -5],
                [0, 0, 5, 5, 5, 5, 0, -5],
                [-10, 5, 5, 5, 5, 5, 0, -10],
                [-10, 0, 5, 0, 0, 0, 0, -10],
                [-20, -10, -10, -5, -5, -10, -10, -20],
            ],

            // King position bonuses (encourages staying behind the pawns)
            king_position_bonus: [
                [-30, -40, -40, -50, -50, -40, -40, -30],
                [-30, -40, -40, -50, -50, -40, -40, -30],
                [-30, -40, -40, -50, -50, -40, -40, -30],
                [-30, -40, -40, -50, -50, -40, -40, -30],
                [-20, -30, -30, -40, -40, -30, -30, -20],
                [-10, -20, -20, -20, -20, -20, -20, -10],
                [20, 20, 0, 0, 0, 0, 20, 20],
                [20, 30, 10, 0, 0, 10, 30, 20],
            ],
        }
    }

    pub fn evaluate(&self, board: &Board) -> i32 {
        board
            .occupied()
            .map(|(square, piece)| {
                let value = self.material_value(piece.kind)
                    + self.position_bonus(piece.kind, piece.color, square);
                match piece.color {
                    Color::White => value,
                    Color::Black => -value,
                }
            })
            .sum()
    }

    pub fn material_value(&self, kind: PieceKind) -> i32 {
        match kind {
            PieceKind::Pawn => self.pawn_value,
            PieceKind::Knight => self.knight_value,
            PieceKind::Bishop => self.bishop_value,
            PieceKind::Rook => self.rook_value,
            PieceKind::Queen => self.queen_value,
            PieceKind::King => self.king_value,
        }
    }

    pub fn position_bonus(&self, kind: PieceKind, color: Color, square: Square) -> i32 {
        let table = match kind {
            PieceKind::Pawn => &self.pawn_position_bonus,
            PieceKind::Knight => &self.knight_position_bonus,
            PieceKind::Bishop => &self.bishop_position_bonus,
            PieceKind::Rook => &self.rook_position_bonus,
            PieceKind::Queen => &self.queen_position_bonus,
            PieceKind::King => &self.king_position_bonus,
        };

        let shared = matches!(kind, PieceKind::Knight | PieceKind::Queen);
        let row = match color {
            Color::Black if !shared => 7 - square.row() as usize,
            _ => square.row() as usize,
        };
        table[row][square.col() as usize]
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}
