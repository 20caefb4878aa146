use crate::board::{Board, Color, Piece, PieceKind, Square};
use crate::history::{CellChange, History, MoveRecord};
use crate::movegen::{self, Move};
use crate::snapshot::{self, SnapshotError};
use log::{debug, trace};
use std::ops::{Deref, DerefMut};

/// Picks the piece a pawn turns into when it reaches the far rank.
///
/// Closures of the form `|board, square, color| PieceKind::Queen` work too.
pub trait PromotionChoice {
    fn choose(&mut self, board: &Board, square: Square, color: Color) -> PieceKind;
}

impl<F> PromotionChoice for F
where
    F: FnMut(&Board, Square, Color) -> PieceKind,
{
    fn choose(&mut self, board: &Board, square: Square, color: Color) -> PieceKind {
        self(board, square, color)
    }
}

/// Always promotes to a queen without asking anyone.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoQueen;

impl PromotionChoice for AutoQueen {
    fn choose(&mut self, _board: &Board, _square: Square, _color: Color) -> PieceKind {
        PieceKind::Queen
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    InProgress,
    Check,
    /// The side to move has no legal move, whether or not it is in check.
    NoLegalMoves,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    side_to_move: Color,
    history: History,
}

impl Game {
    pub fn new() -> Self {
        Self::from_board(Board::new(), Color::White)
    }

    pub fn from_board(board: Board, side_to_move: Color) -> Self {
        Self {
            board,
            side_to_move,
            history: History::new(),
        }
    }

    /// Back to the starting position with an empty history.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.side_to_move = Color::White;
        self.history.clear();
        debug!("game reset");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Replaces the whole grid. History is dropped; the side to move stays.
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
        self.history.clear();
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Loads a text snapshot. On error the game is left exactly as it was.
    pub fn load_snapshot(&mut self, text: &str) -> Result<(), SnapshotError> {
        self.load_snapshot_with(text, snapshot::EMPTY_MARKER)
    }

    pub fn load_snapshot_with(&mut self, text: &str, empty: &str) -> Result<(), SnapshotError> {
        let (board, side_to_move) = snapshot::read(text, empty)?;
        self.set_board(board);
        self.side_to_move = side_to_move;
        debug!("loaded snapshot, {:?} to move", side_to_move);
        Ok(())
    }

    pub fn to_snapshot(&self) -> String {
        snapshot::write(&self.board, self.side_to_move, snapshot::EMPTY_MARKER)
    }

    pub fn to_snapshot_with(&self, empty: &str) -> String {
        snapshot::write(&self.board, self.side_to_move, empty)
    }

    /// Movement rules plus ownership: `color` owns the piece on `from` and
    /// `to` is not one of its own pieces. King safety is not considered.
    fn is_pseudo_legal(&self, from: Square, to: Square, color: Color) -> bool {
        if from == to {
            return false;
        }
        let piece = match self.board.get(from) {
            Some(piece) if piece.color == color => piece,
            _ => return false,
        };
        match self.board.get(to) {
            None => movegen::can_move(&self.board, from, to),
            Some(target) if target.is_opponent_of(&piece) => {
                movegen::can_attack(&self.board, from, to)
            }
            Some(_) => false,
        }
    }

    /// Legality gate for the side to move, ignoring king safety.
    pub fn can_move_piece(&self, from: Square, to: Square) -> bool {
        self.is_pseudo_legal(from, to, self.side_to_move)
    }

    pub fn is_check(&self) -> bool {
        self.is_in_check(self.side_to_move)
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        movegen::is_in_check(&self.board, color)
    }

    fn leaves_king_attacked(&self, from: Square, to: Square) -> bool {
        let color = match self.board.get(from) {
            Some(piece) => piece.color,
            None => return false,
        };
        let mut scratch = self.board.clone();
        let moving = scratch.set(from, None);
        scratch.set(to, moving);
        movegen::is_in_check(&scratch, color)
    }

    fn castle_leaves_king_attacked(&self, first: Square, second: Square) -> bool {
        let color = match self.board.get(first) {
            Some(piece) => piece.color,
            None => return false,
        };
        let mut scratch = self.board.clone();
        let a = scratch.set(first, None);
        let b = scratch.set(second, a);
        scratch.set(first, b);
        movegen::is_in_check(&scratch, color)
    }

    /// Would playing `from -> to` leave the mover's own king attacked?
    /// Moves that fail the legality gate answer `false`.
    pub fn move_will_cause_check(&self, from: Square, to: Square) -> bool {
        self.can_move_piece(from, to) && self.leaves_king_attacked(from, to)
    }

    fn is_legal(&self, mv: Move) -> bool {
        self.can_move_piece(mv.from, mv.to) && !self.leaves_king_attacked(mv.from, mv.to)
    }

    /// Castle between the king and rook on `first` and `second` for the side
    /// to move.
    pub fn can_castle(&self, first: Square, second: Square) -> bool {
        match self.board.get(first) {
            Some(piece) if piece.color == self.side_to_move => {
                movegen::can_castle(&self.board, first, second)
            }
            _ => false,
        }
    }

    fn is_legal_castle(&self, mv: Move) -> bool {
        self.can_castle(mv.from, mv.to) && !self.castle_leaves_king_attacked(mv.from, mv.to)
    }

    /// Every ordinary move for `color` that keeps its king safe, ordered by
    /// from-square then to-square. Castles are not included.
    pub fn moves_without_check(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        for (from, _) in self.board.pieces(color) {
            for to in Square::all() {
                if self.is_pseudo_legal(from, to, color) && !self.leaves_king_attacked(from, to) {
                    moves.push(Move::new(from, to));
                }
            }
        }
        moves
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.moves_without_check(self.side_to_move)
    }

    /// No legal move for the side to move. Stalemate is reported the same way.
    pub fn is_checkmate(&self) -> bool {
        self.legal_moves().is_empty()
    }

    pub fn status(&self) -> Status {
        if self.is_checkmate() {
            Status::NoLegalMoves
        } else if self.is_check() {
            Status::Check
        } else {
            Status::InProgress
        }
    }

    /// Squares the piece on `square` may legally go to, castle partners included.
    pub fn legal_destinations(&self, square: Square) -> Vec<Square> {
        Square::all()
            .filter(|&to| {
                let mv = Move::new(square, to);
                self.is_legal(mv) || self.is_legal_castle(mv)
            })
            .collect()
    }

    /// Turns the pawn on `square` into `kind`. Only pawns standing on the
    /// far rank qualify, and they cannot become kings or stay pawns.
    pub fn promote(&mut self, square: Square, kind: PieceKind) -> bool {
        let pawn = match self.board.get(square) {
            Some(piece) if piece.kind == PieceKind::Pawn => piece,
            _ => return false,
        };
        if square.row() != pawn.color.promotion_row()
            || matches!(kind, PieceKind::King | PieceKind::Pawn)
        {
            return false;
        }
        self.board.set(square, Some(Piece::new(kind, pawn.color)));
        debug!("promoted pawn on {} to {:?}", square, kind);
        true
    }

    /// Validates and plays a move or castle without touching history.
    ///
    /// Illegal requests return `None` and leave the game unchanged.
    pub fn move_piece(
        &mut self,
        mv: Move,
        promotion: &mut dyn PromotionChoice,
    ) -> Option<MoveRecord> {
        let mover = self.side_to_move;

        let record = if self.is_legal(mv) {
            let moving = self.board.get(mv.from)?;
            let captured = self.board.set(mv.to, Some(moving.moved()));
            self.board.set(mv.from, None);

            if moving.kind == PieceKind::Pawn && mv.to.row() == mover.promotion_row() {
                let kind = promotion.choose(&self.board, mv.to, mover);
                if !self.promote(mv.to, kind) {
                    debug!("promotion to {:?} refused, pawn stays", kind);
                }
            }

            MoveRecord {
                changes: [
                    CellChange {
                        square: mv.from,
                        before: Some(moving),
                        after: None,
                    },
                    CellChange {
                        square: mv.to,
                        before: captured,
                        after: self.board.get(mv.to),
                    },
                ],
                mover,
                is_castle: false,
            }
        } else if self.is_legal_castle(mv) {
            let first = self.board.get(mv.from)?;
            let second = self.board.get(mv.to)?;
            self.board.set(mv.from, Some(second.moved()));
            self.board.set(mv.to, Some(first.moved()));

            MoveRecord {
                changes: [
                    CellChange {
                        square: mv.from,
                        before: Some(first),
                        after: Some(second.moved()),
                    },
                    CellChange {
                        square: mv.to,
                        before: Some(second),
                        after: Some(first.moved()),
                    },
                ],
                mover,
                is_castle: true,
            }
        } else {
            return None;
        };

        self.side_to_move = mover.opposite();
        Some(record)
    }

    /// Plays a move and records it, dropping any redo tail.
    pub fn make_move(
        &mut self,
        mv: Move,
        promotion: &mut dyn PromotionChoice,
    ) -> Option<MoveRecord> {
        let record = self.move_piece(mv, promotion)?;
        self.history.push(record);
        debug!("{:?} played {}", record.mover, record.describe());
        Some(record)
    }

    /// `make_move` that promotes to a queen without asking.
    pub fn make_move_auto(&mut self, mv: Move) -> Option<MoveRecord> {
        self.make_move(mv, &mut AutoQueen)
    }

    pub fn undo(&mut self) -> bool {
        match self.history.step_back() {
            Some(record) => {
                record.revert(&mut self.board);
                self.side_to_move = record.mover;
                debug!("undo {}", record.describe());
                true
            }
            None => false,
        }
    }

    /// Undoes one ply and forgets it, so it cannot be redone.
    pub fn undo_discard(&mut self) -> bool {
        let undone = self.undo();
        if undone {
            self.history.discard_tail();
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        match self.history.step_forward() {
            Some(record) => {
                record.replay(&mut self.board);
                self.side_to_move = record.mover.opposite();
                debug!("redo {}", record.describe());
                true
            }
            None => false,
        }
    }

    /// Plays `mv` speculatively, auto-promoting. The returned guard undoes the
    /// move when dropped; history is never touched.
    pub fn apply(&mut self, mv: Move) -> Option<MoveGuard<'_>> {
        let record = self.move_piece(mv, &mut AutoQueen)?;
        trace!("apply {}", record.describe());
        Some(MoveGuard { game: self, record })
    }

    /// Applied history entries as log text, oldest first.
    pub fn move_log(&self) -> Vec<String> {
        self.history.applied().iter().map(MoveRecord::describe).collect()
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

/// A move applied through [`Game::apply`]. Derefs to the game in its
/// post-move state; dropping it restores the pre-move state exactly.
pub struct MoveGuard<'a> {
    game: &'a mut Game,
    record: MoveRecord,
}

impl Deref for MoveGuard<'_> {
    type Target = Game;

    fn deref(&self) -> &Game {
        &*self.game
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Game {
        &mut *self.game
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.record.revert(&mut self.game.board);
        self.game.side_to_move = self.record.mover;
    }
}
