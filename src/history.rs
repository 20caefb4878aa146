use crate::board::{Board, Color, Piece, Square};

/// One touched cell: what stood there before and after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChange {
    pub square: Square,
    pub before: Option<Piece>,
    pub after: Option<Piece>,
}

/// A reversible delta for a single applied move or castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub changes: [CellChange; 2],
    pub mover: Color,
    pub is_castle: bool,
}

impl MoveRecord {
    pub fn from_square(&self) -> Square {
        self.changes[0].square
    }

    pub fn to_square(&self) -> Square {
        self.changes[1].square
    }

    pub fn captured(&self) -> Option<Piece> {
        if self.is_castle {
            None
        } else {
            self.changes[1].before
        }
    }

    pub fn promoted_to(&self) -> Option<Piece> {
        match (self.changes[0].before, self.changes[1].after) {
            (Some(before), Some(after)) if before.kind != after.kind && !self.is_castle => {
                Some(after)
            }
            _ => None,
        }
    }

    /// Writes the before snapshot back onto the board.
    pub fn revert(&self, board: &mut Board) {
        for change in self.changes.iter().rev() {
            board.set(change.square, change.before);
        }
    }

    /// Writes the after snapshot onto the board.
    pub fn replay(&self, board: &mut Board) {
        for change in &self.changes {
            board.set(change.square, change.after);
        }
    }

    /// Short log text, e.g. `Pe2-e4`, `Nf3xe5`, `Pe7-e8=Q` or `Ke1<>h1`.
    pub fn describe(&self) -> String {
        let letter = self.changes[0]
            .before
            .map(|piece| piece.kind.letter())
            .unwrap_or('?');

        if self.is_castle {
            return format!("{}{}<>{}", letter, self.from_square(), self.to_square());
        }

        let separator = if self.captured().is_some() { 'x' } else { '-' };
        let mut text = format!("{}{}{}{}", letter, self.from_square(), separator, self.to_square());
        if let Some(piece) = self.promoted_to() {
            text.push('=');
            text.push(piece.kind.letter());
        }
        text
    }
}

/// Linear undo/redo list.
///
/// `cursor` counts the records currently applied to the board; everything
/// at or after it is the redo tail. Pushing a new record drops that tail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    records: Vec<MoveRecord>,
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: MoveRecord) {
        self.records.truncate(self.cursor);
        self.records.push(record);
        self.cursor += 1;
        debug_assert!(self.cursor <= self.records.len());
    }

    /// Moves the cursor back one step and returns the record to undo.
    pub fn step_back(&mut self) -> Option<MoveRecord> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        debug_assert!(self.cursor < self.records.len());
        Some(self.records[self.cursor])
    }

    /// Moves the cursor forward one step and returns the record to redo.
    pub fn step_forward(&mut self) -> Option<MoveRecord> {
        let record = *self.records.get(self.cursor)?;
        self.cursor += 1;
        debug_assert!(self.cursor <= self.records.len());
        Some(record)
    }

    /// Drops every record at or after the cursor.
    pub fn discard_tail(&mut self) {
        self.records.truncate(self.cursor);
        debug_assert_eq!(self.cursor, self.records.len());
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.records.len()
    }

    /// Records currently applied, oldest first.
    pub fn applied(&self) -> &[MoveRecord] {
        &self.records[..self.cursor]
    }
}
