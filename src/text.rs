//! Host text buffer: the character sequence and its plain text-edit history.
//!
//! The buffer only records edits; applying them to the attribute store is
//! the document's job, which is why undo hands back whole [`EditGroup`]s
//! instead of mutating the rope itself.

use std::ops::Range;

use ropey::Rope;

use crate::store::{LineSnapshot, SpanSnapshot};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextEdit {
    Insert {
        at: usize,
        text: String,
        /// Formatting the inserted chars received, re-applied by text redo.
        formatting: SpanSnapshot,
    },
    Delete {
        at: usize,
        text: String,
        /// Formatting the deleted chars carried, restored by text undo.
        formatting: SpanSnapshot,
        /// Alignment of the lines the deletion touched.
        alignment: LineSnapshot,
    },
}

/// Edits undone and redone as one step, in the order they were applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditGroup {
    pub edits: Vec<TextEdit>,
}

#[derive(Clone, Debug, Default)]
pub struct TextBuffer {
    rope: Rope,
    undo: Vec<EditGroup>,
    redo: Vec<EditGroup>,
    open_group: Option<EditGroup>,
    group_depth: usize,
}

impl TextBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            ..Self::default()
        }
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn slice(&self, range: Range<usize>) -> String {
        self.rope.slice(range).to_string()
    }

    pub fn char_at(&self, pos: usize) -> Option<char> {
        (pos < self.rope.len_chars()).then(|| self.rope.char(pos))
    }

    pub fn line_of(&self, pos: usize) -> usize {
        self.rope.char_to_line(pos.min(self.rope.len_chars()))
    }

    pub fn line_start(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    /// Char index of the end of `line`, excluding its line break.
    pub fn line_end(&self, line: usize) -> usize {
        if line + 1 >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line + 1) - 1
    }

    pub fn line_text(&self, line: usize) -> String {
        self.slice(self.line_start(line)..self.line_end(line))
    }

    /// `(line, column)` with a 1-based line and 0-based column.
    pub fn line_col(&self, pos: usize) -> (usize, usize) {
        let pos = pos.min(self.rope.len_chars());
        let line = self.rope.char_to_line(pos);
        (line + 1, pos - self.rope.line_to_char(line))
    }

    /// Inverse of [`line_col`](Self::line_col). Out-of-range lines clamp to
    /// the end of the text and long columns to the end of their line.
    pub fn position(&self, line: usize, column: usize) -> usize {
        let Some(line) = line.checked_sub(1) else {
            return 0;
        };
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        (self.line_start(line) + column).min(self.line_end(line))
    }

    pub(crate) fn insert_raw(&mut self, at: usize, text: &str) {
        self.rope.insert(at, text);
    }

    pub(crate) fn remove_raw(&mut self, range: Range<usize>) -> String {
        let removed = self.slice(range.clone());
        self.rope.remove(range);
        removed
    }

    pub fn begin_group(&mut self) {
        if self.group_depth == 0 {
            self.open_group = Some(EditGroup::default());
        }
        self.group_depth += 1;
    }

    pub fn end_group(&mut self) {
        self.group_depth = self.group_depth.saturating_sub(1);
        if self.group_depth > 0 {
            return;
        }
        if let Some(group) = self.open_group.take() {
            if !group.edits.is_empty() {
                self.undo.push(group);
            }
        }
    }

    /// Records a fresh edit; invalidates the redo history.
    pub fn record(&mut self, edit: TextEdit) {
        self.redo.clear();
        match self.open_group.as_mut() {
            Some(group) => group.edits.push(edit),
            None => self.undo.push(EditGroup { edits: vec![edit] }),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn take_undo(&mut self) -> Option<EditGroup> {
        self.undo.pop()
    }

    pub fn take_redo(&mut self) -> Option<EditGroup> {
        self.redo.pop()
    }

    pub fn push_undo(&mut self, group: EditGroup) {
        self.undo.push(group);
    }

    pub fn push_redo(&mut self, group: EditGroup) {
        self.redo.push(group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_geometry() {
        let buffer = TextBuffer::new("ab\ncde\n");
        assert_eq!(buffer.len_lines(), 3);
        assert_eq!(buffer.line_start(1), 3);
        assert_eq!(buffer.line_end(1), 6);
        assert_eq!(buffer.line_text(1), "cde");
        assert_eq!(buffer.line_start(2), 7);
        assert_eq!(buffer.line_end(2), 7);
        assert_eq!(buffer.line_of(6), 1);
    }

    #[test]
    fn line_col_round_trip_and_clamping() {
        let buffer = TextBuffer::new("ab\ncde");
        assert_eq!(buffer.line_col(4), (2, 1));
        assert_eq!(buffer.position(2, 1), 4);
        assert_eq!(buffer.position(1, 99), 2);
        assert_eq!(buffer.position(9, 0), 6);
        assert_eq!(buffer.position(0, 0), 0);
    }

    #[test]
    fn grouped_edits_undo_together() {
        let mut buffer = TextBuffer::new("");
        buffer.begin_group();
        buffer.record(TextEdit::Insert {
            at: 0,
            text: "a".into(),
            formatting: SpanSnapshot::default(),
        });
        buffer.record(TextEdit::Insert {
            at: 1,
            text: "b".into(),
            formatting: SpanSnapshot::default(),
        });
        buffer.end_group();
        let group = buffer.take_undo().unwrap();
        assert_eq!(group.edits.len(), 2);
        assert!(!buffer.can_undo());
    }
}
