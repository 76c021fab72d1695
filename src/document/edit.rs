use std::ops::Range;

use super::Document;
use crate::store::{LineSnapshot, SpanSnapshot};
use crate::style::StyleSpec;
use crate::text::TextEdit;

impl Document {
    /// Inserts `text` at `at` (clamped) and returns the inserted range.
    ///
    /// Inserting anywhere but at the caret counts as moving the caret first,
    /// which ends typing mode. While typing mode is armed the inserted chars
    /// receive the pending style, and the pending style stays armed.
    pub fn insert_text(&mut self, at: usize, text: &str) -> Range<usize> {
        let at = at.min(self.len());
        self.set_caret(at);
        let pending = self.typing.pending().cloned();
        self.splice_in(at, text, pending.as_ref())
    }

    /// Deletes `range` and returns the removed text. The formatting of the
    /// removed chars is kept in the text history so undo can restore it.
    pub fn delete(&mut self, range: Range<usize>) -> String {
        let range = self.clamp(range);
        if range.is_empty() {
            return String::new();
        }
        self.splice_out(range)
    }

    /// Inserts and records a text edit, optionally styling the new chars.
    pub(crate) fn splice_in(
        &mut self,
        at: usize,
        text: &str,
        style: Option<&StyleSpec>,
    ) -> Range<usize> {
        let len = text.chars().count();
        let inserted = at..at + len;
        if len == 0 {
            return inserted;
        }
        self.raw_insert(at, text);
        if let Some(spec) = style {
            self.paint(inserted.clone(), spec);
        }
        let formatting = self.snapshot_all(inserted.clone());
        self.text.record(TextEdit::Insert {
            at,
            text: text.to_string(),
            formatting,
        });
        self.history.note_text_edit();
        if self.caret >= at {
            self.caret += len;
        }
        tracing::trace!(at, len, styled = style.is_some(), "text inserted");
        inserted
    }

    /// Deletes and records a text edit.
    pub(crate) fn splice_out(&mut self, range: Range<usize>) -> String {
        let (removed, formatting, alignment) = self.raw_delete(range.clone());
        self.text.record(TextEdit::Delete {
            at: range.start,
            text: removed.clone(),
            formatting,
            alignment,
        });
        self.history.note_text_edit();
        self.caret = shift_for_delete(self.caret, &range);
        tracing::trace!(?range, "text deleted");
        removed
    }

    /// Inserts without recording history; the store follows the text.
    pub(crate) fn raw_insert(&mut self, at: usize, text: &str) {
        let line = self.text.line_of(at);
        let new_lines = text.matches('\n').count();
        self.text.insert_raw(at, text);
        self.store.apply_insert(at, text.chars().count(), line, new_lines);
    }

    /// Deletes without recording history. Returns the removed text, the
    /// formatting it carried and the alignment of the lines it touched.
    pub(crate) fn raw_delete(
        &mut self,
        range: Range<usize>,
    ) -> (String, SpanSnapshot, LineSnapshot) {
        let formatting = self.snapshot_all(range.clone());
        let first = self.text.line_of(range.start);
        let last = self.text.line_of(range.end);
        let alignment = self.store.snapshot_lines(first..last + 1);
        let removed = self.text.remove_raw(range.clone());
        self.store.apply_delete(range, first, last - first);
        (removed, formatting, alignment)
    }
}

fn shift_for_delete(pos: usize, range: &Range<usize>) -> usize {
    if pos >= range.end {
        pos - range.len()
    } else if pos > range.start {
        range.start
    } else {
        pos
    }
}
