use super::Document;
use crate::history::{FormatRecord, HistoryDirection};
use crate::text::{EditGroup, TextEdit};

/// Which history an [`undo`](Document::undo) or [`redo`](Document::redo)
/// call was served from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UndoOutcome {
    Format,
    Text,
    /// Nothing to undo or redo; the document is unchanged.
    Empty,
}

impl Document {
    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.text.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo() || self.text.can_redo()
    }

    /// Undoes the last formatting action if formatting was the last thing
    /// done, otherwise the last text edit group.
    pub fn undo(&mut self) -> UndoOutcome {
        if let Some(record) = self.history.take_undo() {
            self.apply_record(&record, HistoryDirection::Undo);
            return UndoOutcome::Format;
        }
        let Some(group) = self.text.take_undo() else {
            tracing::trace!("nothing to undo");
            return UndoOutcome::Empty;
        };
        self.typing.clear();
        self.revert_group(&group);
        self.text.push_redo(group);
        self.history.note_text_edit();
        UndoOutcome::Text
    }

    /// Redoes formatting only directly after a formatting undo; otherwise
    /// replays the last undone text edit group.
    pub fn redo(&mut self) -> UndoOutcome {
        if let Some(record) = self.history.take_redo() {
            self.apply_record(&record, HistoryDirection::Redo);
            return UndoOutcome::Format;
        }
        let Some(group) = self.text.take_redo() else {
            tracing::trace!("nothing to redo");
            return UndoOutcome::Empty;
        };
        self.typing.clear();
        self.replay_group(&group);
        self.text.push_undo(group);
        self.history.note_text_edit();
        UndoOutcome::Text
    }

    fn apply_record(&mut self, record: &FormatRecord, direction: HistoryDirection) {
        let forward = direction == HistoryDirection::Redo;
        tracing::debug!(?direction, "applying formatting record");
        match record {
            FormatRecord::Spans { before, after } => {
                self.restore_spans(if forward { after } else { before });
            }
            FormatRecord::Lines { before, after } => {
                self.store.restore_lines(if forward { after } else { before });
            }
            FormatRecord::Cleared {
                spans_before,
                spans_after,
                lines_before,
                lines_after,
            } => {
                self.restore_spans(if forward { spans_after } else { spans_before });
                self.store
                    .restore_lines(if forward { lines_after } else { lines_before });
            }
        }
    }

    fn revert_group(&mut self, group: &EditGroup) {
        for edit in group.edits.iter().rev() {
            match edit {
                TextEdit::Insert { at, text, .. } => {
                    let end = at + text.chars().count();
                    self.raw_delete(*at..end);
                    self.caret = *at;
                }
                TextEdit::Delete {
                    at,
                    text,
                    formatting,
                    alignment,
                } => {
                    self.raw_insert(*at, text);
                    self.restore_spans(formatting);
                    self.store.restore_lines(alignment);
                    self.caret = at + text.chars().count();
                }
            }
        }
    }

    fn replay_group(&mut self, group: &EditGroup) {
        for edit in &group.edits {
            match edit {
                TextEdit::Insert {
                    at,
                    text,
                    formatting,
                } => {
                    self.raw_insert(*at, text);
                    self.restore_spans(formatting);
                    self.caret = at + text.chars().count();
                }
                TextEdit::Delete { at, text, .. } => {
                    let end = at + text.chars().count();
                    self.raw_delete(*at..end);
                    self.caret = *at;
                }
            }
        }
    }
}
