//! Formatting undo/redo history and its arbitration against text edits.
//!
//! The history is a small state machine:
//!
//! ```text
//!             format action                undo (records left)
//!  TextLast ───────────────► FormatLast ─────────────────────► FormatUndoPending
//!     ▲                           ▲                                  │  │
//!     │ text edit                 │ redo (redo stack drained)        │  │ undo / redo
//!     └───────────────────────────┴──────────────────────────────────┘  ◄┘
//! ```
//!
//! Undo pops a formatting record only while formatting was the last thing
//! the user did; otherwise the caller falls through to text undo. Redo
//! replays formatting only directly after a formatting undo.

use crate::store::{LineSnapshot, SpanSnapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LastAction {
    TextLast,
    FormatLast,
    FormatUndoPending,
}

/// One formatting action, holding enough state to apply it in both
/// directions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatRecord {
    /// Character-level change; both snapshots cover the same range and the
    /// same dimensions.
    Spans {
        before: SpanSnapshot,
        after: SpanSnapshot,
    },
    /// Line alignment change.
    Lines {
        before: LineSnapshot,
        after: LineSnapshot,
    },
    /// Clear-formatting touches both levels at once.
    Cleared {
        spans_before: SpanSnapshot,
        spans_after: SpanSnapshot,
        lines_before: LineSnapshot,
        lines_after: LineSnapshot,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

#[derive(Clone, Debug)]
pub struct FormatHistory {
    undo: Vec<FormatRecord>,
    redo: Vec<FormatRecord>,
    last: LastAction,
    limit: Option<usize>,
}

impl Default for FormatHistory {
    fn default() -> Self {
        Self::new(None)
    }
}

impl FormatHistory {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            last: LastAction::TextLast,
            limit,
        }
    }

    pub fn last_action(&self) -> LastAction {
        self.last
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Records a new formatting action, killing the redo branch.
    pub fn push(&mut self, record: FormatRecord) {
        self.redo.clear();
        self.undo.push(record);
        if let Some(limit) = self.limit {
            if self.undo.len() > limit {
                let excess = self.undo.len() - limit;
                self.undo.drain(..excess);
            }
        }
        self.last = LastAction::FormatLast;
    }

    /// A text edit, or a text undo/redo, happened: formatting is no longer
    /// the last action and formatting redo becomes unreachable.
    pub fn note_text_edit(&mut self) {
        self.last = LastAction::TextLast;
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        self.last != LastAction::TextLast && !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        self.last == LastAction::FormatUndoPending && !self.redo.is_empty()
    }

    /// Pops the record to invert, if formatting undo applies right now.
    pub fn take_undo(&mut self) -> Option<FormatRecord> {
        if !self.can_undo() {
            return None;
        }
        let record = self.undo.pop()?;
        self.redo.push(record.clone());
        self.last = LastAction::FormatUndoPending;
        Some(record)
    }

    /// Pops the record to re-apply, if formatting redo applies right now.
    pub fn take_redo(&mut self) -> Option<FormatRecord> {
        if !self.can_redo() {
            return None;
        }
        let record = self.redo.pop()?;
        self.undo.push(record.clone());
        self.last = if self.redo.is_empty() {
            LastAction::FormatLast
        } else {
            LastAction::FormatUndoPending
        };
        Some(record)
    }
}
