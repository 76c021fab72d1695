//! The document: text plus the formatting attached to it.
//!
//! All formatting state is owned by a [`Document`] and mutated only through
//! its methods, which keep the attribute store, the style table, the typing
//! state and both undo histories consistent with each other. The methods are
//! split across submodules by concern:
//!
//! * `segment` resolves styles and partitions ranges into uniform runs,
//! * `ops` holds the range operations (toggle, family, size, color,
//!   alignment, clear),
//! * `edit` inserts and deletes text,
//! * `lists` implements bullet and numbered list editing,
//! * `undo` arbitrates between formatting and text history.

use std::ops::Range;

use crate::config::FormatConfig;
use crate::history::FormatHistory;
use crate::list::{LineInfo, ListMarker};
use crate::store::{AttributeStore, Dimension, SpanSnapshot};
use crate::style::{Alignment, ColorChannel, FontBundle, StyleSpec, StyleTable};
use crate::text::TextBuffer;
use crate::typing::TypingState;

mod edit;
mod lists;
mod ops;
mod segment;
mod undo;

pub use segment::{Segment, coalesce};
pub use undo::UndoOutcome;

#[derive(Clone, Debug)]
pub struct Document {
    text: TextBuffer,
    store: AttributeStore,
    styles: StyleTable,
    config: FormatConfig,
    typing: TypingState,
    history: FormatHistory,
    caret: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("", FormatConfig::default())
    }
}

impl Document {
    pub fn new(text: &str, config: FormatConfig) -> Self {
        let text = TextBuffer::new(text);
        let store = AttributeStore::new(text.len_lines());
        let history = FormatHistory::new(config.history_limit);
        Self {
            text,
            store,
            styles: StyleTable::new(),
            config,
            typing: TypingState::default(),
            history,
            caret: 0,
        }
    }

    pub fn text(&self) -> String {
        self.text.rope().to_string()
    }

    pub fn slice(&self, range: Range<usize>) -> String {
        let range = self.clamp(range);
        self.text.slice(range)
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.text.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.text.len_lines()
    }

    pub fn line_text(&self, line: usize) -> String {
        self.text.line_text(line)
    }

    /// Char range of `line` without its line break.
    pub fn line_range(&self, line: usize) -> Range<usize> {
        self.text.line_start(line)..self.text.line_end(line)
    }

    pub fn line_of(&self, pos: usize) -> usize {
        self.text.line_of(pos)
    }

    /// `(line, column)` of `pos`, line 1-based and column 0-based.
    pub fn line_col(&self, pos: usize) -> (usize, usize) {
        self.text.line_col(pos)
    }

    /// Char index of a 1-based line and 0-based column, clamped.
    pub fn position(&self, line: usize, column: usize) -> usize {
        self.text.position(line, column)
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    pub fn store(&self) -> &AttributeStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut AttributeStore {
        &mut self.store
    }

    pub fn history(&self) -> &FormatHistory {
        &self.history
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Moves the caret. Moving it anywhere else ends typing mode.
    pub fn set_caret(&mut self, pos: usize) {
        let pos = pos.min(self.len());
        if pos != self.caret {
            self.typing.clear();
        }
        self.caret = pos;
    }

    pub fn pending_style(&self) -> Option<&StyleSpec> {
        self.typing.pending()
    }

    pub fn alignment(&self, line: usize) -> Option<Alignment> {
        self.store.alignment(line)
    }

    pub fn list_marker(&self, line: usize) -> ListMarker {
        LineInfo::parse(&self.text.line_text(line)).marker
    }

    /// Normalizes `range` to `start <= end` within the document.
    pub fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let len = self.len();
        let (lo, hi) = if range.start <= range.end {
            (range.start, range.end)
        } else {
            (range.end, range.start)
        };
        let clamped = lo.min(len)..hi.min(len);
        if clamped != range {
            tracing::debug!(
                requested = ?range,
                clamped = ?clamped,
                len,
                "range clamped to document"
            );
        }
        clamped
    }

    /// Lines touched by `range`. A range ending at column 0 of a later line
    /// does not include that line; an empty range yields its own line.
    pub fn line_span(&self, range: Range<usize>) -> Range<usize> {
        let range = self.clamp(range);
        let first = self.text.line_of(range.start);
        let mut last = self.text.line_of(range.end);
        if last > first && self.text.line_start(last) == range.end {
            last -= 1;
        }
        first..last + 1
    }

    pub(crate) fn bundle_at(&self, pos: usize) -> FontBundle {
        self.store
            .font()
            .get(pos)
            .and_then(|id| self.styles.get(*id))
            .cloned()
            .unwrap_or_else(|| self.config.default_bundle())
    }

    /// Covers `range` with `bundle`. The ambient default bundle is never
    /// stored; writing it just clears the range.
    pub(crate) fn write_bundle(&mut self, range: Range<usize>, bundle: FontBundle) {
        if bundle == self.config.default_bundle() {
            self.store.font_mut().remove(range);
        } else {
            let id = self.styles.intern(bundle);
            self.store.font_mut().insert(range, id);
        }
    }

    /// Writes every character-level field of `spec` over `range`.
    pub(crate) fn paint(&mut self, range: Range<usize>, spec: &StyleSpec) {
        self.write_bundle(range.clone(), spec.bundle());
        for channel in [ColorChannel::Foreground, ColorChannel::Background] {
            match spec.color(channel) {
                Some(color) => self.store.color_mut(channel).insert(range.clone(), color),
                None => {
                    self.store.color_mut(channel).remove(range.clone());
                }
            }
        }
    }

    pub(crate) fn set_line_alignment(&mut self, line: usize, alignment: Option<Alignment>) {
        self.store.set_alignment(line, alignment);
    }

    /// Restores a span snapshot, clipping it to the current text first.
    pub(crate) fn restore_spans(&mut self, snapshot: &SpanSnapshot) {
        let len = self.len();
        if snapshot.range.end <= len {
            self.store.restore(snapshot);
            return;
        }
        tracing::debug!(
            range = ?snapshot.range,
            len,
            "clipping stale formatting snapshot"
        );
        let range = snapshot.range.start.min(len)..len;
        let clip = |span: &Range<usize>| span.start.min(len)..span.end.min(len);
        let clipped = SpanSnapshot {
            range,
            font: snapshot.font.as_ref().map(|pieces| {
                pieces
                    .iter()
                    .map(|(span, id)| (clip(span), *id))
                    .filter(|(span, _)| !span.is_empty())
                    .collect()
            }),
            foreground: snapshot.foreground.as_ref().map(|pieces| {
                pieces
                    .iter()
                    .map(|(span, color)| (clip(span), *color))
                    .filter(|(span, _)| !span.is_empty())
                    .collect()
            }),
            background: snapshot.background.as_ref().map(|pieces| {
                pieces
                    .iter()
                    .map(|(span, color)| (clip(span), *color))
                    .filter(|(span, _)| !span.is_empty())
                    .collect()
            }),
        };
        self.store.restore(&clipped);
    }

    pub(crate) fn snapshot_all(&self, range: Range<usize>) -> SpanSnapshot {
        self.store.snapshot(range, &Dimension::ALL)
    }

    pub(crate) fn ambient(&self) -> StyleSpec {
        self.config.default_spec()
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod document_tests;

#[cfg(test)]
#[path = "document/ops_tests.rs"]
mod ops_tests;

#[cfg(test)]
#[path = "document/lists_tests.rs"]
mod lists_tests;

#[cfg(test)]
#[path = "document/undo_tests.rs"]
mod undo_tests;
