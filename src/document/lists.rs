use std::ops::Range;

use super::Document;
use crate::list::{self, LineBreak, LineInfo, ListKind};

impl Document {
    /// Handles Enter at `at`: continues a bullet or numbered list, leaves
    /// it when the current item is empty, or inserts a bare line break.
    /// The whole transition is one text-undo step. Returns the new caret.
    pub fn insert_line_break(&mut self, at: usize) -> usize {
        let at = at.min(self.len());
        self.set_caret(at);
        let line = self.text.line_of(at);
        let line_start = self.text.line_start(line);
        let action = list::line_break_action(&self.text.line_text(line), at - line_start);
        let pending = self.typing.pending().cloned();

        self.text.begin_group();
        match action {
            LineBreak::Plain => {
                self.splice_in(at, "\n", pending.as_ref());
            }
            LineBreak::Continue { prefix } => {
                self.splice_in(at, &format!("\n{prefix}"), pending.as_ref());
            }
            LineBreak::Exit { indent, marker_len } => {
                let marker = line_start + indent..line_start + indent + marker_len;
                tracing::debug!(line, "leaving list on empty item");
                self.splice_out(marker);
                self.splice_in(at - marker_len, "\n", pending.as_ref());
            }
        }
        self.text.end_group();
        self.caret
    }

    pub fn toggle_bullet_list(&mut self, range: Range<usize>) -> bool {
        self.toggle_list(range, ListKind::Bullet)
    }

    pub fn toggle_numbered_list(&mut self, range: Range<usize>) -> bool {
        self.toggle_list(range, ListKind::Numbered)
    }

    /// If every non-blank line touched by `range` already is an item of
    /// `kind`, strips the markers. Otherwise gives every non-blank line a
    /// marker of `kind`, replacing markers of the other kind and numbering
    /// from 1. Blank lines are skipped but keep their place.
    fn toggle_list(&mut self, range: Range<usize>, kind: ListKind) -> bool {
        let lines: Vec<(usize, LineInfo)> = self
            .line_span(range)
            .map(|line| (line, LineInfo::parse(&self.text.line_text(line))))
            .filter(|(_, info)| !info.is_blank)
            .collect();
        if lines.is_empty() {
            return false;
        }
        let remove = lines.iter().all(|(_, info)| info.kind() == Some(kind));
        tracing::debug!(
            ?kind,
            remove,
            lines = lines.len(),
            "toggling list markers"
        );

        let mut changed = false;
        self.text.begin_group();
        // Bottom-up so earlier line offsets stay valid.
        for (number, (line, info)) in lines.iter().enumerate().rev() {
            let start = self.text.line_start(*line) + info.indent;
            let existing = start..start + info.marker_len;
            if remove {
                self.splice_out(existing);
                changed = true;
                continue;
            }
            let marker = list::marker_text(kind, number as u32 + 1);
            if self.text.slice(existing.clone()) == marker {
                continue;
            }
            if !existing.is_empty() {
                self.splice_out(existing);
            }
            self.splice_in(start, &marker, None);
            changed = true;
        }
        self.text.end_group();
        changed
    }
}
