use std::ops::Range;

use super::{Document, Segment};
use crate::history::FormatRecord;
use crate::store::{Dimension, SpanSnapshot};
use crate::style::{Alignment, Color, ColorChannel, FontBundle, StyleFlag, StyleSpec};

impl Document {
    /// Toggles `flag` over `range` as a single decision: if every segment
    /// already carries the flag it is turned off everywhere, otherwise it is
    /// turned on everywhere. All other fields of each segment are kept.
    ///
    /// With an empty range the text is left alone and the flip is armed for
    /// typing at that position instead.
    pub fn toggle_flag(&mut self, range: Range<usize>, flag: StyleFlag) -> bool {
        let range = self.clamp(range);
        if range.is_empty() {
            self.arm_typing(range.start, |spec| {
                let value = !spec.flag(flag);
                spec.set_flag(flag, value);
            });
            return false;
        }
        let segments = self.segments(range.clone());
        let turn_on = !segments.iter().all(|segment| segment.spec.flag(flag));
        tracing::debug!(?range, flag = flag.label(), turn_on, "toggling style flag");
        self.rewrite_bundles(range, &segments, |bundle| bundle.set_flag(flag, turn_on))
    }

    pub fn set_font_family(&mut self, range: Range<usize>, family: &str) -> bool {
        let family = family.trim();
        if family.is_empty() {
            return false;
        }
        let range = self.clamp(range);
        if range.is_empty() {
            self.arm_typing(range.start, |spec| spec.family = family.to_string());
            return false;
        }
        let segments = self.segments(range.clone());
        self.rewrite_bundles(range, &segments, |bundle| bundle.family = family.to_string())
    }

    /// Sets the point size (at 100% zoom). A size of zero is ignored.
    pub fn set_font_size(&mut self, range: Range<usize>, size: u16) -> bool {
        if size == 0 {
            return false;
        }
        let range = self.clamp(range);
        if range.is_empty() {
            self.arm_typing(range.start, |spec| spec.size = size);
            return false;
        }
        let segments = self.segments(range.clone());
        self.rewrite_bundles(range, &segments, |bundle| bundle.size = size)
    }

    /// Sets (or with `None` removes) one color channel over `range`. The
    /// font bundle and the other channel are not touched.
    pub fn apply_color(
        &mut self,
        range: Range<usize>,
        channel: ColorChannel,
        color: Option<Color>,
    ) -> bool {
        let range = self.clamp(range);
        if range.is_empty() {
            self.arm_typing(range.start, |spec| spec.set_color(channel, color));
            return false;
        }
        let dimension = [Dimension::from(channel)];
        let before = self.store.snapshot(range.clone(), &dimension);
        match color {
            Some(color) => self.store.color_mut(channel).insert(range.clone(), color),
            None => {
                self.store.color_mut(channel).remove(range.clone());
            }
        }
        let after = self.store.snapshot(range, &dimension);
        self.commit_spans(before, after)
    }

    /// Aligns every line touched by `range`. An empty range aligns the line
    /// it sits on.
    pub fn set_alignment(&mut self, range: Range<usize>, alignment: Alignment) -> bool {
        let lines = self.line_span(range);
        let before = self.store.snapshot_lines(lines.clone());
        for line in lines.clone() {
            self.set_line_alignment(line, Some(alignment));
        }
        let after = self.store.snapshot_lines(lines);
        if before == after {
            return false;
        }
        tracing::debug!(
            first_line = after.first_line,
            lines = after.values.len(),
            alignment = alignment.as_str(),
            "alignment set"
        );
        self.history.push(FormatRecord::Lines { before, after });
        true
    }

    /// Removes the font bundle and both colors from `range`, and the
    /// alignment of every line whose first char lies inside it.
    ///
    /// With an empty range only the pending typing style is dropped.
    pub fn clear_formatting(&mut self, range: Range<usize>) -> bool {
        let range = self.clamp(range);
        if range.is_empty() {
            self.set_caret(range.start);
            self.typing.clear();
            return false;
        }

        let spans_before = self.snapshot_all(range.clone());
        self.store.font_mut().remove(range.clone());
        for channel in [ColorChannel::Foreground, ColorChannel::Background] {
            self.store.color_mut(channel).remove(range.clone());
        }
        let spans_after = self.snapshot_all(range.clone());

        let lines = self.lines_starting_in(range.clone());
        let lines_before = self.store.snapshot_lines(lines.clone());
        for line in lines.clone() {
            self.set_line_alignment(line, None);
        }
        let lines_after = self.store.snapshot_lines(lines);

        if spans_before == spans_after && lines_before == lines_after {
            return false;
        }
        tracing::debug!(?range, "formatting cleared");
        self.history.push(FormatRecord::Cleared {
            spans_before,
            spans_after,
            lines_before,
            lines_after,
        });
        true
    }

    fn lines_starting_in(&self, range: Range<usize>) -> Range<usize> {
        let mut first = self.text.line_of(range.start);
        if self.text.line_start(first) < range.start {
            first += 1;
        }
        let mut end = first;
        while end < self.text.len_lines() && self.text.line_start(end) < range.end {
            end += 1;
        }
        first..end
    }

    fn rewrite_bundles(
        &mut self,
        range: Range<usize>,
        segments: &[Segment],
        change: impl Fn(&mut FontBundle),
    ) -> bool {
        let before = self.store.snapshot(range.clone(), &[Dimension::Font]);
        for segment in segments {
            let mut bundle = segment.spec.bundle();
            change(&mut bundle);
            self.write_bundle(segment.range.clone(), bundle);
        }
        let after = self.store.snapshot(range, &[Dimension::Font]);
        self.commit_spans(before, after)
    }

    fn commit_spans(&mut self, before: SpanSnapshot, after: SpanSnapshot) -> bool {
        if before == after {
            return false;
        }
        self.history.push(FormatRecord::Spans { before, after });
        true
    }

    /// Arms typing mode at `pos`: the style a char typed there would get,
    /// with `change` applied on top.
    fn arm_typing(&mut self, pos: usize, change: impl FnOnce(&mut StyleSpec)) {
        self.set_caret(pos);
        let mut spec = match self.typing.pending() {
            Some(pending) => pending.clone(),
            None => match pos.checked_sub(1) {
                Some(left) => self.resolve(left),
                None => self.ambient(),
            },
        };
        change(&mut spec);
        let ambient = self.ambient();
        self.typing.arm(spec, &ambient);
        tracing::trace!(pos, armed = self.typing.is_armed(), "typing style updated");
    }
}
