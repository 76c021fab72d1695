//! Per-document attribute storage.
//!
//! Character-level attributes live in one [`IntervalMap`] per dimension:
//! the font bundle (as an interned [`StyleId`]), the foreground color and
//! the background color. Ranges of different dimensions overlap freely;
//! ranges of the same dimension never do. Alignment is a line attribute and
//! is kept in a vector indexed by line.

use std::ops::Range;

use crate::style::{Alignment, Color, ColorChannel, StyleId};

pub mod interval;

pub use interval::IntervalMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    Font,
    Foreground,
    Background,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Font, Dimension::Foreground, Dimension::Background];
}

impl From<ColorChannel> for Dimension {
    fn from(channel: ColorChannel) -> Self {
        match channel {
            ColorChannel::Foreground => Dimension::Foreground,
            ColorChannel::Background => Dimension::Background,
        }
    }
}

/// Captured contents of a char range for a subset of dimensions.
/// `None` means the dimension was not captured and is left alone on restore.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpanSnapshot {
    pub range: Range<usize>,
    pub font: Option<Vec<(Range<usize>, StyleId)>>,
    pub foreground: Option<Vec<(Range<usize>, Color)>>,
    pub background: Option<Vec<(Range<usize>, Color)>>,
}

impl SpanSnapshot {
    pub fn is_empty(&self) -> bool {
        self.font.as_ref().is_none_or(Vec::is_empty)
            && self.foreground.as_ref().is_none_or(Vec::is_empty)
            && self.background.as_ref().is_none_or(Vec::is_empty)
    }
}

/// Alignment values of consecutive lines starting at `first_line`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineSnapshot {
    pub first_line: usize,
    pub values: Vec<Option<Alignment>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeStore {
    font: IntervalMap<StyleId>,
    foreground: IntervalMap<Color>,
    background: IntervalMap<Color>,
    alignment: Vec<Option<Alignment>>,
}

impl AttributeStore {
    pub fn new(line_count: usize) -> Self {
        Self {
            font: IntervalMap::new(),
            foreground: IntervalMap::new(),
            background: IntervalMap::new(),
            alignment: vec![None; line_count.max(1)],
        }
    }

    pub fn font(&self) -> &IntervalMap<StyleId> {
        &self.font
    }

    pub fn font_mut(&mut self) -> &mut IntervalMap<StyleId> {
        &mut self.font
    }

    pub fn color(&self, channel: ColorChannel) -> &IntervalMap<Color> {
        match channel {
            ColorChannel::Foreground => &self.foreground,
            ColorChannel::Background => &self.background,
        }
    }

    pub fn color_mut(&mut self, channel: ColorChannel) -> &mut IntervalMap<Color> {
        match channel {
            ColorChannel::Foreground => &mut self.foreground,
            ColorChannel::Background => &mut self.background,
        }
    }

    pub fn line_count(&self) -> usize {
        self.alignment.len()
    }

    pub fn alignment(&self, line: usize) -> Option<Alignment> {
        self.alignment.get(line).copied().flatten()
    }

    pub fn set_alignment(&mut self, line: usize, alignment: Option<Alignment>) {
        if let Some(slot) = self.alignment.get_mut(line) {
            *slot = alignment;
        }
    }

    pub fn snapshot_lines(&self, lines: Range<usize>) -> LineSnapshot {
        let end = lines.end.min(self.alignment.len());
        let start = lines.start.min(end);
        LineSnapshot {
            first_line: start,
            values: self.alignment[start..end].to_vec(),
        }
    }

    pub fn restore_lines(&mut self, snapshot: &LineSnapshot) {
        for (offset, value) in snapshot.values.iter().enumerate() {
            self.set_alignment(snapshot.first_line + offset, *value);
        }
    }

    pub fn snapshot(&self, range: Range<usize>, dimensions: &[Dimension]) -> SpanSnapshot {
        let mut snapshot = SpanSnapshot {
            range: range.clone(),
            ..SpanSnapshot::default()
        };
        for dimension in dimensions {
            match dimension {
                Dimension::Font => snapshot.font = Some(self.font.clipped(range.clone())),
                Dimension::Foreground => {
                    snapshot.foreground = Some(self.foreground.clipped(range.clone()))
                }
                Dimension::Background => {
                    snapshot.background = Some(self.background.clipped(range.clone()))
                }
            }
        }
        snapshot
    }

    pub fn restore(&mut self, snapshot: &SpanSnapshot) {
        let range = snapshot.range.clone();
        if let Some(pieces) = &snapshot.font {
            self.font.restore(range.clone(), pieces);
        }
        if let Some(pieces) = &snapshot.foreground {
            self.foreground.restore(range.clone(), pieces);
        }
        if let Some(pieces) = &snapshot.background {
            self.background.restore(range, pieces);
        }
    }

    /// Sorted, deduplicated positions inside `range` where any
    /// character-level dimension may change, including both endpoints.
    pub fn boundaries(&self, range: Range<usize>) -> Vec<usize> {
        let mut bounds = vec![range.start, range.end];
        self.font.collect_boundaries(range.clone(), &mut bounds);
        self.foreground.collect_boundaries(range.clone(), &mut bounds);
        self.background.collect_boundaries(range, &mut bounds);
        bounds.sort_unstable();
        bounds.dedup();
        bounds
    }

    /// Adjusts for `len` chars inserted at `at` on `line`, of which
    /// `new_lines` are line breaks. Lines split off `line` keep its alignment.
    pub fn apply_insert(&mut self, at: usize, len: usize, line: usize, new_lines: usize) {
        self.font.shift_for_insert(at, len);
        self.foreground.shift_for_insert(at, len);
        self.background.shift_for_insert(at, len);
        if new_lines > 0 {
            let inherited = self.alignment(line);
            let idx = (line + 1).min(self.alignment.len());
            self.alignment
                .splice(idx..idx, std::iter::repeat_n(inherited, new_lines));
        }
    }

    /// Adjusts for `range` deleted where it started on `line` and contained
    /// `removed_lines` line breaks. The merged line keeps `line`'s alignment.
    pub fn apply_delete(&mut self, range: Range<usize>, line: usize, removed_lines: usize) {
        self.font.shift_for_delete(range.clone());
        self.foreground.shift_for_delete(range.clone());
        self.background.shift_for_delete(range);
        if removed_lines > 0 {
            let start = (line + 1).min(self.alignment.len());
            let end = (start + removed_lines).min(self.alignment.len());
            self.alignment.drain(start..end);
        }
        if self.alignment.is_empty() {
            self.alignment.push(None);
        }
    }
}
