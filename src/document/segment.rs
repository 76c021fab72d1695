use std::ops::Range;

use super::Document;
use crate::style::{ColorChannel, StyleSpec};

/// A sub-range of uniform effective style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub range: Range<usize>,
    pub spec: StyleSpec,
}

impl Document {
    /// Effective style of the char at `pos`: the ambient default, replaced
    /// by the font bundle covering `pos`, with both colors layered on top
    /// independently. At or past the end of the text this is the default.
    pub fn resolve(&self, pos: usize) -> StyleSpec {
        let bundle = self.bundle_at(pos);
        let foreground = self.store.color(ColorChannel::Foreground).get(pos).copied();
        let background = self.store.color(ColorChannel::Background).get(pos).copied();
        StyleSpec::from_parts(bundle, foreground, background)
    }

    /// Partitions `range` into maximal runs of equal effective style.
    ///
    /// The result is contiguous, covers the clamped range exactly once and
    /// never holds two neighbours with equal specs. Empty ranges have no
    /// segments.
    pub fn segments(&self, range: Range<usize>) -> Vec<Segment> {
        let range = self.clamp(range);
        if range.is_empty() {
            return Vec::new();
        }
        let bounds = self.store.boundaries(range);
        let pieces = bounds.windows(2).map(|pair| Segment {
            range: pair[0]..pair[1],
            spec: self.resolve(pair[0]),
        });
        coalesce(pieces)
    }
}

/// Merges touching neighbours that carry equal specs.
pub fn coalesce(segments: impl IntoIterator<Item = Segment>) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::new();
    for segment in segments {
        if segment.range.is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(last) if last.range.end == segment.range.start && last.spec == segment.spec => {
                last.range.end = segment.range.end;
            }
            _ => merged.push(segment),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatConfig;
    use crate::style::{Color, StyleFlag};

    #[test]
    fn coalesce_joins_equal_neighbours_only() {
        let plain = FormatConfig::default().default_spec();
        let mut bold = plain.clone();
        bold.set_flag(StyleFlag::Bold, true);
        let merged = coalesce(vec![
            Segment { range: 0..2, spec: plain.clone() },
            Segment { range: 2..4, spec: plain.clone() },
            Segment { range: 4..4, spec: bold.clone() },
            Segment { range: 4..6, spec: bold.clone() },
            Segment { range: 7..9, spec: bold.clone() },
        ]);
        let ranges: Vec<_> = merged.iter().map(|segment| segment.range.clone()).collect();
        assert_eq!(ranges, vec![0..4, 4..6, 7..9]);
    }

    #[test]
    fn colors_layer_over_bundles_independently() {
        let mut doc = Document::new("Hello world", FormatConfig::default());
        doc.toggle_flag(0..5, StyleFlag::Italic);
        doc.apply_color(3..8, ColorChannel::Foreground, Some(Color::rgb(0, 128, 0)));

        let spec = doc.resolve(4);
        assert!(spec.italic);
        assert_eq!(spec.foreground, Some(Color::rgb(0, 128, 0)));
        assert_eq!(doc.resolve(11), FormatConfig::default().default_spec());

        let ranges: Vec<_> = doc
            .segments(0..11)
            .into_iter()
            .map(|segment| segment.range)
            .collect();
        assert_eq!(ranges, vec![0..3, 3..5, 5..8, 8..11]);
    }
}
