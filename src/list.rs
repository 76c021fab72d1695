//! Line-level list markers and the Enter-key continuation rules.
//!
//! Markers are plain text at the start of a line (after indentation), so the
//! marker state of a line is derived from its text rather than stored.

pub const BULLET: &str = "• ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListMarker {
    None,
    Bullet,
    Numbered(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Numbered,
}

/// Parsed anatomy of one line, all lengths in chars.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineInfo {
    pub indent: usize,
    pub marker: ListMarker,
    pub marker_len: usize,
    /// Whether anything but whitespace follows the marker.
    pub has_content: bool,
    /// Whether the whole line is blank.
    pub is_blank: bool,
}

impl LineInfo {
    pub fn parse(line: &str) -> Self {
        let indent = line.chars().take_while(|ch| matches!(ch, ' ' | '\t')).count();
        let tail: String = line.chars().skip(indent).collect();
        let (marker, marker_len) = parse_marker(&tail);
        let has_content = tail.chars().skip(marker_len).any(|ch| !ch.is_whitespace());
        Self {
            indent,
            marker,
            marker_len,
            has_content,
            is_blank: line.trim().is_empty(),
        }
    }

    pub fn kind(&self) -> Option<ListKind> {
        match self.marker {
            ListMarker::None => None,
            ListMarker::Bullet => Some(ListKind::Bullet),
            ListMarker::Numbered(_) => Some(ListKind::Numbered),
        }
    }
}

/// Recognizes `"• "` and `"{digits}. "` (one or more whitespace chars after
/// the dot) at the start of `tail`.
fn parse_marker(tail: &str) -> (ListMarker, usize) {
    if tail.starts_with(BULLET) {
        return (ListMarker::Bullet, BULLET.chars().count());
    }
    let digits = tail.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return (ListMarker::None, 0);
    }
    let mut rest = tail.chars().skip(digits);
    if rest.next() != Some('.') {
        return (ListMarker::None, 0);
    }
    let spaces = rest.take_while(|ch| ch.is_whitespace()).count();
    if spaces == 0 {
        return (ListMarker::None, 0);
    }
    match tail[..digits].parse::<u32>() {
        Ok(number) => (ListMarker::Numbered(number), digits + 1 + spaces),
        Err(_) => (ListMarker::None, 0),
    }
}

pub fn marker_text(kind: ListKind, number: u32) -> String {
    match kind {
        ListKind::Bullet => BULLET.to_string(),
        ListKind::Numbered => format!("{number}. "),
    }
}

/// What pressing Enter should do on a line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineBreak {
    /// Insert a bare line break.
    Plain,
    /// Insert a line break followed by `prefix` (indentation plus marker).
    Continue { prefix: String },
    /// Remove the marker (`indent..indent + marker_len` within the line),
    /// then insert a bare line break.
    Exit { indent: usize, marker_len: usize },
}

/// Decides the Enter-key transition for `line` with the caret at `column`.
pub fn line_break_action(line: &str, column: usize) -> LineBreak {
    let info = LineInfo::parse(line);
    let at_line_end = column >= line.chars().count();
    let indent: String = line.chars().take(info.indent).collect();
    match info.marker {
        ListMarker::None => LineBreak::Plain,
        _ if !info.has_content && at_line_end => LineBreak::Exit {
            indent: info.indent,
            marker_len: info.marker_len,
        },
        ListMarker::Bullet => LineBreak::Continue {
            prefix: format!("{indent}{BULLET}"),
        },
        ListMarker::Numbered(number) => LineBreak::Continue {
            prefix: format!("{indent}{}", marker_text(ListKind::Numbered, number.saturating_add(1))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_markers_after_indentation() {
        let bullet = LineInfo::parse("  • item");
        assert_eq!(bullet.indent, 2);
        assert_eq!(bullet.marker, ListMarker::Bullet);
        assert_eq!(bullet.marker_len, 2);
        assert!(bullet.has_content);

        let numbered = LineInfo::parse("12.  twelve");
        assert_eq!(numbered.marker, ListMarker::Numbered(12));
        assert_eq!(numbered.marker_len, 5);

        assert_eq!(LineInfo::parse("3.14 pi").marker, ListMarker::None);
        assert_eq!(LineInfo::parse("plain").marker, ListMarker::None);
    }

    #[test]
    fn enter_on_items_continues_or_exits() {
        assert_eq!(
            line_break_action("• Item one", 10),
            LineBreak::Continue {
                prefix: BULLET.to_string()
            }
        );
        assert_eq!(
            line_break_action("\t3. third", 9),
            LineBreak::Continue {
                prefix: "\t4. ".to_string()
            }
        );
        assert_eq!(
            line_break_action("• ", 2),
            LineBreak::Exit {
                indent: 0,
                marker_len: 2
            }
        );
        assert_eq!(
            line_break_action("2. ", 3),
            LineBreak::Exit {
                indent: 0,
                marker_len: 3
            }
        );
        assert_eq!(line_break_action("text", 2), LineBreak::Plain);
    }
}
