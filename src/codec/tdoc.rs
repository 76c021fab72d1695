//! FTML and Markdown through the `tdoc` document library.
//!
//! tdoc knows inline emphasis, highlighting and lists, but no fonts, colors
//! or alignment. Export keeps the four flags (as nested style spans), turns
//! any background color into a highlight and groups runs of bullet or
//! numbered lines into lists. Family, size, foreground, alignment and blank
//! lines are dropped. Imported highlights become yellow backgrounds and list
//! entries get their markers back as text.

use std::fmt::Display;
use std::io::Cursor;

use ::tdoc::writer::Writer;
use ::tdoc::{ChecklistItem, Document as TdocDocument, InlineStyle, Paragraph, Span, markdown};

use super::StructuredCodec;
use super::runs::{Run, RunDocument, RunParagraph};
use crate::error::{CodecError, CodecResult};
use crate::list::{BULLET, LineInfo, ListKind, marker_text};
use crate::style::Color;

/// Background given to highlighted text on import.
pub const HIGHLIGHT: Color = Color::rgb(0xff, 0xff, 0x00);

#[derive(Clone, Copy, Debug, Default)]
pub struct FtmlCodec;

#[derive(Clone, Copy, Debug, Default)]
pub struct MarkdownCodec;

fn failure(codec: &'static str, err: impl Display) -> CodecError {
    CodecError::Failure {
        codec,
        message: err.to_string(),
    }
}

impl StructuredCodec for FtmlCodec {
    fn name(&self) -> &'static str {
        "FTML"
    }

    fn encode(&self, runs: &RunDocument) -> CodecResult<Vec<u8>> {
        let text = Writer::new()
            .write_to_string(&to_tdoc(runs))
            .map_err(|err| failure(self.name(), err))?;
        Ok(text.into_bytes())
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<RunDocument> {
        let doc = ::tdoc::parse(Cursor::new(bytes)).map_err(|err| failure(self.name(), err))?;
        Ok(from_tdoc(&doc))
    }
}

impl StructuredCodec for MarkdownCodec {
    fn name(&self) -> &'static str {
        "Markdown"
    }

    fn encode(&self, runs: &RunDocument) -> CodecResult<Vec<u8>> {
        let mut contents = Vec::new();
        markdown::write(&mut contents, &to_tdoc(runs)).map_err(|err| failure(self.name(), err))?;
        Ok(contents)
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<RunDocument> {
        let doc = markdown::parse(Cursor::new(bytes)).map_err(|err| failure(self.name(), err))?;
        Ok(from_tdoc(&doc))
    }
}

fn to_tdoc(runs: &RunDocument) -> TdocDocument {
    let mut paragraphs = Vec::new();
    let mut list: Option<(ListKind, Vec<Vec<Paragraph>>)> = None;

    for paragraph in &runs.paragraphs {
        let info = LineInfo::parse(&paragraph.text());
        if info.is_blank {
            flush_list(&mut list, &mut paragraphs);
            continue;
        }
        let Some(kind) = info.kind() else {
            flush_list(&mut list, &mut paragraphs);
            paragraphs.push(Paragraph::new_text().with_content(spans_for(&paragraph.runs)));
            continue;
        };
        let content = drop_chars(&paragraph.runs, info.indent + info.marker_len);
        let entry = vec![Paragraph::new_text().with_content(spans_for(&content))];
        match &mut list {
            Some((current, entries)) if *current == kind => entries.push(entry),
            _ => {
                flush_list(&mut list, &mut paragraphs);
                list = Some((kind, vec![entry]));
            }
        }
    }
    flush_list(&mut list, &mut paragraphs);

    tracing::trace!(paragraphs = paragraphs.len(), "built tdoc document");
    TdocDocument::new().with_paragraphs(paragraphs)
}

fn flush_list(list: &mut Option<(ListKind, Vec<Vec<Paragraph>>)>, out: &mut Vec<Paragraph>) {
    match list.take() {
        Some((ListKind::Bullet, entries)) => {
            out.push(Paragraph::new_unordered_list().with_entries(entries));
        }
        Some((ListKind::Numbered, entries)) => {
            out.push(Paragraph::new_ordered_list().with_entries(entries));
        }
        None => {}
    }
}

/// `runs` without their first `count` chars.
fn drop_chars(runs: &[Run], mut count: usize) -> Vec<Run> {
    let mut kept = Vec::new();
    for run in runs {
        let len = run.text.chars().count();
        if count >= len {
            count -= len;
            continue;
        }
        let mut run = run.clone();
        if count > 0 {
            run.text = run.text.chars().skip(count).collect();
            count = 0;
        }
        kept.push(run);
    }
    kept
}

fn spans_for(runs: &[Run]) -> Vec<Span> {
    if runs.is_empty() {
        return vec![Span::new_text("")];
    }
    runs.iter().map(run_span).collect()
}

/// One span per style, outermost first, around an unstyled text leaf.
fn run_span(run: &Run) -> Span {
    let styles = [
        (run.bold, InlineStyle::Bold),
        (run.italic, InlineStyle::Italic),
        (run.underline, InlineStyle::Underline),
        (run.strike, InlineStyle::Strike),
        (run.background.is_some(), InlineStyle::Highlight),
    ];

    let mut span = Span::new_text(run.text.as_str());
    for (_, style) in styles.into_iter().rev().filter(|(on, _)| *on) {
        let mut parent = Span::new_text("");
        parent.style = style;
        parent.children = vec![span];
        span = parent;
    }
    span
}

fn from_tdoc(doc: &TdocDocument) -> RunDocument {
    let mut paragraphs = Vec::new();
    for paragraph in &doc.paragraphs {
        collect_paragraph(paragraph, &mut paragraphs);
    }
    RunDocument { paragraphs }
}

fn collect_paragraph(paragraph: &Paragraph, out: &mut Vec<RunParagraph>) {
    match paragraph {
        Paragraph::Text { content }
        | Paragraph::Header1 { content }
        | Paragraph::Header2 { content }
        | Paragraph::Header3 { content }
        | Paragraph::CodeBlock { content } => out.push(paragraph_of(content)),
        Paragraph::Quote { children } => {
            for child in children {
                collect_paragraph(child, out);
            }
        }
        Paragraph::OrderedList { entries } => {
            for (index, entry) in entries.iter().enumerate() {
                let number = u32::try_from(index + 1).unwrap_or(u32::MAX);
                collect_entry(entry, marker_text(ListKind::Numbered, number), out);
            }
        }
        Paragraph::UnorderedList { entries } => {
            for entry in entries {
                collect_entry(entry, BULLET.to_string(), out);
            }
        }
        Paragraph::Checklist { items } => {
            for item in items {
                collect_item(item, out);
            }
        }
    }
}

fn collect_entry(entry: &[Paragraph], marker: String, out: &mut Vec<RunParagraph>) {
    let first = out.len();
    for paragraph in entry {
        collect_paragraph(paragraph, out);
    }
    let marker = Run::plain(marker);
    match out.get_mut(first) {
        Some(paragraph) => paragraph.runs.insert(0, marker),
        None => out.push(RunParagraph {
            alignment: None,
            runs: vec![marker],
        }),
    }
}

fn collect_item(item: &ChecklistItem, out: &mut Vec<RunParagraph>) {
    out.push(paragraph_of(&item.content));
    for child in &item.children {
        collect_item(child, out);
    }
}

fn paragraph_of(spans: &[Span]) -> RunParagraph {
    let mut runs = Vec::new();
    flatten(spans, &Run::default(), &mut runs);
    RunParagraph {
        alignment: None,
        runs,
    }
}

fn flatten(spans: &[Span], inherited: &Run, out: &mut Vec<Run>) {
    for span in spans {
        let mut style = inherited.clone();
        apply_inline(&mut style, &span.style);
        if !span.text.is_empty() {
            push_run(
                out,
                Run {
                    text: span.text.clone(),
                    ..style.clone()
                },
            );
        }
        flatten(&span.children, &style, out);
    }
}

fn apply_inline(run: &mut Run, style: &InlineStyle) {
    match style {
        InlineStyle::Bold => run.bold = true,
        InlineStyle::Italic => run.italic = true,
        InlineStyle::Underline => run.underline = true,
        InlineStyle::Strike => run.strike = true,
        InlineStyle::Highlight => run.background = Some(HIGHLIGHT),
        _ => {}
    }
}

/// Appends `run`, merging it into the previous run when both are formatted
/// alike.
fn push_run(runs: &mut Vec<Run>, run: Run) {
    if let Some(last) = runs.last_mut() {
        let alike = Run {
            text: String::new(),
            ..last.clone()
        } == Run {
            text: String::new(),
            ..run.clone()
        };
        if alike {
            last.text.push_str(&run.text);
            return;
        }
    }
    runs.push(run);
}
