//! Run-based document exchange: paragraphs of style-homogeneous runs.
//!
//! This is the shape structured formats (DOCX-like libraries, FTML,
//! Markdown) are bridged through. Every line of the document becomes one
//! paragraph, and every coalesced segment of that line one run.

use crate::config::FormatConfig;
use crate::document::Document;
use crate::style::{Alignment, Color, ColorChannel, FontBundle, StyleSpec};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunDocument {
    pub paragraphs: Vec<RunParagraph>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunParagraph {
    pub alignment: Option<Alignment>,
    pub runs: Vec<Run>,
}

impl RunParagraph {
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    /// Font family; the ambient default when absent.
    pub family: Option<String>,
    /// Point size; the ambient default when absent.
    pub size: Option<u16>,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    fn from_spec(text: String, spec: &StyleSpec) -> Self {
        Self {
            text,
            bold: spec.bold,
            italic: spec.italic,
            underline: spec.underline,
            strike: spec.strike,
            family: Some(spec.family.clone()),
            size: Some(spec.size),
            foreground: spec.foreground,
            background: spec.background,
        }
    }

    fn bundle(&self, config: &FormatConfig) -> FontBundle {
        FontBundle {
            family: self
                .family
                .clone()
                .filter(|family| !family.trim().is_empty())
                .unwrap_or_else(|| config.default_family.clone()),
            size: self
                .size
                .filter(|size| *size > 0)
                .unwrap_or(config.default_size),
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            strike: self.strike,
        }
    }
}

/// One paragraph per line with its alignment, one run per coalesced
/// segment. Empty lines become paragraphs without runs.
pub fn export_runs(doc: &Document) -> RunDocument {
    let paragraphs = (0..doc.line_count())
        .map(|line| {
            let range = doc.line_range(line);
            let runs = doc
                .segments(range)
                .into_iter()
                .map(|segment| Run::from_spec(doc.slice(segment.range), &segment.spec))
                .collect();
            RunParagraph {
                alignment: doc.alignment(line),
                runs,
            }
        })
        .collect();
    RunDocument { paragraphs }
}

/// Builds a document from runs. Paragraphs are joined with line breaks,
/// which carry no character formatting; each run's bundle and colors cover
/// exactly its text.
pub fn import_runs(runs: &RunDocument, config: FormatConfig) -> Document {
    let text = runs
        .paragraphs
        .iter()
        .map(RunParagraph::text)
        .collect::<Vec<_>>()
        .join("\n");
    let mut doc = Document::new(&text, config.clone());

    let mut pos = 0;
    for paragraph in &runs.paragraphs {
        let start = pos;
        for run in &paragraph.runs {
            let len = run.text.chars().count();
            let range = pos..pos + len;
            doc.write_bundle(range.clone(), run.bundle(&config));
            for (channel, color) in [
                (ColorChannel::Foreground, run.foreground),
                (ColorChannel::Background, run.background),
            ] {
                if let Some(color) = color {
                    doc.store_mut().color_mut(channel).insert(range.clone(), color);
                }
            }
            pos += len;
        }
        if paragraph.alignment.is_some() {
            for line in doc.line_of(start)..=doc.line_of(pos) {
                doc.set_line_alignment(line, paragraph.alignment);
            }
        }
        pos += 1;
    }
    tracing::debug!(
        paragraphs = runs.paragraphs.len(),
        chars = doc.len(),
        "imported run document"
    );
    doc
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::style::StyleFlag;

    #[test]
    fn export_emits_one_run_per_segment_and_empty_paragraphs() {
        let mut doc = Document::new("Hello world\n\nend", FormatConfig::default());
        doc.toggle_flag(0..5, StyleFlag::Bold);
        doc.set_alignment(13..13, Alignment::Center);

        let exported = export_runs(&doc);
        assert_eq!(exported.paragraphs.len(), 3);
        let first = &exported.paragraphs[0];
        assert_eq!(first.runs.len(), 2);
        assert_eq!(first.runs[0].text, "Hello");
        assert!(first.runs[0].bold);
        assert_eq!(first.runs[1].text, " world");
        assert!(exported.paragraphs[1].runs.is_empty());
        assert_eq!(exported.paragraphs[2].alignment, Some(Alignment::Center));
    }

    #[test]
    fn import_applies_runs_and_alignment() {
        let runs = RunDocument {
            paragraphs: vec![
                RunParagraph {
                    alignment: Some(Alignment::Right),
                    runs: vec![
                        Run::plain("Plain "),
                        Run {
                            text: "loud".into(),
                            bold: true,
                            size: Some(16),
                            foreground: Some(Color::rgb(200, 0, 0)),
                            ..Run::default()
                        },
                    ],
                },
                RunParagraph::default(),
            ],
        };
        let doc = import_runs(&runs, FormatConfig::default());
        assert_eq!(doc.text(), "Plain loud\n");
        assert_eq!(doc.alignment(0), Some(Alignment::Right));
        assert_eq!(doc.alignment(1), None);
        assert!(!doc.resolve(5).bold);
        let loud = doc.resolve(6);
        assert!(loud.bold);
        assert_eq!(loud.size, 16);
        assert_eq!(loud.family, "Calibri");
        assert_eq!(loud.foreground, Some(Color::rgb(200, 0, 0)));
        assert_eq!(doc.store().font().len(), 1);
    }

    #[test]
    fn export_then_import_preserves_every_character_outside_breaks() {
        let mut doc = Document::new("ab cd\nef gh", FormatConfig::default());
        doc.toggle_flag(1..8, StyleFlag::Strike);
        doc.set_font_family(3..5, "Georgia");
        doc.apply_color(4..10, ColorChannel::Background, Some(Color::rgb(1, 2, 3)));
        doc.set_alignment(7..7, Alignment::Center);

        let copy = import_runs(&export_runs(&doc), FormatConfig::default());
        assert_eq!(copy.text(), doc.text());
        for pos in (0..doc.len()).filter(|pos| *pos != 5) {
            assert_eq!(copy.resolve(pos), doc.resolve(pos), "position {pos}");
        }
        assert_eq!(copy.alignment(1), Some(Alignment::Center));
    }

    #[test]
    fn alignment_follows_line_breaks_inside_runs() {
        let runs = RunDocument {
            paragraphs: vec![
                RunParagraph {
                    alignment: None,
                    runs: vec![Run::plain("code\nblock")],
                },
                RunParagraph {
                    alignment: Some(Alignment::Center),
                    runs: vec![Run::plain("title")],
                },
                RunParagraph {
                    alignment: Some(Alignment::Right),
                    runs: vec![Run::plain("two\nlines")],
                },
            ],
        };
        let doc = import_runs(&runs, FormatConfig::default());
        assert_eq!(doc.text(), "code\nblock\ntitle\ntwo\nlines");
        assert_eq!(doc.alignment(0), None);
        assert_eq!(doc.alignment(1), None);
        assert_eq!(doc.alignment(2), Some(Alignment::Center));
        assert_eq!(doc.alignment(3), Some(Alignment::Right));
        assert_eq!(doc.alignment(4), Some(Alignment::Right));
    }
}
