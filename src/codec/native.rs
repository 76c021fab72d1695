//! Native `.pwp` documents: JSON holding the text and named tags.
//!
//! Each tag has a list of `"line.column"` ranges (lines 1-based, columns
//! 0-based chars) and optionally a config describing what it does: a font
//! bundle, a foreground or background color, or a line alignment. Tags are
//! applied in file order, so a later tag wins where two tags of the same
//! dimension overlap.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::config::FormatConfig;
use crate::document::Document;
use crate::error::{CodecError, CodecResult};
use crate::style::{Alignment, Color, ColorChannel, FontBundle, StyleFlag, StyleId};

pub const SCHEMA_VERSION: u64 = 1;

const SELECTION_TAG: &str = "sel";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeFile {
    pub version: u64,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<TagRecord>,
    #[serde(default)]
    pub tag_configs: BTreeMap<String, TagConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    pub name: String,
    #[serde(default)]
    pub ranges: Vec<(String, String)>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justify: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontConfig>,
}

/// Font description in the vocabulary of Tk fonts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontConfig {
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub slant: Option<String>,
    #[serde(default)]
    pub underline: Option<i64>,
    #[serde(default)]
    pub overstrike: Option<i64>,
}

impl FontConfig {
    fn from_bundle(bundle: &FontBundle) -> Self {
        Self {
            family: Some(bundle.family.clone()),
            size: Some(i64::from(bundle.size)),
            weight: Some(if bundle.bold { "bold" } else { "normal" }.to_string()),
            slant: Some(if bundle.italic { "italic" } else { "roman" }.to_string()),
            underline: Some(i64::from(bundle.underline)),
            overstrike: Some(i64::from(bundle.strike)),
        }
    }

    fn to_bundle(&self, tag: &str, config: &FormatConfig) -> CodecResult<FontBundle> {
        let size = match self.size {
            None => config.default_size,
            Some(size) => u16::try_from(size)
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| malformed(format!("tag '{tag}' has invalid font size {size}")))?,
        };
        Ok(FontBundle {
            family: self
                .family
                .clone()
                .filter(|family| !family.is_empty())
                .unwrap_or_else(|| config.default_family.clone()),
            size,
            bold: self.weight.as_deref() == Some("bold"),
            italic: self.slant.as_deref() == Some("italic"),
            underline: self.underline.unwrap_or(0) != 0,
            strike: self.overstrike.unwrap_or(0) != 0,
        })
    }
}

fn malformed(message: String) -> CodecError {
    CodecError::Malformed(message)
}

fn font_tag(id: StyleId) -> String {
    format!("fontstyle_{}", id.index())
}

fn color_tag(channel: ColorChannel, color: Color) -> String {
    match channel {
        ColorChannel::Foreground => format!("color_fg_{color}"),
        ColorChannel::Background => format!("color_bg_{color}"),
    }
}

fn legacy_flag(name: &str) -> Option<StyleFlag> {
    match name {
        "bold" => Some(StyleFlag::Bold),
        "italic" => Some(StyleFlag::Italic),
        "underline" => Some(StyleFlag::Underline),
        "overstrike" => Some(StyleFlag::Strike),
        _ => None,
    }
}

/// Serializes `doc` to pretty-printed native JSON.
pub fn to_native(doc: &Document) -> CodecResult<String> {
    let file = native_file(doc);
    Ok(serde_json::to_string_pretty(&file)?)
}

pub fn native_file(doc: &Document) -> NativeFile {
    let mut tags: Vec<TagRecord> = Vec::new();
    let mut tag_configs = BTreeMap::new();
    let push_range = |tags: &mut Vec<TagRecord>, name: String, range: (String, String)| {
        match tags.iter_mut().find(|tag| tag.name == name) {
            Some(tag) => tag.ranges.push(range),
            None => tags.push(TagRecord {
                name,
                ranges: vec![range],
            }),
        }
    };
    let index = |pos: usize| {
        let (line, column) = doc.line_col(pos);
        format!("{line}.{column}")
    };

    for (range, id) in doc.store().font().iter() {
        let Some(bundle) = doc.styles().get(*id) else {
            continue;
        };
        let name = font_tag(*id);
        tag_configs.entry(name.clone()).or_insert_with(|| TagConfig {
            font: Some(FontConfig::from_bundle(bundle)),
            ..TagConfig::default()
        });
        push_range(&mut tags, name, (index(range.start), index(range.end)));
    }

    for channel in [ColorChannel::Foreground, ColorChannel::Background] {
        for (range, color) in doc.store().color(channel).iter() {
            let name = color_tag(channel, *color);
            tag_configs.entry(name.clone()).or_insert_with(|| {
                let mut config = TagConfig::default();
                match channel {
                    ColorChannel::Foreground => config.foreground = Some(color.to_string()),
                    ColorChannel::Background => config.background = Some(color.to_string()),
                }
                config
            });
            push_range(&mut tags, name, (index(range.start), index(range.end)));
        }
    }

    let mut line = 0;
    while line < doc.line_count() {
        let Some(alignment) = doc.alignment(line) else {
            line += 1;
            continue;
        };
        let first = line;
        while line < doc.line_count() && doc.alignment(line) == Some(alignment) {
            line += 1;
        }
        let name = alignment.as_str().to_string();
        tag_configs.entry(name.clone()).or_insert_with(|| TagConfig {
            justify: Some(name.clone()),
            ..TagConfig::default()
        });
        push_range(
            &mut tags,
            name,
            (format!("{}.0", first + 1), format!("{}.0", line + 1)),
        );
    }

    NativeFile {
        version: SCHEMA_VERSION,
        text: doc.text(),
        tags,
        tag_configs,
    }
}

/// Parses native JSON into a fresh document. Fails without side effects on
/// an unsupported version, invalid JSON, or inconsistent tags.
pub fn from_native(source: &str, config: FormatConfig) -> CodecResult<Document> {
    let value: serde_json::Value = serde_json::from_str(source)?;
    match value.get("version") {
        Some(version) if version.as_u64() == Some(SCHEMA_VERSION) => {}
        found => {
            return Err(CodecError::UnsupportedSchemaVersion {
                found: found.map_or_else(|| "none".to_string(), ToString::to_string),
                expected: SCHEMA_VERSION,
            });
        }
    }
    let file: NativeFile = serde_json::from_value(value)?;
    build_document(&file, config)
}

fn build_document(file: &NativeFile, config: FormatConfig) -> CodecResult<Document> {
    let mut doc = Document::new(&file.text, config.clone());
    for tag in &file.tags {
        if tag.name == SELECTION_TAG {
            continue;
        }
        let ranges = tag
            .ranges
            .iter()
            .map(|(start, end)| -> CodecResult<(TextIndex, TextIndex)> {
                Ok((parse_index(&doc, start)?, parse_index(&doc, end)?))
            })
            .collect::<CodecResult<Vec<_>>>()?;

        let Some(tag_config) = file.tag_configs.get(&tag.name) else {
            match legacy_flag(&tag.name) {
                Some(flag) => {
                    for (start, end) in ranges {
                        let range = char_range(&doc, start, end);
                        apply_legacy_flag(&mut doc, range, flag);
                    }
                }
                None => tracing::debug!(tag = %tag.name, "ignoring tag without config"),
            }
            continue;
        };
        apply_tag(&mut doc, &tag.name, tag_config, &ranges, &config)?;
    }
    tracing::debug!(
        chars = doc.len(),
        tags = file.tags.len(),
        "loaded native document"
    );
    Ok(doc)
}

fn apply_tag(
    doc: &mut Document,
    name: &str,
    tag_config: &TagConfig,
    ranges: &[(TextIndex, TextIndex)],
    config: &FormatConfig,
) -> CodecResult<()> {
    let bundle = tag_config
        .font
        .as_ref()
        .map(|font| font.to_bundle(name, config))
        .transpose()?;
    let parse_color = |raw: &Option<String>| {
        raw.as_deref()
            .map(|raw| {
                raw.parse::<Color>()
                    .map_err(|err| malformed(format!("tag '{name}': {err}")))
            })
            .transpose()
    };
    let foreground = parse_color(&tag_config.foreground)?;
    let background = parse_color(&tag_config.background)?;
    let alignment = tag_config
        .justify
        .as_deref()
        .map(|raw| {
            Alignment::from_name(raw)
                .ok_or_else(|| malformed(format!("tag '{name}' has unknown justify '{raw}'")))
        })
        .transpose()?;

    for &(start, end) in ranges {
        let range = char_range(doc, start, end);
        if let Some(bundle) = &bundle {
            doc.write_bundle(range.clone(), bundle.clone());
        }
        if let Some(color) = foreground {
            doc.store_mut()
                .color_mut(ColorChannel::Foreground)
                .insert(range.clone(), color);
        }
        if let Some(color) = background {
            doc.store_mut()
                .color_mut(ColorChannel::Background)
                .insert(range, color);
        }
        if let Some(alignment) = alignment {
            for line in tagged_lines(doc, start, end) {
                doc.set_line_alignment(line, Some(alignment));
            }
        }
    }
    Ok(())
}

fn apply_legacy_flag(doc: &mut Document, range: Range<usize>, flag: StyleFlag) {
    for segment in doc.segments(range) {
        let bundle = segment.spec.bundle().with_flag(flag, true);
        doc.write_bundle(segment.range, bundle);
    }
}

/// A `"line.column"` text index, line 1-based and column 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TextIndex {
    line: usize,
    column: usize,
}

/// Parses a text index; `end` denotes the end of the text.
fn parse_index(doc: &Document, raw: &str) -> CodecResult<TextIndex> {
    if raw == "end" {
        let (line, column) = doc.line_col(doc.len());
        return Ok(TextIndex { line, column });
    }
    let invalid = || malformed(format!("invalid text index '{raw}'"));
    let (line, column) = raw.split_once('.').ok_or_else(invalid)?;
    Ok(TextIndex {
        line: line.parse().map_err(|_| invalid())?,
        column: column.parse().map_err(|_| invalid())?,
    })
}

/// Char range between two indices, clamped to the text.
fn char_range(doc: &Document, start: TextIndex, end: TextIndex) -> Range<usize> {
    let start = doc.position(start.line, start.column);
    let end = doc.position(end.line, end.column);
    start.min(end)..start.max(end)
}

/// Lines covered by a line-level tag. An end at column 0 of a later line
/// stops before that line.
fn tagged_lines(doc: &Document, start: TextIndex, end: TextIndex) -> Range<usize> {
    let first = start.line.saturating_sub(1);
    let last = if end.column == 0 && end.line > start.line {
        end.line - 1
    } else {
        end.line.max(start.line)
    };
    let count = doc.line_count();
    first.min(count)..last.min(count)
}

impl Document {
    /// Replaces this document with the one in `source`, keeping the current
    /// configuration. On error the document is left untouched.
    pub fn load_native(&mut self, source: &str) -> CodecResult<()> {
        let loaded = from_native(source, self.config().clone())?;
        *self = loaded;
        Ok(())
    }
}

#[cfg(test)]
#[path = "native_tests.rs"]
mod native_tests;
