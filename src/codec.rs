//! Reading and writing documents.
//!
//! The native format and plain text are always available. Structured
//! formats go through [`StructuredCodec`] implementations registered in a
//! [`CodecSet`]; asking for a format nobody registered fails with
//! [`CodecError::Unavailable`].

use std::path::Path;

use crate::config::FormatConfig;
use crate::document::Document;
use crate::error::{CodecError, CodecResult};

pub mod native;
pub mod plain;
pub mod runs;
#[cfg(feature = "tdoc")]
pub mod tdoc;

pub use native::{NativeFile, SCHEMA_VERSION, from_native, native_file, to_native};
pub use plain::{export_plain, import_plain};
pub use runs::{Run, RunDocument, RunParagraph, export_runs, import_runs};

/// Structured formats handled by external libraries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StructuredFormat {
    Ftml,
    Markdown,
}

impl StructuredFormat {
    pub const ALL: [StructuredFormat; 2] = [StructuredFormat::Ftml, StructuredFormat::Markdown];

    pub fn name(self) -> &'static str {
        match self {
            StructuredFormat::Ftml => "FTML",
            StructuredFormat::Markdown => "Markdown",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "ftml" => Some(StructuredFormat::Ftml),
            "md" | "markdown" => Some(StructuredFormat::Markdown),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// A library that converts run documents to and from bytes.
pub trait StructuredCodec {
    fn name(&self) -> &'static str;
    fn encode(&self, runs: &RunDocument) -> CodecResult<Vec<u8>>;
    fn decode(&self, bytes: &[u8]) -> CodecResult<RunDocument>;
}

/// The structured codecs available to a caller.
#[derive(Default)]
pub struct CodecSet {
    ftml: Option<Box<dyn StructuredCodec>>,
    markdown: Option<Box<dyn StructuredCodec>>,
}

impl CodecSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registers `codec` for `format`, replacing any earlier one.
    pub fn with(mut self, format: StructuredFormat, codec: impl StructuredCodec + 'static) -> Self {
        *self.slot_mut(format) = Some(Box::new(codec));
        self
    }

    /// Every codec compiled into this build.
    pub fn builtin() -> Self {
        let set = Self::empty();
        #[cfg(feature = "tdoc")]
        let set = set
            .with(StructuredFormat::Ftml, tdoc::FtmlCodec)
            .with(StructuredFormat::Markdown, tdoc::MarkdownCodec);
        set
    }

    pub fn supports(&self, format: StructuredFormat) -> bool {
        self.slot(format).is_some()
    }

    pub fn export(&self, format: StructuredFormat, doc: &Document) -> CodecResult<Vec<u8>> {
        let codec = self.codec(format)?;
        let bytes = codec.encode(&export_runs(doc))?;
        tracing::debug!(codec = codec.name(), bytes = bytes.len(), "exported document");
        Ok(bytes)
    }

    pub fn import(
        &self,
        format: StructuredFormat,
        bytes: &[u8],
        config: FormatConfig,
    ) -> CodecResult<Document> {
        let codec = self.codec(format)?;
        let runs = codec.decode(bytes)?;
        Ok(import_runs(&runs, config))
    }

    fn codec(&self, format: StructuredFormat) -> CodecResult<&dyn StructuredCodec> {
        self.slot(format)
            .as_deref()
            .ok_or(CodecError::Unavailable(format.name()))
    }

    fn slot(&self, format: StructuredFormat) -> &Option<Box<dyn StructuredCodec>> {
        match format {
            StructuredFormat::Ftml => &self.ftml,
            StructuredFormat::Markdown => &self.markdown,
        }
    }

    fn slot_mut(&mut self, format: StructuredFormat) -> &mut Option<Box<dyn StructuredCodec>> {
        match format {
            StructuredFormat::Ftml => &mut self.ftml,
            StructuredFormat::Markdown => &mut self.markdown,
        }
    }
}
