//! Rich-text formatting engine for a word processor.
//!
//! A [`Document`] owns a text buffer and everything attached to it: which
//! character ranges carry which font bundle and colors, the alignment of
//! each line, the style pending for the next typed characters, and an undo
//! history for formatting arbitrated against the text history.
//!
//! ```
//! use pure_richtext::{Document, FormatConfig, StyleFlag};
//!
//! let mut doc = Document::new("Hello world", FormatConfig::default());
//! doc.toggle_flag(0..5, StyleFlag::Bold);
//! assert!(doc.resolve(0).bold);
//! assert!(!doc.resolve(6).bold);
//! ```

pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod list;
pub mod store;
pub mod style;
pub mod text;
pub mod typing;

pub use codec::{CodecSet, RunDocument, StructuredCodec, StructuredFormat};
pub use config::FormatConfig;
pub use document::{Document, Segment, UndoOutcome};
pub use error::{CodecError, CodecResult, ConfigError, ParseColorError};
pub use history::LastAction;
pub use list::ListMarker;
pub use style::{Alignment, Color, ColorChannel, FontBundle, StyleFlag, StyleSpec};
