//! Plain text import and export. All formatting is dropped.

use crate::config::FormatConfig;
use crate::document::Document;

pub fn export_plain(doc: &Document) -> String {
    doc.text()
}

/// Builds an unformatted document. `\r\n` line endings are normalized to
/// `\n`, the only line break the document recognizes.
pub fn import_plain(text: &str, config: FormatConfig) -> Document {
    let text = text.replace("\r\n", "\n");
    Document::new(&text, config)
}
