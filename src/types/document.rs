//! Input documents.

use std::borrow::Cow;

/// A named document submitted for analysis.
///
/// Content is kept as raw bytes; text is decoded on demand and never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Identifier reported back in the outcome (usually the upload filename).
    pub filename: String,
    /// Raw content as received.
    pub content: Vec<u8>,
}

impl Document {
    /// Create a document from a name and raw bytes.
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// Decode the content as UTF-8, replacing invalid sequences with U+FFFD.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_utf8_is_borrowed() {
        let doc = Document::new("a.txt", "great product, loved it");
        assert!(matches!(doc.text(), Cow::Borrowed("great product, loved it")));
    }

    #[test]
    fn invalid_bytes_are_replaced() {
        let doc = Document::new("bad.txt", vec![b'o', b'k', 0xff, 0xfe, b'!']);
        assert_eq!(doc.text(), "ok\u{FFFD}\u{FFFD}!");
    }
}
