//! JSON span listing

use serde::Serialize;

use crate::model::LatexDocument;
use crate::syntax::TagKind;

/// One tag run with the text it covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanRecord {
    pub kind: TagKind,
    pub start: usize,
    pub end: usize,
    pub text: String,
}

#[derive(Debug, Serialize)]
struct SpanListing<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    chars: usize,
    spans: &'a [SpanRecord],
}

pub fn span_records(doc: &LatexDocument) -> Vec<SpanRecord> {
    doc.spans()
        .into_iter()
        .map(|span| SpanRecord {
            kind: span.kind,
            start: span.start,
            end: span.end,
            text: doc.buffer.slice_to_string(span.range()),
        })
        .collect()
}

/// Pretty-printed `{ file, chars, spans }` object
pub fn render(doc: &LatexDocument) -> Result<String, serde_json::Error> {
    let records = span_records(doc);
    let listing = SpanListing {
        file: doc
            .file_path
            .as_ref()
            .map(|path| path.display().to_string()),
        chars: doc.len_chars(),
        spans: &records,
    };
    serde_json::to_string_pretty(&listing)
}

/// One line per span: `kind start..end "text"`
pub fn render_plain(doc: &LatexDocument) -> String {
    span_records(doc)
        .iter()
        .map(|record| {
            format!(
                "{:<12} {}..{} {:?}\n",
                record.kind.name(),
                record.start,
                record.end,
                record.text
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_records_carry_text() {
        let doc = LatexDocument::with_text("$x$ % c");
        let records = span_records(&doc);
        assert_eq!(
            records,
            vec![
                SpanRecord {
                    kind: TagKind::InlineMath,
                    start: 0,
                    end: 3,
                    text: "$x$".to_string(),
                },
                SpanRecord {
                    kind: TagKind::Comment,
                    start: 4,
                    end: 7,
                    text: "% c".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_json_shape() {
        let doc = LatexDocument::with_text("\\\\");
        let value: serde_json::Value = serde_json::from_str(&render(&doc).unwrap()).unwrap();
        assert_eq!(value["chars"], 2);
        assert!(value.get("file").is_none());
        assert_eq!(value["spans"][0]["kind"], "newline");
        assert_eq!(value["spans"][0]["text"], "\\\\");
    }

    #[test]
    fn test_plain_listing() {
        let doc = LatexDocument::with_text("\\item x");
        assert_eq!(render_plain(&doc), "command      0..5 \"\\\\item\"\n");
    }
}
