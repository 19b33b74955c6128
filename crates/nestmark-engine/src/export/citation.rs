//! Citation marks and index-term references.

use serde_json::Value;

use crate::document::attrs::{self, Attrs};
use crate::document::Node;
use crate::pandoc::{Attr, Citation, CitationMode, Inline};

use super::chunks::text_inlines;
use super::context::ExportContext;

pub const DEFAULT_INDEX_NAME: &str = "index";
pub const DEFAULT_INDEX_REF_CLASS: &str = "index-ref";
pub const INDEX_DIV_CLASS: &str = "index";

/// One work cited by a citation mark, before a note number is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct CitationRef {
    pub id: String,
    pub prefix: Vec<Inline>,
    pub suffix: Vec<Inline>,
    pub mode: CitationMode,
}

impl CitationRef {
    pub fn to_citation(&self, note_number: i32) -> Citation {
        Citation {
            citation_id: self.id.clone(),
            citation_prefix: self.prefix.clone(),
            citation_suffix: self.suffix.clone(),
            citation_mode: self.mode,
            citation_note_num: note_number,
            // Hashes are not computed yet; Pandoc ignores them on input.
            citation_hash: 0,
        }
    }
}

fn citation_mode(name: Option<&str>) -> Option<CitationMode> {
    match name? {
        "authorInText" => Some(CitationMode::AuthorInText),
        "suppressAuthor" => Some(CitationMode::SuppressAuthor),
        "normal" => Some(CitationMode::NormalCitation),
        _ => None,
    }
}

/// Reads the `references` list of a citation mark. An entry may override the
/// mark-level `mode`.
pub fn citation_refs(mark_attrs: &Attrs) -> Vec<CitationRef> {
    let default_mode =
        citation_mode(attrs::string(mark_attrs, "mode")).unwrap_or(CitationMode::NormalCitation);
    let Some(Value::Array(references)) = mark_attrs.get("references") else {
        return vec![];
    };

    references
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|reference| {
            let id = attrs::string(reference, "id")?;
            Some(CitationRef {
                id: id.to_string(),
                prefix: text_inlines(attrs::string(reference, "prefix").unwrap_or_default()),
                suffix: text_inlines(attrs::string(reference, "suffix").unwrap_or_default()),
                mode: citation_mode(attrs::string(reference, "mode")).unwrap_or(default_mode),
            })
        })
        .collect()
}

impl ExportContext<'_> {
    /// Resolves an `indexRef` node to an empty span carrying the index data.
    pub(crate) fn index_ref(&self, node: &Node) -> Inline {
        let name = attrs::string(&node.attrs, "indexName").unwrap_or(DEFAULT_INDEX_NAME);
        let definition = self.options.index(name);
        let class = definition
            .and_then(|d| d.ref_class.as_deref())
            .unwrap_or(DEFAULT_INDEX_REF_CLASS);

        let mut attributes = vec![("index-name".to_string(), name.to_string())];
        if let Some(text) = attrs::string(&node.attrs, "text") {
            attributes.push(("indexed-text".to_string(), text.to_string()));
        }
        if let Some(placement) = definition.and_then(|d| d.placement.as_deref()) {
            attributes.push(("index-placement".to_string(), placement.to_string()));
        }

        Inline::Span(
            Attr::new(
                attrs::string(&node.attrs, "id").unwrap_or_default(),
                vec![class.to_string()],
                attributes,
            ),
            vec![],
        )
    }

    /// Attr of the `Div` marking where an index is placed.
    pub(crate) fn index_div_attr(&self, node: &Node) -> Attr {
        let mut attr = attrs::pandoc_attr(&node.attrs);
        attr.classes.insert(0, INDEX_DIV_CLASS.to_string());
        let name = attrs::string(&node.attrs, "indexName").unwrap_or(DEFAULT_INDEX_NAME);
        attr.attributes
            .insert(0, ("index-name".to_string(), name.to_string()));
        attr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{DefaultPriority, ExportOptions, IndexDefinition};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn attrs_of(value: Value) -> Attrs {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test attrs must be an object"),
        }
    }

    #[test]
    fn reads_references() {
        let refs = citation_refs(&attrs_of(json!({
            "mode": "authorInText",
            "references": [
                {"id": "doe99", "prefix": "see", "suffix": "p. 4"},
                {"id": "roe01", "mode": "suppressAuthor"},
                {"prefix": "no id"}
            ]
        })));

        assert_eq!(
            refs,
            vec![
                CitationRef {
                    id: "doe99".into(),
                    prefix: vec![Inline::str("see")],
                    suffix: vec![Inline::str("p."), Inline::Space, Inline::str("4")],
                    mode: CitationMode::AuthorInText,
                },
                CitationRef {
                    id: "roe01".into(),
                    prefix: vec![],
                    suffix: vec![],
                    mode: CitationMode::SuppressAuthor,
                },
            ]
        );
    }

    #[test]
    fn index_ref_defaults() {
        let options = ExportOptions::default();
        let ctx = ExportContext::new(&options, &DefaultPriority);
        let node = Node::new("indexRef").with_attr("text", "Rust");

        assert_eq!(
            ctx.index_ref(&node),
            Inline::Span(
                Attr::new(
                    "",
                    vec!["index-ref".into()],
                    vec![
                        ("index-name".into(), "index".into()),
                        ("indexed-text".into(), "Rust".into()),
                    ]
                ),
                vec![]
            )
        );
    }

    #[test]
    fn index_ref_uses_configured_class_and_placement() {
        let options = ExportOptions {
            indexes: vec![IndexDefinition {
                name: "persons".into(),
                ref_class: Some("person-ref".into()),
                placement: Some("after".into()),
            }],
            ..ExportOptions::default()
        };
        let ctx = ExportContext::new(&options, &DefaultPriority);
        let node = Node::new("indexRef")
            .with_attr("id", "ir-7")
            .with_attr("indexName", "persons")
            .with_attr("text", "Ada Lovelace");

        assert_eq!(
            ctx.index_ref(&node),
            Inline::Span(
                Attr::new(
                    "ir-7",
                    vec!["person-ref".into()],
                    vec![
                        ("index-name".into(), "persons".into()),
                        ("indexed-text".into(), "Ada Lovelace".into()),
                        ("index-placement".into(), "after".into()),
                    ]
                ),
                vec![]
            )
        );
    }
}
