use std::collections::HashMap;

use log::trace;
use serde_json::Value;

use crate::document::attrs::{self, Attrs};
use crate::document::Mark;
use crate::pandoc::{Attr, Citation, Inline, MathType, QuoteType, Target};

use super::citation::{self, CitationRef};

/// Attribute key that carries the original mark name on fallback spans.
pub const CUSTOM_STYLE_KEY: &str = "custom-style";

/// Mark types the exporter knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkKind {
    Emphasis,
    Strong,
    Underline,
    Strikethrough,
    Superscript,
    Subscript,
    SmallCaps,
    SingleQuote,
    DoubleQuote,
    Code,
    Math,
    Link,
    Span,
    Citation,
    /// Any mark type not in the base table.
    CustomStyle,
}

impl MarkKind {
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "emphasis" => MarkKind::Emphasis,
            "strong" => MarkKind::Strong,
            "underline" => MarkKind::Underline,
            "strikethrough" => MarkKind::Strikethrough,
            "superscript" => MarkKind::Superscript,
            "subscript" => MarkKind::Subscript,
            "smallCaps" => MarkKind::SmallCaps,
            "singleQuote" => MarkKind::SingleQuote,
            "doubleQuote" => MarkKind::DoubleQuote,
            "code" => MarkKind::Code,
            "math" => MarkKind::Math,
            "link" => MarkKind::Link,
            "span" => MarkKind::Span,
            "citation" => MarkKind::Citation,
            _ => return None,
        };
        Some(kind)
    }

    /// Code and math content is emitted as a single leaf, never wrapped.
    pub fn is_opaque(self) -> bool {
        matches!(self, MarkKind::Code | MarkKind::Math)
    }
}

/// The AST container a mark turns into, with its attributes already resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Wrapper {
    Emph,
    Underline,
    Strong,
    Strikeout,
    Superscript,
    Subscript,
    SmallCaps,
    Quoted(QuoteType),
    Code(Attr),
    Math(MathType),
    Link(Attr, Target),
    Span(Attr),
    Cite(Vec<CitationRef>),
}

impl Wrapper {
    fn resolve(kind: MarkKind, mark: &Mark) -> Self {
        let a = &mark.attrs;
        match kind {
            MarkKind::Emphasis => Wrapper::Emph,
            MarkKind::Strong => Wrapper::Strong,
            MarkKind::Underline => Wrapper::Underline,
            MarkKind::Strikethrough => Wrapper::Strikeout,
            MarkKind::Superscript => Wrapper::Superscript,
            MarkKind::Subscript => Wrapper::Subscript,
            MarkKind::SmallCaps => Wrapper::SmallCaps,
            MarkKind::SingleQuote => Wrapper::Quoted(QuoteType::SingleQuote),
            MarkKind::DoubleQuote => Wrapper::Quoted(QuoteType::DoubleQuote),
            MarkKind::Code => {
                let mut attr = attrs::pandoc_attr(a);
                if let Some(language) = attrs::string(a, "language") {
                    attr.classes.insert(0, language.to_string());
                }
                Wrapper::Code(attr)
            }
            MarkKind::Math => {
                if attrs::boolean(a, "display").unwrap_or(false) {
                    Wrapper::Math(MathType::DisplayMath)
                } else {
                    Wrapper::Math(MathType::InlineMath)
                }
            }
            MarkKind::Link => Wrapper::Link(
                attrs::pandoc_attr(a),
                (
                    attrs::string(a, "href").unwrap_or_default().to_string(),
                    attrs::string(a, "title").unwrap_or_default().to_string(),
                ),
            ),
            MarkKind::Span => Wrapper::Span(attrs::pandoc_attr(a)),
            MarkKind::Citation => Wrapper::Cite(citation::citation_refs(a)),
            MarkKind::CustomStyle => Wrapper::Span(Attr::new(
                attrs::string(a, "id").unwrap_or_default(),
                vec![],
                vec![(CUSTOM_STYLE_KEY.to_string(), mark.mark_type.clone())],
            )),
        }
    }

    /// Name of the Pandoc constructor this wrapper produces.
    pub fn ast_tag(&self) -> &'static str {
        match self {
            Wrapper::Emph => "Emph",
            Wrapper::Underline => "Underline",
            Wrapper::Strong => "Strong",
            Wrapper::Strikeout => "Strikeout",
            Wrapper::Superscript => "Superscript",
            Wrapper::Subscript => "Subscript",
            Wrapper::SmallCaps => "SmallCaps",
            Wrapper::Quoted(_) => "Quoted",
            Wrapper::Code(_) => "Code",
            Wrapper::Math(_) => "Math",
            Wrapper::Link(..) => "Link",
            Wrapper::Span(_) => "Span",
            Wrapper::Cite(_) => "Cite",
        }
    }

    /// True for a span whose only attribute is a custom style name.
    pub fn is_custom_style(&self) -> bool {
        match self {
            Wrapper::Span(attr) => {
                attr.id.is_empty()
                    && attr.classes.is_empty()
                    && attr.attributes.len() == 1
                    && attr.attributes[0].0 == CUSTOM_STYLE_KEY
            }
            _ => false,
        }
    }

    /// Leaf for the opaque wrappers; the text is taken verbatim.
    pub fn leaf(&self, text: &str) -> Option<Inline> {
        match self {
            Wrapper::Code(attr) => Some(Inline::Code(attr.clone(), text.to_string())),
            Wrapper::Math(math_type) => Some(Inline::Math(*math_type, text.to_string())),
            _ => None,
        }
    }

    /// Builds the container around already-assembled children.
    ///
    /// `note_number` is only read by citations.
    pub fn wrap(&self, children: Vec<Inline>, note_number: i32) -> Inline {
        match self {
            Wrapper::Emph => Inline::Emph(children),
            Wrapper::Underline => Inline::Underline(children),
            Wrapper::Strong => Inline::Strong(children),
            Wrapper::Strikeout => Inline::Strikeout(children),
            Wrapper::Superscript => Inline::Superscript(children),
            Wrapper::Subscript => Inline::Subscript(children),
            Wrapper::SmallCaps => Inline::SmallCaps(children),
            Wrapper::Quoted(quote_type) => Inline::Quoted(*quote_type, children),
            Wrapper::Code(attr) => Inline::Code(attr.clone(), plain_text(&children)),
            Wrapper::Math(math_type) => Inline::Math(*math_type, plain_text(&children)),
            Wrapper::Link(attr, target) => Inline::Link(attr.clone(), children, target.clone()),
            Wrapper::Span(attr) => Inline::Span(attr.clone(), children),
            Wrapper::Cite(refs) => {
                let citations: Vec<Citation> = refs
                    .iter()
                    .map(|r| r.to_citation(note_number))
                    .collect();
                Inline::Cite(citations, children)
            }
        }
    }
}

/// Flattens inlines back to text, for wrappers that only hold a string.
fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Str(s) | Inline::Code(_, s) | Inline::Math(_, s) => out.push_str(s),
            Inline::Space => out.push(' '),
            Inline::SoftBreak | Inline::LineBreak => out.push('\n'),
            Inline::Emph(c)
            | Inline::Underline(c)
            | Inline::Strong(c)
            | Inline::Strikeout(c)
            | Inline::Superscript(c)
            | Inline::Subscript(c)
            | Inline::SmallCaps(c)
            | Inline::Quoted(_, c)
            | Inline::Cite(_, c)
            | Inline::Link(_, c, _)
            | Inline::Span(_, c) => out.push_str(&plain_text(c)),
            Inline::RawInline(..) | Inline::Image(..) | Inline::Note(_) => {}
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub index: usize,
    pub mark: Mark,
    pub kind: MarkKind,
    pub wrapper: Wrapper,
}

impl RegistryEntry {
    pub fn ast_tag(&self) -> &'static str {
        self.wrapper.ast_tag()
    }

    pub fn has_id(&self) -> bool {
        attrs::has_id(&self.mark.attrs)
    }
}

/// Assigns a stable index to every distinct `(type, attrs)` mark of one export.
///
/// Identical marks always share an index, which is what lets adjacent runs with
/// the same formatting merge into one container.
#[derive(Debug, Default)]
pub struct MarkRegistry {
    entries: Vec<RegistryEntry>,
    lookup: HashMap<(String, String), usize>,
}

impl MarkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index_of(&mut self, mark: &Mark) -> usize {
        let key = (mark.mark_type.clone(), canonical_attrs(&mark.attrs));
        if let Some(&index) = self.lookup.get(&key) {
            return index;
        }

        let kind = MarkKind::from_name(&mark.mark_type).unwrap_or(MarkKind::CustomStyle);
        let index = self.entries.len();
        let entry = RegistryEntry {
            index,
            mark: mark.clone(),
            kind,
            wrapper: Wrapper::resolve(kind, mark),
        };
        trace!(
            "registered mark #{index} '{}' as {}",
            mark.mark_type,
            entry.ast_tag()
        );
        self.entries.push(entry);
        self.lookup.insert(key, index);
        index
    }

    /// Entry for an index returned by [`MarkRegistry::index_of`].
    ///
    /// Panics on an index this registry never handed out.
    pub fn entry(&self, index: usize) -> &RegistryEntry {
        &self.entries[index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Attribute maps are key-ordered, so their JSON text is a canonical key.
fn canonical_attrs(attrs: &Attrs) -> String {
    Value::Object(attrs.clone()).to_string()
}
