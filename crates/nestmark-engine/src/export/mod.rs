/*!
 * # Export Pipeline
 *
 * Turns an editor document tree into a Pandoc AST. Editor marks may overlap
 * freely; Pandoc inlines must nest. Every inline container goes through the
 * same four steps:
 *
 * 1. **Collect** (`chunks`): flatten the children into leaf chunks and record
 *    one `MarkRange` per maximal run of each mark. Marks are interned in the
 *    `MarkRegistry`, keyed by type plus attributes.
 * 2. **Untangle** (`untangle`): split crossing ranges until they form a
 *    laminar family. The `MarkPriority` decides which range stays whole.
 * 3. **Assemble** (`assemble`): walk the chunks once with a stack of open
 *    containers and build the nested inlines.
 * 4. **Resolve** (`citation`): citation containers take document-ordered
 *    note numbers; index references become tagged spans.
 *
 * Blocks, tables and metadata are converted structurally (`blocks`, `table`).
 *
 * ## State
 *
 * All mutable state lives in an `ExportContext` created per call, so one
 * `Exporter` can serve any number of threads.
 */

mod assemble;
mod blocks;
pub mod chunks;
mod citation;
mod context;
mod options;
mod priority;
mod registry;
mod table;
pub mod untangle;

use log::debug;
use serde::Serialize;

use crate::document::Node;
use crate::error::Result;
use crate::pandoc::Pandoc;

pub use blocks::NOTE_DIV_CLASS;
pub use citation::{
    CitationRef, DEFAULT_INDEX_NAME, DEFAULT_INDEX_REF_CLASS, INDEX_DIV_CLASS, citation_refs,
};
pub use context::ExportContext;
pub use options::{ExportOptions, IndexDefinition};
pub use priority::{DefaultPriority, MarkPriority, Tier};
pub use registry::{CUSTOM_STYLE_KEY, MarkKind, MarkRegistry, RegistryEntry, Wrapper};
pub use table::{column_alignments, column_widths};

/// Converts documents with fixed options and mark priority.
pub struct Exporter {
    options: ExportOptions,
    priority: Box<dyn MarkPriority>,
}

impl Exporter {
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            priority: Box::new(DefaultPriority),
        }
    }

    /// Replaces the default nesting priority.
    pub fn with_priority(mut self, priority: Box<dyn MarkPriority>) -> Self {
        self.priority = priority;
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn to_ast(&self, doc: &Node) -> Result<Pandoc> {
        let mut ctx = ExportContext::new(&self.options, self.priority.as_ref());
        let pandoc = ctx.document(doc)?;
        debug!(
            "exported {} blocks using {} distinct marks and {} citations",
            pandoc.blocks.len(),
            ctx.registry().len(),
            ctx.citations()
        );
        Ok(pandoc)
    }

    /// Exports `doc` as Pandoc JSON, compact unless `indent` is set.
    pub fn export(&self, doc: &Node) -> Result<String> {
        let pandoc = self.to_ast(doc)?;
        match self.options.indent {
            None => Ok(serde_json::to_string(&pandoc)?),
            Some(width) => {
                let indent = vec![b' '; width];
                let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
                let mut out = Vec::new();
                let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
                pandoc.serialize(&mut serializer)?;
                Ok(String::from_utf8(out)?)
            }
        }
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

/// One-shot export with the default priority.
pub fn export_document(doc: &Node, options: &ExportOptions) -> Result<String> {
    Exporter::new(options.clone()).export(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc() -> Node {
        Node::new("doc").with_children(vec![
            Node::new("paragraph").with_children(vec![Node::text("Hi")]),
        ])
    }

    #[test]
    fn compact_output() {
        let json = Exporter::default().export(&doc()).unwrap();
        assert_eq!(
            json,
            r#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[{"t":"Para","c":[{"t":"Str","c":"Hi"}]}]}"#
        );
    }

    #[test]
    fn indented_output() {
        let options = ExportOptions {
            indent: Some(1),
            ..ExportOptions::default()
        };
        let json = export_document(&Node::new("doc"), &options).unwrap();
        assert_eq!(
            json,
            "{\n \"pandoc-api-version\": [\n  1,\n  23,\n  1\n ],\n \"meta\": {},\n \"blocks\": []\n}"
        );
    }

    #[test]
    fn root_must_be_doc() {
        let err = Exporter::default()
            .to_ast(&Node::new("paragraph"))
            .unwrap_err();
        assert!(matches!(err, crate::error::ExportError::Structure { .. }));
    }
}
