use crate::document::{Node, NodeKind};
use crate::error::{ExportError, Result};
use crate::pandoc::Inline;

use super::assemble::assemble;
use super::chunks;
use super::options::ExportOptions;
use super::priority::MarkPriority;
use super::registry::{MarkRegistry, Wrapper};
use super::untangle::untangle;

/// Mutable state of a single export: the mark registry, the citation
/// counter and the path of the node being converted.
///
/// Created fresh by every export call and never shared between calls.
pub struct ExportContext<'a> {
    pub(crate) options: &'a ExportOptions,
    pub(crate) priority: &'a dyn MarkPriority,
    pub(crate) registry: MarkRegistry,
    note_number: i32,
    path: Vec<String>,
}

impl<'a> ExportContext<'a> {
    pub fn new(options: &'a ExportOptions, priority: &'a dyn MarkPriority) -> Self {
        Self {
            options,
            priority,
            registry: MarkRegistry::new(),
            note_number: 0,
            path: vec![NodeKind::Doc.to_string()],
        }
    }

    pub fn registry(&self) -> &MarkRegistry {
        &self.registry
    }

    /// Number of citation marks numbered so far.
    pub fn citations(&self) -> i32 {
        self.note_number
    }

    /// Converts the inline children of one container.
    pub fn inlines(&mut self, children: &[Node]) -> Result<Vec<Inline>> {
        let (chunks, raw) = chunks::collect(self, children)?;
        let ranges = untangle(raw, &self.registry, self.priority)?;
        assemble(self, chunks, &ranges)
    }

    /// Called by the assembler when a mark's range first opens; returns the
    /// next note number for citations and 0 otherwise.
    pub(crate) fn open_mark(&mut self, mark: usize) -> i32 {
        if matches!(self.registry.entry(mark).wrapper, Wrapper::Cite(_)) {
            self.note_number += 1;
            self.note_number
        } else {
            0
        }
    }

    pub(crate) fn footnote(&mut self, index: usize, node: &Node) -> Result<Inline> {
        self.descend(index, node, |ctx| Ok(Inline::Note(ctx.blocks(&node.content)?)))
    }

    /// Runs `f` with `node` appended to the error path.
    pub(crate) fn descend<T>(
        &mut self,
        index: usize,
        node: &Node,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.path.push(format!("{index}:{}", node.node_type));
        let result = f(self);
        self.path.pop();
        result
    }

    pub(crate) fn kind_of(&self, node: &Node) -> Result<NodeKind> {
        node.node_type
            .parse()
            .map_err(|()| ExportError::UnknownNodeType {
                node_type: node.node_type.clone(),
                path: self.path(),
            })
    }

    pub(crate) fn path(&self) -> String {
        self.path.join("/")
    }

    pub(crate) fn structure_error(&self, message: impl Into<String>) -> ExportError {
        ExportError::Structure {
            path: self.path(),
            message: message.into(),
        }
    }

    /// A known node type in a position where it cannot appear.
    pub(crate) fn misplaced(&self, kind: NodeKind) -> ExportError {
        self.structure_error(format!("'{kind}' is not allowed here"))
    }
}
