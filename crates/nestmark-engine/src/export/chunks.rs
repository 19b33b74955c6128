use std::sync::OnceLock;

use regex::Regex;

use crate::document::{NodeKind, Node, attrs};
use crate::error::Result;
use crate::pandoc::Inline;

use super::context::ExportContext;

/// An atomic inline unit; ranges are indexed by chunk position.
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk<'n> {
    Leaf(Inline),
    /// Footnote, converted when the assembler reaches it so citation numbers
    /// follow document order.
    Note { index: usize, node: &'n Node },
}

/// A mark applied to chunks `start..stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkRange {
    pub mark: usize,
    pub start: usize,
    pub stop: usize,
    /// The collected range this one was cut from. Pieces of one range share
    /// it, so a split citation keeps a single note number.
    pub origin: usize,
}

impl MarkRange {
    pub fn new(mark: usize, start: usize, stop: usize) -> Self {
        debug_assert!(start < stop, "empty mark range {start}..{stop}");
        Self {
            mark,
            start,
            stop,
            origin: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.stop <= self.start
    }
}

/// What one child of a container contributes.
enum Contribution<'n> {
    /// Ranges run through it without being opened or closed.
    Breakpoint(Chunk<'n>),
    Run { chunks: Vec<Chunk<'n>>, marks: Vec<usize> },
}

/// Linearizes the inline children of one container into chunks plus the raw,
/// possibly crossing, mark ranges over them.
pub fn collect<'n>(
    ctx: &mut ExportContext<'_>,
    children: &'n [Node],
) -> Result<(Vec<Chunk<'n>>, Vec<MarkRange>)> {
    let mut chunks = Vec::new();
    let mut ranges: Vec<MarkRange> = Vec::new();
    // Indices into `ranges` still open for extension.
    let mut open: Vec<usize> = Vec::new();

    for (index, child) in children.iter().enumerate() {
        let contribution = ctx.descend(index, child, |ctx| contribute(ctx, index, child))?;
        let (run, marks) = match contribution {
            Contribution::Breakpoint(chunk) => {
                chunks.push(chunk);
                continue;
            }
            Contribution::Run { chunks, marks } => (chunks, marks),
        };
        if run.is_empty() {
            continue;
        }

        let start = chunks.len();
        chunks.extend(run);
        let stop = chunks.len();

        open.retain(|&r| {
            if marks.contains(&ranges[r].mark) {
                ranges[r].stop = stop;
                true
            } else {
                false
            }
        });
        for mark in marks {
            if !open.iter().any(|&r| ranges[r].mark == mark) {
                ranges.push(MarkRange {
                    origin: ranges.len(),
                    ..MarkRange::new(mark, start, stop)
                });
                open.push(ranges.len() - 1);
            }
        }
    }

    Ok((chunks, ranges))
}

fn contribute<'n>(
    ctx: &mut ExportContext<'_>,
    index: usize,
    child: &'n Node,
) -> Result<Contribution<'n>> {
    let kind = ctx.kind_of(child)?;
    let leaf = match kind {
        NodeKind::HardBreak => return Ok(Contribution::Breakpoint(Chunk::Leaf(Inline::LineBreak))),
        NodeKind::Note => {
            return Ok(Contribution::Breakpoint(Chunk::Note { index, node: child }));
        }
        NodeKind::IndexRef => {
            return Ok(Contribution::Breakpoint(Chunk::Leaf(ctx.index_ref(child))));
        }
        NodeKind::EmptySpan => {
            let span = Inline::Span(attrs::pandoc_attr(&child.attrs), vec![]);
            return Ok(Contribution::Breakpoint(Chunk::Leaf(span)));
        }
        NodeKind::Text => {
            let text = child.text.as_deref().unwrap_or_default();
            if let Some(leaf) = opaque_leaf(ctx, child, text) {
                // Other marks on code and math are dropped.
                return Ok(Contribution::Run {
                    chunks: vec![Chunk::Leaf(leaf)],
                    marks: vec![],
                });
            }
            let chunks = text_inlines(text).into_iter().map(Chunk::Leaf).collect();
            return Ok(Contribution::Run {
                chunks,
                marks: mark_indices(ctx, child),
            });
        }
        NodeKind::Image => ctx.image(child),
        NodeKind::RawInline => Inline::RawInline(
            attrs::string(&child.attrs, "format")
                .unwrap_or("html")
                .to_string(),
            child.text_content(),
        ),
        other => return Err(ctx.misplaced(other)),
    };
    Ok(Contribution::Run {
        chunks: vec![Chunk::Leaf(leaf)],
        marks: mark_indices(ctx, child),
    })
}

/// The first code or math mark on a text leaf turns it into a single leaf.
fn opaque_leaf(ctx: &mut ExportContext<'_>, child: &Node, text: &str) -> Option<Inline> {
    child.marks.iter().find_map(|mark| {
        let index = ctx.registry.index_of(mark);
        let entry = ctx.registry.entry(index);
        if entry.kind.is_opaque() {
            entry.wrapper.leaf(text)
        } else {
            None
        }
    })
}

fn mark_indices(ctx: &mut ExportContext<'_>, child: &Node) -> Vec<usize> {
    let mut indices = Vec::with_capacity(child.marks.len());
    for mark in &child.marks {
        let index = ctx.registry.index_of(mark);
        if !indices.contains(&index) {
            indices.push(index);
        }
    }
    indices
}

/// Splits text at word breaks into `Str`, `Space` and `SoftBreak`.
///
/// Only ASCII whitespace breaks words; non-breaking spaces stay inside `Str`.
pub fn text_inlines(text: &str) -> Vec<Inline> {
    static WORD_BREAK: OnceLock<Regex> = OnceLock::new();
    let word_break =
        WORD_BREAK.get_or_init(|| Regex::new(r"[ \t\r\n]+").expect("Invalid word break regex"));

    let mut out = Vec::new();
    let mut last = 0;
    for m in word_break.find_iter(text) {
        if m.start() > last {
            out.push(Inline::str(&text[last..m.start()]));
        }
        if m.as_str().contains('\n') {
            out.push(Inline::SoftBreak);
        } else {
            out.push(Inline::Space);
        }
        last = m.end();
    }
    if last < text.len() {
        out.push(Inline::str(&text[last..]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Mark;
    use crate::export::{DefaultPriority, ExportOptions};
    use pretty_assertions::assert_eq;

    fn collect_ranges(children: &[Node]) -> (usize, Vec<MarkRange>, Vec<String>) {
        let options = ExportOptions::default();
        let mut ctx = ExportContext::new(&options, &DefaultPriority);
        let (chunks, ranges) = collect(&mut ctx, children).unwrap();
        let names = ranges
            .iter()
            .map(|r| ctx.registry.entry(r.mark).mark.mark_type.clone())
            .collect();
        (chunks.len(), ranges, names)
    }

    #[test]
    fn splits_words() {
        assert_eq!(
            text_inlines("Hello  big\u{a0}world\nnext "),
            vec![
                Inline::str("Hello"),
                Inline::Space,
                Inline::str("big\u{a0}world"),
                Inline::SoftBreak,
                Inline::str("next"),
                Inline::Space,
            ]
        );
        assert!(text_inlines("").is_empty());
    }

    #[test]
    fn contiguous_marks_extend_one_range() {
        let strong = Mark::new("strong");
        let children = vec![
            Node::text("one ").with_marks(vec![strong.clone()]),
            Node::text("two").with_marks(vec![strong.clone(), Mark::new("emphasis")]),
            Node::text(" three"),
        ];
        let (count, ranges, names) = collect_ranges(&children);

        // one, Space, two, Space, three
        assert_eq!(count, 5);
        assert_eq!(names, vec!["strong", "emphasis"]);
        assert_eq!(ranges[0].start..ranges[0].stop, 0..3);
        assert_eq!(ranges[1].start..ranges[1].stop, 2..3);
    }

    #[test]
    fn unmarked_child_closes_ranges() {
        let strong = Mark::new("strong");
        let children = vec![
            Node::text("a").with_marks(vec![strong.clone()]),
            Node::text(" "),
            Node::text("b").with_marks(vec![strong]),
        ];
        let (_, ranges, _) = collect_ranges(&children);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].start..ranges[0].stop, 0..1);
        assert_eq!(ranges[1].start..ranges[1].stop, 2..3);
        assert_eq!((ranges[0].origin, ranges[1].origin), (0, 1));
    }

    #[test]
    fn ranges_run_through_breakpoints() {
        let strong = Mark::new("strong");
        let children = vec![
            Node::text("a").with_marks(vec![strong.clone()]),
            Node::new("hardBreak"),
            Node::text("b").with_marks(vec![strong]),
        ];
        let (count, ranges, _) = collect_ranges(&children);
        assert_eq!(count, 3);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].start..ranges[0].stop, 0..3);
    }

    #[test]
    fn trailing_breakpoint_stays_outside() {
        let children = vec![
            Node::text("a").with_marks(vec![Mark::new("strong")]),
            Node::new("hardBreak"),
            Node::text("b"),
        ];
        let (_, ranges, _) = collect_ranges(&children);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].start..ranges[0].stop, 0..1);
    }

    #[test]
    fn code_is_one_opaque_chunk() {
        let children = vec![
            Node::text("let x = 1").with_marks(vec![Mark::new("strong"), Mark::new("code")]),
        ];
        let options = ExportOptions::default();
        let mut ctx = ExportContext::new(&options, &DefaultPriority);
        let (chunks, ranges) = collect(&mut ctx, &children).unwrap();

        assert!(ranges.is_empty());
        assert_eq!(
            chunks,
            vec![Chunk::Leaf(Inline::Code(Default::default(), "let x = 1".into()))]
        );
    }

    #[test]
    fn block_node_in_inline_position_is_rejected() {
        let children = vec![Node::new("paragraph")];
        let options = ExportOptions::default();
        let mut ctx = ExportContext::new(&options, &DefaultPriority);
        assert!(collect(&mut ctx, &children).is_err());
    }
}
