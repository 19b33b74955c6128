use std::collections::HashMap;

use crate::error::Result;
use crate::pandoc::Inline;

use super::chunks::{Chunk, MarkRange};
use super::context::ExportContext;

/// An open container on the assembler stack.
struct Frame {
    /// `None` for the root, which never closes.
    mark: Option<usize>,
    stop: usize,
    note_number: i32,
    children: Vec<Inline>,
}

impl Frame {
    fn root() -> Self {
        Self {
            mark: None,
            stop: usize::MAX,
            note_number: 0,
            children: vec![],
        }
    }
}

/// Builds nested inlines from chunks and laminar ranges sorted by
/// [`super::untangle::sort_for_assembly`], in one left-to-right pass.
pub fn assemble(
    ctx: &mut ExportContext<'_>,
    chunks: Vec<Chunk<'_>>,
    ranges: &[MarkRange],
) -> Result<Vec<Inline>> {
    let mut stack = vec![Frame::root()];
    let mut pending = ranges.iter().peekable();
    // Note numbers by range origin, shared by the pieces of a split citation.
    let mut numbered: HashMap<usize, i32> = HashMap::new();

    for (pos, chunk) in chunks.into_iter().enumerate() {
        close_frames(ctx, &mut stack, pos);

        while let Some(range) = pending.next_if(|r| r.start == pos) {
            let note_number = match numbered.get(&range.origin) {
                Some(&number) => number,
                None => {
                    let number = ctx.open_mark(range.mark);
                    if number > 0 {
                        numbered.insert(range.origin, number);
                    }
                    number
                }
            };
            stack.push(Frame {
                mark: Some(range.mark),
                stop: range.stop,
                note_number,
                children: vec![],
            });
        }

        let leaf = match chunk {
            Chunk::Leaf(inline) => inline,
            Chunk::Note { index, node } => ctx.footnote(index, node)?,
        };
        if let Some(top) = stack.last_mut() {
            top.children.push(leaf);
        }
    }

    close_frames(ctx, &mut stack, usize::MAX);
    Ok(stack.pop().map(|root| root.children).unwrap_or_default())
}

/// Pops every frame whose range has ended by `pos`, innermost first.
fn close_frames(ctx: &ExportContext<'_>, stack: &mut Vec<Frame>, pos: usize) {
    while stack.len() > 1 && stack.last().is_some_and(|top| top.stop <= pos) {
        let Some(frame) = stack.pop() else { break };
        let Some(mark) = frame.mark else { break };
        let inline = ctx
            .registry
            .entry(mark)
            .wrapper
            .wrap(frame.children, frame.note_number);
        if let Some(parent) = stack.last_mut() {
            parent.children.push(inline);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Mark;
    use crate::export::{DefaultPriority, ExportOptions};
    use pretty_assertions::assert_eq;

    fn words(n: usize) -> Vec<Chunk<'static>> {
        (0..n).map(|i| Chunk::Leaf(Inline::str(format!("w{i}")))).collect()
    }

    fn s(i: usize) -> Inline {
        Inline::str(format!("w{i}"))
    }

    #[test]
    fn no_ranges_yields_leaves() {
        let options = ExportOptions::default();
        let mut ctx = ExportContext::new(&options, &DefaultPriority);
        let out = assemble(&mut ctx, words(2), &[]).unwrap();
        assert_eq!(out, vec![s(0), s(1)]);
    }

    #[test]
    fn nested_ranges_build_nested_containers() {
        let options = ExportOptions::default();
        let mut ctx = ExportContext::new(&options, &DefaultPriority);
        let strong = ctx.registry.index_of(&Mark::new("strong"));
        let em = ctx.registry.index_of(&Mark::new("emphasis"));
        let ranges = [MarkRange::new(strong, 0, 4), MarkRange::new(em, 1, 3)];

        let out = assemble(&mut ctx, words(5), &ranges).unwrap();

        assert_eq!(
            out,
            vec![
                Inline::Strong(vec![s(0), Inline::Emph(vec![s(1), s(2)]), s(3)]),
                s(4),
            ]
        );
    }

    #[test]
    fn ranges_closing_at_end_are_finalized() {
        let options = ExportOptions::default();
        let mut ctx = ExportContext::new(&options, &DefaultPriority);
        let strong = ctx.registry.index_of(&Mark::new("strong"));
        let em = ctx.registry.index_of(&Mark::new("emphasis"));
        let ranges = [MarkRange::new(strong, 0, 2), MarkRange::new(em, 1, 2)];

        let out = assemble(&mut ctx, words(2), &ranges).unwrap();

        assert_eq!(
            out,
            vec![Inline::Strong(vec![s(0), Inline::Emph(vec![s(1)])])]
        );
    }

    #[test]
    fn adjacent_siblings() {
        let options = ExportOptions::default();
        let mut ctx = ExportContext::new(&options, &DefaultPriority);
        let strong = ctx.registry.index_of(&Mark::new("strong"));
        let em = ctx.registry.index_of(&Mark::new("emphasis"));
        let ranges = [MarkRange::new(strong, 0, 1), MarkRange::new(em, 1, 2)];

        let out = assemble(&mut ctx, words(2), &ranges).unwrap();

        assert_eq!(
            out,
            vec![Inline::Strong(vec![s(0)]), Inline::Emph(vec![s(1)])]
        );
    }

    #[test]
    fn pieces_of_one_citation_share_a_note_number() {
        let options = ExportOptions::default();
        let mut ctx = ExportContext::new(&options, &DefaultPriority);
        let cite = |id: &str| {
            Mark::new("citation").with_attr("references", serde_json::json!([{"id": id}]))
        };
        let doe = ctx.registry.index_of(&cite("doe99"));
        let roe = ctx.registry.index_of(&cite("roe01"));
        let piece = |mark, start, stop, origin| MarkRange {
            origin,
            ..MarkRange::new(mark, start, stop)
        };
        let ranges = [piece(doe, 0, 1, 0), piece(doe, 1, 2, 0), piece(roe, 2, 3, 1)];

        let out = assemble(&mut ctx, words(3), &ranges).unwrap();

        let numbers: Vec<i32> = out
            .iter()
            .map(|inline| match inline {
                Inline::Cite(citations, _) => citations[0].citation_note_num,
                other => panic!("expected a citation, got {other:?}"),
            })
            .collect();
        assert_eq!(numbers, vec![1, 1, 2]);
        assert_eq!(ctx.citations(), 2);
    }
}
