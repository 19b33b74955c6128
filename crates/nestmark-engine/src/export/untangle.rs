//! Rewrites crossing mark ranges into a laminar family.
//!
//! Two ranges cross when `a.start < b.start < a.stop < b.stop`. The range of
//! the lower-priority mark is cut at the boundary of the higher-priority range
//! that falls inside it; the cut-off piece lies inside the winner and is
//! re-examined like any other range. Every chunk keeps exactly the marks it
//! had, and a higher-priority range is never split by a lower one.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;

use crate::error::{ExportError, Result};

use super::chunks::MarkRange;
use super::priority::MarkPriority;
use super::registry::MarkRegistry;

/// Sweeps the ranges in start order, keeping the stack of ranges still open.
/// A range that outlives the innermost open one crosses it; the loser is cut
/// and the cut-off piece goes back into the queue.
pub fn untangle(
    ranges: Vec<MarkRange>,
    registry: &MarkRegistry,
    priority: &dyn MarkPriority,
) -> Result<Vec<MarkRange>> {
    // Pieces of one input range stay disjoint and non-empty, so no input
    // range can be cut into more pieces than it has chunks.
    let budget = ranges.iter().map(MarkRange::len).sum::<usize>() + ranges.len();
    let mut resolutions = 0;

    let mut out: Vec<MarkRange> = Vec::with_capacity(ranges.len());
    let mut queue: BinaryHeap<Queued> = ranges.into_iter().map(Queued).collect();
    // Indices into `out`, innermost last.
    let mut open: Vec<usize> = Vec::new();

    'ranges: while let Some(Queued(range)) = queue.pop() {
        while let Some(&top) = open.last() {
            let enclosing = out[top];
            if enclosing.stop <= range.start {
                open.pop();
                continue;
            }
            if range.stop <= enclosing.stop {
                break;
            }

            if resolutions >= budget {
                return Err(ExportError::UntangleDiverged {
                    resolutions,
                    ranges: out.len() + queue.len(),
                });
            }
            resolutions += 1;

            if enclosing.mark == range.mark {
                // The overlap is already covered.
                queue.push(Queued(MarkRange {
                    start: enclosing.stop,
                    ..range
                }));
                continue 'ranges;
            }

            match priority.compare(registry.entry(enclosing.mark), registry.entry(range.mark)) {
                Ordering::Less => {
                    // `range` wins: `enclosing` stops where `range` starts.
                    out[top].stop = range.start;
                    open.pop();
                    queue.push(Queued(MarkRange {
                        start: range.start,
                        ..enclosing
                    }));
                }
                Ordering::Greater | Ordering::Equal => {
                    // `enclosing` wins: `range` resumes where `enclosing` stops.
                    queue.push(Queued(MarkRange {
                        start: enclosing.stop,
                        ..range
                    }));
                    open.push(out.len());
                    out.push(MarkRange {
                        stop: enclosing.stop,
                        ..range
                    });
                    continue 'ranges;
                }
            }
        }
        open.push(out.len());
        out.push(range);
    }

    if resolutions > 0 {
        debug!(
            "untangled {resolutions} crossing mark ranges into {} ranges",
            out.len()
        );
    }
    sort_for_assembly(&mut out, registry, priority);
    Ok(out)
}

/// Heap entry popping ranges by start, longest first.
#[derive(PartialEq, Eq)]
struct Queued(MarkRange);

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .start
            .cmp(&self.0.start)
            .then_with(|| self.0.stop.cmp(&other.0.stop))
            .then_with(|| other.0.cmp(&self.0))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Orders ranges for the assembler: by start, longer first, and for equal
/// extents lower priority first so the higher-priority mark ends up innermost.
pub fn sort_for_assembly(
    ranges: &mut [MarkRange],
    registry: &MarkRegistry,
    priority: &dyn MarkPriority,
) {
    ranges.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.stop.cmp(&a.stop))
            .then_with(|| priority.compare(registry.entry(a.mark), registry.entry(b.mark)))
            .then_with(|| a.mark.cmp(&b.mark))
    });
}

fn crosses(a: &MarkRange, b: &MarkRange) -> bool {
    a.start < b.start && b.start < a.stop && a.stop < b.stop
}

/// No two ranges cross.
pub fn is_laminar(ranges: &[MarkRange]) -> bool {
    ranges
        .iter()
        .enumerate()
        .all(|(i, a)| ranges[i + 1..].iter().all(|b| !crosses(a, b) && !crosses(b, a)))
}
