use std::collections::BTreeMap;

use log::debug;

use crate::document::attrs::{self, Attrs};
use crate::document::{Node, NodeKind};
use crate::error::Result;
use crate::pandoc::{
    Alignment, Attr, Block, Caption, Cell, ColSpec, ColWidth, Row, Table, TableBody, TableFoot,
    TableHead,
};

use super::chunks::text_inlines;
use super::context::ExportContext;

impl ExportContext<'_> {
    pub(crate) fn table(&mut self, node: &Node) -> Result<Block> {
        let row_head_columns = attrs::int32(&node.attrs, "headerColumns")
            .unwrap_or(0)
            .max(0);

        let mut head = TableHead::default();
        let mut bodies = Vec::new();
        let mut foot = TableFoot::default();
        let mut loose_rows = Vec::new();
        let mut has_sections = false;

        for (index, child) in node.content.iter().enumerate() {
            self.descend(index, child, |ctx| {
                let kind = ctx.kind_of(child)?;
                match kind {
                    NodeKind::TableHead => {
                        head = TableHead(attrs::pandoc_attr(&child.attrs), ctx.rows(child)?);
                    }
                    NodeKind::TableBody => bodies.push(TableBody(
                        attrs::pandoc_attr(&child.attrs),
                        row_head_columns,
                        vec![],
                        ctx.rows(child)?,
                    )),
                    NodeKind::TableFoot => {
                        foot = TableFoot(attrs::pandoc_attr(&child.attrs), ctx.rows(child)?);
                    }
                    NodeKind::TableRow => {
                        loose_rows.push(ctx.row(child)?);
                        return Ok(());
                    }
                    other => return Err(ctx.misplaced(other)),
                }
                has_sections = true;
                Ok(())
            })?;
        }

        if !loose_rows.is_empty() {
            if has_sections {
                return Err(self.structure_error(
                    "table rows cannot be mixed with head, body or foot sections",
                ));
            }
            let header_rows = attrs::integer(&node.attrs, "headerRows")
                .unwrap_or(0)
                .clamp(0, loose_rows.len() as i64) as usize;
            let body_rows = loose_rows.split_off(header_rows);
            head = TableHead(Attr::default(), loose_rows);
            bodies.push(TableBody(Attr::default(), row_head_columns, vec![], body_rows));
        }

        let mut sections: Vec<&[Row]> = vec![head.1.as_slice()];
        for body in &bodies {
            sections.push(body.2.as_slice());
            sections.push(body.3.as_slice());
        }
        sections.push(foot.1.as_slice());

        let alignments = column_alignments(&sections);
        let widths = column_widths(&node.attrs, alignments.len());
        let col_specs: Vec<ColSpec> = alignments
            .into_iter()
            .zip(widths)
            .map(|(alignment, width)| ColSpec(alignment, width))
            .collect();
        debug!("table at {} has {} columns", self.path(), col_specs.len());

        let caption = attrs::string(&node.attrs, "caption")
            .map(|text| Caption::plain(text_inlines(text)))
            .unwrap_or_default();

        Ok(Block::Table(Box::new(Table {
            attr: attrs::pandoc_attr(&node.attrs),
            caption,
            col_specs,
            head,
            bodies,
            foot,
        })))
    }

    fn rows(&mut self, section: &Node) -> Result<Vec<Row>> {
        section
            .content
            .iter()
            .enumerate()
            .map(|(index, row)| {
                self.descend(index, row, |ctx| match ctx.kind_of(row)? {
                    NodeKind::TableRow => ctx.row(row),
                    other => Err(ctx.misplaced(other)),
                })
            })
            .collect()
    }

    fn row(&mut self, row: &Node) -> Result<Row> {
        let cells = row
            .content
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                self.descend(index, cell, |ctx| match ctx.kind_of(cell)? {
                    NodeKind::TableCell | NodeKind::TableHeaderCell => ctx.cell(cell),
                    other => Err(ctx.misplaced(other)),
                })
            })
            .collect::<Result<_>>()?;
        Ok(Row(attrs::pandoc_attr(&row.attrs), cells))
    }

    fn cell(&mut self, cell: &Node) -> Result<Cell> {
        Ok(Cell {
            attr: attrs::pandoc_attr(&cell.attrs),
            alignment: cell_alignment(&cell.attrs),
            row_span: self.span(&cell.attrs, "rowspan")?,
            col_span: self.span(&cell.attrs, "colspan")?,
            content: self.blocks(&cell.content)?,
        })
    }

    fn span(&self, cell: &Attrs, key: &str) -> Result<i32> {
        let Some(span) = attrs::integer(cell, key) else {
            return Ok(1);
        };
        match i32::try_from(span.max(1)) {
            Ok(span) if span <= MAX_SPAN => Ok(span),
            _ => Err(self.structure_error(format!("{key} {span} is larger than {MAX_SPAN}"))),
        }
    }
}

/// Cells may not span more rows or columns than this.
pub const MAX_SPAN: i32 = 1000;

fn cell_alignment(cell: &Attrs) -> Alignment {
    match attrs::string(cell, "align") {
        Some("left") => Alignment::AlignLeft,
        Some("center") => Alignment::AlignCenter,
        Some("right") => Alignment::AlignRight,
        _ => Alignment::AlignDefault,
    }
}

/// Infers one alignment per column by majority vote over every cell.
///
/// Each section is laid out on its own grid so that rowspans shift later
/// cells to the right. A cell spanning `k` columns gives `1/k` of a vote to
/// each of them; a column takes an alignment only when it holds a strict
/// majority of that column's votes.
pub fn column_alignments(sections: &[&[Row]]) -> Vec<Alignment> {
    let mut tallies: Vec<BTreeMap<Alignment, f64>> = Vec::new();

    for rows in sections {
        // Rows still covered by a rowspan, per column.
        let mut covered: Vec<usize> = Vec::new();
        for Row(_, cells) in rows.iter() {
            let mut col = 0;
            for cell in cells {
                while covered.get(col).is_some_and(|&n| n > 0) {
                    col += 1;
                }
                let width = cell.col_span.max(1) as usize;
                let end = col + width;
                if covered.len() < end {
                    covered.resize(end, 0);
                }
                if tallies.len() < end {
                    tallies.resize_with(end, BTreeMap::new);
                }
                for c in col..end {
                    covered[c] = cell.row_span.max(1) as usize;
                    *tallies[c].entry(cell.alignment).or_default() += 1.0 / width as f64;
                }
                col = end;
            }
            for n in covered.iter_mut().filter(|n| **n > 0) {
                *n -= 1;
            }
        }
    }

    tallies
        .iter()
        .map(|votes| {
            let total: f64 = votes.values().sum();
            votes
                .iter()
                .find(|&(_, &count)| count > total / 2.0)
                .map(|(&alignment, _)| alignment)
                .unwrap_or_default()
        })
        .collect()
}

/// Column widths from the table's `widths` attribute.
///
/// Authored entries pass through and the remaining columns split what is
/// left of the full width, or share it evenly when nothing is left.
pub fn column_widths(table: &Attrs, columns: usize) -> Vec<ColWidth> {
    let authored = match table.get("widths") {
        Some(serde_json::Value::Array(authored)) => authored.as_slice(),
        _ => &[],
    };

    let authored: Vec<Option<f64>> = (0..columns)
        .map(|i| authored.get(i).and_then(serde_json::Value::as_f64))
        .collect();
    let used: f64 = authored.iter().flatten().sum();
    let unset = authored.iter().filter(|w| w.is_none()).count();
    let remaining = 1.0 - used;
    let share = if remaining > 0.0 && unset > 0 {
        remaining / unset as f64
    } else {
        1.0 / columns.max(1) as f64
    };

    authored
        .into_iter()
        .map(|w| ColWidth::ColWidth(w.unwrap_or(share)))
        .collect()
}
