use std::collections::BTreeMap;

use crate::document::attrs;
use crate::document::{Node, NodeKind};
use crate::error::Result;
use crate::pandoc::{
    Attr, Block, Caption, Inline, ListAttributes, ListNumberDelim, ListNumberStyle, MetaValue,
    Pandoc,
};

use super::chunks::text_inlines;
use super::context::ExportContext;

pub const NOTE_DIV_CLASS: &str = "note";

impl ExportContext<'_> {
    /// Converts the root `doc` node: an optional leading `metadata` child
    /// followed by top-level blocks.
    pub fn document(&mut self, doc: &Node) -> Result<Pandoc> {
        let kind = self.kind_of(doc)?;
        if kind != NodeKind::Doc {
            return Err(self.structure_error(format!("document root must be 'doc', found '{kind}'")));
        }

        let mut meta = BTreeMap::new();
        let mut blocks = Vec::with_capacity(doc.content.len());
        for (index, child) in doc.content.iter().enumerate() {
            self.descend(index, child, |ctx| {
                if ctx.kind_of(child)? == NodeKind::Metadata {
                    if index != 0 {
                        return Err(ctx.structure_error("metadata must be the first child of the document"));
                    }
                    meta = ctx.metadata(child)?;
                } else {
                    blocks.push(ctx.block(child)?);
                }
                Ok(())
            })?;
        }

        Ok(Pandoc {
            api_version: self.options.api_version,
            meta,
            blocks,
        })
    }

    pub fn blocks(&mut self, nodes: &[Node]) -> Result<Vec<Block>> {
        nodes
            .iter()
            .enumerate()
            .map(|(index, node)| self.descend(index, node, |ctx| ctx.block(node)))
            .collect()
    }

    /// Converts one block node; the caller has already descended into it.
    pub fn block(&mut self, node: &Node) -> Result<Block> {
        let kind = self.kind_of(node)?;
        let block = match kind {
            NodeKind::Paragraph => Block::Para(self.inlines(&node.content)?),
            NodeKind::Heading => {
                let level = attrs::integer(&node.attrs, "level").unwrap_or(1).clamp(1, 6) as i32;
                Block::Header(
                    level,
                    attrs::pandoc_attr(&node.attrs),
                    self.inlines(&node.content)?,
                )
            }
            NodeKind::BulletList => Block::BulletList(self.list_items(node)?),
            NodeKind::OrderedList => {
                Block::OrderedList(list_attributes(node), self.list_items(node)?)
            }
            NodeKind::DefinitionList => self.definition_list(node)?,
            NodeKind::BlockQuote => Block::BlockQuote(self.blocks(&node.content)?),
            NodeKind::CodeBlock => {
                let mut attr = attrs::pandoc_attr(&node.attrs);
                if let Some(language) = attrs::string(&node.attrs, "language") {
                    attr.classes.insert(0, language.to_string());
                }
                Block::CodeBlock(attr, node.text_content())
            }
            NodeKind::RawBlock => Block::RawBlock(
                attrs::string(&node.attrs, "format")
                    .unwrap_or("html")
                    .to_string(),
                node.text_content(),
            ),
            NodeKind::Div => Block::Div(attrs::pandoc_attr(&node.attrs), self.blocks(&node.content)?),
            NodeKind::Note => {
                let mut attr = attrs::pandoc_attr(&node.attrs);
                attr.classes.insert(0, NOTE_DIV_CLASS.to_string());
                Block::Div(attr, self.blocks(&node.content)?)
            }
            NodeKind::IndexDiv => {
                Block::Div(self.index_div_attr(node), self.blocks(&node.content)?)
            }
            NodeKind::Figure => self.figure(node)?,
            NodeKind::HorizontalRule => Block::HorizontalRule,
            NodeKind::Table => self.table(node)?,
            NodeKind::Image => Block::Plain(vec![self.image(node)]),
            NodeKind::Doc
            | NodeKind::Metadata
            | NodeKind::MetaEntry
            | NodeKind::MetaMap
            | NodeKind::MetaList
            | NodeKind::MetaString
            | NodeKind::MetaBool
            | NodeKind::MetaInlines
            | NodeKind::MetaBlocks
            | NodeKind::ListItem
            | NodeKind::DefinitionTerm
            | NodeKind::DefinitionData
            | NodeKind::FigureCaption
            | NodeKind::TableHead
            | NodeKind::TableBody
            | NodeKind::TableFoot
            | NodeKind::TableRow
            | NodeKind::TableCell
            | NodeKind::TableHeaderCell
            | NodeKind::Text
            | NodeKind::HardBreak
            | NodeKind::RawInline
            | NodeKind::IndexRef
            | NodeKind::EmptySpan => return Err(self.misplaced(kind)),
        };
        Ok(block)
    }

    fn list_items(&mut self, list: &Node) -> Result<Vec<Vec<Block>>> {
        list.content
            .iter()
            .enumerate()
            .map(|(index, item)| {
                self.descend(index, item, |ctx| match ctx.kind_of(item)? {
                    NodeKind::ListItem => ctx.blocks(&item.content),
                    other => Err(ctx.structure_error(format!(
                        "list items must be 'listItem', found '{other}'"
                    ))),
                })
            })
            .collect()
    }

    fn definition_list(&mut self, list: &Node) -> Result<Block> {
        let mut items: Vec<(Vec<Inline>, Vec<Vec<Block>>)> = Vec::new();

        for (index, child) in list.content.iter().enumerate() {
            self.descend(index, child, |ctx| {
                match ctx.kind_of(child)? {
                    NodeKind::DefinitionTerm => {
                        if items.last().is_some_and(|(_, defs)| defs.is_empty()) {
                            return Err(ctx.structure_error(
                                "definition term is not followed by a definition",
                            ));
                        }
                        items.push((ctx.inlines(&child.content)?, vec![]));
                    }
                    NodeKind::DefinitionData => match items.last_mut() {
                        Some((_, defs)) => defs.push(ctx.blocks(&child.content)?),
                        None => {
                            return Err(
                                ctx.structure_error("definition has no preceding term")
                            );
                        }
                    },
                    other => {
                        return Err(ctx.structure_error(format!(
                            "definition lists may only contain terms and definitions, found '{other}'"
                        )));
                    }
                }
                Ok(())
            })?;
        }

        if items.last().is_some_and(|(_, defs)| defs.is_empty()) {
            return Err(self.structure_error("last definition term has no definition"));
        }
        Ok(Block::DefinitionList(items))
    }

    fn figure(&mut self, node: &Node) -> Result<Block> {
        let mut caption = Caption::default();
        let mut content = Vec::new();
        for (index, child) in node.content.iter().enumerate() {
            self.descend(index, child, |ctx| {
                if ctx.kind_of(child)? == NodeKind::FigureCaption {
                    caption = Caption::plain(ctx.inlines(&child.content)?);
                } else {
                    content.push(ctx.block(child)?);
                }
                Ok(())
            })?;
        }
        Ok(Block::Figure(attrs::pandoc_attr(&node.attrs), caption, content))
    }

    pub(crate) fn image(&self, node: &Node) -> Inline {
        let mut attr: Attr = attrs::pandoc_attr(&node.attrs);
        for key in ["width", "height"] {
            if let Some(value) = attrs::string(&node.attrs, key) {
                attr.attributes.push((key.to_string(), value.to_string()));
            } else if let Some(value) = attrs::number(&node.attrs, key) {
                attr.attributes.push((key.to_string(), value.to_string()));
            }
        }
        let alt = text_inlines(attrs::string(&node.attrs, "alt").unwrap_or_default());
        let target = (
            attrs::string(&node.attrs, "src").unwrap_or_default().to_string(),
            attrs::string(&node.attrs, "title").unwrap_or_default().to_string(),
        );
        Inline::Image(attr, alt, target)
    }

    pub(crate) fn metadata(&mut self, node: &Node) -> Result<BTreeMap<String, MetaValue>> {
        let mut map = BTreeMap::new();
        for (index, entry) in node.content.iter().enumerate() {
            self.descend(index, entry, |ctx| {
                if ctx.kind_of(entry)? != NodeKind::MetaEntry {
                    return Err(ctx.structure_error("metadata may only contain 'metaEntry' nodes"));
                }
                let Some(key) = attrs::string(&entry.attrs, "key") else {
                    return Err(ctx.structure_error("metadata entry has no key"));
                };
                let [value] = entry.content.as_slice() else {
                    return Err(ctx.structure_error(format!(
                        "metadata entry '{key}' must have exactly one value"
                    )));
                };
                let value = ctx.descend(0, value, |ctx| ctx.meta_value(value))?;
                map.insert(key.to_string(), value);
                Ok(())
            })?;
        }
        Ok(map)
    }

    fn meta_value(&mut self, node: &Node) -> Result<MetaValue> {
        let value = match self.kind_of(node)? {
            NodeKind::MetaMap => MetaValue::MetaMap(self.metadata(node)?),
            NodeKind::MetaList => MetaValue::MetaList(
                node.content
                    .iter()
                    .enumerate()
                    .map(|(index, item)| self.descend(index, item, |ctx| ctx.meta_value(item)))
                    .collect::<Result<_>>()?,
            ),
            NodeKind::MetaString => MetaValue::MetaString(
                attrs::string(&node.attrs, "value")
                    .map(str::to_string)
                    .unwrap_or_else(|| node.text_content()),
            ),
            NodeKind::MetaBool => {
                MetaValue::MetaBool(attrs::boolean(&node.attrs, "value").unwrap_or(false))
            }
            NodeKind::MetaInlines => MetaValue::MetaInlines(self.inlines(&node.content)?),
            NodeKind::MetaBlocks => MetaValue::MetaBlocks(self.blocks(&node.content)?),
            other => return Err(self.misplaced(other)),
        };
        Ok(value)
    }
}

fn list_attributes(node: &Node) -> ListAttributes {
    let start = attrs::int32(&node.attrs, "start").unwrap_or(1);
    let style = match attrs::string(&node.attrs, "numberStyle") {
        Some("decimal") => ListNumberStyle::Decimal,
        Some("lowerAlpha") => ListNumberStyle::LowerAlpha,
        Some("upperAlpha") => ListNumberStyle::UpperAlpha,
        Some("lowerRoman") => ListNumberStyle::LowerRoman,
        Some("upperRoman") => ListNumberStyle::UpperRoman,
        Some("example") => ListNumberStyle::Example,
        _ => ListNumberStyle::DefaultStyle,
    };
    let delim = match attrs::string(&node.attrs, "numberDelim") {
        Some("period") => ListNumberDelim::Period,
        Some("oneParen") => ListNumberDelim::OneParen,
        Some("twoParens") => ListNumberDelim::TwoParens,
        _ => ListNumberDelim::DefaultDelim,
    };
    ListAttributes(start, style, delim)
}
