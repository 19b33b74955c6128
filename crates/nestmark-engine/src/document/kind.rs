use std::fmt;
use std::str::FromStr;

/// The closed vocabulary of document node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Doc,
    // Metadata
    Metadata,
    MetaEntry,
    MetaMap,
    MetaList,
    MetaString,
    MetaBool,
    MetaInlines,
    MetaBlocks,
    // Blocks
    Paragraph,
    Heading,
    BulletList,
    OrderedList,
    ListItem,
    DefinitionList,
    DefinitionTerm,
    DefinitionData,
    BlockQuote,
    CodeBlock,
    RawBlock,
    Div,
    Figure,
    FigureCaption,
    IndexDiv,
    HorizontalRule,
    Table,
    TableHead,
    TableBody,
    TableFoot,
    TableRow,
    TableCell,
    TableHeaderCell,
    /// A footnote in inline position, a note container in block position.
    Note,
    // Inlines
    Text,
    HardBreak,
    RawInline,
    Image,
    IndexRef,
    EmptySpan,
}

impl NodeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeKind::Doc => "doc",
            NodeKind::Metadata => "metadata",
            NodeKind::MetaEntry => "metaEntry",
            NodeKind::MetaMap => "metaMap",
            NodeKind::MetaList => "metaList",
            NodeKind::MetaString => "metaString",
            NodeKind::MetaBool => "metaBool",
            NodeKind::MetaInlines => "metaInlines",
            NodeKind::MetaBlocks => "metaBlocks",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::BulletList => "bulletList",
            NodeKind::OrderedList => "orderedList",
            NodeKind::ListItem => "listItem",
            NodeKind::DefinitionList => "definitionList",
            NodeKind::DefinitionTerm => "definitionTerm",
            NodeKind::DefinitionData => "definitionData",
            NodeKind::BlockQuote => "blockQuote",
            NodeKind::CodeBlock => "codeBlock",
            NodeKind::RawBlock => "rawBlock",
            NodeKind::Div => "div",
            NodeKind::Figure => "figure",
            NodeKind::FigureCaption => "figureCaption",
            NodeKind::IndexDiv => "indexDiv",
            NodeKind::HorizontalRule => "horizontalRule",
            NodeKind::Table => "table",
            NodeKind::TableHead => "tableHead",
            NodeKind::TableBody => "tableBody",
            NodeKind::TableFoot => "tableFoot",
            NodeKind::TableRow => "tableRow",
            NodeKind::TableCell => "tableCell",
            NodeKind::TableHeaderCell => "tableHeaderCell",
            NodeKind::Note => "note",
            NodeKind::Text => "text",
            NodeKind::HardBreak => "hardBreak",
            NodeKind::RawInline => "rawInline",
            NodeKind::Image => "image",
            NodeKind::IndexRef => "indexRef",
            NodeKind::EmptySpan => "emptySpan",
        }
    }
}

impl FromStr for NodeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "doc" => NodeKind::Doc,
            "metadata" => NodeKind::Metadata,
            "metaEntry" => NodeKind::MetaEntry,
            "metaMap" => NodeKind::MetaMap,
            "metaList" => NodeKind::MetaList,
            "metaString" => NodeKind::MetaString,
            "metaBool" => NodeKind::MetaBool,
            "metaInlines" => NodeKind::MetaInlines,
            "metaBlocks" => NodeKind::MetaBlocks,
            "paragraph" => NodeKind::Paragraph,
            "heading" => NodeKind::Heading,
            "bulletList" => NodeKind::BulletList,
            "orderedList" => NodeKind::OrderedList,
            "listItem" => NodeKind::ListItem,
            "definitionList" => NodeKind::DefinitionList,
            "definitionTerm" => NodeKind::DefinitionTerm,
            "definitionData" => NodeKind::DefinitionData,
            "blockQuote" => NodeKind::BlockQuote,
            "codeBlock" => NodeKind::CodeBlock,
            "rawBlock" => NodeKind::RawBlock,
            "div" => NodeKind::Div,
            "figure" => NodeKind::Figure,
            "figureCaption" => NodeKind::FigureCaption,
            "indexDiv" => NodeKind::IndexDiv,
            "horizontalRule" => NodeKind::HorizontalRule,
            "table" => NodeKind::Table,
            "tableHead" => NodeKind::TableHead,
            "tableBody" => NodeKind::TableBody,
            "tableFoot" => NodeKind::TableFoot,
            "tableRow" => NodeKind::TableRow,
            "tableCell" => NodeKind::TableCell,
            "tableHeaderCell" => NodeKind::TableHeaderCell,
            "note" => NodeKind::Note,
            "text" => NodeKind::Text,
            "hardBreak" => NodeKind::HardBreak,
            "rawInline" => NodeKind::RawInline,
            "image" => NodeKind::Image,
            "indexRef" => NodeKind::IndexRef,
            "emptySpan" => NodeKind::EmptySpan,
            _ => return Err(()),
        };
        Ok(kind)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
