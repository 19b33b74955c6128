use serde::{Serialize, Serializer};

use super::{Attr, Block, Caption};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "t")]
pub enum Alignment {
    AlignLeft,
    AlignRight,
    AlignCenter,
    #[default]
    AlignDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "t", content = "c")]
pub enum ColWidth {
    ColWidth(f64),
    ColWidthDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColSpec(pub Alignment, pub ColWidth);

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub attr: Attr,
    pub alignment: Alignment,
    pub row_span: i32,
    pub col_span: i32,
    pub content: Vec<Block>,
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (
            &self.attr,
            &self.alignment,
            self.row_span,
            self.col_span,
            &self.content,
        )
            .serialize(serializer)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Row(pub Attr, pub Vec<Cell>);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableHead(pub Attr, pub Vec<Row>);

/// `(attr, row head columns, intermediate head rows, body rows)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableBody(pub Attr, pub i32, pub Vec<Row>, pub Vec<Row>);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableFoot(pub Attr, pub Vec<Row>);

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub attr: Attr,
    pub caption: Caption,
    pub col_specs: Vec<ColSpec>,
    pub head: TableHead,
    pub bodies: Vec<TableBody>,
    pub foot: TableFoot,
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (
            &self.attr,
            &self.caption,
            &self.col_specs,
            &self.head,
            &self.bodies,
            &self.foot,
        )
            .serialize(serializer)
    }
}
