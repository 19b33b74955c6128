use serde::Serialize;

use super::{Attr, Inline, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "t")]
pub enum ListNumberStyle {
    DefaultStyle,
    Example,
    Decimal,
    LowerRoman,
    UpperRoman,
    LowerAlpha,
    UpperAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "t")]
pub enum ListNumberDelim {
    DefaultDelim,
    Period,
    OneParen,
    TwoParens,
}

/// `(start number, style, delimiter)` of an ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListAttributes(pub i32, pub ListNumberStyle, pub ListNumberDelim);

impl Default for ListAttributes {
    fn default() -> Self {
        Self(1, ListNumberStyle::DefaultStyle, ListNumberDelim::DefaultDelim)
    }
}

/// Optional short caption plus the caption body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Caption(pub Option<Vec<Inline>>, pub Vec<Block>);

impl Caption {
    pub fn plain(inlines: Vec<Inline>) -> Self {
        if inlines.is_empty() {
            return Self::default();
        }
        Self(None, vec![Block::Plain(inlines)])
    }
}

/// Block AST elements, serialized adjacently tagged like [`Inline`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "t", content = "c")]
pub enum Block {
    Plain(Vec<Inline>),
    Para(Vec<Inline>),
    LineBlock(Vec<Vec<Inline>>),
    CodeBlock(Attr, String),
    RawBlock(String, String),
    BlockQuote(Vec<Block>),
    OrderedList(ListAttributes, Vec<Vec<Block>>),
    BulletList(Vec<Vec<Block>>),
    DefinitionList(Vec<(Vec<Inline>, Vec<Vec<Block>>)>),
    Header(i32, Attr, Vec<Inline>),
    HorizontalRule,
    Table(Box<Table>),
    Figure(Attr, Caption, Vec<Block>),
    Div(Attr, Vec<Block>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_content_is_positional() {
        let header = Block::Header(2, Attr::default(), vec![Inline::str("Intro")]);
        assert_eq!(
            serde_json::to_value(&header).unwrap(),
            json!({"t": "Header", "c": [2, ["", [], []], [{"t": "Str", "c": "Intro"}]]})
        );
    }

    #[test]
    fn ordered_list_attributes() {
        let list = Block::OrderedList(
            ListAttributes(3, ListNumberStyle::Decimal, ListNumberDelim::Period),
            vec![vec![Block::Plain(vec![Inline::str("a")])]],
        );
        assert_eq!(
            serde_json::to_value(&list).unwrap(),
            json!({"t": "OrderedList", "c": [
                [3, {"t": "Decimal"}, {"t": "Period"}],
                [[{"t": "Plain", "c": [{"t": "Str", "c": "a"}]}]]
            ]})
        );
    }

    #[test]
    fn empty_caption_is_null_and_empty() {
        assert_eq!(
            serde_json::to_value(Caption::plain(vec![])).unwrap(),
            json!([null, []])
        );
    }
}
