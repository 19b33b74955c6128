//! # Pandoc AST
//!
//! Rust mirror of the `pandoc-types` JSON schema. Only serialization is
//! provided: the exporter builds these values bottom-up and never reads
//! Pandoc JSON back.
//!
//! ## Modules
//!
//! - **`attr`**: `Attr` and link targets
//! - **`inline`**: `Inline` and the citation types
//! - **`block`**: `Block`, list attributes and captions
//! - **`table`**: table sections, rows, cells and column specs
//! - **`meta`**: `MetaValue`

pub mod attr;
pub mod block;
pub mod inline;
pub mod meta;
pub mod table;

use std::collections::BTreeMap;

use serde::Serialize;

pub use attr::{Attr, Target};
pub use block::{Block, Caption, ListAttributes, ListNumberDelim, ListNumberStyle};
pub use inline::{Citation, CitationMode, Inline, MathType, QuoteType};
pub use meta::MetaValue;
pub use table::{Alignment, Cell, ColSpec, ColWidth, Row, Table, TableBody, TableFoot, TableHead};

/// API version written when the caller does not supply one.
pub const DEFAULT_API_VERSION: [u32; 3] = [1, 23, 1];

/// A complete Pandoc document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pandoc {
    #[serde(rename = "pandoc-api-version")]
    pub api_version: [u32; 3],
    pub meta: BTreeMap<String, MetaValue>,
    pub blocks: Vec<Block>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_field_order() {
        let doc = Pandoc {
            api_version: DEFAULT_API_VERSION,
            meta: BTreeMap::new(),
            blocks: vec![Block::HorizontalRule],
        };
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[{"t":"HorizontalRule"}]}"#
        );
    }
}
