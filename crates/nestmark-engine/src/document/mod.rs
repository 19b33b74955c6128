//! # Document Tree
//!
//! The editor's document as handed to the exporter: a ProseMirror-style tree of
//! typed nodes with free-form attributes, where inline leaves carry marks.
//!
//! ## Modules
//!
//! - **`node`**: `Node` and `Mark`, deserialized straight from the editor JSON
//! - **`kind`**: `NodeKind`, the closed vocabulary of node types
//! - **`attrs`**: typed accessors over the untyped attribute maps

pub mod attrs;
pub mod kind;
pub mod node;

pub use kind::NodeKind;
pub use node::{Mark, Node};
