use serde::{Serialize, Serializer};

/// Identifier, classes and key/value pairs attached to an AST element.
///
/// Serializes as the three-element array `[id, [classes], [[key, value]]]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attr {
    pub id: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
}

impl Attr {
    pub fn new(
        id: impl Into<String>,
        classes: Vec<String>,
        attributes: Vec<(String, String)>,
    ) -> Self {
        Self {
            id: id.into(),
            classes,
            attributes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.classes.is_empty() && self.attributes.is_empty()
    }
}

impl Serialize for Attr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.id, &self.classes, &self.attributes).serialize(serializer)
    }
}

/// Link or image destination: `(url, title)`.
pub type Target = (String, String);
