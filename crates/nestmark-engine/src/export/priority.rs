use std::cmp::Ordering;

use super::registry::{RegistryEntry, Wrapper};

/// Ordering of marks used to untangle crossing ranges.
///
/// A higher-priority mark is never split by a lower-priority one, and for
/// ranges of identical extent it becomes the inner container.
pub trait MarkPriority: Send + Sync {
    fn rank(&self, entry: &RegistryEntry) -> u8;

    /// Total order over distinct entries: rank first, then earlier
    /// registration wins.
    fn compare(&self, a: &RegistryEntry, b: &RegistryEntry) -> Ordering {
        self.rank(a)
            .cmp(&self.rank(b))
            .then_with(|| b.index.cmp(&a.index))
    }
}

/// Priority tiers of [`DefaultPriority`], lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Tier {
    PlainWrapper = 0,
    CustomStyle = 1,
    Quotation = 2,
    Math = 3,
    Span = 4,
    Link = 5,
    Code = 6,
    Citation = 7,
    Identified = 8,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPriority;

impl DefaultPriority {
    pub fn tier(entry: &RegistryEntry) -> Tier {
        if entry.has_id() {
            return Tier::Identified;
        }
        match &entry.wrapper {
            Wrapper::Emph
            | Wrapper::Underline
            | Wrapper::Strong
            | Wrapper::Strikeout
            | Wrapper::Superscript
            | Wrapper::Subscript
            | Wrapper::SmallCaps => Tier::PlainWrapper,
            w @ Wrapper::Span(_) if w.is_custom_style() => Tier::CustomStyle,
            Wrapper::Quoted(_) => Tier::Quotation,
            Wrapper::Math(_) => Tier::Math,
            Wrapper::Span(_) => Tier::Span,
            Wrapper::Link(..) => Tier::Link,
            Wrapper::Code(_) => Tier::Code,
            Wrapper::Cite(_) => Tier::Citation,
        }
    }
}

impl MarkPriority for DefaultPriority {
    fn rank(&self, entry: &RegistryEntry) -> u8 {
        Self::tier(entry) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Mark;
    use crate::export::registry::MarkRegistry;
    use rstest::rstest;

    fn tier_of(mark: Mark) -> Tier {
        let mut registry = MarkRegistry::new();
        let index = registry.index_of(&mark);
        DefaultPriority::tier(registry.entry(index))
    }

    #[rstest]
    #[case(Mark::new("strong"), Tier::PlainWrapper)]
    #[case(Mark::new("emphasis"), Tier::PlainWrapper)]
    #[case(Mark::new("highlight"), Tier::CustomStyle)]
    #[case(
        Mark::new("span").with_attr("attributes", serde_json::json!({"custom-style": "Poem"})),
        Tier::CustomStyle
    )]
    #[case(Mark::new("doubleQuote"), Tier::Quotation)]
    #[case(Mark::new("math"), Tier::Math)]
    #[case(Mark::new("span").with_attr("classes", "smallprint"), Tier::Span)]
    #[case(Mark::new("link").with_attr("href", "#x"), Tier::Link)]
    #[case(Mark::new("code"), Tier::Code)]
    #[case(Mark::new("citation"), Tier::Citation)]
    #[case(Mark::new("strong").with_attr("id", "s1"), Tier::Identified)]
    #[case(Mark::new("link").with_attr("id", "l1"), Tier::Identified)]
    fn tiers(#[case] mark: Mark, #[case] expected: Tier) {
        assert_eq!(tier_of(mark), expected);
    }

    #[test]
    fn ties_prefer_earlier_registration() {
        let mut registry = MarkRegistry::new();
        let first = registry.index_of(&Mark::new("strong"));
        let second = registry.index_of(&Mark::new("emphasis"));
        let priority = DefaultPriority;

        assert_eq!(
            priority.compare(registry.entry(first), registry.entry(second)),
            Ordering::Greater
        );
        assert_eq!(
            priority.compare(registry.entry(second), registry.entry(first)),
            Ordering::Less
        );
    }

    #[test]
    fn link_outranks_custom_style() {
        let mut registry = MarkRegistry::new();
        let style = registry.index_of(&Mark::new("highlight"));
        let link = registry.index_of(&Mark::new("link").with_attr("href", "#a"));
        assert_eq!(
            DefaultPriority.compare(registry.entry(link), registry.entry(style)),
            Ordering::Greater
        );
    }
}
