// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use nestmark_engine::{Mark, Node};

/// A document of `paragraphs` paragraphs whose marks overlap in every
/// paragraph, so each one needs untangling.
#[allow(dead_code)]
pub fn generate_overlapping_document(paragraphs: usize) -> Node {
    let strong = Mark::new("strong");
    let link = Mark::new("link").with_attr("href", "https://example.org");
    let style = Mark::new("customStyle").with_attr("name", "Quote");

    let paragraph = Node::new("paragraph").with_children(vec![
        Node::text("Lorem ipsum ").with_marks(vec![style.clone()]),
        Node::text("dolor sit ").with_marks(vec![style.clone(), link.clone()]),
        Node::text("amet, consectetur ").with_marks(vec![link, strong.clone()]),
        Node::new("hardBreak"),
        Node::text("adipiscing elit.").with_marks(vec![strong]),
    ]);

    Node::new("doc").with_children(vec![paragraph; paragraphs])
}

#[allow(dead_code)]
pub fn generate_table_document(rows: usize, columns: usize) -> Node {
    let aligns = ["left", "right", "center"];
    let row = |r: usize| {
        Node::new("tableRow").with_children(
            (0..columns)
                .map(|c| {
                    Node::new("tableCell")
                        .with_attr("align", aligns[(r + c) % aligns.len()])
                        .with_children(vec![
                            Node::new("paragraph")
                                .with_children(vec![Node::text(format!("r{r}c{c}"))]),
                        ])
                })
                .collect(),
        )
    };
    let table = Node::new("table")
        .with_attr("headerRows", 1)
        .with_children((0..rows).map(row).collect());
    Node::new("doc").with_children(vec![table])
}
