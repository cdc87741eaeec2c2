//! canonical rendering of a reordered document
//!
//! Serialization is total: any parsed document renders without error.
//! Untouched declarations are emitted verbatim from the original source.
//! Rebuilt bodies are emitted with two-space indentation per nesting
//! level, one item per line, exactly one blank line between non-empty
//! groups and none adjacent to empty ones. A block whose body is clean
//! but contains a rebuilt descendant (a `terraform` block around a sorted
//! `required_providers`) keeps its own bytes and has only the descendant
//! range replaced, so sibling content and spacing stay untouched.
//!
//! The renderer never alters attribute value expressions; it only decides
//! where each item's text is placed.

use crate::document::{Block, Document, Entry, Group, Item};
use std::fmt;

const INDENT: &str = "  ";

pub(crate) fn render(doc: &Document) -> String {
    let mut chunks: Vec<String> = doc
        .items
        .iter()
        .map(|item| match item {
            Item::Attribute(attr) => attr.text.to_string(),
            Item::Block(block) => render_block(doc, block),
        })
        .collect();

    if !doc.trailing.is_empty() {
        chunks.push(doc.trailing.to_string());
    }

    if chunks.is_empty() {
        return String::new();
    }

    let mut out = chunks.join("\n\n");
    out.push('\n');
    out
}

fn render_block(doc: &Document, block: &Block) -> String {
    let core = render_core(doc, block);
    if block.lead.is_empty() {
        core
    } else {
        format!("{}\n{}", block.lead, core)
    }
}

fn render_core(doc: &Document, block: &Block) -> String {
    if let Some(groups) = &block.body.rebuilt {
        render_sorted(doc, block, groups)
    } else if block.body.is_dirty() {
        render_spliced(doc, block)
    } else {
        block.text.to_string()
    }
}

/// Emits a rebuilt body: reconstructed header, then the plan's groups.
fn render_sorted(doc: &Document, block: &Block, groups: &[Group]) -> String {
    let mut out = String::new();
    out.push_str(&block.kind);
    for label in &block.labels {
        out.push(' ');
        out.push_str(&label.raw);
    }
    out.push_str(" {\n");

    let indent = INDENT.repeat(block.depth + 1);
    let mut first_group = true;
    for group in groups {
        if group.is_empty() {
            continue;
        }
        if !first_group {
            out.push('\n');
        }
        first_group = false;

        for entry in group {
            out.push_str(&indent);
            match entry {
                Entry::Attr(name) => {
                    let attr = block
                        .body
                        .attributes
                        .get(name)
                        .expect("rebuild plan names a known attribute");
                    out.push_str(&attr.text.to_string());
                }
                Entry::Child(index) => {
                    out.push_str(&render_block(doc, &block.body.children[*index]));
                }
            }
            out.push('\n');
        }
    }

    out.push_str(&INDENT.repeat(block.depth));
    out.push('}');
    out
}

/// Emits a clean block verbatim with each rebuilt descendant's byte
/// range replaced by its canonical rendering.
fn render_spliced(doc: &Document, block: &Block) -> String {
    let mut out = String::new();
    let mut cursor = block.core.start;

    for child in &block.body.children {
        if !child.body.is_dirty() {
            continue;
        }
        out.push_str(&doc.src[cursor..child.core.start]);
        out.push_str(&render_core(doc, child));
        cursor = child.core.end;
    }

    out.push_str(&doc.src[cursor..block.core.end]);
    out
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

#[cfg(test)]
mod test {
    use crate::document::Document;
    use crate::sort;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn sorted(src: &str) -> String {
        let mut doc = Document::parse(src, "test.tf").expect("must parse");
        sort::sort(&mut doc, &HashSet::new());
        doc.to_string()
    }

    #[test]
    fn empty_locals_renders_minimal_skeleton() {
        assert_eq!(sorted("locals {}\n"), "locals {\n}\n");
    }

    #[test]
    fn empty_required_providers_renders_minimal_skeleton() {
        let src = "terraform {\n  required_providers {\n  }\n}\n";
        assert_eq!(
            sorted(src),
            "terraform {\n  required_providers {\n  }\n}\n"
        );
    }

    #[test]
    fn splice_keeps_terraform_siblings_verbatim() {
        let src = "terraform {\n  required_version = \">= 1.4\" # pinned\n\n  required_providers {\n    b = 1\n    a = 2\n  }\n}\n";
        assert_eq!(
            sorted(src),
            "terraform {\n  required_version = \">= 1.4\" # pinned\n\n  required_providers {\n    a = 2\n    b = 1\n  }\n}\n"
        );
    }

    #[test]
    fn untouched_document_normalizes_to_one_blank_line_between_items() {
        let src = "module \"a\" {}\n\n\n\nmodule \"b\" {}\n";
        assert_eq!(sorted(src), "module \"a\" {}\n\nmodule \"b\" {}\n");
    }

    #[test]
    fn lead_comments_stay_with_their_block() {
        let src = "# infra\nmodule \"a\" {}\n";
        assert_eq!(sorted(src), "# infra\nmodule \"a\" {}\n");
    }

    #[test]
    fn empty_document_renders_empty() {
        assert_eq!(sorted(""), "");
    }
}
