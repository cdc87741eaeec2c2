//! reorder operations
//!
//! Each block-local sorter installs a rebuild plan on the body it
//! touches: an ordered list of groups of entries, later rendered with
//! exactly one blank line between non-empty groups. Canonical order is a
//! pure function of attribute names and block labels, so every pass is
//! idempotent. [sort] runs the block-local sorters over matching
//! top-level blocks, then reorders the top level itself.

use crate::document::{Block, Body, Document, Entry, Group, Item};
use std::collections::HashSet;

/// Meta-arguments placed first within a resource or data body, in the
/// order they are encountered.
pub const LEADING_META_ARGS: [&str; 2] = ["count", "for_each"];

/// Meta-argument placed last within a resource or data body.
pub const TRAILING_META_ARG: &str = "depends_on";

/// Runs the full reorder pipeline over a parsed document.
///
/// Block kinds in `sort_kinds` that carry at least one label are sorted
/// by their first label at the top level; everything else keeps its
/// original relative order and precedes the sorted group.
pub fn sort(doc: &mut Document, sort_kinds: &HashSet<String>) {
    for item in &mut doc.items {
        let Item::Block(block) = item else {
            continue;
        };
        match block.kind.as_str() {
            "terraform" => sort_required_providers(block),
            "resource" | "data" => sort_resource_params(block),
            "locals" => sort_locals(block),
            _ => {}
        }
    }

    sort_top_level(doc, sort_kinds);
}

/// Sorts the attributes of every `required_providers` block nested
/// directly under a `terraform` block. Other children, and the position
/// of `required_providers` among them, are left untouched.
pub fn sort_required_providers(block: &mut Block) {
    for child in &mut block.body.children {
        if child.kind != "required_providers" {
            continue;
        }
        tracing::trace!("sorting required_providers entries");
        child.body.rebuilt = Some(vec![
            sorted_attribute_group(&child.body),
            child_group(&child.body),
        ]);
    }
}

/// Sorts the attributes of a `locals` block lexicographically by name.
pub fn sort_locals(block: &mut Block) {
    tracing::trace!("sorting locals entries");
    block.body.rebuilt = Some(vec![
        sorted_attribute_group(&block.body),
        // locals bodies hold no nested blocks in valid configuration,
        // but a parseable body must not lose content
        child_group(&block.body),
    ]);
}

/// Reorders a `resource` or `data` body per the style guide: leading
/// meta-arguments first in encounter order, then sorted attributes, then
/// nested blocks in original relative order, then `depends_on`.
pub fn sort_resource_params(block: &mut Block) {
    let mut leading = Vec::new();
    let mut names = Vec::new();
    let mut has_depends_on = false;

    for name in block.body.attributes.keys() {
        if LEADING_META_ARGS.contains(&name.as_str()) {
            leading.push(name.clone());
        } else if name == TRAILING_META_ARG {
            has_depends_on = true;
        } else {
            names.push(name.clone());
        }
    }
    names.sort();

    let trailing: Group = if has_depends_on {
        vec![Entry::Attr(TRAILING_META_ARG.to_string())]
    } else {
        Vec::new()
    };

    tracing::trace!(kind = %block.kind, "sorting resource parameters");
    block.body.rebuilt = Some(vec![
        leading.into_iter().map(Entry::Attr).collect(),
        names.into_iter().map(Entry::Attr).collect(),
        child_group(&block.body),
        trailing,
    ]);
}

/// Reorders the document's top level: items whose kind is in `sort_kinds`
/// and that carry at least one label are sorted by their first label;
/// all other items keep their original relative order and come first.
pub fn sort_top_level(doc: &mut Document, sort_kinds: &HashSet<String>) {
    let items = std::mem::take(&mut doc.items);
    let mut other = Vec::new();
    let mut sortable: Vec<(String, Item)> = Vec::new();

    for item in items {
        match &item {
            Item::Block(block) if sort_kinds.contains(&block.kind) && !block.labels.is_empty() => {
                sortable.push((block.labels[0].value.clone(), item));
            }
            _ => other.push(item),
        }
    }

    tracing::debug!(
        other = other.len(),
        sortable = sortable.len(),
        "reordering top-level declarations"
    );
    sortable.sort_by(|a, b| a.0.cmp(&b.0));
    other.extend(sortable.into_iter().map(|(_, item)| item));
    doc.items = other;
}

fn sorted_attribute_group(body: &Body) -> Group {
    let mut names: Vec<String> = body.attributes.keys().cloned().collect();
    names.sort();
    names.into_iter().map(Entry::Attr).collect()
}

fn child_group(body: &Body) -> Group {
    (0..body.children.len()).map(Entry::Child).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::document::Document;
    use pretty_assertions::assert_eq;

    fn parse(src: &str) -> Document {
        Document::parse(src, "test.tf").expect("must parse")
    }

    fn block(item: &Item) -> &Block {
        match item {
            Item::Block(block) => block,
            Item::Attribute(_) => panic!("expected a block"),
        }
    }

    #[test]
    fn resource_meta_args_keep_encounter_order() {
        let mut doc = parse(
            "resource \"a\" \"b\" {\n  name = \"x\"\n  for_each = [1]\n  depends_on = [a.b]\n  count = 1\n}\n",
        );
        let Item::Block(resource) = &mut doc.items[0] else {
            panic!("expected a block");
        };
        sort_resource_params(resource);

        let groups = resource.body.rebuilt.as_ref().expect("rebuilt");
        assert_eq!(
            groups[0],
            vec![
                Entry::Attr("for_each".to_string()),
                Entry::Attr("count".to_string())
            ]
        );
        assert_eq!(groups[1], vec![Entry::Attr("name".to_string())]);
        assert_eq!(groups[3], vec![Entry::Attr("depends_on".to_string())]);
    }

    #[test]
    fn required_providers_siblings_stay_untouched() {
        let mut doc = parse(
            "terraform {\n  backend \"s3\" {}\n  required_providers {\n    b = 1\n    a = 2\n  }\n}\n",
        );
        let Item::Block(terraform) = &mut doc.items[0] else {
            panic!("expected a block");
        };
        sort_required_providers(terraform);

        assert!(terraform.body.children[0].body.rebuilt.is_none());
        let groups = terraform.body.children[1].body.rebuilt.as_ref().expect("rebuilt");
        assert_eq!(
            groups[0],
            vec![Entry::Attr("a".to_string()), Entry::Attr("b".to_string())]
        );
    }

    #[test]
    fn top_level_unlabeled_blocks_are_not_sortable() {
        let mut doc = parse("variable \"b\" {}\n\nterraform {}\n\nvariable \"a\" {}\n");
        let kinds: HashSet<String> = ["variable", "terraform"]
            .iter()
            .map(ToString::to_string)
            .collect();
        sort_top_level(&mut doc, &kinds);

        let order: Vec<&str> = doc.items.iter().map(|item| block(item).kind()).collect();
        assert_eq!(order, vec!["terraform", "variable", "variable"]);
        assert_eq!(block(&doc.items[1]).labels()[0].value(), "a");
        assert_eq!(block(&doc.items[2]).labels()[0].value(), "b");
    }

    #[test]
    fn empty_allow_set_preserves_order() {
        let mut doc = parse("module \"z\" {}\n\nmodule \"a\" {}\n");
        sort_top_level(&mut doc, &HashSet::new());

        let labels: Vec<&str> = doc
            .items
            .iter()
            .map(|item| block(item).labels()[0].value())
            .collect();
        assert_eq!(labels, vec!["z", "a"]);
    }
}
