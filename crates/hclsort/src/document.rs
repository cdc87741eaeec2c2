//! document model and parse adapter
//!
//! A [Document] owns the original source text plus the ordered top-level
//! items extracted from it. Parsing is delegated to [hcl_edit::parser];
//! this module only converts the parsed tree into the editable model the
//! sorters work on. Each item records its byte range in the source so
//! untouched declarations can be re-emitted verbatim, comments included.

use crate::tokens::TokenBuf;
use hcl_edit::structure::{Block as HclBlock, BlockLabel, Structure};
use hcl_edit::Span;
use indexmap::IndexMap;
use std::ops::Range;

/// A parsed configuration document, mutated in place by the sorters and
/// serialized once through [crate::format].
#[derive(Debug)]
pub struct Document {
    pub(crate) src: String,
    pub(crate) items: Vec<Item>,
    /// Trivia after the last top-level item, kept on output
    pub(crate) trailing: TokenBuf,
}

/// A top-level item. Top-level attributes are rare (variable definition
/// files) but parseable; they are never sortable and keep their original
/// relative order.
#[derive(Debug)]
pub enum Item {
    Block(Block),
    Attribute(Attribute),
}

/// A block declaration: kind, labels and a body.
#[derive(Debug)]
pub struct Block {
    pub(crate) kind: String,
    pub(crate) labels: Vec<Label>,
    /// Trimmed trivia preceding the block, so comments survive relocation
    pub(crate) lead: TokenBuf,
    /// Trimmed verbatim source of the block, trailing same-line comment included
    pub(crate) text: TokenBuf,
    /// Byte range of the block itself within [Document::src]
    pub(crate) core: Range<usize>,
    pub(crate) depth: usize,
    pub(crate) body: Body,
}

/// Attribute-and-child-block contents of one block.
///
/// Attribute names have map semantics: unique per body, last write wins.
/// The map keeps insertion order only so meta-argument encounter order
/// can be observed; canonical order is always recomputed from names by an
/// explicit sort step, never taken from map iteration order.
#[derive(Debug, Default)]
pub struct Body {
    pub(crate) attributes: IndexMap<String, Attribute>,
    pub(crate) children: Vec<Block>,
    /// Emission plan installed by a sorter; `None` means emit verbatim
    pub(crate) rebuilt: Option<Vec<Group>>,
}

/// One emission group of a rebuilt body. The renderer separates
/// consecutive non-empty groups with exactly one blank line.
pub(crate) type Group = Vec<Entry>;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Entry {
    Attr(String),
    Child(usize),
}

/// An attribute item: its name plus the trimmed verbatim text of the
/// whole item (leading comments, `name = expression`, trailing same-line
/// comment). The expression is carried byte for byte and never rewritten.
#[derive(Debug)]
pub struct Attribute {
    pub(crate) name: String,
    pub(crate) text: TokenBuf,
}

/// A block label, keeping the raw source form (quoting included) for
/// re-emission and the decoded value for sorting.
#[derive(derive_new::new, Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub(crate) raw: String,
    pub(crate) value: String,
}

#[derive(thiserror::Error, Debug)]
#[error("error parsing HCL content from '{filename}'")]
pub struct ParseError {
    pub filename: String,
    #[source]
    pub source: hcl_edit::parser::Error,
}

impl Body {
    /// True if this body or any nested body carries a rebuild plan.
    pub(crate) fn is_dirty(&self) -> bool {
        self.rebuilt.is_some() || self.children.iter().any(|child| child.body.is_dirty())
    }
}

impl Document {
    /// Parses raw configuration source into a document.
    ///
    /// The filename is used in error text only. Parsing is the only
    /// stage of the pipeline that can fail.
    pub fn parse(src: &str, filename: &str) -> Result<Self, ParseError> {
        let body = hcl_edit::parser::parse_body(src).map_err(|source| ParseError {
            filename: filename.to_string(),
            source,
        })?;
        tracing::debug!(filename, "parsed configuration");

        let mut items = Vec::new();
        let mut cursor = 0;

        for structure in body {
            match structure {
                Structure::Attribute(attr) => {
                    let span = attr.span().expect("parser retains spans");
                    let end = extend_through_comment(src, span.end);
                    items.push(Item::Attribute(Attribute {
                        name: attr.key.value().as_str().to_string(),
                        text: TokenBuf::lex(&src[cursor..end]).trimmed(),
                    }));
                    cursor = end;
                }
                Structure::Block(block) => {
                    let (converted, end) = convert_block(src, block, cursor, 0);
                    items.push(Item::Block(converted));
                    cursor = end;
                }
            }
        }

        Ok(Self {
            src: src.to_string(),
            items,
            trailing: TokenBuf::lex(&src[cursor..]).trimmed(),
        })
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }
}

impl Block {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }
}

impl Label {
    pub fn value(&self) -> &str {
        &self.value
    }
}

fn convert_block(src: &str, block: HclBlock, lead_start: usize, depth: usize) -> (Block, usize) {
    let core = block.span().expect("parser retains spans");
    let ext_end = extend_through_comment(src, core.end);

    let kind = block.ident.value().as_str().to_string();
    let labels: Vec<Label> = block
        .labels
        .iter()
        .map(|label| convert_label(src, label))
        .collect();

    let open = body_open(src, &block, &core);
    let mut attributes = IndexMap::new();
    let mut children = Vec::new();
    let mut cursor = open + 1;

    for structure in block.body {
        match structure {
            Structure::Attribute(attr) => {
                let span = attr.span().expect("parser retains spans");
                let end = extend_through_comment(src, span.end);
                let name = attr.key.value().as_str().to_string();
                attributes.insert(
                    name.clone(),
                    Attribute {
                        name,
                        text: TokenBuf::lex(&src[cursor..end]).trimmed(),
                    },
                );
                cursor = end;
            }
            Structure::Block(inner) => {
                let (converted, end) = convert_block(src, inner, cursor, depth + 1);
                children.push(converted);
                cursor = end;
            }
        }
    }

    let converted = Block {
        kind,
        labels,
        lead: TokenBuf::lex(&src[lead_start..core.start]).trimmed(),
        text: TokenBuf::lex(&src[core.start..ext_end]).trimmed(),
        core,
        depth,
        body: Body {
            attributes,
            children,
            rebuilt: None,
        },
    };

    (converted, ext_end)
}

fn convert_label(src: &str, label: &BlockLabel) -> Label {
    match label {
        BlockLabel::Ident(ident) => {
            let value = ident.value().as_str().to_string();
            let raw = ident
                .span()
                .map(|span| src[span].to_string())
                .unwrap_or_else(|| value.clone());
            Label::new(raw, value)
        }
        BlockLabel::String(string) => {
            let value = string.value().to_string();
            let raw = string
                .span()
                .map(|span| src[span].to_string())
                .unwrap_or_else(|| format!("{value:?}"));
            Label::new(raw, value)
        }
    }
}

/// Byte offset of the `{` opening a block's body: the first brace after
/// the identifier and labels.
fn body_open(src: &str, block: &HclBlock, core: &Range<usize>) -> usize {
    let after = block
        .labels
        .last()
        .and_then(label_end)
        .or_else(|| block.ident.span().map(|span| span.end))
        .unwrap_or(core.start);

    let rel = src[after..core.end]
        .find('{')
        .expect("block body has an opening brace");
    after + rel
}

fn label_end(label: &BlockLabel) -> Option<usize> {
    let span = match label {
        BlockLabel::Ident(ident) => ident.span(),
        BlockLabel::String(string) => string.span(),
    };
    span.map(|span| span.end)
}

/// Extends a structure's end offset through a trailing same-line comment
/// so it relocates together with the item it annotates. Stops before the
/// line ending.
fn extend_through_comment(src: &str, end: usize) -> usize {
    let bytes = src.as_bytes();
    let mut pos = end;

    while pos < bytes.len() && (bytes[pos] == b' ' || bytes[pos] == b'\t') {
        pos += 1;
    }

    let at_comment = pos < bytes.len()
        && (bytes[pos] == b'#' || (bytes[pos] == b'/' && bytes.get(pos + 1) == Some(&b'/')));
    if !at_comment {
        return end;
    }

    while pos < bytes.len() && bytes[pos] != b'\n' {
        pos += 1;
    }
    pos
}
