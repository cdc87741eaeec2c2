//! # hclsort - canonical ordering for terraform configuration
//!
//! `hclsort` normalizes the internal ordering of declarations and
//! attributes in HCL documents so that repeated runs over the same
//! semantic content produce byte-stable, style-guide-compliant output.
//! It never validates configuration semantics and never rewrites an
//! attribute's value expression, only its position.
//!
//! ## HCL vocabulary
//!
//! The terms used throughout this crate map directly onto the shape of
//! an HCL document:
//!
//! - a file is an ordered sequence of top-level items
//! - an `attribute` assigns an expression to a name (`key = value`)
//! - a `block` is a kind identifier (`resource`, `locals`, ...), zero or
//!   more labels, and a `{`..`}`-delimited body holding further
//!   attributes and nested blocks
//!
//! ## Pipeline
//!
//! ```text
//! parse -> block-local sorters -> top-level sorter -> render
//! ```
//!
//! - Parsing ([document::Document::parse]) delegates to
//!   [hcl_edit::parser] and converts the result into an editable model
//!   that remembers each item's byte range in the source. Parsing is the
//!   only stage that can fail; it returns a [ParseError] carrying the
//!   filename and the underlying diagnostic.
//! - The block-local sorters ([sort::sort_required_providers],
//!   [sort::sort_locals], [sort::sort_resource_params]) install rebuild
//!   plans on the bodies they touch. An attribute travels as a trimmed
//!   [tokens::TokenBuf], so leading and trailing separators are stripped
//!   while comments and value bytes are carried verbatim.
//! - The top-level sorter ([sort::sort_top_level]) reorders the
//!   document: blocks of caller-selected kinds that carry a label are
//!   sorted by their first label, everything else keeps its original
//!   relative order and comes first.
//! - Rendering ([Document]'s `Display` impl) emits untouched
//!   declarations verbatim and rebuilt bodies in canonical form, with
//!   exactly one blank line between non-empty groups.
//!
//! Every pass is idempotent: canonical order is a pure function of names
//! and labels, never of prior position.
//!
//! ## Example
//!
//! ```
//! use std::collections::HashSet;
//!
//! let sorted = hclsort::sort_source("locals {\n  b = 1\n  a = 2\n}\n", "example.tf", &HashSet::new())?;
//! assert_eq!(sorted, "locals {\n  a = 2\n  b = 1\n}\n");
//! # Ok::<(), hclsort::ParseError>(())
//! ```

pub mod document;
mod format;
pub mod sort;
pub mod tokens;

pub use document::{Document, ParseError};

use std::collections::HashSet;

/// Parses `src`, runs the full reorder pipeline and returns the
/// canonical bytes. `filename` is used in error text only; `sort_kinds`
/// is the set of top-level block kinds eligible for label-based sorting.
pub fn sort_source(
    src: &str,
    filename: &str,
    sort_kinds: &HashSet<String>,
) -> Result<String, ParseError> {
    let mut doc = Document::parse(src, filename)?;
    sort::sort(&mut doc, sort_kinds);
    Ok(doc.to_string())
}
