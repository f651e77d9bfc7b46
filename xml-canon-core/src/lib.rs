//! Order-insensitive canonicalization of XML trees.
//!
//! Documents are parsed into [`XmlNode`] trees and rendered as line-oriented
//! text in which siblings are sorted by tag and attributes, attributes are
//! sorted by name and numeric values are rounded to a fixed number of decimals.
//! Two documents that differ only in element or attribute order render to the
//! same bytes, so an ordinary line diff of the output shows real changes only.

pub mod canonical;
pub mod parser;
pub mod tree;
pub mod writer;

pub use canonical::{
    attribute_string, canonicalize, node_key, round_value, write_canonical, CanonicalOptions,
};
pub use parser::{parse, parse_file, ParseError};
pub use tree::XmlNode;
pub use writer::{canonicalize_file, CanonError};
