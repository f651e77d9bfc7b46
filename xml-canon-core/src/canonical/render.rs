use std::io::{self, Write};

use super::round::round_value;
use super::CanonicalOptions;
use crate::tree::XmlNode;

const INDENT: &str = "  ";

/// Render a node's attributes as `name="value"` pairs sorted by name.
///
/// Values go through [`round_value`]. Returns an empty string when the node
/// has no attributes.
pub fn attribute_string(node: &XmlNode, opts: &CanonicalOptions) -> String {
    // BTreeMap iteration is already ordered by name.
    node.attributes
        .iter()
        .map(|(name, value)| format!("{name}=\"{}\"", round_value(value, opts.decimals)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tag name followed by the rendered attribute list, if any.
pub fn opening_tag(node: &XmlNode, opts: &CanonicalOptions) -> String {
    let attrs = attribute_string(node, opts);
    if attrs.is_empty() {
        node.tag.clone()
    } else {
        format!("{} {attrs}", node.tag)
    }
}

/// Sibling sort key. Identical to [`opening_tag`].
pub fn node_key(node: &XmlNode, opts: &CanonicalOptions) -> String {
    opening_tag(node, opts)
}

/// Render `root` into its canonical text form.
pub fn canonicalize(root: &XmlNode, opts: &CanonicalOptions) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_canonical(&mut out, root, opts);
    String::from_utf8_lossy(&out).into_owned()
}

/// Stream the canonical text form of `root` into `writer`.
pub fn write_canonical<W: Write>(
    writer: &mut W,
    root: &XmlNode,
    opts: &CanonicalOptions,
) -> io::Result<()> {
    write_node(writer, root, 0, opts)
}

fn write_node<W: Write>(
    writer: &mut W,
    node: &XmlNode,
    depth: usize,
    opts: &CanonicalOptions,
) -> io::Result<()> {
    let indent = INDENT.repeat(depth);
    let tag = opening_tag(node, opts);
    let text = normalized(node.text.as_deref(), opts);
    let tail = normalized(node.tail.as_deref(), opts);

    if node.children.is_empty() && text.is_none() {
        writeln!(writer, "{indent}<{tag}/>")?;
    } else {
        writeln!(writer, "{indent}<{tag}>")?;
        if let Some(text) = &text {
            writeln!(writer, "{indent}{text}")?;
        }
        for child in sorted_children(node, opts) {
            write_node(writer, child, depth + 1, opts)?;
        }
        writeln!(writer, "{indent}</{}>", node.tag)?;
    }

    if let Some(tail) = &tail {
        writeln!(writer, "{indent}{tail}")?;
    }
    Ok(())
}

/// Children ordered by [`node_key`]. Equal keys keep document order.
fn sorted_children<'a>(node: &'a XmlNode, opts: &CanonicalOptions) -> Vec<&'a XmlNode> {
    let mut keyed: Vec<(String, &XmlNode)> = node
        .children
        .iter()
        .map(|child| (node_key(child, opts), child))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, child)| child).collect()
}

fn normalized(raw: Option<&str>, opts: &CanonicalOptions) -> Option<String> {
    let trimmed = raw.map(str::trim).filter(|s| !s.is_empty())?;
    Some(round_value(trimmed, opts.decimals))
}
