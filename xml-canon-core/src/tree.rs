use std::collections::BTreeMap;

/// A parsed XML element.
///
/// Text handling follows the ElementTree model: `text` holds the character data
/// between the start tag and the first child, `tail` holds the character data
/// after this element's end tag up to the next sibling (or the parent's end tag).
/// Both are kept raw, whitespace included.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlNode {
    /// Element tag name.
    pub tag: String,
    /// XML attributes keyed by name.
    pub attributes: BTreeMap<String, String>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
    /// Leading character data.
    pub text: Option<String>,
    /// Character data following the end tag.
    pub tail: Option<String>,
}

impl XmlNode {
    /// Create a new XML node with no attributes, children, or text.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            text: None,
            tail: None,
        }
    }

    /// Set an attribute, returning the node for chaining.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the leading text, returning the node for chaining.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child, returning the node for chaining.
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Return the first child with the provided tag.
    pub fn get_child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Return all children with the provided tag.
    pub fn get_children(&self, tag: &str) -> Vec<&XmlNode> {
        self.children
            .iter()
            .filter(|child| child.tag == tag)
            .collect()
    }
}

pub(crate) fn append_text(slot: &mut Option<String>, text: &str) {
    match slot {
        Some(existing) => existing.push_str(text),
        None => *slot = Some(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{append_text, XmlNode};

    #[test]
    fn builders_compose_a_tree() {
        let root = XmlNode::new("root")
            .with_attribute("id", "1")
            .with_child(XmlNode::new("item").with_text("a"))
            .with_child(XmlNode::new("item").with_text("b"));

        assert_eq!(root.attributes.get("id").map(String::as_str), Some("1"));
        assert_eq!(root.get_children("item").len(), 2);
        assert_eq!(
            root.get_child("item").and_then(|n| n.text.as_deref()),
            Some("a")
        );
    }

    #[test]
    fn append_text_concatenates_chunks() {
        let mut slot = None;
        append_text(&mut slot, "a ");
        append_text(&mut slot, "b");
        assert_eq!(slot.as_deref(), Some("a b"));
    }
}
