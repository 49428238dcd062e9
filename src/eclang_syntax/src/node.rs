use serde::Serialize;

use crate::attribute::Attribute;
use crate::value::Value;

/// A node of the tree: an instance of a class with a name, typed
/// attributes and child nodes. Children are owned by value, so a tree is
/// acyclic by construction and drops without any manual bookkeeping.
///
/// `file_id` records where the node came from: 0 means authored in the
/// file that owns the tree, anything else indexes the owning document's
/// included-files table (the node arrived through `#include-dyn` or
/// `#template-dyn`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub class_name: String,
    /// Class ID in the owning language, resolved once at parse/decode time
    /// so encoding does not re-hash names. `None` for classes the language
    /// does not register (custom classes from the binary form).
    pub class_id: Option<u8>,
    pub name: String,
    pub file_id: u8,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(
        class_name: impl Into<String>,
        class_id: Option<u8>,
        name: impl Into<String>,
        file_id: u8,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            class_id,
            name: name.into(),
            file_id,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn push_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Value of the first attribute with the given name.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Descends a `a/b/c` path by node name, first match per segment.
    pub fn descendant(&self, path: &str) -> Option<&Node> {
        let mut current = self;
        for segment in path.split('/') {
            current = current.child(segment)?;
        }
        Some(current)
    }

    /// Direct children of the given class, in insertion order.
    pub fn children_by_class<'a>(&'a self, class_name: &str) -> Vec<&'a Node> {
        self.children
            .iter()
            .filter(|c| c.class_name == class_name)
            .collect()
    }
}
