//! Page document tree.
//!
//! A page is an element tree with namespace-qualified names, as handed over by
//! the host. The recolor pipeline only reads and patches text of existing
//! nodes; it never adds or removes elements.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace of OneNote 2013 page XML.
pub const ONENOTE_NAMESPACE: &str = "http://schemas.microsoft.com/office/onenote/2013/onenote";

/// A namespace-qualified element name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XName {
    pub namespace: String,
    pub local: String,
}

impl XName {
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local: local.into(),
        }
    }
}

impl fmt::Display for XName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace, self.local)
    }
}

/// An unqualified attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub name: XName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: XName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attribute) => attribute.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &XName) -> Option<&Element> {
        self.children.iter().find(|c| c.name == *name)
    }

    pub fn child_mut(&mut self, name: &XName) -> Option<&mut Element> {
        self.children.iter_mut().find(|c| c.name == *name)
    }

    /// Text content, or the empty string.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// Child-index path from the page root to an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

/// A page snapshot fetched from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Host-assigned page identifier.
    pub id: String,
    /// Namespace of the page's element names.
    pub namespace: String,
    pub root: Element,
}

impl Page {
    /// Create a page in the OneNote namespace with an empty `Page` root.
    pub fn new(id: impl Into<String>) -> Self {
        let root = Element::new(XName::new(ONENOTE_NAMESPACE, "Page"));
        Self::with_root(id, root)
    }

    pub fn with_root(id: impl Into<String>, root: Element) -> Self {
        Self {
            id: id.into(),
            namespace: root.name.namespace.clone(),
            root,
        }
    }

    /// Qualify a local name with the page namespace.
    pub fn name(&self, local: &str) -> XName {
        XName::new(self.namespace.clone(), local)
    }

    /// Paths of every descendant (root excluded) with the given name, in
    /// document order.
    pub fn descendants(&self, name: &XName) -> Vec<NodePath> {
        let mut found = Vec::new();
        let mut stack: Vec<(NodePath, &Element)> = self
            .root
            .children
            .iter()
            .enumerate()
            .rev()
            .map(|(i, child)| (NodePath::root().child(i), child))
            .collect();

        while let Some((path, element)) = stack.pop() {
            for (i, child) in element.children.iter().enumerate().rev() {
                stack.push((path.child(i), child));
            }
            if element.name == *name {
                found.push(path);
            }
        }
        found
    }

    pub fn element(&self, path: &NodePath) -> Option<&Element> {
        path.indices()
            .iter()
            .try_fold(&self.root, |element, &i| element.children.get(i))
    }

    pub fn element_mut(&mut self, path: &NodePath) -> Option<&mut Element> {
        path.indices()
            .iter()
            .try_fold(&mut self.root, |element, &i| element.children.get_mut(i))
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
