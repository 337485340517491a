// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The attributed configuration tree.
//!
//! A [`Node`] is the generic, already parsed form of a nested configuration: a name, a map of
//! string attributes and uniquely named children. The XML loader produces it, but it can just
//! as well be built in code:
//!
//! ```
//! use logtree::config::Node;
//!
//! let root = Node::new("logs").with_child(
//!     Node::new("info")
//!         .with_attr("prefix", "[INFO] ")
//!         .with_child(Node::new("console").with_attr("output", "stdout")),
//! );
//!
//! assert_eq!(root.children().len(), 1);
//! ```

use std::collections::BTreeMap;

use crate::Error;
use crate::ErrorKind;

#[cfg(feature = "config-xml")]
mod xml;

#[cfg(feature = "config-xml")]
pub use self::xml::parse_xml;
#[cfg(feature = "config-xml")]
pub use self::xml::parse_xml_file;

/// Attributes of a configuration node, keyed by attribute name.
pub type Attributes = BTreeMap<String, String>;

/// One node of the attributed configuration tree.
///
/// Children keep their insertion order and have pairwise-distinct names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    name: String,
    attrs: Attributes,
    children: Vec<Node>,
}

impl Node {
    /// Create a node with no attributes and no children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Attributes::new(),
            children: vec![],
        }
    }

    /// Set an attribute, replacing any previous value.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Insert a child.
    ///
    /// A child with the same name as an existing one replaces it in place, like inserting into a
    /// map. Use [`Node::add_child`] to reject duplicates instead.
    pub fn with_child(mut self, child: Node) -> Self {
        match self.children.iter_mut().find(|c| c.name == child.name) {
            Some(existing) => *existing = child,
            None => self.children.push(child),
        }
        self
    }

    /// Set an attribute, returning the previous value if any.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.attrs.insert(key.into(), value.into())
    }

    /// Append a child.
    ///
    /// # Errors
    ///
    /// Return an [`ErrorKind::InvalidConfig`] error if a sibling with the same name exists.
    pub fn add_child(&mut self, child: Node) -> Result<(), Error> {
        if self.children.iter().any(|c| c.name == child.name) {
            return Err(
                Error::new(ErrorKind::InvalidConfig, "duplicate element name")
                    .with_context("parent", &self.name)
                    .with_context("element", &child.name),
            );
        }

        self.children.push(child);
        Ok(())
    }

    /// The node name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All attributes of this node.
    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    /// The value of one attribute.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// The child with the given name.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }
}
