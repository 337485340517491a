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

use std::fs;
use std::path::Path;

use crate::Error;
use crate::ErrorKind;
use crate::config::Node;

/// Parse an XML document into a [`Node`] tree.
///
/// Element names and attribute names are taken without their namespace prefix. Text, comments
/// and processing instructions are ignored.
///
/// # Errors
///
/// Return an [`ErrorKind::InvalidConfig`] error if the document is not well-formed or if two
/// sibling elements share a name.
///
/// # Examples
///
/// ```
/// let root = logtree::config::parse_xml(
///     r#"<?xml version="1.0" encoding="utf-8"?>
///     <logs>
///         <debug><console output="stdout" /></debug>
///     </logs>"#,
/// )
/// .unwrap();
///
/// assert_eq!(root.name(), "logs");
/// assert!(root.child("debug").is_some());
/// ```
pub fn parse_xml(text: &str) -> Result<Node, Error> {
    let doc = roxmltree::Document::parse(text.trim_start()).map_err(|err| {
        Error::new(ErrorKind::InvalidConfig, "failed to parse xml configuration").with_source(err)
    })?;
    to_node(doc.root_element())
}

/// Read and parse an XML configuration file. See [`parse_xml`].
pub fn parse_xml_file(path: impl AsRef<Path>) -> Result<Node, Error> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| {
        Error::new(ErrorKind::Io, "failed to read xml configuration")
            .with_context("path", path.display())
            .with_source(err)
    })?;
    parse_xml(&text)
}

fn to_node(element: roxmltree::Node<'_, '_>) -> Result<Node, Error> {
    let mut node = Node::new(element.tag_name().name());
    for attr in element.attributes() {
        node.set_attr(attr.name(), attr.value());
    }
    for child in element.children().filter(|n| n.is_element()) {
        node.add_child(to_node(child)?)?;
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_document() {
        let root = parse_xml(
            r#"
<?xml version="1.0" encoding="utf-8" ?>
<logs>
    <!-- buffered debug output -->
    <debug prefix="[DEBUG]" flag="date|time">
        <buffer size="10">
            <rotate dir="/var/log/app" size="5M" />
            <console output="stdout" foreground="red" />
        </buffer>
    </debug>
    <info>
        <console />
    </info>
</logs>
"#,
        )
        .unwrap();

        assert_eq!(root.name(), "logs");
        assert!(root.attrs().is_empty());

        let debug = root.child("debug").unwrap();
        assert_eq!(debug.attr("prefix"), Some("[DEBUG]"));
        assert_eq!(debug.attr("flag"), Some("date|time"));

        let buffer = debug.child("buffer").unwrap();
        assert_eq!(buffer.attr("size"), Some("10"));
        let names = buffer.children().iter().map(Node::name).collect::<Vec<_>>();
        assert_eq!(names, ["rotate", "console"]);

        assert!(root.child("info").unwrap().child("console").is_some());
    }

    #[test]
    fn test_duplicate_siblings_fail() {
        let err = parse_xml("<logs><debug><console /><console /></debug></logs>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert_eq!(err.context("parent"), Some("debug"));
        assert_eq!(err.context("element"), Some("console"));
    }

    #[test]
    fn test_malformed_document_fails() {
        let err = parse_xml("<logs><debug></logs>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_xml_file(dir.path().join("absent.xml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
