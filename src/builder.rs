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

use crate::Error;
use crate::ErrorKind;
use crate::Registry;
use crate::config::Node;
use crate::writer::Constructed;
use crate::writer::Writer;

/// Build the writer described by `node` and, recursively, all of its children.
///
/// Children are added to their parent in the order they appear in `node`. A node with children
/// must name a container writer. Any failure discards the partially built tree; the returned
/// error carries the name of every writer on the path to the failing node as `writer`
/// context, innermost first.
pub fn build(registry: &Registry, node: &Node) -> Result<Box<dyn Writer>, Error> {
    let name = node.name();
    let Some(construct) = registry.constructor(name) else {
        return Err(
            Error::new(ErrorKind::UnknownWriter, "writer type is not registered")
                .with_context("writer", name),
        );
    };

    let constructed = construct(node.attrs()).map_err(|err| err.with_context("writer", name))?;
    if node.children().is_empty() {
        return Ok(constructed.into_writer());
    }

    let Constructed::Container(mut container) = constructed else {
        return Err(
            Error::new(ErrorKind::NotAContainer, "writer cannot take child writers")
                .with_context("writer", name),
        );
    };
    for child in node.children() {
        let child = build(registry, child).map_err(|err| err.with_context("writer", name))?;
        container.add(child);
    }
    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::Composite;
    use crate::writer::Memory;

    fn registry_with(sink: &Memory) -> Registry {
        let registry = Registry::with_defaults();
        let sink = sink.clone();
        registry.register("memory", move |_| Ok(Constructed::leaf(sink.clone())));
        registry.register("fanout", |_| Ok(Constructed::container(Composite::new())));
        registry
    }

    #[test]
    fn test_build_nested_tree() {
        let sink = Memory::default();
        let registry = registry_with(&sink);

        let node = Node::new("buffer").with_attr("size", "2").with_child(
            Node::new("fanout")
                .with_child(Node::new("memory"))
                .with_child(Node::new("console").with_attr("output", "stderr")),
        );
        let writer = build(&registry, &node).unwrap();

        writer.write(b"a").unwrap();
        assert!(sink.writes().is_empty());
        writer.write(b"b").unwrap();
        assert_eq!(sink.writes(), vec![b"ab".to_vec()]);
    }

    #[test]
    fn test_container_without_children() {
        let sink = Memory::default();
        let registry = registry_with(&sink);

        let writer = build(&registry, &Node::new("fanout")).unwrap();
        assert_eq!(writer.write(b"dropped").unwrap(), 7);
    }

    #[test]
    fn test_unknown_writer_names_the_node() {
        let registry = Registry::with_defaults();
        let node = Node::new("buffer")
            .with_attr("size", "1")
            .with_child(Node::new("carrier-pigeon"));

        let err = build(&registry, &node).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownWriter);
        assert_eq!(err.context("writer"), Some("carrier-pigeon"));
    }

    #[test]
    fn test_leaf_with_children() {
        let sink = Memory::default();
        let registry = registry_with(&sink);
        let node = Node::new("memory").with_child(Node::new("console"));

        let err = build(&registry, &node).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAContainer);
        assert_eq!(err.context("writer"), Some("memory"));
    }

    #[test]
    fn test_constructor_error_keeps_kind() {
        let registry = Registry::with_defaults();
        let node = Node::new("buffer").with_attr("size", "0");

        let err = build(&registry, &node).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAttribute);
        assert_eq!(err.context("writer"), Some("buffer"));
    }
}
