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

use std::num::NonZeroU64;
use std::num::NonZeroUsize;

use logtree::Registry;
use logtree::Router;
use logtree::config::Node;
use logtree::writer::Buffer;
use logtree::writer::Composite;
use logtree::writer::Console;
use logtree::writer::Constructed;
use logtree::writer::Output;
use logtree::writer::Rotate;
use logtree::writer::Writer;

/// A writer that upper-cases everything it forwards to standard output.
#[derive(Debug)]
struct Shout;

impl Writer for Shout {
    fn write(&self, buf: &[u8]) -> Result<usize, logtree::Error> {
        Console::new(Output::Stdout).write(&buf.to_ascii_uppercase())
    }
}

fn main() {
    // Writers compose without any configuration at all.
    let rotate = Rotate::builder("target/demo-logs/programmatic", NonZeroU64::new(4096).unwrap())
        .filename_prefix("direct")
        .build()
        .unwrap();
    let tree = Composite::new()
        .with(Buffer::new(NonZeroUsize::new(3).unwrap()).with(rotate))
        .with(Console::new(Output::Stdout));
    for i in 0..4 {
        tree.write(format!("direct write {i}\n").as_bytes()).unwrap();
    }
    tree.flush().unwrap();

    // Or register a custom type and route through a router.
    let registry = Registry::with_defaults();
    registry.register("shout", |_| Ok(Constructed::leaf(Shout)));
    println!("registered writers: {:?}", registry.registered());

    let router = Router::new(registry);
    let root = Node::new("logs")
        .with_child(
            Node::new("critical")
                .with_attr("prefix", "!! ")
                .with_attr("flag", "time|utc")
                .with_child(Node::new("shout")),
        )
        .with_child(
            Node::new("info")
                .with_attr("flag", "shortfile")
                .with_child(Node::new("console").with_attr("output", "stdout")),
        );
    router.init(&root).unwrap();

    router.info(format_args!("configured in code"));
    router.critical(format_args!("this one is loud"));
    router.all(format_args!("to every bound section"));
    router.flush().unwrap();
}
