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

//! Logtree routes leveled log records through writer trees assembled from declarative
//! configuration.
//!
//! # Overview
//!
//! A configuration is a tree of named, attributed nodes. Below the `logs` root, each of the six
//! severity sections (`trace`, `debug`, `info`, `warn`, `error`, `critical`) lists the writers
//! its records go to. Every other node names a writer type in a [`Registry`] and may nest
//! further writers when its type is a container:
//!
//! - `buffer` batches a number of records and hands them downstream as one write;
//! - `rotate` appends to a file and starts a new one before a size threshold is crossed;
//! - `console` prints to standard output or standard error, optionally colored;
//! - `smtp` (alias `mail`, feature `writer-smtp`) mails every payload.
//!
//! Custom writer types are registered by name before the configuration is loaded.
//!
//! # Examples
//!
//! Routing from an XML document:
//!
//! ```
//! use logtree::Router;
//!
//! let router = Router::default();
//! router
//!     .init_from_xml(
//!         r#"<logs>
//!             <info prefix="[INFO] " flag="time|shortfile">
//!                 <buffer size="2">
//!                     <console output="stdout" />
//!                 </buffer>
//!             </info>
//!         </logs>"#,
//!     )
//!     .unwrap();
//!
//! router.info(format_args!("first"));
//! router.info(format_args!("second"));
//! router.debug(format_args!("no debug section, discarded"));
//! router.flush().unwrap();
//! ```
//!
//! Registering a custom writer:
//!
//! ```
//! use logtree::Router;
//! use logtree::config::Node;
//! use logtree::writer::Constructed;
//! use logtree::writer::Memory;
//!
//! let sink = Memory::default();
//! let router = Router::default();
//! let shared = sink.clone();
//! router
//!     .registry()
//!     .register("memory", move |_| Ok(Constructed::leaf(shared.clone())));
//!
//! let root = Node::new("logs").with_child(
//!     Node::new("error")
//!         .with_attr("flag", "")
//!         .with_child(Node::new("memory")),
//! );
//! router.init(&root).unwrap();
//! router.error(format_args!("disk full"));
//! assert_eq!(sink.contents(), b"disk full\n");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod bridge;
pub mod config;
pub mod trap;
pub mod writer;

mod builder;
mod error;
mod logger;
mod registry;

pub use self::builder::build;
pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::logger::Flags;
pub use self::logger::Level;
pub use self::logger::Logger;
pub use self::logger::Router;
pub use self::registry::Registry;
