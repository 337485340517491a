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

//! Writers that make up a routing tree.
//!
//! Every writer accepts byte payloads through [`Writer`]. Writers that can hold child writers
//! also implement [`Container`]; a constructor states which one it built by returning a
//! [`Constructed`].

use std::fmt;

use crate::Error;
use crate::ErrorKind;
use crate::config::Attributes;

mod buffer;
mod composite;
mod console;
mod memory;
mod rotate;
#[cfg(feature = "writer-smtp")]
mod smtp;

pub use self::buffer::Buffer;
pub use self::composite::Composite;
pub use self::console::Console;
pub use self::console::Output;
pub use self::memory::Memory;
pub use self::rotate::Rotate;
pub use self::rotate::RotateBuilder;
#[cfg(feature = "writer-smtp")]
pub use self::smtp::Smtp;

/// A sink for byte payloads.
pub trait Writer: fmt::Debug + Send + Sync + 'static {
    /// Write one payload, returning the number of bytes accepted.
    fn write(&self, buf: &[u8]) -> Result<usize, Error>;

    /// Flush any buffered payloads.
    ///
    /// Default to a no-op.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}

/// A writer that can take child writers.
pub trait Container: Writer {
    /// Append a child writer.
    fn add(&mut self, child: Box<dyn Writer>);
}

/// A writer built by a registered constructor, tagged with its capability.
#[derive(Debug)]
pub enum Constructed {
    /// A writer that cannot take children.
    Leaf(Box<dyn Writer>),
    /// A writer that can take children.
    Container(Box<dyn Container>),
}

impl Constructed {
    /// Wrap a writer that cannot take children.
    pub fn leaf(writer: impl Writer) -> Self {
        Constructed::Leaf(Box::new(writer))
    }

    /// Wrap a writer that can take children.
    pub fn container(container: impl Container) -> Self {
        Constructed::Container(Box::new(container))
    }

    /// Whether the writer can take children.
    pub fn is_container(&self) -> bool {
        matches!(self, Constructed::Container(_))
    }

    /// Forget the capability tag.
    pub fn into_writer(self) -> Box<dyn Writer> {
        match self {
            Constructed::Leaf(writer) => writer,
            Constructed::Container(container) => container,
        }
    }
}

pub(crate) fn required_attr<'a>(attrs: &'a Attributes, key: &'static str) -> Result<&'a str, Error> {
    attrs.get(key).map(String::as_str).ok_or_else(|| {
        Error::new(ErrorKind::InvalidAttribute, "missing required attribute")
            .with_context("attribute", key)
    })
}

pub(crate) fn invalid_attr(key: &'static str, value: &str, reason: &str) -> Error {
    Error::new(ErrorKind::InvalidAttribute, reason)
        .with_context("attribute", key)
        .with_context("value", value)
}
