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
use crate::writer::Container;
use crate::writer::Writer;

/// A writer that forwards every payload to all of its children.
///
/// Children are called in the order they were added. A failing child does not stop the
/// others from being called; the first error is returned once every child has been tried.
#[derive(Debug, Default)]
pub struct Composite {
    children: Vec<Box<dyn Writer>>,
}

impl Composite {
    /// Create a composite writer without children.
    pub fn new() -> Self {
        Self { children: vec![] }
    }

    /// Append a child writer and return `self`.
    pub fn with(mut self, child: impl Writer) -> Self {
        self.children.push(Box::new(child));
        self
    }

    /// The number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether this composite has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Writer for Composite {
    fn write(&self, buf: &[u8]) -> Result<usize, Error> {
        let mut first_err = None;
        for child in &self.children {
            if let Err(err) = child.write(buf) {
                first_err.get_or_insert(err);
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(buf.len()),
        }
    }

    fn flush(&self) -> Result<(), Error> {
        let mut first_err = None;
        for child in &self.children {
            if let Err(err) = child.flush() {
                first_err.get_or_insert(err);
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Container for Composite {
    fn add(&mut self, child: Box<dyn Writer>) {
        self.children.push(child);
    }
}
