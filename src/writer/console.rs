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

use std::borrow::Cow;
use std::io;
use std::io::Write;
use std::str::FromStr;

use colored::Color;
use colored::ColoredString;
use colored::Colorize;

use crate::Error;
use crate::ErrorKind;
use crate::config::Attributes;
use crate::writer::Constructed;
use crate::writer::Writer;
use crate::writer::invalid_attr;

/// The standard stream a [`Console`] writes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Output {
    /// Standard output.
    Stdout,
    /// Standard error.
    #[default]
    Stderr,
}

impl FromStr for Output {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdout" => Ok(Output::Stdout),
            "stderr" => Ok(Output::Stderr),
            _ => Err(Error::new(
                ErrorKind::InvalidAttribute,
                "output must be either stdout or stderr",
            )
            .with_context("value", s)),
        }
    }
}

/// A writer that prints payloads to standard output or standard error, optionally colored.
///
/// Coloring honors the `colored` crate's global switches, such as the `NO_COLOR` environment
/// variable.
#[derive(Debug, Default)]
pub struct Console {
    output: Output,
    foreground: Option<Color>,
    background: Option<Color>,
}

impl Console {
    /// Create a console writer without colors.
    pub fn new(output: Output) -> Self {
        Self {
            output,
            foreground: None,
            background: None,
        }
    }

    /// Set the foreground color.
    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Construct a console writer from the `output`, `foreground` and `background` attributes.
    pub(crate) fn construct(attrs: &Attributes) -> Result<Constructed, Error> {
        let output = match attrs.get("output") {
            Some(value) => value
                .parse::<Output>()
                .map_err(|err| err.with_context("attribute", "output"))?,
            None => Output::default(),
        };

        Ok(Constructed::leaf(Console {
            output,
            foreground: parse_color(attrs, "foreground")?,
            background: parse_color(attrs, "background")?,
        }))
    }

    fn colorize<'a>(&self, buf: &'a [u8]) -> Cow<'a, [u8]> {
        if self.foreground.is_none() && self.background.is_none() {
            return Cow::Borrowed(buf);
        }

        // keep the line break outside the escape sequences
        let text = String::from_utf8_lossy(buf);
        let (body, tail) = match text.strip_suffix('\n') {
            Some(body) => (body, "\n"),
            None => (text.as_ref(), ""),
        };

        let mut colored = ColoredString::from(body);
        if let Some(color) = self.foreground {
            colored = colored.color(color);
        }
        if let Some(color) = self.background {
            colored = colored.on_color(color);
        }
        Cow::Owned(format!("{colored}{tail}").into_bytes())
    }
}

fn parse_color(attrs: &Attributes, key: &'static str) -> Result<Option<Color>, Error> {
    match attrs.get(key).map(|v| v.trim()) {
        None | Some("") | Some("default") => Ok(None),
        Some(value) => Color::from_str(value)
            .map(Some)
            .map_err(|()| invalid_attr(key, value, "unknown color")),
    }
}

impl Writer for Console {
    fn write(&self, buf: &[u8]) -> Result<usize, Error> {
        let bytes = self.colorize(buf);
        match self.output {
            Output::Stdout => io::stdout().write_all(&bytes),
            Output::Stderr => io::stderr().write_all(&bytes),
        }
        .map_err(Error::from_io_error)?;
        Ok(buf.len())
    }

    fn flush(&self) -> Result<(), Error> {
        match self.output {
            Output::Stdout => io::stdout().flush(),
            Output::Stderr => io::stderr().flush(),
        }
        .map_err(Error::from_io_error)
    }
}
