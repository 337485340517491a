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

use std::fmt;
use std::fmt::Write;
use std::panic::Location;
use std::sync::Arc;

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::Error;
use crate::logger::Flags;
use crate::writer::Writer;

/// A formatter bound to one writer tree.
///
/// Every record becomes one payload: the prefix, the header fields selected by [`Flags`], the
/// message and a trailing line break, in the layout of the classic standard logger:
///
/// ```text
/// [app] 2024/08/10 17:12:52.123456 main.rs:42: hello
/// ```
///
/// Cloning a logger is cheap; clones share the writer tree.
#[derive(Debug, Clone)]
pub struct Logger {
    prefix: Arc<str>,
    flags: Flags,
    writer: Arc<dyn Writer>,
}

impl Logger {
    /// Create a logger writing to `writer`.
    pub fn new(prefix: impl Into<Arc<str>>, flags: Flags, writer: Arc<dyn Writer>) -> Self {
        Self {
            prefix: prefix.into(),
            flags,
            writer,
        }
    }

    /// Create a logger that drops every record.
    pub fn discard() -> Self {
        Self::new("", Flags::default(), Arc::new(Discard))
    }

    /// Return the prefix of every record.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Return the header fields of every record.
    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub(crate) fn writer(&self) -> &Arc<dyn Writer> {
        &self.writer
    }

    /// Format one record and write it, using the caller as the record's file and line.
    #[track_caller]
    pub fn output(&self, args: fmt::Arguments) -> Result<(), Error> {
        let caller = Location::caller();
        self.output_at(Some(caller.file()), Some(caller.line()), args)
    }

    pub(crate) fn output_at(
        &self,
        file: Option<&str>,
        line: Option<u32>,
        args: fmt::Arguments,
    ) -> Result<(), Error> {
        let record = self.format(Timestamp::now(), file, line, args)?;
        self.writer.write(record.as_bytes())?;
        Ok(())
    }

    /// Flush the writer tree.
    pub fn flush(&self) -> Result<(), Error> {
        self.writer.flush()
    }

    fn format(
        &self,
        now: Timestamp,
        file: Option<&str>,
        line: Option<u32>,
        args: fmt::Arguments,
    ) -> Result<String, Error> {
        let flags = self.flags;
        let mut text = String::from(&*self.prefix);

        if flags.intersects(Flags::DATE | Flags::TIME | Flags::MICROSECONDS) {
            let tz = if flags.contains(Flags::UTC) {
                TimeZone::UTC
            } else {
                TimeZone::system()
            };
            let zoned = now.to_zoned(tz);

            if flags.contains(Flags::DATE) {
                write!(text, "{} ", zoned.strftime("%Y/%m/%d")).map_err(Error::from_fmt_error)?;
            }
            if flags.intersects(Flags::TIME | Flags::MICROSECONDS) {
                write!(text, "{}", zoned.strftime("%H:%M:%S")).map_err(Error::from_fmt_error)?;
                if flags.contains(Flags::MICROSECONDS) {
                    let micros = zoned.subsec_nanosecond() / 1000;
                    write!(text, ".{micros:06}").map_err(Error::from_fmt_error)?;
                }
                text.push(' ');
            }
        }

        if flags.intersects(Flags::SHORTFILE | Flags::LONGFILE) {
            let mut file = file.unwrap_or("???");
            if flags.contains(Flags::SHORTFILE) {
                file = file.rsplit(['/', '\\']).next().unwrap_or(file);
            }
            let line = line.unwrap_or_default();
            write!(text, "{file}:{line}: ").map_err(Error::from_fmt_error)?;
        }

        write!(text, "{args}").map_err(Error::from_fmt_error)?;
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text)
    }
}

/// The sink of unbound levels.
#[derive(Debug)]
struct Discard;

impl Writer for Discard {
    fn write(&self, buf: &[u8]) -> Result<usize, Error> {
        Ok(buf.len())
    }
}
