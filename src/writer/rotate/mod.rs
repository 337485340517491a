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

//! A file writer that starts a new file once the current one is full.
//!
//! File names are derived from the UTC time the file was opened:
//! `[prefix.]YYYYMMDD-HHMMSS.ffffff[.N].suffix`. Files are always created fresh; when the name
//! is taken the counter `N` is bumped until a free name is found.

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::mem;
use std::num::NonZeroU64;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;

use bytesize::ByteSize;

use crate::Error;
use crate::ErrorKind;
use crate::config::Attributes;
use crate::trap::DefaultTrap;
use crate::trap::Trap;
use crate::writer::Constructed;
use crate::writer::Writer;
use crate::writer::invalid_attr;
use crate::writer::required_attr;

use self::clock::Clock;

mod clock;

/// A builder for configuring a [`Rotate`] writer.
#[derive(Debug)]
pub struct RotateBuilder {
    // required
    dir: PathBuf,
    max_size: NonZeroU64,

    // has default
    prefix: Option<String>,
    suffix: Option<String>,
    clock: Clock,
    trap: Box<dyn Trap>,
}

impl RotateBuilder {
    /// Create a builder writing into `dir`, starting a new file before a write would push the
    /// current one past `max_size` bytes.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, max_size: NonZeroU64) -> Self {
        Self {
            dir: dir.into(),
            max_size,
            prefix: None,
            suffix: Some("log".to_string()),
            clock: Clock::default(),
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Set the filename prefix.
    #[must_use]
    pub fn filename_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.prefix = if prefix.is_empty() {
            None
        } else {
            Some(prefix)
        };
        self
    }

    /// Set the filename suffix.
    ///
    /// Default to `log`.
    #[must_use]
    pub fn filename_suffix(mut self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        self.suffix = if suffix.is_empty() {
            None
        } else {
            Some(suffix)
        };
        self
    }

    /// Set the trap for errors that cannot be returned to a caller.
    ///
    /// Default to [`DefaultTrap`].
    #[must_use]
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    #[cfg(test)]
    fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Build the [`Rotate`] writer.
    ///
    /// The directory is created if missing, and the first file is opened right away.
    ///
    /// # Errors
    ///
    /// Return an [`ErrorKind::Io`] error if the directory cannot be created or the first file
    /// cannot be opened in it.
    pub fn build(self) -> Result<Rotate, Error> {
        let RotateBuilder {
            dir,
            max_size,
            prefix,
            suffix,
            clock,
            trap,
        } = self;

        fs::create_dir_all(&dir).map_err(|err| {
            Error::new(ErrorKind::Io, "failed to create log directory")
                .with_context("dir", dir.display())
                .with_source(err)
        })?;

        let naming = Naming {
            dir,
            prefix,
            suffix,
            clock,
        };
        let (file, path) = naming.create_log_file()?;
        let state = State {
            naming,
            max_size: max_size.get(),
            file,
            path,
            written: 0,
        };

        Ok(Rotate {
            state: Mutex::new(state),
            trap,
        })
    }
}

/// A writer that appends to a file and starts a new one before the size threshold would be
/// crossed.
///
/// A write is never split across files. A file only grows beyond the threshold when one write
/// alone is larger than it; such a write gets a file of its own.
#[derive(Debug)]
pub struct Rotate {
    state: Mutex<State>,
    trap: Box<dyn Trap>,
}

impl Rotate {
    /// Create a new [`RotateBuilder`].
    #[must_use]
    pub fn builder(dir: impl Into<PathBuf>, max_size: NonZeroU64) -> RotateBuilder {
        RotateBuilder::new(dir, max_size)
    }

    /// Construct a rotating writer from the `dir` and `size` attributes, with optional `prefix`
    /// and `suffix`.
    ///
    /// `size` is a byte count or a size expression. Single-letter units are decimal and binary
    /// units need the `i`: `5M` is 5,000,000 bytes while `5MiB` is 5,242,880 bytes.
    pub(crate) fn construct(attrs: &Attributes) -> Result<Constructed, Error> {
        let dir = required_attr(attrs, "dir")?;
        let size = required_attr(attrs, "size")?;
        let max_size = parse_size(size)?;

        let mut builder = RotateBuilder::new(dir, max_size);
        if let Some(prefix) = attrs.get("prefix") {
            builder = builder.filename_prefix(prefix.as_str());
        }
        if let Some(suffix) = attrs.get("suffix") {
            builder = builder.filename_suffix(suffix.as_str());
        }
        Ok(Constructed::leaf(builder.build()?))
    }

    /// The file currently written to.
    pub fn current_path(&self) -> PathBuf {
        self.state().path.clone()
    }

    /// The size threshold in bytes.
    pub fn max_size(&self) -> u64 {
        self.state().max_size
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Writer for Rotate {
    fn write(&self, buf: &[u8]) -> Result<usize, Error> {
        let mut state = self.state();
        let len = buf.len() as u64;
        if state.should_rollover(len) {
            state.rotate(self.trap.as_ref())?;
        }

        state
            .file
            .write_all(buf)
            .map_err(|err| state.io_error("failed to write log file", err))?;
        state.written += len;
        Ok(buf.len())
    }

    fn flush(&self) -> Result<(), Error> {
        let mut state = self.state();
        let file = &mut state.file;
        let result = file.flush().and_then(|()| file.sync_data());
        result.map_err(|err| state.io_error("failed to flush log file", err))
    }
}

impl Drop for Rotate {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Err(err) = state.file.flush() {
            let err = state.io_error("failed to flush log file on drop", err);
            self.trap.trap(&err);
        }
    }
}

#[derive(Debug)]
struct State {
    naming: Naming,
    max_size: u64,
    file: File,
    path: PathBuf,
    written: u64,
}

impl State {
    fn should_rollover(&self, incoming: u64) -> bool {
        self.written > 0 && self.written.saturating_add(incoming) > self.max_size
    }

    fn rotate(&mut self, trap: &dyn Trap) -> Result<(), Error> {
        let (file, path) = self.naming.create_log_file()?;

        let mut previous = mem::replace(&mut self.file, file);
        if let Err(err) = previous.flush() {
            trap.trap(&self.io_error("failed to flush previous log file", err));
        }

        self.path = path;
        self.written = 0;
        Ok(())
    }

    fn io_error(&self, message: &str, err: io::Error) -> Error {
        Error::new(ErrorKind::Io, message)
            .with_context("path", self.path.display())
            .with_source(err)
    }
}

#[derive(Debug)]
struct Naming {
    dir: PathBuf,
    prefix: Option<String>,
    suffix: Option<String>,
    clock: Clock,
}

impl Naming {
    fn filename(&self, stamp: &str, cnt: usize) -> String {
        let mut filename = match &self.prefix {
            Some(prefix) => format!("{prefix}.{stamp}"),
            None => stamp.to_string(),
        };
        if cnt > 0 {
            filename.push_str(&format!(".{cnt}"));
        }
        if let Some(suffix) = &self.suffix {
            filename.push('.');
            filename.push_str(suffix);
        }
        filename
    }

    fn create_log_file(&self) -> Result<(File, PathBuf), Error> {
        let stamp = self.clock.stamp();

        let mut cnt = 0;
        loop {
            let path = self.dir.join(self.filename(&stamp, cnt));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((file, path)),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => cnt += 1,
                Err(err) => {
                    return Err(Error::new(ErrorKind::Io, "failed to create log file")
                        .with_context("path", path.display())
                        .with_source(err));
                }
            }
        }
    }
}

fn parse_size(value: &str) -> Result<NonZeroU64, Error> {
    let size = value.trim().parse::<ByteSize>().map_err(|err| {
        invalid_attr("size", value, "invalid size expression").with_source(anyhow::Error::msg(err))
    })?;
    NonZeroU64::new(size.as_u64())
        .ok_or_else(|| invalid_attr("size", value, "size must be greater than zero"))
}
