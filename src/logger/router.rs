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
use std::panic::Location;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::RwLock;

use crate::Error;
use crate::ErrorKind;
use crate::Registry;
use crate::build;
use crate::config::Node;
use crate::logger::Flags;
use crate::logger::Level;
use crate::logger::Logger;
use crate::trap::DefaultTrap;
use crate::trap::Trap;
use crate::writer::Composite;
use crate::writer::Container;
use crate::writer::Writer;

/// The name of the configuration root.
const ROOT: &str = "logs";

/// The attributes a severity section accepts.
const SECTION_ATTRIBUTES: [&str; 2] = ["prefix", "flag"];

/// Routes records of each [`Level`] to the writer tree configured for it.
///
/// A router starts with every level discarding its records. [`Router::init`] installs a
/// configuration of the shape:
///
/// ```xml
/// <logs>
///     <info prefix="[INFO] " flag="date|time|shortfile">
///         <buffer size="10">
///             <rotate dir="logs/info" size="5M" />
///         </buffer>
///         <console output="stderr" foreground="green" />
///     </info>
///     <error>
///         <console output="stderr" foreground="red" />
///     </error>
/// </logs>
/// ```
///
/// Each section is one of `trace`, `debug`, `info`, `warn`, `error` and `critical`, and holds
/// at least one writer. Its children are built with [`build`] and fanned out through a
/// [`Composite`].
///
/// # Examples
///
/// ```
/// use logtree::Registry;
/// use logtree::Router;
/// use logtree::config::Node;
///
/// let router = Router::new(Registry::with_defaults());
/// let root = Node::new("logs").with_child(
///     Node::new("info")
///         .with_attr("flag", "")
///         .with_child(Node::new("console").with_attr("output", "stdout")),
/// );
/// router.init(&root).unwrap();
/// router.info(format_args!("Hello info!"));
/// router.flush().unwrap();
/// ```
#[derive(Debug)]
pub struct Router {
    registry: Registry,
    loggers: RwLock<[Logger; 6]>,
    containers: Mutex<Vec<Arc<dyn Writer>>>,
    trap: Box<dyn Trap>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Registry::with_defaults())
    }
}

impl Router {
    /// Create a router that builds writers from `registry` and discards every record until
    /// [`Router::init`] succeeds.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            loggers: RwLock::new(discard_all()),
            containers: Mutex::new(vec![]),
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Set the trap for errors that the logging calls and reconfiguration cannot return.
    #[must_use]
    pub fn with_trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Return the registry this router builds writers from.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Replace the routing with the configuration rooted at `root`.
    ///
    /// The new configuration is validated and built in full before anything changes. On
    /// success the active writer trees are flushed and dropped and the new ones take over. On
    /// failure the active routing stays as it was.
    pub fn init(&self, root: &Node) -> Result<(), Error> {
        let sections = self.build_sections(root)?;

        let mut loggers = self.loggers.write().unwrap_or_else(|e| e.into_inner());
        let mut containers = self.lock_containers();
        for writer in containers.drain(..) {
            if let Err(err) = writer.flush() {
                self.trap.trap(&err);
            }
        }

        let mut fresh = discard_all();
        for (level, logger) in sections {
            containers.push(logger.writer().clone());
            fresh[level.index()] = logger;
        }
        let superseded = std::mem::replace(&mut *loggers, fresh);
        drop(containers);
        drop(loggers);

        drop(superseded);
        Ok(())
    }

    /// Replace the routing with the configuration in the XML document `text`.
    #[cfg(feature = "config-xml")]
    pub fn init_from_xml(&self, text: &str) -> Result<(), Error> {
        self.init(&crate::config::parse_xml(text)?)
    }

    /// Replace the routing with the configuration in the XML file at `path`.
    #[cfg(feature = "config-xml")]
    pub fn init_from_xml_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), Error> {
        self.init(&crate::config::parse_xml_file(path)?)
    }

    /// Flush every bound writer tree.
    ///
    /// All trees are flushed even if one fails; the first error is returned.
    pub fn flush(&self) -> Result<(), Error> {
        let roots = self.lock_containers().clone();

        let mut result = Ok(());
        for root in roots {
            let flushed = root.flush();
            if result.is_ok() {
                result = flushed;
            }
        }
        result
    }

    /// Return the logger bound to `level`.
    ///
    /// An unbound level yields a logger that discards its records.
    pub fn logger(&self, level: Level) -> Logger {
        let loggers = self.loggers.read().unwrap_or_else(|e| e.into_inner());
        loggers[level.index()].clone()
    }

    /// Write a record at `level`. Errors go to the trap.
    #[track_caller]
    pub fn log(&self, level: Level, args: fmt::Arguments) {
        let caller = Location::caller();
        self.log_at(level, Some(caller.file()), Some(caller.line()), args);
    }

    /// Write a record at [`Level::Trace`].
    #[track_caller]
    pub fn trace(&self, args: fmt::Arguments) {
        self.log(Level::Trace, args);
    }

    /// Write a record at [`Level::Debug`].
    #[track_caller]
    pub fn debug(&self, args: fmt::Arguments) {
        self.log(Level::Debug, args);
    }

    /// Write a record at [`Level::Info`].
    #[track_caller]
    pub fn info(&self, args: fmt::Arguments) {
        self.log(Level::Info, args);
    }

    /// Write a record at [`Level::Warn`].
    #[track_caller]
    pub fn warn(&self, args: fmt::Arguments) {
        self.log(Level::Warn, args);
    }

    /// Write a record at [`Level::Error`].
    #[track_caller]
    pub fn error(&self, args: fmt::Arguments) {
        self.log(Level::Error, args);
    }

    /// Write a record at [`Level::Critical`].
    #[track_caller]
    pub fn critical(&self, args: fmt::Arguments) {
        self.log(Level::Critical, args);
    }

    /// Write the same record at every level.
    #[track_caller]
    pub fn all(&self, args: fmt::Arguments) {
        for level in Level::ALL {
            self.log(level, args);
        }
    }

    /// Install this router as the `log` crate global logger.
    ///
    /// See [`try_setup_log_crate`](crate::bridge::try_setup_log_crate).
    pub fn apply(self: Arc<Self>) -> Result<(), log::SetLoggerError> {
        crate::bridge::try_setup_log_crate(self)
    }

    pub(crate) fn log_at(
        &self,
        level: Level,
        file: Option<&str>,
        line: Option<u32>,
        args: fmt::Arguments,
    ) {
        if let Err(err) = self.logger(level).output_at(file, line, args) {
            self.trap.trap(&err);
        }
    }

    pub(crate) fn trap(&self, err: &Error) {
        self.trap.trap(err);
    }

    fn build_sections(&self, root: &Node) -> Result<Vec<(Level, Logger)>, Error> {
        if root.name() != ROOT {
            return Err(
                Error::new(ErrorKind::InvalidConfig, "root element must be logs")
                    .with_context("element", root.name()),
            );
        }
        if !root.attrs().is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidConfig,
                "root element takes no attributes",
            ));
        }
        if root.children().len() > Level::ALL.len() {
            return Err(
                Error::new(ErrorKind::InvalidConfig, "too many severity sections")
                    .with_context("sections", root.children().len()),
            );
        }

        let mut sections: Vec<(Level, Logger)> = Vec::with_capacity(root.children().len());
        for section in root.children() {
            let level = section.name().parse::<Level>()?;
            if sections.iter().any(|(bound, _)| *bound == level) {
                return Err(
                    Error::new(ErrorKind::InvalidConfig, "duplicate severity section")
                        .with_context("section", level),
                );
            }
            let logger = self
                .build_section(section)
                .map_err(|err| err.with_context("section", level))?;
            sections.push((level, logger));
        }
        Ok(sections)
    }

    fn build_section(&self, section: &Node) -> Result<Logger, Error> {
        if section.children().is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidConfig,
                "severity section must hold at least one writer",
            ));
        }
        if let Some(key) = section
            .attrs()
            .keys()
            .find(|key| !SECTION_ATTRIBUTES.contains(&key.as_str()))
        {
            return Err(
                Error::new(ErrorKind::InvalidAttribute, "unknown section attribute")
                    .with_context("attribute", key),
            );
        }

        let flags = match section.attr("flag") {
            Some(flag) => flag.parse::<Flags>()?,
            None => Flags::default(),
        };
        let prefix = section.attr("prefix").unwrap_or_default();

        let mut root = Composite::new();
        for child in section.children() {
            root.add(build(&self.registry, child)?);
        }
        Ok(Logger::new(prefix, flags, Arc::new(root)))
    }

    fn lock_containers(&self) -> MutexGuard<'_, Vec<Arc<dyn Writer>>> {
        self.containers.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn discard_all() -> [Logger; 6] {
    std::array::from_fn(|_| Logger::discard())
}
