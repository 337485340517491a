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

use std::sync::Arc;

use crate::Router;

#[derive(Debug)]
struct LogCrateLogger(Arc<Router>);

impl log::Log for LogCrateLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        self.0.log_at(
            record.level().into(),
            record.file(),
            record.line(),
            *record.args(),
        );
    }

    fn flush(&self) {
        if let Err(err) = self.0.flush() {
            self.0.trap(&err);
        }
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_boxed_logger`] so that all logs from the log crate are
/// forwarded to `router`. Records at `log::Level::Error`, `Warn`, `Info`, `Debug` and `Trace`
/// go to the same-named sections; nothing reaches `critical` through this bridge.
///
/// This should be called early in the execution of a Rust program. Any log events that occur
/// before initialization will be ignored.
///
/// This function will set the global maximum log level to `Trace`. To override this, call
/// [`log::set_max_level`] after this function.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// let router = Arc::new(logtree::Router::default());
/// if let Err(err) = logtree::bridge::try_setup_log_crate(router) {
///     eprintln!("failed to setup log crate: {err}");
/// }
/// ```
pub fn try_setup_log_crate(router: Arc<Router>) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(LogCrateLogger(router)))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// Same as [`try_setup_log_crate`], but panics instead of returning an error.
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// logtree::bridge::setup_log_crate(Arc::new(logtree::Router::default()));
/// log::info!("discarded until the router is initialized");
/// ```
pub fn setup_log_crate(router: Arc<Router>) {
    try_setup_log_crate(router).expect(
        "logtree::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}
