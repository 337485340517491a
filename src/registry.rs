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

//! The registry of named writer constructors.

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;
use crate::config::Attributes;
use crate::writer::Buffer;
use crate::writer::Console;
use crate::writer::Constructed;
use crate::writer::Rotate;

/// A shared writer constructor.
pub(crate) type Constructor =
    Arc<dyn Fn(&Attributes) -> Result<Constructed, Error> + Send + Sync + 'static>;

/// A map from writer type names to the constructors that build them.
///
/// Names are registered once and never replaced. The registry is safe to share between threads.
///
/// # Examples
///
/// ```
/// use logtree::Registry;
/// use logtree::writer::Constructed;
/// use logtree::writer::Memory;
///
/// let registry = Registry::with_defaults();
/// assert!(registry.is_registered("buffer"));
///
/// let sink = Memory::default();
/// assert!(registry.register("memory", move |_| Ok(Constructed::leaf(sink.clone()))));
/// assert!(!registry.register("memory", |_| Ok(Constructed::leaf(Memory::default()))));
/// ```
pub struct Registry {
    constructors: Mutex<HashMap<String, Constructor>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("registered", &self.registered())
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            constructors: Mutex::new(HashMap::new()),
        }
    }

    /// Create a registry holding the built-in writer types.
    ///
    /// These are `buffer`, `rotate` and `console`, plus `smtp` and its alias `mail` when the
    /// `writer-smtp` feature is enabled.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register("buffer", Buffer::construct);
        registry.register("rotate", Rotate::construct);
        registry.register("console", Console::construct);
        #[cfg(feature = "writer-smtp")]
        {
            registry.register("smtp", crate::writer::Smtp::construct);
            registry.register("mail", crate::writer::Smtp::construct);
        }
        registry
    }

    /// Register a constructor under `name`.
    ///
    /// Return `false` and leave the registry untouched if `name` is already registered.
    pub fn register<F>(&self, name: impl Into<String>, construct: F) -> bool
    where
        F: Fn(&Attributes) -> Result<Constructed, Error> + Send + Sync + 'static,
    {
        match self.lock().entry(name.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(construct));
                true
            }
        }
    }

    /// Whether a constructor is registered under `name`.
    pub fn is_registered(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// Return the names of all registered writer types.
    pub fn registered(&self) -> BTreeSet<String> {
        self.lock().keys().cloned().collect()
    }

    pub(crate) fn constructor(&self, name: &str) -> Option<Constructor> {
        self.lock().get(name).cloned()
    }

    #[cfg(test)]
    pub(crate) fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Constructor>> {
        self.constructors.lock().unwrap_or_else(|e| e.into_inner())
    }
}
