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
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::Error;
use crate::writer::Writer;

/// A writer that keeps every payload in memory, so tests can inspect what reached a sink.
///
/// Clones share the same storage: keep one clone and hand the other to a constructor.
///
/// # Examples
///
/// ```
/// use logtree::writer::Memory;
/// use logtree::writer::Writer;
///
/// let memory = Memory::default();
/// let sink = memory.clone();
/// sink.write(b"hello").unwrap();
///
/// assert_eq!(memory.writes(), vec![b"hello".to_vec()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Memory {
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
    flushes: Arc<AtomicUsize>,
}

impl Memory {
    fn lock(&self) -> MutexGuard<'_, Vec<Vec<u8>>> {
        self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Every payload received so far, one entry per write call.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.lock().clone()
    }

    /// All received payloads concatenated.
    pub fn contents(&self) -> Vec<u8> {
        self.lock().concat()
    }

    /// The number of flush calls received so far.
    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    /// Forget everything received so far.
    pub fn clear(&self) {
        self.lock().clear();
        self.flushes.store(0, Ordering::SeqCst);
    }
}

impl Writer for Memory {
    fn write(&self, buf: &[u8]) -> Result<usize, Error> {
        self.lock().push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&self) -> Result<(), Error> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_storage_until_cleared() {
        let memory = Memory::default();
        let sink = memory.clone();
        sink.write(b"one ").unwrap();
        sink.write(b"two").unwrap();
        sink.flush().unwrap();

        assert_eq!(memory.writes().len(), 2);
        assert_eq!(memory.contents(), b"one two");
        assert_eq!(memory.flushes(), 1);

        memory.clear();
        assert!(sink.writes().is_empty());
        assert_eq!(sink.flushes(), 0);

        sink.write(b"three").unwrap();
        assert_eq!(memory.contents(), b"three");
    }
}
