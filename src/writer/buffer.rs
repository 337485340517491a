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

use std::mem;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;
use crate::config::Attributes;
use crate::trap::DefaultTrap;
use crate::trap::Trap;
use crate::writer::Composite;
use crate::writer::Constructed;
use crate::writer::Container;
use crate::writer::Writer;
use crate::writer::invalid_attr;
use crate::writer::required_attr;

/// A writer that holds records until a configured number has accumulated, then hands them to
/// its children as one payload.
///
/// Records are never dropped by the batching policy: [`Writer::flush`] hands over whatever is
/// pending, and so does dropping the writer.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use logtree::writer::Buffer;
/// use logtree::writer::Memory;
/// use logtree::writer::Writer;
///
/// let sink = Memory::default();
/// let buffer = Buffer::new(NonZeroUsize::new(2).unwrap()).with(sink.clone());
///
/// buffer.write(b"a\n").unwrap();
/// assert!(sink.writes().is_empty());
/// buffer.write(b"b\n").unwrap();
/// assert_eq!(sink.writes(), vec![b"a\nb\n".to_vec()]);
/// ```
#[derive(Debug)]
pub struct Buffer {
    size: NonZeroUsize,
    state: Mutex<State>,
    children: Composite,
    trap: Box<dyn Trap>,
}

#[derive(Debug, Default)]
struct State {
    count: usize,
    buf: Vec<u8>,
}

impl Buffer {
    /// Create a buffer that forwards every `size` records.
    pub fn new(size: NonZeroUsize) -> Self {
        Self {
            size,
            state: Mutex::new(State::default()),
            children: Composite::new(),
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Append a child writer and return `self`.
    pub fn with(mut self, child: impl Writer) -> Self {
        self.children.add(Box::new(child));
        self
    }

    /// Set the trap for errors raised while dropping the buffer.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    /// Construct a buffer from the `size` attribute.
    pub(crate) fn construct(attrs: &Attributes) -> Result<Constructed, Error> {
        let value = required_attr(attrs, "size")?;
        let size = value
            .trim()
            .parse::<NonZeroUsize>()
            .map_err(|_| invalid_attr("size", value, "buffer size must be a positive integer"))?;
        Ok(Constructed::container(Buffer::new(size)))
    }

    /// The number of records that triggers a forward.
    pub fn size(&self) -> usize {
        self.size.get()
    }

    /// The number of records currently held.
    pub fn pending(&self) -> usize {
        self.state().count
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn drain(&self, state: &mut State) -> Result<(), Error> {
        if state.count == 0 {
            return Ok(());
        }

        let bytes = mem::take(&mut state.buf);
        state.count = 0;
        self.children.write(&bytes)?;
        Ok(())
    }
}

impl Writer for Buffer {
    fn write(&self, buf: &[u8]) -> Result<usize, Error> {
        let mut state = self.state();
        state.buf.extend_from_slice(buf);
        state.count += 1;
        if state.count >= self.size.get() {
            self.drain(&mut state)?;
        }
        Ok(buf.len())
    }

    fn flush(&self) -> Result<(), Error> {
        let mut state = self.state();
        let drained = self.drain(&mut state);
        let flushed = self.children.flush();
        drained.and(flushed)
    }
}

impl Container for Buffer {
    fn add(&mut self, child: Box<dyn Writer>) {
        self.children.add(child);
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(|e| e.into_inner());
        if state.count == 0 {
            return;
        }

        let bytes = mem::take(&mut state.buf);
        state.count = 0;
        if let Err(err) = self.children.write(&bytes) {
            let err = Error::new(err.kind(), "failed to forward buffered records on drop")
                .with_source(err);
            self.trap.trap(&err);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::panic;
    use std::panic::AssertUnwindSafe;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;
    use std::sync::atomic::Ordering;
    use std::thread;

    use super::*;
    use crate::ErrorKind;
    use crate::trap::testing::Recording;
    use crate::writer::Memory;
    use crate::writer::testing::Failing;

    /// Panics on its first write, then forwards to `sink`.
    #[derive(Debug)]
    struct PanicOnce {
        panicked: AtomicBool,
        sink: Memory,
    }

    impl Writer for PanicOnce {
        fn write(&self, buf: &[u8]) -> Result<usize, Error> {
            if !self.panicked.swap(true, Ordering::SeqCst) {
                panic!("writer panicked");
            }
            self.sink.write(buf)
        }
    }

    fn buffer(size: usize, sink: &Memory) -> Buffer {
        Buffer::new(NonZeroUsize::new(size).unwrap()).with(sink.clone())
    }

    #[test]
    fn test_forwards_one_batch_at_capacity() {
        let sink = Memory::default();
        let buffer = buffer(3, &sink);

        buffer.write(b"one\n").unwrap();
        buffer.write(b"two\n").unwrap();
        assert!(sink.writes().is_empty());
        assert_eq!(buffer.pending(), 2);

        buffer.write(b"three\n").unwrap();
        assert_eq!(sink.writes(), vec![b"one\ntwo\nthree\n".to_vec()]);
        assert_eq!(buffer.pending(), 0);
    }

    #[test]
    fn test_flush_below_capacity_then_idle_flush() {
        let sink = Memory::default();
        let buffer = buffer(10, &sink);

        buffer.write(b"a").unwrap();
        buffer.write(b"b").unwrap();
        buffer.flush().unwrap();
        assert_eq!(sink.writes(), vec![b"ab".to_vec()]);
        assert_eq!(sink.flushes(), 1);

        buffer.flush().unwrap();
        assert_eq!(sink.writes().len(), 1);
        assert_eq!(buffer.pending(), 0);
    }

    #[test]
    fn test_construct_validates_size() {
        let attrs = |size: &str| Attributes::from([("size".to_string(), size.to_string())]);

        let built = Buffer::construct(&attrs("10")).unwrap();
        assert!(built.is_container());

        for bad in ["0", "-1", "ten", ""] {
            let err = Buffer::construct(&attrs(bad)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidAttribute, "size={bad:?}");
        }

        let err = Buffer::construct(&Attributes::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidAttribute);
        assert_eq!(err.context("attribute"), Some("size"));
    }

    #[test]
    fn test_drop_forwards_pending_records() {
        let sink = Memory::default();
        let buffer = buffer(5, &sink);
        buffer.write(b"left over").unwrap();
        drop(buffer);
        assert_eq!(sink.writes(), vec![b"left over".to_vec()]);
    }

    #[test]
    fn test_drop_with_failing_children_reports_to_trap() {
        let trap = Recording::default();
        let buffer = Buffer::new(NonZeroUsize::new(5).unwrap())
            .with(Failing)
            .trap(trap.clone());
        buffer.write(b"left over").unwrap();
        assert!(trap.messages().is_empty());

        drop(buffer);
        assert_eq!(
            trap.messages(),
            ["failed to forward buffered records on drop"]
        );
        assert_eq!(trap.kinds(), [ErrorKind::Io]);
    }

    #[test]
    fn test_drop_of_empty_buffer_is_quiet() {
        let trap = Recording::default();
        let buffer = Buffer::new(NonZeroUsize::new(5).unwrap())
            .with(Failing)
            .trap(trap.clone());
        drop(buffer);
        assert!(trap.messages().is_empty());
    }

    #[test]
    fn test_panicking_child_does_not_disable_buffer() {
        let sink = Memory::default();
        let buffer = Buffer::new(NonZeroUsize::new(1).unwrap()).with(PanicOnce {
            panicked: AtomicBool::new(false),
            sink: sink.clone(),
        });

        let result = panic::catch_unwind(AssertUnwindSafe(|| buffer.write(b"lost")));
        assert!(result.is_err());
        assert!(buffer.state.is_poisoned());

        assert_eq!(buffer.write(b"kept").unwrap(), 4);
        assert_eq!(sink.writes(), vec![b"kept".to_vec()]);
        assert_eq!(buffer.pending(), 0);
        buffer.flush().unwrap();
    }

    #[test]
    fn test_concurrent_writers_keep_whole_batches() {
        const RECORD: &[u8] = b"0123456789";
        const THREADS: usize = 8;
        const PER_THREAD: usize = 50;

        let sink = Memory::default();
        let buffer = Arc::new(buffer(7, &sink));

        let handles = (0..THREADS)
            .map(|_| {
                let buffer = buffer.clone();
                thread::spawn(move || {
                    for _ in 0..PER_THREAD {
                        buffer.write(RECORD).unwrap();
                    }
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap();
        }
        buffer.flush().unwrap();

        let writes = sink.writes();
        let (last, batches) = writes.split_last().unwrap();
        for batch in batches {
            assert_eq!(batch.len(), 7 * RECORD.len());
        }
        assert_eq!(last.len(), (THREADS * PER_THREAD % 7) * RECORD.len());
        assert_eq!(sink.contents().len(), THREADS * PER_THREAD * RECORD.len());
    }
}
