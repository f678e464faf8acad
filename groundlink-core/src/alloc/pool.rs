//! ## groundlink-core::alloc::pool
//! **Fixed-capacity byte buffer pool**
//!
//! Every buffer has the same length. A checked-out buffer is returned to the
//! free-list when its [`PooledBuffer`] guard drops, so a read error or an early
//! `continue` can never leak one. When the free-list is empty a fresh buffer is
//! allocated; when it is full a returned buffer is discarded, so the pool never
//! grows past its capacity.

use std::ops::{Deref, DerefMut};

use crossbeam::queue::ArrayQueue;
use tracing::warn;

use super::stats::PoolStats;

/// Buffer sizes above this are allowed but logged, since each pooled buffer is
/// allocated up front.
pub const BUFFER_SIZE_WARNING_LIMIT: usize = 2048;

pub struct BufferPool {
    buffer_size: usize,
    free: ArrayQueue<Box<[u8]>>,
    stats: PoolStats,
}

impl BufferPool {
    pub fn new(buffer_size: usize, capacity: usize) -> Self {
        assert!(buffer_size > 0, "Buffer size must be greater than zero");
        assert!(capacity > 0, "Capacity must be greater than zero");

        if buffer_size > BUFFER_SIZE_WARNING_LIMIT {
            warn!(
                buffer_size,
                limit = BUFFER_SIZE_WARNING_LIMIT,
                "Read buffer size exceeds recommended limit"
            );
        }

        let free = ArrayQueue::new(capacity);
        for _ in 0..capacity {
            // Cannot fail: the queue was sized for exactly `capacity` buffers.
            let _ = free.push(vec![0u8; buffer_size].into_boxed_slice());
        }

        Self {
            buffer_size,
            free,
            stats: PoolStats::new(),
        }
    }

    /// Takes a buffer from the free-list, allocating one if it is empty.
    pub fn checkout(&self) -> PooledBuffer<'_> {
        let buf = match self.free.pop() {
            Some(buf) => buf,
            None => {
                self.stats.increment_allocations();
                vec![0u8; self.buffer_size].into_boxed_slice()
            }
        };
        self.stats.increment_checkouts();
        PooledBuffer {
            pool: self,
            buf: Some(buf),
        }
    }

    fn checkin(&self, buf: Box<[u8]>) {
        self.stats.increment_checkins();
        if self.free.push(buf).is_err() {
            self.stats.increment_discards();
        }
    }

    /// Buffers currently sitting in the free-list.
    pub fn available(&self) -> usize {
        self.free.len()
    }

    pub fn capacity(&self) -> usize {
        self.free.capacity()
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }
}

/// A buffer on loan from a [`BufferPool`].
pub struct PooledBuffer<'pool> {
    pool: &'pool BufferPool,
    buf: Option<Box<[u8]>>,
}

impl Deref for PooledBuffer<'_> {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.buf.as_deref().unwrap_or(&[])
    }
}

impl DerefMut for PooledBuffer<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [u8] {
        self.buf.as_deref_mut().unwrap_or(&mut [])
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.checkin(buf);
        }
    }
}
