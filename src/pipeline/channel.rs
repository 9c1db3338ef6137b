//! Fixed-capacity FIFO between the sampling producer and the consumer.
//!
//! Backed by an `embassy-sync` channel guarded by a critical-section mutex,
//! so the storage is a static ring of `N` slots with no heap use. `push`
//! parks the caller while the ring is full and `pop` parks while it is
//! empty; neither drops nor overwrites.

use core::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TryReceiveError, TrySendError};

use crate::error::{Error, Result};
use crate::runtime::{block_on, with_timeout};

pub struct BoundedChannel<T, const N: usize> {
    inner: Channel<CriticalSectionRawMutex, T, N>,
}

impl<T, const N: usize> Default for BoundedChannel<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> BoundedChannel<T, N> {
    const NONZERO: () = assert!(N > 0, "channel capacity must be at least 1");

    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NONZERO;
        Self {
            inner: Channel::new(),
        }
    }

    /// Enqueue `value`, waiting for a free slot.
    pub async fn push(&self, value: T) {
        self.inner.send(value).await;
    }

    /// Dequeue the oldest value, waiting for one to arrive.
    pub async fn pop(&self) -> T {
        self.inner.receive().await
    }

    /// Blocking `push` for task threads. On timeout the channel is left
    /// unchanged and `Error::Timeout` is returned.
    pub fn push_blocking(&self, value: T, timeout: Option<Duration>) -> Result<()> {
        block_on(with_timeout(timeout, self.push(value)))
    }

    /// Blocking `pop` for task threads.
    pub fn pop_blocking(&self, timeout: Option<Duration>) -> Result<T> {
        block_on(with_timeout(timeout, self.pop()))
    }

    /// Enqueue without waiting. A full channel hands the value back.
    pub fn try_push(&self, value: T) -> core::result::Result<(), T> {
        self.inner.try_send(value).map_err(|TrySendError::Full(v)| v)
    }

    /// Dequeue without waiting; `Error::WouldBlock` when empty.
    pub fn try_pop(&self) -> Result<T> {
        self.inner
            .try_receive()
            .map_err(|TryReceiveError::Empty| Error::WouldBlock)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}
