//! Interrupt-to-task signalling.
//!
//! Two primitives, both written by ISRs and consumed by exactly one task:
//!
//! - [`EventAggregator`]: an OR-combining bit register. Each logical line
//!   owns one bit; the consumer waits for any bit in a mask and clears what
//!   it saw on exit.
//! - [`Notification`]: a counting "give/take" token for the single-button
//!   variant.
//!
//! ```text
//! ┌─────────────┐  set(bit)   ┌──────────────────┐  wait_any()  ┌────────────┐
//! │ GPIO ISR A  │────────────▶│                  │─────────────▶│            │
//! │ GPIO ISR B  │────────────▶│  EventAggregator │              │  Consumer  │
//! │ GPIO ISR C  │────────────▶│  (AtomicU32)     │◀─────────────│  task      │
//! │ GPIO ISR D  │────────────▶│                  │  clear seen  │            │
//! └─────────────┘             └──────────────────┘              └────────────┘
//! ```
//!
//! ## Known limitation: presence, not count
//!
//! Setting the same bit twice before the consumer clears it is observed as
//! one event. A bouncing contact can therefore produce one *or* several
//! logical events per press depending on how the bounces interleave with the
//! consumer's wait. There is no debounce anywhere in the input path.
//!
//! Both `set` paths are a single atomic RMW plus an `AtomicWaker` wake, so
//! they never block and never allocate.

use core::future::poll_fn;
use core::ops::{BitOr, BitOrAssign};
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use core::task::Poll;
use core::time::Duration;

use embassy_sync::waitqueue::AtomicWaker;

use crate::error::Result;
use crate::runtime::{block_on, with_timeout};

/// Number of distinct logical input events.
pub const EVENT_COUNT: usize = 4;

/// Which physical input fired. Fixed at startup; carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LogicalEvent {
    ButtonA = 0,
    ButtonB = 1,
    ButtonC = 2,
    ButtonD = 3,
}

impl LogicalEvent {
    /// All events in bit order.
    pub const ALL: [Self; EVENT_COUNT] = [Self::ButtonA, Self::ButtonB, Self::ButtonC, Self::ButtonD];

    /// Bit position in the aggregator register.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn bits(self) -> EventBits {
        EventBits(1 << self as u32)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// 1-based button number, as printed on the board.
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }
}

/// A set of [`LogicalEvent`]s, one bit each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct EventBits(u32);

impl EventBits {
    pub const EMPTY: Self = Self(0);
    pub const ALL_BUTTONS: Self = Self((1 << EVENT_COUNT) - 1);

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, event: LogicalEvent) -> bool {
        self.0 & event.bits().0 != 0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Number of distinct events present.
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Events present, in bit order.
    pub fn iter(self) -> impl Iterator<Item = LogicalEvent> {
        LogicalEvent::ALL.into_iter().filter(move |e| self.contains(*e))
    }
}

impl From<LogicalEvent> for EventBits {
    fn from(event: LogicalEvent) -> Self {
        event.bits()
    }
}

impl BitOr for EventBits {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<LogicalEvent> for EventBits {
    type Output = Self;

    fn bitor(self, rhs: LogicalEvent) -> Self {
        self | rhs.bits()
    }
}

impl BitOr for LogicalEvent {
    type Output = EventBits;

    fn bitor(self, rhs: Self) -> EventBits {
        self.bits() | rhs.bits()
    }
}

impl BitOrAssign for EventBits {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

// ── Event aggregator ──────────────────────────────────────────

/// OR-combining, auto-clearing signal register with one waiting consumer.
///
/// Multi-waiter semantics are not provided: a second concurrent waiter
/// replaces the first one's waker.
pub struct EventAggregator {
    bits: AtomicU32,
    waiting: AtomicBool,
    waker: AtomicWaker,
}

impl Default for EventAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl EventAggregator {
    pub const fn new() -> Self {
        Self {
            bits: AtomicU32::new(0),
            waiting: AtomicBool::new(false),
            waker: AtomicWaker::new(),
        }
    }

    /// OR the event's bit into the register. ISR-safe.
    ///
    /// Returns `true` if a blocked consumer was woken, i.e. the caller
    /// should request a context switch on interrupt exit.
    pub fn set(&self, event: LogicalEvent) -> bool {
        self.set_bits(event.bits())
    }

    /// OR an arbitrary set of bits into the register. ISR-safe.
    pub fn set_bits(&self, bits: EventBits) -> bool {
        self.bits.fetch_or(bits.0, Ordering::AcqRel);
        if self.waiting.swap(false, Ordering::AcqRel) {
            self.waker.wake();
            true
        } else {
            false
        }
    }

    /// Bits currently pending, without clearing.
    pub fn pending(&self) -> EventBits {
        EventBits(self.bits.load(Ordering::Acquire))
    }

    /// Wait until any bit in `mask` is set.
    ///
    /// Resolves to every bit that was set at the moment of observation.
    /// With `clear_on_exit`, the observed bits inside `mask` are cleared in
    /// the same atomic operation as the read, so a bit set afterwards stays
    /// pending for the next call. Bits outside `mask` are reported but left
    /// pending.
    pub async fn wait_any(&self, mask: EventBits, clear_on_exit: bool) -> EventBits {
        poll_fn(|cx| {
            if let Some(seen) = self.try_take(mask, clear_on_exit) {
                return Poll::Ready(seen);
            }
            self.waker.register(cx.waker());
            self.waiting.store(true, Ordering::Release);
            // Re-check after registering: a set between the first check and
            // the registration would otherwise be missed until the next one.
            match self.try_take(mask, clear_on_exit) {
                Some(seen) => {
                    self.waiting.store(false, Ordering::Release);
                    Poll::Ready(seen)
                }
                None => Poll::Pending,
            }
        })
        .await
    }

    /// Blocking form of [`wait_any`](Self::wait_any) for task threads.
    ///
    /// `timeout = None` waits forever; otherwise `Error::Timeout` is
    /// returned and nothing is cleared.
    pub fn wait_any_blocking(
        &self,
        mask: EventBits,
        clear_on_exit: bool,
        timeout: Option<Duration>,
    ) -> Result<EventBits> {
        let out = block_on(with_timeout(timeout, self.wait_any(mask, clear_on_exit)));
        if out.is_err() {
            self.waiting.store(false, Ordering::Release);
        }
        out
    }

    fn try_take(&self, mask: EventBits, clear: bool) -> Option<EventBits> {
        let seen = if clear {
            // fetch_and leaves non-mask bits untouched and is a no-op when
            // no mask bit is set, so it doubles as the read.
            self.bits.fetch_and(!mask.0, Ordering::AcqRel)
        } else {
            self.bits.load(Ordering::Acquire)
        };
        (seen & mask.0 != 0).then_some(EventBits(seen))
    }
}

// ── Task notification ─────────────────────────────────────────

/// Counting notification: ISRs `give`, one task `take`s.
pub struct Notification {
    count: AtomicU32,
    waiting: AtomicBool,
    waker: AtomicWaker,
}

impl Default for Notification {
    fn default() -> Self {
        Self::new()
    }
}

impl Notification {
    pub const fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
            waiting: AtomicBool::new(false),
            waker: AtomicWaker::new(),
        }
    }

    /// Increment the notification value. ISR-safe.
    /// Returns `true` if the waiting task was woken.
    pub fn give(&self) -> bool {
        // Saturate rather than wrap to zero, which would lose the signal.
        let _ = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| Some(c.saturating_add(1)));
        if self.waiting.swap(false, Ordering::AcqRel) {
            self.waker.wake();
            true
        } else {
            false
        }
    }

    /// Current notification value.
    pub fn value(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }

    /// Wait for a non-zero value and return it.
    ///
    /// `clear = true` resets the value to zero (binary-semaphore style);
    /// `clear = false` decrements it by one (counting-semaphore style).
    pub async fn take(&self, clear: bool) -> u32 {
        poll_fn(|cx| {
            if let Some(v) = self.try_take(clear) {
                return Poll::Ready(v);
            }
            self.waker.register(cx.waker());
            self.waiting.store(true, Ordering::Release);
            match self.try_take(clear) {
                Some(v) => {
                    self.waiting.store(false, Ordering::Release);
                    Poll::Ready(v)
                }
                None => Poll::Pending,
            }
        })
        .await
    }

    /// Blocking form of [`take`](Self::take) for task threads.
    pub fn take_blocking(&self, clear: bool, timeout: Option<Duration>) -> Result<u32> {
        let out = block_on(with_timeout(timeout, self.take(clear)));
        if out.is_err() {
            self.waiting.store(false, Ordering::Release);
        }
        out
    }

    fn try_take(&self, clear: bool) -> Option<u32> {
        if clear {
            let v = self.count.swap(0, Ordering::AcqRel);
            (v != 0).then_some(v)
        } else {
            self.count
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| c.checked_sub(1))
                .ok()
        }
    }
}
