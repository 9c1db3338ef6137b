//! Blocking bridge between task threads and the async sync primitives.
//!
//! The aggregator, notification and sample channel are written as futures
//! so that their wakers can be fired from interrupt context. Each task thread
//! drives them to completion with [`block_on`]:
//!
//! - **`target_os = "espidf"`**: `esp_idf_hal::task::block_on`, whose waker
//!   is a FreeRTOS task notification (safe to wake from an ISR).
//! - **host**: `futures_lite::future::block_on` (thread park/unpark).
//!
//! Finite waits race the future against an `async-io-mini` reactor timer.

use core::future::Future;
use core::time::Duration;

use crate::error::{Error, Result};

/// Run `fut` to completion on the calling task.
#[cfg(target_os = "espidf")]
pub fn block_on<F: Future>(fut: F) -> F::Output {
    esp_idf_svc::hal::task::block_on(fut)
}

/// Run `fut` to completion on the calling thread.
#[cfg(not(target_os = "espidf"))]
pub fn block_on<F: Future>(fut: F) -> F::Output {
    futures_lite::future::block_on(fut)
}

/// Await `fut`, giving up after `timeout`. `None` waits forever.
pub async fn with_timeout<F: Future>(timeout: Option<Duration>, fut: F) -> Result<F::Output> {
    match timeout {
        None => Ok(fut.await),
        Some(limit) => {
            futures_lite::future::or(async { Ok(fut.await) }, async {
                async_io_mini::Timer::after(limit).await;
                Err(Error::Timeout)
            })
            .await
        }
    }
}

/// Convert an optional millisecond setting into a wait limit.
pub fn timeout_from_ms(ms: Option<u32>) -> Option<Duration> {
    ms.map(|ms| Duration::from_millis(ms as u64))
}
