// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform-specific time types.
//!
//! Record timestamps use [`SystemTime`], which comes from `std::time` on native
//! targets and from `web_time` on wasm32, where `std::time::SystemTime::now` panics.

#[cfg(not(target_arch = "wasm32"))]
pub use std::time::{SystemTime, UNIX_EPOCH};
#[cfg(target_arch = "wasm32")]
pub use web_time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
pub(crate) fn millis_since_epoch(time: SystemTime) -> u128 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
