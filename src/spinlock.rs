// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
A reader/writer spinlock.

Logger caches are read on every lookup and written once per name, and the
wasm main thread can't block on a mutex, so we spin instead.  Critical sections
must stay short: clone an `Arc`, insert an entry, nothing that logs.
*/

use std::cell::UnsafeCell;
use std::fmt::Debug;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};

const UNLOCKED: u8 = 0;
//up to 254 readers, or 1 writer (val = 255)
const LOCKED_WRITE: u8 = u8::MAX;

pub(crate) struct Spinlock<T> {
    data: UnsafeCell<T>,
    locked: AtomicU8,
}

unsafe impl<T: Send> Send for Spinlock<T> {}
unsafe impl<T: Send + Sync> Sync for Spinlock<T> {}

impl<T> Spinlock<T> {
    pub(crate) const fn new(data: T) -> Self {
        Spinlock {
            data: UnsafeCell::new(data),
            locked: AtomicU8::new(UNLOCKED),
        }
    }

    fn lock_write(&self) {
        while self
            .locked
            .compare_exchange_weak(UNLOCKED, LOCKED_WRITE, Acquire, Relaxed)
            .is_err()
        {
            std::hint::spin_loop();
        }
    }

    fn lock_read(&self) {
        while self
            .locked
            .fetch_update(Acquire, Relaxed, |v| {
                if v < (LOCKED_WRITE - 1) {
                    Some(v + 1)
                } else {
                    None
                }
            })
            .is_err()
        {
            std::hint::spin_loop();
        }
    }

    /// Runs `f` with exclusive access.
    pub(crate) fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        self.lock_write();
        let _release = Unlock(&self.locked, ReleaseKind::Write);
        // SAFETY: the write lock excludes every other reader and writer
        unsafe { f(&mut *self.data.get()) }
    }

    /// Runs `f` with shared access.
    pub(crate) fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.lock_read();
        let _release = Unlock(&self.locked, ReleaseKind::Read);
        // SAFETY: readers hold a count that keeps writers out
        unsafe { f(&*self.data.get()) }
    }
}

enum ReleaseKind {
    Read,
    Write,
}

/// Drops the lock even if the closure panics, so a panicking sink can't wedge a cache.
struct Unlock<'a>(&'a AtomicU8, ReleaseKind);

impl Drop for Unlock<'_> {
    fn drop(&mut self) {
        match self.1 {
            ReleaseKind::Read => {
                self.0.fetch_sub(1, Release);
            }
            ReleaseKind::Write => self.0.store(UNLOCKED, Release),
        }
    }
}

impl<T: Debug> Debug for Spinlock<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.with(|data| f.debug_tuple("Spinlock").field(data).finish())
    }
}

impl<T: Default> Default for Spinlock<T> {
    fn default() -> Self {
        Spinlock::new(T::default())
    }
}
