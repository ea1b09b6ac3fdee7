//! UI lock
//!
//! The exclusive lock around the UI document. Every actor that touches the
//! render engine (the render loop, the engine clock, input dispatch) goes
//! through it. The guard releases on drop, so early returns and error paths
//! inside a render step cannot leak the lock.
//!
//! The lock provides mutual exclusion only. It makes no fairness or priority
//! guarantee: a higher-priority actor that keeps re-taking the lock can
//! starve the render loop.

use core::ops::{Deref, DerefMut};

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use portable_atomic::{AtomicBool, AtomicU32, Ordering};

use crate::traits::TaskClock;

/// Instrumented exclusive lock for the UI document
pub struct UiLock<T> {
    inner: Mutex<CriticalSectionRawMutex, T>,
    held: AtomicBool,
    acquisitions: AtomicU32,
}

impl<T> UiLock<T> {
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
            held: AtomicBool::new(false),
            acquisitions: AtomicU32::new(0),
        }
    }

    /// Wait for the lock without bound
    pub async fn lock(&self) -> UiGuard<'_, T> {
        let guard = self.inner.lock().await;
        self.enter(guard)
    }

    /// Wait for the lock for at most `timeout_ms`
    ///
    /// Returns `None` when the timeout elapsed first.
    pub async fn lock_within<C: TaskClock>(&self, clock: &C, timeout_ms: u32) -> Option<UiGuard<'_, T>> {
        match select(self.inner.lock(), clock.sleep_ms(timeout_ms)).await {
            Either::First(guard) => Some(self.enter(guard)),
            Either::Second(()) => None,
        }
    }

    /// Take the lock only if it is free right now
    pub fn try_lock(&self) -> Option<UiGuard<'_, T>> {
        self.inner.try_lock().ok().map(|guard| self.enter(guard))
    }

    /// Whether some actor currently holds the lock
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    /// Successful acquisitions since creation
    pub fn acquisitions(&self) -> u32 {
        self.acquisitions.load(Ordering::Relaxed)
    }

    /// Consume the lock and return the protected value
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }

    fn enter<'a>(&'a self, guard: MutexGuard<'a, CriticalSectionRawMutex, T>) -> UiGuard<'a, T> {
        self.held.store(true, Ordering::Release);
        self.acquisitions.fetch_add(1, Ordering::Relaxed);
        UiGuard {
            guard,
            held: &self.held,
        }
    }
}

/// Scoped access to the UI document
///
/// The lock is released when the guard is dropped.
pub struct UiGuard<'a, T> {
    guard: MutexGuard<'a, CriticalSectionRawMutex, T>,
    held: &'a AtomicBool,
}

impl<T> Deref for UiGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for UiGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<T> Drop for UiGuard<'_, T> {
    fn drop(&mut self) {
        // Cleared before the inner guard unlocks
        self.held.store(false, Ordering::Release);
    }
}
