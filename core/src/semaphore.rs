//! Counting semaphore.
//!
//! A permit counter guarded by a single mutex, with a condition variable to
//! wake blocked callers. Tickets are released when dropped.

use crate::error::{Error, Result};
use crate::parallel::default_workers;
use std::sync::{Condvar, Mutex, MutexGuard};

/// Limits how many threads run a section at once.
#[derive(Debug)]
pub struct Semaphore {
    available: Mutex<usize>,
    freed: Condvar,
    max: usize,
}

/// A held permit. Dropping it returns the permit.
#[derive(Debug)]
#[must_use = "the permit is released as soon as the ticket is dropped"]
pub struct Ticket<'a> {
    semaphore: &'a Semaphore,
}

impl Semaphore {
    /// Create a semaphore with `max` permits, all available.
    pub fn new(max: usize) -> Result<Self> {
        if max == 0 {
            return Err(Error::InvalidPermits);
        }
        Ok(Self {
            available: Mutex::new(max),
            freed: Condvar::new(),
            max,
        })
    }

    /// A semaphore with one permit per available CPU.
    pub fn per_cpu() -> Self {
        let max = default_workers();
        Self {
            available: Mutex::new(max),
            freed: Condvar::new(),
            max,
        }
    }

    /// Block until a permit is free and take it.
    pub fn acquire(&self) -> Ticket<'_> {
        let mut available = self.lock();
        while *available == 0 {
            available = self
                .freed
                .wait(available)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        *available -= 1;
        Ticket { semaphore: self }
    }

    /// Take a permit if one is free right now.
    pub fn try_acquire(&self) -> Option<Ticket<'_>> {
        let mut available = self.lock();
        if *available == 0 {
            return None;
        }
        *available -= 1;
        Some(Ticket { semaphore: self })
    }

    /// Return one permit.
    ///
    /// Releasing more permits than were taken is a no-op: the count never
    /// exceeds `max`.
    pub fn release_one(&self) {
        let mut available = self.lock();
        if *available < self.max {
            *available += 1;
        }
        drop(available);
        self.freed.notify_one();
    }

    /// Number of permits currently held.
    pub fn running(&self) -> usize {
        self.max - *self.lock()
    }

    /// Number of permits currently free.
    pub fn available(&self) -> usize {
        *self.lock()
    }

    /// Total number of permits.
    pub fn max(&self) -> usize {
        self.max
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        // The counter stays consistent even if a holder panicked.
        self.available
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Ticket<'_> {
    /// Give the permit back now.
    pub fn release(self) {}
}

impl Drop for Ticket<'_> {
    fn drop(&mut self) {
        self.semaphore.release_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn zero_permits_rejected() {
        assert_eq!(Semaphore::new(0).unwrap_err(), Error::InvalidPermits);
    }

    #[test]
    fn tickets_are_counted() {
        let sem = Semaphore::new(2).unwrap();
        assert_eq!(sem.running(), 0);

        let a = sem.acquire();
        let b = sem.acquire();
        assert_eq!(sem.running(), 2);
        assert_eq!(sem.available(), 0);
        assert!(sem.try_acquire().is_none());

        a.release();
        assert_eq!(sem.running(), 1);
        drop(b);
        assert_eq!(sem.running(), 0);
        assert_eq!(sem.max(), 2);
    }

    #[test]
    fn per_cpu_has_at_least_one_permit() {
        let sem = Semaphore::per_cpu();
        assert!(sem.max() >= 1);
        assert_eq!(sem.available(), sem.max());
    }

    #[test]
    fn over_release_is_clamped() {
        let sem = Semaphore::new(3).unwrap();
        sem.release_one();
        sem.release_one();
        assert_eq!(sem.available(), 3);
        assert_eq!(sem.running(), 0);
    }

    #[test]
    fn never_exceeds_max_concurrency() {
        let sem = Semaphore::new(3).unwrap();
        let active = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..12 {
                s.spawn(|| {
                    let _ticket = sem.acquire();
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(5));
                    active.fetch_sub(1, Ordering::SeqCst);
                });
            }
        });

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(sem.running(), 0);
    }

    #[test]
    fn blocked_acquire_wakes_on_release() {
        let sem = Semaphore::new(1).unwrap();
        let held = sem.acquire();

        thread::scope(|s| {
            let waiter = s.spawn(|| {
                let _ticket = sem.acquire();
                sem.running()
            });
            thread::sleep(Duration::from_millis(20));
            drop(held);
            assert_eq!(waiter.join().unwrap(), 1);
        });

        assert_eq!(sem.available(), 1);
    }
}
