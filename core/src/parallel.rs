//! Parallel loop helpers built on scoped threads.
//!
//! Every function returns only after all of its worker threads finished, so
//! closures may borrow from the caller's stack. The number of threads is
//! fixed by the worker count, never by the amount of input.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;

/// Boxed task for [`execute_parallel`].
pub type Task<'a> = Box<dyn FnOnce() + Send + 'a>;

/// Shared stop flag handed to loop bodies.
#[derive(Debug, Default)]
pub struct LoopState {
    stopped: AtomicBool,
}

impl LoopState {
    /// Ask every worker to stop after its current iteration.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Whether the loop has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Number of workers used by [`parallel_while`].
pub fn default_workers() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

/// Run `body` in parallel for as long as `condition` holds.
///
/// Each worker checks `condition` before every iteration; the loop ends once
/// any worker sees `false`. Iterations already running are allowed to
/// finish.
pub fn parallel_while<C, B>(condition: C, body: B)
where
    C: Fn() -> bool + Sync,
    B: Fn() + Sync,
{
    parallel_while_with(default_workers(), condition, |_| body());
}

/// [`parallel_while`] with an explicit worker count and a stoppable body.
///
/// A `workers` value of 0 runs a single worker.
pub fn parallel_while_with<C, B>(workers: usize, condition: C, body: B)
where
    C: Fn() -> bool + Sync,
    B: Fn(&LoopState) + Sync,
{
    let state = LoopState::default();

    thread::scope(|s| {
        for _ in 0..workers.max(1) {
            s.spawn(|| {
                while !state.is_stopped() {
                    if !condition() {
                        state.stop();
                        break;
                    }
                    body(&state);
                }
            });
        }
    });
}

/// Apply `f` to every item on up to `workers` threads.
///
/// Workers claim the next unprocessed index until none are left. Results
/// come back in input order. A `workers` value of 0 runs a single worker.
pub fn parallel_map_with<T, R, F>(workers: usize, items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    if items.is_empty() {
        return Vec::new();
    }

    let next = AtomicUsize::new(0);
    let slots: Vec<Mutex<Option<R>>> = items.iter().map(|_| Mutex::new(None)).collect();

    thread::scope(|s| {
        for _ in 0..workers.clamp(1, items.len()) {
            s.spawn(|| loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                let Some(item) = items.get(index) else {
                    break;
                };
                let value = f(item);
                *slots[index].lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
            });
        }
    });

    slots
        .into_iter()
        .filter_map(|slot| slot.into_inner().unwrap_or_else(PoisonError::into_inner))
        .collect()
}

/// [`parallel_map_with`] on one worker per available CPU.
pub fn parallel_map<T, R, F>(items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    parallel_map_with(default_workers(), items, f)
}

/// Run every task on up to `workers` threads and wait for all of them.
///
/// A panicking task is propagated to the caller once the others finished.
pub fn execute_parallel_with(workers: usize, tasks: Vec<Task<'_>>) {
    let queue: Vec<Mutex<Option<Task<'_>>>> =
        tasks.into_iter().map(|task| Mutex::new(Some(task))).collect();

    parallel_map_with(workers, &queue, |slot| {
        let task = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(task) = task {
            task();
        }
    });
}

/// [`execute_parallel_with`] on one worker per available CPU.
pub fn execute_parallel(tasks: Vec<Task<'_>>) {
    execute_parallel_with(default_workers(), tasks);
}
