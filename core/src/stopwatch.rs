//! Elapsed-time measurement.

use std::time::{Duration, Instant};

/// Measures wall-clock time between `start` and the current instant.
///
/// A stopwatch that was never started (or was stopped) reports no elapsed
/// time.
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    started: Option<Instant>,
}

impl Stopwatch {
    /// A stopwatch that has not been started.
    pub fn new() -> Self {
        Self { started: None }
    }

    /// A stopwatch that is already running.
    pub fn start_new() -> Self {
        Self {
            started: Some(Instant::now()),
        }
    }

    /// Start measuring from now.
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Reset the elapsed time to zero and keep running.
    pub fn restart(&mut self) {
        self.start();
    }

    /// Stop and clear the stopwatch.
    pub fn stop(&mut self) {
        self.started = None;
    }

    /// Whether the stopwatch is running.
    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Time since the last start, if running.
    pub fn elapsed(&self) -> Option<Duration> {
        self.started.map(|at| at.elapsed())
    }

    /// Elapsed time as `HHh:MMm:SSs:mmmms`, or an empty string if stopped.
    pub fn elapsed_formatted(&self) -> String {
        self.elapsed().map(format_duration).unwrap_or_default()
    }
}

/// Format a duration as `HHh:MMm:SSs:mmmms`.
///
/// Hours are taken modulo one day.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = (total / 3600) % 24;
    let minutes = (total / 60) % 60;
    let seconds = total % 60;
    format!(
        "{:02}h:{:02}m:{:02}s:{:03}ms",
        hours,
        minutes,
        seconds,
        duration.subsec_millis()
    )
}
