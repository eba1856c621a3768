// src/core/performance/mod.rs

//! Wall-clock timing of named phases (load, build, query).

use std::time::{Duration, Instant};

/// Records how long each named phase of a run took.
#[derive(Debug, Clone)]
pub struct PhaseTimer {
    start_time: Instant,
    phases: Vec<(String, Duration)>,
}

impl PhaseTimer {
    pub fn start() -> Self {
        Self { start_time: Instant::now(), phases: Vec::new() }
    }

    /// Runs `operation` and records its duration under `name`.
    pub fn time<T>(&mut self, name: &str, operation: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let result = operation();
        self.record(name, started.elapsed());
        result
    }

    /// Adds `duration` to the phase called `name`.
    pub fn record(&mut self, name: &str, duration: Duration) {
        match self.phases.iter_mut().find(|(phase, _)| phase == name) {
            Some((_, total)) => *total += duration,
            None => self.phases.push((name.to_string(), duration)),
        }
    }

    /// Duration of a recorded phase, if it ran.
    pub fn phase(&self, name: &str) -> Option<Duration> {
        self.phases.iter().find(|(phase, _)| phase == name).map(|(_, d)| *d)
    }

    pub fn phases(&self) -> &[(String, Duration)] {
        &self.phases
    }

    /// Time since the timer started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Milliseconds with sub-millisecond precision, for reports.
pub fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
