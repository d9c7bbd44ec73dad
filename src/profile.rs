use std::time::{Duration, Instant};

use log::info;

/// Wall-clock timings per pipeline phase, logged at `info` when enabled.
#[derive(Debug)]
pub struct Phases {
    enabled: bool,
    start: Instant,
    last: Instant,
    laps: Vec<(&'static str, Duration)>,
}

impl Phases {
    pub fn new(enabled: bool) -> Self {
        let now = Instant::now();
        Self {
            enabled,
            start: now,
            last: now,
            laps: Vec::new(),
        }
    }

    /// Closes the phase that began at the previous lap.
    pub fn lap(&mut self, phase: &'static str) {
        if !self.enabled {
            return;
        }
        let now = Instant::now();
        self.laps.push((phase, now - self.last));
        self.last = now;
    }

    pub fn laps(&self) -> &[(&'static str, Duration)] {
        &self.laps
    }

    pub fn report(&self) {
        if !self.enabled {
            return;
        }
        for (phase, took) in &self.laps {
            info!("{phase:<10} {took:?}");
        }
        info!("{:<10} {:?}", "total", self.last - self.start);
    }
}
