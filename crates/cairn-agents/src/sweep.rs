// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The coarse clock that ages the cache.

use crate::coordinator::LoadCoordinator;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Accumulates elapsed time and sweeps the cache once per interval.
///
/// Precision is coarse: whenever the accumulated time reaches
/// the interval the accumulator restarts from zero, so any overshoot is
/// discarded rather than carried over.
#[derive(Debug, Clone)]
pub struct SweepTicker {
    interval: Duration,
    accumulated: Duration,
    sweeps: u64,
}

impl SweepTicker {
    /// The interval lifetimes are expressed in.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    /// The shortest interval a ticker accepts.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

    /// Creates a ticker that sweeps once per `interval`.
    ///
    /// Intervals shorter than [`SweepTicker::MIN_INTERVAL`] are raised to it.
    pub fn new(interval: Duration) -> Self {
        if interval < Self::MIN_INTERVAL {
            log::warn!(
                "Sweep interval {interval:?} is too short, using {:?}",
                Self::MIN_INTERVAL
            );
        }
        Self {
            interval: interval.max(Self::MIN_INTERVAL),
            accumulated: Duration::ZERO,
            sweeps: 0,
        }
    }

    /// Should be called periodically (e.g., once per frame) with the time
    /// elapsed since the previous call.
    ///
    /// Returns `true` if this call swept the cache.
    pub fn update(&mut self, delta: Duration, coordinator: &LoadCoordinator) -> bool {
        self.accumulated += delta;
        if self.accumulated < self.interval {
            return false;
        }

        self.accumulated = Duration::ZERO;
        self.sweeps += 1;

        let evicted = coordinator.sweep();
        if !evicted.is_empty() {
            log::debug!("Sweep #{} evicted {} asset(s)", self.sweeps, evicted.len());
        }
        true
    }

    /// Number of sweeps performed so far.
    pub fn sweeps(&self) -> u64 {
        self.sweeps
    }

    /// The sweep interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Drives the ticker from a timer on the coordinator's runtime.
    ///
    /// The task runs until the returned handle is aborted.
    pub fn spawn(mut self, coordinator: LoadCoordinator) -> JoinHandle<()> {
        let runtime = coordinator.runtime().clone();
        runtime.spawn(async move {
            let mut timer = tokio::time::interval(self.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut last = timer.tick().await;
            loop {
                let now = timer.tick().await;
                self.update(now - last, &coordinator);
                last = now;
            }
        })
    }
}

impl Default for SweepTicker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}
