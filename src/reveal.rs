//! Reveal gate - delays showing freshly loaded rows
//!
//! Rows staged by a load are held back until a short deadline passes, and
//! the table draws skeleton rows meanwhile. Each staging bumps a generation
//! counter; only the newest staging can ever be revealed, so a slow earlier
//! refresh never overwrites a later one.

use std::time::{Duration, Instant};

/// Delay before the first dataset is shown
pub const START_DELAY: Duration = Duration::from_millis(500);
/// Delay after an explicit refresh
pub const REFRESH_DELAY: Duration = Duration::from_millis(400);

#[derive(Debug)]
struct Staged<T> {
    generation: u64,
    deadline: Instant,
    payload: T,
}

#[derive(Debug)]
pub struct RevealGate<T> {
    generation: u64,
    staged: Option<Staged<T>>,
}

impl<T> Default for RevealGate<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            staged: None,
        }
    }
}

impl<T> RevealGate<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `payload` for reveal after `delay`, superseding anything staged
    ///
    /// Returns the generation of this staging.
    pub fn arm(&mut self, payload: T, delay: Duration, now: Instant) -> u64 {
        self.generation += 1;
        self.staged = Some(Staged {
            generation: self.generation,
            deadline: now + delay,
            payload,
        });
        self.generation
    }

    /// Something is staged and not yet revealed
    pub fn is_armed(&self) -> bool {
        self.staged.is_some()
    }

    /// Release the payload of `generation` once its deadline has passed
    ///
    /// A superseded generation never releases anything.
    pub fn reveal(&mut self, generation: u64, now: Instant) -> Option<T> {
        let ready = self
            .staged
            .as_ref()
            .is_some_and(|s| s.generation == generation && now >= s.deadline);
        if !ready {
            return None;
        }
        self.staged.take().map(|s| s.payload)
    }

    /// Release the newest staging if it is due
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        self.reveal(self.generation, now)
    }
}
