//! Interval ticker: deliver a message once per frame for a bounded number of frames.

use std::time::Duration;

/// Runs for `times` frames after an optional delay, yielding its message on each.
///
/// The message is the ticker's callback: the owner routes it into its own
/// transition function, so the ticker never holds a reference back into the
/// owner. Starting while running is a no-op; call [`IntervalTicker::stop`] first.
/// After the last frame the ticker resets itself and can be started again.
#[derive(Debug, Clone)]
pub struct IntervalTicker<M> {
    remaining: u32,
    delay: Duration,
    message: Option<M>,
    paused: bool,
}

impl<M: Clone> IntervalTicker<M> {
    pub fn new() -> Self {
        Self {
            remaining: 0,
            delay: Duration::ZERO,
            message: None,
            paused: false,
        }
    }

    /// Schedule `message` for the next `times` frames, after `delay`.
    ///
    /// Returns false if the ticker was already running or `times` is zero.
    pub fn start(&mut self, times: u32, delay: Duration, message: M) -> bool {
        if times == 0 || self.is_running() {
            return false;
        }
        self.remaining = times;
        self.delay = delay;
        self.message = Some(message);
        self.paused = false;
        true
    }

    /// Cancel outstanding frames. Idempotent.
    pub fn stop(&mut self) {
        self.remaining = 0;
        self.delay = Duration::ZERO;
        self.message = None;
        self.paused = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_running(&self) -> bool {
        self.message.is_some()
    }

    /// Frames left before the ticker finishes.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Advance one frame, returning the message if it fires on this frame.
    pub fn advance(&mut self, dt: Duration) -> Option<M> {
        if self.paused || !self.is_running() {
            return None;
        }
        if !self.delay.is_zero() {
            if dt < self.delay {
                self.delay -= dt;
                return None;
            }
            self.delay = Duration::ZERO;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            return self.message.take();
        }
        self.message.clone()
    }
}

impl<M: Clone> Default for IntervalTicker<M> {
    fn default() -> Self {
        Self::new()
    }
}
