//! Two-phase measurement: request layout, wait for it to settle, then measure.

use std::time::Duration;

use serde::Deserialize;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use super::ticker::IntervalTicker;
use crate::host::{Layout, NodeId};

/// Frames awaited when the host cannot signal a completed layout pass.
pub const DEFAULT_SETTLE_FRAMES: u32 = 2;

/// How an overlay waits for layout before measuring its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SettleStrategy {
    #[default]
    /// Wait for the host's layout-complete signal, or fall back to
    /// [`DEFAULT_SETTLE_FRAMES`] when the host offers none.
    LayoutPass,
    /// Always re-measure on each of `count` frames.
    Frames { count: u32 },
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Awaiting(oneshot::Receiver<()>),
    Counting(IntervalTicker<()>),
}

/// Per-overlay settle tracker.
#[derive(Debug)]
pub struct LayoutSettle {
    strategy: SettleStrategy,
    phase: Phase,
    paused: bool,
}

impl LayoutSettle {
    pub fn new(strategy: SettleStrategy) -> Self {
        Self {
            strategy,
            phase: Phase::Idle,
            paused: false,
        }
    }

    /// Start waiting for `node` to settle, replacing any previous wait.
    pub fn begin<L: Layout + ?Sized>(&mut self, node: NodeId, layout: &mut L) {
        self.cancel();
        let frames = match self.strategy {
            SettleStrategy::LayoutPass => match layout.request_layout(node) {
                Some(rx) => {
                    self.phase = Phase::Awaiting(rx);
                    return;
                }
                None => DEFAULT_SETTLE_FRAMES,
            },
            SettleStrategy::Frames { count } => count,
        };
        let mut ticker = IntervalTicker::new();
        if ticker.start(frames, Duration::ZERO, ()) {
            self.phase = Phase::Counting(ticker);
        }
    }

    /// Abandon the current wait. Idempotent.
    pub fn cancel(&mut self) {
        if let Phase::Counting(ticker) = &mut self.phase {
            ticker.stop();
        }
        self.phase = Phase::Idle;
    }

    pub fn pause(&mut self) {
        self.paused = true;
        if let Phase::Counting(ticker) = &mut self.phase {
            ticker.pause();
        }
    }

    pub fn resume(&mut self) {
        self.paused = false;
        if let Phase::Counting(ticker) = &mut self.phase {
            ticker.resume();
        }
    }

    pub fn is_pending(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Advance one frame. Returns true when the owner should measure now.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.paused {
            return false;
        }
        match &mut self.phase {
            Phase::Idle => false,
            Phase::Awaiting(rx) => match rx.try_recv() {
                Ok(()) => {
                    self.phase = Phase::Idle;
                    true
                }
                Err(TryRecvError::Empty) => false,
                Err(TryRecvError::Closed) => {
                    log::debug!("layout pass abandoned before completion");
                    self.phase = Phase::Idle;
                    false
                }
            },
            Phase::Counting(ticker) => {
                let fired = ticker.advance(dt).is_some();
                if !ticker.is_running() {
                    self.phase = Phase::Idle;
                }
                fired
            }
        }
    }
}
