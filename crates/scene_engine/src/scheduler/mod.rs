//! Frame scheduling port
//!
//! The orchestrator never talks to a display loop directly. It arms the
//! next frame through a [`FrameScheduler`], polls for the armed frame to
//! fire, and cancels the armed frame on disposal. Production code uses the
//! wall-clock [`IntervalScheduler`]; tests drive a [`ManualScheduler`] so
//! the whole update protocol runs deterministically.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Opaque handle to an armed next-frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(u64);

/// Scheduler shared between the orchestrator and the host loop
pub type SharedScheduler = Arc<Mutex<dyn FrameScheduler + Send>>;

/// Port for a cancelable recurring frame tick
pub trait FrameScheduler {
    /// Arm the next frame, returning its handle
    fn schedule(&mut self) -> FrameHandle;

    /// Cancel an armed frame if it has not fired yet
    fn cancel(&mut self, handle: FrameHandle);

    /// Consume the armed frame once it is due
    ///
    /// Returns the fired handle at most once per armed frame; `None` when
    /// nothing is armed or the frame is not due yet. Implementations may
    /// block until the frame is due.
    fn poll(&mut self) -> Option<FrameHandle>;
}

/// Wall-clock scheduler targeting a fixed frame rate
///
/// `poll` sleeps out the remainder of the frame budget, so driving it in a
/// loop yields a steady tick at the target rate.
pub struct IntervalScheduler {
    frame_budget: Duration,
    armed: Option<FrameHandle>,
    due_at: Instant,
    next_id: u64,
}

impl IntervalScheduler {
    /// Create a scheduler targeting `fps` frames per second
    ///
    /// # Panics
    /// Panics if `fps` is zero.
    pub fn new(fps: u32) -> Self {
        assert!(fps > 0, "target fps cannot be zero");
        Self {
            frame_budget: Duration::from_secs(1) / fps,
            armed: None,
            due_at: Instant::now(),
            next_id: 0,
        }
    }
}

impl FrameScheduler for IntervalScheduler {
    fn schedule(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.armed = Some(handle);
        self.due_at = Instant::now() + self.frame_budget;
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if self.armed == Some(handle) {
            self.armed = None;
            log::debug!("Frame {:?} canceled", handle);
        }
    }

    fn poll(&mut self) -> Option<FrameHandle> {
        let handle = self.armed?;
        let now = Instant::now();
        if now < self.due_at {
            std::thread::sleep(self.due_at - now);
        }
        self.armed = None;
        Some(handle)
    }
}

/// Deterministic scheduler advanced by hand
///
/// Nothing fires until [`ManualScheduler::advance`] is called; each call
/// makes the currently armed frame (if any) due for the next `poll`.
#[derive(Default)]
pub struct ManualScheduler {
    armed: Option<FrameHandle>,
    due: Option<FrameHandle>,
    next_id: u64,
}

impl ManualScheduler {
    /// Create a scheduler with nothing armed
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the armed frame as due, simulating one host tick
    ///
    /// Returns `true` if a frame became due.
    pub fn advance(&mut self) -> bool {
        match self.armed.take() {
            Some(handle) => {
                self.due = Some(handle);
                true
            }
            None => false,
        }
    }

    /// Whether a frame is currently armed
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.armed = Some(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if self.armed == Some(handle) {
            self.armed = None;
        }
        if self.due == Some(handle) {
            self.due = None;
        }
    }

    fn poll(&mut self) -> Option<FrameHandle> {
        self.due.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_poll_without_advance_is_none() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule();
        assert_eq!(scheduler.poll(), None);
    }

    #[test]
    fn test_manual_fires_armed_frame_once() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule();
        assert!(scheduler.advance());
        assert_eq!(scheduler.poll(), Some(handle));
        assert_eq!(scheduler.poll(), None);
    }

    #[test]
    fn test_manual_advance_without_armed_frame() {
        let mut scheduler = ManualScheduler::new();
        assert!(!scheduler.advance());
        assert_eq!(scheduler.poll(), None);
    }

    #[test]
    fn test_manual_cancel_prevents_firing() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule();
        scheduler.cancel(handle);
        assert!(!scheduler.advance());
        assert_eq!(scheduler.poll(), None);
    }

    #[test]
    fn test_manual_cancel_of_due_frame() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule();
        scheduler.advance();
        scheduler.cancel(handle);
        assert_eq!(scheduler.poll(), None);
    }

    #[test]
    fn test_manual_handles_are_unique() {
        let mut scheduler = ManualScheduler::new();
        let first = scheduler.schedule();
        scheduler.advance();
        scheduler.poll();
        let second = scheduler.schedule();
        assert_ne!(first, second);
    }

    #[test]
    fn test_interval_poll_fires_armed_frame() {
        let mut scheduler = IntervalScheduler::new(1_000);
        let handle = scheduler.schedule();
        assert_eq!(scheduler.poll(), Some(handle));
        assert_eq!(scheduler.poll(), None);
    }

    #[test]
    fn test_interval_cancel_prevents_firing() {
        let mut scheduler = IntervalScheduler::new(1_000);
        let handle = scheduler.schedule();
        scheduler.cancel(handle);
        assert_eq!(scheduler.poll(), None);
    }

    #[test]
    fn test_interval_respects_frame_budget() {
        let mut scheduler = IntervalScheduler::new(100);
        scheduler.schedule();
        let start = Instant::now();
        scheduler.poll();
        assert!(start.elapsed() >= Duration::from_millis(9));
    }
}
