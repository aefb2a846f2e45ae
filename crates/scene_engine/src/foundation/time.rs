//! Frame timing utilities

use std::time::{Duration, Instant};

/// Monotonic frame clock with an explicit running state
///
/// The clock is created stopped. `start` begins measuring, `tick` reports
/// the delta since the previous tick (or since `start` for the first one),
/// and `stop` freezes the accumulated elapsed time. Ticking a stopped
/// clock reports a zero delta.
pub struct Clock {
    started: Option<Instant>,
    last_tick: Option<Instant>,
    delta_time: f32,
    elapsed: Duration,
    frame_count: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Create a new stopped clock
    pub fn new() -> Self {
        Self {
            started: None,
            last_tick: None,
            delta_time: 0.0,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Start (or restart) the clock
    ///
    /// Restarting resets the tick reference point but keeps accumulated
    /// elapsed time.
    pub fn start(&mut self) {
        let now = Instant::now();
        self.started = Some(now);
        self.last_tick = Some(now);
    }

    /// Stop the clock, accumulating the elapsed time so far
    pub fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed += started.elapsed();
        }
        self.last_tick = None;
    }

    /// Whether the clock is currently running
    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Advance the clock by one frame and return the delta in seconds
    ///
    /// Returns `0.0` if the clock is stopped.
    pub fn tick(&mut self) -> f32 {
        let Some(last) = self.last_tick else {
            return 0.0;
        };
        let now = Instant::now();
        self.delta_time = now.duration_since(last).as_secs_f32();
        self.last_tick = Some(now);
        self.frame_count += 1;
        self.delta_time
    }

    /// Time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Total time the clock has been running
    pub fn elapsed(&self) -> Duration {
        let running = self
            .started
            .map_or(Duration::ZERO, |started| started.elapsed());
        self.elapsed + running
    }

    /// Total running time in seconds
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }

    /// Number of ticks since the clock was created
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock_is_stopped() {
        let clock = Clock::new();
        assert!(!clock.is_running());
        assert_eq!(clock.frame_count(), 0);
    }

    #[test]
    fn test_tick_on_stopped_clock_is_zero() {
        let mut clock = Clock::new();
        assert_eq!(clock.tick(), 0.0);
        assert_eq!(clock.frame_count(), 0);
    }

    #[test]
    fn test_tick_advances_frame_count() {
        let mut clock = Clock::new();
        clock.start();
        clock.tick();
        clock.tick();
        assert_eq!(clock.frame_count(), 2);
        assert!(clock.delta_time() >= 0.0);
    }

    #[test]
    fn test_stop_freezes_elapsed() {
        let mut clock = Clock::new();
        clock.start();
        std::thread::sleep(Duration::from_millis(5));
        clock.stop();
        let frozen = clock.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(clock.elapsed(), frozen);
        assert!(frozen >= Duration::from_millis(5));
    }

    #[test]
    fn test_restart_resumes_ticking() {
        let mut clock = Clock::new();
        clock.start();
        clock.tick();
        clock.stop();
        clock.start();
        clock.tick();
        assert_eq!(clock.frame_count(), 2);
        assert!(clock.is_running());
    }
}
