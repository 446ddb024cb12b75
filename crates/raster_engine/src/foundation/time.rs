//! Time management utilities

use std::time::Instant;

/// Frame clock for the render loop
///
/// Tracks per-frame delta time and running averages. Call [`FrameClock::tick`]
/// exactly once per frame, after the frame's work has completed.
pub struct FrameClock {
    last_tick: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a new clock starting at zero elapsed time
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance the clock by one frame and return the frame's delta time
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_tick).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_tick = now;
        self.frame_count += 1;
        self.delta_time
    }

    /// Time since the previous tick in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Total elapsed time across all ticks in seconds
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of ticks so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per second since the clock was created
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }

    /// Average milliseconds spent per frame since the clock was created
    pub fn average_frame_millis(&self) -> f32 {
        if self.frame_count > 0 {
            self.total_time * 1000.0 / self.frame_count as f32
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_accumulates() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.frame_count(), 0);

        std::thread::sleep(std::time::Duration::from_millis(2));
        let delta = clock.tick();

        assert!(delta > 0.0);
        assert_eq!(clock.frame_count(), 1);
        assert!(clock.total_time() >= delta);
    }

    #[test]
    fn test_fresh_clock_reports_zero_rates() {
        let clock = FrameClock::new();
        assert_eq!(clock.average_fps(), 0.0);
        assert_eq!(clock.average_frame_millis(), 0.0);
    }
}
