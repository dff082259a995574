//! Frame timing for the event loop

use std::time::Instant;

/// Frame counter with elapsed time, updated once per rendered frame
pub struct Timer {
    started: Instant,
    last_frame: Instant,
    delta_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_frame: now,
            delta_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Time between the last two updates in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Seconds since the timer was created
    pub fn total_time(&self) -> f32 {
        self.last_frame.duration_since(self.started).as_secs_f32()
    }

    /// Number of completed frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per second since creation, 0 before any time has passed
    pub fn average_fps(&self) -> f32 {
        Self::fps(self.frame_count, self.total_time())
    }

    fn fps(frames: u64, seconds: f32) -> f32 {
        if seconds > 0.0 {
            frames as f32 / seconds
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_timer_is_idle() {
        let timer = Timer::new();
        assert_eq!(timer.frame_count(), 0);
        assert_relative_eq!(timer.delta_time(), 0.0);
        assert_relative_eq!(timer.average_fps(), 0.0);
    }

    #[test]
    fn test_update_counts_frames() {
        let mut timer = Timer::new();
        timer.update();
        timer.update();
        timer.update();
        assert_eq!(timer.frame_count(), 3);
        assert!(timer.delta_time() >= 0.0);
    }

    #[test]
    fn test_fps_math() {
        assert_relative_eq!(Timer::fps(120, 2.0), 60.0);
        assert_relative_eq!(Timer::fps(10, 0.0), 0.0);
    }
}
