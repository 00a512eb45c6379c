//! Wall-clock tracking for the frame loop.
//!
//! `Time` is the clock the frame driver reads timestamps from. It also keeps
//! a frame counter and a periodically sampled FPS figure for the window title.
//!
//! ```ignore
//! let mut time = Time::new();
//!
//! // Once per frame:
//! let now = time.update();
//! let dt = state.tick(now);
//! ```

use std::time::{Duration, Instant};

/// How often the FPS figure is recomputed.
const FPS_SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

/// Frame clock.
#[derive(Debug)]
pub struct Time {
    /// When the clock was created.
    start: Instant,
    /// Seconds since `start` as of the last `update`.
    elapsed_secs: f32,
    /// Frames since start.
    frame_count: u64,
    /// Last sampled frames per second.
    fps: f32,
    /// Frame count at the last FPS sample.
    fps_frame_count: u64,
    /// When FPS was last sampled.
    fps_sample_time: Instant,
}

impl Time {
    /// Start a clock at zero.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            elapsed_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_sample_time: now,
        }
    }

    /// Advance one frame. Returns seconds elapsed since the clock started.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        self.elapsed_secs = now.duration_since(self.start).as_secs_f32();
        self.frame_count += 1;

        let since_sample = now.duration_since(self.fps_sample_time);
        if since_sample >= FPS_SAMPLE_INTERVAL {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / since_sample.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_sample_time = now;
        }

        self.elapsed_secs
    }

    /// Seconds since start, as of the last `update`.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Last sampled frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.elapsed(), 0.0);
        assert_eq!(time.fps(), 0.0);
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let elapsed = time.update();

        assert!(elapsed > 0.0);
        assert_eq!(time.elapsed(), elapsed);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_fps_sampled_after_interval() {
        let mut time = Time::new();
        time.update();
        thread::sleep(FPS_SAMPLE_INTERVAL + Duration::from_millis(20));
        time.update();

        assert!(time.fps() > 0.0);
    }
}
