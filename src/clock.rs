//! Frame timing.
//!
//! The viewer owns one [`FrameClock`] and ticks it at the start of every
//! frame. The resulting delta feeds [`Animator::update`](crate::animator::Animator::update).

use std::time::{Duration, Instant};

/// Upper bound on a single frame delta, in seconds
pub const MAX_DELTA: f32 = 0.1;

/// Timing information for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTime {
    /// Seconds since the previous frame, clamped to [`MAX_DELTA`]
    pub delta: f32,
    /// Number of frames ticked before this one
    pub frame_count: u64,
}

/// Stateful timer that produces [`FrameTime`] snapshots
pub struct FrameClock {
    last_tick: Instant,
    frame_count: u64,
    frame_period: Duration,
    // fps sampling, refreshed about once a second
    frames_since_sample: u32,
    last_sample: Instant,
    fps: f64,
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        let now = Instant::now();
        FrameClock {
            last_tick: now,
            frame_count: 0,
            frame_period: Duration::from_secs_f64(1.0 / target_fps.max(1) as f64),
            frames_since_sample: 0,
            last_sample: now,
            fps: 0.0,
        }
    }

    /// Advance by one frame
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let delta = clamp_delta((now - self.last_tick).as_secs_f32());
        let count = self.frame_count;
        self.last_tick = now;
        self.frame_count += 1;

        self.frames_since_sample += 1;
        let since_sample = now.duration_since(self.last_sample);
        if since_sample.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_sample as f64 / since_sample.as_secs_f64();
            self.frames_since_sample = 0;
            self.last_sample = now;
        }

        FrameTime {
            delta,
            frame_count: count,
        }
    }

    /// Frames per second measured over the last sample window
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Time left in the current frame budget
    pub fn remaining(&self) -> Duration {
        self.frame_period.saturating_sub(self.last_tick.elapsed())
    }
}

/// Clamps a raw delta so a stalled frame cannot skip whole moves
pub fn clamp_delta(raw: f32) -> f32 {
    raw.clamp(0.0, MAX_DELTA)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn delta_clamped() {
        assert_eq!(clamp_delta(0.016), 0.016);
        assert_eq!(clamp_delta(3.0), MAX_DELTA);
        assert_eq!(clamp_delta(-1.0), 0.0);
    }

    #[test]
    fn frames_are_counted() {
        let mut clock = FrameClock::new(60);
        assert_eq!(clock.tick().frame_count, 0);
        assert_eq!(clock.tick().frame_count, 1);
        assert!(clock.tick().delta <= MAX_DELTA);
        assert!(clock.remaining() <= Duration::from_secs_f64(1.0 / 60.0));
    }
}
