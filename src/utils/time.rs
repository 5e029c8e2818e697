use std::time::{Duration, Instant};

/// Frame clock feeding the animation player and the camera.
///
/// Also averages the frame rate over one-second windows.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    start_time: Instant,
    last_update: Instant,
    /// Time since last tick
    pub delta: Duration,
    /// Total elapsed time since creation
    pub elapsed: Duration,
    pub frame_count: u64,
    window_frames: u32,
    window_time: Duration,
    fps: f32,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    #[must_use]
    pub fn starting_at(now: Instant) -> Self {
        Self {
            start_time: now,
            last_update: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            window_frames: 0,
            window_time: Duration::ZERO,
            fps: 0.0,
        }
    }

    /// Marks the start of a new frame and returns the elapsed seconds.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// [`tick`](Self::tick) with an explicit clock reading.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        self.delta = now.saturating_duration_since(self.last_update);
        self.elapsed = now.saturating_duration_since(self.start_time);
        self.last_update = now;
        self.frame_count += 1;

        self.window_frames += 1;
        self.window_time += self.delta;
        if self.window_time >= Duration::from_secs(1) {
            self.fps = self.window_frames as f32 / self.window_time.as_secs_f32();
            self.window_frames = 0;
            self.window_time = Duration::ZERO;
        }

        self.dt_seconds()
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Frames per second over the last complete one-second window.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}
