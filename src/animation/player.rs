use crate::animation::clip::AnimationClip;

/// Accumulates wall-clock time into clip ticks for single-clip forward playback.
///
/// The evaluator itself never wraps; the player keeps its time inside
/// `[0, duration)` before every evaluation.
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    time: f32,
    speed: f32,
    pub paused: bool,
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            time: 0.0,
            speed: 1.0,
            paused: false,
        }
    }

    /// Current animation time in ticks.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Sets the playback rate multiplier. Negative rates are clamped to zero.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// Jumps to `ticks`, wrapped into the clip.
    pub fn seek(&mut self, ticks: f32, clip: &AnimationClip) {
        self.time = wrap_time(ticks.max(0.0), clip.duration);
    }

    /// Advances by `elapsed_seconds` of wall-clock time.
    pub fn advance(&mut self, elapsed_seconds: f32, clip: &AnimationClip) {
        if self.paused {
            return;
        }
        let step = clip.seconds_to_ticks(elapsed_seconds) * self.speed;
        self.time = wrap_time(self.time + step, clip.duration);
    }
}

/// Brings `time` back into `[0, duration)`.
///
/// A time that overshoots by less than one duration has the duration
/// subtracted once; larger overshoots fall back to the remainder. Clips with
/// no length pin the time to zero.
#[must_use]
pub fn wrap_time(time: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 0.0;
    }
    let mut time = time;
    if time >= duration {
        time -= duration;
        if time >= duration {
            time %= duration;
        }
    }
    time
}
