use crate::animation::values::Interpolatable;

/// Keyframe spacing below which two samples are treated as coincident.
pub const KEYFRAME_EPSILON: f32 = 1e-6;

/// Timed samples for one animation channel of one skeleton node.
///
/// A track always holds at least one sample; a channel without samples is
/// represented by the absence of a track. Times are in clip ticks and never
/// decrease.
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    times: Vec<f32>,
    values: Vec<T>,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    /// Builds a track from parallel time and value arrays.
    ///
    /// # Panics
    /// If the arrays are empty or of different lengths.
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>) -> Self {
        assert!(!times.is_empty(), "Track is empty");
        assert_eq!(times.len(), values.len(), "Track times/values length mismatch");
        Self { times, values }
    }

    /// Builds a track from `(time, value)` keys, or `None` when there are no keys.
    pub fn from_keys<I>(keys: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f32, T)>,
    {
        let (times, values): (Vec<f32>, Vec<T>) = keys.into_iter().unzip();
        if times.is_empty() {
            return None;
        }
        Some(Self { times, values })
    }

    #[inline]
    #[must_use]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the last sample.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times[self.times.len() - 1]
    }

    /// Checks that every time is finite and that times never decrease.
    ///
    /// Returns a description of the first violation.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(i) = self.times.iter().position(|t| !t.is_finite()) {
            return Err(format!("key {i} has non-finite time {}", self.times[i]));
        }
        if let Some(i) = self.times.windows(2).position(|w| w[1] < w[0]) {
            return Err(format!(
                "key {} at time {} precedes key {} at time {}",
                i + 1,
                self.times[i + 1],
                i,
                self.times[i]
            ));
        }
        Ok(())
    }

    /// Finds the pair of samples bracketing `time`.
    ///
    /// Scans forward and stops at the first pair whose upper time is at or
    /// after `time`. Past the last sample the pair stays on the last two
    /// samples; a single-sample track yields `(0, 0)`.
    #[must_use]
    pub fn bracket(&self, time: f32) -> (usize, usize) {
        let mut prev = 0;
        let mut next = 0;
        for i in 0..self.times.len() - 1 {
            prev = i;
            next = i + 1;
            if self.times[next] >= time {
                break;
            }
        }
        (prev, next)
    }

    /// Samples the track at `time`.
    ///
    /// No clamping is applied: a time outside the sampled range extrapolates
    /// from the nearest pair.
    #[must_use]
    pub fn sample(&self, time: f32) -> T {
        let (prev, next) = self.bracket(time);

        let t0 = self.times[prev];
        let dt = self.times[next] - t0;
        let t = if dt.abs() > KEYFRAME_EPSILON {
            (time - t0) / dt
        } else {
            0.0
        };

        T::interpolate_linear(self.values[prev], self.values[next], t)
    }
}
