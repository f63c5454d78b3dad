use util::RingBuffer;

use crate::peak::BeatInterval;

/// Short-window smoothing of beat intervals into an instantaneous BPM.
///
/// Only ever updated on a beat event, never per sample tick. During warm-up
/// the mean runs over however many intervals have arrived so far.
pub struct HeartRateEstimator<const K: usize> {
    intervals: RingBuffer<K, u32>,
    sample_period_ms: u32,
}

impl<const K: usize> HeartRateEstimator<K> {
    pub fn new(sample_period_ms: u32) -> Self {
        Self {
            intervals: Default::default(),
            sample_period_ms,
        }
    }

    /// Returns the smoothed BPM, or 0 while it is undetermined.
    pub fn on_beat(&mut self, interval: BeatInterval) -> u16 {
        self.intervals.push(interval.0);
        let valid = self.intervals.valid();
        let mean_samples = valid.iter().sum::<u32>() / valid.len() as u32;
        let mean_ms = mean_samples * self.sample_period_ms;
        if mean_ms == 0 {
            return 0;
        }
        (60_000 / mean_ms) as u16
    }
}
