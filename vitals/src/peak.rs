use util::RingBuffer;

/// Sample-tick distance between two consecutive detected peaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatInterval(pub u32);

impl BeatInterval {
    pub fn as_millis(&self, sample_period_ms: u32) -> u32 {
        self.0 * sample_period_ms
    }
}

/// Rolling-window local-maximum detector over the raw infrared channel.
///
/// A sample counts as a peak when it is strictly greater than both of its
/// circular neighbors and clears the window baseline by a margin. Candidates
/// closer than the refractory distance to the previous accepted peak are
/// dropped as double-triggers of the same pulse.
pub struct IrPeakTracker<const N: usize> {
    window: RingBuffer<N, u32>,
    last_peak: Option<usize>,
    margin: u32,
    min_distance: u32,
}

impl<const N: usize> IrPeakTracker<N> {
    pub fn new(margin: u32, min_distance: u32) -> Self {
        Self {
            window: Default::default(),
            last_peak: None,
            margin,
            min_distance,
        }
    }

    /// Mean over all N slots. The zero prefill drags the baseline down until
    /// the window has wrapped once, which biases early detections.
    fn baseline(&self) -> u32 {
        let sum: u64 = self.window.inner().iter().map(|&v| v as u64).sum();
        (sum / N as u64) as u32
    }

    /// Feed one infrared sample. Emits the interval since the previous beat
    /// when this sample completes one.
    pub fn ingest(&mut self, ir: u32) -> Option<BeatInterval> {
        let i = self.window.cursor();
        self.window.push(ir);

        // The slot after `i` has not been written this lap; it still holds
        // the sample from N-1 ticks ago. The neighbor comparison must see
        // that old value, never the current tick's.
        let current = *self.window.get(i);
        let prev = *self.window.get(i + N - 1);
        let next = *self.window.get(i + 1);

        let is_candidate =
            current > prev && current > next && current > self.baseline() + self.margin;
        if !is_candidate {
            return None;
        }

        match self.last_peak {
            None => {
                // First peak only establishes the reference point.
                self.last_peak = Some(i);
                None
            }
            Some(last) => {
                let interval = ((i + N - last) % N) as u32;
                if interval < self.min_distance {
                    // Refractory guard; the reference peak stays put.
                    return None;
                }
                self.last_peak = Some(i);
                Some(BeatInterval(interval))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARGIN: u32 = 1000;
    const MIN_DISTANCE: u32 = 15;

    fn tracker() -> IrPeakTracker<100> {
        IrPeakTracker::new(MARGIN, MIN_DISTANCE)
    }

    fn feed_spikes(tracker: &mut IrPeakTracker<100>, ticks: usize, spikes: &[usize]) -> Vec<u32> {
        let mut intervals = Vec::new();
        for t in 0..ticks {
            let ir = if spikes.contains(&t) { 2000 } else { 0 };
            if let Some(beat) = tracker.ingest(ir) {
                intervals.push(beat.0);
            }
        }
        intervals
    }

    #[test]
    fn constant_signal_never_peaks() {
        let mut t = tracker();
        for _ in 0..500 {
            assert_eq!(t.ingest(5000), None);
        }
    }

    #[test]
    fn first_peak_emits_nothing() {
        let mut t = tracker();
        let intervals = feed_spikes(&mut t, 50, &[25]);
        assert!(intervals.is_empty());
    }

    #[test]
    fn periodic_spikes_converge_to_period() {
        let mut t = tracker();
        // Spikes every 30 samples; the first one is reference-only.
        let spikes: Vec<usize> = (0..10).map(|k| 5 + 30 * k).collect();
        let mut intervals = Vec::new();
        for tick in 0..300 {
            let ir = if spikes.contains(&tick) { 2000 } else { 0 };
            if let Some(beat) = t.ingest(ir) {
                intervals.push(beat.0);
            }
        }
        assert_eq!(intervals.len(), 9);
        assert!(intervals.iter().all(|&i| i == 30));
    }

    #[test]
    fn refractory_guard_suppresses_double_trigger() {
        let mut t = tracker();
        // Reference at 10, beat at 40, double-trigger at 45 (distance 5).
        let mut intervals = Vec::new();
        for tick in 0..60 {
            let ir = match tick {
                10 | 40 | 45 => 2000,
                _ => 0,
            };
            if let Some(beat) = t.ingest(ir) {
                intervals.push(beat.0);
            }
        }
        assert_eq!(intervals, vec![30]);
    }

    #[test]
    fn suppressed_candidate_keeps_reference() {
        let mut t = tracker();
        // 10 (reference), 20 (suppressed, distance 10), 40: the interval is
        // measured from 10, not from the suppressed candidate.
        let mut intervals = Vec::new();
        for tick in 0..50 {
            let ir = match tick {
                10 | 20 | 40 => 2000,
                _ => 0,
            };
            if let Some(beat) = t.ingest(ir) {
                intervals.push(beat.0);
            }
        }
        assert_eq!(intervals, vec![30]);
    }

    #[test]
    fn below_margin_is_not_a_peak() {
        let mut t = tracker();
        for tick in 0..100 {
            // Local maxima, but never clearing baseline + margin.
            let ir = if tick % 20 == 0 { 900 } else { 0 };
            assert_eq!(t.ingest(ir), None);
        }
    }
}
