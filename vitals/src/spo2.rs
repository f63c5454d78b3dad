use micromath::F32Ext;
use util::RingBuffer;

/// One completed SpO2 window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spo2Reading {
    Percent(u8),
    /// Flatline or zero-level window (sensor fault, finger removed); no
    /// meaningful ratio exists, so no number is reported.
    Undetermined,
}

/// Ratio-of-ratios saturation estimator.
///
/// Both channels advance on every sample tick at a shared cursor,
/// independently of the beat windows. A reading is produced each time the
/// windows wrap and is cached until the next wrap.
pub struct Spo2Estimator<const S: usize> {
    red: RingBuffer<S, u32>,
    ir: RingBuffer<S, u32>,
    last: Option<Spo2Reading>,
}

/// Mean (DC) and peak-to-trough swing (AC) over one channel window.
fn channel_components(window: &[u32]) -> (f32, f32) {
    let mut sum = 0u64;
    let mut min = u32::MAX;
    let mut max = 0u32;
    for &v in window {
        sum += v as u64;
        min = min.min(v);
        max = max.max(v);
    }
    let dc = sum as f32 / window.len() as f32;
    let ac = (max - min) as f32;
    (dc, ac)
}

impl<const S: usize> Default for Spo2Estimator<S> {
    fn default() -> Self {
        Self {
            red: Default::default(),
            ir: Default::default(),
            last: None,
        }
    }
}

impl<const S: usize> Spo2Estimator<S> {
    pub fn new() -> Self {
        Default::default()
    }

    /// Feed one (red, ir) pair; returns a fresh reading on window wrap.
    pub fn ingest(&mut self, red: u32, ir: u32) -> Option<Spo2Reading> {
        self.red.push(red);
        self.ir.push(ir);
        if self.ir.cursor() != 0 {
            return None;
        }
        let reading = self.compute();
        self.last = Some(reading);
        Some(reading)
    }

    /// Most recent completed-window reading, if any window completed yet.
    pub fn last(&self) -> Option<Spo2Reading> {
        self.last
    }

    fn compute(&self) -> Spo2Reading {
        let (red_dc, red_ac) = channel_components(self.red.inner());
        let (ir_dc, ir_ac) = channel_components(self.ir.inner());

        if red_dc == 0.0 || ir_dc == 0.0 || red_ac == 0.0 || ir_ac == 0.0 {
            return Spo2Reading::Undetermined;
        }

        let r = (red_ac / red_dc) / (ir_ac / ir_dc);
        let spo2 = (110.0 - 25.0 * r).clamp(0.0, 100.0);
        Spo2Reading::Percent(spo2.round() as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Half the window at `base - swing`, half at `base + swing`.
    fn feed_square(est: &mut Spo2Estimator<100>, red: (u32, u32), ir: (u32, u32)) -> Spo2Reading {
        let mut out = None;
        for i in 0..100 {
            let r = if i % 2 == 0 { red.0 - red.1 } else { red.0 + red.1 };
            let v = if i % 2 == 0 { ir.0 - ir.1 } else { ir.0 + ir.1 };
            out = est.ingest(r, v);
        }
        out.expect("window must complete after 100 samples")
    }

    #[test]
    fn no_reading_until_window_fills() {
        let mut est: Spo2Estimator<100> = Spo2Estimator::new();
        for i in 0..99 {
            assert_eq!(est.ingest(50_000, 60_000 + i), None);
            assert_eq!(est.last(), None);
        }
        assert!(est.ingest(50_000, 60_000).is_some());
        assert!(est.last().is_some());
    }

    #[test]
    fn flat_channels_are_undetermined() {
        let mut est: Spo2Estimator<100> = Spo2Estimator::new();
        let mut out = None;
        for _ in 0..100 {
            out = est.ingest(50_000, 60_000);
        }
        // Both ACs are zero: flatline.
        assert_eq!(out, Some(Spo2Reading::Undetermined));
    }

    #[test]
    fn single_flat_channel_is_undetermined() {
        let mut est: Spo2Estimator<100> = Spo2Estimator::new();
        let mut out = None;
        for i in 0..100u32 {
            // IR pulses, red is flat.
            out = est.ingest(50_000, 60_000 + (i % 2) * 1000);
        }
        assert_eq!(out, Some(Spo2Reading::Undetermined));
    }

    #[test]
    fn zero_dc_is_undetermined() {
        let mut est: Spo2Estimator<100> = Spo2Estimator::new();
        let mut out = None;
        for i in 0..100u32 {
            // All-zero red with pulsing ir hits the DC guard.
            out = est.ingest(0, 60_000 + (i % 2) * 1000);
        }
        assert_eq!(out, Some(Spo2Reading::Undetermined));
    }

    #[test]
    fn unit_ratio_reads_85_percent() {
        let mut est: Spo2Estimator<100> = Spo2Estimator::new();
        // red: dc 50000, ac 5000 -> 0.1; ir: dc 50000, ac 5000 -> 0.1.
        // R = 1 and spo2 = 110 - 25 = 85.
        let reading = feed_square(&mut est, (50_000, 2_500), (50_000, 2_500));
        assert_eq!(reading, Spo2Reading::Percent(85));
    }

    #[test]
    fn saturation_clamps_to_100() {
        let mut est: Spo2Estimator<100> = Spo2Estimator::new();
        // red ratio 0.02, ir ratio 0.2: R = 0.1, raw value 107.5.
        let reading = feed_square(&mut est, (50_000, 500), (50_000, 5_000));
        assert_eq!(reading, Spo2Reading::Percent(100));
    }

    #[test]
    fn low_ratio_clamps_to_0() {
        let mut est: Spo2Estimator<100> = Spo2Estimator::new();
        // red ratio 1.0, ir ratio 0.2: R = 5, raw value -15.
        let reading = feed_square(&mut est, (50_000, 25_000), (50_000, 5_000));
        assert_eq!(reading, Spo2Reading::Percent(0));
    }

    #[test]
    fn reading_is_cached_between_windows() {
        let mut est: Spo2Estimator<100> = Spo2Estimator::new();
        let reading = feed_square(&mut est, (50_000, 2_500), (50_000, 2_500));
        assert_eq!(est.last(), Some(reading));
        // Mid-window, the cached value stays.
        assert_eq!(est.ingest(1, 1), None);
        assert_eq!(est.last(), Some(reading));
    }
}
