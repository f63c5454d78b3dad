//! Deterministic simulated PPG front end for host runs and tests.

use sensor_shared::{RawSample, ReadError, SampleSource};

const RED_DC: f32 = 50_000.0;
const RED_SWING: f32 = 1_500.0;
const IR_DC: f32 = 60_000.0;
const IR_SWING: f32 = 3_000.0;

/// Synthetic pulse-oximeter producing a DC level per channel with a
/// sinusoidal pulsatile component. Red is modulated shallower than infrared
/// so the ratio-of-ratios lands in a plausible saturation range. Reads can
/// be scheduled to fail every n-th call to exercise the skipped-tick path.
pub struct SimSensor {
    elapsed_ms: u64,
    sample_period_ms: u64,
    beats_per_ms: f32,
    fail_every: Option<u64>,
    reads: u64,
}

impl SimSensor {
    pub fn new(sample_period_ms: u64) -> Self {
        Self {
            elapsed_ms: 0,
            sample_period_ms,
            beats_per_ms: 2.1 / 1000.0,
            fail_every: None,
            reads: 0,
        }
    }

    /// Pulse rate of the synthetic subject (2.1/1000 by default, 126 BPM).
    pub fn beats_per_ms(mut self, beats_per_ms: f32) -> Self {
        self.beats_per_ms = beats_per_ms;
        self
    }

    pub fn fail_every(mut self, n: u64) -> Self {
        self.fail_every = Some(n);
        self
    }

    /// Re-runs bring-up; the synthetic waveform restarts from phase zero.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }

    fn channel(&self, now_ms: u64, dc: f32, swing: f32) -> u32 {
        let beat = now_ms as f32 * self.beats_per_ms;
        let v = dc + swing * (beat * core::f32::consts::TAU).sin();
        v.max(0.0) as u32
    }
}

impl SampleSource for SimSensor {
    fn read_fifo(&mut self) -> Result<RawSample, ReadError> {
        let now_ms = self.elapsed_ms;
        // The subject's waveform advances whether or not the bus read works.
        self.elapsed_ms += self.sample_period_ms;
        self.reads += 1;

        if let Some(n) = self.fail_every {
            if self.reads % n == 0 {
                return Err(ReadError::BusRead);
            }
        }

        Ok(RawSample {
            red: self.channel(now_ms, RED_DC, RED_SWING),
            ir: self.channel(now_ms, IR_DC, IR_SWING),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_in_adc_range() {
        let mut sensor = SimSensor::new(40);
        for _ in 0..1000 {
            let s = sensor.read_fifo().unwrap();
            assert!(s.red < 1 << 18);
            assert!(s.ir < 1 << 18);
        }
    }

    #[test]
    fn infrared_actually_pulses() {
        let mut sensor = SimSensor::new(40);
        let samples: Vec<_> = (0..100).map(|_| sensor.read_fifo().unwrap()).collect();
        let max = samples.iter().map(|s| s.ir).max().unwrap();
        let min = samples.iter().map(|s| s.ir).min().unwrap();
        // Swing must clear the default peak-detection margin.
        assert!(max - min > 2 * 1000);
    }

    #[test]
    fn runs_are_reproducible() {
        let mut a = SimSensor::new(40);
        let mut b = SimSensor::new(40);
        for _ in 0..50 {
            assert_eq!(a.read_fifo(), b.read_fifo());
        }
    }

    #[test]
    fn scheduled_faults_fire() {
        let mut sensor = SimSensor::new(40).fail_every(5);
        let results: Vec<_> = (0..10).map(|_| sensor.read_fifo()).collect();
        assert!(results[3].is_ok());
        assert_eq!(results[4], Err(ReadError::BusRead));
        assert!(results[5].is_ok());
        assert_eq!(results[9], Err(ReadError::BusRead));
    }

    #[test]
    fn reset_restarts_the_waveform() {
        let mut sensor = SimSensor::new(40);
        let first = sensor.read_fifo().unwrap();
        for _ in 0..17 {
            let _ = sensor.read_fifo();
        }
        sensor.reset();
        assert_eq!(sensor.read_fifo().unwrap(), first);
    }
}
