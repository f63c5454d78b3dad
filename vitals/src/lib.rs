#![cfg_attr(not(test), no_std)]

//! Streaming vitals estimation over raw photoplethysmography samples.
//!
//! One `(red, ir)` intensity pair goes in per sampling tick; heart rate,
//! heart-rate variability and blood-oxygen saturation come out as they
//! become determinable. All state lives in fixed-size rolling windows owned
//! by the pipeline instance; nothing is shared or global.

pub mod hrv;
pub mod peak;
pub mod rate;
pub mod spo2;

pub use hrv::{
    ClassifierConfig, EmotionTag, HrvClassifier, HrvReport, Mood, MoodEstimate, Vitality,
};
pub use peak::{BeatInterval, IrPeakTracker};
pub use rate::HeartRateEstimator;
pub use spo2::{Spo2Estimator, Spo2Reading};

/// A single estimate as seen by the reporting layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading<T> {
    /// Not enough samples yet. Distinct from a degenerate measurement so
    /// reporting does not mistake "no data yet" for a sensor failure.
    Warmup,
    /// A window was measured but its statistics were degenerate.
    Undetermined,
    Ready(T),
}

impl<T: Copy> Reading<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Reading::Ready(v) => Some(v),
            _ => None,
        }
    }
}

/// Externally visible vitals. Written only by the pipeline at well-defined
/// points; cross-context readers copy it out under whatever lock the
/// embedding provides and treat it as eventually consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VitalsSnapshot {
    pub heart_rate: Reading<u16>,
    pub spo2: Reading<u8>,
}

impl Default for VitalsSnapshot {
    fn default() -> Self {
        Self {
            heart_rate: Reading::Warmup,
            spo2: Reading::Warmup,
        }
    }
}

/// Tunable pipeline parameters. Defaults are the deployed device tunings.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub sample_period_ms: u32,
    /// A candidate peak must clear the window baseline by this much.
    pub peak_margin: u32,
    /// Refractory guard between accepted peaks, in samples.
    pub min_peak_distance: u32,
    pub classifier: ClassifierConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_period_ms: 40,
            peak_margin: 1000,
            min_peak_distance: 15,
            classifier: Default::default(),
        }
    }
}

/// What one tick produced, for embeddings that forward events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickOutcome {
    /// Emitted beat interval, if this tick completed a beat.
    pub beat: Option<BeatInterval>,
    /// Smoothed BPM, recomputed only when a beat was emitted (0 means
    /// undetermined).
    pub bpm: Option<u16>,
    /// Full-window HRV analysis, when the long window was complete.
    pub hrv: Option<HrvReport>,
    /// Fresh saturation reading, when the SpO2 window wrapped.
    pub spo2: Option<Spo2Reading>,
}

/// Per-tick driver owning all windows.
///
/// Not reentrant: one sample must be fully ingested before the next; the
/// embedding serializes ticks on a single execution context. Window sizes:
/// `N` raw IR samples for peak detection, `K` intervals for the short
/// heart-rate window, `M` intervals for the long HRV window, `S` samples per
/// SpO2 channel. The interval windows are deliberately independent; their
/// warm-up rates differ.
pub struct VitalsPipeline<const N: usize, const K: usize, const M: usize, const S: usize> {
    peaks: IrPeakTracker<N>,
    rate: HeartRateEstimator<K>,
    classifier: HrvClassifier<M>,
    spo2: Spo2Estimator<S>,
    snapshot: VitalsSnapshot,
    sample_period_ms: u32,
}

/// Window sizes used on the device.
pub type DefaultPipeline = VitalsPipeline<100, 10, 15, 100>;

impl<const N: usize, const K: usize, const M: usize, const S: usize> VitalsPipeline<N, K, M, S> {
    pub fn new(cfg: PipelineConfig) -> Self {
        Self {
            peaks: IrPeakTracker::new(cfg.peak_margin, cfg.min_peak_distance),
            rate: HeartRateEstimator::new(cfg.sample_period_ms),
            classifier: HrvClassifier::new(cfg.classifier),
            spo2: Spo2Estimator::new(),
            snapshot: Default::default(),
            sample_period_ms: cfg.sample_period_ms,
        }
    }

    /// Advance every window by one sample. A failed sensor read is simply
    /// not ingested; the caller skips the tick.
    pub fn ingest(&mut self, red: u32, ir: u32) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        outcome.beat = self.peaks.ingest(ir);
        if let Some(beat) = outcome.beat {
            let bpm = self.rate.on_beat(beat);
            self.snapshot.heart_rate = if bpm == 0 {
                Reading::Undetermined
            } else {
                Reading::Ready(bpm)
            };
            outcome.bpm = Some(bpm);
            outcome.hrv = self
                .classifier
                .on_beat(beat.as_millis(self.sample_period_ms));
        }

        outcome.spo2 = self.spo2.ingest(red, ir);
        if let Some(reading) = outcome.spo2 {
            self.snapshot.spo2 = match reading {
                Spo2Reading::Percent(p) => Reading::Ready(p),
                Spo2Reading::Undetermined => Reading::Undetermined,
            };
        }

        outcome
    }

    /// Forward an external emotion tag to the mood classifier.
    pub fn note_emotion(&mut self, tag: EmotionTag) {
        self.classifier.note_emotion(tag);
    }

    pub fn snapshot(&self) -> VitalsSnapshot {
        self.snapshot
    }
}
