use util::{stats, RingBuffer};

/// Vitality band from the HRV proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vitality {
    High,
    Normal,
    Low,
}

/// Mood band from the externally tagged positivity ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Positive,
    Negative,
}

/// Combined estimate over HRV and the de-noised heart rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodEstimate {
    Anxious,
    Calm,
    Neutral,
}

/// External emotion-tagging input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmotionTag {
    Positive,
    Neutral,
    Negative,
}

/// One full-window HRV analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HrvReport {
    /// Population stddev of the trimmed intervals, in ms.
    pub hrv_ms: f32,
    /// De-noised BPM from the trimmed mean interval.
    pub smoothed_bpm: u16,
    pub positive_ratio: f32,
    pub vitality: Vitality,
    pub mood: Mood,
    pub estimate: MoodEstimate,
}

/// Classifier tunings. The defaults are the deployed device tunings; none of
/// them have a documented derivation.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierConfig {
    /// Intervals discarded from EACH end of the sorted window.
    pub trim: usize,
    /// HRV above this is "high" vitality, in ms.
    pub vitality_high: f32,
    /// HRV below this is "low" vitality (and feeds the anxious rule), in ms.
    pub vitality_low: f32,
    pub baseline_bpm: u16,
    /// Heart rate above baseline times this factor counts as elevated.
    pub elevated_factor: f32,
    /// Positivity ratio (percent) at or above which mood is positive.
    pub positive_ratio_min: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            trim: 2,
            vitality_high: 40.0,
            vitality_low: 20.0,
            baseline_bpm: 70,
            elevated_factor: 1.1,
            positive_ratio_min: 60.0,
        }
    }
}

/// Long-window beat-interval classifier.
///
/// Keeps its own window, independent of the short heart-rate window, and
/// only reports once that window has filled. The trim suppresses artifact
/// intervals from motion or misdetection before the dispersion statistic.
pub struct HrvClassifier<const M: usize> {
    intervals_ms: RingBuffer<M, u32>,
    cfg: ClassifierConfig,
    positive_tags: u32,
    neutral_tags: u32,
    total_tags: u32,
}

impl<const M: usize> HrvClassifier<M> {
    pub fn new(cfg: ClassifierConfig) -> Self {
        assert!(cfg.trim * 2 < M, "trim leaves no intervals in the window");
        Self {
            intervals_ms: Default::default(),
            cfg,
            positive_tags: 0,
            neutral_tags: 0,
            total_tags: 0,
        }
    }

    /// Intake for an external emotion-tagging source.
    pub fn note_emotion(&mut self, tag: EmotionTag) {
        match tag {
            EmotionTag::Positive => self.positive_tags += 1,
            EmotionTag::Neutral => self.neutral_tags += 1,
            EmotionTag::Negative => {}
        }
        self.total_tags += 1;
    }

    /// Percentage of non-negative tags. Defaults to fully positive when no
    /// tagging source ever reported.
    pub fn positive_ratio(&self) -> f32 {
        if self.total_tags == 0 {
            return 100.0;
        }
        (self.positive_tags + self.neutral_tags) as f32 / self.total_tags as f32 * 100.0
    }

    /// Feed one beat interval in milliseconds. Reports `None` until the
    /// window has accumulated its full capacity.
    pub fn on_beat(&mut self, interval_ms: u32) -> Option<HrvReport> {
        self.intervals_ms.push(interval_ms);
        if !self.intervals_ms.is_full() {
            return None;
        }

        let mut sorted = *self.intervals_ms.inner();
        sorted.sort_unstable();
        let trimmed = &sorted[self.cfg.trim..M - self.cfg.trim];

        let hrv_ms = stats::population_stddev(trimmed);
        let mean_ms = stats::mean(trimmed);
        let smoothed_bpm = if mean_ms >= 1.0 {
            (60_000.0 / mean_ms) as u16
        } else {
            0
        };

        let vitality = if hrv_ms > self.cfg.vitality_high {
            Vitality::High
        } else if hrv_ms >= self.cfg.vitality_low {
            Vitality::Normal
        } else {
            Vitality::Low
        };

        let positive_ratio = self.positive_ratio();
        let mood = if positive_ratio >= self.cfg.positive_ratio_min {
            Mood::Positive
        } else {
            Mood::Negative
        };

        let elevated = self.cfg.baseline_bpm as f32 * self.cfg.elevated_factor;
        let bpm = smoothed_bpm as f32;
        let estimate = if hrv_ms < self.cfg.vitality_low && bpm > elevated {
            MoodEstimate::Anxious
        } else if hrv_ms >= self.cfg.vitality_low && bpm <= elevated {
            MoodEstimate::Calm
        } else {
            MoodEstimate::Neutral
        };

        Some(HrvReport {
            hrv_ms,
            smoothed_bpm,
            positive_ratio,
            vitality,
            mood,
            estimate,
        })
    }
}
