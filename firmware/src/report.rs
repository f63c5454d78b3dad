use vitals::{HrvReport, Reading, Spo2Reading, VitalsSnapshot};

/// Messages from the sampling task to the reporter.
#[derive(Debug, Clone, Copy)]
pub enum ReportMsg {
    Beat { interval_ms: u32, bpm: u16 },
    Hrv(HrvReport),
    Spo2(Spo2Reading),
}

/// Wire sentinel for anything that is not a ready value.
pub const UNDETERMINED: i32 = -1;

pub fn field<T: Copy + Into<i32>>(reading: Reading<T>) -> i32 {
    match reading {
        Reading::Ready(v) => v.into(),
        _ => UNDETERMINED,
    }
}

fn state<T>(reading: &Reading<T>) -> &'static str {
    match reading {
        Reading::Warmup => "warmup",
        Reading::Undetermined => "undetermined",
        Reading::Ready(_) => "ok",
    }
}

/// One reporting line for a snapshot, keeping warm-up distinguishable from
/// a degenerate measurement.
pub fn describe(snapshot: &VitalsSnapshot) -> String {
    format!(
        "heart_rate={} ({}) spo2={} ({})",
        field(snapshot.heart_rate),
        state(&snapshot.heart_rate),
        field(snapshot.spo2),
        state(&snapshot.spo2),
    )
}

pub fn describe_msg(msg: &ReportMsg) -> String {
    match msg {
        ReportMsg::Beat { interval_ms, bpm } => {
            format!("beat: interval={interval_ms}ms bpm={bpm}")
        }
        ReportMsg::Hrv(hrv) => format!(
            "hrv: {:.2}ms bpm={} vitality={:?} mood={:?} estimate={:?}",
            hrv.hrv_ms, hrv.smoothed_bpm, hrv.vitality, hrv.mood, hrv.estimate
        ),
        ReportMsg::Spo2(Spo2Reading::Percent(p)) => format!("spo2: {p}%"),
        ReportMsg::Spo2(Spo2Reading::Undetermined) => {
            format!("spo2: {UNDETERMINED} (undetermined)")
        }
    }
}
