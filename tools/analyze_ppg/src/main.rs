//! Replays a recorded CSV of raw (red, ir) samples through the vitals
//! pipeline and prints everything it produces along the way.

use std::error::Error;

use vitals::{DefaultPipeline, PipelineConfig};

#[derive(serde::Deserialize)]
struct Row {
    red: u32,
    ir: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = std::env::args().collect::<Vec<_>>();
    let path = args.get(1).ok_or("usage: analyze_ppg <samples.csv>")?;
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);

    let cfg = PipelineConfig::default();
    let mut pipeline = DefaultPipeline::new(cfg);

    for (tick, row) in rdr.deserialize().enumerate() {
        let row: Row = row?;
        let outcome = pipeline.ingest(row.red, row.ir);

        if let (Some(beat), Some(bpm)) = (outcome.beat, outcome.bpm) {
            println!(
                "{tick}: beat interval={} samples ({}ms) bpm={bpm}",
                beat.0,
                beat.as_millis(cfg.sample_period_ms)
            );
        }
        if let Some(hrv) = outcome.hrv {
            println!(
                "{tick}: hrv={:.2}ms smoothed_bpm={} vitality={:?} mood={:?} estimate={:?}",
                hrv.hrv_ms, hrv.smoothed_bpm, hrv.vitality, hrv.mood, hrv.estimate
            );
        }
        if let Some(spo2) = outcome.spo2 {
            println!("{tick}: spo2 {spo2:?}");
        }
    }

    let snapshot = pipeline.snapshot();
    println!(
        "final: heart_rate={:?} spo2={:?}",
        snapshot.heart_rate, snapshot.spo2
    );

    Ok(())
}
