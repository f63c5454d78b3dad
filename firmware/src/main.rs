//! Host-runnable vitals node: a periodic sampling task drives the pipeline
//! off the simulated sensor, a reporting task consumes events and the shared
//! snapshot at its own cadence.

mod report;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use report::ReportMsg;
use sensor_shared::{Retry, SampleSource};
use sensor_simu::SimSensor;
use vitals::{DefaultPipeline, PipelineConfig, VitalsSnapshot};

const REPORT_PERIOD: Duration = Duration::from_secs(2);
/// Consecutive failed ticks before the sensor gets re-initialized.
const MAX_FAILED_TICKS: u32 = 10;

fn main() {
    let cfg = PipelineConfig::default();
    let snapshot = Arc::new(Mutex::new(VitalsSnapshot::default()));
    let (tx, rx) = smol::channel::unbounded();

    smol::spawn(report_task(rx, snapshot.clone())).detach();
    smol::block_on(sample_task(cfg, snapshot, tx));
}

/// One sampling tick per sample period; ticks are inherently serialized
/// because only this task touches the pipeline.
async fn sample_task(
    cfg: PipelineConfig,
    snapshot: Arc<Mutex<VitalsSnapshot>>,
    tx: smol::channel::Sender<ReportMsg>,
) {
    let mut sensor = SimSensor::new(cfg.sample_period_ms as u64).fail_every(997);
    let mut pipeline = DefaultPipeline::new(cfg);
    let retry = Retry::default();
    let mut failed_ticks = 0u32;

    loop {
        smol::Timer::after(Duration::from_millis(cfg.sample_period_ms as u64)).await;

        let sample = match retry.run(
            |ms| std::thread::sleep(Duration::from_millis(ms as u64)),
            || sensor.read_fifo(),
        ) {
            Ok(sample) => sample,
            Err(e) => {
                // No sample this tick; the windows simply do not advance.
                failed_ticks += 1;
                println!("sensor read failed ({e:?}), skipping tick");
                if failed_ticks >= MAX_FAILED_TICKS {
                    println!("too many failed reads, resetting sensor");
                    sensor.reset();
                    failed_ticks = 0;
                }
                continue;
            }
        };
        failed_ticks = 0;

        let outcome = pipeline.ingest(sample.red, sample.ir);

        // Both snapshot fields update under one critical section so readers
        // never observe a torn pair.
        *snapshot.lock().unwrap() = pipeline.snapshot();

        if let (Some(beat), Some(bpm)) = (outcome.beat, outcome.bpm) {
            let interval_ms = beat.as_millis(cfg.sample_period_ms);
            let _ = tx.send(ReportMsg::Beat { interval_ms, bpm }).await;
        }
        if let Some(hrv) = outcome.hrv {
            let _ = tx.send(ReportMsg::Hrv(hrv)).await;
        }
        if let Some(spo2) = outcome.spo2 {
            let _ = tx.send(ReportMsg::Spo2(spo2)).await;
        }
    }
}

/// Prints forwarded events as they arrive and the shared snapshot on a
/// fixed period, whichever wakes it first.
async fn report_task(
    rx: smol::channel::Receiver<ReportMsg>,
    snapshot: Arc<Mutex<VitalsSnapshot>>,
) {
    loop {
        let timeout = async {
            smol::Timer::after(REPORT_PERIOD).await;
            None
        };
        let msg = smol::future::or(async { rx.recv().await.ok() }, timeout).await;

        let now = chrono::Utc::now().format("%H:%M:%S%.3f");
        match msg {
            Some(msg) => println!("[{now}] {}", report::describe_msg(&msg)),
            None => {
                let current = *snapshot.lock().unwrap();
                println!("[{now}] vitals: {}", report::describe(&current));
            }
        }
    }
}
