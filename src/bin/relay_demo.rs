// src/bin/relay_demo.rs
//! End-to-end relay demo: a wearable peer streaming synthetic vitals to
//! a companion peer over the in-process simulated link, with a
//! reachability outage in the middle to show the deferred queue flush.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;

use vitalink::channel::simulated::SimLink;
use vitalink::relay::{Receiver, Sender};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    println!("Starting vitalink relay demo");

    let (wearable_end, companion_end) = SimLink::pair();
    let wearable_end = Arc::new(wearable_end);

    let sender = Sender::new(wearable_end.clone()).with_period(Duration::from_secs(1));
    let receiver = Receiver::new(Arc::new(companion_end));

    sender.activate().await;
    receiver.activate().await;
    receiver.start();

    // Print each sample as the companion side sees it.
    let mut updates = receiver.subscribe();
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let sample = updates.borrow_and_update().clone();
            if let Some(sample) = sample {
                let bp = match (sample.systolic, sample.diastolic) {
                    (Some(sys), Some(dia)) => format!("{}/{} mmHg", sys, dia),
                    _ => "-".to_string(),
                };
                println!(
                    "[Companion] {} bpm, {} steps, BP {} at {}",
                    sample.heart_rate,
                    sample.steps,
                    bp,
                    sample.timestamp.format("%H:%M:%S%.3f")
                );
            }
        }
    });

    sender.start();
    sleep(Duration::from_millis(3500)).await;

    println!("-- peer unreachable: samples queue for deferred delivery --");
    wearable_end.set_reachable(false).await;
    sleep(Duration::from_secs(3)).await;

    println!("-- reachability restored: queue flushes in FIFO order --");
    wearable_end.set_reachable(true).await;
    sleep(Duration::from_millis(500)).await;

    sender.stop();
    match receiver.latest() {
        Some(sample) => println!(
            "Companion holds final sample: {} bpm at {}",
            sample.heart_rate,
            sample.timestamp.format("%H:%M:%S%.3f")
        ),
        None => println!("Companion never received a sample"),
    }
    Ok(())
}
