// Feeds simulated battery/altitude telemetry into the drone object and prints the sample
// stream next to the cached latest values.

use futures::StreamExt;
use panorama_lib::{Drone, TelemetrySample};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let drone = Drone::new();
    let feed = drone.telemetry.feed();

    // Stand-in for the SDK delegate callbacks
    tokio::spawn(async move {
        for second in 0u32..10 {
            let _ = feed.send(TelemetrySample::Battery(100 - second as u8));
            let _ = feed.send(TelemetrySample::Altitude(second as f32 * 1.5));
            let _ = feed.send(TelemetrySample::Satellites(7 + second % 3));
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }
    });

    let mut samples = drone.telemetry.sample_stream().take(30);
    while let Some(sample) = samples.next().await {
        println!("sample: {:?}", sample);
    }

    println!(
        "latest: battery {:?}%, altitude {:?}m, satellites {:?}",
        drone.telemetry.battery_percent(),
        drone.telemetry.altitude(),
        drone.telemetry.satellites(),
    );

    Ok(())
}
