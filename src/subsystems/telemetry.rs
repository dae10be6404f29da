//! # Telemetry subsystem
//!
//! The flight stack pushes display values to the ground: battery percentage, altitude, compass
//! heading and GPS satellite count. This subsystem ingests those samples, keeps the latest
//! value of each channel and re-broadcasts every sample to any number of subscribers.
//!
//! Telemetry is informational only, no mission decision depends on it. The SDK glue obtains
//! the ingest side with [Telemetry::feed()] and sends samples from its delegate callbacks,
//! consumers either poll the cached getters or subscribe to the sample stream:
//!
//! ``` no_run
//! # async fn show(drone: panorama_lib::Drone) {
//! use futures::StreamExt;
//!
//! let mut samples = drone.telemetry.sample_stream();
//! while let Some(sample) = samples.next().await {
//!     println!("{:?}", sample);
//! }
//! # }
//! ```

use std::sync::{Arc, Mutex as SyncMutex};

use async_broadcast::{broadcast, Receiver};
use futures::Stream;
use tokio::task::JoinHandle;

use crate::Result;

/// One telemetry value pushed by the flight stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TelemetrySample {
    /// Remaining battery charge, percent.
    Battery(u8),
    /// Altitude above the takeoff point, meters.
    Altitude(f32),
    /// Aircraft compass heading, degrees.
    Heading(f32),
    /// Number of GPS satellites locked.
    Satellites(u32),
}

#[derive(Debug, Default)]
struct TelemetryCache {
    battery_percent: Option<u8>,
    altitude: Option<f32>,
    heading: Option<f32>,
    satellites: Option<u32>,
}

/// # Access to the telemetry subsystem
///
/// See the [telemetry module documentation](crate::subsystems::telemetry) for more context and
/// information.
pub struct Telemetry {
    cache: Arc<SyncMutex<TelemetryCache>>,
    feed: flume::Sender<TelemetrySample>,
    broadcast_receiver: Receiver<TelemetrySample>,
    _telemetry_task: JoinHandle<()>,
}

impl Telemetry {
    pub(crate) fn new() -> Self {
        let (feed, ingest) = flume::unbounded::<TelemetrySample>();
        let (mut sender, broadcast_receiver) = broadcast(1000);
        sender.set_overflow(true);

        let cache: Arc<SyncMutex<TelemetryCache>> = Default::default();
        let task_cache = cache.clone();

        let _telemetry_task = tokio::spawn(async move {
            while let Ok(sample) = ingest.recv_async().await {
                {
                    let mut cache = task_cache.lock().unwrap();
                    match sample {
                        TelemetrySample::Battery(percent) => cache.battery_percent = Some(percent),
                        TelemetrySample::Altitude(meters) => cache.altitude = Some(meters),
                        TelemetrySample::Heading(degrees) => cache.heading = Some(degrees),
                        TelemetrySample::Satellites(count) => cache.satellites = Some(count),
                    }
                }

                // Push the sample to all active streams, we ignore any error there
                let _ = sender.try_broadcast(sample);
            }
        });

        Self {
            cache,
            feed,
            broadcast_receiver,
            _telemetry_task,
        }
    }

    /// Ingest side of the telemetry queue, to be handed to the SDK delegate glue.
    pub fn feed(&self) -> flume::Sender<TelemetrySample> {
        self.feed.clone()
    }

    /// Push one sample, convenience over [feed()](Telemetry::feed) for synchronous callbacks.
    pub fn push(&self, sample: TelemetrySample) -> Result<()> {
        self.feed.send(sample)?;
        Ok(())
    }

    /// Latest battery percentage, `None` until the first sample arrived.
    pub fn battery_percent(&self) -> Option<u8> {
        self.cache.lock().unwrap().battery_percent
    }

    /// Latest altitude in meters, `None` until the first sample arrived.
    pub fn altitude(&self) -> Option<f32> {
        self.cache.lock().unwrap().altitude
    }

    /// Latest compass heading in degrees, `None` until the first sample arrived.
    pub fn heading(&self) -> Option<f32> {
        self.cache.lock().unwrap().heading
    }

    /// Latest GPS satellite count, `None` until the first sample arrived.
    pub fn satellites(&self) -> Option<u32> {
        self.cache.lock().unwrap().satellites
    }

    /// Subscribe to all samples ingested from now on.
    pub fn sample_stream(&self) -> impl Stream<Item = TelemetrySample> {
        self.broadcast_receiver.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn samples_are_cached_and_streamed() {
        let telemetry = Telemetry::new();
        let mut stream = telemetry.sample_stream();

        telemetry.push(TelemetrySample::Battery(87)).unwrap();
        telemetry.push(TelemetrySample::Altitude(42.5)).unwrap();

        assert_eq!(stream.next().await, Some(TelemetrySample::Battery(87)));
        assert_eq!(stream.next().await, Some(TelemetrySample::Altitude(42.5)));

        assert_eq!(telemetry.battery_percent(), Some(87));
        assert_eq!(telemetry.altitude(), Some(42.5));
        assert_eq!(telemetry.heading(), None);
    }

    #[tokio::test]
    async fn latest_sample_wins_in_the_cache() {
        let telemetry = Telemetry::new();
        let mut stream = telemetry.sample_stream();

        let feed = telemetry.feed();
        feed.send(TelemetrySample::Satellites(7)).unwrap();
        feed.send(TelemetrySample::Satellites(9)).unwrap();

        stream.next().await;
        stream.next().await;

        assert_eq!(telemetry.satellites(), Some(9));
    }
}
