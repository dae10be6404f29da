// Starts a large panorama and aborts it after one second, showing that the abort is observed
// between commands and reported through the notification stream.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use panorama_lib::{Actuator, Camera, CommandOutcome, Drone, NoteType, YawMode};

struct SlowAircraft;

#[async_trait]
impl Actuator for SlowAircraft {
    async fn rotate(&self, _yaw: f32, _pitch: f32) -> CommandOutcome {
        tokio::time::sleep(Duration::from_millis(200)).await;
        CommandOutcome::Success
    }
}

struct SimulatedCamera;

#[async_trait]
impl Camera for SimulatedCamera {
    async fn capture_photo(&self) -> CommandOutcome {
        tokio::time::sleep(Duration::from_millis(100)).await;
        CommandOutcome::Success
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let drone = Drone::new();
    drone.set_actuator(Some(Arc::new(SlowAircraft)));
    drone.set_camera(Some(Arc::new(SimulatedCamera)));

    let mut notifications = drone.notifications.subscribe();

    drone.mission.start(10, 10, YawMode::Aircraft).await?;

    tokio::time::sleep(Duration::from_secs(1)).await;
    println!("requesting abort ...");
    drone.mission.abort("operator requested abort");

    let state = drone.mission.wait().await?;
    println!(
        "Mission ended early: {}/{} photos captured",
        state.completed_steps, state.total_steps
    );

    while let Some(notification) = notifications.next().await {
        if notification.note == NoteType::CmdError {
            println!("abort notification: {:?}", notification.message);
            break;
        }
    }

    Ok(())
}
