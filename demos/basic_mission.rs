// Runs a full 3x4 gimbal-yaw panorama against a simulated aircraft and prints the progress
// notifications. The simulated devices stand in for the vendor SDK glue.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use panorama_lib::{Actuator, Camera, CommandOutcome, Drone, YawMode};

struct SimulatedGimbal;

#[async_trait]
impl Actuator for SimulatedGimbal {
    async fn rotate(&self, yaw: f32, pitch: f32) -> CommandOutcome {
        println!("gimbal -> yaw {:.1} pitch {:.1}", yaw, pitch);
        tokio::time::sleep(Duration::from_millis(50)).await;
        CommandOutcome::Success
    }
}

struct SimulatedCamera;

#[async_trait]
impl Camera for SimulatedCamera {
    async fn capture_photo(&self) -> CommandOutcome {
        tokio::time::sleep(Duration::from_millis(20)).await;
        CommandOutcome::Success
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let drone = Drone::new();
    drone.set_actuator(Some(Arc::new(SimulatedGimbal)));
    drone.set_camera(Some(Arc::new(SimulatedCamera)));

    let mut notifications = drone.notifications.subscribe();
    let printer = tokio::spawn(async move {
        while let Some(notification) = notifications.next().await {
            match notification.message {
                Some(message) => println!("[{:?}] {}", notification.note, message),
                None => println!("[{:?}]", notification.note),
            }
        }
    });

    drone.mission.start(3, 4, YawMode::Gimbal).await?;
    let state = drone.mission.wait().await?;

    println!(
        "Mission done: {}/{} photos captured",
        state.completed_steps, state.total_steps
    );

    printer.abort();
    Ok(())
}
