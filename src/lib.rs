//! # Panorama library
//!
//! This crate drives a camera drone through automated panoramic-photo capture missions: it
//! orients the gimbal or the aircraft body through a grid of yaw/pitch poses, triggers a photo
//! at each pose and reports progress, battery and altitude to the application.
//!
//! The vendor SDK (flight control, gimbal servo, camera encoding, radio link) is not part of
//! this crate. It is consumed through the [Actuator] and [Camera] traits which the application
//! implements on top of whatever SDK bindings it uses. The crate's own job is the mission
//! sequencing: one rotation or capture command in flight at a time, one automatic retry per
//! failed command, abort on the second consecutive failure at the same pose.
//!
//! ## Status
//!
//! The drone functionalities are implemented in subsystems. The current status is:
//!
//! | Subsystem | Support |
//! |-----------|---------|
//! | Mission | Full (grid, nadir row, gimbal and aircraft yaw) |
//! | Telemetry | Full (battery, altitude, heading, satellites) |
//! | Notifications | Full |
//!
//! ## Usage
//!
//! The basic procedure to use the lib is:
//!  - Implement [Actuator] and [Camera] on top of the vendor SDK handles
//!  - Create a [Drone] object and install the handles with [Drone::set_actuator()] and
//!    [Drone::set_camera()]
//!  - Subsystems are available as public fields of the [Drone] struct
//!  - Start a mission with `drone.mission.start(..)` and follow progress through
//!    `drone.notifications` and `drone.mission.state()`
//!
//! All subsystem functions only take an un-mutable reference to self (`&self`), the intention
//! is for the Drone object to be shared between tasks using `Arc<>`.
//!
//! For example:
//! ``` no_run
//! # use std::sync::Arc;
//! # async fn test(actuator: Arc<dyn panorama_lib::Actuator>,
//! #               camera: Arc<dyn panorama_lib::Camera>) -> panorama_lib::Result<()> {
//! use panorama_lib::{Drone, YawMode};
//!
//! let drone = Drone::new();
//! drone.set_actuator(Some(actuator));
//! drone.set_camera(Some(camera));
//!
//! drone.mission.start(3, 4, YawMode::Gimbal).await?;
//! drone.mission.wait().await?;
//!
//! let state = drone.mission.state();
//! println!("Captured {}/{} photos", state.completed_steps, state.total_steps);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod device;
mod drone;
mod error;
mod grid;
mod notification;

pub mod subsystems;

pub use crate::device::{Actuator, Camera, CommandOutcome};
pub use crate::drone::Drone;
pub use crate::error::{Error, Result};
pub use crate::grid::{MissionConfig, MissionGrid, Pose, YawMode};
pub use crate::notification::{NoteType, Notification};
pub use crate::subsystems::mission::MissionState;
pub use crate::subsystems::telemetry::TelemetrySample;
