//! Top-level drone object wiring the subsystems together.

use std::sync::Arc;

use crate::device::{Actuator, Camera};
use crate::notification::{NotificationCenter, NoteType};
use crate::subsystems::mission::Mission;
use crate::subsystems::telemetry::Telemetry;

/// # The Drone
///
/// Owns the subsystems and the injected device handles. There are no process-wide globals: the
/// aircraft/gimbal actuator and the camera are installed on this object and handed to each
/// mission run from here.
///
/// All subsystem functions only take `&self`, the intention is for the Drone object to be
/// shared between tasks using `Arc<>`. Must be created from within a tokio runtime, the
/// subsystems spawn their background tasks at construction.
///
/// See the [crate root documentation](crate) for more context and information.
pub struct Drone {
    /// Mission subsystem access
    pub mission: Mission,
    /// Telemetry subsystem access
    pub telemetry: Telemetry,
    /// Notification subsystem access
    pub notifications: NotificationCenter,
}

impl Drone {
    /// Create a drone object with no device handles installed.
    ///
    /// Mission start fails with [Error::NotConnected](crate::Error::NotConnected) until both
    /// an actuator and a camera are installed.
    pub fn new() -> Self {
        let notifications = NotificationCenter::new();

        Self {
            mission: Mission::new(notifications.clone()),
            telemetry: Telemetry::new(),
            notifications,
        }
    }

    /// Install or remove the aircraft/gimbal rotation actuator.
    ///
    /// Posts `DroneConnected`/`DroneNotConnected`, and `DroneChanged` when an already
    /// installed handle is replaced. A mission currently running keeps the handles it started
    /// with.
    pub fn set_actuator(&self, actuator: Option<Arc<dyn Actuator>>) {
        let installing = actuator.is_some();
        let had = self.mission.set_actuator(actuator);
        self.post_device_change("Aircraft/gimbal", installing, had);
    }

    /// Install or remove the camera handle. Same notification behavior as
    /// [set_actuator()](Drone::set_actuator).
    pub fn set_camera(&self, camera: Option<Arc<dyn Camera>>) {
        let installing = camera.is_some();
        let had = self.mission.set_camera(camera);
        self.post_device_change("Camera", installing, had);
    }

    fn post_device_change(&self, device: &str, installing: bool, had: bool) {
        let note = match (installing, had) {
            (true, true) => NoteType::DroneChanged,
            (true, false) => NoteType::DroneConnected,
            (false, _) => NoteType::DroneNotConnected,
        };
        self.notifications.post(note, Some(device.to_owned()));
    }
}

impl Default for Drone {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Drone {
    fn drop(&mut self) {
        // A mission still running must not keep commanding a drone nobody tracks anymore
        self.mission.abort("Drone object dropped");
    }
}
