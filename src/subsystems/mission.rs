//! # Mission subsystem
//!
//! This subsystem executes panorama missions: it owns the [MissionState] cursor and drives the
//! injected [Actuator](crate::Actuator) and [Camera](crate::Camera) handles through every pose
//! of the grid, one command in flight at a time.
//!
//! A mission runs in a background task. Progress can be followed three ways: the
//! [state()](Mission::state) snapshot, the notification stream of the
//! [Drone](crate::Drone) object, or by awaiting [wait()](Mission::wait) which resolves with
//! the final state once the mission completed or aborted.
//!
//! ``` no_run
//! # async fn fly(drone: panorama_lib::Drone) -> panorama_lib::Result<()> {
//! use panorama_lib::YawMode;
//!
//! drone.mission.start(3, 4, YawMode::Gimbal).await?;
//! let state = drone.mission.wait().await?;
//! assert_eq!(state.completed_steps, 12);
//! # Ok(())
//! # }
//! ```
//!
//! Aborting with [abort()](Mission::abort) is observed between commands: the command currently
//! in flight is awaited first, nothing is ever cancelled mid-command. If the vendor SDK never
//! resolves a command the mission stalls, the SDK's own completion signaling is the only
//! progress source.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::{Arc, Mutex as SyncMutex};

use futures::lock::Mutex;
use log::{debug, warn};
use tokio::task::JoinHandle;

use crate::device::{Actuator, Camera, CommandOutcome};
use crate::grid::{MissionConfig, YawMode};
use crate::notification::{NotificationCenter, NoteType};
use crate::subsystems::sequencer::{AbortReason, Directive, MissionSequencer};
use crate::{Error, Result};

pub use crate::subsystems::sequencer::{MissionPhase, MissionState};

/// # Access to the mission subsystem
///
/// See the [mission module documentation](crate::subsystems::mission) for more context and
/// information.
pub struct Mission {
    actuator: SyncMutex<Option<Arc<dyn Actuator>>>,
    camera: SyncMutex<Option<Arc<dyn Camera>>>,
    sequencer: Arc<SyncMutex<MissionSequencer>>,
    abort: Arc<AtomicBool>,
    abort_reason: Arc<SyncMutex<Option<String>>>,
    failure: Arc<SyncMutex<Option<Error>>>,
    notifications: NotificationCenter,
    mission_task: Mutex<Option<JoinHandle<()>>>,
}

impl Mission {
    pub(crate) fn new(notifications: NotificationCenter) -> Self {
        Self {
            actuator: SyncMutex::new(None),
            camera: SyncMutex::new(None),
            sequencer: Arc::new(SyncMutex::new(MissionSequencer::new())),
            abort: Arc::new(AtomicBool::new(false)),
            abort_reason: Arc::new(SyncMutex::new(None)),
            failure: Arc::new(SyncMutex::new(None)),
            notifications,
            mission_task: Mutex::new(None),
        }
    }

    pub(crate) fn set_actuator(&self, actuator: Option<Arc<dyn Actuator>>) -> bool {
        let mut handle = self.actuator.lock().unwrap();
        let had = handle.is_some();
        *handle = actuator;
        had
    }

    pub(crate) fn set_camera(&self, camera: Option<Arc<dyn Camera>>) -> bool {
        let mut handle = self.camera.lock().unwrap();
        let had = handle.is_some();
        *handle = camera;
        had
    }

    /// Start a standard `rows` x `columns` panorama mission.
    ///
    /// Fails with [Error::AlreadyInProgress] while a mission is running and with
    /// [Error::NotConnected] when no actuator or camera handle is installed. The mission then
    /// runs in the background, this function returns as soon as the first rotation command is
    /// on its way.
    pub async fn start(&self, rows: usize, columns: usize, yaw_mode: YawMode) -> Result<()> {
        self.start_with_config(MissionConfig::new(rows, columns, yaw_mode))
            .await
    }

    /// Start a mission from a full [MissionConfig] (heading anchor, nadir row).
    pub async fn start_with_config(&self, config: MissionConfig) -> Result<()> {
        let actuator = self
            .actuator
            .lock()
            .unwrap()
            .clone()
            .ok_or(Error::NotConnected)?;
        let camera = self
            .camera
            .lock()
            .unwrap()
            .clone()
            .ok_or(Error::NotConnected)?;

        let (first, total) = {
            let mut sequencer = self.sequencer.lock().unwrap();
            let directive = sequencer.start_mission(&config)?;
            (directive, sequencer.state().total_steps)
        };

        self.abort.store(false, Relaxed);
        *self.abort_reason.lock().unwrap() = None;
        *self.failure.lock().unwrap() = None;

        debug!("mission started: {} poses, {:?} yaw", total, config.yaw_mode);
        self.notifications.post(
            NoteType::CmdExecInProgress,
            Some(format!("Panorama starting: {} poses", total)),
        );

        let task = tokio::spawn(run_mission(MissionRun {
            sequencer: self.sequencer.clone(),
            actuator,
            camera,
            notifications: self.notifications.clone(),
            abort: self.abort.clone(),
            abort_reason: self.abort_reason.clone(),
            failure: self.failure.clone(),
            first,
        }));
        *self.mission_task.lock().await = Some(task);

        Ok(())
    }

    /// Snapshot of the mission progress. Valid after the mission ended as well, holding the
    /// final counters.
    pub fn state(&self) -> MissionState {
        self.sequencer.lock().unwrap().state()
    }

    /// true while a mission is executing.
    pub fn is_in_progress(&self) -> bool {
        self.state().in_progress
    }

    /// Current phase of the mission cycle, [MissionPhase::Idle] when no mission is running.
    pub fn phase(&self) -> MissionPhase {
        self.sequencer.lock().unwrap().phase()
    }

    /// Request an early end of the running mission.
    ///
    /// The abort is observed once the command currently in flight resolves; the mission then
    /// goes idle and one `CmdError` notification carrying `reason` is posted. No-op when no
    /// mission is running.
    pub fn abort(&self, reason: &str) {
        *self.abort_reason.lock().unwrap() = Some(reason.to_owned());
        self.abort.store(true, Relaxed);
    }

    /// Wait for the running mission to end.
    ///
    /// Resolves with the final [MissionState] on completion or requested abort, and with the
    /// [Error::ActuatorFailure]/[Error::CaptureFailure] that ended the mission when it aborted
    /// on a double command failure. Resolves immediately when no mission is running.
    pub async fn wait(&self) -> Result<MissionState> {
        if let Some(task) = self.mission_task.lock().await.take() {
            task.await
                .map_err(|e| Error::SystemError(format!("mission task panicked: {}", e)))?;
        }

        match self.failure.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(self.state()),
        }
    }
}

/// Everything one mission run needs, moved into the background task.
struct MissionRun {
    sequencer: Arc<SyncMutex<MissionSequencer>>,
    actuator: Arc<dyn Actuator>,
    camera: Arc<dyn Camera>,
    notifications: NotificationCenter,
    abort: Arc<AtomicBool>,
    abort_reason: Arc<SyncMutex<Option<String>>>,
    failure: Arc<SyncMutex<Option<Error>>>,
    first: Directive,
}

async fn run_mission(run: MissionRun) {
    let mut directive = run.first;

    loop {
        if run.abort.load(Relaxed) {
            let reason = run
                .abort_reason
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| "Mission aborted".to_owned());
            let _ = run.sequencer.lock().unwrap().abort_mission(reason.clone());
            debug!("mission aborted on request: {}", reason);
            run.notifications.post(NoteType::CmdError, Some(reason));
            return;
        }

        directive = match directive {
            Directive::Rotate(pose) => {
                debug!("rotating to yaw {:.1} pitch {:.1}", pose.yaw, pose.pitch);
                let outcome = run.actuator.rotate(pose.yaw, pose.pitch).await;

                let mut sequencer = run.sequencer.lock().unwrap();
                let next = sequencer.on_rotation_result(outcome);
                if outcome.is_success() {
                    let note = match sequencer.state().yaw_mode {
                        YawMode::Gimbal => NoteType::GimbalRotated,
                        YawMode::Aircraft => NoteType::AircraftRotated,
                    };
                    run.notifications.post(note, None);
                } else {
                    warn!("rotation returned {:?} at yaw {:.1} pitch {:.1}", outcome, pose.yaw, pose.pitch);
                }
                next
            }
            Directive::Capture => {
                let outcome = run.camera.capture_photo().await;

                let mut sequencer = run.sequencer.lock().unwrap();
                let next = sequencer.on_capture_result(outcome);
                if outcome.is_success() {
                    let state = sequencer.state();
                    run.notifications.post(
                        NoteType::CmdExecInProgress,
                        Some(format!(
                            "Captured {}/{}",
                            state.completed_steps, state.total_steps
                        )),
                    );
                } else {
                    warn!("capture returned {:?}", outcome);
                }
                next
            }
            Directive::Complete => {
                debug!("mission complete");
                run.notifications
                    .post(NoteType::CmdSuccess, Some("Panorama complete".to_owned()));
                return;
            }
            Directive::Abort(reason) => {
                let (note, message, error) = describe_abort(reason);
                warn!("mission aborted: {}", message);
                *run.failure.lock().unwrap() = error;
                run.notifications.post(note, Some(message));
                return;
            }
        };
    }
}

/// Map an abort onto its notification severity and API error.
///
/// A double `Failure` outcome left the system consistent and posts `CmdFailed`, a double
/// `Error` outcome or a requested abort posts `CmdError`. Exactly one notification is posted
/// per abort.
fn describe_abort(reason: AbortReason) -> (NoteType, String, Option<Error>) {
    match reason {
        AbortReason::Actuator(outcome) => {
            let message = "Rotation failed twice, mission aborted".to_owned();
            let note = severity(outcome);
            (note, message.clone(), Some(Error::ActuatorFailure(message)))
        }
        AbortReason::Capture(outcome) => {
            let message = "Photo capture failed twice, mission aborted".to_owned();
            let note = severity(outcome);
            (note, message.clone(), Some(Error::CaptureFailure(message)))
        }
        AbortReason::Requested(reason) => (NoteType::CmdError, reason, None),
    }
}

fn severity(outcome: CommandOutcome) -> NoteType {
    match outcome {
        CommandOutcome::Error => NoteType::CmdError,
        _ => NoteType::CmdFailed,
    }
}
