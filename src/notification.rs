//! # Notification sink
//!
//! The mission core reports what it is doing through named notifications rather than calling
//! back into the application: connection changes, command progress, per-pose rotation results,
//! completion and failures. This is a one-way publish interface, the core never reads it back.
//! Any number of consumers can subscribe, each gets every notification posted after it
//! subscribed.

use async_broadcast::{broadcast, Receiver, Sender};
use futures::Stream;

/// Classification of a posted [Notification].
///
/// `CmdFailed` and `CmdError` carry the severity split of command outcomes: `CmdFailed` is a
/// command that failed with the system still consistent, `CmdError` an unexpected SDK error or
/// a requested abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteType {
    /// The connected product changed.
    DroneChanged,
    /// An aircraft/gimbal or camera handle was installed.
    DroneConnected,
    /// A device handle was removed.
    DroneNotConnected,
    /// A mission or command sequence started executing.
    CmdExecInProgress,
    /// A command or a whole mission completed successfully.
    CmdSuccess,
    /// A command failed after its retry, mission aborted, system consistent.
    CmdFailed,
    /// A command hit an unexpected error after its retry, or the mission was aborted on
    /// request.
    CmdError,
    /// The gimbal finished rotating to a pose.
    GimbalRotated,
    /// The aircraft body finished rotating to a pose.
    AircraftRotated,
}

/// One event posted by the core.
#[derive(Debug, Clone)]
pub struct Notification {
    /// What happened.
    pub note: NoteType,
    /// Optional human-readable detail.
    pub message: Option<String>,
}

/// # Access to the notification subsystem
///
/// Obtained from the [Drone](crate::Drone) object. Cloning is cheap and shares the same
/// underlying channel.
#[derive(Clone)]
pub struct NotificationCenter {
    sender: Sender<Notification>,
    receiver: Receiver<Notification>,
}

impl NotificationCenter {
    pub(crate) fn new() -> Self {
        let (mut sender, receiver) = broadcast(1000);
        sender.set_overflow(true);
        Self { sender, receiver }
    }

    /// Subscribe to all notifications posted from now on.
    pub fn subscribe(&self) -> impl Stream<Item = Notification> {
        self.receiver.clone()
    }

    pub(crate) fn post(&self, note: NoteType, message: Option<String>) {
        // Consumers that fell 1000 notifications behind lose the oldest ones, the mission
        // must not block on a slow UI.
        let _ = self.sender.try_broadcast(Notification { note, message });
    }
}
