//! # Vendor device interfaces
//!
//! The flight stack, gimbal servo and camera live in the vendor SDK. This module defines the
//! two async traits the mission sequencer drives them through, and the tri-state outcome their
//! completion callbacks are summarized into. The application implements the traits on top of
//! the SDK bindings and installs them on the [Drone](crate::Drone) object.

use async_trait::async_trait;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Summary of an asynchronous vendor command completion.
///
/// The three values are kept apart on purpose: [CommandOutcome::Failure] means the command did
/// not succeed but the system is consistent (retry-eligible), [CommandOutcome::Error] is an
/// unexpected error from the SDK. The raw values match the vendor status codes so the SDK glue
/// can decode a completion byte with `CommandOutcome::try_from(raw)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum CommandOutcome {
    /// Command failed, system consistent. A single automatic retry is attempted.
    Failure = 0,
    /// Unexpected error reported by the SDK.
    Error = 1,
    /// Command completed successfully.
    Success = 2,
}

impl CommandOutcome {
    /// true for [CommandOutcome::Success]
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Success)
    }
}

/// Rotation actuator: the gimbal or the aircraft yaw controller.
///
/// `rotate` resolves when the vendor SDK signals command completion. The mission driver keeps
/// a single rotation or capture command in flight at any time, implementations can assume no
/// concurrent calls.
#[async_trait]
pub trait Actuator: Send + Sync {
    /// Rotate to the given yaw and pitch, both in degrees. Yaw is the heading to face
    /// (0..360), pitch is negative-down (0 level, -90 straight down).
    async fn rotate(&self, yaw: f32, pitch: f32) -> CommandOutcome;
}

/// Still camera interface.
#[async_trait]
pub trait Camera: Send + Sync {
    /// Trigger a single photo capture, resolving when the shot is confirmed or failed.
    async fn capture_photo(&self) -> CommandOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn outcome_decodes_from_vendor_status_codes() {
        assert_eq!(CommandOutcome::try_from(0u8).unwrap(), CommandOutcome::Failure);
        assert_eq!(CommandOutcome::try_from(1u8).unwrap(), CommandOutcome::Error);
        assert_eq!(CommandOutcome::try_from(2u8).unwrap(), CommandOutcome::Success);
        assert!(CommandOutcome::try_from(3u8).is_err());
    }

    #[test]
    fn only_success_is_success() {
        assert!(CommandOutcome::Success.is_success());
        assert!(!CommandOutcome::Failure.is_success());
        assert!(!CommandOutcome::Error.is_success());
    }
}
