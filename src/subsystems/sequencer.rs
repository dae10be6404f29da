//! Panorama mission state machine.
//!
//! The sequencer is the synchronous core of the mission subsystem: it owns the grid cursor and
//! the progress counters, consumes command outcomes and answers with the next directive to
//! execute. It issues no command itself and holds no device handle, which keeps every
//! transition testable without a runtime. The async driver in
//! [mission](crate::subsystems::mission) feeds it.

use crate::device::CommandOutcome;
use crate::grid::{MissionConfig, MissionGrid, Pose, YawMode};
use crate::{Error, Result};

/// Where the mission is in its `Idle -> Rotating -> Capturing` cycle.
///
/// Capture is always preceded by a rotation success, no phase is ever skipped. `Idle` is both
/// the initial and the terminal phase, a completed and an aborted mission are told apart by
/// the final [MissionState].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionPhase {
    /// No mission running.
    Idle,
    /// A rotation command is outstanding for the current pose.
    Rotating,
    /// A photo capture command is outstanding for the current pose.
    Capturing,
}

/// Progress cursor of the running (or last) mission.
///
/// Owned exclusively by the sequencer, readable as a snapshot through
/// [Mission::state()](crate::subsystems::mission::Mission::state).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissionState {
    /// Pitch row of the current pose.
    pub current_row: usize,
    /// Yaw column of the current pose.
    pub current_column: usize,
    /// Number of poses in the grid.
    pub total_steps: usize,
    /// Number of photos captured so far. Never exceeds `total_steps`.
    pub completed_steps: usize,
    /// true from mission start until completion or abort.
    pub in_progress: bool,
    /// Actuator performing the yaw rotations.
    pub yaw_mode: YawMode,
}

impl Default for MissionState {
    fn default() -> Self {
        Self {
            current_row: 0,
            current_column: 0,
            total_steps: 0,
            completed_steps: 0,
            in_progress: false,
            yaw_mode: YawMode::Gimbal,
        }
    }
}

/// Next action the driver has to take after feeding an outcome to the sequencer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Directive {
    /// Issue a rotation command toward the pose.
    Rotate(Pose),
    /// Trigger a photo capture at the current pose.
    Capture,
    /// The grid is exhausted, the mission completed.
    Complete,
    /// The mission ended early.
    Abort(AbortReason),
}

/// Why a mission ended before the grid was exhausted.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AbortReason {
    /// A rotation command failed twice in a row at the same pose.
    Actuator(CommandOutcome),
    /// A capture command failed twice in a row at the same pose.
    Capture(CommandOutcome),
    /// The application asked for the abort.
    Requested(String),
}

/// The mission state machine. One instance lives inside the mission subsystem and is reused
/// across mission runs.
pub(crate) struct MissionSequencer {
    grid: Option<MissionGrid>,
    state: MissionState,
    phase: MissionPhase,
    cursor: usize,
    retried: bool,
}

impl MissionSequencer {
    pub fn new() -> Self {
        Self {
            grid: None,
            state: MissionState::default(),
            phase: MissionPhase::Idle,
            cursor: 0,
            retried: false,
        }
    }

    /// Begin a new mission: compute the grid, reset the cursor and direct the first rotation.
    ///
    /// Fails with [Error::AlreadyInProgress] while a mission is running, leaving the existing
    /// state untouched.
    pub fn start_mission(&mut self, config: &MissionConfig) -> Result<Directive> {
        if self.state.in_progress {
            return Err(Error::AlreadyInProgress);
        }

        let grid = MissionGrid::compute(config)?;
        let first = grid
            .pose(0)
            .ok_or_else(|| Error::InvalidArgument("empty mission grid".to_owned()))?;

        self.state = MissionState {
            current_row: 0,
            current_column: 0,
            total_steps: grid.len(),
            completed_steps: 0,
            in_progress: true,
            yaw_mode: config.yaw_mode,
        };
        self.grid = Some(grid);
        self.cursor = 0;
        self.retried = false;
        self.phase = MissionPhase::Rotating;

        Ok(Directive::Rotate(first))
    }

    /// Consume the completion of the outstanding rotation command.
    ///
    /// Success moves on to the capture of the current pose. A failed rotation is re-issued
    /// once, the second consecutive failure aborts the whole mission. No pose is ever skipped.
    pub fn on_rotation_result(&mut self, outcome: CommandOutcome) -> Directive {
        debug_assert_eq!(self.phase, MissionPhase::Rotating);

        if outcome.is_success() {
            self.retried = false;
            self.phase = MissionPhase::Capturing;
            return Directive::Capture;
        }

        if !self.retried {
            self.retried = true;
            return Directive::Rotate(self.current_pose());
        }

        self.finish();
        Directive::Abort(AbortReason::Actuator(outcome))
    }

    /// Consume the completion of the outstanding capture command.
    ///
    /// Success counts the photo and advances the cursor. Same retry rule as rotations: one
    /// silent retry, then abort.
    pub fn on_capture_result(&mut self, outcome: CommandOutcome) -> Directive {
        debug_assert_eq!(self.phase, MissionPhase::Capturing);

        if outcome.is_success() {
            self.retried = false;
            self.state.completed_steps += 1;
            return self.advance_to_next_pose();
        }

        if !self.retried {
            self.retried = true;
            return Directive::Capture;
        }

        self.finish();
        Directive::Abort(AbortReason::Capture(outcome))
    }

    /// Move the cursor to the next pose, or complete the mission when the grid is exhausted.
    pub fn advance_to_next_pose(&mut self) -> Directive {
        let grid = match &self.grid {
            Some(grid) => grid,
            None => return Directive::Complete,
        };

        self.cursor += 1;
        match grid.pose(self.cursor) {
            Some(pose) => {
                let (row, column) = grid.position(self.cursor);
                self.state.current_row = row;
                self.state.current_column = column;
                self.phase = MissionPhase::Rotating;
                Directive::Rotate(pose)
            }
            None => {
                self.finish();
                Directive::Complete
            }
        }
    }

    /// Terminate the mission early on request.
    pub fn abort_mission(&mut self, reason: impl Into<String>) -> Directive {
        self.finish();
        Directive::Abort(AbortReason::Requested(reason.into()))
    }

    pub fn state(&self) -> MissionState {
        self.state
    }

    pub fn phase(&self) -> MissionPhase {
        self.phase
    }

    fn current_pose(&self) -> Pose {
        // The cursor only ever points at a valid pose while a mission is in progress
        self.grid
            .as_ref()
            .and_then(|grid| grid.pose(self.cursor))
            .unwrap_or(Pose { yaw: 0.0, pitch: 0.0 })
    }

    fn finish(&mut self) {
        self.phase = MissionPhase::Idle;
        self.state.in_progress = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(rows: usize, columns: usize) -> (MissionSequencer, Directive) {
        let mut sequencer = MissionSequencer::new();
        let directive = sequencer
            .start_mission(&MissionConfig::new(rows, columns, YawMode::Gimbal))
            .unwrap();
        (sequencer, directive)
    }

    #[test]
    fn start_directs_first_rotation() {
        let (sequencer, directive) = started(3, 4);

        assert!(matches!(directive, Directive::Rotate(_)));
        assert_eq!(sequencer.phase(), MissionPhase::Rotating);

        let state = sequencer.state();
        assert!(state.in_progress);
        assert_eq!(state.total_steps, 12);
        assert_eq!(state.completed_steps, 0);
        assert_eq!((state.current_row, state.current_column), (0, 0));
    }

    #[test]
    fn start_while_in_progress_is_rejected_and_state_untouched() {
        let (mut sequencer, _) = started(3, 4);
        let before = sequencer.state();

        let result = sequencer.start_mission(&MissionConfig::new(2, 2, YawMode::Aircraft));

        assert!(matches!(result, Err(Error::AlreadyInProgress)));
        assert_eq!(sequencer.state(), before);
        assert_eq!(sequencer.phase(), MissionPhase::Rotating);
    }

    #[test]
    fn full_grid_traversal_completes_after_rows_times_columns_cycles() {
        let (mut sequencer, mut directive) = started(3, 4);

        for step in 0..12 {
            assert!(matches!(directive, Directive::Rotate(_)), "step {}", step);
            assert_eq!(sequencer.on_rotation_result(CommandOutcome::Success), Directive::Capture);
            directive = sequencer.on_capture_result(CommandOutcome::Success);
            assert_eq!(sequencer.state().completed_steps, step + 1);
        }

        assert_eq!(directive, Directive::Complete);
        assert_eq!(sequencer.phase(), MissionPhase::Idle);
        let state = sequencer.state();
        assert!(!state.in_progress);
        assert_eq!(state.completed_steps, 12);
        assert_eq!(state.total_steps, 12);
    }

    #[test]
    fn rotation_failure_is_retried_at_the_same_pose() {
        let (mut sequencer, directive) = started(2, 2);
        let first = match directive {
            Directive::Rotate(pose) => pose,
            other => panic!("unexpected directive {:?}", other),
        };

        let retry = sequencer.on_rotation_result(CommandOutcome::Failure);
        assert_eq!(retry, Directive::Rotate(first));

        // Retry succeeds: exactly one capture for the pose, no double-capture
        assert_eq!(sequencer.on_rotation_result(CommandOutcome::Success), Directive::Capture);
        assert!(sequencer.state().in_progress);
    }

    #[test]
    fn second_rotation_failure_aborts_the_mission() {
        let (mut sequencer, _) = started(2, 2);

        sequencer.on_rotation_result(CommandOutcome::Failure);
        let directive = sequencer.on_rotation_result(CommandOutcome::Error);

        assert_eq!(
            directive,
            Directive::Abort(AbortReason::Actuator(CommandOutcome::Error))
        );
        assert_eq!(sequencer.phase(), MissionPhase::Idle);
        let state = sequencer.state();
        assert!(!state.in_progress);
        assert_eq!(state.completed_steps, 0);
    }

    #[test]
    fn capture_failure_is_retried_then_advances() {
        let (mut sequencer, _) = started(2, 4);

        // Walk to pose (1, 2): poses 0..=5 complete cleanly
        for _ in 0..6 {
            sequencer.on_rotation_result(CommandOutcome::Success);
            sequencer.on_capture_result(CommandOutcome::Success);
        }
        assert_eq!(
            (sequencer.state().current_row, sequencer.state().current_column),
            (1, 2)
        );
        assert_eq!(sequencer.phase(), MissionPhase::Rotating);

        sequencer.on_rotation_result(CommandOutcome::Success);

        // Capture fails once then succeeds: second capture directive, then advance to (1, 3)
        assert_eq!(sequencer.on_capture_result(CommandOutcome::Failure), Directive::Capture);
        let directive = sequencer.on_capture_result(CommandOutcome::Success);

        assert!(matches!(directive, Directive::Rotate(_)));
        assert_eq!(sequencer.state().completed_steps, 7);
        assert_eq!(
            (sequencer.state().current_row, sequencer.state().current_column),
            (1, 3)
        );
    }

    #[test]
    fn second_capture_failure_aborts_and_freezes_progress() {
        let (mut sequencer, _) = started(1, 3);

        sequencer.on_rotation_result(CommandOutcome::Success);
        sequencer.on_capture_result(CommandOutcome::Success);
        sequencer.on_rotation_result(CommandOutcome::Success);

        sequencer.on_capture_result(CommandOutcome::Failure);
        let directive = sequencer.on_capture_result(CommandOutcome::Failure);

        assert_eq!(
            directive,
            Directive::Abort(AbortReason::Capture(CommandOutcome::Failure))
        );
        // completed_steps stays at its last successful value
        assert_eq!(sequencer.state().completed_steps, 1);
        assert!(!sequencer.state().in_progress);
    }

    #[test]
    fn retry_budget_is_per_command_not_per_mission() {
        let (mut sequencer, _) = started(1, 2);

        // One rotation failure at pose 0, recovered
        sequencer.on_rotation_result(CommandOutcome::Failure);
        sequencer.on_rotation_result(CommandOutcome::Success);
        sequencer.on_capture_result(CommandOutcome::Success);

        // A single failure at pose 1 is retried again, not treated as the second strike
        let directive = sequencer.on_rotation_result(CommandOutcome::Failure);
        assert!(matches!(directive, Directive::Rotate(_)));
        assert!(sequencer.state().in_progress);
    }

    #[test]
    fn requested_abort_goes_idle_with_reason() {
        let (mut sequencer, _) = started(3, 4);

        let directive = sequencer.abort_mission("battery low");

        assert_eq!(
            directive,
            Directive::Abort(AbortReason::Requested("battery low".to_owned()))
        );
        assert_eq!(sequencer.phase(), MissionPhase::Idle);
        assert!(!sequencer.state().in_progress);
    }

    #[test]
    fn sequencer_is_reusable_after_completion() {
        let (mut sequencer, _) = started(1, 1);

        sequencer.on_rotation_result(CommandOutcome::Success);
        assert_eq!(sequencer.on_capture_result(CommandOutcome::Success), Directive::Complete);

        let directive = sequencer.start_mission(&MissionConfig::new(1, 2, YawMode::Aircraft));
        assert!(directive.is_ok());
        assert_eq!(sequencer.state().total_steps, 2);
        assert_eq!(sequencer.state().yaw_mode, YawMode::Aircraft);
    }

    #[test]
    fn completed_steps_never_exceeds_total() {
        let (mut sequencer, _) = started(2, 2);

        for _ in 0..4 {
            sequencer.on_rotation_result(CommandOutcome::Success);
            sequencer.on_capture_result(CommandOutcome::Success);
            assert!(sequencer.state().completed_steps <= sequencer.state().total_steps);
        }
        assert_eq!(sequencer.state().completed_steps, 4);
    }
}
