//! # Mission grid
//!
//! A panorama mission visits a precomputed matrix of (yaw, pitch) poses: pitch rows times yaw
//! columns, traversed row-major. The grid is immutable once computed and regenerated at every
//! mission start from the configured row/column counts.

use crate::{Error, Result};

/// Which physical actuator performs the yaw rotation during a mission.
///
/// Selected once at mission configuration time and fixed for the mission's duration. Only the
/// gimbal pitch axis is used in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YawMode {
    /// Yaw by rotating the aircraft body.
    Aircraft,
    /// Yaw by rotating the gimbal, the aircraft keeps its heading.
    Gimbal,
}

/// One yaw/pitch target of the mission grid, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Heading to face, 0..360 degrees.
    pub yaw: f32,
    /// Gimbal pitch, 0 is level and -90 straight down.
    pub pitch: f32,
}

/// Panorama mission configuration.
///
/// The plain `rows`/`columns`/`yaw_mode` constructor covers the common case. `heading` offsets
/// every yaw column so the panorama can be anchored to the aircraft's current compass heading,
/// and `nadir_count` appends one extra row of straight-down shots with its own yaw spacing.
#[derive(Debug, Clone, Copy)]
pub struct MissionConfig {
    /// Number of pitch rows.
    pub rows: usize,
    /// Number of yaw columns per pitch row.
    pub columns: usize,
    /// Actuator performing the yaw rotations.
    pub yaw_mode: YawMode,
    /// Compass heading (degrees) the first column is relative to.
    pub heading: f32,
    /// Number of extra straight-down (-90 pitch) poses appended after the main grid.
    pub nadir_count: usize,
}

impl MissionConfig {
    /// Standard mission: `rows` x `columns` poses, no nadir row, heading 0.
    pub fn new(rows: usize, columns: usize, yaw_mode: YawMode) -> Self {
        Self {
            rows,
            columns,
            yaw_mode,
            heading: 0.0,
            nadir_count: 0,
        }
    }

    /// Anchor the yaw columns to the given compass heading (degrees).
    pub fn with_heading(mut self, heading: f32) -> Self {
        self.heading = heading;
        self
    }

    /// Append `count` straight-down poses after the main grid.
    pub fn with_nadir_count(mut self, count: usize) -> Self {
        self.nadir_count = count;
        self
    }
}

/// Ordered sequence of poses visited during a panorama, row-major.
#[derive(Debug, Clone)]
pub struct MissionGrid {
    poses: Vec<Pose>,
    rows: usize,
    columns: usize,
    nadir_count: usize,
}

impl MissionGrid {
    /// Compute the grid for a mission configuration.
    ///
    /// Pitch rows descend from level toward straight down in `90/rows` degree steps, yaw
    /// columns step `360/columns` degrees from the configured heading. Fails with
    /// [Error::InvalidArgument] when rows or columns is zero.
    pub fn compute(config: &MissionConfig) -> Result<Self> {
        if config.rows == 0 {
            return Err(Error::InvalidArgument("rows must be > 0".to_owned()));
        }
        if config.columns == 0 {
            return Err(Error::InvalidArgument("columns must be > 0".to_owned()));
        }

        let pitches = pitch_angles(config.rows);
        let yaws = yaw_angles(config.columns, config.heading);

        let mut poses = Vec::with_capacity(config.rows * config.columns + config.nadir_count);
        for &pitch in &pitches {
            for &yaw in &yaws {
                poses.push(Pose { yaw, pitch });
            }
        }

        for &yaw in &yaw_angles(config.nadir_count, config.heading) {
            poses.push(Pose { yaw, pitch: -90.0 });
        }

        Ok(Self {
            poses,
            rows: config.rows,
            columns: config.columns,
            nadir_count: config.nadir_count,
        })
    }

    /// Total number of poses, nadir row included.
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// true when the grid holds no pose.
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Number of pitch rows of the main grid.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of yaw columns per pitch row.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Pose at the given traversal index, `None` past the end.
    pub fn pose(&self, index: usize) -> Option<Pose> {
        self.poses.get(index).copied()
    }

    /// (row, column) of a traversal index. The nadir row, when present, is row `rows()`.
    pub fn position(&self, index: usize) -> (usize, usize) {
        let main = self.rows * self.columns;
        if index < main {
            (index / self.columns, index % self.columns)
        } else {
            (self.rows, index - main)
        }
    }

    /// Iterate over the poses in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = &Pose> {
        self.poses.iter()
    }

    /// Number of straight-down poses appended after the main grid.
    pub fn nadir_count(&self) -> usize {
        self.nadir_count
    }
}

fn pitch_angles(rows: usize) -> Vec<f32> {
    let interval = 90.0 / rows as f32;
    (0..rows).map(|row| -(interval * row as f32)).collect()
}

fn yaw_angles(columns: usize, heading: f32) -> Vec<f32> {
    if columns == 0 {
        return Vec::new();
    }
    let step = 360.0 / columns as f32;
    (0..columns)
        .map(|column| heading + step * (column + 1) as f32)
        .map(|angle| if angle > 360.0 { angle - 360.0 } else { angle })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_rows_times_columns() {
        let grid = MissionGrid::compute(&MissionConfig::new(3, 4, YawMode::Gimbal)).unwrap();
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.columns(), 4);
    }

    #[test]
    fn pitch_rows_descend_from_level() {
        let grid = MissionGrid::compute(&MissionConfig::new(3, 4, YawMode::Gimbal)).unwrap();
        let pitches: Vec<f32> = (0..3).map(|row| grid.pose(row * 4).unwrap().pitch).collect();
        assert_eq!(pitches, vec![0.0, -30.0, -60.0]);
    }

    #[test]
    fn yaw_columns_step_around_the_circle() {
        let grid = MissionGrid::compute(&MissionConfig::new(1, 4, YawMode::Aircraft)).unwrap();
        let yaws: Vec<f32> = grid.iter().map(|pose| pose.yaw).collect();
        assert_eq!(yaws, vec![90.0, 180.0, 270.0, 360.0]);
    }

    #[test]
    fn traversal_is_row_major() {
        let grid = MissionGrid::compute(&MissionConfig::new(2, 3, YawMode::Gimbal)).unwrap();
        // All columns of row 0 share the row pitch
        for column in 0..3 {
            assert_eq!(grid.pose(column).unwrap().pitch, 0.0);
        }
        for column in 0..3 {
            assert_eq!(grid.pose(3 + column).unwrap().pitch, -45.0);
        }
        assert_eq!(grid.position(0), (0, 0));
        assert_eq!(grid.position(4), (1, 1));
    }

    #[test]
    fn heading_offsets_and_wraps_yaw() {
        let config = MissionConfig::new(1, 4, YawMode::Aircraft).with_heading(300.0);
        let grid = MissionGrid::compute(&config).unwrap();
        let yaws: Vec<f32> = grid.iter().map(|pose| pose.yaw).collect();
        assert_eq!(yaws, vec![30.0, 120.0, 210.0, 300.0]);
    }

    #[test]
    fn nadir_row_is_appended_straight_down() {
        let config = MissionConfig::new(2, 4, YawMode::Gimbal).with_nadir_count(2);
        let grid = MissionGrid::compute(&config).unwrap();
        assert_eq!(grid.len(), 10);
        assert_eq!(grid.pose(8).unwrap(), Pose { yaw: 180.0, pitch: -90.0 });
        assert_eq!(grid.pose(9).unwrap(), Pose { yaw: 360.0, pitch: -90.0 });
        // Nadir poses sit on their own row after the main grid
        assert_eq!(grid.position(8), (2, 0));
        assert_eq!(grid.position(9), (2, 1));
    }

    #[test]
    fn zero_sized_grids_are_rejected() {
        assert!(matches!(
            MissionGrid::compute(&MissionConfig::new(0, 4, YawMode::Gimbal)),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            MissionGrid::compute(&MissionConfig::new(3, 0, YawMode::Gimbal)),
            Err(Error::InvalidArgument(_))
        ));
    }
}
