//! # Drone subsystems
//!
//! The functionalities of the drone are organized in logical subsystems that are greatly
//! independent and each have one logical role: the mission subsystem sequences the panorama
//! capture, the telemetry subsystem carries display values pushed by the flight stack.
//!
//! Modules here implement the Rust API for the different subsystems, they are the main way to
//! interact with the drone. Subsystem objects are obtained as public fields of the
//! [Drone](crate::Drone) struct.

pub mod mission;
pub mod telemetry;

pub(crate) mod sequencer;
