//! Synthetic trajectory generation for the Prometheus robot.
//!
//! [`control::trajectory`] holds the pure generator; [`node`] wraps it in a
//! lifecycle-managed node that republishes the result at a fixed period.

pub mod common;
pub mod control;
pub mod error;
pub mod lifecycle;
pub mod node;

pub use crate::control::{
    generate, Trajectory, TrajectoryConfiguration, TrajectoryGenerator, TrajectoryParameters,
    TrajectoryPoint, TrajectoryType,
};
pub use crate::error::{Result, TrajectoryError};
pub use crate::lifecycle::{LifecycleNode, State};
pub use crate::node::{TrajectoryPublisher, TrajectorySpooferNode};
