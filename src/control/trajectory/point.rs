//! Trajectory sample and sequence types

use crate::common::types::{Point2D, Quaternion2D};
use crate::common::to_quaternion_2d;
use serde::Serialize;
use std::time::Duration;

/// One sample of a generated trajectory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    pub position: Point2D,
    /// Tangent direction in radians
    pub heading: f64,
    pub longitudinal_speed: f64,
    /// Distance travelled from the first point
    pub arc_length: f64,
    /// Travel time from the first point, `None` once the vehicle would have stopped
    pub time_from_start: Option<Duration>,
}

impl TrajectoryPoint {
    /// Heading as a 2D quaternion
    pub fn heading_quaternion(&self) -> Quaternion2D {
        to_quaternion_2d(self.heading)
    }
}

/// Ordered sequence of trajectory points
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trajectory {
    pub points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&TrajectoryPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TrajectoryPoint> {
        self.points.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrajectoryPoint> {
        self.points.iter()
    }

    /// Arc length of the final point, zero when empty
    pub fn total_length(&self) -> f64 {
        self.last().map_or(0.0, |p| p.arc_length)
    }

    /// Travel time to the final point, if every segment has a non-zero speed
    pub fn duration(&self) -> Option<Duration> {
        self.last().and_then(|p| p.time_from_start)
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectoryPoint;
    type IntoIter = std::slice::Iter<'a, TrajectoryPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
