//! Trajectory configuration record and its validation

use crate::error::{ConfigField, InvalidField, ParameterError, Result, TrajectoryError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape of the generated path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrajectoryType {
    Straight,
    Circle,
}

impl TrajectoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrajectoryType::Straight => "straight",
            TrajectoryType::Circle => "circle",
        }
    }
}

impl fmt::Display for TrajectoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrajectoryType {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "straight" => Ok(TrajectoryType::Straight),
            "circle" => Ok(TrajectoryType::Circle),
            _ => Err(ParameterError::UnknownTrajectoryType(s.to_string())),
        }
    }
}

/// Static description of the trajectory to spoof.
///
/// `length` is only read for [`TrajectoryType::Straight`] and `radius` only
/// for [`TrajectoryType::Circle`]; the unused one is never validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryConfiguration {
    pub speed_ramp_on: bool,
    pub target_speed: f64,
    pub num_of_points: usize,
    pub trajectory_type: TrajectoryType,
    pub length: f64,
    pub radius: f64,
}

impl TrajectoryConfiguration {
    /// Straight line of `length` metres along +x
    pub fn straight(length: f64, num_of_points: usize, target_speed: f64) -> Self {
        TrajectoryConfiguration {
            speed_ramp_on: false,
            target_speed,
            num_of_points,
            trajectory_type: TrajectoryType::Straight,
            length,
            radius: 0.0,
        }
    }

    /// Full counter-clockwise revolution of `radius` metres
    pub fn circle(radius: f64, num_of_points: usize, target_speed: f64) -> Self {
        TrajectoryConfiguration {
            speed_ramp_on: false,
            target_speed,
            num_of_points,
            trajectory_type: TrajectoryType::Circle,
            length: 0.0,
            radius,
        }
    }

    /// Enable or disable the speed ramp
    pub fn with_speed_ramp(mut self, on: bool) -> Self {
        self.speed_ramp_on = on;
        self
    }

    /// Check every field, reporting all failures at once
    pub fn validate(&self) -> Result<()> {
        let mut fields = Vec::new();

        if self.num_of_points < 2 {
            fields.push(InvalidField::new(
                ConfigField::NumOfPoints,
                format!("must be at least 2, got {}", self.num_of_points),
            ));
        }

        if !self.target_speed.is_finite() {
            fields.push(InvalidField::new(
                ConfigField::TargetSpeed,
                format!("must be finite, got {}", self.target_speed),
            ));
        } else if self.target_speed < 0.0 {
            fields.push(InvalidField::new(
                ConfigField::TargetSpeed,
                format!("must be non-negative, got {}", self.target_speed),
            ));
        }

        match self.trajectory_type {
            TrajectoryType::Straight => check_dimension(ConfigField::Length, self.length, &mut fields),
            TrajectoryType::Circle => check_dimension(ConfigField::Radius, self.radius, &mut fields),
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(TrajectoryError::InvalidConfiguration { fields })
        }
    }

    /// Arc length of the last point
    pub fn total_length(&self) -> f64 {
        match self.trajectory_type {
            TrajectoryType::Straight => self.length,
            TrajectoryType::Circle => std::f64::consts::TAU * self.radius,
        }
    }
}

fn check_dimension(field: ConfigField, value: f64, fields: &mut Vec<InvalidField>) {
    if !value.is_finite() {
        fields.push(InvalidField::new(field, format!("must be finite, got {}", value)));
    } else if value <= 0.0 {
        fields.push(InvalidField::new(field, format!("must be positive, got {}", value)));
    }
}
