//! Trajectory generation module
//!
//! Samples a straight line or a full circle into a fixed number of evenly
//! spaced points and assigns each a commanded longitudinal speed, either
//! constant or ramped linearly with arc length.

pub mod config;
pub mod point;

pub use self::config::{TrajectoryConfiguration, TrajectoryType};
pub use self::point::{Trajectory, TrajectoryPoint};

use crate::common::types::Point2D;
use crate::error::Result;
use std::f64::consts::TAU;
use std::time::Duration;
use tracing::debug;

/// A stateless trajectory generator for the robot
#[derive(Debug, Default, Clone, Copy)]
pub struct TrajectoryGenerator;

/// Position, heading and arc length of one sample before speeds are assigned
struct Sample {
    position: Point2D,
    heading: f64,
    arc_length: f64,
}

impl TrajectoryGenerator {
    /// Create a new trajectory generator
    pub fn new() -> Self {
        TrajectoryGenerator
    }

    /// Generate the trajectory described by `config`.
    ///
    /// Validation runs before any computation; the same configuration always
    /// produces the same points.
    pub fn generate(&self, config: &TrajectoryConfiguration) -> Result<Trajectory> {
        config.validate()?;

        let n = config.num_of_points;
        let segments = (n - 1) as f64;

        let samples: Vec<Sample> = (0..n)
            .map(|i| {
                let fraction = i as f64 / segments;
                match config.trajectory_type {
                    TrajectoryType::Straight => straight_sample(config.length, fraction),
                    TrajectoryType::Circle => circle_sample(config.radius, fraction),
                }
            })
            .collect();

        let speeds = assign_speeds(config, &samples);
        let times = integrate_travel_time(&samples, &speeds);

        let points = samples
            .into_iter()
            .zip(speeds)
            .zip(times)
            .map(|((sample, longitudinal_speed), time_from_start)| TrajectoryPoint {
                position: sample.position,
                heading: sample.heading,
                longitudinal_speed,
                arc_length: sample.arc_length,
                time_from_start,
            })
            .collect();

        let trajectory = Trajectory { points };
        debug!(
            trajectory_type = %config.trajectory_type,
            points = trajectory.len(),
            total_length = trajectory.total_length(),
            speed_ramp_on = config.speed_ramp_on,
            "Generated trajectory"
        );
        Ok(trajectory)
    }
}

/// Generate a trajectory with a throwaway [`TrajectoryGenerator`]
pub fn generate(config: &TrajectoryConfiguration) -> Result<Trajectory> {
    TrajectoryGenerator::new().generate(config)
}

fn straight_sample(length: f64, fraction: f64) -> Sample {
    let arc_length = length * fraction;
    Sample {
        position: Point2D::new(arc_length, 0.0),
        heading: 0.0,
        arc_length,
    }
}

// Circle centred on (0, radius), leaving the origin counter-clockwise
fn circle_sample(radius: f64, fraction: f64) -> Sample {
    let theta = TAU * fraction;
    Sample {
        position: Point2D::new(radius * theta.sin(), radius * (1.0 - theta.cos())),
        heading: theta,
        arc_length: radius * theta,
    }
}

fn assign_speeds(config: &TrajectoryConfiguration, samples: &[Sample]) -> Vec<f64> {
    let target = config.target_speed;
    if !config.speed_ramp_on {
        return vec![target; samples.len()];
    }

    let last = samples.len() - 1;
    let total = samples[last].arc_length;
    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            if i == last {
                // exact terminal speed regardless of rounding in the ramp
                target
            } else {
                target * sample.arc_length / total
            }
        })
        .collect()
}

/// Travel time to each sample assuming constant acceleration between samples
fn integrate_travel_time(samples: &[Sample], speeds: &[f64]) -> Vec<Option<Duration>> {
    let mut elapsed = Some(Duration::ZERO);
    let mut times = Vec::with_capacity(samples.len());

    for i in 0..samples.len() {
        if i > 0 {
            elapsed = elapsed.and_then(|t| {
                let ds = samples[i].arc_length - samples[i - 1].arc_length;
                let mean_speed = 0.5 * (speeds[i - 1] + speeds[i]);
                if mean_speed > 0.0 {
                    Duration::try_from_secs_f64(ds / mean_speed)
                        .ok()
                        .and_then(|dt| t.checked_add(dt))
                } else {
                    None
                }
            });
        }
        times.push(elapsed);
    }

    times
}
