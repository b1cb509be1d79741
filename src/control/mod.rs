//! Control module: trajectory generation and its launch parameters
pub mod parameters;
pub mod trajectory;

pub use self::parameters::{parse_override, ParameterValue, TrajectoryParameters};
pub use self::trajectory::{
    generate, Trajectory, TrajectoryConfiguration, TrajectoryGenerator, TrajectoryPoint,
    TrajectoryType,
};
