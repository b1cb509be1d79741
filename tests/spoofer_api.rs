//! End-to-end tests through the public API: launch parameters in,
//! published trajectory messages out.

use approx::assert_abs_diff_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use trajectory_spoofer::common::from_quaternion_2d;
use trajectory_spoofer::control::{parse_override, TrajectoryParameters};
use trajectory_spoofer::error::ConfigField;
use trajectory_spoofer::node::JsonLinesPublisher;
use trajectory_spoofer::{
    generate, LifecycleNode, State, TrajectoryConfiguration, TrajectoryError,
    TrajectorySpooferNode, TrajectoryType,
};

mod generator {
    use super::*;

    #[test]
    fn launch_defaults_produce_a_ten_metre_line() {
        let config = TrajectoryConfiguration::try_from(TrajectoryParameters::default()).unwrap();
        let trajectory = generate(&config).unwrap();

        assert_eq!(trajectory.len(), 100);
        assert_eq!(trajectory.total_length(), 10.0);
        assert!(trajectory.iter().all(|p| p.longitudinal_speed == 10.0));
        assert!(trajectory.iter().all(|p| p.position.y == 0.0));
    }

    #[test]
    fn circle_headings_follow_the_tangent() {
        let config = TrajectoryConfiguration::circle(21.0, 37, 10.0);
        let trajectory = generate(&config).unwrap();

        for pair in trajectory.points.windows(2) {
            let chord = pair[1].position - pair[0].position;
            let chord_heading = chord.y.atan2(chord.x).rem_euclid(std::f64::consts::TAU);
            let mid_heading = 0.5 * (pair[0].heading + pair[1].heading);
            assert_abs_diff_eq!(
                chord_heading,
                mid_heading.rem_euclid(std::f64::consts::TAU),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn heading_quaternion_round_trips_through_yaw() {
        let trajectory = generate(&TrajectoryConfiguration::circle(3.0, 9, 1.0)).unwrap();
        let quarter = &trajectory.points[2];
        assert_abs_diff_eq!(
            from_quaternion_2d(quarter.heading_quaternion()),
            quarter.heading,
            epsilon = 1e-12
        );
    }

    #[test]
    fn concurrent_callers_see_identical_trajectories() {
        let config =
            Arc::new(TrajectoryConfiguration::circle(21.0, 100, 10.0).with_speed_ramp(true));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let config = Arc::clone(&config);
                std::thread::spawn(move || generate(&config).unwrap())
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
    }
}

mod parameter_files {
    use super::*;

    #[test]
    fn shipped_default_file_matches_built_in_defaults() {
        let params =
            TrajectoryParameters::from_json(include_str!("../config/trajectory_spoofer.json"))
                .unwrap();
        assert_eq!(params, TrajectoryParameters::default());
    }

    #[test]
    fn shipped_circle_file_closes_the_loop() {
        let params =
            TrajectoryParameters::from_json(include_str!("../config/circle_ramp.json")).unwrap();
        let config = TrajectoryConfiguration::try_from(&params).unwrap();
        let trajectory = generate(&config).unwrap();

        let last = trajectory.last().unwrap();
        assert_eq!(config.trajectory_type, TrajectoryType::Circle);
        assert_abs_diff_eq!(last.position.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(last.position.y, 0.0, epsilon = 1e-9);
        assert_eq!(last.longitudinal_speed, 10.0);
    }
}

mod node {
    use super::*;

    #[test]
    fn overrides_reach_the_published_message() {
        let overrides: Vec<_> = [
            "trajectory_type:=circle",
            "radius:=2.0",
            "num_of_points:=5",
            "speed_ramp_on:=true",
            "target_speed:=4",
        ]
        .iter()
        .map(|text| parse_override(text).unwrap())
        .collect();
        let mut parameters = TrajectoryParameters::default();
        parameters.apply(&overrides).unwrap();

        let node = TrajectorySpooferNode::new("trajectory_spoofer", "map", parameters);
        node.on_configure().unwrap();
        node.on_activate().unwrap();
        assert_eq!(node.state(), State::Active);
        assert_eq!(node.configuration().unwrap().trajectory_type, TrajectoryType::Circle);

        let publisher = JsonLinesPublisher::new(Vec::new());
        assert!(node.publish_once(&publisher).unwrap());

        let output = String::from_utf8(publisher.into_inner()).unwrap();
        let message: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        let points = message["trajectory"]["points"].as_array().unwrap();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0]["longitudinal_speed"], 0.0);
        assert_eq!(points[4]["longitudinal_speed"], 4.0);
    }

    #[test]
    fn negative_speed_is_a_fatal_startup_error() {
        let mut parameters = TrajectoryParameters::default();
        let (name, value) = parse_override("target_speed:=-1").unwrap();
        parameters.set(&name, &value).unwrap();

        let node = TrajectorySpooferNode::new("trajectory_spoofer", "map", parameters);
        match node.on_configure() {
            Err(TrajectoryError::InvalidConfiguration { fields }) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, ConfigField::TargetSpeed);
            }
            other => panic!("expected invalid configuration, got {:?}", other),
        }
        assert_eq!(node.state(), State::Unconfigured);
    }

    #[tokio::test(start_paused = true)]
    async fn republishing_an_unchanged_configuration_is_stable() {
        let node = Arc::new(TrajectorySpooferNode::new(
            "trajectory_spoofer",
            "map",
            TrajectoryParameters::default(),
        ));
        node.on_configure().unwrap();
        node.on_activate().unwrap();

        let publisher = Arc::new(JsonLinesPublisher::new(Vec::new()));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(Arc::clone(&node).spin(
            publisher.clone(),
            Duration::from_millis(5),
            shutdown_rx,
        ));
        // ticks at 0, 5, 10, 15 and 20 ms
        tokio::time::sleep(Duration::from_millis(22)).await;
        shutdown_tx.send(true).unwrap();
        let published = handle.await.unwrap();

        let publisher = Arc::try_unwrap(publisher).ok().unwrap();
        let output = String::from_utf8(publisher.into_inner()).unwrap();
        let trajectories: Vec<serde_json::Value> = output
            .lines()
            .map(|line| {
                let message: serde_json::Value = serde_json::from_str(line).unwrap();
                message["trajectory"].clone()
            })
            .collect();
        assert_eq!(published, 5);
        assert_eq!(trajectories.len(), 5);
        assert!(trajectories.windows(2).all(|pair| pair[0] == pair[1]));

        node.on_deactivate().unwrap();
        node.on_cleanup().unwrap();
        node.on_shutdown().unwrap();
        assert_eq!(node.state(), State::Finalized);
    }
}
