//! Launch parameters for the trajectory spoofer
//!
//! Parameters arrive loosely typed, either from a JSON parameter file or as
//! `name:=value` overrides, and are checked once when converted into a
//! [`TrajectoryConfiguration`].

use super::trajectory::{TrajectoryConfiguration, TrajectoryType};
use crate::error::{ConfigField, InvalidField, ParameterError, Result, TrajectoryError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single loosely typed parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
}

impl ParameterValue {
    /// Parse a textual value the way a launch-time override is read
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text {
            "true" | "True" => return ParameterValue::Bool(true),
            "false" | "False" => return ParameterValue::Bool(false),
            _ => {}
        }
        if let Ok(value) = text.parse::<i64>() {
            return ParameterValue::Integer(value);
        }
        if let Ok(value) = text.parse::<f64>() {
            return ParameterValue::Double(value);
        }
        let unquoted = text
            .strip_prefix('\'')
            .and_then(|t| t.strip_suffix('\''))
            .or_else(|| text.strip_prefix('"').and_then(|t| t.strip_suffix('"')))
            .unwrap_or(text);
        ParameterValue::String(unquoted.to_string())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterValue::Bool(_) => "bool",
            ParameterValue::Integer(_) => "integer",
            ParameterValue::Double(_) => "double",
            ParameterValue::String(_) => "string",
        }
    }

    fn mismatch(&self, name: &str, expected: &'static str) -> ParameterError {
        ParameterError::TypeMismatch {
            name: name.to_string(),
            expected,
            actual: self.type_name(),
        }
    }

    fn as_bool(&self, name: &str) -> Result<bool, ParameterError> {
        match self {
            ParameterValue::Bool(value) => Ok(*value),
            other => Err(other.mismatch(name, "bool")),
        }
    }

    fn as_integer(&self, name: &str) -> Result<i64, ParameterError> {
        match self {
            ParameterValue::Integer(value) => Ok(*value),
            other => Err(other.mismatch(name, "integer")),
        }
    }

    // Integers widen to doubles, as `target_speed: 10` is common in launch files
    fn as_double(&self, name: &str) -> Result<f64, ParameterError> {
        match self {
            ParameterValue::Double(value) => Ok(*value),
            ParameterValue::Integer(value) => Ok(*value as f64),
            other => Err(other.mismatch(name, "double")),
        }
    }

    fn as_string(&self, name: &str) -> Result<String, ParameterError> {
        match self {
            ParameterValue::String(value) => Ok(value.clone()),
            other => Err(other.mismatch(name, "string")),
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Bool(value) => write!(f, "{}", value),
            ParameterValue::Integer(value) => write!(f, "{}", value),
            ParameterValue::Double(value) => write!(f, "{}", value),
            ParameterValue::String(value) => write!(f, "'{}'", value),
        }
    }
}

/// Split a `name:=value` override into its parts
pub fn parse_override(text: &str) -> Result<(String, ParameterValue), ParameterError> {
    match text.split_once(":=") {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), ParameterValue::parse(value)))
        }
        _ => Err(ParameterError::MalformedOverride(text.to_string())),
    }
}

/// Raw parameter record as declared by the launch description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrajectoryParameters {
    pub speed_ramp_on: bool,
    pub target_speed: f64,
    pub num_of_points: i64,
    /// `straight` or `circle`
    pub trajectory_type: String,
    /// Only used for straight
    pub length: f64,
    /// Only used for circle
    pub radius: f64,
}

impl Default for TrajectoryParameters {
    fn default() -> Self {
        TrajectoryParameters {
            speed_ramp_on: false,
            target_speed: 10.0,
            num_of_points: 100,
            trajectory_type: TrajectoryType::Straight.as_str().to_string(),
            length: 10.0,
            radius: 21.0,
        }
    }
}

impl TrajectoryParameters {
    /// Names of every recognised parameter
    pub const NAMES: [&'static str; 6] = [
        "speed_ramp_on",
        "target_speed",
        "num_of_points",
        "trajectory_type",
        "length",
        "radius",
    ];

    /// Load a JSON parameter file; missing keys keep their defaults
    pub fn from_json(text: &str) -> Result<Self, ParameterError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Override a single named parameter
    pub fn set(&mut self, name: &str, value: &ParameterValue) -> Result<(), ParameterError> {
        match name {
            "speed_ramp_on" => self.speed_ramp_on = value.as_bool(name)?,
            "target_speed" => self.target_speed = value.as_double(name)?,
            "num_of_points" => self.num_of_points = value.as_integer(name)?,
            "trajectory_type" => self.trajectory_type = value.as_string(name)?,
            "length" => self.length = value.as_double(name)?,
            "radius" => self.radius = value.as_double(name)?,
            _ => return Err(ParameterError::Unknown(name.to_string())),
        }
        Ok(())
    }

    /// Apply a batch of overrides in order
    pub fn apply<'a, I>(&mut self, overrides: I) -> Result<(), ParameterError>
    where
        I: IntoIterator<Item = &'a (String, ParameterValue)>,
    {
        for (name, value) in overrides {
            self.set(name, value)?;
        }
        Ok(())
    }
}

impl TryFrom<&TrajectoryParameters> for TrajectoryConfiguration {
    type Error = TrajectoryError;

    fn try_from(params: &TrajectoryParameters) -> Result<Self> {
        let trajectory_type = params.trajectory_type.parse::<TrajectoryType>()?;
        let num_of_points = usize::try_from(params.num_of_points).ok();

        let config = TrajectoryConfiguration {
            speed_ramp_on: params.speed_ramp_on,
            target_speed: params.target_speed,
            num_of_points: num_of_points.unwrap_or(0),
            trajectory_type,
            length: params.length,
            radius: params.radius,
        };

        let validation = config.validate();
        if num_of_points.is_some() {
            return validation.map(|()| config);
        }

        // keep the caller's negative count in the report
        let mut fields = vec![InvalidField::new(
            ConfigField::NumOfPoints,
            format!("must be at least 2, got {}", params.num_of_points),
        )];
        if let Err(err) = validation {
            fields.extend(
                err.invalid_fields()
                    .iter()
                    .filter(|f| f.field != ConfigField::NumOfPoints)
                    .cloned(),
            );
        }
        Err(TrajectoryError::InvalidConfiguration { fields })
    }
}

impl TryFrom<TrajectoryParameters> for TrajectoryConfiguration {
    type Error = TrajectoryError;

    fn try_from(params: TrajectoryParameters) -> Result<Self> {
        TrajectoryConfiguration::try_from(&params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_launch_description() {
        let config = TrajectoryConfiguration::try_from(TrajectoryParameters::default()).unwrap();
        assert!(!config.speed_ramp_on);
        assert_eq!(config.target_speed, 10.0);
        assert_eq!(config.num_of_points, 100);
        assert_eq!(config.trajectory_type, TrajectoryType::Straight);
        assert_eq!(config.length, 10.0);
        assert_eq!(config.radius, 21.0);
    }

    #[test]
    fn parse_values() {
        assert_eq!(ParameterValue::parse("true"), ParameterValue::Bool(true));
        assert_eq!(ParameterValue::parse("False"), ParameterValue::Bool(false));
        assert_eq!(ParameterValue::parse("100"), ParameterValue::Integer(100));
        assert_eq!(ParameterValue::parse("-3"), ParameterValue::Integer(-3));
        assert_eq!(ParameterValue::parse("21.5"), ParameterValue::Double(21.5));
        assert_eq!(
            ParameterValue::parse("'circle'"),
            ParameterValue::String("circle".to_string())
        );
        assert_eq!(
            ParameterValue::parse("straight"),
            ParameterValue::String("straight".to_string())
        );
    }

    #[test]
    fn parse_override_splits_name_and_value() {
        let (name, value) = parse_override("radius:=3.5").unwrap();
        assert_eq!(name, "radius");
        assert_eq!(value, ParameterValue::Double(3.5));

        assert!(matches!(
            parse_override("radius=3.5"),
            Err(ParameterError::MalformedOverride(_))
        ));
        assert!(matches!(
            parse_override(":=3.5"),
            Err(ParameterError::MalformedOverride(_))
        ));
    }

    #[test]
    fn set_checks_names_and_types() {
        let mut params = TrajectoryParameters::default();
        params.set("target_speed", &ParameterValue::Integer(4)).unwrap();
        assert_eq!(params.target_speed, 4.0);

        let err = params
            .set("num_of_points", &ParameterValue::Double(2.5))
            .unwrap_err();
        assert!(matches!(
            err,
            ParameterError::TypeMismatch { expected: "integer", actual: "double", .. }
        ));

        assert!(matches!(
            params.set("wheel_base", &ParameterValue::Double(1.0)),
            Err(ParameterError::Unknown(name)) if name == "wheel_base"
        ));
    }

    #[test]
    fn apply_overrides_in_order() {
        let overrides = vec![
            parse_override("trajectory_type:=circle").unwrap(),
            parse_override("radius:=5").unwrap(),
            parse_override("speed_ramp_on:=true").unwrap(),
            parse_override("radius:=6.0").unwrap(),
        ];
        let mut params = TrajectoryParameters::default();
        params.apply(&overrides).unwrap();

        let config = TrajectoryConfiguration::try_from(&params).unwrap();
        assert_eq!(config.trajectory_type, TrajectoryType::Circle);
        assert_eq!(config.radius, 6.0);
        assert!(config.speed_ramp_on);
    }

    #[test]
    fn json_keeps_defaults_for_missing_keys() {
        let params =
            TrajectoryParameters::from_json(r#"{"trajectory_type": "circle", "target_speed": 3}"#)
                .unwrap();
        assert_eq!(params.trajectory_type, "circle");
        assert_eq!(params.target_speed, 3.0);
        assert_eq!(params.num_of_points, 100);
        assert_eq!(params.radius, 21.0);
    }

    #[test]
    fn json_rejects_unknown_keys() {
        assert!(matches!(
            TrajectoryParameters::from_json(r#"{"node_name": "trajectory_spoofer"}"#),
            Err(ParameterError::File(_))
        ));
    }

    #[test]
    fn unknown_trajectory_type_is_a_parameter_error() {
        let params = TrajectoryParameters {
            trajectory_type: "figure_eight".to_string(),
            ..TrajectoryParameters::default()
        };
        assert!(matches!(
            TrajectoryConfiguration::try_from(&params),
            Err(TrajectoryError::Parameter(ParameterError::UnknownTrajectoryType(_)))
        ));
    }

    #[test]
    fn negative_point_count_is_reported_with_other_failures() {
        let params = TrajectoryParameters {
            num_of_points: -5,
            length: 0.0,
            ..TrajectoryParameters::default()
        };
        let err = TrajectoryConfiguration::try_from(&params).unwrap_err();
        let fields = err.invalid_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field, ConfigField::NumOfPoints);
        assert!(fields[0].reason.contains("-5"));
        assert_eq!(fields[1].field, ConfigField::Length);
    }
}
