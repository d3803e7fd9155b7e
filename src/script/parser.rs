use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use crate::tracker::TrackPoint;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("step {0}: {1}")]
    Step(usize, String),
}

/// Timeline of user commands and sensor events to replay.
#[derive(Debug, Clone)]
pub struct Script {
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone)]
pub struct Step {
    pub time: Option<TimeExpr>,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimeExpr {
    Relative(Duration),
    Absolute(DateTime<Utc>),
}

impl TimeExpr {
    /// `None` when a relative offset lands outside the representable range.
    pub fn resolve(&self, start: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TimeExpr::Relative(d) => start.checked_add_signed(*d),
            TimeExpr::Absolute(dt) => Some(*dt),
        }
    }
}

impl fmt::Display for TimeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeExpr::Relative(d) => {
                let (sign, magnitude) = if *d < Duration::zero() {
                    ('-', -*d)
                } else {
                    ('+', *d)
                };
                let magnitude = magnitude.to_std().unwrap_or_default();
                write!(f, "T{}{}", sign, humantime::format_duration(magnitude))
            }
            TimeExpr::Absolute(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Start,
    Stop,
    Fix {
        latitude: f64,
        longitude: f64,
        /// Stamped with the emission time when absent.
        #[serde(default)]
        timestamp_ms: Option<i64>,
    },
    Error {
        code: u16,
        #[serde(default)]
        message: String,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Fix { .. } => "fix",
            Action::Error { .. } => "error",
        }
    }
}

impl Script {
    pub fn from_str(yaml: &str) -> Result<Self, ParseError> {
        let root: serde_yaml::Value = serde_yaml::from_str(yaml)?;

        let steps = root
            .get("steps")
            .and_then(|v| v.as_sequence())
            .ok_or_else(|| ParseError::Step(0, "missing 'steps'".into()))?
            .iter()
            .enumerate()
            .map(|(i, v)| parse_step(i, v))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Script { steps })
    }
}

fn parse_step(i: usize, value: &serde_yaml::Value) -> Result<Step, ParseError> {
    let err = |msg: &str| ParseError::Step(i, msg.into());
    let map = value.as_mapping().ok_or_else(|| err("expected mapping"))?;

    let time = map
        .get("time")
        .map(|v| v.as_str().ok_or_else(|| "time must be a string".to_string()))
        .transpose()
        .and_then(|t| t.map(parse_time).transpose())
        .map_err(|e| err(&e))?;

    let mut body = map.clone();
    body.remove("time");
    let action: Action =
        serde_yaml::from_value(serde_yaml::Value::Mapping(body)).map_err(|e| err(&e.to_string()))?;

    if let Action::Fix {
        latitude,
        longitude,
        ..
    } = &action
    {
        if !TrackPoint::new(*latitude, *longitude, 0).is_valid() {
            return Err(err(&format!(
                "coordinates out of range: {}, {}",
                latitude, longitude
            )));
        }
    }

    Ok(Step { time, action })
}

/// `T+10s` / `T-5s` relative to replay start, or a plain RFC 3339 instant.
fn parse_time(s: &str) -> Result<TimeExpr, String> {
    let s = s.trim();

    match s.strip_prefix(['T', 't']) {
        Some(offset) => parse_offset(offset).map(TimeExpr::Relative),
        None => DateTime::parse_from_rfc3339(s)
            .map(|dt| TimeExpr::Absolute(dt.with_timezone(&Utc)))
            .map_err(|e| format!("invalid time '{}': {}", s, e)),
    }
}

fn parse_offset(s: &str) -> Result<Duration, String> {
    let s = s.trim_start();
    let (negative, magnitude) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let parsed = humantime::parse_duration(magnitude.trim())
        .map_err(|e| format!("invalid offset '{}': {}", magnitude.trim(), e))?;
    let offset = Duration::from_std(parsed).map_err(|_| "offset out of range".to_string())?;
    Ok(if negative { -offset } else { offset })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_every_action() {
        let script = Script::from_str(
            r#"
steps:
  - time: T+0s
    action: start
  - time: T+1s
    action: fix
    latitude: 10.0
    longitude: 20.0
  - action: fix
    latitude: 10.0
    longitude: 21.0
    timestamp_ms: 1700000000000
  - time: T+2s
    action: error
    code: 3
    message: Timeout expired
  - action: stop
"#,
        )
        .unwrap();

        assert_eq!(script.steps.len(), 5);
        assert_eq!(script.steps[0].action, Action::Start);
        assert_eq!(
            script.steps[1].time,
            Some(TimeExpr::Relative(Duration::seconds(1)))
        );
        assert_eq!(
            script.steps[1].action,
            Action::Fix {
                latitude: 10.0,
                longitude: 20.0,
                timestamp_ms: None,
            }
        );
        assert_eq!(script.steps[2].time, None);
        assert_eq!(
            script.steps[2].action,
            Action::Fix {
                latitude: 10.0,
                longitude: 21.0,
                timestamp_ms: Some(1_700_000_000_000),
            }
        );
        assert_eq!(
            script.steps[3].action,
            Action::Error {
                code: 3,
                message: "Timeout expired".into(),
            }
        );
        assert_eq!(script.steps[4].action.name(), "stop");
    }

    #[test]
    fn error_message_is_optional() {
        let script = Script::from_str("steps:\n  - action: error\n    code: 1\n").unwrap();
        assert_eq!(
            script.steps[0].action,
            Action::Error {
                code: 1,
                message: String::new(),
            }
        );
    }

    #[test]
    fn missing_steps_is_rejected() {
        let err = Script::from_str("variables: {}").unwrap_err();
        assert!(matches!(err, ParseError::Step(0, _)));
    }

    #[test]
    fn unknown_action_names_the_step() {
        let err = Script::from_str("steps:\n  - action: start\n  - action: pause\n").unwrap_err();
        assert!(matches!(err, ParseError::Step(1, _)));
    }

    #[test]
    fn out_of_range_fix_is_rejected() {
        let err = Script::from_str(
            "steps:\n  - action: fix\n    latitude: 95.0\n    longitude: 0.0\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn parses_relative_and_absolute_times() {
        assert_eq!(
            parse_time("T+1m 30s").unwrap(),
            TimeExpr::Relative(Duration::seconds(90))
        );
        assert_eq!(
            parse_time("t-5s").unwrap(),
            TimeExpr::Relative(Duration::seconds(-5))
        );

        let noon = Utc.with_ymd_and_hms(2026, 1, 12, 12, 0, 0).unwrap();
        assert_eq!(
            parse_time("2026-01-12T12:00:00Z").unwrap(),
            TimeExpr::Absolute(noon)
        );
        assert!(parse_time("soon").is_err());
    }

    #[test]
    fn absolute_time_takes_no_offset() {
        assert!(parse_time("2026-01-12T12:00:00Z + 10s").is_err());

        let err = Script::from_str(
            "steps:\n  - time: 2026-01-12T12:00:00Z + 300000years\n    action: start\n",
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::Step(0, _)));
    }

    #[test]
    fn relative_time_resolves_against_start() {
        let start = Utc.with_ymd_and_hms(2026, 1, 12, 12, 0, 0).unwrap();
        let at = TimeExpr::Relative(Duration::seconds(3)).resolve(start);
        assert_eq!(at, Some(start + Duration::seconds(3)));

        let noon = TimeExpr::Absolute(start);
        assert_eq!(noon.resolve(Utc::now()), Some(start));
    }

    #[test]
    fn far_relative_time_does_not_resolve() {
        let script =
            Script::from_str("steps:\n  - time: T+1000000years\n    action: start\n").unwrap();
        let time = script.steps[0].time.clone().unwrap();
        assert_eq!(time.resolve(Utc::now()), None);

        let back = Script::from_str("steps:\n  - time: T-1000000years\n    action: start\n")
            .unwrap();
        assert_eq!(back.steps[0].time.clone().unwrap().resolve(Utc::now()), None);
    }
}
