//! Declarative pause schedules
//!
//! A schedule lists the pauses to insert into a print, in the order they are
//! applied. Two document shapes are understood, in YAML or JSON:
//!
//! ```yaml
//! # mapping form, keyed by layer height
//! 1.2:
//!   message: Insert magnets
//! 5.6:
//!   z_offset: 20
//!   x_pause: 5
//!   y_pause: 200
//! ```
//!
//! ```yaml
//! # list form
//! - height: 1.2
//!   message: Insert magnets
//! - height: 5.6
//!   z_offset: 20
//! ```
//!
//! Document order is kept because every insertion shifts the lines below it.

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::ScheduleError;
use crate::height::Height;
use crate::template::PauseOptions;

/// Optional pause parameters of a schedule record
///
/// Missing values fall back to the defaults given to [`PauseParams::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PauseParams {
    /// Relative Z raise (mm)
    pub z_offset: Option<f64>,
    /// X park position (mm)
    pub x_pause: Option<f64>,
    /// Y park position (mm)
    pub y_pause: Option<f64>,
    /// Operator message, any scalar is taken as its text
    #[serde(default, deserialize_with = "scalar_message")]
    pub message: Option<String>,
}

impl PauseParams {
    /// Fill missing values from `defaults`
    pub fn resolve(&self, defaults: &PauseOptions) -> PauseOptions {
        PauseOptions {
            z_offset: self.z_offset.unwrap_or(defaults.z_offset),
            x_pause: self.x_pause.unwrap_or(defaults.x_pause),
            y_pause: self.y_pause.unwrap_or(defaults.y_pause),
            message: self.message.clone().or_else(|| defaults.message.clone()),
        }
    }
}

/// One scheduled pause
#[derive(Debug, Clone, PartialEq)]
pub struct PauseRecord {
    /// Layer height to pause at
    pub height: Height,
    /// Parameters given for this pause
    pub params: PauseParams,
}

impl PauseRecord {
    /// Create a record
    pub fn new(height: impl Into<Height>, params: PauseParams) -> Self {
        Self {
            height: height.into(),
            params,
        }
    }
}

/// Ordered list of pauses to apply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PauseSchedule {
    records: Vec<PauseRecord>,
}

impl PauseSchedule {
    /// Create an empty schedule
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record
    pub fn push(&mut self, record: PauseRecord) {
        self.records.push(record);
    }

    /// Records in application order
    pub fn records(&self) -> &[PauseRecord] {
        &self.records
    }

    /// Iterate over records in application order
    pub fn iter(&self) -> std::slice::Iter<'_, PauseRecord> {
        self.records.iter()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the schedule has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Parse a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self, ScheduleError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a JSON document
    pub fn from_json_str(content: &str) -> Result<Self, ScheduleError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a schedule file (`.yaml`, `.yml` or `.json`)
    pub fn load(path: &Path) -> Result<Self, ScheduleError> {
        if !path.is_file() {
            return Err(ScheduleError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let content = std::fs::read_to_string(path).map_err(|source| ScheduleError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let schedule = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&content)?,
            "json" => Self::from_json_str(&content)?,
            other => return Err(ScheduleError::UnsupportedFormat(other.to_string())),
        };

        tracing::debug!(
            "Loaded {} scheduled pauses from {}",
            schedule.len(),
            path.display()
        );
        Ok(schedule)
    }
}

impl FromIterator<PauseRecord> for PauseSchedule {
    fn from_iter<I: IntoIterator<Item = PauseRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PauseSchedule {
    type Item = PauseRecord;
    type IntoIter = std::vec::IntoIter<PauseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a PauseSchedule {
    type Item = &'a PauseRecord;
    type IntoIter = std::slice::Iter<'a, PauseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Record shape of the list form
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ListedPause {
    height: f64,
    z_offset: Option<f64>,
    x_pause: Option<f64>,
    y_pause: Option<f64>,
    #[serde(default, deserialize_with = "scalar_message")]
    message: Option<String>,
}

impl From<ListedPause> for PauseRecord {
    fn from(listed: ListedPause) -> Self {
        PauseRecord::new(
            listed.height,
            PauseParams {
                z_offset: listed.z_offset,
                x_pause: listed.x_pause,
                y_pause: listed.y_pause,
                message: listed.message,
            },
        )
    }
}

/// Read a message given as a string, number or boolean
fn scalar_message<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    struct MessageVisitor;

    impl<'de> Visitor<'de> for MessageVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a message string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(MessageVisitor)
}

/// Mapping key of the mapping form: a number, or a string holding one
struct HeightKey(Height);

impl<'de> Deserialize<'de> for HeightKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HeightKeyVisitor;

        impl<'de> Visitor<'de> for HeightKeyVisitor {
            type Value = HeightKey;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a layer height")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<HeightKey, E> {
                Ok(HeightKey(Height::new(v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<HeightKey, E> {
                Ok(HeightKey(Height::new(v as f64)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<HeightKey, E> {
                Ok(HeightKey(Height::new(v as f64)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<HeightKey, E> {
                v.trim()
                    .parse::<f64>()
                    .map(|h| HeightKey(Height::new(h)))
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(HeightKeyVisitor)
    }
}

impl<'de> Deserialize<'de> for PauseSchedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScheduleVisitor;

        impl<'de> Visitor<'de> for ScheduleVisitor {
            type Value = PauseSchedule;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of layer heights to pause parameters or a list of pauses")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<PauseSchedule, A::Error> {
                let mut schedule = PauseSchedule::new();
                while let Some((key, params)) = map.next_entry::<HeightKey, Option<PauseParams>>()? {
                    schedule.push(PauseRecord::new(key.0, params.unwrap_or_default()));
                }
                Ok(schedule)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<PauseSchedule, A::Error> {
                let mut schedule = PauseSchedule::new();
                while let Some(listed) = seq.next_element::<ListedPause>()? {
                    schedule.push(listed.into());
                }
                Ok(schedule)
            }

            fn visit_unit<E: de::Error>(self) -> Result<PauseSchedule, E> {
                Ok(PauseSchedule::new())
            }

            fn visit_none<E: de::Error>(self) -> Result<PauseSchedule, E> {
                Ok(PauseSchedule::new())
            }
        }

        deserializer.deserialize_any(ScheduleVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_mapping_keeps_order() {
        let yaml = "\
30.2:
  message: Third layer set
1.4:
  z_offset: 5
  x_pause: 3
  y_pause: 4
12:
";
        let schedule = PauseSchedule::from_yaml_str(yaml).unwrap();
        let heights: Vec<f64> = schedule.iter().map(|r| r.height.value()).collect();
        assert_eq!(heights, vec![30.2, 1.4, 12.0]);

        assert_eq!(
            schedule.records()[0].params.message.as_deref(),
            Some("Third layer set")
        );
        assert_eq!(schedule.records()[1].params.z_offset, Some(5.0));
        assert_eq!(schedule.records()[2].params, PauseParams::default());
    }

    #[test]
    fn test_yaml_list_form() {
        let yaml = "\
- height: 0.6
  message: Swap
- height: 2
";
        let schedule = PauseSchedule::from_yaml_str(yaml).unwrap();
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.records()[0].height, Height::new(0.6));
        assert_eq!(schedule.records()[1].height, Height::new(2.0));
    }

    #[test]
    fn test_json_string_keys() {
        let json = r#"{"20": {"y_pause": 200}, "10.5": {}}"#;
        let schedule = PauseSchedule::from_json_str(json).unwrap();
        let heights: Vec<f64> = schedule.iter().map(|r| r.height.value()).collect();
        assert_eq!(heights, vec![20.0, 10.5]);
        assert_eq!(schedule.records()[0].params.y_pause, Some(200.0));
    }

    #[test]
    fn test_scalar_messages() {
        let yaml = "\
1.0:
  message: 42
2.0:
  message: true
3.0:
  message: 2.5
4.0:
  message: ~
5.0:
  z_offset: 5
";
        let schedule = PauseSchedule::from_yaml_str(yaml).unwrap();
        let messages: Vec<_> = schedule
            .iter()
            .map(|r| r.params.message.as_deref())
            .collect();
        assert_eq!(
            messages,
            vec![Some("42"), Some("true"), Some("2.5"), None, None]
        );

        let json = r#"[{"height": 1.0, "message": 7}]"#;
        let schedule = PauseSchedule::from_json_str(json).unwrap();
        assert_eq!(schedule.records()[0].params.message.as_deref(), Some("7"));
    }

    #[test]
    fn test_non_scalar_message_rejected() {
        assert!(PauseSchedule::from_yaml_str("1.0:\n  message: [a, b]\n").is_err());
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let yaml = "10:\n  speed: 3\n";
        assert!(PauseSchedule::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_non_numeric_key_rejected() {
        let json = r#"{"top": {}}"#;
        assert!(PauseSchedule::from_json_str(json).is_err());
    }

    #[test]
    fn test_resolve_defaults() {
        let params = PauseParams {
            z_offset: Some(2.0),
            message: Some("Hi".to_string()),
            ..PauseParams::default()
        };
        let resolved = params.resolve(&PauseOptions::default());
        assert_eq!(resolved.z_offset, 2.0);
        assert_eq!(resolved.x_pause, 10.0);
        assert_eq!(resolved.y_pause, 10.0);
        assert_eq!(resolved.message.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PauseSchedule::load(Path::new("/nonexistent/pauses.yaml")).unwrap_err();
        assert!(matches!(err, ScheduleError::NotFound { .. }));
    }
}
