//! Settings maps and the application configuration.
//!
//! A [`Settings`] map is keyed by lowercase attribute name. Values that are
//! themselves maps and are keyed by a widget's node name (for example
//! `text_area`) hold overrides that apply only to widgets of that type.

use std::{collections::BTreeMap, fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    state::valid_key,
};

/// A single settings value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Explicitly unset, e.g. `bgcolor: null` to inherit.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
    /// List of integers, used for colors.
    List(Vec<i64>),
    /// Nested map of type-specific overrides.
    Map(Settings),
}

impl SettingValue {
    /// Interpret the value as a boolean.
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            _ => Err(mismatch(key, "a boolean", self)),
        }
    }

    /// Interpret the value as a non-negative integer that fits in a u32.
    pub fn as_u32(&self, key: &str) -> Result<u32> {
        match self {
            Self::Int(i) => u32::try_from(*i).map_err(|_| mismatch(key, "a u32", self)),
            _ => Err(mismatch(key, "an integer", self)),
        }
    }

    /// Interpret the value as a float. Integers are accepted.
    pub fn as_f64(&self, key: &str) -> Result<f64> {
        match self {
            Self::Float(f) => Ok(*f),
            Self::Int(i) => Ok(*i as f64),
            _ => Err(mismatch(key, "a number", self)),
        }
    }

    /// Interpret the value as text.
    pub fn as_str(&self, key: &str) -> Result<&str> {
        match self {
            Self::Text(s) => Ok(s),
            _ => Err(mismatch(key, "text", self)),
        }
    }

    /// Is this an explicit null?
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Build a type mismatch error.
pub(crate) fn mismatch(key: &str, expected: &str, got: &SettingValue) -> Error {
    Error::Config(format!("{key}: expected {expected}, got {got}"))
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "{self:?}"),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for SettingValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i32> for SettingValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for SettingValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<i64>> for SettingValue {
    fn from(v: Vec<i64>) -> Self {
        Self::List(v)
    }
}

impl From<Settings> for SettingValue {
    fn from(v: Settings) -> Self {
        Self::Map(v)
    }
}

/// A lowercase-keyed settings map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    /// Entries, ordered by key so application order is deterministic.
    entries: BTreeMap<String, SettingValue>,
}

impl Settings {
    /// An empty settings map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<SettingValue>) -> Self {
        self.entries.insert(key.to_string(), value.into());
        self
    }

    /// Insert a value, replacing any previous one.
    pub fn insert(&mut self, key: &str, value: impl Into<SettingValue>) {
        self.entries.insert(key.to_string(), value.into());
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.entries.get(key)
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries, including nested maps.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parse and validate a JSON object.
    pub fn from_json(s: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that every key, including those of nested maps, is lowercase.
    pub fn validate(&self) -> Result<()> {
        for (k, v) in &self.entries {
            if !valid_key(k) {
                return Err(Error::Config(format!("settings key must be lowercase: {k:?}")));
            }
            if let SettingValue::Map(m) = v {
                m.validate()?;
            }
        }
        Ok(())
    }

    /// The entries that apply to a widget of the given type: generic entries
    /// first, then the type-specific overrides, so the latter win when applied
    /// in order. Nested maps are never part of the result.
    pub fn resolved_for(&self, type_name: &str) -> Vec<(&str, &SettingValue)> {
        let mut out: Vec<_> = self
            .iter()
            .filter(|(_, v)| !matches!(v, SettingValue::Map(_)))
            .collect();
        if let Some(SettingValue::Map(m)) = self.entries.get(type_name) {
            out.extend(m.iter().filter(|(_, v)| !matches!(v, SettingValue::Map(_))));
        }
        out
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Frames per second the pump idles at when there is no input.
    pub framerate: u32,
    /// Timers due within this many milliseconds of now fire immediately.
    pub timer_slack_ms: u64,
    /// Settings applied to the whole tree at startup.
    pub settings: Settings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            framerate: 30,
            timer_slack_ms: 5,
            settings: Settings::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        if config.framerate == 0 {
            return Err(Error::Config("framerate must be positive".into()));
        }
        config.settings.validate()?;
        Ok(config)
    }

    /// Time budget of one idle frame.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.framerate.max(1)
    }

    /// Timer firing tolerance.
    pub fn timer_slack(&self) -> Duration {
        Duration::from_millis(self.timer_slack_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_values() -> Result<()> {
        let s = Settings::from_json(
            r#"{"margin": 3, "bgcolor": null, "mousewheel_scroll": 0.2,
                "color": [1, 2, 3], "halign": "center", "fixed_width": true,
                "text_area": {"margin": 7}}"#,
        )?;
        assert_eq!(s.get("margin"), Some(&SettingValue::Int(3)));
        assert_eq!(s.get("bgcolor"), Some(&SettingValue::Null));
        assert_eq!(s.get("mousewheel_scroll"), Some(&SettingValue::Float(0.2)));
        assert_eq!(s.get("color"), Some(&SettingValue::List(vec![1, 2, 3])));
        assert_eq!(s.get("halign"), Some(&SettingValue::Text("center".into())));
        assert_eq!(s.get("fixed_width"), Some(&SettingValue::Bool(true)));
        assert!(matches!(s.get("text_area"), Some(SettingValue::Map(_))));
        Ok(())
    }

    #[test]
    fn rejects_uppercase_keys() {
        assert!(matches!(
            Settings::from_json(r#"{"Margin": 3}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"text_area": {"Margin": 3}}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(Settings::from_json("[1]"), Err(Error::Config(_))));
    }

    #[test]
    fn type_specific_wins() {
        let s = Settings::new()
            .with("margin", 1)
            .with("spacing", 2)
            .with("text_area", Settings::new().with("margin", 9))
            .with("button", Settings::new().with("margin", 4));
        let resolved = s.resolved_for("text_area");
        assert_eq!(
            resolved,
            vec![
                ("margin", &SettingValue::Int(1)),
                ("spacing", &SettingValue::Int(2)),
                ("margin", &SettingValue::Int(9)),
            ]
        );
        assert_eq!(s.resolved_for("panel").len(), 2);
    }

    #[test]
    fn value_accessors() {
        assert_eq!(SettingValue::Int(3).as_u32("k"), Ok(3));
        assert!(SettingValue::Int(-1).as_u32("k").is_err());
        assert!(SettingValue::Text("x".into()).as_bool("k").is_err());
        assert_eq!(SettingValue::Int(2).as_f64("k"), Ok(2.0));
    }

    #[test]
    fn app_config() -> Result<()> {
        let c = AppConfig::from_json(r#"{"framerate": 60}"#)?;
        assert_eq!(c.framerate, 60);
        assert_eq!(c.timer_slack_ms, 5);
        assert_eq!(c.frame_interval(), Duration::from_secs(1) / 60);
        assert!(AppConfig::from_json(r#"{"framerate": 0}"#).is_err());
        assert_eq!(AppConfig::default().framerate, 30);
        Ok(())
    }
}
