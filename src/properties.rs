//! Plot property definitions with defaults from plot_properties.json
//!
//! Property definitions are embedded at compile time so defaults are defined in
//! one place. User values come from a JSON config file and/or CLI flags; anything
//! not set falls back to the embedded default.

use crate::error::{PlotError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// plot_properties.json embedded at compile time
const PLOT_PROPERTIES_JSON: &str = include_str!("../plot_properties.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PropertyKind {
    #[serde(rename = "StringProperty")]
    String,
    #[serde(rename = "EnumeratedProperty")]
    Enumerated,
    #[serde(rename = "BooleanProperty")]
    Boolean,
    #[serde(rename = "DoubleProperty")]
    Double,
    #[serde(rename = "IntegerProperty")]
    Integer,
}

/// Property definition from plot_properties.json
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
    #[serde(default)]
    pub default_value: String,
    #[serde(default)]
    pub description: String,
    /// For EnumeratedProperty, the valid values
    #[serde(default, rename = "values")]
    pub valid_values: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct PropertyFile {
    properties: Vec<PropertyDef>,
}

/// Registry of all plot properties with their defaults
pub struct PropertyRegistry {
    properties: HashMap<String, PropertyDef>,
}

impl PropertyRegistry {
    /// Parse the embedded property file
    ///
    /// Panics if the file is malformed, which is a build-time mistake.
    pub fn from_embedded_json() -> Self {
        let file: PropertyFile = serde_json::from_str(PLOT_PROPERTIES_JSON)
            .expect("plot_properties.json is invalid");

        let properties = file
            .properties
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect();

        Self { properties }
    }

    /// Get the default value for a property
    pub fn get_default(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(|p| p.default_value.as_str())
    }

    pub fn get_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.get(name)
    }

    /// Check if a value is valid for an enumerated property
    pub fn is_valid_enum_value(&self, name: &str, value: &str) -> bool {
        self.properties
            .get(name)
            .and_then(|p| p.valid_values.as_ref())
            .map(|values| values.iter().any(|v| v.eq_ignore_ascii_case(value)))
            .unwrap_or(true)
    }
}

static REGISTRY: std::sync::OnceLock<PropertyRegistry> = std::sync::OnceLock::new();

/// Get the global property registry
pub fn registry() -> &'static PropertyRegistry {
    REGISTRY.get_or_init(PropertyRegistry::from_embedded_json)
}

/// Typed property reader
///
/// User values take precedence; empty strings count as "not set".
#[derive(Debug, Clone, Default)]
pub struct PropertyReader {
    user_values: HashMap<String, String>,
}

impl PropertyReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object of property name to value
    ///
    /// Strings, numbers and booleans are accepted; other values are skipped.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)
            .map_err(|e| PlotError::Config(format!("Failed to parse config: {}", e)))?;

        let mut reader = Self::new();
        for (key, value) in map {
            let value_str = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => continue,
            };
            reader.set(key, value_str);
        }
        Ok(reader)
    }

    /// Read a JSON config file (see `from_json_str`)
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Set (or override) a user value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        self.user_values.insert(name.into(), value);
    }

    /// Get string property (user value or registry default)
    pub fn get_string(&self, name: &str) -> String {
        if let Some(value) = self.user_values.get(name) {
            return value.clone();
        }
        registry().get_default(name).unwrap_or("").to_string()
    }

    /// Get enumerated property with validation
    ///
    /// Invalid user values are logged and replaced by the default.
    pub fn get_enum(&self, name: &str) -> String {
        let reg = registry();
        let default = reg.get_default(name).unwrap_or("");

        if let Some(value) = self.user_values.get(name) {
            if reg.is_valid_enum_value(name, value) {
                return value.to_lowercase();
            }
            let valid_values = reg
                .get_property(name)
                .and_then(|p| p.valid_values.as_ref())
                .map(|v| v.join(", "))
                .unwrap_or_default();
            warn!(
                "Invalid value '{}' for property '{}'. Valid values: [{}]. Using default: '{}'",
                value, name, valid_values, default
            );
        }

        default.to_string()
    }

    /// Get boolean property ("true"/"false", case-insensitive)
    pub fn get_bool(&self, name: &str) -> bool {
        let default = registry()
            .get_default(name)
            .map(|d| d.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        match self.user_values.get(name) {
            Some(v) if v.eq_ignore_ascii_case("true") => true,
            Some(v) if v.eq_ignore_ascii_case("false") => false,
            Some(other) => {
                warn!(
                    "Invalid boolean value '{}' for property '{}'. Using default: {}",
                    other, name, default
                );
                default
            }
            None => default,
        }
    }

    /// Get f64 property, falling back to the default on parse failure
    pub fn get_f64(&self, name: &str) -> f64 {
        let default = registry()
            .get_default(name)
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);

        match self.user_values.get(name) {
            None => default,
            Some(value) => value.trim().parse::<f64>().unwrap_or_else(|_| {
                warn!(
                    "Invalid numeric value '{}' for property '{}'. Using default: {}",
                    value, name, default
                );
                default
            }),
        }
    }

    /// Get f64 property with range validation
    pub fn get_f64_in_range(&self, name: &str, min: f64, max: f64) -> f64 {
        let value = self.get_f64(name);
        if (min..=max).contains(&value) {
            return value;
        }
        let default = registry()
            .get_default(name)
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(min);
        warn!(
            "Value {} for property '{}' out of range [{}, {}]. Using default: {}",
            value, name, min, max, default
        );
        default
    }

    /// Get u32 property with range validation
    pub fn get_u32_in_range(&self, name: &str, min: u32, max: u32) -> u32 {
        let default = registry()
            .get_default(name)
            .and_then(|d| d.parse::<u32>().ok())
            .unwrap_or(min);

        let Some(raw) = self.user_values.get(name) else {
            return default;
        };

        match raw.trim().parse::<u32>() {
            Ok(v) if (min..=max).contains(&v) => v,
            Ok(v) => {
                warn!(
                    "Value {} for property '{}' out of range [{}, {}]. Using default: {}",
                    v, name, min, max, default
                );
                default
            }
            Err(_) => {
                warn!(
                    "Invalid integer value '{}' for property '{}'. Using default: {}",
                    raw, name, default
                );
                default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads() {
        let reg = registry();
        assert!(reg.get_property("homo.colour").is_some());
        assert!(reg.get_property("offset.strategy").is_some());
        assert_eq!(
            reg.get_property("redox.h2").map(|p| p.kind),
            Some(PropertyKind::Boolean)
        );
    }

    #[test]
    fn test_registry_defaults() {
        let reg = registry();
        assert_eq!(reg.get_default("homo.colour"), Some("skyblue"));
        assert_eq!(reg.get_default("lumo.colour"), Some("orange"));
        assert_eq!(reg.get_default("filename"), Some("homolumoplot.png"));
        assert_eq!(reg.get_default("dpi"), Some("900"));
    }

    #[test]
    fn test_enum_validation() {
        let reg = registry();
        assert!(reg.is_valid_enum_value("offset.strategy", "adaptive"));
        assert!(reg.is_valid_enum_value("offset.strategy", "FIXED"));
        assert!(!reg.is_valid_enum_value("offset.strategy", "sideways"));
    }

    #[test]
    fn test_property_reader_defaults() {
        let reader = PropertyReader::new();
        assert_eq!(reader.get_enum("offset.strategy"), "adaptive");
        assert_eq!(reader.get_f64("figure.width"), 12.0);
        assert_eq!(reader.get_f64("offset.fixed"), 5.0);
        assert!(!reader.get_bool("redox.tea"));
        assert_eq!(reader.get_u32_in_range("dpi", 10, 2400), 900);
    }

    #[test]
    fn test_property_reader_from_json() {
        let reader = PropertyReader::from_json_str(
            r#"{"homo.colour": "navy", "redox.h2": true, "figure.width": 8, "dpi": "300"}"#,
        )
        .unwrap();
        assert_eq!(reader.get_string("homo.colour"), "navy");
        assert!(reader.get_bool("redox.h2"));
        assert_eq!(reader.get_f64("figure.width"), 8.0);
        assert_eq!(reader.get_u32_in_range("dpi", 10, 2400), 300);
    }

    #[test]
    fn test_property_reader_invalid_values_fall_back() {
        let mut reader = PropertyReader::new();
        reader.set("offset.strategy", "sideways");
        reader.set("redox.tea", "maybe");
        reader.set("figure.height", "tall");
        reader.set("dpi", "99999");
        assert_eq!(reader.get_enum("offset.strategy"), "adaptive");
        assert!(!reader.get_bool("redox.tea"));
        assert_eq!(reader.get_f64("figure.height"), 4.0);
        assert_eq!(reader.get_u32_in_range("dpi", 10, 2400), 900);
    }

    #[test]
    fn test_property_reader_empty_is_unset() {
        let mut reader = PropertyReader::new();
        reader.set("lumo.colour", "");
        assert_eq!(reader.get_string("lumo.colour"), "orange");
    }

    #[test]
    fn test_property_reader_bad_json() {
        assert!(PropertyReader::from_json_str("[1, 2]").is_err());
    }
}
