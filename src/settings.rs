//! Validated option state for one declared Hipache instance.
//!
//! Two mutually exclusive modes: structured options set individually and
//! checked against the schema, or a single opaque override map supplied
//! wholesale. Setting the override clears all structured values; setting a
//! structured option while the override is present is an error. The
//! invariant lives in one place (`set`) instead of being repeated per key.

use crate::error::{Error, Result};
use crate::schema::{self, Kind};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("version regex is valid"));

/// A requested package version: the moving `latest` or a pinned `x.y.z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Version {
    Latest,
    Pinned(String),
}

impl Version {
    /// The version string to hand to the package manager, `None` for latest
    /// (no explicit pin is passed to the underlying installer).
    pub fn pin(&self) -> Option<&str> {
        match self {
            Self::Latest => None,
            Self::Pinned(v) => Some(v),
        }
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "latest" {
            Ok(Self::Latest)
        } else if VERSION_RE.is_match(s) {
            Ok(Self::Pinned(s.to_string()))
        } else {
            Err(Error::InvalidVersion(s.to_string()))
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Pinned(v) => write!(f, "{v}"),
        }
    }
}

/// The validated option set for one declared instance.
#[derive(Debug, Clone, Default)]
pub struct ProxySettings {
    values: HashMap<&'static str, Value>,
    override_config: Option<Map<String, Value>>,
}

impl ProxySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one structured option, validating and coercing per the schema.
    ///
    /// A `Null` value means "leave unset, use the default" and is a no-op.
    /// Strings that parse as integers are coerced when the schema kind is
    /// integer. Fails with `ConflictingConfiguration` when an override is
    /// active, `UnknownOption` for keys outside the schema, and
    /// `InvalidType` on a kind mismatch.
    pub fn set(&mut self, key: &str, value: Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        let spec = schema::lookup(key).ok_or_else(|| Error::UnknownOption(key.to_string()))?;
        if self.override_config.is_some() {
            return Err(Error::ConflictingConfiguration(key.to_string()));
        }
        let value = coerce(spec.key, spec.kind, value)?;
        self.values.insert(spec.key, value);
        Ok(())
    }

    /// Replace everything with an opaque full-config override.
    ///
    /// Last writer wins: any previously set structured values are cleared.
    pub fn set_override(&mut self, config: Map<String, Value>) {
        self.values.clear();
        self.override_config = Some(config);
    }

    /// The active override, if any.
    pub fn override_config(&self) -> Option<&Map<String, Value>> {
        self.override_config.as_ref()
    }

    /// The explicitly set structured value for a key, if any.
    ///
    /// Always `None` while an override is active.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// The effective value for a key: the set value or the schema default.
    ///
    /// `None` only for keys the schema does not know.
    pub fn value_of(&self, key: &str) -> Option<Value> {
        let spec = schema::lookup(key)?;
        Some(
            self.values
                .get(spec.key)
                .cloned()
                .unwrap_or_else(|| spec.default.to_value()),
        )
    }
}

/// Check a value against a schema kind, coercing string-to-integer.
fn coerce(key: &str, kind: Kind, value: Value) -> Result<Value> {
    let ok = match kind {
        Kind::Str => value.is_string(),
        Kind::Bool => value.is_boolean(),
        Kind::Int => match &value {
            Value::Number(n) => n.is_i64() || n.is_u64(),
            Value::String(s) => {
                if let Ok(parsed) = s.parse::<i64>() {
                    return Ok(Value::from(parsed));
                }
                false
            }
            _ => false,
        },
        Kind::StrOrList => match &value {
            Value::String(_) => true,
            Value::Array(items) => items.iter().all(Value::is_string),
            _ => false,
        },
    };

    if ok {
        Ok(value)
    } else {
        Err(Error::InvalidType {
            key: key.to_string(),
            expected: kind.name(),
            actual: describe(&value),
        })
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(s) => format!("string '{s}'"),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn version_accepts_latest_and_semantic() {
        assert_eq!("latest".parse::<Version>().unwrap(), Version::Latest);
        assert_eq!(
            "1.2.3".parse::<Version>().unwrap(),
            Version::Pinned("1.2.3".to_string())
        );
    }

    #[test]
    fn version_rejects_malformed_strings() {
        for bad in ["1.2", "1.2.3.4", "abc", "", "1.2.x"] {
            assert!(
                matches!(bad.parse::<Version>(), Err(Error::InvalidVersion(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn pin_is_none_for_latest() {
        assert_eq!(Version::Latest.pin(), None);
        assert_eq!(Version::Pinned("1.2.3".into()).pin(), Some("1.2.3"));
    }

    #[test]
    fn set_and_read_back() {
        let mut settings = ProxySettings::new();
        settings.set("workers", json!(20)).unwrap();
        assert_eq!(settings.raw("workers"), Some(&json!(20)));
        assert_eq!(settings.value_of("workers"), Some(json!(20)));
    }

    #[test]
    fn unset_key_falls_back_to_default() {
        let settings = ProxySettings::new();
        assert_eq!(settings.raw("workers"), None);
        assert_eq!(settings.value_of("workers"), Some(json!(10)));
    }

    #[test]
    fn null_set_is_a_noop() {
        let mut settings = ProxySettings::new();
        settings.set("workers", Value::Null).unwrap();
        assert_eq!(settings.raw("workers"), None);
    }

    #[test]
    fn string_coerces_to_integer() {
        let mut settings = ProxySettings::new();
        settings.set("workers", json!("42")).unwrap();
        assert_eq!(settings.raw("workers"), Some(&json!(42)));
    }

    #[test]
    fn non_numeric_string_fails_integer_kind() {
        let mut settings = ProxySettings::new();
        let err = settings.set("workers", json!("lots")).unwrap_err();
        assert!(matches!(err, Error::InvalidType { .. }));
    }

    #[test]
    fn boolean_kind_rejects_strings() {
        let mut settings = ProxySettings::new();
        let err = settings.set("http_keep_alive", json!("true")).unwrap_err();
        assert!(matches!(err, Error::InvalidType { .. }));
    }

    #[test]
    fn bind_accepts_string_and_list() {
        let mut settings = ProxySettings::new();
        settings.set("https_bind", json!("1.2.3.4")).unwrap();
        settings.set("http_bind", json!(["::1", "0.0.0.0"])).unwrap();
        let err = settings.set("https_bind", json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::InvalidType { .. }));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut settings = ProxySettings::new();
        let err = settings.set("shoes", json!(1)).unwrap_err();
        assert!(matches!(err, Error::UnknownOption(_)));
    }

    #[test]
    fn override_clears_structured_values() {
        let mut settings = ProxySettings::new();
        settings.set("workers", json!(99)).unwrap();
        settings.set_override(Map::new());
        assert_eq!(settings.raw("workers"), None);
        // Effective reads fall back to defaults after the wipe
        assert_eq!(settings.value_of("workers"), Some(json!(10)));
    }

    #[test]
    fn set_after_override_conflicts() {
        let mut settings = ProxySettings::new();
        settings.set_override(Map::new());
        let err = settings.set("workers", json!(1)).unwrap_err();
        assert!(matches!(err, Error::ConflictingConfiguration(_)));
    }
}
