//! Generation of the Hipache JSON configuration document.
//!
//! A pure mapping from validated settings to the nested document the daemon
//! reads. When a full-config override is present it is passed through
//! verbatim as an escape hatch; otherwise the schema table drives emission,
//! top-level keys first, then one sub-object per non-empty nested group.

use crate::schema::{self, Group};
use crate::settings::ProxySettings;
use serde_json::{Map, Value};

/// Generate the configuration document for the given settings.
///
/// Total over any valid settings value; never fails.
pub fn generate(settings: &ProxySettings) -> Value {
    if let Some(config) = settings.override_config() {
        return Value::Object(config.clone());
    }

    let mut root = Map::new();
    for spec in schema::group_options(Group::TopLevel) {
        root.insert(spec.external.to_string(), effective(settings, spec.key));
    }
    for group in Group::NESTED {
        let mut nested = Map::new();
        for spec in schema::group_options(group) {
            nested.insert(spec.external.to_string(), effective(settings, spec.key));
        }
        if !nested.is_empty() {
            root.insert(group.key().to_string(), Value::Object(nested));
        }
    }
    Value::Object(root)
}

/// Serialize a generated document for the on-disk config file.
///
/// Readable JSON with a trailing newline. Key order may vary between
/// builds; equal settings always produce a value-equal document.
pub fn render(document: &Value) -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(document)?;
    text.push('\n');
    Ok(text)
}

fn effective(settings: &ProxySettings, key: &'static str) -> Value {
    // Schema keys always resolve; value_of is None only for unknown keys.
    settings.value_of(key).unwrap_or(Value::Null)
}
