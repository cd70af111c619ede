//! Variable files: a stored value, a default, and a list of options

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

use crate::template::VariableEntry;

/// Contents of one `<name>.yaml` variable file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableFile {
    /// Current value
    #[serde(default, deserialize_with = "optional_scalar")]
    pub value: Option<String>,
    /// Fallback when no value is stored or selected
    #[serde(default, deserialize_with = "optional_scalar")]
    pub default: Option<String>,
    #[serde(default)]
    pub options: Vec<VariableOption>,
}

/// One selectable option
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableOption {
    #[serde(default, deserialize_with = "required_scalar")]
    pub title: String,
    /// Stored value; the title when absent
    #[serde(default, deserialize_with = "optional_scalar")]
    pub value: Option<String>,
}

impl VariableOption {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: Some(value.into()),
        }
    }

    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.title)
    }
}

impl VariableFile {
    /// Parse YAML; an empty document is an empty variable file
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Map a selection to a value: option titles first, then option values,
    /// otherwise the selection itself
    pub fn choose(&self, selection: &str) -> String {
        self.options
            .iter()
            .find(|o| o.title == selection)
            .or_else(|| self.options.iter().find(|o| o.value() == selection))
            .map_or_else(|| selection.to_string(), |o| o.value().to_string())
    }

    /// Catalog entry for this file given an optional caller selection
    pub fn to_entry(&self, selection: Option<&str>) -> VariableEntry {
        let value = match selection {
            Some(selection) => self.choose(selection),
            None => self.value.clone().unwrap_or_default(),
        };
        let scope_default = self
            .default
            .clone()
            .or_else(|| self.options.first().map(|o| o.value().to_string()));
        VariableEntry {
            value,
            scope_default,
        }
    }

    /// Options to offer, with a non-empty inline default listed first when it
    /// is not already one of the option values
    pub fn choices(&self, inline_default: Option<&str>) -> Vec<VariableOption> {
        let mut choices = self.options.clone();
        if let Some(default) = inline_default.filter(|d| !d.is_empty()) {
            if !choices.iter().any(|o| o.value() == default) {
                choices.insert(0, VariableOption::new(default, default));
            }
        }
        choices
    }
}

fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_to_string(value).map(Some).map_err(D::Error::custom),
    }
}

fn required_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    optional_scalar(deserializer).map(Option::unwrap_or_default)
}

/// Strings, numbers and booleans are all usable as text
fn scalar_to_string(value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Sequence(_) => Err("expected text, found a list".to_string()),
        Value::Mapping(_) => Err("expected text, found a mapping".to_string()),
        Value::Tagged(tagged) => Err(format!("expected text, found tagged value {}", tagged.tag)),
    }
}
