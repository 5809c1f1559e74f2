//! Plugin settings schema.

use serde::{Deserialize, Serialize};

/// Input type of a setting field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingFieldType {
    Text,
    Number,
    Boolean,
    Select,
    Url,
}

impl SettingFieldType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::Url => "url",
        }
    }
}

/// A setting value; also the shape of persisted settings entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

/// One choice of a `select` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Describes one plugin-specific configuration input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingField {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: SettingFieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<SettingValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub required: bool,
}

impl SettingField {
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: SettingFieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            description: None,
            default_value: None,
            options: Vec::new(),
            required: false,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: SettingValue) -> Self {
        self.default_value = Some(value);
        self
    }

    #[must_use]
    pub fn option(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(SelectOption::new(label, value));
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Returns true if the default value fits the declared field type.
    #[must_use]
    pub fn default_matches_type(&self) -> bool {
        let Some(value) = &self.default_value else {
            return true;
        };
        match (self.field_type, value) {
            (SettingFieldType::Boolean, SettingValue::Bool(_))
            | (SettingFieldType::Number, SettingValue::Number(_))
            | (SettingFieldType::Text, SettingValue::Text(_)) => true,
            (SettingFieldType::Url, SettingValue::Text(text)) => {
                text.starts_with('/') || url::Url::parse(text).is_ok()
            }
            (SettingFieldType::Select, SettingValue::Text(text)) => {
                self.options.iter().any(|o| &o.value == text)
            }
            (SettingFieldType::Select, SettingValue::List(values)) => values
                .iter()
                .all(|v| self.options.iter().any(|o| &o.value == v)),
            _ => false,
        }
    }
}
