//! Response shape detection and display normalization.
//!
//! The remote endpoint does not commit to a schema. A profile may arrive as
//! `{"items": [...]}`, `{"data": [...]}`, a bare array or a bare object.
//! [`ResponseShape::detect`] resolves which one it is, and [`normalize`]
//! projects the first record onto the field catalogue in [`crate::fields`].
//!
//! Rules, in order:
//!
//! 1. object with a non-empty `items` array
//! 2. object with a non-empty `data` array
//! 3. object with an empty `items` or `data` array (no records)
//! 4. bare array
//! 5. any other object, taken as a single record
//!
//! Scalars and `null` are rejected.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::fields::{Category, FieldKind, FieldSpec};

/// Text shown for absent or placeholder values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Placeholder the API documentation uses for example payloads.
pub const DEFAULT_PLACEHOLDER: &str = "string";

pub const DEFAULT_TRUNCATE_AT: usize = 100;

/// What to do with a catalogue field that is present but blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlankPolicy {
    /// Show the row with [`NOT_AVAILABLE`].
    #[default]
    Placeholder,
    /// Drop the row.
    Omit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// A literal value treated as absent. `None` keeps every value.
    pub placeholder: Option<String>,
    /// Character limit for long-text fields. `None` disables truncation.
    pub truncate_at: Option<usize>,
    pub blank_policy: BlankPolicy,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            placeholder: Some(DEFAULT_PLACEHOLDER.to_string()),
            truncate_at: Some(DEFAULT_TRUNCATE_AT),
            blank_policy: BlankPolicy::Placeholder,
        }
    }
}

impl NormalizeOptions {
    fn is_blank(&self, value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => {
                s.trim().is_empty() || self.placeholder.as_deref() == Some(s.as_str())
            }
            Value::Array(a) => a.is_empty(),
            Value::Object(o) => o.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }

    /// Display text for one catalogue value; `None` when the value is blank.
    pub fn format(&self, value: &Value, kind: FieldKind) -> Option<String> {
        if self.is_blank(value) {
            return None;
        }
        let text = to_display_string(value);
        match (kind, self.truncate_at) {
            (FieldKind::LongText, Some(limit)) => Some(truncate(&text, limit)),
            _ => Some(text),
        }
    }
}

/// Where the records were found in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape<'a> {
    ItemsWrapped(&'a [Value]),
    DataWrapped(&'a [Value]),
    BareArray(&'a [Value]),
    BareObject(&'a Map<String, Value>),
}

/// Payload-free tag of [`ResponseShape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    ItemsWrapped,
    DataWrapped,
    BareArray,
    BareObject,
}

impl<'a> ResponseShape<'a> {
    pub fn detect(value: &'a Value) -> Result<Self> {
        match value {
            Value::Object(map) => {
                if let Some(items) = array_field(map, "items").filter(|a| !a.is_empty()) {
                    Ok(Self::ItemsWrapped(items))
                } else if let Some(data) = array_field(map, "data").filter(|a| !a.is_empty()) {
                    Ok(Self::DataWrapped(data))
                } else if let Some(items) = array_field(map, "items") {
                    Ok(Self::ItemsWrapped(items))
                } else if let Some(data) = array_field(map, "data") {
                    Ok(Self::DataWrapped(data))
                } else {
                    Ok(Self::BareObject(map))
                }
            }
            Value::Array(records) => Ok(Self::BareArray(records)),
            other => Err(Error::unexpected_shape(format!(
                "expected an object or an array, got {}",
                json_type_name(other)
            ))),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::ItemsWrapped(_) => ShapeKind::ItemsWrapped,
            Self::DataWrapped(_) => ShapeKind::DataWrapped,
            Self::BareArray(_) => ShapeKind::BareArray,
            Self::BareObject(_) => ShapeKind::BareObject,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::ItemsWrapped(r) | Self::DataWrapped(r) | Self::BareArray(r) => r.len(),
            Self::BareObject(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The active record. Only the first one counts.
    pub fn first_record(&self) -> Result<Option<&'a Map<String, Value>>> {
        match *self {
            Self::ItemsWrapped(records) | Self::DataWrapped(records) | Self::BareArray(records) => {
                match records.first() {
                    None => Ok(None),
                    Some(Value::Object(record)) => Ok(Some(record)),
                    Some(other) => Err(Error::unexpected_shape(format!(
                        "expected records to be objects, got {}",
                        json_type_name(other)
                    ))),
                }
            }
            Self::BareObject(record) => Ok(Some(record)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayField {
    pub key: String,
    pub label: String,
    pub value: String,
}

impl DisplayField {
    /// `(key, value)` pair, handy for assertions and raw listings.
    pub fn pair(&self) -> (&str, &str) {
        (&self.key, &self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldGroup {
    pub category: Category,
    pub title: String,
    pub fields: Vec<DisplayField>,
}

impl FieldGroup {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "fields", rename_all = "snake_case")]
pub enum Profile {
    /// Catalogue fields grouped into cards.
    Groups(Vec<FieldGroup>),
    /// The record matched no catalogue field; every non-empty field as-is.
    RawDump(Vec<DisplayField>),
    /// The response was well formed but held no records.
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Normalized {
    pub shape: ShapeKind,
    /// Records present in the response beyond the first one.
    pub discarded_records: usize,
    pub profile: Profile,
}

impl Normalized {
    pub fn group(&self, category: Category) -> Option<&FieldGroup> {
        match &self.profile {
            Profile::Groups(groups) => groups.iter().find(|g| g.category == category),
            _ => None,
        }
    }
}

pub fn normalize(value: &Value, options: &NormalizeOptions) -> Result<Normalized> {
    let shape = ResponseShape::detect(value)?;
    let discarded_records = shape.len().saturating_sub(1);

    tracing::debug!(
        shape = ?shape.kind(),
        records = shape.len(),
        "Resolved response shape"
    );

    let profile = match shape.first_record()? {
        None => Profile::NoData,
        Some(record) => {
            let groups = project(record, options);
            if groups.is_empty() {
                tracing::debug!(
                    keys = record.len(),
                    "No catalogue fields in record, falling back to raw dump"
                );
                Profile::RawDump(raw_dump(record, options))
            } else {
                Profile::Groups(groups)
            }
        }
    };

    Ok(Normalized {
        shape: shape.kind(),
        discarded_records,
        profile,
    })
}

fn project(record: &Map<String, Value>, options: &NormalizeOptions) -> Vec<FieldGroup> {
    Category::ALL
        .iter()
        .filter_map(|&category| {
            let fields: Vec<DisplayField> = category
                .fields()
                .iter()
                .filter_map(|spec| project_field(record, spec, options))
                .collect();
            (!fields.is_empty()).then(|| FieldGroup {
                category,
                title: category.title().to_string(),
                fields,
            })
        })
        .collect()
}

fn project_field(
    record: &Map<String, Value>,
    spec: &FieldSpec,
    options: &NormalizeOptions,
) -> Option<DisplayField> {
    let raw = record.get(spec.key)?;
    let value = match (options.format(raw, spec.kind), options.blank_policy) {
        (Some(text), _) => text,
        (None, BlankPolicy::Placeholder) => NOT_AVAILABLE.to_string(),
        (None, BlankPolicy::Omit) => return None,
    };
    Some(DisplayField {
        key: spec.key.to_string(),
        label: spec.label.to_string(),
        value,
    })
}

fn raw_dump(record: &Map<String, Value>, options: &NormalizeOptions) -> Vec<DisplayField> {
    let verbatim = NormalizeOptions {
        placeholder: None,
        ..options.clone()
    };
    record
        .iter()
        .filter(|(_, v)| !verbatim.is_blank(v))
        .map(|(k, v)| DisplayField {
            key: k.clone(),
            label: k.clone(),
            value: to_display_string(v),
        })
        .collect()
}

fn array_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a [Value]> {
    map.get(key).and_then(Value::as_array).map(Vec::as_slice)
}

/// Strings as-is, everything else as compact JSON.
fn to_display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}{ELLIPSIS}", &text[..idx]),
        None => text.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
