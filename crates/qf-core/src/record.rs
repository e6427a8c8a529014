//! Stop place and quay records as they travel through the export pipeline.
//!
//! Only the attributes the flattening needs are modelled explicitly. Anything
//! else on a record is kept in `other` and carried through untouched.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{NetexId, PublicCode};

/// All items stored under one key-value key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Value {
    items: Vec<String>,
}

impl Value {
    /// Creates a value holding a single item.
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            items: vec![item.into()],
        }
    }

    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

/// Open-ended attribute bag attached to NeTEx entities.
pub type KeyValues = BTreeMap<String, Value>;

/// Code assigned by the system a record was imported from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateCode {
    /// Source-type tag, e.g. `HSL/JORE-4`.
    #[serde(rename = "type")]
    pub code_type: String,
    pub value: String,
}

/// Effective instant range of an entity version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidBetween {
    pub from_date: DateTime<Utc>,
    /// `None` means valid until further notice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_date: Option<DateTime<Utc>>,
}

/// A boarding location (platform, stand) belonging to a stop place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netex_id: Option<NetexId>,

    #[serde(default)]
    pub version: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_code: Option<PublicCode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_code: Option<PrivateCode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "KeyValues::is_empty")]
    pub key_values: KeyValues,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_between: Option<ValidBetween>,

    /// Attributes not interpreted by this crate.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl Quay {
    /// Returns the source-type tag of the quay, if any.
    pub fn source_type(&self) -> Option<&str> {
        self.private_code.as_ref().map(|code| code.code_type.as_str())
    }

    /// Copies the quay without its persistent identity, so the copy can be
    /// stored as a new version.
    #[must_use]
    pub fn detached_copy(&self) -> Self {
        Self {
            netex_id: None,
            version: 0,
            ..self.clone()
        }
    }
}

/// A stop place and the quays it owns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPlace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netex_id: Option<NetexId>,

    #[serde(default)]
    pub version: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_code: Option<PrivateCode>,

    #[serde(default)]
    pub quays: Vec<Quay>,

    /// Attributes not interpreted by this crate.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl StopPlace {
    /// Human-readable reference used in logs and error messages.
    pub fn label(&self) -> String {
        self.netex_id.as_ref().map_or_else(
            || self.name.clone().unwrap_or_else(|| "<unnamed stop place>".to_string()),
            ToString::to_string,
        )
    }
}

/// A record carrying a string-keyed, multi-valued attribute bag.
///
/// This lets extraction work with different record representations
/// (e.g., `Quay`, or test fixtures).
pub trait KeyValueRecord {
    /// Returns the value stored under `key`, if present.
    fn key_value(&self, key: &str) -> Option<&Value>;

    /// Human-readable reference used in error messages.
    fn record_label(&self) -> String;
}

impl KeyValueRecord for Quay {
    fn key_value(&self, key: &str) -> Option<&Value> {
        self.key_values.get(key)
    }

    fn record_label(&self) -> String {
        match (&self.netex_id, &self.public_code) {
            (Some(id), _) => format!("quay {id}"),
            (None, Some(code)) => format!("quay with public code {code}"),
            (None, None) => "unidentified quay".to_string(),
        }
    }
}
