//! License claims and their canonical byte form.
//!
//! The record is serialized as compact JSON with a fixed field order and
//! `extra` keys sorted, so equal records always produce equal bytes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{LicenseError, LicenseResult};

/// A value stored under a key of [`LicenseRecord::extra`].
///
/// Opaque to verification; issuers use it for application-specific claims.
/// Integers above `i64::MAX` decode as [`ExtraValue::UInteger`]. JSON has no
/// NaN or infinity, so [`LicenseRecord::to_bytes`] rejects such floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraValue {
    Null,
    Bool(bool),
    Integer(i64),
    UInteger(u64),
    Float(f64),
    String(String),
    List(Vec<ExtraValue>),
    Map(BTreeMap<String, ExtraValue>),
}

impl From<bool> for ExtraValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ExtraValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u64> for ExtraValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Self::UInteger(value), Self::Integer)
    }
}

impl From<f64> for ExtraValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ExtraValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ExtraValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<ExtraValue>> From<Vec<T>> for ExtraValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl ExtraValue {
    fn has_non_finite(&self) -> bool {
        match self {
            Self::Float(f) => !f.is_finite(),
            Self::List(items) => items.iter().any(Self::has_non_finite),
            Self::Map(map) => map.values().any(Self::has_non_finite),
            _ => false,
        }
    }
}

/// The claims bound together by a license.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Random 128-bit id, hyphen-grouped hex.
    pub id: String,
    pub product_name: String,
    pub version: String,

    /// Bound MAC address; empty matches any machine.
    #[serde(default)]
    pub mac: String,
    /// Bound system UUID; empty matches any machine.
    #[serde(default)]
    pub uuid: String,
    /// Bound CPU id; empty matches any machine.
    #[serde(default, rename = "cpuid", alias = "cpu_id")]
    pub cpu_id: String,

    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    /// Maximum concurrent users; 0 means unbounded.
    #[serde(default)]
    pub max_users: u32,

    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extra: BTreeMap<String, ExtraValue>,
}

impl LicenseRecord {
    /// Serializes the record to its canonical bytes.
    ///
    /// Fails if an `extra` value holds a NaN or infinite float.
    pub fn to_bytes(&self) -> LicenseResult<Vec<u8>> {
        if let Some((key, _)) = self.extra.iter().find(|(_, v)| v.has_non_finite()) {
            return Err(LicenseError::InvalidConfig(format!(
                "extra value {key:?} holds a non-finite number"
            )));
        }
        Ok(serde_json::to_vec(self)?)
    }

    /// Parses a record from bytes produced by [`LicenseRecord::to_bytes`]
    /// (or by an older issuer using the same JSON keys).
    pub fn from_bytes(bytes: &[u8]) -> LicenseResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| LicenseError::InvalidFormat(format!("failed to parse license: {e}")))
    }

    /// Returns true if none of the binding fields are set.
    #[must_use]
    pub fn is_unbound(&self) -> bool {
        self.mac.is_empty() && self.uuid.is_empty() && self.cpu_id.is_empty()
    }

    /// Returns true if `feature` is listed in the license.
    #[must_use]
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
