//! Discriminated parser
//!
//! A thin validating pass-through: objects are checked for a recognised
//! `__type__` tag and handed back untouched, arrays are parsed element-wise,
//! everything else is returned as-is. No field-level validation happens
//! here; use [`Tagged::to_typed`] for that.

use crate::errors::{ClientError, Result};
use crate::types::responses::{JsonMap, ObjectKind, ResponseObject, DISCRIMINATOR};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// A wire object whose discriminator has been checked
///
/// The original field map (including `__type__`) is kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    kind: ObjectKind,
    fields: JsonMap,
}

impl Tagged {
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn fields(&self) -> &JsonMap {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn call_id(&self) -> Option<&str> {
        self.get("callId").and_then(Value::as_str)
    }

    /// Raw `responseStatus` string, for every variant that has one
    pub fn response_status(&self) -> Option<&str> {
        self.get("responseStatus").and_then(Value::as_str)
    }

    /// Validate the full shape of this object against its variant
    pub fn to_typed(&self) -> Result<ResponseObject> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }

    pub fn into_typed(self) -> Result<ResponseObject> {
        Ok(serde_json::from_value(Value::Object(self.fields))?)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl Serialize for Tagged {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Result of [`parse`]: arbitrary JSON, tagged where recognised
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Parsed {
    /// `null` or no value at all
    Null,
    /// String, number or boolean, unchanged
    Primitive(Value),
    List(Vec<Parsed>),
    Object(Tagged),
}

impl Parsed {
    pub fn is_null(&self) -> bool {
        matches!(self, Parsed::Null)
    }

    pub fn kind(&self) -> Option<ObjectKind> {
        self.as_tagged().map(Tagged::kind)
    }

    pub fn as_tagged(&self) -> Option<&Tagged> {
        match self {
            Parsed::Object(tagged) => Some(tagged),
            _ => None,
        }
    }

    pub fn into_tagged(self) -> Option<Tagged> {
        match self {
            Parsed::Object(tagged) => Some(tagged),
            _ => None,
        }
    }

    /// Convert back to plain JSON; equal to the parser input
    pub fn into_value(self) -> Value {
        match self {
            Parsed::Null => Value::Null,
            Parsed::Primitive(value) => value,
            Parsed::List(items) => Value::Array(items.into_iter().map(Parsed::into_value).collect()),
            Parsed::Object(tagged) => tagged.into_value(),
        }
    }
}

impl From<Parsed> for Value {
    fn from(parsed: Parsed) -> Self {
        parsed.into_value()
    }
}

/// Parse a JSON value, tagging every recognised object
pub fn parse(value: Value) -> Result<Parsed> {
    match value {
        Value::Null => Ok(Parsed::Null),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(Parsed::Primitive(value)),
        // Not failure-isolated: one bad element fails the whole array.
        Value::Array(items) => items
            .into_iter()
            .map(parse)
            .collect::<Result<Vec<_>>>()
            .map(Parsed::List),
        Value::Object(map) => tag_object(map).map(Parsed::Object),
    }
}

/// Like [`parse`], treating an absent value the same as `null`
pub fn parse_optional(value: Option<Value>) -> Result<Parsed> {
    value.map_or(Ok(Parsed::Null), parse)
}

/// Decode JSON text, then [`parse`] it
pub fn parse_str(text: &str) -> Result<Parsed> {
    let value: Value = serde_json::from_str(text)?;
    parse(value)
}

/// Check the discriminator of a single object
pub fn tag_object(fields: JsonMap) -> Result<Tagged> {
    let kind = discriminator(&fields)?;
    Ok(Tagged { kind, fields })
}

fn discriminator(fields: &JsonMap) -> Result<ObjectKind> {
    let tag = match fields.get(DISCRIMINATOR) {
        Some(tag) if !is_falsy(tag) => tag,
        _ => return Err(ClientError::MissingDiscriminator),
    };

    match tag {
        Value::String(s) => {
            ObjectKind::from_tag(s).ok_or_else(|| ClientError::UnknownDiscriminator(s.clone()))
        }
        other => Err(ClientError::UnknownDiscriminator(other.to_string())),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
