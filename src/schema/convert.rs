//! Validation and type conversion of caller-supplied credential attributes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::attribute::Attribute;
use crate::error::AppError;

/// A `{ name, value }` pair as received from callers. Values arrive as JSON
/// strings; anything else is rejected at conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialAttribute {
    pub name: String,
    pub value: Value,
}

impl CredentialAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A value coerced to its declared schema type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl From<AttributeValue> for Value {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::String(s) => Value::String(s),
            AttributeValue::Integer(i) => Value::from(i),
            AttributeValue::Boolean(b) => Value::Bool(b),
        }
    }
}

/// Output of [`validate_and_convert`]. Only constructed by conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertedAttribute {
    name: String,
    value: AttributeValue,
}

impl ConvertedAttribute {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    pub fn into_parts(self) -> (String, AttributeValue) {
        (self.name, self.value)
    }
}

/// Declared types the converter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeKind {
    String,
    Integer,
    Boolean,
}

impl AttributeKind {
    fn parse(kind: &str) -> Option<Self> {
        match kind {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }
}

/// Match every supplied attribute to exactly one schema attribute and convert
/// its value to the declared type.
///
/// Output order follows `attributes`. Exactly one schema attribute must be
/// left unmatched afterwards: the subject identifier, which callers never
/// supply.
pub fn validate_and_convert(
    descriptors: &[Attribute],
    attributes: Vec<CredentialAttribute>,
) -> Result<Vec<ConvertedAttribute>, AppError> {
    let mut remaining: HashMap<&str, &Attribute> = HashMap::with_capacity(descriptors.len());
    for descriptor in descriptors {
        if remaining.insert(descriptor.id.as_str(), descriptor).is_some() {
            return Err(AppError::DuplicateAttribute(descriptor.id.clone()));
        }
    }

    let mut converted = Vec::with_capacity(attributes.len());
    for attribute in attributes {
        let descriptor = remaining
            .remove(attribute.name.as_str())
            .ok_or_else(|| AppError::AttributeNotFound(attribute.name.clone()))?;
        let value = convert_value(descriptor, &attribute.name, attribute.value)?;
        converted.push(ConvertedAttribute {
            name: attribute.name,
            value,
        });
    }

    if remaining.len() != 1 {
        return Err(AppError::CountMismatch {
            remaining: remaining.len(),
        });
    }

    Ok(converted)
}

/// Build a credential subject object from converted attributes.
pub fn to_credential_subject(attributes: &[ConvertedAttribute]) -> Map<String, Value> {
    attributes
        .iter()
        .map(|a| (a.name.clone(), a.value.clone().into()))
        .collect()
}

fn convert_value(descriptor: &Attribute, name: &str, value: Value) -> Result<AttributeValue, AppError> {
    let kind = AttributeKind::parse(&descriptor.kind).ok_or_else(|| AppError::UnsupportedType {
        name: name.to_string(),
        kind: descriptor.kind.clone(),
    })?;

    let Value::String(raw) = value else {
        return Err(AppError::TypeMismatch(name.to_string()));
    };

    match kind {
        AttributeKind::String => Ok(AttributeValue::String(raw)),
        AttributeKind::Integer => raw
            .parse::<i64>()
            .map(AttributeValue::Integer)
            .map_err(|_| AppError::Parse {
                name: name.to_string(),
                expected: "an integer",
            }),
        AttributeKind::Boolean => parse_bool(&raw)
            .map(AttributeValue::Boolean)
            .ok_or_else(|| AppError::Parse {
                name: name.to_string(),
                expected: "a boolean",
            }),
    }
}

/// Accepts the usual boolean spellings: 1/0, t/f, true/false in lower,
/// upper and title case.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
