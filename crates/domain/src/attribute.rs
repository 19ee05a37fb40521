//! Typed attribute values attached to devices.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::DecodeError;

/// A single attribute value.
///
/// Only strings, numbers, and sequences whose elements are all strings or
/// all numbers can be represented. An empty sequence decodes as
/// [`AttributeValue::StringSequence`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Number(f64),
    StringSequence(Vec<String>),
    NumberSequence(Vec<f64>),
}

impl TryFrom<Value> for AttributeValue {
    type Error = DecodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Self::String(s)),
            Value::Number(n) => n
                .as_f64()
                .map(Self::Number)
                .ok_or(DecodeError::InvalidAttributeValue),
            Value::Array(items) => decode_sequence(items),
            Value::Null | Value::Bool(_) | Value::Object(_) => {
                Err(DecodeError::InvalidAttributeValue)
            }
        }
    }
}

fn decode_sequence(items: Vec<Value>) -> Result<AttributeValue, DecodeError> {
    let numeric = match items.first() {
        None | Some(Value::String(_)) => false,
        Some(Value::Number(_)) => true,
        Some(_) => return Err(DecodeError::InvalidAttributeValue),
    };

    if numeric {
        items
            .iter()
            .map(|item| item.as_f64().ok_or(DecodeError::InvalidAttributeValue))
            .collect::<Result<Vec<f64>, _>>()
            .map(AttributeValue::NumberSequence)
    } else {
        items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(DecodeError::InvalidAttributeValue),
            })
            .collect::<Result<Vec<String>, _>>()
            .map(AttributeValue::StringSequence)
    }
}

impl<'de> Deserialize<'de> for AttributeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::try_from(value).map_err(serde::de::Error::custom)
    }
}
