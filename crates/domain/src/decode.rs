//! Request decoding — untrusted bytes in, a validated [`Device`] out.
//!
//! Decoding happens in two passes. The payload is first parsed into a loose
//! wire shape, so syntax errors and fields of the wrong type surface as
//! [`DecodeError::MalformedBody`] with the parser's description. The wire
//! shape is then checked field by field: the device `id` first, then every
//! attribute in order (its `name` before its `value`). Unknown top-level
//! fields, including `group`, are ignored. A `null` payload or a `null`
//! attribute entry reads as one with every field absent.

use serde::Deserialize;
use serde::de::{DeserializeOwned, Unexpected};
use serde_json::Value;

use crate::attribute::AttributeValue;
use crate::device::{Device, DeviceAttribute};
use crate::error::{DecodeError, RequiredField};
use crate::id::DeviceId;

#[derive(Default, Deserialize)]
struct DeviceRequest {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    attributes: Option<Vec<Value>>,
}

#[derive(Default, Deserialize)]
struct AttributeRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    value: Value,
}

impl AttributeRequest {
    fn validate(self) -> Result<DeviceAttribute, DecodeError> {
        let name = self
            .name
            .filter(|name| !name.is_empty())
            .ok_or(DecodeError::MissingField(RequiredField::AttributeName))?;
        let value = AttributeValue::try_from(self.value)?;

        Ok(DeviceAttribute {
            name,
            description: self.description,
            value,
        })
    }
}

/// Read `T` from a JSON object, with `null` standing for an empty one.
///
/// Derived struct impls would also fill `T` positionally from an array,
/// which the wire format does not allow.
fn from_object<T: DeserializeOwned + Default>(value: Value) -> Result<T, DecodeError> {
    match value {
        Value::Null => Ok(T::default()),
        Value::Object(_) => serde_json::from_value(value).map_err(DecodeError::MalformedBody),
        other => Err(DecodeError::MalformedBody(serde::de::Error::invalid_type(
            unexpected(&other),
            &"a JSON object",
        ))),
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(n) => {
            if let Some(n) = n.as_u64() {
                Unexpected::Unsigned(n)
            } else if let Some(n) = n.as_i64() {
                Unexpected::Signed(n)
            } else {
                n.as_f64().map_or(Unexpected::Other("number"), Unexpected::Float)
            }
        }
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

/// Decode a registration payload into a [`Device`].
///
/// # Errors
///
/// - [`DecodeError::EmptyBody`] when `body` has no bytes at all
/// - [`DecodeError::MalformedBody`] when `body` is not JSON, is not an
///   object, or a known field has the wrong type
/// - [`DecodeError::MissingField`] when `id` or an attribute `name` is
///   absent or empty
/// - [`DecodeError::InvalidAttributeValue`] when an attribute value is not a
///   string, a number, or a homogeneous sequence of either
pub fn decode_device(body: &[u8]) -> Result<Device, DecodeError> {
    if body.is_empty() {
        return Err(DecodeError::EmptyBody);
    }

    let payload: Value = serde_json::from_slice(body).map_err(DecodeError::MalformedBody)?;
    let req: DeviceRequest = from_object(payload)?;
    let attributes = req
        .attributes
        .unwrap_or_default()
        .into_iter()
        .map(from_object::<AttributeRequest>)
        .collect::<Result<Vec<_>, _>>()?;

    let id = req
        .id
        .and_then(|id| DeviceId::try_from(id).ok())
        .ok_or(DecodeError::MissingField(RequiredField::Id))?;

    let attributes = attributes
        .into_iter()
        .map(AttributeRequest::validate)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Device {
        id,
        attributes,
        updated_ts: None,
    })
}
