//! Device — a managed endpoint as described by a registration request.

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeValue;
use crate::id::DeviceId;
use crate::time::Timestamp;

/// A named, typed value reported for a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceAttribute {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: AttributeValue,
}

impl DeviceAttribute {
    /// Create an attribute without a description.
    #[must_use]
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            name: name.into(),
            description: None,
            value,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A device in its wire form: identifier plus attributes in request order.
///
/// Registration payloads become devices through
/// [`decode_device`](crate::decode::decode_device), which validates them.
/// `updated_ts` is never read from the request; it stays `None` until the
/// persistence layer stamps it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    pub id: DeviceId,
    pub attributes: Vec<DeviceAttribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_ts: Option<Timestamp>,
}

impl Device {
    /// Create a device with no attributes.
    #[must_use]
    pub fn new(id: DeviceId) -> Self {
        Self {
            id,
            attributes: Vec::new(),
            updated_ts: None,
        }
    }

    /// Append an attribute, keeping insertion order.
    #[must_use]
    pub fn with_attribute(mut self, attribute: DeviceAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn should_keep_attributes_in_insertion_order() {
        let device = Device::new(DeviceId::from_str("id-0001").unwrap())
            .with_attribute(DeviceAttribute::new(
                "mac",
                AttributeValue::String("00:00:00:01".to_string()),
            ))
            .with_attribute(DeviceAttribute::new("cpu", AttributeValue::Number(4.0)));

        let names: Vec<&str> = device.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["mac", "cpu"]);
        assert!(device.updated_ts.is_none());
    }

    #[test]
    fn should_omit_empty_description_when_serializing() {
        let attr = DeviceAttribute::new("mac", AttributeValue::String("x".to_string()));
        let json = serde_json::to_string(&attr).unwrap();
        assert_eq!(json, r#"{"name":"mac","value":"x"}"#);

        let json = serde_json::to_string(&attr.with_description("ddd")).unwrap();
        assert_eq!(json, r#"{"name":"mac","description":"ddd","value":"x"}"#);
    }
}
