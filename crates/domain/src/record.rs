//! Device record — the normalized form handed to persistence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::device::{Device, DeviceAttribute};
use crate::id::{DeviceId, GroupId};
use crate::time::Timestamp;

/// Attributes keyed by their name.
pub type DeviceRecordAttributes = BTreeMap<String, DeviceAttribute>;

/// Storage representation of a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub id: DeviceId,
    pub attributes: DeviceRecordAttributes,
    pub group: Option<GroupId>,
    pub created_ts: Timestamp,
    pub updated_ts: Timestamp,
}

impl DeviceRecord {
    /// Project a validated [`Device`] into its storage form.
    ///
    /// Attributes are folded by name in request order, so when two share a
    /// name the later one wins. The registration path never sets a group.
    #[must_use]
    pub fn project(device: &Device, created_ts: Timestamp, updated_ts: Timestamp) -> Self {
        let attributes = device
            .attributes
            .iter()
            .map(|attr| (attr.name.clone(), attr.clone()))
            .collect();

        Self {
            id: device.id.clone(),
            attributes,
            group: None,
            created_ts,
            updated_ts,
        }
    }

    /// Overlay `incoming` attributes on top of the stored ones.
    ///
    /// Names present in `incoming` replace stored entries; every other
    /// stored entry is kept.
    pub fn merge_attributes(&mut self, incoming: DeviceRecordAttributes) {
        self.attributes.extend(incoming);
    }
}
