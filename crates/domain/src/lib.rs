//! # inventory-domain
//!
//! Pure domain model for the device inventory service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Attribute values** (string, number, homogeneous sequences)
//! - Define **Devices** as received on the wire (id + ordered attributes)
//! - Define **Device records** (the storage projection, attributes keyed by name)
//! - Decode untrusted request payloads into devices, classifying every failure
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod attribute;
pub mod decode;
pub mod device;
pub mod record;
