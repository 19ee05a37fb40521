//! Storage port — repository trait for device persistence.

use std::future::Future;

use inventory_domain::error::InventoryError;
use inventory_domain::id::DeviceId;
use inventory_domain::record::DeviceRecord;

/// Persistence capability for [`DeviceRecord`]s.
///
/// Implementations own their concurrency discipline; callers treat every
/// method as a single call that either completes or fails.
pub trait DeviceRepository {
    /// Store a device record, creating it or merging it into an existing one.
    fn add_device(
        &self,
        record: DeviceRecord,
    ) -> impl Future<Output = Result<(), InventoryError>> + Send;

    /// Get a device record by its identifier.
    fn get_by_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Option<DeviceRecord>, InventoryError>> + Send;
}
