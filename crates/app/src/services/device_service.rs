//! Device service — use-cases for registering and reading devices.

use inventory_domain::device::Device;
use inventory_domain::error::{InventoryError, NotFoundError};
use inventory_domain::id::DeviceId;
use inventory_domain::record::DeviceRecord;
use inventory_domain::time;

use crate::ports::DeviceRepository;

/// Application service for device registration.
pub struct DeviceService<R> {
    repo: R,
}

impl<R: DeviceRepository> DeviceService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Project a decoded device into a record and hand it to the repository.
    ///
    /// Both timestamps of the projected record are set to the current time;
    /// the repository decides which of them survive on an existing device.
    ///
    /// # Errors
    ///
    /// Returns whatever the repository reports, unmodified. Nothing is
    /// retried.
    #[tracing::instrument(skip(self, device), fields(device_id = %device.id))]
    pub async fn add_device(&self, device: Device) -> Result<(), InventoryError> {
        let now = time::now();
        let record = DeviceRecord::project(&device, now, now);
        tracing::debug!(attributes = record.attributes.len(), "storing device");
        self.repo.add_device(record).await
    }

    /// Look up a device record by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] when no device with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_device(&self, id: &DeviceId) -> Result<DeviceRecord, InventoryError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "device",
                id: id.to_string(),
            }
            .into()
        })
    }
}
