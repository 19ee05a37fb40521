//! `SQLite` implementation of [`DeviceRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use inventory_app::ports::DeviceRepository;
use inventory_domain::error::InventoryError;
use inventory_domain::id::{DeviceId, GroupId};
use inventory_domain::record::{DeviceRecord, DeviceRecordAttributes};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`DeviceRecord`].
struct Wrapper(DeviceRecord);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<DeviceRecord> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let group_id: Option<String> = row.try_get("group_id")?;
        let attributes_json: String = row.try_get("attributes")?;
        let created_ts: String = row.try_get("created_ts")?;
        let updated_ts: String = row.try_get("updated_ts")?;

        let id = DeviceId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let group = group_id
            .map(|s| GroupId::from_str(&s))
            .transpose()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let attributes: DeviceRecordAttributes = serde_json::from_str(&attributes_json)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let created_ts = chrono::DateTime::parse_from_rfc3339(&created_ts)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();
        let updated_ts = chrono::DateTime::parse_from_rfc3339(&updated_ts)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();

        Ok(Self(DeviceRecord {
            id,
            attributes,
            group,
            created_ts,
            updated_ts,
        }))
    }
}

const SELECT_BY_ID: &str = "SELECT * FROM devices WHERE id = ?";

const INSERT_IF_ABSENT: &str = r"
    INSERT INTO devices (id, group_id, attributes, created_ts, updated_ts)
    VALUES (?, ?, ?, ?, ?)
    ON CONFLICT(id) DO NOTHING
";

const UPDATE: &str = r"
    UPDATE devices
    SET group_id = ?, attributes = ?, updated_ts = ?
    WHERE id = ?
";

/// `SQLite`-backed device repository.
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Fold an incoming record into the stored one.
///
/// The stored creation time and group are kept, incoming attributes replace
/// stored ones of the same name, and the update time moves forward.
fn merge(stored: Option<DeviceRecord>, incoming: DeviceRecord) -> DeviceRecord {
    let Some(mut stored) = stored else {
        return incoming;
    };
    stored.merge_attributes(incoming.attributes);
    stored.group = stored.group.or(incoming.group);
    stored.updated_ts = incoming.updated_ts;
    stored
}

impl DeviceRepository for SqliteDeviceRepository {
    async fn add_device(&self, record: DeviceRecord) -> Result<(), InventoryError> {
        let device_id = record.id.clone();
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        // Write before reading: the transaction must hold the write lock
        // when it loads the stored record.
        let attributes_json =
            serde_json::to_string(&record.attributes).map_err(StorageError::from)?;
        let inserted = sqlx::query(INSERT_IF_ABSENT)
            .bind(record.id.as_str())
            .bind(record.group.as_ref().map(GroupId::as_str))
            .bind(&attributes_json)
            .bind(record.created_ts.to_rfc3339())
            .bind(record.updated_ts.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?
            .rows_affected()
            == 1;

        if !inserted {
            let stored: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(record.id.as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            let merged = merge(Wrapper::maybe(stored), record);

            let attributes_json =
                serde_json::to_string(&merged.attributes).map_err(StorageError::from)?;
            sqlx::query(UPDATE)
                .bind(merged.group.as_ref().map(GroupId::as_str))
                .bind(&attributes_json)
                .bind(merged.updated_ts.to_rfc3339())
                .bind(merged.id.as_str())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
        }

        tx.commit().await.map_err(StorageError::from)?;

        tracing::debug!(%device_id, is_new = inserted, "device stored");
        Ok(())
    }

    async fn get_by_id(&self, id: &DeviceId) -> Result<Option<DeviceRecord>, InventoryError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }
}
