//! JSON REST handlers for devices.

use std::str::FromStr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use inventory_app::ports::DeviceRepository;
use inventory_domain::decode::decode_device;
use inventory_domain::error::{InventoryError, NotFoundError};
use inventory_domain::id::DeviceId;
use inventory_domain::record::DeviceRecord;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<DeviceRecord>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created,
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created => StatusCode::CREATED.into_response(),
        }
    }
}

/// `POST /devices`
///
/// The body is taken as raw bytes so that an empty or malformed payload is
/// classified by [`decode_device`]. A body that cannot be read at all keeps
/// the rejection's status but gets the JSON error body.
pub async fn create<DR>(
    State(state): State<AppState<DR>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<CreateResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let device = decode_device(&body?)?;
    state.device_service.add_device(device).await?;
    Ok(CreateResponse::Created)
}

/// `GET /devices/{id}`
pub async fn get<DR>(
    State(state): State<AppState<DR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    let device_id = DeviceId::from_str(&id).map_err(|_| {
        ApiError::from(InventoryError::from(NotFoundError {
            entity: "device",
            id: id.clone(),
        }))
    })?;
    let record = state.device_service.get_device(&device_id).await?;
    Ok(GetResponse::Ok(Json(record)))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use inventory_app::services::device_service::DeviceService;
    use inventory_domain::attribute::AttributeValue;
    use inventory_domain::id::DeviceId;
    use inventory_domain::record::DeviceRecord;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::router;

    #[derive(Clone, Default)]
    struct RecordingRepo {
        stored: Arc<Mutex<Vec<DeviceRecord>>>,
    }

    impl DeviceRepository for RecordingRepo {
        async fn add_device(&self, record: DeviceRecord) -> Result<(), InventoryError> {
            self.stored.lock().unwrap().push(record);
            Ok(())
        }

        async fn get_by_id(&self, id: &DeviceId) -> Result<Option<DeviceRecord>, InventoryError> {
            let stored = self.stored.lock().unwrap();
            Ok(stored.iter().rev().find(|r| &r.id == id).cloned())
        }
    }

    struct FailingRepo;

    impl DeviceRepository for FailingRepo {
        async fn add_device(&self, _record: DeviceRecord) -> Result<(), InventoryError> {
            Err(InventoryError::Storage("internal error".into()))
        }

        async fn get_by_id(&self, _id: &DeviceId) -> Result<Option<DeviceRecord>, InventoryError> {
            Err(InventoryError::Storage("internal error".into()))
        }
    }

    fn app<DR>(repo: DR) -> axum::Router
    where
        DR: DeviceRepository + Send + Sync + 'static,
    {
        router::build(AppState::new(DeviceService::new(repo)))
    }

    async fn post(app: axum::Router, body: impl Into<Body>) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/0.1.0/devices")
                    .header("content-type", "application/json")
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn error_body(message: &str) -> String {
        json!({ "error": message }).to_string()
    }

    fn valid_payload() -> String {
        json!({
            "id": "id-0001",
            "attributes": [
                {"name": "a1", "value": "00:00:00:01", "description": "ddd"},
                {"name": "a2", "value": 123.2, "description": "ddd"},
                {"name": "a3", "value": ["00:00:00:01", "00"], "description": "ddd"},
            ],
        })
        .to_string()
    }

    #[tokio::test]
    async fn should_return_bad_request_when_body_is_empty() {
        let repo = RecordingRepo::default();
        let (status, body) = post(app(repo.clone()), Body::empty()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            error_body("failed to decode request body: JSON payload is empty")
        );
        assert!(repo.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_return_bad_request_when_body_is_garbled() {
        let (status, body) = post(app(RecordingRepo::default()), "foo bar").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.starts_with(r#"{"error":"failed to decode request body: "#));
    }

    #[tokio::test]
    async fn should_return_bad_request_when_attributes_have_wrong_type() {
        let payload = json!({"id": "id-0001", "attributes": 123}).to_string();
        let (status, body) = post(app(RecordingRepo::default()), payload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.starts_with(
            r#"{"error":"failed to decode request body: invalid type: integer `123`, expected a sequence"#
        ));
    }

    #[tokio::test]
    async fn should_return_bad_request_when_attribute_is_not_an_object() {
        let repo = RecordingRepo::default();
        let payload = json!({"id": "id-0001", "attributes": [1]}).to_string();
        let (status, body) = post(app(repo.clone()), payload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.starts_with(
            r#"{"error":"failed to decode request body: invalid type: integer `1`"#
        ));
        assert!(repo.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_return_json_error_when_body_exceeds_limit() {
        let repo = RecordingRepo::default();
        let oversized = vec![b' '; 2 * 1024 * 1024 + 1];
        let (status, body) = post(app(repo.clone()), oversized).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(!body["error"].as_str().unwrap().is_empty());
        assert!(repo.stored.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_return_bad_request_when_id_is_missing() {
        for payload in [
            json!({}),
            json!({"attributes": [{"name": "a1", "value": "v"}, {"name": "a2", "value": 2}]}),
        ] {
            let (status, body) = post(app(RecordingRepo::default()), payload.to_string()).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, error_body("'id' field required"));
        }
    }

    #[tokio::test]
    async fn should_return_bad_request_when_attribute_value_is_mixed_sequence() {
        let payload = json!({
            "id": "id-0001",
            "attributes": [
                {"name": "asd", "value": ["asd", 123]},
                {"name": "asd2", "value": [123, "asd"]},
            ],
        });
        let (status, body) = post(app(RecordingRepo::default()), payload.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, error_body("invalid attribute value provided"));
    }

    #[tokio::test]
    async fn should_return_bad_request_when_attribute_name_is_missing() {
        let payload = json!({
            "id": "id-0001",
            "attributes": [
                {"name": "a1", "value": "ok"},
                {"value": "23"},
            ],
        });
        let (status, body) = post(app(RecordingRepo::default()), payload.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, error_body("attribute 'name' field required"));
    }

    #[tokio::test]
    async fn should_return_created_with_empty_body_when_payload_is_valid() {
        let repo = RecordingRepo::default();
        let (status, body) = post(app(repo.clone()), valid_payload()).await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(body.is_empty());

        let stored = repo.stored.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id.as_str(), "id-0001");
        assert_eq!(
            stored[0].attributes["a3"].value,
            AttributeValue::StringSequence(vec!["00:00:00:01".to_string(), "00".to_string()])
        );
    }

    #[tokio::test]
    async fn should_return_internal_error_with_storage_message_when_persistence_fails() {
        let payload = json!({
            "id": "id-0001",
            "attributes": [{"name": "name1", "value": "value4"}],
        });
        let (status, body) = post(app(FailingRepo), payload.to_string()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"error":"internal error"}"#);
    }

    #[tokio::test]
    async fn should_return_stored_record_when_getting_device() {
        let repo = RecordingRepo::default();
        let app = app(repo);
        let (status, _) = post(app.clone(), valid_payload()).await;
        assert_eq!(status, StatusCode::CREATED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/0.1.0/devices/id-0001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let record: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(record["id"], "id-0001");
        assert_eq!(record["attributes"]["a2"]["value"], 123.2);
    }

    #[tokio::test]
    async fn should_return_not_found_when_device_is_unknown() {
        let response = app(RecordingRepo::default())
            .oneshot(
                Request::builder()
                    .uri("/api/0.1.0/devices/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(bytes.to_vec()).unwrap(),
            error_body("device 'missing' not found")
        );
    }
}
