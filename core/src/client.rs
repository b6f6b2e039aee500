//! Stateless HTTP request builder and response parser for the booking API.
//!
//! # Design
//! `ApiClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Collection operations are generic over `Resource`/`Editable`; the three
//! appointment transitions have their own pairs.
//!
//! Failed simple GETs always report a fixed message. Failed mutations report
//! the server's `{"error": ...}` text when the body carries one.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::resource::{Editable, Resource};
use crate::types::{Appointment, ErrorBody, Reschedule};

/// Synchronous, stateless client for the booking API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Collections
    // -----------------------------------------------------------------------

    pub fn build_list<R: Resource>(&self, filter: &R::Filter) -> HttpRequest {
        let path = match R::list_query(filter) {
            Some(query) => format!("{}/{}?{query}", self.base_url, R::PATH),
            None => format!("{}/{}", self.base_url, R::PATH),
        };
        bare(HttpMethod::Get, path)
    }

    pub fn build_get<R: Resource>(&self, id: Uuid) -> HttpRequest {
        bare(HttpMethod::Get, self.item_path::<R>(id))
    }

    pub fn build_create<R: Resource>(&self, input: &R::Create) -> Result<HttpRequest, ApiError> {
        with_json(HttpMethod::Post, format!("{}/{}", self.base_url, R::PATH), input)
    }

    pub fn build_update<R: Editable>(
        &self,
        id: Uuid,
        input: &R::Update,
    ) -> Result<HttpRequest, ApiError> {
        with_json(HttpMethod::Put, self.item_path::<R>(id), input)
    }

    pub fn build_delete<R: Editable>(&self, id: Uuid) -> HttpRequest {
        bare(HttpMethod::Delete, self.item_path::<R>(id))
    }

    pub fn parse_list<R: Resource>(&self, response: HttpResponse) -> Result<Vec<R>, ApiError> {
        check_fetch(&response, || format!("Failed to fetch {}", R::PATH))?;
        decode(&response.body)
    }

    pub fn parse_get<R: Resource>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_fetch(&response, || format!("Failed to fetch {}", R::SINGULAR))?;
        decode(&response.body)
    }

    pub fn parse_create<R: Resource>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_mutation(&response, || format!("Failed to create {}", R::SINGULAR))?;
        decode(&response.body)
    }

    pub fn parse_update<R: Editable>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_mutation(&response, || format!("Failed to update {}", R::SINGULAR))?;
        decode(&response.body)
    }

    pub fn parse_delete<R: Editable>(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_mutation(&response, || format!("Failed to delete {}", R::SINGULAR))
    }

    /// Status-only counterpart of `parse_create`; the body is not decoded.
    pub(crate) fn check_create<R: Resource>(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_mutation(&response, || format!("Failed to create {}", R::SINGULAR))
    }

    /// Status-only counterpart of `parse_update`; the body is not decoded.
    pub(crate) fn check_update<R: Editable>(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_mutation(&response, || format!("Failed to update {}", R::SINGULAR))
    }

    // -----------------------------------------------------------------------
    // Appointment transitions
    // -----------------------------------------------------------------------

    pub fn build_cancel_appointment(&self, id: Uuid) -> HttpRequest {
        bare(HttpMethod::Patch, format!("{}/cancel", self.item_path::<Appointment>(id)))
    }

    pub fn build_attend_appointment(&self, id: Uuid) -> HttpRequest {
        bare(HttpMethod::Patch, format!("{}/attend", self.item_path::<Appointment>(id)))
    }

    pub fn build_reschedule_appointment(
        &self,
        id: Uuid,
        slot: &Reschedule,
    ) -> Result<HttpRequest, ApiError> {
        with_json(
            HttpMethod::Patch,
            format!("{}/reschedule", self.item_path::<Appointment>(id)),
            slot,
        )
    }

    pub fn parse_cancel_appointment(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_mutation(&response, || "Failed to cancel appointment".to_string())
    }

    pub fn parse_attend_appointment(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_mutation(&response, || "Failed to attend appointment".to_string())
    }

    pub fn parse_reschedule_appointment(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_mutation(&response, || "Failed to reschedule appointment".to_string())
    }

    fn item_path<R: Resource>(&self, id: Uuid) -> String {
        format!("{}/{}/{id}", self.base_url, R::PATH)
    }
}

fn bare(method: HttpMethod, path: String) -> HttpRequest {
    HttpRequest {
        method,
        path,
        headers: Vec::new(),
        body: None,
    }
}

fn with_json<T: Serialize>(
    method: HttpMethod,
    path: String,
    payload: &T,
) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
    Ok(HttpRequest {
        method,
        path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Non-2xx on a read: fixed message, body ignored.
fn check_fetch(response: &HttpResponse, fallback: impl FnOnce() -> String) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Status {
        status: response.status,
        message: fallback(),
    })
}

/// Non-2xx on a write: server-supplied `error` when present, else the fallback.
fn check_mutation(
    response: &HttpResponse,
    fallback: impl FnOnce() -> String,
) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(fallback);
    Err(ApiError::Status {
        status: response.status,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppointmentStatus, Client, ClientInput, NewAppointment, Service};

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_clients_produces_correct_request() {
        let req = client().build_list::<Client>(&());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/clients");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_list_appointments_with_and_without_status() {
        let c = client();
        let req = c.build_list::<Appointment>(&None);
        assert_eq!(req.path, "http://localhost:3000/appointments");

        let req = c.build_list::<Appointment>(&Some(AppointmentStatus::Cancelled));
        assert_eq!(req.path, "http://localhost:3000/appointments?status=cancelled");
    }

    #[test]
    fn build_get_service_produces_correct_request() {
        let req = client().build_get::<Service>(Uuid::nil());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "http://localhost:3000/services/00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn build_create_appointment_carries_json_body() {
        let input = NewAppointment {
            client_id: Uuid::nil(),
            service_id: Uuid::nil(),
            date: "2025-03-05".to_string(),
            time: "09:30".to_string(),
        };
        let req = client().build_create::<Appointment>(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/appointments");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["date"], "2025-03-05");
        assert_eq!(body["time"], "09:30");
    }

    #[test]
    fn build_update_client_uses_put() {
        let input = ClientInput {
            name: "Ana".to_string(),
            phone: "8091234567".to_string(),
            email: Some("ana@example.com".to_string()),
        };
        let req = client().build_update::<Client>(Uuid::nil(), &input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(
            req.path,
            "http://localhost:3000/clients/00000000-0000-0000-0000-000000000000"
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["email"], "ana@example.com");
    }

    #[test]
    fn build_delete_service_has_no_body() {
        let req = client().build_delete::<Service>(Uuid::nil());
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }

    #[test]
    fn appointment_transitions_use_patch() {
        let c = client();
        let id = Uuid::nil();
        let cancel = c.build_cancel_appointment(id);
        assert_eq!(cancel.method, HttpMethod::Patch);
        assert!(cancel.path.ends_with("/appointments/00000000-0000-0000-0000-000000000000/cancel"));
        assert!(cancel.body.is_none());

        let attend = c.build_attend_appointment(id);
        assert_eq!(attend.method, HttpMethod::Patch);
        assert!(attend.path.ends_with("/attend"));

        let slot = Reschedule {
            date: "2025-04-01".to_string(),
            time: "14:00".to_string(),
        };
        let reschedule = c.build_reschedule_appointment(id, &slot).unwrap();
        assert_eq!(reschedule.method, HttpMethod::Patch);
        assert!(reschedule.path.ends_with("/reschedule"));
        let body: Reschedule = serde_json::from_str(reschedule.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, slot);
    }

    #[test]
    fn parse_list_clients_success() {
        let body = r#"[{"id":"00000000-0000-0000-0000-000000000001","name":"Ana","phone":"8091234567"}]"#;
        let clients = client().parse_list::<Client>(response(200, body)).unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].name, "Ana");
    }

    #[test]
    fn failed_fetch_ignores_server_message() {
        let err = client()
            .parse_list::<Appointment>(response(500, r#"{"error":"db down"}"#))
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch appointments");
        assert_eq!(err.status(), Some(500));

        let err = client().parse_get::<Service>(response(404, "")).unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch service");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn failed_mutation_prefers_server_message() {
        let err = client()
            .parse_create::<Appointment>(response(400, r#"{"error":"Slot already taken"}"#))
            .unwrap_err();
        assert_eq!(err.to_string(), "Slot already taken");
    }

    #[test]
    fn failed_mutation_falls_back_without_error_field() {
        let c = client();
        let err = c.parse_delete::<Client>(response(500, "internal error")).unwrap_err();
        assert_eq!(err.to_string(), "Failed to delete client");

        let err = c.parse_cancel_appointment(response(409, "{}")).unwrap_err();
        assert_eq!(err.to_string(), "Failed to cancel appointment");
    }

    #[test]
    fn empty_mutations_accept_any_2xx() {
        let c = client();
        assert!(c.parse_attend_appointment(response(204, "")).is_ok());
        assert!(c.parse_reschedule_appointment(response(200, "")).is_ok());
        assert!(c.parse_delete::<Service>(response(204, "")).is_ok());
    }

    #[test]
    fn status_checks_ignore_the_success_body() {
        let c = client();
        assert!(c.check_update::<Client>(response(204, "")).is_ok());
        assert!(c.check_create::<Client>(response(201, r#"{"ok":true}"#)).is_ok());

        let err = c.check_update::<Service>(response(422, "")).unwrap_err();
        assert_eq!(err.to_string(), "Failed to update service");
        let err = c
            .check_create::<Client>(response(400, r#"{"error":"Phone is required"}"#))
            .unwrap_err();
        assert_eq!(err.to_string(), "Phone is required");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ApiClient::new("http://localhost:3000/");
        let req = client.build_list::<Service>(&());
        assert_eq!(req.path, "http://localhost:3000/services");
    }

    #[test]
    fn from_config_uses_configured_base() {
        let client = ApiClient::from_config(&ClientConfig::new("https://salon.test/api/"));
        assert_eq!(client.base_url(), "https://salon.test/api");
    }

    #[test]
    fn parse_list_bad_json() {
        let err = client().parse_list::<Client>(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
