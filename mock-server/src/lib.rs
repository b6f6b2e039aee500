//! In-memory stand-in for the booking backend.
//!
//! Implements the appointments/clients/services REST contract the client core
//! consumes, including the `{"error": "..."}` body on rejected writes. Lists
//! come back in insertion order.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Scheduled,
    Attended,
    Cancelled,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub date: String,
    pub time: String,
    pub status: Status,
}

#[derive(Deserialize)]
pub struct NewAppointment {
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub date: String,
    pub time: String,
}

#[derive(Deserialize)]
pub struct Reschedule {
    pub date: String,
    pub time: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct ClientInput {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub duration_minutes: u32,
}

#[derive(Deserialize)]
pub struct ServiceInput {
    pub name: String,
    pub price: f64,
    pub duration_minutes: u32,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<Status>,
}

#[derive(Default)]
pub struct Tables {
    pub appointments: Vec<Appointment>,
    pub clients: Vec<Client>,
    pub services: Vec<Service>,
}

pub type Db = Arc<RwLock<Tables>>;

/// A rejected request, rendered as `{"error": message}`.
#[derive(Debug)]
pub struct Rejection(StatusCode, String);

impl Rejection {
    fn bad_request(message: &str) -> Self {
        Self(StatusCode::BAD_REQUEST, message.to_string())
    }

    fn not_found(what: &str) -> Self {
        Self(StatusCode::NOT_FOUND, format!("{what} not found"))
    }

    fn conflict(message: &str) -> Self {
        Self(StatusCode::CONFLICT, message.to_string())
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (self.0, Json(serde_json::json!({ "error": self.1 }))).into_response()
    }
}

impl From<JsonRejection> for Rejection {
    fn from(rejection: JsonRejection) -> Self {
        Self(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for Rejection {
    fn from(rejection: PathRejection) -> Self {
        Self(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for Rejection {
    fn from(rejection: QueryRejection) -> Self {
        Self(rejection.status(), rejection.body_text())
    }
}

// Extractors whose failures render as `{"error"}` like every other rejection.

#[derive(FromRequest, Deserialize)]
#[from_request(via(Json), rejection(Rejection))]
#[serde(transparent)]
struct Body<T>(T);

#[derive(FromRequestParts, Deserialize)]
#[from_request(via(Path), rejection(Rejection))]
#[serde(transparent)]
struct Id(Uuid);

#[derive(FromRequestParts, Deserialize)]
#[from_request(via(Query), rejection(Rejection))]
#[serde(transparent)]
struct Filter(ListQuery);

pub fn app() -> Router {
    app_with(Db::default())
}

/// Router over an existing table set, for tests that seed data.
pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/appointments", get(list_appointments).post(create_appointment))
        .route("/appointments/{id}", get(get_appointment))
        .route("/appointments/{id}/cancel", patch(cancel_appointment))
        .route("/appointments/{id}/attend", patch(attend_appointment))
        .route("/appointments/{id}/reschedule", patch(reschedule_appointment))
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/services", get(list_services).post(create_service))
        .route(
            "/services/{id}",
            get(get_service).put(update_service).delete(delete_service),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

async fn list_appointments(
    State(db): State<Db>,
    Filter(query): Filter,
) -> Json<Vec<Appointment>> {
    let tables = db.read().await;
    let appointments = tables
        .appointments
        .iter()
        .filter(|a| query.status.map_or(true, |status| a.status == status))
        .cloned()
        .collect();
    Json(appointments)
}

async fn get_appointment(
    State(db): State<Db>,
    Id(id): Id,
) -> Result<Json<Appointment>, Rejection> {
    let tables = db.read().await;
    tables
        .appointments
        .iter()
        .find(|a| a.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| Rejection::not_found("Appointment"))
}

async fn create_appointment(
    State(db): State<Db>,
    Body(input): Body<NewAppointment>,
) -> Result<(StatusCode, Json<Appointment>), Rejection> {
    if input.date.trim().is_empty() || input.time.trim().is_empty() {
        return Err(Rejection::bad_request("Date and time are required"));
    }
    let mut tables = db.write().await;
    if !tables.clients.iter().any(|c| c.id == input.client_id) {
        return Err(Rejection::bad_request("Unknown client"));
    }
    if !tables.services.iter().any(|s| s.id == input.service_id) {
        return Err(Rejection::bad_request("Unknown service"));
    }
    if slot_taken(&tables, None, &input.date, &input.time) {
        return Err(Rejection::conflict("Time slot already booked"));
    }
    let appointment = Appointment {
        id: Uuid::new_v4(),
        client_id: input.client_id,
        service_id: input.service_id,
        date: input.date,
        time: input.time,
        status: Status::Scheduled,
    };
    tables.appointments.push(appointment.clone());
    Ok((StatusCode::CREATED, Json(appointment)))
}

async fn cancel_appointment(
    State(db): State<Db>,
    Id(id): Id,
) -> Result<StatusCode, Rejection> {
    transition(&db, id, Status::Cancelled).await
}

async fn attend_appointment(
    State(db): State<Db>,
    Id(id): Id,
) -> Result<StatusCode, Rejection> {
    transition(&db, id, Status::Attended).await
}

async fn reschedule_appointment(
    State(db): State<Db>,
    Id(id): Id,
    Body(input): Body<Reschedule>,
) -> Result<StatusCode, Rejection> {
    if input.date.trim().is_empty() || input.time.trim().is_empty() {
        return Err(Rejection::bad_request("Date and time are required"));
    }
    let mut tables = db.write().await;
    let index = tables
        .appointments
        .iter()
        .position(|a| a.id == id)
        .ok_or_else(|| Rejection::not_found("Appointment"))?;
    if tables.appointments[index].status != Status::Scheduled {
        return Err(Rejection::conflict(
            "Only scheduled appointments can be rescheduled",
        ));
    }
    if slot_taken(&tables, Some(id), &input.date, &input.time) {
        return Err(Rejection::conflict("Time slot already booked"));
    }
    let appointment = &mut tables.appointments[index];
    appointment.date = input.date;
    appointment.time = input.time;
    Ok(StatusCode::NO_CONTENT)
}

/// Move a scheduled appointment to a terminal status.
async fn transition(db: &Db, id: Uuid, to: Status) -> Result<StatusCode, Rejection> {
    let mut tables = db.write().await;
    let appointment = tables
        .appointments
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| Rejection::not_found("Appointment"))?;
    match appointment.status {
        Status::Scheduled => {
            appointment.status = to;
            Ok(StatusCode::NO_CONTENT)
        }
        Status::Cancelled => Err(Rejection::conflict("Appointment is already cancelled")),
        Status::Attended => Err(Rejection::conflict("Appointment was already attended")),
    }
}

fn slot_taken(tables: &Tables, except: Option<Uuid>, date: &str, time: &str) -> bool {
    tables.appointments.iter().any(|a| {
        Some(a.id) != except && a.status == Status::Scheduled && a.date == date && a.time == time
    })
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

async fn list_clients(State(db): State<Db>) -> Json<Vec<Client>> {
    Json(db.read().await.clients.clone())
}

async fn get_client(
    State(db): State<Db>,
    Id(id): Id,
) -> Result<Json<Client>, Rejection> {
    let tables = db.read().await;
    tables
        .clients
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| Rejection::not_found("Client"))
}

async fn create_client(
    State(db): State<Db>,
    Body(input): Body<ClientInput>,
) -> Result<(StatusCode, Json<Client>), Rejection> {
    validate_client(&input)?;
    let client = Client {
        id: Uuid::new_v4(),
        name: input.name,
        phone: input.phone,
        email: input.email,
    };
    db.write().await.clients.push(client.clone());
    Ok((StatusCode::CREATED, Json(client)))
}

async fn update_client(
    State(db): State<Db>,
    Id(id): Id,
    Body(input): Body<ClientInput>,
) -> Result<Json<Client>, Rejection> {
    validate_client(&input)?;
    let mut tables = db.write().await;
    let client = tables
        .clients
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| Rejection::not_found("Client"))?;
    client.name = input.name;
    client.phone = input.phone;
    client.email = input.email;
    Ok(Json(client.clone()))
}

async fn delete_client(
    State(db): State<Db>,
    Id(id): Id,
) -> Result<StatusCode, Rejection> {
    let mut tables = db.write().await;
    if tables
        .appointments
        .iter()
        .any(|a| a.client_id == id && a.status == Status::Scheduled)
    {
        return Err(Rejection::conflict("Client has scheduled appointments"));
    }
    let before = tables.clients.len();
    tables.clients.retain(|c| c.id != id);
    if tables.clients.len() == before {
        return Err(Rejection::not_found("Client"));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn validate_client(input: &ClientInput) -> Result<(), Rejection> {
    if input.name.trim().is_empty() {
        return Err(Rejection::bad_request("Name is required"));
    }
    if input.phone.trim().is_empty() {
        return Err(Rejection::bad_request("Phone is required"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

async fn list_services(State(db): State<Db>) -> Json<Vec<Service>> {
    Json(db.read().await.services.clone())
}

async fn get_service(
    State(db): State<Db>,
    Id(id): Id,
) -> Result<Json<Service>, Rejection> {
    let tables = db.read().await;
    tables
        .services
        .iter()
        .find(|s| s.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| Rejection::not_found("Service"))
}

async fn create_service(
    State(db): State<Db>,
    Body(input): Body<ServiceInput>,
) -> Result<(StatusCode, Json<Service>), Rejection> {
    validate_service(&input)?;
    let service = Service {
        id: Uuid::new_v4(),
        name: input.name,
        price: input.price,
        duration_minutes: input.duration_minutes,
    };
    db.write().await.services.push(service.clone());
    Ok((StatusCode::CREATED, Json(service)))
}

async fn update_service(
    State(db): State<Db>,
    Id(id): Id,
    Body(input): Body<ServiceInput>,
) -> Result<Json<Service>, Rejection> {
    validate_service(&input)?;
    let mut tables = db.write().await;
    let service = tables
        .services
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| Rejection::not_found("Service"))?;
    service.name = input.name;
    service.price = input.price;
    service.duration_minutes = input.duration_minutes;
    Ok(Json(service.clone()))
}

async fn delete_service(
    State(db): State<Db>,
    Id(id): Id,
) -> Result<StatusCode, Rejection> {
    let mut tables = db.write().await;
    let before = tables.services.len();
    tables.services.retain(|s| s.id != id);
    if tables.services.len() == before {
        return Err(Rejection::not_found("Service"));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn validate_service(input: &ServiceInput) -> Result<(), Rejection> {
    if input.name.trim().is_empty() {
        return Err(Rejection::bad_request("Name is required"));
    }
    if !input.price.is_finite() || input.price < 0.0 {
        return Err(Rejection::bad_request("Price must be a non-negative number"));
    }
    if input.duration_minutes == 0 {
        return Err(Rejection::bad_request("Duration must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Status::Attended).unwrap(), "attended");
    }

    #[test]
    fn client_input_email_is_optional() {
        let input: ClientInput =
            serde_json::from_str(r#"{"name":"Ana","phone":"8091234567"}"#).unwrap();
        assert!(input.email.is_none());
    }

    #[test]
    fn client_input_rejects_missing_name() {
        let result: Result<ClientInput, _> = serde_json::from_str(r#"{"phone":"1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn validate_service_rejects_negative_price() {
        let input = ServiceInput {
            name: "Cut".to_string(),
            price: -1.0,
            duration_minutes: 30,
        };
        assert_eq!(validate_service(&input).unwrap_err().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn slot_taken_ignores_cancelled_and_self() {
        let id = Uuid::new_v4();
        let mut tables = Tables::default();
        tables.appointments.push(Appointment {
            id,
            client_id: Uuid::nil(),
            service_id: Uuid::nil(),
            date: "2025-03-05".to_string(),
            time: "10:00".to_string(),
            status: Status::Scheduled,
        });
        assert!(slot_taken(&tables, None, "2025-03-05", "10:00"));
        assert!(!slot_taken(&tables, Some(id), "2025-03-05", "10:00"));

        tables.appointments[0].status = Status::Cancelled;
        assert!(!slot_taken(&tables, None, "2025-03-05", "10:00"));
    }
}
