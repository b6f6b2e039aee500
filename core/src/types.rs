//! Domain DTOs for the booking API.
//!
//! # Design
//! These types mirror the backend's schema but are defined independently of
//! the mock-server crate. Integration tests catch any schema drift between the
//! two. Dates and times stay in their wire form (`YYYY-MM-DD`, `HH:MM`); the
//! `format` module turns them into display strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of an appointment. Transitions only move away from
/// `Scheduled`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Attended,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Attended => "attended",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "attended" => Ok(AppointmentStatus::Attended),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("unknown appointment status: {other}")),
        }
    }
}

/// A booked appointment returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub date: String,
    pub time: String,
    pub status: AppointmentStatus,
}

/// Request payload for booking a new appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub date: String,
    pub time: String,
}

/// Request payload for moving an appointment to a new slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reschedule {
    pub date: String,
    pub time: String,
}

/// A customer of the business.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    /// Stored as entered; `format::format_phone` is for display only.
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Request payload for creating or replacing a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInput {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A bookable service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub duration_minutes: u32,
}

/// Request payload for creating or replacing a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInput {
    pub name: String,
    pub price: f64,
    pub duration_minutes: u32,
}

/// Body the backend sends alongside a failed mutation.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_lowercase_on_the_wire() {
        let json = serde_json::to_string(&AppointmentStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
        let back: AppointmentStatus = serde_json::from_str("\"attended\"").unwrap();
        assert_eq!(back, AppointmentStatus::Attended);
    }

    #[test]
    fn status_parses_from_query_form() {
        assert_eq!("scheduled".parse::<AppointmentStatus>(), Ok(AppointmentStatus::Scheduled));
        assert!("done".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn client_without_email_omits_the_field() {
        let input = ClientInput {
            name: "Ana".to_string(),
            phone: "8091234567".to_string(),
            email: None,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("email").is_none());

        let client: Client = serde_json::from_str(
            r#"{"id":"00000000-0000-0000-0000-000000000001","name":"Ana","phone":"8091234567"}"#,
        )
        .unwrap();
        assert!(client.email.is_none());
    }

    #[test]
    fn error_body_tolerates_missing_field() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.error.is_none());
    }
}
