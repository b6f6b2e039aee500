//! Client core for a salon/clinic booking backend.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for the
//! appointments, clients and services endpoints (host-does-IO pattern), and
//! layers per-view state holders on top that reload their list after every
//! write. Display formatters and a modal focus trap round out what a UI layer
//! needs.
//!
//! # Design
//! - `ApiClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O boundary
//!   is explicit. A `Transport` performs the round-trip.
//! - `ResourceStore` owns a `watch` channel of `ResourceState`; the backend
//!   stays the source of truth.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod focus_trap;
pub mod format;
pub mod http;
pub mod resource;
pub mod store;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use chrono::Locale;
pub use config::ClientConfig;
pub use error::ApiError;
pub use focus_trap::{ElementInfo, ElementKind, FocusHost, FocusTrap, Key, KeyOutcome, KeyPress};
pub use format::{format_date, format_date_in, format_phone, format_time, FALLBACK_LOCALE};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use resource::{Editable, Resource};
pub use store::{AppointmentStore, ClientStore, ResourceState, ResourceStore, ServiceStore};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Appointment, AppointmentStatus, Client, ClientInput, NewAppointment, Reschedule, Service,
    ServiceInput,
};
