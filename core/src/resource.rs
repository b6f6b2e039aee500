//! Binds each DTO to its REST collection.
//!
//! `Resource` covers what every collection supports (list, get, create);
//! `Editable` adds the full-replacement update and delete that clients and
//! services have and appointments do not.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::{
    Appointment, AppointmentStatus, Client, ClientInput, NewAppointment, Service, ServiceInput,
};

pub trait Resource: DeserializeOwned + Clone {
    /// Collection path segment, also used as the plural noun in messages.
    const PATH: &'static str;
    const SINGULAR: &'static str;

    /// Payload for `POST /{PATH}`.
    type Create: Serialize;

    /// Value a list call is narrowed by. `()` for unfiltered collections.
    type Filter: Clone + Default;

    /// Query string (without `?`) for a filtered list call.
    fn list_query(_filter: &Self::Filter) -> Option<String> {
        None
    }
}

pub trait Editable: Resource {
    /// Payload for `PUT /{PATH}/{id}`.
    type Update: Serialize;
}

impl Resource for Appointment {
    const PATH: &'static str = "appointments";
    const SINGULAR: &'static str = "appointment";
    type Create = NewAppointment;
    type Filter = Option<AppointmentStatus>;

    fn list_query(filter: &Self::Filter) -> Option<String> {
        filter.map(|status| format!("status={status}"))
    }
}

impl Resource for Client {
    const PATH: &'static str = "clients";
    const SINGULAR: &'static str = "client";
    type Create = ClientInput;
    type Filter = ();
}

impl Editable for Client {
    type Update = ClientInput;
}

impl Resource for Service {
    const PATH: &'static str = "services";
    const SINGULAR: &'static str = "service";
    type Create = ServiceInput;
    type Filter = ();
}

impl Editable for Service {
    type Update = ServiceInput;
}
