//! Appointment-only operations: status-filtered loading and the three
//! one-way transitions.

use tokio::sync::watch;
use uuid::Uuid;

use super::ResourceStore;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Appointment, AppointmentStatus, Reschedule};

pub type AppointmentStore<T> = ResourceStore<Appointment, T>;

impl<T: Transport> ResourceStore<Appointment, T> {
    /// Appointment store narrowed by whatever `status` holds when `load` runs.
    pub fn appointments(
        api: ApiClient,
        transport: T,
        status: watch::Receiver<Option<AppointmentStatus>>,
    ) -> Self {
        Self::with_filter(api, transport, status)
    }

    pub async fn cancel(&self, id: Uuid) -> Result<(), ApiError> {
        self.mutate("Failed to cancel appointment.".to_string(), async {
            let response = self.transport.execute(self.api.build_cancel_appointment(id)).await?;
            self.api.parse_cancel_appointment(response)
        })
        .await
    }

    pub async fn attend(&self, id: Uuid) -> Result<(), ApiError> {
        self.mutate("Failed to mark appointment as attended.".to_string(), async {
            let response = self.transport.execute(self.api.build_attend_appointment(id)).await?;
            self.api.parse_attend_appointment(response)
        })
        .await
    }

    pub async fn reschedule(&self, id: Uuid, slot: &Reschedule) -> Result<(), ApiError> {
        self.mutate("Failed to reschedule appointment.".to_string(), async {
            let request = self.api.build_reschedule_appointment(id, slot)?;
            let response = self.transport.execute(request).await?;
            self.api.parse_reschedule_appointment(response)
        })
        .await
    }
}
