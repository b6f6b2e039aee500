use std::collections::HashMap;

use uuid::Uuid;

use super::ResourceStore;
use crate::types::Service;

impl<T> ResourceStore<Service, T> {
    /// Service names keyed by id, for labelling appointments.
    pub fn names_by_id(&self) -> HashMap<Uuid, String> {
        self.state
            .borrow()
            .items
            .iter()
            .map(|service| (service.id, service.name.clone()))
            .collect()
    }
}
