//! Per-view resource state holders.
//!
//! # Design
//! A `ResourceStore` owns one `ResourceState` (items, loading flag, error
//! message) and publishes every change through a `watch` channel, so a UI
//! layer can `subscribe()` and re-render. Nothing is shared between store
//! instances: two views that each build a `ClientStore` get two lists and two
//! sets of requests.
//!
//! The backend stays the source of truth. A mutation never patches `items`
//! locally and never decodes the write's response body; once the status says
//! the write succeeded the store re-fetches the whole list.
//!
//! Error surfacing differs by operation. `load` records a fixed message in
//! `error` and returns normally. Mutations record their message and also
//! return the `ApiError`, so a form can stay open on failure.
//!
//! Calls on one instance are serialized by an async gate; a second call waits
//! for the first to finish instead of racing it on the shared state.

mod appointments;
mod services;

use std::future::Future;

use tokio::sync::{watch, Mutex};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::resource::{Editable, Resource};
use crate::transport::Transport;
use crate::types::{Client, Service};

pub use appointments::AppointmentStore;

pub type ClientStore<T> = ResourceStore<Client, T>;
pub type ServiceStore<T> = ResourceStore<Service, T>;

/// Snapshot of a store, as seen by subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<R> {
    /// Last successfully loaded list, in server order.
    pub items: Vec<R>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<R> Default for ResourceState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

pub struct ResourceStore<R: Resource, T> {
    api: ApiClient,
    transport: T,
    filter: watch::Receiver<R::Filter>,
    state: watch::Sender<ResourceState<R>>,
    gate: Mutex<()>,
}

impl<R: Resource, T: Transport> ResourceStore<R, T> {
    /// Store whose list calls always use the default filter.
    pub fn new(api: ApiClient, transport: T) -> Self {
        let (_fixed, filter) = watch::channel(R::Filter::default());
        Self::with_filter(api, transport, filter)
    }

    /// Store whose list calls read `filter` at call time. Changing the filter
    /// does not reload by itself; call `load` again.
    pub fn with_filter(api: ApiClient, transport: T, filter: watch::Receiver<R::Filter>) -> Self {
        let (state, _) = watch::channel(ResourceState::default());
        Self {
            api,
            transport,
            filter,
            state,
            gate: Mutex::new(()),
        }
    }

    pub fn state(&self) -> ResourceState<R> {
        self.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<R> {
        self.state.borrow().items.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<R>> {
        self.state.subscribe()
    }

    /// Replace `items` with the server's list. Failures only show up in
    /// `error`; `items` keeps its previous value.
    pub async fn load(&self) {
        let _turn = self.gate.lock().await;
        let _busy = Busy::begin(&self.state);
        self.refresh().await;
    }

    pub async fn create(&self, input: &R::Create) -> Result<(), ApiError> {
        self.mutate(format!("Failed to create {}.", R::SINGULAR), async {
            let request = self.api.build_create::<R>(input)?;
            let response = self.transport.execute(request).await?;
            self.api.check_create::<R>(response)
        })
        .await
    }

    /// Run one write, then re-fetch the list if it succeeded.
    pub(crate) async fn mutate<F>(&self, failure: String, call: F) -> Result<(), ApiError>
    where
        F: Future<Output = Result<(), ApiError>>,
    {
        let _turn = self.gate.lock().await;
        let _busy = Busy::begin(&self.state);
        match call.await {
            Ok(()) => {
                self.refresh().await;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(resource = R::PATH, error = %err, "{failure}");
                self.state.send_modify(|state| state.error = Some(failure));
                Err(err)
            }
        }
    }

    /// Fetch the list into `items`. Callers hold the gate and the busy flag.
    async fn refresh(&self) {
        let filter = self.filter.borrow().clone();
        let request = self.api.build_list::<R>(&filter);
        let result = match self.transport.execute(request).await {
            Ok(response) => self.api.parse_list::<R>(response),
            Err(err) => Err(err),
        };
        match result {
            Ok(items) => self.state.send_modify(|state| state.items = items),
            Err(err) => {
                tracing::error!(resource = R::PATH, error = %err, "failed to load list");
                let message = format!("Failed to load {}.", R::PATH);
                self.state.send_modify(|state| state.error = Some(message));
            }
        }
    }
}

impl<R: Editable, T: Transport> ResourceStore<R, T> {
    pub async fn update(&self, id: Uuid, input: &R::Update) -> Result<(), ApiError> {
        self.mutate(format!("Failed to update {}.", R::SINGULAR), async {
            let request = self.api.build_update::<R>(id, input)?;
            let response = self.transport.execute(request).await?;
            self.api.check_update::<R>(response)
        })
        .await
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), ApiError> {
        self.mutate(format!("Failed to delete {}.", R::SINGULAR), async {
            let response = self.transport.execute(self.api.build_delete::<R>(id)).await?;
            self.api.parse_delete::<R>(response)
        })
        .await
    }
}

/// Holds `loading` high for its lifetime; dropping it (on return, error, or a
/// cancelled future) lowers the flag.
struct Busy<'a, R> {
    state: &'a watch::Sender<ResourceState<R>>,
}

impl<'a, R> Busy<'a, R> {
    fn begin(state: &'a watch::Sender<ResourceState<R>>) -> Self {
        state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        Self { state }
    }
}

impl<R> Drop for Busy<'_, R> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.loading = false);
    }
}
