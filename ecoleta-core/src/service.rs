//! High-level service facade combining all providers.

use std::sync::Arc;

use tracing::instrument;

use crate::form::{Completion, Request};
use crate::model::{Coordinate, Item, LocalityName, RegionCode, SubmissionPayload};
use crate::ports::{GeographyPort, ItemCatalogPort, LocatorPort, PointRegistryPort, PortError};

/// One implementation of every port the form talks to.
pub struct Backends {
    /// Item catalog of the internal API.
    pub catalog: Arc<dyn ItemCatalogPort>,
    /// Point registration of the internal API.
    pub registry: Arc<dyn PointRegistryPort>,
    /// Region and locality lookups.
    pub geography: Arc<dyn GeographyPort>,
    /// Device position lookup.
    pub locator: Arc<dyn LocatorPort>,
}

/// Public entry point for every lookup and the submission.
pub struct EcoletaService {
    backends: Backends,
}

impl EcoletaService {
    /// Create a new service bound to the provided backends.
    #[must_use]
    pub fn new(backends: Backends) -> Self {
        Self { backends }
    }

    /// Load the item catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the catalog request fails.
    pub async fn items(&self) -> Result<Vec<Item>, PortError> {
        self.backends.catalog.items().await
    }

    /// Load all region codes.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the geography request fails.
    pub async fn regions(&self) -> Result<Vec<RegionCode>, PortError> {
        self.backends.geography.regions().await
    }

    /// Load the localities inside `region`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the geography request fails.
    pub async fn localities(&self, region: &RegionCode) -> Result<Vec<LocalityName>, PortError> {
        self.backends.geography.localities(region).await
    }

    /// Resolve the current position.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if locating is disabled or fails.
    pub async fn current_position(&self) -> Result<Coordinate, PortError> {
        self.backends.locator.current_position().await
    }

    /// Register a new collection point.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the request fails or the backend rejects it.
    pub async fn register(&self, payload: &SubmissionPayload) -> Result<(), PortError> {
        self.backends.registry.register(payload).await
    }

    /// Run a form request against the matching backend.
    #[instrument(level = "debug", skip_all, fields(request = request_name(&request)))]
    pub async fn execute(&self, request: Request) -> Completion {
        match request {
            Request::Position => Completion::Position(self.current_position().await),
            Request::Items => Completion::Items(self.items().await),
            Request::Regions => Completion::Regions(self.regions().await),
            Request::Localities(ticket) => {
                let result = self.localities(&ticket.region).await;
                Completion::Localities { ticket, result }
            }
            Request::Submit(payload) => Completion::Submitted(self.register(&payload).await),
        }
    }
}

fn request_name(request: &Request) -> &'static str {
    match request {
        Request::Position => "position",
        Request::Items => "items",
        Request::Regions => "regions",
        Request::Localities(_) => "localities",
        Request::Submit(_) => "submit",
    }
}
