//! Traits describing provider capabilities and the shared error type.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;
use serde_json::Error as JsonError;

use crate::model::{Coordinate, Item, LocalityName, RegionCode, SubmissionPayload};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to provider backends.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[source] ReqwestError),
    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,
    /// Backend answered with a non-success HTTP status.
    #[error("Unexpected status {0}")]
    Status(u16),
    /// Response body did not match the expected shape.
    #[error("Malformed response: {0}")]
    Decode(#[from] JsonError),
    /// Current position could not be determined.
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),
    /// Internal provider error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ReqwestError> for PortError {
    fn from(err: ReqwestError) -> Self {
        if err.is_timeout() {
            PortError::Timeout
        } else {
            PortError::Network(err)
        }
    }
}

#[async_trait]
/// Source of the collectible item catalog.
pub trait ItemCatalogPort: Send + Sync {
    /// Fetch every item category known to the backend.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails.
    async fn items(&self) -> Result<Vec<Item>, PortError>;
}

#[async_trait]
/// Sink for new collection point registrations.
pub trait PointRegistryPort: Send + Sync {
    /// Persist a new collection point.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails or the backend rejects it.
    async fn register(&self, payload: &SubmissionPayload) -> Result<(), PortError>;
}

#[async_trait]
/// Administrative geography lookups.
pub trait GeographyPort: Send + Sync {
    /// List all region codes.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails.
    async fn regions(&self) -> Result<Vec<RegionCode>, PortError>;

    /// List the localities inside `region`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the provider request fails.
    async fn localities(&self, region: &RegionCode) -> Result<Vec<LocalityName>, PortError>;
}

#[async_trait]
/// One-shot source of the device's current position.
pub trait LocatorPort: Send + Sync {
    /// Resolve the current position.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::LocationUnavailable`] when locating is disabled or fails.
    async fn current_position(&self) -> Result<Coordinate, PortError>;
}
