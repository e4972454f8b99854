//! Locators for the current position.
//!
//! A terminal has no positioning sensor, so the position is either derived from
//! the public IP address, taken from configuration, or reported as unavailable.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use ecoleta_core::{
    http::fetch_json,
    model::Coordinate,
    ports::{LocatorPort, PortError},
};

/// Default IP geolocation endpoint.
pub const DEFAULT_BASE_URL: &str = "http://ip-api.com/json/";

/// Response from ip-api.com, restricted to the requested fields.
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// Approximate position from the public IP address.
pub struct IpLocator {
    client: Client,
    base_url: String,
}

impl IpLocator {
    /// Create a locator bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

#[async_trait]
impl LocatorPort for IpLocator {
    async fn current_position(&self) -> Result<Coordinate, PortError> {
        let req = self
            .client
            .get(&self.base_url)
            .query(&[("fields", "status,message,lat,lon")]);
        let resp = fetch_json::<IpApiResponse>(req).await?;
        let position = map_response(resp)?;
        debug!(%position, "resolved position from IP address");
        Ok(position)
    }
}

/// Always reports the configured position.
pub struct FixedLocator {
    position: Coordinate,
}

impl FixedLocator {
    /// Locator that resolves to `position`.
    #[must_use]
    pub fn new(position: Coordinate) -> Self {
        Self { position }
    }
}

#[async_trait]
impl LocatorPort for FixedLocator {
    async fn current_position(&self) -> Result<Coordinate, PortError> {
        Ok(self.position)
    }
}

/// Behaves like a denied location permission.
pub struct DisabledLocator;

#[async_trait]
impl LocatorPort for DisabledLocator {
    async fn current_position(&self) -> Result<Coordinate, PortError> {
        Err(PortError::LocationUnavailable(
            "geolocation disabled".to_owned(),
        ))
    }
}

fn map_response(resp: IpApiResponse) -> Result<Coordinate, PortError> {
    if resp.status != "success" {
        let reason = resp.message.unwrap_or(resp.status);
        return Err(PortError::LocationUnavailable(reason));
    }

    match (resp.lat, resp.lon) {
        (Some(latitude), Some(longitude)) => {
            let position = Coordinate::new(latitude, longitude);
            if position.is_valid() {
                Ok(position)
            } else {
                Err(PortError::LocationUnavailable(format!(
                    "position out of range: {position}"
                )))
            }
        }
        _ => Err(PortError::LocationUnavailable(
            "response without coordinates".to_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(body: &str) -> IpApiResponse {
        serde_json::from_str(body).expect("fixture decodes")
    }

    #[test]
    fn maps_successful_lookup() {
        let resp = parse(r#"{"status":"success","lat":-23.5475,"lon":-46.6361}"#);
        assert_eq!(
            map_response(resp).expect("position resolved"),
            Coordinate::new(-23.5475, -46.6361)
        );
    }

    #[test]
    fn failed_lookup_carries_reason() {
        let resp = parse(r#"{"status":"fail","message":"private range"}"#);
        let err = map_response(resp).expect_err("lookup failed");
        assert_eq!(err.to_string(), "Location unavailable: private range");
    }

    #[test]
    fn missing_coordinates_are_unavailable() {
        let resp = parse(r#"{"status":"success"}"#);
        assert!(
            matches!(map_response(resp), Err(PortError::LocationUnavailable(_))),
            "no lat/lon means no position"
        );
    }

    #[tokio::test]
    async fn disabled_locator_denies() {
        let result = DisabledLocator.current_position().await;
        assert!(
            matches!(result, Err(PortError::LocationUnavailable(_))),
            "disabled locator never resolves"
        );
    }

    #[tokio::test]
    async fn fixed_locator_reports_configured_point() {
        let position = Coordinate::new(-3.71, -38.54);
        let result = FixedLocator::new(position).current_position().await;
        assert_eq!(result.expect("fixed position"), position);
    }
}
