//! Provider implementation for the internal Ecoleta API (`/items`, `/points`).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use ecoleta_core::{
    http::{fetch_json, send_checked},
    model::{Item, ItemId, SubmissionPayload},
    ports::{ItemCatalogPort, PointRegistryPort, PortError},
};

/// Item as returned by `GET /items`.
#[derive(Debug, Deserialize)]
struct ItemEntry {
    id: u32,
    title: String,
    // older backends only send the bare file name under /uploads
    image_url: String,
}

/// Shared connection settings for both ports.
#[derive(Clone)]
struct ApiEndpoint {
    client: Client,
    base_url: Arc<str>,
}

impl ApiEndpoint {
    fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

/// Item catalog backed by `GET /items`.
pub struct ApiItemCatalog {
    endpoint: ApiEndpoint,
}

#[async_trait]
impl ItemCatalogPort for ApiItemCatalog {
    async fn items(&self) -> Result<Vec<Item>, PortError> {
        let req = self.endpoint.client.get(self.endpoint.url("items"));
        let entries = fetch_json::<Vec<ItemEntry>>(req).await?;
        debug!(count = entries.len(), "loaded item catalog");

        Ok(entries
            .into_iter()
            .map(|entry| map_item(entry, &self.endpoint.base_url))
            .collect())
    }
}

/// Point registration backed by `POST /points`.
pub struct ApiPointRegistry {
    endpoint: ApiEndpoint,
}

#[async_trait]
impl PointRegistryPort for ApiPointRegistry {
    async fn register(&self, payload: &SubmissionPayload) -> Result<(), PortError> {
        let req = self
            .endpoint
            .client
            .post(self.endpoint.url("points"))
            .json(payload);
        send_checked(req).await?;
        info!(name = %payload.name, "point registered");
        Ok(())
    }
}

/// Ports for the internal API at `base_url`, sharing one HTTP client.
#[must_use]
pub fn ports(client: Client, base_url: &str) -> (Arc<ApiItemCatalog>, Arc<ApiPointRegistry>) {
    let endpoint = ApiEndpoint::new(client, base_url);
    let catalog = Arc::new(ApiItemCatalog {
        endpoint: endpoint.clone(),
    });
    let registry = Arc::new(ApiPointRegistry { endpoint });
    (catalog, registry)
}

fn map_item(entry: ItemEntry, base_url: &str) -> Item {
    let image_url = if entry.image_url.starts_with("http://") || entry.image_url.starts_with("https://")
    {
        entry.image_url
    } else {
        format!(
            "{base_url}/uploads/{}",
            entry.image_url.trim_start_matches('/')
        )
    };

    Item {
        id: ItemId(entry.id),
        title: entry.title,
        image_url,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const BASE: &str = "http://localhost:3333";

    #[test]
    fn maps_catalog_entries() {
        let entries: Vec<ItemEntry> = serde_json::from_str(
            r#"[
                {"id": 1, "title": "Lâmpadas", "image_url": "http://localhost:3333/uploads/lampadas.svg"},
                {"id": 6, "title": "Óleo de Cozinha", "image_url": "oleo.svg"}
            ]"#,
        )
        .expect("fixture decodes");

        let items: Vec<Item> = entries
            .into_iter()
            .map(|entry| map_item(entry, BASE))
            .collect();

        assert_eq!(
            items,
            vec![
                Item {
                    id: ItemId(1),
                    title: "Lâmpadas".into(),
                    image_url: "http://localhost:3333/uploads/lampadas.svg".into(),
                },
                Item {
                    id: ItemId(6),
                    title: "Óleo de Cozinha".into(),
                    image_url: "http://localhost:3333/uploads/oleo.svg".into(),
                },
            ]
        );
    }

    #[test]
    fn endpoint_urls_ignore_trailing_slash() {
        let endpoint = ApiEndpoint::new(Client::new(), "http://localhost:3333/");
        assert_eq!(endpoint.url("points"), "http://localhost:3333/points");
    }
}
