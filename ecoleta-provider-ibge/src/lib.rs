//! Provider implementation for Brazilian states and municipalities using the IBGE
//! `localidades` API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use ecoleta_core::{
    http::fetch_json,
    model::{LocalityName, RegionCode},
    ports::{GeographyPort, PortError},
};

/// Public IBGE endpoint.
pub const DEFAULT_BASE_URL: &str = "https://servicodados.ibge.gov.br/api/v1/localidades";

/// State as returned by /estados
#[derive(Debug, Deserialize)]
struct StateResponse {
    sigla: String,
    // id, nome and regiao exist but only the abbreviation is used
}

/// Municipality as returned by /estados/{uf}/municipios
#[derive(Debug, Deserialize)]
struct MunicipalityResponse {
    nome: String,
}

/// Region and locality lookups against IBGE.
pub struct IbgeGeography {
    client: Client,
    base_url: String,
}

impl IbgeGeography {
    /// Create a new geography port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Create a port talking to a mirror of the IBGE API.
    #[must_use]
    pub fn with_base_url(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn localities_url(&self, region: &RegionCode) -> String {
        format!("{}/estados/{}/municipios", self.base_url, region.0.trim())
    }
}

#[async_trait]
impl GeographyPort for IbgeGeography {
    async fn regions(&self) -> Result<Vec<RegionCode>, PortError> {
        let req = self.client.get(format!("{}/estados", self.base_url));
        let states = fetch_json::<Vec<StateResponse>>(req).await?;
        debug!(count = states.len(), "loaded IBGE states");
        Ok(map_states(states))
    }

    async fn localities(&self, region: &RegionCode) -> Result<Vec<LocalityName>, PortError> {
        if region.0.trim().is_empty() {
            return Ok(Vec::new());
        }

        let req = self.client.get(self.localities_url(region));
        let municipalities = fetch_json::<Vec<MunicipalityResponse>>(req).await?;
        debug!(%region, count = municipalities.len(), "loaded IBGE municipalities");
        Ok(map_municipalities(municipalities))
    }
}

fn map_states(states: Vec<StateResponse>) -> Vec<RegionCode> {
    states.into_iter().map(|state| RegionCode(state.sigla)).collect()
}

fn map_municipalities(municipalities: Vec<MunicipalityResponse>) -> Vec<LocalityName> {
    municipalities
        .into_iter()
        .map(|municipality| LocalityName(municipality.nome))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn maps_state_abbreviations_in_response_order() {
        let states: Vec<StateResponse> = serde_json::from_str(
            r#"[
                {"id": 35, "sigla": "SP", "nome": "São Paulo", "regiao": {"id": 3, "sigla": "SE", "nome": "Sudeste"}},
                {"id": 33, "sigla": "RJ", "nome": "Rio de Janeiro", "regiao": {"id": 3, "sigla": "SE", "nome": "Sudeste"}}
            ]"#,
        )
        .expect("fixture decodes");

        assert_eq!(
            map_states(states),
            vec![RegionCode::from("SP"), RegionCode::from("RJ")]
        );
    }

    #[test]
    fn maps_municipality_names() {
        let municipalities: Vec<MunicipalityResponse> = serde_json::from_str(
            r#"[{"id": 3304904, "nome": "São Gonçalo"}, {"id": 3303302, "nome": "Niterói"}]"#,
        )
        .expect("fixture decodes");

        assert_eq!(
            map_municipalities(municipalities),
            vec![LocalityName::from("São Gonçalo"), LocalityName::from("Niterói")]
        );
    }

    #[test]
    fn builds_municipality_url() {
        let geography = IbgeGeography::with_base_url(Client::new(), "http://mirror.local/api/");
        assert_eq!(
            geography.localities_url(&RegionCode::from("MG")),
            "http://mirror.local/api/estados/MG/municipios"
        );
    }
}
