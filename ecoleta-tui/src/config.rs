use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use ecoleta_core::{model::Coordinate, ports::LocatorPort};
use ecoleta_provider_geoip::{DisabledLocator, FixedLocator, IpLocator};
use reqwest::Client;

/// Register a waste collection point from the terminal.
#[derive(Debug, Clone, Parser)]
#[command(name = "ecoleta-tui", version, about)]
pub(crate) struct Config {
    /// Base URL of the Ecoleta API.
    #[arg(long, env = "ECOLETA_API_URL", default_value = "http://localhost:3333")]
    pub api_url: String,

    /// Base URL of the IBGE `localidades` API.
    #[arg(long, env = "ECOLETA_IBGE_URL", default_value = ecoleta_provider_ibge::DEFAULT_BASE_URL)]
    pub ibge_url: String,

    /// Timeout for every HTTP request, in seconds.
    #[arg(
        long,
        env = "ECOLETA_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Use this position instead of locating via IP address.
    #[arg(
        long,
        env = "ECOLETA_POSITION",
        value_name = "LAT,LNG",
        allow_hyphen_values = true
    )]
    pub position: Option<Coordinate>,

    /// Do not try to determine the current position.
    #[arg(long, env = "ECOLETA_NO_GEOLOCATION", conflicts_with = "position")]
    pub no_geolocation: bool,

    /// Map zoom level once the position is known.
    #[arg(
        long,
        env = "ECOLETA_ZOOM",
        default_value_t = 4,
        value_parser = clap::value_parser!(u8).range(0..=18)
    )]
    pub zoom: u8,

    /// File receiving the log output.
    #[arg(long, env = "ECOLETA_LOG_FILE", default_value = "ecoleta-tui.log")]
    pub log_file: PathBuf,
}

impl Config {
    pub(crate) fn http_client(&self) -> Result<Client> {
        let client = Client::builder()
            .user_agent(concat!("ecoleta-tui/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?;
        Ok(client)
    }

    pub(crate) fn locator(&self, client: Client) -> Arc<dyn LocatorPort> {
        if self.no_geolocation {
            Arc::new(DisabledLocator)
        } else if let Some(position) = self.position {
            Arc::new(FixedLocator::new(position))
        } else {
            Arc::new(IpLocator::new(client))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_negative_position() {
        let config = Config::try_parse_from(["ecoleta-tui", "--position", "-23.5,-46.6"])
            .expect("valid arguments");
        assert_eq!(config.position, Some(Coordinate::new(-23.5, -46.6)));
    }

    #[test]
    fn rejects_out_of_range_position() {
        let result = Config::try_parse_from(["ecoleta-tui", "--position", "123,0"]);
        assert!(result.is_err(), "latitude above 90 is invalid");
    }

    #[test]
    fn position_conflicts_with_disabled_geolocation() {
        let result = Config::try_parse_from([
            "ecoleta-tui",
            "--position",
            "0,0",
            "--no-geolocation",
        ]);
        assert!(result.is_err(), "both flags together are contradictory");
    }

    #[test]
    fn zoom_is_bounded() {
        assert!(
            Config::try_parse_from(["ecoleta-tui", "--zoom", "19"]).is_err(),
            "zoom above 18 is rejected"
        );
        let config =
            Config::try_parse_from(["ecoleta-tui", "--zoom", "14"]).expect("valid zoom");
        assert_eq!(config.zoom, 14);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
