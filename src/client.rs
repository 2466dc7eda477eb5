//! Thin HTTP façade over the consumed PokéAPI endpoints.
//!
//! Pure I/O: no caching and no retry live here. Retry is applied by the
//! caller per call site via [`with_retry`](crate::retry::with_retry),
//! with call-site-appropriate limits, and all caching belongs to
//! [`Pokedex`](crate::Pokedex).

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::telemetry;
use crate::types::PokemonType;
use crate::types::api::{
    DetailResponse, EvolutionChainResponse, PageResponse, SpeciesResponse, TypeResponse,
};
use crate::{DexError, Result};

/// Default base URL for the PokéAPI.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Stateless client for the PokéAPI REST endpoints.
#[derive(Clone)]
pub struct PokeApiClient {
    http: Client,
    base_url: String,
}

impl PokeApiClient {
    /// Create a client against the public API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// The base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of the collection listing.
    ///
    /// `offset` is 0-based; the response carries the declared total
    /// count alongside the `{name, url}` entries for the window.
    pub async fn list(&self, offset: u32, limit: u32) -> Result<PageResponse> {
        let url = format!("{}/pokemon/?offset={offset}&limit={limit}", self.base_url);
        self.get_json("pokemon list", &url).await
    }

    /// Fetch the detail payload for an id or a (lowercase) name.
    pub async fn detail(&self, id_or_name: &str) -> Result<DetailResponse> {
        let url = format!("{}/pokemon/{id_or_name}", self.base_url);
        self.get_json("pokemon detail", &url).await
    }

    /// Fetch a detail payload through the absolute URL a listing handed out.
    pub async fn detail_url(&self, url: &str) -> Result<DetailResponse> {
        self.get_json("pokemon detail", url).await
    }

    /// Fetch the membership listing for a type tag.
    pub async fn type_listing(&self, tag: PokemonType) -> Result<TypeResponse> {
        let url = format!("{}/type/{tag}", self.base_url);
        self.get_json("type listing", &url).await
    }

    /// Fetch species metadata for an id.
    pub async fn species(&self, id: u32) -> Result<SpeciesResponse> {
        let url = format!("{}/pokemon-species/{id}", self.base_url);
        self.get_json("species", &url).await
    }

    /// Fetch an evolution chain through the URL a species payload linked.
    pub async fn evolution_chain_url(&self, url: &str) -> Result<EvolutionChainResponse> {
        self.get_json("evolution chain", url).await
    }

    /// Issue a GET, map the status, and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str, url: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| DexError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            metrics::counter!(telemetry::REQUESTS_TOTAL, "endpoint" => endpoint, "status" => "error")
                .increment(1);
            return Err(match status.as_u16() {
                404 => DexError::NotFound(url.to_string()),
                code => DexError::Api {
                    status: code,
                    message: format!("PokéAPI error: {status}"),
                },
            });
        }
        metrics::counter!(telemetry::REQUESTS_TOTAL, "endpoint" => endpoint, "status" => "ok")
            .increment(1);

        response
            .json()
            .await
            .map_err(|e| DexError::Http(e.to_string()))
    }
}

impl Default for PokeApiClient {
    fn default() -> Self {
        Self::new()
    }
}
