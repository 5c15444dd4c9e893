//! Blocking HTTP client for the labels API.

use serde::de::DeserializeOwned;
use url::Url;

use crate::catalog::{CatalogEntry, TypeEntry};
use crate::http_client;
use crate::predictables::{FullModelType, MatchId, ModelType, PlayerId};
use crate::tables::{LabelRow, MatchRecord};

use super::wire::{LabelWire, MatchWire, SubmitRequest};
use super::{ApiError, DataSource, LabelValues, Uploader};

const MAX_TABLE_RESPONSE_BYTES: usize = 64 * 1024 * 1024;
const MAX_CATALOG_RESPONSE_BYTES: usize = 8 * 1024 * 1024;
const MAX_SUBMIT_RESPONSE_BYTES: usize = 64 * 1024;

/// Row caps sent with the bulk endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApiLimits {
    pub matches: usize,
    pub labels: usize,
    pub catalog: usize,
}

impl Default for ApiLimits {
    fn default() -> Self {
        Self {
            matches: 3_000,
            labels: 30_000,
            catalog: 3_000,
        }
    }
}

/// [`DataSource`] and [`Uploader`] backed by the labels API. Failed calls are not retried.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base: Url,
    limits: ApiLimits,
}

impl ApiClient {
    pub fn new(host: &str, limits: ApiLimits) -> Result<Self, ApiError> {
        let trimmed = host.trim();
        let with_slash = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        let base = Url::parse(&with_slash).map_err(|err| ApiError::InvalidHost {
            host: host.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self { base, limits })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::InvalidHost {
                host: self.base.to_string(),
                message: err.to_string(),
            })
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        max_bytes: usize,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let mut request = http_client::agent()
            .get(url.as_str())
            .set("Accept", "application/json");
        for (key, value) in query {
            request = request.query(key, value);
        }
        let response = request.call().map_err(map_ureq_error)?;
        decode(path, response, max_bytes)
    }

    fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &serde_json::Value,
        max_bytes: usize,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let mut request = http_client::agent()
            .post(url.as_str())
            .set("Accept", "application/json");
        for (key, value) in query {
            request = request.query(key, value);
        }
        let response = request.send_json(body).map_err(map_ureq_error)?;
        decode(path, response, max_bytes)
    }
}

fn decode<T: DeserializeOwned>(
    path: &str,
    response: ureq::Response,
    max_bytes: usize,
) -> Result<T, ApiError> {
    http_client::read_json(response, max_bytes).map_err(|err| ApiError::InvalidResponse {
        endpoint: path.to_string(),
        message: err.to_string(),
    })
}

fn map_ureq_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(code, response) => ApiError::Status {
            code,
            message: http_client::read_error_body(response),
        },
        ureq::Error::Transport(err) => ApiError::Transport(err.to_string()),
    }
}

/// Catalog endpoint of a predictable kind, e.g. `/perks`.
fn catalog_path(model_type: ModelType) -> &'static str {
    match model_type {
        ModelType::Addons => "/addons",
        ModelType::Character => "/characters",
        ModelType::Item => "/items",
        ModelType::Offering => "/offerings",
        ModelType::Perks => "/perks",
        ModelType::Status => "/status",
    }
}

fn type_catalog_path(model_type: ModelType) -> &'static str {
    match model_type {
        ModelType::Addons => "/addon-types",
        ModelType::Item => "/item-types",
        ModelType::Offering => "/offering-types",
        ModelType::Character | ModelType::Perks | ModelType::Status => "",
    }
}

impl DataSource for ApiClient {
    fn load_matches(&self) -> Result<Vec<MatchRecord>, ApiError> {
        let wire: Vec<MatchWire> = self.get_json(
            "/matches",
            &[("limit", self.limits.matches.to_string())],
            MAX_TABLE_RESPONSE_BYTES,
        )?;
        Ok(wire.into_iter().map(MatchRecord::from).collect())
    }

    fn load_labels(&self) -> Result<Vec<LabelRow>, ApiError> {
        let wire: Vec<LabelWire> = self.post_json(
            "/labels/filter-many",
            &[("limit", self.limits.labels.to_string())],
            &serde_json::json!({}),
            MAX_TABLE_RESPONSE_BYTES,
        )?;
        wire.into_iter().map(LabelRow::try_from).collect()
    }

    fn load_catalog(&self, fmt: FullModelType) -> Result<Vec<CatalogEntry>, ApiError> {
        self.get_json(
            catalog_path(fmt.model_type()),
            &[
                ("limit", self.limits.catalog.to_string()),
                ("is_killer", fmt.is_killer().to_string()),
            ],
            MAX_CATALOG_RESPONSE_BYTES,
        )
    }

    fn load_type_catalog(&self, model_type: ModelType) -> Result<Vec<TypeEntry>, ApiError> {
        let path = type_catalog_path(model_type);
        if path.is_empty() {
            return Ok(Vec::new());
        }
        self.get_json(
            path,
            &[("limit", self.limits.catalog.to_string())],
            MAX_CATALOG_RESPONSE_BYTES,
        )
    }

    fn load_rarities(&self) -> Result<Vec<TypeEntry>, ApiError> {
        self.get_json(
            "/rarities",
            &[("limit", self.limits.catalog.to_string())],
            MAX_CATALOG_RESPONSE_BYTES,
        )
    }
}

impl Uploader for ApiClient {
    fn submit(
        &self,
        match_id: MatchId,
        player_id: PlayerId,
        fmt: FullModelType,
        values: &LabelValues,
    ) -> Result<(), ApiError> {
        let url = self.endpoint("/labels/predictable")?;
        let body = SubmitRequest {
            match_id,
            player_id,
            fmt: fmt.to_string(),
            value: values,
        };
        let response = http_client::agent()
            .put(url.as_str())
            .set("Accept", "application/json")
            .send_json(&body)
            .map_err(map_ureq_error)?;
        http_client::read_response_bytes(response, MAX_SUBMIT_RESPONSE_BYTES).map_err(|err| {
            ApiError::InvalidResponse {
                endpoint: url.path().to_string(),
                message: err.to_string(),
            }
        })?;
        tracing::debug!(match_id, player_id, %fmt, "Uploaded corrected labels");
        Ok(())
    }
}
