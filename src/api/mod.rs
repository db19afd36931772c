use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    dashboard::{DatasetRecord, FilterCriteria},
    error::{PortalError, Result},
};

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your username and password.";
pub const MISSING_TOKEN_MESSAGE: &str = "Login response did not include an access token.";
pub const RETRIEVAL_FAILED_MESSAGE: &str = "Failed to fetch data.";

/// HTTP client for the remote dataset API.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
    #[serde(default)]
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl ApiClient {
    /// Build a client rooted at `base_url` (which must end in `/`).
    pub fn new(base_url: Url, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Exchange a username and password for a bearer token.
    pub async fn exchange_credentials(&self, username: &str, password: &str) -> Result<String> {
        let url = self.endpoint("token", PortalError::AuthenticationFailure)?;

        let response = self
            .http
            .post(url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|err| {
                warn!(?err, "authentication endpoint unreachable");
                PortalError::AuthenticationFailure(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "authentication endpoint rejected credentials");
            return Err(PortalError::AuthenticationFailure(
                LOGIN_FAILED_MESSAGE.to_string(),
            ));
        }

        let payload: TokenPayload = response
            .json()
            .await
            .map_err(|err| PortalError::AuthenticationFailure(err.to_string()))?;

        payload
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| PortalError::AuthenticationFailure(MISSING_TOKEN_MESSAGE.to_string()))
    }

    /// URL of the dataset endpoint carrying only the non-empty filters.
    pub fn dataset_url(&self, criteria: &FilterCriteria) -> Result<Url> {
        let mut url = self.endpoint("datasets/", PortalError::RetrievalFailure)?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(source) = criteria.source() {
                pairs.append_pair("source", source);
            }
            if let Some(min_records) = criteria.min_records() {
                pairs.append_pair("min_records", min_records);
            }
        }
        Ok(url)
    }

    /// Fetch the dataset records matching `criteria`, in server order.
    pub async fn fetch_datasets(
        &self,
        token: &str,
        criteria: &FilterCriteria,
    ) -> Result<Vec<DatasetRecord>> {
        let url = self.dataset_url(criteria)?;
        debug!(query = url.query().unwrap_or_default(), "fetching datasets");

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| {
                warn!(?err, "dataset endpoint unreachable");
                PortalError::RetrievalFailure(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_detail(&body);
            warn!(%status, %message, "dataset endpoint returned an error");
            return Err(PortalError::RetrievalFailure(message));
        }

        response
            .json::<Vec<DatasetRecord>>()
            .await
            .map_err(|err| PortalError::RetrievalFailure(err.to_string()))
    }

    fn endpoint(&self, path: &str, wrap: fn(String) -> PortalError) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| wrap(format!("invalid endpoint {path}: {err}")))
    }
}

/// Pull a human-readable `detail` out of an error body, falling back to a
/// generic message when it is absent or not a string.
fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .and_then(|payload| payload.detail)
        .and_then(|detail| detail.as_str().map(str::to_string))
        .filter(|detail| !detail.is_empty())
        .unwrap_or_else(|| RETRIEVAL_FAILED_MESSAGE.to_string())
}
