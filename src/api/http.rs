//! HTTP implementation of the config API.

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::traits::{ApiError, ConfigApi};
use crate::types::{AppInfo, ConsoleConfig};

/// Config API client talking JSON over HTTP.
pub struct HttpConfigApi {
    client: Client,
    base_url: Url,
}

impl HttpConfigApi {
    /// Create a client bound to the given base URL.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            return Err(ApiError::Communication(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| {
            debug!(%body, "undecodable response body");
            ApiError::Parse(e.to_string())
        })
    }
}

#[async_trait]
impl ConfigApi for HttpConfigApi {
    async fn get_console_config(&self) -> Result<Option<ConsoleConfig>, ApiError> {
        let url = self.endpoint(&["apps", "consoleConfig"])?;
        self.get_json(url).await.map(Some)
    }

    async fn get_apps(&self) -> Result<Option<Vec<String>>, ApiError> {
        let url = self.endpoint(&["apps"])?;
        self.get_json(url).await.map(Some)
    }

    async fn get_app_info(&self, app_name: &str) -> Result<Option<AppInfo>, ApiError> {
        let url = self.endpoint(&["apps", app_name, "info.json"])?;
        self.get_json(url).await.map(Some)
    }
}
