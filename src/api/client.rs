// ABOUTME: reqwest implementation of the marketplace API
// Every call goes through one request helper that unwraps the {code, data, message} envelope

use super::types::{
    ApiEnvelope, BrandRecord, CreateListingRequest, LocationSuggestion, ModelRecord, PhotoUpload,
    UploadedImage, UploadedRefs, VariantGroup, YearRecord,
};
use super::{ApiError, MarketplaceApi};
use crate::config::ApiConfig;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl MarketplaceClient {
    /// Create a client from the `[api]` configuration section
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "API base URL is not configured. Set SELLCAR_API_URL or api.base_url".to_string(),
            ));
        }

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode the envelope.
    ///
    /// Non-2xx responses become [`ApiError::Status`] with the raw body. A body
    /// without a `code` inherits the HTTP status.
    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<ApiEnvelope<T>, ApiError> {
        let response = self.authorized(builder).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Marketplace API error {}: {}", status, body);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let mut envelope: ApiEnvelope<T> = serde_json::from_str(&body)?;
        if envelope.code == 0 {
            envelope.code = status.as_u16();
        }
        Ok(envelope)
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ApiError> {
        debug!("GET {}", path);
        let builder = self.client.get(self.url(path)).query(query);
        let envelope: ApiEnvelope<Vec<T>> = self.send(builder).await?;
        Ok(envelope.into_data().unwrap_or_default())
    }
}

#[async_trait]
impl MarketplaceApi for MarketplaceClient {
    async fn brands(&self) -> Result<Vec<BrandRecord>, ApiError> {
        self.get_list("car/brands", &[]).await
    }

    async fn years(&self, brand_id: &str) -> Result<Vec<YearRecord>, ApiError> {
        self.get_list(&format!("car/{brand_id}/years"), &[]).await
    }

    async fn models(&self, brand_id: &str, year: &str) -> Result<Vec<ModelRecord>, ApiError> {
        self.get_list(&format!("car/{brand_id}/year/{year}/models"), &[])
            .await
    }

    async fn variants(&self, year: &str, model_id: &str) -> Result<Vec<VariantGroup>, ApiError> {
        self.get_list(&format!("car/year/{year}/model/{model_id}/variants"), &[])
            .await
    }

    async fn city_suggestions(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<LocationSuggestion>, ApiError> {
        self.get_list(
            "city-suggestions",
            &[
                ("q", query.to_string()),
                ("page", page.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn upload_images(&self, files: Vec<PhotoUpload>) -> Result<UploadedRefs, ApiError> {
        if files.is_empty() {
            return Ok(UploadedRefs::default());
        }

        let count = files.len();
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)?;
            form = form.part("images", part);
        }

        debug!("Uploading {} photo(s)", count);
        let builder = self.client.post(self.url("image-upload")).multipart(form);
        let envelope: ApiEnvelope<Vec<UploadedImage>> = self.send(builder).await?;
        let images = envelope.into_data().unwrap_or_default();

        if images.len() != count {
            warn!("Upload returned {} references for {} files", images.len(), count);
        }
        Ok(UploadedRefs { images })
    }

    async fn create_listing(
        &self,
        request: &CreateListingRequest,
    ) -> Result<ApiEnvelope<serde_json::Value>, ApiError> {
        debug!("POST sell-car for {}", request.registration_number);
        let builder = self.client.post(self.url("sell-car")).json(request);
        self.send(builder).await
    }
}
