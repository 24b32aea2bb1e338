// ABOUTME: Marketplace backend integration
// Async trait seam over the REST API plus the reqwest-backed client

pub mod client;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use client::MarketplaceClient;
pub use types::{
    ApiEnvelope, BrandRecord, CreateListingRequest, LocationSuggestion, ModelRecord, PhotoUpload,
    UploadedImage, UploadedRefs, VariantGroup, VariantRecord, YearRecord,
};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response; `body` is the raw error body
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Operations the sell-car flow needs from the marketplace backend.
///
/// Implemented by [`MarketplaceClient`] for production and by fakes in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// `GET /car/brands`
    async fn brands(&self) -> Result<Vec<BrandRecord>, ApiError>;

    /// `GET /car/{brandId}/years`
    async fn years(&self, brand_id: &str) -> Result<Vec<YearRecord>, ApiError>;

    /// `GET /car/{brandId}/year/{year}/models`
    async fn models(&self, brand_id: &str, year: &str) -> Result<Vec<ModelRecord>, ApiError>;

    /// `GET /car/year/{year}/model/{modelId}/variants`
    async fn variants(&self, year: &str, model_id: &str) -> Result<Vec<VariantGroup>, ApiError>;

    /// `GET /city-suggestions?q=&page=&limit=`
    async fn city_suggestions(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<LocationSuggestion>, ApiError>;

    /// `POST /image-upload` (multipart)
    async fn upload_images(&self, files: Vec<PhotoUpload>) -> Result<UploadedRefs, ApiError>;

    /// `POST /sell-car`; the envelope code decides success
    async fn create_listing(
        &self,
        request: &CreateListingRequest,
    ) -> Result<ApiEnvelope<serde_json::Value>, ApiError>;
}
