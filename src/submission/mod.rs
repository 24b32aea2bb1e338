// ABOUTME: Submission assembler for the sell-car flow
// Uploads photos, merges and persists the draft, then creates the listing

pub mod listing;

pub use listing::{build_listing_request, confirmation_query};

use crate::api::{ApiEnvelope, ApiError, MarketplaceApi, PhotoUpload, UploadedRefs};
use crate::draft::{DraftError, DraftStore, SellCarDraft};
use crate::wizard::{PriceError, SellWizard};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Create-listing response code that means success
pub const LISTING_CREATED: u16 = 201;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Photo upload failed: {0}")]
    Upload(#[source] ApiError),

    #[error("Could not read photo {path}: {source}")]
    Photo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Marketplace request failed: {0}")]
    Api(#[source] ApiError),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidField { field: String, value: String },

    #[error("Invalid expected price: {0}")]
    Price(#[from] PriceError),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("Listing rejected ({code}): {message}")]
    Rejected { code: u16, message: String },
}

/// Draft persisted by [`SubmissionAssembler::prepare`] plus the confirmation query
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedListing {
    pub draft: SellCarDraft,
    pub query: String,
}

/// Successful create-listing response
#[derive(Debug, Clone)]
pub struct ListingCreated {
    pub code: u16,
    pub message: Option<String>,
    pub data: Option<serde_json::Value>,
}

pub struct SubmissionAssembler {
    api: Arc<dyn MarketplaceApi>,
    store: DraftStore,
}

impl SubmissionAssembler {
    pub fn new(api: Arc<dyn MarketplaceApi>, store: DraftStore) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &DraftStore {
        &self.store
    }

    /// Start a new car: reset the wizard and delete the stored draft so nothing
    /// from the previous car is merged into the next listing
    pub fn discard(&self, wizard: &mut SellWizard) -> Result<bool, SubmitError> {
        wizard.reset();
        let removed = self.store.clear()?;
        if removed {
            info!("Discarded stored draft at {}", self.store.path().display());
        }
        Ok(removed)
    }

    /// Upload attached photos, then merge the wizard into the stored draft.
    ///
    /// An upload failure is returned before anything is persisted.
    pub async fn prepare(&self, wizard: &mut SellWizard) -> Result<PreparedListing, SubmitError> {
        let refs = self.upload_attachments(wizard.attachments()).await?;
        if !refs.is_empty() {
            wizard.mark_uploaded(&refs);
        }

        let mut draft = self.store.load()?.unwrap_or_default();
        draft.merge_wizard(wizard);
        let draft = self.store.save(&draft)?;

        let query = confirmation_query(&draft);
        info!(
            "Prepared listing draft {} with {} photo(s)",
            draft.draft_id,
            draft.photo_keys.len()
        );
        Ok(PreparedListing { draft, query })
    }

    /// Create the listing. Only a 201 response counts as success; the stored
    /// draft is cleared afterwards. Failures are not retried.
    pub async fn submit(&self, draft: &SellCarDraft) -> Result<ListingCreated, SubmitError> {
        let request = build_listing_request(draft)?;

        let envelope = match self.api.create_listing(&request).await {
            Ok(envelope) => envelope,
            Err(ApiError::Status { status, body }) => {
                let message = rejection_message(&body);
                error!("Listing rejected with HTTP {}: {}", status, message);
                return Err(SubmitError::Rejected {
                    code: status,
                    message,
                });
            }
            Err(e) => return Err(SubmitError::Api(e)),
        };

        if envelope.code != LISTING_CREATED {
            let message = envelope.message.unwrap_or_default();
            error!("Listing rejected with code {}: {}", envelope.code, message);
            return Err(SubmitError::Rejected {
                code: envelope.code,
                message,
            });
        }

        self.store.clear()?;
        info!("Listing created for {}", request.registration_number);
        Ok(ListingCreated {
            code: envelope.code,
            message: envelope.message,
            data: envelope.data,
        })
    }

    async fn upload_attachments(&self, paths: &[PathBuf]) -> Result<UploadedRefs, SubmitError> {
        if paths.is_empty() {
            return Ok(UploadedRefs::default());
        }

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            files.push(read_photo(path).await?);
        }

        self.api
            .upload_images(files)
            .await
            .map_err(SubmitError::Upload)
    }
}

async fn read_photo(path: &Path) -> Result<PhotoUpload, SubmitError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| SubmitError::Photo {
            path: path.to_path_buf(),
            source,
        })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());

    Ok(PhotoUpload {
        file_name,
        content_type: content_type_for(path).to_string(),
        bytes,
    })
}

/// MIME type from the file extension
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Prefer the envelope message from an error body, else the raw body
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| body.to_string())
}
