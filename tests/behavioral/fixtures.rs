// ABOUTME: Shared test fixtures and utilities for behavioral tests
//
// Provides:
// - FakeMarketplace: in-memory MarketplaceApi with call counters
// - suggestions(): generated location suggestion pages
// - complete_wizard(): a wizard with every step answered

use async_trait::async_trait;
use sellcar::api::{
    ApiEnvelope, ApiError, BrandRecord, CreateListingRequest, LocationSuggestion, MarketplaceApi,
    ModelRecord, PhotoUpload, UploadedImage, UploadedRefs, VariantGroup, VariantRecord, YearRecord,
};
use sellcar::wizard::{LocationData, LocationPick, PhotoChoice, SellWizard, StepId, VariantMeta};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory marketplace backend
pub struct FakeMarketplace {
    /// Total location suggestions available for any query
    pub location_total: usize,
    /// Response code returned by create-listing
    pub listing_code: u16,
    /// Artificial latency for catalog calls
    pub catalog_delay: Option<Duration>,
    pub fail_uploads: bool,

    pub catalog_calls: AtomicUsize,
    pub city_queries: Mutex<Vec<(String, u32)>>,
    pub uploads: Mutex<Vec<PhotoUpload>>,
    pub listings: Mutex<Vec<CreateListingRequest>>,
}

impl Default for FakeMarketplace {
    fn default() -> Self {
        Self {
            location_total: 35,
            listing_code: 201,
            catalog_delay: None,
            fail_uploads: false,
            catalog_calls: AtomicUsize::new(0),
            city_queries: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            listings: Mutex::new(Vec::new()),
        }
    }
}

impl FakeMarketplace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    pub fn city_queries(&self) -> Vec<(String, u32)> {
        self.city_queries.lock().unwrap().clone()
    }

    pub fn listings(&self) -> Vec<CreateListingRequest> {
        self.listings.lock().unwrap().clone()
    }

    async fn catalog_call(&self) {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.catalog_delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl MarketplaceApi for FakeMarketplace {
    async fn brands(&self) -> Result<Vec<BrandRecord>, ApiError> {
        self.catalog_call().await;
        Ok(vec![
            BrandRecord {
                id: "5".into(),
                display_name: "Maruti Suzuki".into(),
                logo: None,
            },
            BrandRecord {
                id: "7".into(),
                display_name: "Hyundai".into(),
                logo: None,
            },
        ])
    }

    async fn years(&self, brand_id: &str) -> Result<Vec<YearRecord>, ApiError> {
        self.catalog_call().await;
        let years = if brand_id == "5" {
            vec!["2020", "2019", "2018"]
        } else {
            vec!["2021"]
        };
        Ok(years.into_iter().map(|y| YearRecord::Bare(y.to_string())).collect())
    }

    async fn models(&self, brand_id: &str, year: &str) -> Result<Vec<ModelRecord>, ApiError> {
        self.catalog_call().await;
        Ok(vec![ModelRecord {
            id: "12".into(),
            display_name: format!("Model of {brand_id} ({year})"),
        }])
    }

    async fn variants(&self, _year: &str, _model_id: &str) -> Result<Vec<VariantGroup>, ApiError> {
        self.catalog_call().await;
        Ok(vec![
            VariantGroup {
                fuel_type: "Petrol".into(),
                variants: vec![VariantRecord {
                    id: "301".into(),
                    display_name: "VXi".into(),
                    transmission_type: Some("Manual".into()),
                }],
            },
            VariantGroup {
                fuel_type: "Diesel".into(),
                variants: vec![VariantRecord {
                    id: "302".into(),
                    display_name: "ZDi".into(),
                    transmission_type: Some("Manual".into()),
                }],
            },
        ])
    }

    async fn city_suggestions(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<LocationSuggestion>, ApiError> {
        self.city_queries
            .lock()
            .unwrap()
            .push((query.to_string(), page));
        let start = (page.saturating_sub(1) * limit) as usize;
        let end = (start + limit as usize).min(self.location_total);
        Ok((start..end).map(suggestion).collect())
    }

    async fn upload_images(&self, files: Vec<PhotoUpload>) -> Result<UploadedRefs, ApiError> {
        if self.fail_uploads {
            return Err(ApiError::Status {
                status: 500,
                body: "storage unavailable".into(),
            });
        }
        let mut uploads = self.uploads.lock().unwrap();
        let images = files
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let key = format!("photo-{}", uploads.len() + i + 1);
                UploadedImage {
                    url: format!("https://cdn.example/{key}"),
                    key,
                }
            })
            .collect();
        uploads.extend(files);
        Ok(UploadedRefs { images })
    }

    async fn create_listing(
        &self,
        request: &CreateListingRequest,
    ) -> Result<ApiEnvelope<serde_json::Value>, ApiError> {
        self.listings.lock().unwrap().push(request.clone());
        Ok(ApiEnvelope {
            code: self.listing_code,
            data: Some(serde_json::json!({ "listingId": 991 })),
            message: Some("Listing created".into()),
        })
    }
}

/// Suggestion number `i` around Rajkot
pub fn suggestion(i: usize) -> LocationSuggestion {
    LocationSuggestion {
        area_name: Some(format!("Area {i}")),
        city: Some("Rajkot".into()),
        pincode: Some(format!("{}", 360_000 + i)),
        formatted: Some(format!("Area {i}, Rajkot, {}", 360_000 + i)),
        pincode_id: Some(1_000 + i as u64),
        city_id: Some(9),
    }
}

/// Wizard answered up to (and including) kilometers driven
pub fn wizard_through_kilometers() -> SellWizard {
    let mut wizard = SellWizard::new();
    wizard.select_option(StepId::Brand, "5", "Maruti Suzuki").unwrap();
    wizard.select_option(StepId::Year, "2019", "2019").unwrap();
    wizard.select_option(StepId::Model, "12", "Swift").unwrap();
    wizard
        .select_variant(
            "301",
            "VXi",
            VariantMeta {
                fuel_type: Some("Petrol".into()),
                transmission_type: Some("Manual".into()),
            },
        )
        .unwrap();
    wizard.select_option(StepId::Ownership, "1", "1st Owner").unwrap();
    wizard
        .select_option(StepId::KilometerDriven, "3", "20,000 - 30,000 km")
        .unwrap();
    wizard
}

/// Wizard with every step answered; photos set to `choice`
pub fn complete_wizard(choice: PhotoChoice) -> SellWizard {
    let mut wizard = wizard_through_kilometers();
    wizard
        .select_location(&LocationPick {
            formatted: "Mavdi, Rajkot".into(),
            data: LocationData {
                formatted: "Mavdi, Rajkot".into(),
                city: Some("Rajkot".into()),
                pincode: Some("360004".into()),
                pincode_id: Some(77),
                city_id: None,
            },
            value: "77".into(),
        })
        .unwrap();
    wizard.set_price("₹5,00,000").unwrap();
    wizard.choose_photos(choice).unwrap();
    wizard
}
