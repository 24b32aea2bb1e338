// ABOUTME: Wire types for the marketplace REST API
// Response envelope, catalog records, location suggestions, uploads and listing creation

use serde::{Deserialize, Deserializer, Serialize};

/// Standard response envelope returned by every marketplace endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub code: u16,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(alias = "name")]
    pub display_name: String,
    #[serde(default)]
    pub logo: Option<String>,
}

/// Years come back either as bare numbers or as `{ "year": 2019 }` objects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum YearRecord {
    Bare(#[serde(deserialize_with = "string_or_number")] String),
    Object {
        #[serde(deserialize_with = "string_or_number")]
        year: String,
    },
}

impl YearRecord {
    pub fn year(&self) -> &str {
        match self {
            Self::Bare(year) | Self::Object { year } => year,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(alias = "name")]
    pub display_name: String,
}

/// Variants for a (year, model) pair, grouped server-side by fuel type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantGroup {
    pub fuel_type: String,
    #[serde(default)]
    pub variants: Vec<VariantRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(alias = "name")]
    pub display_name: String,
    #[serde(default)]
    pub transmission_type: Option<String>,
}

/// One row from the city/pincode suggestion endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSuggestion {
    #[serde(default)]
    pub area_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub pincode: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub formatted: Option<String>,
    #[serde(default, alias = "pincode_id")]
    pub pincode_id: Option<u64>,
    #[serde(default, alias = "city_id")]
    pub city_id: Option<u64>,
}

impl LocationSuggestion {
    /// Display string, composed from parts when the backend omits `formatted`
    pub fn display(&self) -> String {
        if let Some(formatted) = self.formatted.as_deref().filter(|f| !f.trim().is_empty()) {
            return formatted.to_string();
        }
        [
            self.area_name.as_deref(),
            self.city.as_deref(),
            self.pincode.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// A local photo file to be sent to the upload endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub key: String,
    pub url: String,
}

/// Storage keys and public URLs returned for an upload batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedRefs {
    #[serde(default)]
    pub images: Vec<UploadedImage>,
}

impl UploadedRefs {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Body of `POST /sell-car`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub registration_number: String,
    pub brand_id: u64,
    pub model_id: u64,
    pub variant_id: u64,
    pub manufacturing_year: u16,
    pub owner_id: u64,
    pub odometer_id: u64,
    pub pincode_id: u64,
    pub expected_price: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission_type: Option<String>,
    pub photo_keys: Vec<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, found {other}"
        ))),
    }
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, found {other}"
        ))),
    }
}
