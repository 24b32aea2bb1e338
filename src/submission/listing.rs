// ABOUTME: Maps a stored draft onto the create-listing payload and confirmation query
// Numeric ids are parsed from selection values; price comes from the formatted rupee string

use super::SubmitError;
use crate::api::CreateListingRequest;
use crate::draft::SellCarDraft;
use crate::wizard::pricing::parse_price;
use crate::wizard::{StepId, PHOTOS_UPLOAD_NOW};
use std::str::FromStr;
use url::form_urlencoded;

fn required<'a>(draft: &'a SellCarDraft, step: StepId) -> Result<&'a str, SubmitError> {
    draft
        .value(step)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SubmitError::MissingField(step.key().to_string()))
}

fn parse_field<T: FromStr>(field: &str, value: &str) -> Result<T, SubmitError> {
    value.trim().parse().map_err(|_| SubmitError::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn id_for(draft: &SellCarDraft, step: StepId) -> Result<u64, SubmitError> {
    parse_field(step.key(), required(draft, step)?)
}

/// Pincode id of the picked suggestion; city ids and postal codes never stand in for it
fn pincode_id(draft: &SellCarDraft) -> Result<u64, SubmitError> {
    required(draft, StepId::Location)?;
    draft
        .location_data
        .as_ref()
        .and_then(|data| data.pincode_id)
        .ok_or_else(|| SubmitError::MissingField("pincodeId".to_string()))
}

/// Build the `POST /sell-car` body from a draft
pub fn build_listing_request(draft: &SellCarDraft) -> Result<CreateListingRequest, SubmitError> {
    let registration_number = draft
        .registration_number
        .clone()
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| SubmitError::MissingField("registrationNumber".to_string()))?;

    let photos = required(draft, StepId::Photos)?;
    if photos == PHOTOS_UPLOAD_NOW && draft.photo_keys.is_empty() {
        return Err(SubmitError::MissingField("photoKeys".to_string()));
    }

    let meta = draft.variant_meta.clone().unwrap_or_default();

    Ok(CreateListingRequest {
        registration_number,
        brand_id: id_for(draft, StepId::Brand)?,
        model_id: id_for(draft, StepId::Model)?,
        variant_id: id_for(draft, StepId::Variant)?,
        manufacturing_year: parse_field(StepId::Year.key(), required(draft, StepId::Year)?)?,
        owner_id: id_for(draft, StepId::Ownership)?,
        odometer_id: id_for(draft, StepId::KilometerDriven)?,
        pincode_id: pincode_id(draft)?,
        expected_price: parse_price(required(draft, StepId::Price)?)?,
        fuel_type: meta.fuel_type,
        transmission_type: meta.transmission_type,
        photo_keys: draft.photo_keys.clone(),
    })
}

/// URL-encoded summary handed to the confirmation step
pub fn confirmation_query(draft: &SellCarDraft) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (step, value) in &draft.selections {
        query.append_pair(step.key(), value);
    }
    if let Some(name) = &draft.variant_name {
        query.append_pair("variantName", name);
    }
    if let Some(registration) = &draft.registration_number {
        query.append_pair("registrationNumber", registration);
    }
    query.finish()
}
