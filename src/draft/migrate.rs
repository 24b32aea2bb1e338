// ABOUTME: Upgrades legacy flat sell-car drafts to the versioned record
// Legacy drafts stored `<step>` and `<step>Label` keys side by side in one object

use super::record::SellCarDraft;
use crate::wizard::{LocationData, StepId, VariantMeta};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyLocation {
    #[serde(default)]
    formatted: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    pincode: Option<Value>,
    #[serde(default)]
    pincode_id: Option<Value>,
    #[serde(default)]
    city_id: Option<Value>,
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn numeric_id(value: Option<&Value>) -> Option<u64> {
    value.and_then(scalar).and_then(|s| s.trim().parse().ok())
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(scalar).collect())
        .unwrap_or_default()
}

/// Build a v2 draft from an unversioned object
pub fn from_legacy(object: &Map<String, Value>) -> SellCarDraft {
    let mut draft = SellCarDraft::new();

    for step in StepId::all() {
        let key = step.key();
        if let Some(value) = object.get(key).and_then(scalar) {
            draft.selections.insert(*step, value);
        }
        if let Some(label) = object.get(&format!("{key}Label")).and_then(scalar) {
            draft.labels.insert(*step, label);
        }
    }

    draft.location_data = object
        .get("locationData")
        .cloned()
        .and_then(|v| serde_json::from_value::<LegacyLocation>(v).ok())
        .and_then(|legacy| {
            let formatted = legacy.formatted.filter(|f| !f.trim().is_empty())?;
            Some(LocationData {
                formatted,
                city: legacy.city,
                pincode: legacy.pincode.as_ref().and_then(scalar),
                pincode_id: numeric_id(legacy.pincode_id.as_ref()),
                city_id: numeric_id(legacy.city_id.as_ref()),
            })
        });

    let meta = VariantMeta {
        fuel_type: object.get("fuelType").and_then(scalar),
        transmission_type: object.get("transmissionType").and_then(scalar),
    };
    draft.variant_meta = Some(meta).filter(|m| !m.is_empty());

    draft.variant_name = object
        .get("variantName")
        .and_then(scalar)
        .or_else(|| draft.label(StepId::Variant).map(str::to_string));
    draft.registration_number = object.get("registrationNumber").and_then(scalar);
    draft.photo_keys = string_list(object.get("photoKeys"));
    draft.photo_urls = string_list(object.get("photoUrls"));

    draft
}
