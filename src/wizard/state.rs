// ABOUTME: Selection state machine for the sell-car wizard
// Tracks the active step, chosen values/labels and the side data derived from them

use super::options::StepOption;
use super::pricing::{self, PriceError};
use super::step::StepId;
use crate::api::UploadedRefs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Photos-step value meaning "I will upload photos now"
pub const PHOTOS_UPLOAD_NOW: &str = "upload-now";
/// Photos-step value meaning "send someone to take photos"
pub const PHOTOS_NEED_HELP: &str = "need-help";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Step '{0}' is locked until earlier steps are completed")]
    StepLocked(StepId),

    #[error("A value is required for step '{0}'")]
    EmptyValue(StepId),

    #[error("{0}")]
    InvalidInput(#[from] PriceError),

    #[error("No attached photo at position {0}")]
    NoSuchPhoto(usize),
}

/// How the seller wants to provide photos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoChoice {
    UploadNow,
    NeedHelp,
}

impl PhotoChoice {
    pub fn all() -> &'static [PhotoChoice] {
        &[Self::UploadNow, Self::NeedHelp]
    }

    pub fn value(self) -> &'static str {
        match self {
            Self::UploadNow => PHOTOS_UPLOAD_NOW,
            Self::NeedHelp => PHOTOS_NEED_HELP,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::UploadNow => "Upload photos now",
            Self::NeedHelp => "Need help with photos",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            PHOTOS_UPLOAD_NOW => Some(Self::UploadNow),
            PHOTOS_NEED_HELP => Some(Self::NeedHelp),
            _ => None,
        }
    }
}

/// Fuel and transmission captured when a variant is chosen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission_type: Option<String>,
}

impl VariantMeta {
    pub fn is_empty(&self) -> bool {
        self.fuel_type.is_none() && self.transmission_type.is_none()
    }
}

/// Structured location written when a suggestion is picked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    pub formatted: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_id: Option<u64>,
}

/// Result of picking a location suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationPick {
    /// Text written back into the input box
    pub formatted: String,
    pub data: LocationData,
    /// Selection value: pincode id, else city id, else the formatted string
    pub value: String,
}

/// A chosen value and the label shown for it in the step header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub value: String,
    pub label: String,
}

/// Per-step selections.
///
/// Value and label live in one entry, so both views always expose the same
/// keys. Only the wizard writes, and each write drops every later step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    entries: BTreeMap<StepId, Selection>,
}

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(step, value)` pairs, keeping only the gap-free prefix.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = (StepId, S)>,
        S: Into<String>,
    {
        let values: BTreeMap<StepId, String> =
            values.into_iter().map(|(k, v)| (k, v.into())).collect();
        Self::from_maps(&values, &BTreeMap::new())
    }

    /// Rebuild from separate value/label maps; missing labels fall back to the value
    pub fn from_maps(
        values: &BTreeMap<StepId, String>,
        labels: &BTreeMap<StepId, String>,
    ) -> Self {
        let mut entries = BTreeMap::new();
        for step in StepId::all() {
            match values.get(step).filter(|v| !v.trim().is_empty()) {
                Some(value) => {
                    let label = labels
                        .get(step)
                        .filter(|l| !l.trim().is_empty())
                        .unwrap_or(value)
                        .clone();
                    entries.insert(
                        *step,
                        Selection {
                            value: value.clone(),
                            label,
                        },
                    );
                }
                None => break,
            }
        }
        Self { entries }
    }

    pub fn get(&self, step: StepId) -> Option<&Selection> {
        self.entries.get(&step)
    }

    pub fn value(&self, step: StepId) -> Option<&str> {
        self.entries.get(&step).map(|s| s.value.as_str())
    }

    pub fn label(&self, step: StepId) -> Option<&str> {
        self.entries.get(&step).map(|s| s.label.as_str())
    }

    /// True when the step has a non-empty value
    pub fn has(&self, step: StepId) -> bool {
        self.value(step).is_some_and(|v| !v.trim().is_empty())
    }

    pub fn steps(&self) -> impl Iterator<Item = StepId> + '_ {
        self.entries.keys().copied()
    }

    /// Step → value view
    pub fn values(&self) -> BTreeMap<StepId, String> {
        self.entries
            .iter()
            .map(|(k, s)| (*k, s.value.clone()))
            .collect()
    }

    /// Step → label view
    pub fn labels(&self) -> BTreeMap<StepId, String> {
        self.entries
            .iter()
            .map(|(k, s)| (*k, s.label.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write a selection and drop every later step. Returns the dropped steps.
    pub(crate) fn select(
        &mut self,
        step: StepId,
        value: impl Into<String>,
        label: impl Into<String>,
    ) -> Vec<StepId> {
        self.entries.insert(
            step,
            Selection {
                value: value.into(),
                label: String::new(),
            },
        );
        let removed = self.truncate_after(step);
        if let Some(entry) = self.entries.get_mut(&step) {
            entry.label = label.into();
        }
        removed
    }

    /// Remove every step strictly after `step`
    pub(crate) fn truncate_after(&mut self, step: StepId) -> Vec<StepId> {
        let removed: Vec<StepId> = self
            .entries
            .keys()
            .copied()
            .filter(|k| *k > step)
            .collect();
        for key in &removed {
            self.entries.remove(key);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Outcome of a successful selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTransition {
    pub step: StepId,
    /// Steps whose selections were dropped
    pub invalidated: Vec<StepId>,
    /// New active step, or `None` when the last step was answered
    pub advanced_to: Option<StepId>,
}

/// One row of the step header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepHeader {
    pub step: StepId,
    pub title: &'static str,
    pub selected_label: Option<String>,
    pub enabled: bool,
    pub active: bool,
}

/// Message shown instead of options when prerequisites are missing
pub fn blocking_message(step: StepId, selections: &Selections) -> Option<&'static str> {
    let brand = selections.has(StepId::Brand);
    let year = selections.has(StepId::Year);
    let model = selections.has(StepId::Model);

    match step {
        StepId::Year if !brand => Some("Pick a brand to proceed"),
        StepId::Model => match (brand, year) {
            (false, false) => Some("Pick brand and year to proceed"),
            (false, true) => Some("Pick a brand to proceed"),
            (true, false) => Some("Pick a year to proceed"),
            (true, true) => None,
        },
        StepId::Variant => match (year, model) {
            (false, false) => Some("Pick brand and year to proceed"),
            (false, true) => Some("Pick a year to proceed"),
            (true, false) => Some("Pick a model to proceed"),
            (true, true) => None,
        },
        _ => None,
    }
}

/// Every step answered, and photos attached when the seller chose to upload now
pub fn is_complete(selections: &Selections, photo_count: usize) -> bool {
    let all_filled = StepId::all().iter().all(|step| selections.has(*step));
    if !all_filled {
        return false;
    }
    match selections.value(StepId::Photos) {
        Some(PHOTOS_UPLOAD_NOW) => photo_count > 0,
        _ => true,
    }
}

/// Full sell-car wizard state
#[derive(Debug, Clone)]
pub struct SellWizard {
    current_step: StepId,
    selections: Selections,
    variant_meta: Option<VariantMeta>,
    location: Option<LocationData>,
    registration_number: Option<String>,
    /// Local photo files not yet uploaded
    attachments: Vec<PathBuf>,
    photo_keys: Vec<String>,
    photo_urls: Vec<String>,
}

impl Default for SellWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SellWizard {
    pub fn new() -> Self {
        Self {
            current_step: StepId::first(),
            selections: Selections::new(),
            variant_meta: None,
            location: None,
            registration_number: None,
            attachments: Vec::new(),
            photo_keys: Vec::new(),
            photo_urls: Vec::new(),
        }
    }

    /// Rebuild a wizard from previously saved pieces.
    ///
    /// The active step becomes the first unanswered one.
    pub fn restore(
        selections: Selections,
        variant_meta: Option<VariantMeta>,
        location: Option<LocationData>,
        registration_number: Option<String>,
        photo_keys: Vec<String>,
        photo_urls: Vec<String>,
    ) -> Self {
        let current_step = StepId::all()
            .iter()
            .copied()
            .find(|step| !selections.has(*step))
            .unwrap_or_else(StepId::last);

        let variant_meta = variant_meta.filter(|m| !m.is_empty() && selections.has(StepId::Variant));
        let location = location.filter(|_| selections.has(StepId::Location));

        Self {
            current_step,
            selections,
            variant_meta,
            location,
            registration_number,
            attachments: Vec::new(),
            photo_keys,
            photo_urls,
        }
    }

    pub fn current_step(&self) -> StepId {
        self.current_step
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn variant_meta(&self) -> Option<&VariantMeta> {
        self.variant_meta.as_ref()
    }

    pub fn location_data(&self) -> Option<&LocationData> {
        self.location.as_ref()
    }

    pub fn registration_number(&self) -> Option<&str> {
        self.registration_number.as_deref()
    }

    pub fn attachments(&self) -> &[PathBuf] {
        &self.attachments
    }

    pub fn photo_keys(&self) -> &[String] {
        &self.photo_keys
    }

    pub fn photo_urls(&self) -> &[String] {
        &self.photo_urls
    }

    /// Attached plus already-uploaded photos
    pub fn photo_count(&self) -> usize {
        self.attachments.len() + self.photo_keys.len()
    }

    /// A step is navigable when every earlier step has a value
    pub fn is_step_enabled(&self, step: StepId) -> bool {
        step.upstream().iter().all(|s| self.selections.has(*s))
    }

    pub fn blocking_message(&self, step: StepId) -> Option<&'static str> {
        blocking_message(step, &self.selections)
    }

    pub fn is_complete(&self) -> bool {
        is_complete(&self.selections, self.photo_count())
    }

    /// Steps still lacking a value, in catalog order
    pub fn missing_steps(&self) -> Vec<StepId> {
        StepId::all()
            .iter()
            .copied()
            .filter(|s| !self.selections.has(*s))
            .collect()
    }

    /// Record a choice for `step`, drop all later choices and advance.
    pub fn select_option(
        &mut self,
        step: StepId,
        value: &str,
        label: &str,
    ) -> Result<StepTransition, WizardError> {
        if !self.is_step_enabled(step) {
            return Err(WizardError::StepLocked(step));
        }
        if value.trim().is_empty() {
            return Err(WizardError::EmptyValue(step));
        }

        let invalidated = self.selections.select(step, value, label);
        self.clear_side_data(step);
        for removed in &invalidated {
            self.clear_side_data(*removed);
        }

        let advanced_to = step.next();
        if let Some(next) = advanced_to {
            self.current_step = next;
        }

        debug!(
            "Selected {}={} ({} later step(s) cleared)",
            step,
            value,
            invalidated.len()
        );

        Ok(StepTransition {
            step,
            invalidated,
            advanced_to,
        })
    }

    /// Select a variant and keep its fuel/transmission for the listing payload
    pub fn select_variant(
        &mut self,
        value: &str,
        label: &str,
        meta: VariantMeta,
    ) -> Result<StepTransition, WizardError> {
        let transition = self.select_option(StepId::Variant, value, label)?;
        self.variant_meta = Some(meta).filter(|m| !m.is_empty());
        Ok(transition)
    }

    /// Record a loaded option; variant options also carry their fuel/transmission
    pub fn choose(&mut self, step: StepId, option: &StepOption) -> Result<StepTransition, WizardError> {
        if step == StepId::Variant {
            let meta = VariantMeta {
                fuel_type: option.fuel_type.clone(),
                transmission_type: option.transmission_type.clone(),
            };
            return self.select_variant(&option.value, &option.label, meta);
        }
        self.select_option(step, &option.value, &option.label)
    }

    pub fn select_location(&mut self, pick: &LocationPick) -> Result<StepTransition, WizardError> {
        let transition = self.select_option(StepId::Location, &pick.value, &pick.formatted)?;
        self.location = Some(pick.data.clone());
        Ok(transition)
    }

    /// Validate and record the expected price (`₹5,00,000` style)
    pub fn set_price(&mut self, input: &str) -> Result<StepTransition, WizardError> {
        if !self.is_step_enabled(StepId::Price) {
            return Err(WizardError::StepLocked(StepId::Price));
        }
        let (_, formatted) = pricing::validate_expected_price(input)?;
        self.select_option(StepId::Price, &formatted, &formatted)
    }

    pub fn choose_photos(&mut self, choice: PhotoChoice) -> Result<StepTransition, WizardError> {
        self.select_option(StepId::Photos, choice.value(), choice.label())
    }

    pub fn attach_photo(&mut self, path: impl Into<PathBuf>) {
        self.attachments.push(path.into());
    }

    pub fn remove_photo(&mut self, index: usize) -> Result<PathBuf, WizardError> {
        if index >= self.attachments.len() {
            return Err(WizardError::NoSuchPhoto(index));
        }
        Ok(self.attachments.remove(index))
    }

    /// Move attached files to the uploaded list once the backend has stored them
    pub fn mark_uploaded(&mut self, refs: &UploadedRefs) {
        for image in &refs.images {
            if !self.photo_keys.contains(&image.key) {
                self.photo_keys.push(image.key.clone());
                self.photo_urls.push(image.url.clone());
            }
        }
        self.attachments.clear();
    }

    pub fn set_registration_number(&mut self, input: &str) -> Result<(), WizardError> {
        let normalized = pricing::normalize_registration(input)?;
        self.registration_number = Some(normalized);
        Ok(())
    }

    /// Jump to an enabled step without changing selections
    pub fn go_to(&mut self, step: StepId) -> Result<(), WizardError> {
        if !self.is_step_enabled(step) {
            return Err(WizardError::StepLocked(step));
        }
        self.current_step = step;
        Ok(())
    }

    /// Move to previous step
    pub fn go_back(&mut self) -> bool {
        if let Some(prev) = self.current_step.previous() {
            self.current_step = prev;
            return true;
        }
        false
    }

    pub fn header(&self) -> Vec<StepHeader> {
        StepId::all()
            .iter()
            .map(|step| StepHeader {
                step: *step,
                title: step.label(),
                selected_label: self.selections.label(*step).map(str::to_string),
                enabled: self.is_step_enabled(*step),
                active: *step == self.current_step,
            })
            .collect()
    }

    /// Back to a blank wizard on the first step
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn clear_side_data(&mut self, step: StepId) {
        match step {
            StepId::Variant => self.variant_meta = None,
            StepId::Location => self.location = None,
            _ => {}
        }
    }
}
