// ABOUTME: Versioned sell-car draft record
// Conversion to and from wizard state, merging and validation of stored drafts

use crate::wizard::{LocationData, Selections, SellWizard, StepId, VariantMeta};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Current on-disk schema version
pub const DRAFT_SCHEMA_VERSION: u32 = 2;

/// Everything the flow persists between the wizard and the confirmation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellCarDraft {
    pub schema_version: u32,
    pub draft_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub selections: BTreeMap<StepId, String>,
    #[serde(default)]
    pub labels: BTreeMap<StepId, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_data: Option<LocationData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_meta: Option<VariantMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub photo_keys: Vec<String>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
}

impl Default for SellCarDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl SellCarDraft {
    pub fn new() -> Self {
        Self {
            schema_version: DRAFT_SCHEMA_VERSION,
            draft_id: Uuid::new_v4(),
            saved_at: None,
            selections: BTreeMap::new(),
            labels: BTreeMap::new(),
            location_data: None,
            variant_meta: None,
            variant_name: None,
            registration_number: None,
            photo_keys: Vec::new(),
            photo_urls: Vec::new(),
        }
    }

    /// Export the wizard's current state as a fresh draft
    pub fn from_wizard(wizard: &SellWizard) -> Self {
        let mut draft = Self::new();
        draft.merge_wizard(wizard);
        draft
    }

    pub fn value(&self, step: StepId) -> Option<&str> {
        self.selections.get(&step).map(String::as_str)
    }

    pub fn label(&self, step: StepId) -> Option<&str> {
        self.labels.get(&step).map(String::as_str)
    }

    /// Fold the wizard's state into this draft.
    ///
    /// Selections and labels are replaced. Location data and variant meta are
    /// kept from the draft only while the matching selection is unchanged.
    /// Photo references are appended without duplicates.
    pub fn merge_wizard(&mut self, wizard: &SellWizard) {
        let selections = wizard.selections();
        let previous_location = self.value(StepId::Location).map(str::to_string);
        let previous_variant = self.value(StepId::Variant).map(str::to_string);

        self.selections = selections.values();
        self.labels = selections.labels();

        self.location_data = match wizard.location_data() {
            Some(data) => Some(data.clone()),
            None if previous_location.as_deref() == self.value(StepId::Location) => {
                self.location_data.take()
            }
            None => None,
        };

        self.variant_meta = match wizard.variant_meta() {
            Some(meta) => Some(meta.clone()),
            None if previous_variant.as_deref() == self.value(StepId::Variant) => {
                self.variant_meta.take()
            }
            None => None,
        };

        self.variant_name = self.label(StepId::Variant).map(str::to_string);

        if let Some(registration) = wizard.registration_number() {
            self.registration_number = Some(registration.to_string());
        }

        self.append_photos(wizard.photo_keys(), wizard.photo_urls());
    }

    /// Append uploaded photo references, skipping keys already present
    pub fn append_photos(&mut self, keys: &[String], urls: &[String]) {
        for (i, key) in keys.iter().enumerate() {
            if self.photo_keys.contains(key) {
                continue;
            }
            self.photo_keys.push(key.clone());
            if let Some(url) = urls.get(i) {
                self.photo_urls.push(url.clone());
            }
        }
    }

    /// Enforce the stored-state invariants.
    ///
    /// Labels without values are dropped and selections are cut at the first
    /// unanswered step. Side data is dropped with its step.
    pub fn validate(mut self) -> Self {
        let selections = Selections::from_maps(&self.selections, &self.labels);
        self.selections = selections.values();
        self.labels = selections.labels();

        if !selections.has(StepId::Location) {
            self.location_data = None;
        }
        if !selections.has(StepId::Variant) {
            self.variant_meta = None;
            self.variant_name = None;
        }
        if self.variant_meta.as_ref().is_some_and(VariantMeta::is_empty) {
            self.variant_meta = None;
        }
        self.schema_version = DRAFT_SCHEMA_VERSION;
        self
    }
}

impl SellWizard {
    /// Resume a wizard from a stored draft
    pub fn from_draft(draft: &SellCarDraft) -> Self {
        SellWizard::restore(
            Selections::from_maps(&draft.selections, &draft.labels),
            draft.variant_meta.clone(),
            draft.location_data.clone(),
            draft.registration_number.clone(),
            draft.photo_keys.clone(),
            draft.photo_urls.clone(),
        )
    }

    /// Current state as a draft record
    pub fn snapshot(&self) -> SellCarDraft {
        SellCarDraft::from_wizard(self)
    }
}
