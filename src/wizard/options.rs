// ABOUTME: Option provider for the wizard steps
// Fetches catalog options from the marketplace, serves fixed lists and drops stale responses

use super::state::Selections;
use super::step::StepId;
use crate::api::{ApiError, MarketplaceApi, VariantGroup};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// One selectable choice for a step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOption {
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission_type: Option<String>,
}

impl StepOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            ..Self::default()
        }
    }
}

const OWNERSHIP: [(&str, &str); 5] = [
    ("1", "1st Owner"),
    ("2", "2nd Owner"),
    ("3", "3rd Owner"),
    ("4", "4th Owner"),
    ("5", "5th Owner"),
];

const KILOMETER_BUCKETS: [(&str, &str); 13] = [
    ("1", "0 - 10,000 km"),
    ("2", "10,000 - 20,000 km"),
    ("3", "20,000 - 30,000 km"),
    ("4", "30,000 - 40,000 km"),
    ("5", "40,000 - 50,000 km"),
    ("6", "50,000 - 60,000 km"),
    ("7", "60,000 - 70,000 km"),
    ("8", "70,000 - 80,000 km"),
    ("9", "80,000 - 90,000 km"),
    ("10", "90,000 - 1,00,000 km"),
    ("11", "1,00,000 - 1,25,000 km"),
    ("12", "1,25,000 - 1,50,000 km"),
    ("13", "1,50,000+ km"),
];

// Simple single-select fallback; the typeahead is the main location path
const LOCATIONS: [(&str, &str); 10] = [
    ("110001", "New Delhi"),
    ("400001", "Mumbai"),
    ("560001", "Bengaluru"),
    ("600001", "Chennai"),
    ("500001", "Hyderabad"),
    ("411001", "Pune"),
    ("700001", "Kolkata"),
    ("380001", "Ahmedabad"),
    ("302001", "Jaipur"),
    ("360001", "Rajkot"),
];

fn fixed(list: &[(&str, &str)]) -> Vec<StepOption> {
    list.iter()
        .map(|(value, label)| StepOption::new(*value, *label))
        .collect()
}

pub fn ownership_options() -> Vec<StepOption> {
    fixed(&OWNERSHIP)
}

pub fn kilometer_options() -> Vec<StepOption> {
    fixed(&KILOMETER_BUCKETS)
}

pub fn location_options() -> Vec<StepOption> {
    fixed(&LOCATIONS)
}

/// Flatten fuel-type groups into one option per variant
pub fn flatten_variants(groups: &[VariantGroup]) -> Vec<StepOption> {
    groups
        .iter()
        .flat_map(|group| {
            group.variants.iter().map(move |variant| StepOption {
                value: variant.id.clone(),
                label: variant.display_name.clone(),
                sub_label: variant.transmission_type.clone(),
                logo: None,
                fuel_type: Some(group.fuel_type.clone()),
                transmission_type: variant.transmission_type.clone(),
            })
        })
        .collect()
}

/// Identity of a remote option list: the step plus the values it depends on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OptionKey {
    pub step: StepId,
    pub dependencies: Vec<(StepId, String)>,
}

impl OptionKey {
    /// `None` when a prerequisite has no value yet
    pub fn for_step(step: StepId, selections: &Selections) -> Option<Self> {
        let dependencies = step
            .prerequisites()
            .iter()
            .map(|dep| {
                selections
                    .value(*dep)
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| (*dep, v.to_string()))
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self { step, dependencies })
    }

    fn dependency(&self, step: StepId) -> &str {
        self.dependencies
            .iter()
            .find(|(s, _)| *s == step)
            .map_or("", |(_, v)| v.as_str())
    }
}

/// Ticket issued when an option load starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    pub step: StepId,
    seq: u64,
}

/// Outcome of [`OptionProvider::load`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionLoad {
    Fresh(Vec<StepOption>),
    /// A newer load for the same step started while this one was in flight
    Stale,
}

pub struct OptionProvider {
    api: Arc<dyn MarketplaceApi>,
    cache: Mutex<HashMap<OptionKey, Vec<StepOption>>>,
    latest: Mutex<HashMap<StepId, u64>>,
    next_seq: AtomicU64,
}

impl OptionProvider {
    pub fn new(api: Arc<dyn MarketplaceApi>) -> Self {
        Self {
            api,
            cache: Mutex::new(HashMap::new()),
            latest: Mutex::new(HashMap::new()),
            next_seq: AtomicU64::new(1),
        }
    }

    /// Options for `step` given the current selections.
    ///
    /// Missing prerequisites and fetch failures both yield an empty list.
    pub async fn get_options(&self, step: StepId, selections: &Selections) -> Vec<StepOption> {
        match step {
            StepId::Ownership => return ownership_options(),
            StepId::KilometerDriven => return kilometer_options(),
            StepId::Location => return location_options(),
            StepId::Price | StepId::Photos => return Vec::new(),
            StepId::Brand | StepId::Year | StepId::Model | StepId::Variant => {}
        }

        let Some(key) = OptionKey::for_step(step, selections) else {
            debug!("Skipping {} options: prerequisites missing", step);
            return Vec::new();
        };

        if let Some(cached) = self.cached(&key) {
            return cached;
        }

        match self.fetch(&key).await {
            Ok(options) => {
                if !options.is_empty() {
                    if let Ok(mut cache) = self.cache.lock() {
                        cache.insert(key, options.clone());
                    }
                }
                options
            }
            Err(e) => {
                warn!("Failed to load {} options: {}", step, e);
                Vec::new()
            }
        }
    }

    /// Like [`get_options`](Self::get_options) but reports superseded loads as stale
    pub async fn load(&self, step: StepId, selections: &Selections) -> OptionLoad {
        let token = self.begin(step);
        let options = self.get_options(step, selections).await;
        if self.is_latest(&token) {
            OptionLoad::Fresh(options)
        } else {
            debug!("Discarding stale {} options", step);
            OptionLoad::Stale
        }
    }

    /// Issue a new token for `step`, superseding any earlier one
    pub fn begin(&self, step: StepId) -> RequestToken {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut latest) = self.latest.lock() {
            latest.insert(step, seq);
        }
        RequestToken { step, seq }
    }

    pub fn is_latest(&self, token: &RequestToken) -> bool {
        self.latest
            .lock()
            .map(|latest| latest.get(&token.step) == Some(&token.seq))
            .unwrap_or(false)
    }

    fn cached(&self, key: &OptionKey) -> Option<Vec<StepOption>> {
        self.cache.lock().ok()?.get(key).cloned()
    }

    async fn fetch(&self, key: &OptionKey) -> Result<Vec<StepOption>, ApiError> {
        let options = match key.step {
            StepId::Brand => self
                .api
                .brands()
                .await?
                .into_iter()
                .map(|brand| StepOption {
                    logo: brand.logo,
                    ..StepOption::new(brand.id, brand.display_name)
                })
                .collect(),
            StepId::Year => self
                .api
                .years(key.dependency(StepId::Brand))
                .await?
                .iter()
                .map(|year| StepOption::new(year.year(), year.year()))
                .collect(),
            StepId::Model => self
                .api
                .models(key.dependency(StepId::Brand), key.dependency(StepId::Year))
                .await?
                .into_iter()
                .map(|model| StepOption::new(model.id, model.display_name))
                .collect(),
            StepId::Variant => {
                let groups = self
                    .api
                    .variants(key.dependency(StepId::Year), key.dependency(StepId::Model))
                    .await?;
                flatten_variants(&groups)
            }
            _ => Vec::new(),
        };
        debug!("Loaded {} {} option(s)", options.len(), key.step);
        Ok(options)
    }
}
