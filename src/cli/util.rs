// ABOUTME: Shared CLI plumbing: configuration, API client and draft store wiring
// Plus the small text renderers used by several commands

use super::OutputFormat;
use crate::api::{MarketplaceApi, MarketplaceClient};
use crate::config::AppConfig;
use crate::draft::DraftStore;
use crate::submission::SubmissionAssembler;
use crate::wizard::{LocationSearch, StepOption};
use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;

/// Everything a command needs, resolved once from configuration
pub struct CliContext {
    pub config: AppConfig,
    pub format: OutputFormat,
}

impl CliContext {
    pub fn new(config: AppConfig, format: OutputFormat) -> Self {
        Self { config, format }
    }

    pub fn api(&self) -> Result<Arc<dyn MarketplaceApi>> {
        let client =
            MarketplaceClient::new(&self.config.api).context("Failed to create marketplace client")?;
        Ok(Arc::new(client))
    }

    pub fn store(&self) -> Result<DraftStore> {
        Ok(DraftStore::new(self.config.data_dir()?))
    }

    pub fn assembler(&self, api: Arc<dyn MarketplaceApi>) -> Result<SubmissionAssembler> {
        Ok(SubmissionAssembler::new(api, self.store()?))
    }

    pub fn location_search(&self, api: Arc<dyn MarketplaceApi>) -> LocationSearch {
        LocationSearch::new(api, self.config.location.clone())
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `label (sub label)` for one option
pub fn option_line(option: &StepOption) -> String {
    let mut line = option.label.clone();
    let extra: Vec<&str> = [option.fuel_type.as_deref(), option.sub_label.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !extra.is_empty() {
        line.push_str(&format!(" ({})", extra.join(", ")));
    }
    line
}
