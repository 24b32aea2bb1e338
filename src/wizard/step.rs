// ABOUTME: Step catalog for the sell-car wizard
// Fixed ordered list of steps, their labels and the prerequisite graph used for gating

use serde::{Deserialize, Serialize};

/// Steps in the sell-car wizard, in catalog order.
///
/// Declaration order is significant: the derived `Ord` is the catalog order and
/// drives both presentation and downstream invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepId {
    Brand,
    Year,
    Model,
    Variant,
    Ownership,
    KilometerDriven,
    Location,
    Price,
    Photos,
}

/// Immutable description of one wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    pub id: StepId,
    pub label: &'static str,
    pub description: &'static str,
}

const CATALOG: [StepDefinition; 9] = [
    StepDefinition {
        id: StepId::Brand,
        label: "Brand",
        description: "Which brand is your car?",
    },
    StepDefinition {
        id: StepId::Year,
        label: "Year",
        description: "Select the registration year",
    },
    StepDefinition {
        id: StepId::Model,
        label: "Model",
        description: "Which model do you own?",
    },
    StepDefinition {
        id: StepId::Variant,
        label: "Variant",
        description: "Pick the exact variant",
    },
    StepDefinition {
        id: StepId::Ownership,
        label: "Ownership",
        description: "How many owners has the car had?",
    },
    StepDefinition {
        id: StepId::KilometerDriven,
        label: "Kilometers Driven",
        description: "Approximate odometer reading",
    },
    StepDefinition {
        id: StepId::Location,
        label: "Location",
        description: "Where is the car parked?",
    },
    StepDefinition {
        id: StepId::Price,
        label: "Expected Price",
        description: "How much do you expect for it?",
    },
    StepDefinition {
        id: StepId::Photos,
        label: "Photos",
        description: "Add photos of your car",
    },
];

/// Ordered step definitions
pub fn catalog() -> &'static [StepDefinition] {
    &CATALOG
}

impl StepId {
    /// Get all steps in order
    pub fn all() -> &'static [StepId] {
        &[
            Self::Brand,
            Self::Year,
            Self::Model,
            Self::Variant,
            Self::Ownership,
            Self::KilometerDriven,
            Self::Location,
            Self::Price,
            Self::Photos,
        ]
    }

    pub fn first() -> Self {
        Self::Brand
    }

    pub fn last() -> Self {
        Self::Photos
    }

    /// Zero-based position in the catalog
    pub fn index(self) -> usize {
        match self {
            Self::Brand => 0,
            Self::Year => 1,
            Self::Model => 2,
            Self::Variant => 3,
            Self::Ownership => 4,
            Self::KilometerDriven => 5,
            Self::Location => 6,
            Self::Price => 7,
            Self::Photos => 8,
        }
    }

    /// Get the step number (1-indexed for display)
    pub fn number(self) -> usize {
        self.index() + 1
    }

    /// Get the total number of steps
    pub fn total() -> usize {
        CATALOG.len()
    }

    pub fn definition(self) -> &'static StepDefinition {
        &CATALOG[self.index()]
    }

    pub fn label(self) -> &'static str {
        self.definition().label
    }

    pub fn description(self) -> &'static str {
        self.definition().description
    }

    /// Key used in persisted drafts and on the wire
    pub fn key(self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Year => "year",
            Self::Model => "model",
            Self::Variant => "variant",
            Self::Ownership => "ownership",
            Self::KilometerDriven => "kilometerDriven",
            Self::Location => "location",
            Self::Price => "price",
            Self::Photos => "photos",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|step| step.key() == key)
    }

    /// Get the next step, if any
    pub fn next(self) -> Option<Self> {
        Self::all().get(self.index() + 1).copied()
    }

    /// Get the previous step, if any
    pub fn previous(self) -> Option<Self> {
        self.index()
            .checked_sub(1)
            .and_then(|idx| Self::all().get(idx).copied())
    }

    /// Steps strictly after this one
    pub fn downstream(self) -> &'static [StepId] {
        &Self::all()[self.index() + 1..]
    }

    /// Steps strictly before this one
    pub fn upstream(self) -> &'static [StepId] {
        &Self::all()[..self.index()]
    }

    /// Selections required before options for this step can be fetched
    pub fn prerequisites(self) -> &'static [StepId] {
        match self {
            Self::Year => &[Self::Brand],
            Self::Model => &[Self::Brand, Self::Year],
            Self::Variant => &[Self::Year, Self::Model],
            Self::Brand
            | Self::Ownership
            | Self::KilometerDriven
            | Self::Location
            | Self::Price
            | Self::Photos => &[],
        }
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for StepId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        Self::from_key(normalized)
            .or_else(|| match normalized.to_ascii_lowercase().as_str() {
                "km" | "kms" | "kilometers" | "kilometerdriven" | "kilometer-driven" => {
                    Some(Self::KilometerDriven)
                }
                "owner" | "owners" => Some(Self::Ownership),
                "photo" => Some(Self::Photos),
                _ => None,
            })
            .ok_or_else(|| format!("Unknown step: {s}"))
    }
}

/// Position of a step in the catalog
pub fn index_of(step: StepId) -> usize {
    step.index()
}
