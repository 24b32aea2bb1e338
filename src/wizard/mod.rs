// ABOUTME: Sell-car wizard engine
// Step catalog, option loading, selection state, location search and price input

pub mod location;
pub mod options;
pub mod pricing;
pub mod state;
pub mod step;

pub use location::{LocationSearch, SearchEvent, SearchPhase};
pub use options::{OptionKey, OptionLoad, OptionProvider, RequestToken, StepOption};
pub use pricing::PriceError;
pub use state::{
    blocking_message, is_complete, LocationData, LocationPick, PhotoChoice, Selection, Selections,
    SellWizard, StepHeader, StepTransition, VariantMeta, WizardError, PHOTOS_NEED_HELP,
    PHOTOS_UPLOAD_NOW,
};
pub use step::{catalog, index_of, StepDefinition, StepId};
