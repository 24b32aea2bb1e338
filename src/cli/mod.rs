// ABOUTME: CLI argument parsing and command routing for sellcar
//
// Provides command-line interface for:
// - Running the sell-car wizard interactively (sell, default)
// - Inspecting step options and location suggestions (options, locate)
// - Managing the saved draft (draft show|clear)
// - Creating the listing from the saved draft (submit)

pub mod draft;
pub mod locate;
pub mod options;
pub mod sell;
pub mod submit;
pub mod util;

use crate::wizard::StepId;
use clap::{Parser, Subcommand, ValueEnum};

/// Sell your car on the marketplace from the terminal
#[derive(Parser)]
#[command(name = "sellcar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Walk through the sell-car wizard (default if no command given)
    Sell(SellArgs),

    /// List the options for one step
    Options(OptionsArgs),

    /// Search locations by area, city or pincode
    Locate(LocateArgs),

    /// Inspect or discard the saved draft
    Draft(DraftArgs),

    /// Create the listing from the saved draft
    Submit(SubmitArgs),
}

/// Arguments for the sell command
#[derive(clap::Args, Default)]
pub struct SellArgs {
    /// Delete any saved draft and start from the first step
    #[arg(long)]
    pub fresh: bool,
}

/// Arguments for the options command
#[derive(clap::Args)]
pub struct OptionsArgs {
    /// Step to list (brand, year, model, variant, ownership, km, location)
    pub step: StepId,

    /// Brand id
    #[arg(long)]
    pub brand: Option<String>,

    /// Manufacturing year
    #[arg(long)]
    pub year: Option<String>,

    /// Model id
    #[arg(long)]
    pub model: Option<String>,
}

/// Arguments for the locate command
#[derive(clap::Args)]
pub struct LocateArgs {
    /// Area, city or pincode (at least 3 characters)
    pub query: String,

    /// Load suggestions up to this page
    #[arg(long, default_value = "1")]
    pub page: u32,
}

/// Arguments for the draft command
#[derive(clap::Args)]
pub struct DraftArgs {
    #[command(subcommand)]
    pub action: DraftAction,
}

#[derive(Subcommand)]
pub enum DraftAction {
    /// Print the saved draft
    Show,
    /// Delete the saved draft
    Clear,
}

/// Arguments for the submit command
#[derive(clap::Args)]
pub struct SubmitArgs {
    /// Registration number to use if the draft has none
    #[arg(long)]
    pub registration: Option<String>,

    /// Print the request without sending it
    #[arg(long)]
    pub dry_run: bool,
}
