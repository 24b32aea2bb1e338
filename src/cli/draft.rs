// ABOUTME: CLI draft command - show or clear the saved sell-car draft
//
// Reads ~/.sellcar/sellCarDetails.json (or the configured data dir)

use super::util::{print_json, CliContext};
use super::{DraftAction, DraftArgs};
use crate::draft::SellCarDraft;
use crate::wizard::StepId;
use anyhow::Result;

/// Human-readable summary of a draft
pub fn render(draft: &SellCarDraft) -> String {
    let mut lines = vec![format!("Draft {}", draft.draft_id)];
    if let Some(saved_at) = draft.saved_at {
        lines.push(format!("Saved at: {}", saved_at.format("%Y-%m-%d %H:%M:%S UTC")));
    }

    for step in StepId::all() {
        let shown = match (draft.label(*step), draft.value(*step)) {
            (Some(label), Some(value)) if label != value => format!("{label} ({value})"),
            (_, Some(value)) => value.to_string(),
            _ => "-".to_string(),
        };
        lines.push(format!("{:<18} {}", step.label(), shown));
    }

    if let Some(meta) = &draft.variant_meta {
        let details: Vec<&str> = [meta.fuel_type.as_deref(), meta.transmission_type.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        lines.push(format!("{:<18} {}", "Variant details", details.join(", ")));
    }
    if let Some(registration) = &draft.registration_number {
        lines.push(format!("{:<18} {}", "Registration", registration));
    }
    lines.push(format!("{:<18} {}", "Uploaded photos", draft.photo_keys.len()));
    lines.join("\n")
}

pub async fn execute(args: DraftArgs, ctx: &CliContext) -> Result<()> {
    let store = ctx.store()?;

    match args.action {
        DraftAction::Show => match store.load()? {
            Some(draft) if ctx.is_json() => print_json(&draft)?,
            Some(draft) => println!("{}", render(&draft)),
            None if ctx.is_json() => println!("null"),
            None => println!("No saved draft"),
        },
        DraftAction::Clear => {
            if store.clear()? {
                println!("Draft cleared");
            } else {
                println!("No saved draft");
            }
        }
    }
    Ok(())
}
