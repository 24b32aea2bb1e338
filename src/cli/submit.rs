// ABOUTME: CLI submit command - create the listing from the saved draft
//
// A listing counts as created only on a 201 response; the draft is removed afterwards.

use super::util::{print_json, CliContext};
use super::SubmitArgs;
use crate::submission::build_listing_request;
use crate::wizard::pricing::normalize_registration;
use anyhow::{anyhow, Context, Result};

pub async fn execute(args: SubmitArgs, ctx: &CliContext) -> Result<()> {
    let store = ctx.store()?;
    let mut draft = store
        .load()?
        .ok_or_else(|| anyhow!("No saved draft. Run 'sellcar sell' first."))?;

    if draft.registration_number.is_none() {
        if let Some(input) = &args.registration {
            draft.registration_number = Some(normalize_registration(input)?);
        }
    }

    let request = build_listing_request(&draft).context("Draft is not ready to submit")?;
    if args.dry_run {
        return print_json(&request);
    }

    let assembler = ctx.assembler(ctx.api()?)?;
    let created = assembler.submit(&draft).await?;

    if ctx.is_json() {
        return print_json(&serde_json::json!({
            "code": created.code,
            "message": created.message,
            "data": created.data,
        }));
    }

    println!(
        "✅ Listing created for {}{}",
        request.registration_number,
        created
            .message
            .map(|m| format!(": {m}"))
            .unwrap_or_default()
    );
    Ok(())
}
