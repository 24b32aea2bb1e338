// ABOUTME: CLI options command - list the choices for one wizard step
//
// Dependent steps take their prerequisites from --brand/--year/--model.

use super::util::{option_line, print_json, CliContext};
use super::OptionsArgs;
use crate::wizard::{blocking_message, OptionProvider, Selections, StepId};
use anyhow::Result;

/// Selections implied by the command-line flags
pub fn selections_from_args(args: &OptionsArgs) -> Selections {
    let pairs = [
        (StepId::Brand, args.brand.as_deref()),
        (StepId::Year, args.year.as_deref()),
        (StepId::Model, args.model.as_deref()),
    ];
    Selections::from_values(
        pairs
            .into_iter()
            .filter_map(|(step, value)| value.map(|v| (step, v.to_string()))),
    )
}

pub async fn execute(args: OptionsArgs, ctx: &CliContext) -> Result<()> {
    let selections = selections_from_args(&args);

    if let Some(message) = blocking_message(args.step, &selections) {
        if ctx.is_json() {
            print_json(&serde_json::json!({ "step": args.step, "options": [], "message": message }))?;
        } else {
            println!("{message}");
        }
        return Ok(());
    }

    let provider = OptionProvider::new(ctx.api()?);
    let options = provider.get_options(args.step, &selections).await;

    if ctx.is_json() {
        return print_json(&serde_json::json!({ "step": args.step, "options": options }));
    }

    if options.is_empty() {
        println!("No options available for {}", args.step.label());
        return Ok(());
    }

    println!("{} ({} options)", args.step.label(), options.len());
    for option in &options {
        println!("  {:>8}  {}", option.value, option_line(option));
    }
    Ok(())
}
