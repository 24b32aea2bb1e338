// ABOUTME: CLI locate command - search location suggestions
//
// Runs the same debounced, paginated search the wizard uses.

use super::util::{print_json, CliContext};
use super::LocateArgs;
use crate::wizard::{LocationSearch, SearchPhase};
use anyhow::{bail, Result};

/// Run a search and keep paging until `last_page` or the results run out
pub async fn search_pages(search: &mut LocationSearch, query: &str, last_page: u32) -> Result<()> {
    search.on_input(query);
    search.settle().await;

    while search.page() < last_page && search.fetch_next_page() {
        search.settle().await;
    }

    if let SearchPhase::Error(message) = search.phase() {
        bail!("Location search failed: {message}");
    }
    Ok(())
}

pub async fn execute(args: LocateArgs, ctx: &CliContext) -> Result<()> {
    let min = ctx.config.location.min_query_len;
    if args.query.trim().chars().count() < min {
        bail!("Type at least {min} characters to search");
    }

    let mut search = ctx.location_search(ctx.api()?);
    search_pages(&mut search, &args.query, args.page.max(1)).await?;

    if ctx.is_json() {
        return print_json(search.suggestions());
    }

    if search.suggestions().is_empty() {
        println!("No locations match '{}'", args.query);
        return Ok(());
    }

    for (i, suggestion) in search.suggestions().iter().enumerate() {
        println!("{:>3}. {}", i + 1, suggestion.display());
    }
    if search.has_more() {
        println!("... more results available (use --page {})", search.page() + 1);
    }
    Ok(())
}
