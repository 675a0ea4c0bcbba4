//! Request history.

use babel_api::{HistoryEntry, HistoryQuery};
use colored::Colorize;

use crate::context::Context;
use crate::error::CliResult;
use crate::output::{heading, info};

fn print_entry(entry: &HistoryEntry) {
    println!(
        "  {} {}  {}",
        format!("#{}", entry.id).dimmed(),
        entry.time_requested.cyan(),
        entry.content
    );
}

/// Print one page, or every page from `query.page` on with `all`.
pub async fn run(ctx: &Context, query: HistoryQuery, all: bool) -> CliResult<()> {
    heading("History");

    let mut query = query;
    let mut shown = 0usize;
    loop {
        let page = ctx.client.fetch_history(query).await?;
        page.entries.iter().for_each(print_entry);
        shown += page.entries.len();

        match page.next_query() {
            Some(next) if all && !page.entries.is_empty() => query = next,
            Some(next) => {
                if shown > 0 {
                    info(&format!("More available: --page {}", next.page));
                }
                break;
            }
            None => break,
        }
    }

    if shown == 0 {
        info("No history yet");
    }
    Ok(())
}
