use log::{error, warn};
use serde::Serialize;
use std::path::Path;

use crate::cli::commands::{load_effective_config, load_page};
use crate::cli::types::Cli;
use crate::enhancer::Enhancer;
use crate::utils::error::BoxResult;

#[derive(Debug, Serialize)]
struct EntryView {
    level: u8,
    id: String,
    text: String,
}

/// Handle the toc command
pub fn handle_toc_command(page: &Path, json: bool, cli: &Cli) {
    match page_entries(page, cli) {
        Ok(Some(entries)) => {
            if json {
                match serde_json::to_string_pretty(&entries) {
                    Ok(out) => println!("{}", out),
                    Err(e) => error!("Failed to serialize entries: {}", e),
                }
            } else {
                for entry in &entries {
                    let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
                    println!("{}{} (#{})", indent, entry.text, entry.id);
                }
            }
        }
        Ok(None) => warn!("{} has no content region, no table of contents", page.display()),
        Err(e) => error!("Failed to read {}: {}", page.display(), e),
    }
}

fn page_entries(page: &Path, cli: &Cli) -> BoxResult<Option<Vec<EntryView>>> {
    let config = load_effective_config(cli)?;
    let enhancer = Enhancer::new(&config)?;
    let mut dom = load_page(page)?;

    Ok(enhancer.build_toc(&mut dom).map(|outcome| {
        outcome
            .entries
            .into_iter()
            .map(|entry| EntryView {
                level: entry.level,
                id: entry.id,
                text: entry.text,
            })
            .collect()
    }))
}
