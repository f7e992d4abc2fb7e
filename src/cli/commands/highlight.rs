use log::error;
use std::path::Path;

use crate::cli::commands::{load_effective_config, load_page};
use crate::cli::types::Cli;
use crate::config::ScrollMetrics;
use crate::dom::DocumentTree;
use crate::enhancer::Enhancer;
use crate::utils::error::BoxResult;

/// Handle the highlight command
pub fn handle_highlight_command(page: &Path, metrics: &ScrollMetrics, cli: &Cli) {
    match active_entry(page, metrics, cli) {
        Ok(Some(id)) => println!("{}", id),
        Ok(None) => println!("(none)"),
        Err(e) => error!("Failed to read {}: {}", page.display(), e),
    }
}

fn active_entry(page: &Path, metrics: &ScrollMetrics, cli: &Cli) -> BoxResult<Option<String>> {
    let config = load_effective_config(cli)?;
    let enhancer = Enhancer::new(&config)?;
    let mut dom = load_page(page)?;

    enhancer.build_toc(&mut dom);
    Ok(enhancer
        .highlight(&mut dom, metrics)
        .and_then(|link| dom.attribute(link, "href"))
        .map(|href| href.trim_start_matches('#').to_string()))
}
