mod enhance;
mod toc;
mod highlight;
mod config;

pub use enhance::handle_enhance_command;
pub use toc::handle_toc_command;
pub use highlight::handle_highlight_command;
pub use config::handle_config_command;

use std::path::{Path, PathBuf};

use crate::cli::types::Cli;
use crate::config::{load_config, Config};
use crate::dom::VDom;
use crate::utils::error::BoxResult;

/// Load configuration from the source directory (or explicit files) and
/// apply the global command line overrides
fn load_effective_config(cli: &Cli) -> BoxResult<Config> {
    let config_dir = cli.source.clone().unwrap_or_else(|| PathBuf::from("."));
    let files = if cli.config.is_empty() {
        None
    } else {
        Some(cli.config.clone())
    };

    let mut config = load_config(config_dir, files)?;
    // Command line options take precedence over configuration files
    if let Some(source) = &cli.source {
        config.source = source.clone();
    }
    if let Some(destination) = &cli.destination {
        config.destination = destination.clone();
    }
    Ok(config)
}

/// Read and parse a single page
fn load_page(page: &Path) -> BoxResult<VDom> {
    let html = std::fs::read_to_string(page)?;
    Ok(VDom::parse(&html)?)
}
