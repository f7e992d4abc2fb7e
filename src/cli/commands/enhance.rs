use log::{error, info, LevelFilter};
use std::sync::Arc;

use crate::cli::commands::load_effective_config;
use crate::cli::logging::set_log_level;
use crate::cli::types::{Cli, EnhanceArgs};
use crate::enhancer::{Enhancer, RetryPolicy};
use crate::site;

/// Handle the enhance command
pub async fn handle_enhance_command(args: &EnhanceArgs, cli: &Cli) {
    // Set log level based on command line options
    if args.verbose {
        set_log_level(LevelFilter::Debug);
    } else if args.quiet {
        set_log_level(LevelFilter::Error);
    }

    let config = match load_effective_config(cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return;
        }
    };

    let enhancer = match Enhancer::new(&config) {
        Ok(enhancer) if args.no_wait => enhancer.with_retry_policy(RetryPolicy::immediate()),
        Ok(enhancer) => enhancer,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };
    let enhancer = Arc::new(enhancer);

    if args.watch {
        if let Err(e) = site::watch_site(&config, enhancer).await {
            error!("Error watching site: {}", e);
        }
        return;
    }

    info!("Enhancing book...");
    match site::enhance_site(&config, enhancer).await {
        Ok(report) if report.failed == 0 => {
            info!("Book enhanced successfully at {}", config.destination.display())
        }
        Ok(report) => error!("{} files could not be enhanced", report.failed),
        Err(e) => error!("Failed to enhance book: {}", e),
    }
}
