pub mod types;
pub mod commands;
pub mod logging;

use clap::Parser;

/// Run the command-line interface
pub async fn run() {
    let cli = types::Cli::parse();

    // Initialize logging system
    logging::init_logging(cli.debug);

    // Configure backtrace
    logging::configure_backtrace(cli.trace);

    match &cli.command {
        Some(types::Commands::Enhance(args)) => {
            commands::handle_enhance_command(args, &cli).await;
        }
        Some(types::Commands::Toc { page, json }) => {
            commands::handle_toc_command(page, *json, &cli);
        }
        Some(types::Commands::Highlight { page, scroll_y, viewport_height, document_height }) => {
            let metrics = crate::config::ScrollMetrics::new(*scroll_y, *viewport_height, *document_height);
            commands::handle_highlight_command(page, &metrics, &cli);
        }
        Some(types::Commands::Config { key }) => {
            commands::handle_config_command(key.as_deref(), &cli);
        }
        None => {
            // Default to enhance if no command is provided
            commands::handle_enhance_command(&types::EnhanceArgs::default(), &cli).await;
        }
    }
}
