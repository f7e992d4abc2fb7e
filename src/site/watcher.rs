use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};
use notify::{Event, EventKind, RecursiveMode, Result as NotifyResult, Watcher};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::enhancer::Enhancer;
use crate::site::processor::enhance_site;
use crate::utils::error::{BoxResult, PagetocError};
use crate::utils::path::is_within;

const DEBOUNCE_DURATION: Duration = Duration::from_millis(500);

/// Whether a filesystem event should trigger another pass
fn is_relevant(event: &Event, config: &Config) -> bool {
    let kind = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    // Writes into a destination nested under the source must not retrigger
    kind && event.paths.iter().any(|path| !is_within(path, &config.destination))
}

/// Enhance the site, then watch the source directory and enhance again after
/// every burst of changes. Runs until the event channel closes.
pub async fn watch_site(config: &Config, enhancer: Arc<Enhancer>) -> BoxResult<()> {
    info!("Watching source directory: {}", config.source.display());

    let (tx, mut rx) = mpsc::channel::<Event>(256);
    let filter_config = config.clone();
    let mut watcher = notify::recommended_watcher(move |res: NotifyResult<Event>| match res {
        Ok(event) => {
            if is_relevant(&event, &filter_config) {
                if let Err(e) = tx.blocking_send(event) {
                    error!("Error sending file event: {}", e);
                }
            }
        }
        Err(e) => error!("Watch error: {}", e),
    })
    .map_err(|e| PagetocError::Watch(e.to_string()))?;

    watcher
        .watch(&config.source, RecursiveMode::Recursive)
        .map_err(|e| PagetocError::Watch(e.to_string()))?;

    enhance_site(config, Arc::clone(&enhancer)).await?;
    info!("Watching for changes. Press Ctrl+C to stop.");

    while let Some(event) = rx.recv().await {
        debug!("File event: {:?}", event);

        // Let the burst settle, then fold everything queued into one pass
        tokio::time::sleep(DEBOUNCE_DURATION).await;
        while rx.try_recv().is_ok() {}

        info!("Change detected, enhancing again...");
        if let Err(e) = enhance_site(config, Arc::clone(&enhancer)).await {
            error!("Error enhancing site: {}", e);
        }
    }

    Ok(())
}
