//! Batch mode: enhance a rendered book on disk, once or on every change.

pub mod processor;
pub mod watcher;

pub use processor::{enhance_file, enhance_site, PageResult, SiteReport};
pub use watcher::watch_site;
