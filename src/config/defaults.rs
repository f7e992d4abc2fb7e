use std::path::PathBuf;

pub const CONTENT_SELECTOR: &str = ".content";
pub const MAIN_SELECTOR: &str = "main";
pub const SIDEBAR_SELECTOR: &str = ".sidebar";
pub const NAV_WRAPPER_SELECTOR: &str = ".nav-wrapper";

pub const TOC_TITLE: &str = "On this page";
pub const TOC_CONTAINER_CLASS: &str = "page-toc";
pub const TOC_NAV_ID: &str = "toc-nav";
pub const TOC_ITEM_CLASS_PREFIX: &str = "toc-";
pub const TOC_MAX_LEVEL: u8 = 4;

pub const LOOK_AHEAD: f64 = 150.0;
pub const BOTTOM_THRESHOLD: f64 = 50.0;
pub const ACTIVE_CLASS: &str = "active";

pub const LABEL_CLASS: &str = "chapter-name";
pub const ENHANCED_ATTRIBUTE: &str = "data-enhanced";
pub const NEXT_CLASS: &str = "next";

pub const RETRY_DELAYS_MS: [u64; 3] = [100, 500, 1000];
pub const MOUNT_RETRY_MS: u64 = 100;

/// Default source directory (mdBook's output directory)
pub fn default_source() -> PathBuf {
    PathBuf::from("./book")
}

/// Default destination directory
pub fn default_destination() -> PathBuf {
    PathBuf::from("./book-enhanced")
}
