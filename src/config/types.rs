use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::defaults;

/// Selectors describing where the host page keeps its regions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectorConfig {
    /// Content region the TOC container is appended to
    pub content: String,

    /// Region searched for headings
    pub main: String,

    /// Sidebar holding chapter links
    pub sidebar: String,

    /// Wrapper around the previous/next controls
    pub nav_wrapper: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            content: defaults::CONTENT_SELECTOR.to_string(),
            main: defaults::MAIN_SELECTOR.to_string(),
            sidebar: defaults::SIDEBAR_SELECTOR.to_string(),
            nav_wrapper: defaults::NAV_WRAPPER_SELECTOR.to_string(),
        }
    }
}

/// Table of contents markup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TocConfig {
    /// Heading shown above the list
    pub title: String,

    /// Class of the generated container
    pub container_class: String,

    /// Id of the `<nav>` holding the list
    pub nav_id: String,

    /// Prefix for the per-level item class (`toc-h2`)
    pub item_class_prefix: String,

    /// Deepest heading level listed
    pub max_level: u8,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            title: defaults::TOC_TITLE.to_string(),
            container_class: defaults::TOC_CONTAINER_CLASS.to_string(),
            nav_id: defaults::TOC_NAV_ID.to_string(),
            item_class_prefix: defaults::TOC_ITEM_CLASS_PREFIX.to_string(),
            max_level: defaults::TOC_MAX_LEVEL,
        }
    }
}

/// Viewport state at the moment highlighting runs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Vertical scroll offset of the viewport
    pub scroll_y: f64,

    /// Height of the viewport
    pub viewport_height: f64,

    /// Full height of the document body
    pub document_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_y: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            scroll_y,
            viewport_height,
            document_height,
        }
    }
}

/// Scroll-driven highlighting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HighlightConfig {
    /// Added to the scroll offset before comparing heading positions
    pub look_ahead: f64,

    /// Distance from the document bottom that counts as "at the bottom"
    pub bottom_threshold: f64,

    /// Class toggled on the current TOC link
    pub active_class: String,

    /// Metrics for the startup pass when enhancing static snapshots
    pub initial: Option<ScrollMetrics>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            look_ahead: defaults::LOOK_AHEAD,
            bottom_threshold: defaults::BOTTOM_THRESHOLD,
            active_class: defaults::ACTIVE_CLASS.to_string(),
            initial: None,
        }
    }
}

/// Chapter labels on previous/next controls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavigationConfig {
    /// Class of the injected label span
    pub label_class: String,

    /// Attribute marking a control as already processed
    pub enhanced_attribute: String,

    /// Class identifying a forward control
    pub next_class: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            label_class: defaults::LABEL_CLASS.to_string(),
            enhanced_attribute: defaults::ENHANCED_ATTRIBUTE.to_string(),
            next_class: defaults::NEXT_CLASS.to_string(),
        }
    }
}

/// When label injection is attempted, in milliseconds from page start
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    pub delays_ms: Vec<u64>,

    /// Extra attempt after a miss on the navigation wrapper; `null` disables it
    pub mount_retry_ms: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            delays_ms: defaults::RETRY_DELAYS_MS.to_vec(),
            mount_retry_ms: Some(defaults::MOUNT_RETRY_MS),
        }
    }
}

impl RetryConfig {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays_ms.iter().map(|ms| Duration::from_millis(*ms)).collect()
    }

    pub fn mount_retry(&self) -> Option<Duration> {
        self.mount_retry_ms.map(Duration::from_millis)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Directory holding the rendered site
    #[serde(default = "defaults::default_source")]
    pub source: PathBuf,

    /// Directory the enhanced site is written to
    #[serde(default = "defaults::default_destination")]
    pub destination: PathBuf,

    /// Glob patterns (relative to the source) left untouched
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub selectors: SelectorConfig,

    #[serde(default)]
    pub toc: TocConfig,

    #[serde(default)]
    pub highlight: HighlightConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: defaults::default_source(),
            destination: defaults::default_destination(),
            exclude: Vec::new(),
            selectors: SelectorConfig::default(),
            toc: TocConfig::default(),
            highlight: HighlightConfig::default(),
            navigation: NavigationConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}
