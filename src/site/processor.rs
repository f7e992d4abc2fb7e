use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob::Pattern;
use log::{debug, error, info};
use serde::Serialize;
use tokio::sync::{Semaphore, SemaphorePermit};
use tokio::task::JoinSet;
use walkdir::WalkDir;

use crate::config::{Config, ScrollMetrics};
use crate::dom::VDom;
use crate::enhancer::{drive, Enhancer, LabelOutcome, PageReport};
use crate::utils::error::{BoxResult, PagetocError};
use crate::utils::fs;
use crate::utils::path::{has_extension, is_within, relative_slash_path};

/// Upper bound on pages read, enhanced and written at the same time
const MAX_CONCURRENT_PAGES: usize = 64;

/// Totals for one run over a site
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SiteReport {
    /// HTML pages enhanced and written
    pub pages: usize,
    /// Pages that received a TOC
    pub tocs: usize,
    /// Navigation controls that received a chapter name
    pub labels: usize,
    /// Files copied unchanged (assets and excluded pages)
    pub copied: usize,
    /// Pages that could not be read, parsed or written
    pub failed: usize,
}

/// Result for a single enhanced page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    pub path: PathBuf,
    pub report: PageReport,
    pub labels: usize,
}

enum Job {
    Enhance { source: PathBuf, destination: PathBuf },
    Copy { source: PathBuf, destination: PathBuf },
}

/// Enhance every HTML page under `config.source` into `config.destination`.
///
/// Non-HTML files and pages matching an `exclude` pattern are copied as they
/// are. A page that fails is logged and counted; the run goes on.
pub async fn enhance_site(config: &Config, enhancer: Arc<Enhancer>) -> BoxResult<SiteReport> {
    validate_directories(config)?;
    let jobs = collect_jobs(config)?;
    info!(
        "Enhancing {} from {} into {}",
        jobs.len(),
        config.source.display(),
        config.destination.display()
    );

    let limiter = Arc::new(Semaphore::new(MAX_CONCURRENT_PAGES));
    let mut tasks = JoinSet::new();
    let mut report = SiteReport::default();

    for job in jobs {
        match job {
            Job::Copy { source, destination } => match fs::copy_file(&source, &destination).await {
                Ok(_) => report.copied += 1,
                Err(e) => {
                    error!("Failed to copy {}: {}", source.display(), e);
                    report.failed += 1;
                }
            },
            Job::Enhance { source, destination } => {
                let enhancer = Arc::clone(&enhancer);
                let limiter = Arc::clone(&limiter);
                let initial = config.highlight.initial;
                tasks.spawn(async move {
                    let result =
                        process_page(&source, &destination, &enhancer, initial.as_ref(), &limiter).await;
                    (source, result)
                });
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(page))) => {
                report.pages += 1;
                report.labels += page.labels;
                if page.report.toc_inserted {
                    report.tocs += 1;
                }
            }
            Ok((source, Err(e))) => {
                error!("Failed to enhance {}: {}", source.display(), e);
                report.failed += 1;
            }
            Err(e) => {
                error!("Page task failed: {}", e);
                report.failed += 1;
            }
        }
    }

    info!(
        "Enhanced {} pages ({} with a TOC, {} navigation labels), copied {} files, {} failures",
        report.pages, report.tocs, report.labels, report.copied, report.failed
    );
    Ok(report)
}

/// Read, enhance and write one page
pub async fn enhance_file(
    source: &Path,
    destination: &Path,
    enhancer: &Enhancer,
    initial: Option<&ScrollMetrics>,
) -> Result<PageResult, PagetocError> {
    process_page(source, destination, enhancer, initial, &Semaphore::new(1)).await
}

/// Page pipeline with `limiter` held only while reading/parsing and while
/// writing; the label schedule in between runs without a permit.
async fn process_page(
    source: &Path,
    destination: &Path,
    enhancer: &Enhancer,
    initial: Option<&ScrollMetrics>,
    limiter: &Semaphore,
) -> Result<PageResult, PagetocError> {
    let mut dom = {
        let _permit = acquire(limiter).await?;
        let html = fs::read_file(source).await?;
        VDom::parse(&html)?
    };

    let report = enhancer.enhance_page(&mut dom, initial);
    let outcomes = drive(enhancer.retry_policy(), || enhancer.label_navigation(&mut dom)).await;
    let labels = outcomes
        .iter()
        .map(|outcome| match outcome {
            LabelOutcome::Processed { labeled, .. } => *labeled,
            LabelOutcome::MountMissing => 0,
        })
        .sum();

    {
        let _permit = acquire(limiter).await?;
        fs::write_file(destination, &dom.to_html()).await?;
    }
    debug!(
        "{}: {} TOC entries, {} labels",
        source.display(),
        report.entries,
        labels
    );

    Ok(PageResult {
        path: destination.to_path_buf(),
        report,
        labels,
    })
}

async fn acquire(limiter: &Semaphore) -> Result<SemaphorePermit<'_>, PagetocError> {
    limiter
        .acquire()
        .await
        .map_err(|e| PagetocError::Generic(format!("Page limiter closed: {}", e)))
}

fn validate_directories(config: &Config) -> BoxResult<()> {
    if !config.source.is_dir() {
        return Err(PagetocError::Config(format!(
            "Source directory does not exist: {}", config.source.display()
        )).into());
    }
    if is_within(&config.source, &config.destination) {
        return Err(PagetocError::Config(format!(
            "Destination {} would overwrite the source {}",
            config.destination.display(),
            config.source.display()
        )).into());
    }
    Ok(())
}

fn compile_excludes(config: &Config) -> Result<Vec<Pattern>, PagetocError> {
    let mut patterns = Vec::with_capacity(config.exclude.len());
    for pattern in &config.exclude {
        let compiled = Pattern::new(pattern).map_err(|e| {
            PagetocError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e))
        })?;
        patterns.push(compiled);
    }
    Ok(patterns)
}

fn collect_jobs(config: &Config) -> BoxResult<Vec<Job>> {
    let excludes = compile_excludes(config)?;
    let mut jobs = Vec::new();

    for entry in WalkDir::new(&config.source)
        .into_iter()
        .filter_entry(|e| !is_within(e.path(), &config.destination))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let source = entry.path().to_path_buf();
        let Some(relative) = relative_slash_path(&source, &config.source) else {
            continue;
        };
        let destination = config.destination.join(&relative);

        let excluded = excludes.iter().any(|pattern| pattern.matches(&relative));
        if excluded {
            debug!("Excluded: {}", relative);
        }
        if has_extension(&source, "html") && !excluded {
            jobs.push(Job::Enhance { source, destination });
        } else {
            jobs.push(Job::Copy { source, destination });
        }
    }

    Ok(jobs)
}
