//! `clipset run` – the resumable batch loop.
//!
//! Loads (or cold-builds) the catalog, then repeats: filter the pending set,
//! hand it to the scheduler, report counts, ask the operator whether to
//! continue. The store is persisted unconditionally on the way out, terminal
//! records included.

use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clipset_core::config::{ClipsetConfig, FetchBackend};
use clipset_core::fetch::{Fetcher, HttpFetcher, YtdlpFetcher};
use clipset_core::layout::Layout;
use clipset_core::manifest;
use clipset_core::pipeline::Worker;
use clipset_core::scheduler;
use clipset_core::store::{Catalog, StateCounts};
use clipset_core::trim::FfmpegTrimmer;

pub async fn run_batches(
    cfg: &ClipsetConfig,
    manifest_path: Option<&Path>,
    unavailable_log: Option<&Path>,
    workers: Option<usize>,
    assume_yes: bool,
) -> Result<()> {
    let layout = Layout::new(cfg.raw_root.clone(), cfg.final_root.clone());
    let mut catalog = open_catalog(cfg, manifest_path, unavailable_log, &layout)?;

    let fetcher: Arc<dyn Fetcher> = match cfg.fetch_backend.unwrap_or_default() {
        FetchBackend::Ytdlp => Arc::new(YtdlpFetcher::default()),
        FetchBackend::Http => Arc::new(HttpFetcher),
    };
    let worker = Arc::new(Worker {
        layout,
        fetcher,
        trimmer: Arc::new(FfmpegTrimmer::default()),
        policy: cfg.retry_policy(),
        clip_secs: cfg.clip_secs,
    });
    let width = workers.unwrap_or(cfg.max_workers).max(1);

    loop {
        print_counts("before batch", &catalog.counts());
        let work = catalog.pending_work();
        if work.is_empty() {
            println!("Nothing left to do.");
            break;
        }
        println!("processing {} clip(s) with {} worker(s)", work.len(), width);

        let before_actionable = catalog.counts().actionable();
        let results = scheduler::run_batch(work, Arc::clone(&worker), width).await;
        catalog.apply(results);

        let after = catalog.counts();
        print_counts("after batch", &after);

        if assume_yes {
            if after.actionable() >= before_actionable {
                tracing::warn!("batch made no progress, stopping");
                break;
            }
            continue;
        }
        if !prompt_continue()? {
            break;
        }
    }

    // Losing accumulated status is the one unrecoverable failure here, so
    // persistence errors abort the run loudly.
    catalog
        .persist(&cfg.store_path)
        .with_context(|| format!("persist record store to {}", cfg.store_path.display()))?;
    println!("record store saved to {}", cfg.store_path.display());
    Ok(())
}

/// Persisted store first; otherwise cold-build from the manifest with the
/// known-unavailable exclusion and one filesystem reconciliation pass.
fn open_catalog(
    cfg: &ClipsetConfig,
    manifest_path: Option<&Path>,
    unavailable_log: Option<&Path>,
    layout: &Layout,
) -> Result<Catalog> {
    if let Some(catalog) = Catalog::load(&cfg.store_path)? {
        tracing::info!(records = catalog.len(), "loaded record store");
        return Ok(catalog);
    }

    let manifest_path = manifest_path.ok_or_else(|| {
        anyhow!(
            "no record store at {}; pass --manifest for a first run",
            cfg.store_path.display()
        )
    })?;
    let records = manifest::load_manifest(manifest_path, &cfg.url_prefix)?;

    let excluded = match unavailable_log.or(cfg.unavailable_log.as_deref()) {
        Some(p) if p.exists() => manifest::load_unavailable_ids(p)?,
        _ => HashSet::new(),
    };

    Ok(Catalog::build(records, &excluded, layout))
}

fn print_counts(label: &str, counts: &StateCounts) {
    println!(
        "{}: {} record(s) (pending {}, downloaded-only {}, done {}, unavailable {})",
        label,
        counts.total(),
        counts.pending,
        counts.downloaded_only,
        counts.done,
        counts.unavailable
    );
}

fn prompt_continue() -> Result<bool> {
    print!("continue? [y/n] ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
