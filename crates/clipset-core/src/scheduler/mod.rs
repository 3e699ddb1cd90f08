//! Batch scheduler: run the fetch-and-process operation over a set of
//! records with a bounded pool of blocking workers.
//!
//! Each task owns its `(slot, record)` pair and hands the mutated record
//! back on completion; the driving thread is the only thing that touches
//! the full collection. Join condition is completion, not success.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::pipeline::Worker;
use crate::record::ClipRecord;

/// Completions between allocator trims.
const RECLAIM_EVERY: usize = 32;

/// Runs the operation once per `(slot, record)` pair, keeping up to
/// `max_workers` in flight. Returns the mutated records with their slots so
/// the caller can write them back; a record whose task panicked is simply
/// absent (its pre-batch state stands).
pub async fn run_batch(
    work: Vec<(usize, ClipRecord)>,
    worker: Arc<Worker>,
    max_workers: usize,
) -> Vec<(usize, ClipRecord)> {
    let total = work.len();
    let max_workers = max_workers.max(1);
    let mut queue: VecDeque<(usize, ClipRecord)> = work.into();
    let mut join_set: JoinSet<(usize, ClipRecord)> = JoinSet::new();
    let mut results = Vec::with_capacity(total);
    let mut completed = 0usize;

    loop {
        while join_set.len() < max_workers {
            let Some((slot, mut rec)) = queue.pop_front() else {
                break;
            };
            let worker = Arc::clone(&worker);
            join_set.spawn_blocking(move || {
                worker.run(&mut rec);
                (slot, rec)
            });
        }

        let Some(res) = join_set.join_next().await else {
            break;
        };
        completed += 1;
        match res {
            Ok(pair) => results.push(pair),
            Err(e) => tracing::warn!("worker task failed: {}", e),
        }
        print_progress(completed, total);
        if completed % RECLAIM_EVERY == 0 {
            reclaim_memory();
        }
    }

    if total > 0 {
        println!();
    }
    results
}

fn print_progress(completed: usize, total: usize) {
    print!("\r  {}/{} clips", completed, total);
    let _ = std::io::stdout().flush();
}

/// Asks the allocator to return freed pages to the OS. Encoders churn large
/// transient buffers; without this, peak RSS creeps up over long batches.
#[cfg(target_os = "linux")]
fn reclaim_memory() {
    unsafe {
        libc::malloc_trim(0);
    }
}

#[cfg(not(target_os = "linux"))]
fn reclaim_memory() {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::fetch::FetchError;
    use crate::layout::Layout;
    use crate::record::{ClipRecord, RecordState};
    use crate::testutil::{fast_policy, CopyTrimmer, FnFetcher};

    fn records(n: u64) -> Vec<(usize, ClipRecord)> {
        (0..n)
            .map(|i| {
                (
                    i as usize,
                    ClipRecord::new(
                        i,
                        format!("vid{}", i),
                        format!("https://example.com/v/vid{}", i),
                        0,
                        "rain",
                        "train",
                    ),
                )
            })
            .collect()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn all_submitted_records_complete() {
        let tmp = tempfile::tempdir().unwrap();
        let worker = Arc::new(Worker {
            layout: Layout::new(tmp.path().join("raw"), tmp.path().join("clips")),
            fetcher: Arc::new(FnFetcher(
                |_url: &str, dest: &std::path::Path| -> Result<(), FetchError> {
                    fs::write(dest, b"raw").unwrap();
                    Ok(())
                },
            )),
            trimmer: Arc::new(CopyTrimmer),
            policy: fast_policy(3),
            clip_secs: 10,
        });

        let results = run_batch(records(5), worker, 2).await;
        assert_eq!(results.len(), 5);
        for (_, rec) in &results {
            assert_eq!(rec.state(), RecordState::Done);
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn mixed_outcomes_are_all_reported() {
        // Record "vid2" is gone at the origin; the rest succeed.
        let tmp = tempfile::tempdir().unwrap();
        let fetches = Arc::new(AtomicU32::new(0));
        let fetches_in = Arc::clone(&fetches);
        let worker = Arc::new(Worker {
            layout: Layout::new(tmp.path().join("raw"), tmp.path().join("clips")),
            fetcher: Arc::new(FnFetcher(move |url: &str, dest: &std::path::Path| {
                fetches_in.fetch_add(1, Ordering::SeqCst);
                if url.ends_with("vid2") {
                    Err(FetchError::Unavailable("video unavailable".into()))
                } else {
                    fs::write(dest, b"raw").unwrap();
                    Ok(())
                }
            })),
            trimmer: Arc::new(CopyTrimmer),
            policy: fast_policy(3),
            clip_secs: 10,
        });

        let results = run_batch(records(3), Arc::clone(&worker), 3).await;
        assert_eq!(results.len(), 3, "completion, not success, is the join condition");

        let mut by_slot: Vec<Option<ClipRecord>> = vec![None, None, None];
        for (slot, rec) in results {
            by_slot[slot] = Some(rec);
        }
        assert_eq!(by_slot[0].as_ref().unwrap().state(), RecordState::Done);
        assert_eq!(by_slot[1].as_ref().unwrap().state(), RecordState::Done);
        let gone = by_slot[2].as_ref().unwrap();
        assert_eq!(gone.state(), RecordState::Unavailable);
        assert!(!worker.layout.raw_path(gone).exists());

        // Two successful single-attempt fetches plus one terminal failure.
        assert_eq!(fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_batch_returns_immediately() {
        let tmp = tempfile::tempdir().unwrap();
        let worker = Arc::new(Worker {
            layout: Layout::new(tmp.path().join("raw"), tmp.path().join("clips")),
            fetcher: Arc::new(FnFetcher(
                |_url: &str, _dest: &std::path::Path| -> Result<(), FetchError> { Ok(()) },
            )),
            trimmer: Arc::new(CopyTrimmer),
            policy: fast_policy(1),
            clip_secs: 10,
        });
        let results = run_batch(Vec::new(), worker, 8).await;
        assert!(results.is_empty());
    }
}
