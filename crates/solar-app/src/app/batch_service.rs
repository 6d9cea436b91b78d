//! Batch Service - analyze every image in a list with a pool of workers

use chrono::{DateTime, Utc};
use log::{debug, warn};
use solar_types::{AnalysisEntry, BatchResults, RejectionEntry};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;

use super::analysis_service::{AnalysisOptions, AnalysisServiceError, SolarAnalyzer};

/// Called once per finished image, from the worker thread that handled it
pub type ProgressCallback<'a> = &'a (dyn Fn(&Path) + Sync);

struct TaskResult {
    image_path: PathBuf,
    finished_at: DateTime<Utc>,
    result: Result<solar_types::Recommendation, AnalysisServiceError>,
}

/// Analyze `images` with `jobs` worker threads.
///
/// Entries and rejections come back sorted by path regardless of which
/// worker finished first.
pub fn analyze_batch(
    analyzer: &SolarAnalyzer,
    images: &[PathBuf],
    options: &AnalysisOptions,
    jobs: usize,
    progress: Option<ProgressCallback<'_>>,
) -> BatchResults {
    let jobs = jobs.clamp(1, images.len().max(1));
    let started_at = Utc::now();

    let results: Mutex<Vec<TaskResult>> = Mutex::new(Vec::with_capacity(images.len()));
    let next_index = AtomicUsize::new(0);

    thread::scope(|scope| {
        for worker_id in 0..jobs {
            let results = &results;
            let next_index = &next_index;

            scope.spawn(move || loop {
                let idx = next_index.fetch_add(1, Ordering::SeqCst);
                let Some(image_path) = images.get(idx) else {
                    break;
                };

                debug!("[W{}] analyzing {}", worker_id, image_path.display());
                let result = analyzer.analyze_file(image_path, options);
                let finished_at = Utc::now();

                results
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(TaskResult {
                        image_path: image_path.clone(),
                        finished_at,
                        result,
                    });

                if let Some(callback) = progress {
                    callback(image_path);
                }
            });
        }
    });

    let completed_at = Utc::now();
    let task_results = results
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner);

    let mut entries = Vec::new();
    let mut rejections = Vec::new();

    for task in task_results {
        let image_path = task.image_path.display().to_string();
        match task.result {
            Ok(recommendation) => entries.push(AnalysisEntry {
                image_path,
                timestamp: task.finished_at,
                recommendation,
            }),
            Err(e) => {
                warn!("{}: {}", image_path, e);
                rejections.push(RejectionEntry {
                    image_path,
                    code: e.code().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    entries.sort_by(|a, b| a.image_path.cmp(&b.image_path));
    rejections.sort_by(|a, b| a.image_path.cmp(&b.image_path));

    BatchResults {
        successful: entries.len(),
        rejected: rejections.len(),
        total_processed: images.len(),
        entries,
        rejections,
        started_at,
        completed_at,
    }
}
