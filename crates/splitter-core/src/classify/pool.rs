//! Fixed-size worker pool for page classification.

use std::sync::mpsc;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::{Result, SplitterError};
use crate::models::ClassificationResult;
use crate::raster::PageImage;

/// Classifies pages concurrently; results come back in page order.
pub struct ClassificationPool {
    pool: ThreadPool,
    workers: usize,
}

impl ClassificationPool {
    /// Start a pool with `workers` threads (at least one).
    pub fn new(workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("classify-{}", i))
            .build()
            .map_err(|e| {
                SplitterError::Config(format!("failed to start classification workers: {}", e))
            })?;

        debug!("Classification pool started with {} workers", workers);
        Ok(Self { pool, workers })
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `classify` on every page and collect the results by page index.
    ///
    /// Workers finish in any order; the returned vector is always sorted by
    /// `page_index`. The first error reported by a worker is returned once
    /// all in-flight pages have finished.
    pub fn classify_pages<F, E>(
        &self,
        pages: &[PageImage],
        classify: F,
    ) -> std::result::Result<Vec<ClassificationResult>, E>
    where
        F: Fn(&PageImage) -> std::result::Result<Option<String>, E> + Sync,
        E: Send,
    {
        let (tx, rx) = mpsc::channel();

        self.pool.scope(|scope| {
            for page in pages {
                let tx = tx.clone();
                let classify = &classify;
                scope.spawn(move |_| {
                    let outcome =
                        classify(page).map(|template| ClassificationResult::new(page.index, template));
                    // The receiver outlives the scope.
                    let _ = tx.send(outcome);
                });
            }
        });
        drop(tx);

        let results = rx.into_iter().collect::<std::result::Result<Vec<_>, E>>()?;
        Ok(into_page_order(results))
    }
}

fn into_page_order(mut results: Vec<ClassificationResult>) -> Vec<ClassificationResult> {
    results.sort_by_key(|r| r.page_index);
    results
}
