//! Reindex progress reporting.
//!
//! Progress is written to stderr so stdout keeps only command results.

use std::io::Write;

/// A single progress event of a full reindex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReindexProgressEvent {
    /// The run is about to start.
    Planned { total: u64, pages: u32 },
    /// Page `page` (zero-based) was submitted and accepted.
    PageSubmitted { page: u32, documents: usize },
    /// Every page was submitted and the marker was written.
    Finished { pages: u32 },
}

/// Receives page-level progress of a full reindex.
pub trait ReindexProgressReporter: Send + Sync {
    fn report(&self, event: ReindexProgressEvent);
}

/// Human-friendly progress on stderr: "reindex  page 2  (100 documents)".
pub struct StderrProgress;

impl ReindexProgressReporter for StderrProgress {
    fn report(&self, event: ReindexProgressEvent) {
        let line = match event {
            ReindexProgressEvent::Planned { total, pages } => {
                format!("reindex  {} products in {} pages\n", total, pages)
            }
            ReindexProgressEvent::PageSubmitted { page, documents } => {
                format!("reindex  page {}  ({} documents)\n", page + 1, documents)
            }
            ReindexProgressEvent::Finished { pages } => {
                format!("reindex  done, {} pages submitted\n", pages)
            }
        };
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl ReindexProgressReporter for NoProgress {
    fn report(&self, _event: ReindexProgressEvent) {}
}
