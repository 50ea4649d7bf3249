//! Report generation for analysis results
//!
//! Output formatters for batch analysis results:
//!
//! - **JSON**: Machine-readable, full per-analyzer detail
//! - **CSV**: Spreadsheet-compatible, one row per file
//!
//! # Usage
//!
//! ```ignore
//! use wavegrade::report;
//!
//! // Picks format based on extension
//! report::generate("report.json", &results)?;  // JSON
//! report::generate("report.csv", &results)?;   // CSV
//! ```

pub mod csv;
pub mod json;

use std::io;
use std::path::Path;

use crate::analyzer::{FileResult, Quality};

/// Generate a report in the appropriate format based on file extension
pub fn generate<P: AsRef<Path>>(path: P, results: &[FileResult]) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = std::fs::File::create(path)?;

    match ext.as_str() {
        "json" => json::write(&mut file, results),
        _ => csv::write(&mut file, results),
    }
}

/// Quality-tier counts for a batch of results
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub total: usize,
    pub excellent: usize,
    pub good: usize,
    pub acceptable: usize,
    pub poor: usize,
    pub error: usize,
}

impl Summary {
    pub fn from_results(results: &[FileResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };

        for r in results {
            match r.report.as_ref().map(|rep| rep.quality) {
                Some(Quality::Excellent) => summary.excellent += 1,
                Some(Quality::Good) => summary.good += 1,
                Some(Quality::Acceptable) => summary.acceptable += 1,
                Some(Quality::Poor) => summary.poor += 1,
                None => summary.error += 1,
            }
        }

        summary
    }
}
