//! HTML report rendering and persistence

pub mod html;

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::config::DEFAULT_REPORTS_DIR;
use crate::core::error::Result;
use crate::core::quote::FetchResult;

/// Builds the default report file name, e.g. `forex_report_20240301_093015.html`.
pub fn report_filename(now: DateTime<Local>) -> String {
    format!("forex_report_{}.html", now.format("%Y%m%d_%H%M%S"))
}

#[derive(Debug, Clone)]
pub struct ReportRenderer {
    reports_dir: PathBuf,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        ReportRenderer::new(DEFAULT_REPORTS_DIR)
    }
}

impl ReportRenderer {
    pub fn new<P: AsRef<Path>>(reports_dir: P) -> Self {
        ReportRenderer {
            reports_dir: reports_dir.as_ref().to_path_buf(),
        }
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Renders with the current wall clock as the "generated" time.
    pub fn render(&self, result: &FetchResult) -> String {
        self.render_at(result, Local::now())
    }

    pub fn render_at(&self, result: &FetchResult, generated_at: DateTime<Local>) -> String {
        html::render_document(result, generated_at)
    }

    /// Writes `html` into the reports directory, creating it if needed.
    ///
    /// Without a file name, one is generated from the current time. An existing
    /// file with the same name is overwritten.
    pub fn persist(&self, html: &str, filename: Option<&str>) -> Result<PathBuf> {
        fs::create_dir_all(&self.reports_dir)?;

        let filename = filename.map_or_else(|| report_filename(Local::now()), str::to_string);
        let report_path = self.reports_dir.join(filename);
        debug!("Writing report to {}", report_path.display());

        fs::write(&report_path, html)?;
        info!(path = %report_path.display(), bytes = html.len(), "Report saved");
        Ok(report_path)
    }
}
