//! PDF export of the ROI report.
//!
//! Two renderers sit behind [`ReportRenderer`]: [`DocumentRenderer`] lays the
//! report out directly with printpdf, [`BrowserRenderer`] prints the HTML
//! print page through a headless Chromium.

mod browser;
mod document;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use roi_web::ReportView;
use thiserror::Error;
use tracing::{info, warn};

pub use browser::{BrowserExecutable, BrowserRenderer};
pub use document::DocumentRenderer;

use crate::config::{PdfConfig, RendererKind};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no headless browser executable is available")]
    BrowserUnavailable,

    #[error("browser did not finish within {0:?}")]
    Timeout(Duration),

    #[error("browser exited with status {status}: {stderr}")]
    BrowserFailed { status: i32, stderr: String },

    #[error("browser produced no PDF output")]
    EmptyOutput,

    #[error("print page rendering failed: {0}")]
    Template(#[from] askama::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait ReportRenderer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Renders one report as PDF bytes.
    async fn render(&self, view: &ReportView) -> Result<Vec<u8>, RenderError>;
}

/// Builds the renderer selected by `pdf.renderer`. The browser executable is
/// resolved here, once; when none is found every browser render fails with
/// [`RenderError::BrowserUnavailable`].
pub fn build_renderer(pdf: &PdfConfig, base_url: Option<&str>) -> Arc<dyn ReportRenderer> {
    match pdf.renderer {
        RendererKind::Document => {
            info!(renderer = "document", "PDF renderer configured");
            Arc::new(DocumentRenderer::new())
        }
        RendererKind::Browser => {
            let executable = BrowserExecutable::resolve(pdf.browser_path.as_deref());
            match &executable {
                Some(exe) => info!(
                    renderer = "browser",
                    path = %exe.path().display(),
                    "PDF renderer configured"
                ),
                None => warn!(renderer = "browser", "No headless browser found; PDF export will fail"),
            }
            Arc::new(BrowserRenderer::new(executable, pdf.timeout(), base_url.map(str::to_string)))
        }
    }
}
