use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use roi_web::{ReportView, render_print_page};
use tokio::process::Command;
use tracing::{debug, warn};

use super::{RenderError, ReportRenderer};

const EXECUTABLE_NAMES: &[&str] =
    &["chromium", "chromium-browser", "google-chrome", "google-chrome-stable", "chrome"];

const WELL_KNOWN_PATHS: &[&str] = &[
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/usr/bin/google-chrome",
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
];

/// Upper bound on browser stderr kept in an error.
const MAX_STDERR_LEN: usize = 2048;

/// A Chromium-family executable able to print to PDF headlessly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserExecutable(PathBuf);

impl BrowserExecutable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// An explicit path wins and must exist. Otherwise `PATH` is searched,
    /// then the usual install locations.
    pub fn resolve(explicit: Option<&Path>) -> Option<Self> {
        if let Some(path) = explicit {
            if path.is_file() {
                return Some(Self::new(path));
            }
            warn!(path = %path.display(), "Configured browser executable does not exist");
            return None;
        }

        let from_path = std::env::var_os("PATH").and_then(|paths| {
            std::env::split_paths(&paths)
                .flat_map(|dir| EXECUTABLE_NAMES.iter().map(move |name| dir.join(name)))
                .find(|candidate| candidate.is_file())
        });

        from_path
            .or_else(|| WELL_KNOWN_PATHS.iter().map(PathBuf::from).find(|p| p.is_file()))
            .map(Self)
    }
}

/// Prints the HTML print page to PDF with a headless browser.
pub struct BrowserRenderer {
    executable: Option<BrowserExecutable>,
    timeout: Duration,
    origin: Option<String>,
}

impl BrowserRenderer {
    pub fn new(
        executable: Option<BrowserExecutable>,
        timeout: Duration,
        origin: Option<String>,
    ) -> Self {
        Self { executable, timeout, origin }
    }
}

#[async_trait]
impl ReportRenderer for BrowserRenderer {
    fn name(&self) -> &'static str {
        "browser"
    }

    async fn render(&self, view: &ReportView) -> Result<Vec<u8>, RenderError> {
        let executable = self.executable.as_ref().ok_or(RenderError::BrowserUnavailable)?;
        let html = render_print_page(view, self.origin.as_deref())?;

        let workdir = tempfile::tempdir()?;
        let page_path = workdir.path().join("report.html");
        let pdf_path = workdir.path().join("report.pdf");
        tokio::fs::write(&page_path, html).await?;

        let mut command = Command::new(executable.path());
        command
            .args(["--headless", "--disable-gpu", "--no-sandbox", "--no-pdf-header-footer"])
            .arg(format!("--print-to-pdf={}", pdf_path.display()))
            .arg(format!("file://{}", page_path.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(executable = %executable.path().display(), "Launching headless browser");
        let child = command.spawn()?;

        // Dropping the child on timeout kills the browser.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| RenderError::Timeout(self.timeout))??;

        if !output.status.success() {
            let mut stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            if stderr.len() > MAX_STDERR_LEN {
                let cut = (0..=MAX_STDERR_LEN).rev().find(|i| stderr.is_char_boundary(*i));
                stderr.truncate(cut.unwrap_or(0));
            }
            return Err(RenderError::BrowserFailed {
                status: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        let bytes = match tokio::fs::read(&pdf_path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        if bytes.is_empty() {
            return Err(RenderError::EmptyOutput);
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roi_calculator::{RoiInput, compute};

    fn view() -> ReportView {
        ReportView::new(&compute(RoiInput::default()).report())
    }

    #[test]
    fn explicit_missing_path_resolves_to_none() {
        assert_eq!(BrowserExecutable::resolve(Some(Path::new("/nonexistent/chromium"))), None);
    }

    #[tokio::test]
    async fn render_without_executable_is_unavailable() {
        let renderer = BrowserRenderer::new(None, Duration::from_secs(1), None);
        let err = renderer.render(&view()).await.unwrap_err();
        assert!(matches!(err, RenderError::BrowserUnavailable));
    }

    #[cfg(unix)]
    mod fake_browser {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &Path, body: &str) -> BrowserExecutable {
            let path = dir.join("fake-chromium");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            BrowserExecutable::new(path)
        }

        const WRITE_PDF: &str = r#"for arg in "$@"; do
  case "$arg" in
    --print-to-pdf=*) out="${arg#--print-to-pdf=}" ;;
  esac
done
printf '%%PDF-1.4 fake' > "$out""#;

        #[tokio::test]
        async fn returns_the_printed_file() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(dir.path(), WRITE_PDF);
            let renderer = BrowserRenderer::new(Some(exe), Duration::from_secs(10), None);
            let bytes = renderer.render(&view()).await.unwrap();
            assert!(bytes.starts_with(b"%PDF"));
        }

        #[tokio::test]
        async fn failing_browser_reports_status_and_stderr() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(dir.path(), "echo 'cannot open display' >&2\nexit 3");
            let renderer = BrowserRenderer::new(Some(exe), Duration::from_secs(10), None);
            match renderer.render(&view()).await {
                Err(RenderError::BrowserFailed { status, stderr }) => {
                    assert_eq!(status, 3);
                    assert!(stderr.contains("cannot open display"));
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }

        #[tokio::test]
        async fn silent_browser_is_empty_output() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(dir.path(), "exit 0");
            let renderer = BrowserRenderer::new(Some(exe), Duration::from_secs(10), None);
            assert!(matches!(renderer.render(&view()).await, Err(RenderError::EmptyOutput)));
        }

        #[tokio::test]
        async fn slow_browser_times_out() {
            let dir = tempfile::tempdir().unwrap();
            let exe = script(dir.path(), "sleep 5");
            let renderer = BrowserRenderer::new(Some(exe), Duration::from_millis(200), None);
            assert!(matches!(renderer.render(&view()).await, Err(RenderError::Timeout(_))));
        }
    }
}
