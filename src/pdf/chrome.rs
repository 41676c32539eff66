//! Headless Chrome/Chromium print engine.
//!
//! The browser process is spawned and owned here, on the async side, so the
//! render deadline can always kill it. Printing itself goes through the
//! blocking DevTools client on tokio's blocking pool, connected to that
//! process. The staged HTML document and the throwaway profile directory
//! are removed when `print` returns, whatever the outcome.

use super::{PdfEngine, PrintOptions};
use crate::config::{PageSize, PdfConfig};
use crate::error::AppError;
use async_trait::async_trait;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, Tab};
use reqwest::Url;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStderr, Command};
use tracing::{debug, info, warn};

/// Resolves once the load event has fired, every image has settled, and web
/// fonts are ready: no subresource loads remain in flight.
const NETWORK_IDLE_SCRIPT: &str = r#"
new Promise((resolve) => {
  const settle = () => {
    const images = Array.from(document.images)
      .filter((img) => !img.complete)
      .map((img) => new Promise((done) => { img.onload = done; img.onerror = done; }));
    const fonts = document.fonts ? document.fonts.ready : Promise.resolve();
    Promise.all([fonts, ...images]).then(() => resolve(true));
  };
  if (document.readyState === "complete") {
    settle();
  } else {
    window.addEventListener("load", settle, { once: true });
  }
})
"#;

const DEVTOOLS_BANNER: &str = "DevTools listening on ";
const STAGED_PAGE_PREFIX: &str = "profile-pdf-";

/// Print engine backed by a locally installed Chrome or Chromium.
#[derive(Debug, Clone, Default)]
pub struct ChromeEngine {
    chrome_path: Option<PathBuf>,
    sandbox: bool,
    /// Where staged documents go; the system temp dir when unset.
    staging_dir: Option<PathBuf>,
}

impl ChromeEngine {
    pub fn from_config(config: &PdfConfig) -> Self {
        Self {
            chrome_path: config.chrome_path.clone(),
            sandbox: config.sandbox,
            staging_dir: None,
        }
    }

    fn executable(&self) -> Result<PathBuf, AppError> {
        match &self.chrome_path {
            Some(path) => Ok(path.clone()),
            None => headless_chrome::browser::default_executable()
                .map_err(|e| AppError::Render(format!("no Chrome/Chromium found: {e}"))),
        }
    }

    fn staging_dir(&self) -> PathBuf {
        self.staging_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[async_trait]
impl PdfEngine for ChromeEngine {
    async fn print(&self, html: &str, options: &PrintOptions) -> Result<Vec<u8>, AppError> {
        let page = StagedPage::write(&self.staging_dir(), html)?;
        let page_url = page.url()?;
        let mut browser = BrowserProcess::spawn(&self.executable()?, self.sandbox)?;

        let outcome = tokio::time::timeout(
            options.timeout,
            print_with(&mut browser, page_url, *options),
        )
        .await;
        browser.shutdown().await;

        match outcome {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout {
                stage: "PDF render",
                secs: options.timeout.as_secs(),
            }),
        }
    }
}

async fn print_with(
    browser: &mut BrowserProcess,
    page_url: String,
    options: PrintOptions,
) -> Result<Vec<u8>, AppError> {
    let ws_url = browser.devtools_url().await?;
    tokio::task::spawn_blocking(move || {
        print_over_devtools(&ws_url, &page_url, options.page_size, options.timeout)
    })
    .await
    .map_err(|join_err| AppError::Render(format!("render task failed: {join_err}")))?
}

/// A launched browser plus its private profile directory.
///
/// The child is killed on `shutdown` or, failing that, when dropped.
struct BrowserProcess {
    child: Child,
    stderr: Option<Lines<BufReader<ChildStderr>>>,
    _profile_dir: TempDir,
}

impl BrowserProcess {
    fn spawn(executable: &Path, sandbox: bool) -> Result<Self, AppError> {
        let profile_dir = tempfile::Builder::new()
            .prefix("profile-pdf-chrome-")
            .tempdir()
            .map_err(|e| AppError::Render(format!("failed to create browser profile dir: {e}")))?;

        let mut cmd = Command::new(executable);
        cmd.kill_on_drop(true);
        cmd.args(launch_args(profile_dir.path(), sandbox))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        let mut child = cmd.spawn().map_err(|e| {
            AppError::Render(format!(
                "failed to launch browser {}: {e}",
                executable.display()
            ))
        })?;
        info!(pid = ?child.id(), path = %executable.display(), "launched headless browser");

        let stderr = child
            .stderr
            .take()
            .map(|stderr| BufReader::new(stderr).lines());
        Ok(Self {
            child,
            stderr,
            _profile_dir: profile_dir,
        })
    }

    /// Wait for the browser to announce its DevTools endpoint.
    ///
    /// Remaining stderr output is forwarded to the debug log so the pipe
    /// never fills up.
    async fn devtools_url(&mut self) -> Result<String, AppError> {
        let Some(mut lines) = self.stderr.take() else {
            return Err(AppError::Render("browser stderr is not captured".to_string()));
        };
        let mut last_line = String::new();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if let Some(url) = parse_devtools_line(&line) {
                        let url = url.to_string();
                        tokio::spawn(async move {
                            while let Ok(Some(line)) = lines.next_line().await {
                                debug!(output = %line, "browser stderr");
                            }
                        });
                        return Ok(url);
                    }
                    debug!(output = %line, "browser stderr");
                    last_line = line;
                }
                Ok(None) => {
                    return Err(AppError::Render(format!(
                        "browser exited before opening DevTools: {}",
                        last_line.trim()
                    )))
                }
                Err(e) => {
                    return Err(AppError::Render(format!("failed to read browser output: {e}")))
                }
            }
        }
    }

    async fn shutdown(mut self) {
        let pid = self.child.id();
        match self.child.kill().await {
            Ok(()) => debug!(?pid, "browser stopped"),
            // Already exited and reaped.
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => {}
            Err(e) => warn!(?pid, error = %e, "failed to stop browser"),
        }
    }
}

fn launch_args(profile_dir: &Path, sandbox: bool) -> Vec<String> {
    let mut args = vec![
        "--headless".to_string(),
        "--remote-debugging-port=0".to_string(),
        "--no-first-run".to_string(),
        "--no-default-browser-check".to_string(),
        "--disable-gpu".to_string(),
        "--hide-scrollbars".to_string(),
        "--mute-audio".to_string(),
        format!("--user-data-dir={}", profile_dir.display()),
    ];
    if !sandbox {
        args.push("--no-sandbox".to_string());
    }
    args.push("about:blank".to_string());
    args
}

fn parse_devtools_line(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once(DEVTOOLS_BANNER)?;
    let url = rest.trim();
    url.starts_with("ws://").then_some(url)
}

fn print_over_devtools(
    ws_url: &str,
    page_url: &str,
    page_size: PageSize,
    timeout: Duration,
) -> Result<Vec<u8>, AppError> {
    let browser = Browser::connect(ws_url.to_string())
        .map_err(|e| AppError::Render(format!("failed to connect to browser: {e}")))?;
    let tab = browser
        .new_tab()
        .map_err(|e| AppError::Render(format!("failed to open tab: {e}")))?;
    tab.set_default_timeout(timeout);
    let result = print_page(&tab, page_url, page_size);
    if let Err(e) = tab.close(false) {
        debug!(error = %e, "tab close failed; browser shutdown will reclaim it");
    }
    result
}

fn print_page(tab: &Tab, url: &str, page_size: PageSize) -> Result<Vec<u8>, AppError> {
    tab.navigate_to(url)
        .and_then(|tab| tab.wait_until_navigated())
        .map_err(|e| AppError::Render(format!("failed to load document: {e}")))?;
    tab.evaluate(NETWORK_IDLE_SCRIPT, true)
        .map_err(|e| AppError::Render(format!("failed waiting for network idle: {e}")))?;
    debug!(%page_size, "document settled; printing");

    tab.print_to_pdf(Some(pdf_options(page_size)))
        .map_err(|e| AppError::Render(format!("failed to print PDF: {e}")))
}

fn pdf_options(page_size: PageSize) -> PrintToPdfOptions {
    let (paper_width, paper_height) = page_size.inches();
    PrintToPdfOptions {
        landscape: Some(false),
        display_header_footer: Some(false),
        print_background: Some(true),
        scale: Some(1.0),
        paper_width: Some(paper_width),
        paper_height: Some(paper_height),
        margin_top: Some(0.0),
        margin_bottom: Some(0.0),
        margin_left: Some(0.0),
        margin_right: Some(0.0),
        prefer_css_page_size: Some(false),
        ..Default::default()
    }
}

/// HTML document staged on disk for the browser under a random,
/// exclusively created name; removed on drop.
struct StagedPage {
    file: NamedTempFile,
}

impl StagedPage {
    fn write(dir: &Path, html: &str) -> Result<Self, AppError> {
        let file_error = |source: std::io::Error| AppError::FileWrite {
            path: dir.to_path_buf(),
            source,
        };
        std::fs::create_dir_all(dir).map_err(file_error)?;
        let mut file = tempfile::Builder::new()
            .prefix(STAGED_PAGE_PREFIX)
            .suffix(".html")
            .tempfile_in(dir)
            .map_err(file_error)?;
        file.write_all(html.as_bytes())
            .and_then(|_| file.flush())
            .map_err(file_error)?;
        Ok(Self { file })
    }

    fn path(&self) -> &Path {
        self.file.path()
    }

    fn url(&self) -> Result<String, AppError> {
        Url::from_file_path(self.path())
            .map(|url| url.to_string())
            .map_err(|()| {
                AppError::Render(format!(
                    "cannot address {} as a file URL",
                    self.path().display()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;

    fn staged_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .map(|entries| entries.filter_map(|e| e.ok().map(|e| e.path())).collect())
            .unwrap_or_default()
    }

    #[cfg(unix)]
    fn fake_browser(dir: &TestTempDir, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let script = dir.write_text("fake-chrome.sh", &format!("#!/bin/sh\n{body}\n"));
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    fn options(secs: u64) -> PrintOptions {
        PrintOptions {
            page_size: PageSize::Letter,
            timeout: Duration::from_secs(secs),
        }
    }

    #[test]
    fn letter_options_match_paper_and_print_backgrounds() {
        let options = pdf_options(PageSize::Letter);
        assert_eq!(options.paper_width, Some(8.5));
        assert_eq!(options.paper_height, Some(11.0));
        assert_eq!(options.print_background, Some(true));
        assert_eq!(options.margin_top, Some(0.0));
    }

    #[test]
    fn a4_options_use_metric_paper() {
        let options = pdf_options(PageSize::A4);
        assert_eq!(options.paper_width, Some(8.27));
        assert_eq!(options.paper_height, Some(11.69));
    }

    #[test]
    fn staged_page_is_removed_on_drop() {
        let dir = TestTempDir::new("staged-drop");
        let page = StagedPage::write(dir.path(), "<p>staged</p>").unwrap();
        let path = page.path().to_path_buf();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>staged</p>");
        drop(page);
        assert!(!path.exists());
    }

    #[test]
    fn staged_pages_get_distinct_unpredictable_names() {
        let dir = TestTempDir::new("staged-names");
        let first = StagedPage::write(dir.path(), "a").unwrap();
        let second = StagedPage::write(dir.path(), "b").unwrap();
        assert_ne!(first.path(), second.path());
        let name = first.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(STAGED_PAGE_PREFIX) && name.ends_with(".html"));
    }

    #[cfg(unix)]
    #[test]
    fn staging_never_writes_through_planted_symlinks() {
        let dir = TestTempDir::new("staged-symlink");
        let victim = dir.write_text("victim.txt", "precious");
        let staging = dir.child("staging");
        std::fs::create_dir_all(&staging).unwrap();
        for seq in 0..4 {
            let planted = staging.join(format!("profile-pdf-{}-{seq}.html", std::process::id()));
            std::os::unix::fs::symlink(&victim, planted).unwrap();
        }

        let page = StagedPage::write(&staging, "<h1>profile</h1>").unwrap();

        assert_eq!(std::fs::read_to_string(&victim).unwrap(), "precious");
        assert!(!page.path().is_symlink());
    }

    #[test]
    fn staged_page_url_is_percent_encoded() {
        let dir = TestTempDir::new("staged-url");
        let page = StagedPage::write(&dir.child("with space #1 %"), "<p></p>").unwrap();
        let url = page.url().unwrap();
        assert!(url.starts_with("file:///"), "got: {url}");
        assert!(url.contains("with%20space%20%231%20%25"), "got: {url}");
        assert_eq!(
            Url::parse(&url).unwrap().to_file_path().unwrap(),
            page.path()
        );
    }

    #[test]
    fn devtools_banner_yields_websocket_url() {
        assert_eq!(
            parse_devtools_line("DevTools listening on ws://127.0.0.1:9222/devtools/browser/ab\n"),
            Some("ws://127.0.0.1:9222/devtools/browser/ab")
        );
        assert_eq!(parse_devtools_line("[0101/000000.1:ERROR] gpu"), None);
    }

    #[test]
    fn launch_args_toggle_sandbox_and_isolate_profile() {
        let args = launch_args(Path::new("/tmp/p"), false);
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(args.contains(&"--user-data-dir=/tmp/p".to_string()));
        assert!(args.contains(&"--remote-debugging-port=0".to_string()));
        assert!(!launch_args(Path::new("/tmp/p"), true).contains(&"--no-sandbox".to_string()));
    }

    #[test]
    fn engine_reads_browser_settings_from_config() {
        let config = PdfConfig {
            chrome_path: Some(PathBuf::from("/usr/bin/chromium")),
            sandbox: true,
            ..PdfConfig::default()
        };
        let engine = ChromeEngine::from_config(&config);
        assert_eq!(engine.chrome_path, Some(PathBuf::from("/usr/bin/chromium")));
        assert!(engine.sandbox);
        assert_eq!(engine.staging_dir(), std::env::temp_dir());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn render_deadline_kills_browser_and_removes_staged_page() {
        let dir = TestTempDir::new("chrome-deadline");
        let pid_file = dir.child("browser.pid");
        let script = fake_browser(
            &dir,
            &format!("echo $$ > '{}'\nexec sleep 30", pid_file.display()),
        );
        let engine = ChromeEngine {
            chrome_path: Some(script),
            sandbox: false,
            staging_dir: Some(dir.child("staging")),
        };

        let started = std::time::Instant::now();
        let err = engine.print("<h1>profile</h1>", &options(1)).await.unwrap_err();

        assert!(
            matches!(err, AppError::Timeout { stage: "PDF render", secs: 1 }),
            "got: {err}"
        );
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(staged_files(&dir.child("staging")).is_empty());
        let pid = std::fs::read_to_string(&pid_file).unwrap();
        assert!(
            !Path::new(&format!("/proc/{}", pid.trim())).exists(),
            "browser {} still running",
            pid.trim()
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn browser_exiting_early_is_a_render_error() {
        let dir = TestTempDir::new("chrome-exit");
        let script = fake_browser(&dir, "echo 'cannot open display' >&2\nexit 3");
        let engine = ChromeEngine {
            chrome_path: Some(script),
            sandbox: false,
            staging_dir: Some(dir.child("staging")),
        };

        let err = engine.print("<h1>profile</h1>", &options(5)).await.unwrap_err();

        assert!(matches!(err, AppError::Render(_)), "got: {err}");
        assert!(err.to_string().contains("cannot open display"), "got: {err}");
        assert!(staged_files(&dir.child("staging")).is_empty());
    }

    #[tokio::test]
    async fn missing_browser_binary_is_a_render_error() {
        let dir = TestTempDir::new("chrome-missing");
        let engine = ChromeEngine {
            chrome_path: Some(dir.child("no-such-chrome")),
            sandbox: false,
            staging_dir: Some(dir.child("staging")),
        };
        let err = engine.print("<p></p>", &options(5)).await.unwrap_err();
        assert!(err.to_string().contains("failed to launch browser"), "got: {err}");
        assert!(staged_files(&dir.child("staging")).is_empty());
    }
}
