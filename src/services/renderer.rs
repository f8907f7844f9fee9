use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur while turning HTML into PDF bytes
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Failed to prepare page: {0}")]
    Page(String),

    #[error("Failed to print PDF: {0}")]
    Pdf(String),

    #[error("Failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// Converts a complete HTML document into PDF bytes
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// A launched resource plus the flag its event loop clears when it dies
pub struct Live<T> {
    pub value: Arc<T>,
    pub alive: Arc<AtomicBool>,
}

impl<T> Clone for Live<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            alive: self.alive.clone(),
        }
    }
}

impl<T> Live<T> {
    pub fn new(value: T, alive: Arc<AtomicBool>) -> Self {
        Self {
            value: Arc::new(value),
            alive,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark as dead so the next lookup launches a replacement
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

/// Holds at most one live resource and relaunches it once it has died
///
/// Failed launches are not cached; the next call tries again.
pub struct RelaunchSlot<T> {
    current: Mutex<Option<Live<T>>>,
}

impl<T> Default for RelaunchSlot<T> {
    fn default() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }
}

impl<T> RelaunchSlot<T> {
    pub async fn get_or_launch<F, Fut, E>(&self, launch: F) -> Result<Live<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Live<T>, E>>,
    {
        let mut current = self.current.lock().await;

        if let Some(live) = current.as_ref() {
            if live.is_alive() {
                return Ok(live.clone());
            }
            tracing::warn!("Cached browser is no longer alive, launching a new one");
        }

        // Drop the dead one before launching so its process is reaped first
        *current = None;
        let live = launch().await?;
        *current = Some(live.clone());
        Ok(live)
    }
}

/// Renders through a headless Chromium shared by all requests
///
/// The browser is launched on first use, so a missing binary only fails
/// render requests and never the service startup. A browser whose
/// connection has closed is replaced on the next render.
pub struct ChromiumRenderer {
    chrome_executable: Option<PathBuf>,
    browser: RelaunchSlot<Browser>,
}

impl ChromiumRenderer {
    pub fn new(chrome_executable: Option<PathBuf>) -> Self {
        Self {
            chrome_executable,
            browser: RelaunchSlot::default(),
        }
    }

    async fn launch(&self) -> Result<Live<Browser>, RenderError> {
        tracing::info!("Launching headless browser for PDF rendering");

        let mut builder = BrowserConfig::builder()
            .new_headless_mode()
            .args(vec!["--disable-gpu", "--no-sandbox", "--disable-dev-shm-usage"]);

        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        let config = builder.build().map_err(RenderError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        let alive = Arc::new(AtomicBool::new(true));
        let handler_alive = alive.clone();

        // Drive the CDP connection until the browser goes away
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::warn!("Headless browser event error: {}", e);
                }
            }
            handler_alive.store(false, Ordering::SeqCst);
            tracing::warn!("Headless browser connection closed");
        });

        Ok(Live::new(browser, alive))
    }
}

fn print_params() -> PrintToPdfParams {
    PrintToPdfParams {
        print_background: Some(true),
        prefer_css_page_size: Some(true),
        ..Default::default()
    }
}

#[async_trait]
impl PdfRenderer for ChromiumRenderer {
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let live = self.browser.get_or_launch(|| self.launch()).await?;

        let page = match live.value.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                // A browser that cannot open pages is replaced on the next request
                live.mark_dead();
                return Err(RenderError::Page(e.to_string()));
            }
        };

        let printed = async {
            page.set_content(html)
                .await
                .map_err(|e| RenderError::Page(e.to_string()))?;
            page.pdf(print_params())
                .await
                .map_err(|e| RenderError::Pdf(e.to_string()))
        }
        .await;

        if let Err(e) = page.close().await {
            tracing::warn!("Failed to close render page: {}", e);
        }

        printed
    }
}
