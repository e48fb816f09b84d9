//! BrowserManager: Chrome discovery, launch and connection.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use super::{BrowserError, BrowserOptions};
use crate::cdp::{CdpClient, PageSession};

const LAUNCH_POLL: Duration = Duration::from_millis(200);
const LAUNCH_MAX_ATTEMPTS: u32 = 30;

/// Owns the connection to one Chrome instance.
pub struct BrowserManager {
    options: BrowserOptions,
    client: RwLock<Option<Arc<CdpClient>>>,
    /// Serialises connection attempts so concurrent requests launch Chrome once.
    connecting: Mutex<()>,
    /// Chrome process handle, if we launched it.
    chrome_process: Mutex<Option<Child>>,
}

impl BrowserManager {
    pub fn new(options: BrowserOptions) -> Self {
        Self {
            options,
            client: RwLock::new(None),
            connecting: Mutex::new(()),
            chrome_process: Mutex::new(None),
        }
    }

    pub fn options(&self) -> &BrowserOptions {
        &self.options
    }

    /// Find Chrome executable path.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ];

        #[cfg(target_os = "linux")]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let paths: &[&str] = &[];

        paths.iter().map(|p| PathBuf::from(*p)).find(|p| p.exists())
    }

    async fn is_chrome_running(&self) -> bool {
        reqwest::get(&format!("{}/json/version", self.options.endpoint()))
            .await
            .is_ok()
    }

    async fn launch_chrome(&self) -> Result<Child, BrowserError> {
        let chrome_path = Self::find_chrome().ok_or(BrowserError::ChromeNotFound)?;
        let profile_dir = self.options.get_profile_dir();

        if let Err(e) = std::fs::create_dir_all(&profile_dir) {
            warn!("Failed to create profile directory: {}", e);
        }

        info!("Launching Chrome with profile at: {}", profile_dir.display());

        let mut cmd = Command::new(&chrome_path);
        cmd.arg(format!("--remote-debugging-port={}", self.options.debug_port))
            .arg(format!("--user-data-dir={}", profile_dir.display()))
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        if self.options.headless {
            cmd.arg("--headless=new");
        }

        let child = cmd
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        info!("Chrome launched with PID: {:?}", child.id());
        Ok(child)
    }

    /// Connect to the browser, launching it if necessary.
    pub async fn connect(&self) -> Result<Arc<CdpClient>, BrowserError> {
        if let Some(client) = self.client.read().await.clone() {
            return Ok(client);
        }

        let _guard = self.connecting.lock().await;
        if let Some(client) = self.client.read().await.clone() {
            return Ok(client);
        }

        if !self.is_chrome_running().await {
            info!("Chrome not running on port {}, launching...", self.options.debug_port);

            let child = self.launch_chrome().await?;
            *self.chrome_process.lock().await = Some(child);

            let mut ready = false;
            for _ in 0..LAUNCH_MAX_ATTEMPTS {
                tokio::time::sleep(LAUNCH_POLL).await;
                if self.is_chrome_running().await {
                    ready = true;
                    break;
                }
            }

            if !ready {
                return Err(BrowserError::LaunchFailed(
                    "Chrome failed to start within timeout".to_string(),
                ));
            }
        } else {
            info!("Chrome already running on port {}", self.options.debug_port);
        }

        let client = Arc::new(CdpClient::connect(&self.options.endpoint()).await?);
        *self.client.write().await = Some(client.clone());

        info!("Connected to Chrome at {}", self.options.endpoint());
        Ok(client)
    }

    /// Open `url` in a new page. A `background` page is not focused.
    pub async fn open_page(&self, url: &str, background: bool) -> Result<PageSession, BrowserError> {
        let client = self.connect().await?;
        match client.create_page(url, background).await {
            Ok(session) => Ok(session),
            Err(e) => {
                // A dead connection is dropped so the next request reconnects.
                self.client.write().await.take();
                Err(e.into())
            }
        }
    }

    pub async fn activate_page(&self, target_id: &str) -> Result<(), BrowserError> {
        let client = self.client().await?;
        client.activate_page(target_id).await?;
        Ok(())
    }

    pub async fn close_page(&self, target_id: &str) -> Result<(), BrowserError> {
        let client = self.client().await?;
        client.close_page(target_id).await?;
        Ok(())
    }

    async fn client(&self) -> Result<Arc<CdpClient>, BrowserError> {
        self.client
            .read()
            .await
            .clone()
            .ok_or(BrowserError::NotConnected)
    }

    pub async fn is_connected(&self) -> bool {
        self.client.read().await.is_some()
    }

    /// Drop the browser connection.
    pub async fn close(&self) {
        let _ = self.client.write().await.take();
        info!("Browser connection closed");
    }

    /// Drop the connection and stop Chrome if we launched it.
    pub async fn shutdown_chrome(&self) {
        self.close().await;
        if let Some(mut child) = self.chrome_process.lock().await.take() {
            info!("Shutting down Chrome...");
            if let Err(e) = child.kill().await {
                warn!("Failed to stop Chrome: {}", e);
            }
        }
    }
}
