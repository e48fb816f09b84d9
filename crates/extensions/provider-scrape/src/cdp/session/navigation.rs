//! Load detection for CDP page session.

use std::time::{Duration, Instant};

use crate::cdp::error::CdpError;

use super::core::PageSession;

const LOAD_TIMEOUT: Duration = Duration::from_secs(30);
const LOAD_POLL: Duration = Duration::from_millis(100);

impl PageSession {
    /// Wait until `document.readyState` is `complete`.
    pub async fn wait_for_load(&self) -> Result<(), CdpError> {
        let start = Instant::now();

        loop {
            // The first evaluations may race the initial navigation.
            if let Ok(state) = self.evaluate("document.readyState").await {
                if state.as_str() == Some("complete") {
                    return Ok(());
                }
            }

            if start.elapsed() > LOAD_TIMEOUT {
                return Err(CdpError::TimedOut("Page load".to_string()));
            }

            tokio::time::sleep(LOAD_POLL).await;
        }
    }
}
