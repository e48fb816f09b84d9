//! Keyboard input for CDP page session.

use serde_json::{Value, json};
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::KeyPhase;

use super::core::PageSession;

impl PageSession {
    /// Press and release Enter on the focused element.
    pub async fn press_enter(&self) -> Result<(), CdpError> {
        for phase in KeyPhase::ENTER_SEQUENCE {
            self.call("Input.dispatchKeyEvent", Some(Self::enter_event(phase)))
                .await?;
        }

        debug!("Pressed Enter in session {}", self.session_id);
        Ok(())
    }

    pub(super) fn enter_event(phase: KeyPhase) -> Value {
        let mut event = json!({
            "type": phase,
            "key": "Enter",
            "code": "Enter",
            "windowsVirtualKeyCode": 13,
            "nativeVirtualKeyCode": 13,
        });
        if phase == KeyPhase::Char {
            event["text"] = json!("\r");
        }
        event
    }
}
