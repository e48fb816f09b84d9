//! Recognition of verification interstitials.
//!
//! A chat page that blocks automation shows an access-verification notice with a
//! slider ("drag to the far right"). Such text is not an answer the user can use;
//! downstream displays offer to open the real page instead.

/// Markers announcing an access verification page.
pub const VERIFICATION_MARKERS: &[&str] = &["访问验证", "access verification"];

/// Markers of the slider instruction on that page.
pub const DRAG_MARKERS: &[&str] = &["拖动到最右边", "drag to the far right"];

/// Text shown in place of a verification page.
pub const VERIFICATION_PROMPT: &str = "The chat service requires verification before it can be used. \
Open the original page to complete the verification.";

/// True when `text` contains both a verification marker and a drag marker.
pub fn is_verification_challenge(text: &str) -> bool {
    let lower = text.to_lowercase();
    let has = |markers: &[&str]| markers.iter().any(|m| lower.contains(&m.to_lowercase()));
    has(VERIFICATION_MARKERS) && has(DRAG_MARKERS)
}
