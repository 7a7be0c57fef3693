//! Platform-specific key bindings

use crossterm::event::KeyModifiers;

/// Platform-appropriate modifier for form shortcuts
/// - macOS: SUPER (Cmd key)
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const ACTION_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const ACTION_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Submit shortcut display for form help text
/// Ctrl+S works on all platforms
pub const SUBMIT_SHORTCUT: &str = "Ctrl+S";

/// Logout shortcut display
/// - macOS: "Cmd+L"
/// - Linux/Windows: "Ctrl+L"
#[cfg(target_os = "macos")]
pub const LOGOUT_SHORTCUT: &str = "Cmd+L";

#[cfg(not(target_os = "macos"))]
pub const LOGOUT_SHORTCUT: &str = "Ctrl+L";

/// Whether a key event carries the submit or action modifier
pub fn is_action(modifiers: KeyModifiers) -> bool {
    modifiers.contains(KeyModifiers::CONTROL) || modifiers.contains(ACTION_MODIFIER)
}
