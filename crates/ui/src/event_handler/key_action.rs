/// Actions that need more than the input buffer to carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Send the current draft
    Submit,
    /// Show or hide sources on the focused (or newest) answer
    ToggleCitations,
    /// Focus the next answer with sources
    FocusNext,
    /// Focus the previous answer with sources
    FocusPrev,
    /// Drop source focus
    ClearFocus,
    PageUp,
    PageDown,
    ScrollToBottom,
    Exit,
}
