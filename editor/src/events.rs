//! Editor-wide notifications
//!
//! Fire-and-forget events published through the scene transport; nothing
//! waits on a listener.

/// Notification emitted by editor tooling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// Request to switch interaction back to the default move mode
    MoveMode(bool),
}
