//! deskprobe window tracking
//!
//! [`WindowManager`] remembers the active window of one automation session
//! and only moves away from it when the window disappears.
//! [`MultiRemoteWindowManager`] keeps one independent manager per named
//! application instance.

pub mod manager;
pub mod multiremote;

pub use manager::{WindowEnumerator, WindowHandle, WindowInfo, WindowManager};
pub use multiremote::MultiRemoteWindowManager;
