//! Operating system integration used by the built-in action handlers.
//!
//! Handlers only see the traits, so tests and headless environments can swap
//! in their own implementations.

use std::sync::Mutex;

use crate::error::{LumenError, LumenResult};

/// Read/write system clipboard
pub trait ClipboardAccess: Send + Sync {
    fn get_text(&self) -> LumenResult<String>;
    fn set_text(&self, content: &str) -> LumenResult<()>;
}

/// Open URLs with the system default handler
pub trait SystemOpen: Send + Sync {
    fn open_url(&self, url: &str) -> LumenResult<()>;
}

/// Cross-platform clipboard using arboard
///
/// The native clipboard is opened on first use, so constructing this never
/// fails on machines without a display server.
#[derive(Default)]
pub struct ArboardClipboard {
    clipboard: Mutex<Option<arboard::Clipboard>>,
}

impl ArboardClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_clipboard<T>(
        &self,
        f: impl FnOnce(&mut arboard::Clipboard) -> Result<T, arboard::Error>,
    ) -> LumenResult<T> {
        let mut guard = self
            .clipboard
            .lock()
            .map_err(|e| LumenError::Clipboard(e.to_string()))?;

        if guard.is_none() {
            *guard =
                Some(arboard::Clipboard::new().map_err(|e| LumenError::Clipboard(e.to_string()))?);
        }

        match guard.as_mut() {
            Some(clipboard) => f(clipboard).map_err(|e| LumenError::Clipboard(e.to_string())),
            None => Err(LumenError::Clipboard("Clipboard unavailable".to_string())),
        }
    }
}

impl ClipboardAccess for ArboardClipboard {
    fn get_text(&self) -> LumenResult<String> {
        self.with_clipboard(|clipboard| clipboard.get_text())
    }

    fn set_text(&self, content: &str) -> LumenResult<()> {
        self.with_clipboard(|clipboard| clipboard.set_text(content))
    }
}

/// Cross-platform URL opening using the `open` crate
pub struct OpenCrateOpener;

impl SystemOpen for OpenCrateOpener {
    fn open_url(&self, url: &str) -> LumenResult<()> {
        open::that(url).map_err(|e| LumenError::Platform(e.to_string()))
    }
}

/// Human-readable platform name, used in log output.
pub fn name() -> &'static str {
    #[cfg(target_os = "linux")]
    {
        "linux"
    }
    #[cfg(target_os = "macos")]
    {
        "macos"
    }
    #[cfg(target_os = "windows")]
    {
        "windows"
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        "unknown"
    }
}
