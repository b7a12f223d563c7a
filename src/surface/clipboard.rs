//! System clipboard backed by `arboard`.

use crate::errors::{Result, StrongPassError};

use super::ClipboardSink;

/// The desktop clipboard.  Opening it fails on headless systems.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn open() -> Result<Self> {
        let inner = arboard::Clipboard::new()
            .map_err(|e| StrongPassError::Clipboard(format!("cannot open clipboard: {e}")))?;
        Ok(Self { inner })
    }
}

impl ClipboardSink for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text.to_owned())
            .map_err(|e| StrongPassError::Clipboard(format!("copy failed: {e}")))
    }

    fn clear(&mut self) -> Result<()> {
        self.inner
            .clear()
            .map_err(|e| StrongPassError::Clipboard(format!("clear failed: {e}")))
    }
}
