/// System clipboard access.
use thiserror::Error;

#[derive(Debug, Error)]
#[error("clipboard error: {0}")]
pub struct ClipboardError(pub String);

/// Writes text to a clipboard. Callers only observe success or failure.
pub trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The desktop clipboard via `arboard`. A fresh handle is opened per copy.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        arboard::Clipboard::new()
            .and_then(|mut cb| cb.set_text(text.to_string()))
            .map_err(|err| ClipboardError(err.to_string()))
    }
}
