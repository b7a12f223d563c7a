//! Collaborator interfaces the core hands secrets to.
//!
//! The core never prints or copies anything itself.  Showing a secret
//! to a human goes through [`SecretDisplay`], and copying a generated
//! password goes through [`ClipboardSink`].  The CLI provides terminal
//! and system-clipboard implementations; tests provide in-memory ones.

pub mod clipboard;

pub use clipboard::SystemClipboard;

use crate::errors::Result;

/// Which buttons a display offers the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowKind {
    Ok,
    OkCancel,
    AbortRetryIgnore,
    YesNoCancel,
    YesNo,
    RetryCancel,
    CancelTryContinue,
}

impl ShowKind {
    /// The response given when the user just dismisses the display.
    pub fn default_response(self) -> ShowResponse {
        match self {
            Self::Ok | Self::OkCancel => ShowResponse::Ok,
            Self::AbortRetryIgnore => ShowResponse::Abort,
            Self::YesNoCancel | Self::YesNo => ShowResponse::Yes,
            Self::RetryCancel => ShowResponse::Retry,
            Self::CancelTryContinue => ShowResponse::Cancel,
        }
    }
}

/// What the user answered.  Numeric codes start at 1; 0 is reserved for
/// "the display failed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowResponse {
    Ok = 1,
    Cancel = 2,
    Abort = 3,
    Retry = 4,
    Ignore = 5,
    Yes = 6,
    No = 7,
}

impl ShowResponse {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Shows a secret to a human and reports their response.
pub trait SecretDisplay {
    fn show(&mut self, text: &str, width: usize, title: &str, kind: ShowKind)
        -> Result<ShowResponse>;
}

/// Receives generated passwords for pasting elsewhere.
pub trait ClipboardSink {
    fn copy(&mut self, text: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}
