use thiserror::Error;

/// Numeric error codes reported alongside an [`ErrorType`].
///
/// These are stable: scripts that print a [`Status`] rely on them.
pub mod codes {
    pub const NO_ERROR: u32 = 0x00;
    pub const UNKNOWN: u32 = 0x01;
    pub const ALREADY_INITIALIZED: u32 = 0x02;
    pub const NOT_INITIALIZED: u32 = 0x03;
    pub const NO_AVAILABLE_MEMORY: u32 = 0x04;
    pub const SIZE_IS_ZERO: u32 = 0x09;
    pub const DATA_NOT_FOUND: u32 = 0x0A;
    pub const BUFFER_TOO_SMALL: u32 = 0x0B;
    pub const NO_SECRET_STORED: u32 = 0x0C;
    pub const CIPHER_NOT_READY: u32 = 0x0D;
    pub const ENTRY_ALREADY_STARTED: u32 = 0x0E;
    pub const ENTRY_NOT_STARTED: u32 = 0x0F;
    pub const ENTRY_FULL: u32 = 0x10;
    pub const UNABLE_TO_MEET_REQUIREMENTS: u32 = 0x11;
    pub const EXCEEDS_SUPPORTED_LENGTH: u32 = 0x12;
}

/// Broad classification of a failure.
///
/// `Api` errors are caller misuse and can be corrected by the caller.
/// `System` and `Nt` errors come from the platform and are passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    None = 0,
    Api = 1,
    System = 2,
    Nt = 3,
}

/// All errors that can occur in StrongPass.
#[derive(Debug, Error)]
pub enum StrongPassError {
    // --- Session errors ---
    #[error("A vault session is already open")]
    AlreadyInitialized,

    #[error("No vault session is open")]
    NotInitialized,

    #[error("Vault is full: capacity of {0} secrets reached")]
    CapacityExceeded(usize),

    #[error("Requested size is zero")]
    SizeIsZero,

    // --- Store errors ---
    #[error("Invalid secret name: {0}")]
    InvalidName(String),

    #[error("Secret '{name}' is {size} bytes, the session allows at most {max}")]
    SecretTooLarge { name: String, size: usize, max: usize },

    #[error("No strong password stored under '{0}'")]
    NoSecretStored(String),

    #[error("Nothing stored under '{0}'")]
    DataNotFound(String),

    // --- Cipher errors ---
    #[error("Cipher is not in the right state for this operation")]
    CipherNotReady,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: wrong cipher or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Strong password entry errors ---
    #[error("Strong password entry has already started")]
    EntryAlreadyStarted,

    #[error("Strong password entry has not started")]
    EntryNotStarted,

    #[error("Strong password entry is full ({0} characters)")]
    EntryFull(usize),

    // --- Generation errors ---
    #[error("Invalid recipe: {0}")]
    InvalidRecipe(String),

    #[error("Unable to meet password requirements: {0}")]
    UnmetRequirements(String),

    #[error("Length {length} exceeds the supported maximum of {max}")]
    LengthExceedsSupported { length: usize, max: usize },

    // --- Collaborator errors ---
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Display error: {0}")]
    Display(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    /// A platform failure carried through without interpretation.
    #[error("Platform error {code:#x} ({kind:?})")]
    Platform { kind: ErrorType, code: u32 },
}

impl StrongPassError {
    /// Classify the error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            Self::EncryptionFailed(_)
            | Self::DecryptionFailed
            | Self::KeyDerivationFailed(_)
            | Self::Clipboard(_)
            | Self::Display(_)
            | Self::Io(_) => ErrorType::System,
            Self::Platform { kind, .. } => *kind,
            _ => ErrorType::Api,
        }
    }

    /// The numeric code reported with [`error_type`](Self::error_type).
    pub fn code(&self) -> u32 {
        match self {
            Self::AlreadyInitialized => codes::ALREADY_INITIALIZED,
            Self::NotInitialized => codes::NOT_INITIALIZED,
            Self::CapacityExceeded(_) => codes::NO_AVAILABLE_MEMORY,
            Self::SizeIsZero => codes::SIZE_IS_ZERO,
            Self::SecretTooLarge { .. } => codes::BUFFER_TOO_SMALL,
            Self::NoSecretStored(_) => codes::NO_SECRET_STORED,
            Self::DataNotFound(_) => codes::DATA_NOT_FOUND,
            Self::CipherNotReady => codes::CIPHER_NOT_READY,
            Self::EntryAlreadyStarted => codes::ENTRY_ALREADY_STARTED,
            Self::EntryNotStarted => codes::ENTRY_NOT_STARTED,
            Self::EntryFull(_) => codes::ENTRY_FULL,
            Self::InvalidRecipe(_) | Self::UnmetRequirements(_) => {
                codes::UNABLE_TO_MEET_REQUIREMENTS
            }
            Self::LengthExceedsSupported { .. } => codes::EXCEEDS_SUPPORTED_LENGTH,
            Self::Io(e) => e
                .raw_os_error()
                .and_then(|c| u32::try_from(c).ok())
                .unwrap_or(codes::UNKNOWN),
            Self::Platform { code, .. } => *code,
            _ => codes::UNKNOWN,
        }
    }
}

/// Convenience type alias for StrongPass results.
pub type Result<T> = std::result::Result<T, StrongPassError>;

/// The `(error type, code)` record of an operation's outcome.
///
/// Useful at boundaries that report failures as numbers rather than
/// as Rust errors, e.g. the CLI's final error line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub error_type: ErrorType,
    pub code: u32,
}

impl Status {
    pub const SUCCESS: Status = Status {
        error_type: ErrorType::None,
        code: codes::NO_ERROR,
    };

    pub fn is_success(&self) -> bool {
        self.error_type == ErrorType::None && self.code == codes::NO_ERROR
    }

    /// Build the record for any result.
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::SUCCESS,
            Err(e) => Self::from(e),
        }
    }

    /// Turn the record back into a `Result`, for callers that prefer `?`.
    pub fn into_result(self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(StrongPassError::Platform {
                kind: self.error_type,
                code: self.code,
            })
        }
    }
}

impl From<&StrongPassError> for Status {
    fn from(e: &StrongPassError) -> Self {
        Self {
            error_type: e.error_type(),
            code: e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_carry_their_codes() {
        let e = StrongPassError::AlreadyInitialized;
        assert_eq!(e.error_type(), ErrorType::Api);
        assert_eq!(e.code(), 0x02);

        let e = StrongPassError::NoSecretStored("main".into());
        assert_eq!(e.error_type(), ErrorType::Api);
        assert_eq!(e.code(), 0x0C);
    }

    #[test]
    fn crypto_failures_are_system_errors() {
        assert_eq!(
            StrongPassError::DecryptionFailed.error_type(),
            ErrorType::System
        );
    }

    #[test]
    fn status_of_ok_is_success() {
        let ok: Result<u8> = Ok(1);
        assert!(Status::of(&ok).is_success());
        assert!(Status::SUCCESS.into_result().is_ok());
    }

    #[test]
    fn status_round_trips_through_result() {
        let failed: Result<()> = Err(StrongPassError::SizeIsZero);
        let status = Status::of(&failed);
        assert!(!status.is_success());
        assert_eq!(status.code, codes::SIZE_IS_ZERO);

        let err = status.into_result().unwrap_err();
        assert_eq!(Status::from(&err), status);
    }

    #[test]
    fn io_errors_pass_os_code_through() {
        let e = StrongPassError::Io(std::io::Error::from_raw_os_error(13));
        assert_eq!(e.error_type(), ErrorType::System);
        assert_eq!(e.code(), 13);
    }
}
