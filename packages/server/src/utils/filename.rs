use crate::error::AppError;

/// Longest accepted upload filename, in bytes.
pub const MAX_FILENAME_LEN: usize = 200;

/// Why an uploaded filename was rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum FilenameError {
    Empty,
    TooLong,
    /// Contains `/` or `\`.
    ContainsPathSeparator,
    PathTraversal,
    NullByte,
    /// Starts with a dot.
    Hidden,
    ControlCharacter,
}

impl FilenameError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Photo filename cannot be empty",
            Self::TooLong => "Photo filename is too long",
            Self::ContainsPathSeparator => "Invalid photo filename: path separators are not allowed",
            Self::PathTraversal => "Invalid photo filename: '..' is not allowed",
            Self::NullByte => "Invalid photo filename: null bytes are not allowed",
            Self::Hidden => "Invalid photo filename: hidden files are not allowed",
            Self::ControlCharacter => "Invalid photo filename: control characters are not allowed",
        }
    }
}

impl From<FilenameError> for AppError {
    fn from(err: FilenameError) -> Self {
        AppError::Validation(err.message().into())
    }
}

/// Validate a client-supplied filename before it becomes part of an object name.
///
/// Returns the trimmed name.
pub fn validate_flat_filename(filename: &str) -> Result<&str, FilenameError> {
    let trimmed = filename.trim();

    if trimmed.is_empty() {
        return Err(FilenameError::Empty);
    }
    if trimmed.len() > MAX_FILENAME_LEN {
        return Err(FilenameError::TooLong);
    }
    if trimmed.contains('\0') {
        return Err(FilenameError::NullByte);
    }
    // CR/LF would end up in object metadata headers.
    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(FilenameError::ControlCharacter);
    }
    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(FilenameError::ContainsPathSeparator);
    }
    if trimmed == ".." {
        return Err(FilenameError::PathTraversal);
    }
    if trimmed.starts_with('.') {
        return Err(FilenameError::Hidden);
    }

    Ok(trimmed)
}
