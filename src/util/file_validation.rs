//! Loading LaTeX sources from disk
//!
//! A file is rejected before it reaches the tokenizer when it:
//! - is missing, unreadable, or a directory
//! - exceeds the size limit
//! - contains NUL bytes or is not valid UTF-8

use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Maximum source size in bytes (16 MB)
pub const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Bytes sniffed for NUL when deciding whether a file is binary
const BINARY_SNIFF_LEN: usize = 8192;

/// Why a source file could not be opened
#[derive(Debug, Clone, PartialEq)]
pub enum FileOpenError {
    NotFound,
    PermissionDenied,
    IsDirectory,
    /// Contains NUL bytes
    BinaryFile,
    /// Readable, but not UTF-8; `valid_up_to` is the byte offset of the first bad sequence
    NotUtf8 { valid_up_to: usize },
    TooLarge { size_mb: f64 },
    IoError(String),
}

impl FileOpenError {
    fn from_io(err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::NotFound => Self::NotFound,
            ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::IoError(err.to_string()),
        }
    }

    /// Message naming the file, for the command line
    pub fn user_message(&self, filename: &str) -> String {
        match self {
            Self::NotFound => format!("File not found: {}", filename),
            Self::PermissionDenied => format!("Permission denied: {}", filename),
            Self::IsDirectory => format!("Cannot open directory: {}", filename),
            Self::BinaryFile => format!("Cannot open binary file: {}", filename),
            Self::NotUtf8 { valid_up_to } => format!(
                "{} is not valid UTF-8 (first bad byte at offset {})",
                filename, valid_up_to
            ),
            Self::TooLarge { size_mb } => format!(
                "{} is too large ({:.1} MB, max {} MB)",
                filename,
                size_mb,
                MAX_FILE_SIZE / (1024 * 1024)
            ),
            Self::IoError(msg) => format!("Error opening {}: {}", filename, msg),
        }
    }
}

impl std::fmt::Display for FileOpenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "file not found"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::IsDirectory => write!(f, "is a directory"),
            Self::BinaryFile => write!(f, "binary file"),
            Self::NotUtf8 { valid_up_to } => {
                write!(f, "invalid UTF-8 at byte {}", valid_up_to)
            }
            Self::TooLarge { size_mb } => write!(f, "file too large ({:.1} MB)", size_mb),
            Self::IoError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FileOpenError {}

/// Check existence, kind and size without reading content
pub fn validate_file_for_opening(path: &Path) -> Result<(), FileOpenError> {
    let metadata = fs::metadata(path).map_err(FileOpenError::from_io)?;

    if metadata.is_dir() {
        return Err(FileOpenError::IsDirectory);
    }

    if metadata.len() > MAX_FILE_SIZE {
        return Err(FileOpenError::TooLarge {
            size_mb: metadata.len() as f64 / (1024.0 * 1024.0),
        });
    }

    Ok(())
}

/// Whether the first few KB of `bytes` contain a NUL
pub fn is_likely_binary(bytes: &[u8]) -> bool {
    bytes[..bytes.len().min(BINARY_SNIFF_LEN)].contains(&0)
}

/// Validate and read a text source
pub fn read_text_file(path: &Path) -> Result<String, FileOpenError> {
    validate_file_for_opening(path)?;

    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|mut file| file.read_to_end(&mut bytes))
        .map_err(FileOpenError::from_io)?;

    if is_likely_binary(&bytes) {
        return Err(FileOpenError::BinaryFile);
    }

    String::from_utf8(bytes).map_err(|e| FileOpenError::NotUtf8 {
        valid_up_to: e.utf8_error().valid_up_to(),
    })
}

/// Get the filename from a path for display in error messages
pub fn filename_for_display(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
