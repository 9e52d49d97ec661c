//! Error types returned by the analyzer and its configuration loader.

use std::path::PathBuf;

// ── Decode errors ──────────────────────────────────────────────────────────

/// The input bytes could not be turned into a colour raster.
///
/// This is always a client-input problem: retrying with the same bytes will
/// fail the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input buffer was empty.
    Empty,
    /// The underlying decoder rejected the bytes.
    Malformed(String),
    /// The decoded raster has zero width or height.
    ZeroSized,
    /// The decoded raster exceeds the configured size limits.
    TooLarge {
        /// Decoded width in pixels.
        width: u32,
        /// Decoded height in pixels.
        height: u32,
    },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty image buffer"),
            Self::Malformed(reason) => write!(f, "cannot decode image: {}", reason),
            Self::ZeroSized => write!(f, "decoded image has zero size"),
            Self::TooLarge { width, height } => {
                write!(f, "image too large: {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

// ── Analysis errors ────────────────────────────────────────────────────────

/// Failure of a full [`crate::Analyzer::analyze`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Input bytes are not a decodable image (client error).
    Decode(DecodeError),
    /// The overlay could not be encoded (internal error).
    Encode(String),
}

impl AnalysisError {
    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "{}", e),
            Self::Encode(reason) => write!(f, "cannot encode overlay: {}", reason),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            Self::Encode(_) => None,
        }
    }
}

impl From<DecodeError> for AnalysisError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ── Config errors ──────────────────────────────────────────────────────────

/// Failure loading an [`crate::AnalyzerConfig`] from disk.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid config JSON.
    Parse {
        /// Path that was being parsed.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config {}: {}", path.display(), source)
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}
