//! Error types for AMF compilation and reference-config management.
//!
//! This module provides error handling for:
//! - Reference config file parsing (YAML)
//! - Color space, role, display, and look lookup
//! - AMF document parsing and translation (carries a source line number)

use std::path::PathBuf;
use thiserror::Error;

/// Result type for AMF/config operations.
pub type AmfResult<T> = Result<T, AmfError>;

/// Errors that can occur during reference-config loading or AMF compilation.
#[derive(Debug, Error)]
pub enum AmfError {
    /// I/O error reading config or AMF files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error (reference config).
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Config file not found.
    #[error("config file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched.
        path: PathBuf,
    },

    /// Invalid config version.
    #[error("unsupported config version: {version} (supported: 1.x, 2.x)")]
    UnsupportedVersion {
        /// Version string from config.
        version: String,
    },

    /// Color space not found in config.
    #[error("color space not found: {name}")]
    ColorSpaceNotFound {
        /// Name of the missing color space.
        name: String,
    },

    /// Role not defined in config.
    #[error("role not defined: {role}")]
    RoleNotDefined {
        /// Name of the undefined role.
        role: String,
    },

    /// Display not found in config.
    #[error("display not found: {name}")]
    DisplayNotFound {
        /// Name of the missing display.
        name: String,
    },

    /// View not found for display.
    #[error("view '{view}' not found for display '{display}'")]
    ViewNotFound {
        /// Display name.
        display: String,
        /// View name.
        view: String,
    },

    /// Look not found in config.
    #[error("look not found: {name}")]
    LookNotFound {
        /// Name of the missing look.
        name: String,
    },

    /// Invalid transform definition.
    #[error("invalid transform: {reason}")]
    InvalidTransform {
        /// Description of what's wrong.
        reason: String,
    },

    /// Circular reference detected in transforms.
    #[error("circular reference detected: {chain}")]
    CircularReference {
        /// Description of the circular chain.
        chain: String,
    },

    /// Context variable not set.
    #[error("context variable not set: {name}")]
    ContextVariableNotSet {
        /// Name of the missing variable.
        name: String,
    },

    /// LUT loading error.
    #[error("LUT error: {0}")]
    Lut(#[from] amf_lut::LutError),

    /// General validation error.
    #[error("validation error: {0}")]
    Validation(String),

    /// The underlying XML parser rejected the AMF document.
    #[error("line {line}: XML parse error: {reason}")]
    XmlParseError {
        /// One-based line number in the AMF document.
        line: u32,
        /// Underlying parser message.
        reason: String,
    },

    /// An invariant of the XML event router was violated (null element name,
    /// null context, malformed character data).
    #[error("line {line}: internal parse error: {reason}")]
    InternalParseError {
        /// One-based line number in the AMF document.
        line: u32,
        /// What invariant was violated.
        reason: String,
    },

    /// The reference config's version predates 2.3.
    #[error("line {line}: reference config version {major}.{minor} is older than the required 2.3")]
    UnsupportedRefVersion {
        /// One-based line number in the AMF document being compiled.
        line: u32,
        /// Reference config major version.
        major: u32,
        /// Reference config minor version.
        minor: u32,
    },

    /// The reference config lacks the ACES2065-1 color space.
    #[error("line {line}: reference config is missing the ACES2065-1 color space")]
    MissingRefAces {
        /// One-based line number in the AMF document being compiled.
        line: u32,
    },

    /// The input-transform block was present but no input color space
    /// could be assigned.
    #[error("line {line}: inputTransform present but no input color space could be assigned")]
    MissingInputTransform {
        /// One-based line number in the AMF document.
        line: u32,
    },

    /// A referenced LUT file cannot be opened, either absolutely or
    /// relative to the AMF document's directory.
    #[error("line {line}: file transform refers to path that does not exist: {path}")]
    InvalidLutPath {
        /// One-based line number in the AMF document.
        line: u32,
        /// The path that could not be opened.
        path: PathBuf,
    },
}
