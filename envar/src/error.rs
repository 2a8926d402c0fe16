//! Error types for loading and binding

use std::path::PathBuf;

/// Errors returned from a bind or load call.
///
/// Only the load phase can fail a call. Problems with individual fields
/// (missing variables, values that do not convert) are logged and never
/// surface here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more config files failed to load; no field was bound.
    ///
    /// Every failure is kept, in the order the loaders were started.
    #[error("encountered {} error(s) while loading environment files", .errors.len())]
    Load {
        /// Per-file failures
        errors: Vec<LoadError>,
    },

    /// No directory was given and the working directory could not be resolved.
    #[error("failed to resolve the current directory: {source}")]
    CurrentDir {
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// A failure while loading a single config file.
///
/// Each variant aborts the load of that file only. Loads of other files
/// running at the same time are not affected.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The config file does not exist and missing files are not allowed.
    #[error("config file '{}' not found", .path.display())]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The config file exists but could not be opened.
    #[error("failed to open config file '{}': {source}", .path.display())]
    Open {
        /// Path of the config file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Reading a line failed, including lines that are not valid UTF-8.
    #[error("failed to read config file '{}' at line {line}: {source}", .path.display())]
    Read {
        /// Path of the config file
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The environment refused to store a variable.
    #[error("failed to set environment variable '{key}' from '{}': {source}", .path.display())]
    SetVar {
        /// Path of the config file
        path: PathBuf,
        /// Variable that could not be set
        key: String,
        /// Why the write was refused
        source: SetVarError,
    },

    /// `${NAME}` expansion did not settle within the configured number of passes.
    #[error(
        "expansion of '{key}' in '{}' did not settle after {passes} passes (cyclic reference?)",
        .path.display()
    )]
    CyclicReference {
        /// Path of the config file
        path: PathBuf,
        /// Variable whose value kept changing
        key: String,
        /// Number of passes attempted
        passes: usize,
    },

    /// `${NAME}` expansion grew the value beyond the configured size limit.
    #[error(
        "expansion of '{key}' in '{}' exceeded {limit} bytes (self-referencing value?)",
        .path.display()
    )]
    ExpansionTooLarge {
        /// Path of the config file
        path: PathBuf,
        /// Variable whose value grew too large
        key: String,
        /// Size limit in bytes
        limit: usize,
    },
}

/// Why an [`Environment`](crate::Environment) refused a write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetVarError {
    #[error("variable name is empty")]
    EmptyKey,

    #[error("variable name contains '=' or a NUL character")]
    InvalidKey,

    #[error("value contains a NUL character")]
    InvalidValue,
}

/// A value that could not be converted to its field's type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    /// The value is not a valid literal for the target type.
    #[error("failed to convert '{value}' to {type_name}: {message}")]
    Parse {
        /// Fully qualified name of the target type
        type_name: &'static str,
        /// Offending literal
        value: String,
        /// Message from the underlying parser
        message: String,
    },

    /// The field's type has no built-in conversion.
    #[error("unsupported field type {type_name} for value '{value}'")]
    Unsupported {
        /// Fully qualified name of the field type
        type_name: &'static str,
        /// Value that was to be converted
        value: String,
    },
}

impl ConvertError {
    /// Create a parse error for target type `T`
    pub fn parse<T>(value: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            type_name: std::any::type_name::<T>(),
            value: value.into(),
            message: message.to_string(),
        }
    }

    /// Create an unsupported-type error for field type `T`
    pub fn unsupported<T>(value: impl Into<String>) -> Self {
        Self::Unsupported {
            type_name: std::any::type_name::<T>(),
            value: value.into(),
        }
    }
}
