//! Error taxonomy shared by every structure in the crate.
//!
//! Query operations (`get_by_index`, `find`, ...) are total and report a miss with
//! `None`. Mutating and asserting operations return [`Result`] and fail before any
//! state is touched.

use core::fmt;

/// Result alias used throughout the crate.
pub type Result<T, E = LinkError> = core::result::Result<T, E>;

/// The error type for structure configuration and mutation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// Invalid construction-time configuration (empty key lists, unknown anchor key, ...).
    Config(String),
    /// `add` was called with an id already present in the structure.
    DuplicateId(String),
    /// `remove` referenced an id that is not present in the structure.
    UnknownId(String),
    /// A relative insert or move referenced a target that could not be located.
    TargetNotFound(String),
    /// Capacity overflow, or an invalid maximum size.
    Capacity(String),
    /// An asserted index fell outside `0..size`.
    Bounds {
        /// The offending index.
        index: usize,
        /// The structure size at the time of the check.
        size: usize,
        /// The configured message.
        message: String,
    },
    /// Removal through an asserting path on an empty structure.
    Underflow(String),
    /// `assert_not_empty` on an empty structure.
    Empty(String),
}

/// Fieldless discriminant of [`LinkError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`LinkError::Config`].
    Config,
    /// See [`LinkError::DuplicateId`].
    DuplicateId,
    /// See [`LinkError::UnknownId`].
    UnknownId,
    /// See [`LinkError::TargetNotFound`].
    TargetNotFound,
    /// See [`LinkError::Capacity`].
    Capacity,
    /// See [`LinkError::Bounds`].
    Bounds,
    /// See [`LinkError::Underflow`].
    Underflow,
    /// See [`LinkError::Empty`].
    Empty,
}

impl LinkError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::DuplicateId(_) => ErrorKind::DuplicateId,
            Self::UnknownId(_) => ErrorKind::UnknownId,
            Self::TargetNotFound(_) => ErrorKind::TargetNotFound,
            Self::Capacity(_) => ErrorKind::Capacity,
            Self::Bounds { .. } => ErrorKind::Bounds,
            Self::Underflow(_) => ErrorKind::Underflow,
            Self::Empty(_) => ErrorKind::Empty,
        }
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "invalid configuration: {msg}"),
            Self::DuplicateId(id) => write!(f, "node id `{id}` is already present"),
            Self::UnknownId(id) => write!(f, "node id `{id}` is not present"),
            Self::TargetNotFound(target) => write!(f, "target {target} was not found"),
            Self::Capacity(msg) | Self::Underflow(msg) | Self::Empty(msg) => f.write_str(msg),
            Self::Bounds { index, size, message } => {
                write!(f, "{message} (index {index}, size {size})")
            }
        }
    }
}

impl std::error::Error for LinkError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(LinkError::config("x").kind(), ErrorKind::Config);
        assert_eq!(LinkError::DuplicateId("a".into()).kind(), ErrorKind::DuplicateId);
        let err = LinkError::Bounds { index: 4, size: 2, message: "out of range".into() };
        assert_eq!(err.kind(), ErrorKind::Bounds);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            LinkError::UnknownId("7".into()).to_string(),
            "node id `7` is not present"
        );
        let err = LinkError::Bounds { index: 4, size: 2, message: "out of range".into() };
        assert_eq!(err.to_string(), "out of range (index 4, size 2)");
        assert_eq!(LinkError::Capacity("full".into()).to_string(), "full");
    }
}
