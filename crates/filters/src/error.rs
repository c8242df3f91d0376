use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error produced when a single directive line cannot be parsed.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum DirectiveError {
    /// A statoverride line has no space separating mode bits from the path.
    #[error(
        "malformed statoverride directive '{}': expected '<mode-bits> <path>'",
        lossy(.line)
    )]
    MalformedDirective {
        /// The offending line, without its terminator.
        line: Vec<u8>,
    },
    /// The mode-bits prefix of a statoverride line is not a number in range.
    #[error("invalid mode bits in statoverride directive '{}'", lossy(.line))]
    InvalidModeBits {
        /// The offending line, without its terminator.
        line: Vec<u8>,
    },
}

impl DirectiveError {
    /// Returns the raw line that failed to parse.
    #[must_use]
    pub fn line(&self) -> &[u8] {
        match self {
            Self::MalformedDirective { line } | Self::InvalidModeBits { line } => line,
        }
    }
}

/// Error produced while populating a table from a directive source.
///
/// Loading is all-or-nothing: when any variant is returned the destination
/// table has not been modified.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source could not be opened or read.
    #[error("failed to read {}: {source}", origin(.path.as_deref()))]
    Io {
        /// File being read, when the source is a file.
        path: Option<PathBuf>,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// A line of the source failed to parse.
    #[error("{}:{line_number}: {source}", origin(.path.as_deref()))]
    Directive {
        /// File being read, when the source is a file.
        path: Option<PathBuf>,
        /// 1-based line number of the offending directive.
        line_number: usize,
        /// Parse failure for that line.
        source: DirectiveError,
    },
}

impl LoadError {
    /// Returns the file associated with the failure, if known.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } | Self::Directive { path, .. } => path.as_deref(),
        }
    }

    /// Returns the directive parse failure, if this is one.
    #[must_use]
    pub const fn directive(&self) -> Option<&DirectiveError> {
        match self {
            Self::Directive { source, .. } => Some(source),
            Self::Io { .. } => None,
        }
    }

    pub(crate) fn with_path(self, file: &Path) -> Self {
        match self {
            Self::Io { source, .. } => Self::Io {
                path: Some(file.to_path_buf()),
                source,
            },
            Self::Directive {
                line_number,
                source,
                ..
            } => Self::Directive {
                path: Some(file.to_path_buf()),
                line_number,
                source,
            },
        }
    }
}

pub(crate) fn lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

fn origin(path: Option<&Path>) -> Cow<'_, str> {
    match path {
        Some(path) => path.to_string_lossy(),
        None => Cow::Borrowed("<input>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn malformed_directive_message_quotes_line() {
        let error = DirectiveError::MalformedDirective {
            line: b"bad-line-no-space".to_vec(),
        };
        assert!(error.to_string().contains("'bad-line-no-space'"));
        assert_eq!(error.line(), b"bad-line-no-space");
    }

    #[test]
    fn directive_load_error_reports_location_and_source() {
        let error = LoadError::Directive {
            path: None,
            line_number: 3,
            source: DirectiveError::InvalidModeBits {
                line: b"x /a".to_vec(),
            },
        }
        .with_path(Path::new("overrides.txt"));

        assert_eq!(error.path(), Some(Path::new("overrides.txt")));
        assert!(error.to_string().starts_with("overrides.txt:3: "));
        assert!(error.source().is_some());
        assert!(matches!(
            error.directive(),
            Some(DirectiveError::InvalidModeBits { .. })
        ));
    }

    #[test]
    fn io_error_without_path_uses_placeholder() {
        let error = LoadError::Io {
            path: None,
            source: io::Error::other("boom"),
        };
        assert_eq!(error.to_string(), "failed to read <input>: boom");
        assert!(error.directive().is_none());
    }
}
