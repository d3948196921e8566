use core::fmt;

use thiserror::Error;

/// Kind discriminant plus kind-specific payload for every failure this crate
/// can raise.
///
/// Structural kinds come out of the stream core and the byte utilities and
/// mean the byte/bit stream itself was too short or an operation's
/// precondition was violated. The `Validation*` kinds are raised by format
/// code after a value was successfully read, and record the stream position
/// at the time of the check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A read would consume more bytes than remain in the window.
    #[error("requested {requested} bytes, but only {available} bytes available")]
    EndOfData {
        requested: usize,
        available: usize,
    },

    /// A format's byte order depends on a runtime switch that matched no case.
    #[error("unable to decide on endianness for a type")]
    UndecidedEndianness,

    #[error("at pos {pos}: validation failed: not equal, expected [{expected}], but got [{actual}]")]
    ValidationNotEqual {
        expected: String,
        actual: String,
        pos: usize,
    },

    #[error("at pos {pos}: validation failed: not in range, min [{min}], but got [{actual}]")]
    ValidationLessThan {
        min: String,
        actual: String,
        pos: usize,
    },

    #[error("at pos {pos}: validation failed: not in range, max [{max}], but got [{actual}]")]
    ValidationGreaterThan {
        max: String,
        actual: String,
        pos: usize,
    },

    #[error("at pos {pos}: validation failed: not any of the list, got [{actual}]")]
    ValidationNotAnyOf { actual: String, pos: usize },

    #[error("at pos {pos}: validation failed: not matching the expression, got [{actual}]")]
    ValidationExpr { actual: String, pos: usize },

    /// A bit-level read asked for more bits than fit in an exact integer.
    #[error("the maximum supported bit width is 53 (tried to read {requested} bits)")]
    BitWidthExceeded { requested: u32 },

    /// Byte rotation only operates on 8-bit lanes.
    #[error("unable to rotate a group of {group_size} bytes")]
    UnsupportedGroupSize { group_size: usize },

    #[error("modulo divisor must be positive (was {divisor})")]
    InvalidDivisor { divisor: i64 },

    #[error("end of stream reached, but no terminator {terminator:#04x} found")]
    TerminatorNotFound { terminator: u8 },

    #[error("decompression failed: {reason}")]
    DecompressionFailed { reason: String },

    /// The named-encoding decoder did not recognize the requested label.
    #[error("unknown encoding label `{label}`")]
    UnknownEncoding { label: String },
}

/// A failure raised while pulling data out of a stream or checking a parsed
/// value, optionally labelled with the source path of the format definition
/// that raised it.
///
/// Stream-level operations raise errors without a source path; format code
/// attaches one with [`ParseError::with_src_path`] as the error crosses a
/// type boundary. The validation constructors take the path (and the stream
/// position at the time of the check) up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ErrorKind,
    src_path: Option<String>,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            src_path: None,
        }
    }

    /// Label this error with the source path of the format definition that
    /// raised (or forwarded) it.
    #[must_use]
    pub fn with_src_path(mut self, src_path: impl Into<String>) -> Self {
        self.src_path = Some(src_path.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    #[must_use]
    pub fn src_path(&self) -> Option<&str> {
        self.src_path.as_deref()
    }

    #[must_use]
    pub fn undecided_endianness(src_path: &str) -> Self {
        Self::new(ErrorKind::UndecidedEndianness).with_src_path(src_path)
    }

    #[must_use]
    pub fn validation_not_equal<T: fmt::Display>(
        expected: T,
        actual: T,
        pos: usize,
        src_path: &str,
    ) -> Self {
        Self::new(ErrorKind::ValidationNotEqual {
            expected: expected.to_string(),
            actual: actual.to_string(),
            pos,
        })
        .with_src_path(src_path)
    }

    #[must_use]
    pub fn validation_less_than<T: fmt::Display>(
        min: T,
        actual: T,
        pos: usize,
        src_path: &str,
    ) -> Self {
        Self::new(ErrorKind::ValidationLessThan {
            min: min.to_string(),
            actual: actual.to_string(),
            pos,
        })
        .with_src_path(src_path)
    }

    #[must_use]
    pub fn validation_greater_than<T: fmt::Display>(
        max: T,
        actual: T,
        pos: usize,
        src_path: &str,
    ) -> Self {
        Self::new(ErrorKind::ValidationGreaterThan {
            max: max.to_string(),
            actual: actual.to_string(),
            pos,
        })
        .with_src_path(src_path)
    }

    #[must_use]
    pub fn validation_not_any_of<T: fmt::Display>(actual: T, pos: usize, src_path: &str) -> Self {
        Self::new(ErrorKind::ValidationNotAnyOf {
            actual: actual.to_string(),
            pos,
        })
        .with_src_path(src_path)
    }

    #[must_use]
    pub fn validation_expr<T: fmt::Display>(actual: T, pos: usize, src_path: &str) -> Self {
        Self::new(ErrorKind::ValidationExpr {
            actual: actual.to_string(),
            pos,
        })
        .with_src_path(src_path)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.src_path {
            Some(ref src_path) => write!(f, "{src_path}: {}", self.kind),
            None => self.kind.fmt(f),
        }
    }
}

impl core::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<ErrorKind> for ParseError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}
