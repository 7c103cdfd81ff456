use std::io;

/// A machine-readable description of why an operation did not complete.
///
/// Success is the absence of a status: fallible operations return
/// `Result<_, Status>`. [`Status::Failure`] is the only "soft" code, used for
/// conditions like end of input that callers usually absorb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Status {
    /// Non-fatal failure, for example end of input.
    #[error("non-fatal failure")]
    Failure,
    /// No data is available.
    #[error("no data available")]
    NoData,
    /// Insufficient space.
    #[error("insufficient space")]
    NoSpace,
    /// An allocation failed.
    #[error("allocation failed")]
    BadAlloc,
    /// An invalid argument was given.
    #[error("invalid argument")]
    BadArg,
    /// A function was called in an invalid order.
    #[error("invalid call")]
    BadCall,
    /// A prefixed name could not be expanded.
    #[error("invalid or unknown prefixed name")]
    BadCurie,
    /// An invalid source position was used.
    #[error("invalid cursor")]
    BadCursor,
    /// Invalid data was encountered.
    #[error("invalid data")]
    BadData,
    /// An index is out of range.
    #[error("index out of range")]
    BadIndex,
    /// A literal is invalid, for example a malformed language tag.
    #[error("invalid literal")]
    BadLiteral,
    /// A pattern is invalid.
    #[error("invalid pattern")]
    BadPattern,
    /// An error occurred while reading from a stream.
    #[error("error reading from stream")]
    BadRead,
    /// The reader's scratch stack overflowed. Always fatal.
    #[error("stack overflow")]
    BadStack,
    /// A stream is in an invalid state.
    #[error("invalid stream")]
    BadStream,
    /// A document violates the grammar of its syntax.
    #[error("invalid syntax")]
    BadSyntax,
    /// Text is not valid UTF-8.
    #[error("invalid text encoding")]
    BadText,
    /// An error occurred while writing to a stream.
    #[error("error writing to stream")]
    BadWrite,
    /// An unknown error occurred.
    #[error("unknown error")]
    Unknown,
}

impl Status {
    /// True if a lax reader may skip the rest of the line and continue after
    /// hitting this status.
    ///
    /// Resource and stream errors are never recoverable, and
    /// [`Status::BadStack`] is always fatal.
    pub fn is_recoverable(self) -> bool {
        matches!(
            self,
            Self::BadSyntax | Self::BadText | Self::BadCurie | Self::BadLiteral | Self::BadData
        )
    }
}

impl From<Status> for io::Error {
    #[inline]
    fn from(status: Status) -> Self {
        let kind = match status {
            Status::NoData | Status::Failure => io::ErrorKind::UnexpectedEof,
            Status::BadAlloc | Status::BadStack => io::ErrorKind::OutOfMemory,
            Status::BadWrite => io::ErrorKind::WriteZero,
            _ => io::ErrorKind::InvalidData,
        };
        Self::new(kind, status)
    }
}
