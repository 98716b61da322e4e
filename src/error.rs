use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the priority queue. None of these can happen while building a
/// tree over the fixed 256-symbol alphabet, so seeing one means the merge loop
/// or the heap itself is broken.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeapError {
    #[error("heap capacity must be greater than zero")]
    ZeroCapacity,

    #[error("heap is full ({capacity} elements)")]
    CapacityExceeded { capacity: usize },

    #[error("cannot extract from an empty heap")]
    EmptyQueue,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("internal heap invariant violated: {0}")]
    Heap(#[from] HeapError),

    #[error("symbol {symbol:#04x} has no code in the table")]
    MissingCode { symbol: u8 },

    #[error("malformed bit stream: token {token:#x} at bit {offset}")]
    MalformedBitStream { offset: usize, token: u32 },

    #[error("bit stream ends inside a code ({trailing_bits} dangling bits)")]
    IncompleteCode { trailing_bits: usize },

    #[error("encoded file truncated while reading {what}")]
    Truncated { what: &'static str },

    #[error("corrupt header: {reason}")]
    CorruptHeader { reason: &'static str },

    #[error("{extra} unexpected bytes after the packed bits")]
    TrailingBytes { extra: usize },

    #[error("unknown framing tag {0}")]
    UnknownFraming(u8),

    #[error("decoded {actual} bytes, header says {expected}")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Heap failures are bugs in this crate, everything else comes from the
    /// data or the environment.
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Heap(_))
    }
}
