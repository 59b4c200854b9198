//! Error type surfaced by every fallible operation in the codec.

use std::io;
use thiserror::Error;

/// Failure modes of the wire codec, RPC dispatch, and bounded streams.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying reader ran out of bytes before a value finished decoding.
    #[error("short read")]
    ShortRead,
    /// A bounded reader's budget was exhausted before a value finished decoding.
    #[error("read limit reached")]
    ReadLimitReached,
    /// A bounded writer's budget was exhausted before a value finished encoding.
    #[error("write limit reached")]
    WriteLimitReached,
    /// The prefix byte read from the stream is not accepted by the target type.
    #[error("bad format: unexpected prefix byte {0:#04x}")]
    BadFormat(u8),
    /// An explicit container length disagreed with the destination, or was not
    /// a multiple of the element size.
    #[error("invalid container length")]
    InvalidContainerLength,
    /// A string's byte length was not a multiple of its character width.
    #[error("invalid string length")]
    InvalidStringLength,
    /// A structure's wire member count did not match the expected count.
    #[error("invalid member count: expected {expected}, found {found}")]
    InvalidMemberCount {
        /// Number of members the destination type declares.
        expected: usize,
        /// Number of members found on the wire.
        found: usize,
    },
    /// A handle's policy tag did not match the expected policy.
    #[error("unexpected handle type")]
    UnexpectedHandleType,
    /// A variant's index was out of range or otherwise unrecognized.
    #[error("unexpected variant type")]
    UnexpectedVariantType,
    /// A handle index had no corresponding entry in the side channel.
    #[error("invalid handle reference")]
    InvalidHandleReference,
    /// Table duplicate id, bad namespace hash, or other framing violation.
    #[error("protocol error: {0}")]
    ProtocolError(&'static str),
    /// An RPC selector had no bound handler.
    #[error("invalid interface method")]
    InvalidInterfaceMethod,
    /// The underlying stream reported an I/O failure.
    #[error("stream error: {0}")]
    StreamError(#[from] io::Error),
}
