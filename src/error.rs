//! Decode error types.

use thiserror::Error;

/// Result type for decode operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error produced while decoding a backend message.
///
/// Every variant is fatal to the single decode call that produced it and
/// nothing more. Connection-lifecycle decisions (drop the session, skip the
/// message, reconnect) belong to the framing layer that owns the socket.
#[derive(Debug, Error)]
pub enum Error {
    /// Payload bytes violate the message type's wire layout: too short,
    /// missing a mandatory trailing NUL, or truncated mid-field.
    #[error("malformed message: {0}")]
    Malformed(String),

    /// A text field that must be UTF-8 was not.
    ///
    /// Only raised where the field's policy makes this fatal; the
    /// `CommandComplete` command tag recovers locally instead (see
    /// [`CommandComplete`](crate::backend::CommandComplete)).
    #[error("text decode failure: {0}")]
    TextDecode(String),

    /// No decoder is registered for the message type byte.
    ///
    /// Whether an unrecognized message is fatal to the session or safely
    /// skippable is the caller's call, so the tag is carried verbatim.
    #[error("unknown backend message type: 0x{0:02x}")]
    UnknownMessageType(u8),
}

impl Error {
    /// Returns true if this is a [`Error::Malformed`] payload error.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::Malformed(_))
    }

    /// Returns true if this is a [`Error::UnknownMessageType`] error.
    pub fn is_unknown_message_type(&self) -> bool {
        matches!(self, Error::UnknownMessageType(_))
    }
}
