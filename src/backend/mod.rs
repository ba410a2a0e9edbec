//! Backend (server → client) messages.
//!
//! Each message type decodes from a payload slice whose length was already
//! determined by the framing layer's length prefix; decoders never see the
//! tag byte or the outer length field.

use crate::error::Result;
use crate::registry::Registry;

pub mod auth;
pub mod extended;
pub mod notice;
pub mod query;
pub mod session;

pub use auth::Authentication;
pub use extended::ParameterDescription;
pub use notice::{ErrorResponse, NoticeFields, NoticeResponse};
pub use query::{Column, CommandComplete, DataRow, RowDescription, TagDiagnostic};
pub use session::{BackendKeyData, LoadBalanceResponse, ParameterStatus, ReadyForQuery};

/// Backend message type bytes.
pub mod msg_type {
    /// Authentication request/result
    pub const AUTHENTICATION: u8 = b'R';
    /// BackendKeyData
    pub const BACKEND_KEY_DATA: u8 = b'K';
    /// ParameterStatus
    pub const PARAMETER_STATUS: u8 = b'S';
    /// ReadyForQuery
    pub const READY_FOR_QUERY: u8 = b'Z';
    /// RowDescription
    pub const ROW_DESCRIPTION: u8 = b'T';
    /// DataRow
    pub const DATA_ROW: u8 = b'D';
    /// CommandComplete
    pub const COMMAND_COMPLETE: u8 = b'C';
    /// EmptyQueryResponse
    pub const EMPTY_QUERY_RESPONSE: u8 = b'I';
    /// ErrorResponse
    pub const ERROR_RESPONSE: u8 = b'E';
    /// NoticeResponse
    pub const NOTICE_RESPONSE: u8 = b'N';
    /// ParseComplete
    pub const PARSE_COMPLETE: u8 = b'1';
    /// BindComplete
    pub const BIND_COMPLETE: u8 = b'2';
    /// CloseComplete
    pub const CLOSE_COMPLETE: u8 = b'3';
    /// NoData
    pub const NO_DATA: u8 = b'n';
    /// PortalSuspended
    pub const PORTAL_SUSPENDED: u8 = b's';
    /// ParameterDescription
    pub const PARAMETER_DESCRIPTION: u8 = b't';
    /// LoadBalanceResponse
    pub const LOAD_BALANCE_RESPONSE: u8 = b'Y';
}

/// Raw message as handed over by the framing layer.
///
/// A thin pairing of the message type byte with the exact payload slice the
/// framing layer cut after reading the length prefix.
#[derive(Debug, Clone, Copy)]
pub struct RawMessage<'a> {
    /// Message type byte
    pub tag: u8,
    /// Message payload (after the length field)
    pub payload: &'a [u8],
}

impl<'a> RawMessage<'a> {
    /// Create a new `RawMessage`.
    pub fn new(tag: u8, payload: &'a [u8]) -> Self {
        Self { tag, payload }
    }

    /// Check if this is an error response.
    pub fn is_error(&self) -> bool {
        self.tag == msg_type::ERROR_RESPONSE
    }

    /// Check if this is a notice response.
    pub fn is_notice(&self) -> bool {
        self.tag == msg_type::NOTICE_RESPONSE
    }

    /// Check if this message can arrive at any point in the session,
    /// regardless of what the client last sent.
    pub fn is_async(&self) -> bool {
        matches!(
            self.tag,
            msg_type::NOTICE_RESPONSE | msg_type::PARAMETER_STATUS
        )
    }

    /// Decode the payload through `registry`.
    pub fn decode(&self, registry: &Registry) -> Result<BackendMessage<'a>> {
        registry.decode(self.tag, self.payload)
    }
}

/// A decoded backend message.
///
/// Closed sum over every message kind this crate understands. Values are
/// immutable once constructed and borrow from the payload slice where the
/// layout allows it; messages with no payload decode to unit variants.
#[derive(Debug)]
pub enum BackendMessage<'a> {
    /// `'R'` — authentication request or result
    Authentication(Authentication<'a>),
    /// `'K'` — cancellation key data
    BackendKeyData(&'a BackendKeyData),
    /// `'S'` — run-time parameter report
    ParameterStatus(ParameterStatus<'a>),
    /// `'Z'` — server is ready for the next command
    ReadyForQuery(ReadyForQuery),
    /// `'T'` — result set column descriptions
    RowDescription(RowDescription<'a>),
    /// `'D'` — one result row
    DataRow(DataRow<'a>),
    /// `'C'` — command completed
    CommandComplete(CommandComplete<'a>),
    /// `'I'` — response to an empty query string
    EmptyQueryResponse,
    /// `'E'` — error report
    ErrorResponse(ErrorResponse),
    /// `'N'` — non-fatal notice
    NoticeResponse(NoticeResponse),
    /// `'1'` — Parse accepted
    ParseComplete,
    /// `'2'` — Bind accepted
    BindComplete,
    /// `'3'` — Close accepted
    CloseComplete,
    /// `'n'` — statement returns no rows
    NoData,
    /// `'s'` — portal row limit reached
    PortalSuspended,
    /// `'t'` — statement parameter types
    ParameterDescription(ParameterDescription),
    /// `'Y'` — reconnect to a different node
    LoadBalanceResponse(LoadBalanceResponse<'a>),
}

impl BackendMessage<'_> {
    /// The wire tag this message arrives under.
    pub fn tag(&self) -> u8 {
        match self {
            BackendMessage::Authentication(_) => msg_type::AUTHENTICATION,
            BackendMessage::BackendKeyData(_) => msg_type::BACKEND_KEY_DATA,
            BackendMessage::ParameterStatus(_) => msg_type::PARAMETER_STATUS,
            BackendMessage::ReadyForQuery(_) => msg_type::READY_FOR_QUERY,
            BackendMessage::RowDescription(_) => msg_type::ROW_DESCRIPTION,
            BackendMessage::DataRow(_) => msg_type::DATA_ROW,
            BackendMessage::CommandComplete(_) => msg_type::COMMAND_COMPLETE,
            BackendMessage::EmptyQueryResponse => msg_type::EMPTY_QUERY_RESPONSE,
            BackendMessage::ErrorResponse(_) => msg_type::ERROR_RESPONSE,
            BackendMessage::NoticeResponse(_) => msg_type::NOTICE_RESPONSE,
            BackendMessage::ParseComplete => msg_type::PARSE_COMPLETE,
            BackendMessage::BindComplete => msg_type::BIND_COMPLETE,
            BackendMessage::CloseComplete => msg_type::CLOSE_COMPLETE,
            BackendMessage::NoData => msg_type::NO_DATA,
            BackendMessage::PortalSuspended => msg_type::PORTAL_SUSPENDED,
            BackendMessage::ParameterDescription(_) => msg_type::PARAMETER_DESCRIPTION,
            BackendMessage::LoadBalanceResponse(_) => msg_type::LOAD_BALANCE_RESPONSE,
        }
    }

    /// Message type name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            BackendMessage::Authentication(_) => "Authentication",
            BackendMessage::BackendKeyData(_) => "BackendKeyData",
            BackendMessage::ParameterStatus(_) => "ParameterStatus",
            BackendMessage::ReadyForQuery(_) => "ReadyForQuery",
            BackendMessage::RowDescription(_) => "RowDescription",
            BackendMessage::DataRow(_) => "DataRow",
            BackendMessage::CommandComplete(_) => "CommandComplete",
            BackendMessage::EmptyQueryResponse => "EmptyQueryResponse",
            BackendMessage::ErrorResponse(_) => "ErrorResponse",
            BackendMessage::NoticeResponse(_) => "NoticeResponse",
            BackendMessage::ParseComplete => "ParseComplete",
            BackendMessage::BindComplete => "BindComplete",
            BackendMessage::CloseComplete => "CloseComplete",
            BackendMessage::NoData => "NoData",
            BackendMessage::PortalSuspended => "PortalSuspended",
            BackendMessage::ParameterDescription(_) => "ParameterDescription",
            BackendMessage::LoadBalanceResponse(_) => "LoadBalanceResponse",
        }
    }
}
