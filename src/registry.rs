//! Message type registry: tag byte → decoder dispatch.

use crate::backend::{
    Authentication, BackendKeyData, BackendMessage, CommandComplete, DataRow, ErrorResponse,
    LoadBalanceResponse, NoticeResponse, ParameterDescription, ParameterStatus, ReadyForQuery,
    RowDescription, msg_type,
};
use crate::error::{Error, Result};

/// Decoder for one message type: payload bytes in, typed message out.
pub type DecodeFn = for<'a> fn(&'a [u8]) -> Result<BackendMessage<'a>>;

/// Maps message type bytes to decoders.
///
/// A registry is built once, before any traffic is decoded, and read-only
/// afterwards: [`register`](Self::register) takes `&mut self` while every
/// lookup takes `&self`, so the borrow checker rules out a registration
/// racing a lookup. A finished registry can be shared freely across threads.
///
/// [`Registry::standard`] is the usual entry point; [`Registry::new`] starts
/// empty for callers that want a narrower message surface.
#[derive(Clone)]
pub struct Registry {
    decoders: [Option<DecodeFn>; 256],
}

impl Registry {
    /// Create a registry with no decoders.
    pub fn new() -> Self {
        Self {
            decoders: [None; 256],
        }
    }

    /// Create a registry covering every message type this crate knows.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(msg_type::AUTHENTICATION, decode::authentication);
        registry.register(msg_type::BACKEND_KEY_DATA, decode::backend_key_data);
        registry.register(msg_type::PARAMETER_STATUS, decode::parameter_status);
        registry.register(msg_type::READY_FOR_QUERY, decode::ready_for_query);
        registry.register(msg_type::ROW_DESCRIPTION, decode::row_description);
        registry.register(msg_type::DATA_ROW, decode::data_row);
        registry.register(msg_type::COMMAND_COMPLETE, decode::command_complete);
        registry.register(msg_type::EMPTY_QUERY_RESPONSE, decode::empty_query_response);
        registry.register(msg_type::ERROR_RESPONSE, decode::error_response);
        registry.register(msg_type::NOTICE_RESPONSE, decode::notice_response);
        registry.register(msg_type::PARSE_COMPLETE, decode::parse_complete);
        registry.register(msg_type::BIND_COMPLETE, decode::bind_complete);
        registry.register(msg_type::CLOSE_COMPLETE, decode::close_complete);
        registry.register(msg_type::NO_DATA, decode::no_data);
        registry.register(msg_type::PORTAL_SUSPENDED, decode::portal_suspended);
        registry.register(
            msg_type::PARAMETER_DESCRIPTION,
            decode::parameter_description,
        );
        registry.register(msg_type::LOAD_BALANCE_RESPONSE, decode::load_balance_response);
        registry
    }

    /// Associate `tag` with `decoder`.
    ///
    /// Call once per message type while the registry is still private to the
    /// constructing thread. Registering the same tag twice is a programmer
    /// error; debug builds assert, release builds keep the last registration.
    pub fn register(&mut self, tag: u8, decoder: DecodeFn) {
        debug_assert!(
            self.decoders[tag as usize].is_none(),
            "duplicate decoder registration for tag 0x{tag:02x}"
        );
        self.decoders[tag as usize] = Some(decoder);
    }

    /// Look up the decoder for `tag`.
    pub fn lookup(&self, tag: u8) -> Result<DecodeFn> {
        self.decoders[tag as usize].ok_or(Error::UnknownMessageType(tag))
    }

    /// Check whether a decoder is registered for `tag`.
    pub fn contains(&self, tag: u8) -> bool {
        self.decoders[tag as usize].is_some()
    }

    /// Decode one message: look up the decoder for `tag` and run it on
    /// `payload`, propagating either failure.
    pub fn decode<'a>(&self, tag: u8, payload: &'a [u8]) -> Result<BackendMessage<'a>> {
        let decoder = self.lookup(tag)?;
        decoder(payload)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tags: String = self
            .decoders
            .iter()
            .enumerate()
            .filter_map(|(tag, decoder)| decoder.map(|_| char::from(tag as u8)))
            .collect();
        f.debug_struct("Registry").field("tags", &tags).finish()
    }
}

mod decode {
    use super::*;

    fn expect_empty(payload: &[u8], message: &str) -> Result<()> {
        if payload.is_empty() {
            Ok(())
        } else {
            Err(Error::Malformed(format!(
                "{message}: expected empty payload, got {} bytes",
                payload.len()
            )))
        }
    }

    pub fn authentication(payload: &[u8]) -> Result<BackendMessage<'_>> {
        Authentication::parse(payload).map(BackendMessage::Authentication)
    }

    pub fn backend_key_data(payload: &[u8]) -> Result<BackendMessage<'_>> {
        BackendKeyData::parse(payload).map(BackendMessage::BackendKeyData)
    }

    pub fn parameter_status(payload: &[u8]) -> Result<BackendMessage<'_>> {
        ParameterStatus::parse(payload).map(BackendMessage::ParameterStatus)
    }

    pub fn ready_for_query(payload: &[u8]) -> Result<BackendMessage<'_>> {
        ReadyForQuery::parse(payload).map(BackendMessage::ReadyForQuery)
    }

    pub fn row_description(payload: &[u8]) -> Result<BackendMessage<'_>> {
        RowDescription::parse(payload).map(BackendMessage::RowDescription)
    }

    pub fn data_row(payload: &[u8]) -> Result<BackendMessage<'_>> {
        DataRow::parse(payload).map(BackendMessage::DataRow)
    }

    pub fn command_complete(payload: &[u8]) -> Result<BackendMessage<'_>> {
        CommandComplete::parse(payload).map(BackendMessage::CommandComplete)
    }

    pub fn empty_query_response(payload: &[u8]) -> Result<BackendMessage<'_>> {
        expect_empty(payload, "EmptyQueryResponse")?;
        Ok(BackendMessage::EmptyQueryResponse)
    }

    pub fn error_response(payload: &[u8]) -> Result<BackendMessage<'_>> {
        ErrorResponse::parse(payload).map(BackendMessage::ErrorResponse)
    }

    pub fn notice_response(payload: &[u8]) -> Result<BackendMessage<'_>> {
        NoticeResponse::parse(payload).map(BackendMessage::NoticeResponse)
    }

    pub fn parse_complete(payload: &[u8]) -> Result<BackendMessage<'_>> {
        expect_empty(payload, "ParseComplete")?;
        Ok(BackendMessage::ParseComplete)
    }

    pub fn bind_complete(payload: &[u8]) -> Result<BackendMessage<'_>> {
        expect_empty(payload, "BindComplete")?;
        Ok(BackendMessage::BindComplete)
    }

    pub fn close_complete(payload: &[u8]) -> Result<BackendMessage<'_>> {
        expect_empty(payload, "CloseComplete")?;
        Ok(BackendMessage::CloseComplete)
    }

    pub fn no_data(payload: &[u8]) -> Result<BackendMessage<'_>> {
        expect_empty(payload, "NoData")?;
        Ok(BackendMessage::NoData)
    }

    pub fn portal_suspended(payload: &[u8]) -> Result<BackendMessage<'_>> {
        expect_empty(payload, "PortalSuspended")?;
        Ok(BackendMessage::PortalSuspended)
    }

    pub fn parameter_description(payload: &[u8]) -> Result<BackendMessage<'_>> {
        ParameterDescription::parse(payload).map(BackendMessage::ParameterDescription)
    }

    pub fn load_balance_response(payload: &[u8]) -> Result<BackendMessage<'_>> {
        LoadBalanceResponse::parse(payload).map(BackendMessage::LoadBalanceResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tag() {
        let registry = Registry::standard();
        let err = registry.decode(b'?', b"").unwrap_err();
        assert!(matches!(err, Error::UnknownMessageType(b'?')));
        assert!(err.is_unknown_message_type());
    }

    #[test]
    fn test_empty_registry_knows_nothing() {
        let registry = Registry::new();
        assert!(!registry.contains(msg_type::COMMAND_COMPLETE));
        assert!(registry.lookup(msg_type::COMMAND_COMPLETE).is_err());
    }

    #[test]
    fn test_register_then_lookup() {
        let mut registry = Registry::new();
        registry.register(msg_type::COMMAND_COMPLETE, decode::command_complete);
        assert!(registry.contains(msg_type::COMMAND_COMPLETE));

        let decoder = registry.lookup(msg_type::COMMAND_COMPLETE).unwrap();
        let msg = decoder(b"SELECT 1\0").unwrap();
        match msg {
            BackendMessage::CommandComplete(complete) => {
                assert_eq!(complete.command_tag, "SELECT 1");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    #[should_panic(expected = "duplicate decoder registration")]
    fn test_duplicate_registration_asserts() {
        let mut registry = Registry::new();
        registry.register(msg_type::COMMAND_COMPLETE, decode::command_complete);
        registry.register(msg_type::COMMAND_COMPLETE, decode::command_complete);
    }

    #[test]
    fn test_decode_error_propagates() {
        let registry = Registry::standard();
        let err = registry.decode(msg_type::COMMAND_COMPLETE, b"").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_debug_lists_registered_tags() {
        let registry = Registry::standard();
        let rendered = format!("{registry:?}");
        assert!(rendered.contains('C'));
        assert!(rendered.contains('Y'));
    }
}
