//! End-to-end decoding through the standard registry.

use dbwire::backend::{BackendMessage, RawMessage, msg_type};
use dbwire::{Error, Registry};

fn nul_terminated(text: &[u8]) -> Vec<u8> {
    let mut payload = text.to_vec();
    payload.push(0);
    payload
}

fn load_balance_payload(host: &str, port: u32) -> Vec<u8> {
    let mut payload = port.to_be_bytes().to_vec();
    payload.extend_from_slice(host.as_bytes());
    payload.push(0);
    payload
}

#[test]
fn command_complete_valid_tags() {
    let registry = Registry::standard();

    for tag in ["INSERT 0 1", "SELECT 5", "CREATE TABLE", ""] {
        let payload = nul_terminated(tag.as_bytes());
        let msg = registry.decode(b'C', &payload).unwrap();
        match msg {
            BackendMessage::CommandComplete(complete) => {
                assert_eq!(complete.command_tag, tag);
                assert!(complete.recovered.is_none());
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
}

#[test]
fn command_complete_bad_utf8_substitutes_sentinel() {
    let registry = Registry::standard();

    let msg = registry.decode(b'C', b"\xff\xfe\0").unwrap();
    match msg {
        BackendMessage::CommandComplete(complete) => {
            assert_eq!(complete.command_tag, "x");
            let diagnostic = complete.recovered.expect("diagnostic must be attached");
            assert_eq!(diagnostic.bytes, b"\xff\xfe");
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[test]
fn command_complete_empty_payload_is_malformed() {
    let registry = Registry::standard();
    let err = registry.decode(b'C', b"").unwrap_err();
    assert!(matches!(err, Error::Malformed(_)));
}

#[test]
fn load_balance_response_fields() {
    let registry = Registry::standard();

    let payload = load_balance_payload("db.example.com", 80);
    let msg = registry.decode(b'Y', &payload).unwrap();
    match msg {
        BackendMessage::LoadBalanceResponse(redirect) => {
            assert_eq!(redirect.host(), "db.example.com");
            assert_eq!(redirect.port(), 80);
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[test]
fn load_balance_response_round_trip() {
    let registry = Registry::standard();

    for (host, port) in [
        ("localhost", 5433u32),
        ("node-3.cluster.internal", 65535),
        ("10.0.0.1", 1),
        ("", 0),
    ] {
        let payload = load_balance_payload(host, port);
        let msg = registry.decode(b'Y', &payload).unwrap();
        match msg {
            BackendMessage::LoadBalanceResponse(redirect) => {
                assert_eq!(redirect.host(), host);
                assert_eq!(redirect.port(), port);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
}

#[test]
fn load_balance_response_short_payload_is_malformed() {
    let registry = Registry::standard();

    for len in 0..5 {
        let payload = vec![0u8; len];
        let err = registry.decode(b'Y', &payload).unwrap_err();
        assert!(matches!(err, Error::Malformed(_)), "length {len}");
    }
}

#[test]
fn unknown_tag_is_a_distinct_condition() {
    let registry = Registry::standard();
    match registry.decode(0x7f, b"whatever") {
        Err(Error::UnknownMessageType(0x7f)) => {}
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn every_standard_tag_decodes_a_well_formed_payload() {
    let registry = Registry::standard();

    let auth_ok = [0, 0, 0, 0];
    let key_data = [0, 0, 0, 1, 0, 0, 0, 2];
    let parameter_status = b"client_encoding\0UTF8\0".to_vec();
    let row_description = [0u8, 0].to_vec();
    let data_row = [0u8, 0].to_vec();
    let error_report = b"SERROR\0Mboom\0\0".to_vec();
    let notice_report = b"SNOTICE\0Mheads up\0\0".to_vec();
    let parameter_description = [0u8, 0].to_vec();

    let cases: Vec<(u8, Vec<u8>)> = vec![
        (msg_type::AUTHENTICATION, auth_ok.to_vec()),
        (msg_type::BACKEND_KEY_DATA, key_data.to_vec()),
        (msg_type::PARAMETER_STATUS, parameter_status),
        (msg_type::READY_FOR_QUERY, b"I".to_vec()),
        (msg_type::ROW_DESCRIPTION, row_description),
        (msg_type::DATA_ROW, data_row),
        (msg_type::COMMAND_COMPLETE, nul_terminated(b"SELECT 1")),
        (msg_type::EMPTY_QUERY_RESPONSE, Vec::new()),
        (msg_type::ERROR_RESPONSE, error_report),
        (msg_type::NOTICE_RESPONSE, notice_report),
        (msg_type::PARSE_COMPLETE, Vec::new()),
        (msg_type::BIND_COMPLETE, Vec::new()),
        (msg_type::CLOSE_COMPLETE, Vec::new()),
        (msg_type::NO_DATA, Vec::new()),
        (msg_type::PORTAL_SUSPENDED, Vec::new()),
        (msg_type::PARAMETER_DESCRIPTION, parameter_description),
        (msg_type::LOAD_BALANCE_RESPONSE, load_balance_payload("db", 5433)),
    ];

    for (tag, payload) in cases {
        let msg = registry
            .decode(tag, &payload)
            .unwrap_or_else(|e| panic!("tag '{}' failed: {e}", tag as char));
        assert_eq!(msg.tag(), tag, "decoded variant disagrees with wire tag");
        assert!(!msg.name().is_empty());
    }
}

#[test]
fn marker_messages_reject_payload_bytes() {
    let registry = Registry::standard();

    for tag in [
        msg_type::EMPTY_QUERY_RESPONSE,
        msg_type::PARSE_COMPLETE,
        msg_type::BIND_COMPLETE,
        msg_type::CLOSE_COMPLETE,
        msg_type::NO_DATA,
        msg_type::PORTAL_SUSPENDED,
    ] {
        let err = registry.decode(tag, b"junk").unwrap_err();
        assert!(matches!(err, Error::Malformed(_)), "tag '{}'", tag as char);
    }
}

#[test]
fn raw_message_decodes_through_registry() {
    let registry = Registry::standard();

    let payload = nul_terminated(b"DELETE 3");
    let raw = RawMessage::new(msg_type::COMMAND_COMPLETE, &payload);
    assert!(!raw.is_error());
    assert!(!raw.is_async());

    let msg = raw.decode(&registry).unwrap();
    match msg {
        BackendMessage::CommandComplete(complete) => {
            assert_eq!(complete.rows_affected(), Some(3));
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[test]
fn raw_message_classification() {
    let error = RawMessage::new(msg_type::ERROR_RESPONSE, b"");
    assert!(error.is_error());
    assert!(!error.is_notice());

    let notice = RawMessage::new(msg_type::NOTICE_RESPONSE, b"");
    assert!(notice.is_notice());
    assert!(notice.is_async());

    let status = RawMessage::new(msg_type::PARAMETER_STATUS, b"");
    assert!(status.is_async());
}
