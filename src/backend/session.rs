//! Session-level messages: cancellation keys, parameter reports, readiness,
//! and load-balancing redirects.

use zerocopy::byteorder::big_endian::U32 as U32BE;
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::codec::{read_cstr, read_u32, split_trailing_nul};
use crate::error::{Error, Result};
use crate::types::TransactionStatus;

/// BackendKeyData message: process ID and secret key for cancel requests.
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
#[repr(C, packed)]
pub struct BackendKeyData {
    pid: U32BE,
    secret_key: U32BE,
}

impl BackendKeyData {
    /// Parse a BackendKeyData message from payload bytes.
    ///
    /// The payload is exactly two big-endian u32s; anything else is malformed.
    pub fn parse(payload: &[u8]) -> Result<&Self> {
        Self::ref_from_bytes(payload)
            .map_err(|e| Error::Malformed(format!("BackendKeyData: {e:?}")))
    }

    /// Process ID of the server backend.
    pub fn process_id(&self) -> u32 {
        self.pid.get()
    }

    /// Secret key to present when cancelling.
    pub fn secret(&self) -> u32 {
        self.secret_key.get()
    }
}

/// ParameterStatus message: a run-time parameter the server reports, either
/// at startup or when its value changes mid-session.
#[derive(Debug, Clone)]
pub struct ParameterStatus<'a> {
    /// Parameter name
    pub name: &'a str,
    /// Current value
    pub value: &'a str,
}

impl<'a> ParameterStatus<'a> {
    /// Parse a ParameterStatus message from payload bytes.
    pub fn parse(payload: &'a [u8]) -> Result<Self> {
        let (name, rest) = read_cstr(payload)?;
        let (value, _) = read_cstr(rest)?;
        Ok(Self { name, value })
    }
}

/// ReadyForQuery message: the server finished the previous command cycle.
#[derive(Debug, Clone, Copy)]
pub struct ReadyForQuery {
    /// Raw transaction status byte
    pub status: u8,
}

impl ReadyForQuery {
    /// Parse a ReadyForQuery message from payload bytes.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        match payload {
            [status] => Ok(Self { status: *status }),
            _ => Err(Error::Malformed(format!(
                "ReadyForQuery: expected 1 status byte, got {} bytes",
                payload.len()
            ))),
        }
    }

    /// Transaction status, if the status byte is one of the known values.
    pub fn transaction_status(&self) -> Option<TransactionStatus> {
        TransactionStatus::from_byte(self.status)
    }
}

/// LoadBalanceResponse message: the server directing the client to reconnect
/// to a different node for session placement.
///
/// Payload is a big-endian u32 port, then the host as text, then a NUL.
#[derive(Debug, Clone, Copy)]
pub struct LoadBalanceResponse<'a> {
    port: u32,
    host: &'a str,
}

impl<'a> LoadBalanceResponse<'a> {
    /// Parse a LoadBalanceResponse message from payload bytes.
    ///
    /// The host must be valid UTF-8; unlike the `CommandComplete` command
    /// tag there is no recovery path here, so bad bytes fail the decode.
    pub fn parse(payload: &'a [u8]) -> Result<Self> {
        if payload.len() < 5 {
            return Err(Error::Malformed(format!(
                "LoadBalanceResponse: payload too short: {} < 5",
                payload.len()
            )));
        }
        let (port, rest) = read_u32(payload)?;
        let host_bytes = split_trailing_nul(rest)
            .map_err(|_| Error::Malformed("LoadBalanceResponse: host not NUL-terminated".into()))?;
        let host = simdutf8::compat::from_utf8(host_bytes).map_err(|e| {
            Error::TextDecode(format!("LoadBalanceResponse: host is not UTF-8: {e}"))
        })?;
        Ok(Self { port, host })
    }

    /// Host to reconnect to.
    pub fn host(&self) -> &'a str {
        self.host
    }

    /// Port to reconnect to.
    pub fn port(&self) -> u32 {
        self.port
    }
}

impl std::fmt::Display for LoadBalanceResponse<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LoadBalanceResponse: host={}, port={}", self.host, self.port)
    }
}
