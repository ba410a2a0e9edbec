//! Error and notice report messages.
//!
//! Both share one wire shape: a sequence of `<field type byte><value cstr>`
//! pairs closed by a lone NUL. The field set is open-ended; unknown field
//! types are skipped so newer servers stay decodable.

use crate::codec::{read_cstr, read_u8};
use crate::error::Result;

/// Report field type codes.
pub mod field_type {
    /// Severity: ERROR, FATAL, PANIC, WARNING, NOTICE, DEBUG, INFO, LOG
    pub const SEVERITY: u8 = b'S';
    /// SQLSTATE code
    pub const CODE: u8 = b'C';
    /// Primary message
    pub const MESSAGE: u8 = b'M';
    /// Detail
    pub const DETAIL: u8 = b'D';
    /// Hint
    pub const HINT: u8 = b'H';
    /// Cursor position in the query string
    pub const POSITION: u8 = b'P';
    /// Context / stack trace
    pub const WHERE: u8 = b'W';
    /// Schema name
    pub const SCHEMA: u8 = b's';
    /// Table name
    pub const TABLE: u8 = b't';
    /// Column name
    pub const COLUMN: u8 = b'c';
    /// Data type name
    pub const DATA_TYPE: u8 = b'd';
    /// Constraint name
    pub const CONSTRAINT: u8 = b'n';
    /// Source file name
    pub const FILE: u8 = b'F';
    /// Source line number
    pub const LINE: u8 = b'L';
    /// Source routine name
    pub const ROUTINE: u8 = b'R';
}

/// Decoded fields of an error or notice report.
#[derive(Debug, Clone, Default)]
pub struct NoticeFields {
    /// Severity: ERROR, FATAL, PANIC, WARNING, NOTICE, DEBUG, INFO, LOG
    pub severity: Option<String>,
    /// SQLSTATE code (5 characters)
    pub code: Option<String>,
    /// Primary message
    pub message: Option<String>,
    /// Detailed explanation
    pub detail: Option<String>,
    /// Suggestion for fixing the problem
    pub hint: Option<String>,
    /// Cursor position in the query string (1-based)
    pub position: Option<u32>,
    /// Context / stack trace
    pub where_: Option<String>,
    /// Schema name
    pub schema: Option<String>,
    /// Table name
    pub table: Option<String>,
    /// Column name
    pub column: Option<String>,
    /// Data type name
    pub data_type: Option<String>,
    /// Constraint name
    pub constraint: Option<String>,
    /// Source file name
    pub file: Option<String>,
    /// Source line number
    pub line: Option<u32>,
    /// Source routine name
    pub routine: Option<String>,
}

impl NoticeFields {
    /// Parse report fields from payload bytes.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let mut fields = NoticeFields::default();
        let mut data = payload;

        loop {
            let (tag, rest) = match read_u8(data) {
                Ok(pair) => pair,
                // terminator may be absent on the wire of older servers
                Err(_) => break,
            };
            if tag == 0 {
                break;
            }
            let (value, rest) = read_cstr(rest)?;
            data = rest;

            match tag {
                field_type::SEVERITY => fields.severity = Some(value.to_string()),
                field_type::CODE => fields.code = Some(value.to_string()),
                field_type::MESSAGE => fields.message = Some(value.to_string()),
                field_type::DETAIL => fields.detail = Some(value.to_string()),
                field_type::HINT => fields.hint = Some(value.to_string()),
                field_type::POSITION => fields.position = value.parse().ok(),
                field_type::WHERE => fields.where_ = Some(value.to_string()),
                field_type::SCHEMA => fields.schema = Some(value.to_string()),
                field_type::TABLE => fields.table = Some(value.to_string()),
                field_type::COLUMN => fields.column = Some(value.to_string()),
                field_type::DATA_TYPE => fields.data_type = Some(value.to_string()),
                field_type::CONSTRAINT => fields.constraint = Some(value.to_string()),
                field_type::FILE => fields.file = Some(value.to_string()),
                field_type::LINE => fields.line = value.parse().ok(),
                field_type::ROUTINE => fields.routine = Some(value.to_string()),
                _ => {
                    tracing::debug!("unknown report field type: {}", tag as char);
                }
            }
        }

        Ok(fields)
    }

    /// True if severity marks the session as unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self.severity.as_deref(), Some("FATAL") | Some("PANIC"))
    }
}

impl std::fmt::Display for NoticeFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(severity) = &self.severity {
            write!(f, "{severity}: ")?;
        }
        if let Some(message) = &self.message {
            write!(f, "{message}")?;
        }
        if let Some(code) = &self.code {
            write!(f, " (SQLSTATE {code})")?;
        }
        if let Some(detail) = &self.detail {
            write!(f, "\nDETAIL: {detail}")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "\nHINT: {hint}")?;
        }
        Ok(())
    }
}

/// ErrorResponse message: the current command failed.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    /// Decoded report fields
    pub fields: NoticeFields,
}

impl ErrorResponse {
    /// Parse an ErrorResponse message from payload bytes.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            fields: NoticeFields::parse(payload)?,
        })
    }
}

/// NoticeResponse message: a warning the client may surface or discard.
#[derive(Debug, Clone)]
pub struct NoticeResponse {
    /// Decoded report fields
    pub fields: NoticeFields,
}

impl NoticeResponse {
    /// Parse a NoticeResponse message from payload bytes.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            fields: NoticeFields::parse(payload)?,
        })
    }
}
