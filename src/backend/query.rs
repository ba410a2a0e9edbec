//! Query-cycle messages: result descriptions, rows, and completion tags.

use crate::codec::{read_bytes, read_cstr, read_i16, read_i32, read_u16, read_u32, split_trailing_nul};
use crate::error::{Error, Result};
use crate::types::{FormatCode, Oid};

/// One column of a result set description.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    /// Column name
    pub name: &'a str,
    /// Table OID (0 if not a table column)
    pub table_oid: Oid,
    /// Column attribute number (0 if not a table column)
    pub column_id: i16,
    /// Data type OID
    pub type_oid: Oid,
    /// Type size (-1 for variable, -2 for NUL-terminated)
    pub type_size: i16,
    /// Type modifier (type-specific)
    pub type_modifier: i32,
    /// Format the values will arrive in
    pub format: FormatCode,
}

/// RowDescription message: the columns of the result set that follows.
#[derive(Debug)]
pub struct RowDescription<'a> {
    columns: Vec<Column<'a>>,
}

impl<'a> RowDescription<'a> {
    /// Parse a RowDescription message from payload bytes.
    pub fn parse(payload: &'a [u8]) -> Result<Self> {
        let (num_columns, mut data) = read_u16(payload)
            .map_err(|_| Error::Malformed("RowDescription: missing column count".into()))?;

        let mut columns = Vec::with_capacity(num_columns as usize);
        for _ in 0..num_columns {
            let (name, rest) = read_cstr(data)?;
            let (table_oid, rest) = read_u32(rest)?;
            let (column_id, rest) = read_i16(rest)?;
            let (type_oid, rest) = read_u32(rest)?;
            let (type_size, rest) = read_i16(rest)?;
            let (type_modifier, rest) = read_i32(rest)?;
            let (format, rest) = read_u16(rest)?;

            columns.push(Column {
                name,
                table_oid,
                column_id,
                type_oid,
                type_size,
                type_modifier,
                format: FormatCode::from_u16(format),
            });
            data = rest;
        }

        Ok(Self { columns })
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column descriptions in result order.
    pub fn columns(&self) -> &[Column<'a>] {
        &self.columns
    }
}

/// DataRow message: a single row of the current result set.
///
/// Column values are decoded lazily; the message itself only records the
/// declared column count and the undissected value bytes.
#[derive(Debug, Clone, Copy)]
pub struct DataRow<'a> {
    num_columns: u16,
    columns_data: &'a [u8],
}

impl<'a> DataRow<'a> {
    /// Parse a DataRow message from payload bytes.
    pub fn parse(payload: &'a [u8]) -> Result<Self> {
        let (num_columns, columns_data) = read_u16(payload)
            .map_err(|_| Error::Malformed("DataRow: missing column count".into()))?;
        Ok(Self {
            num_columns,
            columns_data,
        })
    }

    /// Declared number of columns.
    pub fn len(&self) -> usize {
        self.num_columns as usize
    }

    /// Check if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.num_columns == 0
    }

    /// Iterate over column values; `None` items are SQL NULLs.
    ///
    /// Iteration ends early if the value bytes are truncated relative to the
    /// declared lengths.
    pub fn iter(&self) -> DataRowIter<'a> {
        DataRowIter {
            remaining: self.columns_data,
        }
    }

    /// Get a column value by index; outer `None` means out of range.
    pub fn get(&self, index: usize) -> Option<Option<&'a [u8]>> {
        self.iter().nth(index)
    }
}

/// Iterator over the column values of a [`DataRow`].
#[derive(Debug, Clone)]
pub struct DataRowIter<'a> {
    remaining: &'a [u8],
}

impl<'a> Iterator for DataRowIter<'a> {
    type Item = Option<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }
        let (len, rest) = read_i32(self.remaining).ok()?;
        self.remaining = rest;

        if len == -1 {
            // SQL NULL
            return Some(None);
        }
        let len = usize::try_from(len).ok()?;
        let (value, rest) = read_bytes(self.remaining, len).ok()?;
        self.remaining = rest;
        Some(Some(value))
    }
}

/// Command tag substituted when the server sends one that is not UTF-8.
pub const RECOVERED_COMMAND_TAG: &str = "x";

/// Diagnostic attached to a [`CommandComplete`] whose tag failed UTF-8
/// decoding and was replaced by [`RECOVERED_COMMAND_TAG`].
#[derive(Debug, Clone, Copy)]
pub struct TagDiagnostic<'a> {
    /// The offending tag bytes, NUL terminator stripped
    pub bytes: &'a [u8],
}

impl std::fmt::Display for TagDiagnostic<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "command tag of {} bytes: \"{}\"",
            self.bytes.len(),
            self.bytes.escape_ascii()
        )
    }
}

/// CommandComplete message: the previous command finished.
#[derive(Debug, Clone, Copy)]
pub struct CommandComplete<'a> {
    /// Command tag, e.g. `"SELECT 5"` or `"INSERT 0 1"`
    pub command_tag: &'a str,
    /// Set when the tag was not UTF-8 and [`RECOVERED_COMMAND_TAG`] was
    /// substituted; carries the raw bytes for triage
    pub recovered: Option<TagDiagnostic<'a>>,
}

impl<'a> CommandComplete<'a> {
    /// Parse a CommandComplete message from payload bytes.
    ///
    /// The payload is the tag text plus a trailing NUL. Some server versions
    /// emit tags that are not valid UTF-8; that known anomaly must not kill
    /// the session, so the decode still succeeds with the sentinel tag and a
    /// warning instead of an error. Missing terminator or an empty payload
    /// is a real framing problem and fails as usual.
    pub fn parse(payload: &'a [u8]) -> Result<Self> {
        let content = split_trailing_nul(payload).map_err(|_| {
            Error::Malformed(format!(
                "CommandComplete: tag not NUL-terminated ({} bytes)",
                payload.len()
            ))
        })?;

        match simdutf8::compat::from_utf8(content) {
            Ok(command_tag) => Ok(Self {
                command_tag,
                recovered: None,
            }),
            Err(e) => {
                let diagnostic = TagDiagnostic { bytes: content };
                tracing::warn!(
                    "server sent a non-UTF-8 {diagnostic} ({e}); substituting \"{RECOVERED_COMMAND_TAG}\""
                );
                Ok(Self {
                    command_tag: RECOVERED_COMMAND_TAG,
                    recovered: Some(diagnostic),
                })
            }
        }
    }

    /// The command name, i.e. the first word of the tag.
    pub fn command(&self) -> Option<&'a str> {
        self.command_tag.split_ascii_whitespace().next()
    }

    /// Rows affected, for tags that end in a row count.
    pub fn rows_affected(&self) -> Option<u64> {
        let mut words = self.command_tag.split_ascii_whitespace();
        let command = words.next()?;
        let count = words.next_back()?;
        match command {
            "SELECT" | "INSERT" | "UPDATE" | "DELETE" | "COPY" | "MOVE" | "FETCH" => {
                count.parse().ok()
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for CommandComplete<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CommandComplete: command_tag = \"{}\"", self.command_tag)
    }
}
