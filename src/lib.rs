//! Backend message decoding for a PostgreSQL-family database wire protocol.
//!
//! The framing layer owns the socket: it reads a one-byte message tag and a
//! length prefix, slices exactly that many payload bytes, and hands
//! `(tag, payload)` to this crate. Decoding is synchronous, pure computation
//! over that slice — no I/O, no blocking, no shared mutable state — so a
//! built [`Registry`] can serve any number of threads.
//!
//! # Structure
//!
//! - `backend`: one decoder per server message type, plus the
//!   [`BackendMessage`] sum type they decode into
//! - `registry`: tag byte → decoder dispatch
//! - `codec`: big-endian integer and NUL-terminated string primitives
//! - `error`: decode failure conditions
//!
//! # Example
//!
//! ```
//! use dbwire::{BackendMessage, Registry};
//!
//! let registry = Registry::standard();
//!
//! // tag and payload as sliced by the framing layer
//! let msg = registry.decode(b'C', b"INSERT 0 1\0")?;
//! if let BackendMessage::CommandComplete(complete) = msg {
//!     assert_eq!(complete.command_tag, "INSERT 0 1");
//!     assert_eq!(complete.rows_affected(), Some(1));
//! }
//! # Ok::<(), dbwire::Error>(())
//! ```

pub mod backend;
pub mod codec;
pub mod error;
pub mod registry;
pub mod types;

pub use backend::{BackendMessage, RawMessage, msg_type};
pub use error::{Error, Result};
pub use registry::{DecodeFn, Registry};
pub use types::{FormatCode, Oid, TransactionStatus};
