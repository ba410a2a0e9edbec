//! Authentication messages.

use crate::codec::{read_bytes, read_cstr, read_i32};
use crate::error::{Error, Result};

/// Authentication method codes carried in the first 4 payload bytes.
pub mod auth_type {
    pub const OK: i32 = 0;
    pub const KERBEROS_V5: i32 = 2;
    pub const CLEARTEXT_PASSWORD: i32 = 3;
    pub const MD5_PASSWORD: i32 = 5;
    pub const GSS: i32 = 7;
    pub const GSS_CONTINUE: i32 = 8;
    pub const SSPI: i32 = 9;
    pub const SASL: i32 = 10;
    pub const SASL_CONTINUE: i32 = 11;
    pub const SASL_FINAL: i32 = 12;
}

/// Authentication message from the server.
///
/// The payload starts with a 4-byte method code; what follows depends on the
/// method. Responding to any of these is the session layer's job — this type
/// only names the request and exposes its data.
#[derive(Debug)]
pub enum Authentication<'a> {
    /// Authentication succeeded
    Ok,
    /// Kerberos V5 exchange requested
    KerberosV5,
    /// Password requested in cleartext
    CleartextPassword,
    /// Password requested as MD5 hash with the given salt
    Md5Password {
        /// Per-session salt for the hash
        salt: [u8; 4],
    },
    /// GSSAPI exchange requested
    Gss,
    /// GSSAPI continuation data
    GssContinue {
        /// Opaque mechanism bytes
        data: &'a [u8],
    },
    /// SSPI exchange requested
    Sspi,
    /// SASL exchange requested
    Sasl {
        /// Mechanism names offered by the server, in preference order
        mechanisms: Vec<&'a str>,
    },
    /// SASL challenge (server-first-message)
    SaslContinue {
        /// Mechanism-specific challenge bytes
        data: &'a [u8],
    },
    /// SASL outcome (server-final-message)
    SaslFinal {
        /// Mechanism-specific outcome bytes
        data: &'a [u8],
    },
}

impl<'a> Authentication<'a> {
    /// Parse an Authentication message from payload bytes.
    pub fn parse(payload: &'a [u8]) -> Result<Self> {
        let (code, rest) = read_i32(payload)
            .map_err(|_| Error::Malformed("Authentication: missing method code".into()))?;

        match code {
            auth_type::OK => Ok(Authentication::Ok),
            auth_type::KERBEROS_V5 => Ok(Authentication::KerberosV5),
            auth_type::CLEARTEXT_PASSWORD => Ok(Authentication::CleartextPassword),
            auth_type::MD5_PASSWORD => {
                let (salt_bytes, _) = read_bytes(rest, 4)
                    .map_err(|_| Error::Malformed("Authentication: MD5 salt truncated".into()))?;
                let mut salt = [0u8; 4];
                salt.copy_from_slice(salt_bytes);
                Ok(Authentication::Md5Password { salt })
            }
            auth_type::GSS => Ok(Authentication::Gss),
            auth_type::GSS_CONTINUE => Ok(Authentication::GssContinue { data: rest }),
            auth_type::SSPI => Ok(Authentication::Sspi),
            auth_type::SASL => {
                // NUL-terminated mechanism names, list ends with an empty name
                let mut mechanisms = Vec::new();
                let mut data = rest;
                while let [first, ..] = data {
                    if *first == 0 {
                        break;
                    }
                    let (mechanism, remaining) = read_cstr(data)?;
                    mechanisms.push(mechanism);
                    data = remaining;
                }
                Ok(Authentication::Sasl { mechanisms })
            }
            auth_type::SASL_CONTINUE => Ok(Authentication::SaslContinue { data: rest }),
            auth_type::SASL_FINAL => Ok(Authentication::SaslFinal { data: rest }),
            _ => Err(Error::Malformed(format!(
                "Authentication: unknown method code {code}"
            ))),
        }
    }
}
