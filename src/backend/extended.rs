//! Extended-query protocol messages.
//!
//! Most of the extended-query acknowledgments (ParseComplete, BindComplete,
//! CloseComplete, NoData, PortalSuspended) carry no payload and decode to
//! unit variants of [`BackendMessage`](crate::backend::BackendMessage);
//! only ParameterDescription has structure of its own.

use crate::codec::{read_u16, read_u32};
use crate::error::{Error, Result};
use crate::types::Oid;

/// ParameterDescription message: the data types of a prepared statement's
/// parameters, in placeholder order.
#[derive(Debug, Clone)]
pub struct ParameterDescription {
    /// Type OID per parameter
    pub type_oids: Vec<Oid>,
}

impl ParameterDescription {
    /// Parse a ParameterDescription message from payload bytes.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let (count, mut data) = read_u16(payload)
            .map_err(|_| Error::Malformed("ParameterDescription: missing count".into()))?;

        let mut type_oids = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (oid, rest) = read_u32(data).map_err(|_| {
                Error::Malformed(format!(
                    "ParameterDescription: truncated after {} of {count} OIDs",
                    type_oids.len()
                ))
            })?;
            type_oids.push(oid);
            data = rest;
        }

        Ok(Self { type_oids })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_description() {
        let mut payload = vec![0, 2];
        payload.extend_from_slice(&23u32.to_be_bytes());
        payload.extend_from_slice(&25u32.to_be_bytes());
        let msg = ParameterDescription::parse(&payload).unwrap();
        assert_eq!(msg.type_oids, [23, 25]);
    }

    #[test]
    fn test_parameter_description_no_params() {
        let msg = ParameterDescription::parse(&[0, 0]).unwrap();
        assert!(msg.type_oids.is_empty());
    }

    #[test]
    fn test_parameter_description_truncated() {
        let mut payload = vec![0, 2];
        payload.extend_from_slice(&23u32.to_be_bytes());
        let err = ParameterDescription::parse(&payload).unwrap_err();
        assert!(err.is_malformed());
    }
}
