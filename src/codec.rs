//! Wire decoding primitives.
//!
//! All integers on the wire are big-endian (network byte order). Text fields
//! are either NUL-terminated C strings or "everything after the fixed fields,
//! ending in NUL"; both forms live here so decoders stay declarative.

use zerocopy::FromBytes;
use zerocopy::byteorder::big_endian::{I16 as I16BE, I32 as I32BE, U16 as U16BE, U32 as U32BE};

use crate::error::{Error, Result};

/// Read a 1-byte unsigned integer.
#[inline]
pub fn read_u8(data: &[u8]) -> Result<(u8, &[u8])> {
    match data.split_first() {
        Some((byte, rest)) => Ok((*byte, rest)),
        None => Err(Error::Malformed("read_u8: empty buffer".into())),
    }
}

/// Read a 2-byte big-endian signed integer.
#[inline]
pub fn read_i16(data: &[u8]) -> Result<(i16, &[u8])> {
    let (head, rest) = split_fixed(data, 2, "read_i16")?;
    let value = I16BE::read_from_bytes(head)
        .map_err(|e| Error::Malformed(format!("read_i16: {e:?}")))?
        .get();
    Ok((value, rest))
}

/// Read a 2-byte big-endian unsigned integer.
#[inline]
pub fn read_u16(data: &[u8]) -> Result<(u16, &[u8])> {
    let (head, rest) = split_fixed(data, 2, "read_u16")?;
    let value = U16BE::read_from_bytes(head)
        .map_err(|e| Error::Malformed(format!("read_u16: {e:?}")))?
        .get();
    Ok((value, rest))
}

/// Read a 4-byte big-endian signed integer.
#[inline]
pub fn read_i32(data: &[u8]) -> Result<(i32, &[u8])> {
    let (head, rest) = split_fixed(data, 4, "read_i32")?;
    let value = I32BE::read_from_bytes(head)
        .map_err(|e| Error::Malformed(format!("read_i32: {e:?}")))?
        .get();
    Ok((value, rest))
}

/// Read a 4-byte big-endian unsigned integer.
#[inline]
pub fn read_u32(data: &[u8]) -> Result<(u32, &[u8])> {
    let (head, rest) = split_fixed(data, 4, "read_u32")?;
    let value = U32BE::read_from_bytes(head)
        .map_err(|e| Error::Malformed(format!("read_u32: {e:?}")))?
        .get();
    Ok((value, rest))
}

/// Read exactly `len` raw bytes.
#[inline]
pub fn read_bytes(data: &[u8], len: usize) -> Result<(&[u8], &[u8])> {
    data.split_at_checked(len).ok_or_else(|| {
        Error::Malformed(format!(
            "read_bytes: buffer too short: {} < {len}",
            data.len()
        ))
    })
}

/// Read a NUL-terminated string as raw bytes.
///
/// Returns the bytes before the terminator and the data after it.
#[inline]
pub fn read_cstring(data: &[u8]) -> Result<(&[u8], &[u8])> {
    match memchr::memchr(0, data) {
        Some(pos) => {
            let (bytes, rest) = (&data[..pos], &data[pos + 1..]);
            Ok((bytes, rest))
        }
        None => Err(Error::Malformed(
            "read_cstring: no NUL terminator found".into(),
        )),
    }
}

/// Read a NUL-terminated string as `&str`, validating UTF-8.
#[inline]
pub fn read_cstr(data: &[u8]) -> Result<(&str, &[u8])> {
    let (bytes, rest) = read_cstring(data)?;
    let s = simdutf8::compat::from_utf8(bytes)
        .map_err(|e| Error::TextDecode(format!("read_cstr: invalid UTF-8: {e}")))?;
    Ok((s, rest))
}

/// Split a `<content><0x00>` payload into its content bytes.
///
/// Unlike [`read_cstring`] this anchors on the *last* byte, so content may
/// contain embedded NULs without truncating the field. Fails if the payload
/// is empty or its final byte is not NUL.
#[inline]
pub fn split_trailing_nul(data: &[u8]) -> Result<&[u8]> {
    match data.split_last() {
        Some((0, content)) => Ok(content),
        Some((byte, _)) => Err(Error::Malformed(format!(
            "split_trailing_nul: final byte is 0x{byte:02x}, expected NUL"
        ))),
        None => Err(Error::Malformed("split_trailing_nul: empty payload".into())),
    }
}

#[inline]
fn split_fixed<'a>(data: &'a [u8], len: usize, what: &str) -> Result<(&'a [u8], &'a [u8])> {
    data.split_at_checked(len).ok_or_else(|| {
        Error::Malformed(format!("{what}: buffer too short: {} < {len}", data.len()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_ints() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        let (v, rest) = read_u32(&data).unwrap();
        assert_eq!(v, 0x0102_0304);
        assert_eq!(rest, &[0x05]);

        let (v, _) = read_u16(&data).unwrap();
        assert_eq!(v, 0x0102);

        let (v, _) = read_i32(&[0xff, 0xff, 0xff, 0xff]).unwrap();
        assert_eq!(v, -1);

        let (v, _) = read_i16(&[0xff, 0xfe]).unwrap();
        assert_eq!(v, -2);

        assert!(read_u32(&data[..3]).is_err());
    }

    #[test]
    fn test_read_cstring_stops_at_first_nul() {
        let (bytes, rest) = read_cstring(b"host\0more").unwrap();
        assert_eq!(bytes, b"host");
        assert_eq!(rest, b"more");

        assert!(read_cstring(b"no terminator").is_err());
    }

    #[test]
    fn test_read_cstr_rejects_bad_utf8() {
        let err = read_cstr(b"\xff\xfe\0").unwrap_err();
        assert!(matches!(err, Error::TextDecode(_)));
    }

    #[test]
    fn test_split_trailing_nul() {
        assert_eq!(split_trailing_nul(b"abc\0").unwrap(), b"abc");
        // embedded NUL stays in the content
        assert_eq!(split_trailing_nul(b"a\0b\0").unwrap(), b"a\0b");
        assert_eq!(split_trailing_nul(b"\0").unwrap(), b"");
        assert!(split_trailing_nul(b"").is_err());
        assert!(split_trailing_nul(b"abc").is_err());
    }
}
