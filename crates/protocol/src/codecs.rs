//! Bancho binary primitives
//!
//! Every multi-byte value on the wire is little-endian. Strings carry a
//! one-byte marker: `0x00` for an empty string, or `0x0b` followed by a
//! ULEB128 byte length and the UTF-8 bytes.

use bytes::{Buf, BufMut, BytesMut};
use bancho_core::{BanchoError, Result};
use std::io;

/// Marker byte for an empty string
pub const STRING_EMPTY: u8 = 0x00;

/// Marker byte preceding a length-prefixed string
pub const STRING_PRESENT: u8 = 0x0b;

#[inline]
fn ensure(buf: &BytesMut, needed: usize, what: &str) -> Result<()> {
    if buf.remaining() < needed {
        return Err(BanchoError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("Not enough bytes for {} ({} < {})", what, buf.remaining(), needed),
        )));
    }
    Ok(())
}

#[inline]
pub fn write_u8(buf: &mut BytesMut, val: u8) {
    buf.put_u8(val);
}

#[inline]
pub fn write_i8(buf: &mut BytesMut, val: i8) {
    buf.put_i8(val);
}

#[inline]
pub fn write_u16(buf: &mut BytesMut, val: u16) {
    buf.put_u16_le(val);
}

#[inline]
pub fn write_i16(buf: &mut BytesMut, val: i16) {
    buf.put_i16_le(val);
}

#[inline]
pub fn write_u32(buf: &mut BytesMut, val: u32) {
    buf.put_u32_le(val);
}

#[inline]
pub fn write_i32(buf: &mut BytesMut, val: i32) {
    buf.put_i32_le(val);
}

#[inline]
pub fn write_u64(buf: &mut BytesMut, val: u64) {
    buf.put_u64_le(val);
}

#[inline]
pub fn write_i64(buf: &mut BytesMut, val: i64) {
    buf.put_i64_le(val);
}

#[inline]
pub fn write_f32(buf: &mut BytesMut, val: f32) {
    buf.put_f32_le(val);
}

#[inline]
pub fn write_f64(buf: &mut BytesMut, val: f64) {
    buf.put_f64_le(val);
}

/// Write a boolean as a single byte (1 or 0)
#[inline]
pub fn write_bool(buf: &mut BytesMut, val: bool) {
    buf.put_u8(val as u8);
}

/// Write an unsigned LEB128 integer
pub fn write_uleb128(buf: &mut BytesMut, mut val: usize) {
    loop {
        let byte = (val & 0x7F) as u8;
        val >>= 7;
        if val == 0 {
            buf.put_u8(byte);
            break;
        }
        buf.put_u8(byte | 0x80);
    }
}

/// Write a Bancho string
///
/// # Format
/// - Empty: `0x00`
/// - Otherwise: `0x0b`, ULEB128 byte length, UTF-8 bytes
pub fn write_string(buf: &mut BytesMut, val: &str) {
    if val.is_empty() {
        buf.put_u8(STRING_EMPTY);
        return;
    }
    buf.put_u8(STRING_PRESENT);
    write_uleb128(buf, val.len());
    buf.put_slice(val.as_bytes());
}

#[inline]
pub fn read_u8(buf: &mut BytesMut) -> Result<u8> {
    ensure(buf, 1, "u8")?;
    Ok(buf.get_u8())
}

#[inline]
pub fn read_i8(buf: &mut BytesMut) -> Result<i8> {
    ensure(buf, 1, "i8")?;
    Ok(buf.get_i8())
}

#[inline]
pub fn read_u16(buf: &mut BytesMut) -> Result<u16> {
    ensure(buf, 2, "u16")?;
    Ok(buf.get_u16_le())
}

#[inline]
pub fn read_i16(buf: &mut BytesMut) -> Result<i16> {
    ensure(buf, 2, "i16")?;
    Ok(buf.get_i16_le())
}

#[inline]
pub fn read_u32(buf: &mut BytesMut) -> Result<u32> {
    ensure(buf, 4, "u32")?;
    Ok(buf.get_u32_le())
}

#[inline]
pub fn read_i32(buf: &mut BytesMut) -> Result<i32> {
    ensure(buf, 4, "i32")?;
    Ok(buf.get_i32_le())
}

#[inline]
pub fn read_u64(buf: &mut BytesMut) -> Result<u64> {
    ensure(buf, 8, "u64")?;
    Ok(buf.get_u64_le())
}

#[inline]
pub fn read_i64(buf: &mut BytesMut) -> Result<i64> {
    ensure(buf, 8, "i64")?;
    Ok(buf.get_i64_le())
}

#[inline]
pub fn read_f32(buf: &mut BytesMut) -> Result<f32> {
    ensure(buf, 4, "f32")?;
    Ok(buf.get_f32_le())
}

#[inline]
pub fn read_f64(buf: &mut BytesMut) -> Result<f64> {
    ensure(buf, 8, "f64")?;
    Ok(buf.get_f64_le())
}

/// Read a boolean; any non-zero byte is `true`
#[inline]
pub fn read_bool(buf: &mut BytesMut) -> Result<bool> {
    Ok(read_u8(buf)? != 0)
}

/// Read an unsigned LEB128 integer
pub fn read_uleb128(buf: &mut BytesMut) -> Result<usize> {
    let mut result: usize = 0;
    let mut shift = 0u32;
    loop {
        let byte = read_u8(buf)?;
        if shift >= usize::BITS {
            return Err(BanchoError::InvalidData("ULEB128 value overflows".into()));
        }
        result |= ((byte & 0x7F) as usize) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
}

/// Read a Bancho string
pub fn read_string(buf: &mut BytesMut) -> Result<String> {
    match read_u8(buf)? {
        STRING_EMPTY => Ok(String::new()),
        STRING_PRESENT => {
            let len = read_uleb128(buf)?;
            ensure(buf, len, "string")?;
            let bytes = buf.copy_to_bytes(len);
            String::from_utf8(bytes.to_vec())
                .map_err(|e| BanchoError::InvalidData(format!("Invalid UTF-8: {}", e)))
        }
        marker => Err(BanchoError::InvalidData(format!(
            "Unknown string marker 0x{:02x}",
            marker
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_are_little_endian() {
        let mut buf = BytesMut::new();
        write_u16(&mut buf, 0x0102);
        write_u32(&mut buf, 0x03040506);
        write_i32(&mut buf, -2);

        assert_eq!(&buf[..], &[0x02, 0x01, 0x06, 0x05, 0x04, 0x03, 0xfe, 0xff, 0xff, 0xff]);

        assert_eq!(read_u16(&mut buf).unwrap(), 0x0102);
        assert_eq!(read_u32(&mut buf).unwrap(), 0x03040506);
        assert_eq!(read_i32(&mut buf).unwrap(), -2);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_floats_and_bools() {
        let mut buf = BytesMut::new();
        write_f32(&mut buf, 256.5);
        write_f64(&mut buf, 98.76);
        write_bool(&mut buf, true);
        write_bool(&mut buf, false);

        assert_eq!(read_f32(&mut buf).unwrap(), 256.5);
        assert_eq!(read_f64(&mut buf).unwrap(), 98.76);
        assert!(read_bool(&mut buf).unwrap());
        assert!(!read_bool(&mut buf).unwrap());
    }

    #[test]
    fn test_empty_string_is_single_byte() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "");
        assert_eq!(&buf[..], &[0x00]);
        assert_eq!(read_string(&mut buf).unwrap(), "");
    }

    #[test]
    fn test_string_layout() {
        let mut buf = BytesMut::new();
        write_string(&mut buf, "#osu");
        assert_eq!(&buf[..], &[0x0b, 0x04, b'#', b'o', b's', b'u']);
        assert_eq!(read_string(&mut buf).unwrap(), "#osu");
    }

    #[test]
    fn test_long_string_uses_multibyte_length() {
        let text = "a".repeat(300);
        let mut buf = BytesMut::new();
        write_string(&mut buf, &text);

        // 300 = 0b1_0010_1100 -> 0xac 0x02
        assert_eq!(&buf[..3], &[0x0b, 0xac, 0x02]);
        assert_eq!(read_string(&mut buf).unwrap(), text);
    }

    #[test]
    fn test_short_reads_fail_with_eof() {
        let mut buf = BytesMut::from(&[0x01, 0x02, 0x03][..]);
        let err = read_u32(&mut buf).unwrap_err();
        assert!(err.is_eof());

        let mut buf = BytesMut::from(&[0x0b, 0x05, b'a'][..]);
        assert!(read_string(&mut buf).unwrap_err().is_eof());
    }

    #[test]
    fn test_unknown_string_marker() {
        let mut buf = BytesMut::from(&[0x07][..]);
        assert!(matches!(read_string(&mut buf), Err(BanchoError::InvalidData(_))));
    }
}
