//! # Frame Layer
//!
//! Every packet on the wire is one frame:
//!
//! ```text
//! [wire_id: u16 LE][payload_len: u32 LE][payload_len bytes, gzip]
//! ```
//!
//! The ID is read separately from the rest of the frame so adapters can
//! decide what to do with packets they do not support before touching the
//! length and payload.

use bytes::{BufMut, BytesMut};
use bancho_core::{BanchoError, Result};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::compression::{compress, decompress_limited};

/// Bytes before the payload: 2-byte ID + 4-byte length
pub const FRAME_HEADER_SIZE: usize = 6;

/// Build a complete frame for an already remapped wire ID
pub fn encode_frame(wire_id: u16, payload: &[u8], compression_level: u32) -> Result<BytesMut> {
    let compressed = compress(payload, compression_level)?;
    let mut frame = BytesMut::with_capacity(FRAME_HEADER_SIZE + compressed.len());
    frame.put_u16_le(wire_id);
    frame.put_u32_le(compressed.len() as u32);
    frame.put_slice(&compressed);
    Ok(frame)
}

/// Write one frame with a single `write_all`, then flush
pub async fn write_frame<S>(stream: &mut S, wire_id: u16, payload: &[u8], compression_level: u32) -> Result<usize>
where
    S: AsyncWrite + Unpin + ?Sized,
{
    let frame = encode_frame(wire_id, payload, compression_level)?;
    stream.write_all(&frame).await?;
    stream.flush().await?;
    Ok(frame.len())
}

/// Fill `buf` until it is full or the stream ends, returning the bytes read
async fn read_up_to<S>(stream: &mut S, buf: &mut [u8]) -> Result<usize>
where
    S: AsyncRead + Unpin + ?Sized,
{
    let mut filled = 0;
    while filled < buf.len() {
        let n = stream.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Read the 2-byte wire ID at the start of a frame
///
/// A stream that ends before the first byte gives an `UnexpectedEof` I/O
/// error. One that ends after a single byte is a truncated frame.
pub async fn read_wire_id<S>(stream: &mut S) -> Result<u16>
where
    S: AsyncRead + Unpin + ?Sized,
{
    let mut id = [0u8; 2];
    match read_up_to(stream, &mut id).await? {
        0 => Err(BanchoError::Io(io::Error::new(io::ErrorKind::UnexpectedEof, "stream closed"))),
        2 => Ok(u16::from_le_bytes(id)),
        actual => Err(BanchoError::FrameLengthMismatch { expected: 2, actual }),
    }
}

/// Read the declared payload length, rejecting anything above `max`
pub async fn read_payload_length<S>(stream: &mut S, max: usize) -> Result<usize>
where
    S: AsyncRead + Unpin + ?Sized,
{
    let mut raw = [0u8; 4];
    let actual = read_up_to(stream, &mut raw).await?;
    if actual != raw.len() {
        return Err(BanchoError::FrameLengthMismatch { expected: 4, actual });
    }

    let length = u32::from_le_bytes(raw) as usize;
    if length > max {
        return Err(BanchoError::PayloadTooLarge { length, max });
    }
    Ok(length)
}

/// Read exactly `length` compressed bytes
///
/// Fails with [`BanchoError::FrameLengthMismatch`] if the stream ends first.
pub async fn read_compressed<S>(stream: &mut S, length: usize) -> Result<Vec<u8>>
where
    S: AsyncRead + Unpin + ?Sized,
{
    let mut compressed = Vec::with_capacity(length);
    let actual = (&mut *stream)
        .take(length as u64)
        .read_to_end(&mut compressed)
        .await?;

    if actual != length {
        return Err(BanchoError::FrameLengthMismatch {
            expected: length,
            actual,
        });
    }
    Ok(compressed)
}

/// Read the length and payload following a wire ID and decompress it
///
/// `max` bounds both the declared length and the decompressed size.
pub async fn read_frame_body<S>(stream: &mut S, max: usize) -> Result<Vec<u8>>
where
    S: AsyncRead + Unpin + ?Sized,
{
    let length = read_payload_length(stream, max).await?;
    let compressed = read_compressed(stream, length).await?;
    decompress_limited(&compressed, max)
}

/// Read and drop the length and payload following a wire ID
pub async fn discard_frame_body<S>(stream: &mut S, max: usize) -> Result<usize>
where
    S: AsyncRead + Unpin + ?Sized,
{
    let length = read_payload_length(stream, max).await?;
    let skipped = tokio::io::copy(&mut (&mut *stream).take(length as u64), &mut tokio::io::sink()).await? as usize;

    if skipped != length {
        return Err(BanchoError::FrameLengthMismatch {
            expected: length,
            actual: skipped,
        });
    }
    Ok(length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::DEFAULT_COMPRESSION_LEVEL;

    #[test]
    fn test_declared_length_matches_payload() {
        let frame = encode_frame(12, b"some payload bytes", DEFAULT_COMPRESSION_LEVEL).unwrap();

        assert_eq!(u16::from_le_bytes([frame[0], frame[1]]), 12);
        let declared = u32::from_le_bytes([frame[2], frame[3], frame[4], frame[5]]) as usize;
        assert_eq!(declared, frame.len() - FRAME_HEADER_SIZE);
    }

    #[tokio::test]
    async fn test_frame_roundtrip() {
        let frame = encode_frame(7, b"payload", DEFAULT_COMPRESSION_LEVEL).unwrap();
        let mut reader = &frame[..];

        assert_eq!(read_wire_id(&mut reader).await.unwrap(), 7);
        let body = read_frame_body(&mut reader, 1024).await.unwrap();
        assert_eq!(body, b"payload");
        assert!(reader.is_empty());
    }

    #[tokio::test]
    async fn test_truncated_payload_is_length_mismatch() {
        let frame = encode_frame(7, b"payload", DEFAULT_COMPRESSION_LEVEL).unwrap();
        let truncated = &frame[..frame.len() - 3];
        let mut reader = truncated;

        read_wire_id(&mut reader).await.unwrap();
        match read_frame_body(&mut reader, 1024).await {
            Err(BanchoError::FrameLengthMismatch { expected, actual }) => {
                assert_eq!(expected, frame.len() - FRAME_HEADER_SIZE);
                assert_eq!(actual, expected - 3);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_end_of_stream_only_between_frames() {
        let mut reader: &[u8] = &[];
        assert!(read_wire_id(&mut reader).await.unwrap_err().is_eof());

        let mut reader: &[u8] = &[0x04];
        let err = read_wire_id(&mut reader).await.unwrap_err();
        assert!(matches!(err, BanchoError::FrameLengthMismatch { expected: 2, actual: 1 }));

        let mut reader: &[u8] = &[0x04, 0x00, 0x10, 0x00];
        read_wire_id(&mut reader).await.unwrap();
        let err = read_frame_body(&mut reader, 4096).await.unwrap_err();
        assert!(matches!(err, BanchoError::FrameLengthMismatch { expected: 4, actual: 2 }));
        assert!(!err.is_eof());
    }

    #[tokio::test]
    async fn test_oversized_payload_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&5000u32.to_le_bytes());
        let mut reader = &bytes[..];

        let err = read_frame_body(&mut reader, 4096).await.unwrap_err();
        assert!(matches!(err, BanchoError::PayloadTooLarge { length: 5000, max: 4096 }));
    }

    #[tokio::test]
    async fn test_oversized_decompressed_payload_rejected() {
        let frame = encode_frame(4, &vec![0u8; 64 * 1024], DEFAULT_COMPRESSION_LEVEL).unwrap();
        assert!(frame.len() - FRAME_HEADER_SIZE < 4096);
        let mut reader = &frame[2..];

        let err = read_frame_body(&mut reader, 4096).await.unwrap_err();
        assert!(matches!(err, BanchoError::PayloadTooLarge { length: 4097, max: 4096 }));
    }

    #[tokio::test]
    async fn test_corrupt_payload_is_decompression_error() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&4u32.to_le_bytes());
        bytes.extend_from_slice(b"junk");
        let mut reader = &bytes[..];

        let err = read_frame_body(&mut reader, 4096).await.unwrap_err();
        assert!(matches!(err, BanchoError::Decompression(_)));
    }

    #[tokio::test]
    async fn test_discard_frame_body() {
        let mut bytes = encode_frame(3, b"ignored", DEFAULT_COMPRESSION_LEVEL).unwrap().to_vec();
        bytes.extend_from_slice(&[0xAA, 0xBB]);
        let mut reader = &bytes[2..];

        let skipped = discard_frame_body(&mut reader, 4096).await.unwrap();
        assert_eq!(skipped, bytes.len() - 2 - FRAME_HEADER_SIZE);
        assert_eq!(reader, &[0xAA, 0xBB]);
    }
}
