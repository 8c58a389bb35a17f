//! Test transports

use parking_lot::Mutex;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use crate::compression::DEFAULT_COMPRESSION_LEVEL;
use crate::frame::encode_frame;

#[derive(Default)]
struct SpyState {
    inbound: Vec<u8>,
    position: usize,
    written: Vec<u8>,
    write_calls: usize,
}

/// In-memory stream that serves fixed inbound bytes and records writes
pub(crate) struct SpyStream {
    state: Arc<Mutex<SpyState>>,
}

/// Observer half of a [`SpyStream`], usable after the stream is attached
#[derive(Clone)]
pub(crate) struct SpyHandle {
    state: Arc<Mutex<SpyState>>,
}

impl SpyStream {
    pub(crate) fn new(inbound: Vec<u8>) -> (Self, SpyHandle) {
        let state = Arc::new(Mutex::new(SpyState {
            inbound,
            ..Default::default()
        }));
        (Self { state: state.clone() }, SpyHandle { state })
    }
}

impl SpyHandle {
    pub(crate) fn written(&self) -> Vec<u8> {
        self.state.lock().written.clone()
    }

    pub(crate) fn write_calls(&self) -> usize {
        self.state.lock().write_calls
    }

    /// Inbound bytes nobody has read yet
    pub(crate) fn unread(&self) -> Vec<u8> {
        let state = self.state.lock();
        state.inbound[state.position..].to_vec()
    }
}

impl AsyncRead for SpyStream {
    fn poll_read(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let mut state = self.state.lock();
        let start = state.position;
        let n = (state.inbound.len() - start).min(buf.remaining());
        buf.put_slice(&state.inbound[start..start + n]);
        state.position += n;
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for SpyStream {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        let mut state = self.state.lock();
        state.written.extend_from_slice(buf);
        state.write_calls += 1;
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Stream whose writes always fail
pub(crate) struct BrokenStream;

impl AsyncRead for BrokenStream {
    fn poll_read(self: Pin<&mut Self>, _cx: &mut Context<'_>, _buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")))
    }
}

impl AsyncWrite for BrokenStream {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, _buf: &[u8]) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe")))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// A frame as a client would send it
pub(crate) fn client_frame(wire_id: u16, payload: &[u8]) -> Vec<u8> {
    encode_frame(wire_id, payload, DEFAULT_COMPRESSION_LEVEL)
        .expect("compressing into memory cannot fail")
        .to_vec()
}

/// Split a byte stream of frames into `(wire_id, decompressed payload)` pairs
pub(crate) fn split_frames(mut bytes: &[u8]) -> Vec<(u16, Vec<u8>)> {
    let mut frames = Vec::new();
    while bytes.len() >= 6 {
        let wire_id = u16::from_le_bytes([bytes[0], bytes[1]]);
        let len = u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]) as usize;
        let body = &bytes[6..6 + len];
        frames.push((wire_id, crate::compression::decompress(body).expect("valid gzip")));
        bytes = &bytes[6 + len..];
    }
    assert!(bytes.is_empty(), "trailing bytes after last frame");
    frames
}
