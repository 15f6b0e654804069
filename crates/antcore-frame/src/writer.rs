use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use tracing::trace;

use crate::codec::{encode_frame, Frame, FrameConfig, FOOTER_SIZE, HEADER_SIZE};
use crate::error::{FrameError, Result};

/// Writes complete frames to any `Write` byte sink.
///
/// `Interrupted` writes are retried. A `WouldBlock` from a non-blocking sink
/// is returned as [`FrameError::Io`] and the frame may be partly written.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(HEADER_SIZE + config.max_payload_size + FOOTER_SIZE),
            config,
        }
    }

    /// Write a complete frame (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.send(frame.sync, frame.msg_type, frame.payload.as_ref())
    }

    /// Encode and send a payload with the given sync and type bytes.
    pub fn send(&mut self, sync: u8, msg_type: u8, payload: &[u8]) -> Result<()> {
        if payload.len() > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: self.config.max_payload_size,
            });
        }

        self.buf.clear();
        encode_frame(sync, msg_type, payload, &mut self.buf)?;
        self.write_buffered()?;
        trace!(msg_type, len = payload.len(), "frame written");
        self.flush()
    }

    /// Send bytes that are already a complete encoded frame.
    pub fn send_encoded(&mut self, encoded: &[u8]) -> Result<()> {
        self.buf.clear();
        self.buf.extend_from_slice(encoded);
        self.write_buffered()?;
        self.flush()
    }

    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        Ok(())
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner sink.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent frame encoding.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::codec::decode_frame;
    use crate::sync::{MESSAGE_TX_SYNC, MESSAGE_TX_SYNC_LSB};

    fn written(writer: FrameWriter<Cursor<Vec<u8>>>) -> Vec<u8> {
        writer.into_inner().into_inner()
    }

    #[test]
    fn write_single_frame() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

        writer.send(MESSAGE_TX_SYNC, 0x4E, b"hello").unwrap();

        let wire = written(writer);
        let frame = decode_frame(&wire).unwrap();
        assert_eq!(frame.msg_type, 0x4E);
        assert_eq!(frame.payload.as_ref(), b"hello");
        assert_eq!(frame.wire_size(), wire.len());
    }

    #[test]
    fn write_multiple_frames() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));

        writer.send(MESSAGE_TX_SYNC, 0x4B, &[0]).unwrap();
        writer.send(MESSAGE_TX_SYNC, 0x4C, &[0]).unwrap();

        let wire = written(writer);
        let f1 = decode_frame(&wire).unwrap();
        let f2 = decode_frame(&wire[f1.wire_size()..]).unwrap();

        assert_eq!(f1.msg_type, 0x4B);
        assert_eq!(f2.msg_type, 0x4C);
        assert_eq!(f1.wire_size() + f2.wire_size(), wire.len());
    }

    #[test]
    fn payload_too_large_rejected() {
        let cfg = FrameConfig {
            max_payload_size: 4,
        };
        let mut writer = FrameWriter::with_config(Cursor::new(Vec::<u8>::new()), cfg);

        let err = writer.send(MESSAGE_TX_SYNC, 0x4E, b"oversized").unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 9, max: 4 }));
        assert!(written(writer).is_empty());
    }

    #[test]
    fn write_frame_keeps_sync() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        let frame = Frame::new(0x4F, "abc").with_sync(MESSAGE_TX_SYNC_LSB);

        writer.write_frame(&frame).unwrap();

        let wire = written(writer);
        assert_eq!(wire[0], MESSAGE_TX_SYNC_LSB);
        assert_eq!(decode_frame(&wire).unwrap(), frame);
    }

    #[test]
    fn send_encoded_passes_bytes_through() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        let encoded = [0xA4, 0x01, 0x4A, 0x00, 0xA4 ^ 0x01 ^ 0x4A];

        writer.send_encoded(&encoded).unwrap();

        assert_eq!(written(writer), encoded.to_vec());
    }

    #[test]
    fn flush_propagates() {
        let sink = FlushTrackingWriter::default();
        let flag = Arc::clone(&sink.flushed);
        let mut writer = FrameWriter::new(sink);

        writer.send(MESSAGE_TX_SYNC, 0x4A, &[0]).unwrap();

        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn retries_interrupted() {
        let sink = ErrorOnceWriter {
            kind: ErrorKind::Interrupted,
            write_failed: false,
            flush_failed: false,
            data: Vec::new(),
        };
        let mut writer = FrameWriter::new(sink);
        writer.send(MESSAGE_TX_SYNC, 0x4E, b"retry").unwrap();

        let inner = writer.into_inner();
        assert_eq!(inner.data.len(), 3 + 5 + 1);
    }

    #[test]
    fn would_block_surfaces_as_io_error() {
        let sink = ErrorOnceWriter {
            kind: ErrorKind::WouldBlock,
            write_failed: false,
            flush_failed: false,
            data: Vec::new(),
        };
        let mut writer = FrameWriter::new(sink);

        let err = writer.send(MESSAGE_TX_SYNC, 0x4E, b"busy").unwrap_err();
        assert!(matches!(err, FrameError::Io(ref io) if io.kind() == ErrorKind::WouldBlock));
        assert!(writer.into_inner().data.is_empty());
    }

    #[test]
    fn would_block_on_flush_surfaces_as_io_error() {
        let sink = ErrorOnceWriter {
            kind: ErrorKind::WouldBlock,
            write_failed: true,
            flush_failed: false,
            data: Vec::new(),
        };
        let mut writer = FrameWriter::new(sink);

        let err = writer.flush().unwrap_err();
        assert!(matches!(err, FrameError::Io(ref io) if io.kind() == ErrorKind::WouldBlock));
    }

    #[test]
    fn connection_closed_when_write_returns_zero() {
        let mut writer = FrameWriter::new(ZeroWriter);
        let err = writer.send(MESSAGE_TX_SYNC, 0x4E, b"x").unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn accessors_and_into_inner() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.set_max_payload_size(9);

        assert_eq!(writer.config().max_payload_size, 9);
        let _ = writer.get_ref();
        let _ = writer.get_mut();
        let _inner = writer.into_inner();
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: Arc<AtomicBool>,
        data: Vec<u8>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct ErrorOnceWriter {
        kind: ErrorKind,
        write_failed: bool,
        flush_failed: bool,
        data: Vec<u8>,
    }

    impl Write for ErrorOnceWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.write_failed {
                self.write_failed = true;
                return Err(std::io::Error::from(self.kind));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flush_failed {
                self.flush_failed = true;
                return Err(std::io::Error::from(self.kind));
            }
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
