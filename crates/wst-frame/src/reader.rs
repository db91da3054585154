use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};
use tracing::trace;
use wst_transport::WaitReadable;

use crate::codec::{FrameConfig, HEADER_SIZE};
use crate::error::{FrameError, Result};

/// Reads exact byte counts and complete frames from a stream.
///
/// Each read first waits for readability, bounded by
/// [`FrameConfig::read_timeout`]. The bound applies per wait, so a payload
/// that trickles in may take longer than one timeout in total.
pub struct FrameReader<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Read + WaitReadable> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Read exactly `n` bytes (blocking, bounded per wait).
    ///
    /// Never reads past `n`, so bytes belonging to the next frame stay in
    /// the stream.
    pub fn recv_exact(&mut self, n: usize) -> Result<Bytes> {
        let mut out = BytesMut::zeroed(n);
        let mut filled = 0usize;

        while filled < n {
            if !self.inner.wait_readable(self.config.read_timeout)? {
                return Err(FrameError::Timeout {
                    waited: self.config.read_timeout,
                    received: filled,
                    expected: n,
                });
            }

            match self.inner.read(&mut out[filled..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(read) => filled += read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        Ok(out.freeze())
    }

    /// Read the 4-byte length header of the next frame.
    pub fn read_header(&mut self) -> Result<usize> {
        let header = self.recv_exact(HEADER_SIZE)?;
        let mut raw = [0u8; HEADER_SIZE];
        raw.copy_from_slice(&header);
        let len = u32::from_le_bytes(raw) as usize;

        if len > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: len,
                max: self.config.max_payload_size,
            });
        }
        Ok(len)
    }

    /// Read the next complete frame payload.
    pub fn read_frame(&mut self) -> Result<Bytes> {
        let len = self.read_header()?;
        let payload = self.recv_exact(len)?;
        trace!(len, "frame received");
        Ok(payload)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::io::{Cursor, Write};
    use std::os::unix::net::UnixStream;
    use std::time::Duration;

    use bytes::{BufMut, BytesMut};

    use super::*;
    use crate::codec::encode_frame;

    fn short_timeout() -> FrameConfig {
        FrameConfig {
            read_timeout: Duration::from_millis(50),
            ..FrameConfig::default()
        }
    }

    #[test]
    fn read_single_frame() {
        let mut wire = BytesMut::new();
        encode_frame(b"{\"result\":\"ok\"}", &mut wire).unwrap();

        let mut reader = FrameReader::new(Cursor::new(wire.to_vec()));
        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.as_ref(), b"{\"result\":\"ok\"}");
    }

    #[test]
    fn recv_exact_leaves_following_bytes_unread() {
        let mut reader = FrameReader::new(Cursor::new(b"abcdef".to_vec()));
        assert_eq!(reader.recv_exact(4).unwrap().as_ref(), b"abcd");
        assert_eq!(reader.get_ref().position(), 4);
        assert_eq!(reader.recv_exact(2).unwrap().as_ref(), b"ef");
    }

    #[test]
    fn recv_exact_zero_bytes_is_immediate() {
        let mut reader = FrameReader::with_config(NeverReady, short_timeout());
        assert!(reader.recv_exact(0).unwrap().is_empty());
    }

    #[test]
    fn one_byte_at_a_time() {
        let mut wire = BytesMut::new();
        encode_frame(b"[{\"id\":1}]", &mut wire).unwrap();

        let mut reader = FrameReader::new(ByteByByteReader {
            bytes: wire.to_vec(),
            pos: 0,
            reads: 0,
        });

        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.as_ref(), b"[{\"id\":1}]");
        assert_eq!(reader.get_ref().reads, wire.len());
    }

    #[test]
    fn zero_byte_read_is_connection_closed() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.recv_exact(4).unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn connection_closed_mid_payload() {
        let mut partial = BytesMut::new();
        partial.put_u32_le(16);
        partial.put_slice(b"only-part");

        let mut reader = FrameReader::new(Cursor::new(partial.to_vec()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn no_readiness_is_timeout() {
        let mut reader = FrameReader::with_config(NeverReady, short_timeout());
        match reader.recv_exact(4).unwrap_err() {
            FrameError::Timeout {
                waited,
                received,
                expected,
            } => {
                assert_eq!(waited, Duration::from_millis(50));
                assert_eq!(received, 0);
                assert_eq!(expected, 4);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn oversized_header_rejected_before_payload_read() {
        let mut wire = BytesMut::new();
        wire.put_u32_le(1024);

        let cfg = FrameConfig {
            max_payload_size: 16,
            ..FrameConfig::default()
        };
        let mut reader = FrameReader::with_config(Cursor::new(wire.to_vec()), cfg);
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 1024, max: 16 }));
    }

    #[test]
    fn interrupted_and_spurious_wakeups_retry() {
        let mut wire = BytesMut::new();
        encode_frame(b"ok", &mut wire).unwrap();

        let mut reader = FrameReader::new(FlakyReader {
            errors: vec![ErrorKind::Interrupted, ErrorKind::WouldBlock],
            bytes: wire.to_vec(),
            pos: 0,
        });
        assert_eq!(reader.read_frame().unwrap().as_ref(), b"ok");
    }

    #[test]
    fn other_io_errors_propagate() {
        let mut reader = FrameReader::new(FlakyReader {
            errors: vec![ErrorKind::BrokenPipe],
            bytes: Vec::new(),
            pos: 0,
        });
        let err = reader.recv_exact(1).unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn trickled_socket_delivery() {
        let (mut left, right) = UnixStream::pair().unwrap();
        let mut wire = BytesMut::new();
        encode_frame(br#"{"result":"ok","pid":42}"#, &mut wire).unwrap();
        let bytes = wire.to_vec();

        let writer = std::thread::spawn(move || {
            for byte in bytes {
                left.write_all(&[byte]).unwrap();
                std::thread::sleep(Duration::from_millis(2));
            }
        });

        let mut reader = FrameReader::with_config(right, short_timeout());
        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.as_ref(), br#"{"result":"ok","pid":42}"#);

        writer.join().unwrap();
    }

    #[test]
    fn stalled_socket_reports_partial_progress() {
        let (mut left, right) = UnixStream::pair().unwrap();
        left.write_all(&10u32.to_le_bytes()).unwrap();
        left.write_all(b"abc").unwrap();

        let mut reader = FrameReader::with_config(right, short_timeout());
        let len = reader.read_header().unwrap();
        assert_eq!(len, 10);

        match reader.recv_exact(len).unwrap_err() {
            FrameError::Timeout {
                received, expected, ..
            } => {
                assert_eq!(received, 3);
                assert_eq!(expected, 10);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        drop(left);
    }

    #[test]
    fn peer_close_on_socket() {
        let (left, right) = UnixStream::pair().unwrap();
        drop(left);

        let mut reader = FrameReader::with_config(right, short_timeout());
        assert!(matches!(
            reader.read_frame().unwrap_err(),
            FrameError::ConnectionClosed
        ));
    }

    struct NeverReady;

    impl Read for NeverReady {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            panic!("read must not be attempted without readiness");
        }
    }

    impl WaitReadable for NeverReady {
        fn wait_readable(&self, _timeout: Duration) -> std::io::Result<bool> {
            Ok(false)
        }
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
        reads: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            self.reads += 1;
            Ok(1)
        }
    }

    impl WaitReadable for ByteByByteReader {
        fn wait_readable(&self, _timeout: Duration) -> std::io::Result<bool> {
            Ok(true)
        }
    }

    struct FlakyReader {
        errors: Vec<ErrorKind>,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.errors.is_empty() {
                return Err(std::io::Error::from(self.errors.remove(0)));
            }
            let n = (self.bytes.len() - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    impl WaitReadable for FlakyReader {
        fn wait_readable(&self, _timeout: Duration) -> std::io::Result<bool> {
            Ok(true)
        }
    }
}
