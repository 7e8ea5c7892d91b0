//! Trait abstraction over the serial write path, so the transmit loop can
//! be tested against an in-memory port.

use async_trait::async_trait;
use std::io;

/// Byte-stream write operations the transmit loop needs from a port.
#[async_trait]
pub trait SerialPortIO: Send {
    /// Write all bytes of one frame to the port.
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Flush the output buffer.
    async fn flush(&mut self) -> io::Result<()>;
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock port recording every frame written to it.
    ///
    /// An injected write error is one-shot: it fails the next write and is
    /// then cleared, which matches the flaky-link behavior the scheduler
    /// has to ride through.
    #[derive(Clone, Default)]
    pub struct MockSerialPort {
        pub written: Arc<Mutex<Vec<Vec<u8>>>>,
        pub next_write_error: Arc<Mutex<Option<io::ErrorKind>>>,
    }

    impl MockSerialPort {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn written_frames(&self) -> Vec<Vec<u8>> {
            self.written.lock().unwrap().clone()
        }

        pub fn fail_next_write(&self, kind: io::ErrorKind) {
            *self.next_write_error.lock().unwrap() = Some(kind);
        }
    }

    #[async_trait]
    impl SerialPortIO for MockSerialPort {
        async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
            if let Some(kind) = self.next_write_error.lock().unwrap().take() {
                return Err(io::Error::new(kind, "injected write error"));
            }
            self.written.lock().unwrap().push(data.to_vec());
            Ok(())
        }

        async fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
