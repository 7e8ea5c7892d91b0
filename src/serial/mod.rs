//! # Serial Transport
//!
//! Opens the serial link to the radio module and pushes encoded CRSF
//! frames down it. CRSF runs 8 data bits, no parity, one stop bit, no
//! flow control; the baud rate comes from configuration (921600 by
//! default, matching common ELRS TX module setups).

pub mod port_trait;

use async_trait::async_trait;
use std::io;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info};

use crate::error::{BridgeError, Result};
pub use port_trait::SerialPortIO;

/// Default CRSF link baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 921_600;

/// Serial connection to the radio module.
pub struct CrsfSerial {
    port: tokio_serial::SerialStream,
    device_path: String,
}

impl std::fmt::Debug for CrsfSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrsfSerial")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl CrsfSerial {
    /// Open `path` at `baud` with CRSF port settings (8N1, no flow control).
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Serial`] if the device cannot be opened.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use crsf_link::serial::{CrsfSerial, DEFAULT_BAUD_RATE};
    ///
    /// let port = CrsfSerial::open("/dev/ttyACM0", DEFAULT_BAUD_RATE)?;
    /// # Ok::<(), crsf_link::error::BridgeError>(())
    /// ```
    pub fn open(path: &str, baud: u32) -> Result<Self> {
        let port = tokio_serial::new(path, baud)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| BridgeError::Serial(format!("failed to open {path}: {e}")))?;

        info!("opened serial port {path} at {baud} baud");
        Ok(Self {
            port,
            device_path: path.to_string(),
        })
    }

    /// Path of the opened device.
    pub fn device_path(&self) -> &str {
        &self.device_path
    }
}

#[async_trait]
impl SerialPortIO for CrsfSerial {
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        use tokio::io::AsyncWriteExt;
        self.port.write_all(data).await?;
        debug!("wrote {} bytes", data.len());
        Ok(())
    }

    async fn flush(&mut self) -> io::Result<()> {
        use tokio::io::AsyncWriteExt;
        self.port.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_baud_matches_elrs_convention() {
        assert_eq!(DEFAULT_BAUD_RATE, 921_600);
    }

    #[test]
    fn open_nonexistent_device_fails() {
        let result = CrsfSerial::open("/dev/nonexistent_crsf_device_42", DEFAULT_BAUD_RATE);
        match result {
            Err(BridgeError::Serial(msg)) => {
                assert!(msg.contains("/dev/nonexistent_crsf_device_42"));
            }
            other => panic!("expected Serial error, got {other:?}"),
        }
    }

    // Requires a radio module on a real port.
    #[tokio::test]
    #[ignore]
    async fn open_real_hardware() {
        if let Ok(port) = CrsfSerial::open("/dev/ttyACM0", DEFAULT_BAUD_RATE) {
            println!("opened {}", port.device_path());
        }
    }
}
