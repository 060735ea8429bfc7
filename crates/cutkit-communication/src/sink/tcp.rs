//! TCP sink: streams program text to a networked plotter.
//!
//! One connection per delivery. The text is followed by a single newline,
//! then the write half is shut down so the plotter sees end of job.

use super::{ByteSink, DeliveryReceipt};
use cutkit_core::DeliveryError;
use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Default plotter address
pub const DEFAULT_HOST: &str = "192.168.0.233";
/// Default plotter port
pub const DEFAULT_PORT: u16 = 8080;
/// Connect and write timeout (ms)
pub const DEFAULT_TIMEOUT_MS: u64 = 90_000;

/// Blocking TCP delivery with a timeout
#[derive(Debug, Clone)]
pub struct TcpSink {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpSink {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Parse `host:port`
    pub fn from_address(address: &str, timeout: Duration) -> Result<Self, DeliveryError> {
        let invalid = || DeliveryError::InvalidAddress {
            address: address.to_string(),
        };
        let (host, port) = address.rsplit_once(':').ok_or_else(invalid)?;
        let port = port.parse::<u16>().map_err(|_| invalid())?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(host, port, timeout))
    }

    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn resolve(&self) -> Result<Vec<SocketAddr>, DeliveryError> {
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|_| DeliveryError::InvalidAddress {
                address: self.address(),
            })?
            .collect();
        if addrs.is_empty() {
            return Err(DeliveryError::InvalidAddress {
                address: self.address(),
            });
        }
        Ok(addrs)
    }

    fn connect(&self) -> Result<TcpStream, DeliveryError> {
        let mut last_err = None;
        for addr in self.resolve()? {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }
        Err(match last_err {
            Some(e) => self.map_io(e, |reason| DeliveryError::Connect {
                address: self.address(),
                reason,
            }),
            None => DeliveryError::InvalidAddress {
                address: self.address(),
            },
        })
    }

    fn map_io<F>(&self, e: io::Error, otherwise: F) -> DeliveryError
    where
        F: FnOnce(String) -> DeliveryError,
    {
        match e.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => DeliveryError::Timeout {
                address: self.address(),
                timeout_ms: self.timeout.as_millis() as u64,
            },
            _ => otherwise(e.to_string()),
        }
    }
}

impl Default for TcpSink {
    fn default() -> Self {
        Self::new(
            DEFAULT_HOST,
            DEFAULT_PORT,
            Duration::from_millis(DEFAULT_TIMEOUT_MS),
        )
    }
}

impl ByteSink for TcpSink {
    fn deliver(&mut self, text: &str) -> Result<DeliveryReceipt, DeliveryError> {
        let mut stream = self.connect()?;
        let write_err = |e: io::Error| {
            self.map_io(e, |reason| DeliveryError::Write {
                target: self.address(),
                reason,
            })
        };

        stream
            .set_write_timeout(Some(self.timeout))
            .map_err(write_err)?;
        stream.write_all(text.as_bytes()).map_err(write_err)?;
        stream.write_all(b"\n").map_err(write_err)?;
        stream.flush().map_err(write_err)?;
        if let Err(e) = stream.shutdown(Shutdown::Write) {
            tracing::debug!("Shutdown of {} failed: {}", self.address(), e);
        }

        let bytes_written = text.len() + 1;
        tracing::info!("Sent {} bytes to {}", bytes_written, self.address());
        Ok(DeliveryReceipt {
            target: self.address(),
            bytes_written,
        })
    }

    fn describe(&self) -> String {
        format!("tcp://{}", self.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        let sink = TcpSink::from_address("192.168.0.233:8080", Duration::from_secs(1)).unwrap();
        assert_eq!(sink.address(), "192.168.0.233:8080");
        assert!(TcpSink::from_address("plotter", Duration::from_secs(1)).is_err());
        assert!(TcpSink::from_address(":8080", Duration::from_secs(1)).is_err());
        assert!(TcpSink::from_address("host:99999", Duration::from_secs(1)).is_err());
        let v6 = TcpSink::from_address("[::1]:8080", Duration::from_secs(1)).unwrap();
        assert_eq!(v6.address(), "[::1]:8080");
    }

    #[test]
    fn test_defaults() {
        let sink = TcpSink::default();
        assert_eq!(sink.address(), "192.168.0.233:8080");
        assert_eq!(sink.timeout(), Duration::from_secs(90));
    }
}
