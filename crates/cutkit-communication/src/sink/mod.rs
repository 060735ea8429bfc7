//! Byte sinks
//!
//! A finished motion program is handed to exactly one sink. Sinks are
//! blocking and make a single attempt; retries are the caller's decision.

pub mod file;
pub mod tcp;

pub use file::FileSink;
pub use tcp::TcpSink;

use cutkit_core::DeliveryError;

/// What a successful delivery wrote and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// File path or network address
    pub target: String,
    pub bytes_written: usize,
}

/// Destination for rendered program text
pub trait ByteSink {
    /// Write `text` to the destination
    fn deliver(&mut self, text: &str) -> Result<DeliveryReceipt, DeliveryError>;

    /// Human-readable destination, for logs
    fn describe(&self) -> String;
}

/// Keeps everything delivered to it in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    delivered: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every text delivered so far, oldest first
    pub fn delivered(&self) -> &[String] {
        &self.delivered
    }
}

impl ByteSink for MemorySink {
    fn deliver(&mut self, text: &str) -> Result<DeliveryReceipt, DeliveryError> {
        self.delivered.push(text.to_string());
        Ok(DeliveryReceipt {
            target: self.describe(),
            bytes_written: text.len(),
        })
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
