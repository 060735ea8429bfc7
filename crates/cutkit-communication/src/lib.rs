//! # CutKit Communication
//!
//! Delivery of finished motion programs to a plotter: written to a file for
//! later transfer, or streamed over TCP to a networked cutter.

pub mod sink;

pub use sink::{
    tcp::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT_MS},
    ByteSink, DeliveryReceipt, FileSink, MemorySink, TcpSink,
};
