//! groundlink-capture
//!
//! Network sources for the ingest pipeline. Each received datagram is one
//! pipeline message.

pub mod udp;

pub use udp::UdpReader;
