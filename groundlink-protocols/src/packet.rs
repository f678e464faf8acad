//! ## groundlink-protocols::packet
//! Codec for the 32-byte CCSDS-style telemetry frame.
//!
//! ```text
//! offset 0  (2B) packet id       version(3) type(1) sec_hdr_flag(1) apid(11)
//! offset 2  (2B) packet seq ctrl seq_flags(2) seq_count(14)
//! offset 4  (2B) packet length   secondary header + payload - 1
//! offset 6  (8B) timestamp       unix seconds
//! offset 14 (2B) subsystem id
//! offset 16 (16B) payload        temperature, battery, altitude, signal (f32)
//! ```
//!
//! Everything is big-endian. Only the length is validated; field semantics
//! (e.g. a negative altitude) are left to the detection rules.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PRIMARY_HEADER_LEN: usize = 6;
pub const SECONDARY_HEADER_LEN: usize = 10;
pub const PAYLOAD_LEN: usize = 16;
/// Total size of one frame on the wire.
pub const PACKET_LEN: usize = PRIMARY_HEADER_LEN + SECONDARY_HEADER_LEN + PAYLOAD_LEN;

/// Application process identifier used by the emulator.
pub const APID: u16 = 0x01;
pub const PACKET_VERSION: u16 = 0x0;
/// 0 = telemetry, 1 = telecommand.
pub const PACKET_TYPE_TELEMETRY: u16 = 0x0;
pub const SEC_HDR_FLAG: u16 = 0x1;
/// Standalone packet (first and last segment).
pub const SEQ_FLAGS_STANDALONE: u16 = 0x3;
/// Main bus telemetry.
pub const SUBSYSTEM_MAIN_BUS: u16 = 0x0001;

const SEQ_COUNT_MASK: u16 = 0x3FFF;
const APID_MASK: u16 = 0x07FF;

/// Errors raised while decoding a telemetry frame.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PacketParseError {
    #[error("Malformed telemetry packet: expected {expected} bytes, got {actual}")]
    MalformedPacket { expected: usize, actual: usize },
}

/// The 6-byte primary header.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryHeader {
    pub packet_id: u16,
    pub packet_seq_ctrl: u16,
    pub packet_length: u16,
}

impl PrimaryHeader {
    /// Packs version/type/secondary-header-flag/apid into a packet id.
    pub fn pack_id(version: u16, packet_type: u16, sec_hdr_flag: u16, apid: u16) -> u16 {
        ((version & 0x7) << 13)
            | ((packet_type & 0x1) << 12)
            | ((sec_hdr_flag & 0x1) << 11)
            | (apid & APID_MASK)
    }

    /// Packs sequence flags and the 14-bit counter into the sequence control word.
    pub fn pack_seq_ctrl(seq_flags: u16, seq_count: u16) -> u16 {
        ((seq_flags & 0x3) << 14) | (seq_count & SEQ_COUNT_MASK)
    }

    pub fn version(&self) -> u16 {
        self.packet_id >> 13
    }

    pub fn packet_type(&self) -> u16 {
        (self.packet_id >> 12) & 0x1
    }

    pub fn secondary_header_flag(&self) -> u16 {
        (self.packet_id >> 11) & 0x1
    }

    pub fn apid(&self) -> u16 {
        self.packet_id & APID_MASK
    }

    pub fn sequence_flags(&self) -> u16 {
        self.packet_seq_ctrl >> 14
    }

    pub fn sequence_count(&self) -> u16 {
        self.packet_seq_ctrl & SEQ_COUNT_MASK
    }
}

/// The 10-byte secondary header.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryHeader {
    /// Unix timestamp (seconds).
    pub timestamp: u64,
    pub subsystem_id: u16,
}

/// Sensor readings carried by every frame.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryPayload {
    /// °C
    pub temperature: f32,
    /// %
    pub battery: f32,
    /// km
    pub altitude: f32,
    /// dB
    pub signal: f32,
}

/// A decoded telemetry frame: headers plus payload.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryPacket {
    pub primary_header: PrimaryHeader,
    pub secondary_header: SecondaryHeader,
    pub payload: TelemetryPayload,
}

impl TelemetryPacket {
    /// Builds the standalone main-bus frame the emulator sends.
    pub fn standalone(seq_count: u16, timestamp: u64, payload: TelemetryPayload) -> Self {
        Self {
            primary_header: PrimaryHeader {
                packet_id: PrimaryHeader::pack_id(
                    PACKET_VERSION,
                    PACKET_TYPE_TELEMETRY,
                    SEC_HDR_FLAG,
                    APID,
                ),
                packet_seq_ctrl: PrimaryHeader::pack_seq_ctrl(SEQ_FLAGS_STANDALONE, seq_count),
                packet_length: (SECONDARY_HEADER_LEN + PAYLOAD_LEN - 1) as u16,
            },
            secondary_header: SecondaryHeader {
                timestamp,
                subsystem_id: SUBSYSTEM_MAIN_BUS,
            },
            payload,
        }
    }

    /// Timestamp of the frame in unix seconds.
    #[inline]
    pub fn timestamp(&self) -> u64 {
        self.secondary_header.timestamp
    }

    /// Decodes a frame from the first [`PACKET_LEN`] bytes of `data`.
    /// Trailing bytes are ignored.
    pub fn decode(data: &[u8]) -> Result<Self, PacketParseError> {
        if data.len() < PACKET_LEN {
            return Err(PacketParseError::MalformedPacket {
                expected: PACKET_LEN,
                actual: data.len(),
            });
        }

        let mut buf = &data[..PACKET_LEN];
        let primary_header = PrimaryHeader {
            packet_id: buf.get_u16(),
            packet_seq_ctrl: buf.get_u16(),
            packet_length: buf.get_u16(),
        };
        let secondary_header = SecondaryHeader {
            timestamp: buf.get_u64(),
            subsystem_id: buf.get_u16(),
        };
        let payload = TelemetryPayload {
            temperature: buf.get_f32(),
            battery: buf.get_f32(),
            altitude: buf.get_f32(),
            signal: buf.get_f32(),
        };

        Ok(Self {
            primary_header,
            secondary_header,
            payload,
        })
    }

    /// Encodes the frame; always exactly [`PACKET_LEN`] bytes.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(PACKET_LEN);
        self.encode_into(&mut buf);
        buf.freeze()
    }

    /// Appends the encoded frame to `buf`.
    pub fn encode_into<B: BufMut>(&self, buf: &mut B) {
        buf.put_u16(self.primary_header.packet_id);
        buf.put_u16(self.primary_header.packet_seq_ctrl);
        buf.put_u16(self.primary_header.packet_length);
        buf.put_u64(self.secondary_header.timestamp);
        buf.put_u16(self.secondary_header.subsystem_id);
        buf.put_f32(self.payload.temperature);
        buf.put_f32(self.payload.battery);
        buf.put_f32(self.payload.altitude);
        buf.put_f32(self.payload.signal);
    }
}
