//! ## groundlink-protocols::anomaly
//! Anomaly records and their 13-byte wire form.
//!
//! Pipeline stages only move bytes, so anomalies cross the hand-off queue as
//! `field (1B) | value (f32 BE) | timestamp (u64 BE)`.

use std::fmt;
use std::str::FromStr;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding an anomaly record.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AnomalyParseError {
    #[error("Insufficient data to parse anomaly: expected {expected} bytes, got {actual}")]
    InsufficientData { expected: usize, actual: usize },
    #[error("Unknown anomaly field code {0:#04x}")]
    UnknownField(u8),
    #[error("Unknown anomaly field name {0:?}")]
    UnknownFieldName(String),
}

/// Sensor field that tripped a threshold.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyField {
    Temperature,
    Battery,
    Altitude,
    Signal,
}

impl AnomalyField {
    pub fn code(self) -> u8 {
        match self {
            AnomalyField::Temperature => 1,
            AnomalyField::Battery => 2,
            AnomalyField::Altitude => 3,
            AnomalyField::Signal => 4,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, AnomalyParseError> {
        match code {
            1 => Ok(AnomalyField::Temperature),
            2 => Ok(AnomalyField::Battery),
            3 => Ok(AnomalyField::Altitude),
            4 => Ok(AnomalyField::Signal),
            other => Err(AnomalyParseError::UnknownField(other)),
        }
    }

    /// Column value used by the persistence layer.
    pub fn as_str(self) -> &'static str {
        match self {
            AnomalyField::Temperature => "TEMPERATURE",
            AnomalyField::Battery => "BATTERY",
            AnomalyField::Altitude => "ALTITUDE",
            AnomalyField::Signal => "SIGNAL",
        }
    }
}

impl fmt::Display for AnomalyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnomalyField {
    type Err = AnomalyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEMPERATURE" => Ok(AnomalyField::Temperature),
            "BATTERY" => Ok(AnomalyField::Battery),
            "ALTITUDE" => Ok(AnomalyField::Altitude),
            "SIGNAL" => Ok(AnomalyField::Signal),
            other => Err(AnomalyParseError::UnknownFieldName(other.to_string())),
        }
    }
}

/// A single out-of-threshold reading.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub field: AnomalyField,
    pub value: f32,
    /// Unix seconds, copied from the packet's secondary header.
    pub timestamp: u64,
}

impl Anomaly {
    pub const ENCODED_LEN: usize = 13;

    pub fn new(field: AnomalyField, value: f32, timestamp: u64) -> Self {
        Self {
            field,
            value,
            timestamp,
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(Self::ENCODED_LEN);
        buf.put_u8(self.field.code());
        buf.put_f32(self.value);
        buf.put_u64(self.timestamp);
        buf.freeze()
    }

    pub fn decode(data: &[u8]) -> Result<Self, AnomalyParseError> {
        if data.len() < Self::ENCODED_LEN {
            return Err(AnomalyParseError::InsufficientData {
                expected: Self::ENCODED_LEN,
                actual: data.len(),
            });
        }

        let mut buf = &data[..Self::ENCODED_LEN];
        let field = AnomalyField::from_code(buf.get_u8())?;
        Ok(Self {
            field,
            value: buf.get_f32(),
            timestamp: buf.get_u64(),
        })
    }
}
