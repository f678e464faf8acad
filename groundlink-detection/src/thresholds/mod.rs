//! ## groundlink-detection::thresholds
//! **Fixed safety thresholds on sensor readings**
//!
//! | field       | normal range  | anomaly when |
//! |-------------|---------------|--------------|
//! | temperature | 20–30 °C      | `> 35.0`     |
//! | battery     | 70–100 %      | `< 40.0`     |
//! | altitude    | 500–550 km    | `< 400.0`    |
//! | signal      | -60…-40 dB    | `< -80.0`    |
//!
//! Rules are evaluated in table order, which is also the output order.
//! Every comparison is strict, so a reading exactly on a limit is nominal.

use groundlink_protocols::{Anomaly, AnomalyField, TelemetryPacket, TelemetryPayload};

pub const TEMPERATURE_MAX: f32 = 35.0;
pub const BATTERY_MIN: f32 = 40.0;
pub const ALTITUDE_MIN: f32 = 400.0;
pub const SIGNAL_MIN: f32 = -80.0;

struct Rule {
    field: AnomalyField,
    reading: fn(&TelemetryPayload) -> f32,
    tripped: fn(f32) -> bool,
}

const RULES: [Rule; 4] = [
    Rule {
        field: AnomalyField::Temperature,
        reading: |p| p.temperature,
        tripped: |v| v > TEMPERATURE_MAX,
    },
    Rule {
        field: AnomalyField::Battery,
        reading: |p| p.battery,
        tripped: |v| v < BATTERY_MIN,
    },
    Rule {
        field: AnomalyField::Altitude,
        reading: |p| p.altitude,
        tripped: |v| v < ALTITUDE_MIN,
    },
    Rule {
        field: AnomalyField::Signal,
        reading: |p| p.signal,
        tripped: |v| v < SIGNAL_MIN,
    },
];

/// Returns every threshold violation in `packet`, in rule order.
pub fn detect(packet: &TelemetryPacket) -> Vec<Anomaly> {
    let timestamp = packet.timestamp();
    RULES
        .iter()
        .filter_map(|rule| {
            let value = (rule.reading)(&packet.payload);
            (rule.tripped)(value).then(|| Anomaly::new(rule.field, value, timestamp))
        })
        .collect()
}

/// Stateless handle over [`detect`] so writers can hold a detector by value.
#[derive(Default, Debug, Copy, Clone)]
pub struct ThresholdEngine;

impl ThresholdEngine {
    pub fn new() -> Self {
        Self
    }

    /// Scan a decoded packet against the fixed thresholds
    #[inline]
    pub fn packet_scan(&self, packet: &TelemetryPacket) -> Vec<Anomaly> {
        detect(packet)
    }
}
