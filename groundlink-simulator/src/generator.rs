//! ## groundlink-simulator::generator
//! **Seedable telemetry frame source**
//!
//! | field       | nominal draw  | anomalous draw |
//! |-------------|---------------|----------------|
//! | temperature | 20–30         | 35.01–40       |
//! | battery     | 70–100        | 20–40          |
//! | altitude    | 500–550       | 300–400        |
//! | signal      | -60…-40       | -90…-80        |
//!
//! Anomalous draws are half-open so they always land strictly past the
//! detection threshold.

use std::ops::Range;

use groundlink_protocols::{AnomalyField, TelemetryPacket, TelemetryPayload};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEQ_COUNT_MASK: u64 = 0x3FFF;

const TEMPERATURE_NOMINAL: Range<f32> = 20.0..30.0;
const BATTERY_NOMINAL: Range<f32> = 70.0..100.0;
const ALTITUDE_NOMINAL: Range<f32> = 500.0..550.0;
const SIGNAL_NOMINAL: Range<f32> = -60.0..-40.0;

const TEMPERATURE_ANOMALOUS: Range<f32> = 35.01..40.0;
const BATTERY_ANOMALOUS: Range<f32> = 20.0..40.0;
const ALTITUDE_ANOMALOUS: Range<f32> = 300.0..400.0;
const SIGNAL_ANOMALOUS: Range<f32> = -90.0..-80.0;

const FIELDS: [AnomalyField; 4] = [
    AnomalyField::Temperature,
    AnomalyField::Battery,
    AnomalyField::Altitude,
    AnomalyField::Signal,
];

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPacket {
    pub packet: TelemetryPacket,
    /// The field pushed out of range, if this packet is anomalous.
    pub anomaly: Option<AnomalyField>,
}

pub struct PacketGenerator {
    rng: StdRng,
    anomaly_every: u64,
    count: u64,
}

impl PacketGenerator {
    /// `anomaly_every` of 0 is treated as 1 (every packet anomalous).
    pub fn new(anomaly_every: u64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            anomaly_every: anomaly_every.max(1),
            count: 0,
        }
    }

    /// Packets produced so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn next_packet(&mut self, timestamp: u64) -> GeneratedPacket {
        let anomaly = (self.count % self.anomaly_every == 0)
            .then(|| FIELDS[self.rng.random_range(0..FIELDS.len())]);

        let payload = self.payload(anomaly);
        let seq_count = (self.count & SEQ_COUNT_MASK) as u16;
        self.count += 1;

        GeneratedPacket {
            packet: TelemetryPacket::standalone(seq_count, timestamp, payload),
            anomaly,
        }
    }

    fn payload(&mut self, anomaly: Option<AnomalyField>) -> TelemetryPayload {
        let pick = |field: AnomalyField, nominal: Range<f32>, anomalous: Range<f32>| {
            if anomaly == Some(field) {
                anomalous
            } else {
                nominal
            }
        };

        TelemetryPayload {
            temperature: self.rng.random_range(pick(
                AnomalyField::Temperature,
                TEMPERATURE_NOMINAL,
                TEMPERATURE_ANOMALOUS,
            )),
            battery: self.rng.random_range(pick(
                AnomalyField::Battery,
                BATTERY_NOMINAL,
                BATTERY_ANOMALOUS,
            )),
            altitude: self.rng.random_range(pick(
                AnomalyField::Altitude,
                ALTITUDE_NOMINAL,
                ALTITUDE_ANOMALOUS,
            )),
            signal: self.rng.random_range(pick(
                AnomalyField::Signal,
                SIGNAL_NOMINAL,
                SIGNAL_ANOMALOUS,
            )),
        }
    }
}
