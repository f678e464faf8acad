//! ## groundlink-store::stats
//! Per-field aggregates over a set of payloads.

use groundlink_protocols::TelemetryPayload;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub min: f32,
    pub max: f32,
    pub avg: f32,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadStats {
    pub temperature: FieldStats,
    pub battery: FieldStats,
    pub altitude: FieldStats,
    pub signal: FieldStats,
}

#[derive(Default)]
struct Accumulator {
    min: f32,
    max: f32,
    sum: f64,
}

impl Accumulator {
    fn push(&mut self, value: f32, first: bool) {
        if first {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.sum += f64::from(value);
    }

    fn finish(&self, count: usize) -> FieldStats {
        FieldStats {
            min: self.min,
            max: self.max,
            avg: (self.sum / count as f64) as f32,
        }
    }
}

impl PayloadStats {
    pub fn from_payloads<'a>(payloads: impl IntoIterator<Item = &'a TelemetryPayload>) -> Self {
        let mut fields: [Accumulator; 4] = Default::default();
        let mut count = 0usize;

        for payload in payloads {
            let readings = [
                payload.temperature,
                payload.battery,
                payload.altitude,
                payload.signal,
            ];
            for (acc, value) in fields.iter_mut().zip(readings) {
                acc.push(value, count == 0);
            }
            count += 1;
        }

        if count == 0 {
            return Self::default();
        }

        let [temperature, battery, altitude, signal] = fields.map(|acc| acc.finish(count));
        Self {
            temperature,
            battery,
            altitude,
            signal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(temperature: f32, battery: f32, altitude: f32, signal: f32) -> TelemetryPayload {
        TelemetryPayload {
            temperature,
            battery,
            altitude,
            signal,
        }
    }

    #[test]
    fn test_empty_is_zeroes() {
        let none: Vec<TelemetryPayload> = Vec::new();
        assert_eq!(PayloadStats::from_payloads(&none), PayloadStats::default());
    }

    #[test]
    fn test_min_max_avg() {
        let payloads = [
            payload(20.0, 70.0, 500.0, -60.0),
            payload(30.0, 100.0, 550.0, -40.0),
        ];
        let stats = PayloadStats::from_payloads(&payloads);

        assert_eq!(
            stats.temperature,
            FieldStats {
                min: 20.0,
                max: 30.0,
                avg: 25.0
            }
        );
        assert_eq!(stats.battery.avg, 85.0);
        assert_eq!(stats.altitude.min, 500.0);
        assert_eq!(stats.signal.max, -40.0);
        assert_eq!(stats.signal.min, -60.0);
    }

    #[test]
    fn test_single_negative_reading() {
        let stats = PayloadStats::from_payloads(&[payload(1.0, 1.0, 1.0, -85.0)]);
        assert_eq!(stats.signal.min, -85.0);
        assert_eq!(stats.signal.max, -85.0);
    }
}
