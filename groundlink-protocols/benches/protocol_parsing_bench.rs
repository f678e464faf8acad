#[macro_use]
extern crate criterion;

use bytes::Bytes;
use criterion::{black_box, Criterion};

use groundlink_protocols::{Anomaly, AnomalyField, TelemetryPacket, TelemetryPayload};

// Standalone main-bus frame, seq 7, nominal readings
const TELEMETRY_DATA: &[u8] = &[
    0x08, 0x01, // Packet ID
    0xC0, 0x07, // Sequence control
    0x00, 0x19, // Packet length
    0x00, 0x00, 0x00, 0x00, 0x66, 0x00, 0x00, 0x00, // Timestamp
    0x00, 0x01, // Subsystem ID
    0x41, 0xC8, 0x00, 0x00, // Temperature
    0x42, 0xAA, 0x00, 0x00, // Battery
    0x44, 0x03, 0x40, 0x00, // Altitude
    0xC2, 0x48, 0x00, 0x00, // Signal
];

fn benchmark_packet_decode(c: &mut Criterion) {
    let data = Bytes::from_static(TELEMETRY_DATA);

    c.bench_function("telemetry_decode", |b| {
        b.iter(|| {
            black_box(TelemetryPacket::decode(&data)).unwrap();
        })
    });
}

fn benchmark_packet_encode(c: &mut Criterion) {
    let packet = TelemetryPacket::standalone(
        7,
        0x6600_0000,
        TelemetryPayload {
            temperature: 25.0,
            battery: 85.0,
            altitude: 525.0,
            signal: -50.0,
        },
    );

    c.bench_function("telemetry_encode", |b| {
        b.iter(|| black_box(packet.encode()))
    });
}

fn benchmark_anomaly_decode(c: &mut Criterion) {
    let data = Anomaly::new(AnomalyField::Altitude, 350.0, 0x6600_0000).encode();

    c.bench_function("anomaly_decode", |b| {
        b.iter(|| {
            black_box(Anomaly::decode(&data)).unwrap();
        })
    });
}

criterion_group!(
    benches,
    benchmark_packet_decode,
    benchmark_packet_encode,
    benchmark_anomaly_decode
);
criterion_main!(benches);
