/*!
# Groundlink Simulator

Synthetic spacecraft telemetry for exercising a gateway without a radio.

## Key Components:
- **Packet Generator:** seedable source of standard frames, with a fixed
  share of packets carrying one out-of-range reading.
- **UDP Emitter:** paces generated frames onto the wire.
*/

pub mod emitter;
pub mod generator;

pub use emitter::{EmitSummary, EmitterError, UdpEmitter};
pub use generator::{GeneratedPacket, PacketGenerator};
