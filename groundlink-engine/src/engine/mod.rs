mod error;
mod runtime;
mod telemetry_writer;

pub use self::{error::GatewayError, runtime::Gateway, telemetry_writer::TelemetryWriter};
