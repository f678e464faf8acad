//! # groundlink-core
//!
//! The generic reader → writer → quarantine execution engine shared by every
//! ingestion pipeline.
//!
//! ### Key Submodules:
//! - `alloc`: bounded pool of read buffers
//! - `io`: `Reader` / `Writer` / `Quarantiner` capabilities and the in-process hand-off queue
//! - `processor`: the single-threaded run loop and its failure-routing policy
//! - `group`: fail-fast supervision of several processors

pub mod alloc;
pub mod error;
pub mod group;
pub mod io;
pub mod processor;

pub mod prelude {
    pub use crate::alloc::*;
    pub use crate::error::*;
    pub use crate::group::*;
    pub use crate::io::*;
    pub use crate::processor::*;
}

pub use error::{PipelineError, QuarantineError, ReadError, WriteError};
pub use processor::{Processor, ProcessorConfig, ProcessorState};
